// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use pocketpix::Config;
use pocketpix::backends::camera::SourceSpec;

#[test]
fn test_config_default() {
    // Test that default config can be created
    let config = Config::default();

    // Check sensible defaults
    assert!(config.mirror_default, "Mirror should be enabled by default");
    assert_eq!(config.jpeg_quality, 90);
    assert_eq!((config.requested_width, config.requested_height), (1280, 720));
    assert_eq!(config.source(), SourceSpec::V4l2("/dev/video0".to_string()));
}

#[test]
fn test_config_export_dir_default() {
    let config = Config::default();
    assert!(config.export_dir().ends_with("PocketPix"));
}

#[test]
fn test_config_initial_filter_follows_mirror_default() {
    let config = Config {
        mirror_default: false,
        ..Default::default()
    };
    let filter = config.initial_filter();
    assert_eq!(filter.index, 0);
    assert!(!filter.mirror);
}

#[test]
fn test_config_request_uses_configured_size() {
    let config = Config {
        requested_width: 640,
        requested_height: 480,
        ..Default::default()
    };
    let request = config.request();
    assert_eq!((request.width, request.height), (640, 480));
}
