// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! Non-interactive entry points:
//! - Listing capture devices
//! - Taking a single photo

use chrono::Local;
use pocketpix::Config;
use pocketpix::backends::camera::{CameraFrame, SourceSpec, enumerate_cameras};
use pocketpix::constants::APP_NAME;
use pocketpix::constants::export::TIMESTAMP_FORMAT;
use pocketpix::errors::AppResult;
use pocketpix::pipelines::photo::{FILTERS, FilterState, capture_frame};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// List all V4L2 capture devices
pub fn list_cameras() -> AppResult<()> {
    let cameras = enumerate_cameras();

    if cameras.is_empty() {
        println!("No cameras found.");
        println!("Use `--source pattern` or `--source <image>` to try {} without one.", APP_NAME);
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for (index, camera) in cameras.iter().enumerate() {
        println!("  [{}] {}", index, camera.name);
        println!("      Path: {}", camera.path);
    }
    println!();
    println!("Filters:");
    for (index, filter) in FILTERS.iter().enumerate() {
        println!("  [{}] {}", index, filter.name);
    }

    Ok(())
}

/// Options for `snap`
pub struct SnapOptions {
    pub source: Option<SourceSpec>,
    pub filter: usize,
    pub no_mirror: bool,
    pub output: Option<PathBuf>,
}

/// Capture one photo and write both its display and stamped copies
pub fn take_photo(config: &Config, options: SnapOptions) -> AppResult<()> {
    if options.filter >= FILTERS.len() {
        return Err(format!(
            "Filter index {} out of range (0-{})",
            options.filter,
            FILTERS.len() - 1
        )
        .into());
    }

    let source = options.source.unwrap_or_else(|| config.source());
    let device = source.device();
    println!("Using source: {}", device.name());

    let output_dir = options.output.unwrap_or_else(|| config.export_dir());
    std::fs::create_dir_all(&output_dir)?;

    let filter = FilterState {
        index: options.filter,
        mirror: config.mirror_default && !options.no_mirror,
    };

    let rt = tokio::runtime::Runtime::new()?;
    let mut live = rt.block_on(device.acquire(config.request()))?;

    println!("Capturing...");
    let frame = wait_for_frame(|| live.current_frame());
    live.stop();
    let frame = frame.ok_or("Failed to capture frame from camera")?;
    println!("Capture format: {}x{}", frame.width, frame.height);

    let now = Local::now();
    let record = capture_frame(&frame, &filter, &now, config.jpeg_quality)?;

    let stem = format!("{}_IMG_{}", APP_NAME, now.format(TIMESTAMP_FORMAT));
    let display_path = output_dir.join(format!("{}.jpg", stem));
    let export_path = output_dir.join(format!("{}_stamped.jpg", stem));
    std::fs::write(&display_path, record.display_image.bytes())?;
    std::fs::write(&export_path, record.export_image.bytes())?;

    println!(
        "Photo saved: {} ({}, {})",
        display_path.display(),
        filter.filter().name,
        if filter.mirror { "mirrored" } else { "unmirrored" }
    );
    println!(
        "Stamped copy: {} [{} {}]",
        export_path.display(),
        record.date_stamp(),
        record.time_stamp()
    );
    Ok(())
}

/// Wait for the device to warm up and hand out a usable frame
fn wait_for_frame(
    mut current: impl FnMut() -> Option<Arc<CameraFrame>>,
) -> Option<Arc<CameraFrame>> {
    let start = Instant::now();
    let timeout = Duration::from_secs(5);
    let warmup = Duration::from_millis(500);
    let mut frame = None;

    while start.elapsed() < timeout {
        match current() {
            Some(f) if f.is_ready() => {
                frame = Some(f);
                // After warmup period, use the next good frame
                if start.elapsed() > warmup {
                    break;
                }
            }
            _ => {}
        }
        std::thread::sleep(Duration::from_millis(16));
    }

    frame
}
