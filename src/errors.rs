// SPDX-License-Identifier: GPL-3.0-only

//! Error types for PocketPix
//!
//! Each domain has its own error enum; [`AppError`] wraps them for the
//! CLI commands, which cross domain boundaries.

use thiserror::Error;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone, Error)]
pub enum AppError {
    /// Capture device errors
    #[error("Camera error: {0}")]
    Backend(#[from] BackendError),
    /// Photo capture errors
    #[error("Photo error: {0}")]
    Photo(#[from] PhotoError),
    /// Export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

/// Capture device errors
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// No capture device could be found
    #[error("Device not found: {0}")]
    DeviceNotFound(String),
    /// Device refused to open or stream
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),
    /// Device offers no format we can decode
    #[error("Format not supported: {0}")]
    FormatNotSupported(String),
    /// General I/O error
    #[error("I/O error: {0}")]
    Io(String),
}

/// Photo capture errors
#[derive(Debug, Clone, Error)]
pub enum PhotoError {
    /// Frame source has not produced a usable frame yet
    #[error("No frame available for capture")]
    NoFrameAvailable,
    /// Frame buffer does not match its declared geometry
    #[error("Frame buffer too small: expected {expected} bytes, got {actual}")]
    FrameTooSmall { expected: usize, actual: usize },
    /// Encoding failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Export errors
#[derive(Debug, Clone, Error)]
pub enum ExportError {
    /// A source photo could not be decoded onto the drawing surface
    #[error("Drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),
    /// Wrong number of photos for the requested export
    #[error("Expected {expected} photos, got {actual}")]
    WrongSelection { expected: usize, actual: usize },
    /// A selected index is not in the photo log
    #[error("Photo index {0} is out of range")]
    IndexOutOfRange(usize),
    /// Archive packaging failed
    #[error("Archive packaging failed: {0}")]
    Packaging(String),
    /// Encoding the composite failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
    /// Background task was cancelled or panicked
    #[error("Export task error: {0}")]
    Task(String),
}

/// Configuration errors
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Config file could not be read or written
    #[error("I/O error: {0}")]
    Io(String),
    /// Config file is not valid JSON for this version
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Other(err.to_string())
    }
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::Io(err.to_string())
    }
}

impl From<image::ImageError> for PhotoError {
    fn from(err: image::ImageError) -> Self {
        PhotoError::EncodingFailed(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ExportError {
    fn from(err: tokio::task::JoinError) -> Self {
        ExportError::Task(err.to_string())
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_failures_convert_into_app_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory");
        let err: AppError = io.into();
        assert!(err.to_string().contains("no such directory"));

        let err: AppError = BackendError::DeviceNotFound("/dev/video9".into()).into();
        assert_eq!(err.to_string(), "Camera error: Device not found: /dev/video9");

        let err: AppError = "Failed to capture frame from camera".into();
        assert!(matches!(err, AppError::Other(_)));
    }
}
