//! Error types for the photo-polish crate.

use std::path::PathBuf;

/// Errors that can occur while configuring or running the edit pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A setting value is out of range or otherwise invalid.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The logo image could not be loaded. Fatal for the whole run, since
    /// every output would otherwise silently lack the overlay.
    #[error("failed to load logo {path}: {source}")]
    LogoLoad {
        /// Path of the logo file that failed to load.
        path: PathBuf,
        /// Underlying decode error.
        source: image::ImageError,
    },

    /// Output path equals the input path. Originals are never overwritten.
    #[error("output path equals input path: {0}")]
    SameOutputPath(PathBuf),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The output format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An error occurred during image processing (load, save, encode).
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let io_err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io_err.to_string().contains("gone"));

        let unsupported = Error::UnsupportedFormat("tiff".to_string());
        assert!(unsupported.to_string().contains("tiff"));

        let config = Error::Config("center_scale must be in (0, 1]".to_string());
        assert!(config.to_string().contains("center_scale"));

        let same = Error::SameOutputPath(PathBuf::from("/tmp/a.jpg"));
        assert!(same.to_string().contains("/tmp/a.jpg"));
    }
}
