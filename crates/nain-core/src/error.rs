//! Error type shared by the NAIN crates.

use std::path::PathBuf;

pub type NainResult<T> = Result<T, NainError>;

#[derive(Debug, thiserror::Error)]
pub enum NainError {
    /// A file the site needs could not be read or decoded.
    #[error("asset error: {message} ({path:?})")]
    Asset { message: String, path: PathBuf },

    #[error("render error: {0}")]
    Render(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("frame index {index} out of range for a sequence of {count} frames")]
    FrameOutOfRange { index: usize, count: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl NainError {
    pub fn asset(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        NainError::Asset {
            message: message.into(),
            path: path.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        NainError::Config(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_error_names_the_path() {
        let err = NainError::asset("file not found", "/sequence/02/frame_0007.png");
        let text = err.to_string();
        assert!(text.starts_with("asset error: file not found"));
        assert!(text.contains("frame_0007.png"));
    }

    #[test]
    fn test_frame_out_of_range_display() {
        let err = NainError::FrameOutOfRange {
            index: 51,
            count: 51,
        };
        assert_eq!(
            err.to_string(),
            "frame index 51 out of range for a sequence of 51 frames"
        );
    }

    #[test]
    fn test_io_converts() {
        fn read() -> NainResult<String> {
            Ok(std::fs::read_to_string("/nonexistent/nain.config.toml")?)
        }
        assert!(matches!(read(), Err(NainError::Io(_))));
    }
}
