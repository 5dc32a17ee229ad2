// src/error.rs

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Every failure the explorer reports back to the menu.
#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("the file '{}' was not found", .0.display())]
    FileNotFound(PathBuf),

    #[error("the file '{}' is empty", .0.display())]
    EmptyFile(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("could not read MAT file '{}': {reason}", .path.display())]
    MatParse { path: PathBuf, reason: String },

    #[error("columns '{x}' or '{y}' do not exist in the data")]
    UnknownColumns { x: String, y: String },

    #[error("column '{0}' does not exist in the data")]
    UnknownColumn(String),

    #[error("column '{0}' is not numeric")]
    NonNumericColumn(String),

    #[error("matrix '{0}' not found")]
    MatrixNotFound(String),

    #[error("no matrices available")]
    NoMatrices,

    #[error("matrix '{name}' has shape {shape:?}, expected 3 dimensions (channels, samples, epochs)")]
    NotThreeDimensional { name: String, shape: Vec<usize> },

    #[error("axis {0} is out of range for a 3D matrix (expected 0, 1 or 2)")]
    InvalidAxis(usize),

    #[error("cannot average along axis {0}: it has no elements")]
    EmptyAxis(usize),

    #[error("channel {channel} is out of range (0 to {max})", max = .n_channels.saturating_sub(1))]
    InvalidChannel { channel: i64, n_channels: usize },

    #[error("invalid noise standard deviation {0}, expected a finite value >= 0")]
    InvalidNoise(f64),

    #[error("invalid input '{0}', please enter an integer")]
    InvalidNumber(String),

    #[error("invalid option, please try again")]
    InvalidOption,

    #[error("You must load a {0} file first.")]
    NotLoaded(&'static str),

    #[error("input closed")]
    InputClosed,

    #[error("plotting failed: {0}")]
    Plot(String),
}

impl From<Box<dyn std::error::Error>> for ExplorerError {
    fn from(err: Box<dyn std::error::Error>) -> Self {
        ExplorerError::Plot(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExplorerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_columns_message() {
        let err = ExplorerError::UnknownColumns {
            x: "Age".to_string(),
            y: "Weight".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "columns 'Age' or 'Weight' do not exist in the data"
        );
    }

    #[test]
    fn test_invalid_channel_message() {
        let err = ExplorerError::InvalidChannel {
            channel: 9,
            n_channels: 8,
        };
        assert_eq!(err.to_string(), "channel 9 is out of range (0 to 7)");
    }

    #[test]
    fn test_not_loaded_message() {
        assert_eq!(
            ExplorerError::NotLoaded("CSV").to_string(),
            "You must load a CSV file first."
        );
    }
}
