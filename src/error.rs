use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading, aggregating or rendering availability data.
#[derive(Debug, Error)]
pub enum PlotError {
    /// Input file does not exist
    #[error("input file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Any other I/O failure while reading input or writing a figure
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line that is not a well-formed record
    #[error("parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// Panel count, tick set or matrix shape incompatible with the data
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Drawing backend failure
    #[error("render error: {0}")]
    Render(String),
}

impl PlotError {
    /// Wraps an I/O error, promoting `NotFound` to [`PlotError::FileNotFound`].
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            PlotError::FileNotFound { path }
        } else {
            PlotError::Io { path, source }
        }
    }
}

/// Type alias for Results using PlotError
pub type Result<T> = std::result::Result<T, PlotError>;
