use std::path::PathBuf;

use thiserror::Error;

pub type DataResult<T> = Result<T, DataError>;

/// Tabular data failure (loading, exporting or generating).
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("line {line}: {message}")]
    Row { line: usize, message: String },

    #[error("dataset generator misconfigured: {0}")]
    Generator(String),
}

impl DataError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
