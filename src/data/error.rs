use std::path::PathBuf;

/// Failure to produce a base table. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("missing required column(s): {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("row {row}: column '{column}' has invalid value '{value}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

impl DataSourceError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataSourceError::Io {
            path: path.into(),
            source,
        }
    }
}
