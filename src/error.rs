//! Error types.

use std::path::PathBuf;

/// Fatal failures of the loader and the cleaning pipeline.
///
/// Per-cell problems (missing values, unparsable years, unknown country
/// codes) never show up here: they are resolved by the cleaning defaults.
#[derive(thiserror::Error, Debug)]
pub enum DataError {
    #[error(
        "CSV not found. Place `{file_name}` next to the executable or in the working \
         directory, or set `{setting}` to a URL pointing at the CSV."
    )]
    DataNotFound {
        file_name: String,
        setting: String,
    },
    #[error("Unusable dataset: {0}")]
    Schema(String),
    #[error("{source_name} is not valid UTF-8")]
    Encoding { source_name: String },
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed CSV in {source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },
    #[error("Failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },
}

pub type DataResult<T> = Result<T, DataError>;

impl DataError {
    /// Convenience constructor for a missing mandatory column.
    pub fn missing_column(column: &str) -> Self {
        DataError::Schema(format!("mandatory column '{column}' is absent"))
    }
}
