use crate::types::month::Month;
use crate::types::observation::Field;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherDataError {
    #[error("Failed to open weather file '{0}'")]
    FileOpen(PathBuf, #[source] std::io::Error),

    #[error("Failed to decompress weather file '{0}'")]
    Decompress(PathBuf, #[source] std::io::Error),

    #[error("Failed to list station directories in '{0}'")]
    StationListing(PathBuf, #[source] std::io::Error),

    #[error("No header row containing '{marker}' in '{path}'")]
    HeaderNotFound { path: PathBuf, marker: String },

    #[error("Required column '{column}' not found in '{path}'")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Parsing error processing CSV data in '{path}'")]
    CsvRead {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("No weather data could be loaded for station '{station}' ({first} to {last})")]
    NoData {
        station: String,
        first: Month,
        last: Month,
    },

    #[error("Station '{station}' has {missing} missing {field} values in its window, more than the {allowed} allowed")]
    TooManyMissing {
        station: String,
        field: Field,
        missing: usize,
        allowed: usize,
    },

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
