use crate::assessment::error::AssessmentError;
use crate::config::ConfigError;
use crate::results::ResultWriteError;
use crate::weather_data::error::WeatherDataError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlastamError {
    #[error(transparent)]
    WeatherData(#[from] WeatherDataError),

    #[error(transparent)]
    Assessment(#[from] AssessmentError),

    #[error(transparent)]
    ResultWrite(#[from] ResultWriteError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
