//! Rice blast infection risk for weather stations, using the Koshimizu leaf
//! wetness model.
//!
//! For each station and target date the crate builds a five-day window of
//! hourly observations, reconstructs leaf wetness over the 24 hours from
//! 16:00 the day before, finds the first wet period, and scores it from -1
//! (no infection) to 5 (favourable for infection).
//!
//! * [`Blastam`] runs whole batches against a directory of monthly station
//!   archives and writes one CSV of scores per date.
//! * [`KoshimizuModel`] is the pure model, usable on any
//!   [`ObservationWindow`].
//! * [`assess_window`] validates provider output before it reaches the model.

mod assessment;
mod blastam;
mod config;
mod error;
mod model;
mod results;
mod types;
mod weather_data;

pub use blastam::*;
pub use config::{BatchConfig, ConfigError};
pub use error::BlastamError;

pub use assessment::error::AssessmentError;
pub use assessment::{assess, assess_window, validate_window};

pub use model::aggregation::aggregate_wet_period;
pub use model::classification::classify_risk;
pub use model::config::{
    ModelConfig, MorningWindGuard, RuleTable, RuleTableError, MIN_WET_HOURS_BY_TEMPERATURE,
};
pub use model::inference::{infer_leaf_wetness, DAYTIME_SLOTS, NIGHT_SLOTS};
pub use model::{KoshimizuModel, ModelOutput};

pub use results::{result_path, results_frame, write_results, ResultWriteError};

pub use types::assessment::*;
pub use types::month::Month;
pub use types::observation::*;
pub use types::wetness::*;
pub use types::window::*;

pub use weather_data::cleanup::{clean_window, count_missing, fill_linear, GapFill, ProviderOptions};
pub use weather_data::data_loader::{parse_monthly_csv, WeatherDataLoader, HEADER_MARKER};
pub use weather_data::error::WeatherDataError;
pub use weather_data::month_cache::{MonthCache, MonthRecords};
pub use weather_data::timestamp::parse_observation_time;
pub use weather_data::window_provider::WindowProvider;
