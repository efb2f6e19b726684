//! The Koshimizu rice blast model.
//!
//! Reconstructs hourly leaf wetness over the 24 hours from 16:00 the day
//! before the target date, finds the first wet period in it, and scores the
//! period against temperature thresholds. Evaluation is pure: it reads the
//! window and the configuration and nothing else, so any number of windows
//! can be evaluated concurrently.

pub mod aggregation;
pub mod classification;
pub mod config;
pub mod inference;

use crate::model::aggregation::aggregate_wet_period;
use crate::model::classification::classify_risk;
use crate::model::config::ModelConfig;
use crate::model::inference::infer_leaf_wetness;
use crate::types::assessment::{BlastScore, WetPeriodResult};
use crate::types::observation::Field;
use crate::types::wetness::WetnessMap;
use crate::types::window::ObservationWindow;
use serde::Serialize;

/// Everything the model derives from one window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelOutput {
    pub wetness: WetnessMap,
    pub wet_period: WetPeriodResult,
    pub five_day_mean_temperature: f64,
    pub blast_score: BlastScore,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KoshimizuModel {
    config: ModelConfig,
}

impl KoshimizuModel {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Runs inference, aggregation and classification over `window`.
    pub fn evaluate(&self, window: &ObservationWindow) -> ModelOutput {
        let wetness = infer_leaf_wetness(window, &self.config);
        let temperature = window.series(Field::Temperature);
        let wet_period = aggregate_wet_period(&wetness, &temperature);
        let five_day_mean_temperature = window.five_day_mean_temperature();
        let blast_score = classify_risk(
            wet_period.duration_hours,
            wet_period.mean_temperature,
            five_day_mean_temperature,
            &self.config.rules,
        );

        ModelOutput {
            wetness,
            wet_period,
            five_day_mean_temperature,
            blast_score,
        }
    }
}
