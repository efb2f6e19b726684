//! The batch client: builds windows from the station archive, runs the model
//! and writes the daily score files.

use crate::assessment::assess_window;
use crate::config::BatchConfig;
use crate::error::BlastamError;
use crate::model::KoshimizuModel;
use crate::results::write_results;
use crate::types::assessment::RiskAssessment;
use crate::weather_data::window_provider::WindowProvider;
use bon::bon;
use chrono::{Days, NaiveDate};
use futures_util::{stream, StreamExt};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Outcome of assessing every station for one date.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub date: NaiveDate,
    /// Stations attempted.
    pub stations: usize,
    /// Stations with a score in the result file.
    pub assessed: usize,
    pub failed: usize,
    pub path: PathBuf,
}

/// `days` dates ending on `last`, newest first. Stops early at the
/// earliest representable date.
pub fn dates_back_from(last: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..days)
        .map_while(|i| last.checked_sub_days(Days::new(u64::from(i))))
        .collect()
}

/// Rice blast risk client for a directory of station archives.
///
/// # Examples
///
/// ```no_run
/// # use blastam::{BatchConfig, Blastam, BlastamError};
/// # use chrono::NaiveDate;
/// # #[tokio::main]
/// # async fn main() -> Result<(), BlastamError> {
/// let client = Blastam::new(&BatchConfig::default());
/// let date = NaiveDate::from_ymd_opt(2025, 7, 10).unwrap();
///
/// let assessment = client.assess().station("47662").date(date).call().await?;
/// println!("{} on {}: {}", assessment.station, assessment.date, assessment.blast_score);
///
/// // Every station in the data directory, written to result/2025-07-10.csv
/// let summaries = client.run().dates(&[date]).call().await?;
/// # Ok(())
/// # }
/// ```
pub struct Blastam {
    provider: WindowProvider,
    model: KoshimizuModel,
    result_dir: PathBuf,
    concurrency: usize,
}

#[bon]
impl Blastam {
    pub fn new(config: &BatchConfig) -> Self {
        Self {
            provider: WindowProvider::new(&config.data_dir, config.provider),
            model: KoshimizuModel::new(config.model),
            result_dir: config.result_dir.clone(),
            concurrency: config.concurrency.max(1),
        }
    }

    pub fn provider(&self) -> &WindowProvider {
        &self.provider
    }

    pub fn model(&self) -> &KoshimizuModel {
        &self.model
    }

    pub fn result_dir(&self) -> &Path {
        &self.result_dir
    }

    /// Station identifiers found in the data directory, sorted.
    pub async fn stations(&self) -> Result<Vec<String>, BlastamError> {
        Ok(self.provider.stations().await?)
    }

    /// Assesses one station for one date.
    ///
    /// # Errors
    ///
    /// * [`BlastamError::WeatherData`] if the window could not be built.
    /// * [`BlastamError::Assessment`] if the window was rejected by the
    ///   driver (incomplete, misaligned, non-numeric or missing values).
    #[builder]
    pub async fn assess(&self, station: &str, date: NaiveDate) -> Result<RiskAssessment, BlastamError> {
        let raw = self.provider.window(station, date).await?;
        Ok(assess_window(&raw, &self.model)?)
    }

    /// Assesses `stations` for `date`, several at a time.
    ///
    /// Stations that fail are logged and left out. The result is sorted by
    /// station identifier.
    pub async fn assess_stations(&self, stations: &[String], date: NaiveDate) -> Vec<RiskAssessment> {
        let mut assessments: Vec<RiskAssessment> = stream::iter(stations)
            .map(|station| async move {
                match self.assess().station(station).date(date).call().await {
                    Ok(assessment) => Some(assessment),
                    Err(e) => {
                        warn!("Skipping station {} for {}: {}", station, date, e);
                        None
                    }
                }
            })
            .buffer_unordered(self.concurrency)
            .filter_map(|assessment| async move { assessment })
            .collect()
            .await;
        assessments.sort_by(|a, b| a.station.cmp(&b.station));
        assessments
    }

    /// Assesses every station in the data directory for `date`.
    pub async fn assess_all(&self, date: NaiveDate) -> Result<Vec<RiskAssessment>, BlastamError> {
        let stations = self.stations().await?;
        Ok(self.assess_stations(&stations, date).await)
    }

    /// Assesses each date and writes `{result_dir}/{YYYY-MM-DD}.csv`.
    ///
    /// Without `stations`, every station in the data directory is assessed.
    #[builder]
    pub async fn run(
        &self,
        dates: &[NaiveDate],
        stations: Option<Vec<String>>,
    ) -> Result<Vec<BatchSummary>, BlastamError> {
        let stations = match stations {
            Some(stations) => stations,
            None => self.stations().await?,
        };
        info!(
            "Assessing {} stations for {} dates",
            stations.len(),
            dates.len()
        );

        let mut summaries = Vec::with_capacity(dates.len());
        for (i, &date) in dates.iter().enumerate() {
            let assessments = self.assess_stations(&stations, date).await;
            let path = write_results(&self.result_dir, date, &assessments).await?;
            let summary = BatchSummary {
                date,
                stations: stations.len(),
                assessed: assessments.len(),
                failed: stations.len() - assessments.len(),
                path,
            };
            info!(
                "{}: {} of {} stations assessed",
                date, summary.assessed, summary.stations
            );
            summaries.push(summary);

            // Keep only the months the next date's windows read.
            if let Some(&next) = dates.get(i + 1) {
                let keep = WindowProvider::months_for(next);
                self.provider.cache().retain_months(&keep).await;
            }
        }
        Ok(summaries)
    }
}
