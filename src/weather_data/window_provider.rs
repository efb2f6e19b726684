use crate::types::month::Month;
use crate::types::observation::RawHourlyRecord;
use crate::types::window::{window_bounds, RawWindow, LEAD_DAYS};
use crate::weather_data::cleanup::{clean_window, ProviderOptions};
use crate::weather_data::error::WeatherDataError;
use crate::weather_data::month_cache::MonthCache;
use chrono::{Datelike, Duration, NaiveDate};
use log::{debug, warn};
use std::path::Path;
use tokio::fs;

/// Assembles five-day windows from a directory of monthly archive files.
///
/// Month files are cached, so building windows for many consecutive dates
/// reads each file once.
pub struct WindowProvider {
    cache: MonthCache,
    options: ProviderOptions,
}

impl WindowProvider {
    pub fn new(data_dir: &Path, options: ProviderOptions) -> Self {
        Self {
            cache: MonthCache::new(data_dir),
            options,
        }
    }

    pub fn data_dir(&self) -> &Path {
        self.cache.loader().data_dir()
    }

    pub fn options(&self) -> &ProviderOptions {
        &self.options
    }

    pub fn cache(&self) -> &MonthCache {
        &self.cache
    }

    /// Station identifiers, one per subdirectory of the data directory,
    /// sorted.
    pub async fn stations(&self) -> Result<Vec<String>, WeatherDataError> {
        let data_dir = self.data_dir();
        let listing_error = |e| WeatherDataError::StationListing(data_dir.to_path_buf(), e);

        let mut entries = fs::read_dir(data_dir).await.map_err(listing_error)?;
        let mut stations = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(listing_error)? {
            let is_dir = entry.file_type().await.map_err(listing_error)?.is_dir();
            if is_dir {
                stations.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        stations.sort();
        Ok(stations)
    }

    /// Months whose files must be read for the window ending on `target`.
    ///
    /// When the window starts on the first of a month the previous month is
    /// included as well: its final `24:00` row is midnight of the first.
    pub fn months_for(target: NaiveDate) -> Vec<Month> {
        let start = target - Duration::days(LEAD_DAYS);
        let first = if start.day() == 1 {
            start - Duration::days(1)
        } else {
            start
        };
        Month::span(first, target)
    }

    /// Builds the raw window for `station` ending on `target`.
    ///
    /// Month files that cannot be opened are skipped with a warning; the
    /// window is then simply short and the driver reports it incomplete.
    ///
    /// # Errors
    ///
    /// * [`WeatherDataError::NoData`] if none of the month files could be
    ///   opened.
    /// * [`WeatherDataError::TooManyMissing`] if a quality field has more
    ///   gaps than [`ProviderOptions::max_missing_per_field`].
    /// * Any read or parse error of a month file that does exist.
    pub async fn window(&self, station: &str, target: NaiveDate) -> Result<RawWindow, WeatherDataError> {
        let months = Self::months_for(target);
        let (start, end) = window_bounds(target);

        let mut records: Vec<RawHourlyRecord> = Vec::new();
        let mut loaded_any = false;
        for &month in &months {
            match self.cache.get_month(station, month).await {
                Ok(month_records) => {
                    loaded_any = true;
                    records.extend(
                        month_records
                            .iter()
                            .filter(|r| r.timestamp >= start && r.timestamp <= end)
                            .cloned(),
                    );
                }
                Err(WeatherDataError::FileOpen(path, e)) => {
                    warn!("Skipping {:?} for station {}: {}", path, station, e);
                }
                Err(e) => return Err(e),
            }
        }

        if !loaded_any {
            return Err(WeatherDataError::NoData {
                station: station.to_string(),
                first: months.first().copied().unwrap_or_else(|| Month::of(target)),
                last: Month::of(target),
            });
        }

        // Stable sort keeps the first of any duplicated hour.
        records.sort_by_key(|r| r.timestamp);
        records.dedup_by_key(|r| r.timestamp);
        debug!(
            "Station {} window for {}: {} hourly records",
            station,
            target,
            records.len()
        );

        clean_window(station, &mut records, &self.options)?;

        Ok(RawWindow {
            station: station.to_string(),
            target_date: target,
            records,
        })
    }
}
