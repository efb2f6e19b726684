use crate::types::month::Month;
use crate::types::observation::RawHourlyRecord;
use crate::weather_data::data_loader::WeatherDataLoader;
use crate::weather_data::error::WeatherDataError;
use log::debug;
use std::collections::{hash_map::Entry, HashMap};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Parsed monthly records shared between every window that needs them.
pub type MonthRecords = Arc<Vec<RawHourlyRecord>>;

/// Loads monthly files through a [`WeatherDataLoader`], keeping each parsed
/// month so a multi-date batch reads every file once.
pub struct MonthCache {
    loader: WeatherDataLoader,
    months: Mutex<HashMap<(String, Month), MonthRecords>>,
}

impl MonthCache {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            loader: WeatherDataLoader::new(data_dir),
            months: Mutex::new(HashMap::new()),
        }
    }

    pub fn loader(&self) -> &WeatherDataLoader {
        &self.loader
    }

    /// Records for one station and month, from memory when already loaded.
    pub async fn get_month(
        &self,
        station: &str,
        month: Month,
    ) -> Result<MonthRecords, WeatherDataError> {
        let key = (station.to_string(), month);

        {
            let months = self.months.lock().await;
            if let Some(records) = months.get(&key) {
                return Ok(Arc::clone(records));
            }
        }

        // Load outside the lock so other stations are not held up.
        let loaded = Arc::new(self.loader.load_month(station, month).await?);

        let mut months = self.months.lock().await;
        match months.entry(key) {
            // Another task loaded it while we were reading the file.
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                entry.insert(Arc::clone(&loaded));
                Ok(loaded)
            }
        }
    }

    /// Drops every cached month not in `keep`, for any station.
    pub async fn retain_months(&self, keep: &[Month]) {
        let mut months = self.months.lock().await;
        let before = months.len();
        months.retain(|(_, month), _| keep.contains(month));
        let evicted = before - months.len();
        if evicted > 0 {
            debug!("Evicted {} cached station months", evicted);
        }
    }

    pub async fn len(&self) -> usize {
        self.months.lock().await.len()
    }
}
