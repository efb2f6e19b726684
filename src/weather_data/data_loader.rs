use crate::types::month::Month;
use crate::types::observation::{Field, RawHourlyRecord, Reading};
use crate::weather_data::error::WeatherDataError;
use crate::weather_data::timestamp::parse_observation_time;
use async_compression::tokio::bufread::GzipDecoder;
use log::{debug, info};
use polars::prelude::Field as ColumnField;
use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, BufReader};
use tokio::{fs, task};

/// Header cell of the timestamp column; the first line containing it is the
/// header row of a monthly file.
pub const HEADER_MARKER: &str = "年月日時";

/// Reads one station's monthly archive files,
/// `{data_dir}/{station}/{year}-{month}.csv.gz`.
pub struct WeatherDataLoader {
    data_dir: PathBuf,
}

impl WeatherDataLoader {
    pub fn new(data_dir: &Path) -> WeatherDataLoader {
        WeatherDataLoader {
            data_dir: data_dir.to_path_buf(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn month_path(&self, station: &str, month: Month) -> PathBuf {
        self.data_dir
            .join(station)
            .join(format!("{}.csv.gz", month.file_stem()))
    }

    /// Loads every timestamped row of one month for a station.
    pub async fn load_month(
        &self,
        station: &str,
        month: Month,
    ) -> Result<Vec<RawHourlyRecord>, WeatherDataError> {
        let path = self.month_path(station, month);
        let bytes = Self::decompress(&path).await?;
        info!(
            "Read {} bytes of {} data for station {} from {:?}",
            bytes.len(),
            month,
            station,
            path
        );
        task::spawn_blocking(move || parse_monthly_csv(&bytes, &path)).await?
    }

    async fn decompress(path: &Path) -> Result<Vec<u8>, WeatherDataError> {
        let file = fs::File::open(path)
            .await
            .map_err(|e| WeatherDataError::FileOpen(path.to_path_buf(), e))?;
        let mut decoder = GzipDecoder::new(BufReader::new(file));
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .await
            .map_err(|e| WeatherDataError::Decompress(path.to_path_buf(), e))?;
        Ok(decompressed)
    }
}

/// Column positions of the fields the model needs, resolved from the header
/// row. Where a header repeats, the first occurrence wins.
struct ColumnLayout {
    width: usize,
    timestamp: usize,
    fields: [(Field, usize); 4],
}

impl ColumnLayout {
    fn resolve(header: &str, path: &Path) -> Result<Self, WeatherDataError> {
        let cells: Vec<&str> = header
            .split(',')
            .map(|cell| cell.trim().trim_matches('"').trim_start_matches('\u{feff}'))
            .collect();
        let position = |name: &str| {
            cells
                .iter()
                .position(|cell| *cell == name)
                .ok_or_else(|| WeatherDataError::MissingColumn {
                    path: path.to_path_buf(),
                    column: name.to_string(),
                })
        };

        let timestamp = position(HEADER_MARKER)?;
        let mut fields = [(Field::Temperature, 0); 4];
        for (slot, field) in fields.iter_mut().zip(Field::ALL) {
            *slot = (field, position(field.column_header())?);
        }

        Ok(Self {
            width: cells.len(),
            timestamp,
            fields,
        })
    }

    fn column_name(index: usize) -> String {
        format!("c{}", index)
    }

    fn schema(&self) -> Schema {
        Schema::from_iter(
            (0..self.width)
                .map(|i| ColumnField::new(Self::column_name(i).into(), DataType::String)),
        )
    }
}

/// Splits decoded file text at the header row: `(header line, rows after it)`.
fn split_at_header<'a>(text: &'a str, path: &Path) -> Result<(&'a str, &'a str), WeatherDataError> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let next = offset + line.len();
        if line.contains(HEADER_MARKER) {
            return Ok((line.trim_end(), &text[next..]));
        }
        offset = next;
    }
    Err(WeatherDataError::HeaderNotFound {
        path: path.to_path_buf(),
        marker: HEADER_MARKER.to_string(),
    })
}

fn text_column<'a>(
    df: &'a DataFrame,
    index: usize,
    path: &Path,
) -> Result<&'a StringChunked, WeatherDataError> {
    df.column(&ColumnLayout::column_name(index))
        .and_then(|c| c.str())
        .map_err(|source| WeatherDataError::CsvRead {
            path: path.to_path_buf(),
            source,
        })
}

/// Parses a decompressed monthly file.
///
/// Lines before the header row are ignored. Every column is read as text so
/// that numeric coercion happens per value; rows whose timestamp does not
/// parse (sub-headers, blank lines) are dropped.
pub fn parse_monthly_csv(bytes: &[u8], path: &Path) -> Result<Vec<RawHourlyRecord>, WeatherDataError> {
    let text = String::from_utf8_lossy(bytes);
    let (header, rows) = split_at_header(&text, path)?;
    let layout = ColumnLayout::resolve(header, path)?;

    if rows.trim().is_empty() {
        return Ok(Vec::new());
    }

    let df = CsvReadOptions::default()
        .with_has_header(false)
        .with_infer_schema_length(Some(0))
        .with_schema(Some(Arc::new(layout.schema())))
        .map_parse_options(|opts| opts.with_truncate_ragged_lines(true))
        .into_reader_with_file_handle(Cursor::new(rows.as_bytes().to_vec()))
        .finish()
        .map_err(|source| WeatherDataError::CsvRead {
            path: path.to_path_buf(),
            source,
        })?;

    let timestamps = text_column(&df, layout.timestamp, path)?;
    let mut columns = Vec::with_capacity(layout.fields.len());
    for (field, index) in layout.fields {
        columns.push((field, text_column(&df, index, path)?));
    }

    let mut records = Vec::with_capacity(df.height());
    let mut skipped = 0usize;
    for row in 0..df.height() {
        let Some(timestamp) = timestamps.get(row).and_then(parse_observation_time) else {
            skipped += 1;
            continue;
        };
        let mut record = RawHourlyRecord {
            timestamp,
            temperature: Reading::Missing,
            wind_speed: Reading::Missing,
            rainfall: Reading::Missing,
            sunshine: Reading::Missing,
        };
        for (field, column) in &columns {
            *record.reading_mut(*field) = Reading::parse(column.get(row));
        }
        records.push(record);
    }

    if skipped > 0 {
        debug!("Skipped {} rows without a timestamp in {:?}", skipped, path);
    }
    Ok(records)
}
