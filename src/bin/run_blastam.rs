//! Scores every station in the data directory for the last `days` days and
//! writes one `{YYYY-MM-DD}.csv` per date.
//!
//! ```text
//! run_blastam [--config blastam.json] [--data-dir DIR] [--result-dir DIR]
//!             [--days N] [--date YYYY-MM-DD] [--station ID]...
//! ```
//!
//! Set `RUST_LOG=debug` to see per-station wet periods.

use blastam::{dates_back_from, BatchConfig, Blastam, BlastamError};
use chrono::{Local, NaiveDate};
use std::env;
use std::path::PathBuf;
use std::process;

const USAGE: &str = "usage: run_blastam [--config FILE] [--data-dir DIR] [--result-dir DIR] [--days N] [--date YYYY-MM-DD] [--station ID]...";

struct Args {
    config: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    result_dir: Option<PathBuf>,
    days: Option<u32>,
    date: Option<NaiveDate>,
    stations: Vec<String>,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut parsed = Args {
        config: None,
        data_dir: None,
        result_dir: None,
        days: None,
        date: None,
        stations: Vec::new(),
    };

    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let mut value = || {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{} needs a value", flag))
        };
        match flag.as_str() {
            "--config" => parsed.config = Some(PathBuf::from(value()?)),
            "--data-dir" => parsed.data_dir = Some(PathBuf::from(value()?)),
            "--result-dir" => parsed.result_dir = Some(PathBuf::from(value()?)),
            "--days" => {
                let raw = value()?;
                let days = raw
                    .parse()
                    .map_err(|_| format!("--days expects a number, got '{}'", raw))?;
                parsed.days = Some(days);
            }
            "--date" => {
                let raw = value()?;
                let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                    .map_err(|_| format!("--date expects YYYY-MM-DD, got '{}'", raw))?;
                parsed.date = Some(date);
            }
            "--station" => parsed.stations.push(value()?),
            other => return Err(format!("unknown argument '{}'", other)),
        }
    }
    Ok(parsed)
}

#[tokio::main]
async fn main() -> Result<(), BlastamError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let raw_args: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&raw_args) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}\n{}", message, USAGE);
            process::exit(2);
        }
    };

    let mut config = match &args.config {
        Some(path) => BatchConfig::from_json_file(path).await?,
        None => BatchConfig::default(),
    };
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(result_dir) = args.result_dir {
        config.result_dir = result_dir;
    }
    if let Some(days) = args.days {
        config.days = days;
    }

    let last = args.date.unwrap_or_else(|| Local::now().date_naive());
    let dates = dates_back_from(last, config.days);
    let stations = (!args.stations.is_empty()).then_some(args.stations);

    let client = Blastam::new(&config);
    let summaries = client
        .run()
        .dates(&dates)
        .maybe_stations(stations)
        .call()
        .await?;

    for summary in summaries {
        println!(
            "{}: {}/{} stations -> {}",
            summary.date,
            summary.assessed,
            summary.stations,
            summary.path.display()
        );
    }
    Ok(())
}
