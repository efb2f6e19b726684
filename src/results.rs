//! Writes one CSV of blast scores per assessed date.

use crate::types::assessment::RiskAssessment;
use chrono::NaiveDate;
use log::info;
use polars::prelude::*;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResultWriteError {
    #[error("Result path exists but is not a directory: '{0}'")]
    NotADirectory(PathBuf),

    #[error("Failed to create result directory '{0}'")]
    CreateDir(PathBuf, #[source] io::Error),

    #[error("Failed to create result file '{0}'")]
    CreateFile(PathBuf, #[source] io::Error),

    #[error("Failed to write results to '{path}'")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// `{result_dir}/{YYYY-MM-DD}.csv`
pub fn result_path(result_dir: &Path, date: NaiveDate) -> PathBuf {
    result_dir.join(format!("{}.csv", date.format("%Y-%m-%d")))
}

pub async fn ensure_result_dir_exists(path: &Path) -> Result<(), ResultWriteError> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(ResultWriteError::NotADirectory(path.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating result directory: {}", path.display());
            tokio::fs::create_dir_all(path)
                .await
                .map_err(|e| ResultWriteError::CreateDir(path.to_path_buf(), e))
        }
        Err(e) => Err(ResultWriteError::CreateDir(path.to_path_buf(), e)),
    }
}

/// Builds the `Station,BlastScore` frame, one row per assessment in the
/// order given.
pub fn results_frame(assessments: &[RiskAssessment]) -> PolarsResult<DataFrame> {
    let stations: Vec<&str> = assessments.iter().map(|a| a.station.as_str()).collect();
    let scores: Vec<i32> = assessments
        .iter()
        .map(|a| i32::from(a.blast_score.value()))
        .collect();
    df!(
        "Station" => stations,
        "BlastScore" => scores
    )
}

/// Writes the scores for `date`, replacing any earlier file for that date.
/// Returns the path written.
pub async fn write_results(
    result_dir: &Path,
    date: NaiveDate,
    assessments: &[RiskAssessment],
) -> Result<PathBuf, ResultWriteError> {
    ensure_result_dir_exists(result_dir).await?;
    let path = result_path(result_dir, date);
    let mut frame = results_frame(assessments).map_err(|source| ResultWriteError::CsvWrite {
        path: path.clone(),
        source,
    })?;

    let target = path.clone();
    tokio::task::spawn_blocking(move || {
        let mut file = std::fs::File::create(&target)
            .map_err(|e| ResultWriteError::CreateFile(target.clone(), e))?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut frame)
            .map_err(|source| ResultWriteError::CsvWrite {
                path: target.clone(),
                source,
            })
    })
    .await??;

    info!("Wrote {} scores to {}", assessments.len(), path.display());
    Ok(path)
}
