use async_compression::tokio::write::GzipEncoder;
use blastam::{
    AssessmentError, BatchConfig, Blastam, BlastScore, BlastamError, Field, GapFill, ProviderOptions,
    WeatherDataError,
};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use std::path::Path;
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;

struct Hour {
    temperature: Option<f64>,
    rainfall: f64,
    wind: f64,
    sunshine: Option<f64>,
}

fn calm(temperature: f64) -> Hour {
    Hour {
        temperature: Some(temperature),
        rainfall: 0.0,
        wind: 1.0,
        sunshine: Some(0.0),
    }
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Writes `{dir}/{station}/{year}-{month}.csv.gz` in the archive layout: a
/// preamble, the header row, a quality sub-header, then rows from 01:00 on
/// the 1st to 24:00 on the last day.
async fn write_month(
    dir: &Path,
    station: &str,
    year: i32,
    month: u32,
    weather: impl Fn(NaiveDateTime) -> Hour,
) {
    let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1).unwrap()
    };

    let mut text = String::from(
        "ダウンロードした時刻：2025/07/12 10:00:00\n\n\
         ,テスト,テスト,テスト,テスト,テスト,テスト,テスト,テスト\n\
         年月日時,気温(℃),気温(℃),降水量(mm),降水量(mm),風速(m/s),風速(m/s),日照時間(時間),日照時間(時間)\n\
         ,,品質情報,,品質情報,,品質情報,,品質情報\n",
    );
    let mut day = first;
    while day < next {
        for hour in 1..=24 {
            let at = day.and_hms_opt(0, 0, 0).unwrap() + Duration::hours(hour);
            let h = weather(at);
            text.push_str(&format!(
                "{}/{}/{} {}:00:00,{},8,{},8,{},8,{},8\n",
                day.year(),
                day.month(),
                day.day(),
                hour,
                cell(h.temperature),
                h.rainfall,
                h.wind,
                cell(h.sunshine)
            ));
        }
        day += Duration::days(1);
    }

    let mut encoder = GzipEncoder::new(Vec::new());
    encoder.write_all(text.as_bytes()).await.unwrap();
    encoder.shutdown().await.unwrap();

    let station_dir = dir.join(station);
    tokio::fs::create_dir_all(&station_dir).await.unwrap();
    tokio::fs::write(
        station_dir.join(format!("{}-{}.csv.gz", year, month)),
        encoder.into_inner(),
    )
    .await
    .unwrap();
}

fn target() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 10).unwrap()
}

/// Calm nights at 22 °C with rain at 17:00 the evening before `target`.
fn wet_evening(target: NaiveDate) -> impl Fn(NaiveDateTime) -> Hour {
    let rain_at = (target - Duration::days(1)).and_hms_opt(17, 0, 0).unwrap();
    move |at| Hour {
        rainfall: if at == rain_at { 0.5 } else { 0.0 },
        ..calm(22.0)
    }
}

fn config(data: &TempDir, result: &TempDir) -> BatchConfig {
    BatchConfig {
        data_dir: data.path().to_path_buf(),
        result_dir: result.path().join("result"),
        ..BatchConfig::default()
    }
}

#[tokio::test]
async fn test_wet_night_scores_favourable() {
    let data = tempfile::tempdir().unwrap();
    let result = tempfile::tempdir().unwrap();
    write_month(data.path(), "47401", 2025, 7, wet_evening(target())).await;

    let client = Blastam::new(&config(&data, &result));
    let assessment = client.assess().station("47401").date(target()).call().await.unwrap();

    assert_eq!(assessment.station, "47401");
    assert_eq!(assessment.wet_period.start, Some(88));
    assert_eq!(assessment.wet_period.end, Some(103));
    assert_eq!(assessment.wet_period.duration_hours, 16);
    assert_eq!(assessment.five_day_mean_temperature, 22.0);
    assert_eq!(assessment.blast_score, BlastScore::Favourable);
}

#[tokio::test]
async fn test_window_across_month_boundary() {
    let data = tempfile::tempdir().unwrap();
    let result = tempfile::tempdir().unwrap();
    let date = NaiveDate::from_ymd_opt(2025, 8, 2).unwrap();
    write_month(data.path(), "47401", 2025, 7, wet_evening(date)).await;
    write_month(data.path(), "47401", 2025, 8, wet_evening(date)).await;

    let client = Blastam::new(&config(&data, &result));
    let assessment = client.assess().station("47401").date(date).call().await.unwrap();
    assert_eq!(assessment.blast_score, BlastScore::Favourable);
    assert_eq!(client.provider().cache().len().await, 2);
}

#[tokio::test]
async fn test_window_starting_on_the_first_needs_previous_month() {
    let data = tempfile::tempdir().unwrap();
    let result = tempfile::tempdir().unwrap();
    // Window starts 2025-07-01 00:00, written as 2025/6/30 24:00:00.
    let date = NaiveDate::from_ymd_opt(2025, 7, 5).unwrap();
    write_month(data.path(), "47401", 2025, 7, wet_evening(date)).await;

    let client = Blastam::new(&config(&data, &result));
    let err = client.assess().station("47401").date(date).call().await.unwrap_err();
    assert!(matches!(
        err,
        BlastamError::Assessment(AssessmentError::IncompleteWindow { expected: 120, found: 119, .. })
    ));

    write_month(data.path(), "47401", 2025, 6, wet_evening(date)).await;
    let client = Blastam::new(&config(&data, &result));
    let assessment = client.assess().station("47401").date(date).call().await.unwrap();
    assert_eq!(assessment.blast_score, BlastScore::Favourable);
}

#[tokio::test]
async fn test_station_without_files_has_no_data() {
    let data = tempfile::tempdir().unwrap();
    let result = tempfile::tempdir().unwrap();
    tokio::fs::create_dir_all(data.path().join("11001")).await.unwrap();

    let client = Blastam::new(&config(&data, &result));
    let err = client.assess().station("11001").date(target()).call().await.unwrap_err();
    assert!(matches!(err, BlastamError::WeatherData(WeatherDataError::NoData { .. })));
}

#[tokio::test]
async fn test_gaps_rejected_or_filled() {
    let data = tempfile::tempdir().unwrap();
    let result = tempfile::tempdir().unwrap();
    let gap = (target() - Duration::days(2)).and_hms_opt(12, 0, 0).unwrap();
    let weather = wet_evening(target());
    write_month(data.path(), "47401", 2025, 7, move |at| Hour {
        temperature: if at.hour() >= 12 && at.date() == gap.date() && at.hour() < 15 {
            None
        } else {
            Some(22.0)
        },
        ..weather(at)
    })
    .await;

    let client = Blastam::new(&config(&data, &result));
    let err = client.assess().station("47401").date(target()).call().await.unwrap_err();
    assert!(matches!(
        err,
        BlastamError::Assessment(AssessmentError::InvalidInput {
            field: Field::Temperature,
            missing: 3,
            ..
        })
    ));

    let filling = BatchConfig {
        provider: ProviderOptions::builder().gap_fill(GapFill::Linear).build(),
        ..config(&data, &result)
    };
    let client = Blastam::new(&filling);
    let assessment = client.assess().station("47401").date(target()).call().await.unwrap();
    assert_eq!(assessment.five_day_mean_temperature, 22.0);
    assert_eq!(assessment.blast_score, BlastScore::Favourable);

    let strict = BatchConfig {
        provider: ProviderOptions::builder().max_missing_per_field(2).build(),
        ..config(&data, &result)
    };
    let client = Blastam::new(&strict);
    let err = client.assess().station("47401").date(target()).call().await.unwrap_err();
    assert!(matches!(
        err,
        BlastamError::WeatherData(WeatherDataError::TooManyMissing { missing: 3, allowed: 2, .. })
    ));
}

#[tokio::test]
async fn test_non_numeric_value_is_coercion_error() {
    let data = tempfile::tempdir().unwrap();
    let result = tempfile::tempdir().unwrap();
    write_month(data.path(), "47401", 2025, 7, |_| calm(22.0)).await;
    let path = data.path().join("47401").join("2025-7.csv.gz");

    // Rewrite one wind reading as the archive's "///" marker.
    let text = {
        let bytes = tokio::fs::read(&path).await.unwrap();
        let mut decoder = async_compression::tokio::bufread::GzipDecoder::new(&bytes[..]);
        let mut text = String::new();
        tokio::io::AsyncReadExt::read_to_string(&mut decoder, &mut text)
            .await
            .unwrap();
        text.replace("2025/7/8 3:00:00,22,8,0,8,1,8", "2025/7/8 3:00:00,22,8,0,8,///,8")
    };
    let mut encoder = GzipEncoder::new(Vec::new());
    encoder.write_all(text.as_bytes()).await.unwrap();
    encoder.shutdown().await.unwrap();
    tokio::fs::write(&path, encoder.into_inner()).await.unwrap();

    let client = Blastam::new(&config(&data, &result));
    let err = client.assess().station("47401").date(target()).call().await.unwrap_err();
    assert!(matches!(
        err,
        BlastamError::Assessment(AssessmentError::NumericCoercion {
            field: Field::WindSpeed,
            slot: 51,
            ref value,
            ..
        }) if value == "///"
    ));
}

#[tokio::test]
async fn test_run_writes_daily_files_and_skips_failures() {
    let data = tempfile::tempdir().unwrap();
    let result = tempfile::tempdir().unwrap();
    write_month(data.path(), "47662", 2025, 7, |_| calm(22.0)).await;
    write_month(data.path(), "47401", 2025, 7, wet_evening(target())).await;
    tokio::fs::create_dir_all(data.path().join("11001")).await.unwrap();

    let config = config(&data, &result);
    let client = Blastam::new(&config);
    assert_eq!(client.stations().await.unwrap(), vec!["11001", "47401", "47662"]);

    let dates = [target(), target() - Duration::days(1)];
    let summaries = client.run().dates(&dates).call().await.unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].stations, 3);
    assert_eq!(summaries[0].assessed, 2);
    assert_eq!(summaries[0].failed, 1);

    let today = tokio::fs::read_to_string(config.result_dir.join("2025-07-10.csv"))
        .await
        .unwrap();
    assert_eq!(
        today.lines().collect::<Vec<_>>(),
        vec!["Station,BlastScore", "47401,5", "47662,-1"]
    );

    // Rain fell the evening before the 10th, not the 9th.
    let yesterday = tokio::fs::read_to_string(config.result_dir.join("2025-07-09.csv"))
        .await
        .unwrap();
    assert_eq!(
        yesterday.lines().collect::<Vec<_>>(),
        vec!["Station,BlastScore", "47401,-1", "47662,-1"]
    );

    // Each station's July file was parsed once for both dates.
    assert_eq!(client.provider().cache().len().await, 2);
}

#[tokio::test]
async fn test_run_with_explicit_stations() {
    let data = tempfile::tempdir().unwrap();
    let result = tempfile::tempdir().unwrap();
    write_month(data.path(), "47662", 2025, 7, |_| calm(22.0)).await;
    write_month(data.path(), "47401", 2025, 7, wet_evening(target())).await;

    let config = config(&data, &result);
    let client = Blastam::new(&config);
    let summaries = client
        .run()
        .dates(&[target()])
        .stations(vec!["47401".to_string()])
        .call()
        .await
        .unwrap();
    assert_eq!(summaries[0].assessed, 1);

    let text = tokio::fs::read_to_string(&summaries[0].path).await.unwrap();
    assert_eq!(text.lines().collect::<Vec<_>>(), vec!["Station,BlastScore", "47401,5"]);
}

#[tokio::test]
async fn test_run_evicts_months_no_longer_needed() {
    let data = tempfile::tempdir().unwrap();
    let result = tempfile::tempdir().unwrap();
    write_month(data.path(), "47401", 2025, 7, |_| calm(22.0)).await;
    write_month(data.path(), "47401", 2025, 8, |_| calm(22.0)).await;

    let client = Blastam::new(&config(&data, &result));
    let august = NaiveDate::from_ymd_opt(2025, 8, 10).unwrap();
    let summaries = client.run().dates(&[august, target()]).call().await.unwrap();
    assert_eq!(summaries.iter().map(|s| s.assessed).sum::<usize>(), 2);

    // August was dropped before the July date was assessed.
    assert_eq!(client.provider().cache().len().await, 1);
}
