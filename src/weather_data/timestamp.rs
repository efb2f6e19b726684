use chrono::{Duration, NaiveDateTime};

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";
const END_OF_DAY: &str = "24:00:00";

/// Parses an archive timestamp such as `2025/3/10 13:00:00`.
///
/// The archive writes midnight as `24:00:00` of the day that is ending;
/// that is normalized to `00:00:00` of the following day. Returns `None`
/// for anything that does not parse.
pub fn parse_observation_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.contains(END_OF_DAY) {
        let midnight = raw.replace(END_OF_DAY, "00:00:00");
        return NaiveDateTime::parse_from_str(&midnight, TIMESTAMP_FORMAT)
            .ok()
            .map(|dt| dt + Duration::days(1));
    }
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_timestamp() {
        let dt = parse_observation_time("2025/3/10 13:00:00").unwrap();
        assert_eq!(dt.to_string(), "2025-03-10 13:00:00");
    }

    #[test]
    fn test_end_of_day_rolls_over() {
        let dt = parse_observation_time("2025/3/10 24:00:00").unwrap();
        assert_eq!(dt.to_string(), "2025-03-11 00:00:00");
    }

    #[test]
    fn test_end_of_month_and_year_roll_over() {
        let dt = parse_observation_time("2024/12/31 24:00:00").unwrap();
        assert_eq!(dt.to_string(), "2025-01-01 00:00:00");
        let dt = parse_observation_time("2024/2/28 24:00:00").unwrap();
        assert_eq!(dt.to_string(), "2024-02-29 00:00:00");
    }

    #[test]
    fn test_garbage_is_none() {
        assert_eq!(parse_observation_time(""), None);
        assert_eq!(parse_observation_time("年月日時"), None);
        assert_eq!(parse_observation_time("2025-03-10 13:00:00"), None);
    }
}
