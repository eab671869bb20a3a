//! Parsing of time and duration arguments.

use promql_model::Timestamp;
use std::time::Duration;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

#[derive(Debug, thiserror::Error)]
pub enum TimeSpecError {
    #[error("invalid time {0:?}: expected RFC 3339, unix seconds or \"now\"")]
    Time(String),

    #[error("invalid duration {0:?}: expected e.g. 30s, 5m, 1h, 2d, 1w")]
    Duration(String),
}

/// Parse `now`, unix seconds (`1700000000.5`) or RFC 3339
pub fn parse_time(s: &str) -> Result<Timestamp, TimeSpecError> {
    if s == "now" {
        return Ok(Timestamp::now());
    }
    if let Ok(secs) = s.parse::<f64>() {
        if secs.is_finite() {
            return Ok(Timestamp::from_seconds_f64(secs));
        }
    }

    let dt = OffsetDateTime::parse(s, &Rfc3339).map_err(|_| TimeSpecError::Time(s.to_string()))?;
    let millis = dt.unix_timestamp_nanos() / 1_000_000;
    Ok(Timestamp::from_millis(millis as i64))
}

/// Parse `<n><unit>` with units ms, s, m, h, d, w, or plain seconds
pub fn parse_duration(s: &str) -> Result<Duration, TimeSpecError> {
    let err = || TimeSpecError::Duration(s.to_string());

    let split = s.find(|c: char| c.is_ascii_alphabetic()).unwrap_or(s.len());
    let (num, unit) = s.split_at(split);
    let n: f64 = num.parse().map_err(|_| err())?;
    if !n.is_finite() || n < 0.0 {
        return Err(err());
    }

    let scale = match unit {
        "ms" => 0.001,
        "" | "s" => 1.0,
        "m" => 60.0,
        "h" => 3_600.0,
        "d" => 86_400.0,
        "w" => 604_800.0,
        _ => return Err(err()),
    };

    Duration::try_from_secs_f64(n * scale).map_err(|_| err())
}
