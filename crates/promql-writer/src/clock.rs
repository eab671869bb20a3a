use chrono::{DateTime, Local, SecondsFormat, TimeZone};
use promql_model::Timestamp;
use std::fmt::Display;

use crate::error::WriteError;

/// `ts` in `tz`, using the offset in effect at that instant
fn in_zone<Tz: TimeZone>(ts: Timestamp, tz: &Tz) -> Result<DateTime<Tz>, WriteError> {
    tz.timestamp_millis_opt(ts.as_millis())
        .single()
        .ok_or(WriteError::TimestampRange(ts.as_millis()))
}

/// RFC 3339 in local time with whole seconds, e.g. `2015-07-01T22:10:51+02:00`
pub(crate) fn rfc3339(ts: Timestamp) -> Result<String, WriteError> {
    rfc3339_in(ts, &Local)
}

/// Short local clock stamp, e.g. `Jul  1 22:10:51`
pub(crate) fn stamp(ts: Timestamp) -> Result<String, WriteError> {
    stamp_in(ts, &Local)
}

fn rfc3339_in<Tz>(ts: Timestamp, tz: &Tz) -> Result<String, WriteError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    Ok(in_zone(ts, tz)?.to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn stamp_in<Tz>(ts: Timestamp, tz: &Tz) -> Result<String, WriteError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    Ok(in_zone(ts, tz)?.format("%b %e %H:%M:%S").to_string())
}
