use serde::de::{self, Deserializer, Visitor};
use serde::ser::{SerializeTuple, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

use crate::labels::Metric;

/// Timestamp in milliseconds since UNIX epoch
///
/// On the wire this is a number of seconds with millisecond precision,
/// e.g. `1435781451.781`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        Self(millis as i64)
    }

    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Round fractional seconds to the nearest millisecond
    pub fn from_seconds_f64(secs: f64) -> Self {
        Self((secs * 1000.0).round() as i64)
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }

    pub fn as_seconds_f64(&self) -> f64 {
        self.0 as f64 / 1000.0
    }
}

impl Serialize for Timestamp {
    /// Whole seconds encode as integers, the rest with their millisecond digits
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % 1000 == 0 {
            serializer.serialize_i64(self.0 / 1000)
        } else {
            serializer.serialize_f64(self.as_seconds_f64())
        }
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TimestampVisitor;

        impl<'de> Visitor<'de> for TimestampVisitor {
            type Value = Timestamp;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("unix seconds as a number or numeric string")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Timestamp, E> {
                Ok(Timestamp::from_seconds_f64(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Timestamp, E> {
                Ok(Timestamp(v.saturating_mul(1000)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Timestamp, E> {
                let secs = i64::try_from(v).map_err(E::custom)?;
                Ok(Timestamp(secs.saturating_mul(1000)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Timestamp, E> {
                v.parse::<f64>()
                    .map(Timestamp::from_seconds_f64)
                    .map_err(E::custom)
            }
        }

        deserializer.deserialize_any(TimestampVisitor)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("invalid sample value: {0:?}")]
    InvalidSampleValue(String),
}

/// A sample value
///
/// Renders as the shortest decimal that round-trips, without exponent,
/// with `NaN`, `+Inf` and `-Inf` for the special values.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct SampleValue(pub f64);

impl SampleValue {
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

impl From<f64> for SampleValue {
    fn from(v: f64) -> Self {
        Self(v)
    }
}

impl fmt::Display for SampleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        if v.is_nan() {
            f.write_str("NaN")
        } else if v == f64::INFINITY {
            f.write_str("+Inf")
        } else if v == f64::NEG_INFINITY {
            f.write_str("-Inf")
        } else {
            write!(f, "{}", v)
        }
    }
}

impl FromStr for SampleValue {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NaN" => Ok(Self(f64::NAN)),
            "+Inf" | "Inf" => Ok(Self(f64::INFINITY)),
            "-Inf" => Ok(Self(f64::NEG_INFINITY)),
            _ => s
                .parse::<f64>()
                .map(Self)
                .map_err(|_| ModelError::InvalidSampleValue(s.to_string())),
        }
    }
}

impl Serialize for SampleValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SampleValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = SampleValue;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a sample value as a string or number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<SampleValue, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<SampleValue, E> {
                Ok(SampleValue(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<SampleValue, E> {
                Ok(SampleValue(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<SampleValue, E> {
                Ok(SampleValue(v as f64))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

/// A single (timestamp, value) point, encoded as `[ts, "value"]`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplePair {
    pub timestamp: Timestamp,
    pub value: SampleValue,
}

impl SamplePair {
    pub fn new(timestamp: Timestamp, value: impl Into<SampleValue>) -> Self {
        Self {
            timestamp,
            value: value.into(),
        }
    }
}

impl Serialize for SamplePair {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tup = serializer.serialize_tuple(2)?;
        tup.serialize_element(&self.timestamp)?;
        tup.serialize_element(&self.value)?;
        tup.end()
    }
}

impl<'de> Deserialize<'de> for SamplePair {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (timestamp, value) = <(Timestamp, SampleValue)>::deserialize(deserializer)?;
        Ok(Self { timestamp, value })
    }
}

/// One series of a range query result
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleStream {
    pub metric: Metric,
    pub values: Vec<SamplePair>,
}

impl SampleStream {
    /// Time covered by this series, or `None` when it holds no samples
    pub fn time_span(&self) -> Option<(Timestamp, Timestamp)> {
        let first = self.values.first()?;
        let last = self.values.last()?;
        Some((first.timestamp, last.timestamp))
    }
}

/// One series of an instant query result
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "SampleRepr", into = "SampleRepr")]
pub struct Sample {
    pub metric: Metric,
    pub value: SampleValue,
    pub timestamp: Timestamp,
}

#[derive(Clone, Serialize, Deserialize)]
struct SampleRepr {
    metric: Metric,
    value: SamplePair,
}

impl From<SampleRepr> for Sample {
    fn from(repr: SampleRepr) -> Self {
        Self {
            metric: repr.metric,
            value: repr.value.value,
            timestamp: repr.value.timestamp,
        }
    }
}

impl From<Sample> for SampleRepr {
    fn from(sample: Sample) -> Self {
        Self {
            metric: sample.metric,
            value: SamplePair::new(sample.timestamp, sample.value),
        }
    }
}

/// Range query result, in backend order
pub type Matrix = Vec<SampleStream>;

/// Instant query result, in backend order
pub type Vector = Vec<Sample>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_formatting() {
        assert_eq!(SampleValue(1.5).to_string(), "1.5");
        assert_eq!(SampleValue(2.0).to_string(), "2");
        assert_eq!(SampleValue(1e21).to_string(), "1000000000000000000000");
        assert_eq!(SampleValue(f64::NAN).to_string(), "NaN");
        assert_eq!(SampleValue(f64::INFINITY).to_string(), "+Inf");
        assert_eq!(SampleValue(f64::NEG_INFINITY).to_string(), "-Inf");
    }

    #[test]
    fn value_parsing() {
        assert_eq!("0.25".parse::<SampleValue>().unwrap(), SampleValue(0.25));
        assert!("+Inf".parse::<SampleValue>().unwrap().0.is_infinite());
        assert!("NaN".parse::<SampleValue>().unwrap().0.is_nan());
        assert!("nope".parse::<SampleValue>().is_err());
    }

    #[test]
    fn decode_range_series() {
        let json = r#"[{"metric":{"__name__":"up","job":"node"},"values":[[1435781451.781,"1"],[1435781466.781,"0"]]}]"#;
        let matrix: Matrix = serde_json::from_str(json).unwrap();

        assert_eq!(matrix.len(), 1);
        assert_eq!(matrix[0].metric.get("job"), Some("node"));
        assert_eq!(matrix[0].values[0].timestamp, Timestamp(1_435_781_451_781));
        assert_eq!(matrix[0].values[1].value, SampleValue(0.0));
        assert_eq!(
            matrix[0].time_span(),
            Some((Timestamp(1_435_781_451_781), Timestamp(1_435_781_466_781)))
        );
    }

    #[test]
    fn encode_instant_sample() {
        let sample = Sample {
            metric: Metric::new().with_label("instance", "a"),
            value: SampleValue(1.5),
            timestamp: Timestamp(1_435_781_451_781),
        };
        let json = serde_json::to_string(&vec![sample.clone()]).unwrap();
        assert_eq!(
            json,
            r#"[{"metric":{"instance":"a"},"value":[1435781451.781,"1.5"]}]"#
        );

        let decoded: Vector = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, vec![sample]);
    }

    #[test]
    fn empty_series_has_no_span() {
        let stream = SampleStream::default();
        assert_eq!(stream.time_span(), None);
    }

    #[test]
    fn timestamps_encode_shortest_seconds() {
        let pairs = vec![
            SamplePair::new(Timestamp(1_700_000_000_000), 1.0),
            SamplePair::new(Timestamp(1_700_000_000_500), 2.0),
            SamplePair::new(Timestamp(-1_500), 3.0),
        ];
        let json = serde_json::to_string(&pairs).unwrap();
        assert_eq!(json, r#"[[1700000000,"1"],[1700000000.5,"2"],[-1.5,"3"]]"#);

        let decoded: Vec<SamplePair> = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, pairs);
    }
}
