use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Label holding the metric name
pub const METRIC_NAME_LABEL: &str = "__name__";

pub type LabelName = String;
pub type LabelValue = String;

/// Label set identifying a series
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metric(pub BTreeMap<LabelName, LabelValue>);

impl Metric {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a label, replacing any previous value for `name`
    pub fn with_label(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn label_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Metric {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Renders as `name{a="1", b="2"}`.
///
/// The name is left out when the set has no `__name__` label, and a set
/// holding only a name renders as the bare name.
impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.get(METRIC_NAME_LABEL);
        let labels: Vec<String> = self
            .0
            .iter()
            .filter(|(k, _)| k.as_str() != METRIC_NAME_LABEL)
            .map(|(k, v)| format!("{}={:?}", k, v))
            .collect();

        match (name, labels.is_empty()) {
            (Some(name), true) => write!(f, "{}", name),
            (None, true) => write!(f, "{{}}"),
            (name, false) => write!(f, "{}{{{}}}", name.unwrap_or_default(), labels.join(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_name_and_labels() {
        let m = Metric::new()
            .with_label("__name__", "up")
            .with_label("job", "node")
            .with_label("instance", "a:9100");
        assert_eq!(m.to_string(), r#"up{instance="a:9100", job="node"}"#);
    }

    #[test]
    fn display_name_only() {
        let m = Metric::new().with_label("__name__", "up");
        assert_eq!(m.to_string(), "up");
    }

    #[test]
    fn display_without_name() {
        let m = Metric::new().with_label("job", "x");
        assert_eq!(m.to_string(), r#"{job="x"}"#);
        assert_eq!(Metric::new().to_string(), "{}");
    }

    #[test]
    fn display_escapes_quotes() {
        let m = Metric::new().with_label("path", r#"/a"b"#);
        assert_eq!(m.to_string(), r#"{path="/a\"b"}"#);
    }
}
