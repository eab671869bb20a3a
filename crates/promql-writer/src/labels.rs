use promql_model::{LabelName, Metric, Sample, SampleStream};
use std::collections::BTreeSet;

/// Anything identified by a label set
pub trait Labelled {
    fn metric(&self) -> &Metric;

    /// Value of `name`, or the empty string when the label is absent
    fn label_or_empty(&self, name: &str) -> &str {
        self.metric().get(name).unwrap_or_default()
    }
}

impl Labelled for SampleStream {
    fn metric(&self) -> &Metric {
        &self.metric
    }
}

impl Labelled for Sample {
    fn metric(&self) -> &Metric {
        &self.metric
    }
}

/// Sorted, de-duplicated label names across every series.
///
/// Used as the column set for tables and csv, so series with heterogeneous
/// label sets still line up.
pub fn uniq_labels<'a, T>(series: impl IntoIterator<Item = &'a T>) -> Vec<LabelName>
where
    T: Labelled + 'a,
{
    let names: BTreeSet<&str> = series
        .into_iter()
        .flat_map(|s| s.metric().label_names())
        .collect();

    names.into_iter().map(str::to_owned).collect()
}

/// Values of `labels` on one series, in column order
pub(crate) fn label_values<'a, T: Labelled>(
    series: &'a T,
    labels: &'a [LabelName],
) -> impl Iterator<Item = &'a str> + 'a {
    labels.iter().map(move |name| series.label_or_empty(name))
}
