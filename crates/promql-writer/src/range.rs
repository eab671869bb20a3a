use promql_model::Matrix;
use std::fmt::Write as _;

use crate::clock;
use crate::csv::CsvWriter;
use crate::error::WriteError;
use crate::graph::Plot;
use crate::labels::{label_values, uniq_labels};
use crate::terminal::TermDimensions;
use crate::writer::{header_row, RangeWriter, Writer};

/// Columns left of the graph kept free for the axis labels
const AXIS_MARGIN: usize = 8;

/// Result of a range query
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RangeResult {
    pub matrix: Matrix,
}

impl RangeResult {
    pub fn new(matrix: Matrix) -> Self {
        Self { matrix }
    }
}

impl From<Matrix> for RangeResult {
    fn from(matrix: Matrix) -> Self {
        Self::new(matrix)
    }
}

impl RangeWriter for RangeResult {
    /// One ascii graph per series, sized to the terminal
    fn graph(&self, dim: TermDimensions) -> Result<String, WriteError> {
        let plot = Plot::new()
            .height((dim.height / 5).max(1))
            .width(dim.width.saturating_sub(AXIS_MARGIN));

        let mut buf = String::new();
        for stream in &self.matrix {
            let Some((start, end)) = stream.time_span() else {
                tracing::debug!(metric = %stream.metric, "skipping series without samples");
                continue;
            };

            let data: Vec<f64> = stream.values.iter().map(|p| p.value.as_f64()).collect();
            let time_range = format!("{} -> {}", clock::stamp(start)?, clock::stamp(end)?);

            writeln!(buf, "\n TIME_RANGE: {}", time_range)?;
            writeln!(buf, " METRIC:     {} ", stream.metric)?;
            writeln!(buf, "{}", plot.render(&data))?;
        }
        Ok(buf)
    }
}

impl Writer for RangeResult {
    fn json(&self) -> Result<String, WriteError> {
        Ok(serde_json::to_string(&self.matrix)?)
    }

    /// One record per sample, series in input order
    fn csv(&self, no_headers: bool) -> Result<String, WriteError> {
        let labels = uniq_labels(&self.matrix);
        let mut w = CsvWriter::new();

        if !no_headers {
            w.write_record(header_row(&labels));
        }

        for stream in &self.matrix {
            for pair in &stream.values {
                let mut row: Vec<String> = label_values(stream, &labels).map(str::to_owned).collect();
                row.push(pair.value.to_string());
                row.push(clock::rfc3339(pair.timestamp)?);
                w.write_record(row);
            }
        }

        Ok(w.into_inner())
    }
}
