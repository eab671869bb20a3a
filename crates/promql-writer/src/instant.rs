use promql_model::Vector;
use std::io::Write;
use tabwriter::TabWriter;

use crate::clock;
use crate::csv::CsvWriter;
use crate::error::WriteError;
use crate::labels::{label_values, uniq_labels};
use crate::writer::{header_row, InstantWriter, Writer};

/// Minimum spaces between table columns
const TABLE_PADDING: usize = 4;

/// Result of an instant query
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InstantResult {
    pub vector: Vector,
}

impl InstantResult {
    pub fn new(vector: Vector) -> Self {
        Self { vector }
    }
}

impl From<Vector> for InstantResult {
    fn from(vector: Vector) -> Self {
        Self::new(vector)
    }
}

impl InstantWriter for InstantResult {
    /// Tab aligned table with upper-cased column titles
    fn table(&self, no_headers: bool) -> Result<String, WriteError> {
        let labels = uniq_labels(&self.vector);
        let mut tw = TabWriter::new(Vec::new())
            .minwidth(0)
            .padding(TABLE_PADDING);

        if !no_headers {
            let titles: Vec<String> = header_row(&labels)
                .into_iter()
                .map(str::to_uppercase)
                .collect();
            writeln!(tw, "{}", titles.join("\t"))?;
        }

        for sample in &self.vector {
            let mut cells: Vec<String> = label_values(sample, &labels).map(str::to_owned).collect();
            cells.push(sample.value.to_string());
            cells.push(clock::rfc3339(sample.timestamp)?);
            writeln!(tw, "{}", cells.join("\t"))?;
        }

        tw.flush()?;
        let bytes = tw
            .into_inner()
            .map_err(|e| WriteError::Table(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| WriteError::Table(e.to_string()))
    }
}

impl Writer for InstantResult {
    fn json(&self) -> Result<String, WriteError> {
        Ok(serde_json::to_string(&self.vector)?)
    }

    /// One record per series
    fn csv(&self, no_headers: bool) -> Result<String, WriteError> {
        let labels = uniq_labels(&self.vector);
        let mut w = CsvWriter::new();

        if !no_headers {
            w.write_record(header_row(&labels));
        }

        for sample in &self.vector {
            let mut row: Vec<String> = label_values(sample, &labels).map(str::to_owned).collect();
            row.push(sample.value.to_string());
            row.push(clock::rfc3339(sample.timestamp)?);
            w.write_record(row);
        }

        Ok(w.into_inner())
    }
}
