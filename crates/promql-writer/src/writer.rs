use promql_model::LabelName;
use std::io::{self, Write};

use crate::error::WriteError;
use crate::terminal::{terminal_size, TermDimensions};

/// Base capability shared by range and instant results
pub trait Writer {
    /// The result as a json array of series
    fn json(&self) -> Result<String, WriteError>;

    /// The result as csv, one record per sample
    fn csv(&self, no_headers: bool) -> Result<String, WriteError>;
}

/// Writer for range query results, adding an ascii graph
pub trait RangeWriter: Writer {
    fn graph(&self, dim: TermDimensions) -> Result<String, WriteError>;
}

/// Writer for instant query results, adding an aligned table
pub trait InstantWriter: Writer {
    fn table(&self, no_headers: bool) -> Result<String, WriteError>;
}

/// Output format selected on the command line.
///
/// Anything other than `json` or `csv` selects the default rendering of
/// the result kind: a graph for range results, a table for instant ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
    Default,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            "" | "graph" | "table" => OutputFormat::Default,
            other => {
                tracing::debug!("unknown output format {:?}, using default", other);
                OutputFormat::Default
            }
        }
    }
}

pub(crate) const VALUE_COLUMN: &str = "value";
pub(crate) const TIMESTAMP_COLUMN: &str = "timestamp";

/// Label columns followed by the value and timestamp columns
pub(crate) fn header_row(labels: &[LabelName]) -> Vec<&str> {
    labels
        .iter()
        .map(String::as_str)
        .chain([VALUE_COLUMN, TIMESTAMP_COLUMN])
        .collect()
}

/// Render a range result in `format`.
///
/// `terminal` is only consulted for the graph, and its failure aborts the
/// render.
pub fn render_range<R, F>(
    r: &R,
    format: &str,
    no_headers: bool,
    terminal: F,
) -> Result<String, WriteError>
where
    R: RangeWriter + ?Sized,
    F: FnOnce() -> Result<TermDimensions, WriteError>,
{
    match OutputFormat::from(format) {
        OutputFormat::Json => r.json(),
        OutputFormat::Csv => r.csv(no_headers),
        OutputFormat::Default => {
            let dim = terminal()?;
            r.graph(dim)
        }
    }
}

/// Render an instant result in `format`
pub fn render_instant<I>(i: &I, format: &str, no_headers: bool) -> Result<String, WriteError>
where
    I: InstantWriter + ?Sized,
{
    match OutputFormat::from(format) {
        OutputFormat::Json => i.json(),
        OutputFormat::Csv => i.csv(no_headers),
        OutputFormat::Default => i.table(no_headers),
    }
}

/// Render a range result and print it to stdout.
///
/// Nothing is printed when rendering fails.
pub fn write_range<R>(r: &R, format: &str, no_headers: bool) -> Result<(), WriteError>
where
    R: RangeWriter + ?Sized,
{
    let out = render_range(r, format, no_headers, terminal_size)?;
    print_line(&out)
}

/// Render an instant result and print it to stdout.
///
/// Nothing is printed when rendering fails.
pub fn write_instant<I>(i: &I, format: &str, no_headers: bool) -> Result<(), WriteError>
where
    I: InstantWriter + ?Sized,
{
    let out = render_instant(i, format, no_headers)?;
    print_line(&out)
}

fn print_line(out: &str) -> Result<(), WriteError> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", out)?;
    stdout.flush()?;
    Ok(())
}
