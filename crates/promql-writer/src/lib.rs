//! Stdout writers for Prometheus query results.
//!
//! Range results render as an ascii graph, JSON or CSV; instant results
//! render as an aligned table, JSON or CSV.
//!
//! # Example
//!
//! ```no_run
//! use promql_model::{Metric, Sample, SampleValue, Timestamp};
//! use promql_writer::{write_instant, InstantResult};
//!
//! fn main() -> Result<(), promql_writer::WriteError> {
//!     let result = InstantResult::new(vec![Sample {
//!         metric: Metric::new().with_label("instance", "a"),
//!         value: SampleValue(1.5),
//!         timestamp: Timestamp::now(),
//!     }]);
//!
//!     write_instant(&result, "table", false)
//! }
//! ```

mod clock;
mod csv;
mod error;
mod graph;
mod instant;
mod labels;
mod range;
mod terminal;
mod writer;

pub use error::WriteError;
pub use graph::Plot;
pub use instant::InstantResult;
pub use labels::{uniq_labels, Labelled};
pub use range::RangeResult;
pub use terminal::{terminal_size, TermDimensions};
pub use writer::*;
