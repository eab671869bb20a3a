//! Result types for Prometheus-compatible query APIs.
//!
//! This crate defines the in-memory shape of instant (`Vector`) and range
//! (`Matrix`) query results, along with their JSON wire encoding.

mod labels;
mod sample;

pub use labels::*;
pub use sample::*;
