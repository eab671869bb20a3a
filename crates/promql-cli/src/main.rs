//! promql - query Prometheus from the terminal.

mod client;
mod timespec;

use anyhow::Context;
use clap::{Parser, Subcommand};
use promql_model::Timestamp;
use promql_writer::{write_instant, write_range, InstantResult, RangeResult};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use crate::client::{Client, QueryRange};
use crate::timespec::{parse_duration, parse_time};

/// Points a range query aims for when no step is given
const DEFAULT_POINTS: u32 = 250;

#[derive(Parser)]
#[command(name = "promql")]
#[command(about = "Query Prometheus from the terminal", long_about = None)]
struct Cli {
    /// Prometheus server address
    #[arg(long, global = true, env = "PROMQL_HOST", default_value = "http://localhost:9090")]
    host: String,

    /// Output format: json, csv, or the default (graph for ranges, table for instants)
    #[arg(short, long, global = true, env = "PROMQL_OUTPUT", default_value = "")]
    output: String,

    /// Leave out header rows in table and csv output
    #[arg(long, global = true)]
    no_headers: bool,

    /// Request timeout
    #[arg(long, global = true, default_value = "30s", value_parser = parse_duration)]
    timeout: Duration,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression at a single instant
    Query {
        /// PromQL expression
        query: String,

        /// Evaluation time (defaults to server time)
        #[arg(long, value_parser = parse_time)]
        time: Option<Timestamp>,
    },

    /// Evaluate an expression over a time range
    Range {
        /// PromQL expression
        query: String,

        /// Range start (defaults to --since before the end)
        #[arg(long, value_parser = parse_time)]
        start: Option<Timestamp>,

        /// Range end
        #[arg(long, default_value = "now", value_parser = parse_time)]
        end: Timestamp,

        /// Length of the range when --start is not given
        #[arg(long, default_value = "1h", value_parser = parse_duration)]
        since: Duration,

        /// Resolution step (defaults to about 250 points over the range)
        #[arg(long, value_parser = parse_duration)]
        step: Option<Duration>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;
    runtime.block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = Client::new(&cli.host, cli.timeout).context("failed to build http client")?;

    match cli.command {
        Commands::Query { query, time } => {
            let vector = client
                .query(&query, time)
                .await
                .with_context(|| format!("instant query against {} failed", cli.host))?;
            tracing::debug!(series = vector.len(), "instant query done");

            write_instant(&InstantResult::new(vector), &cli.output, cli.no_headers)?;
        }
        Commands::Range {
            query,
            start,
            end,
            since,
            step,
        } => {
            let range = query_range(start, end, since, step)?;
            let matrix = client
                .query_range(&query, range)
                .await
                .with_context(|| format!("range query against {} failed", cli.host))?;
            tracing::debug!(series = matrix.len(), "range query done");

            write_range(&RangeResult::new(matrix), &cli.output, cli.no_headers)?;
        }
    }

    Ok(())
}

/// Fill in the start and step defaults for a range query
fn query_range(
    start: Option<Timestamp>,
    end: Timestamp,
    since: Duration,
    step: Option<Duration>,
) -> anyhow::Result<QueryRange> {
    let start = match start {
        Some(start) => start,
        None => {
            let since_millis = i64::try_from(since.as_millis()).context("--since is too large")?;
            let millis = end
                .as_millis()
                .checked_sub(since_millis)
                .context("--since reaches before the earliest timestamp")?;
            Timestamp::from_millis(millis)
        }
    };
    if start > end {
        anyhow::bail!("range start is after its end");
    }

    let span_millis = end
        .as_millis()
        .checked_sub(start.as_millis())
        .context("range is too long")?;
    let step = step.unwrap_or_else(|| {
        let span = Duration::from_millis(span_millis.unsigned_abs());
        (span / DEFAULT_POINTS).max(Duration::from_secs(1))
    });
    if step.is_zero() {
        anyhow::bail!("--step must be positive");
    }

    Ok(QueryRange { start, end, step })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_defaults() {
        let end = Timestamp::from_millis(10_000_000);
        let range = query_range(None, end, Duration::from_secs(3_600), None).unwrap();
        assert_eq!(range.start, Timestamp::from_millis(10_000_000 - 3_600_000));
        assert_eq!(range.step, Duration::from_millis(14_400));
    }

    #[test]
    fn short_ranges_step_at_least_a_second() {
        let end = Timestamp::from_millis(100_000);
        let range = query_range(None, end, Duration::from_secs(10), None).unwrap();
        assert_eq!(range.step, Duration::from_secs(1));
    }

    #[test]
    fn rejects_inverted_range() {
        let start = Some(Timestamp::from_millis(2_000));
        let end = Timestamp::from_millis(1_000);
        assert!(query_range(start, end, Duration::from_secs(60), None).is_err());
        assert!(query_range(None, end, Duration::ZERO, Some(Duration::ZERO)).is_err());
    }

    #[test]
    fn rejects_ranges_that_overflow() {
        let end = Timestamp::from_millis(-1_000);
        let since = Duration::from_millis(i64::MAX as u64);
        assert!(query_range(None, end, since, None).is_err());

        let start = Some(Timestamp::from_millis(i64::MIN));
        let end = Timestamp::from_millis(i64::MAX);
        assert!(query_range(start, end, Duration::ZERO, None).is_err());
    }

    #[test]
    fn cli_parses() {
        let cli = Cli::try_parse_from(["promql", "-o", "csv", "range", "up", "--step", "15s"]).unwrap();
        assert_eq!(cli.output, "csv");
        match cli.command {
            Commands::Range { query, step, .. } => {
                assert_eq!(query, "up");
                assert_eq!(step, Some(Duration::from_secs(15)));
            }
            Commands::Query { .. } => panic!("expected range"),
        }
    }
}
