use promql_model::{Matrix, Metric, Sample, SamplePair, SampleStream, SampleValue, Timestamp, Vector};
use promql_writer::{
    render_instant, render_range, InstantResult, RangeResult, TermDimensions, WriteError,
};
use std::io;

const T: i64 = 1_700_000_000_000;

fn vector() -> Vector {
    vec![
        Sample {
            metric: Metric::new().with_label("instance", "a"),
            value: SampleValue(1.5),
            timestamp: Timestamp(T),
        },
        Sample {
            metric: Metric::new().with_label("instance", "b").with_label("job", "x"),
            value: SampleValue(2.0),
            timestamp: Timestamp(T),
        },
    ]
}

fn matrix() -> Matrix {
    vec![
        SampleStream {
            metric: Metric::new()
                .with_label("__name__", "up")
                .with_label("job", "node"),
            values: vec![
                SamplePair::new(Timestamp(T), 1.0),
                SamplePair::new(Timestamp(T + 15_000), 0.0),
                SamplePair::new(Timestamp(T + 30_000), 1.0),
            ],
        },
        SampleStream {
            metric: Metric::new().with_label("instance", "db:9100"),
            values: vec![],
        },
    ]
}

fn terminal() -> Result<TermDimensions, WriteError> {
    Ok(TermDimensions::new(100, 50))
}

fn no_terminal() -> Result<TermDimensions, WriteError> {
    Err(WriteError::TerminalSize(io::Error::new(
        io::ErrorKind::Unsupported,
        "not a tty",
    )))
}

#[test]
fn instant_default_is_table() {
    let result = InstantResult::new(vector());
    let out = render_instant(&result, "table", false).unwrap();
    let header: Vec<&str> = out.lines().next().unwrap().split_whitespace().collect();
    assert_eq!(header, vec!["INSTANCE", "JOB", "VALUE", "TIMESTAMP"]);

    // unknown formats fall through to the table
    assert_eq!(render_instant(&result, "yaml", false).unwrap(), out);
}

#[test]
fn instant_header_suppression() {
    let result = InstantResult::new(vector());
    for format in ["table", "csv"] {
        let with = render_instant(&result, format, false).unwrap();
        let without = render_instant(&result, format, true).unwrap();
        assert_eq!(with.lines().count(), 3, "{}", format);
        assert_eq!(without.lines().count(), 2, "{}", format);
    }
}

#[test]
fn instant_json_round_trips() {
    let result = InstantResult::new(vector());
    let out = render_instant(&result, "json", false).unwrap();
    let decoded: Vector = serde_json::from_str(&out).unwrap();
    assert_eq!(decoded, result.vector);
}

#[test]
fn range_json_round_trips() {
    let result = RangeResult::new(matrix());
    let out = render_range(&result, "json", false, no_terminal).unwrap();
    let decoded: Matrix = serde_json::from_str(&out).unwrap();
    assert_eq!(decoded, result.matrix);
}

#[test]
fn range_csv_does_not_need_terminal() {
    let result = RangeResult::new(matrix());
    let out = render_range(&result, "csv", false, no_terminal).unwrap();
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines[0], "__name__,instance,job,value,timestamp");
    // the empty series contributes columns but no rows
    assert_eq!(lines.len(), 4);
    assert!(lines[1..].iter().all(|l| l.starts_with("up,,node,")));
}

#[test]
fn range_graph_fails_without_terminal() {
    let result = RangeResult::new(matrix());
    let err = render_range(&result, "graph", false, no_terminal).unwrap_err();
    assert!(matches!(err, WriteError::TerminalSize(_)));
}

#[test]
fn range_graph_survives_empty_series() {
    let result = RangeResult::new(matrix());
    let out = render_range(&result, "anything", false, terminal).unwrap();
    assert_eq!(out.matches("TIME_RANGE:").count(), 1);
    assert!(out.contains(r#"up{job="node"}"#));
    assert!(out.contains(" -> "));
}

#[test]
fn empty_results_render() {
    let range = RangeResult::default();
    assert_eq!(render_range(&range, "graph", false, terminal).unwrap(), "");
    assert_eq!(render_range(&range, "json", false, terminal).unwrap(), "[]");

    let instant = InstantResult::default();
    assert_eq!(render_instant(&instant, "csv", true).unwrap(), "");
}
