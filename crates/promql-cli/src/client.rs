//! Thin client for the Prometheus HTTP query API.

use promql_model::{Matrix, Timestamp, Vector};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {0}")]
    Status(reqwest::StatusCode),

    #[error("query failed ({error_type}): {error}")]
    Api { error_type: String, error: String },

    #[error("expected a {expected} result, got {actual}")]
    ResultType {
        expected: &'static str,
        actual: String,
    },

    #[error("failed to decode result: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Response envelope shared by every query endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    status: String,
    #[serde(default)]
    data: Option<QueryData>,
    #[serde(default)]
    error_type: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryData {
    result_type: String,
    result: serde_json::Value,
}

/// Window and resolution of a range query
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QueryRange {
    pub start: Timestamp,
    pub end: Timestamp,
    pub step: Duration,
}

pub struct Client {
    http: reqwest::Client,
    base: String,
}

impl Client {
    pub fn new(host: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base: host.trim_end_matches('/').to_string(),
        })
    }

    /// Evaluate `expr` at a single instant (server time when `time` is None)
    pub async fn query(&self, expr: &str, time: Option<Timestamp>) -> Result<Vector, ClientError> {
        let mut params = vec![("query", expr.to_string())];
        if let Some(time) = time {
            params.push(("time", seconds(time)));
        }
        self.get("/api/v1/query", &params, "vector").await
    }

    /// Evaluate `expr` over a window
    pub async fn query_range(&self, expr: &str, range: QueryRange) -> Result<Matrix, ClientError> {
        let params = vec![
            ("query", expr.to_string()),
            ("start", seconds(range.start)),
            ("end", seconds(range.end)),
            ("step", range.step.as_secs_f64().to_string()),
        ];
        self.get("/api/v1/query_range", &params, "matrix").await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        expected: &'static str,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base, path);
        tracing::debug!(%url, ?params, "sending query");

        let resp = self.http.get(&url).query(params).send().await?;
        let status = resp.status();

        // error responses usually still carry the json envelope
        let body: ApiResponse = match resp.json().await {
            Ok(body) => body,
            Err(_) if !status.is_success() => return Err(ClientError::Status(status)),
            Err(e) => return Err(e.into()),
        };

        decode_result(body, expected)
    }
}

fn decode_result<T: DeserializeOwned>(body: ApiResponse, expected: &'static str) -> Result<T, ClientError> {
    if body.status != "success" {
        return Err(ClientError::Api {
            error_type: body.error_type.unwrap_or_default(),
            error: body.error.unwrap_or_default(),
        });
    }

    let Some(data) = body.data else {
        return Err(ClientError::ResultType {
            expected,
            actual: "nothing".to_string(),
        });
    };

    if data.result_type != expected {
        return Err(ClientError::ResultType {
            expected,
            actual: data.result_type,
        });
    }

    Ok(serde_json::from_value(data.result)?)
}

fn seconds(ts: Timestamp) -> String {
    ts.as_seconds_f64().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ApiResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn decodes_vector() {
        let body = parse(
            r#"{"status":"success","data":{"resultType":"vector","result":[{"metric":{"job":"x"},"value":[1435781451.781,"1"]}]}}"#,
        );
        let vector: Vector = decode_result(body, "vector").unwrap();
        assert_eq!(vector.len(), 1);
        assert_eq!(vector[0].metric.get("job"), Some("x"));
    }

    #[test]
    fn decodes_matrix() {
        let body = parse(
            r#"{"status":"success","data":{"resultType":"matrix","result":[{"metric":{},"values":[[1,"1"],[2,"2"]]}]}}"#,
        );
        let matrix: Matrix = decode_result(body, "matrix").unwrap();
        assert_eq!(matrix[0].values.len(), 2);
        assert_eq!(matrix[0].values[1].timestamp, Timestamp(2_000));
    }

    #[test]
    fn rejects_wrong_result_type() {
        let body = parse(r#"{"status":"success","data":{"resultType":"scalar","result":[1,"1"]}}"#);
        let err = decode_result::<Vector>(body, "vector").unwrap_err();
        assert!(matches!(err, ClientError::ResultType { expected: "vector", .. }));
    }

    #[test]
    fn surfaces_api_errors() {
        let body = parse(r#"{"status":"error","errorType":"bad_data","error":"parse error"}"#);
        let err = decode_result::<Vector>(body, "vector").unwrap_err();
        assert_eq!(err.to_string(), "query failed (bad_data): parse error");
    }

    #[test]
    fn timestamps_as_seconds() {
        assert_eq!(seconds(Timestamp(1_500)), "1.5");
        assert_eq!(seconds(Timestamp(2_000)), "2");
    }
}
