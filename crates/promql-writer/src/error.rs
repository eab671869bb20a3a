use std::io;

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("failed to encode json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read terminal size: {0}")]
    TerminalSize(#[source] io::Error),

    #[error("timestamp out of range: {0}ms")]
    TimestampRange(i64),

    #[error("failed to align table: {0}")]
    Table(String),

    #[error("failed to build output: {0}")]
    Fmt(#[from] std::fmt::Error),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}
