use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The server rejected the request; carries the server-provided message
    /// or an operation-specific fallback.
    #[error("{0}")]
    Rejected(String),

    /// The request never completed. The underlying cause is logged, not
    /// surfaced, so transport details do not leak to callers.
    #[error("an unexpected error occurred")]
    Transport,

    /// Success status but the body did not match the expected schema.
    #[error("the server sent an unexpected response")]
    MalformedResponse,

    /// The token could not be written to or removed from persistent storage.
    #[error("failed to persist session state")]
    Storage(#[source] anyhow::Error),
}

/// Build a `Rejected` error from a non-success response.
///
/// Message precedence: top-level `error` string, then an `error`/`errors`
/// object flattened to `field: message` pairs, then the fallback.
pub(crate) async fn rejection(response: reqwest::Response, fallback: &str) -> ClientError {
    let body = response.text().await.unwrap_or_default();
    let message = extract_error_message(&body).unwrap_or_else(|| fallback.to_string());
    ClientError::Rejected(message)
}

fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    match value.get("error") {
        Some(Value::String(message)) => return Some(message.clone()),
        Some(Value::Object(fields)) => return Some(join_field_errors(fields)),
        _ => {}
    }
    if let Some(Value::Object(fields)) = value.get("errors") {
        return Some(join_field_errors(fields));
    }
    None
}

fn join_field_errors(fields: &serde_json::Map<String, Value>) -> String {
    let mut parts: Vec<String> = fields
        .iter()
        .map(|(field, message)| match message {
            Value::String(text) => format!("{}: {}", field, text),
            other => format!("{}: {}", field, other),
        })
        .collect();
    parts.sort();
    parts.join("; ")
}
