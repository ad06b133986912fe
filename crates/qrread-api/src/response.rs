//! JSON response contract for the read endpoint
//!
//! Every response carries both `error` and `result` keys, exactly one of them
//! non-null.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

/// Body written when even the serialization-failure response cannot be encoded
const FALLBACK_ERROR_BODY: &str = r#"{"error":"failed to serialize error response","result":null}"#;

/// Result of a read request: an error message or the decoded text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrResponse {
    error: Option<String>,
    result: Option<String>,
}

impl QrResponse {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            error: None,
            result: Some(text.into()),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            result: None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }
}

/// Write `{"error": message, "result": null}` with the given status.
pub fn json_error(message: impl Into<String>, status: StatusCode) -> Response {
    render_error(message.into(), status, |body| serde_json::to_vec(body))
}

/// Write the decoded text as tab-indented JSON with status 200.
pub fn json_success(text: impl Into<String>) -> Response {
    match to_tab_indented(&QrResponse::success(text)) {
        Ok(body) => json_body(StatusCode::OK, body),
        Err(e) => json_error(e.to_string(), StatusCode::BAD_REQUEST),
    }
}

/// Serializes the error body, retrying once with the serialization failure
/// before falling back to a fixed body.
fn render_error<F>(message: String, status: StatusCode, serialize: F) -> Response
where
    F: Fn(&QrResponse) -> serde_json::Result<Vec<u8>>,
{
    match serialize(&QrResponse::failure(message)) {
        Ok(body) => json_body(status, body),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize error response");
            let body = serialize(&QrResponse::failure(e.to_string()))
                .unwrap_or_else(|_| FALLBACK_ERROR_BODY.as_bytes().to_vec());
            json_body(StatusCode::INTERNAL_SERVER_ERROR, body)
        }
    }
}

fn to_tab_indented<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"\t"));
    value.serialize(&mut ser)?;
    Ok(buf)
}

fn json_body(status: StatusCode, body: Vec<u8>) -> Response {
    (
        status,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )],
        body,
    )
        .into_response()
}
