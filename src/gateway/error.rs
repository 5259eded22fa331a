//! Error types for calls against the tournament API.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Convenient result alias returning [`GatewayError`] failures.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Failures of a single gateway call. None of them is fatal; callers decide how to surface them.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build HTTP client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// The request could not be sent or the connection dropped.
    #[error("failed to reach the tournament API at `{path}`")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The server answered 2xx but the body did not match the expected shape.
    #[error("failed to decode response from `{path}`")]
    Decode {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The token was rejected; the session token has been cleared.
    #[error("not authorized, please log in again")]
    Unauthorized,
    /// The server refused the request. Displays the server's `detail` verbatim.
    #[error("{detail}")]
    Rejected { status: StatusCode, detail: String },
    /// A tablet call was made without a paired board.
    #[error("this device is not paired with a board")]
    NotPaired,
}

impl GatewayError {
    /// Build a [`GatewayError::Rejected`] from an error status and its raw body.
    pub fn rejected(status: StatusCode, body: &str) -> Self {
        GatewayError::Rejected {
            status,
            detail: extract_detail(status, body),
        }
    }

    /// Transport-level failures are retried by the next poll tick.
    pub fn is_transient(&self) -> bool {
        matches!(self, GatewayError::Transport { .. })
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
}

/// Pull the `detail` field out of an error body. Strings are used as-is, structured validation
/// errors are rendered as compact JSON.
fn extract_detail(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.detail);
    match detail {
        Some(Value::String(text)) => text,
        Some(other) if !other.is_null() => other.to_string(),
        _ => format!("request failed with status {}", status.as_u16()),
    }
}
