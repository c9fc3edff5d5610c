use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Message returned when the generation endpoint answers without any text.
pub const EMPTY_RESPONSE_MESSAGE: &str = "Empty response from generation endpoint";

/// Every failure the relay can run into. Each variant carries the human readable message that
/// ends up in the `error` field of the response body.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RelayError {
    #[error("{0}")]
    Config(String),
    #[error("{0}")]
    InputParse(String),
    #[error("{0}")]
    UpstreamTransport(String),
    #[error("{0}")]
    UpstreamProtocol(String),
    #[error("{0}")]
    UpstreamSemantic(String),
    #[error("{0}")]
    Unknown(String),
}

impl RelayError {
    /// Non-2xx answer from the generation endpoint.
    pub fn http_status(status: StatusCode) -> Self {
        RelayError::UpstreamProtocol(format!(
            "HTTP error {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Status")
        ))
    }

    pub fn empty_response() -> Self {
        RelayError::UpstreamSemantic(EMPTY_RESPONSE_MESSAGE.into())
    }

    /// Short tag used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::Config(_) => "config",
            RelayError::InputParse(_) => "input_parse",
            RelayError::UpstreamTransport(_) => "upstream_transport",
            RelayError::UpstreamProtocol(_) => "upstream_protocol",
            RelayError::UpstreamSemantic(_) => "upstream_semantic",
            RelayError::Unknown(_) => "unknown",
        }
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        RelayError::InputParse(err.to_string())
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RelayError::UpstreamTransport(format!(
                "Transport error: request to generation endpoint timed out ({})",
                describe(&err)
            ))
        } else if err.is_connect() || err.is_request() {
            RelayError::UpstreamTransport(format!("Transport error: {}", describe(&err)))
        } else if let Some(status) = err.status() {
            RelayError::http_status(status)
        } else if err.is_decode() || err.is_body() {
            RelayError::UpstreamProtocol(err.to_string())
        } else {
            RelayError::Unknown(err.to_string())
        }
    }
}

/// Joins an error with its chain of sources, reqwest keeps the interesting part (e.g. "Connection
/// refused") in the source.
fn describe(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Body of every failed invocation.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    success: bool,
    error: String,
}

impl From<&RelayError> for ErrorBody {
    fn from(err: &RelayError) -> Self {
        ErrorBody {
            success: false,
            error: err.to_string(),
        }
    }
}

pub type RelayResult<T, E = RelayError> = Result<T, E>;
