//! Error types
//!
//! Every fallible operation in the library returns [`Error`]. The type is
//! `Clone` so that a list iterator can hand the same failure back on every
//! call once it has been recorded.

use serde::Deserialize;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Category reported by the API in the `error.type` field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidRequest,
    Api,
    Card,
    Authentication,
    RateLimit,
    Unknown(String),
}

impl From<&str> for ErrorKind {
    fn from(value: &str) -> Self {
        match value {
            "invalid_request_error" => ErrorKind::InvalidRequest,
            "api_error" => ErrorKind::Api,
            "card_error" => ErrorKind::Card,
            "authentication_error" => ErrorKind::Authentication,
            "rate_limit_error" => ErrorKind::RateLimit,
            other => ErrorKind::Unknown(other.to_string()),
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::InvalidRequest => "invalid_request_error",
            ErrorKind::Api => "api_error",
            ErrorKind::Card => "card_error",
            ErrorKind::Authentication => "authentication_error",
            ErrorKind::RateLimit => "rate_limit_error",
            ErrorKind::Unknown(other) => other,
        };
        f.write_str(s)
    }
}

/// Errors returned by backend calls and list iteration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The request never produced a usable response (connect, timeout, body read)
    #[error("transport error: {message}")]
    Transport { message: String },

    /// The API answered with a non-success status
    #[error("API error ({status}, {kind}): {message}")]
    Api {
        status: u16,
        kind: ErrorKind,
        message: String,
        code: Option<String>,
        param: Option<String>,
    },

    /// The response body could not be decoded into the expected type
    #[error("decode error: {message}")]
    Decode { message: String },

    /// Missing or invalid client configuration
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl Error {
    pub fn transport(message: impl Into<String>) -> Self {
        Error::Transport {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Error::Decode {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Build an [`Error::Api`] from a status code and the raw response body.
    ///
    /// Bodies that don't carry the `{"error": {...}}` envelope still produce
    /// an `Api` error with an unknown kind and the status as the message.
    pub fn from_response(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct Envelope {
            error: ApiErrorBody,
        }

        #[derive(Deserialize)]
        struct ApiErrorBody {
            #[serde(rename = "type", default)]
            kind: Option<String>,
            #[serde(default)]
            message: Option<String>,
            #[serde(default)]
            code: Option<String>,
            #[serde(default)]
            param: Option<String>,
        }

        match serde_json::from_str::<Envelope>(body) {
            Ok(Envelope { error }) => Error::Api {
                status,
                kind: error
                    .kind
                    .as_deref()
                    .map(ErrorKind::from)
                    .unwrap_or_else(|| ErrorKind::Unknown(String::new())),
                message: error
                    .message
                    .unwrap_or_else(|| format!("request failed with status {status}")),
                code: error.code,
                param: error.param,
            },
            Err(_) => Error::Api {
                status,
                kind: ErrorKind::Unknown(String::new()),
                message: format!("request failed with status {status}"),
                code: None,
                param: None,
            },
        }
    }

    /// Whether this error came back from the API (as opposed to the wire or decoding)
    pub fn is_api(&self) -> bool {
        matches!(self, Error::Api { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::decode(error.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Error::transport(error.to_string())
    }
}
