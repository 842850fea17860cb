//! Error types shared by the dispatcher and streaming sessions.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Boxed error carried by transport and encoding failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias used throughout the client.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong between building a request and decoding
/// its reply.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The network layer failed, including timeouts.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// The server answered successfully but sent no body.
    #[error("empty response body")]
    EmptyData,

    /// A body was present but did not match the expected schema.
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The server returned a structured error payload.
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// The request could not be serialized before sending.
    #[error("failed to encode request: {0}")]
    Encoding(#[source] BoxError),
}

impl Error {
    /// Wrap a transport failure.
    pub fn transport(err: impl Into<BoxError>) -> Self {
        Self::Transport(err.into())
    }

    /// Wrap a request encoding failure.
    pub fn encoding(err: impl Into<BoxError>) -> Self {
        Self::Encoding(err.into())
    }

    /// The server-reported error, if this is one.
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}

/// Envelope the server wraps its error payloads in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// The error itself.
    pub error: ApiError,
}

/// Structured error payload returned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable message. Some servers send a list of messages; those
    /// are joined with newlines.
    #[serde(deserialize_with = "message")]
    pub message: String,

    /// Error category, e.g. `invalid_request_error`.
    #[serde(rename = "type", default)]
    pub kind: String,

    /// The request parameter the error relates to.
    #[serde(default)]
    pub param: Option<String>,

    /// Machine-readable error code.
    #[serde(default, deserialize_with = "code")]
    pub code: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{} ({})", self.message, self.kind)
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Deserialize)]
#[serde(untagged)]
enum Message {
    One(String),
    Many(Vec<String>),
}

fn message<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<String, D::Error> {
    Ok(match Message::deserialize(de)? {
        Message::One(message) => message,
        Message::Many(messages) => messages.join("\n"),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Code {
    Text(String),
    Number(i64),
}

fn code<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<Option<String>, D::Error> {
    Ok(Option::<Code>::deserialize(de)?.map(|code| match code {
        Code::Text(code) => code,
        Code::Number(code) => code.to_string(),
    }))
}
