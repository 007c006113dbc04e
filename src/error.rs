//! Client error model.
//! Every gateway call fails with one of three kinds: the transport never produced a
//! response, the service answered with a non-2xx status, or the body did not decode.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientError {
    #[error("{message}")]
    Transport { operation: String, message: String },
    #[error("{message}")]
    Application { operation: String, status: u16, body: String, message: String },
    #[error("{message}")]
    Decode { operation: String, message: String },
}

impl ClientError {
    pub fn transport(operation: impl Into<String>, msg: impl Into<String>) -> Self {
        ClientError::Transport { operation: operation.into(), message: msg.into() }
    }

    /// Non-2xx response. The body text becomes the message verbatim; an empty body
    /// falls back to `"<label> (<status>)"`.
    pub fn application(operation: impl Into<String>, label: &str, status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let message = if body.is_empty() { format!("{} ({})", label, status) } else { body.clone() };
        ClientError::Application { operation: operation.into(), status, body, message }
    }

    pub fn decode(operation: impl Into<String>, msg: impl Into<String>) -> Self {
        ClientError::Decode { operation: operation.into(), message: msg.into() }
    }

    pub fn kind_str(&self) -> &'static str {
        match self {
            ClientError::Transport { .. } => "transport",
            ClientError::Application { .. } => "application",
            ClientError::Decode { .. } => "decode",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ClientError::Transport { message, .. }
            | ClientError::Application { message, .. }
            | ClientError::Decode { message, .. } => message.as_str(),
        }
    }

    pub fn operation(&self) -> &str {
        match self {
            ClientError::Transport { operation, .. }
            | ClientError::Application { operation, .. }
            | ClientError::Decode { operation, .. } => operation.as_str(),
        }
    }

    /// HTTP status for application failures; None when no response was decoded.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Application { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool { self.status() == Some(404) }
}

pub type ClientResult<T> = Result<T, ClientError>;
