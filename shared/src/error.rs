use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The request never completed.
    Network,
    /// The backend answered with a non-2xx status.
    Backend,
    /// The backend answered 2xx with a body we could not read.
    Decode,
    /// Input rejected before any request was made.
    Validation,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Network => "NETWORK_ERROR",
            Self::Backend => "BACKEND_ERROR",
            Self::Decode => "DECODE_ERROR",
            Self::Validation => "VALIDATION_ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    pub status: Option<u16>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    #[must_use]
    pub fn backend(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Backend,
            message: message.into(),
            status: Some(status),
        }
    }

    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode, message)
    }

    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Text shown inline next to the control that triggered the request.
    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::Backend | ErrorKind::Validation => self.message.clone(),
            ErrorKind::Network => {
                "Unable to reach the diagnosis service. Please check your connection and try again."
                    .into()
            }
            ErrorKind::Decode => {
                "The server sent a response that could not be read. Please try again.".into()
            }
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(status) = self.status {
            write!(f, " (HTTP {status})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("base URL cannot be empty")]
    Empty,
    #[error("invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("unsupported scheme '{0}', only http and https are allowed")]
    UnsupportedScheme(String),
    #[error("base URL '{0}' has no host")]
    MissingHost(String),
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::validation(e.to_string())
    }
}
