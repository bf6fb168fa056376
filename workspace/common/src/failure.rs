use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use utoipa::ToSchema;

/// Classification of a failed forecast request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum FailureKind {
    /// The prediction service does not know the ticker
    NotFound,
    /// Network failure, timeout or non-success transport status
    UpstreamUnreachable,
    /// Malformed request from the UI or malformed response from upstream
    InvalidResponse,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::NotFound => "NotFound",
            FailureKind::UpstreamUnreachable => "UpstreamUnreachable",
            FailureKind::InvalidResponse => "InvalidResponse",
        }
    }

    /// Message used when a failure arrives without one.
    pub fn default_message(&self) -> &'static str {
        match self {
            FailureKind::NotFound => "ticker not found",
            FailureKind::UpstreamUnreachable => "prediction service unreachable",
            FailureKind::InvalidResponse => "invalid forecast response",
        }
    }
}

impl Display for FailureKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed failure produced once per completed request.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct ForecastFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl ForecastFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(FailureKind::NotFound, message)
    }

    pub fn upstream_unreachable(message: impl Into<String>) -> Self {
        Self::new(FailureKind::UpstreamUnreachable, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(FailureKind::InvalidResponse, message)
    }
}
