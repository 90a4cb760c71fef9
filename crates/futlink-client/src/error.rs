//! Error types for the FUT client.

use std::fmt;

use thiserror::Error;

/// A stage of the login pipeline (or a standalone authenticated call).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    EntryPage,
    Iframe,
    Shards,
    AccountInfo,
    Auth,
    Phishing,
    Credits,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::EntryPage => "entry page",
            Self::Iframe => "iframe page",
            Self::Shards => "shard directory",
            Self::AccountInfo => "account info",
            Self::Auth => "authentication",
            Self::Phishing => "phishing question",
            Self::Credits => "credits",
        };
        f.write_str(name)
    }
}

/// FUT client errors.
#[derive(Debug, Error)]
pub enum FutError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("cannot reach service ({step}): {source}")]
    Transport {
        step: Step,
        #[source]
        source: reqwest::Error,
    },

    #[error("request timed out ({step})")]
    Timeout { step: Step },

    #[error("unexpected HTTP status {status} ({step})")]
    Status { step: Step, status: u16 },

    #[error("unexpected response shape ({step}): {detail}")]
    UnexpectedResponse { step: Step, detail: String },

    #[error("authentication rejected ({code}): {reason}")]
    AuthRejected { code: String, reason: String },

    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("security question unresolved: {reason}")]
    ChallengeUnresolved { reason: String },

    #[error("operation cancelled")]
    Cancelled,

    #[error("no session for {0}")]
    NoSession(String),
}

/// Flat classification of [`FutError`] for callers that only branch on kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Transport,
    Timeout,
    Status,
    UnexpectedResponse,
    AuthRejected,
    UnsupportedPlatform,
    ChallengeUnresolved,
    Cancelled,
    NoSession,
}

impl FutError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Status { .. } => ErrorKind::Status,
            Self::UnexpectedResponse { .. } => ErrorKind::UnexpectedResponse,
            Self::AuthRejected { .. } => ErrorKind::AuthRejected,
            Self::UnsupportedPlatform(_) => ErrorKind::UnsupportedPlatform,
            Self::ChallengeUnresolved { .. } => ErrorKind::ChallengeUnresolved,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::NoSession(_) => ErrorKind::NoSession,
        }
    }

    /// Classify a reqwest failure at `step`.
    pub(crate) fn from_reqwest(step: Step, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { step }
        } else if source.is_decode() {
            Self::UnexpectedResponse {
                step,
                detail: source.to_string(),
            }
        } else {
            Self::Transport { step, source }
        }
    }

    pub(crate) fn unexpected(step: Step, detail: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            step,
            detail: detail.into(),
        }
    }

    /// Whether the service was never reached or answered with a failure status.
    pub const fn is_service_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Timeout { .. } | Self::Status { .. }
        )
    }
}
