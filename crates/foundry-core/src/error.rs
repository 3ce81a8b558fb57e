//! Error types for Foundry Core
//!
//! Three families, kept apart so callers can react differently:
//! - [`ServiceError`]: a collaborator failed; usually worth retrying
//! - [`PreconditionError`]: rejected locally, no collaborator was called
//! - [`StoreError`]: the requested mutation is not legal for the session
//!
//! Field-level problems are not errors; they are
//! [`ValidationIssue`](foundry_schema::ValidationIssue) data.

use foundry_config::PathError;
use foundry_schema::{ValidationServiceError, Variant};

use crate::types::ValidationState;

/// Main Foundry error type
#[derive(Debug, thiserror::Error)]
pub enum FoundryError {
    /// Collaborator failure
    #[error("service error: {0}")]
    Service(#[from] ServiceError),

    /// Local precondition failed
    #[error("precondition failed: {0}")]
    Precondition(#[from] PreconditionError),

    /// Illegal store mutation
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl FoundryError {
    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Service(err) if err.is_retryable())
    }

    /// Check if the request was rejected before reaching any collaborator
    #[inline]
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }
}

impl From<ValidationServiceError> for FoundryError {
    fn from(err: ValidationServiceError) -> Self {
        Self::Service(err.into())
    }
}

impl From<TransitionError> for FoundryError {
    fn from(err: TransitionError) -> Self {
        Self::Store(err.into())
    }
}

/// Collaborator failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Requested item does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Validation service did not answer
    #[error("{0}")]
    ValidationUnavailable(#[from] ValidationServiceError),

    /// Generation service failed
    #[error("generation failed: {0}")]
    Generation(String),

    /// History provider failed
    #[error("history provider failed: {0}")]
    History(String),
}

impl ServiceError {
    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ValidationUnavailable(_) | Self::Generation(_) | Self::History(_)
        )
    }
}

/// Local rejections, raised without any network call
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionError {
    /// Generation needs a valid config
    #[error("config is not valid (state: {state})")]
    NotValid { state: ValidationState },

    /// A generation call is already running for this session
    #[error("a generation is already in flight")]
    GenerationInFlight,

    /// No variant has been selected
    #[error("no active asset type")]
    NoActiveVariant,
}

/// Illegal store mutations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Malformed field path
    #[error("invalid path: {0}")]
    Path(#[from] PathError),

    /// Edit before any variant was loaded
    #[error("no active asset type; select one first")]
    NoActiveVariant,

    /// Path is not part of the active variant's schema
    #[error("{path} is not a field of {variant}")]
    UndeclaredField { path: String, variant: Variant },

    /// State machine refused the transition
    #[error("{0}")]
    Transition(#[from] TransitionError),

    /// Store was built outside a Tokio runtime
    #[error("config store requires a running Tokio runtime")]
    NoRuntime,

    /// A newer switch, restore or reset replaced this request
    #[error("loading {variant} was superseded by a newer request")]
    Superseded { variant: Variant },
}

/// State machine errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal state transition: {from} -> {to}")]
pub struct TransitionError {
    pub from: ValidationState,
    pub to: ValidationState,
}

/// Settings file errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// File could not be read
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid settings TOML
    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),
}
