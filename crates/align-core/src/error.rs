//! Error types for the decision facade.

use align_engine::ResolveError;
use align_manifest::ManifestError;
use std::sync::Arc;
use thiserror::Error;

/// Core error type for facade operations.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    /// A non-waiting query was issued before the manifest finished loading.
    #[error("Resolver not ready: manifest is still loading")]
    NotReady,

    /// The manifest failed to load. Shared by every waiter.
    #[error("Manifest load failed: {0}")]
    Load(Arc<ManifestError>),

    /// The resolver rejected the query.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns true when the error came from the caller's query.
    pub fn is_usage_error(&self) -> bool {
        matches!(self, CoreError::Resolve(_))
    }
}
