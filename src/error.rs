use std::error::Error as StdError;
use std::sync::Arc;

use thiserror::Error;

/// Boxed error accepted by [WiringError::provider]
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Result of a provider or of a resolution
pub type Result<T, E = WiringError> = std::result::Result<T, E>;

/// Errors triggered while resolving a dependency
///
/// The enum is [Clone] because the failure of a singleton is remembered by the
/// container and handed out again on every later resolution.
#[derive(Error, Debug, Clone)]
pub enum WiringError {
    /// Nothing is bound for the requested type or name
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    /// The container reached a state that its bind operations cannot produce
    #[error("Consistency error: unexpected registry state for {0}")]
    Consistency(&'static str),

    /// A named binding produces another type than the one requested
    #[error("Type mismatch: requested '{requested}' but the binding provides '{bound}'")]
    TypeMismatch {
        requested: &'static str,
        bound: &'static str,
    },

    /// Error returned by a provider, passed through unchanged
    #[error(transparent)]
    Provider(Arc<dyn StdError + Send + Sync>),
}

impl WiringError {
    /// Wrap the error of a provider.
    ///
    /// A [WiringError] that went through a `Box<dyn Error>` is recovered as is,
    /// so that a missing sub-dependency still reads as [WiringError::ProviderNotFound].
    pub fn provider(error: impl Into<BoxError>) -> Self {
        let error: BoxError = error.into();
        match error.downcast::<WiringError>() {
            Ok(wiring) => *wiring,
            Err(other) => WiringError::Provider(Arc::from(other)),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, WiringError::ProviderNotFound(_))
    }
}

impl From<BoxError> for WiringError {
    fn from(error: BoxError) -> Self {
        WiringError::provider(error)
    }
}
