//! Error types for the provider layer.

/// Why a provider refused to start an operation.
///
/// Only returned synchronously. Once a request has been accepted, its
/// failure arrives as a [`ProviderCompletion`](crate::ProviderCompletion)
/// with `success: false` (or a non-success join result) instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The provider looked at the request and refused it.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The provider's backend is not reachable.
    #[error("session provider unavailable")]
    Unavailable,
}
