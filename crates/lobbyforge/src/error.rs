//! Unified error type for Lobbyforge.

use lobbyforge_provider::ProviderError;
use lobbyforge_session::SessionError;

/// Top-level error that wraps the sub-crate errors.
///
/// Session failures (a full session, a search that found nothing) are not
/// errors: they arrive as [`SessionEvent`](crate::SessionEvent)s. This
/// type covers misuse and plumbing problems only.
#[derive(Debug, thiserror::Error)]
pub enum LobbyforgeError {
    /// A request was refused before reaching the provider.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The provider refused outright.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The session client task has stopped.
    #[error("session client is not running")]
    Unavailable,

    /// A lobby config could not be parsed.
    #[error("invalid lobby config: {0}")]
    Config(#[from] serde_json::Error),
}
