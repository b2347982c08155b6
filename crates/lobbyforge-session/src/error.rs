//! Error types for the session layer.

use lobbyforge_protocol::OperationKind;

/// Errors a request can return to its caller.
///
/// Runtime failures (no provider, provider rejection, failed completion)
/// are never returned; they become notifications. What's left is misuse
/// of the orchestrator itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// A request of this kind is still waiting for its completion.
    /// The new request was dropped; the pending one is unaffected.
    #[error("a {0} request is already in flight")]
    OperationInFlight(OperationKind),
}
