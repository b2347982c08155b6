//! Session provider abstraction for Lobbyforge.
//!
//! A session provider is the online backend that actually hosts, lists,
//! and joins sessions (Steam, EOS, a LAN beacon, ...). Lobbyforge never
//! talks to one directly; it goes through the [`SessionProvider`] trait.
//!
//! # Request / completion split
//!
//! Every operation is two halves:
//!
//! 1. The orchestrator calls a trait method. The provider either accepts
//!    the request (`Ok(())`) or rejects it on the spot
//!    (`Err(ProviderError)`). A rejected request never completes.
//! 2. Later, an accepted request resolves by pushing a
//!    [`ProviderCompletion`] into the [`CompletionSink`] the provider was
//!    built with. The orchestrator's task picks it up from the matching
//!    [`CompletionStream`].
//!
//! ```text
//! Orchestrator ──request──→ Provider
//!      ↑                       │
//!      └── CompletionStream ←──┘ CompletionSink
//! ```
//!
//! # Feature Flags
//!
//! - `null` (default): [`NullProvider`], an in-memory LAN provider

mod completion;
mod error;
#[cfg(feature = "null")]
mod null;

pub use completion::{CompletionSink, CompletionStream, ProviderCompletion, completion_channel};
pub use error::ProviderError;
#[cfg(feature = "null")]
pub use null::{LanRegistry, NullProvider};

use lobbyforge_protocol::{
    NamedSession, PlayerId, SessionName, SessionSearchQuery, SessionSearchResult, SessionSettings,
};

/// Name the null (offline/LAN) provider reports.
pub const NULL_PROVIDER_NAME: &str = "NULL";

/// The capability the session orchestrator calls into.
///
/// Methods take `&mut self` because the provider is owned by exactly one
/// orchestrator and only ever driven from its task.
///
/// # Example
///
/// ```rust
/// use lobbyforge_provider::{ProviderError, SessionProvider};
/// use lobbyforge_protocol::*;
///
/// /// A provider whose backend is down: every request is refused.
/// struct Offline;
///
/// impl SessionProvider for Offline {
///     fn name(&self) -> &str { "Offline" }
///     fn create_session(
///         &mut self,
///         _: PlayerId,
///         _: &SessionName,
///         _: &SessionSettings,
///     ) -> Result<(), ProviderError> {
///         Err(ProviderError::Unavailable)
///     }
///     fn find_sessions(&mut self, _: PlayerId, _: &SessionSearchQuery) -> Result<(), ProviderError> {
///         Err(ProviderError::Unavailable)
///     }
///     fn join_session(
///         &mut self,
///         _: PlayerId,
///         _: &SessionName,
///         _: &SessionSearchResult,
///     ) -> Result<(), ProviderError> {
///         Err(ProviderError::Unavailable)
///     }
///     fn destroy_session(&mut self, _: &SessionName) -> Result<(), ProviderError> {
///         Err(ProviderError::Unavailable)
///     }
///     fn start_session(&mut self, _: &SessionName) -> Result<(), ProviderError> {
///         Err(ProviderError::Unavailable)
///     }
///     fn named_session(&self, _: &SessionName) -> Option<NamedSession> { None }
///     fn resolve_connect_address(&self, _: &SessionName) -> Option<String> { None }
/// }
///
/// assert!(!Offline.is_local_only());
/// ```
pub trait SessionProvider: Send + 'static {
    /// Identifies the backend ("NULL", "Steam", ...).
    fn name(&self) -> &str;

    /// Returns `true` if this is the null/offline provider, which selects
    /// LAN semantics for settings and queries.
    fn is_local_only(&self) -> bool {
        self.name().eq_ignore_ascii_case(NULL_PROVIDER_NAME)
    }

    /// Starts creating a session hosted by `host` under `name`.
    ///
    /// Completes with [`ProviderCompletion::CreateSession`].
    fn create_session(
        &mut self,
        host: PlayerId,
        name: &SessionName,
        settings: &SessionSettings,
    ) -> Result<(), ProviderError>;

    /// Starts a search on behalf of `searcher`.
    ///
    /// Completes with [`ProviderCompletion::FindSessions`].
    fn find_sessions(
        &mut self,
        searcher: PlayerId,
        query: &SessionSearchQuery,
    ) -> Result<(), ProviderError>;

    /// Starts joining `result`, filing it locally under `name`.
    ///
    /// Completes with [`ProviderCompletion::JoinSession`].
    fn join_session(
        &mut self,
        player: PlayerId,
        name: &SessionName,
        result: &SessionSearchResult,
    ) -> Result<(), ProviderError>;

    /// Starts tearing down the session filed under `name`.
    ///
    /// Completes with [`ProviderCompletion::DestroySession`].
    fn destroy_session(&mut self, name: &SessionName) -> Result<(), ProviderError>;

    /// Starts moving the session filed under `name` to in-progress.
    ///
    /// Completes with [`ProviderCompletion::StartSession`].
    fn start_session(&mut self, name: &SessionName) -> Result<(), ProviderError>;

    /// Looks up the session filed under `name`, if there is one.
    fn named_session(&self, name: &SessionName) -> Option<NamedSession>;

    /// Returns the address a client should connect to for `name`.
    fn resolve_connect_address(&self, name: &SessionName) -> Option<String>;
}
