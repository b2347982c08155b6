//! # Lobbyforge
//!
//! Multiplayer session lifecycle orchestration for game clients.
//!
//! Lobbyforge sits between a game's menu and whatever online backend
//! hosts its sessions. Game code asks for a session to be created, found,
//! joined, started, or destroyed; Lobbyforge makes sure only one request
//! of each kind is outstanding, turns the backend's asynchronous
//! completions into notifications, and replaces an existing session when
//! a new one is requested.
//!
//! ## Layers
//!
//! - [`lobbyforge_protocol`]: session settings, search results, ids
//! - [`lobbyforge_provider`]: the
//!   [`SessionProvider`](lobbyforge_provider::SessionProvider) trait and
//!   the in-memory [`NullProvider`](lobbyforge_provider::NullProvider)
//! - [`lobbyforge_session`]: the
//!   [`SessionOrchestrator`](lobbyforge_session::SessionOrchestrator)
//! - this crate: the [`SessionClient`] actor, the [`LobbyMenu`], and
//!   logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lobbyforge::prelude::*;
//!
//! # async fn run() -> Result<(), LobbyforgeError> {
//! let (sink, completions) = completion_channel();
//! let provider = NullProvider::new(LanRegistry::new(), sink, "127.0.0.1:7777");
//! let orchestrator =
//!     SessionOrchestrator::with_provider(provider, PlayerContext::host(PlayerId(1)));
//!
//! let client = SessionClient::spawn(orchestrator, completions);
//! let mut events = client.subscribe();
//! client.request_create(4, "FreeForAll").await?;
//! # let _ = events.recv().await;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod menu;
pub mod telemetry;

pub use client::{SessionClient, SessionEvent};
pub use config::LobbyConfig;
pub use error::LobbyforgeError;
pub use menu::{Controls, LobbyMenu, Travel, find_matching};

pub use lobbyforge_protocol;
pub use lobbyforge_provider;
pub use lobbyforge_session;

/// Everything a game needs to drive sessions.
pub mod prelude {
    pub use crate::{
        Controls, LobbyConfig, LobbyMenu, LobbyforgeError, SessionClient, SessionEvent, Travel,
        find_matching,
    };
    pub use lobbyforge_protocol::{
        JoinResult, MATCH_TYPE_KEY, NamedSession, NetRole, OperationKind, PlayerId, SessionName,
        SessionSearchResult, SessionSettings, SessionState,
    };
    pub use lobbyforge_provider::{
        CompletionSink, CompletionStream, LanRegistry, NullProvider, ProviderCompletion,
        ProviderError, SessionProvider, completion_channel,
    };
    pub use lobbyforge_session::{
        CreateComplete, DestroyComplete, FindComplete, JoinComplete, OrchestratorConfig,
        PlayerContext, SessionError, SessionOrchestrator, StartComplete,
    };
}
