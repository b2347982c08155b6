//! Session lifecycle orchestration for Lobbyforge.
//!
//! This crate sits between UI code and a [`SessionProvider`]:
//!
//! 1. **Requests**: [`SessionOrchestrator`] turns "create / find / join /
//!    destroy / start" into provider calls, allowing one request of each
//!    kind in flight at a time.
//! 2. **Completions**: provider results are fed back through
//!    [`SessionOrchestrator::handle_completion`] and re-broadcast on the
//!    [`NotificationBus`].
//! 3. **Recovery**: asking to create a session while one already exists
//!    destroys the old one first and recreates once the destroy succeeds.
//!
//! # How it fits in the stack
//!
//! ```text
//! Facade / UI (above)      ← calls requests, subscribes to the bus
//!     ↕
//! Orchestrator (this crate)
//!     ↕
//! Provider (below)         ← does the real work, completes later
//! ```
//!
//! The orchestrator is a plain single-owner state machine. It does no
//! I/O and never blocks; whoever owns it (normally the `lobbyforge`
//! client task) decides when completions are handed in.
//!
//! [`SessionProvider`]: lobbyforge_provider::SessionProvider

mod config;
mod error;
mod notify;
mod orchestrator;
mod state;

pub use config::{OrchestratorConfig, PlayerContext};
pub use error::SessionError;
pub use notify::{
    CreateComplete, DestroyComplete, EventChannel, FindComplete, JoinComplete, NotificationBus,
    StartComplete, SubscriptionId,
};
pub use orchestrator::SessionOrchestrator;
pub use state::{InFlight, PendingOperationState};
