//! Shared data model for Lobbyforge.
//!
//! This crate defines the values that move between the session
//! orchestrator, the session provider, and whatever UI sits on top:
//!
//! - **Identity** ([`PlayerId`], [`SessionName`]): who is asking and
//!   which provider-side session record is meant.
//! - **Requests** ([`SessionSettings`], [`SessionSearchQuery`]): built
//!   fresh for every create/find request.
//! - **Results** ([`SessionSearchResult`], [`JoinResult`]): what comes
//!   back from the provider.
//! - **Provider state** ([`NamedSession`], [`SessionState`], [`NetRole`]).
//!
//! It has no behavior beyond small accessors. Everything derives serde so
//! the types can be logged, stored, or handed to another process.
//!
//! ```text
//! Facade / UI (above)
//!     ↕
//! Session orchestrator  ← builds settings and queries, forwards results
//!     ↕
//! Session provider      ← consumes settings and queries, produces results
//! ```

mod settings;
mod types;

pub use settings::{
    AdvertisementFlags, AdvertisementType, AttributeValue, ComparisonOp, MATCH_TYPE_KEY,
    NamedSession, PRESENCE_SEARCH_KEY, QuerySetting, SessionAttribute, SessionSearchQuery,
    SessionSearchResult, SessionSettings, SessionState,
};
pub use types::{JoinResult, NetRole, OperationKind, PlayerId, SessionName};
