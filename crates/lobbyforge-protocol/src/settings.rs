//! Session settings, search queries, and the provider's session records.
//!
//! Settings and queries are built fresh for every request and never
//! mutated after they are handed to a provider. Attributes are kept in a
//! `BTreeMap` so iteration order (and therefore logs and JSON) is stable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{PlayerId, SessionName};

/// Attribute key under which a session advertises its match type.
pub const MATCH_TYPE_KEY: &str = "MatchType";

/// Query key that restricts a search to presence-based sessions.
pub const PRESENCE_SEARCH_KEY: &str = "PRESENCESEARCH";

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

/// A single advertised attribute value.
///
/// `#[serde(tag = "type", content = "value")]` keeps the JSON readable:
/// `{ "type": "String", "value": "FreeForAll" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum AttributeValue {
    String(String),
    Int(i64),
    Bool(bool),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for AttributeValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

/// Where an attribute is visible to other players.
///
/// Only advertised attributes show up in search results; anything else
/// stays on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AdvertisementType {
    #[default]
    DontAdvertise,
    ViaPingOnly,
    ViaOnlineService,
    ViaOnlineServiceAndPing,
}

impl AdvertisementType {
    pub fn is_advertised(&self) -> bool {
        !matches!(self, Self::DontAdvertise)
    }
}

/// An attribute value together with its advertisement scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAttribute {
    pub value: AttributeValue,
    pub advertisement: AdvertisementType,
}

// ---------------------------------------------------------------------------
// SessionSettings
// ---------------------------------------------------------------------------

/// Capability flags a hosted session advertises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AdvertisementFlags {
    /// Other players may join through the host's presence.
    pub allow_join_via_presence: bool,
    /// The session shows up in normal searches.
    pub should_advertise: bool,
    /// The session is published through the player's presence.
    pub uses_presence: bool,
    /// Prefer lobby sessions where the backend offers them.
    pub use_lobbies_if_available: bool,
}

impl AdvertisementFlags {
    /// Everything on: what a publicly hosted lobby needs.
    pub fn public_lobby() -> Self {
        Self {
            allow_join_via_presence: true,
            should_advertise: true,
            uses_presence: true,
            use_lobbies_if_available: true,
        }
    }
}

/// Settings for a session about to be created.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionSettings {
    /// LAN/offline semantics instead of an online backend.
    pub is_local_only: bool,
    /// Number of public player slots.
    pub max_public_connections: u32,
    /// Whether players may join after the session started.
    pub allow_join_in_progress: bool,
    pub flags: AdvertisementFlags,
    pub attributes: BTreeMap<String, SessionAttribute>,
}

impl SessionSettings {
    /// Sets (or replaces) an attribute.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
        advertisement: AdvertisementType,
    ) {
        self.attributes.insert(
            key.into(),
            SessionAttribute {
                value: value.into(),
                advertisement,
            },
        );
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key).map(|attr| &attr.value)
    }

    /// Returns a string attribute, or `None` if absent or not a string.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(AttributeValue::as_str)
    }

    /// The subset of these settings other players can see.
    pub fn advertised(&self) -> Self {
        Self {
            attributes: self
                .attributes
                .iter()
                .filter(|(_, attr)| attr.advertisement.is_advertised())
                .map(|(key, attr)| (key.clone(), attr.clone()))
                .collect(),
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// SessionSearchQuery
// ---------------------------------------------------------------------------

/// How a query filter compares against a session's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ComparisonOp {
    #[default]
    Equals,
    NotEquals,
}

/// One filter of a search query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySetting {
    pub value: AttributeValue,
    pub op: ComparisonOp,
}

impl QuerySetting {
    /// Returns `true` if `candidate` satisfies this filter.
    pub fn matches(&self, candidate: &AttributeValue) -> bool {
        match self.op {
            ComparisonOp::Equals => *candidate == self.value,
            ComparisonOp::NotEquals => *candidate != self.value,
        }
    }
}

/// Parameters of a session search.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionSearchQuery {
    pub max_results: u32,
    pub is_local_only: bool,
    pub filters: BTreeMap<String, QuerySetting>,
}

impl SessionSearchQuery {
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
        op: ComparisonOp,
    ) {
        self.filters.insert(
            key.into(),
            QuerySetting {
                value: value.into(),
                op,
            },
        );
    }

    pub fn get(&self, key: &str) -> Option<&QuerySetting> {
        self.filters.get(key)
    }
}

// ---------------------------------------------------------------------------
// SessionSearchResult
// ---------------------------------------------------------------------------

/// A session discovered by a search.
///
/// Consumers only look at the advertised attributes (to compare match
/// types) and pass the whole value back into a join request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSearchResult {
    /// Provider-assigned id of the remote session.
    pub session_id: String,
    /// The hosting player.
    pub owner: PlayerId,
    /// Advertised settings of the remote session.
    pub settings: SessionSettings,
    /// Round-trip estimate, when the provider measures one.
    pub ping_ms: Option<u32>,
}

impl SessionSearchResult {
    /// Shorthand for the advertised match type, if any.
    pub fn match_type(&self) -> Option<&str> {
        self.settings.get_string(MATCH_TYPE_KEY)
    }
}

// ---------------------------------------------------------------------------
// NamedSession
// ---------------------------------------------------------------------------

/// Provider-side lifecycle of a named session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    Pending,
    Starting,
    InProgress,
    Ending,
    Ended,
    Destroying,
}

impl SessionState {
    /// Returns `true` if the session may move to `InProgress`.
    pub fn is_startable(&self) -> bool {
        matches!(self, Self::Pending | Self::Ended)
    }
}

/// A session record as the provider keeps it under a [`SessionName`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedSession {
    pub name: SessionName,
    pub session_id: String,
    pub owner: PlayerId,
    /// `true` on the host, `false` on players who joined.
    pub hosting: bool,
    pub state: SessionState,
    pub settings: SessionSettings,
    /// Address clients connect to, once known.
    pub host_address: Option<String>,
}
