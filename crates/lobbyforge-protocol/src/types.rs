//! Identity and outcome types.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a local or remote player.
///
/// Newtype wrapper so it can't be confused with connection counts or
/// result limits, which are also plain integers. Serializes as the bare
/// number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// The name a provider files a session under.
///
/// The orchestrator never holds the session itself, only this key. Whether
/// the session exists is always asked of the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionName(String);

impl SessionName {
    /// Name of the game session every request targets by default.
    pub const GAME: &'static str = "GameSession";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The default game session name.
    pub fn game() -> Self {
        Self::new(Self::GAME)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionName {
    fn default() -> Self {
        Self::game()
    }
}

impl From<&str> for SessionName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for SessionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// OperationKind
// ---------------------------------------------------------------------------

/// The five asynchronous operations a session provider performs.
///
/// Each kind is tracked independently: at most one request of a kind may
/// be awaiting completion, but different kinds can overlap freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OperationKind {
    Create,
    Find,
    Join,
    Destroy,
    Start,
}

impl OperationKind {
    /// Every kind, in declaration order.
    pub const ALL: [OperationKind; 5] = [
        Self::Create,
        Self::Find,
        Self::Join,
        Self::Destroy,
        Self::Start,
    ];
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Find => write!(f, "find"),
            Self::Join => write!(f, "join"),
            Self::Destroy => write!(f, "destroy"),
            Self::Start => write!(f, "start"),
        }
    }
}

// ---------------------------------------------------------------------------
// JoinResult
// ---------------------------------------------------------------------------

/// Outcome of a join attempt, as reported by the provider.
///
/// The orchestrator passes this through to subscribers untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinResult {
    Success,
    SessionIsFull,
    SessionDoesNotExist,
    CouldNotRetrieveAddress,
    AlreadyInSession,
    UnknownError,
}

impl JoinResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for JoinResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "Success"),
            Self::SessionIsFull => write!(f, "SessionIsFull"),
            Self::SessionDoesNotExist => write!(f, "SessionDoesNotExist"),
            Self::CouldNotRetrieveAddress => {
                write!(f, "CouldNotRetrieveAddress")
            }
            Self::AlreadyInSession => write!(f, "AlreadyInSession"),
            Self::UnknownError => write!(f, "UnknownError"),
        }
    }
}

// ---------------------------------------------------------------------------
// NetRole
// ---------------------------------------------------------------------------

/// Network role of the local participant.
///
/// Only [`NetRole::Authority`] (the host) may start a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NetRole {
    #[default]
    None,
    SimulatedProxy,
    AutonomousProxy,
    Authority,
}

impl NetRole {
    pub fn is_authority(&self) -> bool {
        matches!(self, Self::Authority)
    }
}

impl fmt::Display for NetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::SimulatedProxy => write!(f, "SimulatedProxy"),
            Self::AutonomousProxy => write!(f, "AutonomousProxy"),
            Self::Authority => write!(f, "Authority"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&PlayerId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_player_id_display() {
        assert_eq!(PlayerId(7).to_string(), "P-7");
    }

    #[test]
    fn test_session_name_defaults_to_game_session() {
        assert_eq!(SessionName::default().as_str(), "GameSession");
        assert_eq!(SessionName::game(), SessionName::from("GameSession"));
    }

    #[test]
    fn test_session_name_serializes_as_plain_string() {
        let json = serde_json::to_string(&SessionName::game()).unwrap();
        assert_eq!(json, "\"GameSession\"");
    }

    #[test]
    fn test_operation_kind_display_and_all() {
        let names: Vec<String> = OperationKind::ALL.iter().map(|k| k.to_string()).collect();
        assert_eq!(names, ["create", "find", "join", "destroy", "start"]);
    }

    #[test]
    fn test_join_result_only_success_is_success() {
        assert!(JoinResult::Success.is_success());
        assert!(!JoinResult::SessionIsFull.is_success());
        assert!(!JoinResult::CouldNotRetrieveAddress.is_success());
        assert!(!JoinResult::UnknownError.is_success());
    }

    #[test]
    fn test_net_role_default_is_not_authority() {
        assert!(!NetRole::default().is_authority());
        assert!(NetRole::Authority.is_authority());
        assert!(!NetRole::AutonomousProxy.is_authority());
    }
}
