//! Orchestrator configuration and the injected local-player context.

use lobbyforge_protocol::{MATCH_TYPE_KEY, NetRole, PlayerId, SessionName};
use serde::{Deserialize, Serialize};

/// Settings that stay fixed for the lifetime of an orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// The provider-side name every request targets.
    ///
    /// Default: `"GameSession"`.
    pub session_name: SessionName,

    /// Attribute key the match type is advertised under.
    ///
    /// Default: `"MatchType"`.
    pub match_type_key: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            session_name: SessionName::game(),
            match_type_key: MATCH_TYPE_KEY.to_string(),
        }
    }
}

/// Who the local player is and what network role they currently hold.
///
/// Passed into the orchestrator explicitly instead of being looked up
/// from global state. Update it with
/// [`SessionOrchestrator::set_player_context`](crate::SessionOrchestrator::set_player_context)
/// when the role changes (for example after travelling to a lobby).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerContext {
    pub player_id: PlayerId,
    pub role: NetRole,
}

impl PlayerContext {
    /// A local player acting as host.
    pub fn host(player_id: PlayerId) -> Self {
        Self {
            player_id,
            role: NetRole::Authority,
        }
    }

    /// A local player connected to someone else's session.
    pub fn client(player_id: PlayerId) -> Self {
        Self {
            player_id,
            role: NetRole::AutonomousProxy,
        }
    }
}
