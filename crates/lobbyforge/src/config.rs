//! Lobby menu configuration.

use serde::{Deserialize, Serialize};

use crate::LobbyforgeError;

/// What the lobby menu hosts and where it sends players.
///
/// Any field missing from a JSON document falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LobbyConfig {
    /// Public slots on a hosted session.
    pub public_connections: u32,

    /// Match type advertised when hosting and required when joining.
    pub match_type: String,

    /// Map the host travels to once its session is created.
    pub lobby_path: String,

    /// Map the host travels to once its session is started.
    pub level_path: String,

    /// Result cap for the join button's search.
    pub search_max_results: u32,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            public_connections: 4,
            match_type: "FreeForAll".to_string(),
            lobby_path: "/Game/Maps/Lobby".to_string(),
            level_path: "/Game/Maps/Level".to_string(),
            search_max_results: 1_000_000_000,
        }
    }
}

impl LobbyConfig {
    /// Parses a config from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, LobbyforgeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The lobby map opened as a listen server.
    pub fn listen_url(&self) -> String {
        format!("{}?listen", self.lobby_path)
    }
}
