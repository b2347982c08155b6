//! The lobby menu: host, join, and start buttons wired to a
//! [`SessionClient`].
//!
//! The menu renders nothing. It tracks which buttons are enabled, turns
//! button presses into requests, and turns [`SessionEvent`]s into either a
//! [`Travel`] instruction or a re-enabled button.
//!
//! ```text
//! host()  → create ──Created(true)──→ Travel::Server(lobby?listen)
//! join()  → find ──Found(match)──→ join ──Joined(Success)──→ Travel::Client(addr)
//! start() → start ──Started(true)──→ Travel::Server(level)
//! ```

use lobbyforge_protocol::SessionSearchResult;

use crate::{LobbyConfig, LobbyforgeError, SessionClient, SessionEvent};

/// Which menu buttons are clickable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub host: bool,
    pub join: bool,
    pub start: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            host: true,
            join: true,
            start: true,
        }
    }
}

/// Where the game should go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Travel {
    /// Load a map as the server, taking connected clients along.
    Server(String),
    /// Connect to a remote server at this absolute address.
    Client(String),
}

/// Returns the first result advertising `match_type` under `key`.
pub fn find_matching<'a>(
    results: &'a [SessionSearchResult],
    key: &str,
    match_type: &str,
) -> Option<&'a SessionSearchResult> {
    results
        .iter()
        .find(|r| r.settings.get_string(key) == Some(match_type))
}

/// Menu state for one local player.
pub struct LobbyMenu {
    client: SessionClient,
    config: LobbyConfig,
    controls: Controls,
}

impl LobbyMenu {
    pub fn new(client: SessionClient, config: LobbyConfig) -> Self {
        Self {
            client,
            config,
            controls: Controls::default(),
        }
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }

    pub fn config(&self) -> &LobbyConfig {
        &self.config
    }

    pub fn client(&self) -> &SessionClient {
        &self.client
    }

    /// Host button: disables itself and requests a session.
    ///
    /// If the request is refused outright the button comes back on.
    pub async fn host(&mut self) -> Result<(), LobbyforgeError> {
        self.controls.host = false;
        let result = self
            .client
            .request_create(self.config.public_connections, self.config.match_type.as_str())
            .await;
        if result.is_err() {
            self.controls.host = true;
        }
        result
    }

    /// Join button: disables itself and searches for sessions.
    pub async fn join(&mut self) -> Result<(), LobbyforgeError> {
        self.controls.join = false;
        let result = self.client.request_find(self.config.search_max_results).await;
        if result.is_err() {
            self.controls.join = true;
        }
        result
    }

    /// Start button: disables itself and asks to start the session.
    pub async fn start(&mut self) -> Result<(), LobbyforgeError> {
        self.controls.start = false;
        let result = self.client.request_start().await;
        if result.is_err() {
            self.controls.start = true;
        }
        result
    }

    /// Reacts to one event. Returns where to travel, if anywhere.
    ///
    /// A successful search with a matching session chains straight into a
    /// join request; the join button stays disabled until that join
    /// resolves.
    pub async fn handle_event(
        &mut self,
        event: &SessionEvent,
    ) -> Result<Option<Travel>, LobbyforgeError> {
        match event {
            SessionEvent::Created(e) => {
                if e.success {
                    tracing::info!(
                        lobby = %self.config.lobby_path,
                        "session created, opening lobby"
                    );
                    return Ok(Some(Travel::Server(self.config.listen_url())));
                }
                tracing::warn!("failed to create session");
                self.controls.host = true;
            }
            SessionEvent::Found(e) => {
                if !e.success {
                    tracing::warn!("error trying to find sessions");
                    self.controls.join = true;
                    return Ok(None);
                }
                let matching = find_matching(
                    &e.results,
                    self.client.match_type_key(),
                    &self.config.match_type,
                );
                let Some(result) = matching else {
                    tracing::info!(
                        found = e.results.len(),
                        match_type = %self.config.match_type,
                        "no matching session found"
                    );
                    self.controls.join = true;
                    return Ok(None);
                };
                tracing::info!(session_id = %result.session_id, "joining session");
                if let Err(e) = self.client.request_join(result.clone()).await {
                    self.controls.join = true;
                    return Err(e);
                }
            }
            SessionEvent::Joined(e) => {
                if e.result.is_success() {
                    tracing::info!(address = %e.address, "joined session, travelling");
                    return Ok(Some(Travel::Client(e.address.clone())));
                }
                tracing::warn!(result = %e.result, "failed to join session");
                self.controls.join = true;
            }
            SessionEvent::Destroyed(_) => {}
            SessionEvent::Started(e) => {
                if e.success {
                    tracing::info!(level = %self.config.level_path, "session started");
                    return Ok(Some(Travel::Server(self.config.level_path.clone())));
                }
                self.controls.start = true;
            }
        }
        Ok(None)
    }
}
