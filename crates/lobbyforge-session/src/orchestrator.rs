//! The session orchestrator: one request of each kind at a time, provider
//! completions turned into notifications, and destroy-then-recreate when a
//! create arrives while a session already exists.
//!
//! # Per-kind lifecycle
//!
//! ```text
//! Idle ──request──→ provider call ──accepted──→ AwaitingCompletion
//!  ↑                     │                              │
//!  │                  rejected                     completion
//!  │                     ▼                              ▼
//!  └───────────── notification fired ←──────────────────┘
//! ```
//!
//! Each kind moves through this independently. A second request of a kind
//! that is still awaiting completion is refused with
//! [`SessionError::OperationInFlight`].
//!
//! # Recreate on create
//!
//! ```text
//! create_session() with a session present
//!   → stash (connections, match type), notify create(false)
//!   → destroy_session()
//!        ... DestroySession { success: true } arrives
//!   → notify destroy(true)
//!   → create_session(stashed)   ← the real create
//! ```
//!
//! # Concurrency note
//!
//! Not thread-safe and not meant to be: one owner drives it, and that
//! owner feeds in completions on the same task it issues requests from.

use lobbyforge_protocol::{
    AdvertisementFlags, AdvertisementType, ComparisonOp, JoinResult, NamedSession, OperationKind,
    PRESENCE_SEARCH_KEY, PlayerId, SessionName, SessionSearchQuery, SessionSearchResult,
    SessionSettings,
};
use lobbyforge_provider::{ProviderCompletion, ProviderError, SessionProvider};

use crate::{
    CreateComplete, DestroyComplete, FindComplete, InFlight, JoinComplete, NotificationBus,
    OrchestratorConfig, PendingOperationState, PlayerContext, SessionError, StartComplete,
};

/// Drives a [`SessionProvider`] on behalf of one local player.
pub struct SessionOrchestrator<P: SessionProvider> {
    /// `None` when no provider could be loaded. Every request then takes
    /// its documented no-provider path.
    provider: Option<P>,
    player: PlayerContext,
    config: OrchestratorConfig,
    pending: PendingOperationState,
    in_flight: InFlight,
    notifications: NotificationBus,
}

impl<P: SessionProvider> SessionOrchestrator<P> {
    pub fn new(provider: Option<P>, player: PlayerContext, config: OrchestratorConfig) -> Self {
        Self {
            provider,
            player,
            config,
            pending: PendingOperationState::default(),
            in_flight: InFlight::default(),
            notifications: NotificationBus::new(),
        }
    }

    /// An orchestrator with the default config.
    pub fn with_provider(provider: P, player: PlayerContext) -> Self {
        Self::new(Some(provider), player, OrchestratorConfig::default())
    }

    // -- Accessors --------------------------------------------------------

    pub fn provider(&self) -> Option<&P> {
        self.provider.as_ref()
    }

    pub fn provider_mut(&mut self) -> Option<&mut P> {
        self.provider.as_mut()
    }

    pub fn player(&self) -> PlayerContext {
        self.player
    }

    /// Replaces the local player context, e.g. after the role changed.
    pub fn set_player_context(&mut self, player: PlayerContext) {
        tracing::debug!(
            player_id = %player.player_id,
            role = %player.role,
            "player context updated"
        );
        self.player = player;
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn pending(&self) -> &PendingOperationState {
        &self.pending
    }

    /// Returns `true` if a request of `kind` is awaiting its completion.
    pub fn is_in_flight(&self, kind: OperationKind) -> bool {
        self.in_flight.contains(kind)
    }

    pub fn notifications(&self) -> &NotificationBus {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationBus {
        &mut self.notifications
    }

    /// Asks the provider for the session this orchestrator manages.
    ///
    /// Always a fresh lookup; existence is never cached here.
    pub fn current_session(&self) -> Option<NamedSession> {
        self.provider
            .as_ref()
            .and_then(|p| p.named_session(&self.config.session_name))
    }

    /// `true` when the active provider is the null/offline one.
    /// Re-evaluated for every create and find.
    pub fn is_local_only(&self) -> bool {
        self.provider.as_ref().is_some_and(|p| p.is_local_only())
    }

    // -- Requests ---------------------------------------------------------

    /// Requests a new session advertising `match_type` for up to
    /// `connections` players.
    ///
    /// If a session already exists, nothing is created yet: subscribers
    /// get `CreateComplete { success: false }` right away, the old
    /// session is destroyed, and the create is replayed once that destroy
    /// succeeds. With no provider this does nothing at all.
    ///
    /// # Errors
    /// [`SessionError::OperationInFlight`] if a create is still pending.
    pub fn create_session(
        &mut self,
        connections: u32,
        match_type: &str,
    ) -> Result<(), SessionError> {
        let Some(provider) = self.provider.as_ref() else {
            tracing::error!("no session provider, create ignored");
            return Ok(());
        };
        self.in_flight.ensure_idle(OperationKind::Create)?;

        if let Some(existing) = provider.named_session(&self.config.session_name) {
            tracing::info!(
                session = %existing.name,
                session_id = %existing.session_id,
                "destroying current session to create a new one"
            );
            self.pending.stash_create(connections, match_type);
            self.notifications
                .on_create_complete
                .broadcast(&CreateComplete { success: false });
            if let Err(e) = self.destroy_session() {
                // The destroy already underway will replay the stash.
                tracing::debug!(error = %e, "recreate rides on pending destroy");
            }
            return Ok(());
        }

        let settings = self.build_settings(provider.is_local_only(), connections, match_type);
        tracing::info!(
            match_type,
            connections,
            local_only = settings.is_local_only,
            "creating session"
        );

        let accepted = self.issue(OperationKind::Create, |p, host, name| {
            p.create_session(host, name, &settings)
        })?;
        if !accepted {
            self.notifications
                .on_create_complete
                .broadcast(&CreateComplete { success: false });
        }
        Ok(())
    }

    /// Searches for up to `max_results` sessions.
    ///
    /// Every result the provider returns is forwarded; picking one by
    /// match type is up to the subscriber.
    ///
    /// # Errors
    /// [`SessionError::OperationInFlight`] if a search is still pending.
    pub fn find_sessions(&mut self, max_results: u32) -> Result<(), SessionError> {
        let Some(provider) = self.provider.as_ref() else {
            tracing::error!("no session provider, search failed");
            self.broadcast_find_failed();
            return Ok(());
        };
        self.in_flight.ensure_idle(OperationKind::Find)?;

        let query = build_query(provider.is_local_only(), max_results);
        tracing::info!(
            max_results,
            local_only = query.is_local_only,
            "finding sessions"
        );

        let accepted = self.issue(OperationKind::Find, |p, searcher, _| {
            p.find_sessions(searcher, &query)
        })?;
        if !accepted {
            self.broadcast_find_failed();
        }
        Ok(())
    }

    /// Tries to join a session found by an earlier search.
    ///
    /// # Errors
    /// [`SessionError::OperationInFlight`] if a join is still pending.
    pub fn join_session(&mut self, result: &SessionSearchResult) -> Result<(), SessionError> {
        if self.provider.is_none() {
            tracing::error!("no session provider, join failed");
            self.broadcast_join_failed();
            return Ok(());
        }
        self.in_flight.ensure_idle(OperationKind::Join)?;

        tracing::info!(
            session_id = %result.session_id,
            owner = %result.owner,
            "joining session"
        );
        let accepted = self.issue(OperationKind::Join, |p, player, name| {
            p.join_session(player, name, result)
        })?;
        if !accepted {
            self.broadcast_join_failed();
        }
        Ok(())
    }

    /// Tears down the current session.
    ///
    /// # Errors
    /// [`SessionError::OperationInFlight`] if a destroy is still pending.
    pub fn destroy_session(&mut self) -> Result<(), SessionError> {
        if self.provider.is_none() {
            tracing::error!("no session provider, destroy failed");
            self.notifications
                .on_destroy_complete
                .broadcast(&DestroyComplete { success: false });
            return Ok(());
        }
        self.in_flight.ensure_idle(OperationKind::Destroy)?;

        tracing::info!(session = %self.config.session_name, "destroying session");
        let accepted = self.issue(OperationKind::Destroy, |p, _, name| {
            p.destroy_session(name)
        })?;
        if !accepted {
            self.notifications
                .on_destroy_complete
                .broadcast(&DestroyComplete { success: false });
        }
        Ok(())
    }

    /// Moves the current session to in-progress. Host only.
    ///
    /// With no session, or when the local player isn't the authority,
    /// nothing reaches the provider and no notification fires; the
    /// refusal is only logged.
    ///
    /// # Errors
    /// [`SessionError::OperationInFlight`] if a start is still pending.
    pub fn start_session(&mut self) -> Result<(), SessionError> {
        if self.provider.is_none() {
            tracing::error!("no session provider, start ignored");
            return Ok(());
        }
        self.in_flight.ensure_idle(OperationKind::Start)?;

        let Some(session) = self.current_session() else {
            tracing::warn!("cannot start session: no session created or joined");
            return Ok(());
        };
        if !self.player.role.is_authority() {
            tracing::warn!(
                session = %session.name,
                role = %self.player.role,
                "cannot start session: local player lacks authority"
            );
            return Ok(());
        }

        tracing::info!(session = %session.name, "starting session");
        let accepted = self.issue(OperationKind::Start, |p, _, name| {
            p.start_session(name)
        })?;
        if !accepted {
            self.notifications
                .on_start_complete
                .broadcast(&StartComplete { success: false });
        }
        Ok(())
    }

    // -- Completions ------------------------------------------------------

    /// Feeds a provider completion back in.
    ///
    /// Clears the in-flight mark for its kind and fires exactly one
    /// notification. A completion for a kind with nothing in flight has
    /// no listener and is dropped.
    pub fn handle_completion(&mut self, completion: ProviderCompletion) {
        let kind = completion.kind();
        if !self.in_flight.clear(kind) {
            tracing::warn!(%kind, "completion with no request in flight, ignoring");
            return;
        }

        match completion {
            ProviderCompletion::CreateSession { session, success } => {
                tracing::info!(%session, success, "create session complete");
                self.notifications
                    .on_create_complete
                    .broadcast(&CreateComplete { success });
            }
            ProviderCompletion::FindSessions { results, success } => {
                tracing::info!(
                    found = results.len(),
                    success,
                    "find sessions complete"
                );
                self.notifications
                    .on_find_complete
                    .broadcast(&FindComplete { results, success });
            }
            ProviderCompletion::JoinSession { session, result } => {
                let event = self.resolve_join(&session, result);
                tracing::info!(
                    %session,
                    result = %event.result,
                    address = %event.address,
                    "join session complete"
                );
                self.notifications.on_join_complete.broadcast(&event);
            }
            ProviderCompletion::DestroySession { session, success } => {
                if success {
                    tracing::info!(%session, "session destroyed");
                } else {
                    tracing::warn!(%session, "failed to destroy session");
                }
                self.notifications
                    .on_destroy_complete
                    .broadcast(&DestroyComplete { success });

                // A failed destroy keeps the stash for a manual retry, and so
                // does a replay the in-flight guard turns away.
                if success {
                    if let Some((connections, match_type)) = self.pending.take_create() {
                        if let Err(e) = self.create_session(connections, &match_type) {
                            tracing::warn!(
                                error = %e,
                                "recreate after destroy refused, still pending"
                            );
                            self.pending.stash_create(connections, &match_type);
                        }
                    }
                }
            }
            ProviderCompletion::StartSession { session, success } => {
                if success {
                    tracing::info!(%session, "session started");
                } else {
                    tracing::warn!(%session, "failed to start session");
                }
                self.notifications
                    .on_start_complete
                    .broadcast(&StartComplete { success });
            }
        }
    }

    // -- Internals --------------------------------------------------------

    /// Registers `kind` as in flight and makes the provider call.
    ///
    /// Returns `Ok(true)` if the provider accepted the request and
    /// `Ok(false)` if it rejected it (the mark is cleared again; the
    /// caller fires the failure notification).
    fn issue<F>(&mut self, kind: OperationKind, request: F) -> Result<bool, SessionError>
    where
        F: FnOnce(&mut P, PlayerId, &SessionName) -> Result<(), ProviderError>,
    {
        let Some(provider) = self.provider.as_mut() else {
            return Ok(false);
        };
        self.in_flight.register(kind)?;

        match request(provider, self.player.player_id, &self.config.session_name) {
            Ok(()) => {
                tracing::debug!(%kind, "request accepted by provider");
                Ok(true)
            }
            Err(error) => {
                self.in_flight.clear(kind);
                tracing::warn!(%kind, %error, "provider rejected request");
                Ok(false)
            }
        }
    }

    fn build_settings(
        &self,
        is_local_only: bool,
        connections: u32,
        match_type: &str,
    ) -> SessionSettings {
        let mut settings = SessionSettings {
            is_local_only,
            max_public_connections: connections,
            allow_join_in_progress: true,
            flags: AdvertisementFlags::public_lobby(),
            ..SessionSettings::default()
        };
        settings.set(
            self.config.match_type_key.as_str(),
            match_type,
            AdvertisementType::ViaOnlineServiceAndPing,
        );
        settings
    }

    /// Builds the join notification. The provider's result passes through
    /// as-is, except that a "success" without a usable address can't be
    /// travelled to and is reported as `CouldNotRetrieveAddress`.
    fn resolve_join(&self, session: &SessionName, result: JoinResult) -> JoinComplete {
        let address = self
            .provider
            .as_ref()
            .and_then(|p| p.resolve_connect_address(session))
            .filter(|address| !address.is_empty());

        match (result, address) {
            (JoinResult::Success, None) => {
                tracing::warn!(%session, "joined but no connect address resolved");
                JoinComplete {
                    address: String::new(),
                    result: JoinResult::CouldNotRetrieveAddress,
                }
            }
            (result, address) => JoinComplete {
                address: address.unwrap_or_default(),
                result,
            },
        }
    }

    fn broadcast_find_failed(&self) {
        self.notifications.on_find_complete.broadcast(&FindComplete {
            results: Vec::new(),
            success: false,
        });
    }

    fn broadcast_join_failed(&self) {
        self.notifications.on_join_complete.broadcast(&JoinComplete {
            address: String::new(),
            result: JoinResult::UnknownError,
        });
    }
}

/// Builds the query for a presence search.
fn build_query(is_local_only: bool, max_results: u32) -> SessionSearchQuery {
    let mut query = SessionSearchQuery {
        max_results,
        is_local_only,
        ..SessionSearchQuery::default()
    };
    query.set(PRESENCE_SEARCH_KEY, true, ComparisonOp::Equals);
    query
}
