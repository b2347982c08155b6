//! The null provider: sessions on a simulated LAN, entirely in memory.
//!
//! Each process (or each simulated machine in a test) owns one
//! [`NullProvider`]. Providers that should see each other share a
//! [`LanRegistry`], which plays the part of LAN broadcast discovery.
//! Because the provider reports its name as `"NULL"`, the orchestrator
//! builds local-only settings and queries for it.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use lobbyforge_protocol::{
    AttributeValue, JoinResult, NamedSession, PRESENCE_SEARCH_KEY, PlayerId, SessionName,
    SessionSearchQuery, SessionSearchResult, SessionSettings, SessionState,
};
use rand::Rng;

use crate::{CompletionSink, NULL_PROVIDER_NAME, ProviderCompletion, ProviderError, SessionProvider};

// ---------------------------------------------------------------------------
// LanRegistry
// ---------------------------------------------------------------------------

/// A session visible on the simulated LAN.
#[derive(Debug, Clone)]
struct LanAdvert {
    owner: PlayerId,
    host_address: String,
    /// Only the advertised subset of the host's settings.
    settings: SessionSettings,
}

/// Shared table of advertised sessions, keyed by session id.
///
/// Cloning gives another handle to the same table. A `BTreeMap` keeps
/// search results in a stable order.
#[derive(Debug, Clone, Default)]
pub struct LanRegistry {
    adverts: Arc<Mutex<BTreeMap<String, LanAdvert>>>,
}

impl LanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions currently advertised.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn advertise(&self, session_id: &str, advert: LanAdvert) {
        self.lock().insert(session_id.to_string(), advert);
    }

    fn withdraw(&self, session_id: &str) {
        self.lock().remove(session_id);
    }

    fn lookup(&self, session_id: &str) -> Option<LanAdvert> {
        self.lock().get(session_id).cloned()
    }

    fn snapshot(&self) -> Vec<(String, LanAdvert)> {
        self.lock()
            .iter()
            .map(|(id, advert)| (id.clone(), advert.clone()))
            .collect()
    }

    /// A panic while holding the lock can't leave the map half-written
    /// (every critical section is a single map call), so a poisoned lock
    /// is still safe to use.
    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, LanAdvert>> {
        self.adverts.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// ---------------------------------------------------------------------------
// NullProvider
// ---------------------------------------------------------------------------

/// In-memory LAN session provider.
///
/// Every accepted request completes immediately: the completion is pushed
/// onto the sink before the request method returns, and the orchestrator
/// observes it on its next turn.
pub struct NullProvider {
    registry: LanRegistry,
    sink: CompletionSink,
    /// Address other machines connect to when joining a session we host.
    host_address: String,
    /// This machine's named sessions.
    sessions: HashMap<SessionName, NamedSession>,
}

impl NullProvider {
    pub fn new(
        registry: LanRegistry,
        sink: CompletionSink,
        host_address: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            sink,
            host_address: host_address.into(),
            sessions: HashMap::new(),
        }
    }

    /// Number of named sessions on this machine.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn owns(&self, session_id: &str) -> bool {
        self.sessions
            .values()
            .any(|s| s.hosting && s.session_id == session_id)
    }
}

impl SessionProvider for NullProvider {
    fn name(&self) -> &str {
        NULL_PROVIDER_NAME
    }

    fn create_session(
        &mut self,
        host: PlayerId,
        name: &SessionName,
        settings: &SessionSettings,
    ) -> Result<(), ProviderError> {
        if self.sessions.contains_key(name) {
            return Err(ProviderError::Rejected(format!("session {name} already exists")));
        }

        let session = NamedSession {
            name: name.clone(),
            session_id: generate_session_id(),
            owner: host,
            hosting: true,
            state: SessionState::Pending,
            settings: settings.clone(),
            host_address: Some(self.host_address.clone()),
        };

        if settings.flags.should_advertise {
            self.registry.advertise(
                &session.session_id,
                LanAdvert {
                    owner: host,
                    host_address: self.host_address.clone(),
                    settings: settings.advertised(),
                },
            );
        }

        tracing::debug!(
            %name,
            session_id = %session.session_id,
            %host,
            "lan session created"
        );
        self.sessions.insert(name.clone(), session);
        self.sink.complete(ProviderCompletion::CreateSession {
            session: name.clone(),
            success: true,
        });
        Ok(())
    }

    fn find_sessions(
        &mut self,
        searcher: PlayerId,
        query: &SessionSearchQuery,
    ) -> Result<(), ProviderError> {
        let presence = query.get(PRESENCE_SEARCH_KEY);
        let results: Vec<SessionSearchResult> = self
            .registry
            .snapshot()
            .into_iter()
            .filter(|(id, _)| !self.owns(id))
            .filter(|(_, advert)| {
                presence.is_none_or(|filter| {
                    filter.matches(&AttributeValue::Bool(advert.settings.flags.uses_presence))
                })
            })
            .take(query.max_results as usize)
            .map(|(id, advert)| SessionSearchResult {
                session_id: id,
                owner: advert.owner,
                settings: advert.settings,
                ping_ms: Some(0),
            })
            .collect();

        tracing::debug!(%searcher, found = results.len(), "lan search finished");
        self.sink.complete(ProviderCompletion::FindSessions {
            results,
            success: true,
        });
        Ok(())
    }

    fn join_session(
        &mut self,
        player: PlayerId,
        name: &SessionName,
        result: &SessionSearchResult,
    ) -> Result<(), ProviderError> {
        let outcome = if self.sessions.contains_key(name) {
            JoinResult::AlreadyInSession
        } else {
            match self.registry.lookup(&result.session_id) {
                None => JoinResult::SessionDoesNotExist,
                Some(advert) => {
                    self.sessions.insert(
                        name.clone(),
                        NamedSession {
                            name: name.clone(),
                            session_id: result.session_id.clone(),
                            owner: advert.owner,
                            hosting: false,
                            state: SessionState::Pending,
                            settings: advert.settings,
                            host_address: Some(advert.host_address),
                        },
                    );
                    JoinResult::Success
                }
            }
        };

        tracing::debug!(
            %player,
            %name,
            session_id = %result.session_id,
            %outcome,
            "lan join finished"
        );
        self.sink.complete(ProviderCompletion::JoinSession {
            session: name.clone(),
            result: outcome,
        });
        Ok(())
    }

    fn destroy_session(&mut self, name: &SessionName) -> Result<(), ProviderError> {
        let success = match self.sessions.remove(name) {
            Some(session) => {
                if session.hosting {
                    self.registry.withdraw(&session.session_id);
                }
                true
            }
            None => false,
        };

        self.sink.complete(ProviderCompletion::DestroySession {
            session: name.clone(),
            success,
        });
        Ok(())
    }

    fn start_session(&mut self, name: &SessionName) -> Result<(), ProviderError> {
        let success = match self.sessions.get_mut(name) {
            Some(session) if session.state.is_startable() => {
                session.state = SessionState::InProgress;
                true
            }
            _ => false,
        };

        self.sink.complete(ProviderCompletion::StartSession {
            session: name.clone(),
            success,
        });
        Ok(())
    }

    fn named_session(&self, name: &SessionName) -> Option<NamedSession> {
        self.sessions.get(name).cloned()
    }

    fn resolve_connect_address(&self, name: &SessionName) -> Option<String> {
        self.sessions
            .get(name)
            .and_then(|session| session.host_address.clone())
    }
}

/// Generates a random 32-character hex session id (128 bits).
fn generate_session_id() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
