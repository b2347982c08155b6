//! Session client: the orchestrator running as an isolated Tokio task.
//!
//! The orchestrator is single-threaded, so it is moved into one task that
//! owns it outright. The task listens to two inputs at once: commands
//! from [`SessionClient`] handles, and completions from the provider. All
//! five notification channels are bridged onto a single
//! `broadcast` channel of [`SessionEvent`]s that any number of listeners
//! can subscribe to.

use std::sync::Arc;

use lobbyforge_protocol::{NamedSession, SessionSearchResult};
use lobbyforge_provider::{CompletionStream, SessionProvider};
use lobbyforge_session::{
    CreateComplete, DestroyComplete, FindComplete, JoinComplete, NotificationBus, PlayerContext,
    SessionError, SessionOrchestrator, StartComplete,
};
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::LobbyforgeError;

/// Commands a handle can queue before it waits for the client task.
const COMMAND_CHANNEL_SIZE: usize = 32;

/// Events a slow subscriber may fall behind before it starts lagging.
const EVENT_CAPACITY: usize = 64;

/// A completion notification, as seen by subscribers of the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Created(CreateComplete),
    Found(FindComplete),
    Joined(JoinComplete),
    Destroyed(DestroyComplete),
    Started(StartComplete),
}

type Reply = oneshot::Sender<Result<(), SessionError>>;

/// Commands sent to the client task.
///
/// Request variants carry a reply channel for the in-flight guard's
/// verdict. The outcome of the request itself arrives later as a
/// [`SessionEvent`].
enum ClientCommand {
    Create {
        connections: u32,
        match_type: String,
        reply: Reply,
    },
    Find {
        max_results: u32,
        reply: Reply,
    },
    Join {
        result: SessionSearchResult,
        reply: Reply,
    },
    Destroy {
        reply: Reply,
    },
    Start {
        reply: Reply,
    },
    SetPlayer {
        player: PlayerContext,
    },
    CurrentSession {
        reply: oneshot::Sender<Option<NamedSession>>,
    },
    Shutdown,
}

/// Handle to a running session client. Cheap to clone.
///
/// Every `request_*` method returns once the orchestrator has accepted or
/// refused the request; it does not wait for the provider to finish.
#[derive(Clone)]
pub struct SessionClient {
    sender: mpsc::Sender<ClientCommand>,
    events: broadcast::Sender<SessionEvent>,
    /// Attribute key the orchestrator advertises match types under.
    match_type_key: Arc<str>,
}

impl SessionClient {
    /// Moves `orchestrator` into a new task and returns a handle to it.
    ///
    /// `completions` must be the stream paired with the sink the
    /// orchestrator's provider completes into. Must be called from within
    /// a Tokio runtime.
    pub fn spawn<P: SessionProvider>(
        mut orchestrator: SessionOrchestrator<P>,
        completions: CompletionStream,
    ) -> Self {
        let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let match_type_key = Arc::from(orchestrator.config().match_type_key.as_str());
        bridge(orchestrator.notifications_mut(), &events);

        let actor = ClientActor {
            orchestrator,
            completions,
            receiver: rx,
        };
        tokio::spawn(actor.run());

        Self {
            sender: tx,
            events,
            match_type_key,
        }
    }

    /// The key search results carry their match type under, as configured
    /// on the orchestrator this client was spawned with.
    pub fn match_type_key(&self) -> &str {
        &self.match_type_key
    }

    /// Subscribes to completion events.
    ///
    /// Only events fired after this call are received.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Requests a session for `connections` players of `match_type`.
    pub async fn request_create(
        &self,
        connections: u32,
        match_type: impl Into<String>,
    ) -> Result<(), LobbyforgeError> {
        let match_type = match_type.into();
        self.request(|reply| ClientCommand::Create {
            connections,
            match_type,
            reply,
        })
        .await
    }

    /// Requests a search for up to `max_results` sessions.
    pub async fn request_find(&self, max_results: u32) -> Result<(), LobbyforgeError> {
        self.request(|reply| ClientCommand::Find { max_results, reply })
            .await
    }

    /// Requests to join a session from an earlier search.
    pub async fn request_join(&self, result: SessionSearchResult) -> Result<(), LobbyforgeError> {
        self.request(|reply| ClientCommand::Join { result, reply })
            .await
    }

    pub async fn request_destroy(&self) -> Result<(), LobbyforgeError> {
        self.request(|reply| ClientCommand::Destroy { reply }).await
    }

    pub async fn request_start(&self) -> Result<(), LobbyforgeError> {
        self.request(|reply| ClientCommand::Start { reply }).await
    }

    /// Replaces the local player context (fire-and-forget).
    pub async fn set_player_context(&self, player: PlayerContext) -> Result<(), LobbyforgeError> {
        self.sender
            .send(ClientCommand::SetPlayer { player })
            .await
            .map_err(|_| LobbyforgeError::Unavailable)
    }

    /// Looks up the managed session through the provider.
    pub async fn current_session(&self) -> Result<Option<NamedSession>, LobbyforgeError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(ClientCommand::CurrentSession { reply: reply_tx })
            .await
            .map_err(|_| LobbyforgeError::Unavailable)?;
        reply_rx.await.map_err(|_| LobbyforgeError::Unavailable)
    }

    /// Tells the client task to stop. Pending completions are dropped.
    pub async fn shutdown(&self) -> Result<(), LobbyforgeError> {
        self.sender
            .send(ClientCommand::Shutdown)
            .await
            .map_err(|_| LobbyforgeError::Unavailable)
    }

    async fn request(
        &self,
        command: impl FnOnce(Reply) -> ClientCommand,
    ) -> Result<(), LobbyforgeError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(command(reply_tx))
            .await
            .map_err(|_| LobbyforgeError::Unavailable)?;
        reply_rx.await.map_err(|_| LobbyforgeError::Unavailable)??;
        Ok(())
    }
}

/// Forwards every notification channel onto `events`.
fn bridge(bus: &mut NotificationBus, events: &broadcast::Sender<SessionEvent>) {
    let tx = events.clone();
    bus.on_create_complete
        .subscribe(move |e| publish(&tx, SessionEvent::Created(*e)));
    let tx = events.clone();
    bus.on_find_complete
        .subscribe(move |e| publish(&tx, SessionEvent::Found(e.clone())));
    let tx = events.clone();
    bus.on_join_complete
        .subscribe(move |e| publish(&tx, SessionEvent::Joined(e.clone())));
    let tx = events.clone();
    bus.on_destroy_complete
        .subscribe(move |e| publish(&tx, SessionEvent::Destroyed(*e)));
    let tx = events.clone();
    bus.on_start_complete
        .subscribe(move |e| publish(&tx, SessionEvent::Started(*e)));
}

fn publish(tx: &broadcast::Sender<SessionEvent>, event: SessionEvent) {
    // Err only means nobody is subscribed right now.
    if tx.send(event).is_err() {
        tracing::trace!("session event dropped, no subscribers");
    }
}

/// The task-side state. Owns the orchestrator exclusively.
struct ClientActor<P: SessionProvider> {
    orchestrator: SessionOrchestrator<P>,
    completions: CompletionStream,
    receiver: mpsc::Receiver<ClientCommand>,
}

impl<P: SessionProvider> ClientActor<P> {
    /// Runs until shutdown or until every handle is dropped.
    async fn run(mut self) {
        let player = self.orchestrator.player();
        tracing::info!(
            player_id = %player.player_id,
            role = %player.role,
            "session client started"
        );

        let mut completions_open = true;
        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    let Some(cmd) = cmd else { break };
                    if !self.handle_command(cmd) {
                        break;
                    }
                }
                completion = self.completions.recv(), if completions_open => {
                    match completion {
                        Some(completion) => {
                            self.orchestrator.handle_completion(completion);
                        }
                        None => {
                            tracing::warn!("provider completion stream closed");
                            completions_open = false;
                        }
                    }
                }
            }
        }

        tracing::info!(player_id = %player.player_id, "session client stopped");
    }

    /// Applies one command. Returns `false` when the task should stop.
    fn handle_command(&mut self, cmd: ClientCommand) -> bool {
        match cmd {
            ClientCommand::Create {
                connections,
                match_type,
                reply,
            } => {
                let result = self.orchestrator.create_session(connections, &match_type);
                let _ = reply.send(result);
            }
            ClientCommand::Find { max_results, reply } => {
                let _ = reply.send(self.orchestrator.find_sessions(max_results));
            }
            ClientCommand::Join { result, reply } => {
                let _ = reply.send(self.orchestrator.join_session(&result));
            }
            ClientCommand::Destroy { reply } => {
                let _ = reply.send(self.orchestrator.destroy_session());
            }
            ClientCommand::Start { reply } => {
                let _ = reply.send(self.orchestrator.start_session());
            }
            ClientCommand::SetPlayer { player } => {
                self.orchestrator.set_player_context(player);
            }
            ClientCommand::CurrentSession { reply } => {
                let _ = reply.send(self.orchestrator.current_session());
            }
            ClientCommand::Shutdown => {
                tracing::info!("session client shutting down");
                return false;
            }
        }
        true
    }
}
