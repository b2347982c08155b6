//! Completions: how a provider reports that an accepted request finished.

use lobbyforge_protocol::{JoinResult, OperationKind, SessionName, SessionSearchResult};
use tokio::sync::mpsc;

/// The outcome of one accepted provider request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCompletion {
    CreateSession {
        session: SessionName,
        success: bool,
    },
    /// `results` is everything the search produced, unfiltered.
    FindSessions {
        results: Vec<SessionSearchResult>,
        success: bool,
    },
    JoinSession {
        session: SessionName,
        result: JoinResult,
    },
    DestroySession {
        session: SessionName,
        success: bool,
    },
    StartSession {
        session: SessionName,
        success: bool,
    },
}

impl ProviderCompletion {
    /// Which operation this completes.
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::CreateSession { .. } => OperationKind::Create,
            Self::FindSessions { .. } => OperationKind::Find,
            Self::JoinSession { .. } => OperationKind::Join,
            Self::DestroySession { .. } => OperationKind::Destroy,
            Self::StartSession { .. } => OperationKind::Start,
        }
    }
}

/// Creates a connected sink/stream pair.
///
/// The provider keeps the sink; the task that owns the orchestrator keeps
/// the stream.
pub fn completion_channel() -> (CompletionSink, CompletionStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    (CompletionSink { tx }, CompletionStream { rx })
}

/// Provider side of the completion channel. Cheap to clone.
///
/// Unbounded so a provider can complete from inside a request call
/// without waiting on the orchestrator that is currently calling it.
#[derive(Debug, Clone)]
pub struct CompletionSink {
    tx: mpsc::UnboundedSender<ProviderCompletion>,
}

impl CompletionSink {
    /// Delivers a completion. Dropped with a debug log if nobody is
    /// listening any more (the orchestrator shut down).
    pub fn complete(&self, completion: ProviderCompletion) {
        let kind = completion.kind();
        if self.tx.send(completion).is_err() {
            tracing::debug!(%kind, "completion dropped, orchestrator gone");
        }
    }

    /// Returns `true` if the stream half was dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Orchestrator side of the completion channel.
#[derive(Debug)]
pub struct CompletionStream {
    rx: mpsc::UnboundedReceiver<ProviderCompletion>,
}

impl CompletionStream {
    /// Waits for the next completion. `None` once every sink is dropped.
    pub async fn recv(&mut self) -> Option<ProviderCompletion> {
        self.rx.recv().await
    }

    /// Takes the next completion if one is already queued.
    pub fn try_recv(&mut self) -> Option<ProviderCompletion> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_kind_matches_variant() {
        let name = SessionName::game();
        let cases = [
            (
                ProviderCompletion::CreateSession {
                    session: name.clone(),
                    success: true,
                },
                OperationKind::Create,
            ),
            (
                ProviderCompletion::FindSessions {
                    results: vec![],
                    success: true,
                },
                OperationKind::Find,
            ),
            (
                ProviderCompletion::JoinSession {
                    session: name.clone(),
                    result: JoinResult::Success,
                },
                OperationKind::Join,
            ),
            (
                ProviderCompletion::DestroySession {
                    session: name.clone(),
                    success: false,
                },
                OperationKind::Destroy,
            ),
            (
                ProviderCompletion::StartSession {
                    session: name,
                    success: true,
                },
                OperationKind::Start,
            ),
        ];
        for (completion, kind) in cases {
            assert_eq!(completion.kind(), kind);
        }
    }

    #[test]
    fn test_try_recv_empty_returns_none() {
        let (_sink, mut stream) = completion_channel();
        assert!(stream.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_sink_delivers_in_order() {
        let (sink, mut stream) = completion_channel();
        sink.complete(ProviderCompletion::DestroySession {
            session: SessionName::game(),
            success: true,
        });
        sink.complete(ProviderCompletion::StartSession {
            session: SessionName::game(),
            success: false,
        });

        assert_eq!(
            stream.recv().await.map(|c| c.kind()),
            Some(OperationKind::Destroy)
        );
        assert_eq!(
            stream.recv().await.map(|c| c.kind()),
            Some(OperationKind::Start)
        );
    }

    #[tokio::test]
    async fn test_stream_ends_when_sinks_dropped() {
        let (sink, mut stream) = completion_channel();
        drop(sink);
        assert!(stream.recv().await.is_none());
    }

    #[test]
    fn test_complete_after_stream_dropped_does_not_panic() {
        let (sink, stream) = completion_channel();
        drop(stream);
        assert!(sink.is_closed());
        sink.complete(ProviderCompletion::CreateSession {
            session: SessionName::game(),
            success: true,
        });
    }
}
