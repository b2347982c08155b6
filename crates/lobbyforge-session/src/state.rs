//! Bookkeeping the orchestrator carries between a request and its
//! completion.

use std::collections::BTreeSet;

use lobbyforge_protocol::OperationKind;

use crate::SessionError;

// ---------------------------------------------------------------------------
// PendingOperationState
// ---------------------------------------------------------------------------

/// A create request parked behind a destroy.
///
/// Written when a create arrives while a session exists, read (and
/// cleared) when the destroy it triggered succeeds. A failed destroy
/// leaves it set: nothing retries automatically, and the next successful
/// destroy picks it up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingOperationState {
    create_session_on_destroy: bool,
    last_connection_count: u32,
    last_match_type: String,
}

impl PendingOperationState {
    /// Records a create to replay after the next successful destroy.
    /// A later stash overwrites an earlier one.
    pub fn stash_create(&mut self, connections: u32, match_type: &str) {
        self.create_session_on_destroy = true;
        self.last_connection_count = connections;
        self.last_match_type = match_type.to_string();
    }

    /// Clears the flag and hands back the parked create, if there is one.
    pub fn take_create(&mut self) -> Option<(u32, String)> {
        if !self.create_session_on_destroy {
            return None;
        }
        self.create_session_on_destroy = false;
        Some((self.last_connection_count, self.last_match_type.clone()))
    }

    pub fn is_create_pending(&self) -> bool {
        self.create_session_on_destroy
    }

    pub fn last_connection_count(&self) -> u32 {
        self.last_connection_count
    }

    pub fn last_match_type(&self) -> &str {
        &self.last_match_type
    }
}

// ---------------------------------------------------------------------------
// InFlight
// ---------------------------------------------------------------------------

/// Which operation kinds are waiting on a provider completion.
///
/// A kind is registered right before its provider call and cleared when
/// the completion arrives or the provider rejects the call. Registering a
/// kind twice is refused, so there is never more than one listener per
/// kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InFlight {
    kinds: BTreeSet<OperationKind>,
}

impl InFlight {
    /// Fails if `kind` is already waiting on a completion.
    pub fn ensure_idle(&self, kind: OperationKind) -> Result<(), SessionError> {
        if self.kinds.contains(&kind) {
            return Err(SessionError::OperationInFlight(kind));
        }
        Ok(())
    }

    /// Marks `kind` as waiting on a completion.
    pub fn register(&mut self, kind: OperationKind) -> Result<(), SessionError> {
        if !self.kinds.insert(kind) {
            return Err(SessionError::OperationInFlight(kind));
        }
        Ok(())
    }

    /// Marks `kind` idle again. Returns `false` if it wasn't registered.
    pub fn clear(&mut self, kind: OperationKind) -> bool {
        self.kinds.remove(&kind)
    }

    pub fn contains(&self, kind: OperationKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_create_without_stash_returns_none() {
        let mut pending = PendingOperationState::default();
        assert!(!pending.is_create_pending());
        assert_eq!(pending.take_create(), None);
    }

    #[test]
    fn test_take_create_returns_stash_once() {
        let mut pending = PendingOperationState::default();
        pending.stash_create(4, "FreeForAll");

        assert!(pending.is_create_pending());
        assert_eq!(pending.take_create(), Some((4, "FreeForAll".into())));
        assert!(!pending.is_create_pending());
        assert_eq!(pending.take_create(), None);
    }

    #[test]
    fn test_stash_create_overwrites_previous() {
        let mut pending = PendingOperationState::default();
        pending.stash_create(4, "FreeForAll");
        pending.stash_create(8, "Teams");

        assert_eq!(pending.last_connection_count(), 8);
        assert_eq!(pending.last_match_type(), "Teams");
    }

    #[test]
    fn test_register_same_kind_twice_is_refused() {
        let mut in_flight = InFlight::default();
        in_flight.register(OperationKind::Find).unwrap();

        assert_eq!(
            in_flight.register(OperationKind::Find),
            Err(SessionError::OperationInFlight(OperationKind::Find))
        );
        assert_eq!(
            in_flight.ensure_idle(OperationKind::Find),
            Err(SessionError::OperationInFlight(OperationKind::Find))
        );
    }

    #[test]
    fn test_kinds_are_independent() {
        let mut in_flight = InFlight::default();
        in_flight.register(OperationKind::Find).unwrap();

        assert!(in_flight.register(OperationKind::Start).is_ok());
        assert!(in_flight.contains(OperationKind::Find));
        assert!(in_flight.contains(OperationKind::Start));
        assert!(!in_flight.contains(OperationKind::Join));
    }

    #[test]
    fn test_clear_returns_whether_registered() {
        let mut in_flight = InFlight::default();
        assert!(!in_flight.clear(OperationKind::Create));

        in_flight.register(OperationKind::Create).unwrap();
        assert!(in_flight.clear(OperationKind::Create));
        assert!(in_flight.is_empty());
        assert!(in_flight.ensure_idle(OperationKind::Create).is_ok());
    }
}
