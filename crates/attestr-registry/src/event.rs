//! # Registry Events
//!
//! Every successful mutation emits a structured event carrying enough
//! fields to reconstruct the mutation off-process. In the source
//! environment these are chain events consumed by indexers; here they
//! feed an in-process append-only log plus optional registered sinks.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use attestr_core::{AccountId, CredentialId, Timestamp};

use crate::access::Role;

/// A domain event emitted by the registry after a successful mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegistryEvent {
    /// A single credential was issued.
    Issued {
        id: CredentialId,
        issuer: AccountId,
        subject: AccountId,
        issued_at: Timestamp,
    },
    /// A batch of credentials was issued atomically. `ids` and
    /// `subjects` are parallel arrays.
    BatchIssued {
        ids: Vec<CredentialId>,
        issuer: AccountId,
        subjects: Vec<AccountId>,
        issued_at: Timestamp,
    },
    /// A credential was revoked.
    Revoked {
        id: CredentialId,
        issuer: AccountId,
        revoked_at: Timestamp,
    },
    /// A role was granted to an account.
    RoleGranted {
        role: Role,
        account: AccountId,
        by: AccountId,
    },
    /// A role was removed from an account.
    RoleRevoked {
        role: Role,
        account: AccountId,
        by: AccountId,
    },
    /// The pause flag changed.
    PausedSet { paused: bool, by: AccountId },
    /// The circuit breaker changed.
    CircuitBreakerSet { engaged: bool, by: AccountId },
    /// Administrator ownership was transferred.
    AdminTransferred { from: AccountId, to: AccountId },
}

/// Receives registry events after each successful mutation.
///
/// Implementations must not block: they are invoked on the mutating
/// caller's thread.
pub trait EventSink: Send + Sync {
    /// Handle one event.
    fn publish(&self, event: &RegistryEvent);
}

/// Append-only in-process event log.
///
/// The registry's built-in sink: events are appended in mutation order
/// and never removed. External indexers poll [`EventLog::events_from`].
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<RegistryEvent>>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn append(&self, event: RegistryEvent) {
        self.events.lock().push(event);
    }

    /// Number of events recorded so far.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all events from `offset` onward.
    pub fn events_from(&self, offset: usize) -> Vec<RegistryEvent> {
        let guard = self.events.lock();
        guard.iter().skip(offset).cloned().collect()
    }

    /// Snapshot of the full log.
    pub fn snapshot(&self) -> Vec<RegistryEvent> {
        self.events_from(0)
    }
}

/// The built-in log plus registered external sinks.
///
/// Publication is split in two so the log can stay consistent with
/// mutation order: [`EventBus::record`] appends to the log and is called
/// while the mutating service still holds its state write lock;
/// [`EventBus::fan_out`] notifies sinks and runs after that lock drops,
/// so sink callbacks can re-enter the service.
#[derive(Default)]
pub(crate) struct EventBus {
    log: EventLog,
    sinks: RwLock<Vec<Arc<dyn EventSink>>>,
}

impl EventBus {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn log(&self) -> &EventLog {
        &self.log
    }

    pub(crate) fn subscribe(&self, sink: Arc<dyn EventSink>) {
        self.sinks.write().push(sink);
    }

    /// Append to the log. Call under the mutating state lock.
    pub(crate) fn record(&self, event: &RegistryEvent) {
        self.log.append(event.clone());
    }

    /// Notify registered sinks. Call after the state lock has dropped.
    pub(crate) fn fan_out(&self, event: &RegistryEvent) {
        for sink in self.sinks.read().iter() {
            sink.publish(event);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("log_len", &self.log.len())
            .field("sinks", &self.sinks.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn account(s: &str) -> AccountId {
        AccountId::new(s).unwrap()
    }

    fn sample_event() -> RegistryEvent {
        RegistryEvent::PausedSet {
            paused: true,
            by: account("admin"),
        }
    }

    #[test]
    fn test_log_appends_in_order() {
        let log = EventLog::new();
        assert!(log.is_empty());
        log.append(sample_event());
        log.append(RegistryEvent::PausedSet {
            paused: false,
            by: account("admin"),
        });
        assert_eq!(log.len(), 2);
        let events = log.snapshot();
        assert!(matches!(events[0], RegistryEvent::PausedSet { paused: true, .. }));
        assert!(matches!(events[1], RegistryEvent::PausedSet { paused: false, .. }));
    }

    #[test]
    fn test_events_from_offset() {
        let log = EventLog::new();
        for _ in 0..5 {
            log.append(sample_event());
        }
        assert_eq!(log.events_from(3).len(), 2);
        assert_eq!(log.events_from(10).len(), 0);
    }

    struct Counter(AtomicUsize);

    impl EventSink for Counter {
        fn publish(&self, _event: &RegistryEvent) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_bus_fans_out_to_sinks() {
        let bus = EventBus::new();
        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        bus.subscribe(counter.clone());
        for _ in 0..2 {
            let event = sample_event();
            bus.record(&event);
            bus.fan_out(&event);
        }
        assert_eq!(counter.0.load(Ordering::SeqCst), 2);
        assert_eq!(bus.log().len(), 2);
    }

    #[test]
    fn test_event_serde_tagged() {
        let event = RegistryEvent::Issued {
            id: CredentialId::from_bytes([7u8; 32]),
            issuer: account("issuer-a"),
            subject: account("subject-b"),
            issued_at: Timestamp::parse("2026-01-15T12:00:00Z").unwrap(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "issued");
        assert_eq!(json["issuer"], "issuer-a");
    }
}
