//! Contract events (spec §4.8 `contract.event`), a slimmed-down relative of
//! the teacher's `SmartContractEvent`: this host only needs emit + ordered
//! replay, not the subscription/callback machinery `events.rs` also carries.

use host_json::Value;

/// An event emitted by a contract during execution of the current call.
#[derive(Debug, Clone)]
pub struct Event {
    pub contract: u64,
    pub event_name: String,
    pub args: Vec<Value>,
}

impl Event {
    pub fn new(contract: u64, event_name: impl Into<String>, args: Vec<Value>) -> Self {
        Self { contract, event_name: event_name.into(), args }
    }
}

/// The append-only event log for the current top-level call. Recovery
/// points truncate this on rollback, except at hardfork ≥ 4 where already
/// emitted events survive a rollback independently of their KV writes
/// (spec §4.6 "hardfork-4 independent event truncation").
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn truncate(&mut self, len: usize) {
        self.events.truncate(len);
    }

    pub fn as_slice(&self) -> &[Event] {
        &self.events
    }
}
