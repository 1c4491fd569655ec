//! The `pcall` nested rollback machine (spec §4.6 "Recovery point / pcall
//! nested rollback state machine").
//!
//! There is no teacher equivalent of a script-level recovery stack; this
//! is built from scratch, using the teacher's snapshot-then-restore shape
//! from `ApplicationEngine`'s notification/storage checkpointing around
//! nested calls as the structural template.

use crate::event::EventLog;
use crate::state::kv::Kv;
use host_config::HardforkVersion;
use tracing::debug;

/// A nested checkpoint opened by `pcall`/inter-contract `call`. Holds
/// enough state to undo every KV write made since it was opened.
struct Checkpoint {
    kv_snapshot: Kv,
    event_count: usize,
}

/// Owns the stack of open checkpoints for one top-level call.
pub struct RecoveryMachine {
    stack: Vec<Checkpoint>,
    hardfork: HardforkVersion,
}

impl RecoveryMachine {
    pub fn new(hardfork: HardforkVersion) -> Self {
        Self { stack: Vec::new(), hardfork }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Opens a new recovery point, snapshotting `kv` and the current event
    /// log length.
    pub fn open(&mut self, kv: &Kv, events: &EventLog) {
        self.stack.push(Checkpoint { kv_snapshot: kv.snapshot(), event_count: events.len() });
        debug!(depth = self.stack.len(), "opened recovery point");
    }

    /// Commits the innermost recovery point: its snapshot is simply
    /// discarded, letting the writes made inside it stand.
    pub fn commit(&mut self) {
        self.stack.pop();
        debug!(depth = self.stack.len(), "committed recovery point");
    }

    /// Rolls back to the innermost recovery point, restoring `kv` to the
    /// snapshot taken at `open`.
    ///
    /// At hardfork ≥ 4, the event log is truncated back to the
    /// checkpoint's length along with state — events emitted inside a
    /// rolled-back `pcall` are gone. Below hardfork 4, event truncation
    /// runs on its own, state-independent path that a rollback does not
    /// reach, so those events survive.
    pub fn rollback(&mut self, kv: &mut Kv, events: &mut EventLog) {
        let Some(checkpoint) = self.stack.pop() else { return };
        kv.restore(checkpoint.kv_snapshot);
        if self.hardfork.metatables_disabled() {
            events.truncate(checkpoint.event_count);
        }
        debug!(depth = self.stack.len(), "rolled back recovery point");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use crate::state::kv::{StorageItem, StorageKey};
    use host_json::Value;

    fn put(kv: &mut Kv, key: &str, value: &str) {
        kv.put(StorageKey::compose(b'v', 1, key.as_bytes()), StorageItem::new(value.as_bytes().to_vec()));
    }

    #[test]
    fn pre_hardfork4_rollback_restores_kv_but_leaks_events() {
        let mut kv = Kv::new();
        let mut events = EventLog::new();
        let mut machine = RecoveryMachine::new(HardforkVersion(3));

        put(&mut kv, "a", "1");
        machine.open(&kv, &events);
        put(&mut kv, "a", "2");
        events.push(Event::new(1, "changed", vec![Value::Int(2)]));

        machine.rollback(&mut kv, &mut events);
        assert_eq!(kv.get(&StorageKey::compose(b'v', 1, b"a")).unwrap().value, b"1");
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn hardfork4_truncates_events_on_rollback() {
        let mut kv = Kv::new();
        let mut events = EventLog::new();
        let mut machine = RecoveryMachine::new(HardforkVersion(4));

        machine.open(&kv, &events);
        put(&mut kv, "a", "2");
        events.push(Event::new(1, "changed", vec![Value::Int(2)]));

        machine.rollback(&mut kv, &mut events);
        assert!(!kv.contains(&StorageKey::compose(b'v', 1, b"a")));
        assert_eq!(events.len(), 0);
    }

    #[test]
    fn nested_checkpoints_commit_independently() {
        let mut kv = Kv::new();
        let mut events = EventLog::new();
        let mut machine = RecoveryMachine::new(HardforkVersion(3));

        machine.open(&kv, &events);
        put(&mut kv, "outer", "1");
        machine.open(&kv, &events);
        put(&mut kv, "inner", "1");
        machine.rollback(&mut kv, &mut events);
        assert!(!kv.contains(&StorageKey::compose(b'v', 1, b"inner")));
        assert!(kv.contains(&StorageKey::compose(b'v', 1, b"outer")));
        machine.commit();
        assert_eq!(machine.depth(), 0);
    }
}
