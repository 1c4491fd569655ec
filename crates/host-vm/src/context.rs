//! The per-call service context (spec §3 "ServiceContext", §5
//! "Concurrency"): owns the resource governor, KV store, event log, and
//! recovery stack for a single top-level contract invocation.
//!
//! Grounded on `ApplicationEngine` as the "one object holds everything a
//! running call needs" template, generalized down to this host's simpler
//! single-threaded, single-call scope.

use crate::error::{HostError, Result};
use crate::event::EventLog;
use crate::governor::ResourceGovernor;
use crate::recovery::RecoveryMachine;
use crate::state::kv::Kv;
use host_config::{HostConfig, MSG_GLOBAL_SCOPE_DENIED, MSG_VIEW_NOT_PERMITTED};
use std::time::Duration;

/// Identifies a service context for the lifetime of one top-level call.
/// Not reused across calls, and never shared across threads — see the
/// `!Sync` note below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceId(pub u64);

/// Per-call execution state. `ServiceContext` is deliberately `!Sync`: its
/// `Kv`/`EventLog`/script `Value` graphs use `Rc`/`RefCell`, so a context
/// can only ever be driven by the single thread that owns the call (spec
/// §5). Sharing one across threads is a compile error, not a runtime race.
pub struct ServiceContext {
    id: ServiceId,
    config: HostConfig,
    governor: ResourceGovernor,
    kv: Kv,
    events: EventLog,
    recovery: RecoveryMachine,
    view_mode: bool,
    global_scope: bool,
}

impl ServiceContext {
    pub fn new(id: ServiceId, config: HostConfig, timeout: Duration, view_mode: bool) -> Self {
        let hardfork = config.hardfork;
        Self {
            id,
            governor: ResourceGovernor::new(&config, timeout),
            config,
            kv: Kv::new(),
            events: EventLog::new(),
            recovery: RecoveryMachine::new(hardfork),
            view_mode,
            global_scope: false,
        }
    }

    pub fn id(&self) -> ServiceId {
        self.id
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn governor(&mut self) -> &mut ResourceGovernor {
        &mut self.governor
    }

    pub fn kv(&self) -> &Kv {
        &self.kv
    }

    pub fn kv_mut(&mut self) -> &mut Kv {
        &mut self.kv
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventLog {
        &mut self.events
    }

    pub fn open_recovery(&mut self) {
        self.recovery.open(&self.kv, &self.events);
    }

    pub fn commit_recovery(&mut self) {
        self.recovery.commit();
    }

    pub fn rollback_recovery(&mut self) {
        self.recovery.rollback(&mut self.kv, &mut self.events);
    }

    pub fn recovery_depth(&self) -> usize {
        self.recovery.depth()
    }

    pub fn is_view(&self) -> bool {
        self.view_mode
    }

    /// Enters a nested call's view scope: a view function remains a view
    /// function for its entire callee subtree.
    pub fn with_view(&mut self, view: bool) -> bool {
        let previous = self.view_mode;
        self.view_mode = self.view_mode || view;
        previous
    }

    pub fn set_view_mode(&mut self, view_mode: bool) {
        self.view_mode = view_mode;
    }

    pub fn enter_global_scope(&mut self) -> bool {
        std::mem::replace(&mut self.global_scope, true)
    }

    pub fn leave_global_scope(&mut self, previous: bool) {
        self.global_scope = previous;
    }

    /// Guards any stateful-variable write (spec §6: view functions may
    /// read state but never write it).
    pub fn assert_write_allowed(&self) -> Result<()> {
        if self.view_mode {
            Err(HostError::catchable(MSG_VIEW_NOT_PERMITTED))
        } else {
            Ok(())
        }
    }

    /// Guards state variable declaration at global (load-time) scope,
    /// which is only valid once the contract's ABI functions begin running.
    pub fn assert_state_reference_allowed(&self) -> Result<()> {
        if self.global_scope {
            Err(HostError::catchable(MSG_GLOBAL_SCOPE_DENIED))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_mode_rejects_writes() {
        let ctx = ServiceContext::new(ServiceId(1), HostConfig::default(), Duration::from_secs(5), true);
        let err = ctx.assert_write_allowed().unwrap_err();
        assert_eq!(err.message(), MSG_VIEW_NOT_PERMITTED);
    }

    #[test]
    fn global_scope_denies_state_reference() {
        let mut ctx = ServiceContext::new(ServiceId(1), HostConfig::default(), Duration::from_secs(5), false);
        ctx.enter_global_scope();
        let err = ctx.assert_state_reference_allowed().unwrap_err();
        assert_eq!(err.message(), MSG_GLOBAL_SCOPE_DENIED);
    }
}
