//! Engine lifecycle: `newState` → `loadCode` → `preRun` →
//! `pushAbiFunction`/`call` → `getJsonRet` (spec §4.4), grounded on
//! `ApplicationEngine::new`/`load_contract`/`execute`/`pop_result_stack`.
//!
//! The script interpreter itself is outside this crate's scope (spec
//! Non-goals) — `call` takes the already-resolved ABI handler as a
//! closure, the same seam `host-vm`'s `HostDriver` uses for node state.

use crate::error::{ContractError, Result};
use host_json::Value;
use host_vm::{HostDriver, ServiceContext, ServiceId};
use host_config::HostConfig;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineState {
    Created,
    CodeLoaded,
    Running,
    Finished,
}

/// A queued ABI entry point call: a function name plus its JSON-decoded
/// arguments, awaiting dispatch by `call`.
pub struct AbiCall {
    pub function: String,
    pub args: Vec<Value>,
}

pub struct Engine<'d> {
    ctx: ServiceContext,
    driver: &'d mut dyn HostDriver,
    code: Option<Vec<u8>>,
    pending: Vec<AbiCall>,
    state: EngineState,
    result: Vec<Value>,
}

impl<'d> Engine<'d> {
    /// `newState`: allocates a fresh service context for one top-level call.
    pub fn new_state(id: ServiceId, config: HostConfig, timeout: Duration, view_mode: bool, driver: &'d mut dyn HostDriver) -> Self {
        let mut ctx = ServiceContext::new(id, config, timeout, view_mode);
        ctx.enter_global_scope();
        Self { ctx, driver, code: None, pending: Vec::new(), state: EngineState::Created, result: Vec::new() }
    }

    pub fn ctx(&self) -> &ServiceContext {
        &self.ctx
    }

    pub fn ctx_mut(&mut self) -> &mut ServiceContext {
        &mut self.ctx
    }

    pub fn driver(&mut self) -> &mut dyn HostDriver {
        self.driver
    }

    /// `loadCode`: stages the contract's compiled bytecode/script for
    /// execution. Can only happen once per engine instance.
    pub fn load_code(&mut self, code: Vec<u8>) -> Result<()> {
        if self.state != EngineState::Created {
            return Err(ContractError::catchable("code already loaded"));
        }
        self.code = Some(code);
        self.state = EngineState::CodeLoaded;
        Ok(())
    }

    /// `preRun`: runs module-level initialization, then leaves global
    /// scope so ABI function bodies may reference stateful variables
    /// (spec §6 `MSG_GLOBAL_SCOPE_DENIED`).
    pub fn pre_run(&mut self) -> Result<()> {
        if self.state != EngineState::CodeLoaded {
            return Err(ContractError::catchable("preRun requires loaded code"));
        }
        self.ctx.leave_global_scope(false);
        self.state = EngineState::Running;
        Ok(())
    }

    pub fn push_abi_function(&mut self, function: impl Into<String>, args: Vec<Value>) -> Result<()> {
        if self.state != EngineState::Running {
            return Err(ContractError::catchable("engine is not running"));
        }
        self.pending.push(AbiCall { function: function.into(), args });
        Ok(())
    }

    /// Dispatches the next queued ABI call to `handler`, storing its
    /// (possibly multi-valued) return for `getJsonRet`. Returns the number
    /// of values the call produced (`nresult`).
    pub fn call(
        &mut self,
        handler: impl FnOnce(&mut ServiceContext, &mut dyn HostDriver, &str, Vec<Value>) -> Result<Vec<Value>>,
    ) -> Result<usize> {
        let next = self.pending.pop().ok_or_else(|| ContractError::catchable("no pending ABI call"))?;
        let values = handler(&mut self.ctx, self.driver, &next.function, next.args)?;
        let nresult = values.len();
        self.result = values;
        self.state = EngineState::Finished;
        Ok(nresult)
    }

    /// `getJsonRet`: the last call's return values, marshaled to a
    /// canonical JSON array — or, when `has_parent` is set and the call
    /// produced exactly one value, that single value unwrapped (spec §4.4).
    pub fn get_json_ret(&self, has_parent: bool) -> Result<Vec<u8>> {
        if self.result.is_empty() && self.state != EngineState::Finished {
            return Err(ContractError::catchable("no result available"));
        }
        let json_form = self.ctx.config().hardfork.json_form_enabled();
        let encoded = if has_parent && self.result.len() == 1 {
            host_json::encode(&self.result[0], json_form)
        } else {
            host_json::encode(&Value::array(self.result.clone()), json_form)
        };
        encoded.map_err(|e| ContractError::catchable(e.to_string()))
    }
}
