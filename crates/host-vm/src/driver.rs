//! The single seam between this host and the node embedding it (spec §6
//! "External Interfaces"): everything the host needs from chain state,
//! ledger mutation, inter-contract dispatch, or external cryptography goes
//! through `HostDriver` so the host crate itself stays free of any
//! node-specific dependency.

use crate::context::ServiceContext;
use host_bignum::Bignum;

/// Node-provided chain/ledger operations a contract call may need.
///
/// Grounded on the shape of `ApplicationEngine`'s constructor dependencies
/// (snapshot, persisting block, native contract registry) collapsed into
/// one trait object so `host-contract` never needs to know the node's
/// concrete storage or consensus types.
///
/// Everything except the crypto call-outs carries a default implementation
/// so a minimal embedder (or a test stub) only has to supply the handful of
/// methods it actually exercises; a real node overrides the rest.
pub trait HostDriver {
    fn current_block_height(&self) -> u64;
    fn current_block_timestamp(&self) -> u64;
    fn current_tx_hash(&self) -> [u8; 32];
    fn sender(&self) -> u64;
    fn creator(&self, contract: u64) -> Option<u64>;
    fn balance_of(&self, account: u64) -> Bignum;
    fn transfer(&mut self, from: u64, to: u64, amount: &Bignum) -> bool;
    fn is_contract(&self, account: u64) -> bool;
    fn random_seed(&self) -> u64;

    /// Opens a recovery point the node will later resolve with
    /// `clear_recovery`. Inter-contract operations (`call`, `delegatecall`,
    /// `deploy`, `send`, governance, `event`) are node-driven (spec §4.6):
    /// the node is responsible for bracketing each one. The default
    /// delegates back to this context's own recovery machine, which is
    /// enough for a single-process embedder; `pcall`/`xpcall` never call
    /// this — they use `ServiceContext::open_recovery` directly.
    fn set_recovery_point(&mut self, ctx: &mut ServiceContext) -> Result<u64, String> {
        ctx.open_recovery();
        Ok(ctx.recovery_depth() as u64)
    }

    /// Resolves a recovery point opened by `set_recovery_point`: commits on
    /// success, rolls back on `is_error`.
    fn clear_recovery(&mut self, ctx: &mut ServiceContext, _seq: u64, is_error: bool) -> Result<(), String> {
        if is_error {
            ctx.rollback_recovery();
        } else {
            ctx.commit_recovery();
        }
        Ok(())
    }

    /// Dispatches a same-transaction call into another contract, returning
    /// its marshaled (JSON-encoded) result.
    fn call_contract(&mut self, callee: u64, function: &str, args: &[u8]) -> Result<Vec<u8>, String> {
        let _ = (callee, function, args);
        Err("call_contract not supported by this driver".to_string())
    }

    /// Like `call_contract`, but the callee runs in the caller's own
    /// storage scope.
    fn delegate_call_contract(&mut self, callee: u64, function: &str, args: &[u8]) -> Result<Vec<u8>, String> {
        let _ = (callee, function, args);
        Err("delegate_call_contract not supported by this driver".to_string())
    }

    /// Deploys a new contract instance, returning its freshly assigned id.
    fn deploy_contract(&mut self, code: &[u8], args: &[u8]) -> Result<u64, String> {
        let _ = (code, args);
        Err("deploy_contract not supported by this driver".to_string())
    }

    /// Reads a node-owned key/value slot. `block` requests a historical
    /// snapshot read at that height instead of the current value (spec §4.7
    /// `value:get([block])`).
    fn get_db(&self, contract: u64, key: &[u8], block: Option<u64>) -> Option<Vec<u8>> {
        let _ = (contract, key, block);
        None
    }

    fn set_db(&mut self, contract: u64, key: &[u8], value: &[u8]) {
        let _ = (contract, key, value);
    }

    fn del_db(&mut self, contract: u64, key: &[u8]) {
        let _ = (contract, key);
    }

    /// Submits a governance action (vote, DAO proposal, parameter change).
    fn governance(&mut self, kind: &str, args: &[u8]) -> Result<(), String> {
        let _ = (kind, args);
        Err("governance not supported by this driver".to_string())
    }

    /// Drops a previously emitted event (spec §4.8: only reachable while the
    /// enclosing recovery point is still open).
    fn drop_event(&mut self, contract: u64, index: u64) {
        let _ = (contract, index);
    }

    fn get_event_count(&self, contract: u64) -> u64 {
        let _ = contract;
        0
    }

    fn get_staking(&self, account: u64) -> Bignum {
        let _ = account;
        Bignum::zero()
    }

    /// Hashes `data` with SHA-256. No default: spec §1 places this out of
    /// scope for in-crate computation, consumed only as an opaque call-out.
    fn crypto_sha256(&self, data: &[u8]) -> [u8; 32];

    /// Hashes `data` with Keccak-256. No default; see `crypto_sha256`.
    fn crypto_keccak256(&self, data: &[u8]) -> [u8; 32];

    /// Verifies an ECDSA signature over `msg` against `addr`. No default;
    /// see `crypto_sha256`.
    fn crypto_ecverify(&self, msg: &[u8], sig: &[u8], addr: &[u8]) -> Result<bool, String>;

    /// Verifies a Merkle/Patricia inclusion proof. No default; see
    /// `crypto_sha256`.
    fn crypto_verify_proof(&self, key: &[u8], value: &[u8], root: &[u8], proof: &[Vec<u8>]) -> Result<bool, String>;

    /// Reports whether the enclosing call has exceeded its wall-clock
    /// budget; the governor already enforces its own timeout, this exists
    /// so the node can additionally abort on external signals.
    fn check_timeout(&self) -> bool {
        false
    }

    fn view_start(&mut self) {}

    fn view_end(&mut self) {}

    fn is_public(&self, contract: u64) -> bool {
        let _ = contract;
        true
    }

    fn hardfork_version(&self) -> u32 {
        0
    }

    fn use_gas(&mut self, amount: u64) {
        let _ = amount;
    }

    fn is_fee_delegation(&self) -> bool {
        false
    }
}
