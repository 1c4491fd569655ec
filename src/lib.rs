//! Sandboxed, metered, deterministic smart-contract execution host.
//!
//! This crate re-exports the public surface of the `host-*` workspace
//! members; a node embeds `contract_host` alone and never depends on the
//! member crates directly (the same role `neo-rs` plays for the Neo
//! workspace's `crates/*`).

pub use host_bignum::{Bignum, BignumError};
pub use host_config::{HardforkVersion, HostConfig, HostConfigBuilder};
pub use host_contract::{contract, crypto, db, engine, system, ContractError};
pub use host_ipc::{FrameReader, FrameWriter, Item, IpcError};
pub use host_json::{self as json, JsonError, Value};
pub use host_vm::{state, Event, EventLog, HostDriver, HostError, ServiceContext, ServiceId};

/// Initializes the ambient `tracing` subscriber for a host process
/// embedding this crate; a no-op if a subscriber is already installed.
///
/// Mirrors the teacher's practice of leaving subscriber setup to the
/// embedding binary while offering a default for simple deployments.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();
    tracing::debug!("tracing subscriber initialized");
}
