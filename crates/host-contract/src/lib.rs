//! The contract-facing surface: `contract.*`/`system.*`, the SQL/DB
//! bridge, the crypto module, and engine lifecycle (spec §4.8–§4.11).
//!
//! This is the only crate a node links against directly; every other
//! `host-*` crate is an implementation detail reached through here.

pub mod contract;
pub mod crypto;
pub mod db;
pub mod engine;
mod error;
pub mod system;

pub use error::{ContractError, Result};
