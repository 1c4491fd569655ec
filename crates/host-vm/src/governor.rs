//! Resource governance: gas metering (hardfork ≥ 2) or raw instruction
//! counting (legacy), plus a shared memory cap and wall-clock timeout
//! (spec §4.5).
//!
//! Grounded on the teacher's `vm::GasCalculator` (static per-opcode cost
//! table, running total checked against a limit) generalized to the
//! hardfork-gated dual metering mode this host's contracts require.

use crate::error::{HostError, Result};
use host_config::{HostConfig, INSTRUCTION_HOOK_INTERVAL, MSG_CONTRACT_TIMEOUT, MSG_INSTRUCTION_LIMIT};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeteringMode {
    Gas,
    InstructionCount,
}

/// Tracks gas/instruction consumption, memory use, and wall-clock budget
/// for a single top-level contract call.
pub struct ResourceGovernor {
    mode: MeteringMode,
    gas_remaining: i64,
    instruction_count: u64,
    instruction_limit: u64,
    memory_used: u64,
    memory_limit: u64,
    started_at: Instant,
    timeout: Duration,
}

impl ResourceGovernor {
    pub fn new(config: &HostConfig, timeout: Duration) -> Self {
        let mode = if config.hardfork.gas_metered() { MeteringMode::Gas } else { MeteringMode::InstructionCount };
        debug!(?mode, gas_limit = config.default_gas_limit, "opening resource governor");
        Self {
            mode,
            gas_remaining: config.default_gas_limit as i64,
            instruction_count: 0,
            instruction_limit: config.instruction_count_limit,
            memory_used: 0,
            memory_limit: config.max_memory_bytes,
            started_at: Instant::now(),
            timeout,
        }
    }

    pub fn mode(&self) -> MeteringMode {
        self.mode
    }

    pub fn gas_remaining(&self) -> i64 {
        self.gas_remaining
    }

    /// Charges `amount` against the gas budget; no-op under instruction
    /// counting mode, since that mode tracks steps instead.
    pub fn charge_gas(&mut self, amount: i64) -> Result<()> {
        if self.mode != MeteringMode::Gas {
            return Ok(());
        }
        self.gas_remaining -= amount;
        if self.gas_remaining < 0 {
            warn!(amount, "gas overdraft");
            return Err(HostError::uncatchable("not enough gas"));
        }
        Ok(())
    }

    /// Called on every VM instruction boundary. Checks the wall-clock
    /// timeout every `INSTRUCTION_HOOK_INTERVAL` steps, and enforces the
    /// instruction ceiling when running in legacy counting mode.
    pub fn tick_instruction(&mut self) -> Result<()> {
        self.instruction_count += 1;

        if self.mode == MeteringMode::InstructionCount && self.instruction_count > self.instruction_limit {
            warn!(limit = self.instruction_limit, "instruction count limit exceeded");
            return Err(HostError::uncatchable(MSG_INSTRUCTION_LIMIT));
        }

        if self.instruction_count % INSTRUCTION_HOOK_INTERVAL == 0 {
            self.check_timeout()?;
        }
        Ok(())
    }

    pub fn check_timeout(&self) -> Result<()> {
        if self.started_at.elapsed() > self.timeout {
            warn!(elapsed = ?self.started_at.elapsed(), timeout = ?self.timeout, "contract timed out");
            return Err(HostError::uncatchable(MSG_CONTRACT_TIMEOUT));
        }
        Ok(())
    }

    pub fn reserve_memory(&mut self, bytes: u64) -> Result<()> {
        let next = self.memory_used.saturating_add(bytes);
        if next > self.memory_limit {
            return Err(HostError::uncatchable("bignum not enough memory"));
        }
        self.memory_used = next;
        Ok(())
    }

    pub fn release_memory(&mut self, bytes: u64) {
        self.memory_used = self.memory_used.saturating_sub(bytes);
    }
}
