//! Shared constants and per-host configuration for the contract execution host.
//!
//! Mirrors the role `neo-config` plays for the Neo workspace: a small,
//! dependency-light crate that every other member can depend on without
//! pulling in the VM or the contract surface.

pub mod gas;

use serde::{Deserialize, Serialize};

/// Maximum size in bytes of a storage key's user-path segment.
pub const MAX_STORAGE_KEY_SIZE: usize = 2048;

/// Maximum size in bytes of a storage value (a deterministic-JSON blob).
pub const MAX_STORAGE_VALUE_SIZE: usize = 65536;

/// Maximum number of dimensions a `map`/`imap` may nest.
pub const MAX_STATE_DIMENSIONS: usize = 5;

/// Maximum number of arguments accepted by `contract.event`.
pub const MAX_EVENT_ARGS: usize = 16;

/// Maximum decimal digit count accepted when parsing a bignum literal.
pub const MAX_BIGNUM_DIGITS: usize = 128;

/// Maximum number of RLP-encoded list elements accepted by `crypto.verifyProof`.
pub const MAX_PROOF_LIST_ELEMENTS: usize = 20;

/// Number of VM instructions between timeout/instruction-count hook checks.
pub const INSTRUCTION_HOOK_INTERVAL: u64 = 200;

/// The exact wall-clock timeout message (bit-exact per spec §6).
pub const MSG_CONTRACT_TIMEOUT: &str = "contract timeout";

/// The exact instruction-limit message (bit-exact per spec §6).
pub const MSG_INSTRUCTION_LIMIT: &str = "exceeded the maximum instruction count";

/// The exact view-function write message (bit-exact per spec §6).
pub const MSG_VIEW_NOT_PERMITTED: &str = "not permitted in view function";

/// The exact global-scope state access message (bit-exact per spec §6).
pub const MSG_GLOBAL_SCOPE_DENIED: &str = "state referencing not permitted at global scope";

/// The exact cyclic-table message (bit-exact per spec §6).
pub const MSG_NESTED_TABLE_ERROR: &str = "nested table error";

/// Hardfork version gating behavior changes (spec §2, GLOSSARY).
///
/// Only the thresholds the spec names (2, 3, 4) change behavior; versions
/// in between a named threshold and the next carry the lower threshold's
/// rules forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HardforkVersion(pub u32);

impl HardforkVersion {
    pub const GENESIS: Self = Self(0);

    /// HF2: numeric-key-array JSON form, integral-double decode, `contract.event` json_form.
    pub fn json_form_enabled(self) -> bool {
        self.0 >= 2
    }

    /// HF3: bignum radix prefixes stripped unconditionally before parsing.
    pub fn bignum_radix_prefix_stripped(self) -> bool {
        self.0 >= 3
    }

    /// HF4: metatable built-ins disabled, `pcall`/`xpcall` overridden,
    /// event buffer truncated independently of state rollback, octal
    /// bignum literals disabled, `keccak256`/`toPubKey`/`toAddress`/`version` exposed.
    pub fn metatables_disabled(self) -> bool {
        self.0 >= 4
    }

    pub fn gas_metered(self) -> bool {
        self.0 >= 2
    }
}

impl Default for HardforkVersion {
    fn default() -> Self {
        Self::GENESIS
    }
}

/// Per-host tunables supplied to `Engine::new` (ambient configuration layer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    pub hardfork: HardforkVersion,
    pub default_gas_limit: u64,
    pub instruction_count_limit: u64,
    pub max_memory_bytes: u64,
}

impl HostConfig {
    pub fn builder() -> HostConfigBuilder {
        HostConfigBuilder::default()
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            hardfork: HardforkVersion::default(),
            default_gas_limit: 100_000_000,
            instruction_count_limit: 10_000_000,
            max_memory_bytes: 64 * 1024 * 1024,
        }
    }
}

/// Builder for `HostConfig`, following the teacher's fluent config-builder idiom.
#[derive(Debug, Clone, Default)]
pub struct HostConfigBuilder {
    config: OptionalConfig,
}

#[derive(Debug, Clone, Default)]
struct OptionalConfig {
    hardfork: Option<HardforkVersion>,
    default_gas_limit: Option<u64>,
    instruction_count_limit: Option<u64>,
    max_memory_bytes: Option<u64>,
}

impl HostConfigBuilder {
    pub fn hardfork(mut self, version: u32) -> Self {
        self.config.hardfork = Some(HardforkVersion(version));
        self
    }

    pub fn gas_limit(mut self, limit: u64) -> Self {
        self.config.default_gas_limit = Some(limit);
        self
    }

    pub fn instruction_count_limit(mut self, limit: u64) -> Self {
        self.config.instruction_count_limit = Some(limit);
        self
    }

    pub fn max_memory_bytes(mut self, bytes: u64) -> Self {
        self.config.max_memory_bytes = Some(bytes);
        self
    }

    pub fn build(self) -> HostConfig {
        let defaults = HostConfig::default();
        HostConfig {
            hardfork: self.config.hardfork.unwrap_or(defaults.hardfork),
            default_gas_limit: self.config.default_gas_limit.unwrap_or(defaults.default_gas_limit),
            instruction_count_limit: self
                .config
                .instruction_count_limit
                .unwrap_or(defaults.instruction_count_limit),
            max_memory_bytes: self.config.max_memory_bytes.unwrap_or(defaults.max_memory_bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hardfork_thresholds() {
        assert!(!HardforkVersion(1).json_form_enabled());
        assert!(HardforkVersion(2).json_form_enabled());
        assert!(!HardforkVersion(2).bignum_radix_prefix_stripped());
        assert!(HardforkVersion(3).bignum_radix_prefix_stripped());
        assert!(!HardforkVersion(3).metatables_disabled());
        assert!(HardforkVersion(4).metatables_disabled());
    }

    #[test]
    fn builder_defaults_fill_gaps() {
        let config = HostConfig::builder().hardfork(4).build();
        assert_eq!(config.hardfork, HardforkVersion(4));
        assert_eq!(config.default_gas_limit, HostConfig::default().default_gas_limit);
    }
}
