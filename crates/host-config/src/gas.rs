//! Gas cost table for host built-ins, grounded on the teacher's
//! `neo-vm::gas_calculator::OPCODE_GAS_COSTS` static-table idiom.

/// Flat per-call gas charge for a host built-in that does negligible work.
pub const GAS_CHEAP: i64 = 100;

/// Flat per-call gas charge for a host built-in with moderate bookkeeping
/// (a single KV read/write, a single event append).
pub const GAS_MID: i64 = 300;

/// Flat per-call gas charge for a host built-in that crosses into another
/// execution context (inter-contract call, SQL roundtrip).
pub const GAS_HEAVY: i64 = 5_000;

/// Base charge for `bignum.pow`, on top of the intrinsic squaring cost (spec §4.1).
pub const GAS_POW_BASE: i64 = 500;

/// Per-byte charge for hashing/crypto primitives.
pub const GAS_PER_BYTE: i64 = 1;

/// Per-value charge for JSON encode/decode traversal (spec §4.2.8).
pub const GAS_JSON_PER_VALUE: i64 = GAS_MID;
