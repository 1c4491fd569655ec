//! The prefixed key/value substrate that `value`/`map`/`imap`/`array`
//! variables are layered over (spec §3 "StorageKey"/"StorageItem").
//!
//! Grounded on the teacher's `smart_contract::storage::StorageKey`
//! (contract-scoped key, prefix/suffix composition) generalized to the
//! prefix + contract id + user key path grammar this spec's variables need.

use indexmap::IndexMap;

/// Identifies the contract instance that owns a storage entry.
pub type ContractId = u64;

/// A fully composed storage key: `prefix || contract_id || user_key`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageKey(Vec<u8>);

impl StorageKey {
    pub fn compose(prefix: u8, contract: ContractId, user_key: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(1 + 8 + user_key.len());
        bytes.push(prefix);
        bytes.extend_from_slice(&contract.to_be_bytes());
        bytes.extend_from_slice(user_key);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn has_prefix(&self, prefix: u8, contract: ContractId) -> bool {
        self.0.first() == Some(&prefix) && self.0.get(1..9) == Some(&contract.to_be_bytes()[..])
    }
}

/// The value bytes stored alongside a `StorageKey`, plus whether the slot
/// is newly created in the current transaction (mirrors the teacher's
/// `StorageItem::is_constant`-style bookkeeping flag, repurposed here to
/// track "created this recovery scope" for rollback bookkeeping).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageItem {
    pub value: Vec<u8>,
}

impl StorageItem {
    pub fn new(value: Vec<u8>) -> Self {
        Self { value }
    }
}

/// An in-process, insertion-ordered key/value store. Snapshots are plain
/// clones; the recovery machine (spec §4.6) owns when to take and discard
/// them, so this type stays a dumb map.
#[derive(Debug, Clone, Default)]
pub struct Kv {
    entries: IndexMap<StorageKey, StorageItem>,
}

impl Kv {
    pub fn new() -> Self {
        Self { entries: IndexMap::new() }
    }

    pub fn get(&self, key: &StorageKey) -> Option<&StorageItem> {
        self.entries.get(key)
    }

    pub fn put(&mut self, key: StorageKey, item: StorageItem) {
        self.entries.insert(key, item);
    }

    pub fn delete(&mut self, key: &StorageKey) -> Option<StorageItem> {
        self.entries.shift_remove(key)
    }

    pub fn contains(&self, key: &StorageKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates entries with the given prefix/contract scope, in insertion
    /// order (backs `imap`'s ordered key enumeration).
    pub fn scan(&self, prefix: u8, contract: ContractId) -> impl Iterator<Item = (&StorageKey, &StorageItem)> {
        self.entries.iter().filter(move |(k, _)| k.has_prefix(prefix, contract))
    }

    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    pub fn restore(&mut self, snapshot: Self) {
        *self = snapshot;
    }
}
