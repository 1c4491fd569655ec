//! An insertion-ordered stateful map with explicit length bookkeeping
//! (spec §4.7 `imap`).
//!
//! The underlying `Kv` already preserves insertion order (`IndexMap`), but
//! `imap.length()` needs O(1) access rather than a full scan, so a small
//! meta record tracks the live entry count alongside the entries
//! themselves — the same "separate bookkeeping record next to the data"
//! shape the original DB bridge uses for its open statement/result-set
//! tables (spec §3 supplement, grounded on `original_source/contract/db_module.c`).

use super::{decode_value, encode_value};
use crate::error::Result;
use crate::state::kv::{ContractId, Kv, StorageItem, StorageKey};
use host_json::Value;

const ENTRY_PREFIX: u8 = b'i';
const META_PREFIX: u8 = b'I';

pub struct ImapVar {
    contract: ContractId,
    name: String,
}

impl ImapVar {
    pub fn new(contract: ContractId, name: impl Into<String>) -> Self {
        Self { contract, name: name.into() }
    }

    fn entry_key(&self, key: &str) -> StorageKey {
        let mut path = self.name.as_bytes().to_vec();
        path.push(0);
        path.extend_from_slice(key.as_bytes());
        StorageKey::compose(ENTRY_PREFIX, self.contract, &path)
    }

    fn meta_key(&self) -> StorageKey {
        StorageKey::compose(META_PREFIX, self.contract, self.name.as_bytes())
    }

    fn read_count(&self, kv: &Kv) -> u64 {
        match kv.get(&self.meta_key()) {
            Some(item) if item.value.len() == 8 => u64::from_le_bytes(item.value.clone().try_into().unwrap()),
            _ => 0,
        }
    }

    fn write_count(&self, kv: &mut Kv, count: u64) {
        kv.put(self.meta_key(), StorageItem::new(count.to_le_bytes().to_vec()));
    }

    pub fn get(&self, kv: &Kv, key: &str, hardfork: u32) -> Result<Option<Value>> {
        match kv.get(&self.entry_key(key)) {
            Some(item) => Ok(Some(decode_value(&item.value, hardfork)?)),
            None => Ok(None),
        }
    }

    pub fn set(&self, kv: &mut Kv, key: &str, value: &Value, json_form: bool) -> Result<()> {
        let entry_key = self.entry_key(key);
        let bytes = encode_value(value, json_form)?;
        let already_present = kv.contains(&entry_key);
        kv.put(entry_key, StorageItem::new(bytes));
        if !already_present {
            let count = self.read_count(kv);
            self.write_count(kv, count + 1);
        }
        Ok(())
    }

    /// Removes `key`, preserving the relative order of the remaining
    /// entries (spec invariant: deletion never reorders survivors).
    pub fn delete(&self, kv: &mut Kv, key: &str) {
        let entry_key = self.entry_key(key);
        if kv.delete(&entry_key).is_some() {
            let count = self.read_count(kv);
            self.write_count(kv, count.saturating_sub(1));
        }
    }

    pub fn length(&self, kv: &Kv) -> u64 {
        self.read_count(kv)
    }

    /// Keys in insertion order, with the `name\0` path prefix stripped.
    pub fn keys(&self, kv: &Kv) -> Vec<String> {
        let prefix_len = self.name.len() + 1;
        kv.scan(ENTRY_PREFIX, self.contract)
            .filter_map(|(storage_key, _)| {
                let bytes = storage_key.as_bytes();
                let path = &bytes[9..];
                if path.len() > prefix_len && path.starts_with(self.name.as_bytes()) && path[self.name.len()] == 0 {
                    String::from_utf8(path[prefix_len..].to_vec()).ok()
                } else {
                    None
                }
            })
            .collect()
    }
}
