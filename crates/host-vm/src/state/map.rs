//! A keyed stateful variable (spec §4.7 `map`): up to
//! `MAX_STATE_DIMENSIONS` key segments compose one storage slot.

use super::{decode_value, encode_value};
use crate::error::{HostError, Result};
use crate::state::kv::{ContractId, Kv, StorageItem, StorageKey};
use host_json::Value;

const PREFIX: u8 = b'm';
/// Separate prefix for the persisted key-type tag record
/// (`_sv_meta-type_<name>`, spec §4.7), kept out of the data keyspace so it
/// never collides with a user-supplied key.
const META_TYPE_PREFIX: u8 = b'M';

/// The two key shapes a map is allowed to fix its first access to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyType {
    Number,
    String,
}

impl KeyType {
    fn of(value: &Value) -> Result<Self> {
        match value {
            Value::Int(_) | Value::Number(_) | Value::Bignum(_) => Ok(KeyType::Number),
            Value::Str(_) => Ok(KeyType::String),
            _ => Err(HostError::catchable("map key must be a number or string")),
        }
    }

    fn tag_byte(self) -> u8 {
        match self {
            KeyType::Number => b'n',
            KeyType::String => b's',
        }
    }

    fn from_tag_byte(byte: u8) -> Option<Self> {
        match byte {
            b'n' => Some(KeyType::Number),
            b's' => Some(KeyType::String),
            _ => None,
        }
    }
}

pub struct MapVar {
    contract: ContractId,
    name: String,
}

impl MapVar {
    pub fn new(contract: ContractId, name: impl Into<String>) -> Self {
        Self { contract, name: name.into() }
    }

    fn meta_key(&self) -> StorageKey {
        StorageKey::compose(META_TYPE_PREFIX, self.contract, self.name.as_bytes())
    }

    fn key(&self, dims: &[Value], json_form: bool) -> Result<StorageKey> {
        if dims.is_empty() || dims.len() > host_config::MAX_STATE_DIMENSIONS {
            return Err(HostError::catchable("map key dimension count out of range"));
        }
        let mut path = self.name.as_bytes().to_vec();
        for dim in dims {
            path.push(0);
            path.extend_from_slice(&encode_value(dim, json_form)?);
        }
        Ok(StorageKey::compose(PREFIX, self.contract, &path))
    }

    /// Fixes the key type on first write/read and type-checks every
    /// subsequent access against it (spec §4.7, §8 "Type-tag enforcement").
    fn check_key_type(&self, kv: &mut Kv, dims: &[Value]) -> Result<()> {
        let observed = KeyType::of(&dims[0])?;
        let meta_key = self.meta_key();
        match kv.get(&meta_key) {
            Some(item) => {
                let stored = item.value.first().copied().and_then(KeyType::from_tag_byte);
                match stored {
                    Some(stored) if stored == observed => Ok(()),
                    _ => Err(HostError::catchable("map key type does not match the type fixed on first access")),
                }
            }
            None => {
                kv.put(meta_key, StorageItem::new(vec![observed.tag_byte()]));
                Ok(())
            }
        }
    }

    pub fn get(&self, kv: &mut Kv, dims: &[Value], json_form: bool, hardfork: u32) -> Result<Option<Value>> {
        self.check_key_type(kv, dims)?;
        let key = self.key(dims, json_form)?;
        match kv.get(&key) {
            Some(item) => Ok(Some(decode_value(&item.value, hardfork)?)),
            None => Ok(None),
        }
    }

    pub fn set(&self, kv: &mut Kv, dims: &[Value], value: &Value, json_form: bool) -> Result<()> {
        self.check_key_type(kv, dims)?;
        let key = self.key(dims, json_form)?;
        let bytes = encode_value(value, json_form)?;
        if bytes.len() > host_config::MAX_STORAGE_VALUE_SIZE {
            return Err(HostError::uncatchable("storage value exceeds maximum size"));
        }
        kv.put(key, StorageItem::new(bytes));
        Ok(())
    }

    pub fn delete(&self, kv: &mut Kv, dims: &[Value], json_form: bool) -> Result<()> {
        self.check_key_type(kv, dims)?;
        let key = self.key(dims, json_form)?;
        kv.delete(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_dimensional_key_roundtrips() {
        let mut kv = Kv::new();
        let var = MapVar::new(1, "balances");
        let dims = vec![Value::str("alice"), Value::Int(2024)];
        var.set(&mut kv, &dims, &Value::Int(500), true).unwrap();
        let got = var.get(&mut kv, &dims, true, 4).unwrap().unwrap();
        assert!(matches!(got, Value::Int(500)));
    }

    #[test]
    fn rejects_too_many_dimensions() {
        let mut kv = Kv::new();
        let var = MapVar::new(1, "balances");
        let dims: Vec<Value> = (0..host_config::MAX_STATE_DIMENSIONS + 1).map(|i| Value::Int(i as i64)).collect();
        assert!(var.get(&mut kv, &dims, true, 4).is_err());
    }

    #[test]
    fn first_write_fixes_key_type() {
        let mut kv = Kv::new();
        let var = MapVar::new(1, "balances");
        var.set(&mut kv, &[Value::Int(1)], &Value::Int(10), true).unwrap();

        let err = var.set(&mut kv, &[Value::str("one")], &Value::Int(10), true).unwrap_err();
        assert!(err.is_catchable());
    }

    #[test]
    fn mismatched_read_fails_without_touching_state() {
        let mut kv = Kv::new();
        let var = MapVar::new(1, "balances");
        var.set(&mut kv, &[Value::Int(1)], &Value::Int(500), true).unwrap();

        assert!(var.get(&mut kv, &[Value::str("1")], true, 4).is_err());
        let got = var.get(&mut kv, &[Value::Int(1)], true, 4).unwrap().unwrap();
        assert!(matches!(got, Value::Int(500)));
    }
}
