//! A stateful array variable, fixed-length or growable (spec §4.7 `array`).

use super::{decode_value, encode_value};
use crate::error::{HostError, Result};
use crate::state::kv::{ContractId, Kv, StorageItem, StorageKey};
use host_json::Value;

const ELEMENT_PREFIX: u8 = b'a';
const META_PREFIX: u8 = b'A';

pub struct ArrayVar {
    contract: ContractId,
    name: String,
    fixed_capacity: Option<u64>,
}

impl ArrayVar {
    pub fn dynamic(contract: ContractId, name: impl Into<String>) -> Self {
        Self { contract, name: name.into(), fixed_capacity: None }
    }

    pub fn fixed(contract: ContractId, name: impl Into<String>, capacity: u64) -> Self {
        Self { contract, name: name.into(), fixed_capacity: Some(capacity) }
    }

    fn element_key(&self, index: u64) -> StorageKey {
        let mut path = self.name.as_bytes().to_vec();
        path.push(0);
        path.extend_from_slice(&index.to_be_bytes());
        StorageKey::compose(ELEMENT_PREFIX, self.contract, &path)
    }

    fn meta_key(&self) -> StorageKey {
        StorageKey::compose(META_PREFIX, self.contract, self.name.as_bytes())
    }

    fn read_length(&self, kv: &Kv) -> u64 {
        match kv.get(&self.meta_key()) {
            Some(item) if item.value.len() == 8 => u64::from_le_bytes(item.value.clone().try_into().unwrap()),
            _ => 0,
        }
    }

    fn write_length(&self, kv: &mut Kv, length: u64) {
        kv.put(self.meta_key(), StorageItem::new(length.to_le_bytes().to_vec()));
    }

    pub fn length(&self, kv: &Kv) -> u64 {
        self.read_length(kv)
    }

    pub fn get(&self, kv: &Kv, index: u64, hardfork: u32) -> Result<Option<Value>> {
        if index >= self.read_length(kv) {
            return Ok(None);
        }
        match kv.get(&self.element_key(index)) {
            Some(item) => Ok(Some(decode_value(&item.value, hardfork)?)),
            None => Ok(None),
        }
    }

    pub fn set(&self, kv: &mut Kv, index: u64, value: &Value, json_form: bool) -> Result<()> {
        if let Some(capacity) = self.fixed_capacity {
            if index >= capacity {
                return Err(HostError::catchable("array index out of bounds"));
            }
        } else if index > self.read_length(kv) {
            return Err(HostError::catchable("array index out of bounds"));
        }

        let bytes = encode_value(value, json_form)?;
        if bytes.len() > host_config::MAX_STORAGE_VALUE_SIZE {
            return Err(HostError::uncatchable("storage value exceeds maximum size"));
        }
        kv.put(self.element_key(index), StorageItem::new(bytes));

        let length = self.read_length(kv);
        if index >= length {
            self.write_length(kv, index + 1);
        }
        Ok(())
    }

    /// Appends to the end; rejected once a fixed-capacity array is full.
    pub fn push(&self, kv: &mut Kv, value: &Value, json_form: bool) -> Result<u64> {
        let length = self.read_length(kv);
        if let Some(capacity) = self.fixed_capacity {
            if length >= capacity {
                return Err(HostError::catchable("array is at fixed capacity"));
            }
        }
        self.set(kv, length, value, json_form)?;
        Ok(length)
    }

    pub fn pop(&self, kv: &mut Kv, hardfork: u32) -> Result<Option<Value>> {
        let length = self.read_length(kv);
        if length == 0 {
            return Ok(None);
        }
        let last_index = length - 1;
        let value = match kv.delete(&self.element_key(last_index)) {
            Some(item) => Some(decode_value(&item.value, hardfork)?),
            None => None,
        };
        self.write_length(kv, last_index);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_track_length() {
        let mut kv = Kv::new();
        let arr = ArrayVar::dynamic(1, "queue");
        arr.push(&mut kv, &Value::Int(10), true).unwrap();
        arr.push(&mut kv, &Value::Int(20), true).unwrap();
        assert_eq!(arr.length(&kv), 2);
        assert!(matches!(arr.pop(&mut kv, 4).unwrap(), Some(Value::Int(20))));
        assert_eq!(arr.length(&kv), 1);
    }

    #[test]
    fn fixed_capacity_rejects_overflow() {
        let mut kv = Kv::new();
        let arr = ArrayVar::fixed(1, "slots", 2);
        arr.set(&mut kv, 0, &Value::Int(1), true).unwrap();
        arr.set(&mut kv, 1, &Value::Int(2), true).unwrap();
        assert!(arr.set(&mut kv, 2, &Value::Int(3), true).is_err());
    }
}
