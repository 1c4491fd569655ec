//! A single stateful scalar/structured slot (spec §4.7 `value`).

use super::{decode_value, encode_value};
use crate::driver::HostDriver;
use crate::error::{HostError, Result};
use crate::state::kv::{ContractId, Kv, StorageItem, StorageKey};
use host_json::Value;

const PREFIX: u8 = b'v';

pub struct ValueVar {
    contract: ContractId,
    name: String,
}

impl ValueVar {
    pub fn new(contract: ContractId, name: impl Into<String>) -> Self {
        Self { contract, name: name.into() }
    }

    fn key(&self) -> StorageKey {
        StorageKey::compose(PREFIX, self.contract, self.name.as_bytes())
    }

    pub fn get(&self, kv: &Kv, hardfork: u32) -> Result<Option<Value>> {
        match kv.get(&self.key()) {
            Some(item) => Ok(Some(decode_value(&item.value, hardfork)?)),
            None => Ok(None),
        }
    }

    /// `get([block])`: an optional block height routes the read to the
    /// node's `getVariable(name, blkno)` snapshot lookup instead of the
    /// live KV store (spec §4.7).
    pub fn get_at(&self, kv: &Kv, driver: &dyn HostDriver, block: Option<u64>, hardfork: u32) -> Result<Option<Value>> {
        match block {
            None => self.get(kv, hardfork),
            Some(height) => match driver.get_db(self.contract, self.name.as_bytes(), Some(height)) {
                Some(bytes) => Ok(Some(decode_value(&bytes, hardfork)?)),
                None => Ok(None),
            },
        }
    }

    pub fn set(&self, kv: &mut Kv, value: &Value, json_form: bool) -> Result<()> {
        let bytes = encode_value(value, json_form)?;
        if bytes.len() > host_config::MAX_STORAGE_VALUE_SIZE {
            return Err(HostError::uncatchable("storage value exceeds maximum size"));
        }
        kv.put(self.key(), StorageItem::new(bytes));
        Ok(())
    }

    pub fn delete(&self, kv: &mut Kv) {
        kv.delete(&self.key());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use host_bignum::Bignum;

    #[test]
    fn set_then_get_roundtrips() {
        let mut kv = Kv::new();
        let var = ValueVar::new(1, "counter");
        var.set(&mut kv, &Value::Int(42), true).unwrap();
        let got = var.get(&kv, 4).unwrap().unwrap();
        assert!(matches!(got, Value::Int(42)));
    }

    #[test]
    fn delete_clears_slot() {
        let mut kv = Kv::new();
        let var = ValueVar::new(1, "counter");
        var.set(&mut kv, &Value::Int(1), true).unwrap();
        var.delete(&mut kv);
        assert!(var.get(&kv, 4).unwrap().is_none());
    }

    struct StubDriver {
        snapshot: Option<Vec<u8>>,
    }

    impl HostDriver for StubDriver {
        fn current_block_height(&self) -> u64 {
            0
        }
        fn current_block_timestamp(&self) -> u64 {
            0
        }
        fn current_tx_hash(&self) -> [u8; 32] {
            [0; 32]
        }
        fn sender(&self) -> u64 {
            0
        }
        fn creator(&self, _contract: u64) -> Option<u64> {
            None
        }
        fn balance_of(&self, _account: u64) -> Bignum {
            Bignum::zero()
        }
        fn transfer(&mut self, _from: u64, _to: u64, _amount: &Bignum) -> bool {
            false
        }
        fn is_contract(&self, _account: u64) -> bool {
            false
        }
        fn random_seed(&self) -> u64 {
            0
        }
        fn get_db(&self, _contract: u64, _key: &[u8], block: Option<u64>) -> Option<Vec<u8>> {
            block.and(self.snapshot.clone())
        }
        fn crypto_sha256(&self, _data: &[u8]) -> [u8; 32] {
            [0; 32]
        }
        fn crypto_keccak256(&self, _data: &[u8]) -> [u8; 32] {
            [0; 32]
        }
        fn crypto_ecverify(&self, _msg: &[u8], _sig: &[u8], _addr: &[u8]) -> std::result::Result<bool, String> {
            Ok(true)
        }
        fn crypto_verify_proof(
            &self,
            _key: &[u8],
            _value: &[u8],
            _root: &[u8],
            _proof: &[Vec<u8>],
        ) -> std::result::Result<bool, String> {
            Ok(true)
        }
    }

    #[test]
    fn get_at_without_block_reads_live_store() {
        let mut kv = Kv::new();
        let var = ValueVar::new(1, "counter");
        var.set(&mut kv, &Value::Int(7), true).unwrap();
        let driver = StubDriver { snapshot: None };
        let got = var.get_at(&kv, &driver, None, 4).unwrap().unwrap();
        assert!(matches!(got, Value::Int(7)));
    }

    #[test]
    fn get_at_with_block_routes_to_driver_snapshot() {
        let kv = Kv::new();
        let var = ValueVar::new(1, "counter");
        let encoded = encode_value(&Value::Int(99), true).unwrap();
        let driver = StubDriver { snapshot: Some(encoded) };
        let got = var.get_at(&kv, &driver, Some(10), 4).unwrap().unwrap();
        assert!(matches!(got, Value::Int(99)));
    }
}
