//! End-to-end reproductions of the six seed scenarios.

use contract_host::{state::imap::ImapVar, state::value::ValueVar};
use contract_host::{Bignum, HostConfig, ServiceContext, ServiceId};
use host_json::Value;
use std::time::Duration;

fn new_ctx(hardfork: u32) -> ServiceContext {
    let config = HostConfig::builder().hardfork(hardfork).build();
    ServiceContext::new(ServiceId(1), config, Duration::from_secs(5), false)
}

#[test]
fn scenario_1_bignum_pow_range_check() {
    let two = Bignum::parse("2", 4).unwrap();
    let e256 = Bignum::parse("256", 4).unwrap();
    assert_eq!(two.pow(&e256).unwrap_err().to_string(), "bignum over max limit");

    let e255 = Bignum::parse("255", 4).unwrap();
    let result = two.pow(&e255).unwrap();
    assert_eq!(
        result.tostring(),
        "57896044618658097711785492504343953926634992332820282019728792003956564819968"
    );
}

fn int_field(fields: &indexmap::IndexMap<String, Value>, key: &str) -> i64 {
    match fields[key] {
        Value::Int(n) => n,
        _ => panic!("expected {key} to be an int"),
    }
}

#[test]
fn scenario_2_json_encode_sorts_keys() {
    use indexmap::indexmap;
    let obj = Value::object(indexmap! {
        "b".to_string() => Value::Int(1),
        "a".to_string() => Value::Int(2),
    });
    let bytes = host_json::encode(&obj, true).unwrap();
    assert_eq!(String::from_utf8(bytes).unwrap(), r#"{"a":2,"b":1}"#);
}

#[test]
fn scenario_3_json_encode_dense_vs_sparse_arrays() {
    use indexmap::indexmap;
    let dense = Value::object(indexmap! {
        "1".to_string() => Value::Int(10),
        "2".to_string() => Value::Int(20),
        "3".to_string() => Value::Int(30),
    });
    assert_eq!(String::from_utf8(host_json::encode(&dense, true).unwrap()).unwrap(), "[10,20,30]");

    let sparse = Value::object(indexmap! {
        "1".to_string() => Value::Int(10),
        "3".to_string() => Value::Int(30),
    });
    assert_eq!(
        String::from_utf8(host_json::encode(&sparse, true).unwrap()).unwrap(),
        r#"{"1":10,"3":30}"#
    );
}

#[test]
fn scenario_4_imap_delete_length_and_keys() {
    let mut ctx = new_ctx(4);
    let m = ImapVar::new(1, "m");
    m.set(ctx.kv_mut(), "1", &Value::Int(10), true).unwrap();
    m.set(ctx.kv_mut(), "2", &Value::Int(20), true).unwrap();
    m.delete(ctx.kv_mut(), "1");

    assert_eq!(m.length(ctx.kv()), 1);
    assert_eq!(m.keys(ctx.kv()), vec!["2".to_string()]);
}

#[test]
fn scenario_5_pcall_rollback_and_hardfork4_event_truncation() {
    use host_vm::Event;

    let mut ctx = new_ctx(4);
    let value = ValueVar::new(1, "state");
    ctx.open_recovery();
    let outcome: Result<(), String> = (|| {
        value.set(ctx.kv_mut(), &Value::Int(1), true).map_err(|e| e.to_string())?;
        ctx.events_mut().push(Event::new(1, "changed", vec![Value::Int(1)]));
        Err("x".to_string())
    })();

    let (ok, message) = match outcome {
        Ok(()) => (true, String::new()),
        Err(message) => {
            ctx.rollback_recovery();
            (false, message)
        }
    };

    assert!(!ok);
    assert_eq!(message, "x");
    assert!(value.get(ctx.kv(), 4).unwrap().is_none());
    assert_eq!(ctx.events().len(), 0);
}

#[test]
fn scenario_6_system_date_is_deterministic_at_epoch_zero() {
    let date = contract_host::system::date(&StubDriver(0));
    assert_eq!(date, "1970-01-01T00:00:00Z");

    let table = contract_host::system::date_table(&StubDriver(0));
    let Value::Object(fields) = table else { panic!("expected object") };
    let fields = fields.borrow();
    assert_eq!(int_field(&fields, "sec"), 0);
    assert_eq!(int_field(&fields, "min"), 0);
    assert_eq!(int_field(&fields, "hour"), 0);
    assert_eq!(int_field(&fields, "day"), 1);
    assert_eq!(int_field(&fields, "month"), 1);
    assert_eq!(int_field(&fields, "year"), 1970);
    assert_eq!(int_field(&fields, "wday"), 5);
    assert_eq!(int_field(&fields, "yday"), 1);
}

struct StubDriver(u64);

impl host_vm::HostDriver for StubDriver {
    fn current_block_height(&self) -> u64 {
        1
    }
    fn current_block_timestamp(&self) -> u64 {
        self.0
    }
    fn current_tx_hash(&self) -> [u8; 32] {
        [0u8; 32]
    }
    fn sender(&self) -> u64 {
        1
    }
    fn creator(&self, _contract: u64) -> Option<u64> {
        None
    }
    fn balance_of(&self, _account: u64) -> Bignum {
        Bignum::zero()
    }
    fn transfer(&mut self, _from: u64, _to: u64, _amount: &Bignum) -> bool {
        true
    }
    fn is_contract(&self, _account: u64) -> bool {
        false
    }
    fn random_seed(&self) -> u64 {
        0
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
    fn crypto_verify_proof(&self, _key: &[u8], _value: &[u8], _root: &[u8], _proof: &[Vec<u8>]) -> std::result::Result<bool, String> {
        Ok(true)
    }
}
