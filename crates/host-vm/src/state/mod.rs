//! The stateful-variable layer: `value`, `map`, `imap`, and `array`
//! variable kinds, all layered over the prefixed `Kv` substrate (spec §4.7).

pub mod array;
pub mod imap;
pub mod kv;
pub mod map;
pub mod value;

pub(crate) fn encode_value(value: &host_json::Value, json_form: bool) -> crate::error::Result<Vec<u8>> {
    host_json::encode(value, json_form).map_err(Into::into)
}

pub(crate) fn decode_value(bytes: &[u8], hardfork: u32) -> crate::error::Result<host_json::Value> {
    host_json::decode(bytes, hardfork).map_err(Into::into)
}
