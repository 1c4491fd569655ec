//! The script value tagged union crossing the host↔contract boundary
//! (spec §3 "Script value tagged union").
//!
//! Arrays and objects are reference types (`Rc<RefCell<_>>`), mirroring the
//! script engine's table semantics closely enough that a contract-built
//! structure can legitimately contain itself — which is exactly the case
//! the encoder's cycle detector (spec §4.2.6) exists to catch.

use host_bignum::Bignum;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

pub type ArrayRef = Rc<RefCell<Vec<Value>>>;
pub type ObjectRef = Rc<RefCell<IndexMap<String, Value>>>;

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    /// IEEE-754 double; NaN/Inf are rejected at encode time, never constructed directly.
    Number(f64),
    Str(Vec<u8>),
    Array(ArrayRef),
    Object(ObjectRef),
    Bignum(Bignum),
}

impl Value {
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    pub fn object(entries: IndexMap<String, Value>) -> Self {
        Value::Object(Rc::new(RefCell::new(entries)))
    }

    pub fn str(s: impl Into<Vec<u8>>) -> Self {
        Value::Str(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s.into_bytes())
    }
}

impl From<Bignum> for Value {
    fn from(b: Bignum) -> Self {
        Value::Bignum(b)
    }
}
