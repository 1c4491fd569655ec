//! Deterministic JSON codec for values crossing the host/contract boundary.
//!
//! Grounded on the teacher's `neo-json::jtoken` tagged-union-plus-codec
//! split, generalized to the script value set and canonical ordering rules
//! this host requires (spec §4.2).

mod codec;
mod error;
mod value;

pub use codec::{decode, encode};
pub use error::{JsonError, Result};
pub use value::{ArrayRef, ObjectRef, Value};
