//! Builds a frame: a concatenation of `[int32 LE length][byte type][payload]`
//! records (spec §4.3), `length` covering the type byte plus payload so a
//! reader can skip an item without knowing its tag.
//!
//! Grounded on the teacher's `neo-io::BinaryWriter` (`write_u8`/`write_u32`
//! naming, `BytesMut` backing buffer), generalized to tagged variable-length
//! items instead of a fixed wire format.

use crate::item::{tag_byte, Item};
use bytes::{BufMut, BytesMut};

pub struct FrameWriter {
    items: Vec<Item>,
}

impl FrameWriter {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn add_string(&mut self, value: impl Into<String>) -> &mut Self {
        self.items.push(Item::Str(value.into()));
        self
    }

    pub fn add_int(&mut self, value: i32) -> &mut Self {
        self.items.push(Item::Int(value));
        self
    }

    pub fn add_long(&mut self, value: i64) -> &mut Self {
        self.items.push(Item::Long(value));
        self
    }

    pub fn add_double(&mut self, value: f64) -> &mut Self {
        self.items.push(Item::Double(value));
        self
    }

    pub fn add_bool(&mut self, value: bool) -> &mut Self {
        self.items.push(Item::Bool(value));
        self
    }

    /// Adds a bignum parameter already reduced to its 63-bit magnitude
    /// (spec §4.9: "bignum (rejected when it exceeds 63 bits)"). Callers
    /// are expected to have performed that range check already.
    pub fn add_bignum(&mut self, value: i64) -> &mut Self {
        self.items.push(Item::Bignum(value));
        self
    }

    pub fn add_null(&mut self) -> &mut Self {
        self.items.push(Item::Null);
        self
    }

    pub fn get_count(&self) -> usize {
        self.items.len()
    }

    fn payload(item: &Item) -> Vec<u8> {
        let mut payload = Vec::new();
        match item {
            Item::Str(s) => payload.extend_from_slice(s.as_bytes()),
            Item::Int(i) => payload.extend_from_slice(&i.to_le_bytes()),
            Item::Long(l) => payload.extend_from_slice(&l.to_le_bytes()),
            Item::Double(d) => payload.extend_from_slice(&d.to_le_bytes()),
            Item::Bool(b) => payload.push(*b as u8),
            Item::Bignum(l) => payload.extend_from_slice(&l.to_le_bytes()),
            Item::Null => {}
        }
        payload
    }

    /// Serializes the accumulated items into a single frame: items
    /// concatenated back to back, each self-describing its own length —
    /// there is no frame-level item count (spec §4.3 "a frame is a
    /// concatenation of items").
    pub fn finish(&self) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(self.items.len() * 13);
        for item in &self.items {
            let payload = Self::payload(item);
            let length = 1 + payload.len();
            buf.put_i32_le(length as i32);
            buf.put_u8(tag_byte(item.tag()));
            buf.put_slice(&payload);
        }
        buf.to_vec()
    }
}

impl Default for FrameWriter {
    fn default() -> Self {
        Self::new()
    }
}
