//! Parses a frame written by `FrameWriter` back into indexed items.
//!
//! Grounded on the teacher's `neo-io::MemoryReader` (`ensure_position`/
//! bounds-checked `read_*` style), generalized to tagged records addressed
//! by item index rather than byte offset.

use crate::error::{IpcError, Result};
use crate::item::{tag_from_byte, Item};

pub struct FrameReader {
    items: Vec<Item>,
}

impl FrameReader {
    /// Parses a frame: a concatenation of `[int32 LE length][byte type]
    /// [payload]` records, `length` covering the type byte plus payload, with
    /// no frame-level item count (spec §4.3 "a frame is a concatenation of
    /// items").
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut pos = 0usize;
        let mut items = Vec::new();
        while pos < bytes.len() {
            let length = read_i32(bytes, &mut pos)?;
            if length < 1 {
                return Err(IpcError::MalformedItem(length));
            }
            let record = read_bytes(bytes, &mut pos, length as usize)?;
            let tag_raw = record[0];
            let tag = tag_from_byte(tag_raw).ok_or(IpcError::UnknownItemType(tag_raw))?;
            let payload = &record[1..];
            let item = match tag {
                's' => Item::Str(String::from_utf8(payload.to_vec()).map_err(|_| IpcError::InvalidUtf8)?),
                'i' => Item::Int(i32::from_le_bytes(
                    payload.try_into().map_err(|_| IpcError::MalformedItem(length))?,
                )),
                'l' => Item::Long(i64::from_le_bytes(
                    payload.try_into().map_err(|_| IpcError::MalformedItem(length))?,
                )),
                'd' => Item::Double(f64::from_le_bytes(
                    payload.try_into().map_err(|_| IpcError::MalformedItem(length))?,
                )),
                'b' => {
                    if payload.len() != 1 {
                        return Err(IpcError::MalformedItem(length));
                    }
                    Item::Bool(payload[0] != 0)
                }
                'n' => {
                    if !payload.is_empty() {
                        return Err(IpcError::MalformedItem(length));
                    }
                    Item::Null
                }
                _ => unreachable!("tag_from_byte only returns known tags"),
            };
            items.push(item);
        }
        Ok(Self { items })
    }

    pub fn get_count(&self) -> usize {
        self.items.len()
    }

    pub fn get_type(&self, position: usize) -> Result<char> {
        self.at(position).map(Item::tag)
    }

    pub fn get_item(&self, position: usize) -> Result<&Item> {
        self.items.get(position).ok_or(IpcError::IndexOutOfBounds(position))
    }

    pub fn get_string(&self, position: usize) -> Result<&str> {
        match self.get_item(position)? {
            Item::Str(s) => Ok(s.as_str()),
            other => Err(IpcError::TypeMismatch { expected: 's', found: other.tag() }),
        }
    }

    pub fn get_int(&self, position: usize) -> Result<i32> {
        match self.get_item(position)? {
            Item::Int(i) => Ok(*i),
            other => Err(IpcError::TypeMismatch { expected: 'i', found: other.tag() }),
        }
    }

    pub fn get_long(&self, position: usize) -> Result<i64> {
        match self.get_item(position)? {
            Item::Long(l) => Ok(*l),
            Item::Bignum(l) => Ok(*l),
            other => Err(IpcError::TypeMismatch { expected: 'l', found: other.tag() }),
        }
    }

    pub fn get_double(&self, position: usize) -> Result<f64> {
        match self.get_item(position)? {
            Item::Double(d) => Ok(*d),
            other => Err(IpcError::TypeMismatch { expected: 'd', found: other.tag() }),
        }
    }

    pub fn get_bool(&self, position: usize) -> Result<bool> {
        match self.get_item(position)? {
            Item::Bool(b) => Ok(*b),
            other => Err(IpcError::TypeMismatch { expected: 'b', found: other.tag() }),
        }
    }

    fn at(&self, position: usize) -> Result<Item> {
        self.items.get(position).cloned().ok_or(IpcError::IndexOutOfBounds(position))
    }

    /// Advances `cursor` and returns the item it pointed to, or `None` once
    /// the frame is exhausted (the bridge's streaming-iterator access path).
    pub fn get_next_item(&self, cursor: &mut usize) -> Option<&Item> {
        let item = self.items.get(*cursor);
        if item.is_some() {
            *cursor += 1;
        }
        item
    }
}

fn ensure(bytes: &[u8], pos: usize, needed: usize) -> Result<()> {
    if pos + needed > bytes.len() {
        Err(IpcError::Truncated { position: pos, needed })
    } else {
        Ok(())
    }
}

fn read_bytes<'a>(bytes: &'a [u8], pos: &mut usize, len: usize) -> Result<&'a [u8]> {
    ensure(bytes, *pos, len)?;
    let slice = &bytes[*pos..*pos + len];
    *pos += len;
    Ok(slice)
}

fn read_i32(bytes: &[u8], pos: &mut usize) -> Result<i32> {
    let raw = read_bytes(bytes, pos, 4)?;
    Ok(i32::from_le_bytes(raw.try_into().expect("length checked above")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::FrameWriter;

    #[test]
    fn roundtrip_all_item_types() {
        let mut w = FrameWriter::new();
        w.add_string("hello").add_int(-7).add_long(42).add_double(1.5).add_bool(true).add_null();
        let bytes = w.finish();

        let r = FrameReader::parse(&bytes).unwrap();
        assert_eq!(r.get_count(), 6);
        assert_eq!(r.get_string(0).unwrap(), "hello");
        assert_eq!(r.get_int(1).unwrap(), -7);
        assert_eq!(r.get_long(2).unwrap(), 42);
        assert_eq!(r.get_double(3).unwrap(), 1.5);
        assert!(r.get_bool(4).unwrap());
        assert_eq!(r.get_type(5).unwrap(), 'n');
    }

    #[test]
    fn bignum_item_reads_back_as_long() {
        let mut w = FrameWriter::new();
        w.add_bignum(123456789);
        let bytes = w.finish();
        let r = FrameReader::parse(&bytes).unwrap();
        assert_eq!(r.get_long(0).unwrap(), 123456789);
    }

    #[test]
    fn next_item_cursor_advances() {
        let mut w = FrameWriter::new();
        w.add_int(1).add_int(2);
        let bytes = w.finish();
        let r = FrameReader::parse(&bytes).unwrap();
        let mut cursor = 0;
        assert_eq!(r.get_next_item(&mut cursor), Some(&Item::Int(1)));
        assert_eq!(r.get_next_item(&mut cursor), Some(&Item::Int(2)));
        assert_eq!(r.get_next_item(&mut cursor), None);
    }

    #[test]
    fn truncated_frame_errors() {
        let bytes = vec![5, 0, 0, 0];
        let err = FrameReader::parse(&bytes).unwrap_err();
        assert!(matches!(err, IpcError::Truncated { .. }));
    }

    #[test]
    fn type_mismatch_errors() {
        let mut w = FrameWriter::new();
        w.add_int(1);
        let bytes = w.finish();
        let r = FrameReader::parse(&bytes).unwrap();
        let err = r.get_string(0).unwrap_err();
        assert_eq!(err, IpcError::TypeMismatch { expected: 's', found: 'i' });
    }
}
