//! Canonical encode/decode between `Value` and UTF-8 JSON bytes (spec §4.2).

use crate::error::{JsonError, Result};
use crate::value::Value;
use host_bignum::Bignum;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::rc::Rc;

/// Encodes a value to canonical JSON bytes.
///
/// `json_form` selects whether an `Object` whose keys form a dense 1-based
/// integer run {1..N} is coerced to a JSON array (the behavior used at
/// system boundaries such as `system.print` and, at hardfork ≥ 2, event
/// arguments — spec §4.8 `contract.event`). When `false`, objects are
/// always emitted as objects, matching the pre-hardfork-2 legacy event form.
pub fn encode(value: &Value, json_form: bool) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut visited = HashSet::new();
    encode_value(value, json_form, &mut visited, &mut out)?;
    Ok(out)
}

fn encode_value(
    value: &Value,
    json_form: bool,
    visited: &mut HashSet<usize>,
    out: &mut Vec<u8>,
) -> Result<()> {
    match value {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(true) => out.extend_from_slice(b"true"),
        Value::Bool(false) => out.extend_from_slice(b"false"),
        Value::Int(i) => out.extend_from_slice(i.to_string().as_bytes()),
        Value::Number(n) => {
            if !n.is_finite() {
                return Err(JsonError::NonFiniteNumber);
            }
            out.extend_from_slice(format_double(*n).as_bytes());
        }
        Value::Str(bytes) => encode_string_bytes(bytes, out),
        Value::Bignum(b) => {
            out.extend_from_slice(b"{\"_bignum\":");
            encode_string_bytes(b.tostring().as_bytes(), out);
            out.push(b'}');
        }
        Value::Array(items) => {
            let ptr = Rc::as_ptr(items) as usize;
            if !visited.insert(ptr) {
                return Err(JsonError::NestedTable);
            }
            out.push(b'[');
            let borrowed = items.borrow();
            for (i, item) in borrowed.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                encode_value(item, json_form, visited, out)?;
            }
            out.push(b']');
            visited.remove(&ptr);
        }
        Value::Object(map) => {
            let ptr = Rc::as_ptr(map) as usize;
            if !visited.insert(ptr) {
                return Err(JsonError::NestedTable);
            }
            let borrowed = map.borrow();
            if json_form {
                if let Some(dense) = dense_integer_run(&borrowed) {
                    out.push(b'[');
                    for (i, item) in dense.iter().enumerate() {
                        if i > 0 {
                            out.push(b',');
                        }
                        encode_value(item, json_form, visited, out)?;
                    }
                    out.push(b']');
                    visited.remove(&ptr);
                    return Ok(());
                }
            }
            encode_object(&borrowed, json_form, visited, out)?;
            visited.remove(&ptr);
        }
    }
    Ok(())
}

fn encode_object(
    map: &IndexMap<String, Value>,
    json_form: bool,
    visited: &mut HashSet<usize>,
    out: &mut Vec<u8>,
) -> Result<()> {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort_by(|a, b| {
        let ea = escape_key(a);
        let eb = escape_key(b);
        ea.cmp(&eb).then_with(|| a.len().cmp(&b.len()))
    });

    out.push(b'{');
    for (i, key) in keys.into_iter().enumerate() {
        if i > 0 {
            out.push(b',');
        }
        encode_string_bytes(key.as_bytes(), out);
        out.push(b':');
        encode_value(&map[key], json_form, visited, out)?;
    }
    out.push(b'}');
    Ok(())
}

fn escape_key(key: &str) -> Vec<u8> {
    let mut out = Vec::new();
    encode_string_bytes(key.as_bytes(), &mut out);
    out
}

/// Returns the dense-array view of an object whose keys are exactly the
/// decimal strings `"1"..="N"`, in ascending order; `None` otherwise
/// (spec §4.2.2 "sparse" fallback).
fn dense_integer_run(map: &IndexMap<String, Value>) -> Option<Vec<Value>> {
    if map.is_empty() {
        return None;
    }
    let mut indexed: Vec<(u64, &Value)> = Vec::with_capacity(map.len());
    for (key, value) in map.iter() {
        let n: u64 = key.parse().ok()?;
        if n == 0 {
            return None;
        }
        indexed.push((n, value));
    }
    indexed.sort_by_key(|(n, _)| *n);
    for (expected, (n, _)) in indexed.iter().enumerate() {
        if *n != expected as u64 + 1 {
            return None;
        }
    }
    Some(indexed.into_iter().map(|(_, v)| v.clone()).collect())
}

/// Renders a non-integral double with up to 14 significant digits,
/// trimming trailing zeros (spec §4.2.3).
fn format_double(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        return format!("{:.1}", n);
    }
    let digits_before_point = integer_digit_count(n);
    let precision = 14usize.saturating_sub(digits_before_point);
    let formatted = format!("{:.*}", precision, n);
    trim_trailing_zeros(&formatted)
}

fn integer_digit_count(n: f64) -> usize {
    let i = n.abs().trunc();
    if i < 1.0 {
        1
    } else {
        (i.log10().floor() as usize) + 1
    }
}

fn trim_trailing_zeros(s: &str) -> String {
    if !s.contains('.') {
        return s.to_string();
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() { "0".to_string() } else { trimmed.to_string() }
}

fn encode_string_bytes(bytes: &[u8], out: &mut Vec<u8>) {
    out.push(b'"');
    // Strings are treated as UTF-8 byte strings at the boundary (spec §3).
    let text = String::from_utf8_lossy(bytes);
    for ch in text.chars() {
        match ch {
            '"' => out.extend_from_slice(b"\\\""),
            '\\' => out.extend_from_slice(b"\\\\"),
            '\n' => out.extend_from_slice(b"\\n"),
            '\t' => out.extend_from_slice(b"\\t"),
            '\r' => out.extend_from_slice(b"\\r"),
            '\u{8}' => out.extend_from_slice(b"\\b"),
            '\u{c}' => out.extend_from_slice(b"\\f"),
            c if (c as u32) <= 0x1F => {
                out.extend_from_slice(format!("\\u{:04x}", c as u32).as_bytes());
            }
            c => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
    out.push(b'"');
}

/// Decodes canonical JSON bytes into a `Value`.
///
/// At `hardfork ≥ 2`, an integral `Number` token decodes as `Value::Int`
/// instead of `Value::Number` (spec §4.2.7).
pub fn decode(bytes: &[u8], hardfork: u32) -> Result<Value> {
    let text = std::str::from_utf8(bytes).map_err(|_| JsonError::InvalidEscape)?;
    let mut parser = Parser { chars: text.char_indices().collect(), pos: 0, hardfork };
    parser.skip_ws();
    let value = parser.parse_value()?;
    parser.skip_ws();
    if parser.pos != parser.chars.len() {
        return Err(JsonError::Parse("trailing data".to_string()));
    }
    Ok(value)
}

struct Parser {
    chars: Vec<(usize, char)>,
    pos: usize,
    hardfork: u32,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|(_, c)| *c)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        self.pos += 1;
        c
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(' ') | Some('\t') | Some('\n') | Some('\r')) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, c: char) -> Result<()> {
        if self.bump() == Some(c) {
            Ok(())
        } else {
            Err(JsonError::Parse(format!("expected '{}'", c)))
        }
    }

    fn parse_value(&mut self) -> Result<Value> {
        self.skip_ws();
        match self.peek() {
            Some('n') => self.parse_literal("null", Value::Null),
            Some('t') => self.parse_literal("true", Value::Bool(true)),
            Some('f') => self.parse_literal("false", Value::Bool(false)),
            Some('"') => Ok(Value::Str(self.parse_string()?.into_bytes())),
            Some('[') => self.parse_array(),
            Some('{') => self.parse_object(),
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_number(),
            _ => Err(JsonError::Parse("unexpected token".to_string())),
        }
    }

    fn parse_literal(&mut self, literal: &str, value: Value) -> Result<Value> {
        for expected in literal.chars() {
            if self.bump() != Some(expected) {
                return Err(JsonError::Parse(format!("expected '{}'", literal)));
            }
        }
        Ok(value)
    }

    fn parse_string(&mut self) -> Result<String> {
        self.expect('"')?;
        let mut s = String::new();
        loop {
            match self.bump() {
                None => return Err(JsonError::Parse("unterminated string".to_string())),
                Some('"') => break,
                Some('\\') => match self.bump() {
                    Some('"') => s.push('"'),
                    Some('\\') => s.push('\\'),
                    Some('/') => s.push('/'),
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some('r') => s.push('\r'),
                    Some('b') => s.push('\u{8}'),
                    Some('f') => s.push('\u{c}'),
                    Some('u') => {
                        let cp = self.parse_hex4()?;
                        if (0xD800..=0xDBFF).contains(&cp) {
                            // High surrogate: expect a following \uXXXX low surrogate.
                            if self.bump() != Some('\\') || self.bump() != Some('u') {
                                return Err(JsonError::InvalidEscape);
                            }
                            let low = self.parse_hex4()?;
                            if !(0xDC00..=0xDFFF).contains(&low) {
                                return Err(JsonError::InvalidEscape);
                            }
                            let combined = 0x10000
                                + ((cp - 0xD800) << 10)
                                + (low - 0xDC00);
                            let ch = char::from_u32(combined).ok_or(JsonError::InvalidEscape)?;
                            s.push(ch);
                        } else {
                            let ch = char::from_u32(cp).ok_or(JsonError::InvalidEscape)?;
                            s.push(ch);
                        }
                    }
                    _ => return Err(JsonError::InvalidEscape),
                },
                Some(c) => s.push(c),
            }
        }
        Ok(s)
    }

    fn parse_hex4(&mut self) -> Result<u32> {
        let mut value = 0u32;
        for _ in 0..4 {
            let c = self.bump().ok_or(JsonError::InvalidEscape)?;
            let digit = c.to_digit(16).ok_or(JsonError::InvalidEscape)?;
            value = value * 16 + digit;
        }
        Ok(value)
    }

    fn parse_number(&mut self) -> Result<Value> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.pos += 1;
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
        let mut is_float = false;
        if self.peek() == Some('.') {
            is_float = true;
            self.pos += 1;
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            is_float = true;
            self.pos += 1;
            if matches!(self.peek(), Some('+') | Some('-')) {
                self.pos += 1;
            }
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        let text: String = self.chars[start..self.pos].iter().map(|(_, c)| *c).collect();

        if !is_float {
            if let Ok(i) = text.parse::<i64>() {
                return Ok(Value::Int(i));
            }
        }
        let d: f64 = text.parse().map_err(|_| JsonError::Parse("bad number".to_string()))?;
        if self.hardfork >= 2 && d.fract() == 0.0 && d.is_finite() && d.abs() < (i64::MAX as f64) {
            Ok(Value::Int(d as i64))
        } else {
            Ok(Value::Number(d))
        }
    }

    fn parse_array(&mut self) -> Result<Value> {
        self.expect('[')?;
        let mut items = Vec::new();
        self.skip_ws();
        if self.peek() == Some(']') {
            self.pos += 1;
            return Ok(Value::array(items));
        }
        loop {
            items.push(self.parse_value()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => {
                    self.skip_ws();
                    continue;
                }
                Some(']') => break,
                _ => return Err(JsonError::Parse("expected ',' or ']'".to_string())),
            }
        }
        Ok(Value::array(items))
    }

    fn parse_object(&mut self) -> Result<Value> {
        self.expect('{')?;
        let mut map = IndexMap::new();
        self.skip_ws();
        if self.peek() == Some('}') {
            self.pos += 1;
            return Ok(Value::object(map));
        }
        loop {
            self.skip_ws();
            let key = self.parse_string()?;
            self.skip_ws();
            self.expect(':')?;
            let value = self.parse_value()?;
            if map.insert(key.clone(), value).is_some() {
                return Err(JsonError::DuplicateKey(key));
            }
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some('}') => break,
                _ => return Err(JsonError::Parse("expected ',' or '}'".to_string())),
            }
        }

        if map.len() == 1 && map.contains_key("_bignum") {
            let raw = match map.get("_bignum") {
                Some(Value::Str(bytes)) => String::from_utf8_lossy(bytes).into_owned(),
                _ => return Err(JsonError::InvalidBignumEnvelope),
            };
            let bignum = Bignum::parse(&raw, self.hardfork).map_err(|_| JsonError::InvalidBignumEnvelope)?;
            return Ok(Value::Bignum(bignum));
        }
        if map.contains_key("_bignum") && map.len() != 1 {
            return Err(JsonError::InvalidBignumEnvelope);
        }

        Ok(Value::object(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::indexmap;
    use std::cell::RefCell;

    #[test]
    fn encode_sorts_keys() {
        let obj = Value::object(indexmap! {
            "b".to_string() => Value::Int(1),
            "a".to_string() => Value::Int(2),
        });
        let bytes = encode(&obj, true).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), r#"{"a":2,"b":1}"#);
    }

    #[test]
    fn encode_dense_array_vs_sparse_object() {
        let dense = Value::object(indexmap! {
            "1".to_string() => Value::Int(10),
            "2".to_string() => Value::Int(20),
            "3".to_string() => Value::Int(30),
        });
        assert_eq!(String::from_utf8(encode(&dense, true).unwrap()).unwrap(), "[10,20,30]");

        let sparse = Value::object(indexmap! {
            "1".to_string() => Value::Int(10),
            "3".to_string() => Value::Int(30),
        });
        assert_eq!(
            String::from_utf8(encode(&sparse, true).unwrap()).unwrap(),
            r#"{"1":10,"3":30}"#
        );
    }

    #[test]
    fn bignum_envelope_roundtrip() {
        let value = Value::Bignum(Bignum::from_i64(42));
        let bytes = encode(&value, true).unwrap();
        assert_eq!(String::from_utf8(bytes.clone()).unwrap(), r#"{"_bignum":"42"}"#);
        let decoded = decode(&bytes, 4).unwrap();
        match decoded {
            Value::Bignum(b) => assert_eq!(b.tostring(), "42"),
            _ => panic!("expected bignum"),
        }
    }

    #[test]
    fn cycle_detection_fails() {
        let arr = Rc::new(RefCell::new(Vec::new()));
        arr.borrow_mut().push(Value::Int(1));
        let cyclic = Value::Array(arr.clone());
        arr.borrow_mut().push(cyclic.clone());
        let err = encode(&cyclic, true).unwrap_err();
        assert_eq!(err, JsonError::NestedTable);
    }

    #[test]
    fn control_chars_escape() {
        let value = Value::str(vec![0x01, b'a']);
        let bytes = encode(&value, true).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), r#""\u0001a""#);
    }

    #[test]
    fn hardfork2_decodes_integral_double_as_int() {
        let decoded = decode(b"5.0", 2).unwrap();
        assert!(matches!(decoded, Value::Int(5)));
        let decoded_pre = decode(b"5.0", 1).unwrap();
        assert!(matches!(decoded_pre, Value::Number(n) if n == 5.0));
    }

    #[test]
    fn rejects_nan_and_infinity() {
        let value = Value::Number(f64::NAN);
        assert_eq!(encode(&value, true).unwrap_err(), JsonError::NonFiniteNumber);
    }
}
