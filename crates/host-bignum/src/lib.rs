//! Arbitrary-precision integer bounded to ±(2²⁵⁶−1) (spec §4.1).
//!
//! Grounded on the teacher's `neo-vm::gas_calculator` pattern of pairing a
//! small, pure value type with a static cost table (`host_config::gas`);
//! the clamping/range-check discipline itself comes from
//! `original_source/contract/bignum_module.c`.

mod error;

pub use error::{BignumError, Result};

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use once_cell::sync::Lazy;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// The closed range bound M = 2²⁵⁶ − 1.
static RANGE_MAX: Lazy<BigInt> = Lazy::new(|| (BigInt::from(1) << 256) - BigInt::from(1));
static RANGE_MIN: Lazy<BigInt> = Lazy::new(|| -(&*RANGE_MAX));

/// A reference-owned, range-clamped signed integer (spec §3 "Bignum").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Bignum(BigInt);

impl Bignum {
    /// The process-wide maximum value singleton.
    pub fn max_value() -> Self {
        Self(RANGE_MAX.clone())
    }

    /// The process-wide minimum value singleton.
    pub fn min_value() -> Self {
        Self(RANGE_MIN.clone())
    }

    pub fn zero() -> Self {
        Self(BigInt::zero())
    }

    fn in_range(value: &BigInt) -> Result<()> {
        if *value > *RANGE_MAX {
            Err(BignumError::OverMaxLimit)
        } else if *value < *RANGE_MIN {
            Err(BignumError::UnderMinLimit)
        } else {
            Ok(())
        }
    }

    fn clamp_new(value: BigInt) -> Result<Self> {
        Self::in_range(&value)?;
        Ok(Self(value))
    }

    /// Constructs a bignum from an `i64`, always in range.
    pub fn from_i64(value: i64) -> Self {
        Self(BigInt::from(value))
    }

    /// Parses a decimal, `0x`-hex, or `0b`-binary literal (spec §4.1).
    ///
    /// At hardfork ≥ 4, octal interpretation is disabled and leading zeros
    /// are stripped before parsing. At hardfork ≥ 3, all radix prefixes are
    /// stripped (the literal is always read as decimal).
    pub fn parse(input: &str, hardfork: u32) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(BignumError::InvalidNumberString);
        }

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        if unsigned.len() > host_config::MAX_BIGNUM_DIGITS + 2 {
            return Err(BignumError::NotEnoughMemory);
        }

        let parsed = if hardfork >= 3 {
            // All radix prefixes stripped: read as plain decimal digits only.
            let digits = unsigned.trim_start_matches("0x").trim_start_matches("0b");
            BigInt::from_str(digits).map_err(|_| BignumError::InvalidNumberString)?
        } else if let Some(hex) = unsigned.strip_prefix("0x").or_else(|| unsigned.strip_prefix("0X")) {
            BigInt::parse_bytes(hex.as_bytes(), 16).ok_or(BignumError::InvalidNumberString)?
        } else if let Some(bin) = unsigned.strip_prefix("0b").or_else(|| unsigned.strip_prefix("0B")) {
            BigInt::parse_bytes(bin.as_bytes(), 2).ok_or(BignumError::InvalidNumberString)?
        } else if hardfork >= 4 {
            // Octal disabled; leading zeros stripped before decimal parsing.
            let stripped = unsigned.trim_start_matches('0');
            let digits = if stripped.is_empty() { "0" } else { stripped };
            BigInt::from_str(digits).map_err(|_| BignumError::InvalidNumberString)?
        } else if unsigned.len() > 1 && unsigned.starts_with('0') {
            BigInt::parse_bytes(unsigned.as_bytes(), 8).ok_or(BignumError::InvalidNumberString)?
        } else {
            BigInt::from_str(unsigned).map_err(|_| BignumError::InvalidNumberString)?
        };

        let value = if negative { -parsed } else { parsed };
        Self::clamp_new(value)
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    pub fn add(&self, other: &Self) -> Result<Self> {
        Self::clamp_new(&self.0 + &other.0)
    }

    pub fn sub(&self, other: &Self) -> Result<Self> {
        Self::clamp_new(&self.0 - &other.0)
    }

    pub fn mul(&self, other: &Self) -> Result<Self> {
        Self::clamp_new(&self.0 * &other.0)
    }

    pub fn div(&self, other: &Self) -> Result<Self> {
        if other.is_zero() {
            return Err(BignumError::DivideByZero);
        }
        Self::clamp_new(&self.0 / &other.0)
    }

    pub fn rem(&self, other: &Self) -> Result<Self> {
        if other.is_zero() {
            return Err(BignumError::DivideByZero);
        }
        Self::clamp_new(&self.0 % &other.0)
    }

    pub fn divmod(&self, other: &Self) -> Result<(Self, Self)> {
        Ok((self.div(other)?, self.rem(other)?))
    }

    pub fn neg(&self) -> Result<Self> {
        Self::clamp_new(-&self.0)
    }

    /// Integer square root of a non-negative value (spec §4.1 `sqrt(x≥0)`).
    pub fn sqrt(&self) -> Result<Self> {
        if self.is_negative() {
            return Err(BignumError::NotAllowedNegative);
        }
        Ok(Self(self.0.sqrt()))
    }

    /// Square-and-multiply exponentiation with an early in-range bounds
    /// check after every square and every multiply (spec §4.1 algorithm).
    ///
    /// Short-circuits when the base is 0, 1, or −1. Negative exponents are
    /// rejected per spec (`is_negative`).
    pub fn pow(&self, exponent: &Self) -> Result<Self> {
        if exponent.is_negative() {
            return Err(BignumError::NotAllowedNegative);
        }

        if self.0.is_zero() || self.0 == BigInt::from(1) {
            return Ok(self.clone());
        }
        if self.0 == BigInt::from(-1) {
            return if exponent.0.bit(0) { Ok(self.clone()) } else { Self::clamp_new(BigInt::from(1)) };
        }

        let mut result = BigInt::from(1);
        let mut base = self.0.clone();
        let mut exp = exponent.0.clone();

        while exp > BigInt::zero() {
            if exp.bit(0) {
                result *= &base;
                Self::in_range(&result)?;
            }
            exp >>= 1;
            if exp > BigInt::zero() {
                base = &base * &base;
                Self::in_range(&base)?;
            }
        }

        Ok(Self(result))
    }

    /// `powmod(a, k≥0, m≠0)` (spec §4.1).
    pub fn powmod(&self, exponent: &Self, modulus: &Self) -> Result<Self> {
        if exponent.is_negative() {
            return Err(BignumError::NotAllowedNegative);
        }
        if modulus.is_zero() {
            return Err(BignumError::DivideByZero);
        }

        let mut result = BigInt::from(1) % &modulus.0;
        let mut base = &self.0 % &modulus.0;
        let mut exp = exponent.0.clone();

        while exp > BigInt::zero() {
            if exp.bit(0) {
                result = (&result * &base) % &modulus.0;
            }
            exp >>= 1;
            base = (&base * &base) % &modulus.0;
        }

        Self::clamp_new(result)
    }

    pub fn tostring(&self) -> String {
        self.0.to_string()
    }

    /// Converts to an `f64`; callers must opt into this explicitly (spec
    /// invariant: "Bignum values are never re-interpreted as double except
    /// through explicit `tonumber`").
    pub fn tonumber(&self) -> f64 {
        self.0.to_string().parse().unwrap_or(f64::NAN)
    }

    /// Big-endian two's-complement byte encoding. Rejects negative values
    /// (`original_source/contract/bignum_module.c`'s `Btobyte` does the
    /// same before encoding).
    pub fn tobyte(&self) -> Result<Vec<u8>> {
        if self.is_negative() {
            return Err(BignumError::NotAllowedNegative);
        }
        Ok(self.0.to_signed_bytes_be())
    }

    /// Decodes a big-endian two's-complement byte string (inverse of `tobyte`).
    pub fn frombyte(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Ok(Self::zero());
        }
        Self::clamp_new(BigInt::from_signed_bytes_be(bytes))
    }

    pub fn compare(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }

    /// Narrows to an `i64`, returning `None` when the value needs more than
    /// 63 bits of magnitude (spec §4.9's bignum DB-parameter range check).
    pub fn to_i64(&self) -> Option<i64> {
        self.0.to_i64()
    }
}

impl fmt::Display for Bignum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Bignum {
    type Err = BignumError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pow_seed_scenario_1() {
        let two = Bignum::parse("2", 4).unwrap();
        let e256 = Bignum::parse("256", 4).unwrap();
        assert_eq!(two.pow(&e256), Err(BignumError::OverMaxLimit));

        let e255 = Bignum::parse("255", 4).unwrap();
        let result = two.pow(&e255).unwrap();
        assert_eq!(
            result.tostring(),
            "57896044618658097711785492504343953926634992332820282019728792003956564819968"
        );
    }

    #[test]
    fn range_clamp_symmetric() {
        let max = Bignum::max_value();
        let one = Bignum::from_i64(1);
        assert_eq!(max.add(&one), Err(BignumError::OverMaxLimit));
        let min = Bignum::min_value();
        assert_eq!(min.sub(&one), Err(BignumError::UnderMinLimit));
    }

    #[test]
    fn divide_by_zero() {
        let a = Bignum::from_i64(10);
        let zero = Bignum::zero();
        assert_eq!(a.div(&zero), Err(BignumError::DivideByZero));
        assert_eq!(a.rem(&zero), Err(BignumError::DivideByZero));
    }

    #[test]
    fn negative_exponent_rejected() {
        let a = Bignum::from_i64(2);
        let neg = Bignum::from_i64(-1);
        assert_eq!(a.pow(&neg), Err(BignumError::NotAllowedNegative));
    }

    #[test]
    fn hardfork4_strips_leading_zeros_and_octal() {
        let value = Bignum::parse("0755", 4).unwrap();
        assert_eq!(value.tostring(), "755");
    }

    #[test]
    fn pre_hardfork4_interprets_octal() {
        let value = Bignum::parse("0755", 2).unwrap();
        assert_eq!(value.tostring(), "493");
    }

    #[test]
    fn hardfork3_strips_radix_prefixes() {
        let value = Bignum::parse("0x10", 3).unwrap();
        assert_eq!(value.tostring(), "10");
    }

    #[test]
    fn byte_roundtrip() {
        let value = Bignum::parse("12345", 4).unwrap();
        let bytes = value.tobyte().unwrap();
        let back = Bignum::frombyte(&bytes).unwrap();
        assert_eq!(value, back);
    }

    #[test]
    fn tobyte_rejects_negative() {
        let value = Bignum::parse("-12345", 4).unwrap();
        assert_eq!(value.tobyte(), Err(BignumError::NotAllowedNegative));
    }

    #[test]
    fn to_i64_rejects_out_of_range() {
        let huge = Bignum::max_value();
        assert_eq!(huge.to_i64(), None);
        let small = Bignum::from_i64(42);
        assert_eq!(small.to_i64(), Some(42));
    }

    #[test]
    fn sqrt_rejects_negative() {
        let neg = Bignum::from_i64(-4);
        assert_eq!(neg.sqrt(), Err(BignumError::NotAllowedNegative));
        let four = Bignum::from_i64(4);
        assert_eq!(four.sqrt().unwrap(), Bignum::from_i64(2));
    }
}
