//! Property-based tests for host-bignum.
//!
//! These use proptest to generate random inputs and verify invariants like
//! range clamping and byte-encoding roundtrips hold for arbitrary values,
//! not just the handful of literals exercised by the unit tests.

use host_bignum::Bignum;
use proptest::prelude::*;

proptest! {
    /// Every non-negative `i64` roundtrips through `tobyte`/`frombyte` exactly.
    #[test]
    fn byte_roundtrip_holds_for_any_nonnegative_i64(n in 0i64..=i64::MAX) {
        let value = Bignum::from_i64(n);
        let bytes = value.tobyte().unwrap();
        let back = Bignum::frombyte(&bytes).unwrap();
        prop_assert_eq!(value, back);
    }

    /// `tobyte` rejects every negative value instead of encoding it.
    #[test]
    fn tobyte_rejects_any_negative_i64(n in i64::MIN..0) {
        let value = Bignum::from_i64(n);
        prop_assert!(value.tobyte().is_err());
    }

    /// Parsing the decimal string a bignum prints always reproduces it.
    #[test]
    fn tostring_parse_roundtrip(n in any::<i64>()) {
        let value = Bignum::from_i64(n);
        let printed = value.tostring();
        let parsed = Bignum::parse(&printed, 4).unwrap();
        prop_assert_eq!(value, parsed);
    }

    /// `add` either stays within ±(2^256-1) or reports the limit it crossed;
    /// it never silently wraps or panics.
    #[test]
    fn add_never_exceeds_range(a in any::<i64>(), b in any::<i64>()) {
        let result = Bignum::from_i64(a).add(&Bignum::from_i64(b));
        match result {
            Ok(sum) => {
                prop_assert!(sum.compare(&Bignum::max_value()) != std::cmp::Ordering::Greater);
                prop_assert!(sum.compare(&Bignum::min_value()) != std::cmp::Ordering::Less);
            }
            Err(_) => {
                // i64 + i64 never actually overflows the 256-bit range; this
                // arm exists only so the match is exhaustive.
                prop_assert!(false, "unexpected overflow from two i64 operands");
            }
        }
    }

    /// `neg` is its own inverse for any in-range value.
    #[test]
    fn double_negation_is_identity(n in any::<i64>()) {
        let value = Bignum::from_i64(n);
        let back = value.neg().unwrap().neg().unwrap();
        prop_assert_eq!(value, back);
    }
}
