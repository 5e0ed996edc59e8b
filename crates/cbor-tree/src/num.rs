//! Integer and floating point reconstruction from big-endian fragments.
//!
//! The scanner hands over multi-byte arguments as 16-bit big-endian fragments.
//! The helpers here assemble them and pick the representation: integers whose
//! high 32-bit word is above [`MAX_SAFE_HIGH`] cannot be held without loss in
//! an IEEE-754 double, so they become arbitrary precision [`BigInt`] values.

use half::f16;
use num_bigint::BigInt;

use crate::value::Int;

/// Largest high 32-bit word of a 64-bit magnitude which stays below `2^53`.
pub const MAX_SAFE_HIGH: u32 = 0x001f_ffff;

/// Combines two big-endian 16-bit fragments.
#[inline]
#[must_use]
pub const fn combine32(hi: u16, lo: u16) -> u32 {
    ((hi as u32) << 16) | lo as u32
}

/// Combines four big-endian 16-bit fragments, most significant first.
#[inline]
#[must_use]
pub const fn combine64(a: u16, b: u16, c: u16, d: u16) -> u64 {
    ((combine32(a, b) as u64) << 32) | combine32(c, d) as u64
}

/// Builds a positive integer from a 64-bit argument.
#[must_use]
pub fn uint64(a: u16, b: u16, c: u16, d: u16) -> Int {
    let v = combine64(a, b, c, d);
    if combine32(a, b) > MAX_SAFE_HIGH {
        Int::Big(BigInt::from(v))
    } else {
        Int::Pos(v)
    }
}

/// Builds the negative integer `-1 - n` for an argument of at most 32 bits.
#[inline]
#[must_use]
pub fn neg_int(n: u32) -> Int {
    Int::Neg(-1 - i64::from(n))
}

/// Builds the negative integer `-1 - n` from a 64-bit argument.
#[must_use]
pub fn neg_int64(a: u16, b: u16, c: u16, d: u16) -> Int {
    let high = combine32(a, b);
    let low = combine32(c, d);
    if high > MAX_SAFE_HIGH {
        let magnitude = (BigInt::from(high) << 32u32) + BigInt::from(low);
        Int::Big(-magnitude - 1u32)
    } else {
        // high <= 2^21 - 1, the magnitude is below 2^53
        let magnitude = (i64::from(high) << 32) | i64::from(low);
        Int::Neg(-1 - magnitude)
    }
}

/// Widens a float, keeping the sign of NaN.
#[inline]
fn widen_nan(v: f64, is_nan: bool, is_negative: bool) -> f64 {
    match (is_nan, is_negative) {
        (true, true) => -f64::NAN,
        (true, false) => f64::NAN,
        _ => v,
    }
}

/// Decodes an IEEE-754 half precision value.
#[must_use]
pub fn f16_from_be(bytes: [u8; 2]) -> f64 {
    let v = f16::from_be_bytes(bytes);
    widen_nan(v.to_f64(), v.is_nan(), v.is_sign_negative())
}

/// Decodes an IEEE-754 single precision value.
#[must_use]
pub fn f32_from_be(bytes: [u8; 4]) -> f64 {
    let v = f32::from_be_bytes(bytes);
    widen_nan(f64::from(v), v.is_nan(), v.is_sign_negative())
}

/// Decodes an IEEE-754 double precision value.
#[inline]
#[must_use]
pub fn f64_from_be(bytes: [u8; 8]) -> f64 {
    f64::from_be_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_combine() {
        assert_eq!(combine32(0x0102, 0x0304), 0x0102_0304);
        assert_eq!(
            combine64(0x0102, 0x0304, 0x0506, 0x0708),
            0x0102_0304_0506_0708
        );
        assert_eq!(combine64(0xffff, 0xffff, 0xffff, 0xffff), u64::MAX);
    }

    #[test]
    fn test_uint64_boundary() {
        // 2^53 - 1
        assert_eq!(
            uint64(0x001f, 0xffff, 0xffff, 0xffff),
            Int::Pos(9_007_199_254_740_991)
        );
        // 2^53
        assert_eq!(
            uint64(0x0020, 0x0000, 0x0000, 0x0000),
            Int::Big(BigInt::from(9_007_199_254_740_992u64))
        );
    }

    #[test]
    fn test_neg_int64_boundary() {
        assert_eq!(
            neg_int64(0x001f, 0xffff, 0xffff, 0xffff),
            Int::Neg(-9_007_199_254_740_992)
        );
        assert_eq!(
            neg_int64(0x0020, 0x0000, 0x0000, 0x0000),
            Int::Big(BigInt::from(-9_007_199_254_740_993i64))
        );
    }

    #[test]
    fn test_neg_int64_min() {
        let expected = BigInt::from(-18_446_744_073_709_551_616i128);
        assert_eq!(
            neg_int64(0xffff, 0xffff, 0xffff, 0xffff),
            Int::Big(expected)
        );
    }

    #[test]
    fn test_neg_nan_keeps_sign() {
        assert!(f16_from_be([0xfe, 0x00]).is_nan());
        assert!(f16_from_be([0xfe, 0x00]).is_sign_negative());
        assert!(f32_from_be([0xff, 0xc0, 0x00, 0x00]).is_sign_negative());
        assert!(f32_from_be([0x7f, 0xc0, 0x00, 0x00]).is_sign_positive());
    }

    #[allow(clippy::float_cmp)]
    #[test]
    fn test_half() {
        assert_eq!(f16_from_be([0x3c, 0x00]), 1.0);
        assert_eq!(f16_from_be([0x7b, 0xff]), 65504.0);
        assert_eq!(f16_from_be([0x00, 0x01]), 5.960_464_477_539_063e-8);
        assert_eq!(f16_from_be([0xc4, 0x00]), -4.0);
    }

    proptest::proptest! {
        #[test]
        fn test_combine64_matches_be_bytes(v in any::<u64>()) {
            let b = v.to_be_bytes();
            let frag = |i: usize| u16::from_be_bytes([b[i], b[i + 1]]);
            prop_assert_eq!(combine64(frag(0), frag(2), frag(4), frag(6)), v);
        }

        #[test]
        fn test_neg_int64_is_exact(v in any::<u64>()) {
            let b = v.to_be_bytes();
            let frag = |i: usize| u16::from_be_bytes([b[i], b[i + 1]]);
            let expected = -1 - i128::from(v);
            let actual = match neg_int64(frag(0), frag(2), frag(4), frag(6)) {
                Int::Neg(n) => BigInt::from(n),
                Int::Big(n) => n,
                Int::Pos(_) => unreachable!("negative argument produced a positive integer"),
            };
            prop_assert_eq!(actual, BigInt::from(expected));
        }

        #[allow(clippy::float_cmp)]
        #[test]
        fn test_f32_widening(v in any::<f32>()) {
            let decoded = f32_from_be(v.to_be_bytes());
            if v.is_nan() {
                prop_assert!(decoded.is_nan());
                prop_assert_eq!(decoded.is_sign_negative(), v.is_sign_negative());
            } else {
                prop_assert_eq!(decoded, f64::from(v));
            }
        }
    }
}
