//! Represents decoded CBOR data.

use core::{
    fmt::{self, Display},
    mem,
};

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::{boxed::Box, collections::BTreeMap, string::String, vec::Vec};
#[cfg(feature = "std")]
use std::{boxed::Box, collections::BTreeMap, string::String, vec::Vec};

use num_bigint::BigInt;
use ordered_float::OrderedFloat;

use crate::{num::MAX_SAFE_HIGH, Simple, Tag};

mod index;

pub use index::Index;

/// Integer value
///
/// The decoder keeps magnitudes below `2^53` in [`Int::Pos`] and [`Int::Neg`]
/// and uses [`Int::Big`] for everything else. Values built by hand should go
/// through the `From` conversions, which apply the same rule, so that equal
/// numbers compare equal.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Int {
    /// Non-negative value, below `2^53` when produced by the decoder
    Pos(u64),
    /// Negative value, at or above `-2^53` when produced by the decoder
    Neg(i64),
    /// Value whose magnitude is too large to be held exactly by a double
    Big(BigInt),
}

impl Int {
    /// Returns the value as an `i128`.
    ///
    /// Every CBOR integer fits, so `None` is only returned for a
    /// [`Int::Big`] built outside of the decoder.
    #[must_use]
    pub fn to_i128(&self) -> Option<i128> {
        match self {
            Int::Pos(v) => Some(i128::from(*v)),
            Int::Neg(v) => Some(i128::from(*v)),
            Int::Big(v) => i128::try_from(v).ok(),
        }
    }
}

impl From<u64> for Int {
    fn from(v: u64) -> Self {
        if v >> 32 > u64::from(MAX_SAFE_HIGH) {
            Int::Big(BigInt::from(v))
        } else {
            Int::Pos(v)
        }
    }
}

impl From<i64> for Int {
    fn from(v: i64) -> Self {
        match u64::try_from(v) {
            Ok(v) => Int::from(v),
            // the encoded argument of a negative value is `-1 - v`
            Err(_) if (-1 - v).unsigned_abs() >> 32 > u64::from(MAX_SAFE_HIGH) => {
                Int::Big(BigInt::from(v))
            }
            Err(_) => Int::Neg(v),
        }
    }
}

impl Display for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pos(v) => Display::fmt(v, f),
            Self::Neg(v) => Display::fmt(v, f),
            Self::Big(v) => Display::fmt(v, f),
        }
    }
}

/// Newtype struct for a float
///
/// `OrderedFloat` is used internally but is not guaranteed. Equality treats
/// every NaN as equal; use [`Float::is_sign_negative`] to tell a negative NaN
/// apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Float(OrderedFloat<f64>);

impl Float {
    /// Returns the underlying `f64`.
    #[inline]
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.0.into_inner()
    }

    /// Returns true if the value is NaN.
    #[inline]
    #[must_use]
    pub fn is_nan(self) -> bool {
        self.0.is_nan()
    }

    /// Returns true if the sign bit is set, including for NaN.
    #[inline]
    #[must_use]
    pub fn is_sign_negative(self) -> bool {
        self.0.into_inner().is_sign_negative()
    }
}

impl Display for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<f64> for Float {
    fn from(v: f64) -> Self {
        Float(OrderedFloat(v))
    }
}

impl From<Float> for f64 {
    fn from(value: Float) -> Self {
        value.to_f64()
    }
}

/// Represents a CBOR item.
///
/// Maps start out as [`Value::Object`] and are only represented as
/// [`Value::Map`] when at least one key is not a text string.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Value {
    /// `null`
    Null,
    /// `undefined`
    Undefined,
    /// `true` or `false`
    Bool(bool),
    /// Any other simple value
    Simple(Simple),
    /// Integer
    Int(Int),
    /// Float value
    Float(Float),
    /// A byte string
    ByteStr(Vec<u8>),
    /// A UTF-8 string
    TextStr(String),
    /// Array of values
    Array(Vec<Value>),
    /// Map with only text string keys
    Object(BTreeMap<String, Value>),
    /// Map with keys of any type
    Map(BTreeMap<Value, Value>),
    /// Tag with a number and content
    Tag(Tag<Box<Value>>),
}

impl Value {
    /// If the value is a byte string, returns a reference to the underlying value.
    #[must_use]
    pub fn as_byte_str(&self) -> Option<&[u8]> {
        match self {
            Value::ByteStr(b) => Some(b),
            _ => None,
        }
    }

    /// If the value is a UTF-8 string, returns a reference to the underlying value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::TextStr(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is a boolean, returns the underlying value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is an integer, returns a reference to the underlying value.
    #[must_use]
    pub fn as_int(&self) -> Option<&Int> {
        match self {
            Value::Int(n) => Some(n),
            _ => None,
        }
    }

    /// If the value is a machine width positive integer, returns the underlying value.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Int(Int::Pos(n)) => Some(*n),
            _ => None,
        }
    }

    /// If the value is a machine width integer, returns the underlying value.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(Int::Neg(n)) => Some(*n),
            Value::Int(Int::Pos(n)) => i64::try_from(*n).ok(),
            _ => None,
        }
    }

    /// If the value is an arbitrary precision integer, returns a reference to the underlying value.
    #[must_use]
    pub fn as_big_int(&self) -> Option<&BigInt> {
        match self {
            Value::Int(Int::Big(n)) => Some(n),
            _ => None,
        }
    }

    /// If the value is a float, returns the underlying value.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(f.to_f64()),
            _ => None,
        }
    }

    /// If the value is an array, returns a reference to the underlying value.
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(l) => Some(l),
            _ => None,
        }
    }

    /// If the value is an array, returns a mutable reference to the underlying value.
    #[must_use]
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(l) => Some(l),
            _ => None,
        }
    }

    /// If the value is a text string keyed map, returns a reference to the underlying value.
    #[must_use]
    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// If the value is a general map, returns a reference to the underlying value.
    #[must_use]
    pub fn as_map(&self) -> Option<&BTreeMap<Value, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// If the value is a tag, returns a reference to the underlying value.
    #[must_use]
    pub fn as_tag(&self) -> Option<&Tag<Box<Value>>> {
        match self {
            Value::Tag(t) => Some(t),
            _ => None,
        }
    }

    /// Converts a text string into its `String`, or returns the value back.
    ///
    /// # Errors
    ///
    /// Returns the value unchanged if it is not a text string.
    pub fn into_text_str(mut self) -> Result<String, Value> {
        match &mut self {
            Value::TextStr(s) => Ok(mem::take(s)),
            _ => Err(self),
        }
    }

    /// Converts a byte string into its bytes, or returns the value back.
    ///
    /// # Errors
    ///
    /// Returns the value unchanged if it is not a byte string.
    pub fn into_byte_str(mut self) -> Result<Vec<u8>, Value> {
        match &mut self {
            Value::ByteStr(b) => Ok(mem::take(b)),
            _ => Err(self),
        }
    }

    /// Returns true if the value is `null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if the value is `undefined`.
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Returns true if the value is a UTF-8 string.
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Value::TextStr(_))
    }

    /// Returns true if the value is an array.
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns true if the value is either kind of map.
    #[must_use]
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Object(_) | Value::Map(_))
    }

    /// Used to get a reference to a value with an index.
    #[inline]
    pub fn get<I: Index>(&self, index: I) -> Option<&Value> {
        index.index(self)
    }

    /// Used to get a mutable reference to a value with an index.
    #[inline]
    pub fn get_mut<I: Index>(&mut self, index: I) -> Option<&mut Value> {
        index.index_mut(self)
    }
}

impl Value {
    #[inline]
    fn is_container(&self) -> bool {
        matches!(
            self,
            Value::Array(_) | Value::Object(_) | Value::Map(_) | Value::Tag(_)
        )
    }

    /// Returns true if any direct child is itself a container.
    fn has_nested_containers(&self) -> bool {
        match self {
            Value::Array(items) => items.iter().any(Value::is_container),
            Value::Object(entries) => entries.values().any(Value::is_container),
            Value::Map(entries) => entries
                .iter()
                .any(|(k, v)| k.is_container() || v.is_container()),
            Value::Tag(tag) => tag.content().is_container(),
            _ => false,
        }
    }

    /// Moves every direct child into `out`, leaving `self` shallow.
    fn take_children(&mut self, out: &mut Vec<Value>) {
        match self {
            Value::Array(items) => out.append(items),
            Value::Object(entries) => out.extend(mem::take(entries).into_values()),
            Value::Map(entries) => {
                for (k, v) in mem::take(entries) {
                    out.push(k);
                    out.push(v);
                }
            }
            Value::Tag(tag) => out.push(mem::replace(&mut **tag.content_mut(), Value::Null)),
            _ => {}
        }
    }
}

/// Drops nested values with a heap worklist so that the depth of a tree is not
/// limited by the call stack.
impl Drop for Value {
    fn drop(&mut self) {
        if !self.has_nested_containers() {
            return;
        }
        let mut pending = Vec::new();
        self.take_children(&mut pending);
        while let Some(mut value) = pending.pop() {
            value.take_children(&mut pending);
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Hex<'a>(&'a [u8]);

        impl fmt::Debug for Hex<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("h'")?;
                for b in self.0 {
                    write!(f, "{b:02x}")?;
                }
                f.write_str("'")
            }
        }

        match self {
            Value::Null => f.write_str("Null"),
            Value::Undefined => f.write_str("Undefined"),
            Value::Bool(arg0) => f.debug_tuple("Bool").field(arg0).finish(),
            Value::Simple(arg0) => f.debug_tuple("Simple").field(arg0).finish(),
            Value::Int(arg0) => f.debug_tuple("Int").field(arg0).finish(),
            Value::Float(arg0) => f.debug_tuple("Float").field(&arg0.to_f64()).finish(),
            Value::ByteStr(arg0) => f.debug_tuple("ByteStr").field(&Hex(arg0)).finish(),
            Value::TextStr(arg0) => f.debug_tuple("TextStr").field(arg0).finish(),
            Value::Array(arg0) => f.debug_tuple("Array").field(arg0).finish(),
            Value::Object(arg0) => f.debug_tuple("Object").field(arg0).finish(),
            Value::Map(arg0) => f.debug_tuple("Map").field(arg0).finish(),
            Value::Tag(arg0) => f.debug_tuple("Tag").field(arg0).finish(),
        }
    }
}

macro_rules! value_from_uint {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Int(Int::Pos(u64::from(v)))
                }
            }
        )*
    };
}

macro_rules! value_from_sint {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    match u64::try_from(v) {
                        Ok(v) => Value::Int(Int::Pos(v)),
                        Err(_) => Value::Int(Int::Neg(i64::from(v))),
                    }
                }
            }
        )*
    };
}

value_from_uint!(u8, u16, u32);
value_from_sint!(i8, i16, i32);

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(Int::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Int(Int::from(v))
    }
}

impl From<BigInt> for Value {
    fn from(v: BigInt) -> Self {
        Value::Int(Int::Big(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(Float::from(v))
    }
}

impl<'a> From<&'a str> for Value {
    fn from(other: &'a str) -> Value {
        Value::TextStr(String::from(other))
    }
}

impl From<String> for Value {
    fn from(other: String) -> Value {
        Value::TextStr(other)
    }
}

impl<'a> From<&'a [u8]> for Value {
    fn from(other: &'a [u8]) -> Value {
        Value::ByteStr(Vec::from(other))
    }
}

impl From<Vec<Value>> for Value {
    fn from(other: Vec<Value>) -> Value {
        Value::Array(other)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(other: BTreeMap<String, Value>) -> Value {
        Value::Object(other)
    }
}

impl From<BTreeMap<Value, Value>> for Value {
    fn from(other: BTreeMap<Value, Value>) -> Value {
        Value::Map(other)
    }
}

impl From<Simple> for Value {
    fn from(v: Simple) -> Self {
        Value::Simple(v)
    }
}

impl From<Tag<Value>> for Value {
    fn from(v: Tag<Value>) -> Self {
        Value::Tag(v.map(Box::new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(all(feature = "alloc", not(feature = "std")))]
    use alloc::{format, vec};
    #[cfg(feature = "std")]
    use std::{format, vec};

    #[test]
    fn test_from_signed() {
        assert_eq!(Value::from(-3i8), Value::Int(Int::Neg(-3)));
        assert_eq!(Value::from(3i32), Value::Int(Int::Pos(3)));
    }

    #[test]
    fn test_from_u64_above_safe_range() {
        assert_eq!(
            Value::from(u64::MAX),
            Value::Int(Int::Big(BigInt::from(u64::MAX)))
        );
        assert_eq!(
            Value::from(9_007_199_254_740_991u64),
            Value::Int(Int::Pos(9_007_199_254_740_991))
        );
    }

    #[test]
    fn test_from_normalizes_to_big() {
        assert_eq!(Int::from(1u64 << 60), Int::Big(BigInt::from(1u64 << 60)));
        assert_eq!(Value::from(1u64 << 60), Value::Int(Int::from(1u64 << 60)));
        assert_eq!(Int::from(-9_007_199_254_740_992i64), Int::Neg(-9_007_199_254_740_992));
        assert_eq!(
            Int::from(-9_007_199_254_740_993i64),
            Int::Big(BigInt::from(-9_007_199_254_740_993i64))
        );
        assert_eq!(Int::from(i64::MIN), Int::Big(BigInt::from(i64::MIN)));
    }

    #[test]
    fn test_drop_deep_tree() {
        let mut v = Value::Null;
        for i in 0..200_000u32 {
            v = match i % 4 {
                0 => Value::Array(vec![v]),
                1 => Value::Tag(Tag::new(1, Box::new(v))),
                2 => Value::Map(BTreeMap::from([(v, Value::Null)])),
                _ => Value::Object(BTreeMap::from([(String::from("k"), v)])),
            };
        }
        drop(v);
    }

    #[test]
    fn test_into_text_str() {
        assert_eq!(Value::from("a").into_text_str(), Ok(String::from("a")));
        assert_eq!(Value::from(1u8).into_text_str(), Err(Value::from(1u8)));
        assert_eq!(Value::ByteStr(vec![1]).into_byte_str(), Ok(vec![1]));
    }

    #[test]
    fn test_nan_sign_is_observable() {
        let pos = Float::from(f64::NAN);
        let neg = Float::from(-f64::NAN);
        assert!(pos.is_nan() && neg.is_nan());
        assert!(!pos.is_sign_negative());
        assert!(neg.is_sign_negative());
    }

    #[test]
    fn test_debug_byte_str() {
        let v = Value::ByteStr(vec![0x01, 0xab]);
        assert_eq!(format!("{v:?}"), "ByteStr(h'01ab')");
    }

    #[test]
    fn test_int_display() {
        assert_eq!(format!("{}", Int::Neg(-10)), "-10");
        assert_eq!(
            format!("{}", Int::Big(BigInt::from(-18_446_744_073_709_551_616i128))),
            "-18446744073709551616"
        );
    }
}
