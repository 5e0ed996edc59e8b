//! Simple value

use core::fmt;

/// Boolean `false`
pub const SIMPLE_VALUE_FALSE: u8 = 20;
/// Boolean `true`
pub const SIMPLE_VALUE_TRUE: u8 = 21;
/// `null` value
pub const SIMPLE_VALUE_NULL: u8 = 22;
/// `undefined` value
pub const SIMPLE_VALUE_UNDEFINED: u8 = 23;

/// Smallest simple value which must be encoded in a following byte.
pub(crate) const SIMPLE_VALUE_EXTENDED_MIN: u8 = 32;

/// Simple value without an assigned meaning in the value tree.
///
/// `false`, `true`, `null` and `undefined` are decoded into their own
/// [`Value`][crate::Value] variants and are never represented by this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Simple(u8);

impl Simple {
    /// Construct a simple value from the numerical value
    #[inline]
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Returns the numerical value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns true if the value can be encoded in the initial byte.
    #[inline]
    #[must_use]
    pub const fn is_inline(self) -> bool {
        self.0 < 24
    }
}

/// Writes the value in diagnostic notation, e.g. `simple(16)`.
impl fmt::Display for Simple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "simple({})", self.0)
    }
}

impl From<u8> for Simple {
    fn from(value: u8) -> Self {
        Simple::new(value)
    }
}

impl From<Simple> for u8 {
    fn from(value: Simple) -> Self {
        value.0
    }
}
