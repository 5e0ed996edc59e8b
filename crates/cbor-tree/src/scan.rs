//! Walks the raw input and emits one [`Event`] per data item header.
//!
//! The scanner validates major types, additional information values and that
//! every argument and string payload lies within the input. It does not track
//! nesting; container structure is reconstructed by the tree builder.

use core::iter::FusedIterator;

use crate::{
    error::{Error, ErrorKind, Result},
    num::{combine32, combine64},
    read::SliceRead,
    simple::{
        SIMPLE_VALUE_EXTENDED_MIN, SIMPLE_VALUE_FALSE, SIMPLE_VALUE_NULL, SIMPLE_VALUE_TRUE,
        SIMPLE_VALUE_UNDEFINED,
    },
};

const IB_UINT_MIN: u8 = 0b0000_0000;
const IB_SINT_MIN: u8 = 0b0010_0000;
const IB_BYTE_STR_MIN: u8 = 0b0100_0000;
const IB_TEXT_STR_MIN: u8 = 0b0110_0000;
const IB_ARRAY_MIN: u8 = 0b1000_0000;
const IB_MAP_MIN: u8 = 0b1010_0000;
const IB_TAG_MIN: u8 = 0b1100_0000;
const IB_FP_SIMPLE_MIN: u8 = 0b1110_0000;

const MAJOR_TYPE_MASK: u8 = 0b1110_0000;
const ADDITIONAL_INFO_MASK: u8 = 0b0001_1111;

const ADDITIONAL_INFO_INDEFINITE: u8 = 31;

const HALF_INFINITY: u16 = 0x7c00;
const HALF_NEG_INFINITY: u16 = 0xfc00;
const HALF_NAN: u16 = 0x7e00;
const HALF_NEG_NAN: u16 = 0xfe00;

/// Argument of a data item split into big-endian 16-bit fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Argument {
    U8(u8),
    U16(u16),
    U32(u16, u16),
    U64(u16, u16, u16, u16),
}

impl Argument {
    #[inline]
    pub(crate) fn to_u64(self) -> u64 {
        match self {
            Argument::U8(v) => u64::from(v),
            Argument::U16(v) => u64::from(v),
            Argument::U32(hi, lo) => u64::from(combine32(hi, lo)),
            Argument::U64(a, b, c, d) => combine64(a, b, c, d),
        }
    }
}

/// Declared number of children of an array or map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Length {
    Definite(Argument),
    Indefinite,
}

/// Raw big-endian bytes of a floating point value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FloatBytes {
    Half([u8; 2]),
    Single([u8; 4]),
    Double([u8; 8]),
}

/// A primitive or container-open token.
///
/// Strings are referenced by `start..end` offsets into the scanned slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Event {
    Uint(Argument),
    /// Negative integer `-1 - argument`
    NegInt(Argument),
    ByteStr { start: usize, end: usize },
    TextStr { start: usize, end: usize },
    ByteStrStart,
    TextStrStart,
    ArrayStart(Length),
    MapStart(Length),
    Tag(Argument),
    False,
    True,
    Null,
    Undefined,
    Simple(u8),
    Float(FloatBytes),
    Infinity,
    NegInfinity,
    NaN,
    NegNaN,
    Break,
}

/// Iterator of `(byte_offset, event)` pairs.
///
/// Stops after the first error.
#[derive(Debug)]
pub(crate) struct Scanner<'a> {
    read: SliceRead<'a>,
    failed: bool,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(slice: &'a [u8]) -> Self {
        Self {
            read: SliceRead::new(slice),
            failed: false,
        }
    }

    /// Reads the argument for the additional information value.
    ///
    /// Returns `None` for an indefinite length.
    fn argument(&mut self, info: u8, item_offset: usize) -> Result<Option<Argument>> {
        let arg = match info {
            0..24 => Argument::U8(info),
            24 => Argument::U8(self.read.next()?),
            25 => Argument::U16(self.read.next_u16()?),
            26 => Argument::U32(self.read.next_u16()?, self.read.next_u16()?),
            27 => Argument::U64(
                self.read.next_u16()?,
                self.read.next_u16()?,
                self.read.next_u16()?,
                self.read.next_u16()?,
            ),
            ADDITIONAL_INFO_INDEFINITE => return Ok(None),
            _ => return Err(Error::new(ErrorKind::NotWellFormed, item_offset)),
        };
        Ok(Some(arg))
    }

    /// Reads an argument where an indefinite length is not allowed.
    fn definite_argument(&mut self, info: u8, item_offset: usize) -> Result<Argument> {
        self.argument(info, item_offset)?
            .ok_or_else(|| Error::new(ErrorKind::NotWellFormed, item_offset))
    }

    fn string(&mut self, info: u8, item_offset: usize) -> Result<Option<(usize, usize)>> {
        match self.argument(info, item_offset)? {
            Some(len) => self.read.skip(len.to_u64()).map(Some),
            None => Ok(None),
        }
    }

    fn length(&mut self, info: u8, item_offset: usize) -> Result<Length> {
        Ok(self
            .argument(info, item_offset)?
            .map_or(Length::Indefinite, Length::Definite))
    }

    fn fp_simple(&mut self, info: u8, item_offset: usize) -> Result<Event> {
        let event = match info {
            SIMPLE_VALUE_FALSE => Event::False,
            SIMPLE_VALUE_TRUE => Event::True,
            SIMPLE_VALUE_NULL => Event::Null,
            SIMPLE_VALUE_UNDEFINED => Event::Undefined,
            0..24 => Event::Simple(info),
            24 => {
                let v = self.read.next()?;
                if v < SIMPLE_VALUE_EXTENDED_MIN {
                    return Err(Error::new(ErrorKind::NotWellFormed, item_offset));
                }
                Event::Simple(v)
            }
            25 => {
                let bytes = self.read.next_array::<2>()?;
                match u16::from_be_bytes(bytes) {
                    HALF_INFINITY => Event::Infinity,
                    HALF_NEG_INFINITY => Event::NegInfinity,
                    HALF_NAN => Event::NaN,
                    HALF_NEG_NAN => Event::NegNaN,
                    _ => Event::Float(FloatBytes::Half(bytes)),
                }
            }
            26 => Event::Float(FloatBytes::Single(self.read.next_array()?)),
            27 => Event::Float(FloatBytes::Double(self.read.next_array()?)),
            ADDITIONAL_INFO_INDEFINITE => Event::Break,
            _ => return Err(Error::new(ErrorKind::NotWellFormed, item_offset)),
        };
        Ok(event)
    }

    fn scan(&mut self, item_offset: usize) -> Result<Event> {
        let init_byte = self.read.next()?;
        let info = init_byte & ADDITIONAL_INFO_MASK;

        match init_byte & MAJOR_TYPE_MASK {
            IB_UINT_MIN => self.definite_argument(info, item_offset).map(Event::Uint),
            IB_SINT_MIN => self.definite_argument(info, item_offset).map(Event::NegInt),
            IB_BYTE_STR_MIN => Ok(match self.string(info, item_offset)? {
                Some((start, end)) => Event::ByteStr { start, end },
                None => Event::ByteStrStart,
            }),
            IB_TEXT_STR_MIN => Ok(match self.string(info, item_offset)? {
                Some((start, end)) => Event::TextStr { start, end },
                None => Event::TextStrStart,
            }),
            IB_ARRAY_MIN => self.length(info, item_offset).map(Event::ArrayStart),
            IB_MAP_MIN => self.length(info, item_offset).map(Event::MapStart),
            IB_TAG_MIN => self.definite_argument(info, item_offset).map(Event::Tag),
            IB_FP_SIMPLE_MIN => self.fp_simple(info, item_offset),
            _ => unreachable!("major type is masked to three bits"),
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<(usize, Event)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.read.is_empty() {
            return None;
        }

        let item_offset = self.read.byte_offset();
        match self.scan(item_offset) {
            Ok(event) => Some(Ok((item_offset, event))),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

impl FusedIterator for Scanner<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[cfg(all(feature = "alloc", not(feature = "std")))]
    use alloc::vec::Vec;
    #[cfg(feature = "std")]
    use std::vec::Vec;

    fn events(input: &[u8]) -> Result<Vec<Event>> {
        Scanner::new(input)
            .map(|item| item.map(|(_, event)| event))
            .collect()
    }

    #[test]
    fn test_scan_integers() -> Result<()> {
        assert_eq!(events(&hex!("17"))?, [Event::Uint(Argument::U8(23))]);
        assert_eq!(events(&hex!("19 03 e8"))?, [Event::Uint(Argument::U16(1000))]);
        assert_eq!(
            events(&hex!("1a 00 0f 42 40"))?,
            [Event::Uint(Argument::U32(0x000f, 0x4240))]
        );
        assert_eq!(
            events(&hex!("3b 00 00 00 e8 d4 a5 10 00"))?,
            [Event::NegInt(Argument::U64(0x0000, 0x00e8, 0xd4a5, 0x1000))]
        );
        Ok(())
    }

    #[test]
    fn test_scan_offsets() -> Result<()> {
        let input = hex!("82 18 64 44 01 02 03 04");
        let items = Scanner::new(&input).collect::<Result<Vec<_>>>()?;
        assert_eq!(
            items,
            [
                (0, Event::ArrayStart(Length::Definite(Argument::U8(2)))),
                (1, Event::Uint(Argument::U8(100))),
                (3, Event::ByteStr { start: 4, end: 8 }),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_scan_indefinite() -> Result<()> {
        assert_eq!(
            events(&hex!("9f 5f 7f bf ff"))?,
            [
                Event::ArrayStart(Length::Indefinite),
                Event::ByteStrStart,
                Event::TextStrStart,
                Event::MapStart(Length::Indefinite),
                Event::Break,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_scan_half_sentinels() -> Result<()> {
        assert_eq!(
            events(&hex!("f9 7c 00 f9 fc 00 f9 7e 00 f9 fe 00 f9 3c 00"))?,
            [
                Event::Infinity,
                Event::NegInfinity,
                Event::NaN,
                Event::NegNaN,
                Event::Float(FloatBytes::Half([0x3c, 0x00])),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_scan_simple() -> Result<()> {
        assert_eq!(
            events(&hex!("f4 f5 f6 f7 f0 f8 ff"))?,
            [
                Event::False,
                Event::True,
                Event::Null,
                Event::Undefined,
                Event::Simple(16),
                Event::Simple(255),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_scan_not_well_formed() {
        for input in [
            &hex!("1c")[..],
            &hex!("1f"),
            &hex!("3f"),
            &hex!("df 00"),
            &hex!("5c"),
            &hex!("9d"),
            &hex!("fc"),
            &hex!("f8 18"),
        ] {
            let err = events(input).unwrap_err();
            assert!(
                matches!(err.kind(), ErrorKind::NotWellFormed),
                "input {input:X?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_scan_eof() {
        for input in [
            &hex!("18")[..],
            &hex!("19 01"),
            &hex!("1b 00 00 00 00"),
            &hex!("44 01 02 03"),
            &hex!("62 c3"),
            &hex!("fa 00 00"),
            &hex!("5b ff ff ff ff ff ff ff ff"),
        ] {
            let err = events(input).unwrap_err();
            assert!(
                matches!(err.kind(), ErrorKind::EofWhileParsingValue),
                "input {input:X?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_scan_stops_after_error() {
        let mut scanner = Scanner::new(&hex!("1c 01"));
        assert!(matches!(scanner.next(), Some(Err(_))));
        assert!(scanner.next().is_none());
    }
}
