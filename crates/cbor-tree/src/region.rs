//! Fixed-capacity input region owned by a decoder.

use core::str::FromStr;

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::{boxed::Box, vec, vec::Vec};
#[cfg(feature = "std")]
use std::{boxed::Box, vec, vec::Vec};

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{Error, ErrorKind, Result};

/// Text encoding of a string input.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Hexadecimal digits, two per byte
    #[default]
    Hex,
    /// Standard base64 alphabet with padding
    Base64,
    /// The UTF-8 bytes of the string are the CBOR data.
    Utf8,
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "hex" => Ok(Encoding::Hex),
            "base64" => Ok(Encoding::Base64),
            "utf8" | "utf-8" => Ok(Encoding::Utf8),
            _ => Err(Error::with_kind(ErrorKind::UnknownEncoding)),
        }
    }
}

/// Data to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    /// Raw CBOR bytes
    Bytes(&'a [u8]),
    /// CBOR bytes encoded as text
    Text(&'a str, Encoding),
}

impl Input<'_> {
    /// Returns an upper bound of the number of CBOR bytes in the input.
    #[must_use]
    pub fn len_hint(&self) -> usize {
        match self {
            Input::Bytes(b) => b.len(),
            Input::Text(s, Encoding::Hex) => s.len() / 2,
            Input::Text(s, Encoding::Base64) => base64::decoded_len_estimate(s.len()),
            Input::Text(s, Encoding::Utf8) => s.len(),
        }
    }
}

impl<'a> From<&'a [u8]> for Input<'a> {
    fn from(value: &'a [u8]) -> Self {
        Input::Bytes(value)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Input<'a> {
    fn from(value: &'a [u8; N]) -> Self {
        Input::Bytes(value)
    }
}

impl<'a> From<&'a Vec<u8>> for Input<'a> {
    fn from(value: &'a Vec<u8>) -> Self {
        Input::Bytes(value)
    }
}

/// A string is read as hex.
impl<'a> From<&'a str> for Input<'a> {
    fn from(value: &'a str) -> Self {
        Input::Text(value, Encoding::default())
    }
}

/// Byte buffer allocated once and overwritten by every load.
#[derive(Debug)]
pub(crate) struct InputRegion {
    buf: Box<[u8]>,
    len: usize,
}

impl InputRegion {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Returns the bytes at `start..end`.
    ///
    /// The scanner only produces ranges within the loaded input.
    #[inline]
    pub(crate) fn slice(&self, start: usize, end: usize) -> &[u8] {
        &self.as_slice()[start..end]
    }

    fn check_capacity(&self, len: usize) -> Result<()> {
        if len > self.capacity() {
            return Err(Error::with_kind(ErrorKind::CapacityExceeded {
                len,
                capacity: self.capacity(),
            }));
        }
        Ok(())
    }

    fn copy_from(&mut self, bytes: &[u8]) -> Result<()> {
        self.check_capacity(bytes.len())?;
        self.buf[..bytes.len()].copy_from_slice(bytes);
        self.len = bytes.len();
        Ok(())
    }

    /// Replaces the region contents with the input bytes.
    pub(crate) fn load(&mut self, input: Input<'_>) -> Result<()> {
        self.clear();
        match input {
            Input::Bytes(bytes) => self.copy_from(bytes),
            Input::Text(s, Encoding::Utf8) => self.copy_from(s.as_bytes()),
            Input::Text(s, Encoding::Hex) => {
                let len = s.len() / 2;
                self.check_capacity(len)?;
                hex::decode_to_slice(s, &mut self.buf[..len])
                    .map_err(|e| Error::with_kind(ErrorKind::InvalidHex(e)))?;
                self.len = len;
                Ok(())
            }
            Input::Text(s, Encoding::Base64) => {
                let bytes = STANDARD
                    .decode(s)
                    .map_err(|e| Error::with_kind(ErrorKind::InvalidBase64(e)))?;
                self.copy_from(&bytes)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_bytes_overwrites() -> Result<()> {
        let mut region = InputRegion::with_capacity(4);
        region.load(Input::from(&[1u8, 2, 3]))?;
        assert_eq!(region.as_slice(), &[1, 2, 3]);
        region.load(Input::from(&[9u8]))?;
        assert_eq!(region.as_slice(), &[9]);
        assert_eq!(region.slice(0, 1), &[9]);
        Ok(())
    }

    #[test]
    fn test_load_text() -> Result<()> {
        let mut region = InputRegion::with_capacity(8);
        region.load(Input::from("83010203"))?;
        assert_eq!(region.as_slice(), &[0x83, 1, 2, 3]);
        region.load(Input::Text("gwECAw==", Encoding::Base64))?;
        assert_eq!(region.as_slice(), &[0x83, 1, 2, 3]);
        region.load(Input::Text("ab", Encoding::Utf8))?;
        assert_eq!(region.as_slice(), b"ab");
        Ok(())
    }

    #[test]
    fn test_capacity_exceeded() {
        let mut region = InputRegion::with_capacity(2);
        let err = region.load(Input::from(&[0u8; 3])).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::CapacityExceeded {
                len: 3,
                capacity: 2
            }
        ));
        assert!(region.as_slice().is_empty());

        let err = region.load(Input::from("000000")).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::CapacityExceeded { .. }));
    }

    #[test]
    fn test_invalid_text() {
        let mut region = InputRegion::with_capacity(8);
        let err = region.load(Input::from("0g")).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidHex(_)));
        let err = region.load(Input::from("123")).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidHex(_)));
        let err = region
            .load(Input::Text("*", Encoding::Base64))
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidBase64(_)));
    }

    #[test]
    fn test_encoding_from_str() -> Result<()> {
        assert_eq!("hex".parse::<Encoding>()?, Encoding::Hex);
        assert_eq!("base64".parse::<Encoding>()?, Encoding::Base64);
        assert_eq!("utf8".parse::<Encoding>()?, Encoding::Utf8);
        let err = "rot13".parse::<Encoding>().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::UnknownEncoding));
        Ok(())
    }
}
