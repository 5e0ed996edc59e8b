//! Cursor over the input region used by the scanner.

use crate::error::{Error, ErrorKind, Result};

/// Reads big-endian values from a byte slice and tracks the byte offset.
#[derive(Debug)]
pub(crate) struct SliceRead<'a> {
    slice: &'a [u8],
    byte_offset: usize,
}

impl<'a> SliceRead<'a> {
    /// Instantiates a new reader.
    #[must_use]
    pub(crate) fn new(slice: &'a [u8]) -> Self {
        SliceRead {
            slice,
            byte_offset: 0,
        }
    }

    /// Returns the position in the slice.
    #[inline]
    pub(crate) fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// Returns true when every byte has been consumed.
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.byte_offset >= self.slice.len()
    }

    #[inline]
    fn eof(&self) -> Error {
        Error::new(ErrorKind::EofWhileParsingValue, self.byte_offset)
    }

    /// Consumes and returns the next byte.
    #[inline]
    pub(crate) fn next(&mut self) -> Result<u8> {
        let b = *self.slice.get(self.byte_offset).ok_or_else(|| self.eof())?;
        self.byte_offset += 1;
        Ok(b)
    }

    /// Consumes exactly `N` bytes.
    #[inline]
    pub(crate) fn next_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let end = self.byte_offset.checked_add(N).ok_or_else(|| self.eof())?;
        let bytes = self
            .slice
            .get(self.byte_offset..end)
            .and_then(|b| <[u8; N]>::try_from(b).ok())
            .ok_or_else(|| self.eof())?;
        self.byte_offset = end;
        Ok(bytes)
    }

    /// Consumes a big-endian `u16`.
    #[inline]
    pub(crate) fn next_u16(&mut self) -> Result<u16> {
        self.next_array().map(u16::from_be_bytes)
    }

    /// Skips `len` bytes and returns the `(start, end)` offsets of the skipped
    /// range.
    pub(crate) fn skip(&mut self, len: u64) -> Result<(usize, usize)> {
        let start = self.byte_offset;
        let end = usize::try_from(len)
            .ok()
            .and_then(|len| start.checked_add(len))
            .filter(|end| *end <= self.slice.len())
            .ok_or_else(|| self.eof())?;
        self.byte_offset = end;
        Ok((start, end))
    }
}
