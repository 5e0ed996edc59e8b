//! Possible crate errors.

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::boxed::Box;
#[cfg(feature = "std")]
use std::boxed::Box;

use core::{
    error,
    fmt::{self, Display},
    result,
    str::Utf8Error,
};

/// Alias for a [`Result`][core::result::Result] with a [`cbor_tree::Error`][Error] error type.
pub type Result<T> = result::Result<T, Error>;

/// Errors while decoding.
pub struct Error {
    inner: Box<ErrorImpl>,
}

impl Error {
    /// Constructs an error with the kind and the byte offset where the error
    /// was detected.
    ///
    /// A byte offset value of `0` indicates that the byte offset is either
    /// unknown or not relevant.
    #[must_use]
    #[inline]
    pub fn new(kind: ErrorKind, byte_offset: usize) -> Self {
        Self {
            inner: Box::new(ErrorImpl { kind, byte_offset }),
        }
    }

    #[must_use]
    #[inline]
    pub(crate) fn with_kind(kind: ErrorKind) -> Self {
        Self::new(kind, 0)
    }

    /// Fills in the byte offset if it is not already known.
    #[must_use]
    #[inline]
    pub(crate) fn or_offset(mut self, byte_offset: usize) -> Self {
        if self.inner.byte_offset == 0 {
            self.inner.byte_offset = byte_offset;
        }
        self
    }

    /// The kind of error encountered
    #[must_use]
    #[inline]
    pub fn kind(&self) -> &ErrorKind {
        &self.inner.kind
    }

    /// The byte offset where the error was detected.
    ///
    /// A byte offset value of `0` indicates that the byte offset is either
    /// unknown or not relevant.
    #[must_use]
    #[inline]
    pub fn byte_offset(&self) -> usize {
        self.inner.byte_offset
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.inner.kind.source()
    }
}

struct ErrorImpl {
    kind: ErrorKind,
    byte_offset: usize,
}

impl Display for ErrorImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.byte_offset == 0 {
            Display::fmt(&self.kind, f)
        } else {
            write!(f, "{} at byte offset {}", self.kind, self.byte_offset)
        }
    }
}

impl fmt::Debug for ErrorImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("byte_offset", &self.byte_offset)
            .finish()
    }
}

/// All possible crate errors.
#[allow(clippy::module_name_repetitions)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The data is not well-formed CBOR (e.g. a reserved additional
    /// information value or an indefinite length where none is allowed).
    NotWellFormed,
    /// End of input was encountered while parsing a value.
    EofWhileParsingValue,
    /// The input ended while one or more containers were still open.
    Truncated,
    /// A break marker appeared outside of an indefinite-length item.
    UnexpectedBreak,
    /// An indefinite-length map was closed after a key with no value.
    MissingMapValue,
    /// An indefinite-length string contained something other than a
    /// definite-length string of the same type.
    InvalidChunk,
    /// A declared length does not fit in the platform's address space.
    LengthOverflow,
    /// The input is larger than the decoder's input region.
    CapacityExceeded {
        /// Length of the rejected input in bytes
        len: usize,
        /// Capacity of the decoder's input region in bytes
        capacity: usize,
    },
    /// Invalid UTF-8 in a text string
    InvalidUtf8Error(Utf8Error),
    /// Hex encoded input could not be converted to bytes.
    InvalidHex(hex::FromHexError),
    /// Base64 encoded input could not be converted to bytes.
    InvalidBase64(base64::DecodeError),
    /// The input did not contain any data item.
    NoValue,
    /// A text encoding name was not recognized.
    UnknownEncoding,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotWellFormed => f.write_str("not well-formed"),
            ErrorKind::EofWhileParsingValue => f.write_str("eof while parsing value"),
            ErrorKind::Truncated => f.write_str("input ended inside an open container"),
            ErrorKind::UnexpectedBreak => f.write_str("unexpected break"),
            ErrorKind::MissingMapValue => f.write_str("map key without a value"),
            ErrorKind::InvalidChunk => f.write_str("invalid indefinite-length string chunk"),
            ErrorKind::LengthOverflow => f.write_str("length overflow"),
            ErrorKind::CapacityExceeded { len, capacity } => {
                write!(f, "input of {len} bytes exceeds capacity of {capacity} bytes")
            }
            ErrorKind::InvalidUtf8Error(source) => Display::fmt(source, f),
            ErrorKind::InvalidHex(source) => write!(f, "invalid hex input: {source}"),
            ErrorKind::InvalidBase64(source) => write!(f, "invalid base64 input: {source}"),
            ErrorKind::NoValue => f.write_str("no data item"),
            ErrorKind::UnknownEncoding => f.write_str("unknown text encoding"),
        }
    }
}

impl fmt::Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::CapacityExceeded { len, capacity } => f
                .debug_struct("CapacityExceeded")
                .field("len", len)
                .field("capacity", capacity)
                .finish(),
            ErrorKind::InvalidUtf8Error(source) => fmt::Debug::fmt(source, f),
            ErrorKind::InvalidHex(source) => fmt::Debug::fmt(source, f),
            ErrorKind::InvalidBase64(source) => fmt::Debug::fmt(source, f),
            _ => Display::fmt(self, f),
        }
    }
}

impl error::Error for ErrorKind {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            ErrorKind::InvalidUtf8Error(source) => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(all(feature = "alloc", not(feature = "std")))]
    use alloc::string::ToString;
    #[cfg(feature = "std")]
    use std::string::ToString;

    #[test]
    fn test_display_with_offset() {
        let err = Error::new(ErrorKind::EofWhileParsingValue, 7);
        assert_eq!(err.to_string(), "eof while parsing value at byte offset 7");
    }

    #[test]
    fn test_display_without_offset() {
        let err = Error::with_kind(ErrorKind::NoValue);
        assert_eq!(err.to_string(), "no data item");
    }

    #[test]
    fn test_or_offset_keeps_existing_offset() {
        let err = Error::new(ErrorKind::NotWellFormed, 3).or_offset(9);
        assert_eq!(err.byte_offset(), 3);

        let err = Error::with_kind(ErrorKind::InvalidChunk).or_offset(9);
        assert_eq!(err.byte_offset(), 9);
    }
}
