//! Decodes CBOR input into [`Value`] trees.
//!
//! A [`Decoder`] owns a fixed-capacity input region and a frame stack. Both are
//! reused by every call, so a single decoder serves any number of inputs
//! without reallocating.
//!
//! ```
//! # fn main() -> cbor_tree::Result<()> {
//! use cbor_tree::{Decoder, Encoding, Input, Value};
//!
//! let mut decoder = Decoder::with_capacity(1024);
//!
//! let value = decoder.decode_first(&[0x83u8, 0x01, 0x02, 0x03])?;
//! assert_eq!(value.as_array().map(Vec::len), Some(3));
//!
//! let values = decoder.decode_all(Input::Text("0102", Encoding::Hex))?;
//! assert_eq!(values, [Value::from(1u8), Value::from(2u8)]);
//! # Ok(())
//! # }
//! ```

use tracing::debug;

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

use crate::{
    error::{Error, ErrorKind, Result},
    region::{Input, InputRegion},
    scan::Scanner,
    value::Value,
};

mod adapter;
mod builder;

use builder::Builder;

/// Capacity of the input region used by [`Decoder::new`].
pub const DEFAULT_CAPACITY: usize = 64 * 1024;

/// Reusable decoding context.
///
/// Calls take `&mut self`, so one decoder decodes one input at a time.
/// Independent decoders may be used from separate threads.
#[derive(Debug)]
pub struct Decoder {
    region: InputRegion,
    builder: Builder,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    /// Constructs a decoder accepting inputs of up to [`DEFAULT_CAPACITY`]
    /// bytes.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Constructs a decoder accepting inputs of up to `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            region: InputRegion::with_capacity(capacity),
            builder: Builder::new(),
        }
    }

    /// Maximum input length in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.region.capacity()
    }

    fn run(&mut self, input: Input<'_>) -> Result<Vec<Value>> {
        self.builder.reset();
        self.region.load(input)?;

        debug!(len = self.region.as_slice().len(), "decoding");

        for item in Scanner::new(self.region.as_slice()) {
            let (byte_offset, event) = item?;
            adapter::apply(event, &self.region, &mut self.builder)
                .map_err(|e| e.or_offset(byte_offset))?;
        }

        let byte_len = self.region.as_slice().len();
        let values = self
            .builder
            .finish()
            .map_err(|e| e.or_offset(byte_len))?;

        debug!(items = values.len(), "decoded");
        Ok(values)
    }

    /// Decodes the first top-level data item.
    ///
    /// Every item in the input must still be well-formed.
    ///
    /// # Errors
    ///
    /// Returns an error if the input does not fit in the decoder, is not
    /// well-formed CBOR, is truncated, or contains no data item.
    pub fn decode_first<'a, I>(&mut self, input: I) -> Result<Value>
    where
        I: Into<Input<'a>>,
    {
        self.run(input.into())?
            .into_iter()
            .next()
            .ok_or_else(|| Error::with_kind(ErrorKind::NoValue))
    }

    /// Decodes every top-level data item.
    ///
    /// # Errors
    ///
    /// Returns an error if the input does not fit in the decoder, is not
    /// well-formed CBOR, or is truncated.
    pub fn decode_all<'a, I>(&mut self, input: I) -> Result<Vec<Value>>
    where
        I: Into<Input<'a>>,
    {
        self.run(input.into())
    }
}
