//! # cbor-tree
//!
//! cbor-tree is a library which decodes data in the [Concise Binary Object
//! Representation (CBOR)][cbor] data format into a dynamic [`Value`] tree.
//! CBOR is specified in [RFC 8949][rfc_8949].
//!
//! The input is scanned into a flat stream of events, and an explicit stack of
//! open containers assembles the events into values. Nesting depth is not
//! limited by the call stack.
//!
//! ```
//! # fn main() -> cbor_tree::Result<()> {
//! use cbor_tree::Value;
//!
//! // {"a": 1, "b": [2, 3]}
//! let value = cbor_tree::decode_first("a26161016162820203")?;
//! assert_eq!(value.get("a"), Some(&Value::from(1u8)));
//! assert_eq!(value.get("b").and_then(|b| b.get(1usize)), Some(&Value::from(3u8)));
//!
//! // Maps with keys other than text strings are general maps.
//! let value = cbor_tree::decode_first("a26161010203")?;
//! assert!(value.is_map());
//! # Ok(())
//! # }
//! ```
//!
//! Integers which cannot be held exactly by an IEEE-754 double (a magnitude of
//! `2^53` or more) are decoded as [`Int::Big`]. Tags are kept structural; the
//! tag number and content are returned without interpretation.
//!
//! ## License
//!
//! Licensed under either of [Apache License, Version 2.0][LICENSE_APACHE] or [MIT
//! License][LICENSE_MIT] at your option.
//!
//! ### Contributions
//!
//! Unless you explicitly state otherwise, any contribution intentionally submitted
//! for inclusion in the work by you, as defined in the Apache-2.0 license, shall be
//! dual licensed as above, without any additional terms or conditions.
//!
//! [LICENSE_APACHE]: LICENSE-APACHE
//! [LICENSE_MIT]: LICENSE-MIT
//! [cbor]: https://cbor.io/
//! [rfc_8949]: https://www.rfc-editor.org/rfc/rfc8949.html

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(all(feature = "alloc", not(feature = "std")))]
extern crate alloc;

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

mod decode;
mod error;
pub mod num;
mod read;
mod region;
mod scan;
mod simple;
mod tag;
pub mod value;

pub use decode::{Decoder, DEFAULT_CAPACITY};
#[doc(inline)]
pub use error::{Error, ErrorKind, Result};
pub use region::{Encoding, Input};
pub use simple::{
    Simple, SIMPLE_VALUE_FALSE, SIMPLE_VALUE_NULL, SIMPLE_VALUE_TRUE, SIMPLE_VALUE_UNDEFINED,
};
pub use tag::{Num as TagNum, Tag};
#[doc(inline)]
pub use value::{Float, Int, Value};

fn decoder_for(input: &Input<'_>) -> Decoder {
    Decoder::with_capacity(input.len_hint())
}

/// Decodes the first top-level data item with a decoder sized to the input.
///
/// # Errors
///
/// Returns an error if the input is not well-formed CBOR, is truncated, or
/// contains no data item.
pub fn decode_first<'a, I>(input: I) -> Result<Value>
where
    I: Into<Input<'a>>,
{
    let input = input.into();
    decoder_for(&input).decode_first(input)
}

/// Decodes every top-level data item with a decoder sized to the input.
///
/// # Errors
///
/// Returns an error if the input is not well-formed CBOR or is truncated.
pub fn decode_all<'a, I>(input: I) -> Result<Vec<Value>>
where
    I: Into<Input<'a>>,
{
    let input = input.into();
    decoder_for(&input).decode_all(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_decode_first_and_all() -> Result<()> {
        let input = hex!("01 82 02 03");
        assert_eq!(decode_first(&input)?, Value::from(1u8));
        assert_eq!(decode_all(&input)?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_sized_to_text_input() -> Result<()> {
        let v = decode_first(Input::Text("gwECAw==", Encoding::Base64))?;
        assert_eq!(v.as_array().map(Vec::len), Some(3));
        assert_eq!(decode_first("83010203")?, v);
        Ok(())
    }

    #[test]
    fn test_empty_input() {
        let err = decode_first("").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::NoValue));
    }

    #[test]
    fn test_decoder_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Decoder>();
    }
}
