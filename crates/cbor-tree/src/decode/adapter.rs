//! Maps each scanner event onto a single builder operation.

use core::str;

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::borrow::ToOwned;
#[cfg(feature = "std")]
use std::borrow::ToOwned;

use crate::{
    error::{Error, ErrorKind, Result},
    num::{self, combine32},
    region::InputRegion,
    scan::{Argument, Event, FloatBytes, Length},
    simple::Simple,
    value::{Float, Int, Value},
};

use super::builder::{Builder, FrameKind};

fn uint(arg: Argument) -> Int {
    match arg {
        Argument::U8(v) => Int::Pos(u64::from(v)),
        Argument::U16(v) => Int::Pos(u64::from(v)),
        Argument::U32(hi, lo) => Int::Pos(u64::from(combine32(hi, lo))),
        Argument::U64(a, b, c, d) => num::uint64(a, b, c, d),
    }
}

fn neg_int(arg: Argument) -> Int {
    match arg {
        Argument::U8(v) => num::neg_int(u32::from(v)),
        Argument::U16(v) => num::neg_int(u32::from(v)),
        Argument::U32(hi, lo) => num::neg_int(combine32(hi, lo)),
        Argument::U64(a, b, c, d) => num::neg_int64(a, b, c, d),
    }
}

fn float(bytes: FloatBytes) -> f64 {
    match bytes {
        FloatBytes::Half(b) => num::f16_from_be(b),
        FloatBytes::Single(b) => num::f32_from_be(b),
        FloatBytes::Double(b) => num::f64_from_be(b),
    }
}

fn declared_len(len: Length) -> Result<Option<usize>> {
    match len {
        Length::Indefinite => Ok(None),
        Length::Definite(arg) => usize::try_from(arg.to_u64())
            .map(Some)
            .map_err(|_| Error::with_kind(ErrorKind::LengthOverflow)),
    }
}

fn text(bytes: &[u8]) -> Result<Value> {
    str::from_utf8(bytes)
        .map(|s| Value::TextStr(s.to_owned()))
        .map_err(|e| Error::with_kind(ErrorKind::InvalidUtf8Error(e)))
}

/// Applies one event to the builder.
///
/// Errors carry no byte offset; the caller fills in the offset of the event.
pub(crate) fn apply(event: Event, region: &InputRegion, builder: &mut Builder) -> Result<()> {
    match event {
        Event::Uint(arg) => builder.push(Value::Int(uint(arg))),
        Event::NegInt(arg) => builder.push(Value::Int(neg_int(arg))),
        Event::ByteStr { start, end } => {
            builder.push(Value::ByteStr(region.slice(start, end).to_vec()))
        }
        Event::TextStr { start, end } => builder.push(text(region.slice(start, end))?),
        Event::ByteStrStart => builder.open(FrameKind::ByteChunks, None),
        Event::TextStrStart => builder.open(FrameKind::TextChunks, None),
        Event::ArrayStart(len) => builder.open(FrameKind::Array, declared_len(len)?),
        Event::MapStart(len) => builder.open(FrameKind::Map, declared_len(len)?),
        Event::Tag(arg) => builder.open(FrameKind::Tag(arg.to_u64()), None),
        Event::False => builder.push(Value::Bool(false)),
        Event::True => builder.push(Value::Bool(true)),
        Event::Null => builder.push(Value::Null),
        Event::Undefined => builder.push(Value::Undefined),
        Event::Simple(v) => builder.push(Value::Simple(Simple::new(v))),
        Event::Float(bytes) => builder.push(Value::Float(Float::from(float(bytes)))),
        Event::Infinity => builder.push(Value::Float(Float::from(f64::INFINITY))),
        Event::NegInfinity => builder.push(Value::Float(Float::from(f64::NEG_INFINITY))),
        Event::NaN => builder.push(Value::Float(Float::from(f64::NAN))),
        Event::NegNaN => builder.push(Value::Float(Float::from(-f64::NAN))),
        Event::Break => builder.close_indefinite(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Input;
    use num_bigint::BigInt;

    #[cfg(all(feature = "alloc", not(feature = "std")))]
    use alloc::vec::Vec;
    #[cfg(feature = "std")]
    use std::vec::Vec;

    #[test]
    fn test_integer_widths() {
        assert_eq!(uint(Argument::U16(1000)), Int::Pos(1000));
        assert_eq!(neg_int(Argument::U8(0)), Int::Neg(-1));
        assert_eq!(
            neg_int(Argument::U32(0xffff, 0xffff)),
            Int::Neg(-4_294_967_296)
        );
        assert_eq!(
            uint(Argument::U64(0xffff, 0xffff, 0xffff, 0xffff)),
            Int::Big(BigInt::from(u64::MAX))
        );
    }

    #[test]
    fn test_declared_len() -> Result<()> {
        assert_eq!(declared_len(Length::Indefinite)?, None);
        assert_eq!(declared_len(Length::Definite(Argument::U8(3)))?, Some(3));
        Ok(())
    }

    #[test]
    fn test_apply_text_validates_utf8() -> Result<()> {
        let mut region = InputRegion::with_capacity(4);
        region.load(Input::from(&[0x62u8, 0xc3, 0x28]))?;
        let mut builder = Builder::new();
        let err = apply(Event::TextStr { start: 1, end: 3 }, &region, &mut builder).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidUtf8Error(_)));
        Ok(())
    }

    #[test]
    fn test_apply_neg_nan() -> Result<()> {
        let region = InputRegion::with_capacity(0);
        let mut builder = Builder::new();
        apply(Event::NegNaN, &region, &mut builder)?;
        apply(Event::NaN, &region, &mut builder)?;
        let values = builder.finish()?;
        let floats = values
            .iter()
            .filter_map(|v| match v {
                Value::Float(f) => Some(*f),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert!(floats[0].is_nan() && floats[0].is_sign_negative());
        assert!(floats[1].is_nan() && !floats[1].is_sign_negative());
        Ok(())
    }
}
