//! Endian-aware scalar writing.
//!
//! Binary mesh formats fix their byte order; the host does not get a
//! vote. [`write_be`] and [`write_le`] serialize any fixed-width
//! numeric value in the requested order, writing exactly
//! `size_of::<T>()` bytes. No value-range validation is performed.

use std::io::{self, Write};

mod sealed {
    pub trait Sealed {}
}

/// A fixed-width numeric type with a defined byte representation.
///
/// Sealed; implemented for the integer and floating point primitives
/// (`u8` through `u64`, `i8` through `i64`, `f32`, `f64`).
pub trait Scalar: sealed::Sealed + Copy {
    /// Write the value in big-endian byte order.
    fn put_be<W: Write>(self, writer: &mut W) -> io::Result<()>;

    /// Write the value in little-endian byte order.
    fn put_le<W: Write>(self, writer: &mut W) -> io::Result<()>;
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {$(
        impl sealed::Sealed for $ty {}

        impl Scalar for $ty {
            #[inline]
            fn put_be<W: Write>(self, writer: &mut W) -> io::Result<()> {
                writer.write_all(&self.to_be_bytes())
            }

            #[inline]
            fn put_le<W: Write>(self, writer: &mut W) -> io::Result<()> {
                writer.write_all(&self.to_le_bytes())
            }
        }
    )*};
}

impl_scalar!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

/// Write `value` to `writer` in big-endian byte order.
///
/// # Errors
///
/// Propagates any error from the underlying writer.
pub fn write_be<W: Write, T: Scalar>(writer: &mut W, value: T) -> io::Result<()> {
    value.put_be(writer)
}

/// Write `value` to `writer` in little-endian byte order.
///
/// # Errors
///
/// Propagates any error from the underlying writer.
pub fn write_le<W: Write, T: Scalar>(writer: &mut W, value: T) -> io::Result<()> {
    value.put_le(writer)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn u16_byte_orders() {
        let mut be = Vec::new();
        write_be(&mut be, 0x0102u16).unwrap();
        assert_eq!(be, [0x01, 0x02]);

        let mut le = Vec::new();
        write_le(&mut le, 0x0102u16).unwrap();
        assert_eq!(le, [0x02, 0x01]);
    }

    #[test]
    fn u32_big_endian() {
        let mut out = Vec::new();
        write_be(&mut out, 0xDEAD_BEEFu32).unwrap();
        assert_eq!(out, [0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn f32_big_endian_bit_pattern() {
        let mut out = Vec::new();
        write_be(&mut out, 1.0f32).unwrap();
        assert_eq!(out, [0x3F, 0x80, 0x00, 0x00]);
    }

    #[test]
    fn f64_round_trips_through_bits() {
        let value = -123.456f64;
        let mut out = Vec::new();
        write_le(&mut out, value).unwrap();
        let bytes: [u8; 8] = out.as_slice().try_into().unwrap();
        assert_eq!(f64::from_le_bytes(bytes), value);
    }

    #[test]
    fn single_bytes_ignore_order() {
        let mut be = Vec::new();
        let mut le = Vec::new();
        write_be(&mut be, 0xABu8).unwrap();
        write_le(&mut le, 0xABu8).unwrap();
        assert_eq!(be, le);
        assert_eq!(be, [0xAB]);
    }

    #[test]
    fn negative_integers_keep_twos_complement() {
        let mut out = Vec::new();
        write_be(&mut out, -1i32).unwrap();
        assert_eq!(out, [0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn writes_exactly_size_of_bytes() {
        let mut out = Vec::new();
        write_be(&mut out, 0u64).unwrap();
        write_be(&mut out, 0u8).unwrap();
        write_be(&mut out, 0f32).unwrap();
        assert_eq!(out.len(), 8 + 1 + 4);
    }
}
