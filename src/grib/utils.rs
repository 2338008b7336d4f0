use crate::grib::sections::sect5::TemplateNumber;
use crate::grib::{GribError, Result};

/// GRIB2 stores signed integers as sign and magnitude: the most significant bit is the
/// sign, the remaining bits are the absolute value.
pub(crate) trait GribInt<I> {
    fn as_grib_int(&self) -> I;
}

macro_rules! add_impl_for_ints {
    ($(($ty_src:ty, $ty_dst:ty),)*) => ($(
        impl GribInt<$ty_dst> for $ty_src {
            fn as_grib_int(&self) -> $ty_dst {
                if self.leading_zeros() == 0 {
                    let abs = (self << 1 >> 1) as $ty_dst;
                    -abs
                } else {
                    *self as $ty_dst
                }
            }
        }
    )*);
}

add_impl_for_ints! {
    (u8, i8),
    (u16, i16),
    (u32, i32),
    (u64, i64),
}

/// Inverse of [`GribInt`]. The magnitude is truncated to the available bits, so the
/// most negative two's complement value has no exact encoding.
pub(crate) trait GribUint<U> {
    fn as_grib_uint(&self) -> U;
}

macro_rules! add_impl_for_uints {
    ($(($ty_src:ty, $ty_dst:ty),)*) => ($(
        impl GribUint<$ty_dst> for $ty_src {
            fn as_grib_uint(&self) -> $ty_dst {
                let sign = 1 << (<$ty_dst>::BITS - 1);
                let abs = self.unsigned_abs() & !sign;
                if *self < 0 {
                    abs | sign
                } else {
                    abs
                }
            }
        }
    )*);
}

add_impl_for_uints! {
    (i16, u16),
    (i32, u32),
}

/// Sign-magnitude conversion for an arbitrary field width, as read from a bitstream.
pub(crate) fn sign_magnitude(raw: u64, bits: u32) -> i64 {
    match bits {
        0 => 0,
        64 => raw.as_grib_int(),
        _ => {
            let sign = 1u64 << (bits - 1);
            let abs = (raw & (sign - 1)) as i64;
            if raw & sign != 0 {
                -abs
            } else {
                abs
            }
        }
    }
}

/// Big-endian cursor over the bytes of a template header.
pub(crate) struct Buffer<'a> {
    number: TemplateNumber,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Buffer<'a> {
    /// Fails with [`GribError::ShortRead`] unless at least `len` bytes are available.
    pub(crate) fn for_template(number: TemplateNumber, len: usize, bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() < len {
            return Err(GribError::ShortRead {
                number,
                expected: len,
                available: bytes.len(),
            });
        }

        Ok(Self {
            number,
            bytes: &bytes[..len],
            pos: 0,
        })
    }

    pub(crate) fn read<T: EndianRead>(&mut self) -> Result<T> {
        let end = self.pos + std::mem::size_of::<T>();
        let val = self
            .bytes
            .get(self.pos..end)
            .and_then(T::from_be_slice)
            .ok_or(GribError::ShortRead {
                number: self.number,
                expected: end,
                available: self.bytes.len(),
            })?;
        self.pos = end;

        Ok(val)
    }
}

#[derive(Default)]
pub(crate) struct BufferWriter {
    bytes: Vec<u8>,
}

impl BufferWriter {
    pub(crate) fn with_capacity(len: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(len),
        }
    }

    pub(crate) fn write<T: EndianWrite>(&mut self, val: T) {
        val.extend_be_bytes(&mut self.bytes);
    }

    pub(crate) fn into_inner(self) -> Vec<u8> {
        self.bytes
    }
}

pub(crate) trait EndianRead: Sized {
    fn from_be_slice(bytes: &[u8]) -> Option<Self>;
}

pub(crate) trait EndianWrite {
    fn extend_be_bytes(&self, out: &mut Vec<u8>);
}

macro_rules! uint_impl {
    ($ty:ty) => {
        impl EndianRead for $ty {
            fn from_be_slice(bytes: &[u8]) -> Option<Self> {
                bytes.try_into().ok().map(<$ty>::from_be_bytes)
            }
        }

        impl EndianWrite for $ty {
            fn extend_be_bytes(&self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_be_bytes());
            }
        }
    };
}

uint_impl! { u8 }
uint_impl! { u16 }
uint_impl! { u32 }

uint_impl! { f32 }
