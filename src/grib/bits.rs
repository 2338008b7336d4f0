use std::io::{self, Cursor};

use bitstream_io::BigEndian;

use crate::grib::utils::sign_magnitude;

/// Sequential, most-significant-bit-first reader over packed GRIB2 data.
///
/// Decoders only ever move forward. Headers are read as whole bytes, packed values at
/// arbitrary widths, and a few fields start on the next byte boundary.
pub trait BitRead {
    /// Reads `bits` (at most 64) as an unsigned integer. A zero-width read returns 0 and
    /// does not advance the reader.
    fn read_bits(&mut self, bits: u32) -> io::Result<u64>;

    /// Reads `bits` as a GRIB2 sign-magnitude integer.
    fn read_signed_bits(&mut self, bits: u32) -> io::Result<i64> {
        let raw = self.read_bits(bits)?;
        Ok(sign_magnitude(raw, bits))
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<()>;

    /// Skips the remaining bits of a partially consumed byte.
    fn byte_align(&mut self);
}

fn check_width(bits: u32) -> io::Result<()> {
    if bits > u64::BITS {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("cannot read {} bits into a 64 bits integer", bits),
        ));
    }
    Ok(())
}

/// In-memory [`BitRead`] over a byte slice.
///
/// Bits are extracted by [`bitstream_io::BitReader`]; this wrapper only keeps track of the
/// position so that a read past the end fails before anything is consumed.
pub struct SliceBitReader<'a> {
    reader: bitstream_io::BitReader<Cursor<&'a [u8]>, BigEndian>,
    len: usize,
    pos: usize,
}

impl<'a> SliceBitReader<'a> {
    pub fn new(slice: &'a [u8]) -> Self {
        Self {
            reader: bitstream_io::BitReader::endian(Cursor::new(slice), BigEndian),
            len: slice.len() * 8,
            pos: 0,
        }
    }

    /// Position in bits from the start of the slice.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining_bits(&self) -> usize {
        self.len.saturating_sub(self.pos)
    }

    fn check_available(&self, bits: usize) -> io::Result<()> {
        if bits > self.remaining_bits() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("{} bits requested at bit {}, {} available", bits, self.pos, self.remaining_bits()),
            ));
        }
        Ok(())
    }
}

impl<'a> BitRead for SliceBitReader<'a> {
    fn read_bits(&mut self, bits: u32) -> io::Result<u64> {
        check_width(bits)?;
        self.check_available(bits as usize)?;

        let val = BitRead::read_bits(&mut self.reader, bits)?;
        self.pos += bits as usize;
        Ok(val)
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.check_available(buf.len() * 8)?;

        BitRead::read_bytes(&mut self.reader, buf)?;
        self.pos += buf.len() * 8;
        Ok(())
    }

    fn byte_align(&mut self) {
        BitRead::byte_align(&mut self.reader);
        self.pos = (self.pos + 7) / 8 * 8;
    }
}

/// Streams packed data from any [`io::Read`].
impl<R: io::Read> BitRead for bitstream_io::BitReader<R, BigEndian> {
    fn read_bits(&mut self, bits: u32) -> io::Result<u64> {
        check_width(bits)?;
        if bits == 0 {
            return Ok(0);
        }
        <Self as bitstream_io::BitRead>::read::<u64>(self, bits)
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<()> {
        <Self as bitstream_io::BitRead>::read_bytes(self, buf)
    }

    fn byte_align(&mut self) {
        <Self as bitstream_io::BitRead>::byte_align(self)
    }
}
