use std::io;

use crate::grib::bits::BitRead;
use crate::grib::sections::sect5::Data0;
use crate::grib::sections::sect7::{field_width, Packing};
use crate::grib::Result;

/// Template 5.0 decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct SimplePacking {
    definition: Data0,
    num_vals: usize,
}

impl Packing for SimplePacking {
    type Definition = Data0;

    fn new(definition: Data0, num_vals: usize) -> Self {
        Self { definition, num_vals }
    }

    fn definition(&self) -> &Data0 {
        &self.definition
    }

    fn num_vals(&self) -> usize {
        self.num_vals
    }

    fn read_all_data<R: BitRead + ?Sized>(&self, reader: &mut R) -> Result<Vec<f64>> {
        let scale = Scale::new(&self.definition);

        if self.definition.num_bits == 0 {
            return Ok(vec![scale.apply(0.0); self.num_vals]);
        }

        let num_bits = field_width(self.definition.num_bits.into(), "number of bits")?;
        let packed = (0..self.num_vals)
            .map(|_| reader.read_bits(num_bits))
            .collect::<io::Result<Vec<u64>>>()?;

        Ok(SimpleDecoderIterator::new(packed.into_iter(), scale).collect())
    }
}

/// `Y = (R + X * 2^E) / 10^D`
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Scale {
    reference_value: f64,
    binary_scale: f64,
    decimal_scale: f64,
}

impl Scale {
    pub(crate) fn new(data: &Data0) -> Self {
        Self {
            reference_value: data.reference_value as f64,
            binary_scale: 2_f64.powi(data.binary_scale_factor() as i32),
            decimal_scale: 10_f64.powi(data.decimal_scale_factor() as i32),
        }
    }

    pub(crate) fn apply(&self, packed: f64) -> f64 {
        (self.reference_value + packed * self.binary_scale) / self.decimal_scale
    }
}

pub(crate) struct SimpleDecoderIterator<I: Iterator<Item = u64>> {
    packed_iter: I,
    scale: Scale,
}

impl<I: Iterator<Item = u64>> SimpleDecoderIterator<I> {
    pub(crate) fn new(packed_iter: I, scale: Scale) -> Self {
        Self { packed_iter, scale }
    }
}

impl<I: Iterator<Item = u64>> Iterator for SimpleDecoderIterator<I> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        self.packed_iter
            .next()
            .map(|encoded| self.scale.apply(encoded as f64))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.packed_iter.size_hint()
    }
}
