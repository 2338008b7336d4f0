use crate::grib::bits::BitRead;
use crate::grib::sections::sect5::{Data2, MissingSubstitutes, MissingValueManagement};
use crate::grib::sections::sect7::groups::{self, Group};
use crate::grib::sections::sect7::simple::Scale;
use crate::grib::sections::sect7::{field_width, Packing};
use crate::grib::Result;

/// Template 5.2 decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexPacking {
    definition: Data2,
    num_vals: usize,
}

impl Packing for ComplexPacking {
    type Definition = Data2;

    fn new(definition: Data2, num_vals: usize) -> Self {
        Self { definition, num_vals }
    }

    fn definition(&self) -> &Data2 {
        &self.definition
    }

    fn num_vals(&self) -> usize {
        self.num_vals
    }

    fn read_all_data<R: BitRead + ?Sized>(&self, reader: &mut R) -> Result<Vec<f64>> {
        let packed = unpack(reader, &self.definition, self.num_vals)?;

        let scale = Scale::new(&self.definition.simple);
        let substitutes = self.definition.missing_substitutes();
        Ok(packed.into_iter().map(|p| p.scaled(&scale, &substitutes)).collect())
    }
}

/// Integer field of a complex packed grid, before scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Packed {
    Value(i64),
    PrimaryMissing,
    SecondaryMissing,
}

impl Packed {
    pub(crate) fn scaled(self, scale: &Scale, substitutes: &MissingSubstitutes) -> f64 {
        match self {
            Packed::Value(v) => scale.apply(v as f64),
            Packed::PrimaryMissing => substitutes.primary,
            Packed::SecondaryMissing => substitutes.secondary,
        }
    }
}

/// Reads the group descriptions then every group's values.
pub(crate) fn unpack<R: BitRead + ?Sized>(reader: &mut R, data: &Data2, num_vals: usize) -> Result<Vec<Packed>> {
    let missing = data.missing_value_management()?;
    let num_bits = field_width(data.simple.num_bits.into(), "number of bits")?;
    let groups = groups::decode(reader, num_bits, &data.group_definition, num_vals)?;

    let mut packed = Vec::with_capacity(num_vals);
    for group in &groups {
        ComplexPackingDecoder::new(group, num_bits, missing).decode(reader, &mut packed)?;
    }

    Ok(packed)
}

struct ComplexPackingDecoder<'a> {
    group: &'a Group,
    num_bits: u32,
    missing: MissingValueManagement,
}

impl<'a> ComplexPackingDecoder<'a> {
    fn new(group: &'a Group, num_bits: u32, missing: MissingValueManagement) -> Self {
        Self { group, num_bits, missing }
    }

    fn decode<R: BitRead + ?Sized>(&self, reader: &mut R, packed: &mut Vec<Packed>) -> Result<()> {
        if self.group.width == 0 {
            // constant group, possibly all missing
            let value = self
                .missing_sentinel(self.group.reference, self.num_bits)
                .unwrap_or(Packed::Value(self.group.reference as i64));
            packed.extend(std::iter::repeat(value).take(self.group.length));
            return Ok(());
        }

        for _ in 0..self.group.length {
            let raw = reader.read_bits(self.group.width)?;
            packed.push(
                self.missing_sentinel(raw, self.group.width)
                    .unwrap_or(Packed::Value(self.group.reference.wrapping_add(raw) as i64)),
            );
        }

        Ok(())
    }

    /// All ones at `bits` is the primary missing value, all ones minus one the secondary.
    fn missing_sentinel(&self, raw: u64, bits: u32) -> Option<Packed> {
        if bits == 0 {
            return None;
        }
        let all_ones = u64::MAX >> (u64::BITS - bits);

        match self.missing {
            MissingValueManagement::None => None,
            _ if raw == all_ones => Some(Packed::PrimaryMissing),
            MissingValueManagement::PrimaryAndSecondary if raw == all_ones - 1 => Some(Packed::SecondaryMissing),
            _ => None,
        }
    }
}
