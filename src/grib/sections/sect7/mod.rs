use crate::grib::bits::BitRead;
use crate::grib::sections::sect5::Definition;
use crate::grib::template::Template;
use crate::grib::{GribError, Result};

pub mod simple;
pub mod complex;
mod groups;
pub mod complex_spatial_diff;

/// Value reconstruction for one Data Representation Template.
///
/// A packing owns its header record and the number of values to decode. It never owns the
/// reader: every call to [`Packing::read_all_data`] drains the given reader from its current
/// position and returns either all `num_vals` values or an error.
pub trait Packing: Into<Template> {
    type Definition: Definition;

    fn new(definition: Self::Definition, num_vals: usize) -> Self;

    fn definition(&self) -> &Self::Definition;

    fn num_vals(&self) -> usize;

    fn read_all_data<R: BitRead + ?Sized>(&self, reader: &mut R) -> Result<Vec<f64>>;
}

/// Bit width of a packed field, which must fit the 64 bits integers values are read into.
pub(crate) fn field_width(bits: u64, field: &'static str) -> Result<u32> {
    if bits > u64::BITS as u64 {
        return Err(GribError::InvalidHeaderField { field, value: bits });
    }
    Ok(bits as u32)
}
