use crate::grib::bits::BitRead;
use crate::grib::sections::sect5::{Data3, SpatialDifferencingOrder};
use crate::grib::sections::sect7::complex::{self, Packed};
use crate::grib::sections::sect7::simple::Scale;
use crate::grib::sections::sect7::Packing;
use crate::grib::Result;

/// Template 5.3 decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexPackingAndSpatialDifferencing {
    definition: Data3,
    num_vals: usize,
}

impl Packing for ComplexPackingAndSpatialDifferencing {
    type Definition = Data3;

    fn new(definition: Data3, num_vals: usize) -> Self {
        Self { definition, num_vals }
    }

    fn definition(&self) -> &Data3 {
        &self.definition
    }

    fn num_vals(&self) -> usize {
        self.num_vals
    }

    fn read_all_data<R: BitRead + ?Sized>(&self, reader: &mut R) -> Result<Vec<f64>> {
        let order = self.definition.spatial_difference_order()?;
        let extra_bits = self.definition.extra_descriptor_bits()?;

        let z1 = reader.read_signed_bits(extra_bits)?;
        let z2 = match order {
            SpatialDifferencingOrder::First => 0,
            SpatialDifferencingOrder::Second => reader.read_signed_bits(extra_bits)?,
        };
        let z_min = reader.read_signed_bits(extra_bits)?;
        debug!("spatial differencing {:?} : first values {} {}, minimum {}", order, z1, z2, z_min);

        let complex = &self.definition.complex;
        let spdiff_packed = complex::unpack(reader, complex, self.num_vals)?;
        let spdiff_unpacked = SpatialDiffDecodeIterator::new(spdiff_packed.into_iter(), order, [z1, z2], z_min);

        let scale = Scale::new(&complex.simple);
        let substitutes = complex.missing_substitutes();
        Ok(spdiff_unpacked.map(|p| p.scaled(&scale, &substitutes)).collect())
    }
}

/// Undoes first or second order differencing over the non-missing values.
///
/// The first one or two non-missing values are replaced by the original values stored
/// in the extra descriptors; the overall minimum is added back to every later difference.
///
/// The minimum is added to each difference before accumulating, as WMO producers and
/// wgrib2 do, not to each reconstructed value.
pub(crate) struct SpatialDiffDecodeIterator<I> {
    iter: I,
    order: SpatialDifferencingOrder,
    first_values: [i64; 2],
    minimum: i64,
    count: usize,
    prev1: i64,
    prev2: i64,
}

impl<I> SpatialDiffDecodeIterator<I> {
    pub(crate) fn new(iter: I, order: SpatialDifferencingOrder, first_values: [i64; 2], minimum: i64) -> Self {
        Self {
            iter,
            order,
            first_values,
            minimum,
            count: 0,
            prev1: 0,
            prev2: 0,
        }
    }
}

impl<I: Iterator<Item = Packed>> Iterator for SpatialDiffDecodeIterator<I> {
    type Item = Packed;

    fn next(&mut self) -> Option<Packed> {
        let v = match self.iter.next()? {
            Packed::Value(v) => v,
            missing => return Some(missing),
        };

        let count = self.count;
        self.count += 1;

        let v = if count < self.order.seeds() {
            self.first_values[count]
        } else {
            let v = v.wrapping_add(self.minimum);
            match self.order {
                SpatialDifferencingOrder::First => v.wrapping_add(self.prev1),
                SpatialDifferencingOrder::Second => v
                    .wrapping_add(self.prev1.wrapping_mul(2))
                    .wrapping_sub(self.prev2),
            }
        };

        (self.prev2, self.prev1) = (self.prev1, v);
        Some(Packed::Value(v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}
