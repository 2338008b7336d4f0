use serde::{Deserialize, Serialize};

use crate::grib::bits::BitRead;
use crate::grib::descriptor::TemplateDescriptor;
use crate::grib::sections::sect5::{Data0, Data2, Data3, Definition, TemplateNumber};
use crate::grib::sections::sect7::complex::ComplexPacking;
use crate::grib::sections::sect7::complex_spatial_diff::ComplexPackingAndSpatialDifferencing;
use crate::grib::sections::sect7::simple::SimplePacking;
use crate::grib::sections::sect7::Packing;
use crate::grib::{GribError, Result};

/// A decoded Data Representation Template, ready to unpack the data section.
///
/// Serializes as its [`TemplateDescriptor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "TemplateDescriptor", try_from = "TemplateDescriptor")]
pub enum Template {
    SimplePacking(SimplePacking),
    ComplexPacking(ComplexPacking),
    ComplexPackingAndSpatialDifferencing(ComplexPackingAndSpatialDifferencing),
}

impl From<SimplePacking> for Template {
    fn from(packing: SimplePacking) -> Self {
        Template::SimplePacking(packing)
    }
}

impl From<ComplexPacking> for Template {
    fn from(packing: ComplexPacking) -> Self {
        Template::ComplexPacking(packing)
    }
}

impl From<ComplexPackingAndSpatialDifferencing> for Template {
    fn from(packing: ComplexPackingAndSpatialDifferencing) -> Self {
        Template::ComplexPackingAndSpatialDifferencing(packing)
    }
}

pub(crate) struct Family {
    pub(crate) number: TemplateNumber,
    pub(crate) header_len: usize,
    build: fn(&[u8], usize) -> Result<Template>,
}

fn build<P: Packing>(bytes: &[u8], num_vals: usize) -> Result<Template> {
    Ok(P::new(P::Definition::decode(bytes)?, num_vals).into())
}

const FAMILIES: &[Family] = &[
    Family {
        number: Data0::NUMBER,
        header_len: Data0::LEN,
        build: build::<SimplePacking>,
    },
    Family {
        number: Data2::NUMBER,
        header_len: Data2::LEN,
        build: build::<ComplexPacking>,
    },
    Family {
        number: Data3::NUMBER,
        header_len: Data3::LEN,
        build: build::<ComplexPackingAndSpatialDifferencing>,
    },
];

pub(crate) fn family(number: TemplateNumber) -> Result<&'static Family> {
    FAMILIES
        .iter()
        .find(|family| family.number == number)
        .ok_or(GribError::UnimplementedTemplate(number))
}

/// Reads the header of template `number` from `reader` and binds it to `num_vals` values.
///
/// Exactly the header octets are consumed, so `reader` is left at the start of the packed
/// data. Templates other than 5.0, 5.2 and 5.3 fail before anything is read.
pub fn read_template<R: BitRead + ?Sized>(reader: &mut R, number: TemplateNumber, num_vals: usize) -> Result<Template> {
    let family = family(number)?;

    let mut header = vec![0; family.header_len];
    reader.read_bytes(&mut header)?;

    let template = (family.build)(&header, num_vals)?;
    debug!("Read template {} for {} values", number, num_vals);

    Ok(template)
}

impl Template {
    /// Builds a template from header bytes already extracted from section 5.
    pub fn from_header_bytes(number: TemplateNumber, bytes: &[u8], num_vals: usize) -> Result<Self> {
        (family(number)?.build)(bytes, num_vals)
    }

    pub fn number(&self) -> TemplateNumber {
        match self {
            Template::SimplePacking(_) => Data0::NUMBER,
            Template::ComplexPacking(_) => Data2::NUMBER,
            Template::ComplexPackingAndSpatialDifferencing(_) => Data3::NUMBER,
        }
    }

    pub fn num_vals(&self) -> usize {
        match self {
            Template::SimplePacking(packing) => packing.num_vals(),
            Template::ComplexPacking(packing) => packing.num_vals(),
            Template::ComplexPackingAndSpatialDifferencing(packing) => packing.num_vals(),
        }
    }

    /// The header record as it is laid out in section 5.
    pub fn header_bytes(&self) -> Vec<u8> {
        match self {
            Template::SimplePacking(packing) => packing.definition().encode(),
            Template::ComplexPacking(packing) => packing.definition().encode(),
            Template::ComplexPackingAndSpatialDifferencing(packing) => packing.definition().encode(),
        }
    }

    /// Unpacks `num_vals` values from the data section.
    pub fn read_all_data<R: BitRead + ?Sized>(&self, reader: &mut R) -> Result<Vec<f64>> {
        match self {
            Template::SimplePacking(packing) => packing.read_all_data(reader),
            Template::ComplexPacking(packing) => packing.read_all_data(reader),
            Template::ComplexPackingAndSpatialDifferencing(packing) => packing.read_all_data(reader),
        }
    }
}
