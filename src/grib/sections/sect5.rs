use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::grib::utils::{Buffer, BufferWriter, GribInt, GribUint};
use crate::grib::{GribError, Result};

/// Data Representation Template Number (see Code Table 5.0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateNumber(pub u16);

impl TemplateNumber {
    pub const GRID_POINT_DATA_SIMPLE_PACKING: Self = Self(0);
    pub const MATRIX_VALUE_AT_GRID_POINT_SIMPLE_PACKING: Self = Self(1);
    pub const GRID_POINT_DATA_COMPLEX_PACKING: Self = Self(2);
    pub const GRID_POINT_DATA_COMPLEX_PACKING_AND_SPATIAL_DIFFERENCING: Self = Self(3);
    pub const GRID_POINT_DATA_IEEE_FLOATING_POINT: Self = Self(4);
    // 5-39 Reserved
    pub const GRID_POINT_DATA_JPEG2000: Self = Self(40);
    pub const GRID_POINT_DATA_PNG: Self = Self(41);
    pub const GRID_POINT_DATA_CCSDS: Self = Self(42);
    // 43-49 Reserved
    pub const SPECTRAL_DATA_SIMPLE_PACKING: Self = Self(50);
    pub const SPECTRAL_DATA_COMPLEX_PACKING: Self = Self(51);
    // 52 Reserved
    pub const SPECTRAL_DATA_COMPLEX_PACKING_LIMITED_AREA: Self = Self(53);
    // 54-60 Reserved
    pub const GRID_POINT_DATA_SIMPLE_PACKING_LOGARITHM: Self = Self(61);
    // 62-199 Reserved
    pub const RUN_LENGTH_PACKING_WITH_LEVEL_VALUES: Self = Self(200);
    // 201-49151 Reserved
    // 49152-65534 Reserved for local use
    pub const MISSING: Self = Self(255);

    pub fn name(&self) -> Option<&'static str> {
        let name = match self.0 {
            0 => "Grid point data - simple packing",
            1 => "Matrix value at grid point - simple packing",
            2 => "Grid point data - complex packing",
            3 => "Grid point data - complex packing and spatial differencing",
            4 => "Grid point data - IEEE floating point data",
            40 => "Grid point data - JPEG2000 code stream format",
            41 => "Grid point data - PNG",
            42 => "Grid point data - CCSDS recommended lossless compression",
            50 => "Spectral data - simple packing",
            51 => "Spectral data - complex packing",
            53 => "Spectral data - complex packing for limited area models",
            61 => "Grid point data - simple packing with logarithm pre-processing",
            200 => "Run length packing with level values",
            255 | 65535 => "Missing",
            _ => return None,
        };
        Some(name)
    }

    /// Whether values packed with this template can be decoded.
    pub fn is_implemented(&self) -> bool {
        matches!(self.0, 0 | 2 | 3)
    }

    pub fn is_local_use(&self) -> bool {
        (49152..=65534).contains(&self.0)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self.0, 255 | 65535)
    }

    pub fn is_reserved(&self) -> bool {
        self.name().is_none() && !self.is_local_use()
    }
}

impl From<u16> for TemplateNumber {
    fn from(number: u16) -> Self {
        Self(number)
    }
}

impl Display for TemplateNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) => write!(f, "5.{} ({})", self.0, name),
            None if self.is_local_use() => write!(f, "5.{} (reserved for local use)", self.0),
            None => write!(f, "5.{} (reserved)", self.0),
        }
    }
}

/// Fixed-length, big-endian header record of a Data Representation Template.
pub trait Definition: Sized {
    const NUMBER: TemplateNumber;
    /// Number of octets of the record, from octet 12 of section 5.
    const LEN: usize;

    /// Decodes the first [`Self::LEN`] bytes; extra bytes are ignored.
    fn decode(bytes: &[u8]) -> Result<Self>;

    /// Exactly [`Self::LEN`] bytes, the inverse of [`Definition::decode`].
    fn encode(&self) -> Vec<u8>;
}

/// Missing value management (see Code Table 5.5)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingValueManagement {
    None,
    Primary,
    PrimaryAndSecondary,
}

impl TryFrom<u8> for MissingValueManagement {
    type Error = GribError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Primary),
            2 => Ok(Self::PrimaryAndSecondary),
            n => Err(GribError::InvalidHeaderField {
                field: "missing value management",
                value: n as u64,
            }),
        }
    }
}

impl From<MissingValueManagement> for u8 {
    fn from(value: MissingValueManagement) -> Self {
        match value {
            MissingValueManagement::None => 0,
            MissingValueManagement::Primary => 1,
            MissingValueManagement::PrimaryAndSecondary => 2,
        }
    }
}

/// Order of spatial differencing (see Code Table 5.6)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpatialDifferencingOrder {
    First,
    Second,
}

impl SpatialDifferencingOrder {
    /// Number of leading values replaced by the extra descriptors.
    pub fn seeds(&self) -> usize {
        match self {
            Self::First => 1,
            Self::Second => 2,
        }
    }
}

impl TryFrom<u8> for SpatialDifferencingOrder {
    type Error = GribError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Self::First),
            2 => Ok(Self::Second),
            n => Err(GribError::InvalidHeaderField {
                field: "order of spatial differencing",
                value: n as u64,
            }),
        }
    }
}

/// Template 5.0: Grid point data - simple packing
///
/// Scale factors are kept as they are on the wire so that encoding reproduces the decoded
/// bytes exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Data0 {
    /// Reference value (R) (IEEE 32-bit floating-point value)
    pub reference_value: f32,
    binary_scale_factor: u16,
    decimal_scale_factor: u16,
    /// Number of bits used for each packed value
    pub num_bits: u8,
    /// Type of original field values (see Code Table 5.1)
    pub values_type: u8,
}

impl Data0 {
    pub fn new(reference_value: f32, binary_scale_factor: i16, decimal_scale_factor: i16, num_bits: u8) -> Self {
        Self {
            reference_value,
            binary_scale_factor: binary_scale_factor.as_grib_uint(),
            decimal_scale_factor: decimal_scale_factor.as_grib_uint(),
            num_bits,
            values_type: 0,
        }
    }

    pub fn with_values_type(self, values_type: u8) -> Self {
        Self { values_type, ..self }
    }

    /// Binary scale factor (E)
    pub fn binary_scale_factor(&self) -> i16 {
        self.binary_scale_factor.as_grib_int()
    }

    /// Decimal scale factor (D)
    pub fn decimal_scale_factor(&self) -> i16 {
        self.decimal_scale_factor.as_grib_int()
    }

    fn read(buf: &mut Buffer) -> Result<Self> {
        Ok(Self {
            reference_value: buf.read()?,
            binary_scale_factor: buf.read()?,
            decimal_scale_factor: buf.read()?,
            num_bits: buf.read()?,
            values_type: buf.read()?,
        })
    }

    fn write(&self, buf: &mut BufferWriter) {
        buf.write(self.reference_value);
        buf.write(self.binary_scale_factor);
        buf.write(self.decimal_scale_factor);
        buf.write(self.num_bits);
        buf.write(self.values_type);
    }
}

impl Definition for Data0 {
    const NUMBER: TemplateNumber = TemplateNumber::GRID_POINT_DATA_SIMPLE_PACKING;
    const LEN: usize = 10;

    fn decode(bytes: &[u8]) -> Result<Self> {
        Self::read(&mut Buffer::for_template(Self::NUMBER, Self::LEN, bytes)?)
    }

    fn encode(&self) -> Vec<u8> {
        let mut buf = BufferWriter::with_capacity(Self::LEN);
        self.write(&mut buf);
        buf.into_inner()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupDefinition {
    /// NG - Number of groups of data values into which field is split
    pub num_groups: u32,
    /// Reference for group widths
    pub group_widths_reference: u8,
    /// Number of bits used for the group widths (after the reference value has been removed)
    pub group_widths_num_bits: u8,
    /// Reference for group lengths
    pub group_lengths_reference: u32,
    /// Length increment for the group lengths
    pub group_lengths_increment: u8,
    /// True length of last group
    pub group_lengths_last: u32,
    /// Number of bits used for the scaled group lengths
    pub group_scaled_lengths_num_bits: u8,
}

impl GroupDefinition {
    fn read(buf: &mut Buffer) -> Result<Self> {
        Ok(Self {
            num_groups: buf.read()?,
            group_widths_reference: buf.read()?,
            group_widths_num_bits: buf.read()?,
            group_lengths_reference: buf.read()?,
            group_lengths_increment: buf.read()?,
            group_lengths_last: buf.read()?,
            group_scaled_lengths_num_bits: buf.read()?,
        })
    }

    fn write(&self, buf: &mut BufferWriter) {
        buf.write(self.num_groups);
        buf.write(self.group_widths_reference);
        buf.write(self.group_widths_num_bits);
        buf.write(self.group_lengths_reference);
        buf.write(self.group_lengths_increment);
        buf.write(self.group_lengths_last);
        buf.write(self.group_scaled_lengths_num_bits);
    }
}

/// Values standing for missing data in the decoded field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissingSubstitutes {
    pub primary: f64,
    pub secondary: f64,
}

/// Template 5.2: Grid point data - complex packing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Data2 {
    pub simple: Data0,
    /// Group splitting method used (see Code Table 5.4)
    pub group_method: u8,
    /// Missing value management used (see Code Table 5.5)
    pub missing_value: u8,
    /// Primary missing value substitute
    pub missing_substitute_primary: u32,
    /// Secondary missing value substitute
    pub missing_substitute_secondary: u32,
    pub group_definition: GroupDefinition,
}

impl Data2 {
    pub fn missing_value_management(&self) -> Result<MissingValueManagement> {
        self.missing_value.try_into()
    }

    /// Substitutes as floating point values, following the type of original field values:
    /// integers are sign-magnitude, anything else is an IEEE single.
    pub fn missing_substitutes(&self) -> MissingSubstitutes {
        let convert = |raw: u32| match self.simple.values_type {
            1 => GribInt::<i32>::as_grib_int(&raw) as f64,
            _ => f32::from_bits(raw) as f64,
        };

        MissingSubstitutes {
            primary: convert(self.missing_substitute_primary),
            secondary: convert(self.missing_substitute_secondary),
        }
    }

    fn read(buf: &mut Buffer) -> Result<Self> {
        Ok(Self {
            simple: Data0::read(buf)?,
            group_method: buf.read()?,
            missing_value: buf.read()?,
            missing_substitute_primary: buf.read()?,
            missing_substitute_secondary: buf.read()?,
            group_definition: GroupDefinition::read(buf)?,
        })
    }

    fn write(&self, buf: &mut BufferWriter) {
        self.simple.write(buf);
        buf.write(self.group_method);
        buf.write(self.missing_value);
        buf.write(self.missing_substitute_primary);
        buf.write(self.missing_substitute_secondary);
        self.group_definition.write(buf);
    }
}

impl Definition for Data2 {
    const NUMBER: TemplateNumber = TemplateNumber::GRID_POINT_DATA_COMPLEX_PACKING;
    const LEN: usize = 36;

    fn decode(bytes: &[u8]) -> Result<Self> {
        Self::read(&mut Buffer::for_template(Self::NUMBER, Self::LEN, bytes)?)
    }

    fn encode(&self) -> Vec<u8> {
        let mut buf = BufferWriter::with_capacity(Self::LEN);
        self.write(&mut buf);
        buf.into_inner()
    }
}

/// Template 5.3: Grid point data - complex packing and spatial differencing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Data3 {
    pub complex: Data2,
    /// Order of spatial differencing (see Code Table 5.6)
    pub spatial_difference_order: u8,
    /// Number of octets required in the data section to specify extra descriptors
    /// needed for spatial differencing
    pub spatial_difference_size: u8,
}

impl Data3 {
    pub fn spatial_difference_order(&self) -> Result<SpatialDifferencingOrder> {
        self.spatial_difference_order.try_into()
    }

    /// Width in bits of each extra descriptor.
    pub fn extra_descriptor_bits(&self) -> Result<u32> {
        match self.spatial_difference_size {
            1..=8 => Ok(self.spatial_difference_size as u32 * 8),
            n => Err(GribError::InvalidHeaderField {
                field: "number of octets for extra descriptors",
                value: n as u64,
            }),
        }
    }
}

impl Definition for Data3 {
    const NUMBER: TemplateNumber = TemplateNumber::GRID_POINT_DATA_COMPLEX_PACKING_AND_SPATIAL_DIFFERENCING;
    const LEN: usize = 38;

    fn decode(bytes: &[u8]) -> Result<Self> {
        let mut buf = Buffer::for_template(Self::NUMBER, Self::LEN, bytes)?;

        Ok(Self {
            complex: Data2::read(&mut buf)?,
            spatial_difference_order: buf.read()?,
            spatial_difference_size: buf.read()?,
        })
    }

    fn encode(&self) -> Vec<u8> {
        let mut buf = BufferWriter::with_capacity(Self::LEN);
        self.complex.write(&mut buf);
        buf.write(self.spatial_difference_order);
        buf.write(self.spatial_difference_size);
        buf.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: [u8; 10] = [0x3f, 0x80, 0x00, 0x00, 0x80, 0x01, 0x00, 0x02, 0x08, 0x00];

    fn complex_bytes() -> Vec<u8> {
        let mut bytes = SIMPLE.to_vec();
        bytes.extend_from_slice(&[
            1, // group splitting method
            2, // missing value management
            0x7f, 0x7f, 0xff, 0xff, // primary substitute
            0x00, 0x00, 0x00, 0x00, // secondary substitute
            0x00, 0x00, 0x01, 0x02, // NG
            3, 4, // widths reference and bits
            0x00, 0x00, 0x00, 0x05, // lengths reference
            2, // lengths increment
            0x00, 0x00, 0x00, 0x09, // last group length
            6, // scaled lengths bits
        ]);
        bytes
    }

    #[test]
    fn decodes_simple_packing() {
        let data = Data0::decode(&SIMPLE).unwrap();

        assert_eq!(data.reference_value, 1.0);
        assert_eq!(data.binary_scale_factor(), -1);
        assert_eq!(data.decimal_scale_factor(), 2);
        assert_eq!(data.num_bits, 8);
        assert_eq!(data.values_type, 0);
        assert_eq!(data.encode(), SIMPLE);
    }

    #[test]
    fn negative_zero_scale_factor_round_trips() {
        let bytes = [0x00, 0x00, 0x00, 0x00, 0x80, 0x00, 0x80, 0x00, 0x00, 0x01];
        let data = Data0::decode(&bytes).unwrap();

        assert_eq!(data.binary_scale_factor(), 0);
        assert_eq!(data.decimal_scale_factor(), 0);
        assert_eq!(data.encode(), bytes);
    }

    #[test]
    fn new_encodes_sign_magnitude() {
        let data = Data0::new(1.0, -1, 2, 8);
        assert_eq!(data.encode(), SIMPLE);
    }

    #[test]
    fn decodes_complex_packing() {
        let bytes = complex_bytes();
        assert_eq!(bytes.len(), Data2::LEN);

        let data = Data2::decode(&bytes).unwrap();
        assert_eq!(data.group_method, 1);
        assert_eq!(data.missing_value_management().unwrap(), MissingValueManagement::PrimaryAndSecondary);
        assert_eq!(data.group_definition, GroupDefinition {
            num_groups: 258,
            group_widths_reference: 3,
            group_widths_num_bits: 4,
            group_lengths_reference: 5,
            group_lengths_increment: 2,
            group_lengths_last: 9,
            group_scaled_lengths_num_bits: 6,
        });
        assert_eq!(data.encode(), bytes);
    }

    #[test]
    fn decodes_spatial_differencing() {
        let mut bytes = complex_bytes();
        bytes.extend_from_slice(&[2, 2]);

        let data = Data3::decode(&bytes).unwrap();
        assert_eq!(data.spatial_difference_order().unwrap(), SpatialDifferencingOrder::Second);
        assert_eq!(data.extra_descriptor_bits().unwrap(), 16);
        assert_eq!(data.complex.group_definition.num_groups, 258);
        assert_eq!(data.encode(), bytes);
    }

    #[test]
    fn short_input_is_rejected() {
        let bytes = complex_bytes();
        match Data3::decode(&bytes) {
            Err(GribError::ShortRead { number, expected, available }) => {
                assert_eq!(number, Data3::NUMBER);
                assert_eq!(expected, 38);
                assert_eq!(available, 36);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let mut bytes = SIMPLE.to_vec();
        bytes.extend_from_slice(&[0xaa, 0xbb]);
        assert_eq!(Data0::decode(&bytes).unwrap().encode(), SIMPLE);
    }

    #[test]
    fn substitutes_follow_values_type() {
        let mut data = Data2::decode(&complex_bytes()).unwrap();
        assert_eq!(data.missing_substitutes().primary, f32::MAX as f64);

        data.simple = data.simple.with_values_type(1);
        data.missing_substitute_primary = 0x8000_0007;
        data.missing_substitute_secondary = 12;
        assert_eq!(data.missing_substitutes(), MissingSubstitutes { primary: -7.0, secondary: 12.0 });
    }

    #[test]
    fn invalid_code_table_entries() {
        let mut bytes = complex_bytes();
        bytes.extend_from_slice(&[3, 0]);
        let data = Data3::decode(&bytes).unwrap();

        assert!(matches!(data.spatial_difference_order(), Err(GribError::InvalidHeaderField { value: 3, .. })));
        assert!(matches!(data.extra_descriptor_bits(), Err(GribError::InvalidHeaderField { value: 0, .. })));

        let mut complex = data.complex;
        complex.missing_value = 7;
        assert!(complex.missing_value_management().is_err());
    }

    #[test]
    fn template_number_classification() {
        assert!(TemplateNumber(0).is_implemented());
        assert!(TemplateNumber(3).is_implemented());
        assert!(!TemplateNumber::GRID_POINT_DATA_PNG.is_implemented());
        assert!(!TemplateNumber::GRID_POINT_DATA_PNG.is_reserved());
        assert!(TemplateNumber(7).is_reserved());
        assert!(TemplateNumber(52).is_reserved());
        assert!(TemplateNumber(50000).is_local_use());
        assert!(!TemplateNumber(50000).is_reserved());
        assert!(TemplateNumber::MISSING.is_missing());
        assert_eq!(TemplateNumber(2).to_string(), "5.2 (Grid point data - complex packing)");
        assert_eq!(TemplateNumber(9).to_string(), "5.9 (reserved)");
    }
}
