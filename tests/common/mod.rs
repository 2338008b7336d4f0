//! Helpers shared by the integration tests: a bit packer for data sections and the
//! header definitions the tests decode with.

#![allow(dead_code)]

use bitstream_io::{BigEndian, BitWrite, BitWriter};

use grib2_drt::grib::sections::sect5::{Data0, Data2, Data3, GroupDefinition, MissingValueManagement};

/// Writes fields MSB first, the way section 7 lays them out.
pub struct Packer {
    writer: BitWriter<Vec<u8>, BigEndian>,
}

impl Packer {
    pub fn new() -> Self {
        Self {
            writer: BitWriter::endian(Vec::new(), BigEndian),
        }
    }

    pub fn bits(&mut self, width: u32, value: u64) -> &mut Self {
        if width > 0 {
            self.writer.write(width, value).unwrap();
        }
        self
    }

    pub fn all(&mut self, width: u32, values: &[u64]) -> &mut Self {
        for value in values {
            self.bits(width, *value);
        }
        self
    }

    /// Sign bit followed by the magnitude.
    pub fn signed(&mut self, width: u32, value: i64) -> &mut Self {
        let sign = if value < 0 { 1u64 << (width - 1) } else { 0 };
        self.bits(width, sign | value.unsigned_abs())
    }

    pub fn align(&mut self) -> &mut Self {
        self.writer.byte_align().unwrap();
        self
    }

    pub fn finish(&mut self) -> Vec<u8> {
        self.align();
        std::mem::replace(&mut self.writer, BitWriter::endian(Vec::new(), BigEndian)).into_writer()
    }
}

pub fn complex(simple: Data0, missing: MissingValueManagement, group_definition: GroupDefinition) -> Data2 {
    Data2 {
        simple,
        group_method: 1,
        missing_value: missing.into(),
        missing_substitute_primary: 9999f32.to_bits(),
        missing_substitute_secondary: (-9999f32).to_bits(),
        group_definition,
    }
}

/// Two groups: references 1 and 10, widths 2 and 0, lengths 3 and 4.
pub fn two_groups(mut simple: Data0, missing: MissingValueManagement) -> (Data2, Vec<u8>) {
    simple.num_bits = 4;
    let data = complex(simple, missing, GroupDefinition {
        num_groups: 2,
        group_widths_reference: 0,
        group_widths_num_bits: 4,
        group_lengths_reference: 0,
        group_lengths_increment: 1,
        group_lengths_last: 4,
        group_scaled_lengths_num_bits: 4,
    });

    let stream = Packer::new()
        .all(4, &[1, 10])
        .align()
        .all(4, &[2, 0])
        .align()
        .all(4, &[3, 0])
        .align()
        .all(2, &[0, 1, 3])
        .finish();

    (data, stream)
}

/// First order differencing of [10, 12, 11, 15] with minimum -1, in a single group of
/// width 3 and extra descriptors on two octets.
pub fn first_order(mut simple: Data0) -> (Data3, Vec<u8>) {
    simple.num_bits = 3;
    let data = Data3 {
        complex: complex(simple, MissingValueManagement::None, GroupDefinition {
            num_groups: 1,
            group_widths_reference: 0,
            group_widths_num_bits: 4,
            group_lengths_reference: 0,
            group_lengths_increment: 1,
            group_lengths_last: 4,
            group_scaled_lengths_num_bits: 4,
        }),
        spatial_difference_order: 1,
        spatial_difference_size: 2,
    };

    let stream = Packer::new()
        .signed(16, 10)
        .signed(16, -1)
        .bits(3, 0)
        .align()
        .bits(4, 3)
        .align()
        .bits(4, 0)
        .align()
        .all(3, &[0, 3, 0, 5])
        .finish();

    (data, stream)
}
