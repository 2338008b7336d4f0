use std::io;

use crate::grib::bits::BitRead;
use crate::grib::sections::sect5::GroupDefinition;
use crate::grib::sections::sect7::field_width;
use crate::grib::{GribError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Group {
    pub(crate) reference: u64,
    pub(crate) width: u32,
    pub(crate) length: usize,
}

/// Reads the group references, widths and lengths that precede the packed values.
///
/// Each of the three lists holds NG fields and ends on an octet boundary. The last scaled
/// length is read but replaced by the true length of the last group.
///
/// More groups than values fail before any list is read; the reported count is then the
/// least those groups could hold.
pub(crate) fn decode<R: BitRead + ?Sized>(
    reader: &mut R,
    num_bits: u32,
    group_definition: &GroupDefinition,
    num_vals: usize,
) -> Result<Vec<Group>> {
    let num_groups = group_definition.num_groups as usize;
    // groups are never empty, so NG > num_vals cannot add up
    if num_groups > num_vals {
        return Err(GribError::StructuralMismatch {
            expected: num_vals,
            actual: num_groups,
        });
    }

    let widths_num_bits = field_width(group_definition.group_widths_num_bits.into(), "number of bits for group widths")?;
    let lengths_num_bits = field_width(
        group_definition.group_scaled_lengths_num_bits.into(),
        "number of bits for scaled group lengths",
    )?;

    let references = read_octets_aligned(reader, num_bits, num_groups)?;
    let widths = read_octets_aligned(reader, widths_num_bits, num_groups)?;
    let lengths = read_octets_aligned(reader, lengths_num_bits, num_groups)?;

    let groups = references
        .into_iter()
        .zip(widths)
        .zip(lengths)
        .enumerate()
        .map(|(i, ((reference, width), length))| -> Result<Group> {
            let width = u64::from(group_definition.group_widths_reference).saturating_add(width);
            let length = if i + 1 == num_groups {
                u64::from(group_definition.group_lengths_last)
            } else {
                u64::from(group_definition.group_lengths_increment)
                    .saturating_mul(length)
                    .saturating_add(u64::from(group_definition.group_lengths_reference))
            };

            Ok(Group {
                reference,
                width: field_width(width, "group width")?,
                length: usize::try_from(length).unwrap_or(usize::MAX),
            })
        })
        .collect::<Result<Vec<Group>>>()?;

    let actual = groups.iter().fold(0usize, |sum, group| sum.saturating_add(group.length));
    if actual != num_vals {
        return Err(GribError::StructuralMismatch {
            expected: num_vals,
            actual,
        });
    }

    debug!("{} groups for {} values", num_groups, num_vals);
    for (i, group) in groups.iter().enumerate() {
        trace!("group {} : reference {}, width {}, length {}", i, group.reference, group.width, group.length);
    }

    Ok(groups)
}

fn read_octets_aligned<R: BitRead + ?Sized>(reader: &mut R, num_bits: u32, count: usize) -> Result<Vec<u64>> {
    let values = (0..count)
        .map(|_| reader.read_bits(num_bits))
        .collect::<io::Result<Vec<u64>>>()?;
    reader.byte_align();

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grib::bits::SliceBitReader;

    fn definition(num_groups: u32) -> GroupDefinition {
        GroupDefinition {
            num_groups,
            group_widths_reference: 1,
            group_widths_num_bits: 4,
            group_lengths_reference: 2,
            group_lengths_increment: 3,
            group_lengths_last: 4,
            group_scaled_lengths_num_bits: 4,
        }
    }

    // references 5, 9 (4 bits) | widths 1, 0 (4 bits) | scaled lengths 1, 15 (4 bits)
    const DATA: [u8; 3] = [0x59, 0x10, 0x1f];

    #[test]
    fn decodes_groups() {
        let mut reader = SliceBitReader::new(&DATA);
        let groups = decode(&mut reader, 4, &definition(2), 9).unwrap();

        assert_eq!(groups, vec![
            Group { reference: 5, width: 2, length: 5 },
            Group { reference: 9, width: 1, length: 4 },
        ]);
        assert_eq!(reader.position(), 24);
    }

    #[test]
    fn lists_end_on_octet_boundaries() {
        // references 5, 1 on 3 bits each, padded to one octet
        let data = [0b1010_0100, 0x10, 0x1f];
        let mut reader = SliceBitReader::new(&data);
        let groups = decode(&mut reader, 3, &definition(2), 9).unwrap();

        assert_eq!(groups[0].reference, 5);
        assert_eq!(groups[1].reference, 1);
        assert_eq!(reader.position(), 24);
    }

    #[test]
    fn lengths_must_cover_all_values() {
        let mut reader = SliceBitReader::new(&DATA);
        let err = decode(&mut reader, 4, &definition(2), 10).unwrap_err();

        assert!(matches!(err, GribError::StructuralMismatch { expected: 10, actual: 9 }));
    }

    #[test]
    fn no_groups_means_no_values() {
        let mut reader = SliceBitReader::new(&[]);
        assert!(decode(&mut reader, 4, &definition(0), 0).unwrap().is_empty());

        let mut reader = SliceBitReader::new(&[]);
        assert!(matches!(
            decode(&mut reader, 4, &definition(0), 1),
            Err(GribError::StructuralMismatch { expected: 1, actual: 0 })
        ));
    }

    #[test]
    fn more_groups_than_values_fails_before_reading() {
        let zero_widths = GroupDefinition {
            num_groups: u32::MAX,
            group_widths_reference: 0,
            group_widths_num_bits: 0,
            group_lengths_reference: 0,
            group_lengths_increment: 0,
            group_lengths_last: 5,
            group_scaled_lengths_num_bits: 0,
        };

        let mut reader = SliceBitReader::new(&[]);
        match decode(&mut reader, 0, &zero_widths, 5) {
            Err(GribError::StructuralMismatch { expected, actual }) => {
                assert_eq!(expected, 5);
                assert_eq!(actual, u32::MAX as usize);
            }
            other => panic!("unexpected {:?}", other),
        }

        let mut reader = SliceBitReader::new(&DATA);
        assert!(matches!(
            decode(&mut reader, 4, &definition(2), 1),
            Err(GribError::StructuralMismatch { expected: 1, actual: 2 })
        ));
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn truncated_group_lists() {
        let mut reader = SliceBitReader::new(&DATA[..2]);
        assert!(decode(&mut reader, 4, &definition(2), 9).unwrap_err().is_short_read());
    }

    #[test]
    fn oversized_group_width_is_rejected() {
        let mut definition = definition(2);
        definition.group_widths_reference = 64;

        let mut reader = SliceBitReader::new(&DATA);
        assert!(matches!(
            decode(&mut reader, 4, &definition, 9),
            Err(GribError::InvalidHeaderField { field: "group width", value: 65 })
        ));
    }
}
