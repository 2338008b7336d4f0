//! Decoding of GRIB2 Data Representation Templates (section 5) and of the packed values
//! they describe (section 7).
//!
//! ```
//! use grib2_drt::grib::{read_template, SliceBitReader};
//! use grib2_drt::grib::sections::sect5::TemplateNumber;
//!
//! // Template 5.0 header (R = 1.0, E = 0, D = 0, 8 bits) followed by three packed values
//! let input = [0x3f, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x08, 0x00, 0x00, 0x0a, 0x14];
//! let mut reader = SliceBitReader::new(&input);
//!
//! let template = read_template(&mut reader, TemplateNumber(0), 3).unwrap();
//! assert_eq!(template.read_all_data(&mut reader).unwrap(), vec![1.0, 11.0, 21.0]);
//! ```

#[macro_use]
extern crate log;

pub mod config;
pub mod error;
pub mod grib;
