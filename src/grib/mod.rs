pub mod bits;
pub mod descriptor;
pub mod sections;
pub mod template;
mod utils;

use crate::grib::sections::sect5::TemplateNumber;

pub use crate::grib::bits::{BitRead, SliceBitReader};
pub use crate::grib::descriptor::TemplateDescriptor;
pub use crate::grib::template::{read_template, Template};

pub type Result<T, E = GribError> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum GribError {
    #[error("data template not implemented: {0}")]
    UnimplementedTemplate(TemplateNumber),

    #[error("ShortRead({number}): {expected} bytes expected, {available} available")]
    ShortRead {
        number: TemplateNumber,
        expected: usize,
        available: usize,
    },

    #[error("IoError({0})")]
    Io(#[from] std::io::Error),

    #[error("StructuralMismatch: groups hold {actual} values, {expected} expected")]
    StructuralMismatch { expected: usize, actual: usize },

    #[error("MalformedDescriptor({number}): {reason}")]
    MalformedDescriptor { number: TemplateNumber, reason: String },

    #[error("InvalidHeaderField: {field} = {value}")]
    InvalidHeaderField { field: &'static str, value: u64 },
}

impl GribError {
    /// Whether the input ended before the template could be fully decoded.
    pub fn is_short_read(&self) -> bool {
        match self {
            GribError::ShortRead { .. } => true,
            GribError::Io(e) => e.kind() == std::io::ErrorKind::UnexpectedEof,
            _ => false,
        }
    }
}
