use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::grib::sections::sect5::TemplateNumber;
use crate::grib::template::{self, Template};
use crate::grib::{GribError, Result};

/// Persisted form of a [`Template`]: its number, the number of packed values and the
/// header record as lowercase hex.
///
/// ```json
/// {"number":0,"content":"3f800000000000000800","vals":3}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    pub number: TemplateNumber,
    pub content: String,
    pub vals: usize,
}

impl From<&Template> for TemplateDescriptor {
    fn from(template: &Template) -> Self {
        Self {
            number: template.number(),
            content: hex::encode(template.header_bytes()),
            vals: template.num_vals(),
        }
    }
}

impl From<Template> for TemplateDescriptor {
    fn from(template: Template) -> Self {
        (&template).into()
    }
}

impl TryFrom<&TemplateDescriptor> for Template {
    type Error = GribError;

    fn try_from(descriptor: &TemplateDescriptor) -> Result<Self> {
        let number = descriptor.number;
        template::family(number)?;

        let bytes = hex::decode(&descriptor.content).map_err(|e| GribError::MalformedDescriptor {
            number,
            reason: e.to_string(),
        })?;

        Template::from_header_bytes(number, &bytes, descriptor.vals).map_err(|e| match e {
            GribError::ShortRead { expected, available, .. } => GribError::MalformedDescriptor {
                number,
                reason: format!("{} header bytes, {} expected", available, expected),
            },
            e => e,
        })
    }
}

impl TryFrom<TemplateDescriptor> for Template {
    type Error = GribError;

    fn try_from(descriptor: TemplateDescriptor) -> Result<Self> {
        Template::try_from(&descriptor)
    }
}

impl Template {
    /// Reads a JSON descriptor file and rebuilds the template it describes.
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let descriptor: TemplateDescriptor = serde_json::from_str(&fs::read_to_string(path)?)?;
        Ok(Template::try_from(descriptor)?)
    }
}
