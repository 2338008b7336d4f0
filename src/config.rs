use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// How decoded values are printed
    pub output: OutputFormat,
    /// Number of decimals when printing one value per line
    pub precision: Option<usize>,
    /// Log filter used when `RUST_LOG` is not set
    pub log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: OutputFormat::Lines,
            precision: None,
            log: String::from("error,grib2_drt=info"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputFormat {
    Lines,
    Json,
}

impl Config {
    /// Loads the YAML configuration at `path`, writing the defaults there if it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(confy::load_path(path)?)
    }

    pub fn render(&self, values: &[f64]) -> Result<String> {
        match self.output {
            OutputFormat::Json => Ok(serde_json::to_string(values)?),
            OutputFormat::Lines => Ok(values
                .iter()
                .map(|v| match self.precision {
                    Some(precision) => format!("{:.*}", precision, v),
                    None => v.to_string(),
                })
                .collect::<Vec<String>>()
                .join("\n")),
        }
    }
}
