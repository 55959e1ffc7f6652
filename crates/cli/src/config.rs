//! Configuration file handling

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use media_core::PipelineConfig;
use serde::Deserialize;

use crate::logging::LoggingSection;

/// Contents of the TOML configuration file. Every section is optional.
///
/// ```toml
/// [pipeline]
/// reorder_window = 64
/// sample_rate_mismatch = "skip"
///
/// [logging]
/// level = "debug"
///
/// [payload_types]
/// 96 = "L16"
/// 97 = "PCMA"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub logging: LoggingSection,
    /// Dynamic payload type number to codec name
    pub payload_types: BTreeMap<String, String>,
}

impl AppConfig {
    /// Load and parse a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Payload type bindings from the file, with numeric keys
    pub fn payload_type_bindings(&self) -> Result<Vec<(u8, String)>> {
        self.payload_types
            .iter()
            .map(|(pt, name)| Ok((parse_payload_type(pt)?, name.clone())))
            .collect()
    }
}

/// Parse a `PT=NAME` binding as given on the command line
pub fn parse_binding(binding: &str) -> Result<(u8, String)> {
    let Some((pt, name)) = binding.split_once('=') else {
        bail!("Expected PT=NAME, got '{}'", binding);
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("Missing codec name in '{}'", binding);
    }
    Ok((parse_payload_type(pt)?, name.to_string()))
}

fn parse_payload_type(text: &str) -> Result<u8> {
    let pt: u8 = text
        .trim()
        .parse()
        .with_context(|| format!("Invalid payload type '{}'", text))?;
    if pt > 127 {
        bail!("Payload type {} is outside the 7-bit RTP range", pt);
    }
    Ok(pt)
}
