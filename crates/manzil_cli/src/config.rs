//! Optional TOML settings file.
//!
//! ```toml
//! [scan]
//! tolerance_deg = 0.008
//! max_span_days = 31
//! timeout_secs = 300
//! memory_mb = 1000
//! validate_sequence = true
//!
//! [[station]]
//! threshold_deg = 24.1167
//! id = 1
//! description = "Al-Sharatain"
//! ```
//!
//! A non-empty `[[station]]` list replaces the built-in table.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::TimeDelta;
use manzil_search::ScanConfig;
use manzil_stations::{Station, StationTable};
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanSection {
    pub tolerance_deg: Option<f64>,
    pub max_span_days: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub memory_mb: Option<f64>,
    pub validate_sequence: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub scan: ScanSection,
    #[serde(default)]
    pub station: Vec<Station>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from `path` when given, otherwise an empty config.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }

    /// Overlay the `[scan]` keys onto `config`.
    pub fn apply(&self, config: &mut ScanConfig) {
        let s = &self.scan;
        if let Some(v) = s.tolerance_deg {
            config.tolerance_deg = v;
        }
        if let Some(v) = s.max_span_days {
            config.max_span = TimeDelta::days(i64::from(v));
        }
        if let Some(v) = s.timeout_secs {
            config.timeout = Duration::from_secs(v);
        }
        if let Some(v) = s.memory_mb {
            config.memory_ceiling_mb = v;
        }
        if let Some(v) = s.validate_sequence {
            config.validate_sequence = v;
        }
    }

    /// Station table from the file, or the built-in one.
    pub fn station_table(&self) -> Result<StationTable> {
        if self.station.is_empty() {
            return Ok(StationTable::hamade());
        }
        StationTable::new(self.station.clone()).context("invalid [[station]] table")
    }
}
