//! Display options, read from `measurer.toml` next to the binary.
//!
//! Only presentation settings live here. Segments and results are never
//! written to disk.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// file name of the options file
pub const CONFIG_FILE_NAME: &str = "measurer.toml";

/// default overlay color of the reference line (RGBA: red)
pub const REFERENCE_COLOR: [u8; 4] = [230, 40, 40, 255];
/// default overlay color of the measure line (RGBA: blue)
pub const MEASURE_COLOR: [u8; 4] = [10, 118, 241, 255];
/// default overlay thickness in bitmap pixels
pub const LINE_THICKNESS: f32 = 3.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeasureOptions {
    pub reference_color: [u8; 4],
    pub measure_color: [u8; 4],
    /// overlay thickness in bitmap pixels
    pub line_thickness: f32,
    /// initial window size in logical points
    pub window_size: [f32; 2],
    /// appended to the computed length, e.g. "cm"
    pub unit: String,
    pub decimals: usize,
}

impl Default for MeasureOptions {
    fn default() -> Self {
        Self {
            reference_color: REFERENCE_COLOR,
            measure_color: MEASURE_COLOR,
            line_thickness: LINE_THICKNESS,
            window_size: [1024.0, 768.0],
            unit: String::new(),
            decimals: 2,
        }
    }
}

impl MeasureOptions {
    /// read options from `path`, falling back to defaults when the file is
    /// missing or malformed.
    pub fn load_from_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_toml(&content) {
                Ok(opts) => {
                    log::info!("options loaded from {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("options file is malformed, using defaults: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no options file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("options saved to {}", path.display());
        Ok(())
    }

    /// `measurer.toml` in the directory of the running executable.
    pub fn config_path() -> PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| PathBuf::from("measurer"))
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(CONFIG_FILE_NAME)
    }

    /// format a computed length with the configured precision and unit
    pub fn format_length(&self, value: f64) -> String {
        if self.unit.is_empty() {
            format!("{:.*}", self.decimals, value)
        } else {
            format!("{:.*} {}", self.decimals, value, self.unit)
        }
    }
}
