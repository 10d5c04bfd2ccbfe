//! Configuration settings
//!
//! Settings are loaded from a TOML file (conventionally `cellbridge.toml`):
//!
//! ```toml
//! [encoder]
//! main_sheet = "Main Sheet"
//!
//! [decoder]
//! date_fallback_format = "%Y-%m-%dT%H:%M:%S%z"
//!
//! [reader]
//! sheet_lookup = "relationships"
//!
//! [logging]
//! filter = "cellbridge_ooxml=debug"
//! ```
//!
//! Every section and key is optional.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CellbridgeError, Result};

/// Conventional settings file name
pub const CONFIG_FILE_NAME: &str = "cellbridge.toml";

/// Top-level settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub encoder: EncoderSettings,
    pub decoder: DecoderSettings,
    pub reader: ReaderSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| CellbridgeError::Config(e.to_string()))
    }

    /// Load settings from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| CellbridgeError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&contents)
    }
}

/// Structured-value encoder settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderSettings {
    /// Name of the worksheet holding top-level scalar fields
    pub main_sheet: String,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            main_sheet: "Main Sheet".to_string(),
        }
    }
}

/// Structured-value decoder settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderSettings {
    /// Name of the worksheet holding top-level scalar fields
    pub main_sheet: String,
    /// `chrono` format tried after RFC 3339 when decoding timestamps
    pub date_fallback_format: String,
}

impl Default for DecoderSettings {
    fn default() -> Self {
        Self {
            main_sheet: EncoderSettings::default().main_sheet,
            date_fallback_format: "%Y-%m-%dT%H:%M:%S%z".to_string(),
        }
    }
}

/// How declared sheets are matched to worksheet parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SheetLookup {
    /// Nth declared sheet reads `xl/worksheets/sheetN.xml`
    #[default]
    Positional,
    /// Follow each sheet's `r:id` through `xl/_rels/workbook.xml.rels`
    Relationships,
}

/// Package reader settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReaderSettings {
    pub sheet_lookup: SheetLookup,
}

/// Log filter used by the command-line tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}
