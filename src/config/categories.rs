//! Category and application configuration loading from config.toml
//!
//! The plastic categories defined in config.toml seed the `plastic_categories`
//! table on startup. Report layout and audit-log retention settings live in the
//! same file. Every section is optional; a missing file yields the defaults.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Categories seeded when config.toml does not list any.
pub const DEFAULT_CATEGORIES: [&str; 11] = [
    "PPS KOTOR",
    "PP KOTOR",
    "PP NILON",
    "PP TERASI",
    "PP SABLON",
    "PP ROTI",
    "METALIS",
    "METALIS ROLL",
    "SLITING",
    "LIT MINERAL",
    "LIT RASA",
];

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Plastic categories to seed
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryConfig>,
    /// Printable report settings
    #[serde(default)]
    pub report: ReportConfig,
    /// Deletion log settings
    #[serde(default)]
    pub audit: AuditConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            report: ReportConfig::default(),
            audit: AuditConfig::default(),
        }
    }
}

/// Configuration for a single plastic category
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CategoryConfig {
    /// Display name of the category
    pub name: String,
}

/// Printable report settings
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct ReportConfig {
    /// Number of text lines that fit on one page before a page break
    #[serde(default = "default_lines_per_page")]
    pub lines_per_page: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            lines_per_page: default_lines_per_page(),
        }
    }
}

/// Deletion log settings
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct AuditConfig {
    /// Entries older than this many days are purged
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
        }
    }
}

fn default_categories() -> Vec<CategoryConfig> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|name| CategoryConfig {
            name: (*name).to_string(),
        })
        .collect()
}

const fn default_lines_per_page() -> usize {
    40
}

const fn default_retention_days() -> i64 {
    crate::core::audit::LOG_RETENTION_DAYS
}

/// Loads the application configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from `path`, falling back to the defaults when the file is absent.
///
/// A file that exists but cannot be parsed is still an error.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    if path_ref.exists() {
        tracing::debug!("Loading configuration from {:?}", path_ref);
        load_config(path_ref)
    } else {
        tracing::info!("No configuration at {:?}, using defaults", path_ref);
        Ok(AppConfig::default())
    }
}
