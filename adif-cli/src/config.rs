//! Configuration loading and parsing

use adif_codec::RegistryConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Main application configuration (loaded from a TOML file)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub cabrillo: CabrilloConfig,
}

/// Settings for Cabrillo output
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CabrilloConfig {
    /// Contest name for the CONTEST: header line
    pub contest: Option<String>,
    /// Station callsign, used when a QSO carries neither OPERATOR nor STATION_CALLSIGN
    pub callsign: Option<String>,
    /// CATEGORY-* header lines, e.g. `operator = "SINGLE-OP"`
    #[serde(default)]
    pub categories: BTreeMap<String, String>,
    /// Extra header lines written verbatim as `KEY: value`
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// ADIF fields forming the sent exchange
    #[serde(default = "default_sent")]
    pub sent: Vec<String>,
    /// ADIF fields forming the received exchange
    #[serde(default = "default_rcvd")]
    pub rcvd: Vec<String>,
    #[serde(default = "default_created_by")]
    pub created_by: String,
}

fn default_sent() -> Vec<String> {
    vec!["rst_sent".to_string()]
}

fn default_rcvd() -> Vec<String> {
    vec!["rst_rcvd".to_string()]
}

fn default_created_by() -> String {
    format!("adif-cli {}", env!("CARGO_PKG_VERSION"))
}

impl Default for CabrilloConfig {
    fn default() -> Self {
        Self {
            contest: None,
            callsign: None,
            categories: BTreeMap::new(),
            headers: BTreeMap::new(),
            sent: default_sent(),
            rcvd: default_rcvd(),
            created_by: default_created_by(),
        }
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}

/// Split a comma-separated field list from the command line
pub fn parse_field_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|f| f.trim().to_ascii_lowercase())
        .filter(|f| !f.is_empty())
        .collect()
}
