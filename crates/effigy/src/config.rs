//! Configuration loading and types

use std::path::{Path, PathBuf};
use std::time::Duration;

use effigy_client::DEFAULT_ENDPOINT;
use effigy_core::UnsourcedFields;
use effigy_inventory::osquery::OSQUERYI;
use serde::{Deserialize, Serialize};

/// Top-level configuration for the effigy extension
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Extension process settings
    #[serde(default)]
    pub extension: ExtensionConfig,
    /// Advisory service settings
    #[serde(default)]
    pub advisory: AdvisoryConfig,
    /// Values for request fields not read from osquery
    pub placeholders: Option<UnsourcedFields>,
}

/// Extension process settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// osqueryi binary used to read the inventory tables
    #[serde(default = "default_osqueryi")]
    pub osqueryi: String,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            osqueryi: default_osqueryi(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_osqueryi() -> String {
    OSQUERYI.to_string()
}

/// Advisory service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryConfig {
    /// Advisory endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// HTTP request timeout in seconds; unset leaves reqwest's default
    pub request_timeout_secs: Option<u64>,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_secs: None,
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// First config file found in the default locations
    pub fn find() -> Option<PathBuf> {
        let paths = [
            Some(PathBuf::from("effigy.toml")),
            Some(PathBuf::from("/etc/effigy/effigy.toml")),
            dirs::config_dir().map(|p| p.join("effigy/effigy.toml")),
        ];

        paths.into_iter().flatten().find(|path| path.exists())
    }
}

/// Parse a duration such as `5s`, `500ms`, `2m` or a bare number of seconds
///
/// osquery passes `--timeout` to extensions as bare seconds.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    let split = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (number, unit) = input.split_at(split);

    let value: u64 = number
        .parse()
        .map_err(|_| format!("invalid duration: {input:?}"))?;

    let seconds = |scale: u64| {
        value
            .checked_mul(scale)
            .map(Duration::from_secs)
            .ok_or_else(|| format!("duration out of range: {input:?}"))
    };

    match unit {
        "" | "s" => Ok(Duration::from_secs(value)),
        "ms" => Ok(Duration::from_millis(value)),
        "m" => seconds(60),
        "h" => seconds(3600),
        _ => Err(format!("invalid duration unit {unit:?} in {input:?}")),
    }
}
