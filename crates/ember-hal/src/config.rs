//! Bridge configuration, loaded from `[wifi]` in the board TOML file.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Board configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid board configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration for the WiFi bridge
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// Longest wait for the configure lock in ms (default: 1000)
    pub lock_timeout_ms: u64,
    /// Station advertises protected management frames (default: true)
    pub station_pmf_capable: bool,
    /// Station requires protected management frames (default: false)
    pub station_pmf_required: bool,
    /// Soft-AP requires protected management frames (default: false)
    pub ap_pmf_required: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            lock_timeout_ms: 1000,
            station_pmf_capable: true,
            station_pmf_required: false,
            ap_pmf_required: false,
        }
    }
}

#[derive(Deserialize)]
struct BoardFile {
    #[serde(default)]
    wifi: Option<BridgeConfig>,
}

impl BridgeConfig {
    /// Read the `[wifi]` table of a board file. Other tables are ignored; a
    /// missing `[wifi]` table yields the defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let board: BoardFile = toml::from_str(source)?;
        Ok(board.wifi.unwrap_or_default())
    }

    /// Configure lock timeout as a `Duration`
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}
