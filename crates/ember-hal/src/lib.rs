//! Ember HAL - hardware capability modules
//!
//! Native method implementations that bridge Ember bytecode to board
//! peripherals. The wireless networking module (`network/WiFi`) is the one
//! capability shipped here; `registry` holds the table the interpreter
//! resolves native call sites against.
//!
//! The radio subsystem must be brought up once with [`init`] before bytecode
//! touches it. Until then `connect` and `softAP` throw, queries report
//! nothing and the fire-and-forget calls do nothing.

pub mod config;
pub mod host;
pub mod registry;
pub mod sim;
pub mod wifi;

use std::sync::Arc;

pub use config::{BridgeConfig, ConfigError};
pub use host::{HostError, HostResult, WifiHost};
pub use registry::{find_native_method, CAPABILITIES};
pub use sim::SimulatedRadio;
pub use wifi::{RadioState, WifiBridge, WIFI_CLASS};

/// Bring up the process-wide WiFi bridge over `host`.
///
/// Only the first call takes effect; later calls get their bridge back.
pub fn init(host: Arc<dyn WifiHost>, config: BridgeConfig) -> Result<(), WifiBridge> {
    let result = wifi::install(WifiBridge::new(host, config));
    match &result {
        Ok(()) => log::info!("wifi bridge installed"),
        Err(_) => log::warn!("wifi bridge already installed, ignoring second init"),
    }
    result
}
