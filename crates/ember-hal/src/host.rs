//! Host wireless SDK interface
//!
//! `WifiHost` is the boundary to the vendor radio driver. Every call maps to
//! one SDK entry point and reports one status code from `HostError` on
//! failure. The bridge treats every error the same way; the codes exist for
//! logging and for the simulator.

use thiserror::Error;

/// Length of the SSID field in host configuration records
pub const SSID_CAPACITY: usize = 32;

/// Length of the password field in host configuration records
pub const PASSWORD_CAPACITY: usize = 64;

/// Host SDK status codes other than success
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("generic failure")]
    Fail,
    #[error("out of memory")]
    NoMem,
    #[error("invalid argument")]
    InvalidArg,
    #[error("invalid state")]
    InvalidState,
    #[error("radio driver not initialized")]
    NotInit,
    #[error("radio not started")]
    NotStarted,
    #[error("operation timed out")]
    Timeout,
    #[error("station is not associated")]
    NotConnected,
}

impl HostError {
    /// Numeric status code as reported by the SDK
    pub const fn code(self) -> i32 {
        match self {
            HostError::Fail => -1,
            HostError::NoMem => 0x101,
            HostError::InvalidArg => 0x102,
            HostError::InvalidState => 0x103,
            HostError::NotInit => 0x3001,
            HostError::NotStarted => 0x3002,
            HostError::Timeout => 0x3008,
            HostError::NotConnected => 0x300F,
        }
    }

    /// Map a raw status code back; `None` for success (0)
    pub const fn from_code(code: i32) -> Option<Result<(), HostError>> {
        match code {
            0 => Some(Ok(())),
            -1 => Some(Err(HostError::Fail)),
            0x101 => Some(Err(HostError::NoMem)),
            0x102 => Some(Err(HostError::InvalidArg)),
            0x103 => Some(Err(HostError::InvalidState)),
            0x3001 => Some(Err(HostError::NotInit)),
            0x3002 => Some(Err(HostError::NotStarted)),
            0x3008 => Some(Err(HostError::Timeout)),
            0x300F => Some(Err(HostError::NotConnected)),
            _ => None,
        }
    }
}

/// Result of a host SDK call
pub type HostResult<T> = Result<T, HostError>;

/// Radio operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioMode {
    /// Station (client) only
    Station,
    /// Access point only
    AccessPoint,
    /// Station and access point at once
    ApSta,
}

/// Network interface a call targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interface {
    /// Station interface
    Station,
    /// Soft-AP interface
    AccessPoint,
}

/// Authentication modes in the order bytecode selects them by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AuthMode {
    /// No authentication
    Open = 0,
    /// WEP
    Wep = 1,
    /// WPA-PSK
    WpaPsk = 2,
    /// WPA2-PSK
    Wpa2Psk = 3,
    /// WPA/WPA2-PSK
    WpaWpa2Psk = 4,
    /// Enterprise (802.1X)
    Enterprise = 5,
    /// WPA2-Enterprise
    Wpa2Enterprise = 6,
    /// WPA3-PSK (SAE)
    Wpa3Psk = 7,
    /// WPA2/WPA3-PSK
    Wpa2Wpa3Psk = 8,
    /// WAPI-PSK
    WapiPsk = 9,
    /// Opportunistic wireless encryption
    Owe = 10,
    /// WPA3-Enterprise 192-bit
    Wpa3Ent192 = 11,
    /// WPA3 extended-key PSK
    Wpa3ExtPsk = 12,
    /// WPA3 extended-key PSK, mixed mode
    Wpa3ExtPskMixedMode = 13,
    /// Device provisioning protocol
    Dpp = 14,
}

impl AuthMode {
    /// Every mode, indexed by its selector value
    pub const ALL: [AuthMode; 15] = [
        AuthMode::Open,
        AuthMode::Wep,
        AuthMode::WpaPsk,
        AuthMode::Wpa2Psk,
        AuthMode::WpaWpa2Psk,
        AuthMode::Enterprise,
        AuthMode::Wpa2Enterprise,
        AuthMode::Wpa3Psk,
        AuthMode::Wpa2Wpa3Psk,
        AuthMode::WapiPsk,
        AuthMode::Owe,
        AuthMode::Wpa3Ent192,
        AuthMode::Wpa3ExtPsk,
        AuthMode::Wpa3ExtPskMixedMode,
        AuthMode::Dpp,
    ];

    /// Number of valid selector values
    pub const COUNT: u32 = Self::ALL.len() as u32;

    /// Mode for a bytecode selector, `None` when out of range
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

/// Protected management frame settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PmfConfig {
    /// Advertise PMF support
    pub capable: bool,
    /// Refuse peers without PMF
    pub required: bool,
}

/// Station configuration record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationConfig {
    /// SSID, zero padded
    pub ssid: [u8; SSID_CAPACITY],
    /// Password, zero padded
    pub password: [u8; PASSWORD_CAPACITY],
    /// Weakest authentication mode accepted
    pub auth_threshold: AuthMode,
    /// PMF settings
    pub pmf: PmfConfig,
}

/// Soft-AP configuration record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApConfig {
    /// SSID, zero padded
    pub ssid: [u8; SSID_CAPACITY],
    /// Number of meaningful SSID bytes
    pub ssid_len: u8,
    /// Password, zero padded
    pub password: [u8; PASSWORD_CAPACITY],
    /// Channel number
    pub channel: u8,
    /// Maximum simultaneous stations
    pub max_connection: u8,
    /// Authentication mode offered
    pub auth_mode: AuthMode,
    /// PMF settings
    pub pmf: PmfConfig,
}

/// Configuration applied to one interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostConfig {
    /// Station interface settings
    Station(StationConfig),
    /// Soft-AP interface settings
    AccessPoint(ApConfig),
}

impl HostConfig {
    /// Interface the record belongs to
    pub fn interface(&self) -> Interface {
        match self {
            HostConfig::Station(_) => Interface::Station,
            HostConfig::AccessPoint(_) => Interface::AccessPoint,
        }
    }
}

/// Association details of the station interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApRecord {
    /// Access point hardware address
    pub bssid: [u8; 6],
    /// Primary channel
    pub channel: u8,
    /// Signal strength in dBm
    pub rssi: i8,
}

/// Vendor wireless SDK.
///
/// Implementations must be callable from any thread. The SDK is assumed to
/// serialize its own internal state; callers only serialize multi-step
/// configure sequences.
pub trait WifiHost: Send + Sync {
    /// Switch the radio mode
    fn set_mode(&self, mode: RadioMode) -> HostResult<()>;

    /// Apply an interface configuration
    fn set_config(&self, config: &HostConfig) -> HostResult<()>;

    /// Start the radio with the current mode and configuration
    fn start(&self) -> HostResult<()>;

    /// Begin associating the station with the configured network
    fn connect(&self) -> HostResult<()>;

    /// Drop the station association
    fn disconnect(&self) -> HostResult<()>;

    /// Details of the current association, `Err` when not associated
    fn station_ap_info(&self) -> HostResult<ApRecord>;

    /// Hardware address of an interface
    fn mac_address(&self, interface: Interface) -> HostResult<[u8; 6]>;
}
