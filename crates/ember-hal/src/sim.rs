//! Simulated radio
//!
//! A `WifiHost` that runs without hardware. It keeps just enough radio state
//! to answer queries plausibly, records every call in order, and can be told
//! to fail any kind of call. Used for desktop runs of VM images and as the
//! recording harness in tests.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;

use crate::host::{
    ApConfig, ApRecord, HostConfig, HostError, HostResult, Interface, RadioMode, StationConfig,
    WifiHost,
};

/// Kinds of host call, used to target injected failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    SetMode,
    SetConfig,
    Start,
    Connect,
    Disconnect,
    StationApInfo,
    MacAddress,
}

/// One recorded host call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    SetMode(RadioMode),
    SetConfig(HostConfig),
    Start,
    Connect,
    Disconnect,
    StationApInfo,
    MacAddress(Interface),
}

impl HostCall {
    /// Kind of this call
    pub fn kind(&self) -> CallKind {
        match self {
            HostCall::SetMode(_) => CallKind::SetMode,
            HostCall::SetConfig(_) => CallKind::SetConfig,
            HostCall::Start => CallKind::Start,
            HostCall::Connect => CallKind::Connect,
            HostCall::Disconnect => CallKind::Disconnect,
            HostCall::StationApInfo => CallKind::StationApInfo,
            HostCall::MacAddress(_) => CallKind::MacAddress,
        }
    }
}

struct SimState {
    mode: RadioMode,
    started: bool,
    associated: bool,
    auto_associate: bool,
    station: Option<StationConfig>,
    ap: Option<ApConfig>,
    mac: [u8; 6],
    failures: HashMap<CallKind, HostError>,
    calls: Vec<HostCall>,
}

/// In-process stand-in for the vendor radio driver.
pub struct SimulatedRadio {
    state: Mutex<SimState>,
    call_delay: Option<Duration>,
}

impl SimulatedRadio {
    /// Radio in station mode, stopped, with a fixed station MAC
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SimState {
                mode: RadioMode::Station,
                started: false,
                associated: false,
                auto_associate: true,
                station: None,
                ap: None,
                mac: [0x24, 0x0A, 0xC4, 0x12, 0x34, 0x56],
                failures: HashMap::new(),
                calls: Vec::new(),
            }),
            call_delay: None,
        }
    }

    /// Sleep for `delay` after every call (widens race windows)
    pub fn with_call_delay(mut self, delay: Duration) -> Self {
        self.call_delay = Some(delay);
        self
    }

    /// Report `mac` as the station address
    pub fn with_mac(self, mac: [u8; 6]) -> Self {
        self.state.lock().mac = mac;
        self
    }

    /// Make every call of `kind` fail with `err` until cleared
    pub fn fail(&self, kind: CallKind, err: HostError) {
        self.state.lock().failures.insert(kind, err);
    }

    /// Remove all injected failures
    pub fn clear_failures(&self) {
        self.state.lock().failures.clear();
    }

    /// Whether `connect` associates immediately (default: true)
    pub fn set_auto_associate(&self, enabled: bool) {
        self.state.lock().auto_associate = enabled;
    }

    /// Calls recorded so far, oldest first
    pub fn calls(&self) -> Vec<HostCall> {
        self.state.lock().calls.clone()
    }

    /// Drain the call log
    pub fn take_calls(&self) -> Vec<HostCall> {
        std::mem::take(&mut self.state.lock().calls)
    }

    /// Current radio mode
    pub fn mode(&self) -> RadioMode {
        self.state.lock().mode
    }

    /// Whether the radio has been started
    pub fn is_started(&self) -> bool {
        self.state.lock().started
    }

    /// Whether the station is associated
    pub fn is_associated(&self) -> bool {
        self.state.lock().associated
    }

    /// Last station configuration applied
    pub fn station_config(&self) -> Option<StationConfig> {
        self.state.lock().station.clone()
    }

    /// Last soft-AP configuration applied
    pub fn ap_config(&self) -> Option<ApConfig> {
        self.state.lock().ap.clone()
    }

    fn call<T>(&self, call: HostCall, op: impl FnOnce(&mut SimState) -> HostResult<T>) -> HostResult<T> {
        let result = {
            let mut state = self.state.lock();
            let kind = call.kind();
            state.calls.push(call);
            match state.failures.get(&kind) {
                Some(err) => Err(*err),
                None => op(&mut state),
            }
        };
        if let Some(delay) = self.call_delay {
            std::thread::sleep(delay);
        }
        result
    }
}

impl Default for SimulatedRadio {
    fn default() -> Self {
        Self::new()
    }
}

impl WifiHost for SimulatedRadio {
    fn set_mode(&self, mode: RadioMode) -> HostResult<()> {
        self.call(HostCall::SetMode(mode), |s| {
            if mode == RadioMode::AccessPoint {
                s.associated = false;
            }
            s.mode = mode;
            Ok(())
        })
    }

    fn set_config(&self, config: &HostConfig) -> HostResult<()> {
        self.call(HostCall::SetConfig(config.clone()), |s| match config {
            HostConfig::Station(sta) => {
                if s.mode == RadioMode::AccessPoint {
                    return Err(HostError::InvalidState);
                }
                s.station = Some(sta.clone());
                Ok(())
            }
            HostConfig::AccessPoint(ap) => {
                if s.mode == RadioMode::Station {
                    return Err(HostError::InvalidState);
                }
                if ap.channel == 0 || ap.channel > 14 {
                    return Err(HostError::InvalidArg);
                }
                s.ap = Some(ap.clone());
                Ok(())
            }
        })
    }

    fn start(&self) -> HostResult<()> {
        self.call(HostCall::Start, |s| {
            s.started = true;
            Ok(())
        })
    }

    fn connect(&self) -> HostResult<()> {
        self.call(HostCall::Connect, |s| {
            if !s.started {
                return Err(HostError::NotStarted);
            }
            if s.mode == RadioMode::AccessPoint || s.station.is_none() {
                return Err(HostError::InvalidState);
            }
            if s.auto_associate {
                s.associated = true;
            }
            Ok(())
        })
    }

    fn disconnect(&self) -> HostResult<()> {
        self.call(HostCall::Disconnect, |s| {
            if !s.started {
                return Err(HostError::NotStarted);
            }
            s.associated = false;
            Ok(())
        })
    }

    fn station_ap_info(&self) -> HostResult<ApRecord> {
        self.call(HostCall::StationApInfo, |s| {
            if !s.associated {
                return Err(HostError::NotConnected);
            }
            Ok(ApRecord {
                bssid: [0x02, 0x00, 0x00, 0x00, 0x00, 0x01],
                channel: 6,
                rssi: -48,
            })
        })
    }

    fn mac_address(&self, interface: Interface) -> HostResult<[u8; 6]> {
        self.call(HostCall::MacAddress(interface), |s| {
            let mut mac = s.mac;
            if interface == Interface::AccessPoint {
                mac[5] = mac[5].wrapping_add(1);
            }
            Ok(mac)
        })
    }
}
