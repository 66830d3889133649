//! Wireless networking capability (`network/WiFi`)
//!
//! Bytecode reaches the radio through the native methods of `network/WiFi`.
//! Each handler pops its arguments, validates them, runs the host calls and
//! leaves exactly one result or one exception on the stack.
//!
//! `connect` and `softAP` change the shared radio configuration in several
//! steps, so they run under the bridge's configure lock. Everything else is
//! a single host call and runs without it.

use std::sync::{Arc, OnceLock};

use ember_sdk::{
    complete, throw, AbiResult, Arguments, ElementType, ExecutionContext, NativeClass,
    NativeError, NativeMethod, NativeValue, ObjectRef,
};
use parking_lot::Mutex;

use crate::config::BridgeConfig;
use crate::host::{
    ApConfig, AuthMode, HostConfig, HostResult, Interface, PmfConfig, RadioMode, StationConfig,
    WifiHost, PASSWORD_CAPACITY, SSID_CAPACITY,
};

/// Class identity of the capability
pub const CLASS_NAME: &str = "network/WiFi";

const SIG_IS_SUPPORTED: &str = "()Z";
const SIG_CONNECT: &str = "(Ljava/lang/String;Ljava/lang/String;I)V";
const SIG_IS_CONNECTED: &str = "()Z";
const SIG_GET_MAC_ADDRESS: &str = "()[B";
const SIG_DISCONNECT: &str = "()V";
const SIG_SOFT_AP: &str = "(Ljava/lang/String;Ljava/lang/String;III)V";
const SIG_SOFT_AP_DISCONNECT: &str = "()V";

const MAC_LEN: u32 = 6;

// ============================================================================
// Radio state view
// ============================================================================

/// The bridge's view of the radio, updated as its own operations succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioState {
    /// Nothing configured through the bridge yet
    Uninitialized,
    /// Station settings applied
    StationConfigured,
    /// Association requested, not yet confirmed
    StationConnecting,
    /// Association confirmed by a query
    StationConnected,
    /// Soft-AP settings applied
    ApConfigured,
    /// Radio running as access point only
    ApStarted,
    /// Radio running as station and access point
    ApStaMixed,
}

/// Something that moves the state view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioEvent {
    /// Station configuration accepted by the host
    StationConfigured,
    /// Host accepted a connect request
    ConnectRequested,
    /// A query found the station associated
    Associated,
    /// A query found the station not associated, or a disconnect went through
    AssociationLost,
    /// Soft-AP configuration accepted by the host
    ApConfigured,
    /// Radio started in the given mode
    Started(RadioMode),
    /// Radio switched back to station only
    StationOnly,
}

impl RadioState {
    /// State after `event`
    pub fn next(self, event: RadioEvent) -> RadioState {
        use RadioState::*;
        match (self, event) {
            (_, RadioEvent::StationConfigured) => StationConfigured,
            (ApStaMixed, RadioEvent::ConnectRequested) => ApStaMixed,
            (_, RadioEvent::ConnectRequested) => StationConnecting,
            (ApStaMixed, RadioEvent::Associated) => ApStaMixed,
            (_, RadioEvent::Associated) => StationConnected,
            (StationConnecting | StationConnected, RadioEvent::AssociationLost) => StationConfigured,
            (_, RadioEvent::ApConfigured) => ApConfigured,
            (ApConfigured, RadioEvent::Started(RadioMode::AccessPoint)) => ApStarted,
            (ApConfigured, RadioEvent::Started(RadioMode::ApSta)) => ApStaMixed,
            (ApConfigured | ApStarted | ApStaMixed, RadioEvent::StationOnly) => StationConfigured,
            (state, _) => state,
        }
    }
}

// ============================================================================
// Argument validation
// ============================================================================

/// Validated ssid/password/mode triple, copied into host-sized buffers
#[derive(Debug)]
struct Credentials {
    ssid: [u8; SSID_CAPACITY],
    ssid_len: usize,
    password: [u8; PASSWORD_CAPACITY],
    auth_mode: AuthMode,
}

fn validate_credentials(
    ctx: &dyn ExecutionContext,
    ssid: Option<ObjectRef>,
    password: Option<ObjectRef>,
    mode: u32,
) -> AbiResult<Credentials> {
    let auth_mode = AuthMode::from_index(mode)
        .ok_or_else(|| NativeError::InvalidArgument("Authentication mode is invalid".to_string()))?;

    let ssid = ssid.ok_or(NativeError::NullReference("ssid"))?;
    let password = match password {
        Some(p) => Some(p),
        None if auth_mode == AuthMode::Open => None,
        None => return Err(NativeError::NullReference("password")),
    };

    let ssid_bytes = ctx.string_bytes(ssid)?;
    let password_bytes: &[u8] = match password {
        Some(p) => ctx.string_bytes(p)?,
        None => &[],
    };
    if ssid_bytes.len() > SSID_CAPACITY {
        return Err(NativeError::invalid_value("ssid"));
    }
    if password_bytes.len() > PASSWORD_CAPACITY {
        return Err(NativeError::invalid_value("password"));
    }

    let mut creds = Credentials {
        ssid: [0; SSID_CAPACITY],
        ssid_len: ssid_bytes.len(),
        password: [0; PASSWORD_CAPACITY],
        auth_mode,
    };
    creds.ssid[..ssid_bytes.len()].copy_from_slice(ssid_bytes);
    creds.password[..password_bytes.len()].copy_from_slice(password_bytes);
    Ok(creds)
}

fn byte_arg(value: i32, param: &str) -> AbiResult<u8> {
    u8::try_from(value).map_err(|_| NativeError::invalid_value(param))
}

// ============================================================================
// Bridge
// ============================================================================

/// WiFi bridge: owns the host handle, the configure lock and the state view.
pub struct WifiBridge {
    host: Arc<dyn WifiHost>,
    config: BridgeConfig,
    configure_lock: Mutex<()>,
    state: Mutex<RadioState>,
}

impl WifiBridge {
    /// Create a bridge over a host SDK
    pub fn new(host: Arc<dyn WifiHost>, config: BridgeConfig) -> Self {
        Self {
            host,
            config,
            configure_lock: Mutex::new(()),
            state: Mutex::new(RadioState::Uninitialized),
        }
    }

    /// Current state view
    pub fn state(&self) -> RadioState {
        *self.state.lock()
    }

    /// Active configuration
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    fn advance(&self, event: RadioEvent) {
        let mut state = self.state.lock();
        let next = state.next(event);
        if next != *state {
            log::debug!("wifi state {:?} -> {:?}", *state, next);
            *state = next;
        }
    }

    /// Run a multi-step host sequence under the configure lock.
    ///
    /// Stops at the first failing step. Every host failure becomes
    /// `OperationFailed`, whichever step it came from.
    fn configure(
        &self,
        operation: &str,
        steps: impl FnOnce(&dyn WifiHost) -> HostResult<()>,
    ) -> AbiResult<()> {
        let timeout = self.config.lock_timeout();
        let _guard = self.configure_lock.try_lock_for(timeout).ok_or_else(|| {
            log::warn!("wifi {}: configure lock not acquired within {:?}", operation, timeout);
            NativeError::OperationFailed
        })?;
        log::debug!("wifi {}: configure lock acquired", operation);

        steps(&*self.host).map_err(|err| {
            log::warn!("wifi {}: host reported {} ({:#x})", operation, err, err.code());
            NativeError::OperationFailed
        })?;
        log::info!("wifi {}: configuration applied", operation);
        Ok(())
    }

    /// `isSupported()Z`
    pub fn is_supported(&self, ctx: &mut dyn ExecutionContext) -> bool {
        ctx.push_bool(true);
        true
    }

    /// `connect(Ljava/lang/String;Ljava/lang/String;I)V`
    pub fn connect(&self, ctx: &mut dyn ExecutionContext) -> bool {
        let result = self.connect_station(ctx).map(|()| None);
        complete(ctx, result)
    }

    fn connect_station(&self, ctx: &mut dyn ExecutionContext) -> AbiResult<()> {
        let args = Arguments::pop(ctx, SIG_CONNECT)?;
        let creds = validate_credentials(ctx, args.object(0)?, args.object(1)?, args.uint(2)?)?;

        let config = HostConfig::Station(StationConfig {
            ssid: creds.ssid,
            password: creds.password,
            auth_threshold: creds.auth_mode,
            pmf: PmfConfig {
                capable: self.config.station_pmf_capable,
                required: self.config.station_pmf_required,
            },
        });

        self.configure("connect", |host| {
            host.set_config(&config)?;
            self.advance(RadioEvent::StationConfigured);
            host.start()?;
            host.connect()?;
            self.advance(RadioEvent::ConnectRequested);
            Ok(())
        })
    }

    /// `isConnected()Z`
    pub fn is_connected(&self, ctx: &mut dyn ExecutionContext) -> bool {
        let associated = self.host.station_ap_info().is_ok();
        self.advance(if associated {
            RadioEvent::Associated
        } else {
            RadioEvent::AssociationLost
        });
        ctx.push_bool(associated);
        true
    }

    /// `getMacAddress()[B`, pushing null instead of throwing
    pub fn get_mac_address(&self, ctx: &mut dyn ExecutionContext) -> bool {
        let array = match self.host.mac_address(Interface::Station) {
            Ok(mac) => match new_byte_array(ctx, &mac) {
                Ok(array) => Some(array),
                Err(err) => {
                    log::error!("wifi getMacAddress: cannot allocate result: {}", err);
                    None
                }
            },
            Err(err) => {
                log::debug!("wifi getMacAddress: host reported {}", err);
                None
            }
        };
        ctx.push_object(array);
        true
    }

    /// `disconnect()V` (fire-and-forget)
    pub fn disconnect(&self, _ctx: &mut dyn ExecutionContext) -> bool {
        match self.host.disconnect() {
            Ok(()) => self.advance(RadioEvent::AssociationLost),
            Err(err) => log::debug!("wifi disconnect: host reported {} (ignored)", err),
        }
        true
    }

    /// `softAP(Ljava/lang/String;Ljava/lang/String;III)V`
    pub fn soft_ap(&self, ctx: &mut dyn ExecutionContext) -> bool {
        let result = self.start_soft_ap(ctx).map(|()| None);
        complete(ctx, result)
    }

    fn start_soft_ap(&self, ctx: &mut dyn ExecutionContext) -> AbiResult<()> {
        let args = Arguments::pop(ctx, SIG_SOFT_AP)?;
        let creds = validate_credentials(ctx, args.object(0)?, args.object(1)?, args.uint(2)?)?;
        let channel = byte_arg(args.int(3)?, "channel")?;
        let max_connection = byte_arg(args.int(4)?, "maxConnections")?;

        let config = HostConfig::AccessPoint(ApConfig {
            ssid: creds.ssid,
            ssid_len: creds.ssid_len as u8,
            password: creds.password,
            channel,
            max_connection,
            auth_mode: creds.auth_mode,
            pmf: PmfConfig {
                capable: false,
                required: self.config.ap_pmf_required,
            },
        });

        self.configure("softAP", |host| {
            host.set_mode(RadioMode::ApSta)?;
            host.set_config(&config)?;
            self.advance(RadioEvent::ApConfigured);
            host.start()?;
            self.advance(RadioEvent::Started(RadioMode::ApSta));
            Ok(())
        })
    }

    /// `softAPdisconnect()V` (fire-and-forget)
    pub fn soft_ap_disconnect(&self, _ctx: &mut dyn ExecutionContext) -> bool {
        match self.host.set_mode(RadioMode::Station) {
            Ok(()) => self.advance(RadioEvent::StationOnly),
            Err(err) => log::debug!("wifi softAPdisconnect: host reported {} (ignored)", err),
        }
        true
    }
}

impl std::fmt::Debug for WifiBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WifiBridge")
            .field("state", &self.state())
            .field("config", &self.config)
            .finish()
    }
}

fn new_byte_array(ctx: &mut dyn ExecutionContext, bytes: &[u8; MAC_LEN as usize]) -> AbiResult<ObjectRef> {
    let array = ctx.new_array(MAC_LEN, ElementType::Byte, 1)?;
    ctx.array_bytes_mut(array)?.copy_from_slice(bytes);
    Ok(array)
}

// ============================================================================
// Process-wide bridge
// ============================================================================

static BRIDGE: OnceLock<WifiBridge> = OnceLock::new();

/// Install the process-wide bridge. Fails (returning it) if one is installed.
pub fn install(bridge: WifiBridge) -> Result<(), WifiBridge> {
    BRIDGE.set(bridge)
}

/// The installed bridge, if any
pub fn bridge() -> Option<&'static WifiBridge> {
    BRIDGE.get()
}

/// Consume the arguments of a call that cannot run, then throw.
fn reject_uninitialized(ctx: &mut dyn ExecutionContext, descriptor: &str) -> bool {
    if let Err(err) = Arguments::pop(ctx, descriptor) {
        log::debug!("wifi: discarding arguments failed: {}", err);
    }
    throw(ctx, &NativeError::Uninitialized("wifi"))
}

// ============================================================================
// Native method table
// ============================================================================

fn native_is_supported(ctx: &mut dyn ExecutionContext) -> bool {
    ctx.push_bool(true);
    true
}

fn native_connect(ctx: &mut dyn ExecutionContext) -> bool {
    match bridge() {
        Some(b) => b.connect(ctx),
        None => reject_uninitialized(ctx, SIG_CONNECT),
    }
}

fn native_is_connected(ctx: &mut dyn ExecutionContext) -> bool {
    match bridge() {
        Some(b) => b.is_connected(ctx),
        None => {
            ctx.push_bool(false);
            true
        }
    }
}

fn native_get_mac_address(ctx: &mut dyn ExecutionContext) -> bool {
    match bridge() {
        Some(b) => b.get_mac_address(ctx),
        None => {
            ctx.push(NativeValue::null());
            true
        }
    }
}

fn native_disconnect(ctx: &mut dyn ExecutionContext) -> bool {
    bridge().map_or(true, |b| b.disconnect(ctx))
}

fn native_soft_ap(ctx: &mut dyn ExecutionContext) -> bool {
    match bridge() {
        Some(b) => b.soft_ap(ctx),
        None => reject_uninitialized(ctx, SIG_SOFT_AP),
    }
}

fn native_soft_ap_disconnect(ctx: &mut dyn ExecutionContext) -> bool {
    bridge().map_or(true, |b| b.soft_ap_disconnect(ctx))
}

static METHODS: [NativeMethod; 7] = [
    NativeMethod::new("isSupported", SIG_IS_SUPPORTED, native_is_supported),
    NativeMethod::new("connect", SIG_CONNECT, native_connect),
    NativeMethod::new("isConnected", SIG_IS_CONNECTED, native_is_connected),
    NativeMethod::new("getMacAddress", SIG_GET_MAC_ADDRESS, native_get_mac_address),
    NativeMethod::new("disconnect", SIG_DISCONNECT, native_disconnect),
    NativeMethod::new("softAP", SIG_SOFT_AP, native_soft_ap),
    NativeMethod::new("softAPdisconnect", SIG_SOFT_AP_DISCONNECT, native_soft_ap_disconnect),
];

/// `network/WiFi` native class
pub static WIFI_CLASS: NativeClass = NativeClass::new(CLASS_NAME, &METHODS);
