//! End-to-end dispatch: resolve call sites through the capability table and
//! run them against the process-wide bridge.

use std::sync::{Arc, OnceLock};

use ember_hal::host::RadioMode;
use ember_hal::sim::CallKind;
use ember_hal::wifi;
use ember_hal::{find_native_method, BridgeConfig, RadioState, SimulatedRadio, CAPABILITIES};
use ember_sdk::{ExceptionKind, ExecutionContext, Frame, NativeValue};

const CLASS: &[u8] = b"network/WiFi";
const SIG_CONNECT: &str = "(Ljava/lang/String;Ljava/lang/String;I)V";
const SIG_SOFT_AP: &str = "(Ljava/lang/String;Ljava/lang/String;III)V";

fn radio() -> &'static Arc<SimulatedRadio> {
    static RADIO: OnceLock<Arc<SimulatedRadio>> = OnceLock::new();
    RADIO.get_or_init(|| {
        let radio = Arc::new(SimulatedRadio::new().with_mac([0x24, 0x0A, 0xC4, 0, 0, 1]));
        ember_hal::init(radio.clone(), BridgeConfig::default()).unwrap();
        radio
    })
}

fn call(name: &str, signature: &str, frame: &mut Frame) -> bool {
    radio();
    let method = find_native_method(CLASS, name.as_bytes(), signature.as_bytes())
        .unwrap_or_else(|| panic!("{}{} not registered", name, signature));
    method.invoke(frame)
}

#[test]
fn test_resolution_is_stable() {
    for (name, sig) in [
        ("isSupported", "()Z"),
        ("connect", SIG_CONNECT),
        ("isConnected", "()Z"),
        ("getMacAddress", "()[B"),
        ("disconnect", "()V"),
        ("softAP", SIG_SOFT_AP),
        ("softAPdisconnect", "()V"),
    ] {
        let first = find_native_method(CLASS, name.as_bytes(), sig.as_bytes()).unwrap();
        let second = find_native_method(CLASS, name.as_bytes(), sig.as_bytes()).unwrap();
        assert!(std::ptr::eq(first, second), "{} resolved twice differently", name);
        assert_eq!(first.name, name);
    }
}

#[test]
fn test_unknown_call_sites() {
    assert!(find_native_method(b"network/Bluetooth", b"isSupported", b"()Z").is_none());
    assert!(find_native_method(CLASS, b"scan", b"()V").is_none());
    assert!(find_native_method(CLASS, b"connect", b"(Ljava/lang/String;I)V").is_none());
    assert!(find_native_method(CLASS, b"isConnected", b"()I").is_none());
    assert!(find_native_method(b"", b"", b"").is_none());
}

#[test]
fn test_table_is_well_formed() {
    assert!(CAPABILITIES.check_unique().is_ok());
    assert!(CAPABILITIES
        .classes()
        .iter()
        .any(|class| class.identity == "network/WiFi"));
}

#[test]
fn test_second_init_is_rejected() {
    radio();
    let other = Arc::new(SimulatedRadio::new());
    assert!(ember_hal::init(other, BridgeConfig::default()).is_err());
    assert!(wifi::bridge().is_some());
}

/// Single sequential scenario; the bridge is shared by every test here, so
/// all state-dependent assertions live in this one test.
#[test]
fn test_station_and_soft_ap_scenario() {
    let radio = radio();
    let bridge = wifi::bridge().unwrap();
    let mut frame = Frame::new();

    assert!(call("isSupported", "()Z", &mut frame));
    assert_eq!(frame.pop(), Some(NativeValue::bool(true)));

    // Invalid auth mode never reaches the host
    radio.take_calls();
    frame.push_str_arg(Some("home")).unwrap();
    frame.push_str_arg(Some("pw")).unwrap();
    frame.push_int(99);
    assert!(!call("connect", SIG_CONNECT, &mut frame));
    assert_eq!(
        frame.top_exception(),
        Some((ExceptionKind::Error, "Authentication mode is invalid".to_string()))
    );
    frame.pop();
    assert!(radio
        .take_calls()
        .iter()
        .all(|c| c.kind() != CallKind::SetConfig));

    // Station connect
    frame.push_str_arg(Some("home")).unwrap();
    frame.push_str_arg(Some("pw")).unwrap();
    frame.push_int(3);
    assert!(call("connect", SIG_CONNECT, &mut frame));
    assert!(frame.stack().is_empty());

    assert!(call("isConnected", "()Z", &mut frame));
    assert_eq!(frame.pop(), Some(NativeValue::bool(true)));
    assert_eq!(bridge.state(), RadioState::StationConnected);

    assert!(call("getMacAddress", "()[B", &mut frame));
    let mac = frame.pop().and_then(|v| v.as_object()).unwrap();
    assert_eq!(frame.array(mac).unwrap(), &[0x24, 0x0A, 0xC4, 0, 0, 1]);

    // Soft-AP alongside the station
    frame.push_str_arg(Some("ember")).unwrap();
    frame.push_str_arg(Some("ap-password")).unwrap();
    frame.push_int(3);
    frame.push_int(11);
    frame.push_int(2);
    assert!(call("softAP", SIG_SOFT_AP, &mut frame));
    assert!(frame.stack().is_empty());
    assert_eq!(radio.mode(), RadioMode::ApSta);
    assert_eq!(bridge.state(), RadioState::ApStaMixed);

    assert!(call("softAPdisconnect", "()V", &mut frame));
    assert_eq!(radio.mode(), RadioMode::Station);

    assert!(call("disconnect", "()V", &mut frame));
    assert!(call("isConnected", "()Z", &mut frame));
    assert_eq!(frame.pop(), Some(NativeValue::bool(false)));
    assert!(frame.stack().is_empty());
}
