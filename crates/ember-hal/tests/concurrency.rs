//! Configure-lock tests: concurrent configure sequences never interleave at
//! the host, and a caller that cannot get the lock in time fails cleanly.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use ember_hal::host::{HostConfig, RadioMode};
use ember_hal::sim::{CallKind, HostCall};
use ember_hal::{BridgeConfig, SimulatedRadio, WifiBridge};
use ember_sdk::{ExceptionKind, ExecutionContext, Frame};

fn bridge_with(radio: &Arc<SimulatedRadio>, lock_timeout_ms: u64) -> Arc<WifiBridge> {
    let config = BridgeConfig {
        lock_timeout_ms,
        ..BridgeConfig::default()
    };
    Arc::new(WifiBridge::new(radio.clone(), config))
}

fn run_connect(bridge: &WifiBridge, ssid: &str) -> (bool, Frame) {
    let mut frame = Frame::new();
    frame.push_str_arg(Some(ssid)).unwrap();
    frame.push_str_arg(Some("password")).unwrap();
    frame.push_int(3);
    let ok = bridge.connect(&mut frame);
    (ok, frame)
}

fn run_soft_ap(bridge: &WifiBridge, ssid: &str) -> (bool, Frame) {
    let mut frame = Frame::new();
    frame.push_str_arg(Some(ssid)).unwrap();
    frame.push_str_arg(Some("password")).unwrap();
    frame.push_int(3);
    frame.push_int(6);
    frame.push_int(4);
    let ok = bridge.soft_ap(&mut frame);
    (ok, frame)
}

/// Split the call log into configure sequences, failing on any interleaving.
fn sequences(calls: &[HostCall]) -> Vec<&'static str> {
    let mut out = Vec::new();
    let mut rest = calls;
    while !rest.is_empty() {
        match rest {
            [HostCall::SetConfig(HostConfig::Station(_)), HostCall::Start, HostCall::Connect, tail @ ..] => {
                out.push("connect");
                rest = tail;
            }
            [HostCall::SetMode(RadioMode::ApSta), HostCall::SetConfig(HostConfig::AccessPoint(_)), HostCall::Start, tail @ ..] => {
                out.push("softAP");
                rest = tail;
            }
            _ => panic!("interleaved host calls: {:?}", rest),
        }
    }
    out
}

#[test]
fn test_concurrent_connects_do_not_interleave() {
    let radio = Arc::new(SimulatedRadio::new().with_call_delay(Duration::from_millis(2)));
    let bridge = bridge_with(&radio, 10_000);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let bridge = bridge.clone();
            thread::spawn(move || {
                let (ok, frame) = run_connect(&bridge, &format!("net-{}", i));
                assert!(ok);
                assert!(frame.stack().is_empty());
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let calls = radio.calls();
    assert_eq!(calls.len(), 24);
    assert_eq!(sequences(&calls), vec!["connect"; 8]);
}

#[test]
fn test_mixed_configure_operations_do_not_interleave() {
    let radio = Arc::new(SimulatedRadio::new().with_call_delay(Duration::from_millis(2)));
    let bridge = bridge_with(&radio, 10_000);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let bridge = bridge.clone();
            thread::spawn(move || {
                let name = format!("node-{}", i);
                let (ok, _) = if i % 2 == 0 {
                    run_connect(&bridge, &name)
                } else {
                    run_soft_ap(&bridge, &name)
                };
                assert!(ok);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let calls = radio.calls();
    let seqs = sequences(&calls);
    assert_eq!(seqs.len(), 8);
    assert_eq!(seqs.iter().filter(|s| **s == "connect").count(), 4);
    assert_eq!(seqs.iter().filter(|s| **s == "softAP").count(), 4);
}

#[test]
fn test_lock_timeout_fails_without_host_calls() {
    let radio = Arc::new(SimulatedRadio::new().with_call_delay(Duration::from_millis(200)));
    let bridge = bridge_with(&radio, 10);

    let holder = {
        let bridge = bridge.clone();
        thread::spawn(move || run_connect(&bridge, "first").0)
    };

    // Wait until the first sequence is inside the lock
    let deadline = Instant::now() + Duration::from_secs(5);
    while radio.calls().is_empty() {
        assert!(Instant::now() < deadline, "first connect never reached the host");
        thread::sleep(Duration::from_millis(1));
    }

    let (ok, frame) = run_connect(&bridge, "second");
    assert!(!ok);
    assert_eq!(frame.stack().len(), 1);
    assert_eq!(
        frame.top_exception(),
        Some((
            ExceptionKind::Error,
            "An error occurred while performing the operation".to_string()
        ))
    );

    assert!(holder.join().unwrap());
    let kinds: Vec<CallKind> = radio.calls().iter().map(HostCall::kind).collect();
    assert_eq!(
        kinds,
        vec![CallKind::SetConfig, CallKind::Start, CallKind::Connect]
    );
}

#[test]
fn test_queries_do_not_wait_for_configure_lock() {
    let radio = Arc::new(SimulatedRadio::new().with_call_delay(Duration::from_millis(100)));
    let bridge = bridge_with(&radio, 10_000);

    let holder = {
        let bridge = bridge.clone();
        thread::spawn(move || run_connect(&bridge, "slow").0)
    };
    let deadline = Instant::now() + Duration::from_secs(5);
    while radio.calls().is_empty() {
        assert!(Instant::now() < deadline, "connect never reached the host");
        thread::sleep(Duration::from_millis(1));
    }

    let mut frame = Frame::new();
    assert!(bridge.is_supported(&mut frame));
    assert!(bridge.get_mac_address(&mut frame));
    assert_eq!(frame.stack().len(), 2);
    assert!(frame.pop().and_then(|v| v.as_object()).is_some());

    assert!(holder.join().unwrap());
}
