//! Capability table for the Ember board image
//!
//! Lists every native class the image ships, in lookup order, and resolves
//! call sites against them.

use ember_sdk::{CapabilityTable, NativeMethod};

use crate::wifi::WIFI_CLASS;

/// All capability modules, in lookup order
pub static CAPABILITIES: CapabilityTable = CapabilityTable::new(&[&WIFI_CLASS]);

/// Resolve a native call site to its handler entry.
///
/// Returns `None` when no native code backs the method, whether the class
/// or only the method is unknown.
pub fn find_native_method(
    class: &[u8],
    name: &[u8],
    signature: &[u8],
) -> Option<&'static NativeMethod> {
    CAPABILITIES.resolve(class, name, signature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_no_duplicates() {
        assert!(CAPABILITIES.check_unique().is_ok());
    }

    #[test]
    fn test_wifi_is_registered() {
        assert_eq!(CAPABILITIES.classes().len(), 1);
        assert!(find_native_method(b"network/WiFi", b"isSupported", b"()Z").is_some());
    }
}
