//! Tagged operand stack slot
//!
//! Every value that crosses the interpreter/native boundary is one of the
//! variants below. Object references are opaque handles into the VM heap;
//! the native side never sees a raw pointer.
//!
//! ```text
//! Int(i32)     int, boolean, byte, char, short
//! Long(i64)    long
//! Float(f32)   float
//! Double(f64)  double
//! Ref(handle)  any non-null object (string, array, throwable, ...)
//! Null         the null reference
//! ```

use std::num::NonZeroU32;

/// Opaque handle to an object living on the VM heap.
///
/// The handle is only meaningful to the `ExecutionContext` that produced it.
/// Handles are never zero so `Option<ObjectRef>` stays the size of a `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ObjectRef(NonZeroU32);

impl ObjectRef {
    /// Build a handle from its raw index. Returns `None` for zero.
    #[inline]
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match NonZeroU32::new(raw) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Raw handle index
    #[inline]
    pub const fn to_raw(self) -> u32 {
        self.0.get()
    }
}

/// A single operand stack slot.
#[derive(Clone, Copy, PartialEq)]
pub enum NativeValue {
    /// 32-bit integer (also carries boolean, byte, char and short)
    Int(i32),
    /// 64-bit integer
    Long(i64),
    /// 32-bit float
    Float(f32),
    /// 64-bit float
    Double(f64),
    /// Non-null object reference
    Ref(ObjectRef),
    /// Null reference
    Null,
}

impl NativeValue {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a null value
    #[inline]
    pub const fn null() -> Self {
        Self::Null
    }

    /// Create a boolean value (booleans are ints on the operand stack)
    #[inline]
    pub const fn bool(b: bool) -> Self {
        Self::Int(b as i32)
    }

    /// Create an i32 value
    #[inline]
    pub const fn int(i: i32) -> Self {
        Self::Int(i)
    }

    /// Create an i64 value
    #[inline]
    pub const fn long(i: i64) -> Self {
        Self::Long(i)
    }

    /// Create a reference value, mapping `None` to null
    #[inline]
    pub const fn object(obj: Option<ObjectRef>) -> Self {
        match obj {
            Some(r) => Self::Ref(r),
            None => Self::Null,
        }
    }

    // ========================================================================
    // Type checks
    // ========================================================================

    /// Check if value is null
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check if value occupies a reference slot (object or null)
    #[inline]
    pub const fn is_reference(&self) -> bool {
        matches!(self, Self::Ref(_) | Self::Null)
    }

    // ========================================================================
    // Extractors
    // ========================================================================

    /// Extract i32 value
    #[inline]
    pub const fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Extract boolean value (any non-zero int is true)
    #[inline]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Int(i) => Some(*i != 0),
            _ => None,
        }
    }

    /// Extract i64 value
    #[inline]
    pub const fn as_long(&self) -> Option<i64> {
        match self {
            Self::Long(i) => Some(*i),
            _ => None,
        }
    }

    /// Extract f32 value
    #[inline]
    pub const fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Extract f64 value
    #[inline]
    pub const fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(f) => Some(*f),
            _ => None,
        }
    }

    /// Extract a non-null object reference
    #[inline]
    pub const fn as_object(&self) -> Option<ObjectRef> {
        match self {
            Self::Ref(r) => Some(*r),
            _ => None,
        }
    }

    /// Get type name for debugging
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Long(_) => "long",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::Ref(_) => "reference",
            Self::Null => "null",
        }
    }
}

impl Default for NativeValue {
    fn default() -> Self {
        Self::null()
    }
}

impl std::fmt::Debug for NativeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(i) => write!(f, "NativeValue::Int({})", i),
            Self::Long(i) => write!(f, "NativeValue::Long({})", i),
            Self::Float(v) => write!(f, "NativeValue::Float({})", v),
            Self::Double(v) => write!(f, "NativeValue::Double({})", v),
            Self::Ref(r) => write!(f, "NativeValue::Ref(#{})", r.to_raw()),
            Self::Null => write!(f, "NativeValue::Null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null() {
        let v = NativeValue::null();
        assert!(v.is_null());
        assert!(v.is_reference());
        assert_eq!(v.as_object(), None);
        assert_eq!(v.as_int(), None);
    }

    #[test]
    fn test_bool_is_int_slot() {
        assert_eq!(NativeValue::bool(true), NativeValue::Int(1));
        assert_eq!(NativeValue::bool(false).as_bool(), Some(false));
        assert_eq!(NativeValue::int(7).as_bool(), Some(true));
    }

    #[test]
    fn test_object_handle() {
        assert!(ObjectRef::from_raw(0).is_none());
        let r = ObjectRef::from_raw(5).unwrap();
        assert_eq!(r.to_raw(), 5);

        let v = NativeValue::object(Some(r));
        assert!(v.is_reference());
        assert!(!v.is_null());
        assert_eq!(v.as_object(), Some(r));
        assert_eq!(NativeValue::object(None), NativeValue::Null);
    }

    #[test]
    fn test_type_discrimination() {
        let i = NativeValue::int(1);
        let l = NativeValue::long(1);
        let f = NativeValue::Float(1.0);
        let d = NativeValue::Double(1.0);

        assert_eq!(i.as_long(), None);
        assert_eq!(l.as_int(), None);
        assert_eq!(f.as_double(), None);
        assert_eq!(d.as_float(), None);
        assert!(!i.is_reference());
        assert_eq!(l.type_name(), "long");
    }

    #[test]
    fn test_debug_format() {
        let v = NativeValue::int(42);
        assert!(format!("{:?}", v).contains("42"));
        let r = NativeValue::object(ObjectRef::from_raw(3));
        assert_eq!(format!("{:?}", r), "NativeValue::Ref(#3)");
    }
}
