//! Error types for the Ember native ABI
//!
//! Every failure a native handler can hit is a `NativeError`. Handlers never
//! return these to the interpreter directly: `exception::throw` turns them
//! into a VM exception object staged on the operand stack.

use crate::descriptor::DescriptorError;

/// Result type for ABI calls
pub type AbiResult<T> = Result<T, NativeError>;

/// Kind of VM exception a `NativeError` is thrown as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionKind {
    /// Generic error exception
    Error,
    /// Null pointer exception
    NullPointer,
}

/// Native handler error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NativeError {
    /// Argument out of range or too long
    #[error("{0}")]
    InvalidArgument(String),

    /// Mandatory reference argument was null
    #[error("{0} cannot be null object")]
    NullReference(&'static str),

    /// Host service reported a non-success status
    #[error("An error occurred while performing the operation")]
    OperationFailed,

    /// Capability used before its subsystem was brought up
    #[error("{0} subsystem is not initialized")]
    Uninitialized(&'static str),

    /// Fewer operands on the stack than the descriptor declares
    #[error("Operand stack underflow")]
    StackUnderflow,

    /// Operand tag does not match the declared slot kind
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected slot kind
        expected: &'static str,
        /// Actual value tag
        got: &'static str,
    },

    /// Malformed type descriptor
    #[error("Bad descriptor: {0}")]
    BadDescriptor(#[from] DescriptorError),

    /// Heap allocation failed
    #[error("Out of memory")]
    OutOfMemory,

    /// Handle does not name an object of the expected shape
    #[error("Invalid object handle #{0}")]
    InvalidHandle(u32),
}

impl NativeError {
    /// Exception class this error is thrown as
    pub fn exception_kind(&self) -> ExceptionKind {
        match self {
            NativeError::NullReference(_) => ExceptionKind::NullPointer,
            _ => ExceptionKind::Error,
        }
    }

    /// Shorthand for an `InvalidArgument` naming the offending value
    pub fn invalid_value(param: &str) -> Self {
        NativeError::InvalidArgument(format!("{} value is invalid", param))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            NativeError::NullReference("ssid").to_string(),
            "ssid cannot be null object"
        );
        assert_eq!(
            NativeError::invalid_value("password").to_string(),
            "password value is invalid"
        );
        assert_eq!(
            NativeError::OperationFailed.to_string(),
            "An error occurred while performing the operation"
        );
        assert_eq!(
            NativeError::Uninitialized("wifi").to_string(),
            "wifi subsystem is not initialized"
        );
    }

    #[test]
    fn test_exception_kind() {
        assert_eq!(
            NativeError::NullReference("password").exception_kind(),
            ExceptionKind::NullPointer
        );
        assert_eq!(
            NativeError::OperationFailed.exception_kind(),
            ExceptionKind::Error
        );
        assert_eq!(
            NativeError::InvalidArgument("x".into()).exception_kind(),
            ExceptionKind::Error
        );
    }

    #[test]
    fn test_from_descriptor_error() {
        let err: NativeError = DescriptorError::MissingReturn.into();
        assert_eq!(err.to_string(), "Bad descriptor: missing return type");
    }
}
