//! Execution context: what a native handler may touch
//!
//! The interpreter implements this for the active call frame. A handler sees
//! the frame's operand stack and the VM heap-allocation service, nothing
//! else. The handler must not keep anything it gets from here past its own
//! return.

use crate::error::AbiResult;
use crate::value::{NativeValue, ObjectRef};

/// Element type of a VM array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    /// `Z`
    Boolean,
    /// `B`
    Byte,
    /// `C`
    Char,
    /// `S`
    Short,
    /// `I`
    Int,
    /// `J`
    Long,
    /// `F`
    Float,
    /// `D`
    Double,
}

impl ElementType {
    /// Size of one element in bytes
    pub const fn size(self) -> usize {
        match self {
            ElementType::Boolean | ElementType::Byte => 1,
            ElementType::Char | ElementType::Short => 2,
            ElementType::Int | ElementType::Float => 4,
            ElementType::Long | ElementType::Double => 8,
        }
    }

    /// Descriptor character
    pub const fn descriptor(self) -> char {
        match self {
            ElementType::Boolean => 'Z',
            ElementType::Byte => 'B',
            ElementType::Char => 'C',
            ElementType::Short => 'S',
            ElementType::Int => 'I',
            ElementType::Long => 'J',
            ElementType::Float => 'F',
            ElementType::Double => 'D',
        }
    }
}

/// Active call frame as seen by a native handler.
///
/// # Contract
///
/// - Arguments are popped last-declared first.
/// - A handler that returns `true` has pushed exactly the values its return
///   type requires. A handler that returns `false` has pushed exactly one
///   throwable (or null if the throwable could not be allocated).
pub trait ExecutionContext {
    // ========================================================================
    // Operand stack
    // ========================================================================

    /// Push a value onto the operand stack
    fn push(&mut self, value: NativeValue);

    /// Pop the top value, `None` if the stack is empty
    fn pop(&mut self) -> Option<NativeValue>;

    /// Push an int
    fn push_int(&mut self, value: i32) {
        self.push(NativeValue::int(value));
    }

    /// Push a boolean (as an int slot)
    fn push_bool(&mut self, value: bool) {
        self.push(NativeValue::bool(value));
    }

    /// Push an object reference, `None` pushes null
    fn push_object(&mut self, obj: Option<ObjectRef>) {
        self.push(NativeValue::object(obj));
    }

    // ========================================================================
    // Heap allocation
    // ========================================================================

    /// Allocate a string object holding `bytes`
    fn new_string(&mut self, bytes: &[u8]) -> AbiResult<ObjectRef>;

    /// Allocate a zeroed array of `length` elements. `dimensions` counts the
    /// array nesting level (1 for `[B`).
    fn new_array(
        &mut self,
        length: u32,
        element: ElementType,
        dimensions: u8,
    ) -> AbiResult<ObjectRef>;

    /// Allocate an error exception with the given message string
    fn new_error_exception(&mut self, message: ObjectRef) -> AbiResult<ObjectRef>;

    /// Allocate a null pointer exception with the given message string
    fn new_null_pointer_exception(&mut self, message: ObjectRef) -> AbiResult<ObjectRef>;

    // ========================================================================
    // Object access
    // ========================================================================

    /// Bytes of a string object
    fn string_bytes(&self, string: ObjectRef) -> AbiResult<&[u8]>;

    /// Raw data of a primitive array
    fn array_bytes_mut(&mut self, array: ObjectRef) -> AbiResult<&mut [u8]>;
}
