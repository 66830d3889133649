//! In-memory call frame
//!
//! `Frame` is a self-contained `ExecutionContext`: an operand stack plus a
//! small arena heap of strings, primitive arrays and throwables. Host-side
//! simulators and tests drive native handlers through it exactly the way the
//! interpreter would.

use crate::context::{ElementType, ExecutionContext};
use crate::error::{AbiResult, ExceptionKind, NativeError};
use crate::value::{NativeValue, ObjectRef};

/// Object stored in a `Frame` heap
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeapObject {
    /// String contents
    String(Vec<u8>),
    /// One-dimensional primitive array
    Array {
        /// Element type
        element: ElementType,
        /// Number of elements
        length: u32,
        /// Raw element data, `length * element.size()` bytes
        data: Vec<u8>,
    },
    /// Exception object
    Throwable {
        /// Exception class
        kind: ExceptionKind,
        /// Message string handle
        message: ObjectRef,
    },
}

/// Operand stack and heap for driving native handlers outside the VM.
#[derive(Debug, Default)]
pub struct Frame {
    stack: Vec<NativeValue>,
    heap: Vec<HeapObject>,
    heap_limit: Option<usize>,
}

impl Frame {
    /// Create an empty frame with an unbounded heap
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a frame whose heap holds at most `objects` objects
    pub fn with_heap_limit(objects: usize) -> Self {
        Self {
            heap_limit: Some(objects),
            ..Self::default()
        }
    }

    /// Current operand stack, bottom first
    pub fn stack(&self) -> &[NativeValue] {
        &self.stack
    }

    /// Number of live heap objects
    pub fn heap_len(&self) -> usize {
        self.heap.len()
    }

    /// Look up a heap object
    pub fn object(&self, obj: ObjectRef) -> Option<&HeapObject> {
        self.heap.get(obj.to_raw() as usize - 1)
    }

    /// Allocate a string from Rust text
    pub fn alloc_string(&mut self, text: &str) -> AbiResult<ObjectRef> {
        self.new_string(text.as_bytes())
    }

    /// Push a string argument, or null for `None`
    pub fn push_str_arg(&mut self, text: Option<&str>) -> AbiResult<()> {
        let obj = match text {
            Some(t) => Some(self.alloc_string(t)?),
            None => None,
        };
        self.push_object(obj);
        Ok(())
    }

    /// Text of a string object
    pub fn string(&self, obj: ObjectRef) -> Option<String> {
        match self.object(obj)? {
            HeapObject::String(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
            _ => None,
        }
    }

    /// Contents of a primitive array
    pub fn array(&self, obj: ObjectRef) -> Option<&[u8]> {
        match self.object(obj)? {
            HeapObject::Array { data, .. } => Some(data.as_slice()),
            _ => None,
        }
    }

    /// Kind and message of the throwable on top of the stack
    pub fn top_exception(&self) -> Option<(ExceptionKind, String)> {
        let top = self.stack.last()?.as_object()?;
        match self.object(top)? {
            HeapObject::Throwable { kind, message } => Some((*kind, self.string(*message)?)),
            _ => None,
        }
    }

    fn alloc(&mut self, object: HeapObject) -> AbiResult<ObjectRef> {
        if let Some(limit) = self.heap_limit {
            if self.heap.len() >= limit {
                return Err(NativeError::OutOfMemory);
            }
        }
        self.heap.push(object);
        ObjectRef::from_raw(self.heap.len() as u32).ok_or(NativeError::OutOfMemory)
    }

    fn expect_string(&self, obj: ObjectRef) -> AbiResult<()> {
        match self.object(obj) {
            Some(HeapObject::String(_)) => Ok(()),
            _ => Err(NativeError::InvalidHandle(obj.to_raw())),
        }
    }
}

impl ExecutionContext for Frame {
    fn push(&mut self, value: NativeValue) {
        self.stack.push(value);
    }

    fn pop(&mut self) -> Option<NativeValue> {
        self.stack.pop()
    }

    fn new_string(&mut self, bytes: &[u8]) -> AbiResult<ObjectRef> {
        self.alloc(HeapObject::String(bytes.to_vec()))
    }

    fn new_array(
        &mut self,
        length: u32,
        element: ElementType,
        dimensions: u8,
    ) -> AbiResult<ObjectRef> {
        if dimensions != 1 {
            return Err(NativeError::InvalidArgument(format!(
                "{}-dimensional arrays are not supported",
                dimensions
            )));
        }
        let data = vec![0u8; length as usize * element.size()];
        self.alloc(HeapObject::Array {
            element,
            length,
            data,
        })
    }

    fn new_error_exception(&mut self, message: ObjectRef) -> AbiResult<ObjectRef> {
        self.expect_string(message)?;
        self.alloc(HeapObject::Throwable {
            kind: ExceptionKind::Error,
            message,
        })
    }

    fn new_null_pointer_exception(&mut self, message: ObjectRef) -> AbiResult<ObjectRef> {
        self.expect_string(message)?;
        self.alloc(HeapObject::Throwable {
            kind: ExceptionKind::NullPointer,
            message,
        })
    }

    fn string_bytes(&self, string: ObjectRef) -> AbiResult<&[u8]> {
        match self.object(string) {
            Some(HeapObject::String(bytes)) => Ok(bytes.as_slice()),
            _ => Err(NativeError::InvalidHandle(string.to_raw())),
        }
    }

    fn array_bytes_mut(&mut self, array: ObjectRef) -> AbiResult<&mut [u8]> {
        match self.heap.get_mut(array.to_raw() as usize - 1) {
            Some(HeapObject::Array { data, .. }) => Ok(data.as_mut_slice()),
            _ => Err(NativeError::InvalidHandle(array.to_raw())),
        }
    }
}
