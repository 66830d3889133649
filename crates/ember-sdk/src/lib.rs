//! Ember SDK - native method ABI for the Ember VM
//!
//! This crate holds everything a capability module needs to expose native
//! methods to bytecode without depending on the interpreter itself:
//!
//! - `NativeValue` / `ObjectRef`: operand stack slots and heap handles
//! - `ExecutionContext`: the operand stack and heap service of a call frame
//! - `Signature` and `Arguments`: descriptor parsing and argument marshalling
//! - `throw` / `complete`: turning errors into staged VM exceptions
//! - `NativeClass` / `CapabilityTable`: static dispatch tables and the resolver
//! - `Frame`: an in-memory `ExecutionContext` for simulators and tests
//!
//! # Example
//!
//! ```ignore
//! use ember_sdk::{complete, Arguments, ExecutionContext, NativeClass, NativeMethod, NativeValue};
//!
//! fn native_twice(ctx: &mut dyn ExecutionContext) -> bool {
//!     let result = Arguments::pop(ctx, "(I)I")
//!         .and_then(|args| args.int(0))
//!         .map(|x| Some(NativeValue::int(x * 2)));
//!     complete(ctx, result)
//! }
//!
//! static METHODS: [NativeMethod; 1] = [NativeMethod::new("twice", "(I)I", native_twice)];
//! pub static MATH_CLASS: NativeClass = NativeClass::new("util/Math", &METHODS);
//! ```

#![warn(missing_docs)]

pub mod context;
pub mod descriptor;
pub mod error;
pub mod exception;
pub mod frame;
pub mod handler;
pub mod marshal;
pub mod utf8;
pub mod value;

pub use context::{ElementType, ExecutionContext};
pub use descriptor::{DescriptorError, Signature, SlotKind};
pub use error::{AbiResult, ExceptionKind, NativeError};
pub use exception::{complete, throw};
pub use frame::{Frame, HeapObject};
pub use handler::{CapabilityTable, DuplicateMethod, NativeClass, NativeMethod, NativeMethodFn};
pub use marshal::Arguments;
pub use utf8::ConstUtf8;
pub use value::{NativeValue, ObjectRef};
