//! Error translation into VM exceptions
//!
//! `throw` is the single place where a `NativeError` becomes a throwable on
//! the operand stack. Handlers end with either `throw(...)` or
//! `complete(...)` so the one-result-or-one-exception rule holds on every
//! path.

use crate::context::ExecutionContext;
use crate::error::{AbiResult, ExceptionKind, NativeError};
use crate::value::{NativeValue, ObjectRef};

/// Stage `err` as the pending exception and report failure.
///
/// Always pushes exactly one value and always returns `false`. If the heap
/// cannot allocate the message or the throwable, null is pushed instead;
/// throwing null raises a null pointer exception in the interpreter.
pub fn throw(ctx: &mut dyn ExecutionContext, err: &NativeError) -> bool {
    log::debug!("native call failed: {}", err);
    match build_exception(ctx, err) {
        Ok(exception) => ctx.push_object(Some(exception)),
        Err(alloc_err) => {
            log::error!("cannot allocate exception for {:?}: {}", err, alloc_err);
            ctx.push_object(None);
        }
    }
    false
}

/// Finish a handler: push the result (if any) on success, throw on failure.
pub fn complete(ctx: &mut dyn ExecutionContext, result: AbiResult<Option<NativeValue>>) -> bool {
    match result {
        Ok(Some(value)) => {
            ctx.push(value);
            true
        }
        Ok(None) => true,
        Err(err) => throw(ctx, &err),
    }
}

fn build_exception(ctx: &mut dyn ExecutionContext, err: &NativeError) -> AbiResult<ObjectRef> {
    let message = ctx.new_string(err.to_string().as_bytes())?;
    match err.exception_kind() {
        ExceptionKind::Error => ctx.new_error_exception(message),
        ExceptionKind::NullPointer => ctx.new_null_pointer_exception(message),
    }
}
