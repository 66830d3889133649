//! Argument marshalling
//!
//! Pops a native call's arguments off the operand stack as its descriptor
//! declares them. The last-declared argument is on top of the stack, so it is
//! popped first; `Arguments` stores them back in declaration order.
//!
//! Only the slot tag is checked. The class of a referenced object is taken
//! on trust from the bytecode verifier and nothing is dereferenced here.

use crate::context::ExecutionContext;
use crate::descriptor::{Signature, SlotKind};
use crate::error::{AbiResult, NativeError};
use crate::value::{NativeValue, ObjectRef};

/// Arguments of one native call, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Arguments {
    values: Vec<NativeValue>,
}

impl Arguments {
    /// Parse `descriptor` and pop its parameters.
    pub fn pop(ctx: &mut dyn ExecutionContext, descriptor: &str) -> AbiResult<Self> {
        let signature = Signature::parse(descriptor)?;
        Self::pop_signature(ctx, &signature)
    }

    /// Pop the parameters of an already-parsed signature.
    ///
    /// All declared operands are consumed even when one of them has the
    /// wrong tag, so the frame is left in the same shape either way.
    pub fn pop_signature(ctx: &mut dyn ExecutionContext, signature: &Signature) -> AbiResult<Self> {
        let params = signature.params();
        let mut values = vec![NativeValue::Null; params.len()];
        let mut mismatch = None;

        for (slot, kind) in values.iter_mut().zip(params).rev() {
            let value = ctx.pop().ok_or(NativeError::StackUnderflow)?;
            if mismatch.is_none() && !slot_accepts(*kind, &value) {
                mismatch = Some(NativeError::TypeMismatch {
                    expected: kind.name(),
                    got: value.type_name(),
                });
            }
            *slot = value;
        }

        match mismatch {
            Some(err) => Err(err),
            None => Ok(Self { values }),
        }
    }

    /// Number of arguments
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the call takes no arguments
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw value at `index`
    pub fn get(&self, index: usize) -> AbiResult<NativeValue> {
        self.values
            .get(index)
            .copied()
            .ok_or(NativeError::StackUnderflow)
    }

    /// Argument as i32
    pub fn int(&self, index: usize) -> AbiResult<i32> {
        let value = self.get(index)?;
        value.as_int().ok_or(NativeError::TypeMismatch {
            expected: "int",
            got: value.type_name(),
        })
    }

    /// Argument as u32 (the int slot reinterpreted, so negatives become large)
    pub fn uint(&self, index: usize) -> AbiResult<u32> {
        self.int(index).map(|i| i as u32)
    }

    /// Argument as i64
    pub fn long(&self, index: usize) -> AbiResult<i64> {
        let value = self.get(index)?;
        value.as_long().ok_or(NativeError::TypeMismatch {
            expected: "long",
            got: value.type_name(),
        })
    }

    /// Argument as a possibly-null object reference
    pub fn object(&self, index: usize) -> AbiResult<Option<ObjectRef>> {
        match self.get(index)? {
            NativeValue::Ref(r) => Ok(Some(r)),
            NativeValue::Null => Ok(None),
            other => Err(NativeError::TypeMismatch {
                expected: "reference",
                got: other.type_name(),
            }),
        }
    }
}

fn slot_accepts(kind: SlotKind, value: &NativeValue) -> bool {
    match kind {
        SlotKind::Int => matches!(value, NativeValue::Int(_)),
        SlotKind::Long => matches!(value, NativeValue::Long(_)),
        SlotKind::Float => matches!(value, NativeValue::Float(_)),
        SlotKind::Double => matches!(value, NativeValue::Double(_)),
        SlotKind::Reference => value.is_reference(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;

    #[test]
    fn test_pop_reverse_order() {
        let mut frame = Frame::new();
        let ssid = frame.alloc_string("home").unwrap();
        frame.push(NativeValue::object(Some(ssid)));
        frame.push(NativeValue::Null);
        frame.push(NativeValue::int(3));

        let args = Arguments::pop(&mut frame, "(Ljava/lang/String;Ljava/lang/String;I)V").unwrap();
        assert_eq!(args.len(), 3);
        assert_eq!(args.object(0).unwrap(), Some(ssid));
        assert_eq!(args.object(1).unwrap(), None);
        assert_eq!(args.int(2).unwrap(), 3);
        assert!(frame.stack().is_empty());
    }

    #[test]
    fn test_leaves_caller_operands() {
        let mut frame = Frame::new();
        frame.push(NativeValue::long(99));
        frame.push(NativeValue::int(1));

        let args = Arguments::pop(&mut frame, "(I)V").unwrap();
        assert_eq!(args.int(0).unwrap(), 1);
        assert_eq!(frame.stack(), &[NativeValue::long(99)]);
    }

    #[test]
    fn test_underflow() {
        let mut frame = Frame::new();
        frame.push(NativeValue::int(1));
        let err = Arguments::pop(&mut frame, "(II)V").unwrap_err();
        assert_eq!(err, NativeError::StackUnderflow);
    }

    #[test]
    fn test_mismatch_still_consumes_operands() {
        let mut frame = Frame::new();
        frame.push(NativeValue::int(7));
        frame.push(NativeValue::int(8));

        let err = Arguments::pop(&mut frame, "(Ljava/lang/String;I)V").unwrap_err();
        assert_eq!(
            err,
            NativeError::TypeMismatch {
                expected: "reference",
                got: "int"
            }
        );
        assert!(frame.stack().is_empty());
    }

    #[test]
    fn test_uint_reinterprets_negative() {
        let mut frame = Frame::new();
        frame.push(NativeValue::int(-1));
        let args = Arguments::pop(&mut frame, "(I)V").unwrap();
        assert_eq!(args.uint(0).unwrap(), u32::MAX);
    }

    #[test]
    fn test_bad_descriptor() {
        let mut frame = Frame::new();
        assert!(matches!(
            Arguments::pop(&mut frame, "I)V"),
            Err(NativeError::BadDescriptor(_))
        ));
    }

    #[test]
    fn test_accessor_type_errors() {
        let mut frame = Frame::new();
        frame.push(NativeValue::long(5));
        let args = Arguments::pop(&mut frame, "(J)V").unwrap();
        assert_eq!(args.long(0).unwrap(), 5);
        assert!(args.int(0).is_err());
        assert!(args.object(0).is_err());
        assert_eq!(args.get(1), Err(NativeError::StackUnderflow));
    }
}
