//! Method type descriptors
//!
//! Parses JVM-style descriptors such as `(Ljava/lang/String;I)V` into the
//! operand stack slot kinds the marshaller needs. Class names inside `L...;`
//! are skipped: the bytecode verifier already guarantees reference types.

use thiserror::Error;

/// Kind of operand stack slot a parameter or return value occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// `Z`, `B`, `C`, `S`, `I`
    Int,
    /// `J`
    Long,
    /// `F`
    Float,
    /// `D`
    Double,
    /// `L<class>;` or `[<component>`
    Reference,
}

impl SlotKind {
    /// Name used in diagnostics
    pub const fn name(self) -> &'static str {
        match self {
            SlotKind::Int => "int",
            SlotKind::Long => "long",
            SlotKind::Float => "float",
            SlotKind::Double => "double",
            SlotKind::Reference => "reference",
        }
    }
}

/// Descriptor parse errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// Descriptor does not open a parameter list
    #[error("descriptor must start with '('")]
    MissingOpenParen,

    /// Parameter list is never closed
    #[error("descriptor has no ')'")]
    MissingCloseParen,

    /// Unknown type character and its offset
    #[error("unexpected type character {0:?} at offset {1}")]
    UnexpectedChar(char, usize),

    /// `L` type without a closing `;`
    #[error("unterminated class name at offset {0}")]
    UnterminatedClass(usize),

    /// Nothing after the parameter list
    #[error("missing return type")]
    MissingReturn,

    /// Extra characters after the return type
    #[error("trailing characters after return type")]
    Trailing,
}

/// Parsed method descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    params: Vec<SlotKind>,
    ret: Option<SlotKind>,
}

impl Signature {
    /// Parse a method descriptor.
    pub fn parse(descriptor: &str) -> Result<Self, DescriptorError> {
        let bytes = descriptor.as_bytes();
        if bytes.first() != Some(&b'(') {
            return Err(DescriptorError::MissingOpenParen);
        }

        let mut params = Vec::new();
        let mut pos = 1;
        loop {
            match bytes.get(pos) {
                None => return Err(DescriptorError::MissingCloseParen),
                Some(b')') => {
                    pos += 1;
                    break;
                }
                Some(_) => {
                    let (kind, next) = parse_field(bytes, pos)?;
                    params.push(kind);
                    pos = next;
                }
            }
        }

        let ret = match bytes.get(pos) {
            None => return Err(DescriptorError::MissingReturn),
            Some(b'V') => {
                pos += 1;
                None
            }
            Some(_) => {
                let (kind, next) = parse_field(bytes, pos)?;
                pos = next;
                Some(kind)
            }
        };

        if pos != bytes.len() {
            return Err(DescriptorError::Trailing);
        }

        Ok(Self { params, ret })
    }

    /// Parameter slot kinds in declaration order
    pub fn params(&self) -> &[SlotKind] {
        &self.params
    }

    /// Return slot kind, `None` for `V`
    pub fn ret(&self) -> Option<SlotKind> {
        self.ret
    }

    /// Number of values a successful call leaves on the stack (0 or 1)
    pub fn result_count(&self) -> usize {
        usize::from(self.ret.is_some())
    }
}

fn parse_field(bytes: &[u8], start: usize) -> Result<(SlotKind, usize), DescriptorError> {
    let mut pos = start;
    // Any number of array dimensions collapses into one reference slot
    while bytes.get(pos) == Some(&b'[') {
        pos += 1;
    }
    let is_array = pos > start;

    let c = match bytes.get(pos) {
        Some(c) => *c,
        None => return Err(DescriptorError::MissingCloseParen),
    };

    let kind = match c {
        b'Z' | b'B' | b'C' | b'S' | b'I' => SlotKind::Int,
        b'J' => SlotKind::Long,
        b'F' => SlotKind::Float,
        b'D' => SlotKind::Double,
        b'L' => {
            let end = bytes[pos..]
                .iter()
                .position(|&b| b == b';')
                .ok_or(DescriptorError::UnterminatedClass(pos))?;
            return Ok((SlotKind::Reference, pos + end + 1));
        }
        other => return Err(DescriptorError::UnexpectedChar(other as char, pos)),
    };

    if is_array {
        Ok((SlotKind::Reference, pos + 1))
    } else {
        Ok((kind, pos + 1))
    }
}
