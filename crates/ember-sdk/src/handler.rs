//! Native method tables and the resolver
//!
//! A capability module exposes one `NativeClass`: a class identity and an
//! ordered list of `(name, descriptor) -> handler` entries. A
//! `CapabilityTable` is the ordered list of classes an image ships with.
//! Everything here is `'static` and immutable; tables are built in `static`
//! items and never change at runtime.

use crate::context::ExecutionContext;
use crate::utf8::ConstUtf8;

/// Native handler signature.
///
/// Returns `true` when the call completed and its result (if any) is on the
/// stack, `false` when an exception has been pushed and must be thrown.
pub type NativeMethodFn = fn(&mut dyn ExecutionContext) -> bool;

/// One native method entry
pub struct NativeMethod {
    /// Method name
    pub name: ConstUtf8,
    /// Type descriptor, e.g. `()Z`
    pub signature: ConstUtf8,
    /// Handler
    pub handler: NativeMethodFn,
}

impl NativeMethod {
    /// Create an entry. Usable in `static` items.
    pub const fn new(name: &'static str, signature: &'static str, handler: NativeMethodFn) -> Self {
        Self {
            name: ConstUtf8::new(name),
            signature: ConstUtf8::new(signature),
            handler,
        }
    }

    /// Run the handler against a call frame
    #[inline]
    pub fn invoke(&self, ctx: &mut dyn ExecutionContext) -> bool {
        (self.handler)(ctx)
    }

    /// Check whether this entry answers the given name and descriptor
    pub fn matches(&self, name: &[u8], signature: &[u8]) -> bool {
        self.name.matches(name) && self.signature.matches(signature)
    }
}

impl std::fmt::Debug for NativeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeMethod")
            .field("name", &self.name.as_str())
            .field("signature", &self.signature.as_str())
            .finish()
    }
}

/// A capability module: class identity plus its native methods.
#[derive(Debug)]
pub struct NativeClass {
    /// Class identity, e.g. `network/WiFi`
    pub identity: ConstUtf8,
    /// Methods in lookup order
    pub methods: &'static [NativeMethod],
}

impl NativeClass {
    /// Create a class entry. Usable in `static` items.
    pub const fn new(identity: &'static str, methods: &'static [NativeMethod]) -> Self {
        Self {
            identity: ConstUtf8::new(identity),
            methods,
        }
    }

    /// First method matching `name` and `signature`
    pub fn find(&self, name: &[u8], signature: &[u8]) -> Option<&'static NativeMethod> {
        let methods: &'static [NativeMethod] = self.methods;
        methods.iter().find(|m| m.matches(name, signature))
    }

    /// Report the first `(name, signature)` pair declared twice.
    ///
    /// Duplicates are never merged by the resolver; the later entry would
    /// simply be unreachable.
    pub fn check_unique(&self) -> Result<(), DuplicateMethod> {
        for (i, a) in self.methods.iter().enumerate() {
            if self.methods[..i]
                .iter()
                .any(|b| a.name == b.name && a.signature == b.signature)
            {
                return Err(DuplicateMethod {
                    class: self.identity.as_str(),
                    name: a.name.as_str(),
                    signature: a.signature.as_str(),
                });
            }
        }
        Ok(())
    }
}

/// A `(name, signature)` pair declared twice in one class
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{class}.{name}{signature} is declared more than once")]
pub struct DuplicateMethod {
    /// Class identity
    pub class: &'static str,
    /// Method name
    pub name: &'static str,
    /// Method descriptor
    pub signature: &'static str,
}

/// Ordered set of capability modules searched by the resolver.
#[derive(Debug)]
pub struct CapabilityTable {
    classes: &'static [&'static NativeClass],
}

impl CapabilityTable {
    /// Create a table. Class order decides which entry wins on a tie.
    pub const fn new(classes: &'static [&'static NativeClass]) -> Self {
        Self { classes }
    }

    /// Resolve a native call site.
    ///
    /// Scans for the first class with a matching identity, then for the first
    /// method with matching name and descriptor in that class only. Returns
    /// `None` both when the class is unknown and when the class has no such
    /// method.
    pub fn resolve(
        &self,
        class: &[u8],
        name: &[u8],
        signature: &[u8],
    ) -> Option<&'static NativeMethod> {
        let found = self
            .classes
            .iter()
            .find(|c| c.identity.matches(class))
            .and_then(|c| c.find(name, signature));

        if log::log_enabled!(log::Level::Trace) {
            log::trace!(
                "resolve {}.{}{} -> {}",
                String::from_utf8_lossy(class),
                String::from_utf8_lossy(name),
                String::from_utf8_lossy(signature),
                if found.is_some() { "native" } else { "not found" }
            );
        }
        found
    }

    /// Classes in lookup order
    pub fn classes(&self) -> &'static [&'static NativeClass] {
        self.classes
    }

    /// Check every class for duplicate method entries
    pub fn check_unique(&self) -> Result<(), DuplicateMethod> {
        self.classes.iter().try_for_each(|c| c.check_unique())
    }
}
