//! Constant UTF-8 identities
//!
//! Class names, method names and type descriptors in the native tables are
//! `ConstUtf8` values: a `'static` string plus a 16-bit hash computed at
//! compile time. Comparisons look at the length and hash first and only then
//! at the bytes, so lookups against loader-produced names stay cheap.
//!
//! Equality is always by content. Two identities that came from different
//! loaders compare equal as long as their bytes match.

/// Hash used for fast rejection. FNV-1a folded down to 16 bits.
pub const fn utf8_hash(bytes: &[u8]) -> u16 {
    let mut hash: u32 = 0x811c_9dc5;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u32;
        hash = hash.wrapping_mul(0x0100_0193);
        i += 1;
    }
    ((hash >> 16) ^ (hash & 0xFFFF)) as u16
}

/// Compile-time UTF-8 identity with a precomputed hash.
#[derive(Clone, Copy)]
pub struct ConstUtf8 {
    text: &'static str,
    hash: u16,
}

impl ConstUtf8 {
    /// Create an identity. Usable in `static` and `const` items.
    pub const fn new(text: &'static str) -> Self {
        Self {
            text,
            hash: utf8_hash(text.as_bytes()),
        }
    }

    /// Identity text
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.text
    }

    /// Identity bytes
    #[inline]
    pub const fn as_bytes(&self) -> &'static [u8] {
        self.text.as_bytes()
    }

    /// Length in bytes
    #[inline]
    pub const fn len(&self) -> usize {
        self.text.len()
    }

    /// True for the empty identity
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Precomputed content hash
    #[inline]
    pub const fn hash(&self) -> u16 {
        self.hash
    }

    /// Compare against a runtime byte string (e.g. a name read from a class file).
    pub fn matches(&self, bytes: &[u8]) -> bool {
        self.len() == bytes.len() && self.hash == utf8_hash(bytes) && self.as_bytes() == bytes
    }
}

impl PartialEq for ConstUtf8 {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.hash == other.hash && self.text == other.text
    }
}

impl Eq for ConstUtf8 {}

impl PartialEq<str> for ConstUtf8 {
    fn eq(&self, other: &str) -> bool {
        self.matches(other.as_bytes())
    }
}

impl PartialEq<&str> for ConstUtf8 {
    fn eq(&self, other: &&str) -> bool {
        self.matches(other.as_bytes())
    }
}

impl std::hash::Hash for ConstUtf8 {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl std::fmt::Debug for ConstUtf8 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ConstUtf8({:?}, {:#06x})", self.text, self.hash)
    }
}

impl std::fmt::Display for ConstUtf8 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text)
    }
}
