//! Symbol records: deobfuscated classes, methods and fields.
//!
//! Records are plain values. The [`SymbolDatabase`](crate::database::SymbolDatabase)
//! owns them in arenas and hands out the ID types defined here; a record is
//! replaced wholesale, never patched field by field.

use serde::{Deserialize, Serialize};

// ============================================================================
// ID Types
// ============================================================================

/// Index of a class within a symbol database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ClassId(pub u32);

impl ClassId {
    /// Create a new class ID.
    pub fn new(id: u32) -> Self {
        ClassId(id)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ClassId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "class_{}", self.0)
    }
}

/// Index of a method within a symbol database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct MethodId(pub u32);

impl MethodId {
    /// Create a new method ID.
    pub fn new(id: u32) -> Self {
        MethodId(id)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for MethodId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "method_{}", self.0)
    }
}

/// Index of a field within a symbol database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct FieldId(pub u32);

impl FieldId {
    /// Create a new field ID.
    pub fn new(id: u32) -> Self {
        FieldId(id)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "field_{}", self.0)
    }
}

// ============================================================================
// Records
// ============================================================================

/// Join a package and a simple class name into `package/Class`.
///
/// Classes in the default package have no separator.
pub fn qualify(package: &str, class: &str) -> String {
    if package.is_empty() {
        class.to_string()
    } else {
        format!("{}/{}", package, class)
    }
}

/// A deobfuscated class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSymbol {
    /// Obfuscated class name (e.g. `u`).
    pub obf_name: String,
    /// Simple deobfuscated class name (e.g. `DisplayInfo`).
    pub name: String,
    /// Deobfuscated package, `/`-separated (e.g. `net/minecraft/advancements`).
    pub package: String,
    /// Rename is authoritative rather than suggested.
    pub forced: bool,
}

impl ClassSymbol {
    /// Create a class record. Fresh parses are never forced.
    pub fn new(
        obf_name: impl Into<String>,
        name: impl Into<String>,
        package: impl Into<String>,
    ) -> Self {
        ClassSymbol {
            obf_name: obf_name.into(),
            name: name.into(),
            package: package.into(),
            forced: false,
        }
    }

    /// Identity key: `package/Class`.
    pub fn qualified_name(&self) -> String {
        qualify(&self.package, &self.name)
    }
}

/// A deobfuscated method, keyed by its symbolic name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSymbol {
    /// Obfuscated name of the owning class.
    pub obf_owner: String,
    /// Obfuscated method name.
    pub obf_name: String,
    /// Obfuscated descriptor, e.g. `(Lhy;)Lu;`.
    pub obf_descriptor: String,
    /// Simple deobfuscated name of the owning class.
    pub owner: String,
    /// Deobfuscated package of the owning class.
    pub package: String,
    /// Symbolic name, e.g. `func_192295_b`. Globally unique.
    pub srg_name: String,
    /// Deobfuscated descriptor. `None` until something computes it.
    pub srg_descriptor: Option<String>,
    /// Rename is authoritative rather than suggested.
    pub forced: bool,
}

impl MethodSymbol {
    /// Descriptor to show: the deobfuscated one once resolved, the
    /// obfuscated one until then.
    pub fn descriptor(&self) -> &str {
        self.srg_descriptor
            .as_deref()
            .unwrap_or(&self.obf_descriptor)
    }

    /// Whether a deobfuscated descriptor has been supplied.
    pub fn is_descriptor_resolved(&self) -> bool {
        self.srg_descriptor.is_some()
    }

    /// Return a copy carrying the given deobfuscated descriptor.
    pub fn with_srg_descriptor(mut self, descriptor: impl Into<String>) -> Self {
        self.srg_descriptor = Some(descriptor.into());
        self
    }

    /// `package/Class` of the owner.
    pub fn qualified_owner(&self) -> String {
        qualify(&self.package, &self.owner)
    }
}

/// A deobfuscated field, keyed by its symbolic name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSymbol {
    /// Obfuscated name of the owning class.
    pub obf_owner: String,
    /// Obfuscated field name.
    pub obf_name: String,
    /// Simple deobfuscated name of the owning class.
    pub owner: String,
    /// Deobfuscated package of the owning class.
    pub package: String,
    /// Symbolic name, e.g. `field_192300_a`. Globally unique.
    pub srg_name: String,
    /// Rename is authoritative rather than suggested.
    pub forced: bool,
}

impl FieldSymbol {
    /// `package/Class` of the owner.
    pub fn qualified_owner(&self) -> String {
        qualify(&self.package, &self.owner)
    }
}
