//! Symbol database: arenas of class/method/field records plus name indexes.
//!
//! Each record is owned once, in an arena `Vec`; every other structure holds
//! IDs into those arenas:
//! - package → classes (definition order)
//! - class → methods, class → fields (definition order)
//! - qualified class name → class
//! - symbolic method/field name → record, and → owning class
//!
//! Symbolic member names are globally unique. Inserting a member under a
//! name that already exists replaces the old record in its arena slot and
//! moves it to the new owner if the owner changed, so a name is never
//! listed under two classes at once.
//!
//! The database is built by [`crate::tsrg`] and read-only afterwards. IDs
//! are `u32` arena indexes; an insert that would need a larger index fails
//! with `TooManySymbols`.

use std::collections::{BTreeMap, HashMap};

use crate::error::{MmvError, MmvResult};
use crate::symbols::{ClassId, ClassSymbol, FieldId, FieldSymbol, MethodId, MethodSymbol};

/// Cross-referenced symbols from one TSRG parse pass.
#[derive(Debug, Clone, Default)]
pub struct SymbolDatabase {
    // Primary storage
    classes: Vec<ClassSymbol>,
    methods: Vec<MethodSymbol>,
    fields: Vec<FieldSymbol>,

    // Secondary indexes
    /// `package/Class` → ClassId.
    class_by_name: HashMap<String, ClassId>,
    /// package → class ids (BTreeMap so package listing is sorted).
    classes_by_package: BTreeMap<String, Vec<ClassId>>,
    /// srg method name → MethodId.
    method_by_name: HashMap<String, MethodId>,
    /// srg field name → FieldId.
    field_by_name: HashMap<String, FieldId>,

    // Postings lists
    methods_by_class: HashMap<ClassId, Vec<MethodId>>,
    fields_by_class: HashMap<ClassId, Vec<FieldId>>,
    /// srg method name → owning class.
    method_owner: HashMap<String, ClassId>,
    /// srg field name → owning class.
    field_owner: HashMap<String, ClassId>,
}

impl SymbolDatabase {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Construction (parser only)
    // ========================================================================

    /// Insert a class, or replace the record of an already known one.
    ///
    /// A replaced class keeps its ID, its place in the package listing and
    /// its member lists.
    pub(crate) fn insert_class(&mut self, class: ClassSymbol) -> MmvResult<ClassId> {
        let key = class.qualified_name();
        if let Some(&id) = self.class_by_name.get(&key) {
            self.classes[id.index()] = class;
            return Ok(id);
        }

        let id = ClassId::new(next_id(self.classes.len(), "class")?);
        self.classes_by_package
            .entry(class.package.clone())
            .or_default()
            .push(id);
        self.methods_by_class.entry(id).or_default();
        self.fields_by_class.entry(id).or_default();
        self.class_by_name.insert(key, id);
        self.classes.push(class);
        Ok(id)
    }

    /// Insert a method owned by `owner`. Last write wins per symbolic name.
    pub(crate) fn insert_method(
        &mut self,
        owner: ClassId,
        method: MethodSymbol,
    ) -> MmvResult<MethodId> {
        let name = method.srg_name.clone();
        let id = match self.method_by_name.get(&name).copied() {
            Some(id) => {
                self.methods[id.index()] = method;
                if let Some(previous) = self.method_owner.get(&name).copied() {
                    if previous != owner {
                        if let Some(list) = self.methods_by_class.get_mut(&previous) {
                            list.retain(|m| *m != id);
                        }
                        self.methods_by_class.entry(owner).or_default().push(id);
                    }
                }
                id
            }
            None => {
                let id = MethodId::new(next_id(self.methods.len(), "method")?);
                self.methods.push(method);
                self.methods_by_class.entry(owner).or_default().push(id);
                self.method_by_name.insert(name.clone(), id);
                id
            }
        };
        self.method_owner.insert(name, owner);
        Ok(id)
    }

    /// Insert a field owned by `owner`. Last write wins per symbolic name.
    pub(crate) fn insert_field(&mut self, owner: ClassId, field: FieldSymbol) -> MmvResult<FieldId> {
        let name = field.srg_name.clone();
        let id = match self.field_by_name.get(&name).copied() {
            Some(id) => {
                self.fields[id.index()] = field;
                if let Some(previous) = self.field_owner.get(&name).copied() {
                    if previous != owner {
                        if let Some(list) = self.fields_by_class.get_mut(&previous) {
                            list.retain(|f| *f != id);
                        }
                        self.fields_by_class.entry(owner).or_default().push(id);
                    }
                }
                id
            }
            None => {
                let id = FieldId::new(next_id(self.fields.len(), "field")?);
                self.fields.push(field);
                self.fields_by_class.entry(owner).or_default().push(id);
                self.field_by_name.insert(name.clone(), id);
                id
            }
        };
        self.field_owner.insert(name, owner);
        Ok(id)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Look up a class by `package/Class`.
    pub fn class(&self, qualified_name: &str) -> Option<&ClassSymbol> {
        self.class_id(qualified_name).map(|id| self.class_by_id(id))
    }

    /// Resolve `package/Class` to its ID.
    pub fn class_id(&self, qualified_name: &str) -> Option<ClassId> {
        self.class_by_name.get(qualified_name).copied()
    }

    /// Get a class by ID.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this database.
    pub fn class_by_id(&self, id: ClassId) -> &ClassSymbol {
        &self.classes[id.index()]
    }

    /// Look up a method by symbolic name.
    pub fn method(&self, srg_name: &str) -> Option<&MethodSymbol> {
        self.method_by_name
            .get(srg_name)
            .map(|id| &self.methods[id.index()])
    }

    /// Look up a field by symbolic name.
    pub fn field(&self, srg_name: &str) -> Option<&FieldSymbol> {
        self.field_by_name
            .get(srg_name)
            .map(|id| &self.fields[id.index()])
    }

    /// Class owning the method with this symbolic name.
    pub fn method_owner(&self, srg_name: &str) -> Option<&ClassSymbol> {
        self.method_owner
            .get(srg_name)
            .map(|id| self.class_by_id(*id))
    }

    /// Class owning the field with this symbolic name.
    pub fn field_owner(&self, srg_name: &str) -> Option<&ClassSymbol> {
        self.field_owner
            .get(srg_name)
            .map(|id| self.class_by_id(*id))
    }

    /// Packages, sorted.
    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.classes_by_package.keys().map(String::as_str)
    }

    /// Classes of a package in definition order. Empty for unknown packages.
    pub fn classes_in_package(&self, package: &str) -> Vec<&ClassSymbol> {
        self.classes_by_package
            .get(package)
            .map(|ids| ids.iter().map(|id| self.class_by_id(*id)).collect())
            .unwrap_or_default()
    }

    /// Methods of a class in definition order. Empty for unknown classes.
    pub fn methods_of(&self, qualified_name: &str) -> Vec<&MethodSymbol> {
        self.class_id(qualified_name)
            .and_then(|id| self.methods_by_class.get(&id))
            .map(|ids| ids.iter().map(|id| &self.methods[id.index()]).collect())
            .unwrap_or_default()
    }

    /// Fields of a class in definition order. Empty for unknown classes.
    pub fn fields_of(&self, qualified_name: &str) -> Vec<&FieldSymbol> {
        self.class_id(qualified_name)
            .and_then(|id| self.fields_by_class.get(&id))
            .map(|ids| ids.iter().map(|id| &self.fields[id.index()]).collect())
            .unwrap_or_default()
    }

    /// All classes in definition order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassSymbol> {
        self.classes.iter()
    }

    /// All methods (one per symbolic name).
    pub fn methods(&self) -> impl Iterator<Item = &MethodSymbol> {
        self.methods.iter()
    }

    /// All fields (one per symbolic name).
    pub fn fields(&self) -> impl Iterator<Item = &FieldSymbol> {
        self.fields.iter()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Next arena index as a `u32` ID.
fn next_id(len: usize, kind: &'static str) -> MmvResult<u32> {
    u32::try_from(len).map_err(|_| MmvError::TooManySymbols { kind })
}
