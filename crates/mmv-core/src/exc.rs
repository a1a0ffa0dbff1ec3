//! Exc data: per-method parameter names and static flags.
//!
//! The authoritative parameter source fills an [`ExcTable`] with
//! [`ExcTable::insert`]; the TSRG parser then backfills placeholders with
//! [`ExcTable::merge`], which only ever replaces a record by one carrying
//! more parameter names.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Parameter metadata for one method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcRecord {
    /// Simple deobfuscated name of the owning class.
    pub class_name: String,
    /// Symbolic method name. Identity key.
    pub srg_name: String,
    /// Method descriptor.
    pub descriptor: String,
    /// Symbolic parameter names, in declaration order.
    pub parameters: Vec<String>,
    /// Method is static.
    pub is_static: bool,
}

impl ExcRecord {
    /// Create a record.
    pub fn new(
        class_name: impl Into<String>,
        srg_name: impl Into<String>,
        descriptor: impl Into<String>,
        parameters: Vec<String>,
        is_static: bool,
    ) -> Self {
        ExcRecord {
            class_name: class_name.into(),
            srg_name: srg_name.into(),
            descriptor: descriptor.into(),
            parameters,
            is_static,
        }
    }

    /// A record with no parameter names, standing in until real data arrives.
    pub fn placeholder(
        class_name: impl Into<String>,
        srg_name: impl Into<String>,
        descriptor: impl Into<String>,
        is_static: bool,
    ) -> Self {
        Self::new(class_name, srg_name, descriptor, Vec::new(), is_static)
    }

    /// True when the record carries no parameter names.
    pub fn is_placeholder(&self) -> bool {
        self.parameters.is_empty()
    }
}

/// Exc records keyed by symbolic method name, with a reverse index from
/// symbolic parameter name to the method that declares it.
#[derive(Debug, Clone, Default)]
pub struct ExcTable {
    by_method: HashMap<String, ExcRecord>,
    /// param srg name → method srg name
    method_by_param: HashMap<String, String>,
}

impl ExcTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record unconditionally, replacing any previous one.
    pub fn insert(&mut self, record: ExcRecord) {
        if let Some(old) = self.by_method.remove(&record.srg_name) {
            for param in &old.parameters {
                if self.method_by_param.get(param) == Some(&old.srg_name) {
                    self.method_by_param.remove(param);
                }
            }
        }
        for param in &record.parameters {
            self.method_by_param
                .insert(param.clone(), record.srg_name.clone());
        }
        self.by_method.insert(record.srg_name.clone(), record);
    }

    /// Store `record` only if no record exists for its method yet, or the
    /// existing one has fewer parameter names. Returns whether it was stored.
    pub fn merge(&mut self, record: ExcRecord) -> bool {
        let replace = match self.by_method.get(&record.srg_name) {
            None => true,
            Some(existing) => existing.parameters.len() < record.parameters.len(),
        };
        if replace {
            self.insert(record);
        }
        replace
    }

    /// Look up the record for a symbolic method name.
    pub fn get(&self, srg_method: &str) -> Option<&ExcRecord> {
        self.by_method.get(srg_method)
    }

    /// Whether a record exists for a symbolic method name.
    pub fn contains(&self, srg_method: &str) -> bool {
        self.by_method.contains_key(srg_method)
    }

    /// Find the record declaring a symbolic parameter name.
    pub fn record_for_param(&self, srg_param: &str) -> Option<&ExcRecord> {
        self.method_by_param
            .get(srg_param)
            .and_then(|method| self.by_method.get(method))
    }

    /// Number of method records.
    pub fn len(&self) -> usize {
        self.by_method.len()
    }

    /// True when the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.by_method.is_empty()
    }

    /// Iterate all records (unordered).
    pub fn records(&self) -> impl Iterator<Item = &ExcRecord> {
        self.by_method.values()
    }
}
