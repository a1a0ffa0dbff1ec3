//! Static-method membership test consumed by the TSRG parser.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::error::{MmvError, MmvResult};

/// Answers whether a symbolic method name belongs to a static method.
pub trait StaticMethodTest {
    fn is_static(&self, srg_method: &str) -> bool;
}

impl<F> StaticMethodTest for F
where
    F: Fn(&str) -> bool,
{
    fn is_static(&self, srg_method: &str) -> bool {
        self(srg_method)
    }
}

/// Set of symbolic names of static methods.
#[derive(Debug, Clone, Default)]
pub struct StaticMethods {
    names: HashSet<String>,
}

impl StaticMethods {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a list with one symbolic name per line. Blank lines are ignored.
    pub fn parse(content: &str) -> Self {
        let names = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        StaticMethods { names }
    }

    /// Load the list from a file. A missing file yields an empty set.
    pub fn load(path: &Path) -> MmvResult<Self> {
        match fs::read_to_string(path) {
            Ok(content) => {
                let statics = Self::parse(&content);
                debug!(
                    count = statics.len(),
                    "loaded static methods from {}",
                    path.display()
                );
                Ok(statics)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no static method list at {}", path.display());
                Ok(Self::new())
            }
            Err(e) => Err(MmvError::io(path, e)),
        }
    }

    /// Add a name.
    pub fn insert(&mut self, srg_method: impl Into<String>) {
        self.names.insert(srg_method.into());
    }

    /// Number of names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when the set is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl StaticMethodTest for StaticMethods {
    fn is_static(&self, srg_method: &str) -> bool {
        self.names.contains(srg_method)
    }
}
