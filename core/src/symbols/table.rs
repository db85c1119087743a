//! Generic name-keyed symbol table.

use indexmap::map::Entry;
use indexmap::IndexMap;

/// Outcome of attempting to declare a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationResult {
    Ok,
    Duplicate,
}

/// Mapping from identifier to entry, iterated in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymTable<E> {
    entries: IndexMap<String, E>,
}

impl<E> Default for SymTable<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> SymTable<E> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Insert `entry` under `name` unless the name is already declared, in
    /// which case the existing entry is kept.
    pub fn declare(&mut self, name: impl Into<String>, entry: E) -> DeclarationResult {
        match self.entries.entry(name.into()) {
            Entry::Occupied(_) => DeclarationResult::Duplicate,
            Entry::Vacant(slot) => {
                slot.insert(entry);
                DeclarationResult::Ok
            }
        }
    }

    /// Insert-or-get: return the entry for `name`, creating it with `make`
    /// when absent.
    pub fn entry_or_insert_with(
        &mut self,
        name: impl Into<String>,
        make: impl FnOnce() -> E,
    ) -> &mut E {
        self.entries.entry(name.into()).or_insert_with(make)
    }

    pub fn lookup(&self, name: &str) -> Option<&E> {
        self.entries.get(name)
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut E> {
        self.entries.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &E)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
