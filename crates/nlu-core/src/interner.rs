//! String interning for grammar symbol, category, and argument names.
//!
//! Converts heap-allocated strings into cheap integer handles (`Atom`).
//! Comparing two atoms is O(1) integer comparison, which matters here
//! because symbol names are compared constantly during state-table
//! construction and forest search.

use std::collections::HashMap;

/// A lightweight handle to an interned string.
///
/// Comparing two atoms is O(1). Atoms are ordered by insertion order,
/// not lexicographically -- use `Interner::resolve` if you need string
/// ordering.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Atom(u32);

impl Atom {
    /// Raw index for serialization/debugging.
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Create an Atom from a raw index. Use only for deserialization.
    #[inline]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }
}

impl PartialOrd for Atom {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Atom {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

/// String interner. Deduplicates strings and returns cheap Atom handles.
#[derive(Debug, Clone, Default)]
pub struct Interner {
    /// Map from string to atom for deduplication.
    map: HashMap<String, Atom>,
    /// Storage for interned strings, indexed by Atom.
    strings: Vec<String>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning its Atom.
    /// If the string was already interned, returns the existing Atom.
    pub fn intern(&mut self, s: &str) -> Atom {
        if let Some(&atom) = self.map.get(s) {
            return atom;
        }

        let atom = Atom(self.strings.len() as u32);
        self.strings.push(s.to_owned());
        self.map.insert(s.to_owned(), atom);
        atom
    }

    /// Intern an owned string, avoiding a clone if not already present.
    pub fn intern_owned(&mut self, s: String) -> Atom {
        if let Some(&atom) = self.map.get(&s) {
            return atom;
        }

        let atom = Atom(self.strings.len() as u32);
        self.strings.push(s.clone());
        self.map.insert(s, atom);
        atom
    }

    /// Look up an already-interned string without creating a new entry.
    #[inline]
    pub fn get(&self, s: &str) -> Option<Atom> {
        self.map.get(s).copied()
    }

    /// Resolve an Atom back to its string.
    ///
    /// # Panics
    /// Panics if the atom was not created by this interner.
    #[inline]
    pub fn resolve(&self, atom: Atom) -> &str {
        &self.strings[atom.0 as usize]
    }

    /// Try to resolve an Atom, returning None if invalid.
    #[inline]
    pub fn try_resolve(&self, atom: Atom) -> Option<&str> {
        self.strings.get(atom.0 as usize).map(|s| s.as_str())
    }

    /// Number of interned strings.
    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether the interner is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Iterate over all interned strings with their atoms.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (Atom, &str)> {
        self.strings
            .iter()
            .enumerate()
            .map(|(i, s)| (Atom(i as u32), s.as_str()))
    }
}
