//! Symbol table: interned grammar symbols, terminal/nonterminal identity,
//! and per-symbol rule lists.

use std::collections::HashMap;

use crate::interner::Atom;
use crate::rule::RuleId;

/// Stable handle for a symbol. The numeric value is used only during
/// state-table construction for canonical item ordering; elsewhere
/// symbols are compared by this handle, not by name.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct SymbolId(u32);

impl SymbolId {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SymbolKind {
    Terminal,
    Nonterminal,
}

/// Everything the grammar knows about one symbol, keyed by `SymbolId`.
#[derive(Debug, Clone)]
pub struct SymbolRecord {
    pub name: Atom,
    pub kind: SymbolKind,
    /// `<int>` and entity categories: must never match as a literal
    /// terminal even though they sit in the terminal symbol table.
    pub is_placeholder: bool,
    /// Token count for multi-token literal terminals (e.g. "pull request").
    pub token_width: u32,
    pub rules: Vec<RuleId>,
}

/// Owned, immutable once built (`nlu-core`'s grammar model, spec.md §3).
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    records: Vec<SymbolRecord>,
    by_name: HashMap<Atom, SymbolId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get-or-create the symbol for `name`. If the symbol already exists
    /// with a different kind, the existing kind wins (grammar authoring
    /// declares kind at first use in practice).
    pub fn declare(&mut self, name: Atom, kind: SymbolKind) -> SymbolId {
        if let Some(&id) = self.by_name.get(&name) {
            return id;
        }
        let id = SymbolId(self.records.len() as u32);
        self.records.push(SymbolRecord {
            name,
            kind,
            is_placeholder: false,
            token_width: 1,
            rules: Vec::new(),
        });
        self.by_name.insert(name, id);
        id
    }

    pub fn lookup(&self, name: Atom) -> Option<SymbolId> {
        self.by_name.get(&name).copied()
    }

    pub fn get(&self, id: SymbolId) -> &SymbolRecord {
        &self.records[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: SymbolId) -> &mut SymbolRecord {
        &mut self.records[id.0 as usize]
    }

    pub fn add_rule(&mut self, id: SymbolId, rule: RuleId) {
        self.records[id.0 as usize].rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &SymbolRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| (SymbolId(i as u32), r))
    }

    /// Symbols of kind `Terminal`, retained after post-processing per
    /// spec.md §4.1 ("the nonterminal symbol table is discarded; the
    /// terminal symbol table is retained for token matching").
    pub fn terminals(&self) -> impl Iterator<Item = (SymbolId, &SymbolRecord)> {
        self.iter().filter(|(_, r)| r.kind == SymbolKind::Terminal)
    }
}
