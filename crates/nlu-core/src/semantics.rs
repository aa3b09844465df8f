//! Semantic function table: the grammar-model half of the semantic
//! engine (spec.md §4.5). Definitions only -- the runtime tree
//! operations (`mergeRHS`, `reduce`, legality checks, `toString`) live in
//! `nlu-engine` since they operate on per-query semantic trees, not on
//! this process-wide table.

use std::collections::HashMap;

use crate::interner::Atom;

/// Stable handle for a semantic function definition.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct SemanticFunctionId(u32);

impl SemanticFunctionId {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }
}

/// A semantic function: either an argument leaf (`is_arg`, no children)
/// or an application taking `min_params..=max_params` child semantics.
#[derive(Debug, Clone)]
pub struct SemanticFunction {
    pub name: Atom,
    pub cost: i32,
    pub min_params: u32,
    pub max_params: u32,
    /// May not co-occur twice inside the same aggregator (e.g. `intersect`).
    pub forbids_multiple: bool,
    /// Argument leaf: a name with no children, e.g. `me`.
    pub is_arg: bool,
    /// Marks arguments later replaced by their antecedent.
    pub anaphoric: bool,
}

/// Immutable, process-wide table of semantic function definitions,
/// resolved by name at grammar load (spec.md §6: "Must resolve every
/// rule's semantic reference against the function table").
#[derive(Debug, Clone, Default)]
pub struct SemanticTable {
    functions: Vec<SemanticFunction>,
    by_name: HashMap<Atom, SemanticFunctionId>,
}

impl SemanticTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, function: SemanticFunction) -> SemanticFunctionId {
        let name = function.name;
        let id = SemanticFunctionId(self.functions.len() as u32);
        self.functions.push(function);
        self.by_name.insert(name, id);
        id
    }

    pub fn lookup(&self, name: Atom) -> Option<SemanticFunctionId> {
        self.by_name.get(&name).copied()
    }

    pub fn get(&self, id: SemanticFunctionId) -> &SemanticFunction {
        &self.functions[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SemanticFunctionId, &SemanticFunction)> {
        self.functions
            .iter()
            .enumerate()
            .map(|(i, f)| (SemanticFunctionId(i as u32), f))
    }
}
