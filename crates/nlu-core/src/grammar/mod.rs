//! The resolved, immutable grammar model (spec.md §2 component 1, §3).
//!
//! A [`Grammar`] is built once from a [`artifact::GrammarArtifact`] and
//! never mutated afterward; every consumer downstream (`nlu-compile`,
//! `nlu-engine`) holds a shared `&Grammar`.

pub mod artifact;
mod binary;
mod json;
mod resolve;


pub use artifact::GrammarArtifact;

use crate::entities::EntityCategories;
use crate::error::GrammarLoadError;
use crate::interner::Interner;
use crate::rule::{Rule, RuleId};
use crate::semantics::SemanticTable;
use crate::symbol::{SymbolId, SymbolTable};

/// Immutable, process-wide grammar. Owns the interner, the symbol table,
/// every rule, the semantic function table, and the entity inverted
/// index. Safe to share across threads: nothing here has interior
/// mutability, so `&Grammar` is `Send + Sync` by construction.
#[derive(Debug, Clone)]
pub struct Grammar {
    interner: Interner,
    symbols: SymbolTable,
    rules: Vec<Rule>,
    semantics: SemanticTable,
    entities: EntityCategories,
    start_symbol: SymbolId,
}

impl Grammar {
    pub fn load(artifact: GrammarArtifact) -> Result<Self, GrammarLoadError> {
        resolve::resolve(artifact)
    }

    pub fn from_json(json: &str) -> Result<Self, GrammarLoadError> {
        Self::load(GrammarArtifact::from_json(json)?)
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, GrammarLoadError> {
        Self::load(GrammarArtifact::from_binary(bytes)?)
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.as_u32() as usize]
    }

    pub fn rules_for(&self, symbol: SymbolId) -> impl Iterator<Item = (RuleId, &Rule)> {
        self.symbols
            .get(symbol)
            .rules
            .iter()
            .map(|&id| (id, self.rule(id)))
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn semantics(&self) -> &SemanticTable {
        &self.semantics
    }

    pub fn entities(&self) -> &EntityCategories {
        &self.entities
    }

    pub fn start_symbol(&self) -> SymbolId {
        self.start_symbol
    }
}
