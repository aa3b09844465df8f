#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Grammar model, symbol interning, and the semantic-function table for
//! the query understanding core.
//!
//! This crate owns every process-wide, immutable piece of the system
//! (spec.md §2 component 1, §5 "Shared state"): the interned symbol
//! table, the resolved rule set, the semantic function table, and the
//! entity category inverted index. Nothing here is mutated after
//! [`Grammar::load`] returns, so a `&Grammar` is freely shareable across
//! threads without synchronization.

pub mod entities;
pub mod error;
pub mod grammar;
pub mod interner;
pub mod rule;
pub mod semantics;
pub mod state;
pub mod symbol;

#[cfg(test)]
mod interner_tests;

pub use entities::{EntityCategories, EntityCategory, EntityCategoryId, EntityId, EntityRecord};
pub use error::GrammarLoadError;
pub use grammar::{Grammar, GrammarArtifact};
pub use interner::{Atom, Interner};
pub use rule::{
    GramProps, GrammaticalCase, InflectionTable, PersonNumber, Rule, RuleId, RuleProps, RuleRhs,
    RuleText, SemanticRef, TextFormKey, VerbForm,
};
pub use semantics::{SemanticFunction, SemanticFunctionId, SemanticTable};
pub use state::{Reduction, RuleAction, Shift, State, StateId, StateTable};
pub use symbol::{SymbolId, SymbolKind, SymbolRecord, SymbolTable};
