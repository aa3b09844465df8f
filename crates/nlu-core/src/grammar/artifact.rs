//! Wire format for the compiled grammar artifact (spec.md §6).
//!
//! This is the raw, string-keyed document a grammar-authoring pipeline
//! persists. `resolve` turns it into the interned, handle-based
//! [`crate::Grammar`] this crate's consumers actually use.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::rule::{GramProps, RuleText};

/// Top-level grammar artifact document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarArtifact {
    /// Symbol name -> its rules. Includes both nonterminal productions
    /// and terminal definitions (`is_terminal: true`, `rhs` holding the
    /// literal token text).
    pub grammar: IndexMap<String, Vec<RawRule>>,
    pub semantics: IndexMap<String, RawSemanticFn>,
    pub start_symbol: String,
    #[serde(default)]
    pub entity_categories: IndexMap<String, Vec<RawEntityRecord>>,
}

/// One rule as persisted. `rhs` holds symbol names for a production, or
/// a single literal token string when `is_terminal` is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRule {
    #[serde(default)]
    pub is_terminal: bool,
    #[serde(default)]
    pub rhs: Vec<String>,
    pub cost: i32,
    #[serde(default)]
    pub text: Option<RuleText>,
    #[serde(default)]
    pub semantic: Option<String>,
    #[serde(default)]
    pub inserted_semantic: Option<String>,
    #[serde(default)]
    pub semantic_is_rhs: bool,
    #[serde(default)]
    pub insertion_index: Option<u8>,
    #[serde(default)]
    pub is_transposition: bool,
    #[serde(default)]
    pub is_placeholder: bool,
    #[serde(default)]
    pub gram_props: Option<GramProps>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSemanticFn {
    pub name: String,
    pub cost: i32,
    pub min_params: u32,
    pub max_params: u32,
    #[serde(default)]
    pub forbids_multiple: bool,
    #[serde(default)]
    pub is_arg: bool,
    #[serde(default)]
    pub anaphoric: bool,
}

/// One entity inside a category; `names` may hold several aliases that
/// all resolve to the same `canonical` display string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEntityRecord {
    pub canonical: String,
    pub names: Vec<String>,
}
