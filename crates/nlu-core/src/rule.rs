//! Grammar rules and the per-rule property bag (`RuleProps`).
//!
//! A rule is a production `LHS -> RHS` plus a `RuleProps` record carrying
//! everything the parser and search need but the item-set builder doesn't:
//! cost, display text, semantic wiring, and grammatical-form constraints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::interner::Atom;
use crate::symbol::SymbolId;

/// Stable handle for a rule within a [`crate::Grammar`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct RuleId(u32);

impl RuleId {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }
}

/// The right-hand side of a rule: either a sequence of symbols (a
/// nonterminal production, consumed by the state-table builder) or a
/// literal word sequence (a terminal definition -- the words the parser's
/// matcher recognizes as this terminal's surface text, never fed to the
/// item-set construction since a terminal has no internal grammar
/// structure).
#[derive(Debug, Clone)]
pub enum RuleRhs {
    Symbols(Vec<SymbolId>),
    Literal(Vec<Atom>),
}

/// A production: `lhs -> rhs`, with side data in `props`.
///
/// Multiple rules may define the same terminal symbol (synonyms, or
/// alternate inflected spellings), each with its own cost/text/semantic
/// -- matching that terminal yields one sub-alternative per such rule.
/// `props.is_placeholder` marks symbols like `<int>` and entity
/// categories that must never be matched as literal terminals.
#[derive(Debug, Clone)]
pub struct Rule {
    pub lhs: SymbolId,
    pub rhs: RuleRhs,
    pub props: RuleProps,
}

impl Rule {
    /// RHS length is exactly two -- drives `State`'s `is_binary` flag.
    /// Always false for terminal definitions.
    pub fn is_binary(&self) -> bool {
        matches!(&self.rhs, RuleRhs::Symbols(s) if s.len() == 2)
    }

    pub fn symbols(&self) -> &[SymbolId] {
        match &self.rhs {
            RuleRhs::Symbols(s) => s,
            RuleRhs::Literal(_) => &[],
        }
    }

    pub fn is_terminal_definition(&self) -> bool {
        matches!(self.rhs, RuleRhs::Literal(_))
    }
}

/// Reference to a semantic function, and whether it applies as a pending
/// LHS (to be applied once its RHS materializes) or as an already-reduced
/// RHS argument. See `semantic_is_rhs` on [`RuleProps`].
pub type SemanticRef = crate::semantics::SemanticFunctionId;

/// Side data bundled with a rule. Optional fields are `None` rather than
/// branching on a runtime type tag -- the semantic engine and conjugation
/// machinery branch on presence.
///
/// `PartialEq`/`Eq` back the forest's sub-alternative dedup (spec.md §4.2:
/// "Deduplicate created sub-alternatives by structural identity").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleProps {
    pub cost: i32,
    pub text: Option<RuleText>,
    pub semantic: Option<SemanticRef>,
    pub inserted_semantic: Option<SemanticRef>,
    pub semantic_is_rhs: bool,
    /// 0 or 1: which branch of an insertion edit this rule represents.
    pub insertion_index: Option<u8>,
    pub is_transposition: bool,
    pub is_placeholder: bool,
    pub gram_props: Option<GramProps>,
}

impl RuleProps {
    /// Stable order for collapsed multi-insertion rules: increasing cost.
    pub fn cost_order(&self) -> i32 {
        self.cost
    }
}

/// Display text carried by a rule: a literal string, an inflection table
/// keyed by grammatical form, or a mixed sequence of the two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleText {
    Plain(String),
    Inflected(InflectionTable),
    Sequence(Vec<RuleText>),
}

/// Maps a grammatical-form key to the surface string used for that form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InflectionTable(pub BTreeMap<TextFormKey, String>);

impl InflectionTable {
    pub fn get(&self, key: TextFormKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }
}

/// Closed set of grammatical-form keys text objects may be indexed by
/// (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextFormKey {
    VerbForm(VerbForm),
    PersonNumber(PersonNumber),
    GrammaticalCase(GrammaticalCase),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerbForm {
    Infinitive,
    Past,
    Present,
    Future,
    PastPerfect,
    PastParticiple,
    Participle,
    PresentParticiple,
    PresentSubjunctive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PersonNumber {
    OneSg,
    ThreeSg,
    Pl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GrammaticalCase {
    Nom,
    Obj,
}

/// Grammatical-form constraints a rule pushes onto `gram_props_list`
/// during search (spec.md §3, §4.4, §4.7).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GramProps {
    pub verb_form: Option<VerbForm>,
    pub person_number: Option<PersonNumber>,
    pub grammatical_case: Option<GrammaticalCase>,
}

impl GramProps {
    pub fn is_empty(&self) -> bool {
        self.verb_form.is_none() && self.person_number.is_none() && self.grammatical_case.is_none()
    }

    /// Does this frame satisfy the requested form key?
    pub fn matches(&self, key: TextFormKey) -> bool {
        match key {
            TextFormKey::VerbForm(v) => self.verb_form == Some(v),
            TextFormKey::PersonNumber(p) => self.person_number == Some(p),
            TextFormKey::GrammaticalCase(c) => self.grammatical_case == Some(c),
        }
    }
}
