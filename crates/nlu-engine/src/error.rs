//! Fatal engine errors (spec.md §7): conditions the query pipeline can't
//! recover from by discarding a path, unlike a semantic-legality
//! rejection or a dropped low-scoring entity match.

use nlu_core::GramProps;
use thiserror::Error;

use crate::conjugate::MissingInflection;

/// A rule's inflection table had no entry the active `gram_props_list`
/// could satisfy (spec.md §4.7, §7): a grammar-authoring bug, surfaced
/// with enough state to diagnose it rather than silently emitting
/// nothing.
#[derive(Debug, Clone, Error)]
#[error("no inflected form available for requested text; active grammatical properties: {gram_props_list:?}")]
pub struct ConjugationError {
    pub gram_props_list: Vec<GramProps>,
}

impl ConjugationError {
    pub fn from_missing(missing: MissingInflection) -> Self {
        Self { gram_props_list: missing.gram_props_list }
    }
}

/// Parsing could not reach the start symbol, even after deleting
/// unrecognized tokens (spec.md §4.2, §7).
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    #[error("no derivation reaches the start symbol over the given input")]
    FailedToReachStart,
    #[error(transparent)]
    Conjugation(#[from] ConjugationError),
}

/// Top-level engine error (spec.md §7).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Grammar(#[from] nlu_core::GrammarLoadError),
    #[error(transparent)]
    Build(#[from] nlu_compile::BuildError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
