//! Fatal, load-time errors for grammar artifacts.

use thiserror::Error;

/// A grammar artifact failed to resolve into a usable [`crate::Grammar`].
///
/// All variants are fatal: the core never silently continues past one of
/// these. Soft outcomes (no parse, semantic rejection) live in
/// `nlu-engine` as data, not as errors.
#[derive(Debug, Error)]
pub enum GrammarLoadError {
    #[error("rule for symbol `{symbol}` references unknown semantic function `{function}`")]
    UnknownSemanticFunction { symbol: String, function: String },

    #[error("rule for symbol `{symbol}` is malformed: {reason}")]
    MalformedRule { symbol: String, reason: String },

    #[error("symbol `{symbol}` has a zero-cost cyclic rule (`{symbol} -> {symbol}` at cost 0)")]
    ZeroCostCycle { symbol: String },

    #[error("start symbol `{0}` is not defined among the grammar's rules")]
    MissingStartSymbol(String),

    #[error("entity category `{category}` references entity name used under a different category")]
    ConflictingEntityName { category: String, name: String },

    #[error("failed to parse grammar JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to decode grammar binary artifact: {0}")]
    Binary(#[from] postcard::Error),
}
