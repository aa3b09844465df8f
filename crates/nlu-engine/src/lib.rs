#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Generalized GSS/SPPF parser, heuristic-cost annotation, and A*
//! k-best forest search for the query understanding core (spec.md §2
//! components 4-7).
//!
//! This crate is the one place the whole pipeline comes together: a
//! frozen [`nlu_core::Grammar`] and the [`nlu_core::StateTable`]
//! `nlu-compile` built from it go in, a query string and a `k` come in
//! alongside, and a ranked [`ParseResults`] comes out. Everything below
//! [`parse`] is per-call state scoped to that single invocation (spec.md
//! §5 "Per-query state").

pub mod conjugate;
pub mod error;
pub mod forest;
pub mod gss;
pub mod heuristic;
pub mod matcher;
pub mod parser;
pub mod path;
pub mod reachability;
pub mod result;
pub mod search;
pub mod semantics;

pub use error::{ConjugationError, EngineError, ParseError};
pub use matcher::MatchConfig;
pub use parser::ParseOutput;
pub use result::ParseTree;
pub use search::{SearchBudget, SearchConfig};

use std::time::Duration;

use nlu_core::{Grammar, GrammarArtifact, StateTable};

/// The core API's `parse` output (spec.md §6 "Core API"): up to `k`
/// ranked interpretations, or a human-readable failure `message` when
/// none were produced.
#[derive(Debug, Clone)]
pub struct ParseResults {
    pub parse_time: Duration,
    pub trees: Vec<ParseTree>,
    /// Set iff `trees` is empty: `"failed to reach start"` (the
    /// generalized parser never accepted, even after deleting
    /// unrecognized tokens) or `"failed to find legal parse trees"`
    /// (the forest was built but the search rejected every derivation
    /// on semantic legality).
    pub message: Option<String>,
}

/// A resolved grammar paired with its compiled automaton -- the result
/// of spec.md §6's `load_grammar`, bundling both halves `parse` needs
/// (the grammar for semantics/entities/conjugation tables, the state
/// table for the parser proper).
#[derive(Debug, Clone)]
pub struct LoadedGrammar {
    pub grammar: Grammar,
    pub table: StateTable,
}

/// `load_grammar(grammar_blob) -> StateTable` (spec.md §6), widened to
/// return the `Grammar` alongside its `StateTable` since this crate
/// keeps the two as separate types (DESIGN.md: `nlu-core` owns the
/// immutable model, `nlu-compile` owns the construction algorithm) --
/// `parse` below needs both.
pub fn load_grammar(artifact: GrammarArtifact) -> Result<LoadedGrammar, EngineError> {
    let grammar = Grammar::load(artifact)?;
    let table = nlu_compile::build_state_table(&grammar)?;
    Ok(LoadedGrammar { grammar, table })
}

/// Convenience wrapper over [`Grammar::from_json`] + [`load_grammar`]
/// for a freshly-read artifact document (spec.md §6 "Grammar artifact
/// format").
pub fn load_grammar_json(json: &str) -> Result<LoadedGrammar, EngineError> {
    load_grammar(GrammarArtifact::from_json(json)?)
}

/// Split a query string into whitespace-separated tokens, the only
/// tokenization this crate performs itself (spec.md §1: entity
/// tokenization heuristics beyond this are an external collaborator's
/// job; what reaches `parse` is already a short user string).
fn tokenize(input: &str) -> Vec<String> {
    input.split_whitespace().map(str::to_string).collect()
}

/// `parse(state_table, query_string, k) -> ParseResults` (spec.md §6),
/// widened to also take the `Grammar` the state table was built from
/// (see [`LoadedGrammar`]) and the parser/search tuning knobs spec.md
/// §9 asks to keep configurable rather than hardcode.
///
/// Only [`ConjugationError`] (a grammar/data bug, spec.md §7) escapes as
/// an `Err`; every other failure mode (no derivation, no legal tree)
/// comes back as a `ParseResults` with an empty `trees` and a
/// `message`, per spec.md §6 "`parse` never raises for normal 'no
/// parse' outcomes".
pub fn parse(
    grammar: &Grammar,
    table: &StateTable,
    query_string: &str,
    k: usize,
    match_config: &MatchConfig,
    search_config: &SearchConfig,
) -> Result<ParseResults, ConjugationError> {
    let _span = tracing::debug_span!("parse", query = query_string, k).entered();
    let started = std::time::Instant::now();

    let tokens = tokenize(query_string);

    let output = match parser::parse(grammar, table, match_config, &tokens) {
        Ok(output) => output,
        Err(ParseError::FailedToReachStart) => {
            tracing::debug!("failed to reach start");
            return Ok(ParseResults {
                parse_time: started.elapsed(),
                trees: Vec::new(),
                message: Some("failed to reach start".to_string()),
            });
        }
        Err(ParseError::Conjugation(e)) => return Err(e),
    };

    let mut forest = output.forest;
    heuristic::annotate(&mut forest);

    let config = SearchConfig { k, ..*search_config };
    let trees = search::search(grammar, &forest, output.root, output.base_cost, &config)?;

    let message = if trees.is_empty() {
        tracing::debug!("failed to find legal parse trees");
        Some("failed to find legal parse trees".to_string())
    } else {
        None
    };

    Ok(ParseResults { parse_time: started.elapsed(), trees, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use nlu_core::grammar::artifact::{RawRule, RawSemanticFn};
    use nlu_core::{GrammarArtifact, RuleText};

    fn fixture() -> Grammar {
        let mut grammar = IndexMap::new();
        grammar.insert(
            "root".to_string(),
            vec![RawRule {
                rhs: vec!["greeting".to_string(), "name".to_string()],
                cost: 0,
                semantic: Some("greet".to_string()),
                ..Default::default()
            }],
        );
        grammar.insert(
            "greeting".to_string(),
            vec![RawRule {
                is_terminal: true,
                rhs: vec!["hi".to_string()],
                cost: 0,
                text: Some(RuleText::Plain("hi".to_string())),
                ..Default::default()
            }],
        );
        grammar.insert(
            "name".to_string(),
            vec![
                RawRule {
                    is_terminal: true,
                    rhs: vec!["sam".to_string()],
                    cost: 0,
                    text: Some(RuleText::Plain("sam".to_string())),
                    semantic: Some("sam".to_string()),
                    semantic_is_rhs: true,
                    ..Default::default()
                },
                RawRule {
                    is_terminal: true,
                    rhs: vec!["dana".to_string()],
                    cost: 1,
                    text: Some(RuleText::Plain("dana".to_string())),
                    semantic: Some("dana".to_string()),
                    semantic_is_rhs: true,
                    ..Default::default()
                },
            ],
        );
        let mut semantics = IndexMap::new();
        for name in ["greet", "sam", "dana"] {
            semantics.insert(
                name.to_string(),
                RawSemanticFn {
                    name: name.to_string(),
                    cost: 0,
                    min_params: if name == "greet" { 1 } else { 0 },
                    max_params: if name == "greet" { 1 } else { 0 },
                    forbids_multiple: false,
                    is_arg: name != "greet",
                    anaphoric: false,
                },
            );
        }
        Grammar::load(GrammarArtifact {
            grammar,
            semantics,
            start_symbol: "root".to_string(),
            entity_categories: IndexMap::new(),
        })
        .unwrap()
    }

    #[test]
    fn end_to_end_query_returns_ranked_trees() {
        let grammar = fixture();
        let table = nlu_compile::build_state_table(&grammar).unwrap();

        let results = parse(&grammar, &table, "hi sam", 7, &MatchConfig::default(), &SearchConfig::default()).unwrap();

        assert!(results.message.is_none());
        assert_eq!(results.trees.len(), 1);
        assert_eq!(results.trees[0].text, "hi sam");
        assert_eq!(results.trees[0].semantic, "greet(sam)");
    }

    #[test]
    fn prefers_cheaper_of_two_names() {
        let grammar = fixture();
        let table = nlu_compile::build_state_table(&grammar).unwrap();

        let results = parse(&grammar, &table, "hi dana", 7, &MatchConfig::default(), &SearchConfig::default()).unwrap();

        assert_eq!(results.trees.len(), 1);
        assert_eq!(results.trees[0].cost, 1);
    }

    #[test]
    fn unparseable_query_reports_failure_message() {
        let grammar = fixture();
        let table = nlu_compile::build_state_table(&grammar).unwrap();

        let results = parse(&grammar, &table, "goodbye sam", 7, &MatchConfig::default(), &SearchConfig::default()).unwrap();

        assert!(results.trees.is_empty());
        assert_eq!(results.message.as_deref(), Some("failed to reach start"));
    }

    #[test]
    fn k_limits_the_number_of_returned_trees() {
        let grammar = fixture();
        let table = nlu_compile::build_state_table(&grammar).unwrap();

        let results = parse(&grammar, &table, "hi sam", 1, &MatchConfig::default(), &SearchConfig::default()).unwrap();
        assert_eq!(results.trees.len(), 1);
    }
}
