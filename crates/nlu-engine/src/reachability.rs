//! Precomputed "can this symbol's derivation ever contribute a semantic"
//! flag (spec.md §3 `next_items`: "each item also records whether its
//! node can still produce a semantic").
//!
//! This only affects *when* a deferred binary-rule second child bumps
//! `next_nodes_count` -- it's a scheduling hint for pending-LHS
//! eligibility, not a legality check, so an over-approximation (a symbol
//! marked `true` that happens not to contribute one on a given
//! derivation) is harmless; it only delays eligibility by one step.
//! Computed once via the same closure-to-fixpoint idiom `nlu-compile`
//! uses for item sets.

use std::collections::HashMap;

use nlu_core::{Grammar, RuleRhs, SymbolId};

pub fn compute(grammar: &Grammar) -> HashMap<SymbolId, bool> {
    let mut result: HashMap<SymbolId, bool> = grammar.symbols().iter().map(|(id, _)| (id, false)).collect();

    let mut changed = true;
    while changed {
        changed = false;
        for (symbol, _) in grammar.symbols().iter() {
            if result[&symbol] {
                continue;
            }
            let produces = grammar.rules_for(symbol).any(|(_, rule)| {
                let props = &rule.props;
                if props.semantic.is_some() || props.inserted_semantic.is_some() {
                    return true;
                }
                match &rule.rhs {
                    RuleRhs::Symbols(children) => children.iter().any(|c| result[c]),
                    RuleRhs::Literal(_) => false,
                }
            });
            if produces {
                result.insert(symbol, true);
                changed = true;
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use nlu_core::{GrammarArtifact, RawRule, RawSemanticFn};

    fn fixture() -> Grammar {
        let mut grammar = IndexMap::new();
        grammar.insert(
            "root".to_string(),
            vec![RawRule {
                rhs: vec!["phrase".to_string()],
                cost: 0,
                ..Default::default()
            }],
        );
        grammar.insert(
            "phrase".to_string(),
            vec![RawRule {
                rhs: vec!["word".to_string()],
                cost: 0,
                semantic: Some("me".to_string()),
                ..Default::default()
            }],
        );
        grammar.insert(
            "word".to_string(),
            vec![RawRule {
                is_terminal: true,
                rhs: vec!["me".to_string()],
                cost: 0,
                ..Default::default()
            }],
        );
        grammar.insert(
            "silent".to_string(),
            vec![RawRule {
                is_terminal: true,
                rhs: vec!["the".to_string()],
                cost: 0,
                ..Default::default()
            }],
        );

        let mut semantics = IndexMap::new();
        semantics.insert(
            "me".to_string(),
            RawSemanticFn {
                name: "me".to_string(),
                cost: 0,
                min_params: 0,
                max_params: 0,
                forbids_multiple: false,
                is_arg: true,
                anaphoric: true,
            },
        );

        Grammar::load(GrammarArtifact {
            grammar,
            semantics,
            start_symbol: "root".to_string(),
            entity_categories: IndexMap::new(),
        })
        .unwrap()
    }

    #[test]
    fn semantic_flows_up_through_intermediate_symbols() {
        let grammar = fixture();
        let flags = compute(&grammar);

        let root = grammar.symbols().lookup(grammar.interner().get("root").unwrap()).unwrap();
        let phrase = grammar.symbols().lookup(grammar.interner().get("phrase").unwrap()).unwrap();
        let silent = grammar.symbols().lookup(grammar.interner().get("silent").unwrap()).unwrap();

        assert_eq!(flags[&root], true);
        assert_eq!(flags[&phrase], true);
        assert_eq!(flags[&silent], false);
    }
}
