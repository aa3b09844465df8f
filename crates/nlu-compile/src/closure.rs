//! Item-set closure (spec.md §4.1 "Algorithm"): "for every item whose dot
//! precedes a nonterminal X, add the items of every rule producing X with
//! dot at 0", iterated to a fixpoint.
//!
//! Closing over a `BTreeSet<Item>` gives the canonical sorted, deduped
//! item list spec.md §4.1 asks for ("Canonicalize each target item list
//! (sort by the Item ordering above) and deduplicate") as a side effect
//! of the set's own ordering.

use std::collections::{BTreeSet, VecDeque};

use nlu_core::{Grammar, SymbolKind};

use crate::item::Item;
use crate::production::Productions;

pub fn closure(seed: Vec<Item>, grammar: &Grammar, productions: &Productions) -> Vec<Item> {
    let mut set: BTreeSet<Item> = BTreeSet::new();
    let mut worklist: VecDeque<Item> = VecDeque::new();

    for item in seed {
        if set.insert(item.clone()) {
            worklist.push_back(item);
        }
    }

    while let Some(item) = worklist.pop_front() {
        let Some(symbol) = item.symbol_at_dot() else {
            continue;
        };
        if grammar.symbols().get(symbol).kind != SymbolKind::Nonterminal {
            continue;
        }
        for production in productions.for_lhs(symbol) {
            let new_item = Item {
                lhs: Some(symbol),
                dot: 0,
                rhs: production.rhs.clone(),
            };
            if set.insert(new_item.clone()) {
                worklist.push_back(new_item);
            }
        }
    }

    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use nlu_core::{GrammarArtifact, RawRule};

    use super::*;

    fn tiny_grammar() -> Grammar {
        let mut grammar: GrammarArtifact = GrammarArtifact {
            grammar: Default::default(),
            semantics: Default::default(),
            start_symbol: "S".to_string(),
            entity_categories: Default::default(),
        };
        grammar.grammar.insert(
            "S".to_string(),
            vec![RawRule {
                rhs: vec!["a".to_string()],
                cost: 0,
                ..Default::default()
            }],
        );
        grammar.grammar.insert(
            "a".to_string(),
            vec![RawRule {
                is_terminal: true,
                rhs: vec!["a".to_string()],
                cost: 0,
                ..Default::default()
            }],
        );
        Grammar::load(grammar).unwrap()
    }

    #[test]
    fn closure_of_start_item_is_stable_under_repetition() {
        let grammar = tiny_grammar();
        let productions = Productions::build(&grammar);
        let start_symbol = grammar.start_symbol();

        let seed = vec![Item::start(start_symbol)];
        let once = closure(seed.clone(), &grammar, &productions);
        let twice = closure(once.clone(), &grammar, &productions);
        assert_eq!(once, twice);
    }

    #[test]
    fn closure_adds_productions_for_nonterminal_at_dot() {
        let grammar = tiny_grammar();
        let productions = Productions::build(&grammar);
        let start_symbol = grammar.start_symbol();

        let seed = vec![Item::start(start_symbol)];
        let closed = closure(seed, &grammar, &productions);

        // The start item itself, plus S -> . a (closure over S).
        assert_eq!(closed.len(), 2);
        assert!(closed.iter().any(|i| i.lhs == Some(start_symbol) && i.dot == 0));
    }
}
