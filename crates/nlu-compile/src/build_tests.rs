use indexmap::IndexMap;
use nlu_core::{Grammar, GrammarArtifact, RawRule, RawSemanticFn, RuleAction};

use super::build_state_table;

/// `root -> greeting name` | `greeting -> "hi"` | `name -> "sam"`.
/// A tiny binary grammar exercising shift/reduce over two terminals.
fn binary_grammar() -> Grammar {
    let mut grammar = IndexMap::new();
    grammar.insert(
        "root".to_string(),
        vec![RawRule {
            rhs: vec!["greeting".to_string(), "name".to_string()],
            cost: 0,
            ..Default::default()
        }],
    );
    grammar.insert(
        "greeting".to_string(),
        vec![RawRule {
            is_terminal: true,
            rhs: vec!["hi".to_string()],
            cost: 0,
            ..Default::default()
        }],
    );
    grammar.insert(
        "name".to_string(),
        vec![RawRule {
            is_terminal: true,
            rhs: vec!["sam".to_string()],
            cost: 0,
            ..Default::default()
        }],
    );

    Grammar::load(GrammarArtifact {
        grammar,
        semantics: IndexMap::new(),
        start_symbol: "root".to_string(),
        entity_categories: IndexMap::new(),
    })
    .expect("grammar resolves")
}

#[test]
fn empty_start_symbol_rejected() {
    let mut grammar = IndexMap::new();
    grammar.insert(
        "root".to_string(),
        vec![RawRule {
            is_terminal: true,
            rhs: vec!["noop".to_string()],
            cost: 0,
            ..Default::default()
        }],
    );
    let grammar = Grammar::load(GrammarArtifact {
        grammar,
        semantics: IndexMap::new(),
        start_symbol: "root".to_string(),
        entity_categories: IndexMap::new(),
    })
    .unwrap();

    let err = build_state_table(&grammar).unwrap_err();
    assert!(matches!(
        err,
        crate::error::BuildError::EmptyStartSymbol(_)
    ));
}

#[test]
fn binary_grammar_builds_a_reachable_accepting_path() {
    let grammar = binary_grammar();
    let table = build_state_table(&grammar).expect("builds");

    let greeting_atom = grammar.interner().get("hi").unwrap();
    let name_atom = grammar.interner().get("sam").unwrap();
    let greeting_sym = grammar.symbols().lookup(greeting_atom).unwrap();
    let name_sym = grammar.symbols().lookup(name_atom).unwrap();

    let greeting_nt = grammar
        .symbols()
        .lookup(grammar.interner().get("greeting").unwrap())
        .unwrap();
    let name_nt = grammar
        .symbols()
        .lookup(grammar.interner().get("name").unwrap())
        .unwrap();
    let root = grammar.start_symbol();

    // Walk: shift "hi" terminal -> reduce to `greeting` nonterminal shift
    // -> shift "sam" terminal -> reduce to `name` nonterminal shift ->
    // accept.
    let start = table.get(table.start_state());
    let after_hi = start.shift_for(greeting_sym).expect("shifts on `hi` terminal");

    let state_after_hi = table.get(after_hi);
    assert!(
        state_after_hi
            .reductions
            .iter()
            .any(|r| r.lhs == greeting_nt),
        "completing `hi` should reduce to `greeting`"
    );

    let after_greeting = start
        .shift_for(greeting_nt)
        .expect("root's kernel shifts on the `greeting` nonterminal too");
    let state_after_greeting = table.get(after_greeting);
    let after_sam = state_after_greeting
        .shift_for(name_sym)
        .expect("shifts on `sam` terminal");
    let state_after_sam = table.get(after_sam);
    assert!(state_after_sam.reductions.iter().any(|r| r.lhs == name_nt));

    let after_name = state_after_greeting
        .shift_for(name_nt)
        .expect("shifts on the `name` nonterminal");
    let final_state = table.get(after_name);
    assert!(final_state.is_final, "root -> greeting name should accept");
}

#[test]
fn rules_sharing_lhs_and_rhs_collapse_into_one_multi_action() {
    let mut grammar = IndexMap::new();
    // Two insertion-edit variants of `root -> word`: same shape, different
    // cost/text, modeling spec.md §3's collapsed-insertion-rule case.
    grammar.insert(
        "root".to_string(),
        vec![
            RawRule {
                rhs: vec!["word".to_string()],
                cost: 0,
                semantic: Some("noop".to_string()),
                ..Default::default()
            },
            RawRule {
                rhs: vec!["word".to_string()],
                cost: 2,
                semantic: Some("noop".to_string()),
                insertion_index: Some(1),
                ..Default::default()
            },
        ],
    );
    grammar.insert(
        "word".to_string(),
        vec![RawRule {
            is_terminal: true,
            rhs: vec!["hello".to_string()],
            cost: 0,
            ..Default::default()
        }],
    );
    let mut semantics = IndexMap::new();
    semantics.insert(
        "noop".to_string(),
        RawSemanticFn {
            name: "noop".to_string(),
            cost: 0,
            min_params: 0,
            max_params: 1,
            forbids_multiple: false,
            is_arg: false,
            anaphoric: false,
        },
    );

    let grammar = Grammar::load(GrammarArtifact {
        grammar,
        semantics,
        start_symbol: "root".to_string(),
        entity_categories: IndexMap::new(),
    })
    .unwrap();

    let table = build_state_table(&grammar).expect("builds");
    let word_sym = grammar
        .symbols()
        .lookup(grammar.interner().get("word").unwrap())
        .unwrap();

    let start = table.get(table.start_state());
    let after_word = start.shift_for(word_sym).expect("root shifts on `word`");
    let final_state = table.get(after_word);
    assert!(final_state.is_final);

    let root_reduction = table
        .iter()
        .flat_map(|(_, s)| &s.reductions)
        .find(|r| r.rhs == [word_sym])
        .expect("root -> word reduction exists somewhere in the table");
    match &root_reduction.action {
        RuleAction::Multi(props) => {
            assert_eq!(props.len(), 2);
            // Sorted by increasing cost.
            assert!(props[0].cost <= props[1].cost);
        }
        RuleAction::Single(_) => panic!("two rules sharing (lhs, rhs) should collapse to Multi"),
    }
}
