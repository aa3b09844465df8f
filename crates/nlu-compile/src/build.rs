//! The state-table builder proper (spec.md §4.1).
//!
//! Constructs LR(0) item sets seeded by the augmented start item,
//! computing shift targets and reductions per state until the worklist
//! of discovered states drains. States are deduped structurally: two
//! kernels whose closures produce identical canonical item lists are
//! the same state.

use std::collections::{HashMap, VecDeque};

use indexmap::IndexMap;
use nlu_core::{Grammar, RuleAction, RuleId, Reduction, Shift, State, StateId, StateTable};

use crate::closure::closure;
use crate::error::BuildError;
use crate::item::Item;
use crate::production::{Production, Productions};

/// Compile `grammar` into its LR(0)-style automaton (spec.md §4.1
/// "Output"). The returned table retains only what the parser and
/// search need; nonterminal bookkeeping (items, productions) is dropped
/// once construction completes.
pub fn build_state_table(grammar: &Grammar) -> Result<StateTable, BuildError> {
    let start_symbol = grammar.start_symbol();
    if grammar.rules_for(start_symbol).next().is_none() {
        let name = grammar
            .interner()
            .resolve(grammar.symbols().get(start_symbol).name)
            .to_string();
        return Err(BuildError::EmptyStartSymbol(name));
    }

    let productions = Productions::build(grammar);
    let _span = tracing::debug_span!("build_state_table", rule_count = grammar.rule_count()).entered();

    let mut states: Vec<State> = Vec::new();
    let mut item_sets: Vec<Vec<Item>> = Vec::new();
    let mut index: HashMap<Vec<Item>, StateId> = HashMap::new();

    let start_closed = closure(vec![Item::start(start_symbol)], grammar, &productions);
    let start_id = intern_state(start_closed, &mut states, &mut item_sets, &mut index);

    let mut worklist: VecDeque<StateId> = VecDeque::from([start_id]);
    let mut done: Vec<bool> = vec![false];

    while let Some(state_id) = worklist.pop_front() {
        let idx = state_id.as_u32() as usize;
        if done[idx] {
            continue;
        }
        done[idx] = true;

        let items = item_sets[idx].clone();
        tracing::trace!(state = idx, items = items.len(), "closing state");

        // Group kernel successors by the symbol immediately right of the
        // dot; each group's closure is a shift target (spec.md §4.1:
        // "Group items by the symbol immediately right of the dot").
        let mut groups: IndexMap<nlu_core::SymbolId, Vec<Item>> = IndexMap::new();
        for item in &items {
            if let Some(symbol) = item.symbol_at_dot() {
                groups.entry(symbol).or_default().push(item.advance());
            }
        }

        let mut shifts = Vec::with_capacity(groups.len());
        for (symbol, kernel) in groups {
            let closed = closure(kernel, grammar, &productions);
            let target = intern_state(closed, &mut states, &mut item_sets, &mut index);
            if done.len() <= target.as_u32() as usize {
                done.resize(target.as_u32() as usize + 1, false);
            }
            shifts.push(Shift { symbol, target });
            worklist.push_back(target);
        }

        let mut reductions = Vec::new();
        let mut is_final = false;
        for item in &items {
            if !item.at_end() {
                continue;
            }
            match item.lhs {
                None => is_final = true,
                Some(lhs) => {
                    let production = productions
                        .lookup(lhs, &item.rhs)
                        .expect("completed item always came from a production");
                    reductions.push(build_reduction(grammar, production));
                }
            }
        }

        let state = &mut states[idx];
        state.shifts = shifts;
        state.reductions = reductions;
        state.is_final = is_final;
    }

    tracing::debug!(state_count = states.len(), "state table built");
    Ok(StateTable::new(states, start_id))
}

fn build_reduction(grammar: &Grammar, production: &Production) -> Reduction {
    let action = collapse_rule_ids(grammar, &production.rule_ids);
    Reduction {
        lhs: production.lhs,
        rhs: production.rhs.clone(),
        is_binary: production.rhs.len() == 2,
        action,
    }
}

/// Collapse one or more rules sharing a `(lhs, rhs)` shape into a single
/// `RuleAction`, already sorted by increasing cost by `Productions::build`.
fn collapse_rule_ids(grammar: &Grammar, rule_ids: &[RuleId]) -> RuleAction {
    if let [only] = rule_ids {
        return RuleAction::Single(grammar.rule(*only).props.clone());
    }
    RuleAction::Multi(rule_ids.iter().map(|&id| grammar.rule(id).props.clone()).collect())
}

/// Get-or-create the state for `closed` (a canonical, already-closed item
/// set). New states are inserted with empty shifts/reductions, filled in
/// once popped from the worklist.
fn intern_state(
    closed: Vec<Item>,
    states: &mut Vec<State>,
    item_sets: &mut Vec<Vec<Item>>,
    index: &mut HashMap<Vec<Item>, StateId>,
) -> StateId {
    if let Some(&id) = index.get(&closed) {
        return id;
    }
    let id = StateId::from_raw(states.len() as u32);
    states.push(State::default());
    item_sets.push(closed.clone());
    index.insert(closed, id);
    id
}
