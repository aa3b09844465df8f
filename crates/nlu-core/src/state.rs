//! The compiled automaton: states, their shifts and reductions.
//!
//! Built by `nlu-compile`, but the types live here because `nlu-engine`
//! needs to read them directly without depending on the builder.

use crate::rule::RuleProps;
use crate::symbol::SymbolId;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct StateId(u32);

impl StateId {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }
}

/// Collapsed multi-insertion rules carry an ordered list of `RuleProps`
/// instead of one (spec.md §3, §9 DESIGN NOTES). The search iterates the
/// list and forks a path per element when there is more than one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleAction {
    Single(RuleProps),
    Multi(Vec<RuleProps>),
}

impl RuleAction {
    pub fn iter(&self) -> impl Iterator<Item = &RuleProps> {
        match self {
            RuleAction::Single(p) => std::slice::from_ref(p).iter(),
            RuleAction::Multi(ps) => ps.iter(),
        }
    }
}

/// A completed item: recognizing `rhs` under `lhs` wraps the children
/// into a parent node, carrying `action`'s rule properties.
#[derive(Debug, Clone)]
pub struct Reduction {
    pub lhs: SymbolId,
    pub rhs: Vec<SymbolId>,
    pub action: RuleAction,
    pub is_binary: bool,
}

/// Advancing past `symbol` moves to `target`.
#[derive(Debug, Clone, Copy)]
pub struct Shift {
    pub symbol: SymbolId,
    pub target: StateId,
}

/// One automaton state: possibly final, with its reductions and shifts.
#[derive(Debug, Clone, Default)]
pub struct State {
    pub is_final: bool,
    pub reductions: Vec<Reduction>,
    pub shifts: Vec<Shift>,
}

impl State {
    pub fn shift_for(&self, symbol: SymbolId) -> Option<StateId> {
        self.shifts
            .iter()
            .find(|s| s.symbol == symbol)
            .map(|s| s.target)
    }
}

/// The compiled LR(0)-style automaton (spec.md §4.1 output).
#[derive(Debug, Clone)]
pub struct StateTable {
    states: Vec<State>,
    start: StateId,
}

impl StateTable {
    pub fn new(states: Vec<State>, start: StateId) -> Self {
        Self { states, start }
    }

    pub fn get(&self, id: StateId) -> &State {
        &self.states[id.0 as usize]
    }

    pub fn start_state(&self) -> StateId {
        self.start
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateId, &State)> {
        self.states
            .iter()
            .enumerate()
            .map(|(i, s)| (StateId(i as u32), s))
    }
}
