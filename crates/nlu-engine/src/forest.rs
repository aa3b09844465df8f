//! Shared packed parse forest (spec.md §2 component 4, §3 "SPPF Node").
//!
//! A per-query arena: nodes are referenced by `NodeId`, an index into a
//! `Vec`, never by pointer (spec.md §9 DESIGN NOTES: "use arena
//! allocation with integer handles"). A node's identity is the triple
//! `(symbol, start, size)`; `Forest::get_or_create` enforces that a node
//! exists at most once for a given triple, which is also what makes a
//! grammar's cyclic nonterminal rules safe (spec.md §9: "a cycle at the
//! same span would re-enter an existing node").

use std::collections::HashMap;

use nlu_core::{RuleAction, SymbolId};

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// One way to derive a node. `first`/`next` are `None` for a terminal
/// leaf (no children); `next` is set only for a binary rule's second
/// child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubAlt {
    pub first: Option<NodeId>,
    pub next: Option<NodeId>,
    pub action: RuleAction,
    /// Runtime text/semantic override for matches with no fixed surface
    /// form in the grammar -- the `<int>` placeholder's literal digits,
    /// or an entity match's canonical display name (spec.md §4.2, §6).
    /// Distinguishes, e.g., two different fuzzy entity matches spanning
    /// the same tokens as separate sub-alternatives rather than
    /// collapsing them.
    pub literal_override: Option<String>,
    /// Set by the heuristic-cost annotator (spec.md §4.3): rule cost plus
    /// the `min_cost` of every child. `None` for a collapsed `Multi`
    /// action until the search expands it per-element.
    pub min_cost: Option<i32>,
}

impl SubAlt {
    pub fn leaf(action: RuleAction) -> Self {
        Self {
            first: None,
            next: None,
            action,
            literal_override: None,
            min_cost: None,
        }
    }

    pub fn leaf_with_literal(action: RuleAction, literal: String) -> Self {
        Self {
            first: None,
            next: None,
            action,
            literal_override: Some(literal),
            min_cost: None,
        }
    }

    pub fn unary(first: NodeId, action: RuleAction) -> Self {
        Self {
            first: Some(first),
            next: None,
            action,
            literal_override: None,
            min_cost: None,
        }
    }

    pub fn binary(first: NodeId, next: NodeId, action: RuleAction) -> Self {
        Self {
            first: Some(first),
            next: Some(next),
            action,
            literal_override: None,
            min_cost: None,
        }
    }

    /// The cheapest `RuleProps` this sub can apply (spec.md §9: "the
    /// search iterates the list and forks paths per element" -- but the
    /// heuristic annotator only needs a lower bound, so the cheapest
    /// element suffices there).
    pub fn cheapest_cost(&self) -> i32 {
        match &self.action {
            RuleAction::Single(props) => props.cost,
            RuleAction::Multi(all) => all.iter().map(|p| p.cost).min().unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub symbol: SymbolId,
    pub start: u32,
    pub size: u32,
    pub alts: Vec<SubAlt>,
    pub min_cost: Option<i32>,
}

/// Per-query SPPF arena.
#[derive(Debug, Default)]
pub struct Forest {
    nodes: Vec<Node>,
    index: HashMap<(SymbolId, u32, u32), NodeId>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&mut self, symbol: SymbolId, start: u32, size: u32) -> NodeId {
        if let Some(&id) = self.index.get(&(symbol, start, size)) {
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            symbol,
            start,
            size,
            alts: Vec::new(),
            min_cost: None,
        });
        self.index.insert((symbol, start, size), id);
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    /// Add a sub-alternative to `node`, deduping by structural identity
    /// (spec.md §4.2 "Deduplicate created sub-alternatives by structural
    /// identity within the same node").
    pub fn add_sub(&mut self, node: NodeId, sub: SubAlt) {
        let n = &mut self.nodes[node.0 as usize];
        if !n.alts.contains(&sub) {
            n.alts.push(sub);
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i as u32), n))
    }
}
