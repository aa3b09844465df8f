//! Partial-path bookkeeping for the forest search (spec.md §3 "Partial
//! path", §9 DESIGN NOTES "reverse linked lists").
//!
//! `semantic_list`, `next_items`, and `gram_props_list` are all the same
//! shape: a reverse-linked stack where sibling paths share whatever
//! suffix they haven't diverged on yet. [`ConsArena`] is the one
//! persistent-cons-cell arena type backing all three -- paths carry only
//! an `Option<u32>` head handle into it, the same per-query
//! integer-handle discipline as [`crate::forest::Forest`] and
//! [`crate::gss::Gss`].

use nlu_core::{GramProps, RuleText, SemanticFunctionId};

use crate::forest::NodeId;
use crate::semantics::Semantic;

/// Append-only persistent cons-list arena. Cells are never mutated or
/// removed; `splice` rebuilds only the prefix above a spliced cell,
/// leaving everything below (and every other path's view of it) intact.
#[derive(Debug, Clone)]
pub struct ConsArena<T> {
    cells: Vec<Cell<T>>,
}

#[derive(Debug, Clone)]
struct Cell<T> {
    value: T,
    prev: Option<u32>,
}

impl<T> Default for ConsArena<T> {
    fn default() -> Self {
        Self { cells: Vec::new() }
    }
}

impl<T: Clone> ConsArena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, prev: Option<u32>, value: T) -> u32 {
        let id = self.cells.len() as u32;
        self.cells.push(Cell { value, prev });
        id
    }

    pub fn get(&self, id: u32) -> &T {
        &self.cells[id as usize].value
    }

    pub fn prev(&self, id: u32) -> Option<u32> {
        self.cells[id as usize].prev
    }

    /// Every value from `head` down to the tail, most-recent first.
    pub fn collect(&self, head: Option<u32>) -> Vec<T> {
        let mut out = Vec::new();
        let mut cur = head;
        while let Some(id) = cur {
            out.push(self.get(id).clone());
            cur = self.prev(id);
        }
        out
    }

    /// Remove (or replace) the cell at `target` somewhere along the
    /// chain from `head`, rebuilding only the cells above it (spec.md
    /// §9: "Splicing `gram_props_list` ... rebuilds the prefix up to the
    /// spliced cell"). Panics if `target` isn't reachable from `head`.
    pub fn splice(&mut self, head: Option<u32>, target: u32, replacement: Option<T>) -> Option<u32> {
        let mut chain = Vec::new();
        let mut cur = head;
        while let Some(id) = cur {
            chain.push(id);
            if id == target {
                break;
            }
            cur = self.prev(id);
        }
        assert_eq!(chain.last().copied(), Some(target), "splice target not reachable from head");

        let mut new_prev = self.prev(target);
        if let Some(value) = replacement {
            new_prev = Some(self.push(new_prev, value));
        }
        for &id in chain[..chain.len() - 1].iter().rev() {
            let value = self.get(id).clone();
            new_prev = Some(self.push(new_prev, value));
        }
        new_prev
    }
}

/// One frame of `semantic_list` (spec.md §3): a function waiting for its
/// RHS to materialize, or an already-reduced RHS array waiting to be
/// consumed by an ancestor pending LHS.
#[derive(Debug, Clone)]
pub enum SemanticFrame {
    PendingLhs {
        function: SemanticFunctionId,
        /// `next_nodes_count` captured when this frame was pushed; the
        /// frame is eligible to reduce once the current count drops to
        /// or below this value (spec.md §3 invariant).
        captured_next_nodes_count: u32,
    },
    MaterializedRhs(Vec<Semantic>),
}

/// One frame of `next_items` (spec.md §3): either a binary rule's
/// deferred second child, or an insertion rule's own text/gram_props
/// waiting for its real child to finish first.
#[derive(Debug, Clone)]
pub enum NextItem {
    Node {
        node: NodeId,
        can_produce_semantic: bool,
    },
    Text {
        text: Option<RuleText>,
        gram_props: Option<GramProps>,
    },
}

impl NextItem {
    pub fn can_produce_semantic(&self) -> bool {
        matches!(self, NextItem::Node { can_produce_semantic: true, .. })
    }
}

/// The three cons-list arenas shared by every path in one `parse` call.
#[derive(Debug, Clone, Default)]
pub struct Arenas {
    pub semantics: ConsArena<SemanticFrame>,
    pub next_items: ConsArena<NextItem>,
    pub gram_props: ConsArena<GramProps>,
}

/// A single in-progress candidate tree (spec.md §3 "Partial path").
#[derive(Debug, Clone)]
pub struct Path {
    pub cur_node: Option<NodeId>,
    pub next_items: Option<u32>,
    pub next_nodes_count: u32,
    pub semantic_list: Option<u32>,
    pub text: String,
    pub gram_props_list: Option<u32>,
    pub cost_so_far: i32,
    pub cost: i32,
}

impl Path {
    pub fn start(root: NodeId) -> Self {
        Self {
            cur_node: Some(root),
            next_items: None,
            next_nodes_count: 0,
            semantic_list: None,
            text: String::new(),
            gram_props_list: None,
            cost_so_far: 0,
            cost: 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.cur_node.is_none() && self.next_items.is_none()
    }

    /// spec.md §4.5 invariant, §8 property 5 ("semantic_list.isRHS ==
    /// true and prev == nil"): a structurally complete path is only
    /// acceptable once its `semantic_list` carries no dangling
    /// `PendingLhs` frame -- either nothing at all, or exactly one
    /// already-reduced `MaterializedRhs` at the head.
    pub fn is_semantically_complete(&self, arena: &ConsArena<SemanticFrame>) -> bool {
        match self.semantic_list {
            None => true,
            Some(id) => matches!(arena.get(id), SemanticFrame::MaterializedRhs(_)) && arena.prev(id).is_none(),
        }
    }
}

/// Append `piece` to `text`, trimming leading space so the display text
/// starts clean (spec.md §4.6 "leading space trimmed").
pub fn append_text(text: &mut String, piece: &str) {
    if piece.is_empty() {
        return;
    }
    if !text.is_empty() {
        text.push(' ');
    }
    text.push_str(piece);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splice_removes_middle_cell_and_preserves_tail() {
        let mut arena: ConsArena<i32> = ConsArena::new();
        let a = arena.push(None, 1);
        let b = arena.push(Some(a), 2);
        let c = arena.push(Some(b), 3);

        let new_head = arena.splice(Some(c), b, None);
        assert_eq!(arena.collect(new_head), vec![3, 1]);
    }

    #[test]
    fn splice_can_replace_with_new_value() {
        let mut arena: ConsArena<i32> = ConsArena::new();
        let a = arena.push(None, 1);
        let b = arena.push(Some(a), 2);

        let new_head = arena.splice(Some(b), b, Some(20));
        assert_eq!(arena.collect(new_head), vec![20, 1]);
    }

    #[test]
    fn splice_at_head_is_just_popping() {
        let mut arena: ConsArena<i32> = ConsArena::new();
        let a = arena.push(None, 1);
        let b = arena.push(Some(a), 2);

        let new_head = arena.splice(Some(b), b, None);
        assert_eq!(arena.collect(new_head), vec![1]);
    }

    #[test]
    fn sibling_paths_share_untouched_suffix() {
        let mut arena: ConsArena<i32> = ConsArena::new();
        let a = arena.push(None, 1);
        let b1 = arena.push(Some(a), 2);
        let b2 = arena.push(Some(a), 3);

        assert_eq!(arena.collect(Some(b1)), vec![2, 1]);
        assert_eq!(arena.collect(Some(b2)), vec![3, 1]);
    }

    #[test]
    fn append_text_trims_and_joins_with_single_space() {
        let mut text = String::new();
        append_text(&mut text, "");
        append_text(&mut text, "repos");
        append_text(&mut text, "I");
        append_text(&mut text, "like");
        assert_eq!(text, "repos I like");
    }
}
