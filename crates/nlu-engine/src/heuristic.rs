//! Heuristic-cost annotator (spec.md §2 component 5, §4.3).
//!
//! A single post-order traversal over the forest assigns every node a
//! `min_cost`: an admissible lower bound on the cost of the cheapest
//! completion through that node. This is what lets the forest search
//! (§4.4) run as A* rather than plain best-first-without-a-bound.
//!
//! Admissibility holds because every sub-alternative's cost is the rule
//! cost plus the (already-admissible) `min_cost` of its children, and
//! all costs are non-negative -- the minimum over sub-alternatives can
//! never exceed the true cheapest derivation.

use crate::forest::{Forest, NodeId};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Annotate every node and sub-alternative in `forest` with its
/// `min_cost`, in place.
///
/// A grammar may contain a costly cyclic rule (`S -> S` at nonzero cost;
/// the zero-cost case is rejected at grammar load, spec.md §7); the SPPF
/// then has a node whose own sub-alternative recurses back into itself.
/// Such a sub-alternative can never be part of a finite derivation, so
/// it's excluded from the node's `min_cost` rather than followed forever
/// (spec.md §9: node identity on `(symbol, start, size)` is what makes
/// cyclic rules safe to represent at all; this is what makes them safe
/// to *cost*).
pub fn annotate(forest: &mut Forest) {
    let ids: Vec<NodeId> = forest.iter().map(|(id, _)| id).collect();
    let mut mark = vec![Mark::Unvisited; ids.len()];
    let mut node_cost: Vec<i32> = vec![i32::MAX; ids.len()];
    let mut sub_cost: Vec<Vec<i32>> = ids
        .iter()
        .map(|&id| vec![i32::MAX; forest.node(id).alts.len()])
        .collect();

    for &id in &ids {
        compute(forest, id, &mut mark, &mut node_cost, &mut sub_cost);
    }

    for &id in &ids {
        let idx = id.as_u32() as usize;
        let costs = std::mem::take(&mut sub_cost[idx]);
        let node = forest.node_mut(id);
        for (alt, cost) in node.alts.iter_mut().zip(costs) {
            alt.min_cost = if cost == i32::MAX { None } else { Some(cost) };
        }
        node.min_cost = if node_cost[idx] == i32::MAX {
            None
        } else {
            Some(node_cost[idx])
        };
    }
}

fn compute(
    forest: &Forest,
    id: NodeId,
    mark: &mut [Mark],
    node_cost: &mut [i32],
    sub_cost: &mut [Vec<i32>],
) -> i32 {
    let idx = id.as_u32() as usize;
    match mark[idx] {
        Mark::Done => return node_cost[idx],
        // A self-referential (or mutually cyclic) dependency: treat as
        // unreachable for costing purposes rather than recursing forever.
        Mark::InProgress => return i32::MAX,
        Mark::Unvisited => {}
    }
    mark[idx] = Mark::InProgress;

    let node = forest.node(id);
    let mut best = i32::MAX;
    for (alt_idx, alt) in node.alts.iter().enumerate() {
        let mut total: i64 = alt.cheapest_cost() as i64;
        let mut reachable = true;

        for child in [alt.first, alt.next].into_iter().flatten() {
            let c = compute(forest, child, mark, node_cost, sub_cost);
            if c == i32::MAX {
                reachable = false;
                break;
            }
            total += c as i64;
        }

        let capped = if reachable { total.min(i32::MAX as i64) as i32 } else { i32::MAX };
        sub_cost[idx][alt_idx] = capped;
        best = best.min(capped);
    }

    mark[idx] = Mark::Done;
    node_cost[idx] = best;
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::SubAlt;
    use nlu_core::{RuleAction, RuleProps, SymbolId};

    fn sym(n: u32) -> SymbolId {
        SymbolId::from_raw(n)
    }

    fn props(cost: i32) -> RuleProps {
        RuleProps { cost, ..Default::default() }
    }

    #[test]
    fn terminal_leaf_inherits_rule_cost() {
        let mut forest = Forest::new();
        let leaf = forest.get_or_create(sym(0), 0, 1);
        forest.add_sub(leaf, SubAlt::leaf(RuleAction::Single(props(3))));

        annotate(&mut forest);
        assert_eq!(forest.node(leaf).min_cost, Some(3));
    }

    #[test]
    fn unary_node_cost_includes_child_cost() {
        let mut forest = Forest::new();
        let leaf = forest.get_or_create(sym(0), 0, 1);
        forest.add_sub(leaf, SubAlt::leaf(RuleAction::Single(props(3))));
        let parent = forest.get_or_create(sym(1), 0, 1);
        forest.add_sub(parent, SubAlt::unary(leaf, RuleAction::Single(props(2))));

        annotate(&mut forest);
        assert_eq!(forest.node(parent).min_cost, Some(5));
    }

    #[test]
    fn binary_node_sums_both_children() {
        let mut forest = Forest::new();
        let left = forest.get_or_create(sym(0), 0, 1);
        forest.add_sub(left, SubAlt::leaf(RuleAction::Single(props(1))));
        let right = forest.get_or_create(sym(1), 1, 1);
        forest.add_sub(right, SubAlt::leaf(RuleAction::Single(props(4))));
        let parent = forest.get_or_create(sym(2), 0, 2);
        forest.add_sub(parent, SubAlt::binary(left, right, RuleAction::Single(props(1))));

        annotate(&mut forest);
        assert_eq!(forest.node(parent).min_cost, Some(6));
    }

    #[test]
    fn cheapest_of_several_subs_wins() {
        let mut forest = Forest::new();
        let leaf = forest.get_or_create(sym(0), 0, 1);
        forest.add_sub(leaf, SubAlt::leaf(RuleAction::Single(props(0))));
        let node = forest.get_or_create(sym(1), 0, 1);
        forest.add_sub(node, SubAlt::unary(leaf, RuleAction::Single(props(9))));
        forest.add_sub(node, SubAlt::unary(leaf, RuleAction::Single(props(2))));

        annotate(&mut forest);
        assert_eq!(forest.node(node).min_cost, Some(2));
    }

    #[test]
    fn self_referential_sub_is_excluded_rather_than_looping() {
        let mut forest = Forest::new();
        // A node whose only route to itself is through itself (a costly
        // cyclic rule) -- construct by hand since the normal reduction
        // path can't actually produce this (parser never shifts a
        // not-yet-built node into its own sub).
        let node = forest.get_or_create(sym(0), 0, 1);
        forest.add_sub(node, SubAlt::unary(node, RuleAction::Single(props(5))));

        annotate(&mut forest);
        assert_eq!(forest.node(node).min_cost, None);
    }
}
