//! The generalized (Tomita/GLR-style) parser (spec.md §2 component 4,
//! §4.2): drives the GSS and forest from a compiled [`StateTable`] and
//! the raw token stream, producing a packed shared parse forest rooted
//! at the grammar's start symbol.
//!
//! Per position: a reduce-to-fixpoint pass (a worklist of GSS vertices,
//! since one reduction's new edge can expose further reductions at the
//! same position), then a shift pass using [`crate::matcher`]. Because
//! matches can span more than one token (multi-word literals, entity
//! aliases), the outer loop advances over token *positions* rather than
//! driving the shift phase itself forward -- a vertex landing at
//! position `q > p + 1` is simply picked up on a later iteration.
//!
//! Deletion recovery (spec.md §4.2, §9 "Open questions: the deletion
//! cost model"): if a position is reached where no active vertex can
//! shift anything, this is a simplification of full interleaved-deletion
//! GLR recovery -- the offending token is stripped from the input
//! entirely and the whole parse is retried with a flat additive
//! `deletion_cost` per removed token, rather than forking a
//! deletion-branch alongside every other alternative at that position.
//! See DESIGN.md for the rationale.

use std::collections::VecDeque;

use nlu_core::{Grammar, RuleAction, StateTable};

use crate::forest::{Forest, NodeId, SubAlt};
use crate::gss::{Gss, VertexId};
use crate::matcher::{self, Match, MatchConfig};

pub struct ParseOutput {
    pub forest: Forest,
    pub gss: Gss,
    pub root: NodeId,
    /// Total deletion penalty accrued stripping unrecognized tokens,
    /// charged into every path's starting cost.
    pub base_cost: i32,
}

enum ParseFailure {
    /// No active vertex could shift anything at this token position.
    Stuck { position: usize },
    /// The whole input was consumed but no vertex in a final state was
    /// reached.
    NoAccept,
}

/// Parse `tokens` against `grammar`/`table`, deleting unrecognized
/// tokens as needed. Fails only when no derivation reaches the start
/// symbol even after every unrecognized token has been stripped.
pub fn parse(grammar: &Grammar, table: &StateTable, config: &MatchConfig, tokens: &[String]) -> Result<ParseOutput, crate::error::ParseError> {
    let mut working: Vec<String> = tokens.to_vec();
    let mut deleted = 0usize;

    loop {
        match parse_once(grammar, table, config, &working) {
            Ok((forest, gss, root)) => {
                return Ok(ParseOutput {
                    forest,
                    gss,
                    root,
                    base_cost: deleted as i32 * config.deletion_cost,
                });
            }
            Err(ParseFailure::Stuck { position }) if position < working.len() => {
                working.remove(position);
                deleted += 1;
            }
            Err(_) => return Err(crate::error::ParseError::FailedToReachStart),
        }
    }
}

fn parse_once(
    grammar: &Grammar,
    table: &StateTable,
    config: &MatchConfig,
    tokens: &[String],
) -> Result<(Forest, Gss, NodeId), ParseFailure> {
    let mut forest = Forest::new();
    let mut gss = Gss::new();

    gss.get_or_create_vertex(table.start_state(), 0);
    reduce_fixpoint(&mut gss, &mut forest, table, 0);

    for p in 0..tokens.len() {
        // A position can legitimately have no active vertices here: a
        // multi-token shift from an earlier position may have jumped
        // straight over it. Only a position that has vertices sitting
        // at it, none of which can shift anything, is genuinely stuck.
        let active: Vec<VertexId> = gss.vertices_at(p as u32).collect();
        if active.is_empty() {
            continue;
        }

        let matches = matcher::matches_at(grammar, config, tokens, p);
        let mut shifted_any = false;
        for &v in &active {
            let state = table.get(gss.vertex(v).state);
            for m in &matches {
                if let Some(target_state) = state.shift_for(m.symbol()) {
                    let leaf = shift_leaf(&mut forest, grammar, p as u32, m);
                    let end = p as u32 + m.size();
                    let target = gss.get_or_create_vertex(target_state, end);
                    gss.add_edge(target, v, leaf);
                    shifted_any = true;
                }
            }
        }
        if !shifted_any {
            return Err(ParseFailure::Stuck { position: p });
        }

        reduce_fixpoint(&mut gss, &mut forest, table, p as u32 + 1);
    }

    let final_pos = tokens.len() as u32;
    let root = gss
        .vertices_at(final_pos)
        .find(|&v| table.get(gss.vertex(v).state).is_final)
        .and_then(|v| gss.vertex(v).z_nodes.first().map(|&z| gss.z_node(z).node));

    root.map(|root| (forest, gss, root)).ok_or(ParseFailure::NoAccept)
}

fn shift_leaf(forest: &mut Forest, grammar: &Grammar, position: u32, m: &Match) -> NodeId {
    let node = forest.get_or_create(m.symbol(), position, m.size());
    match m {
        Match::Literal { rule, .. } => {
            let props = grammar.rule(*rule).props.clone();
            forest.add_sub(node, SubAlt::leaf(RuleAction::Single(props)));
        }
        Match::Integer { symbol, digits } => {
            let props = placeholder_props(grammar, *symbol);
            forest.add_sub(node, SubAlt::leaf_with_literal(RuleAction::Single(props), digits.clone()));
        }
        Match::Entity { symbol, entity, cost_penalty, .. } => {
            let mut props = placeholder_props(grammar, *symbol);
            props.cost += cost_penalty;
            let canonical = grammar.interner().resolve(grammar.entities().entity(*entity).canonical).to_string();
            forest.add_sub(node, SubAlt::leaf_with_literal(RuleAction::Single(props), canonical));
        }
    }
    node
}

fn placeholder_props(grammar: &Grammar, symbol: nlu_core::SymbolId) -> nlu_core::RuleProps {
    grammar.rules_for(symbol).next().map(|(_, r)| r.props.clone()).unwrap_or_default()
}

/// Reduce every vertex at `position` to a fixpoint: applying a
/// reduction's rule may shift its LHS into a newly created edge, which
/// can expose further reductions at the same position (spec.md §4.2
/// "Reduce phase").
fn reduce_fixpoint(gss: &mut Gss, forest: &mut Forest, table: &StateTable, position: u32) {
    let mut worklist: VecDeque<VertexId> = gss.vertices_at(position).collect();
    while let Some(v) = worklist.pop_front() {
        let state_id = gss.vertex(v).state;
        let reductions = table.get(state_id).reductions.clone();
        let incoming = gss.vertex(v).z_nodes.clone();

        for reduction in &reductions {
            let hops = reduction.rhs.len().saturating_sub(1);
            for &z in &incoming {
                for (origin, children) in gss.enumerate_paths(z, hops) {
                    apply_reduction(gss, forest, table, origin, &children, reduction, position, &mut worklist);
                }
            }
        }
    }
}

fn apply_reduction(
    gss: &mut Gss,
    forest: &mut Forest,
    table: &StateTable,
    origin: VertexId,
    children: &[NodeId],
    reduction: &nlu_core::Reduction,
    position: u32,
    worklist: &mut VecDeque<VertexId>,
) {
    let start = gss.vertex(origin).position;
    let size = position - start;
    let node = forest.get_or_create(reduction.lhs, start, size);

    let sub = match children {
        [only] => SubAlt::unary(*only, reduction.action.clone()),
        [first, second] => SubAlt::binary(*first, *second, reduction.action.clone()),
        _ => unreachable!("reductions are unary or binary only"),
    };
    forest.add_sub(node, sub);

    let origin_state = gss.vertex(origin).state;
    if let Some(target_state) = table.get(origin_state).shift_for(reduction.lhs) {
        let target = gss.get_or_create_vertex(target_state, position);
        let (_, created) = gss.add_edge(target, origin, node);
        if created {
            worklist.push_back(target);
        }
    }
}
