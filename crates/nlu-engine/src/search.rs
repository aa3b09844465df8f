//! A* k-best forest search (spec.md §2 component 5, §4.4): walks the
//! heuristic-annotated forest one partial path at a time, cheapest
//! partial cost first, expanding nonterminal/terminal sub-alternatives,
//! maintaining the three `Path` cons-lists, and collecting up to `k`
//! distinct-by-semantic completed trees.
//!
//! `step` dispatches each popped path to either [`expand_node`] (`cur_node`
//! is still set -- apply a sub-alternative) or [`resume`] (`cur_node` is
//! `None` -- drain `next_items`). Every new path gets pushed back onto
//! the heap rather than recursed into directly, so cost ordering across
//! the whole search stays a true best-first traversal (spec.md §8 "cost
//! only ever increases from a path to its children").

use std::collections::{BinaryHeap, HashMap, HashSet};

use nlu_core::{Grammar, Interner, RuleProps, SemanticTable, SymbolId};

use crate::conjugate::{self, MissingInflection};
use crate::error::ConjugationError;
use crate::forest::{Forest, NodeId, SubAlt};
use crate::path::{append_text, Arenas, ConsArena, NextItem, Path, SemanticFrame};
use crate::result::{self, ParseTree};
use crate::semantics::{self, Semantic, SemanticError};

/// Cooperative exhaustion limits (spec.md §5): fuel counters standing in
/// for the spec's wall-clock budget, so a pathological grammar/query
/// combination degrades into "fewer than `k` trees" rather than hanging.
/// `None` means unlimited.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchBudget {
    pub max_heap_pops: Option<u64>,
    pub max_paths: Option<u64>,
}

impl SearchBudget {
    pub const UNLIMITED: SearchBudget = SearchBudget { max_heap_pops: None, max_paths: None };
}

#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    pub k: usize,
    pub budget: SearchBudget,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { k: 1, budget: SearchBudget { max_heap_pops: Some(200_000), max_paths: Some(1_000_000) } }
    }
}

#[derive(Clone, Copy)]
struct Env<'a> {
    grammar: &'a Grammar,
    forest: &'a Forest,
    can_produce_semantic: &'a HashMap<SymbolId, bool>,
}

struct HeapEntry {
    cost: i32,
    seq: u64,
    path: Path,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.seq == other.seq
    }
}
impl Eq for HeapEntry {}
impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // BinaryHeap is a max-heap; invert cost so the cheapest path pops
        // first, and invert seq so that among equal costs, the
        // earliest-enqueued path wins ties deterministically.
        other.cost.cmp(&self.cost).then(other.seq.cmp(&self.seq))
    }
}

/// Run the k-best search to completion (or until the budget runs out),
/// returning however many distinct-by-semantic trees were found, most
/// cost-competitive first.
pub fn search(
    grammar: &Grammar,
    forest: &Forest,
    root: NodeId,
    base_cost: i32,
    config: &SearchConfig,
) -> Result<Vec<ParseTree>, ConjugationError> {
    let can_produce_semantic = crate::reachability::compute(grammar);
    let env = Env { grammar, forest, can_produce_semantic: &can_produce_semantic };

    let mut arenas = Arenas::default();
    let mut heap: BinaryHeap<HeapEntry> = BinaryHeap::new();
    let mut seq = 0u64;
    let mut paths_created = 0u64;

    let mut start = Path::start(root);
    start.cost_so_far = base_cost;
    start.cost = base_cost + remaining_heuristic(env, &arenas.next_items, &start);
    push(&mut heap, &mut seq, &mut paths_created, start);

    let mut completed: Vec<ParseTree> = Vec::new();
    let mut seen_semantics: HashSet<String> = HashSet::new();
    let mut text_index: HashMap<String, usize> = HashMap::new();
    let mut pops = 0u64;

    while let Some(HeapEntry { path, .. }) = heap.pop() {
        if completed.len() >= config.k {
            break;
        }
        pops += 1;
        if config.budget.max_heap_pops.is_some_and(|limit| pops > limit) {
            break;
        }

        if path.is_complete() {
            if !path.is_semantically_complete(&arenas.semantics) {
                // A dangling PendingLhs never got a RHS to reduce
                // against (e.g. its only child derivation emitted no
                // semantic at all): the derivation is legal text-wise
                // but not semantically complete, so it's discarded like
                // any other soft semantic-legality rejection (spec.md
                // §4.5 invariant, §8 property 5).
                continue;
            }
            let tree = result::assemble(grammar, &arenas, &path);
            if !seen_semantics.insert(tree.semantic.clone()) {
                // Same semantic as an already-accepted tree: a cheaper
                // derivation of the identical meaning already won, this
                // is just redundant structure (spec.md §4.4 "discard").
                continue;
            }
            if let Some(&existing) = text_index.get(&tree.text) {
                completed[existing].ambiguous_alternatives.push(tree.semantic);
                continue;
            }
            text_index.insert(tree.text.clone(), completed.len());
            completed.push(tree);
            continue;
        }

        if config.budget.max_paths.is_some_and(|limit| paths_created >= limit) {
            continue;
        }

        match path.cur_node {
            Some(node) => {
                for next in expand_node(env, &mut arenas, &path, node)? {
                    push(&mut heap, &mut seq, &mut paths_created, next);
                }
            }
            None => {
                if let Some(next) = resume(env, &mut arenas, &path)? {
                    push(&mut heap, &mut seq, &mut paths_created, next);
                }
            }
        }
    }

    Ok(completed)
}

fn push(heap: &mut BinaryHeap<HeapEntry>, seq: &mut u64, paths_created: &mut u64, path: Path) {
    heap.push(HeapEntry { cost: path.cost, seq: *seq, path });
    *seq += 1;
    *paths_created += 1;
}

fn remaining_heuristic(env: Env, arena: &ConsArena<NextItem>, path: &Path) -> i32 {
    let mut total: i64 = path
        .cur_node
        .map(|n| env.forest.node(n).min_cost.unwrap_or(0) as i64)
        .unwrap_or(0);
    let mut cur = path.next_items;
    while let Some(id) = cur {
        if let NextItem::Node { node, .. } = arena.get(id) {
            total += env.forest.node(*node).min_cost.unwrap_or(0) as i64;
        }
        cur = arena.prev(id);
    }
    total.min(i32::MAX as i64) as i32
}

fn expand_node(env: Env, arenas: &mut Arenas, path: &Path, node: NodeId) -> Result<Vec<Path>, ConjugationError> {
    let mut out = Vec::new();
    for alt in &env.forest.node(node).alts {
        for props in alt.action.iter() {
            if let Some(next) = try_expand(env, arenas, path, alt, props)? {
                out.push(next);
            }
        }
    }
    Ok(out)
}

fn try_expand(env: Env, arenas: &mut Arenas, path: &Path, alt: &SubAlt, props: &RuleProps) -> Result<Option<Path>, ConjugationError> {
    let mut next = path.clone();
    next.cost_so_far += props.cost;

    if alt.first.is_none() {
        // Terminal rule: no children, just a semantic argument (if any)
        // and its text.
        if let Some(function) = props.semantic {
            let item = Semantic::Argument { function, literal: alt.literal_override.clone() };
            match append_semantic_item(env.grammar.semantics(), env.grammar.interner(), &mut arenas.semantics, next.semantic_list, next.next_nodes_count, item) {
                Ok(head) => next.semantic_list = head,
                Err(_) => return Ok(None),
            }
        }

        let piece = if let Some(literal) = &alt.literal_override {
            literal.clone()
        } else if let Some(text) = &props.text {
            match conjugate::emit_text(text, &mut arenas.gram_props, next.gram_props_list) {
                Ok((s, new_head)) => {
                    next.gram_props_list = new_head;
                    s
                }
                Err(missing) => return Err(ConjugationError::from_missing(missing)),
            }
        } else {
            String::new()
        };
        append_text(&mut next.text, &piece);
        next.cur_node = None;
    } else {
        let (enter, defer) = if props.is_transposition && alt.next.is_some() {
            (alt.next.unwrap(), alt.first)
        } else {
            (alt.first.unwrap(), alt.next)
        };

        if let Some(function) = props.semantic {
            if let Some(inserted) = props.inserted_semantic {
                next.semantic_list = Some(
                    arenas
                        .semantics
                        .push(next.semantic_list, SemanticFrame::PendingLhs { function, captured_next_nodes_count: next.next_nodes_count }),
                );
                let item = Semantic::Argument { function: inserted, literal: None };
                next.semantic_list = Some(arenas.semantics.push(next.semantic_list, SemanticFrame::MaterializedRhs(vec![item])));
            } else if props.semantic_is_rhs {
                let item = Semantic::Argument { function, literal: None };
                match append_semantic_item(env.grammar.semantics(), env.grammar.interner(), &mut arenas.semantics, next.semantic_list, next.next_nodes_count, item) {
                    Ok(head) => next.semantic_list = head,
                    Err(_) => return Ok(None),
                }
            } else {
                next.semantic_list = Some(
                    arenas
                        .semantics
                        .push(next.semantic_list, SemanticFrame::PendingLhs { function, captured_next_nodes_count: next.next_nodes_count }),
                );
            }
        }

        if let Some(gram_props) = props.gram_props {
            if !gram_props.is_empty() {
                next.gram_props_list = Some(arenas.gram_props.push(next.gram_props_list, gram_props));
            }
        }

        if let Some(second) = defer {
            let can_produce = *env.can_produce_semantic.get(&env.forest.node(second).symbol).unwrap_or(&true);
            next.next_items = Some(arenas.next_items.push(next.next_items, NextItem::Node { node: second, can_produce_semantic: can_produce }));
            if can_produce {
                next.next_nodes_count += 1;
            }
        }

        if let Some(index) = props.insertion_index {
            if index == 0 {
                if let Some(text) = &props.text {
                    match conjugate::emit_text(text, &mut arenas.gram_props, next.gram_props_list) {
                        Ok((s, new_head)) => {
                            next.gram_props_list = new_head;
                            append_text(&mut next.text, &s);
                        }
                        Err(missing) => return Err(ConjugationError::from_missing(missing)),
                    }
                }
            } else {
                next.next_items = Some(
                    arenas
                        .next_items
                        .push(next.next_items, NextItem::Text { text: props.text.clone(), gram_props: props.gram_props }),
                );
            }
        } else if let Some(text) = &props.text {
            // A non-insertion nonterminal rule carrying its own text is
            // unusual but not excluded by the grammar's shape; treat it
            // the same as an insertion_index==0 rule would.
            match conjugate::emit_text(text, &mut arenas.gram_props, next.gram_props_list) {
                Ok((s, new_head)) => {
                    next.gram_props_list = new_head;
                    append_text(&mut next.text, &s);
                }
                Err(missing) => return Err(ConjugationError::from_missing(missing)),
            }
        }

        next.cur_node = Some(enter);
    }

    next.cost = next.cost_so_far + remaining_heuristic(env, &arenas.next_items, &next);
    Ok(Some(next))
}

/// Drain any leading deferred text from `next_items`, then resume into
/// the first deferred node found (or signal completion if the list runs
/// out entirely).
fn resume(env: Env, arenas: &mut Arenas, path: &Path) -> Result<Option<Path>, ConjugationError> {
    let mut next = path.clone();
    let mut cur = next.next_items;

    loop {
        match cur {
            None => {
                next.next_items = None;
                next.cur_node = None;
                next.cost = next.cost_so_far;
                return Ok(Some(next));
            }
            Some(id) => match arenas.next_items.get(id).clone() {
                NextItem::Text { text, gram_props } => {
                    if let Some(gp) = gram_props {
                        if !gp.is_empty() {
                            next.gram_props_list = Some(arenas.gram_props.push(next.gram_props_list, gp));
                        }
                    }
                    if let Some(text) = text {
                        match conjugate::emit_text(&text, &mut arenas.gram_props, next.gram_props_list) {
                            Ok((s, new_head)) => {
                                next.gram_props_list = new_head;
                                append_text(&mut next.text, &s);
                            }
                            Err(missing) => return Err(ConjugationError::from_missing(missing)),
                        }
                    }
                    cur = arenas.next_items.prev(id);
                }
                NextItem::Node { node, can_produce_semantic } => {
                    if can_produce_semantic {
                        next.next_nodes_count = next.next_nodes_count.saturating_sub(1);
                    }
                    next.next_items = arenas.next_items.prev(id);
                    next.cur_node = Some(node);
                    next.cost = next.cost_so_far + remaining_heuristic(env, &arenas.next_items, &next);
                    return Ok(Some(next));
                }
            },
        }
    }
}

/// Reduce the semantic stack down to the first pending LHS whose
/// captured `next_nodes_count` still exceeds the current one (spec.md
/// §4.4 "Terminal rule": "reduce the semantic stack down to the first
/// pending LHS ..."). Every eligible `PendingLhs` frame between `head`
/// and that point cascades -- reducing one can immediately make its own
/// enclosing `PendingLhs` eligible too, so this keeps consuming frames
/// rather than stopping after the first reduction.
fn append_semantic_item(
    table: &SemanticTable,
    interner: &Interner,
    arena: &mut ConsArena<SemanticFrame>,
    head: Option<u32>,
    next_nodes_count: u32,
    new_item: Semantic,
) -> Result<Option<u32>, SemanticError> {
    let mut carry = vec![new_item];
    let mut cur = head;
    loop {
        match cur {
            None => return Ok(Some(arena.push(None, SemanticFrame::MaterializedRhs(carry)))),
            Some(id) => match arena.get(id).clone() {
                SemanticFrame::MaterializedRhs(items) => {
                    carry = semantics::merge_rhs(table, interner, &items, &carry)?;
                    cur = arena.prev(id);
                }
                SemanticFrame::PendingLhs { function, captured_next_nodes_count } => {
                    if next_nodes_count <= captured_next_nodes_count {
                        carry = semantics::reduce(table, function, &carry)?;
                        cur = arena.prev(id);
                    } else {
                        return Ok(Some(arena.push(Some(id), SemanticFrame::MaterializedRhs(carry))));
                    }
                }
            },
        }
    }
}
