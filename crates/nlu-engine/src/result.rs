//! Final tree assembly (spec.md §4.6): turning one completed [`Path`]
//! into displayable text and the canonical semantic string used both
//! for display and as the cross-path dedup key (spec.md §4.4 "Same
//! semantic string -> discard").

use nlu_core::Grammar;

use crate::path::{Arenas, Path, SemanticFrame};

#[derive(Debug, Clone, PartialEq)]
pub struct ParseTree {
    pub text: String,
    pub semantic: String,
    pub cost: i32,
    /// Semantic strings of other completed trees that share this tree's
    /// `text` (spec.md §4.4 "Same text as an accepted tree -> attach this
    /// semantic to that tree's ambiguous_alternatives and discard"). Empty
    /// unless the search actually found such a collision.
    pub ambiguous_alternatives: Vec<String>,
}

/// Render a completed path. Callers must only reach this after
/// confirming `path.is_semantically_complete` (spec.md §4.5 "any
/// accepted tree's root semantic is fully reduced", §8 property 5): the
/// `semantic_list` holds either nothing (a query with no semantic rules
/// at all, which renders as an empty semantic string) or exactly one
/// reduced `MaterializedRhs` frame, never a dangling `PendingLhs`.
pub fn assemble(grammar: &Grammar, arenas: &Arenas, path: &Path) -> ParseTree {
    let semantic = match path.semantic_list {
        None => String::new(),
        Some(id) => {
            let SemanticFrame::MaterializedRhs(items) = arenas.semantics.get(id) else {
                unreachable!("assemble called on a semantically-incomplete path");
            };
            debug_assert!(arenas.semantics.prev(id).is_none(), "unreduced semantic frame beneath the root");
            items
                .iter()
                .map(|s| s.to_canonical_string(grammar.semantics(), grammar.interner()))
                .collect::<Vec<_>>()
                .join(", ")
        }
    };

    ParseTree {
        text: path.text.clone(),
        semantic,
        cost: path.cost_so_far,
        ambiguous_alternatives: Vec::new(),
    }
}
