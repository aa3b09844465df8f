//! Runtime semantic tree algebra (spec.md §4.5).
//!
//! The grammar-model half (function *definitions*) lives in
//! `nlu_core::semantics`; this module holds the per-query tree operations
//! that the forest search threads through `semantic_list`: merging two
//! reduced RHS arrays, applying a pending LHS to a materialized RHS,
//! legality checks, and the canonical `toString` used both for display
//! and as a tree-identity fingerprint (spec.md §4.4 "Same semantic string
//! -> discard").

use nlu_core::{SemanticFunctionId, SemanticTable};

/// A semantic is either an argument leaf or a function application over
/// an ordered list of child semantics (spec.md §4.5).
///
/// An argument always names the [`SemanticFunctionId`] it was produced
/// from (so `forbids_multiple`/`anaphoric` stay reachable), plus an
/// optional runtime `literal` that overrides the function's own display
/// name -- used by the `<int>` placeholder (the literal digits) and by
/// entity-category matches (the entity's canonical name), neither of
/// which has a fixed name baked into the grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Semantic {
    Argument {
        function: SemanticFunctionId,
        literal: Option<String>,
    },
    Application {
        function: SemanticFunctionId,
        args: Vec<Semantic>,
    },
}

impl Semantic {
    pub fn function(&self) -> SemanticFunctionId {
        match self {
            Semantic::Argument { function, .. } => *function,
            Semantic::Application { function, .. } => *function,
        }
    }

    /// Canonical display string: the dedup key and display semantic
    /// (spec.md §4.5 "toString"). Arguments that take more than one
    /// param are aggregators (e.g. `intersect`/`and`) and are rendered
    /// with their children sorted, so two derivations that differ only
    /// in the order children were discovered canonicalize identically
    /// (spec.md §4.5 "canonical ordering of arguments inside commutative
    /// aggregators").
    pub fn to_canonical_string(&self, table: &SemanticTable, interner: &nlu_core::Interner) -> String {
        match self {
            Semantic::Argument { function, literal } => literal
                .clone()
                .unwrap_or_else(|| interner.resolve(table.get(*function).name).to_string()),
            Semantic::Application { function, args } => {
                let name = interner.resolve(table.get(*function).name);
                let mut rendered: Vec<String> =
                    args.iter().map(|a| a.to_canonical_string(table, interner)).collect();
                if is_commutative(table, *function) {
                    rendered.sort();
                }
                format!("{name}({})", rendered.join(", "))
            }
        }
    }
}

/// Functions that accept more than one argument are treated as
/// commutative aggregators for canonicalization and flattening purposes
/// (spec.md §9 open-question style call: the wire format has no explicit
/// commutativity flag, so this is the namable, defensible proxy -- a
/// unary wrapper like `not` has nothing to reorder, while a function
/// like `intersect`/`and` combines children symmetrically).
fn is_commutative(table: &SemanticTable, function: SemanticFunctionId) -> bool {
    table.get(function).max_params > 1
}

/// Soft legality failure: the search discards the path carrying it
/// (spec.md §4.4 "Reject the expansion on any semantic-legality
/// violation"), it never aborts the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
    /// `reduce` called with an RHS array outside `[min_params, max_params]`.
    Arity {
        function: SemanticFunctionId,
        min: u32,
        max: u32,
        got: u32,
    },
    /// Two semantics in the same array canonicalize to the same string.
    DuplicateSemantic,
    /// A `forbids_multiple` function already present in the array.
    ForbiddenMultiple { function: SemanticFunctionId },
}

/// Does pushing another occurrence of `function` into `existing` violate
/// its `forbids_multiple` constraint (spec.md §4.5 "isForbiddenMultiple")?
pub fn is_forbidden_multiple(table: &SemanticTable, existing: &[Semantic], function: SemanticFunctionId) -> bool {
    table.get(function).forbids_multiple && existing.iter().any(|s| s.function() == function)
}

/// Would merging `new_item` into `children` duplicate an existing entry
/// or violate a `forbids_multiple` constraint (spec.md §4.5
/// "isIllegalRHS")?
pub fn is_illegal_rhs(
    table: &SemanticTable,
    interner: &nlu_core::Interner,
    children: &[Semantic],
    new_item: &Semantic,
) -> bool {
    if is_forbidden_multiple(table, children, new_item.function()) {
        return true;
    }
    let new_str = new_item.to_canonical_string(table, interner);
    children
        .iter()
        .any(|c| c.to_canonical_string(table, interner) == new_str)
}

/// Concatenate two reduced semantic arrays, checking each element of `b`
/// against the growing array for duplicates and forbidden-multiple
/// conflicts (spec.md §4.5 "mergeRHS").
pub fn merge_rhs(
    table: &SemanticTable,
    interner: &nlu_core::Interner,
    a: &[Semantic],
    b: &[Semantic],
) -> Result<Vec<Semantic>, SemanticError> {
    let mut merged = a.to_vec();
    for item in b {
        if is_forbidden_multiple(table, &merged, item.function()) {
            return Err(SemanticError::ForbiddenMultiple { function: item.function() });
        }
        let item_str = item.to_canonical_string(table, interner);
        if merged.iter().any(|c| c.to_canonical_string(table, interner) == item_str) {
            return Err(SemanticError::DuplicateSemantic);
        }
        merged.push(item.clone());
    }
    Ok(merged)
}

/// Apply a pending LHS function to a materialized RHS array (spec.md
/// §4.5 "reduce"). Validates arity; when `max_params == 1` and more than
/// one RHS element is present, distributes the function over each
/// element instead of erroring (spec.md: "if `max_params == 1` and
/// `|rhs| > 1`, distribute"), producing one application per element for
/// the caller to merge upward.
pub fn reduce(
    table: &SemanticTable,
    lhs: SemanticFunctionId,
    rhs: &[Semantic],
) -> Result<Vec<Semantic>, SemanticError> {
    let func = table.get(lhs);
    let n = rhs.len() as u32;

    if func.max_params == 1 && rhs.len() > 1 {
        return Ok(rhs
            .iter()
            .map(|arg| Semantic::Application {
                function: lhs,
                args: vec![arg.clone()],
            })
            .collect());
    }

    if n < func.min_params || n > func.max_params {
        return Err(SemanticError::Arity {
            function: lhs,
            min: func.min_params,
            max: func.max_params,
            got: n,
        });
    }

    let args = flatten_commutative(table, lhs, rhs.to_vec());
    Ok(vec![Semantic::Application { function: lhs, args }])
}

/// Splice a commutative application's own children in place of itself
/// when it appears nested directly under another application of the
/// same function (spec.md §4.5 "flattening of commutative operators"),
/// e.g. `intersect(intersect(a, b), c) -> intersect(a, b, c)`.
fn flatten_commutative(table: &SemanticTable, function: SemanticFunctionId, args: Vec<Semantic>) -> Vec<Semantic> {
    if !is_commutative(table, function) {
        return args;
    }
    let mut out = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            Semantic::Application { function: f, args: inner } if f == function => out.extend(inner),
            other => out.push(other),
        }
    }
    out
}
