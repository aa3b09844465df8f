//! Resolves a raw [`GrammarArtifact`] into the interned, handle-based
//! [`Grammar`] the rest of the workspace consumes.

use crate::entities::EntityCategories;
use crate::error::GrammarLoadError;
use crate::interner::{Atom, Interner};
use crate::rule::{Rule, RuleRhs};
use crate::semantics::{SemanticFunction, SemanticFunctionId, SemanticTable};
use crate::symbol::{SymbolId, SymbolKind, SymbolTable};

use super::artifact::GrammarArtifact;
use super::Grammar;

/// Declare `name` if it hasn't been seen yet, defaulting to
/// `Nonterminal`. Rules that define a symbol as terminal upgrade it
/// explicitly in the first pass below.
fn symbol_for(symbols: &mut SymbolTable, interner: &mut Interner, name: &str) -> SymbolId {
    let atom = interner.intern(name);
    symbols.declare(atom, SymbolKind::Nonterminal)
}

pub(super) fn resolve(artifact: GrammarArtifact) -> Result<Grammar, GrammarLoadError> {
    let mut interner = Interner::new();
    let mut symbols = SymbolTable::new();
    let mut semantics = SemanticTable::new();
    let mut entities = EntityCategories::new();

    // Semantic function table first: rules resolve references against it.
    for (name, raw) in &artifact.semantics {
        let atom = interner.intern(name);
        semantics.insert(SemanticFunction {
            name: atom,
            cost: raw.cost,
            min_params: raw.min_params,
            max_params: raw.max_params,
            forbids_multiple: raw.forbids_multiple,
            is_arg: raw.is_arg,
            anaphoric: raw.anaphoric,
        });
    }

    // Pass 1: declare every symbol named as a grammar-map key, upgrading
    // to `Terminal` if any of its own rules is a terminal definition.
    for (name, rules) in &artifact.grammar {
        let id = symbol_for(&mut symbols, &mut interner, name);
        if rules.iter().any(|r| r.is_terminal) {
            symbols.get_mut(id).kind = SymbolKind::Terminal;
        }
        if rules.iter().any(|r| r.is_placeholder) {
            symbols.get_mut(id).is_placeholder = true;
        }
    }

    // Pass 2: build `Rule`s, resolving RHS symbol references (declaring
    // on demand -- a symbol only ever referenced, never defined as a
    // key, still needs a handle) and semantic references.
    let mut rules: Vec<Rule> = Vec::new();
    for (name, raw_rules) in &artifact.grammar {
        let lhs_atom = interner.intern(name);
        let lhs = symbols
            .lookup(lhs_atom)
            .expect("declared in pass 1");

        for raw in raw_rules {
            let rhs = if raw.is_terminal {
                let words: Vec<Atom> = raw.rhs.iter().map(|w| interner.intern(w)).collect();
                let width = words.len() as u32;
                let record = symbols.get_mut(lhs);
                record.token_width = record.token_width.max(width);
                RuleRhs::Literal(words)
            } else {
                if raw.rhs.is_empty() {
                    return Err(GrammarLoadError::MalformedRule {
                        symbol: name.clone(),
                        reason: "nonterminal rule has an empty RHS".to_string(),
                    });
                }
                let syms: Vec<SymbolId> = raw
                    .rhs
                    .iter()
                    .map(|s| symbol_for(&mut symbols, &mut interner, s))
                    .collect();
                RuleRhs::Symbols(syms)
            };

            let resolve_semantic = |name_opt: &Option<String>,
                                     interner: &mut Interner|
             -> Result<Option<SemanticFunctionId>, GrammarLoadError> {
                match name_opt {
                    None => Ok(None),
                    Some(fn_name) => {
                        let atom = interner.intern(fn_name);
                        semantics
                            .lookup(atom)
                            .map(Some)
                            .ok_or_else(|| GrammarLoadError::UnknownSemanticFunction {
                                symbol: name.clone(),
                                function: fn_name.clone(),
                            })
                    }
                }
            };

            let semantic = resolve_semantic(&raw.semantic, &mut interner)?;
            let inserted_semantic = resolve_semantic(&raw.inserted_semantic, &mut interner)?;

            let props = crate::rule::RuleProps {
                cost: raw.cost,
                text: raw.text.clone(),
                semantic,
                inserted_semantic,
                semantic_is_rhs: raw.semantic_is_rhs,
                insertion_index: raw.insertion_index,
                is_transposition: raw.is_transposition,
                is_placeholder: raw.is_placeholder,
                gram_props: raw.gram_props,
            };

            let rule_id = crate::rule::RuleId::from_raw(rules.len() as u32);
            rules.push(Rule { lhs, rhs, props });
            symbols.add_rule(lhs, rule_id);
        }
    }

    // Zero-cost self-cycle: `S -> S` at cost 0 would let search loop
    // forever extracting the same span for free.
    for rule in &rules {
        if let RuleRhs::Symbols(syms) = &rule.rhs {
            if syms.len() == 1 && syms[0] == rule.lhs && rule.props.cost == 0 {
                let name = interner.resolve(symbols.get(rule.lhs).name).to_string();
                return Err(GrammarLoadError::ZeroCostCycle { symbol: name });
            }
        }
    }

    // Start symbol.
    let start_atom = interner.intern(&artifact.start_symbol);
    let start_symbol = symbols
        .lookup(start_atom)
        .ok_or_else(|| GrammarLoadError::MissingStartSymbol(artifact.start_symbol.clone()))?;

    // Entity categories. By convention the placeholder symbol for
    // category `foo` is named `{foo}` (spec.md §6 example: `{user}`).
    for (category_name, raw_entities) in &artifact.entity_categories {
        let category_atom = interner.intern(category_name);
        let placeholder_name = format!("{{{category_name}}}");
        let placeholder_symbol = symbol_for(&mut symbols, &mut interner, &placeholder_name);
        symbols.get_mut(placeholder_symbol).is_placeholder = true;

        let category_id = entities.declare_category(category_atom, placeholder_symbol);

        for raw_entity in raw_entities {
            let canonical = interner.intern(&raw_entity.canonical);
            let names: Vec<(Atom, Vec<Atom>)> = raw_entity
                .names
                .iter()
                .map(|n| {
                    let alias = interner.intern(n);
                    let tokens = n
                        .split_whitespace()
                        .map(|w| interner.intern(&w.to_lowercase()))
                        .collect();
                    (alias, tokens)
                })
                .collect();
            entities.insert_entity(category_id, canonical, names);
        }
    }

    Ok(Grammar {
        interner,
        symbols,
        rules,
        semantics,
        entities,
        start_symbol,
    })
}
