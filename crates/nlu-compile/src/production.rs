//! Productions: nonterminal rules grouped by `(lhs, rhs)` shape.
//!
//! A grammar may define several `Rule`s that share the same LHS and RHS
//! symbol sequence -- most commonly synonymous insertion/edit variants
//! (spec.md §3: "Multiple insertion rules with identical LHS and same
//! non-inserted RHS symbol collapse into one parse action carrying an
//! ordered sequence of `RuleProps`"). A `Production` is that dedup unit:
//! the state-table builder reasons about `(lhs, rhs)` shapes when
//! building item sets, and only expands back out to individual
//! `RuleProps` when a reduction is materialized.

use std::collections::HashMap;

use nlu_core::{Grammar, RuleId, RuleRhs, SymbolId};

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct ProductionId(u32);

impl ProductionId {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Production {
    pub lhs: SymbolId,
    pub rhs: Vec<SymbolId>,
    /// Every rule sharing this `(lhs, rhs)` shape, sorted by increasing
    /// cost (stable) -- spec.md §3's ordering invariant for collapsed
    /// insertion rules.
    pub rule_ids: Vec<RuleId>,
}

/// All nonterminal productions in a grammar, deduped by `(lhs, rhs)` and
/// indexed both by that key and by `lhs` alone (for closure expansion).
#[derive(Debug, Clone, Default)]
pub struct Productions {
    list: Vec<Production>,
    by_key: HashMap<(SymbolId, Vec<SymbolId>), ProductionId>,
    by_lhs: HashMap<SymbolId, Vec<ProductionId>>,
}

impl Productions {
    pub fn build(grammar: &Grammar) -> Self {
        let mut list: Vec<Production> = Vec::new();
        let mut by_key: HashMap<(SymbolId, Vec<SymbolId>), ProductionId> = HashMap::new();

        for i in 0..grammar.rule_count() {
            let rule_id = RuleId::from_raw(i as u32);
            let rule = grammar.rule(rule_id);
            let RuleRhs::Symbols(rhs) = &rule.rhs else {
                continue;
            };

            let key = (rule.lhs, rhs.clone());
            let id = *by_key.entry(key.clone()).or_insert_with(|| {
                let id = ProductionId(list.len() as u32);
                list.push(Production {
                    lhs: rule.lhs,
                    rhs: rhs.clone(),
                    rule_ids: Vec::new(),
                });
                id
            });
            list[id.0 as usize].rule_ids.push(rule_id);
        }

        for production in &mut list {
            production
                .rule_ids
                .sort_by_key(|&id| grammar.rule(id).props.cost_order());
        }

        let mut by_lhs: HashMap<SymbolId, Vec<ProductionId>> = HashMap::new();
        for (i, production) in list.iter().enumerate() {
            by_lhs
                .entry(production.lhs)
                .or_default()
                .push(ProductionId(i as u32));
        }

        Self {
            list,
            by_key,
            by_lhs,
        }
    }

    pub fn get(&self, id: ProductionId) -> &Production {
        &self.list[id.0 as usize]
    }

    pub fn lookup(&self, lhs: SymbolId, rhs: &[SymbolId]) -> Option<&Production> {
        self.by_key
            .get(&(lhs, rhs.to_vec()))
            .map(|&id| self.get(id))
    }

    /// All productions with the given LHS -- used to close an item whose
    /// dot precedes a nonterminal.
    pub fn for_lhs(&self, lhs: SymbolId) -> impl Iterator<Item = &Production> {
        self.by_lhs
            .get(&lhs)
            .into_iter()
            .flatten()
            .map(move |&id| self.get(id))
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}
