//! Entity categories and the inverted name index used for fuzzy,
//! multi-token entity-placeholder matching (spec.md §4.2).

use std::collections::HashMap;

use crate::interner::Atom;
use crate::symbol::SymbolId;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct EntityCategoryId(u32);

impl EntityCategoryId {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct EntityId(u32);

impl EntityId {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }
}

/// One entity within a category: a canonical display name plus the
/// aliases (possibly multi-word) that should resolve to it.
#[derive(Debug, Clone)]
pub struct EntityRecord {
    pub category: EntityCategoryId,
    pub canonical: Atom,
    pub names: Vec<Atom>,
}

#[derive(Debug, Clone)]
pub struct EntityCategory {
    pub name: Atom,
    /// The placeholder symbol this category matches in the grammar,
    /// e.g. `{user}`.
    pub placeholder_symbol: SymbolId,
    pub entities: Vec<EntityId>,
}

/// Process-wide, immutable once built. Holds every entity category and
/// an inverted index from individual name tokens to the entities whose
/// alias set contains that token, so lookup during parsing doesn't
/// linearly scan all entities.
#[derive(Debug, Clone, Default)]
pub struct EntityCategories {
    categories: Vec<EntityCategory>,
    by_name: HashMap<Atom, EntityCategoryId>,
    records: Vec<EntityRecord>,
    token_index: HashMap<Atom, Vec<EntityId>>,
}

impl EntityCategories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_category(&mut self, name: Atom, placeholder_symbol: SymbolId) -> EntityCategoryId {
        if let Some(&id) = self.by_name.get(&name) {
            return id;
        }
        let id = EntityCategoryId(self.categories.len() as u32);
        self.categories.push(EntityCategory {
            name,
            placeholder_symbol,
            entities: Vec::new(),
        });
        self.by_name.insert(name, id);
        id
    }

    /// Register an entity under a category, indexing every alias's word
    /// tokens. `names` pairs each alias's own atom with the atoms of its
    /// individual words (callers intern both up front).
    pub fn insert_entity(
        &mut self,
        category: EntityCategoryId,
        canonical: Atom,
        names: Vec<(Atom, Vec<Atom>)>,
    ) -> EntityId {
        let id = EntityId(self.records.len() as u32);
        for (_, tokens) in &names {
            for &token in tokens {
                self.token_index.entry(token).or_default().push(id);
            }
        }
        let names: Vec<Atom> = names.into_iter().map(|(name, _)| name).collect();
        self.records.push(EntityRecord {
            category,
            canonical,
            names,
        });
        self.categories[category.0 as usize].entities.push(id);
        id
    }

    pub fn category(&self, id: EntityCategoryId) -> &EntityCategory {
        &self.categories[id.0 as usize]
    }

    pub fn lookup_category(&self, name: Atom) -> Option<EntityCategoryId> {
        self.by_name.get(&name).copied()
    }

    pub fn category_for_symbol(&self, symbol: SymbolId) -> Option<EntityCategoryId> {
        self.categories
            .iter()
            .position(|c| c.placeholder_symbol == symbol)
            .map(|i| EntityCategoryId(i as u32))
    }

    pub fn entity(&self, id: EntityId) -> &EntityRecord {
        &self.records[id.0 as usize]
    }

    /// Entities that have at least one alias token equal to `token`.
    pub fn candidates_for_token(&self, token: Atom) -> &[EntityId] {
        self.token_index.get(&token).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every entity across every category, for callers (the fuzzy
    /// matcher) that must score a query token against alias text the
    /// exact-token index can't find a near-miss for.
    pub fn iter_entities(&self) -> impl Iterator<Item = (EntityId, &EntityRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| (EntityId(i as u32), r))
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Normalized token-overlap fuzzy score in `[0.0, 1.0]` between a query
/// token and a candidate alias token: exact match scores 1.0, otherwise
/// `1 - levenshtein(a, b) / max(len(a), len(b))`, floored at 0.
pub fn fuzzy_score(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let dist = levenshtein(a, b) as f64;
    let denom = a.chars().count().max(b.chars().count()).max(1) as f64;
    (1.0 - dist / denom).max(0.0)
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (m, n) = (a.len(), b.len());

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut cur = vec![0usize; n + 1];

    for i in 1..=m {
        cur[0] = i;
        for j in 1..=n {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            cur[j] = (prev[j] + 1).min(cur[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    prev[n]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuzzy_score_exact_match_is_one() {
        assert_eq!(fuzzy_score("danny", "danny"), 1.0);
    }

    #[test]
    fn fuzzy_score_penalizes_edits() {
        let score = fuzzy_score("danny", "danni");
        assert!(score < 1.0 && score > 0.5);
    }

    #[test]
    fn fuzzy_score_disjoint_strings_is_low() {
        let score = fuzzy_score("abc", "xyz");
        assert_eq!(score, 0.0);
    }

    #[test]
    fn levenshtein_known_distance() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", "abc"), 0);
    }
}
