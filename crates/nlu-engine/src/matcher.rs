//! Token matching for the parser's shift phase (spec.md §4.2 "Shift
//! phase"): multi-token literal terminals, the `<int>` placeholder, and
//! entity-category placeholders via fuzzy inverted-index lookup.

use nlu_core::{EntityId, Grammar, RuleId, RuleRhs, SymbolId, SymbolKind};

/// Reserved grammar symbol name for the integer placeholder (spec.md §6).
pub const INT_PLACEHOLDER_NAME: &str = "<int>";

/// One way a span of `size` tokens starting at the current position can
/// be recognized.
#[derive(Debug, Clone)]
pub enum Match {
    /// A literal terminal rule's word sequence matched case-insensitively.
    Literal { symbol: SymbolId, size: u32, rule: RuleId },
    /// `<int>` matched a (optionally signed) numeric token; `digits` is
    /// the literal text used to name the emitted semantic argument.
    Integer { symbol: SymbolId, digits: String },
    /// An entity-category placeholder matched via fuzzy lookup.
    Entity {
        symbol: SymbolId,
        size: u32,
        entity: EntityId,
        /// Non-negative; 0 for an exact match, growing with edit distance.
        cost_penalty: i32,
    },
}

impl Match {
    pub fn size(&self) -> u32 {
        match self {
            Match::Literal { size, .. } => *size,
            Match::Integer { .. } => 1,
            Match::Entity { size, .. } => *size,
        }
    }

    pub fn symbol(&self) -> SymbolId {
        match self {
            Match::Literal { symbol, .. } => *symbol,
            Match::Integer { symbol, .. } => *symbol,
            Match::Entity { symbol, .. } => *symbol,
        }
    }
}

/// Knobs spec.md §9 "Open questions" says to preserve as configuration
/// rather than hardcode.
#[derive(Debug, Clone, Copy)]
pub struct MatchConfig {
    /// Cost charged for deleting one unrecognized token (spec.md §4.2,
    /// §9: "appears as 10 in one source comment but is not consistently
    /// honored").
    pub deletion_cost: i32,
    /// Whether `<int>` accepts a leading `+`/`-` sign.
    pub allow_negative_integers: bool,
    /// Minimum fuzzy token-overlap score (spec.md §4.2's "scoring") for
    /// an entity-category token to be considered a candidate match.
    pub entity_match_threshold: f64,
    /// Multiplier turning `1.0 - score` into an integer cost penalty.
    pub entity_penalty_scale: f64,
    /// Maximum token span considered for a multi-word entity alias.
    pub max_entity_span: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            deletion_cost: 10,
            allow_negative_integers: true,
            entity_match_threshold: 0.6,
            entity_penalty_scale: 12.0,
            max_entity_span: 3,
        }
    }
}

/// Every way `tokens[pos..]` can be recognized at its current position,
/// across all three match kinds.
pub fn matches_at(grammar: &Grammar, config: &MatchConfig, tokens: &[String], pos: usize) -> Vec<Match> {
    let mut out = Vec::new();
    out.extend(match_literals(grammar, tokens, pos));
    if let Some(m) = match_integer(grammar, config, tokens, pos) {
        out.push(m);
    }
    out.extend(match_entities(grammar, config, tokens, pos));
    out
}

fn match_literals(grammar: &Grammar, tokens: &[String], pos: usize) -> Vec<Match> {
    let mut out = Vec::new();
    for (symbol, record) in grammar.symbols().terminals() {
        if record.is_placeholder {
            continue;
        }
        for (rule_id, rule) in grammar.rules_for(symbol) {
            let RuleRhs::Literal(words) = &rule.rhs else {
                continue;
            };
            if words.len() > tokens.len() - pos {
                continue;
            }
            let matches = words.iter().enumerate().all(|(i, &word)| {
                grammar
                    .interner()
                    .try_resolve(word)
                    .map(|w| w.eq_ignore_ascii_case(&tokens[pos + i]))
                    .unwrap_or(false)
            });
            if matches {
                out.push(Match::Literal {
                    symbol,
                    size: words.len() as u32,
                    rule: rule_id,
                });
            }
        }
    }
    out
}

fn match_integer(grammar: &Grammar, config: &MatchConfig, tokens: &[String], pos: usize) -> Option<Match> {
    let atom = grammar.interner().get(INT_PLACEHOLDER_NAME)?;
    let symbol = grammar.symbols().lookup(atom)?;
    if grammar.symbols().get(symbol).kind != SymbolKind::Terminal {
        return None;
    }

    let token = tokens.get(pos)?;
    let candidate = token.as_str();
    let digits_only = if config.allow_negative_integers {
        candidate.strip_prefix(['+', '-']).unwrap_or(candidate)
    } else {
        candidate
    };
    if !digits_only.is_empty() && digits_only.bytes().all(|b| b.is_ascii_digit()) {
        Some(Match::Integer {
            symbol,
            digits: candidate.to_string(),
        })
    } else {
        None
    }
}

fn match_entities(grammar: &Grammar, config: &MatchConfig, tokens: &[String], pos: usize) -> Vec<Match> {
    let entities = grammar.entities();
    if entities.is_empty() {
        return Vec::new();
    }

    let max_span = config.max_entity_span.max(1) as usize;
    let mut out = Vec::new();

    for span in 1..=max_span.min(tokens.len() - pos) {
        let window = &tokens[pos..pos + span];

        // The exact-token inverted index gives a fast path for literal
        // matches; near-misses (typos) need a fuzzy score against every
        // alias, since nothing indexes an unseen spelling to its
        // nearest neighbor. Entity vocabularies in this domain are small
        // (repo/user/team names for one query at a time), so the full
        // scan is cheap.
        for (entity_id, record) in entities.iter_entities() {
            let best_score = record
                .names
                .iter()
                .filter_map(|&alias| grammar.interner().try_resolve(alias))
                .map(|alias| score_alias(alias, window))
                .fold(0.0_f64, f64::max);

            if best_score >= config.entity_match_threshold {
                let category = grammar.entities().category(record.category);
                let penalty = ((1.0 - best_score) * config.entity_penalty_scale).round() as i32;
                out.push(Match::Entity {
                    symbol: category.placeholder_symbol,
                    size: span as u32,
                    entity: entity_id,
                    cost_penalty: penalty.max(0),
                });
            }
        }
    }
    out
}

/// Average per-token fuzzy score between `alias`'s own words and
/// `window`, only comparable when word counts match (a coarse but cheap
/// multi-token scoring scheme; see spec.md §4.2 "fuzzy multi-token with
/// scoring").
fn score_alias(alias: &str, window: &[String]) -> f64 {
    let alias_words: Vec<&str> = alias.split_whitespace().collect();
    if alias_words.len() != window.len() {
        return 0.0;
    }
    let total: f64 = alias_words
        .iter()
        .zip(window.iter())
        .map(|(a, b)| nlu_core::entities::fuzzy_score(&a.to_lowercase(), &b.to_lowercase()))
        .sum();
    total / alias_words.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use nlu_core::{GrammarArtifact, RawEntityRecord, RawRule};

    fn tokens(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    fn fixture_grammar() -> Grammar {
        let mut grammar = IndexMap::new();
        grammar.insert(
            "root".to_string(),
            vec![RawRule {
                rhs: vec!["word".to_string()],
                cost: 0,
                ..Default::default()
            }],
        );
        grammar.insert(
            "word".to_string(),
            vec![RawRule {
                is_terminal: true,
                rhs: vec!["pull".to_string(), "request".to_string()],
                cost: 0,
                ..Default::default()
            }],
        );
        grammar.insert(
            "<int>".to_string(),
            vec![RawRule {
                is_terminal: true,
                is_placeholder: true,
                cost: 0,
                ..Default::default()
            }],
        );

        let mut entity_categories = IndexMap::new();
        entity_categories.insert(
            "user".to_string(),
            vec![RawEntityRecord {
                canonical: "danny".to_string(),
                names: vec!["Danny".to_string()],
            }],
        );

        Grammar::load(GrammarArtifact {
            grammar,
            semantics: IndexMap::new(),
            start_symbol: "root".to_string(),
            entity_categories,
        })
        .unwrap()
    }

    #[test]
    fn matches_multi_token_literal_case_insensitively() {
        let grammar = fixture_grammar();
        let config = MatchConfig::default();
        let toks = tokens("PULL Request now");

        let matches = matches_at(&grammar, &config, &toks, 0);
        assert!(matches
            .iter()
            .any(|m| matches!(m, Match::Literal { size, .. } if *size == 2)));
    }

    #[test]
    fn matches_signed_integer() {
        let grammar = fixture_grammar();
        let config = MatchConfig::default();
        let toks = tokens("-42 repos");

        let matches = matches_at(&grammar, &config, &toks, 0);
        assert!(matches.iter().any(|m| matches!(m, Match::Integer { digits, .. } if digits == "-42")));
    }

    #[test]
    fn matches_fuzzy_entity_alias() {
        let grammar = fixture_grammar();
        let config = MatchConfig::default();
        let toks = tokens("danni logged in");

        let matches = matches_at(&grammar, &config, &toks, 0);
        assert!(matches.iter().any(|m| matches!(m, Match::Entity { .. })));
    }
}
