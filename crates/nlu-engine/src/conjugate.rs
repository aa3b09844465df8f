//! Text emission and conjugation (spec.md §4.7).
//!
//! A rule's `text` is either a plain string, a sequence of such pieces,
//! or an [`InflectionTable`] keyed by grammatical form. Emitting the
//! latter walks `gram_props_list` from most recently pushed backwards,
//! looking for the first frame that can satisfy one of the table's keys;
//! that frame is then spliced out of the list so it isn't reused by a
//! later, unrelated inflection (spec.md §3, §9 "splicing gram_props_list
//! rebuilds the prefix up to the spliced cell").

use nlu_core::{GramProps, InflectionTable, RuleText, TextFormKey};

use crate::path::ConsArena;

/// No frame on `gram_props_list` satisfies any key the table offers.
#[derive(Debug, Clone)]
pub struct MissingInflection {
    pub requested: InflectionTable,
    pub gram_props_list: Vec<GramProps>,
}

/// Emit `text`, consuming grammatical-form frames from `gram_props_list`
/// as needed. Returns the surface string and the list's new head.
pub fn emit_text(
    text: &RuleText,
    arena: &mut ConsArena<GramProps>,
    gram_props_list: Option<u32>,
) -> Result<(String, Option<u32>), MissingInflection> {
    match text {
        RuleText::Plain(s) => Ok((s.clone(), gram_props_list)),
        RuleText::Sequence(parts) => {
            let mut out = String::new();
            let mut head = gram_props_list;
            for part in parts {
                let (piece, new_head) = emit_text(part, arena, head)?;
                crate::path::append_text(&mut out, &piece);
                head = new_head;
            }
            Ok((out, head))
        }
        RuleText::Inflected(table) => emit_inflected(table, arena, gram_props_list),
    }
}

fn emit_inflected(
    table: &InflectionTable,
    arena: &mut ConsArena<GramProps>,
    head: Option<u32>,
) -> Result<(String, Option<u32>), MissingInflection> {
    let mut cur = head;
    while let Some(id) = cur {
        let props = *arena.get(id);
        for key in candidate_keys(&props) {
            if let Some(surface) = table.get(key) {
                let remaining = consume_key(props, key);
                let new_head = arena.splice(head, id, remaining);
                return Ok((surface.to_string(), new_head));
            }
        }
        cur = arena.prev(id);
    }
    Err(MissingInflection {
        requested: table.clone(),
        gram_props_list: arena.collect(head),
    })
}

/// Which form keys `props` can offer, tried in a fixed priority order.
fn candidate_keys(props: &GramProps) -> Vec<TextFormKey> {
    let mut keys = Vec::with_capacity(3);
    if let Some(v) = props.verb_form {
        keys.push(TextFormKey::VerbForm(v));
    }
    if let Some(p) = props.person_number {
        keys.push(TextFormKey::PersonNumber(p));
    }
    if let Some(c) = props.grammatical_case {
        keys.push(TextFormKey::GrammaticalCase(c));
    }
    keys
}

/// What's left of a frame after using `key` to conjugate. A matched
/// grammatical-case key leaves `person_number` behind for a later
/// agreement check; any other matched key consumes the whole frame.
fn consume_key(props: GramProps, key: TextFormKey) -> Option<GramProps> {
    match key {
        TextFormKey::GrammaticalCase(_) if props.person_number.is_some() => Some(GramProps {
            grammatical_case: None,
            ..props
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nlu_core::{GrammaticalCase, PersonNumber, VerbForm};
    use std::collections::BTreeMap;

    fn table(pairs: &[(TextFormKey, &str)]) -> InflectionTable {
        InflectionTable(pairs.iter().map(|&(k, v)| (k, v.to_string())).collect::<BTreeMap<_, _>>())
    }

    #[test]
    fn plain_text_passes_gram_props_list_through_untouched() {
        let mut arena: ConsArena<GramProps> = ConsArena::new();
        let head = Some(arena.push(None, GramProps { verb_form: Some(VerbForm::Past), ..Default::default() }));

        let (s, new_head) = emit_text(&RuleText::Plain("repos".into()), &mut arena, head).unwrap();
        assert_eq!(s, "repos");
        assert_eq!(new_head, head);
    }

    #[test]
    fn inflected_text_finds_the_nearest_matching_frame() {
        let mut arena: ConsArena<GramProps> = ConsArena::new();
        let outer = arena.push(None, GramProps { verb_form: Some(VerbForm::Present), ..Default::default() });
        let inner = arena.push(
            Some(outer),
            GramProps { person_number: Some(PersonNumber::ThreeSg), ..Default::default() },
        );

        let verb_table = table(&[
            (TextFormKey::VerbForm(VerbForm::Present), "like"),
            (TextFormKey::VerbForm(VerbForm::Past), "liked"),
        ]);
        let (s, new_head) = emit_text(&RuleText::Inflected(verb_table), &mut arena, Some(inner)).unwrap();
        assert_eq!(s, "like");
        // the person-number frame wasn't touched; the verb-form frame
        // beneath it was spliced out.
        assert_eq!(arena.collect(new_head).len(), 1);
    }

    #[test]
    fn case_match_keeps_person_number_on_the_frame() {
        let mut arena: ConsArena<GramProps> = ConsArena::new();
        let head = Some(arena.push(
            None,
            GramProps {
                person_number: Some(PersonNumber::OneSg),
                grammatical_case: Some(GrammaticalCase::Obj),
                ..Default::default()
            },
        ));

        let case_table = table(&[(TextFormKey::GrammaticalCase(GrammaticalCase::Obj), "me")]);
        let (s, new_head) = emit_text(&RuleText::Inflected(case_table), &mut arena, head).unwrap();
        assert_eq!(s, "me");

        let remaining = arena.collect(new_head);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].person_number, Some(PersonNumber::OneSg));
        assert_eq!(remaining[0].grammatical_case, None);
    }

    #[test]
    fn missing_form_reports_the_whole_list() {
        let mut arena: ConsArena<GramProps> = ConsArena::new();
        let head = Some(arena.push(None, GramProps { verb_form: Some(VerbForm::Present), ..Default::default() }));

        let past_only = table(&[(TextFormKey::VerbForm(VerbForm::Past), "liked")]);
        let err = emit_text(&RuleText::Inflected(past_only), &mut arena, head).unwrap_err();
        assert_eq!(err.gram_props_list.len(), 1);
    }

    #[test]
    fn sequence_threads_the_list_through_each_part() {
        let mut arena: ConsArena<GramProps> = ConsArena::new();
        let head = Some(arena.push(None, GramProps { verb_form: Some(VerbForm::Present), ..Default::default() }));

        let verb_table = table(&[(TextFormKey::VerbForm(VerbForm::Present), "like")]);
        let seq = RuleText::Sequence(vec![RuleText::Plain("I".into()), RuleText::Inflected(verb_table)]);

        let (s, _) = emit_text(&seq, &mut arena, head).unwrap();
        assert_eq!(s, "I like");
    }
}
