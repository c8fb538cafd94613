//! Card search.
//!
//! A search picks the narrowest applicable index (class, then type, then
//! keyword, then set), applies the remaining predicates to those candidates
//! in collection order and paginates the result. Without any indexed
//! predicate every card is a candidate.

use std::borrow::Cow;

use serde::Serialize;
use tracing::debug;

use crate::{domain::Card, legality::Format, store::Store};

/// Structured card query. Every field is optional; `None`, empty and
/// whitespace-only strings mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardFilter {
    /// Substring of the card name.
    pub name: Option<String>,
    /// Type tag, compared ignoring case.
    pub type_name: Option<String>,
    /// Derived class, compared ignoring case.
    pub class: Option<String>,
    /// Set code, compared ignoring case.
    pub set: Option<String>,
    /// Exact pitch value.
    pub pitch: Option<String>,
    /// Substring of any of the card's keywords.
    pub keyword: Option<String>,
    /// Substring of the plain ability text.
    pub text: Option<String>,
    pub legal_in: Option<Format>,
    /// Page size; `0` means unbounded.
    pub limit: usize,
    pub offset: usize,
}

fn needle(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn eq_lower(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

impl CardFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set pagination from signed input, clamping negatives to zero.
    pub fn paged(mut self, limit: i64, offset: i64) -> Self {
        self.limit = usize::try_from(limit).unwrap_or(0);
        self.offset = usize::try_from(offset).unwrap_or(0);
        self
    }

    /// Set the format constraint from a user token. Unknown tokens leave the
    /// format unconstrained.
    pub fn legal_in_token(mut self, token: &str) -> Self {
        self.legal_in = Format::parse_lenient(token);
        self
    }

    /// Returns `true` if `card` satisfies every predicate of this filter.
    pub fn matches(&self, card: &Card) -> bool {
        self.matches_except(card, &IndexPlan::FullScan)
    }

    /// Like [`matches`](Self::matches), but skips the predicate that `plan`
    /// already guarantees for its candidates.
    fn matches_except(&self, card: &Card, plan: &IndexPlan) -> bool {
        if let Some(name) = needle(&self.name)
            && !contains_folded(&card.name, name)
        {
            return false;
        }

        if !matches!(plan, IndexPlan::Type(_))
            && let Some(type_name) = needle(&self.type_name)
            && !card.has_type(type_name)
        {
            return false;
        }

        if !matches!(plan, IndexPlan::Class(_))
            && let Some(class) = needle(&self.class)
            && !card.class().is_some_and(|c| eq_lower(c, class))
        {
            return false;
        }

        if !matches!(plan, IndexPlan::Set(_))
            && let Some(set) = needle(&self.set)
            && !card.in_set(set)
        {
            return false;
        }

        if let Some(pitch) = needle(&self.pitch)
            && card.pitch != pitch
        {
            return false;
        }

        if !matches!(plan, IndexPlan::Keyword(_))
            && let Some(keyword) = needle(&self.keyword)
            && !card.has_keyword(keyword)
        {
            return false;
        }

        if let Some(text) = needle(&self.text)
            && !contains_folded(&card.functional_text_plain, text)
        {
            return false;
        }

        if let Some(format) = self.legal_in
            && !card.is_legal_in(format)
        {
            return false;
        }

        true
    }
}

/// Which index a search starts from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "index", content = "key", rename_all = "snake_case")]
pub enum IndexPlan {
    Class(String),
    Type(String),
    Keyword(String),
    Set(String),
    FullScan,
}

impl IndexPlan {
    pub fn for_filter(filter: &CardFilter) -> Self {
        if let Some(class) = needle(&filter.class) {
            IndexPlan::Class(class.to_string())
        } else if let Some(type_name) = needle(&filter.type_name) {
            IndexPlan::Type(type_name.to_string())
        } else if let Some(keyword) = needle(&filter.keyword) {
            IndexPlan::Keyword(keyword.to_string())
        } else if let Some(set) = needle(&filter.set) {
            IndexPlan::Set(set.to_string())
        } else {
            IndexPlan::FullScan
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage<'a> {
    pub cards: Vec<&'a Card>,
    /// Number of matches before pagination.
    pub total: usize,
    pub plan: IndexPlan,
}

impl Store {
    /// The index a search with `filter` would start from.
    pub fn explain(&self, filter: &CardFilter) -> IndexPlan {
        IndexPlan::for_filter(filter)
    }

    /// Positions of the candidate cards for `plan`, ascending and without
    /// duplicates. `None` means every card.
    fn candidates(&self, plan: &IndexPlan) -> Option<Cow<'_, [usize]>> {
        let bucket = match plan {
            IndexPlan::Class(class) => self.index.by_class(class),
            IndexPlan::Type(type_name) => self.index.by_type(type_name),
            IndexPlan::Keyword(keyword) => {
                return Some(
                    self.index
                        .keyword_matches(keyword)
                        .map(Cow::Owned)
                        .unwrap_or(Cow::Borrowed(&[])),
                );
            }
            IndexPlan::Set(code) => {
                // One entry per printing; collapse repeats of the same card.
                let mut positions =
                    self.index.by_set(code).unwrap_or(&[]).to_vec();
                positions.dedup();
                return Some(Cow::Owned(positions));
            }
            IndexPlan::FullScan => return None,
        };
        Some(Cow::Borrowed(bucket.unwrap_or(&[])))
    }

    /// Run `filter` and return the requested page plus the total match
    /// count. Never fails: an offset past the end yields an empty page.
    pub fn search_cards(&self, filter: &CardFilter) -> SearchPage<'_> {
        let plan = IndexPlan::for_filter(filter);

        let matched: Vec<&Card> = match self.candidates(&plan) {
            Some(positions) => positions
                .iter()
                .map(|&pos| &self.cards()[pos])
                .filter(|card| filter.matches_except(card, &plan))
                .collect(),
            None => self
                .cards()
                .iter()
                .filter(|card| filter.matches_except(card, &plan))
                .collect(),
        };

        let total = matched.len();
        debug!(?plan, total, "card search");

        let cards = if filter.offset >= total {
            Vec::new()
        } else {
            let page = matched.into_iter().skip(filter.offset);
            if filter.limit > 0 {
                page.take(filter.limit).collect()
            } else {
                page.collect()
            }
        };

        SearchPage { cards, total, plan }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn store() -> Store {
        Store::embedded().unwrap()
    }

    fn names<'a>(page: &SearchPage<'a>) -> Vec<&'a str> {
        page.cards.iter().map(|c| c.name.as_str()).collect()
    }

    fn ids<'a>(cards: &[&'a Card]) -> Vec<&'a str> {
        cards.iter().map(|c| c.unique_id.as_str()).collect()
    }

    fn full_scan<'a>(store: &'a Store, filter: &CardFilter) -> Vec<&'a Card> {
        store.cards().iter().filter(|c| filter.matches(c)).collect()
    }

    #[test]
    fn empty_filter_returns_everything() {
        let store = store();
        let page = store.search_cards(&CardFilter::new());
        assert_eq!(page.total, store.cards().len());
        assert_eq!(page.cards.len(), store.cards().len());
        assert_eq!(page.plan, IndexPlan::FullScan);
    }

    #[test]
    fn name_is_case_insensitive_substring() {
        let store = store();
        let lower = store.search_cards(&CardFilter {
            name: Some("strike".into()),
            ..Default::default()
        });
        let upper = store.search_cards(&CardFilter {
            name: Some("STRIKE".into()),
            ..Default::default()
        });
        assert_eq!(names(&lower), vec!["Enlightened Strike", "Surging Strike"]);
        assert_eq!(ids(&lower.cards), ids(&upper.cards));
    }

    #[test]
    fn class_results_have_that_class() {
        let store = store();
        let page = store.search_cards(&CardFilter {
            class: Some("ninja".into()),
            ..Default::default()
        });
        assert_eq!(page.total, 6);
        assert!(page.cards.iter().all(|c| c.class() == Some("Ninja")));
        assert_eq!(page.plan, IndexPlan::Class("ninja".into()));
    }

    #[test]
    fn non_ascii_tags_agree_with_card_checks() {
        let card = Card {
            unique_id: "c1".to_string(),
            name: "Test".to_string(),
            types: vec!["Ätherwesen".to_string()],
            card_keywords: vec!["Ärger".to_string()],
            ..Default::default()
        };
        let store = Store::from_catalog(crate::loader::Catalog {
            cards: vec![card],
            ..Default::default()
        });

        let by_type = CardFilter {
            type_name: Some("ätherwesen".into()),
            ..Default::default()
        };
        let by_keyword = CardFilter {
            keyword: Some("ärg".into()),
            ..Default::default()
        };
        for filter in [by_type, by_keyword] {
            let page = store.search_cards(&filter);
            assert_eq!(page.total, 1);
            assert!(filter.matches(&store.cards()[0]));
        }
        assert!(store.cards()[0].has_type("ätherwesen"));
        assert!(store.cards()[0].has_keyword("ärg"));
    }

    #[test]
    fn unknown_class_matches_nothing() {
        let store = store();
        let page = store.search_cards(&CardFilter {
            class: Some("Pirate".into()),
            ..Default::default()
        });
        assert_eq!(page.total, 0);
        assert!(page.cards.is_empty());
    }

    #[test]
    fn legal_in_filters_by_format() {
        let store = store();
        let page = store.search_cards(&CardFilter {
            legal_in: Some(Format::Blitz),
            ..Default::default()
        });
        assert_eq!(page.total, 21);
        assert!(page.cards.iter().all(|c| c.legality(Format::Blitz).legal));
    }

    #[test]
    fn unknown_format_token_is_no_constraint() {
        let store = store();
        let filter = CardFilter::new().legal_in_token("vintage");
        assert_eq!(filter.legal_in, None);
        assert_eq!(store.search_cards(&filter).total, store.cards().len());
    }

    #[test]
    fn blank_fields_are_no_constraint() {
        let store = store();
        let page = store.search_cards(&CardFilter {
            name: Some("   ".into()),
            keyword: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(page.total, store.cards().len());
        assert_eq!(page.plan, IndexPlan::FullScan);
    }

    #[test]
    fn set_plan_collapses_multiple_printings() {
        let store = store();
        let page = store.search_cards(&CardFilter {
            set: Some("wtr".into()),
            ..Default::default()
        });
        assert_eq!(page.plan, IndexPlan::Set("wtr".into()));
        assert_eq!(page.total, 16);
        let mut seen = ids(&page.cards);
        seen.dedup();
        assert_eq!(seen.len(), page.total);
    }

    #[test]
    fn keyword_matches_every_bucket() {
        let store = store();
        // "a" is in Go again, Intimidate, Blade Break, Arcane Barrier...
        let page = store.search_cards(&CardFilter {
            keyword: Some("a".into()),
            ..Default::default()
        });
        assert_eq!(ids(&page.cards), ids(&full_scan(&store, &CardFilter {
            keyword: Some("a".into()),
            ..Default::default()
        })));
        assert!(names(&page).contains(&"Pulping"));
        assert!(names(&page).contains(&"Head Jab"));
    }

    #[test]
    fn plan_priority() {
        let filter = CardFilter {
            set: Some("WTR".into()),
            keyword: Some("go".into()),
            type_name: Some("Action".into()),
            class: Some("Ninja".into()),
            ..Default::default()
        };
        assert_eq!(IndexPlan::for_filter(&filter), IndexPlan::Class("Ninja".into()));

        let filter = CardFilter {
            class: None,
            ..filter
        };
        assert_eq!(IndexPlan::for_filter(&filter), IndexPlan::Type("Action".into()));

        let filter = CardFilter {
            type_name: None,
            ..filter
        };
        assert_eq!(IndexPlan::for_filter(&filter), IndexPlan::Keyword("go".into()));

        let filter = CardFilter {
            keyword: None,
            ..filter
        };
        assert_eq!(IndexPlan::for_filter(&filter), IndexPlan::Set("WTR".into()));
    }

    #[test]
    fn indexed_plan_still_applies_other_indexed_predicates() {
        let store = store();
        // Class drives the plan; the type and set checks must still run.
        let page = store.search_cards(&CardFilter {
            class: Some("Generic".into()),
            type_name: Some("Defense Reaction".into()),
            set: Some("CRU".into()),
            ..Default::default()
        });
        assert_eq!(names(&page), vec!["Sink Below"]);
    }

    #[test]
    fn pitch_is_exact() {
        let store = store();
        let page = store.search_cards(&CardFilter {
            name: Some("head jab".into()),
            pitch: Some("2".into()),
            ..Default::default()
        });
        assert_eq!(page.total, 1);
        assert_eq!(page.cards[0].pitch, "2");
    }

    #[test]
    fn text_query_searches_plain_text() {
        let store = store();
        let page = store.search_cards(&CardFilter {
            text: Some("ARCANE DAMAGE".into()),
            ..Default::default()
        });
        assert!(names(&page).contains(&"Aether Flare"));
    }

    #[test]
    fn offset_past_end_keeps_total() {
        let store = store();
        let filter = CardFilter {
            class: Some("Ninja".into()),
            ..Default::default()
        }
        .paged(10, 6);
        let page = store.search_cards(&filter);
        assert!(page.cards.is_empty());
        assert_eq!(page.total, 6);
    }

    #[test]
    fn limit_truncates() {
        let store = store();
        let page = store.search_cards(&CardFilter::new().paged(5, 2));
        assert_eq!(page.cards.len(), 5);
        assert_eq!(page.cards[0].unique_id, store.cards()[2].unique_id);
        assert_eq!(page.total, store.cards().len());
    }

    #[test]
    fn negative_paging_is_clamped() {
        let filter = CardFilter::new().paged(-5, -1);
        assert_eq!(filter.limit, 0);
        assert_eq!(filter.offset, 0);
    }

    fn maybe(values: &'static [&'static str]) -> BoxedStrategy<Option<String>> {
        proptest::option::of(proptest::sample::select(values))
            .prop_map(|v| v.map(str::to_string))
            .boxed()
    }

    fn arb_filter() -> impl Strategy<Value = CardFilter> {
        (
            maybe(&["strike", "JAB", "a", "of", "zzz"]),
            maybe(&["Action", "attack", "HERO", "Equipment", "Nothing"]),
            maybe(&["Ninja", "generic", "WARRIOR", "Light", "Pirate"]),
            maybe(&["WTR", "cru", "Arc", "1HP", "XXX"]),
            maybe(&["1", "2", "3"]),
            maybe(&["go", "again", "BOOST", "b", "none"]),
            maybe(&["draw", "attack", "Go again"]),
            proptest::option::of(proptest::sample::select(Format::ALL.to_vec())),
        )
            .prop_map(
                |(name, type_name, class, set, pitch, keyword, text, legal_in)| {
                    CardFilter {
                        name,
                        type_name,
                        class,
                        set,
                        pitch,
                        keyword,
                        text,
                        legal_in,
                        limit: 0,
                        offset: 0,
                    }
                },
            )
    }

    proptest! {
        #[test]
        fn index_matches_full_scan(filter in arb_filter()) {
            let store = store();
            let page = store.search_cards(&filter);
            let expected = full_scan(&store, &filter);
            prop_assert_eq!(page.total, expected.len());
            prop_assert_eq!(ids(&page.cards), ids(&expected));
        }

        #[test]
        fn name_case_does_not_matter(filter in arb_filter()) {
            let store = store();
            let upper = CardFilter {
                name: filter.name.as_ref().map(|n| n.to_uppercase()),
                keyword: filter.keyword.as_ref().map(|k| k.to_uppercase()),
                class: filter.class.as_ref().map(|c| c.to_lowercase()),
                set: filter.set.as_ref().map(|s| s.to_lowercase()),
                ..filter.clone()
            };
            prop_assert_eq!(
                ids(&store.search_cards(&filter).cards),
                ids(&store.search_cards(&upper).cards)
            );
        }

        #[test]
        fn pages_reconstruct_the_result(
            filter in arb_filter(),
            limit in 1usize..7,
        ) {
            let store = store();
            let all = store.search_cards(&filter);

            let mut collected = Vec::new();
            let mut offset = 0;
            loop {
                let page = store.search_cards(&CardFilter {
                    limit,
                    offset,
                    ..filter.clone()
                });
                prop_assert_eq!(page.total, all.total);
                let len = page.cards.len();
                collected.extend(page.cards);
                if len < limit {
                    break;
                }
                offset += limit;
            }
            prop_assert_eq!(ids(&collected), ids(&all.cards));
        }
    }
}
