use std::collections::HashSet;

use crate::{
    domain::{Card, Set},
    store::Store,
};

/// Substring predicates over sets, combined with AND. All of them ignore
/// case; an empty filter matches every set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetFilter {
    /// Substring of the set name.
    pub name: Option<String>,
    /// Substring of the set code.
    pub code: Option<String>,
    /// Substring of either the name or the code.
    pub query: Option<String>,
}

fn needle(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

impl SetFilter {
    pub fn matches(&self, set: &Set) -> bool {
        let name = set.name.to_lowercase();
        let code = set.id.to_lowercase();

        if let Some(n) = needle(&self.name)
            && !name.contains(&n)
        {
            return false;
        }
        if let Some(c) = needle(&self.code)
            && !code.contains(&c)
        {
            return false;
        }
        if let Some(q) = needle(&self.query)
            && !name.contains(&q)
            && !code.contains(&q)
        {
            return false;
        }
        true
    }
}

impl Store {
    /// Sets matching `filter`, in collection order.
    pub fn search_sets(&self, filter: &SetFilter) -> Vec<&Set> {
        self.sets().iter().filter(|s| filter.matches(s)).collect()
    }

    /// Cards with at least one printing in `code`, each listed once, in
    /// collection order.
    pub fn cards_in_set(&self, code: &str) -> Vec<&Card> {
        let Some(bucket) = self.index.by_set(code.trim()) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        bucket
            .iter()
            .map(|&pos| &self.cards()[pos])
            .filter(|&card| seen.insert(card.unique_id.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Store {
        Store::embedded().unwrap()
    }

    fn codes<'a>(sets: &[&'a Set]) -> Vec<&'a str> {
        sets.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn empty_filter_returns_all_sets() {
        let store = store();
        assert_eq!(
            store.search_sets(&SetFilter::default()).len(),
            store.sets().len()
        );
    }

    #[test]
    fn name_substring() {
        let store = store();
        let sets = store.search_sets(&SetFilter {
            name: Some("RATHE".into()),
            ..Default::default()
        });
        assert_eq!(codes(&sets), vec!["WTR"]);
    }

    #[test]
    fn query_matches_name_or_code() {
        let store = store();
        let sets = store.search_sets(&SetFilter {
            query: Some("ar".into()),
            ..Default::default()
        });
        assert_eq!(codes(&sets), vec!["ARC", "CRU", "MON", "ELE"]);

        let sets = store.search_sets(&SetFilter {
            query: Some("1hp".into()),
            ..Default::default()
        });
        assert_eq!(codes(&sets), vec!["1HP"]);
    }

    #[test]
    fn predicates_are_anded() {
        let store = store();
        let sets = store.search_sets(&SetFilter {
            name: Some("a".into()),
            code: Some("r".into()),
            query: None,
        });
        assert_eq!(codes(&sets), vec!["WTR", "ARC", "CRU"]);
    }

    #[test]
    fn cards_in_set_are_deduplicated() {
        let store = store();
        let cards = store.cards_in_set("wtr");
        assert_eq!(cards.len(), 16);

        let mut ids: Vec<&str> =
            cards.iter().map(|c| c.unique_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), cards.len());
        assert_eq!(cards[0].name, "Enlightened Strike");
    }

    #[test]
    fn cards_in_unknown_set_is_empty() {
        assert!(store().cards_in_set("XXX").is_empty());
    }
}
