use std::collections::HashMap;

use tracing::warn;

use crate::domain::Card;

#[derive(Debug, Clone, Default)]
pub struct CardIndex {
    by_id: HashMap<String, usize>,
    /// Lowercased name.
    by_name: HashMap<String, Vec<usize>>,
    /// Uppercased set code, one entry per printing.
    by_set: HashMap<String, Vec<usize>>,
    /// Lowercased derived class.
    by_class: HashMap<String, Vec<usize>>,
    /// Lowercased type tag.
    by_type: HashMap<String, Vec<usize>>,
    /// Literal keyword string.
    by_keyword: HashMap<String, Vec<usize>>,
    duplicate_ids: usize,
}

fn push_unique(bucket: &mut Vec<usize>, position: usize) {
    if bucket.last() != Some(&position) {
        bucket.push(position);
    }
}

impl CardIndex {
    /// Index `cards` in a single pass.
    pub fn build(cards: &[Card]) -> Self {
        let mut index = Self::default();

        for (pos, card) in cards.iter().enumerate() {
            if index.by_id.contains_key(&card.unique_id) {
                index.duplicate_ids += 1;
                warn!(
                    unique_id = %card.unique_id,
                    name = %card.name,
                    "duplicate card id, keeping first occurrence"
                );
            } else {
                index.by_id.insert(card.unique_id.clone(), pos);
            }

            index
                .by_name
                .entry(card.name.to_lowercase())
                .or_default()
                .push(pos);

            for printing in &card.printings {
                index
                    .by_set
                    .entry(printing.set_id.to_uppercase())
                    .or_default()
                    .push(pos);
            }

            if let Some(class) = card.class() {
                index
                    .by_class
                    .entry(class.to_lowercase())
                    .or_default()
                    .push(pos);
            }

            for tag in &card.types {
                push_unique(
                    index.by_type.entry(tag.to_lowercase()).or_default(),
                    pos,
                );
            }

            for keyword in &card.card_keywords {
                push_unique(
                    index.by_keyword.entry(keyword.clone()).or_default(),
                    pos,
                );
            }
        }

        index
    }

    pub fn position_of(&self, unique_id: &str) -> Option<usize> {
        self.by_id.get(unique_id).copied()
    }

    /// Cards whose name equals `name`, ignoring case.
    pub fn by_name(&self, name: &str) -> &[usize] {
        bucket(&self.by_name, &name.to_lowercase())
    }

    /// Cards with a printing in `code`. A card with several printings in the
    /// set appears once per printing.
    pub fn by_set(&self, code: &str) -> Option<&[usize]> {
        self.by_set.get(&code.to_uppercase()).map(Vec::as_slice)
    }

    pub fn by_class(&self, class: &str) -> Option<&[usize]> {
        self.by_class.get(&class.to_lowercase()).map(Vec::as_slice)
    }

    pub fn by_type(&self, type_name: &str) -> Option<&[usize]> {
        self.by_type.get(&type_name.to_lowercase()).map(Vec::as_slice)
    }

    /// Union of every keyword bucket whose key contains `needle`
    /// (case-insensitive), in ascending position order. `None` if no key
    /// matches.
    pub fn keyword_matches(&self, needle: &str) -> Option<Vec<usize>> {
        let needle = needle.to_lowercase();
        let mut buckets = self
            .by_keyword
            .iter()
            .filter(|(key, _)| key.to_lowercase().contains(&needle))
            .map(|(_, bucket)| bucket.as_slice())
            .peekable();

        buckets.peek()?;

        let mut merged: Vec<usize> = buckets.flatten().copied().collect();
        merged.sort_unstable();
        merged.dedup();
        Some(merged)
    }

    pub fn id_count(&self) -> usize {
        self.by_id.len()
    }

    pub fn name_count(&self) -> usize {
        self.by_name.len()
    }

    pub fn set_count(&self) -> usize {
        self.by_set.len()
    }

    pub fn class_count(&self) -> usize {
        self.by_class.len()
    }

    pub fn type_count(&self) -> usize {
        self.by_type.len()
    }

    pub fn keyword_count(&self) -> usize {
        self.by_keyword.len()
    }

    pub fn duplicate_ids(&self) -> usize {
        self.duplicate_ids
    }
}

fn bucket<'a>(map: &'a HashMap<String, Vec<usize>>, key: &str) -> &'a [usize] {
    map.get(key).map(Vec::as_slice).unwrap_or(&[])
}
