use std::{collections::HashMap, time::Instant};

use schemars::JsonSchema;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    domain::{Ability, Card, CardType, Keyword, Set},
    error::Result,
    index::CardIndex,
    loader::{Catalog, CatalogSource, EmbeddedSnapshot},
};

#[derive(Debug, Clone)]
pub struct Store {
    cards: Vec<Card>,
    sets: Vec<Set>,
    keywords: Vec<Keyword>,
    abilities: Vec<Ability>,
    types: Vec<CardType>,

    pub(crate) index: CardIndex,
    /// Uppercased set code.
    sets_by_id: HashMap<String, usize>,
    /// Lowercased keyword name.
    keywords_by_name: HashMap<String, usize>,
    /// Lowercased type name.
    types_by_name: HashMap<String, usize>,
    hybrid_cards: usize,
}

/// Entity counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub struct DataStats {
    pub cards: usize,
    pub sets: usize,
    pub keywords: usize,
    pub abilities: usize,
    pub types: usize,
}

/// Number of distinct keys in each index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub struct IndexStats {
    pub cards_by_id: usize,
    pub cards_by_name: usize,
    pub cards_by_set_id: usize,
    pub sets_by_id: usize,
    pub keywords_by_name: usize,
    pub types_by_name: usize,
    pub cards_by_class: usize,
    pub cards_by_type: usize,
    pub cards_by_keyword: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Stats {
    pub data: DataStats,
    pub index: IndexStats,
}

/// Map `key(item)` to the position of its first occurrence. Returns the
/// number of later duplicates that were skipped.
fn first_wins<T>(
    items: &[T],
    kind: &'static str,
    key: impl Fn(&T) -> String,
) -> (HashMap<String, usize>, usize) {
    let mut map = HashMap::with_capacity(items.len());
    let mut duplicates = 0;
    for (pos, item) in items.iter().enumerate() {
        let k = key(item);
        if map.contains_key(&k) {
            duplicates += 1;
            warn!(kind, key = %k, "duplicate entry, keeping first occurrence");
        } else {
            map.insert(k, pos);
        }
    }
    (map, duplicates)
}

impl Store {
    /// Load every dataset from `source` and index it.
    pub fn open(source: &dyn CatalogSource) -> Result<Self> {
        let start = Instant::now();
        let catalog = Catalog::load(source)?;
        let store = Self::from_catalog(catalog);

        let stats = store.stats();
        info!(
            source = %source.describe(),
            cards = stats.data.cards,
            sets = stats.data.sets,
            keywords = stats.data.keywords,
            abilities = stats.data.abilities,
            types = stats.data.types,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "catalog loaded"
        );
        Ok(store)
    }

    /// Load the snapshot compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::open(&EmbeddedSnapshot)
    }

    /// Index an already decoded catalog.
    pub fn from_catalog(catalog: Catalog) -> Self {
        let Catalog {
            types,
            cards,
            sets,
            keywords,
            abilities,
        } = catalog;

        let index = CardIndex::build(&cards);
        let (sets_by_id, _) = first_wins(&sets, "set", |s| s.id.to_uppercase());
        let (keywords_by_name, _) =
            first_wins(&keywords, "keyword", |k| k.name.to_lowercase());
        let (types_by_name, _) =
            first_wins(&types, "type", |t| t.name.to_lowercase());

        let hybrid_cards =
            cards.iter().filter(|c| c.class_tags().len() > 1).count();
        if hybrid_cards > 0 {
            warn!(
                count = hybrid_cards,
                "cards carry more than one class tag; using the first"
            );
        }

        Self {
            cards,
            sets,
            keywords,
            abilities,
            types,
            index,
            sets_by_id,
            keywords_by_name,
            types_by_name,
            hybrid_cards,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn sets(&self) -> &[Set] {
        &self.sets
    }

    pub fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    pub fn abilities(&self) -> &[Ability] {
        &self.abilities
    }

    pub fn types(&self) -> &[CardType] {
        &self.types
    }

    /// Cards with more than one class-like type tag.
    pub fn hybrid_cards(&self) -> usize {
        self.hybrid_cards
    }

    pub fn get_card_by_id(&self, unique_id: &str) -> Option<&Card> {
        self.index.position_of(unique_id).map(|pos| &self.cards[pos])
    }

    /// Every card named exactly `name` (ignoring case), e.g. all pitch
    /// variants.
    pub fn cards_by_name(&self, name: &str) -> Vec<&Card> {
        self.resolve(self.index.by_name(name))
    }

    /// Look a card up by unique ID, falling back to the first card with that
    /// exact name.
    pub fn resolve_card(&self, reference: &str) -> Option<&Card> {
        let reference = reference.trim();
        self.get_card_by_id(reference).or_else(|| {
            self.index
                .by_name(reference)
                .first()
                .map(|&pos| &self.cards[pos])
        })
    }

    /// Set by code, ignoring case.
    pub fn set_by_id(&self, code: &str) -> Option<&Set> {
        self.sets_by_id
            .get(&code.trim().to_uppercase())
            .map(|&pos| &self.sets[pos])
    }

    /// Keyword by exact name, ignoring case.
    pub fn keyword_by_name(&self, name: &str) -> Option<&Keyword> {
        self.keywords_by_name
            .get(&name.trim().to_lowercase())
            .map(|&pos| &self.keywords[pos])
    }

    pub fn type_by_name(&self, name: &str) -> Option<&CardType> {
        self.types_by_name
            .get(&name.trim().to_lowercase())
            .map(|&pos| &self.types[pos])
    }

    pub fn stats(&self) -> Stats {
        Stats {
            data: DataStats {
                cards: self.cards.len(),
                sets: self.sets.len(),
                keywords: self.keywords.len(),
                abilities: self.abilities.len(),
                types: self.types.len(),
            },
            index: IndexStats {
                cards_by_id: self.index.id_count(),
                cards_by_name: self.index.name_count(),
                cards_by_set_id: self.index.set_count(),
                sets_by_id: self.sets_by_id.len(),
                keywords_by_name: self.keywords_by_name.len(),
                types_by_name: self.types_by_name.len(),
                cards_by_class: self.index.class_count(),
                cards_by_type: self.index.type_count(),
                cards_by_keyword: self.index.keyword_count(),
            },
        }
    }

    pub(crate) fn resolve(&self, positions: &[usize]) -> Vec<&Card> {
        positions.iter().map(|&pos| &self.cards[pos]).collect()
    }
}
