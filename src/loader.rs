use std::{
    borrow::Cow,
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
};

use rust_embed::RustEmbed;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    domain::{Ability, Card, CardType, Keyword, Set},
    error::{Error, Result},
};

/// One of the five streams that make up a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    Types,
    Cards,
    Sets,
    Keywords,
    Abilities,
}

impl Dataset {
    /// Load order.
    pub const ALL: [Dataset; 5] = [
        Dataset::Types,
        Dataset::Cards,
        Dataset::Sets,
        Dataset::Keywords,
        Dataset::Abilities,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Dataset::Types => "type.json",
            Dataset::Cards => "card.json",
            Dataset::Sets => "set.json",
            Dataset::Keywords => "keyword.json",
            Dataset::Abilities => "ability.json",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Somewhere the raw snapshot bytes can be read from.
pub trait CatalogSource {
    /// Short description used in logs and errors.
    fn describe(&self) -> String;

    /// Raw bytes of `dataset`, or [`Error::MissingDataset`] if the source
    /// does not have it.
    fn read(&self, dataset: Dataset) -> Result<Cow<'_, [u8]>>;
}

#[derive(RustEmbed)]
#[folder = "data/english/"]
struct SnapshotAssets;

/// The snapshot compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSnapshot;

impl CatalogSource for EmbeddedSnapshot {
    fn describe(&self) -> String {
        "embedded snapshot".to_string()
    }

    fn read(&self, dataset: Dataset) -> Result<Cow<'_, [u8]>> {
        SnapshotAssets::get(dataset.file_name())
            .map(|file| file.data)
            .ok_or_else(|| Error::MissingDataset {
                file: dataset.file_name(),
                origin: self.describe(),
            })
    }
}

/// A directory holding the five snapshot files.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl CatalogSource for DirectorySource {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    fn read(&self, dataset: Dataset) -> Result<Cow<'_, [u8]>> {
        let path = self.root.join(dataset.file_name());
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Cow::Owned(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::MissingDataset {
                    file: dataset.file_name(),
                    origin: self.describe(),
                })
            }
            Err(e) => Err(Error::Io(e)),
        }
    }
}

/// Snapshot streams held in memory, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    streams: HashMap<Dataset, Vec<u8>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A source where every dataset is an empty JSON array.
    pub fn empty() -> Self {
        Dataset::ALL
            .iter()
            .fold(Self::new(), |source, &d| source.with(d, "[]"))
    }

    pub fn with(mut self, dataset: Dataset, json: impl Into<Vec<u8>>) -> Self {
        self.streams.insert(dataset, json.into());
        self
    }

    pub fn without(mut self, dataset: Dataset) -> Self {
        self.streams.remove(&dataset);
        self
    }
}

impl CatalogSource for InMemorySource {
    fn describe(&self) -> String {
        "in-memory source".to_string()
    }

    fn read(&self, dataset: Dataset) -> Result<Cow<'_, [u8]>> {
        self.streams
            .get(&dataset)
            .map(|bytes| Cow::Borrowed(bytes.as_slice()))
            .ok_or_else(|| Error::MissingDataset {
                file: dataset.file_name(),
                origin: self.describe(),
            })
    }
}

/// The five decoded collections, in source order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub types: Vec<CardType>,
    pub cards: Vec<Card>,
    pub sets: Vec<Set>,
    pub keywords: Vec<Keyword>,
    pub abilities: Vec<Ability>,
}

impl Catalog {
    /// Read and decode every dataset from `source`.
    ///
    /// The first missing or malformed stream aborts the load.
    pub fn load(source: &dyn CatalogSource) -> Result<Self> {
        let types = parse(source, Dataset::Types)?;
        let cards = parse(source, Dataset::Cards)?;
        let sets = parse(source, Dataset::Sets)?;
        let keywords = parse(source, Dataset::Keywords)?;
        let abilities = parse(source, Dataset::Abilities)?;

        Ok(Self {
            types,
            cards,
            sets,
            keywords,
            abilities,
        })
    }
}

fn parse<T: DeserializeOwned>(
    source: &dyn CatalogSource,
    dataset: Dataset,
) -> Result<Vec<T>> {
    let bytes = source.read(dataset)?;
    let items: Vec<T> =
        serde_json::from_slice(&bytes).map_err(|error| Error::Parse {
            file: dataset.file_name(),
            error,
        })?;
    debug!(file = dataset.file_name(), count = items.len(), "decoded");
    Ok(items)
}
