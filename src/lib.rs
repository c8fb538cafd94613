//! rathe - an in-memory query engine over a Flesh and Blood card snapshot.
//!
//! The snapshot (cards, sets, keywords, abilities and types) is decoded once
//! into a [`Store`], which indexes cards by ID, name, set, class, type and
//! keyword. The store is immutable after construction and can be shared
//! between threads without locking.
//!
//! # Quick start
//!
//! ```no_run
//! use rathe::{CardFilter, Format, Store};
//!
//! let store = Store::embedded().unwrap();
//!
//! let filter = CardFilter {
//!     class: Some("Ninja".to_string()),
//!     legal_in: Some(Format::Blitz),
//!     limit: 10,
//!     ..Default::default()
//! };
//!
//! let page = store.search_cards(&filter);
//! for card in &page.cards {
//!     println!("{} ({})", card.name, card.pitch);
//! }
//! println!("{} matches", page.total);
//! ```

pub mod data_dir;
pub mod domain;
pub mod error;
pub mod filter;
pub mod index;
pub mod legality;
pub mod loader;
pub mod mcp;
pub mod set_search;
pub mod store;
pub mod view;

pub use data_dir::DataDir;
pub use domain::{Ability, Card, CardType, Keyword, Printing, Set};
pub use error::{Error, Result};
pub use filter::{CardFilter, IndexPlan, SearchPage};
pub use legality::{Format, Legality};
pub use loader::{CatalogSource, DirectorySource, EmbeddedSnapshot};
pub use set_search::SetFilter;
pub use store::{Stats, Store};
