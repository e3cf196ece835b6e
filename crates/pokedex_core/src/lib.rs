//! Pokédex Core
//!
//! Everything the motion core treats as an external collaborator, kept behind
//! narrow interfaces:
//!
//! - **Entities**: immutable [`Pokemon`] records with type tags, stats and a
//!   deterministic hero tag for the list → detail image transition
//! - **Sources**: the [`CatalogSource`] trait, an in-memory catalog and a JSON
//!   catalog decoder
//! - **Fetching**: a cancellable one-shot [`FetchTask`] that never blocks the
//!   frame driver
//! - **Load state**: [`ScreenLoad`] with retry-from-scratch semantics
//!
//! # Example
//!
//! ```rust
//! use pokedex_core::{CatalogSource, Pokemon, PokemonType, StaticCatalog};
//!
//! let mew = Pokemon::new(151, "mew", [PokemonType::Psychic], "", 4, 40, []).unwrap();
//! let source = StaticCatalog::new(vec![mew]);
//!
//! let list = source.fetch_list(20).unwrap();
//! assert_eq!(list[0].hero_tag().as_str(), "pokemon-hero-151");
//! ```

pub mod entity;
pub mod error;
pub mod fetch;
pub mod geometry;
pub mod load;
pub mod source;

pub use entity::{Accent, HeroTag, ImageSlot, Pokemon, PokemonType, Stat, MAX_BASE_STAT};
pub use error::{CoreError, Result};
pub use fetch::FetchTask;
pub use geometry::Vec2;
pub use load::{LoadPhase, LoadTicket, ScreenLoad};
pub use source::{decode_catalog, CatalogSource, JsonCatalog, StaticCatalog};
