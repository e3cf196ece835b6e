//! Catalog data sources
//!
//! The screen only ever talks to a [`CatalogSource`]: one call per load or
//! retry, returning the whole list or an error. Transport is up to the
//! implementor; this crate ships an in-memory source and a JSON decoder for
//! catalog documents shaped like the public Pokémon API.

use serde::Deserialize;

use crate::entity::{Pokemon, PokemonType, Stat};
use crate::error::{CoreError, Result};

/// Something that can produce a bounded list of catalog entities
pub trait CatalogSource: Send + Sync {
    /// Fetch at most `limit` entities
    fn fetch_list(&self, limit: usize) -> Result<Vec<Pokemon>>;
}

impl<S: CatalogSource + ?Sized> CatalogSource for std::sync::Arc<S> {
    fn fetch_list(&self, limit: usize) -> Result<Vec<Pokemon>> {
        (**self).fetch_list(limit)
    }
}

/// A source backed by a list held in memory
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    entries: Vec<Pokemon>,
}

impl StaticCatalog {
    pub fn new(entries: Vec<Pokemon>) -> Self {
        Self { entries }
    }
}

impl CatalogSource for StaticCatalog {
    fn fetch_list(&self, limit: usize) -> Result<Vec<Pokemon>> {
        Ok(self.entries.iter().take(limit).cloned().collect())
    }
}

// ============================================================================
// JSON catalog documents
// ============================================================================

#[derive(Deserialize)]
struct RawPokemon {
    id: u32,
    name: String,
    #[serde(default)]
    types: Vec<RawTypeSlot>,
    #[serde(default)]
    sprites: RawSprites,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    weight: u32,
    #[serde(default)]
    stats: Vec<RawStat>,
}

#[derive(Deserialize)]
struct RawTypeSlot {
    #[serde(default)]
    slot: u32,
    #[serde(rename = "type")]
    kind: RawNamed,
}

#[derive(Deserialize)]
struct RawNamed {
    name: String,
}

#[derive(Deserialize, Default)]
struct RawSprites {
    #[serde(default)]
    front_default: Option<String>,
    #[serde(default)]
    other: Option<RawOtherSprites>,
}

#[derive(Deserialize)]
struct RawOtherSprites {
    #[serde(rename = "official-artwork", default)]
    official_artwork: Option<RawArtwork>,
}

#[derive(Deserialize)]
struct RawArtwork {
    #[serde(default)]
    front_default: Option<String>,
}

#[derive(Deserialize)]
struct RawStat {
    base_stat: u16,
    stat: RawNamed,
}

impl RawPokemon {
    fn image_url(&self) -> String {
        self.sprites
            .other
            .as_ref()
            .and_then(|o| o.official_artwork.as_ref())
            .and_then(|a| a.front_default.clone())
            .or_else(|| self.sprites.front_default.clone())
            .unwrap_or_default()
    }

    fn into_entity(mut self) -> Result<Pokemon> {
        let image_url = self.image_url();
        self.types.sort_by_key(|t| t.slot);
        Pokemon::new(
            self.id,
            self.name,
            self.types
                .into_iter()
                .map(|t| PokemonType::from_name(&t.kind.name)),
            image_url,
            self.height,
            self.weight,
            self.stats
                .into_iter()
                .map(|s| Stat::new(s.stat.name, s.base_stat)),
        )
    }
}

/// Decode a catalog document (a JSON array of records) into entities
///
/// A single malformed record fails the whole document; the screen never shows
/// a partial list.
pub fn decode_catalog(json: &str, limit: usize) -> Result<Vec<Pokemon>> {
    let raw: Vec<RawPokemon> = serde_json::from_str(json)?;
    raw.into_iter()
        .take(limit)
        .map(RawPokemon::into_entity)
        .collect()
}

/// A source that decodes a JSON document held in memory
#[derive(Clone, Debug)]
pub struct JsonCatalog {
    document: String,
}

impl JsonCatalog {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
        }
    }

    /// Read the document from disk
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Fetch(format!("{}: {}", path.display(), e)))?;
        Ok(Self::new(document))
    }
}

impl CatalogSource for JsonCatalog {
    fn fetch_list(&self, limit: usize) -> Result<Vec<Pokemon>> {
        let list = decode_catalog(&self.document, limit)?;
        tracing::debug!("Decoded {} catalog entries (limit {})", list.len(), limit);
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"[
        {
            "id": 1,
            "name": "bulbasaur",
            "types": [
                {"slot": 2, "type": {"name": "poison"}},
                {"slot": 1, "type": {"name": "grass"}}
            ],
            "sprites": {
                "front_default": "https://img.example/small/1.png",
                "other": {"official-artwork": {"front_default": "https://img.example/art/1.png"}}
            },
            "height": 7,
            "weight": 69,
            "stats": [
                {"base_stat": 45, "stat": {"name": "hp"}},
                {"base_stat": 49, "stat": {"name": "attack"}}
            ]
        },
        {
            "id": 4,
            "name": "charmander",
            "types": [{"slot": 1, "type": {"name": "fire"}}],
            "sprites": {"front_default": "https://img.example/small/4.png"},
            "height": 6,
            "weight": 85,
            "stats": []
        }
    ]"#;

    #[test]
    fn test_decode_catalog() {
        let list = decode_catalog(DOC, 10).unwrap();
        assert_eq!(list.len(), 2);

        let bulbasaur = &list[0];
        assert_eq!(bulbasaur.id(), 1);
        assert_eq!(
            bulbasaur.types(),
            &[PokemonType::Grass, PokemonType::Poison]
        );
        assert_eq!(bulbasaur.image_url(), "https://img.example/art/1.png");
        assert_eq!(bulbasaur.stats()[1], Stat::new("attack", 49));

        assert_eq!(list[1].image_url(), "https://img.example/small/4.png");
    }

    #[test]
    fn test_decode_respects_limit() {
        let list = decode_catalog(DOC, 1).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name(), "bulbasaur");
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(matches!(decode_catalog("{not json", 10), Err(CoreError::Decode(_))));

        let typeless = r#"[{"id": 7, "name": "squirtle", "types": []}]"#;
        assert!(matches!(
            decode_catalog(typeless, 10),
            Err(CoreError::InvalidEntity(_))
        ));
    }

    #[test]
    fn test_static_catalog_truncates() {
        let source = JsonCatalog::new(DOC);
        let all = source.fetch_list(usize::MAX).unwrap();
        let catalog = StaticCatalog::new(all);
        assert_eq!(catalog.fetch_list(1).unwrap().len(), 1);
        assert_eq!(catalog.fetch_list(5).unwrap().len(), 2);
    }
}
