//! Catalog entity model
//!
//! A [`Pokemon`] is an immutable display payload: it is built once per fetch
//! response, handed to the presentation tree by index, and dropped when the
//! list is replaced.

use std::fmt;
use std::sync::LazyLock;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::error::{CoreError, Result};

/// Largest base stat value in the catalog, used to normalize stat bars
pub const MAX_BASE_STAT: u16 = 255;

/// Elemental type tag of a Pokémon
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PokemonType {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
    /// A tag this build does not know about yet
    Unknown(String),
}

/// RGB accent for a type tag
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Accent {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Accent {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Neutral accent used for unknown tags
    pub const NEUTRAL: Accent = Accent::rgb(0x9e, 0x9e, 0x9e);
}

static ACCENTS: LazyLock<FxHashMap<&'static str, Accent>> = LazyLock::new(|| {
    let mut map = FxHashMap::default();
    map.insert("normal", Accent::rgb(0xa8, 0xa7, 0x7a));
    map.insert("fire", Accent::rgb(0xee, 0x81, 0x30));
    map.insert("water", Accent::rgb(0x63, 0x90, 0xf0));
    map.insert("electric", Accent::rgb(0xf7, 0xd0, 0x2c));
    map.insert("grass", Accent::rgb(0x7a, 0xc7, 0x4c));
    map.insert("ice", Accent::rgb(0x96, 0xd9, 0xd6));
    map.insert("fighting", Accent::rgb(0xc2, 0x2e, 0x28));
    map.insert("poison", Accent::rgb(0xa3, 0x3e, 0xa1));
    map.insert("ground", Accent::rgb(0xe2, 0xbf, 0x65));
    map.insert("flying", Accent::rgb(0xa9, 0x8f, 0xf3));
    map.insert("psychic", Accent::rgb(0xf9, 0x55, 0x87));
    map.insert("bug", Accent::rgb(0xa6, 0xb9, 0x1a));
    map.insert("rock", Accent::rgb(0xb6, 0xa1, 0x36));
    map.insert("ghost", Accent::rgb(0x73, 0x57, 0x97));
    map.insert("dragon", Accent::rgb(0x6f, 0x35, 0xfc));
    map.insert("dark", Accent::rgb(0x70, 0x57, 0x46));
    map.insert("steel", Accent::rgb(0xb7, 0xb7, 0xce));
    map.insert("fairy", Accent::rgb(0xd6, 0x85, 0xad));
    map
});

impl PokemonType {
    /// Parse a catalog tag name (case-insensitive)
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "normal" => PokemonType::Normal,
            "fire" => PokemonType::Fire,
            "water" => PokemonType::Water,
            "electric" => PokemonType::Electric,
            "grass" => PokemonType::Grass,
            "ice" => PokemonType::Ice,
            "fighting" => PokemonType::Fighting,
            "poison" => PokemonType::Poison,
            "ground" => PokemonType::Ground,
            "flying" => PokemonType::Flying,
            "psychic" => PokemonType::Psychic,
            "bug" => PokemonType::Bug,
            "rock" => PokemonType::Rock,
            "ghost" => PokemonType::Ghost,
            "dragon" => PokemonType::Dragon,
            "dark" => PokemonType::Dark,
            "steel" => PokemonType::Steel,
            "fairy" => PokemonType::Fairy,
            other => PokemonType::Unknown(other.to_string()),
        }
    }

    /// Lowercase catalog name of the tag
    pub fn name(&self) -> &str {
        match self {
            PokemonType::Normal => "normal",
            PokemonType::Fire => "fire",
            PokemonType::Water => "water",
            PokemonType::Electric => "electric",
            PokemonType::Grass => "grass",
            PokemonType::Ice => "ice",
            PokemonType::Fighting => "fighting",
            PokemonType::Poison => "poison",
            PokemonType::Ground => "ground",
            PokemonType::Flying => "flying",
            PokemonType::Psychic => "psychic",
            PokemonType::Bug => "bug",
            PokemonType::Rock => "rock",
            PokemonType::Ghost => "ghost",
            PokemonType::Dragon => "dragon",
            PokemonType::Dark => "dark",
            PokemonType::Steel => "steel",
            PokemonType::Fairy => "fairy",
            PokemonType::Unknown(name) => name,
        }
    }

    /// Card accent color for this tag
    pub fn accent(&self) -> Accent {
        ACCENTS.get(self.name()).copied().unwrap_or(Accent::NEUTRAL)
    }
}

impl fmt::Display for PokemonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named base stat
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stat {
    pub name: String,
    pub value: u16,
}

impl Stat {
    pub fn new(name: impl Into<String>, value: u16) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Stat bar fill in [0, 1]
    pub fn fill_fraction(&self) -> f32 {
        (self.value.min(MAX_BASE_STAT) as f32) / MAX_BASE_STAT as f32
    }
}

/// An immutable catalog record
#[derive(Clone, Debug, PartialEq)]
pub struct Pokemon {
    id: u32,
    name: String,
    types: SmallVec<[PokemonType; 2]>,
    image_url: String,
    /// Decimetres
    height: u32,
    /// Hectograms
    weight: u32,
    stats: SmallVec<[Stat; 6]>,
}

impl Pokemon {
    /// Build a record, validating that it has a name and at least one type
    pub fn new(
        id: u32,
        name: impl Into<String>,
        types: impl IntoIterator<Item = PokemonType>,
        image_url: impl Into<String>,
        height: u32,
        weight: u32,
        stats: impl IntoIterator<Item = Stat>,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::InvalidEntity(format!("#{id} has an empty name")));
        }
        let types: SmallVec<[PokemonType; 2]> = types.into_iter().collect();
        if types.is_empty() {
            return Err(CoreError::InvalidEntity(format!("{name} has no type tags")));
        }
        Ok(Self {
            id,
            name,
            types,
            image_url: image_url.into(),
            height,
            weight,
            stats: stats.into_iter().collect(),
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name with the first letter capitalized, as shown on cards
    pub fn display_name(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Catalog number, zero padded to three digits (`#025`)
    pub fn display_number(&self) -> String {
        format!("#{:03}", self.id)
    }

    pub fn types(&self) -> &[PokemonType] {
        &self.types
    }

    /// The first type tag, which decides the card accent
    pub fn primary_type(&self) -> &PokemonType {
        &self.types[0]
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    /// Height in decimetres
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Weight in hectograms
    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn height_m(&self) -> f32 {
        self.height as f32 / 10.0
    }

    pub fn weight_kg(&self) -> f32 {
        self.weight as f32 / 10.0
    }

    pub fn stats(&self) -> &[Stat] {
        &self.stats
    }

    /// Continuity tag linking the list image to the detail image
    ///
    /// Depends only on the id so that both screens derive the same tag.
    pub fn hero_tag(&self) -> HeroTag {
        HeroTag::for_id(self.id)
    }
}

/// Shared visual-continuity tag for the list → detail image transition
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HeroTag(String);

impl HeroTag {
    pub fn for_id(id: u32) -> Self {
        HeroTag(format!("pokemon-hero-{id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HeroTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What an image slot should show
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSlot {
    /// Load this remote image
    Remote(String),
    /// Show the placeholder glyph
    Placeholder,
}

impl ImageSlot {
    /// Pick a slot for a reference; anything that is not http(s) falls back
    pub fn resolve(url: &str) -> Self {
        let url = url.trim();
        if url.starts_with("https://") || url.starts_with("http://") {
            ImageSlot::Remote(url.to_string())
        } else {
            ImageSlot::Placeholder
        }
    }

    /// The image failed to load or decode
    pub fn mark_failed(&mut self) {
        if let ImageSlot::Remote(url) = self {
            tracing::debug!("Image {} failed, showing placeholder", url);
        }
        *self = ImageSlot::Placeholder;
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ImageSlot::Placeholder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pikachu() -> Pokemon {
        Pokemon::new(
            25,
            "pikachu",
            [PokemonType::Electric],
            "https://img.example/25.png",
            4,
            60,
            [Stat::new("hp", 35), Stat::new("speed", 90)],
        )
        .unwrap()
    }

    #[test]
    fn test_entity_accessors() {
        let p = pikachu();
        assert_eq!(p.display_name(), "Pikachu");
        assert_eq!(p.display_number(), "#025");
        assert_eq!(p.primary_type(), &PokemonType::Electric);
        assert!((p.height_m() - 0.4).abs() < 1e-6);
        assert!((p.weight_kg() - 6.0).abs() < 1e-6);
        assert_eq!(p.stats().len(), 2);
    }

    #[test]
    fn test_entity_requires_type_and_name() {
        let no_types = Pokemon::new(1, "bulbasaur", [], "", 7, 69, []);
        assert!(matches!(no_types, Err(CoreError::InvalidEntity(_))));

        let no_name = Pokemon::new(1, "  ", [PokemonType::Grass], "", 7, 69, []);
        assert!(matches!(no_name, Err(CoreError::InvalidEntity(_))));
    }

    #[test]
    fn test_hero_tag_is_deterministic() {
        let a = pikachu();
        let b = pikachu();
        assert_eq!(a.hero_tag(), b.hero_tag());
        assert_eq!(a.hero_tag().as_str(), "pokemon-hero-25");
        assert_ne!(HeroTag::for_id(1), HeroTag::for_id(2));
    }

    #[test]
    fn test_type_names_and_accents() {
        assert_eq!(PokemonType::from_name("FIRE"), PokemonType::Fire);
        let odd = PokemonType::from_name("stellar");
        assert_eq!(odd, PokemonType::Unknown("stellar".into()));
        assert_eq!(odd.accent(), Accent::NEUTRAL);
        assert_ne!(PokemonType::Water.accent(), Accent::NEUTRAL);
    }

    #[test]
    fn test_stat_fill_fraction() {
        assert_eq!(Stat::new("hp", 0).fill_fraction(), 0.0);
        assert_eq!(Stat::new("hp", 255).fill_fraction(), 1.0);
        assert_eq!(Stat::new("hp", 400).fill_fraction(), 1.0);
    }

    #[test]
    fn test_image_slot_fallback() {
        assert_eq!(
            ImageSlot::resolve("https://img.example/1.png"),
            ImageSlot::Remote("https://img.example/1.png".into())
        );
        assert!(ImageSlot::resolve("").is_placeholder());
        assert!(ImageSlot::resolve("not a url").is_placeholder());

        let mut slot = ImageSlot::resolve("https://img.example/1.png");
        slot.mark_failed();
        assert!(slot.is_placeholder());
    }
}
