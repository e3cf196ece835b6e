//! Pokédex configuration file handling
//!
//! `pokedex.toml` holds catalog settings under `[catalog]` next to the motion
//! sections understood by `MotionConfig` (`[stagger]`, `[spring]`, ...).
//! A missing file means defaults.

use anyhow::{Context, Result};
use pokedex_animation::MotionConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "pokedex.toml";

/// Full contents of `pokedex.toml`
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PokedexConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(flatten)]
    pub motion: MotionConfig,
}

/// `[catalog]` section
#[derive(Debug, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// How many entries a list load asks for
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Catalog document used when none is given on the command line
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_limit() -> usize {
    20
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            path: None,
        }
    }
}

impl PokedexConfig {
    /// Load `pokedex.toml` from a directory, falling back to defaults
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join(CONFIG_FILE);
        if !config_path.exists() {
            tracing::debug!("No {} in {}, using defaults", CONFIG_FILE, path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    /// Parse and validate a configuration document
    pub fn parse(content: &str) -> Result<Self> {
        let config: PokedexConfig = toml::from_str(content)?;
        config.motion.validate()?;
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_sections() {
        let config = PokedexConfig::parse(
            r#"
            [catalog]
            limit = 151
            path = "kanto.json"

            [stagger]
            span_fraction = 0.3

            [hover]
            lift = 12.0
            "#,
        )
        .unwrap();
        assert_eq!(config.catalog.limit, 151);
        assert_eq!(config.catalog.path, Some(PathBuf::from("kanto.json")));
        assert_eq!(config.motion.stagger.span_fraction, 0.3);
        assert_eq!(config.motion.hover.lift, 12.0);
    }

    #[test]
    fn test_parse_rejects_bad_motion() {
        assert!(PokedexConfig::parse("[spring]\nstiffness = -1.0").is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = std::env::temp_dir().join("pokedex-cli-missing-config");
        let config = PokedexConfig::load_from_dir(&dir).unwrap();
        assert_eq!(config.catalog.limit, 20);
        assert_eq!(config.motion, MotionConfig::default());
    }
}
