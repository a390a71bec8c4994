//! Configuration handling for trackpack CLI
//!
//! Supports loading configuration from trackpack.toml files with CLI argument overrides.

use crate::error::CliError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use trackpack_core::{LayoutConfig, TrackCapabilities, TrackRegistry, Visibility, MAX_SAFE_HEIGHT};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub image: ImageConfig,

    /// Extra or overridden track types, keyed by type tag
    #[serde(default)]
    pub track_types: BTreeMap<String, TrackCapabilities>,

    #[serde(default)]
    pub tracks: Vec<TrackConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Pixel width of one label character
    #[serde(default = "default_label_char_width")]
    pub label_char_width: u32,

    /// Default output format ("text" or "json")
    #[serde(default = "default_format")]
    pub format: String,

    /// Region used by `plan` when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Tallest image allowed; tracks past it are hidden
    #[serde(default = "default_max_height")]
    pub max_height: u32,

    /// Pixels between stacked tracks
    #[serde(default)]
    pub track_gap: u32,

    /// Row budget for tracks that do not set one
    #[serde(default = "default_budget")]
    pub default_budget: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackConfig {
    pub name: String,

    /// BED file holding the track's features
    pub bed: PathBuf,

    /// Track type tag, e.g. "bed 6" or "bam"
    #[serde(default = "default_track_type")]
    pub r#type: String,

    /// Level to start resolving from
    #[serde(default = "default_visibility")]
    pub visibility: Visibility,

    /// Row budget in pixels, `image.default_budget` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<u32>,
}

// Default value functions
fn default_label_char_width() -> u32 { 6 }
fn default_format() -> String { "text".to_string() }
fn default_max_height() -> u32 { MAX_SAFE_HEIGHT }
fn default_budget() -> u32 { 128 }
fn default_track_type() -> String { "bed".to_string() }
fn default_visibility() -> Visibility { Visibility::Pack }

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            label_char_width: default_label_char_width(),
            format: default_format(),
            region: None,
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_height: default_max_height(),
            track_gap: 0,
            default_budget: default_budget(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                // Try to find trackpack.toml in current directory
                let default_path = PathBuf::from("trackpack.toml");
                if default_path.exists() {
                    log::info!("Loading configuration from: trackpack.toml");
                    Self::load_from_file(&default_path)?
                } else {
                    log::info!("Using default configuration");
                    Self::default()
                }
            }
        };

        config
            .layout
            .validate()
            .map_err(CliError::from)
            .context("Invalid [layout] configuration")?;

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Built-in track types plus any declared in `[track_types]`
    pub fn registry(&self) -> TrackRegistry {
        let mut registry = TrackRegistry::default();
        for (tag, capabilities) in &self.track_types {
            registry.register(tag.clone(), *capabilities);
        }
        registry
    }

    pub fn budget_for(&self, track: &TrackConfig) -> u32 {
        track.budget.unwrap_or(self.image.default_budget)
    }

    /// Generate example configuration file content
    pub fn example_toml() -> Result<String> {
        let mut config = Self::default();
        config.general.region = Some("chr1:1,000,001-1,100,000".to_string());
        config.track_types.insert(
            "narrowPeak".to_string(),
            TrackCapabilities {
                reserve_labels: false,
                self_mapped: false,
                allow_overflow: true,
            },
        );
        config.tracks.push(TrackConfig {
            name: "genes".to_string(),
            bed: PathBuf::from("genes.bed"),
            r#type: "bed 12".to_string(),
            visibility: Visibility::Pack,
            budget: None,
        });
        config.tracks.push(TrackConfig {
            name: "peaks".to_string(),
            bed: PathBuf::from("peaks.bed"),
            r#type: "narrowPeak".to_string(),
            visibility: Visibility::Full,
            budget: Some(60),
        });
        toml::to_string_pretty(&config).context("Failed to serialize example configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.label_char_width, 6);
        assert_eq!(config.image.max_height, 32_000);
        assert_eq!(config.layout.cells_per_row, 256);
        assert!(config.tracks.is_empty());
    }

    #[test]
    fn test_config_roundtrip() -> Result<()> {
        let config: Config = toml::from_str(&Config::example_toml()?)?;
        let temp_file = NamedTempFile::new()?;

        config.save_to_file(temp_file.path())?;
        let loaded = Config::load_from_file(temp_file.path())?;

        assert_eq!(loaded.tracks.len(), 2);
        assert_eq!(loaded.tracks[1].budget, Some(60));
        assert_eq!(loaded.tracks[1].visibility, Visibility::Full);
        assert_eq!(loaded.layout, config.layout);

        Ok(())
    }

    #[test]
    fn test_example_toml_generation() -> Result<()> {
        let example = Config::example_toml()?;
        assert!(example.contains("[general]"));
        assert!(example.contains("[layout]"));
        assert!(example.contains("[[tracks]]"));
        Ok(())
    }

    #[test]
    fn test_partial_file_uses_defaults() -> Result<()> {
        let config: Config = toml::from_str(
            r#"
            [layout]
            overflow_enabled = true

            [[tracks]]
            name = "reads"
            bed = "reads.bed"
            type = "bam"
            "#,
        )?;
        assert!(config.layout.overflow_enabled);
        assert_eq!(config.layout.overflow_item_ceiling, 10_000);
        assert_eq!(config.tracks[0].visibility, Visibility::Pack);
        assert_eq!(config.budget_for(&config.tracks[0]), 128);
        Ok(())
    }

    #[test]
    fn test_registry_includes_declared_types() {
        let mut config = Config::default();
        config.track_types.insert("myGraph".to_string(), TrackCapabilities::GRAPH);
        let registry = config.registry();
        assert!(registry.lookup("myGraph").self_mapped);
        assert!(!registry.lookup("bed 6").self_mapped);
    }

    #[test]
    fn test_invalid_layout_is_rejected_on_load() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        use std::io::Write;
        writeln!(temp_file, "[layout]\ncells_per_row = 0")?;
        let err = Config::load(Some(temp_file.path())).unwrap_err();
        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::Layout(_))));
        Ok(())
    }
}
