//! Configuration file management
//!
//! Loads TOML configuration files and provides font settings.
//! Default config path: ~/.config/bitfont/config.toml

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_BASE_SCALE;
use crate::text::{replacement_byte, UnmappablePolicy};

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Font settings
    pub font: FontConfig,
}

/// Font settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Atlas image path (16x16 grid, red channel = coverage)
    pub atlas: PathBuf,
    /// Extra spacing between characters (atlas pixels)
    pub char_spacing: i32,
    /// Advance of the space character (atlas pixels)
    pub space_width: i32,
    /// Every glyph advances by the same block width
    pub fixed_width: bool,
    /// Block width for fixed-width fonts (0 = atlas cell width)
    pub fixed_char_width: u32,
    /// Per-font scale factor
    pub scale_factor: f64,
    /// Base scale shared by all fonts (world units per atlas pixel at scale 1)
    pub base_scale: f64,
    /// Apply pairwise kerning
    pub kerning: bool,
    /// Snap layout start positions to multiples of this (0 = disabled)
    pub min_position_precision: f64,
    /// Handling of characters outside Latin-1: "replace" | "truncate"
    pub unmappable: UnmappablePolicy,
    /// Replacement character for "replace" (must be Latin-1)
    pub replacement: char,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            atlas: PathBuf::new(),
            char_spacing: 2,
            space_width: 8,
            fixed_width: false,
            fixed_char_width: 0,
            scale_factor: 1.0,
            base_scale: DEFAULT_BASE_SCALE,
            kerning: true,
            min_position_precision: 0.0,
            unmappable: UnmappablePolicy::Replace,
            replacement: '?',
        }
    }
}

impl FontConfig {
    /// Latin-1 byte used for unmappable characters
    pub fn replacement_byte(&self) -> u8 {
        replacement_byte(self.replacement)
    }
}

impl Config {
    /// System config path
    const SYSTEM_CONFIG_PATH: &'static str = "/etc/bitfont/config.toml";

    /// Find the config file to use, if any
    pub fn config_path() -> Option<PathBuf> {
        // 1. BITFONT_CONFIG environment variable
        if let Ok(path) = std::env::var("BITFONT_CONFIG") {
            let p = Path::new(&path);
            if p.exists() {
                return Some(p.to_path_buf());
            }
        }

        // 2. User config: ~/.config/bitfont/config.toml
        if let Some(config_path) = default_config_path() {
            if config_path.exists() {
                return Some(config_path);
            }
        }

        // 3. System config: /etc/bitfont/config.toml
        let system_config = Path::new(Self::SYSTEM_CONFIG_PATH);
        if system_config.exists() {
            return Some(system_config.to_path_buf());
        }

        None
    }

    /// Load configuration with priority:
    /// 1. BITFONT_CONFIG environment variable
    /// 2. ~/.config/bitfont/config.toml (user config)
    /// 3. /etc/bitfont/config.toml (system config)
    /// 4. Built-in defaults
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            match Self::load_from_file(&path) {
                Ok(config) => {
                    info!("Loaded config: {}", path.display());
                    return config;
                }
                Err(e) => {
                    warn!("Failed to load config {}: {:#}", path.display(), e);
                }
            }
        }
        info!("Using built-in default config");
        Self::default()
    }

    /// Load settings from specified path
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse settings from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Write the commented config template to the user config path
    pub fn write_default_config() -> Result<PathBuf> {
        let config_path = default_config_path()
            .ok_or_else(|| anyhow::anyhow!("Config directory not found"))?;
        if let Some(dir) = config_path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&config_path, CONFIG_TEMPLATE)?;
        Ok(config_path)
    }
}

/// Get default config file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("bitfont").join("config.toml"))
}

/// Template written by `--init-config`
pub const CONFIG_TEMPLATE: &str = r#"# bitfont configuration
#
# All values are optional; missing keys use built-in defaults.

[font]
# Atlas image: 16x16 grid of glyph cells, red channel used as coverage.
# Cells taller than wide reserve their upper half for accents.
# atlas = "/path/to/font.tga"

# Spacing between characters and width of the space glyph (atlas pixels)
char_spacing = 2
space_width = 8

# Fixed-width mode: every glyph advances by fixed_char_width
# (0 = atlas cell width). Disables kerning.
fixed_width = false
fixed_char_width = 0

# World units per atlas pixel = base_scale * scale_factor
scale_factor = 1.0
base_scale = 0.0625

# Pairwise kerning
kerning = true

# Snap layout start x to multiples of this value (0 = disabled)
min_position_precision = 0.0

# Characters outside Latin-1: "replace" (with `replacement`) or "truncate"
unmappable = "replace"
replacement = "?"
"#;
