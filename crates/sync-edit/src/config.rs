//! Session configuration.
//!
//! Read once when a session starts. Every field has a default, so an empty YAML document is a
//! valid configuration:
//!
//! ```yaml
//! color_preset: ocean
//! word_text_color: "#000000ff"
//! region_background_color: "#264f78aa"
//! refresh_policy: rescan
//! continuation: exact
//! caret_placement: token_end
//! word_class: unicode
//! ```

use crate::error::SyncEditError;
use crate::policy::ContinuationStrictness;
use crate::presets;
use crate::projector::CaretPlacement;
use crate::session::RefreshPolicy;
use crate::tokenizer::WordClass;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Name of the preset that means "use the explicit colours".
pub const CUSTOM_PRESET: &str = "custom";

/// An RGBA colour, written as `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Rgba {
    /// Create a colour from its channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl FromStr for Rgba {
    type Err = SyncEditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SyncEditError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let a = if hex.len() == 8 { channel(6)? } else { 0xff };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl TryFrom<String> for Rgba {
    type Error = SyncEditError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgba> for String {
    fn from(value: Rgba) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

/// The resolved colour pair used by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightColors {
    /// Colour of the current word's occurrences.
    pub word_text: Rgba,
    /// Background of the whole region.
    pub region_background: Rgba,
}

fn default_preset() -> String {
    CUSTOM_PRESET.to_string()
}

fn default_word_text_color() -> Rgba {
    Rgba::new(0x00, 0x00, 0x00, 0xff)
}

fn default_region_background_color() -> Rgba {
    Rgba::new(0x26, 0x4f, 0x78, 0xaa)
}

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncEditConfig {
    /// Preset name selecting a colour pair; `"custom"` uses the explicit colours.
    pub color_preset: String,
    /// Colour of the current word's occurrences.
    pub word_text_color: Rgba,
    /// Background of the tracked region.
    pub region_background_color: Rgba,
    /// Whether `Next` rescans the region.
    pub refresh_policy: RefreshPolicy,
    /// How readily a collapsed caret keeps the session alive.
    pub continuation: ContinuationStrictness,
    /// Which edge of each occurrence gets the caret.
    pub caret_placement: CaretPlacement,
    /// Which characters form words.
    pub word_class: WordClass,
}

impl Default for SyncEditConfig {
    fn default() -> Self {
        Self {
            color_preset: default_preset(),
            word_text_color: default_word_text_color(),
            region_background_color: default_region_background_color(),
            refresh_policy: RefreshPolicy::default(),
            continuation: ContinuationStrictness::default(),
            caret_placement: CaretPlacement::default(),
            word_class: WordClass::default(),
        }
    }
}

impl SyncEditConfig {
    /// Parse a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SyncEditError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load configuration from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SyncEditError> {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&content)?;
        tracing::info!("Loaded sync-edit config from {}", path.display());
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml_string(&self) -> Result<String, SyncEditError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Resolve the colour pair: a known preset wins, anything else falls back to the explicit
    /// colours.
    pub fn resolve_colors(&self) -> HighlightColors {
        let explicit = HighlightColors {
            word_text: self.word_text_color,
            region_background: self.region_background_color,
        };

        if self.color_preset == CUSTOM_PRESET {
            return explicit;
        }

        match presets::lookup(&self.color_preset) {
            Some(colors) => colors,
            None => {
                tracing::warn!(
                    preset = %self.color_preset,
                    "unknown color preset, using explicit colors"
                );
                explicit
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_colors() {
        assert_eq!(
            "#264f78aa".parse::<Rgba>().unwrap(),
            Rgba::new(0x26, 0x4f, 0x78, 0xaa)
        );
        assert_eq!("#FFFFFF".parse::<Rgba>().unwrap(), Rgba::new(255, 255, 255, 255));
        assert!("264f78".parse::<Rgba>().is_err());
        assert!("#12345".parse::<Rgba>().is_err());
        assert!("#gg0000".parse::<Rgba>().is_err());
        assert!("#éé0000".parse::<Rgba>().is_err());
    }

    #[test]
    fn test_color_display_round_trip() {
        let color = Rgba::new(1, 2, 3, 4);
        assert_eq!(color.to_string(), "#01020304");
        assert_eq!(color.to_string().parse::<Rgba>().unwrap(), color);
    }

    #[test]
    fn test_defaults() {
        let config = SyncEditConfig::default();
        assert_eq!(config.color_preset, "custom");
        assert_eq!(config.word_text_color, Rgba::new(0, 0, 0, 255));
        assert_eq!(config.region_background_color, Rgba::new(0x26, 0x4f, 0x78, 0xaa));
        assert_eq!(config.refresh_policy, RefreshPolicy::Rescan);
        assert_eq!(config.continuation, ContinuationStrictness::Exact);
        assert_eq!(config.caret_placement, CaretPlacement::TokenEnd);
        assert_eq!(config.word_class, WordClass::Unicode);
    }

    #[test]
    fn test_custom_preset_uses_explicit_colors() {
        let config = SyncEditConfig {
            word_text_color: Rgba::new(1, 1, 1, 255),
            ..SyncEditConfig::default()
        };
        assert_eq!(config.resolve_colors().word_text, Rgba::new(1, 1, 1, 255));
    }

    #[test]
    fn test_unknown_preset_falls_back() {
        let config = SyncEditConfig {
            color_preset: "no-such-preset".to_string(),
            ..SyncEditConfig::default()
        };
        assert_eq!(
            config.resolve_colors(),
            HighlightColors {
                word_text: config.word_text_color,
                region_background: config.region_background_color,
            }
        );
    }
}
