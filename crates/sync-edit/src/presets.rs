//! Built-in colour presets.
//!
//! The table is embedded at compile time and parsed on first use.

use crate::config::{HighlightColors, Rgba};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

const PRESETS_JSON: &str = include_str!("presets.json");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PresetEntry {
    word_text: Rgba,
    region_bg: Rgba,
}

static PRESETS: LazyLock<BTreeMap<String, HighlightColors>> = LazyLock::new(|| {
    match serde_json::from_str::<BTreeMap<String, PresetEntry>>(PRESETS_JSON) {
        Ok(entries) => entries
            .into_iter()
            .map(|(name, entry)| {
                (
                    name,
                    HighlightColors {
                        word_text: entry.word_text,
                        region_background: entry.region_bg,
                    },
                )
            })
            .collect(),
        Err(err) => {
            tracing::warn!("Failed to parse built-in color presets: {}", err);
            BTreeMap::new()
        }
    }
});

/// Colours for the preset called `name`.
pub fn lookup(name: &str) -> Option<HighlightColors> {
    PRESETS.get(name).copied()
}

/// Names of all built-in presets, sorted.
pub fn names() -> impl Iterator<Item = &'static str> {
    PRESETS.keys().map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_parses() {
        let names: Vec<&str> = names().collect();
        assert!(names.contains(&"ocean"));
        assert!(names.contains(&"high-contrast"));
        assert!(!names.contains(&"custom"));
    }

    #[test]
    fn test_lookup() {
        let ocean = lookup("ocean").unwrap();
        assert_eq!(ocean.word_text, Rgba::new(0xe6, 0xf7, 0xff, 0xff));
        assert_eq!(ocean.region_background, Rgba::new(0x00, 0x50, 0x80, 0x66));
        assert!(lookup("Ocean").is_none());
    }
}
