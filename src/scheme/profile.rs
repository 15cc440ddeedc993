//! Serializable palette configuration.
//!
//! A [`PaletteProfile`] is the JSON form of a [`Palette`]: either a single
//! color string or an object mapping colors to replacements. Resolver
//! callbacks cannot be serialized, so profiles only carry literal colors.
//!
//! # JSON Format
//!
//! ```json
//! "currentColor"
//! ```
//!
//! ```json
//! {
//!   "#d9d9d9": "currentColor",
//!   "default": "#333",
//!   "add": "#000"
//! }
//! ```
//!
//! # Example
//!
//! ```
//! use folco_recolor::{Palette, PaletteProfile};
//!
//! let profile = PaletteProfile::from_json(r##"{"#d9d9d9": "currentColor", "add": "#000"}"##).unwrap();
//! let palette = Palette::from(profile);
//! assert!(matches!(palette, Palette::Mapped(_)));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Palette, PaletteMap};

/// Key holding the fallback for colors with no entry of their own.
pub const DEFAULT_KEY: &str = "default";

/// Key holding the color added to shapes that have none.
pub const ADD_KEY: &str = "add";

/// A serializable palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum PaletteProfile {
    /// A single color for everything.
    Flat(String),
    /// Color keys (plus `default` and `add`) to replacement colors.
    Mapped(BTreeMap<String, String>),
}

impl PaletteProfile {
    /// Creates a flat profile.
    pub fn flat(color: impl Into<String>) -> Self {
        Self::Flat(color.into())
    }

    /// Captures a palette as a profile.
    ///
    /// Returns `None` if any entry is a resolver callback.
    pub fn from_palette(palette: &Palette) -> Option<Self> {
        let map = match palette {
            Palette::Flat(color) => return Some(Self::Flat(color.clone())),
            Palette::Mapped(map) => map,
        };

        let mut entries = BTreeMap::new();
        for (key, replacement) in map.entries() {
            entries.insert(key.to_string(), replacement.as_literal()?.to_string());
        }
        if let Some(default) = map.default_entry() {
            entries.insert(DEFAULT_KEY.to_string(), default.as_literal()?.to_string());
        }
        if let Some(add) = map.add_entry() {
            entries.insert(ADD_KEY.to_string(), add.as_literal()?.to_string());
        }
        Some(Self::Mapped(entries))
    }

    /// Serializes the profile to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the profile to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a profile from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<PaletteProfile> for Palette {
    fn from(profile: PaletteProfile) -> Self {
        match profile {
            PaletteProfile::Flat(color) => Palette::Flat(color),
            PaletteProfile::Mapped(entries) => {
                let mut map = PaletteMap::new();
                for (key, color) in entries {
                    map = if key == DEFAULT_KEY {
                        map.with_default(color)
                    } else if key == ADD_KEY {
                        map.with_add(color)
                    } else {
                        map.with(key, color)
                    };
                }
                Palette::Mapped(map)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
