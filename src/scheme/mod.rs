//! Palette specification and color resolution.
//!
//! A [`Palette`] says how colors found in an icon should be replaced:
//!
//! - [`Palette::Flat`] replaces every color with a single value.
//! - [`Palette::Mapped`] looks each color up in a [`PaletteMap`], first by the
//!   value as written, then by its canonical form, then through the `default`
//!   entry.
//!
//! Map entries are [`Replacement`]s: either a literal color or a resolver
//! callback that receives a [`ColorRequest`] describing where the color was
//! found and returns the new color, or `None` to leave it alone.

pub mod profile;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::color;
use crate::style::StyleRule;
use crate::svg::Element;

// ============================================================================
// Color Requests
// ============================================================================

/// Where a color lookup was triggered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A declaration inside a `<style>` block.
    Css,
    /// A `fill` or `stroke` attribute.
    Node,
    /// A shape with no color that should receive the `add` fallback.
    Add,
}

/// The argument passed to resolver callbacks.
///
/// `color` is always the key the lookup actually matched with: the value as
/// written or its canonical form. It is never the `default` sentinel, so a
/// resolver under `default` still sees the real color.
#[derive(Debug, Clone, Copy)]
pub enum ColorRequest<'a> {
    Css {
        color: &'a str,
        rule: &'a StyleRule,
        /// Lowercased declaration name: `fill`, `stroke` or `stop-color`.
        property: &'a str,
    },
    Node {
        color: &'a str,
        element: &'a Element,
        /// `fill` or `stroke`.
        attribute: &'a str,
    },
    Add {
        element: &'a Element,
    },
}

impl<'a> ColorRequest<'a> {
    pub fn origin(&self) -> Origin {
        match self {
            Self::Css { .. } => Origin::Css,
            Self::Node { .. } => Origin::Node,
            Self::Add { .. } => Origin::Add,
        }
    }

    /// The color being replaced, or `None` for [`Origin::Add`].
    pub fn color(&self) -> Option<&'a str> {
        match self {
            Self::Css { color, .. } | Self::Node { color, .. } => Some(*color),
            Self::Add { .. } => None,
        }
    }

    /// The element being recolored, if the request came from the tree.
    pub fn element(&self) -> Option<&'a Element> {
        match self {
            Self::Node { element, .. } | Self::Add { element } => Some(*element),
            Self::Css { .. } => None,
        }
    }
}

/// Where a color being resolved lives, minus the color itself.
#[derive(Debug, Clone, Copy)]
pub enum ColorSite<'a> {
    Css {
        rule: &'a StyleRule,
        property: &'a str,
    },
    Node {
        element: &'a Element,
        attribute: &'a str,
    },
}

impl<'a> ColorSite<'a> {
    fn request(self, color: &'a str) -> ColorRequest<'a> {
        match self {
            Self::Css { rule, property } => ColorRequest::Css {
                color,
                rule,
                property,
            },
            Self::Node { element, attribute } => ColorRequest::Node {
                color,
                element,
                attribute,
            },
        }
    }
}

// ============================================================================
// Replacement
// ============================================================================

/// Resolver callback signature.
pub type ResolverFn = dyn Fn(&ColorRequest<'_>) -> Option<String> + Send + Sync;

/// A palette entry value.
#[derive(Clone)]
pub enum Replacement {
    /// Use this color.
    Literal(String),
    /// Ask the callback. `None` means no change.
    Resolver(Arc<ResolverFn>),
}

impl Replacement {
    pub fn literal(color: impl Into<String>) -> Self {
        Self::Literal(color.into())
    }

    pub fn resolver<F>(resolver: F) -> Self
    where
        F: Fn(&ColorRequest<'_>) -> Option<String> + Send + Sync + 'static,
    {
        Self::Resolver(Arc::new(resolver))
    }

    /// Produces the replacement color for a request.
    pub fn apply(&self, request: &ColorRequest<'_>) -> Option<String> {
        match self {
            Self::Literal(color) => Some(color.clone()),
            Self::Resolver(resolver) => resolver(request),
        }
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(color) => Some(color),
            Self::Resolver(_) => None,
        }
    }
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(color) => f.debug_tuple("Literal").field(color).finish(),
            Self::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

impl From<&str> for Replacement {
    fn from(color: &str) -> Self {
        Self::literal(color)
    }
}

impl From<String> for Replacement {
    fn from(color: String) -> Self {
        Self::Literal(color)
    }
}

// ============================================================================
// PaletteMap
// ============================================================================

/// Color-keyed replacements with optional `default` and `add` entries.
///
/// # Example
///
/// ```
/// use folco_recolor::{PaletteMap, Replacement};
///
/// let map = PaletteMap::new()
///     .with("#d9d9d9", "currentColor")
///     .with_default(Replacement::resolver(|request| {
///         request.color().map(|c| format!("var(--icon, {c})"))
///     }))
///     .with_add("#000");
///
/// assert_eq!(map.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PaletteMap {
    entries: HashMap<String, Replacement>,
    default: Option<Replacement>,
    add: Option<Replacement>,
}

impl PaletteMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry keyed by a literal or canonical color.
    pub fn with(mut self, key: impl Into<String>, replacement: impl Into<Replacement>) -> Self {
        self.insert(key, replacement);
        self
    }

    /// Sets the entry used for colors that match no other key.
    pub fn with_default(mut self, replacement: impl Into<Replacement>) -> Self {
        self.default = Some(replacement.into());
        self
    }

    /// Sets the color given to shapes that should be colored but have none.
    pub fn with_add(mut self, replacement: impl Into<Replacement>) -> Self {
        self.add = Some(replacement.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, replacement: impl Into<Replacement>) {
        self.entries.insert(key.into(), replacement.into());
    }

    pub fn get(&self, key: &str) -> Option<&Replacement> {
        self.entries.get(key)
    }

    pub fn default_entry(&self) -> Option<&Replacement> {
        self.default.as_ref()
    }

    pub fn add_entry(&self) -> Option<&Replacement> {
        self.add.as_ref()
    }

    /// Iterates over the color-keyed entries (not `default` or `add`).
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Replacement)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of color-keyed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.default.is_none() && self.add.is_none()
    }

    /// Finds the entry for a raw value: exact key, canonical key, then `default`.
    ///
    /// Returns the key the match was made with alongside the entry. Values
    /// that are not colors only match exactly.
    fn lookup(&self, raw: &str) -> Option<(String, &Replacement)> {
        if let Some(replacement) = self.entries.get(raw) {
            return Some((raw.to_string(), replacement));
        }

        let Some(canonical) = color::canonical(raw) else {
            tracing::trace!(value = raw, "not a color, skipping palette lookup");
            return None;
        };
        if let Some(replacement) = self.entries.get(&canonical) {
            return Some((canonical, replacement));
        }

        match &self.default {
            Some(replacement) => Some((canonical, replacement)),
            None => {
                tracing::trace!(value = raw, canonical = %canonical, "no palette entry");
                None
            }
        }
    }
}

// ============================================================================
// Palette
// ============================================================================

/// How an icon should be recolored.
#[derive(Debug, Clone)]
pub enum Palette {
    /// Replace every color with this one. Also used as the `add` fallback.
    Flat(String),
    /// Per-color replacements.
    Mapped(PaletteMap),
}

impl Palette {
    pub fn flat(color: impl Into<String>) -> Self {
        Self::Flat(color.into())
    }

    /// Resolves the replacement for a color found at `site`.
    ///
    /// Returns `None` when the color should be left unchanged: the value is
    /// not a color, no entry matches, or a resolver declined.
    pub fn resolve(&self, raw: &str, site: ColorSite<'_>) -> Option<String> {
        let map = match self {
            Self::Flat(color) => return Some(color.clone()),
            Self::Mapped(map) => map,
        };

        let (key, replacement) = map.lookup(raw)?;
        let resolved = replacement.apply(&site.request(&key));
        if resolved.is_none() {
            tracing::trace!(value = raw, key = %key, "resolver declined");
        }
        resolved
    }

    /// Color for a shape that should be colored but has no color attribute.
    pub fn add_color(&self, element: &Element) -> Option<String> {
        match self {
            Self::Flat(color) => Some(color.clone()),
            Self::Mapped(map) => map
                .add
                .as_ref()?
                .apply(&ColorRequest::Add { element }),
        }
    }
}

impl From<&str> for Palette {
    fn from(color: &str) -> Self {
        Self::flat(color)
    }
}

impl From<String> for Palette {
    fn from(color: String) -> Self {
        Self::Flat(color)
    }
}

impl From<PaletteMap> for Palette {
    fn from(map: PaletteMap) -> Self {
        Self::Mapped(map)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn node_site(element: &Element) -> ColorSite<'_> {
        ColorSite::Node {
            element,
            attribute: "fill",
        }
    }

    #[test]
    fn flat_palette_always_replaces() {
        let palette = Palette::flat("currentColor");
        let path = Element::new("path");

        assert_eq!(
            palette.resolve("#D9D9D9", node_site(&path)).as_deref(),
            Some("currentColor")
        );
        assert_eq!(
            palette.resolve("url(#a)", node_site(&path)).as_deref(),
            Some("currentColor")
        );
        assert_eq!(palette.add_color(&path).as_deref(), Some("currentColor"));
    }

    #[test]
    fn exact_match_wins_over_canonical() {
        let palette = Palette::from(
            PaletteMap::new()
                .with("#D9D9D9", "exact")
                .with("#d9d9d9", "canonical"),
        );
        let path = Element::new("path");

        assert_eq!(
            palette.resolve("#D9D9D9", node_site(&path)).as_deref(),
            Some("exact")
        );
        assert_eq!(
            palette.resolve("rgb(217,217,217)", node_site(&path)).as_deref(),
            Some("canonical")
        );
    }

    #[test]
    fn exact_match_for_non_colors() {
        let palette = Palette::from(PaletteMap::new().with("url(#grad)", "url(#other)"));
        let path = Element::new("path");
        assert_eq!(
            palette.resolve("url(#grad)", node_site(&path)).as_deref(),
            Some("url(#other)")
        );
    }

    #[test]
    fn default_entry_catches_unmapped_colors() {
        let palette = Palette::from(PaletteMap::new().with("#fff", "white").with_default("Y"));
        let path = Element::new("path");

        assert_eq!(palette.resolve("#123456", node_site(&path)).as_deref(), Some("Y"));
        assert_eq!(palette.resolve("#FFFFFF", node_site(&path)).as_deref(), Some("white"));
        // Not a color: never reaches the default entry
        assert_eq!(palette.resolve("currentColor", node_site(&path)), None);
    }

    #[test]
    fn miss_without_default_is_no_change() {
        let palette = Palette::from(PaletteMap::new().with("#fff", "white"));
        let path = Element::new("path");
        assert_eq!(palette.resolve("#000", node_site(&path)), None);
        assert_eq!(palette.add_color(&path), None);
    }

    #[test]
    fn default_resolver_sees_real_color() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let palette = Palette::from(PaletteMap::new().with_default(Replacement::resolver(
            move |request| {
                log.lock()
                    .unwrap()
                    .push((request.origin(), request.color().map(str::to_string)));
                Some("Z".to_string())
            },
        )));
        let path = Element::new("path");

        assert_eq!(palette.resolve("#D9D9D9", node_site(&path)).as_deref(), Some("Z"));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![(Origin::Node, Some("#d9d9d9".to_string()))]
        );
    }

    #[test]
    fn exact_resolver_sees_raw_key() {
        let palette = Palette::from(PaletteMap::new().with(
            "#ABC",
            Replacement::resolver(|request| request.color().map(|c| format!("{c}!"))),
        ));
        let path = Element::new("path");
        assert_eq!(palette.resolve("#ABC", node_site(&path)).as_deref(), Some("#ABC!"));
    }

    #[test]
    fn resolver_returning_none_is_no_change() {
        let palette = Palette::from(
            PaletteMap::new()
                .with_default(Replacement::resolver(|_| None))
                .with_add(Replacement::resolver(|_| None)),
        );
        let path = Element::new("path");
        assert_eq!(palette.resolve("#000", node_site(&path)), None);
        assert_eq!(palette.add_color(&path), None);
    }

    #[test]
    fn css_site_builds_css_request() {
        let palette = Palette::from(PaletteMap::new().with_default(Replacement::resolver(
            |request| match request {
                ColorRequest::Css { property, rule, .. } => {
                    Some(format!("{property}/{}", rule.value))
                }
                _ => None,
            },
        )));
        let rule = StyleRule::new("Fill", "red");
        let site = ColorSite::Css {
            rule: &rule,
            property: "fill",
        };
        assert_eq!(palette.resolve("red", site).as_deref(), Some("fill/red"));
    }

    #[test]
    fn add_resolver_receives_element() {
        let palette = Palette::from(PaletteMap::new().with_add(Replacement::resolver(|request| {
            assert_eq!(request.origin(), Origin::Add);
            assert!(request.color().is_none());
            request
                .element()
                .map(|element| format!("{}-color", element.name()))
        })));
        let circle = Element::new("circle");
        assert_eq!(palette.add_color(&circle).as_deref(), Some("circle-color"));
    }
}
