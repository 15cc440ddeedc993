//! Palette application over an SVG tree.
//!
//! The walk descends the document in order, carrying a [`Frame`] that says,
//! per axis, whether shapes below should be left alone, should receive the
//! palette's `add` color, or already have an explicit color from an
//! ancestor. Decisions only depend on ancestors, never on siblings.
//!
//! # Element Kinds
//!
//! ```text
//! mask | clipPath | defs | filter      opaque: skipped with their subtree
//! style                                 text rewritten as a style block
//! path | circle | line | polygon |      shapes: may receive the add color
//!   polyline | rect | ellipse
//! anything else                         container: own attributes only
//! ```

mod frame;

pub use frame::{Axis, Disposition, Frame, is_none};

use crate::scheme::Palette;
use crate::style;
use crate::svg::{Element, Node, SvgDocument, SvgResult};

/// Counts of what a palette change touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecolorStats {
    /// `fill`/`stroke` attributes whose value was replaced.
    pub attributes_recolored: usize,
    /// Shapes that received an `add` color.
    pub colors_added: usize,
    /// Style declarations whose value was replaced.
    pub declarations_recolored: usize,
    /// `<style>` elements rewritten.
    pub style_blocks: usize,
}

impl RecolorStats {
    /// Returns `true` if nothing in the document changed color.
    pub fn is_unchanged(&self) -> bool {
        self.attributes_recolored == 0 && self.colors_added == 0 && self.declarations_recolored == 0
    }
}

/// How the walk treats an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementKind {
    Opaque,
    Style,
    Shape,
    Container,
}

impl ElementKind {
    fn of(name: &str) -> Self {
        match name {
            "mask" | "clipPath" | "defs" | "filter" => Self::Opaque,
            "style" => Self::Style,
            "path" | "circle" | "line" | "polygon" | "polyline" | "rect" | "ellipse" => Self::Shape,
            _ => Self::Container,
        }
    }
}

/// Applies a palette to a document in place.
///
/// The root element's own attributes are not recolored; the walk starts at
/// its children with [`Frame::root`]. Colors that cannot be resolved are left
/// as they are, so this never fails.
///
/// # Example
///
/// ```
/// use folco_recolor::{Palette, PaletteMap, SvgDocument, change_palette};
///
/// let mut doc = SvgDocument::parse(r##"<svg><path fill="#D9D9D9" d="M0 0"/><path d="M1 1"/></svg>"##).unwrap();
/// let palette = Palette::from(PaletteMap::new().with("#d9d9d9", "red").with_add("blue"));
///
/// let stats = change_palette(&mut doc, &palette);
///
/// assert_eq!(stats.attributes_recolored, 1);
/// assert_eq!(stats.colors_added, 1);
/// assert_eq!(
///     doc.to_svg_string().unwrap(),
///     r##"<svg><path fill="red" d="M0 0"/><path d="M1 1" fill="blue"/></svg>"##
/// );
/// ```
pub fn change_palette(document: &mut SvgDocument, palette: &Palette) -> RecolorStats {
    let mut stats = RecolorStats::default();
    walk_children(&mut document.root, &Frame::root(), palette, &mut stats);

    tracing::debug!(
        attributes = stats.attributes_recolored,
        added = stats.colors_added,
        declarations = stats.declarations_recolored,
        style_blocks = stats.style_blocks,
        "palette applied"
    );
    stats
}

/// Parses markup, applies a palette and serializes the result.
pub fn recolor_svg(markup: &str, palette: &Palette) -> SvgResult<String> {
    let mut document = SvgDocument::parse(markup)?;
    change_palette(&mut document, palette);
    document.to_svg_string()
}

fn walk_children(parent: &mut Element, frame: &Frame, palette: &Palette, stats: &mut RecolorStats) {
    for child in parent.children_mut().iter_mut().filter_map(Node::as_element_mut) {
        visit(child, frame, palette, stats);
    }
}

fn visit(element: &mut Element, parent: &Frame, palette: &Palette, stats: &mut RecolorStats) {
    match ElementKind::of(element.name()) {
        ElementKind::Opaque => {
            tracing::trace!(element = element.name(), "skipping opaque subtree");
        }
        ElementKind::Style => {
            let (text, changed) = style::rewrite_with_count(&element.text(), palette);
            element.set_text(text);
            stats.style_blocks += 1;
            stats.declarations_recolored += changed;
        }
        kind => {
            let is_shape = kind == ElementKind::Shape;
            let frame = frame::propagate(element, parent, is_shape, palette, stats);
            walk_children(element, &frame, palette, stats);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
