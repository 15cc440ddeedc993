//! Per-branch fill/stroke state and its propagation through one element.

use crate::scheme::{ColorSite, Palette};
use crate::svg::Element;

use super::RecolorStats;

// ============================================================================
// Disposition
// ============================================================================

/// Recoloring state of one axis (fill or stroke) for a subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Leave this axis alone below here.
    Absent,
    /// Shapes reached without a color on this axis get the palette's `add` color.
    PendingDefault,
    /// An ancestor set this color.
    Explicit(String),
}

/// The two color-bearing attributes tracked through the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Fill,
    Stroke,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::Fill, Axis::Stroke];

    /// Attribute name for this axis.
    pub fn attribute(self) -> &'static str {
        match self {
            Axis::Fill => "fill",
            Axis::Stroke => "stroke",
        }
    }
}

// ============================================================================
// Frame
// ============================================================================

/// Fill and stroke dispositions handed from an element to its children.
///
/// Each element derives its own frame from a copy of its parent's, so a
/// subtree never changes what its siblings see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub fill: Disposition,
    pub stroke: Disposition,
}

impl Frame {
    /// The frame at the top of the document: shapes should be filled,
    /// strokes are left alone.
    pub fn root() -> Self {
        Self {
            fill: Disposition::PendingDefault,
            stroke: Disposition::Absent,
        }
    }

    pub fn get(&self, axis: Axis) -> &Disposition {
        match axis {
            Axis::Fill => &self.fill,
            Axis::Stroke => &self.stroke,
        }
    }

    fn set(&mut self, axis: Axis, disposition: Disposition) {
        match axis {
            Axis::Fill => self.fill = disposition,
            Axis::Stroke => self.stroke = disposition,
        }
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::root()
    }
}

// ============================================================================
// Propagation
// ============================================================================

/// Returns `true` for the `none` paint value.
pub fn is_none(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("none")
}

/// Recolors an element's own fill and stroke and computes the frame for its
/// children.
///
/// For each axis:
/// - `none` turns the axis off for the subtree.
/// - Any other value is resolved through the palette; the final value,
///   rewritten or not, becomes the subtree's explicit color.
/// - A shape without the attribute under a pending axis gets the `add`
///   color when the palette provides one, otherwise the axis stays pending.
/// - Anything else inherits the parent's disposition.
pub(crate) fn propagate(
    element: &mut Element,
    parent: &Frame,
    is_shape: bool,
    palette: &Palette,
    stats: &mut RecolorStats,
) -> Frame {
    let mut frame = parent.clone();

    for axis in Axis::ALL {
        let name = axis.attribute();

        match element.attr(name).map(str::to_string) {
            Some(value) if is_none(&value) => {
                frame.set(axis, Disposition::Absent);
            }
            Some(value) => {
                let site = ColorSite::Node {
                    element: &*element,
                    attribute: name,
                };
                let value = match palette.resolve(&value, site) {
                    Some(color) => {
                        tracing::debug!(
                            element = element.name(),
                            attribute = name,
                            from = %value,
                            to = %color,
                            "recolored attribute"
                        );
                        element.set_attr(name, color.as_str());
                        stats.attributes_recolored += 1;
                        color
                    }
                    None => value,
                };
                frame.set(axis, Disposition::Explicit(value));
            }
            None if is_shape && *parent.get(axis) == Disposition::PendingDefault => {
                match palette.add_color(element) {
                    Some(color) => {
                        tracing::debug!(
                            element = element.name(),
                            attribute = name,
                            color = %color,
                            "added missing color"
                        );
                        element.set_attr(name, color.as_str());
                        stats.colors_added += 1;
                        frame.set(axis, Disposition::Explicit(color));
                    }
                    None => {
                        tracing::trace!(
                            element = element.name(),
                            attribute = name,
                            "no add color, leaving unset"
                        );
                    }
                }
            }
            None => {}
        }
    }

    frame
}
