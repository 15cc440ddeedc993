//! folco-recolor: Palette-driven recoloring for SVG icons
//!
//! This crate rewrites the colors of icon markup consistently: every `fill`
//! and `stroke` attribute and every color declaration in `<style>` blocks is
//! passed through a [`Palette`], while `none` values, masks, clip paths,
//! definitions and filters are left alone.
//!
//! # Example
//!
//! ```
//! use folco_recolor::{Palette, recolor_svg};
//!
//! let icon = r##"<svg viewBox="0 0 24 24"><path fill="#D9D9D9" d="M0 0h24v24H0z"/><path d="M4 4h16v16H4z"/></svg>"##;
//! let recolored = recolor_svg(icon, &Palette::flat("currentColor")).unwrap();
//!
//! assert_eq!(
//!     recolored,
//!     r#"<svg viewBox="0 0 24 24"><path fill="currentColor" d="M0 0h24v24H0z"/><path d="M4 4h16v16H4z" fill="currentColor"/></svg>"#
//! );
//! ```
//!
//! # Mapped Palettes
//!
//! Colors can be mapped individually. Keys match the value as written, then
//! its canonical form, then the `default` entry. Shapes with no fill receive
//! the `add` color:
//!
//! ```
//! use folco_recolor::{Palette, PaletteMap, Replacement, SvgDocument, change_palette};
//!
//! let palette = Palette::from(
//!     PaletteMap::new()
//!         .with("#d9d9d9", "var(--secondary)")
//!         .with_default(Replacement::resolver(|request| {
//!             request.color().map(|color| format!("var(--primary, {color})"))
//!         }))
//!         .with_add("var(--primary)"),
//! );
//!
//! let mut doc = SvgDocument::parse(r##"<svg><path fill="#D9D9D9"/><path fill="rgb(0, 0, 0)"/></svg>"##).unwrap();
//! change_palette(&mut doc, &palette);
//!
//! assert_eq!(
//!     doc.to_svg_string().unwrap(),
//!     r#"<svg><path fill="var(--secondary)"/><path fill="var(--primary, #000)"/></svg>"#
//! );
//! ```
//!
//! # Serializable Palettes
//!
//! For configuration files, use [`PaletteProfile`]:
//!
//! ```
//! use folco_recolor::{Palette, PaletteProfile, recolor_svg};
//!
//! let profile = PaletteProfile::from_json(r##"{"#000": "white", "add": "white"}"##).unwrap();
//! let palette = Palette::from(profile);
//!
//! let out = recolor_svg(r#"<svg><circle r="4"/></svg>"#, &palette).unwrap();
//! assert_eq!(out, r#"<svg><circle r="4" fill="white"/></svg>"#);
//! ```

mod color;
mod preview;
mod recolor;
mod scheme;
mod style;
mod svg;

pub use color::{Color, canonical};
pub use preview::{render_document, render_svg};
pub use recolor::{Axis, Disposition, Frame, RecolorStats, change_palette, is_none, recolor_svg};
pub use scheme::profile::PaletteProfile;
pub use scheme::{ColorRequest, ColorSite, Origin, Palette, PaletteMap, Replacement, ResolverFn};
pub use style::{
    StyleRule, StyleToken, build as build_style, rewrite_style_block, tokenize as tokenize_style,
};
pub use svg::{Element, Node, SvgDocument, SvgError, SvgResult};
