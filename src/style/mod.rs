//! Style block handling.
//!
//! `<style>` elements are tokenized into declarations, color declarations are
//! passed through the palette, and the block is rebuilt minified.

mod tokenizer;

pub use tokenizer::{StyleRule, StyleToken, build, tokenize};

use crate::color::Color;
use crate::scheme::{ColorSite, Palette};

/// Declarations whose values are colors subject to recoloring.
const COLOR_PROPERTIES: [&str; 3] = ["fill", "stroke", "stop-color"];

/// Rewrites the color declarations of a style block.
///
/// Only `fill`, `stroke` and `stop-color` declarations holding a parseable
/// color are resolved. Keywords such as `none`, `inherit` or `currentColor`,
/// every other declaration, selectors and at-rules are kept as written. An
/// `!important` flag stays on the recolored declaration.
///
/// # Example
///
/// ```
/// use folco_recolor::{Palette, rewrite_style_block};
///
/// let css = rewrite_style_block("path { fill: #D9D9D9; opacity: .5 }", &Palette::flat("currentColor"));
/// assert_eq!(css, "path{fill:currentColor;opacity:.5;}");
/// ```
pub fn rewrite_style_block(text: &str, palette: &Palette) -> String {
    rewrite_with_count(text, palette).0
}

/// Rewrites a style block, also returning how many declarations changed.
pub(crate) fn rewrite_with_count(text: &str, palette: &Palette) -> (String, usize) {
    let mut tokens = tokenize(text);
    let mut changed = 0;

    for token in &mut tokens {
        let StyleToken::Rule(rule) = token else {
            continue;
        };

        let property = rule.key.to_ascii_lowercase();
        if !COLOR_PROPERTIES.contains(&property.as_str()) {
            continue;
        }
        if Color::parse(&rule.value).is_none() {
            tracing::trace!(
                property = %property,
                value = %rule.value,
                "keeping non-color declaration"
            );
            continue;
        }

        let site = ColorSite::Css {
            rule: &*rule,
            property: &property,
        };
        if let Some(color) = palette.resolve(&rule.value, site) {
            tracing::debug!(
                property = %property,
                from = %rule.value,
                to = %color,
                "recolored declaration"
            );
            rule.value = color;
            changed += 1;
        }
    }

    (build(&tokens), changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::{ColorRequest, PaletteMap, Replacement};

    #[test]
    fn flat_palette_rewrites_color_declarations() {
        let css = "path { fill: #D9D9D9; } g { stroke: #000; fill-opacity: .5; fill: gray;} ";
        assert_eq!(
            rewrite_style_block(css, &Palette::flat("currentColor")),
            "path{fill:currentColor;}g{stroke:currentColor;fill-opacity:.5;fill:currentColor;}"
        );
    }

    #[test]
    fn keywords_are_left_alone() {
        let css = "a{fill:none;stroke:currentColor;stop-color:inherit;fill:url(#g)}";
        assert_eq!(
            rewrite_style_block(css, &Palette::flat("red")),
            "a{fill:none;stroke:currentColor;stop-color:inherit;fill:url(#g);}"
        );
    }

    #[test]
    fn stop_color_and_case_insensitive_keys() {
        let css = "stop{STOP-COLOR:#fff}rect{Stroke:rgb(0,0,0);color:#fff}";
        let palette = Palette::from(PaletteMap::new().with("#fff", "white").with("#000", "black"));
        assert_eq!(
            rewrite_style_block(css, &palette),
            "stop{STOP-COLOR:white;}rect{Stroke:black;color:#fff;}"
        );
    }

    #[test]
    fn mapped_misses_keep_original_value() {
        let palette = Palette::from(PaletteMap::new().with("#d9d9d9", "X"));
        let (css, changed) = rewrite_with_count("path{fill:#D9D9D9}g{fill:#123}", &palette);
        assert_eq!(css, "path{fill:X;}g{fill:#123;}");
        assert_eq!(changed, 1);
    }

    #[test]
    fn resolver_result_is_committed() {
        let palette = Palette::from(PaletteMap::new().with_default(Replacement::resolver(
            |request| match request {
                ColorRequest::Css { color, property, .. } => {
                    Some(format!("var(--{property}, {color})"))
                }
                _ => None,
            },
        )));
        assert_eq!(
            rewrite_style_block("path{fill:#D9D9D9}", &palette),
            "path{fill:var(--fill, #d9d9d9);}"
        );
    }

    #[test]
    fn unrelated_values_are_kept_verbatim() {
        let css = "g{fill:url(a/*b*/x.svg#g)}path{fill:#000}";
        assert_eq!(
            rewrite_style_block(css, &Palette::flat("currentColor")),
            "g{fill:url(a/*b*/x.svg#g);}path{fill:currentColor;}"
        );
    }

    #[test]
    fn important_declarations_are_recolored() {
        let (css, changed) =
            rewrite_with_count("path{fill:#D9D9D9 !important}", &Palette::flat("currentColor"));
        assert_eq!(css, "path{fill:currentColor !important;}");
        assert_eq!(changed, 1);

        let palette = Palette::from(PaletteMap::new().with("#fff", "white"));
        assert_eq!(
            rewrite_style_block("a{stroke:#FFF!important;fill:none !important}", &palette),
            "a{stroke:white !important;fill:none !important;}"
        );
    }

    #[test]
    fn empty_style_block() {
        assert_eq!(rewrite_style_block("", &Palette::flat("red")), "");
    }
}
