//! Raster previews of recolored icons using resvg/usvg.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::svg::SvgDocument;

/// Renders an SVG string to an RGBA image at the specified size.
///
/// The SVG is scaled to fit within `size x size` pixels while preserving
/// aspect ratio (the larger dimension will be `size`).
///
/// Returns `None` if the SVG cannot be parsed or rendered.
pub fn render_svg(svg_data: &str, size: u32) -> Option<RgbaImage> {
    let opts = Options::default();
    let tree = Tree::from_str(svg_data, &opts).ok()?;

    let svg_size = tree.size();
    let scale = (size as f32) / svg_size.width().max(svg_size.height());
    let width = (svg_size.width() * scale).ceil() as u32;
    let height = (svg_size.height() * scale).ceil() as u32;

    let mut pixmap = Pixmap::new(width, height)?;
    let transform = Transform::from_scale(scale, scale);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    Some(pixmap_to_rgba_image(&pixmap))
}

/// Renders a document, typically after [`change_palette`](crate::change_palette).
pub fn render_document(document: &SvgDocument, size: u32) -> Option<RgbaImage> {
    let markup = document.to_svg_string().ok()?;
    render_svg(&markup, size)
}

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());

    for (pixel, src) in img.pixels_mut().zip(pixmap.pixels()) {
        // tiny_skia stores premultiplied alpha
        let color = src.demultiply();
        *pixel = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
    }

    img
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recolor::change_palette;
    use crate::scheme::{Palette, PaletteMap};

    const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="10" height="10" fill="#ff0000"/></svg>"##;

    #[test]
    fn render_fits_size() {
        let img = render_svg(SQUARE, 20).unwrap();
        assert_eq!(img.dimensions(), (20, 20));
        assert_eq!(img.get_pixel(10, 10).0, [255, 0, 0, 255]);
    }

    #[test]
    fn render_invalid_svg() {
        assert!(render_svg("not svg", 16).is_none());
    }

    #[test]
    fn recolored_document_renders_new_color() {
        let mut doc = SvgDocument::parse(SQUARE).unwrap();
        change_palette(&mut doc, &Palette::flat("#00ff00"));

        let img = render_document(&doc, 10).unwrap();
        assert_eq!(img.get_pixel(5, 5).0, [0, 255, 0, 255]);
    }

    #[test]
    fn added_color_renders() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"><rect width="4" height="4"/></svg>"#;
        let mut doc = SvgDocument::parse(svg).unwrap();
        change_palette(&mut doc, &Palette::from(PaletteMap::new().with_add("#0000ff")));

        let img = render_document(&doc, 4).unwrap();
        let pixel = img.get_pixel(2, 2);
        assert!(pixel[2] > pixel[0], "Blue should dominate after adding fill");
    }
}
