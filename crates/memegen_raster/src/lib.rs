//! memegen_raster - off-screen compositing of text over a background bitmap.
//!
//! The editor crate computes where text goes; this crate only paints it.
//! Text is turned into an SVG scene and rendered with resvg onto a tiny-skia
//! pixmap that already holds the background, then encoded as PNG.

mod canvas;
mod error;
mod layer;
mod svg;

pub use canvas::{Canvas, FontBook};
pub use error::{RasterError, Result};
pub use layer::{TextAnchor, TextLayer, TextStroke};
pub use svg::{build_scene, font_family_list};

/// Composite `layers` over an RGBA8 background sized `width` x `height` and return PNG bytes.
///
/// The output has exactly the background's dimensions.
pub fn render_png(
    background: &[u8],
    width: u32,
    height: u32,
    layers: &[TextLayer],
    fonts: &FontBook,
) -> Result<Vec<u8>> {
    let mut canvas = Canvas::new(width, height)?;
    canvas.draw_background(background, width, height)?;
    canvas.draw_text_layers(layers, fonts)?;
    canvas.encode_png()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_png_roundtrips_size() {
        let background = vec![255u8; 30 * 20 * 4];
        let layers = [TextLayer::new("TOP TEXT", 15.0, 4.0, "Impact", 6.0)];
        let png = render_png(&background, 30, 20, &layers, &FontBook::empty()).expect("render");

        let decoded = image::load_from_memory(&png).expect("decode");
        assert_eq!((decoded.width(), decoded.height()), (30, 20));
    }

    #[test]
    fn test_render_png_rejects_empty_background() {
        let result = render_png(&[], 0, 0, &[], &FontBook::empty());
        assert!(matches!(result, Err(RasterError::InvalidSize { .. })));
    }
}
