//! Off-screen bitmap compositing.
//!
//! The canvas is sized once, receives the background stretched to fill it
//! exactly, and then has text layers painted on top through resvg.

use std::sync::Arc;

use resvg::usvg;
use tiny_skia::{ColorU8, FilterQuality, Pixmap, PixmapPaint, Transform};

use crate::error::{RasterError, Result};
use crate::layer::TextLayer;
use crate::svg::build_scene;

/// Font database shared between renders.
///
/// Loading system fonts is slow, so callers keep one of these around.
#[derive(Clone)]
pub struct FontBook {
    db: Arc<usvg::fontdb::Database>,
}

impl FontBook {
    /// Fonts installed on the host system.
    pub fn system() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        log::debug!("Loaded {} system font faces", db.len());
        settle_generic_families(&mut db);
        Self { db: Arc::new(db) }
    }

    /// An empty database. Text layers render nothing, which keeps tests independent of the host.
    pub fn empty() -> Self {
        Self {
            db: Arc::new(usvg::fontdb::Database::new()),
        }
    }

    /// Add a font from raw TTF/OTF bytes.
    pub fn with_font_data(mut self, data: Vec<u8>) -> Self {
        let db = Arc::make_mut(&mut self.db);
        db.load_font_data(data);
        settle_generic_families(db);
        self
    }

    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Family the `sans-serif` generic resolves to.
    pub fn sans_serif_family(&self) -> &str {
        self.db.family_name(&usvg::fontdb::Family::SansSerif)
    }
}

/// Families tried, in order, when a generic family points at a font the host lacks.
const FALLBACK_FAMILIES: &[&str] = &[
    "Impact",
    "Arial",
    "Helvetica",
    "Liberation Sans",
    "DejaVu Sans",
    "Noto Sans",
    "FreeSans",
];

/// Point every generic family at a family that is actually loaded.
///
/// fontdb maps `sans-serif` to "Arial" and friends regardless of what is
/// installed, so on hosts without those fonts every unknown family would
/// resolve to nothing and text would silently vanish.
fn settle_generic_families(db: &mut usvg::fontdb::Database) {
    use usvg::fontdb::Family;

    let loaded: Vec<String> = db
        .faces()
        .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
        .collect();
    let is_loaded = |name: &str| loaded.iter().any(|f| f.eq_ignore_ascii_case(name));

    let Some(fallback) = FALLBACK_FAMILIES
        .iter()
        .find(|name| is_loaded(name))
        .map(|name| name.to_string())
        .or_else(|| loaded.first().cloned())
    else {
        return;
    };

    let generics = [
        Family::SansSerif,
        Family::Serif,
        Family::Monospace,
        Family::Cursive,
        Family::Fantasy,
    ];
    for generic in generics {
        let current = db.family_name(&generic).to_string();
        if is_loaded(&current) {
            continue;
        }
        log::debug!("Generic family {:?} ({} missing) -> {}", generic, current, fallback);
        match generic {
            Family::SansSerif => db.set_sans_serif_family(fallback.clone()),
            Family::Serif => db.set_serif_family(fallback.clone()),
            Family::Monospace => db.set_monospace_family(fallback.clone()),
            Family::Cursive => db.set_cursive_family(fallback.clone()),
            _ => db.set_fantasy_family(fallback.clone()),
        }
    }
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook").field("faces", &self.db.len()).finish()
    }
}

impl Default for FontBook {
    fn default() -> Self {
        Self::system()
    }
}

/// Premultiplied RGBA bitmap at output resolution.
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    /// Allocate a transparent canvas.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(RasterError::InvalidSize { width, height })?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Draw an unpremultiplied RGBA8 image scaled to cover the whole canvas.
    pub fn draw_background(&mut self, rgba: &[u8], width: u32, height: u32) -> Result<()> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(RasterError::BackgroundBuffer {
                expected,
                actual: rgba.len(),
            });
        }

        let mut source = Pixmap::new(width, height).ok_or(RasterError::InvalidSize { width, height })?;
        for (src, dst) in rgba.chunks_exact(4).zip(source.pixels_mut()) {
            *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
        }

        let sx = self.width() as f32 / width as f32;
        let sy = self.height() as f32 / height as f32;
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        self.pixmap.draw_pixmap(
            0,
            0,
            source.as_ref(),
            &paint,
            Transform::from_scale(sx, sy),
            None,
        );
        log::trace!(
            "Background {}x{} drawn at scale ({:.3}, {:.3})",
            width,
            height,
            sx,
            sy
        );
        Ok(())
    }

    /// Paint text layers in order on top of whatever is already on the canvas.
    pub fn draw_text_layers(&mut self, layers: &[TextLayer], fonts: &FontBook) -> Result<()> {
        if layers.is_empty() {
            return Ok(());
        }

        let scene = build_scene(self.width(), self.height(), layers);
        let options = usvg::Options {
            fontdb: Arc::clone(&fonts.db),
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_str(&scene, &options)?;
        resvg::render(&tree, Transform::identity(), &mut self.pixmap.as_mut());

        log::debug!("Rendered {} text layer(s)", layers.len());
        Ok(())
    }

    /// RGBA8 pixel at (x, y), premultiplied.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap
            .pixel(x, y)
            .map(|p| [p.red(), p.green(), p.blue(), p.alpha()])
    }

    /// Encode the canvas as PNG bytes.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| RasterError::Encode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::TextLayer;

    fn solid(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
        color.iter().copied().cycle().take((width * height * 4) as usize).collect()
    }

    fn assert_close(actual: [u8; 4], expected: [u8; 4]) {
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!(a.abs_diff(*e) <= 2, "{:?} vs {:?}", actual, expected);
        }
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert!(matches!(
            Canvas::new(0, 10),
            Err(RasterError::InvalidSize { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_background_fills_canvas() {
        let mut canvas = Canvas::new(8, 6).expect("canvas");
        canvas
            .draw_background(&solid(4, 3, [200, 10, 10, 255]), 4, 3)
            .expect("background");

        assert_close(canvas.pixel(0, 0).expect("pixel"), [200, 10, 10, 255]);
        assert_close(canvas.pixel(7, 5).expect("pixel"), [200, 10, 10, 255]);
    }

    #[test]
    fn test_background_buffer_mismatch() {
        let mut canvas = Canvas::new(4, 4).expect("canvas");
        let err = canvas.draw_background(&[0; 10], 4, 4).unwrap_err();
        assert!(matches!(err, RasterError::BackgroundBuffer { expected: 64, actual: 10 }));
    }

    #[test]
    fn test_text_without_fonts_leaves_background() {
        let mut canvas = Canvas::new(16, 16).expect("canvas");
        canvas
            .draw_background(&solid(16, 16, [0, 0, 255, 255]), 16, 16)
            .expect("background");
        let layer = TextLayer::new("HELLO", 8.0, 8.0, "Impact", 12.0).with_stroke([0, 0, 0], 2.0);
        canvas
            .draw_text_layers(&[layer], &FontBook::empty())
            .expect("text");

        assert_eq!(canvas.pixel(8, 8), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_png_has_canvas_dimensions() {
        let mut canvas = Canvas::new(20, 10).expect("canvas");
        canvas
            .draw_background(&solid(2, 1, [1, 2, 3, 255]), 2, 1)
            .expect("background");
        let png = canvas.encode_png().expect("png");

        let decoded = image::load_from_memory(&png).expect("decode").to_rgba8();
        assert_eq!(decoded.dimensions(), (20, 10));
        assert_close(decoded.get_pixel(19, 9).0, [1, 2, 3, 255]);
    }

    #[test]
    fn test_translucent_background_is_premultiplied() {
        let mut canvas = Canvas::new(2, 2).expect("canvas");
        canvas
            .draw_background(&solid(2, 2, [200, 0, 0, 128]), 2, 2)
            .expect("background");
        assert_close(canvas.pixel(1, 1).expect("pixel"), [100, 0, 0, 128]);
    }

    #[test]
    fn test_unparseable_font_data_adds_no_faces() {
        let fonts = FontBook::empty().with_font_data(b"not a font".to_vec());
        assert_eq!(fonts.face_count(), 0);
    }

    #[test]
    fn test_generic_families_point_at_loaded_fonts() {
        let fonts = FontBook::system();
        if fonts.face_count() == 0 {
            return;
        }
        let family = fonts.sans_serif_family().to_string();
        assert!(
            fonts
                .db
                .faces()
                .any(|face| face.families.iter().any(|(name, _)| name.eq_ignore_ascii_case(&family))),
            "sans-serif resolves to missing family {}",
            family
        );
    }

    #[test]
    fn test_system_fonts_draw_fill_and_stroke() {
        let fonts = FontBook::system();
        if fonts.face_count() == 0 {
            return;
        }
        let mut canvas = Canvas::new(240, 100).expect("canvas");
        canvas
            .draw_background(&solid(1, 1, [0, 0, 255, 255]), 1, 1)
            .expect("background");
        let layer = TextLayer::new("HELLO", 120.0, 50.0, "Impact", 48.0)
            .with_fill([255, 0, 0])
            .with_stroke([0, 0, 0], 4.0);
        canvas.draw_text_layers(&[layer], &fonts).expect("text");

        let mut red = 0;
        let mut black = 0;
        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                let [r, g, b, _] = canvas.pixel(x, y).expect("pixel");
                if r > 200 && g < 60 && b < 60 {
                    red += 1;
                } else if r < 60 && g < 60 && b < 60 {
                    black += 1;
                }
            }
        }
        assert!(red > 0, "no fill pixels drawn");
        assert!(black > 0, "no outline pixels drawn");
    }
}
