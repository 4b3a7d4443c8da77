//! Reproducing the displayed layout as a bitmap.
//!
//! [`build_plan`] converts stored annotations plus display measurements into
//! output-space [`TextLayer`]s; [`render`] hands them to `memegen_raster`
//! together with the background. [`ExportScheduler`] holds a download that was
//! requested before the background finished loading.

use memegen_raster::{FontBook, TextAnchor, TextLayer};

use crate::background::BackgroundImage;
use crate::clock::unix_epoch_ms;
use crate::constants::export as export_const;
use crate::error::{EditorError, Result};
use crate::geometry::{to_output_space, ImageSize, LayoutMetrics};
use crate::model::{Annotation, TextAlign};

/// A finished export.
#[derive(Clone, PartialEq)]
pub struct ExportedImage {
    /// Suggested download name, `<prefix><epoch-ms>.png`
    pub filename: String,
    pub width: u32,
    pub height: u32,
    /// PNG-encoded bytes
    pub png: Vec<u8>,
}

impl std::fmt::Debug for ExportedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportedImage")
            .field("filename", &self.filename)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("png_bytes", &self.png.len())
            .finish()
    }
}

/// Build the export file name for a wall-clock timestamp.
pub fn export_filename(prefix: &str, epoch_ms: u128) -> String {
    format!("{}{}.{}", prefix, epoch_ms, export_const::FILENAME_EXTENSION)
}

fn anchor_for(align: TextAlign) -> TextAnchor {
    match align {
        TextAlign::Start => TextAnchor::Start,
        TextAlign::Center => TextAnchor::Middle,
        TextAlign::End => TextAnchor::End,
    }
}

/// Convert annotations into draw instructions at native resolution.
///
/// Annotations whose text trims to nothing are skipped. Order is preserved so
/// later annotations paint over earlier ones.
pub fn build_plan<'a>(
    annotations: impl IntoIterator<Item = &'a Annotation>,
    layout: &LayoutMetrics,
    native: ImageSize,
) -> Result<Vec<TextLayer>> {
    let container = layout.container().ok_or(EditorError::LayoutUnavailable)?;

    let mut plan = Vec::new();
    for annotation in annotations {
        let text = annotation.display_text();
        if text.is_empty() {
            continue;
        }
        let Some(rect) = layout.element_rect(annotation) else {
            continue;
        };
        let Some(anchor) = to_output_space(rect, container, native) else {
            continue;
        };

        let style = &annotation.style;
        let layer = TextLayer::new(
            text,
            anchor.x,
            anchor.y,
            style.font_family.clone(),
            style.font_size_px * anchor.scale,
        )
        .with_fill(style.color.to_array())
        .with_stroke(style.stroke_color.to_array(), style.stroke_width_px * anchor.scale)
        .with_anchor(anchor_for(style.align))
        .with_weight(style.bold, style.italic);
        plan.push(layer);
    }

    log::debug!(
        "Export plan: {} layer(s) at {}x{}",
        plan.len(),
        native.width,
        native.height
    );
    Ok(plan)
}

/// Composite the current layout over the loaded background.
pub fn render<'a>(
    annotations: impl IntoIterator<Item = &'a Annotation>,
    background: &BackgroundImage,
    layout: &LayoutMetrics,
    fonts: &FontBook,
    filename_prefix: &str,
) -> Result<ExportedImage> {
    let image = background.image().ok_or(EditorError::AssetNotReady)?;
    let native = ImageSize::new(image.width(), image.height());
    let plan = build_plan(annotations, layout, native)?;

    let png = memegen_raster::render_png(image.as_raw(), native.width, native.height, &plan, fonts)?;
    let filename = export_filename(filename_prefix, unix_epoch_ms());
    log::info!("Exported {} ({} bytes)", filename, png.len());

    Ok(ExportedImage {
        filename,
        width: native.width,
        height: native.height,
        png,
    })
}

/// At most one download waiting for the background to load.
#[derive(Debug, Clone, Default)]
pub struct ExportScheduler {
    pending: bool,
}

impl ExportScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a deferred download. Repeated requests collapse into one.
    pub fn defer(&mut self) {
        if self.pending {
            log::debug!("Export already waiting for background");
        } else {
            log::debug!("Export deferred until background loads");
        }
        self.pending = true;
    }

    /// Take the deferred download, if there is one.
    pub fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, Size};
    use crate::model::{Position, StylePatch, TextStyle};

    fn layout_for(annotation: &Annotation, size: Size) -> LayoutMetrics {
        let mut layout = LayoutMetrics::with_container(Rect::new(0.0, 0.0, 500.0, 500.0));
        layout.set_element_size(annotation.id, size);
        layout
    }

    #[test]
    fn test_plan_scales_to_native() {
        let annotation = Annotation::new(
            1,
            "TOP TEXT",
            Position::Absolute { left: 250.0, top: 50.0 },
            TextStyle::default(),
        );
        let layout = layout_for(&annotation, Size::new(150.0, 40.0));

        let plan = build_plan([&annotation], &layout, ImageSize::new(1000, 1000)).expect("plan");
        assert_eq!(plan.len(), 1);
        let layer = &plan[0];
        assert!((layer.x - 500.0).abs() < 1e-3);
        assert!((layer.y - 140.0).abs() < 1e-3);
        assert_eq!(layer.font_size, 64.0);
        assert_eq!(layer.stroke.map(|s| s.width), Some(4.0));
        assert_eq!(layer.anchor, TextAnchor::Middle);
        assert_eq!(layer.fill, [255, 255, 255]);
    }

    #[test]
    fn test_plan_uppercases_copy_and_trims() {
        let mut annotation = Annotation::new(1, " hello ", Position::centered((0.5, 0.5)), TextStyle::default());
        annotation.style.apply(&StylePatch::uppercase(true));
        let layout = layout_for(&annotation, Size::new(80.0, 40.0));

        let plan = build_plan([&annotation], &layout, ImageSize::new(500, 500)).expect("plan");
        assert_eq!(plan[0].text, "HELLO");
        assert_eq!(annotation.text, " hello ");
    }

    #[test]
    fn test_plan_skips_blank_text() {
        let blank = Annotation::new(1, "   ", Position::centered((0.5, 0.1)), TextStyle::default());
        let kept = Annotation::new(2, "x", Position::centered((0.5, 0.9)), TextStyle::default());
        let layout = LayoutMetrics::with_container(Rect::new(0.0, 0.0, 100.0, 100.0));

        let plan = build_plan([&blank, &kept], &layout, ImageSize::new(100, 100)).expect("plan");
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].text, "x");
    }

    #[test]
    fn test_plan_drops_zero_stroke_and_maps_style() {
        let mut annotation = Annotation::new(1, "x", Position::centered((0.5, 0.5)), TextStyle::default());
        annotation.style.apply(&StylePatch {
            stroke_width_px: Some(0.0),
            align: Some(TextAlign::Start),
            bold: Some(true),
            italic: Some(true),
            ..StylePatch::default()
        });
        let layout = layout_for(&annotation, Size::new(20.0, 40.0));

        let plan = build_plan([&annotation], &layout, ImageSize::new(500, 500)).expect("plan");
        assert!(plan[0].stroke.is_none());
        assert_eq!(plan[0].anchor, TextAnchor::Start);
        assert!(plan[0].bold && plan[0].italic);
    }

    #[test]
    fn test_plan_requires_measured_container() {
        let annotation = Annotation::new(1, "x", Position::centered((0.5, 0.5)), TextStyle::default());
        let result = build_plan([&annotation], &LayoutMetrics::new(), ImageSize::new(10, 10));
        assert!(matches!(result, Err(EditorError::LayoutUnavailable)));
    }

    #[test]
    fn test_render_waits_for_background() {
        let background = BackgroundImage::new("assets/img01.jpg");
        let layout = LayoutMetrics::with_container(Rect::new(0.0, 0.0, 10.0, 10.0));
        let result = render(
            std::iter::empty::<&Annotation>(),
            &background,
            &layout,
            &FontBook::empty(),
            "meme_",
        );
        assert!(matches!(result, Err(EditorError::AssetNotReady)));
    }

    #[test]
    fn test_render_matches_native_size() {
        let mut background = BackgroundImage::new("bg.png");
        background.finish_loading(Ok(image::RgbaImage::from_pixel(
            40,
            20,
            image::Rgba([0, 128, 0, 255]),
        )));
        let annotation = Annotation::new(1, "HI", Position::centered((0.5, 0.5)), TextStyle::default());
        let layout = LayoutMetrics::with_container(Rect::new(0.0, 0.0, 20.0, 10.0));

        let exported = render([&annotation], &background, &layout, &FontBook::empty(), "meme_").expect("render");
        assert_eq!((exported.width, exported.height), (40, 20));
        assert!(exported.filename.starts_with("meme_"));
        assert!(exported.filename.ends_with(".png"));

        let decoded = image::load_from_memory(&exported.png).expect("decode").to_rgba8();
        assert_eq!(decoded.dimensions(), (40, 20));
        assert_eq!(decoded.get_pixel(0, 0).0, [0, 128, 0, 255]);
    }

    #[test]
    fn test_render_draws_text_with_host_fonts() {
        let fonts = crate::editor::load_fonts(FontBook::system(), &[]);
        if fonts.face_count() == 0 {
            return;
        }
        let mut background = BackgroundImage::new("bg.png");
        background.finish_loading(Ok(image::RgbaImage::from_pixel(
            300,
            120,
            image::Rgba([128, 128, 128, 255]),
        )));
        let mut annotation = Annotation::new(1, "hello", Position::centered((0.5, 0.5)), TextStyle::default());
        annotation.style.apply(&StylePatch::uppercase(true));
        let layout = layout_for(&annotation, Size::new(120.0, 40.0));

        let exported = render([&annotation], &background, &layout, &fonts, "meme_").expect("render");
        let decoded = image::load_from_memory(&exported.png).expect("decode").to_rgba8();
        let white = decoded.pixels().filter(|p| p.0[..3].iter().all(|&c| c > 220)).count();
        let black = decoded.pixels().filter(|p| p.0[..3].iter().all(|&c| c < 35)).count();
        assert!(white > 0, "no fill pixels in export");
        assert!(black > 0, "no outline pixels in export");
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename("meme_", 1_700_000_000_123), "meme_1700000000123.png");
    }

    #[test]
    fn test_scheduler_coalesces() {
        let mut scheduler = ExportScheduler::new();
        assert!(!scheduler.take_pending());
        scheduler.defer();
        scheduler.defer();
        assert!(scheduler.is_pending());
        assert!(scheduler.take_pending());
        assert!(!scheduler.take_pending());
    }
}
