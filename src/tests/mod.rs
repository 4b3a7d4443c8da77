//! Scenario tests for the editor session.
//!
//! These replay message sequences against [`MemeEditor`] with a manual clock,
//! an empty font set and synthetic layout measurements.


use memegen_raster::FontBook;

use crate::clock::ManualClock;
use crate::config::EditorConfig;
use crate::editor::MemeEditor;
use crate::geometry::Rect;
use crate::message::{Message, Notification};

/// Editor with a 500x500 container at the page origin.
fn editor() -> (MemeEditor<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let mut editor = MemeEditor::with_clock(EditorConfig::default(), clock.clone(), FontBook::empty());
    editor.update(Message::ContainerMeasured(Rect::new(0.0, 0.0, 500.0, 500.0)));
    (editor, clock)
}

fn notices(out: &[Notification]) -> Vec<&str> {
    out.iter()
        .filter_map(|n| match n {
            Notification::Notice(text) => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

fn background(width: u32, height: u32) -> image::RgbaImage {
    image::RgbaImage::from_pixel(width, height, image::Rgba([40, 40, 40, 255]))
}
