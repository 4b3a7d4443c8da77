//! Style editing controls.
//!
//! [`StyleControls`] mirrors the editing panel. It is a projection of the
//! selected annotation's stored style: [`StyleControls::sync_from`] refreshes
//! it, and [`StyleControls::apply`] turns one control event into a
//! [`StylePatch`] for the store.

use serde::{Deserialize, Serialize};

use crate::color_utils::Rgb;
use crate::constants;
use crate::model::{Annotation, StylePatch, TextAlign};

/// A single control event, carrying the raw control value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StyleInput {
    FontFamily(String),
    FontSize(String),
    TextColor(String),
    StrokeColor(String),
    StrokeWidth(String),
    Align(String),
    ToggleBold,
    ToggleItalic,
    ToggleUppercase,
}

/// Current values shown by the editing controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleControls {
    pub font_family: String,
    pub font_size: f32,
    /// Readout next to the size slider ("32px")
    pub font_size_label: String,
    /// `#rrggbb`
    pub text_color: String,
    /// `#rrggbb`
    pub stroke_color: String,
    pub stroke_width: f32,
    pub stroke_width_label: String,
    pub align: TextAlign,
    pub bold_active: bool,
    pub italic_active: bool,
    pub uppercase_active: bool,
}

impl Default for StyleControls {
    fn default() -> Self {
        Self {
            font_family: constants::DEFAULT_FONT_FAMILY.to_string(),
            font_size: constants::DEFAULT_FONT_SIZE,
            font_size_label: px_label(constants::DEFAULT_FONT_SIZE),
            text_color: constants::DEFAULT_TEXT_COLOR.to_string(),
            stroke_color: constants::DEFAULT_STROKE_COLOR.to_string(),
            stroke_width: constants::DEFAULT_STROKE_WIDTH,
            stroke_width_label: px_label(constants::DEFAULT_STROKE_WIDTH),
            align: TextAlign::Center,
            bold_active: false,
            italic_active: false,
            uppercase_active: false,
        }
    }
}

fn px_label(value: f32) -> String {
    format!("{}px", value)
}

impl StyleControls {
    /// Populate every control from an annotation's stored style.
    pub fn sync_from(&mut self, annotation: &Annotation) {
        let style = &annotation.style;

        self.font_family = if style.font_family.trim().is_empty() {
            constants::DEFAULT_FONT_FAMILY.to_string()
        } else {
            style.font_family.clone()
        };
        self.set_font_size(if style.font_size_px.is_finite() && style.font_size_px > 0.0 {
            style.font_size_px
        } else {
            constants::DEFAULT_FONT_SIZE
        });
        self.text_color = style.color.to_hex();
        self.stroke_color = style.stroke_color.to_hex();
        self.set_stroke_width(if style.stroke_width_px.is_finite() {
            style.stroke_width_px
        } else {
            constants::DEFAULT_STROKE_WIDTH
        });
        self.align = style.align;
        self.bold_active = style.bold;
        self.italic_active = style.italic;
        self.uppercase_active = style.uppercase;

        log::trace!("Controls synced from annotation {}", annotation.id);
    }

    fn set_font_size(&mut self, value: f32) {
        self.font_size = value;
        self.font_size_label = px_label(value);
    }

    fn set_stroke_width(&mut self, value: f32) {
        self.stroke_width = value;
        self.stroke_width_label = px_label(value);
    }

    /// Translate one control event into a patch for `target`.
    ///
    /// Unparseable values produce no patch and put the control back to the
    /// stored value.
    pub fn apply(&mut self, input: StyleInput, target: &Annotation) -> Option<StylePatch> {
        let style = &target.style;
        match input {
            StyleInput::FontFamily(family) => {
                let family = family.trim();
                if family.is_empty() {
                    self.font_family = style.font_family.clone();
                    return None;
                }
                self.font_family = family.to_string();
                Some(StylePatch::font_family(family))
            }
            StyleInput::FontSize(raw) => match parse_px(&raw) {
                Some(size) => {
                    self.set_font_size(size);
                    Some(StylePatch::font_size(size))
                }
                None => {
                    log::debug!("Ignoring font size input {:?}", raw);
                    self.set_font_size(style.font_size_px);
                    None
                }
            },
            StyleInput::StrokeWidth(raw) => match parse_px(&raw) {
                Some(width) => {
                    self.set_stroke_width(width);
                    Some(StylePatch::stroke_width(width))
                }
                None => {
                    log::debug!("Ignoring stroke width input {:?}", raw);
                    self.set_stroke_width(style.stroke_width_px);
                    None
                }
            },
            StyleInput::TextColor(raw) => match Rgb::parse(&raw) {
                Some(color) => {
                    self.text_color = color.to_hex();
                    Some(StylePatch::color(color))
                }
                None => {
                    log::debug!("Ignoring text color input {:?}", raw);
                    self.text_color = style.color.to_hex();
                    None
                }
            },
            StyleInput::StrokeColor(raw) => match Rgb::parse(&raw) {
                Some(color) => {
                    self.stroke_color = color.to_hex();
                    Some(StylePatch::stroke_color(color))
                }
                None => {
                    log::debug!("Ignoring stroke color input {:?}", raw);
                    self.stroke_color = style.stroke_color.to_hex();
                    None
                }
            },
            StyleInput::Align(raw) => match TextAlign::parse(&raw) {
                Some(align) => {
                    self.align = align;
                    Some(StylePatch::align(align))
                }
                None => {
                    self.align = style.align;
                    None
                }
            },
            StyleInput::ToggleBold => {
                self.bold_active = !style.bold;
                Some(StylePatch::bold(self.bold_active))
            }
            StyleInput::ToggleItalic => {
                self.italic_active = !style.italic;
                Some(StylePatch::italic(self.italic_active))
            }
            StyleInput::ToggleUppercase => {
                self.uppercase_active = !style.uppercase;
                Some(StylePatch::uppercase(self.uppercase_active))
            }
        }
    }
}

/// Parse a numeric control value, with or without a `px` suffix.
fn parse_px(raw: &str) -> Option<f32> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
    number
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Position, TextStyle};

    fn annotation() -> Annotation {
        Annotation::new(1, "TOP TEXT", Position::centered((0.5, 0.1)), TextStyle::default())
    }

    #[test]
    fn test_sync_reflects_stored_style() {
        let mut target = annotation();
        target.style.apply(&StylePatch {
            font_size_px: Some(48.0),
            color: Some(Rgb::new(255, 0, 0)),
            bold: Some(true),
            align: Some(TextAlign::End),
            ..StylePatch::default()
        });

        let mut controls = StyleControls::default();
        controls.sync_from(&target);
        assert_eq!(controls.font_size, 48.0);
        assert_eq!(controls.font_size_label, "48px");
        assert_eq!(controls.text_color, "#ff0000");
        assert_eq!(controls.align, TextAlign::End);
        assert!(controls.bold_active);
        assert!(!controls.italic_active);
    }

    #[test]
    fn test_sync_is_idempotent() {
        let target = annotation();
        let mut controls = StyleControls::default();
        controls.sync_from(&target);
        let first = controls.clone();
        controls.sync_from(&target);
        assert_eq!(controls, first);
    }

    #[test]
    fn test_sync_falls_back_for_blank_values() {
        let mut target = annotation();
        target.style.font_family = "  ".to_string();
        target.style.font_size_px = 0.0;

        let mut controls = StyleControls::default();
        controls.sync_from(&target);
        assert_eq!(controls.font_family, "Impact");
        assert_eq!(controls.font_size, 32.0);
    }

    #[test]
    fn test_numeric_input() {
        let target = annotation();
        let mut controls = StyleControls::default();
        assert_eq!(
            controls.apply(StyleInput::FontSize("40".into()), &target),
            Some(StylePatch::font_size(40.0))
        );
        assert_eq!(controls.font_size_label, "40px");
        assert_eq!(
            controls.apply(StyleInput::StrokeWidth("3.5px".into()), &target),
            Some(StylePatch::stroke_width(3.5))
        );
        assert_eq!(controls.stroke_width_label, "3.5px");
    }

    #[test]
    fn test_malformed_input_keeps_last_good_value() {
        let target = annotation();
        let mut controls = StyleControls::default();
        controls.sync_from(&target);

        assert_eq!(controls.apply(StyleInput::FontSize("big".into()), &target), None);
        assert_eq!(controls.font_size, 32.0);
        assert_eq!(controls.font_size_label, "32px");

        assert_eq!(controls.apply(StyleInput::StrokeWidth("NaN".into()), &target), None);
        assert_eq!(controls.stroke_width, 2.0);

        assert_eq!(controls.apply(StyleInput::TextColor("#12345".into()), &target), None);
        assert_eq!(controls.text_color, "#ffffff");

        assert_eq!(controls.apply(StyleInput::Align("justify".into()), &target), None);
        assert_eq!(controls.align, TextAlign::Center);
    }

    #[test]
    fn test_color_input_is_normalized() {
        let target = annotation();
        let mut controls = StyleControls::default();
        let patch = controls.apply(StyleInput::StrokeColor("#F00".into()), &target);
        assert_eq!(patch, Some(StylePatch::stroke_color(Rgb::new(255, 0, 0))));
        assert_eq!(controls.stroke_color, "#ff0000");
    }

    #[test]
    fn test_toggle_tracks_stored_flag() {
        let mut target = annotation();
        let mut controls = StyleControls::default();

        let patch = controls.apply(StyleInput::ToggleItalic, &target);
        assert_eq!(patch, Some(StylePatch::italic(true)));
        if let Some(patch) = patch {
            target.style.apply(&patch);
        }
        assert_eq!(controls.italic_active, target.style.italic);

        let patch = controls.apply(StyleInput::ToggleItalic, &target);
        assert_eq!(patch, Some(StylePatch::italic(false)));
        assert!(!controls.italic_active);
    }

    #[test]
    fn test_empty_family_is_rejected() {
        let target = annotation();
        let mut controls = StyleControls::default();
        controls.font_family = "Arial".to_string();
        assert_eq!(controls.apply(StyleInput::FontFamily(" ".into()), &target), None);
        assert_eq!(controls.font_family, "Impact");
    }
}
