//! Text annotation types and data structures.

use serde::{Deserialize, Serialize};

use crate::color_utils::Rgb;
use crate::constants;

/// Unique identifier for an annotation.
pub type AnnotationId = u64;

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Left-aligned (`left` / `start`)
    Start,
    /// Centred
    #[default]
    Center,
    /// Right-aligned (`right` / `end`)
    End,
}

impl TextAlign {
    /// Get the control value for this alignment.
    pub fn name(&self) -> &'static str {
        match self {
            TextAlign::Start => "left",
            TextAlign::Center => "center",
            TextAlign::End => "right",
        }
    }

    /// Parse a control value, accepting both CSS keyword families.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Some(TextAlign::Start),
            "center" | "centre" | "middle" => Some(TextAlign::Center),
            "right" | "end" => Some(TextAlign::End),
            _ => None,
        }
    }

    /// Get all alignments in control order.
    pub fn all() -> &'static [TextAlign] {
        &[TextAlign::Start, TextAlign::Center, TextAlign::End]
    }
}

/// Where an annotation's element sits inside the canvas container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Position {
    /// Element centred on a fractional container point (0..1 on both axes).
    Centered { x: f32, y: f32 },
    /// Explicit container-relative top-left offset in display pixels.
    Absolute { left: f32, top: f32 },
}

impl Position {
    pub fn centered((x, y): (f32, f32)) -> Self {
        Position::Centered { x, y }
    }

    /// Whether the user has placed this element explicitly.
    pub fn is_absolute(&self) -> bool {
        matches!(self, Position::Absolute { .. })
    }
}

/// Which slot an annotation was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotRole {
    Top,
    Bottom,
    /// Created with "add"
    Added,
}

/// Visual attributes of an annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size_px: f32,
    pub color: Rgb,
    pub stroke_color: Rgb,
    pub stroke_width_px: f32,
    #[serde(default)]
    pub align: TextAlign,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    /// Display transform only; stored text keeps its case.
    #[serde(default)]
    pub uppercase: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: constants::DEFAULT_FONT_FAMILY.to_string(),
            font_size_px: constants::DEFAULT_FONT_SIZE,
            color: Rgb::WHITE,
            stroke_color: Rgb::BLACK,
            stroke_width_px: constants::DEFAULT_STROKE_WIDTH,
            align: TextAlign::Center,
            bold: false,
            italic: false,
            uppercase: false,
        }
    }
}

impl TextStyle {
    /// Apply a partial update. Numeric fields are clamped to be non-negative;
    /// non-finite numbers are ignored.
    pub fn apply(&mut self, patch: &StylePatch) {
        if let Some(family) = &patch.font_family {
            self.font_family = family.clone();
        }
        if let Some(size) = patch.font_size_px.filter(|v| v.is_finite()) {
            self.font_size_px = size.max(0.0);
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(color) = patch.stroke_color {
            self.stroke_color = color;
        }
        if let Some(width) = patch.stroke_width_px.filter(|v| v.is_finite()) {
            self.stroke_width_px = width.max(0.0);
        }
        if let Some(align) = patch.align {
            self.align = align;
        }
        if let Some(bold) = patch.bold {
            self.bold = bold;
        }
        if let Some(italic) = patch.italic {
            self.italic = italic;
        }
        if let Some(uppercase) = patch.uppercase {
            self.uppercase = uppercase;
        }
    }
}

/// A partial style update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StylePatch {
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub font_size_px: Option<f32>,
    #[serde(default)]
    pub color: Option<Rgb>,
    #[serde(default)]
    pub stroke_color: Option<Rgb>,
    #[serde(default)]
    pub stroke_width_px: Option<f32>,
    #[serde(default)]
    pub align: Option<TextAlign>,
    #[serde(default)]
    pub bold: Option<bool>,
    #[serde(default)]
    pub italic: Option<bool>,
    #[serde(default)]
    pub uppercase: Option<bool>,
}

impl StylePatch {
    pub fn font_family(value: impl Into<String>) -> Self {
        Self {
            font_family: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn font_size(px: f32) -> Self {
        Self {
            font_size_px: Some(px),
            ..Self::default()
        }
    }

    pub fn color(color: Rgb) -> Self {
        Self {
            color: Some(color),
            ..Self::default()
        }
    }

    pub fn stroke_color(color: Rgb) -> Self {
        Self {
            stroke_color: Some(color),
            ..Self::default()
        }
    }

    pub fn stroke_width(px: f32) -> Self {
        Self {
            stroke_width_px: Some(px),
            ..Self::default()
        }
    }

    pub fn align(align: TextAlign) -> Self {
        Self {
            align: Some(align),
            ..Self::default()
        }
    }

    pub fn bold(on: bool) -> Self {
        Self {
            bold: Some(on),
            ..Self::default()
        }
    }

    pub fn italic(on: bool) -> Self {
        Self {
            italic: Some(on),
            ..Self::default()
        }
    }

    pub fn uppercase(on: bool) -> Self {
        Self {
            uppercase: Some(on),
            ..Self::default()
        }
    }
}

/// One positioned, styled text overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Unique identifier, never reused.
    pub id: AnnotationId,
    /// Selector button caption.
    pub label: String,
    pub role: SlotRole,
    /// Stored text content (case as typed).
    pub text: String,
    pub position: Position,
    pub style: TextStyle,
}

impl Annotation {
    /// Create an annotation of the `Added` role.
    pub fn new(id: AnnotationId, text: impl Into<String>, position: Position, style: TextStyle) -> Self {
        Self {
            id,
            label: format!("Text {}", id),
            role: SlotRole::Added,
            text: text.into(),
            position,
            style,
        }
    }

    pub fn with_role(mut self, role: SlotRole, label: impl Into<String>) -> Self {
        self.role = role;
        self.label = label.into();
        self
    }

    /// Text as it is displayed and exported: trimmed, with the case transform applied.
    pub fn display_text(&self) -> String {
        let text = self.text.trim();
        if self.style.uppercase {
            text.to_uppercase()
        } else {
            text.to_string()
        }
    }
}
