//! Draw instructions for a single line of overlay text.
//!
//! A [`TextLayer`] is already in output space: coordinates, font size and
//! stroke width are in pixels of the final bitmap.

/// Horizontal anchoring of the text relative to its `x` coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    /// Text starts at `x`.
    Start,
    /// Text is centred on `x`.
    #[default]
    Middle,
    /// Text ends at `x`.
    End,
}

impl TextAnchor {
    /// SVG `text-anchor` keyword.
    pub fn as_svg(&self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// Outline painted underneath the fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStroke {
    pub color: [u8; 3],
    pub width: f32,
}

/// One text draw, stroke first and fill second.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayer {
    /// Text exactly as it should appear (case transforms already applied).
    pub text: String,
    pub x: f32,
    /// Vertical middle of the text line.
    pub y: f32,
    pub font_family: String,
    pub font_size: f32,
    pub bold: bool,
    pub italic: bool,
    pub anchor: TextAnchor,
    pub fill: [u8; 3],
    pub stroke: Option<TextStroke>,
}

impl TextLayer {
    /// Create a filled layer with the default weight, slant and anchor.
    pub fn new(text: impl Into<String>, x: f32, y: f32, font_family: impl Into<String>, font_size: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_family: font_family.into(),
            font_size,
            bold: false,
            italic: false,
            anchor: TextAnchor::default(),
            fill: [255, 255, 255],
            stroke: None,
        }
    }

    pub fn with_fill(mut self, fill: [u8; 3]) -> Self {
        self.fill = fill;
        self
    }

    /// Attach an outline. Widths that are not strictly positive drop the stroke pass.
    pub fn with_stroke(mut self, color: [u8; 3], width: f32) -> Self {
        self.stroke = (width > 0.0).then_some(TextStroke { color, width });
        self
    }

    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_weight(mut self, bold: bool, italic: bool) -> Self {
        self.bold = bold;
        self.italic = italic;
        self
    }
}
