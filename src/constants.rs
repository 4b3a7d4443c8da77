//! Global constants for the meme editor

/// Default font family for new text
pub const DEFAULT_FONT_FAMILY: &str = "Impact";

/// Default font size in display pixels
pub const DEFAULT_FONT_SIZE: f32 = 32.0;

/// Default fill color
pub const DEFAULT_TEXT_COLOR: &str = "#ffffff";

/// Default outline color
pub const DEFAULT_STROKE_COLOR: &str = "#000000";

/// Default outline width in display pixels
pub const DEFAULT_STROKE_WIDTH: f32 = 2.0;

/// Text of the top slot
pub const TOP_TEXT: &str = "TOP TEXT";

/// Text of the bottom slot
pub const BOTTOM_TEXT: &str = "BOTTOM TEXT";

/// Text of annotations created with "add"
pub const NEW_TEXT: &str = "NEW TEXT";

/// Template shown on start and after reset
pub const DEFAULT_TEMPLATE: &str = "assets/img01.jpg";

/// Number of slot annotations created at start; also the first label number handed out is one above this
pub const SLOT_COUNT: u32 = 2;

/// Fractional container position of the top slot centre
pub const TOP_SLOT: (f32, f32) = (0.5, 0.1);

/// Fractional container position of the bottom slot centre
pub const BOTTOM_SLOT: (f32, f32) = (0.5, 0.9);

/// Fractional container position of newly added text
pub const NEW_TEXT_SLOT: (f32, f32) = (0.5, 0.5);

/// Drag disambiguation thresholds
pub mod drag {
    /// Pointer travel (px) beyond which a press becomes a drag
    pub const DISTANCE_THRESHOLD: f32 = 5.0;

    /// Hold time (ms) beyond which a press becomes a drag on the next move
    pub const HOLD_THRESHOLD_MS: u64 = 200;
}

/// Fallback text metrics used until the display layer reports a measured size
pub mod metrics {
    /// Average glyph advance as a fraction of the font size
    pub const CHAR_WIDTH_RATIO: f32 = 0.6;

    /// CSS `line-height: normal` approximation
    pub const LINE_HEIGHT_RATIO: f32 = 1.2;
}

/// Export naming
pub mod export {
    /// Prefix of exported file names (`meme_<epoch-ms>.png`)
    pub const FILENAME_PREFIX: &str = "meme_";

    /// Extension of exported files
    pub const FILENAME_EXTENSION: &str = "png";
}
