//! Display-space and output-space geometry.
//!
//! Display space is the rendered layout the user sees (page coordinates, CSS
//! pixels). Output space is the exported bitmap at the background image's
//! native resolution. The conversions here are pure and extracted for
//! testability.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::metrics;
use crate::model::{Annotation, AnnotationId, Position};

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another point.
    pub fn distance_to(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Width and height in display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle (top-left corner plus size).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Whether the rectangle has a positive area.
    pub fn is_measurable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Native pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Reference point and scale of an annotation in output space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputAnchor {
    /// Horizontal reference (left edge of the displayed text box)
    pub x: f32,
    /// Vertical centre of the displayed text box
    pub y: f32,
    /// Uniform display-to-output factor for font size and outline width
    pub scale: f32,
}

/// Map an element's display rect into output space.
///
/// Returns `None` when the container has no area.
pub fn to_output_space(element: Rect, container: Rect, native: ImageSize) -> Option<OutputAnchor> {
    if !container.is_measurable() {
        return None;
    }
    let native_w = native.width as f32;
    let native_h = native.height as f32;
    Some(OutputAnchor {
        x: (element.left - container.left) / container.width * native_w,
        y: (element.top - container.top + element.height / 2.0) / container.height * native_h,
        scale: native_w / container.width,
    })
}

/// Clamp a container-relative top-left so the element stays fully inside.
///
/// When the element is larger than the container the lower bound wins and the
/// element is pinned at 0.
pub fn clamp_to_container(position: Point, element: Size, container: Size) -> Point {
    Point::new(
        position.x.min(container.width - element.width).max(0.0),
        position.y.min(container.height - element.height).max(0.0),
    )
}

// ============================================================================
// Layout Metrics
// ============================================================================

/// Display-space measurements reported by the display layer.
#[derive(Debug, Clone, Default)]
pub struct LayoutMetrics {
    /// Container rect in page coordinates
    container: Option<Rect>,
    /// Measured element sizes
    elements: HashMap<AnnotationId, Size>,
}

impl LayoutMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container(container: Rect) -> Self {
        Self {
            container: Some(container),
            elements: HashMap::new(),
        }
    }

    pub fn set_container(&mut self, container: Rect) {
        self.container = Some(container);
    }

    /// Container rect, if it has been measured with a positive area.
    pub fn container(&self) -> Option<Rect> {
        self.container.filter(Rect::is_measurable)
    }

    pub fn set_element_size(&mut self, id: AnnotationId, size: Size) {
        self.elements.insert(id, size);
    }

    pub fn forget(&mut self, id: AnnotationId) {
        self.elements.remove(&id);
    }

    /// Measured size, or an estimate from the text and font size.
    pub fn element_size(&self, annotation: &Annotation) -> Size {
        if let Some(size) = self.elements.get(&annotation.id) {
            return *size;
        }
        let chars = annotation.text.trim().chars().count().max(1) as f32;
        let font_size = annotation.style.font_size_px;
        Size::new(
            chars * font_size * metrics::CHAR_WIDTH_RATIO,
            font_size * metrics::LINE_HEIGHT_RATIO,
        )
    }

    /// Page-space rect of an annotation's element.
    pub fn element_rect(&self, annotation: &Annotation) -> Option<Rect> {
        let container = self.container()?;
        let size = self.element_size(annotation);
        let origin = match annotation.position {
            Position::Centered { x, y } => Point::new(
                container.left + container.width * x - size.width / 2.0,
                container.top + container.height * y - size.height / 2.0,
            ),
            Position::Absolute { left, top } => {
                Point::new(container.left + left, container.top + top)
            }
        };
        Some(Rect::from_origin_size(origin, size))
    }
}
