//! Editor message types.
//!
//! Every display event reaches the core as a [`Message`]; every change the
//! display has to reflect comes back as a [`Notification`].

use serde::{Deserialize, Serialize};

use crate::export::ExportedImage;
use crate::geometry::{Point, Rect, Size};
use crate::model::AnnotationId;
use crate::style_editor::{StyleControls, StyleInput};

/// Mouse input on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    /// Button pressed over an annotation element
    Down { id: AnnotationId, point: Point },
    /// Pointer moved anywhere on the page
    Move { point: Point },
    /// Button released anywhere on the page
    Up,
}

/// Touch input on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TouchEvent {
    Start { id: AnnotationId, point: Point },
    Move { point: Point },
    End,
}

/// Messages that can be sent to update editor state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Message {
    // Template
    /// A template thumbnail was chosen
    TemplateSelected(String),
    /// A template finished loading (or failed)
    #[serde(skip)]
    BackgroundLoaded {
        path: String,
        result: Result<image::RgbaImage, String>,
    },

    // Selection and text
    /// Selector button for an annotation clicked
    AnnotationButtonClicked(AnnotationId),
    /// Annotation element clicked on the canvas
    CanvasElementClicked(AnnotationId),
    /// In-place text edit committed
    TextEdited(AnnotationId, String),

    // Layout
    /// Canvas container rect in page coordinates
    ContainerMeasured(Rect),
    /// Rendered size of an annotation element
    ElementMeasured(AnnotationId, Size),

    // Style panel
    Style(StyleInput),

    // Actions
    AddRequested,
    RemoveRequested,
    DownloadRequested,
    /// Reset confirmed by the user
    ResetRequested,

    // Input
    Pointer(PointerEvent),
    Touch(TouchEvent),
}

/// Changes the display layer has to reflect.
#[derive(Debug, Clone)]
pub enum Notification {
    AnnotationAdded { id: AnnotationId, label: String },
    AnnotationRemoved(AnnotationId),
    /// Text, style or position changed
    AnnotationUpdated(AnnotationId),
    SelectionChanged(AnnotationId),
    /// Editing controls now show these values
    StyleSynced(StyleControls),
    DragStateChanged { id: AnnotationId, dragging: bool },
    /// Enter in-place text editing
    BeginTextEdit(AnnotationId),
    TemplateChanged(String),
    /// Blocking alert text
    Notice(String),
    ExportReady(ExportedImage),
}
