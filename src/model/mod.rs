//! Data models for the meme editor.

mod annotation;

pub use annotation::{
    Annotation, AnnotationId, Position, SlotRole, StylePatch, TextAlign, TextStyle,
};
