//! Annotation storage and selection.
//!
//! The store owns every annotation in creation order and keeps two
//! invariants once constructed: it is never empty, and exactly one
//! annotation is selected.

use crate::constants;
use crate::error::{EditorError, Result};
use crate::model::{Annotation, AnnotationId, Position, SlotRole, StylePatch, TextStyle};

/// Message shown when the last annotation would be removed.
pub const LAST_ANNOTATION_NOTICE: &str = "You must have at least one text element!";

/// Ordered collection of text annotations.
#[derive(Debug, Clone)]
pub struct AnnotationStore {
    /// Annotations in creation order.
    annotations: Vec<Annotation>,
    /// Counter for generating unique annotation IDs. Never rewinds.
    next_id: AnnotationId,
    /// Number used in the caption of the last added annotation ("Text N").
    label_counter: u32,
    /// Currently selected annotation ID.
    selected: AnnotationId,
}

impl AnnotationStore {
    /// Create a store holding the top and bottom slots, with the top one selected.
    pub fn new(style: &TextStyle) -> Self {
        let mut store = Self {
            annotations: Vec::new(),
            next_id: 1,
            label_counter: constants::SLOT_COUNT,
            selected: 0,
        };
        store.push_slots(style);
        store
    }

    fn allocate_id(&mut self) -> AnnotationId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn push_slots(&mut self, style: &TextStyle) {
        let top = self.allocate_id();
        self.annotations.push(
            Annotation::new(top, constants::TOP_TEXT, Position::centered(constants::TOP_SLOT), style.clone())
                .with_role(SlotRole::Top, "Top"),
        );
        let bottom = self.allocate_id();
        self.annotations.push(
            Annotation::new(
                bottom,
                constants::BOTTOM_TEXT,
                Position::centered(constants::BOTTOM_SLOT),
                style.clone(),
            )
            .with_role(SlotRole::Bottom, "Bottom"),
        );
        self.selected = top;
    }

    /// Add a new annotation with default text in the middle of the canvas and select it.
    pub fn add(&mut self, style: &TextStyle) -> AnnotationId {
        let id = self.allocate_id();
        self.label_counter += 1;
        let annotation = Annotation::new(
            id,
            constants::NEW_TEXT,
            Position::centered(constants::NEW_TEXT_SLOT),
            style.clone(),
        )
        .with_role(SlotRole::Added, format!("Text {}", self.label_counter));
        self.annotations.push(annotation);
        self.selected = id;
        log::debug!("Added annotation {} ({} total)", id, self.annotations.len());
        id
    }

    /// Remove an annotation and select the first remaining one.
    ///
    /// Fails without touching anything when it is the last annotation.
    pub fn remove(&mut self, id: AnnotationId) -> Result<Annotation> {
        let index = self.index_of(id).ok_or(EditorError::NotFound(id))?;
        if self.annotations.len() <= 1 {
            return Err(EditorError::invariant(LAST_ANNOTATION_NOTICE));
        }

        let removed = self.annotations.remove(index);
        if let Some(first) = self.annotations.first() {
            self.selected = first.id;
        }
        log::debug!(
            "Removed annotation {}, selected {} ({} left)",
            id,
            self.selected,
            self.annotations.len()
        );
        Ok(removed)
    }

    /// Select an annotation. Unknown IDs are ignored; returns whether the ID exists.
    pub fn select(&mut self, id: AnnotationId) -> bool {
        if self.index_of(id).is_none() {
            log::debug!("Ignoring selection of unknown annotation {}", id);
            return false;
        }
        self.selected = id;
        true
    }

    /// Get the selected annotation ID.
    pub fn selected_id(&self) -> AnnotationId {
        self.selected
    }

    /// Get the selected annotation.
    pub fn get_selected(&self) -> Result<&Annotation> {
        self.get(self.selected).ok_or(EditorError::NotFound(self.selected))
    }

    /// Get an annotation by ID.
    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    fn get_mut(&mut self, id: AnnotationId) -> Result<&mut Annotation> {
        self.annotations
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(EditorError::NotFound(id))
    }

    fn index_of(&self, id: AnnotationId) -> Option<usize> {
        self.annotations.iter().position(|a| a.id == id)
    }

    /// Apply a partial style update.
    pub fn update_style(&mut self, id: AnnotationId, patch: &StylePatch) -> Result<()> {
        self.get_mut(id)?.style.apply(patch);
        Ok(())
    }

    pub fn update_position(&mut self, id: AnnotationId, position: Position) -> Result<()> {
        self.get_mut(id)?.position = position;
        Ok(())
    }

    pub fn update_text(&mut self, id: AnnotationId, text: impl Into<String>) -> Result<()> {
        self.get_mut(id)?.text = text.into();
        Ok(())
    }

    /// Restore exactly the two default slots, discarding everything else.
    ///
    /// IDs keep counting up, so nothing discarded is ever reissued.
    pub fn reset_all(&mut self, style: &TextStyle) -> Vec<Annotation> {
        let discarded = std::mem::take(&mut self.annotations);
        self.label_counter = constants::SLOT_COUNT;
        self.push_slots(style);
        log::debug!("Reset store, discarded {} annotation(s)", discarded.len());
        discarded
    }

    /// Get all annotations in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    pub fn ids(&self) -> Vec<AnnotationId> {
        self.annotations.iter().map(|a| a.id).collect()
    }

    /// Get the number of annotations.
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// Always false once constructed; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}

impl Default for AnnotationStore {
    fn default() -> Self {
        Self::new(&TextStyle::default())
    }
}
