//! Pointer and touch drag handling for text annotations.
//!
//! A mouse press does not start a drag right away: the session stays pending
//! until the pointer travels past a distance threshold or the press is held
//! past a time threshold. Releasing while still pending is a click, which the
//! display layer uses to enter in-place text editing. Touch input has no such
//! ambiguity and starts dragging immediately.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::clock::Millis;
use crate::constants::drag as drag_const;
use crate::geometry::{clamp_to_container, LayoutMetrics, Point};
use crate::model::{AnnotationId, Position};
use crate::store::AnnotationStore;

/// Input device that produced a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// Thresholds for promoting a press to a drag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragConfig {
    /// Pointer travel (px) that must be exceeded
    #[serde(default = "default_distance_threshold")]
    pub distance_threshold_px: f32,
    /// Hold time (ms) that must be exceeded
    #[serde(default = "default_hold_threshold")]
    pub hold_threshold_ms: Millis,
}

fn default_distance_threshold() -> f32 {
    drag_const::DISTANCE_THRESHOLD
}

fn default_hold_threshold() -> Millis {
    drag_const::HOLD_THRESHOLD_MS
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            distance_threshold_px: default_distance_threshold(),
            hold_threshold_ms: default_hold_threshold(),
        }
    }
}

/// Observable phase of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    /// Pressed, not yet confirmed as a drag
    Pending,
    Dragging,
}

/// Transient state of one press-move-release interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    /// Annotation under the press
    pub target: AnnotationId,
    /// Pointer position at press time (page coordinates)
    pub origin: Point,
    /// Clock reading at press time
    pub pressed_at: Millis,
    /// Whether the press has been promoted to a drag
    pub active: bool,
    /// Pointer position relative to the element's top-left corner
    pub offset: Point,
    pub kind: PointerKind,
}

/// What a single input event did.
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// A press became a drag; the target should be selected and marked as dragging
    Started(AnnotationId),
    /// The target moved to a new explicit position
    Moved {
        id: AnnotationId,
        position: Position,
    },
    /// Released without dragging
    Click(AnnotationId),
    /// A drag finished
    Ended(AnnotationId),
}

/// Click-vs-drag state machine.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    config: DragConfig,
    /// Annotations that accept drag input
    attached: BTreeSet<AnnotationId>,
    session: Option<DragSession>,
}

impl DragController {
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            attached: BTreeSet::new(),
            session: None,
        }
    }

    /// Enable drag handling for an annotation. Attaching twice has no extra effect.
    pub fn attach(&mut self, id: AnnotationId) -> bool {
        self.attached.insert(id)
    }

    /// Disable drag handling for an annotation and drop any session targeting it.
    pub fn detach(&mut self, id: AnnotationId) -> Option<DragOutcome> {
        self.attached.remove(&id);
        self.cancel_for(id)
    }

    pub fn is_attached(&self, id: AnnotationId) -> bool {
        self.attached.contains(&id)
    }

    pub fn phase(&self) -> DragPhase {
        match &self.session {
            None => DragPhase::Idle,
            Some(s) if s.active => DragPhase::Dragging,
            Some(_) => DragPhase::Pending,
        }
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Annotation currently being dragged, if any.
    pub fn dragging(&self) -> Option<AnnotationId> {
        self.session.as_ref().filter(|s| s.active).map(|s| s.target)
    }

    /// Handle a press on an annotation element.
    pub fn pointer_down(
        &mut self,
        target: AnnotationId,
        point: Point,
        kind: PointerKind,
        now: Millis,
        store: &AnnotationStore,
        metrics: &LayoutMetrics,
    ) -> Vec<DragOutcome> {
        let mut outcomes = Vec::new();
        if !self.attached.contains(&target) {
            log::trace!("Press on {} ignored, no drag handling attached", target);
            return outcomes;
        }

        if let Some(stale) = self.session.take() {
            log::warn!("New press while previous interaction still active - forcing end");
            if stale.active {
                outcomes.push(DragOutcome::Ended(stale.target));
            }
        }

        self.session = Some(DragSession {
            target,
            origin: point,
            pressed_at: now,
            active: false,
            offset: Point::default(),
            kind,
        });
        log::trace!("Press on {} at ({:.1}, {:.1})", target, point.x, point.y);

        if kind == PointerKind::Touch {
            outcomes.extend(self.promote(store, metrics));
        }
        outcomes
    }

    /// Handle pointer movement anywhere on the page.
    pub fn pointer_move(
        &mut self,
        point: Point,
        now: Millis,
        store: &AnnotationStore,
        metrics: &LayoutMetrics,
    ) -> Vec<DragOutcome> {
        let mut outcomes = Vec::new();
        let Some(session) = &self.session else {
            return outcomes;
        };

        if !session.active {
            if session.kind == PointerKind::Touch {
                return outcomes;
            }
            let distance = session.origin.distance_to(&point);
            let held = now.saturating_sub(session.pressed_at);
            if distance <= self.config.distance_threshold_px && held <= self.config.hold_threshold_ms {
                return outcomes;
            }
            log::trace!("Promoting press: moved {:.1}px, held {}ms", distance, held);
            outcomes.extend(self.promote(store, metrics));
        }

        if let Some(moved) = self.drag_to(point, store, metrics) {
            outcomes.push(moved);
        }
        outcomes
    }

    /// Handle pointer release or touch end. Always tears the session down.
    pub fn pointer_up(&mut self) -> Option<DragOutcome> {
        let session = self.session.take()?;
        if session.active {
            log::debug!("Drag of {} ended", session.target);
            Some(DragOutcome::Ended(session.target))
        } else {
            log::debug!("Click on {}", session.target);
            Some(DragOutcome::Click(session.target))
        }
    }

    /// Drop a session whose target is going away.
    pub fn cancel_for(&mut self, id: AnnotationId) -> Option<DragOutcome> {
        if self.session.as_ref().is_some_and(|s| s.target == id) {
            let session = self.session.take()?;
            return session.active.then_some(DragOutcome::Ended(id));
        }
        None
    }

    /// Drop every session and attachment.
    pub fn clear(&mut self) {
        self.session = None;
        self.attached.clear();
    }

    /// Confirm the pending session as a drag, anchoring the offset at the press point.
    fn promote(&mut self, store: &AnnotationStore, metrics: &LayoutMetrics) -> Option<DragOutcome> {
        let session = self.session.as_mut()?;
        let rect = store
            .get(session.target)
            .and_then(|annotation| metrics.element_rect(annotation));
        let Some(rect) = rect else {
            log::warn!("Cannot drag {}: element is not laid out", session.target);
            self.session = None;
            return None;
        };

        session.offset = Point::new(session.origin.x - rect.left, session.origin.y - rect.top);
        session.active = true;
        log::debug!(
            "Drag of {} started, offset ({:.1}, {:.1})",
            session.target,
            session.offset.x,
            session.offset.y
        );
        Some(DragOutcome::Started(session.target))
    }

    fn drag_to(&self, point: Point, store: &AnnotationStore, metrics: &LayoutMetrics) -> Option<DragOutcome> {
        let session = self.session.as_ref().filter(|s| s.active)?;
        let container = metrics.container()?;
        let annotation = store.get(session.target)?;
        let size = metrics.element_size(annotation);

        let wanted = Point::new(
            point.x - container.left - session.offset.x,
            point.y - container.top - session.offset.y,
        );
        let clamped = clamp_to_container(wanted, size, container.size());
        log::trace!(
            "Dragging {} to ({:.1}, {:.1})",
            session.target,
            clamped.x,
            clamped.y
        );
        Some(DragOutcome::Moved {
            id: session.target,
            position: Position::Absolute {
                left: clamped.x,
                top: clamped.y,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, Size};

    /// Store with the top slot laid out as a 100x40 box at container (200, 30).
    fn setup() -> (DragController, AnnotationStore, LayoutMetrics, AnnotationId) {
        let mut store = AnnotationStore::default();
        let id = store.selected_id();
        store
            .update_position(id, Position::Absolute { left: 200.0, top: 30.0 })
            .expect("position");
        let mut metrics = LayoutMetrics::with_container(Rect::new(0.0, 0.0, 500.0, 500.0));
        metrics.set_element_size(id, Size::new(100.0, 40.0));
        let mut drag = DragController::new(DragConfig::default());
        drag.attach(id);
        (drag, store, metrics, id)
    }

    #[test]
    fn test_small_quick_move_is_click() {
        let (mut drag, store, metrics, id) = setup();
        drag.pointer_down(id, Point::new(250.0, 50.0), PointerKind::Mouse, 0, &store, &metrics);
        let moved = drag.pointer_move(Point::new(254.0, 50.0), 50, &store, &metrics);
        assert!(moved.is_empty());
        assert_eq!(drag.phase(), DragPhase::Pending);
        assert_eq!(drag.pointer_up(), Some(DragOutcome::Click(id)));
        assert_eq!(drag.phase(), DragPhase::Idle);
    }

    #[test]
    fn test_distance_threshold_is_exclusive() {
        let (mut drag, store, metrics, id) = setup();
        drag.pointer_down(id, Point::new(250.0, 50.0), PointerKind::Mouse, 0, &store, &metrics);
        assert!(drag.pointer_move(Point::new(253.0, 54.0), 10, &store, &metrics).is_empty());
        assert_eq!(drag.phase(), DragPhase::Pending);
    }

    #[test]
    fn test_move_past_threshold_drags_by_delta() {
        let (mut drag, store, metrics, id) = setup();
        drag.pointer_down(id, Point::new(250.0, 50.0), PointerKind::Mouse, 0, &store, &metrics);
        let outcomes = drag.pointer_move(Point::new(256.0, 50.0), 20, &store, &metrics);
        assert_eq!(
            outcomes,
            vec![
                DragOutcome::Started(id),
                DragOutcome::Moved {
                    id,
                    position: Position::Absolute { left: 206.0, top: 30.0 }
                },
            ]
        );
        assert_eq!(drag.dragging(), Some(id));
        assert_eq!(drag.pointer_up(), Some(DragOutcome::Ended(id)));
    }

    #[test]
    fn test_hold_promotes_without_movement() {
        let (mut drag, store, metrics, id) = setup();
        drag.pointer_down(id, Point::new(250.0, 50.0), PointerKind::Mouse, 1_000, &store, &metrics);
        assert!(drag.pointer_move(Point::new(251.0, 50.0), 1_200, &store, &metrics).is_empty());
        let outcomes = drag.pointer_move(Point::new(251.0, 50.0), 1_201, &store, &metrics);
        assert_eq!(outcomes.first(), Some(&DragOutcome::Started(id)));
        assert_eq!(drag.phase(), DragPhase::Dragging);
    }

    #[test]
    fn test_clamps_to_container_edges() {
        let (mut drag, store, metrics, id) = setup();
        drag.pointer_down(id, Point::new(250.0, 50.0), PointerKind::Mouse, 0, &store, &metrics);
        let outcomes = drag.pointer_move(Point::new(900.0, 900.0), 10, &store, &metrics);
        assert_eq!(
            outcomes.last(),
            Some(&DragOutcome::Moved {
                id,
                position: Position::Absolute { left: 400.0, top: 460.0 }
            })
        );
        let outcomes = drag.pointer_move(Point::new(-300.0, -300.0), 20, &store, &metrics);
        assert_eq!(
            outcomes,
            vec![DragOutcome::Moved {
                id,
                position: Position::Absolute { left: 0.0, top: 0.0 }
            }]
        );
    }

    #[test]
    fn test_touch_starts_immediately() {
        let (mut drag, store, metrics, id) = setup();
        let outcomes = drag.pointer_down(id, Point::new(210.0, 35.0), PointerKind::Touch, 0, &store, &metrics);
        assert_eq!(outcomes, vec![DragOutcome::Started(id)]);
        assert_eq!(drag.session().map(|s| s.offset), Some(Point::new(10.0, 5.0)));

        let outcomes = drag.pointer_move(Point::new(211.0, 35.0), 1, &store, &metrics);
        assert_eq!(
            outcomes,
            vec![DragOutcome::Moved {
                id,
                position: Position::Absolute { left: 201.0, top: 30.0 }
            }]
        );
        assert_eq!(drag.pointer_up(), Some(DragOutcome::Ended(id)));
    }

    #[test]
    fn test_unattached_target_is_ignored() {
        let (mut drag, store, metrics, _) = setup();
        let other = store.ids()[1];
        assert!(drag
            .pointer_down(other, Point::new(0.0, 0.0), PointerKind::Touch, 0, &store, &metrics)
            .is_empty());
        assert_eq!(drag.phase(), DragPhase::Idle);
    }

    #[test]
    fn test_attach_is_idempotent() {
        let (mut drag, store, metrics, id) = setup();
        assert!(!drag.attach(id));
        drag.pointer_down(id, Point::new(250.0, 50.0), PointerKind::Mouse, 0, &store, &metrics);
        let outcomes = drag.pointer_move(Point::new(260.0, 50.0), 10, &store, &metrics);
        let moves = outcomes
            .iter()
            .filter(|o| matches!(o, DragOutcome::Moved { .. }))
            .count();
        assert_eq!(moves, 1);
    }

    #[test]
    fn test_move_without_press_does_nothing() {
        let (mut drag, store, metrics, _) = setup();
        assert!(drag.pointer_move(Point::new(1.0, 1.0), 0, &store, &metrics).is_empty());
        assert_eq!(drag.pointer_up(), None);
    }

    #[test]
    fn test_unmeasured_layout_cancels_drag() {
        let (mut drag, store, _, id) = setup();
        let metrics = LayoutMetrics::new();
        drag.pointer_down(id, Point::new(0.0, 0.0), PointerKind::Mouse, 0, &store, &metrics);
        assert!(drag.pointer_move(Point::new(50.0, 0.0), 10, &store, &metrics).is_empty());
        assert_eq!(drag.phase(), DragPhase::Idle);
    }

    #[test]
    fn test_detach_cancels_active_drag() {
        let (mut drag, store, metrics, id) = setup();
        drag.pointer_down(id, Point::new(210.0, 35.0), PointerKind::Touch, 0, &store, &metrics);
        assert_eq!(drag.detach(id), Some(DragOutcome::Ended(id)));
        assert_eq!(drag.phase(), DragPhase::Idle);
        assert!(!drag.is_attached(id));
    }
}
