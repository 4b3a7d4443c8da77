//! Message handlers for the meme editor.
//!
//! Each handler processes one category of messages against the pieces of
//! editor state it needs, pushing the resulting notifications to `out`.

use crate::background::{AssetState, BackgroundImage};
use crate::clock::Millis;
use crate::drag::{DragController, DragOutcome, PointerKind};
use crate::error::EditorError;
use crate::export::ExportScheduler;
use crate::geometry::LayoutMetrics;
use crate::message::{Message, Notification, PointerEvent, TouchEvent};
use crate::model::{AnnotationId, TextStyle};
use crate::store::AnnotationStore;
use crate::style_editor::{StyleControls, StyleInput};

/// Select an annotation and bring the controls in line with it.
pub fn select_and_sync(
    id: AnnotationId,
    store: &mut AnnotationStore,
    controls: &mut StyleControls,
    out: &mut Vec<Notification>,
) {
    if !store.select(id) {
        return;
    }
    if let Ok(selected) = store.get_selected() {
        controls.sync_from(selected);
    }
    log::debug!("🎯 Selected annotation {}", id);
    out.push(Notification::SelectionChanged(id));
    out.push(Notification::StyleSynced(controls.clone()));
}

/// Handle a template choice. Any earlier load still in flight becomes stale.
///
/// Choosing the current template again keeps its decoded image.
pub fn handle_template_selected(path: String, background: &mut BackgroundImage, out: &mut Vec<Notification>) {
    if path == background.path() && background.is_ready() {
        log::debug!("Template {} already current, keeping it", path);
        return;
    }
    log::info!("🖼 Template selected: {}", path);
    *background = BackgroundImage::new(path.clone());
    out.push(Notification::TemplateChanged(path));
}

/// Handle "download".
///
/// Returns true when the export can run now. While the template loads the
/// export is deferred; a template that failed to load is reported instead.
pub fn handle_download(background: &BackgroundImage, exports: &mut ExportScheduler, out: &mut Vec<Notification>) -> bool {
    match background.state() {
        AssetState::Ready(_) => true,
        AssetState::Loading => {
            log::debug!("{}, deferring export", EditorError::AssetNotReady);
            exports.defer();
            false
        }
        AssetState::Failed(_) => {
            log::debug!("Download refused, template {} failed to load", background.path());
            out.push(asset_failed_notice(background));
            false
        }
    }
}

/// Handle a finished template load.
///
/// Returns true when a deferred export should run now.
pub fn handle_background_loaded(
    path: String,
    result: Result<image::RgbaImage, String>,
    background: &mut BackgroundImage,
    exports: &mut ExportScheduler,
    out: &mut Vec<Notification>,
) -> bool {
    if path != background.path() {
        log::debug!("Ignoring stale load of {} (current: {})", path, background.path());
        return false;
    }

    background.finish_loading(result);
    if background.is_ready() {
        return exports.take_pending();
    }

    if exports.take_pending() {
        log::warn!("Dropping deferred export, template failed to load");
    }
    out.push(asset_failed_notice(background));
    false
}

fn asset_failed_notice(background: &BackgroundImage) -> Notification {
    let message = match background.state() {
        AssetState::Failed(message) => message.clone(),
        _ => String::new(),
    };
    Notification::Notice(
        EditorError::AssetFailed {
            path: background.path().to_string(),
            message,
        }
        .to_string(),
    )
}

/// Handle layout measurements from the display layer.
pub fn handle_layout(msg: Message, layout: &mut LayoutMetrics) {
    match msg {
        Message::ContainerMeasured(rect) => {
            log::trace!(
                "Container at ({:.0}, {:.0}) {:.0}x{:.0}",
                rect.left,
                rect.top,
                rect.width,
                rect.height
            );
            layout.set_container(rect);
        }
        Message::ElementMeasured(id, size) => layout.set_element_size(id, size),
        _ => {}
    }
}

/// Handle a committed in-place text edit.
pub fn handle_text_edited(
    id: AnnotationId,
    text: String,
    store: &mut AnnotationStore,
    out: &mut Vec<Notification>,
) {
    match store.update_text(id, text) {
        Ok(()) => {
            log::debug!("✏ Text of {} updated", id);
            out.push(Notification::AnnotationUpdated(id));
        }
        Err(e) => log::debug!("Text edit dropped: {}", e),
    }
}

/// Handle a style panel event for the selected annotation.
pub fn handle_style(
    input: StyleInput,
    store: &mut AnnotationStore,
    controls: &mut StyleControls,
    out: &mut Vec<Notification>,
) {
    let Ok(selected) = store.get_selected() else {
        log::debug!("Style change with nothing selected");
        return;
    };
    let id = selected.id;

    match controls.apply(input, selected) {
        Some(patch) => match store.update_style(id, &patch) {
            Ok(()) => {
                log::debug!("🎨 Style of {} updated: {:?}", id, patch);
                out.push(Notification::AnnotationUpdated(id));
            }
            Err(e) => log::debug!("Style change dropped: {}", e),
        },
        None => log::debug!("Style input rejected, controls restored"),
    }
    out.push(Notification::StyleSynced(controls.clone()));
}

/// Handle "add text".
pub fn handle_add(
    style: &TextStyle,
    store: &mut AnnotationStore,
    drag: &mut DragController,
    controls: &mut StyleControls,
    out: &mut Vec<Notification>,
) {
    let id = store.add(style);
    drag.attach(id);
    let label = store.get(id).map(|a| a.label.clone()).unwrap_or_default();
    log::debug!("➕ Added {} ({})", id, label);
    out.push(Notification::AnnotationAdded { id, label });
    select_and_sync(id, store, controls, out);
}

/// Handle "remove text" for the selected annotation.
pub fn handle_remove(
    store: &mut AnnotationStore,
    drag: &mut DragController,
    layout: &mut LayoutMetrics,
    controls: &mut StyleControls,
    out: &mut Vec<Notification>,
) {
    let id = store.selected_id();
    match store.remove(id) {
        Ok(removed) => {
            if drag.detach(removed.id).is_some() {
                out.push(Notification::DragStateChanged {
                    id: removed.id,
                    dragging: false,
                });
            }
            layout.forget(removed.id);
            log::debug!("➖ Removed {}", removed.id);
            out.push(Notification::AnnotationRemoved(removed.id));
            let next = store.selected_id();
            select_and_sync(next, store, controls, out);
        }
        Err(EditorError::InvariantViolation(notice)) => {
            log::debug!("Refusing to remove last annotation");
            out.push(Notification::Notice(notice));
        }
        Err(e) => log::debug!("Remove dropped: {}", e),
    }
}

/// Handle a confirmed reset. The caller reloads the default template afterwards.
pub fn handle_reset(
    style: &TextStyle,
    store: &mut AnnotationStore,
    drag: &mut DragController,
    layout: &mut LayoutMetrics,
    controls: &mut StyleControls,
    out: &mut Vec<Notification>,
) {
    if let Some(id) = drag.dragging() {
        out.push(Notification::DragStateChanged { id, dragging: false });
    }
    drag.clear();

    for discarded in store.reset_all(style) {
        layout.forget(discarded.id);
        out.push(Notification::AnnotationRemoved(discarded.id));
    }
    for annotation in store.iter() {
        drag.attach(annotation.id);
        out.push(Notification::AnnotationAdded {
            id: annotation.id,
            label: annotation.label.clone(),
        });
    }
    log::debug!("🔄 Editor reset");
    let selected = store.selected_id();
    select_and_sync(selected, store, controls, out);
}

/// Handle mouse input.
pub fn handle_pointer(
    event: PointerEvent,
    now: Millis,
    store: &mut AnnotationStore,
    drag: &mut DragController,
    layout: &LayoutMetrics,
    controls: &mut StyleControls,
    out: &mut Vec<Notification>,
) {
    let outcomes = match event {
        PointerEvent::Down { id, point } => drag.pointer_down(id, point, PointerKind::Mouse, now, store, layout),
        PointerEvent::Move { point } => drag.pointer_move(point, now, store, layout),
        PointerEvent::Up => drag.pointer_up().into_iter().collect(),
    };
    apply_drag_outcomes(outcomes, store, controls, out);
}

/// Handle touch input.
pub fn handle_touch(
    event: TouchEvent,
    now: Millis,
    store: &mut AnnotationStore,
    drag: &mut DragController,
    layout: &LayoutMetrics,
    controls: &mut StyleControls,
    out: &mut Vec<Notification>,
) {
    let outcomes = match event {
        TouchEvent::Start { id, point } => drag.pointer_down(id, point, PointerKind::Touch, now, store, layout),
        TouchEvent::Move { point } => drag.pointer_move(point, now, store, layout),
        TouchEvent::End => drag.pointer_up().into_iter().collect(),
    };
    apply_drag_outcomes(outcomes, store, controls, out);
}

fn apply_drag_outcomes(
    outcomes: Vec<DragOutcome>,
    store: &mut AnnotationStore,
    controls: &mut StyleControls,
    out: &mut Vec<Notification>,
) {
    for outcome in outcomes {
        match outcome {
            DragOutcome::Started(id) => {
                select_and_sync(id, store, controls, out);
                out.push(Notification::DragStateChanged { id, dragging: true });
            }
            DragOutcome::Moved { id, position } => match store.update_position(id, position) {
                Ok(()) => out.push(Notification::AnnotationUpdated(id)),
                Err(e) => log::debug!("Drag move dropped: {}", e),
            },
            DragOutcome::Click(id) => {
                select_and_sync(id, store, controls, out);
                out.push(Notification::BeginTextEdit(id));
            }
            DragOutcome::Ended(id) => {
                out.push(Notification::DragStateChanged { id, dragging: false });
            }
        }
    }
}
