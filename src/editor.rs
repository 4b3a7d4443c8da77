//! Editor session.
//!
//! [`MemeEditor`] owns all editor state and is driven by a single
//! [`MemeEditor::update`] call per display event.

use memegen_raster::FontBook;

use crate::background::BackgroundImage;
use crate::clock::{Clock, SystemClock};
use crate::config::EditorConfig;
use crate::drag::{DragController, DragPhase};
use crate::error::EditorError;
use crate::export::{self, ExportScheduler};
use crate::geometry::LayoutMetrics;
use crate::handlers;
use crate::message::{Message, Notification};
use crate::store::AnnotationStore;
use crate::style_editor::StyleControls;

/// The editor core: annotations, input handling, style controls and export.
#[derive(Debug)]
pub struct MemeEditor<C: Clock = SystemClock> {
    config: EditorConfig,
    store: AnnotationStore,
    drag: DragController,
    controls: StyleControls,
    background: BackgroundImage,
    layout: LayoutMetrics,
    exports: ExportScheduler,
    fonts: FontBook,
    clock: C,
}

impl MemeEditor<SystemClock> {
    /// Create an editor using the wall clock, the host's fonts and any
    /// configured font files.
    pub fn new(config: EditorConfig) -> Self {
        let fonts = load_fonts(FontBook::system(), &config.export.font_files);
        Self::with_clock(config, SystemClock::new(), fonts)
    }
}

/// Add font files to `fonts`. Unreadable files are logged and skipped.
pub fn load_fonts(mut fonts: FontBook, files: &[String]) -> FontBook {
    for file in files {
        match std::fs::read(file) {
            Ok(data) => {
                let before = fonts.face_count();
                fonts = fonts.with_font_data(data);
                log::debug!("Loaded {} face(s) from {}", fonts.face_count() - before, file);
            }
            Err(e) => log::warn!("Could not read font file {}: {}", file, e),
        }
    }
    if fonts.face_count() == 0 {
        log::warn!("No fonts available, exported text will be invisible");
    } else {
        log::debug!("Text falls back to {}", fonts.sans_serif_family());
    }
    fonts
}

impl<C: Clock> MemeEditor<C> {
    /// Create an editor with an explicit clock and font set.
    ///
    /// The default template is referenced but not loaded; the display layer
    /// starts the load and reports back with [`Message::BackgroundLoaded`].
    pub fn with_clock(config: EditorConfig, clock: C, fonts: FontBook) -> Self {
        let store = AnnotationStore::new(&config.default_style);
        let mut drag = DragController::new(config.drag);
        for id in store.ids() {
            drag.attach(id);
        }
        let mut controls = StyleControls::default();
        if let Ok(selected) = store.get_selected() {
            controls.sync_from(selected);
        }
        let background = BackgroundImage::new(config.default_template.clone());

        log::info!(
            "Editor ready with {} annotations, template {}",
            store.len(),
            background.path()
        );

        Self {
            config,
            store,
            drag,
            controls,
            background,
            layout: LayoutMetrics::new(),
            exports: ExportScheduler::new(),
            fonts,
            clock,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn controls(&self) -> &StyleControls {
        &self.controls
    }

    pub fn background(&self) -> &BackgroundImage {
        &self.background
    }

    pub fn layout(&self) -> &LayoutMetrics {
        &self.layout
    }

    pub fn drag_phase(&self) -> DragPhase {
        self.drag.phase()
    }

    pub fn export_pending(&self) -> bool {
        self.exports.is_pending()
    }

    /// Process one message and report what the display has to change.
    pub fn update(&mut self, message: Message) -> Vec<Notification> {
        let mut out = Vec::new();
        match message {
            Message::TemplateSelected(path) => {
                handlers::handle_template_selected(path, &mut self.background, &mut out);
            }
            Message::BackgroundLoaded { path, result } => {
                let run_export = handlers::handle_background_loaded(
                    path,
                    result,
                    &mut self.background,
                    &mut self.exports,
                    &mut out,
                );
                if run_export {
                    log::debug!("Running deferred export");
                    self.export(&mut out);
                }
            }
            Message::AnnotationButtonClicked(id) | Message::CanvasElementClicked(id) => {
                handlers::select_and_sync(id, &mut self.store, &mut self.controls, &mut out);
            }
            Message::TextEdited(id, text) => {
                handlers::handle_text_edited(id, text, &mut self.store, &mut out);
            }
            msg @ (Message::ContainerMeasured(_) | Message::ElementMeasured(..)) => {
                handlers::handle_layout(msg, &mut self.layout);
            }
            Message::Style(input) => {
                handlers::handle_style(input, &mut self.store, &mut self.controls, &mut out);
            }
            Message::AddRequested => {
                handlers::handle_add(
                    &self.config.default_style,
                    &mut self.store,
                    &mut self.drag,
                    &mut self.controls,
                    &mut out,
                );
            }
            Message::RemoveRequested => {
                handlers::handle_remove(
                    &mut self.store,
                    &mut self.drag,
                    &mut self.layout,
                    &mut self.controls,
                    &mut out,
                );
            }
            Message::DownloadRequested => {
                if handlers::handle_download(&self.background, &mut self.exports, &mut out) {
                    self.export(&mut out);
                }
            }
            Message::ResetRequested => {
                handlers::handle_reset(
                    &self.config.default_style,
                    &mut self.store,
                    &mut self.drag,
                    &mut self.layout,
                    &mut self.controls,
                    &mut out,
                );
                let template = self.config.default_template.clone();
                handlers::handle_template_selected(template, &mut self.background, &mut out);
            }
            Message::Pointer(event) => {
                let now = self.clock.now_ms();
                handlers::handle_pointer(
                    event,
                    now,
                    &mut self.store,
                    &mut self.drag,
                    &self.layout,
                    &mut self.controls,
                    &mut out,
                );
            }
            Message::Touch(event) => {
                let now = self.clock.now_ms();
                handlers::handle_touch(
                    event,
                    now,
                    &mut self.store,
                    &mut self.drag,
                    &self.layout,
                    &mut self.controls,
                    &mut out,
                );
            }
        }
        out
    }

    /// Render the current layout. Failures become a notice and change nothing.
    fn export(&mut self, out: &mut Vec<Notification>) {
        let result = export::render(
            self.store.iter(),
            &self.background,
            &self.layout,
            &self.fonts,
            &self.config.export.filename_prefix,
        );
        match result {
            Ok(image) => out.push(Notification::ExportReady(image)),
            Err(EditorError::AssetNotReady) => self.exports.defer(),
            Err(e) => {
                log::warn!("Export failed: {}", e);
                out.push(Notification::Notice(format!("Could not create image: {}", e)));
            }
        }
    }
}
