//! Background template image.
//!
//! A template is referenced by path and loads asynchronously. Until the load
//! completes the editor can still lay out text, but export has to wait.

use image::RgbaImage;

use crate::geometry::ImageSize;

/// Load state of the background bitmap.
#[derive(Debug, Clone)]
pub enum AssetState {
    Loading,
    Ready(RgbaImage),
    Failed(String),
}

/// The currently selected template.
#[derive(Debug, Clone)]
pub struct BackgroundImage {
    path: String,
    state: AssetState,
}

impl BackgroundImage {
    /// Reference a template that has started loading.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            state: AssetState::Loading,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn state(&self) -> &AssetState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, AssetState::Ready(_))
    }

    /// Decoded bitmap, once loaded.
    pub fn image(&self) -> Option<&RgbaImage> {
        match &self.state {
            AssetState::Ready(image) => Some(image),
            _ => None,
        }
    }

    /// Native pixel dimensions, once loaded.
    pub fn natural_size(&self) -> Option<ImageSize> {
        self.image().map(|image| ImageSize::new(image.width(), image.height()))
    }

    /// Record the outcome of loading this template.
    pub fn finish_loading(&mut self, result: Result<RgbaImage, String>) {
        self.state = match result {
            Ok(image) => {
                log::info!(
                    "Background '{}' ready ({}x{})",
                    self.path,
                    image.width(),
                    image.height()
                );
                AssetState::Ready(image)
            }
            Err(message) => {
                log::warn!("Background '{}' failed to load: {}", self.path, message);
                AssetState::Failed(message)
            }
        };
    }
}

/// Decode an encoded image (PNG, JPEG, ...) into RGBA8.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, image::ImageError> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

// ============================================================================
// Native decoder thread
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
pub use native::BackgroundDecoder;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
    use std::thread::{self, JoinHandle};

    use super::decode_image;
    use crate::message::Message;

    enum ThreadMessage {
        Load(String),
        Shutdown,
    }

    /// Completed load, tagged with the path it was requested for.
    type LoadResult = (String, Result<image::RgbaImage, String>);

    /// Background thread that reads and decodes template files.
    ///
    /// Results are handed back as [`Message::BackgroundLoaded`] and never touch
    /// editor state from the worker side.
    pub struct BackgroundDecoder {
        request_tx: Sender<ThreadMessage>,
        result_rx: Receiver<LoadResult>,
        thread_handle: Option<JoinHandle<()>>,
        /// Requests sent but not yet handed back. Repeated paths count separately.
        in_flight: usize,
    }

    impl BackgroundDecoder {
        /// Spawn the decoder thread.
        pub fn spawn() -> Result<Self, String> {
            let (request_tx, request_rx) = mpsc::channel::<ThreadMessage>();
            let (result_tx, result_rx) = mpsc::channel::<LoadResult>();

            let thread_handle = thread::Builder::new()
                .name("background-decoder".to_string())
                .spawn(move || {
                    log::debug!("Background decoder thread started");
                    Self::thread_loop(request_rx, result_tx);
                    log::debug!("Background decoder thread exiting");
                })
                .map_err(|e| format!("Failed to spawn decoder thread: {}", e))?;

            Ok(Self {
                request_tx,
                result_rx,
                thread_handle: Some(thread_handle),
                in_flight: 0,
            })
        }

        fn thread_loop(request_rx: Receiver<ThreadMessage>, result_tx: Sender<LoadResult>) {
            while let Ok(ThreadMessage::Load(path)) = request_rx.recv() {
                let result = Self::load(&path);
                if result_tx.send((path, result)).is_err() {
                    log::warn!("Result channel closed, decoder thread exiting");
                    break;
                }
            }
        }

        fn load(path: &str) -> Result<image::RgbaImage, String> {
            let bytes = std::fs::read(PathBuf::from(path)).map_err(|e| e.to_string())?;
            log::debug!("Decoding background {:?} ({} bytes)", path, bytes.len());
            decode_image(&bytes).map_err(|e| e.to_string())
        }

        /// Queue a template for loading.
        pub fn request(&mut self, path: impl Into<String>) {
            let path = path.into();
            if self.request_tx.send(ThreadMessage::Load(path)).is_err() {
                log::error!("Failed to send load request: channel closed");
                return;
            }
            self.in_flight += 1;
        }

        /// Take one finished load, if any. Non-blocking.
        pub fn poll(&mut self) -> Option<Message> {
            match self.result_rx.try_recv() {
                Ok((path, result)) => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    Some(Message::BackgroundLoaded { path, result })
                }
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => {
                    log::warn!("Decoder thread disconnected");
                    None
                }
            }
        }

        /// Block until the next load finishes. Returns `None` once nothing is pending.
        pub fn wait(&mut self) -> Option<Message> {
            if self.in_flight == 0 {
                return None;
            }
            match self.result_rx.recv() {
                Ok((path, result)) => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    Some(Message::BackgroundLoaded { path, result })
                }
                Err(_) => {
                    log::warn!("Decoder thread disconnected");
                    self.in_flight = 0;
                    None
                }
            }
        }

        pub fn pending_count(&self) -> usize {
            self.in_flight
        }
    }

    impl Drop for BackgroundDecoder {
        fn drop(&mut self) {
            let _ = self.request_tx.send(ThreadMessage::Shutdown);
            if let Some(handle) = self.thread_handle.take() {
                if let Err(e) = handle.join() {
                    log::warn!("Decoder thread panicked: {:?}", e);
                }
            }
        }
    }
}
