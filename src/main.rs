//! Headless memegen runner.
//!
//! `memegen <template> [script.json] [out-dir]`
//!
//! Loads the template, replays an optional JSON list of editor messages,
//! then downloads the meme into `out-dir` (default: current directory).

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = native::run() {
        eprintln!("memegen: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;
    use std::path::{Path, PathBuf};

    use memegen::background::BackgroundDecoder;
    use memegen::geometry::Rect;
    use memegen::{EditorConfig, MemeEditor, Message, Notification};

    const USAGE: &str = "usage: memegen <template> [script.json] [out-dir]";

    pub fn run() -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args().skip(1);
        let template = args.next().ok_or(USAGE)?;
        let script = args.next().map(PathBuf::from);
        let out_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

        let config = EditorConfig::load_from_default_path().unwrap_or_default();
        env_logger::Builder::new()
            .filter_level(config.log_level.to_level_filter())
            .parse_default_env()
            .init();

        let mut editor = MemeEditor::new(config);
        let mut decoder = BackgroundDecoder::spawn()?;

        dispatch(&mut editor, &mut decoder, Message::TemplateSelected(template), &out_dir)?;
        if let Some(loaded) = decoder.wait() {
            dispatch(&mut editor, &mut decoder, loaded, &out_dir)?;
        }

        // No display here: lay the canvas out at the template's native size.
        if let Some(size) = editor.background().natural_size() {
            let container = Rect::new(0.0, 0.0, size.width as f32, size.height as f32);
            dispatch(&mut editor, &mut decoder, Message::ContainerMeasured(container), &out_dir)?;
        }

        if let Some(script) = script {
            let json = std::fs::read_to_string(&script)?;
            let messages: Vec<Message> = serde_json::from_str(&json)?;
            log::info!("Replaying {} message(s) from {:?}", messages.len(), script);
            for message in messages {
                dispatch(&mut editor, &mut decoder, message, &out_dir)?;
            }
        }

        dispatch(&mut editor, &mut decoder, Message::DownloadRequested, &out_dir)?;
        while editor.export_pending() {
            let Some(loaded) = decoder.wait() else {
                return Err("template never finished loading".into());
            };
            dispatch(&mut editor, &mut decoder, loaded, &out_dir)?;
        }
        Ok(())
    }

    fn dispatch(
        editor: &mut MemeEditor,
        decoder: &mut BackgroundDecoder,
        message: Message,
        out_dir: &Path,
    ) -> Result<(), Box<dyn Error>> {
        for notification in editor.update(message) {
            match notification {
                Notification::TemplateChanged(path) => decoder.request(path),
                Notification::Notice(text) => log::warn!("{}", text),
                Notification::ExportReady(image) => {
                    std::fs::create_dir_all(out_dir)?;
                    let path = out_dir.join(&image.filename);
                    std::fs::write(&path, &image.png)?;
                    log::info!("Wrote {:?} ({}x{})", path, image.width, image.height);
                    println!("{}", path.display());
                }
                other => log::trace!("{:?}", other),
            }
        }
        Ok(())
    }
}
