#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

// When compiling natively:
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config = load_config();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 520.0])
            .with_min_inner_size([480.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Texture Painter",
        native_options,
        Box::new(|cc| Ok(Box::new(texture_painter::PixelEditorApp::new(cc, config)?))),
    )
}

/// Reads the config named by the first argument, or `texture_painter.json` if present
#[cfg(not(target_arch = "wasm32"))]
fn load_config() -> Option<texture_painter::EditorConfig> {
    let explicit = std::env::args_os().nth(1).map(std::path::PathBuf::from);
    let path = explicit
        .clone()
        .unwrap_or_else(|| std::path::PathBuf::from("texture_painter.json"));
    if explicit.is_none() && !path.exists() {
        return None;
    }

    match texture_painter::EditorConfig::load(&path) {
        Ok(config) => {
            log::info!("Loaded config from {}", path.display());
            Some(config)
        }
        Err(err) => {
            log::warn!("Ignoring config {}: {}", path.display(), err);
            None
        }
    }
}

// When compiling to web using trunk:
#[cfg(target_arch = "wasm32")]
fn main() {
    use eframe::wasm_bindgen::JsCast as _;

    // Redirect `log` message to `console.log` and friends:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let Some(document) = web_sys::window().and_then(|window| window.document()) else {
            log::error!("No document to mount the editor in");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("the_canvas_id")
            .and_then(|element| element.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        else {
            log::error!("the_canvas_id is missing or not a canvas");
            return;
        };

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(texture_painter::PixelEditorApp::new(cc, None)?))),
            )
            .await;

        if let Err(err) = start_result {
            log::error!("Failed to start eframe: {:?}", err);
        }
    });
}
