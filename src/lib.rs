#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod color;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod face;
pub mod flood_fill;
pub mod history;
pub mod input;
pub mod pixel_buffer;
pub mod renderer;
pub mod session;
pub mod state;
pub mod store;
pub mod tools;
pub mod util;

pub use app::PixelEditorApp;
pub use color::{Color, PaintColor};
pub use config::EditorConfig;
pub use dispatcher::ToolDispatcher;
pub use error::EditorError;
pub use event::{EditorEvent, EventHandler};
pub use face::FaceId;
pub use flood_fill::flood_fill;
pub use history::{HistoryStack, HistoryState};
pub use input::{GridPos, InputEvent};
pub use pixel_buffer::{PixelBuffer, PixelSource, Snapshot};
pub use renderer::Renderer;
pub use session::{EditorSession, HistoryControl};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use tools::Tool;
