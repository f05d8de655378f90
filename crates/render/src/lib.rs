//! Rendering adapter: turns a `PageFrame` into something a host can show.
//!
//! # Invariants
//! - Renderers read frames; they never touch widget state.
//! - Output depends only on the frame and the view, so equal inputs render
//!   identically.
//!
//! The desktop host paints with egui and uses `project_card` for the tilted
//! cards. The CLI prints either the debug dump or the CSS a browser host
//! would apply.

mod css;
mod project;
mod renderer;

pub use css::{CssRenderer, CssRule};
pub use project::project_card;
pub use renderer::{DebugTextRenderer, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}
