//! Reactive widgets: each turns a stream of input events and timer ticks into
//! a small piece of animation state, smoothed every frame.
//!
//! # Invariants
//! - Widgets never share state; each owns its springs, timers and subscriptions.
//! - After `dispose`, no event, timer or frame mutates a widget.
//! - Touch-capable devices get no pointer-driven subscriptions.

pub mod pointer;
pub mod reveal;
pub mod scroll;
pub mod text_cycler;
pub mod tilt;
pub mod widget;

pub use pointer::{CursorFrame, CursorLayer, PointerState, PointerTracker, PointerTrackerConfig};
pub use reveal::{RevealConfig, RevealFrame, RevealOnView, RevealTrigger};
pub use scroll::{ProgressFrame, ScrollProgressIndicator, compute_progress};
pub use text_cycler::{
    TextCycler, TextFrame, Typewriter, TypewriterPhase, TypewriterState, TypewriterTiming,
    transition,
};
pub use tilt::{Rotation, TiltConfig, TiltFrame, TiltSurface};
pub use widget::{Lifecycle, MountContext, Widget, WidgetFrame};

use folio_motion::MotionError;

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}

/// Errors from constructing widgets with unusable parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WidgetError {
    #[error("text cycler needs at least one word")]
    EmptyWordList,
    #[error("typewriter {0} delay must be non-zero")]
    ZeroDelay(&'static str),
    #[error(transparent)]
    Motion(#[from] MotionError),
}
