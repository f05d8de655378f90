//! Shared types for the folio motion layer.
//!
//! # Invariants
//! - Widget identity is per instance; nothing here is process-wide state.

mod types;

pub use types::{Capabilities, Rect, Viewport, WidgetId};
