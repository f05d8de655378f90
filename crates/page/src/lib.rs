//! The page shell: loads a page description, lays it out, and hosts every
//! reactive widget on it.
//!
//! # Invariants
//! - The shell is the only place host input enters; widgets never see raw
//!   window events, only `InputEvent`s they subscribed to.
//! - Scroll offsets handed to widgets are always within `[0, max_scroll]`.
//! - After `teardown` the event bus is empty and no timer is pending.
//! - Layout rects are in document coordinates, except the fixed navbar.

pub mod config;
pub mod frame;
pub mod layout;
pub mod shell;

pub use config::{
    ActionConfig, ActionKind, CardConfig, ConfigError, CursorConfig, NavLink, PageConfig,
    RevealSettings, SectionConfig, SpringPresets, TiltSettings, TypewriterConfig,
};
pub use frame::{PageFrame, WidgetSnapshot};
pub use layout::{NAVBAR_HEIGHT, PageLayout, Placed, SectionLayout};
pub use shell::PageShell;

use folio_widgets::WidgetError;

/// Errors from building a page.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("widget error: {0}")]
    Widget(#[from] WidgetError),
}

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}
