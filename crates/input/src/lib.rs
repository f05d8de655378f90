//! Input surface: host pointer, scroll and resize input mapped to widget events.
//!
//! # Invariants
//! - Widgets consume `InputEvent`s, never raw host events. Any host (desktop
//!   window, headless script, test) drives the same widget logic.
//! - Events reach a widget only while it holds a live subscription for that kind.

pub mod bus;
pub mod element;
pub mod event;

pub use bus::{EventBus, Subscription};
pub use element::{Element, ElementTag, HitPath};
pub use event::{EventMask, InputEvent, ScrollMetrics};
