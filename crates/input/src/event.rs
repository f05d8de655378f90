use bitflags::bitflags;
use folio_common::Viewport;
use glam::Vec2;

use crate::element::HitPath;

/// Raw scroll measurements: how far the document is scrolled and how much
/// there is to scroll.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Distance scrolled from the top of the document, in pixels.
    pub offset: f32,
    /// Total document height.
    pub scroll_height: f32,
    /// Height of the visible area.
    pub viewport_height: f32,
}

impl ScrollMetrics {
    pub fn new(offset: f32, scroll_height: f32, viewport_height: f32) -> Self {
        Self {
            offset,
            scroll_height,
            viewport_height,
        }
    }

    /// Scrollable extent: document height minus viewport height. May be zero or negative.
    pub fn extent(&self) -> f32 {
        self.scroll_height - self.viewport_height
    }
}

/// An input event any host can produce.
///
/// Pointer coordinates are viewport-relative client coordinates in pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// The pointer moved over the viewport. `target` is the hit path under it.
    PointerMoved { position: Vec2, target: HitPath },
    /// The pointer left the viewport.
    PointerLeft,
    /// The document scrolled or its scrollable size changed.
    Scrolled(ScrollMetrics),
    /// The viewport changed size.
    Resized(Viewport),
}

impl InputEvent {
    pub fn pointer_moved(x: f32, y: f32, target: HitPath) -> Self {
        Self::PointerMoved {
            position: Vec2::new(x, y),
            target,
        }
    }

    /// The subscription flag this event is delivered under.
    pub fn kind(&self) -> EventMask {
        match self {
            Self::PointerMoved { .. } => EventMask::POINTER_MOVE,
            Self::PointerLeft => EventMask::POINTER_LEAVE,
            Self::Scrolled(_) => EventMask::SCROLL,
            Self::Resized(_) => EventMask::RESIZE,
        }
    }
}

bitflags! {
    /// Event kinds a widget can subscribe to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EventMask: u8 {
        const POINTER_MOVE = 1 << 0;
        const POINTER_LEAVE = 1 << 1;
        const SCROLL = 1 << 2;
        const RESIZE = 1 << 3;
        const POINTER = Self::POINTER_MOVE.bits() | Self::POINTER_LEAVE.bits();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kinds_are_single_flags() {
        let move_event = InputEvent::pointer_moved(1.0, 2.0, HitPath::empty());
        assert_eq!(move_event.kind(), EventMask::POINTER_MOVE);
        assert_eq!(InputEvent::PointerLeft.kind(), EventMask::POINTER_LEAVE);
        assert_eq!(
            InputEvent::Scrolled(ScrollMetrics::default()).kind(),
            EventMask::SCROLL
        );
        assert_eq!(
            InputEvent::Resized(Viewport::default()).kind(),
            EventMask::RESIZE
        );
    }

    #[test]
    fn pointer_mask_covers_move_and_leave() {
        assert!(EventMask::POINTER.contains(EventMask::POINTER_MOVE));
        assert!(EventMask::POINTER.contains(EventMask::POINTER_LEAVE));
        assert!(!EventMask::POINTER.contains(EventMask::SCROLL));
    }

    #[test]
    fn scroll_extent() {
        let m = ScrollMetrics::new(100.0, 2000.0, 800.0);
        assert_eq!(m.extent(), 1200.0);
        assert!(ScrollMetrics::new(0.0, 500.0, 800.0).extent() < 0.0);
    }
}
