use std::time::Duration;

use folio_clock::{TimerId, TimerQueue};
use folio_common::{Capabilities, Rect, WidgetId};
use folio_input::{EventBus, InputEvent};

use crate::pointer::CursorFrame;
use crate::reveal::RevealFrame;
use crate::scroll::ProgressFrame;
use crate::text_cycler::TextFrame;
use crate::tilt::TiltFrame;

/// Host resources a widget may claim or give back while mounted.
pub struct MountContext<'a> {
    pub bus: &'a mut EventBus,
    pub timers: &'a mut TimerQueue,
    /// Detected once by the host before mounting.
    pub capabilities: Capabilities,
}

impl<'a> MountContext<'a> {
    pub fn new(
        bus: &'a mut EventBus,
        timers: &'a mut TimerQueue,
        capabilities: Capabilities,
    ) -> Self {
        Self {
            bus,
            timers,
            capabilities,
        }
    }

    /// Revoke every subscription and pending timer held by `owner`.
    pub fn release(&mut self, owner: WidgetId) -> (usize, usize) {
        let subscriptions = self.bus.unsubscribe_owner(owner);
        let timers = self.timers.cancel_owner(owner);
        (subscriptions, timers)
    }
}

/// Context for delivering events in widget tests.
#[cfg(test)]
pub(crate) fn ctx<'a>(bus: &'a mut EventBus, timers: &'a mut TimerQueue) -> MountContext<'a> {
    MountContext::new(bus, timers, Capabilities::pointer())
}

/// Where a widget is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Created,
    Mounted,
    Disposed,
}

impl Lifecycle {
    pub fn is_mounted(&self) -> bool {
        matches!(self, Self::Mounted)
    }
}

/// What a widget shows this frame, for renderers.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetFrame {
    /// Nothing to draw: disabled, disposed, or no input yet.
    Hidden,
    Cursor(CursorFrame),
    Progress(ProgressFrame),
    Tilt(TiltFrame),
    Text(TextFrame),
    Reveal(RevealFrame),
}

/// Common lifecycle of every reactive widget.
///
/// Event, timer and frame entry points are silent no-ops unless the widget is
/// mounted. Callbacks that arrive after disposal are dropped, never reported.
pub trait Widget {
    fn id(&self) -> WidgetId;

    /// Short static name for logs.
    fn name(&self) -> &'static str;

    fn lifecycle(&self) -> Lifecycle;

    /// Claim subscriptions and timers. Only acts on a freshly created widget.
    fn mount(&mut self, ctx: &mut MountContext<'_>);

    /// Deliver an event the widget is subscribed to. The widget may arm
    /// timers or drop its own subscriptions through `ctx`.
    fn handle_event(&mut self, _event: &InputEvent, _ctx: &mut MountContext<'_>) {}

    /// Deliver a timer the widget armed.
    fn on_timer(&mut self, _timer: TimerId, _timers: &mut TimerQueue) {}

    /// Advance smoothing by one animation frame.
    fn frame(&mut self, _dt: Duration) {}

    /// Move the widget's document bounds after a relayout. Widgets that are
    /// not tied to a page element ignore it.
    fn place(&mut self, _bounds: Rect) {}

    /// Release everything claimed at mount. Safe to call more than once.
    fn dispose(&mut self, ctx: &mut MountContext<'_>);

    fn snapshot(&self) -> WidgetFrame;

    fn is_alive(&self) -> bool {
        self.lifecycle().is_mounted()
    }
}
