//! One-shot entrance animation: fade in while sliding up into place.

use std::time::Duration;

use folio_common::{Rect, WidgetId};
use folio_input::{EventMask, InputEvent, Subscription};
use folio_motion::{Easing, Tween};

use crate::widget::{Lifecycle, MountContext, Widget, WidgetFrame};

/// What starts the entrance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealTrigger {
    /// As soon as the widget is mounted.
    Mount,
    /// The first time any part of the bounds enters the viewport.
    #[default]
    InView,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealConfig {
    /// Vertical offset (px) the content starts from; negative slides down.
    pub from_offset_y: f32,
    pub duration: Duration,
    pub delay: Duration,
    pub easing: Easing,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            from_offset_y: 20.0,
            duration: Duration::from_millis(500),
            delay: Duration::ZERO,
            easing: Easing::EaseOut,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealFrame {
    /// Bounds in document coordinates.
    pub bounds: Rect,
    pub opacity: f32,
    pub offset_y: f32,
    pub revealed: bool,
}

pub struct RevealOnView {
    id: WidgetId,
    lifecycle: Lifecycle,
    bounds: Rect,
    trigger: RevealTrigger,
    opacity: Tween,
    offset: Tween,
    /// Time since the trigger fired; `None` until then.
    elapsed: Option<Duration>,
    scroll_offset: f32,
    /// Held only until the entrance fires.
    subscription: Option<Subscription>,
}

impl RevealOnView {
    pub fn new(bounds: Rect, trigger: RevealTrigger, config: RevealConfig) -> Self {
        let tween = |from, to| {
            Tween::new(from, to, config.duration)
                .with_delay(config.delay)
                .with_easing(config.easing)
        };
        Self {
            id: WidgetId::new(),
            lifecycle: Lifecycle::Created,
            bounds,
            trigger,
            opacity: tween(0.0, 1.0),
            offset: tween(config.from_offset_y, 0.0),
            elapsed: None,
            scroll_offset: 0.0,
            subscription: None,
        }
    }

    pub fn trigger(&self) -> RevealTrigger {
        self.trigger
    }

    pub fn is_triggered(&self) -> bool {
        self.elapsed.is_some()
    }

    /// Whether the entrance has fully played.
    pub fn is_revealed(&self) -> bool {
        self.elapsed.is_some_and(|t| self.opacity.is_finished(t))
    }

    pub fn document_bounds(&self) -> Rect {
        self.bounds
    }

    fn start(&mut self) {
        if self.elapsed.is_none() {
            self.elapsed = Some(Duration::ZERO);
            tracing::debug!(id = %self.id, "reveal triggered");
        }
    }

    fn check_visibility(&mut self, viewport_height: f32) {
        let top = self.scroll_offset;
        let bottom = top + viewport_height;
        if self.bounds.min.y < bottom && top < self.bounds.max().y {
            self.start();
        }
    }
}

impl Widget for RevealOnView {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn name(&self) -> &'static str {
        "reveal"
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn mount(&mut self, ctx: &mut MountContext<'_>) {
        if self.lifecycle != Lifecycle::Created {
            return;
        }
        self.lifecycle = Lifecycle::Mounted;
        match self.trigger {
            RevealTrigger::Mount => self.start(),
            RevealTrigger::InView => {
                let mask = EventMask::SCROLL | EventMask::RESIZE;
                self.subscription = Some(ctx.bus.subscribe(self.id, mask));
            }
        }
    }

    fn handle_event(&mut self, event: &InputEvent, ctx: &mut MountContext<'_>) {
        if !self.is_alive() || self.is_triggered() {
            return;
        }
        match event {
            InputEvent::Scrolled(metrics) => {
                self.scroll_offset = metrics.offset;
                self.check_visibility(metrics.viewport_height);
            }
            InputEvent::Resized(viewport) => self.check_visibility(viewport.height),
            _ => {}
        }
        let triggered = self.is_triggered();
        if let Some(subscription) = self.subscription.take_if(|_| triggered) {
            ctx.bus.unsubscribe(subscription);
        }
    }

    fn frame(&mut self, dt: Duration) {
        if !self.is_alive() {
            return;
        }
        if let Some(elapsed) = self.elapsed.as_mut() {
            *elapsed += dt;
        }
    }

    fn place(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    fn dispose(&mut self, ctx: &mut MountContext<'_>) {
        if self.lifecycle == Lifecycle::Disposed {
            return;
        }
        ctx.release(self.id);
        self.subscription = None;
        self.lifecycle = Lifecycle::Disposed;
    }

    fn snapshot(&self) -> WidgetFrame {
        if !self.is_alive() {
            return WidgetFrame::Hidden;
        }
        let (opacity, offset_y) = match self.elapsed {
            Some(t) => (self.opacity.sample(t), self.offset.sample(t)),
            None => (self.opacity.from, self.offset.from),
        };
        WidgetFrame::Reveal(RevealFrame {
            bounds: self.bounds,
            opacity,
            offset_y,
            revealed: self.is_revealed(),
        })
    }
}
