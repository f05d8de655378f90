use std::time::Duration;

use folio_common::{Viewport, WidgetId};
use folio_input::{EventMask, InputEvent, ScrollMetrics};
use folio_motion::{Spring, SpringConfig};

use crate::widget::{Lifecycle, MountContext, Widget, WidgetFrame};

/// Fraction of the scrollable extent that has been scrolled, clamped into [0, 1].
///
/// A document that fits in the viewport (no extent) reads as 0.
pub fn compute_progress(metrics: &ScrollMetrics) -> f32 {
    let extent = metrics.extent();
    if !(extent > 0.0) || !metrics.offset.is_finite() {
        return 0.0;
    }
    (metrics.offset / extent).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressFrame {
    /// Unsmoothed progress from the latest scroll event.
    pub raw: f32,
    /// Spring-smoothed progress driving the bar.
    pub smoothed: f32,
    /// Filled width of the bar, anchored at the left edge.
    pub bar_width: f32,
}

/// Full-width bar whose fill tracks how far the page is scrolled.
pub struct ScrollProgressIndicator {
    id: WidgetId,
    lifecycle: Lifecycle,
    raw: f32,
    smoothed: Spring<f32>,
    viewport_width: f32,
}

impl ScrollProgressIndicator {
    pub fn new(spring: SpringConfig, viewport: Viewport) -> Self {
        Self {
            id: WidgetId::new(),
            lifecycle: Lifecycle::Created,
            raw: 0.0,
            smoothed: Spring::new(0.0, spring),
            viewport_width: viewport.width,
        }
    }

    pub fn raw_progress(&self) -> f32 {
        self.raw
    }

    pub fn smoothed_progress(&self) -> f32 {
        self.smoothed.value()
    }
}

impl Widget for ScrollProgressIndicator {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn name(&self) -> &'static str {
        "scroll-progress"
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn mount(&mut self, ctx: &mut MountContext<'_>) {
        if self.lifecycle != Lifecycle::Created {
            return;
        }
        self.lifecycle = Lifecycle::Mounted;
        ctx.bus.subscribe(self.id, EventMask::SCROLL | EventMask::RESIZE);
        tracing::debug!(id = %self.id, "scroll progress mounted");
    }

    fn handle_event(&mut self, event: &InputEvent, _ctx: &mut MountContext<'_>) {
        if !self.is_alive() {
            return;
        }
        match event {
            InputEvent::Scrolled(metrics) => {
                self.raw = compute_progress(metrics);
                self.smoothed.set_target(self.raw);
            }
            InputEvent::Resized(viewport) => {
                self.viewport_width = viewport.width;
            }
            _ => {}
        }
    }

    fn frame(&mut self, dt: Duration) {
        if !self.is_alive() {
            return;
        }
        self.smoothed.step(dt);
    }

    fn dispose(&mut self, ctx: &mut MountContext<'_>) {
        if self.lifecycle == Lifecycle::Disposed {
            return;
        }
        ctx.release(self.id);
        self.lifecycle = Lifecycle::Disposed;
    }

    fn snapshot(&self) -> WidgetFrame {
        if !self.is_alive() {
            return WidgetFrame::Hidden;
        }
        let smoothed = self.smoothed.value();
        WidgetFrame::Progress(ProgressFrame {
            raw: self.raw,
            smoothed,
            bar_width: self.viewport_width * smoothed.clamp(0.0, 1.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::ctx;
    use folio_clock::TimerQueue;
    use folio_common::Capabilities;
    use folio_input::EventBus;

    #[test]
    fn progress_is_offset_over_extent() {
        assert_eq!(compute_progress(&ScrollMetrics::new(0.0, 3000.0, 1000.0)), 0.0);
        assert_eq!(compute_progress(&ScrollMetrics::new(1000.0, 3000.0, 1000.0)), 0.5);
        assert_eq!(compute_progress(&ScrollMetrics::new(2000.0, 3000.0, 1000.0)), 1.0);
    }

    #[test]
    fn progress_is_clamped() {
        // Overscroll and rubber-banding
        assert_eq!(compute_progress(&ScrollMetrics::new(-50.0, 3000.0, 1000.0)), 0.0);
        assert_eq!(compute_progress(&ScrollMetrics::new(2500.0, 3000.0, 1000.0)), 1.0);
        // Content shorter than the viewport, or empty
        assert_eq!(compute_progress(&ScrollMetrics::new(10.0, 500.0, 1000.0)), 0.0);
        assert_eq!(compute_progress(&ScrollMetrics::new(0.0, 0.0, 0.0)), 0.0);
        assert_eq!(compute_progress(&ScrollMetrics::new(f32::NAN, 3000.0, 1000.0)), 0.0);
    }

    #[test]
    fn bar_settles_on_raw_progress() {
        let mut bus = EventBus::new();
        let mut timers = TimerQueue::new();
        let viewport = Viewport::new(1000.0, 800.0);
        let mut bar = ScrollProgressIndicator::new(SpringConfig::scroll_bar(), viewport);
        bar.mount(&mut MountContext {
            bus: &mut bus,
            timers: &mut timers,
            capabilities: Capabilities::pointer(),
        });
        assert_eq!(bus.subscribers(EventMask::SCROLL), vec![bar.id()]);

        bar.handle_event(
            &InputEvent::Scrolled(ScrollMetrics::new(600.0, 2000.0, 800.0)),
            &mut ctx(&mut bus, &mut timers),
        );
        assert_eq!(bar.raw_progress(), 0.5);
        bar.frame(Duration::from_millis(16));
        assert!(bar.smoothed_progress() > 0.0 && bar.smoothed_progress() < 0.5);

        for _ in 0..600 {
            bar.frame(Duration::from_millis(16));
        }
        match bar.snapshot() {
            WidgetFrame::Progress(frame) => {
                assert_eq!(frame.smoothed, 0.5);
                assert_eq!(frame.bar_width, 500.0);
            }
            other => panic!("expected progress frame, got {other:?}"),
        }
    }

    #[test]
    fn resize_updates_bar_width() {
        let mut bus = EventBus::new();
        let mut timers = TimerQueue::new();
        let viewport = Viewport::new(1000.0, 800.0);
        let mut bar = ScrollProgressIndicator::new(SpringConfig::scroll_bar(), viewport);
        bar.mount(&mut MountContext {
            bus: &mut bus,
            timers: &mut timers,
            capabilities: Capabilities::touch(),
        });
        bar.handle_event(
            &InputEvent::Scrolled(ScrollMetrics::new(1200.0, 2000.0, 800.0)),
            &mut ctx(&mut bus, &mut timers),
        );
        bar.handle_event(
            &InputEvent::Resized(Viewport::new(400.0, 800.0)),
            &mut ctx(&mut bus, &mut timers),
        );
        for _ in 0..600 {
            bar.frame(Duration::from_millis(16));
        }
        let WidgetFrame::Progress(frame) = bar.snapshot() else {
            panic!("expected progress frame");
        };
        assert_eq!(frame.bar_width, 400.0);
    }
}
