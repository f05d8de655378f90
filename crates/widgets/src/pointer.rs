//! Custom cursor: a small dot locked to the pointer and a larger ring that
//! trails it, both scaling up over interactive elements.

use std::collections::VecDeque;
use std::time::Duration;

use folio_common::WidgetId;
use folio_input::{EventMask, InputEvent};
use folio_motion::{Spring, SpringConfig};
use glam::Vec2;

use crate::widget::{Lifecycle, MountContext, Widget, WidgetFrame};

/// Diameter of the cursor dot, in pixels.
pub const DOT_SIZE: f32 = 16.0;
/// Diameter of the trailing ring, in pixels.
pub const RING_SIZE: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerTrackerConfig {
    pub dot: SpringConfig,
    pub ring: SpringConfig,
    /// How long the ring waits before chasing a new pointer position.
    pub ring_delay: Duration,
    pub dot_hover_scale: f32,
    pub ring_hover_scale: f32,
}

impl Default for PointerTrackerConfig {
    fn default() -> Self {
        Self {
            dot: SpringConfig::cursor_dot(),
            ring: SpringConfig::cursor_ring(),
            ring_delay: Duration::from_millis(50),
            dot_hover_scale: 2.5,
            ring_hover_scale: 1.5,
        }
    }
}

/// Latest pointer reading. Scoped to one tracker instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    pub position: Vec2,
    pub over_interactive: bool,
}

/// One rendered cursor layer: top-left offset, diameter and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorLayer {
    pub offset: Vec2,
    pub size: f32,
    pub scale: f32,
}

impl CursorLayer {
    /// Center of the layer on screen.
    pub fn center(&self) -> Vec2 {
        self.offset + Vec2::splat(self.size * 0.5)
    }

    /// Rendered radius including scale.
    pub fn radius(&self) -> f32 {
        self.size * 0.5 * self.scale
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorFrame {
    pub pointer: PointerState,
    pub dot: CursorLayer,
    pub ring: CursorLayer,
}

/// Ring retarget waiting out the delay.
#[derive(Debug, Clone, Copy)]
struct Pending {
    due: Duration,
    offset: Vec2,
    scale: f32,
}

pub struct PointerTracker {
    id: WidgetId,
    lifecycle: Lifecycle,
    config: PointerTrackerConfig,
    enabled: bool,
    state: Option<PointerState>,
    dot: Spring<Vec2>,
    dot_scale: Spring<f32>,
    ring: Spring<Vec2>,
    ring_scale: Spring<f32>,
    ring_queue: VecDeque<Pending>,
    elapsed: Duration,
}

impl PointerTracker {
    pub fn new(config: PointerTrackerConfig) -> Self {
        Self {
            id: WidgetId::new(),
            lifecycle: Lifecycle::Created,
            config,
            enabled: false,
            state: None,
            dot: Spring::new(Vec2::ZERO, config.dot),
            dot_scale: Spring::new(1.0, config.dot),
            ring: Spring::new(Vec2::ZERO, config.ring),
            ring_scale: Spring::new(1.0, config.ring),
            ring_queue: VecDeque::new(),
            elapsed: Duration::ZERO,
        }
    }

    /// False on touch devices, and before mount.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn state(&self) -> Option<PointerState> {
        self.state
    }

    fn pointer_moved(&mut self, position: Vec2, over_interactive: bool) {
        let first = self.state.is_none();
        self.state = Some(PointerState {
            position,
            over_interactive,
        });

        let dot_offset = position - Vec2::splat(DOT_SIZE * 0.5);
        let ring_offset = position - Vec2::splat(RING_SIZE * 0.5);
        let (dot_scale, ring_scale) = if over_interactive {
            (self.config.dot_hover_scale, self.config.ring_hover_scale)
        } else {
            (1.0, 1.0)
        };

        if first {
            // Appear under the pointer instead of flying in from the corner.
            self.dot.jump_to(dot_offset);
            self.ring.jump_to(ring_offset);
        }
        self.dot.set_target(dot_offset);
        self.dot_scale.set_target(dot_scale);
        self.ring_queue.push_back(Pending {
            due: self.elapsed + self.config.ring_delay,
            offset: ring_offset,
            scale: ring_scale,
        });
    }

    fn release_due_ring_targets(&mut self) {
        while let Some(pending) = self.ring_queue.front().copied() {
            if pending.due > self.elapsed {
                break;
            }
            self.ring_queue.pop_front();
            self.ring.set_target(pending.offset);
            self.ring_scale.set_target(pending.scale);
        }
    }
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new(PointerTrackerConfig::default())
    }
}

impl Widget for PointerTracker {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn name(&self) -> &'static str {
        "pointer-tracker"
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn mount(&mut self, ctx: &mut MountContext<'_>) {
        if self.lifecycle != Lifecycle::Created {
            return;
        }
        self.lifecycle = Lifecycle::Mounted;
        self.enabled = !ctx.capabilities.touch;
        if self.enabled {
            ctx.bus.subscribe(self.id, EventMask::POINTER_MOVE);
        }
        tracing::debug!(id = %self.id, enabled = self.enabled, "pointer tracker mounted");
    }

    fn handle_event(&mut self, event: &InputEvent, _ctx: &mut MountContext<'_>) {
        if !self.is_alive() || !self.enabled {
            return;
        }
        if let InputEvent::PointerMoved { position, target } = event {
            self.pointer_moved(*position, target.is_interactive());
        }
    }

    fn frame(&mut self, dt: Duration) {
        if !self.is_alive() || !self.enabled {
            return;
        }
        self.elapsed += dt;
        self.release_due_ring_targets();
        self.dot.step(dt);
        self.dot_scale.step(dt);
        self.ring.step(dt);
        self.ring_scale.step(dt);
    }

    fn dispose(&mut self, ctx: &mut MountContext<'_>) {
        if self.lifecycle == Lifecycle::Disposed {
            return;
        }
        ctx.release(self.id);
        self.lifecycle = Lifecycle::Disposed;
        self.ring_queue.clear();
        tracing::debug!(id = %self.id, "pointer tracker disposed");
    }

    fn snapshot(&self) -> WidgetFrame {
        if !self.is_alive() || !self.enabled {
            return WidgetFrame::Hidden;
        }
        let Some(pointer) = self.state else {
            return WidgetFrame::Hidden;
        };
        WidgetFrame::Cursor(CursorFrame {
            pointer,
            dot: CursorLayer {
                offset: self.dot.value(),
                size: DOT_SIZE,
                scale: self.dot_scale.value(),
            },
            ring: CursorLayer {
                offset: self.ring.value(),
                size: RING_SIZE,
                scale: self.ring_scale.value(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::ctx;
    use folio_clock::TimerQueue;
    use folio_common::Capabilities;
    use folio_input::{Element, ElementTag, EventBus, HitPath};

    const FRAME: Duration = Duration::from_micros(16_667);

    fn mounted(capabilities: Capabilities) -> (PointerTracker, EventBus, TimerQueue) {
        let mut bus = EventBus::new();
        let mut timers = TimerQueue::new();
        let mut tracker = PointerTracker::default();
        tracker.mount(&mut MountContext {
            bus: &mut bus,
            timers: &mut timers,
            capabilities,
        });
        (tracker, bus, timers)
    }

    fn cursor(tracker: &PointerTracker) -> CursorFrame {
        match tracker.snapshot() {
            WidgetFrame::Cursor(frame) => frame,
            other => panic!("expected cursor frame, got {other:?}"),
        }
    }

    fn over_link() -> HitPath {
        HitPath::new(vec![
            Element::new(ElementTag::Text),
            Element::new(ElementTag::Anchor),
            Element::new(ElementTag::Container),
        ])
    }

    #[test]
    fn hidden_until_first_move() {
        let (tracker, bus, _) = mounted(Capabilities::pointer());
        assert_eq!(bus.subscription_count(tracker.id()), 1);
        assert_eq!(tracker.snapshot(), WidgetFrame::Hidden);
    }

    #[test]
    fn first_move_places_layers_under_pointer() {
        let (mut tracker, mut bus, mut timers) = mounted(Capabilities::pointer());
        tracker.handle_event(
            &InputEvent::pointer_moved(100.0, 200.0, HitPath::empty()),
            &mut ctx(&mut bus, &mut timers),
        );
        let frame = cursor(&tracker);
        assert_eq!(frame.dot.offset, Vec2::new(92.0, 192.0));
        assert_eq!(frame.ring.offset, Vec2::new(80.0, 180.0));
        assert_eq!(frame.dot.center(), Vec2::new(100.0, 200.0));
        assert_eq!(frame.ring.center(), Vec2::new(100.0, 200.0));
    }

    #[test]
    fn ring_trails_the_dot() {
        let (mut tracker, mut bus, mut timers) = mounted(Capabilities::pointer());
        tracker.handle_event(
            &InputEvent::pointer_moved(0.0, 0.0, HitPath::empty()),
            &mut ctx(&mut bus, &mut timers),
        );
        tracker.handle_event(
            &InputEvent::pointer_moved(400.0, 0.0, HitPath::empty()),
            &mut ctx(&mut bus, &mut timers),
        );

        for _ in 0..3 {
            tracker.frame(FRAME);
        }
        let frame = cursor(&tracker);
        assert!(frame.dot.center().x > 0.0);
        // The ring is still waiting out its delay or only just starting.
        assert!(frame.ring.center().x < frame.dot.center().x);

        for _ in 0..240 {
            tracker.frame(FRAME);
        }
        let frame = cursor(&tracker);
        assert_eq!(frame.dot.center(), Vec2::new(400.0, 0.0));
        assert_eq!(frame.ring.center(), Vec2::new(400.0, 0.0));
    }

    #[test]
    fn hovering_interactive_scales_both_layers() {
        let (mut tracker, mut bus, mut timers) = mounted(Capabilities::pointer());
        tracker.handle_event(
            &InputEvent::pointer_moved(50.0, 50.0, over_link()),
            &mut ctx(&mut bus, &mut timers),
        );
        assert!(tracker.state().unwrap().over_interactive);

        for _ in 0..240 {
            tracker.frame(FRAME);
        }
        let frame = cursor(&tracker);
        assert_eq!(frame.dot.scale, 2.5);
        assert_eq!(frame.ring.scale, 1.5);

        tracker.handle_event(
            &InputEvent::pointer_moved(50.0, 50.0, HitPath::empty()),
            &mut ctx(&mut bus, &mut timers),
        );
        for _ in 0..240 {
            tracker.frame(FRAME);
        }
        let frame = cursor(&tracker);
        assert_eq!(frame.dot.scale, 1.0);
        assert_eq!(frame.ring.scale, 1.0);
    }

    #[test]
    fn touch_device_subscribes_nothing_and_renders_nothing() {
        let (mut tracker, mut bus, mut timers) = mounted(Capabilities::touch());
        assert!(!tracker.is_enabled());
        assert_eq!(bus.subscription_count(tracker.id()), 0);
        assert!(bus.is_empty());

        tracker.handle_event(
            &InputEvent::pointer_moved(10.0, 10.0, HitPath::empty()),
            &mut ctx(&mut bus, &mut timers),
        );
        tracker.frame(FRAME);
        assert!(tracker.state().is_none());
        assert_eq!(tracker.snapshot(), WidgetFrame::Hidden);
    }

    #[test]
    fn disposed_tracker_ignores_input() {
        let (mut tracker, mut bus, mut timers) = mounted(Capabilities::pointer());
        tracker.handle_event(
            &InputEvent::pointer_moved(5.0, 5.0, HitPath::empty()),
            &mut ctx(&mut bus, &mut timers),
        );
        tracker.dispose(&mut MountContext {
            bus: &mut bus,
            timers: &mut timers,
            capabilities: Capabilities::pointer(),
        });
        assert!(bus.is_empty());

        tracker.handle_event(
            &InputEvent::pointer_moved(500.0, 500.0, HitPath::empty()),
            &mut ctx(&mut bus, &mut timers),
        );
        tracker.frame(FRAME);
        assert_eq!(tracker.state().unwrap().position, Vec2::new(5.0, 5.0));
        assert_eq!(tracker.snapshot(), WidgetFrame::Hidden);
    }
}
