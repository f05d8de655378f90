//! Pointer-driven 3D tilt for cards.
//!
//! The pointer's offset from the card center feeds two springs; the smoothed
//! offsets map linearly onto rotation angles. Axes are crossed: vertical
//! offset drives rotation about X, horizontal offset drives rotation about Y.

use std::time::Duration;

use folio_common::{Rect, WidgetId};
use folio_input::{EventMask, HitPath, InputEvent};
use folio_motion::{LinearMap, Spring, SpringConfig};
use glam::Vec2;

use crate::WidgetError;
use crate::widget::{Lifecycle, MountContext, Widget, WidgetFrame};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltConfig {
    pub spring: SpringConfig,
    /// Pointer offset (px) at which the tilt reaches `max_angle`.
    pub max_offset: f32,
    /// Largest rotation, in degrees.
    pub max_angle: f32,
    /// How far nested content sits in front of the card (px along Z).
    pub content_depth: f32,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            spring: SpringConfig::tilt(),
            max_offset: 300.0,
            max_angle: 10.0,
            content_depth: 20.0,
        }
    }
}

/// Rotation in degrees about the X and Y axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltFrame {
    /// Card bounds in document coordinates.
    pub bounds: Rect,
    pub rotation: Rotation,
    pub content_depth: f32,
    pub hovered: bool,
}

pub struct TiltSurface {
    id: WidgetId,
    lifecycle: Lifecycle,
    config: TiltConfig,
    enabled: bool,
    bounds: Rect,
    scroll_offset: f32,
    hovered: bool,
    offset_x: Spring<f32>,
    offset_y: Spring<f32>,
    rotate_x: LinearMap,
    rotate_y: LinearMap,
}

impl TiltSurface {
    /// A tilt surface over `bounds`, given in document coordinates.
    pub fn new(bounds: Rect, config: TiltConfig) -> Result<Self, WidgetError> {
        config.spring.validate()?;
        let (o, a) = (config.max_offset, config.max_angle);
        Ok(Self {
            id: WidgetId::new(),
            lifecycle: Lifecycle::Created,
            config,
            enabled: false,
            bounds,
            scroll_offset: 0.0,
            hovered: false,
            offset_x: Spring::new(0.0, config.spring),
            offset_y: Spring::new(0.0, config.spring),
            rotate_x: LinearMap::new([-o, o], [a, -a])?,
            rotate_y: LinearMap::new([-o, o], [-a, a])?,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn document_bounds(&self) -> Rect {
        self.bounds
    }

    /// Move the card, e.g. after a relayout.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// Card bounds in viewport coordinates at the current scroll offset.
    pub fn viewport_bounds(&self) -> Rect {
        self.bounds.translate(Vec2::new(0.0, -self.scroll_offset))
    }

    /// Raw offset the springs are heading toward.
    pub fn target_offset(&self) -> Vec2 {
        Vec2::new(self.offset_x.target(), self.offset_y.target())
    }

    pub fn smoothed_offset(&self) -> Vec2 {
        Vec2::new(self.offset_x.value(), self.offset_y.value())
    }

    /// Rotation for a given pointer offset from the card center.
    pub fn rotation_for(&self, offset: Vec2) -> Rotation {
        Rotation {
            x: self.rotate_x.apply(offset.y),
            y: self.rotate_y.apply(offset.x),
        }
    }

    /// Current smoothed rotation.
    pub fn rotation(&self) -> Rotation {
        self.rotation_for(self.smoothed_offset())
    }

    fn pointer_moved(&mut self, position: Vec2, target: &HitPath) {
        let bounds = self.viewport_bounds();
        if bounds.contains(position) && !target.is_on_navbar() {
            self.hovered = true;
            let d = position - bounds.center();
            self.offset_x.set_target(d.x);
            self.offset_y.set_target(d.y);
        } else if self.hovered {
            self.pointer_left();
        }
    }

    fn pointer_left(&mut self) {
        self.hovered = false;
        self.offset_x.set_target(0.0);
        self.offset_y.set_target(0.0);
    }
}

impl Widget for TiltSurface {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn name(&self) -> &'static str {
        "tilt-surface"
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn mount(&mut self, ctx: &mut MountContext<'_>) {
        if self.lifecycle != Lifecycle::Created {
            return;
        }
        self.lifecycle = Lifecycle::Mounted;
        // Tilting would fight native scroll gestures on touch screens.
        self.enabled = !ctx.capabilities.touch;
        if self.enabled {
            ctx.bus.subscribe(self.id, EventMask::POINTER | EventMask::SCROLL);
        }
        tracing::debug!(id = %self.id, enabled = self.enabled, "tilt surface mounted");
    }

    fn handle_event(&mut self, event: &InputEvent, _ctx: &mut MountContext<'_>) {
        if !self.is_alive() || !self.enabled {
            return;
        }
        match event {
            InputEvent::PointerMoved { position, target } => self.pointer_moved(*position, target),
            InputEvent::PointerLeft => {
                if self.hovered {
                    self.pointer_left();
                }
            }
            InputEvent::Scrolled(metrics) => self.scroll_offset = metrics.offset,
            InputEvent::Resized(_) => {}
        }
    }

    fn frame(&mut self, dt: Duration) {
        if !self.is_alive() || !self.enabled {
            return;
        }
        self.offset_x.step(dt);
        self.offset_y.step(dt);
    }

    fn place(&mut self, bounds: Rect) {
        self.set_bounds(bounds);
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
        WidgetFrame::Tilt(TiltFrame {
            bounds: self.bounds,
            rotation: self.rotation(),
            content_depth: self.config.content_depth,
            hovered: self.hovered,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::ctx;
    use folio_clock::TimerQueue;
    use folio_common::Capabilities;
    use folio_input::{Element, ElementTag, EventBus, ScrollMetrics};

    const FRAME: Duration = Duration::from_micros(16_667);

    fn card() -> TiltSurface {
        TiltSurface::new(Rect::new(100.0, 100.0, 400.0, 300.0), TiltConfig::default()).unwrap()
    }

    fn mount(surface: &mut TiltSurface, capabilities: Capabilities) -> (EventBus, TimerQueue) {
        let mut bus = EventBus::new();
        let mut timers = TimerQueue::new();
        surface.mount(&mut MountContext {
            bus: &mut bus,
            timers: &mut timers,
            capabilities,
        });
        (bus, timers)
    }

    fn settle(surface: &mut TiltSurface) {
        for _ in 0..600 {
            surface.frame(FRAME);
        }
    }

    #[test]
    fn mapping_boundaries() {
        let s = card();
        assert_eq!(s.rotation_for(Vec2::new(0.0, -300.0)).x, 10.0);
        assert_eq!(s.rotation_for(Vec2::new(0.0, 300.0)).x, -10.0);
        assert_eq!(s.rotation_for(Vec2::ZERO), Rotation::default());
        assert_eq!(s.rotation_for(Vec2::new(-300.0, 0.0)).y, -10.0);
        assert_eq!(s.rotation_for(Vec2::new(300.0, 0.0)).y, 10.0);
    }

    #[test]
    fn mapping_clamps_beyond_domain() {
        let s = card();
        assert_eq!(s.rotation_for(Vec2::new(0.0, -900.0)).x, 10.0);
        assert_eq!(s.rotation_for(Vec2::new(0.0, 900.0)).x, -10.0);
        assert_eq!(s.rotation_for(Vec2::new(5000.0, 0.0)).y, 10.0);
    }

    #[test]
    fn pointer_offset_is_relative_to_center() {
        let mut s = card();
        let (mut bus, mut timers) = mount(&mut s, Capabilities::pointer());
        // Center is (300, 250).
        s.handle_event(
            &InputEvent::pointer_moved(450.0, 200.0, HitPath::empty()),
            &mut ctx(&mut bus, &mut timers),
        );
        assert!(s.is_hovered());
        assert_eq!(s.target_offset(), Vec2::new(150.0, -50.0));

        settle(&mut s);
        let r = s.rotation();
        assert!((r.y - 5.0).abs() < 1e-3);
        assert!((r.x - 10.0 / 6.0).abs() < 1e-3);
    }

    #[test]
    fn leave_resets_and_springs_back() {
        let mut s = card();
        let (mut bus, mut timers) = mount(&mut s, Capabilities::pointer());
        s.handle_event(
            &InputEvent::pointer_moved(110.0, 110.0, HitPath::empty()),
            &mut ctx(&mut bus, &mut timers),
        );
        for _ in 0..10 {
            s.frame(FRAME);
        }
        assert_ne!(s.rotation(), Rotation::default());

        s.handle_event(&InputEvent::PointerLeft, &mut ctx(&mut bus, &mut timers));
        assert_eq!(s.target_offset(), Vec2::ZERO);
        // Not instantaneous: the spring is still on its way back.
        assert_ne!(s.rotation(), Rotation::default());

        settle(&mut s);
        assert_eq!(s.rotation(), Rotation::default());
    }

    #[test]
    fn moving_off_the_card_counts_as_leave() {
        let mut s = card();
        let (mut bus, mut timers) = mount(&mut s, Capabilities::pointer());
        s.handle_event(
            &InputEvent::pointer_moved(480.0, 380.0, HitPath::empty()),
            &mut ctx(&mut bus, &mut timers),
        );
        s.handle_event(
            &InputEvent::pointer_moved(900.0, 900.0, HitPath::empty()),
            &mut ctx(&mut bus, &mut timers),
        );
        assert!(!s.is_hovered());
        assert_eq!(s.target_offset(), Vec2::ZERO);
    }

    #[test]
    fn scrolling_shifts_hit_area() {
        let mut s = card();
        let (mut bus, mut timers) = mount(&mut s, Capabilities::pointer());
        s.handle_event(
            &InputEvent::Scrolled(ScrollMetrics::new(100.0, 3000.0, 800.0)),
            &mut ctx(&mut bus, &mut timers),
        );
        assert_eq!(s.viewport_bounds().min, Vec2::new(100.0, 0.0));
        // Center on screen is now (300, 150).
        s.handle_event(
            &InputEvent::pointer_moved(300.0, 150.0, HitPath::empty()),
            &mut ctx(&mut bus, &mut timers),
        );
        assert!(s.is_hovered());
        assert_eq!(s.target_offset(), Vec2::ZERO);
    }

    #[test]
    fn navbar_covering_the_card_blocks_tilt() {
        let mut s = card();
        let (mut bus, mut timers) = mount(&mut s, Capabilities::pointer());
        let navbar = HitPath::new(vec![
            Element::new(ElementTag::Navbar),
            Element::new(ElementTag::Container),
        ]);
        s.handle_event(
            &InputEvent::pointer_moved(300.0, 120.0, navbar.clone()),
            &mut ctx(&mut bus, &mut timers),
        );
        assert!(!s.is_hovered());
        assert_eq!(s.target_offset(), Vec2::ZERO);

        // Sliding from the exposed part of the card up under the navbar leaves it.
        s.handle_event(
            &InputEvent::pointer_moved(300.0, 200.0, HitPath::empty()),
            &mut ctx(&mut bus, &mut timers),
        );
        assert!(s.is_hovered());
        s.handle_event(
            &InputEvent::pointer_moved(300.0, 120.0, navbar),
            &mut ctx(&mut bus, &mut timers),
        );
        assert!(!s.is_hovered());
        assert_eq!(s.target_offset(), Vec2::ZERO);
    }

    #[test]
    fn touch_device_never_tilts() {
        let mut s = card();
        let (mut bus, mut timers) = mount(&mut s, Capabilities::touch());
        assert!(!s.is_enabled());
        assert_eq!(bus.subscription_count(s.id()), 0);

        s.handle_event(
            &InputEvent::pointer_moved(110.0, 110.0, HitPath::empty()),
            &mut ctx(&mut bus, &mut timers),
        );
        settle(&mut s);
        assert_eq!(s.target_offset(), Vec2::ZERO);
        assert_eq!(s.rotation(), Rotation::default());
    }

    #[test]
    fn zero_offset_range_is_rejected() {
        let config = TiltConfig {
            max_offset: 0.0,
            ..TiltConfig::default()
        };
        assert!(matches!(
            TiltSurface::new(Rect::default(), config),
            Err(WidgetError::Motion(_))
        ));
    }
}
