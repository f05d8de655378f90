use std::time::Duration;

use folio_clock::TimerQueue;
use folio_common::{Capabilities, Rect, Viewport, WidgetId};
use folio_input::{EventBus, InputEvent, ScrollMetrics};
use folio_widgets::{
    MountContext, PointerTracker, RevealOnView, RevealTrigger, ScrollProgressIndicator,
    TextCycler, TiltSurface, Widget,
};
use glam::Vec2;

use crate::PageError;
use crate::config::PageConfig;
use crate::frame::{PageFrame, WidgetSnapshot};
use crate::layout::PageLayout;

/// Which layout element a widget is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    /// Covers the whole viewport; no document bounds.
    Screen,
    Navbar,
    Heading(usize),
    Typewriter,
    Card { section: usize, card: usize },
}

impl Anchor {
    fn bounds(self, layout: &PageLayout) -> Option<Rect> {
        match self {
            Self::Screen => None,
            Self::Navbar => Some(layout.navbar()),
            Self::Heading(s) => layout.sections().get(s).map(|s| s.heading),
            Self::Typewriter => layout.typewriter(),
            Self::Card { section, card } => layout
                .sections()
                .get(section)
                .and_then(|s| s.cards.get(card))
                .map(|c| c.bounds),
        }
    }
}

struct Slot {
    widget: Box<dyn Widget>,
    anchor: Anchor,
}

/// Hosts every widget of the page and feeds them host input.
///
/// The shell owns the event bus and the timer queue. Events go only to the
/// widgets subscribed to their kind; fired timers go only to their owner.
pub struct PageShell {
    config: PageConfig,
    layout: PageLayout,
    capabilities: Capabilities,
    bus: EventBus,
    timers: TimerQueue,
    widgets: Vec<Slot>,
    scroll_offset: f32,
    mounted: bool,
    /// Set by `teardown`; disposed widgets never mount again.
    torn_down: bool,
    cursor: WidgetId,
    progress: WidgetId,
    text: WidgetId,
    tilts: Vec<WidgetId>,
}

impl PageShell {
    /// Build every widget for `config`. Nothing listens to input until `mount`.
    pub fn new(config: PageConfig) -> Result<Self, PageError> {
        config.validate()?;
        let viewport = config.viewport;
        let layout = PageLayout::new(&config, viewport);
        let mut widgets: Vec<Slot> = Vec::new();
        let mut push = |widget: Box<dyn Widget>, anchor: Anchor| {
            let id = widget.id();
            widgets.push(Slot { widget, anchor });
            id
        };

        let progress = push(
            Box::new(ScrollProgressIndicator::new(config.springs.scroll_bar, viewport)),
            Anchor::Screen,
        );
        push(
            Box::new(RevealOnView::new(
                layout.navbar(),
                RevealTrigger::Mount,
                config.navbar_reveal_config(),
            )),
            Anchor::Navbar,
        );
        let text = push(
            Box::new(TextCycler::new(
                config.typewriter.words.clone(),
                config.typewriter_timing(),
            )?),
            Anchor::Typewriter,
        );

        let mut tilts = Vec::new();
        for (s, section) in layout.sections().iter().enumerate() {
            push(
                Box::new(RevealOnView::new(
                    section.heading,
                    RevealTrigger::InView,
                    config.reveal_config(0),
                )),
                Anchor::Heading(s),
            );
            for (c, card) in section.cards.iter().enumerate() {
                let anchor = Anchor::Card { section: s, card: c };
                tilts.push(push(
                    Box::new(TiltSurface::new(card.bounds, config.tilt_config())?),
                    anchor,
                ));
                push(
                    Box::new(RevealOnView::new(
                        card.bounds,
                        RevealTrigger::InView,
                        config.reveal_config(c),
                    )),
                    anchor,
                );
            }
        }

        // Last, so it draws above everything else.
        let cursor = push(
            Box::new(PointerTracker::new(config.pointer_config())),
            Anchor::Screen,
        );

        Ok(Self {
            capabilities: config.capabilities(),
            config,
            layout,
            bus: EventBus::new(),
            timers: TimerQueue::new(),
            widgets,
            scroll_offset: 0.0,
            mounted: false,
            torn_down: false,
            cursor,
            progress,
            text,
            tilts,
        })
    }

    /// Override the detected capabilities. Only effective before `mount`.
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        if !self.mounted {
            self.capabilities = capabilities;
        }
        self
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn viewport(&self) -> Viewport {
        self.layout.viewport()
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn cursor_id(&self) -> WidgetId {
        self.cursor
    }

    pub fn progress_id(&self) -> WidgetId {
        self.progress
    }

    pub fn text_id(&self) -> WidgetId {
        self.text
    }

    pub fn tilt_ids(&self) -> &[WidgetId] {
        &self.tilts
    }

    pub fn widget(&self, id: WidgetId) -> Option<&dyn Widget> {
        self.widgets
            .iter()
            .find(|s| s.widget.id() == id)
            .map(|s| s.widget.as_ref())
    }

    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    /// Mount every widget with the detected capabilities, then tell them where
    /// the page is scrolled to. A torn-down shell stays down; build a new one.
    pub fn mount(&mut self) {
        if self.mounted || self.torn_down {
            return;
        }
        let _span = tracing::info_span!("page_mount", touch = self.capabilities.touch).entered();
        let mut ctx = MountContext {
            bus: &mut self.bus,
            timers: &mut self.timers,
            capabilities: self.capabilities,
        };
        for slot in &mut self.widgets {
            slot.widget.mount(&mut ctx);
        }
        self.mounted = true;
        tracing::info!(
            widgets = self.widgets.len(),
            subscriptions = self.bus.len(),
            timers = self.timers.pending(),
            "page mounted"
        );
        self.dispatch(InputEvent::Scrolled(self.metrics()));
    }

    pub fn pointer_moved(&mut self, position: Vec2) {
        let target = self.layout.hit_test(position, self.scroll_offset);
        self.dispatch(InputEvent::PointerMoved { position, target });
    }

    pub fn pointer_left(&mut self) {
        self.dispatch(InputEvent::PointerLeft);
    }

    /// Scroll to `offset`, clamped to the scrollable extent. Returns the
    /// offset actually applied.
    pub fn scroll_to(&mut self, offset: f32) -> f32 {
        let clamped = if offset.is_finite() {
            offset.clamp(0.0, self.layout.max_scroll())
        } else {
            self.scroll_offset
        };
        if clamped != self.scroll_offset {
            self.scroll_offset = clamped;
            self.dispatch(InputEvent::Scrolled(self.metrics()));
        }
        self.scroll_offset
    }

    pub fn scroll_by(&mut self, delta: f32) -> f32 {
        self.scroll_to(self.scroll_offset + delta)
    }

    /// Scroll so the section with `id` starts at the top of the viewport.
    pub fn scroll_to_section(&mut self, id: &str) -> Option<f32> {
        let top = self.layout.section(id)?.bounds.min.y;
        Some(self.scroll_to(top))
    }

    /// Lay the page out again for a new viewport size.
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport == self.layout.viewport() || !(viewport.width > 0.0 && viewport.height > 0.0) {
            return;
        }
        self.layout = PageLayout::new(&self.config, viewport);
        for slot in &mut self.widgets {
            if let Some(bounds) = slot.anchor.bounds(&self.layout) {
                slot.widget.place(bounds);
            }
        }
        tracing::debug!(width = viewport.width, height = viewport.height, "page relayout");
        self.dispatch(InputEvent::Resized(viewport));
        self.scroll_offset = self.scroll_offset.clamp(0.0, self.layout.max_scroll());
        self.dispatch(InputEvent::Scrolled(self.metrics()));
    }

    /// Fire timers that come due within `dt`, then step every widget one frame.
    /// Returns how many timers fired.
    pub fn advance(&mut self, dt: Duration) -> usize {
        let _span = tracing::info_span!("page_advance").entered();
        let widgets = &mut self.widgets;
        let fired = self.timers.advance(dt, |timers, timer| {
            if let Some(slot) = widgets.iter_mut().find(|s| s.widget.id() == timer.owner) {
                slot.widget.on_timer(timer.id, timers);
            }
        });
        for slot in &mut self.widgets {
            slot.widget.frame(dt);
        }
        if fired > 0 {
            tracing::trace!(fired, now = ?self.timers.now(), "timers fired");
        }
        fired
    }

    /// Dispose one widget. Returns false if it is unknown or already disposed.
    pub fn dispose_widget(&mut self, id: WidgetId) -> bool {
        let Some(slot) = self.widgets.iter_mut().find(|s| s.widget.id() == id) else {
            return false;
        };
        if !slot.widget.is_alive() {
            return false;
        }
        let mut ctx = MountContext {
            bus: &mut self.bus,
            timers: &mut self.timers,
            capabilities: self.capabilities,
        };
        slot.widget.dispose(&mut ctx);
        tracing::debug!(%id, name = slot.widget.name(), "widget disposed");
        true
    }

    /// Dispose every widget, revoking all subscriptions and timers.
    pub fn teardown(&mut self) {
        let _span = tracing::info_span!("page_teardown").entered();
        let mut ctx = MountContext {
            bus: &mut self.bus,
            timers: &mut self.timers,
            capabilities: self.capabilities,
        };
        for slot in &mut self.widgets {
            slot.widget.dispose(&mut ctx);
        }
        self.mounted = false;
        self.torn_down = true;
        tracing::info!(
            subscriptions = self.bus.len(),
            timers = self.timers.pending(),
            "page torn down"
        );
    }

    pub fn frame(&self) -> PageFrame {
        PageFrame {
            time: self.timers.now(),
            viewport: self.layout.viewport(),
            scroll_offset: self.scroll_offset,
            scroll_height: self.layout.scroll_height(),
            widgets: self
                .widgets
                .iter()
                .map(|s| WidgetSnapshot {
                    id: s.widget.id(),
                    name: s.widget.name(),
                    frame: s.widget.snapshot(),
                })
                .collect(),
        }
    }

    fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics::new(
            self.scroll_offset,
            self.layout.scroll_height(),
            self.layout.viewport().height,
        )
    }

    fn dispatch(&mut self, event: InputEvent) {
        let mut ctx = MountContext {
            bus: &mut self.bus,
            timers: &mut self.timers,
            capabilities: self.capabilities,
        };
        for id in ctx.bus.subscribers(event.kind()) {
            if let Some(slot) = self.widgets.iter_mut().find(|s| s.widget.id() == id) {
                slot.widget.handle_event(&event, &mut ctx);
            }
        }
    }
}
