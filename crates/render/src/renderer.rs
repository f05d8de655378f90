use std::fmt::Write;

use folio_page::PageFrame;
use folio_widgets::WidgetFrame;

/// View settings shared by all renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Distance (px) from the viewer to the z = 0 plane for 3D transforms.
    pub perspective: f32,
    /// Also emit widgets that have nothing to draw.
    pub show_hidden: bool,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            perspective: 1000.0,
            show_hidden: false,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads a page frame and a view configuration, then produces
/// output. Frames are detached snapshots, so rendering can never feed back
/// into the widgets.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, frame: &PageFrame, view: &RenderView) -> Self::Output;
}

/// Human-readable dump of a frame, for the CLI, logs and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &PageFrame, view: &RenderView) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Page Frame (t={:.3}s, scroll={:.0}/{:.0}) ===",
            frame.time.as_secs_f32(),
            frame.scroll_offset,
            frame.scroll_height
        );
        let _ = writeln!(
            out,
            "Viewport: {:.0}x{:.0}  Widgets: {} ({} hidden)",
            frame.viewport.width,
            frame.viewport.height,
            frame.widgets.len(),
            frame.hidden_count()
        );

        for w in &frame.widgets {
            let tag = w.id.short();
            match &w.frame {
                WidgetFrame::Hidden => {
                    if view.show_hidden {
                        let _ = writeln!(out, "  [{tag}] {} hidden", w.name);
                    }
                }
                WidgetFrame::Cursor(c) => {
                    let _ = writeln!(
                        out,
                        "  [{tag}] {} pointer=({:.1}, {:.1}) dot=({:.1}, {:.1})x{:.2} \
                         ring=({:.1}, {:.1})x{:.2}{}",
                        w.name,
                        c.pointer.position.x,
                        c.pointer.position.y,
                        c.dot.center().x,
                        c.dot.center().y,
                        c.dot.scale,
                        c.ring.center().x,
                        c.ring.center().y,
                        c.ring.scale,
                        if c.pointer.over_interactive { " hover" } else { "" }
                    );
                }
                WidgetFrame::Progress(p) => {
                    let _ = writeln!(
                        out,
                        "  [{tag}] {} raw={:.3} smoothed={:.3} width={:.1}",
                        w.name, p.raw, p.smoothed, p.bar_width
                    );
                }
                WidgetFrame::Tilt(t) => {
                    let _ = writeln!(
                        out,
                        "  [{tag}] {} at=({:.0}, {:.0}) rotate=({:.2}deg, {:.2}deg){}",
                        w.name,
                        t.bounds.min.x,
                        t.bounds.min.y,
                        t.rotation.x,
                        t.rotation.y,
                        if t.hovered { " hover" } else { "" }
                    );
                }
                WidgetFrame::Text(t) => {
                    let _ = writeln!(
                        out,
                        "  [{tag}] {} {:?} word={} phase={:?}",
                        w.name, t.text, t.word_index, t.phase
                    );
                }
                WidgetFrame::Reveal(r) => {
                    let _ = writeln!(
                        out,
                        "  [{tag}] {} at=({:.0}, {:.0}) opacity={:.2} y={:.1}",
                        w.name, r.bounds.min.x, r.bounds.min.y, r.opacity, r.offset_y
                    );
                }
            }
        }
        out
    }
}
