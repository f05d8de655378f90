use std::time::Duration;

use folio_common::{Viewport, WidgetId};
use folio_widgets::{CursorFrame, ProgressFrame, RevealFrame, TextFrame, TiltFrame, WidgetFrame};

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetSnapshot {
    pub id: WidgetId,
    pub name: &'static str,
    pub frame: WidgetFrame,
}

/// Everything a renderer needs for one frame. Plain data, detached from the shell.
#[derive(Debug, Clone, PartialEq)]
pub struct PageFrame {
    /// Shell clock at the time of the snapshot.
    pub time: Duration,
    pub viewport: Viewport,
    pub scroll_offset: f32,
    pub scroll_height: f32,
    pub widgets: Vec<WidgetSnapshot>,
}

impl PageFrame {
    pub fn cursor(&self) -> Option<&CursorFrame> {
        self.widgets.iter().find_map(|w| match &w.frame {
            WidgetFrame::Cursor(c) => Some(c),
            _ => None,
        })
    }

    pub fn progress(&self) -> Option<&ProgressFrame> {
        self.widgets.iter().find_map(|w| match &w.frame {
            WidgetFrame::Progress(p) => Some(p),
            _ => None,
        })
    }

    pub fn text(&self) -> Option<&TextFrame> {
        self.widgets.iter().find_map(|w| match &w.frame {
            WidgetFrame::Text(t) => Some(t),
            _ => None,
        })
    }

    pub fn tilts(&self) -> impl Iterator<Item = &TiltFrame> {
        self.widgets.iter().filter_map(|w| match &w.frame {
            WidgetFrame::Tilt(t) => Some(t),
            _ => None,
        })
    }

    pub fn reveals(&self) -> impl Iterator<Item = &RevealFrame> {
        self.widgets.iter().filter_map(|w| match &w.frame {
            WidgetFrame::Reveal(r) => Some(r),
            _ => None,
        })
    }

    /// Number of widgets with nothing to draw.
    pub fn hidden_count(&self) -> usize {
        self.widgets
            .iter()
            .filter(|w| w.frame == WidgetFrame::Hidden)
            .count()
    }
}
