//! Document layout: sections stacked top to bottom, a fixed navbar, and a
//! two-column card grid inside each section.

use folio_common::{Rect, Viewport};
use folio_input::{Element, ElementTag, HitPath};
use glam::Vec2;

use crate::config::{ActionKind, PageConfig};

pub const NAVBAR_HEIGHT: f32 = 80.0;
const CONTENT_WIDTH: f32 = 1100.0;
const SIDE_PADDING: f32 = 24.0;
const SECTION_PADDING: f32 = 96.0;
const LINE_HEIGHT: f32 = 48.0;
const GAP: f32 = 24.0;
const ACTION_SIZE: Vec2 = Vec2::new(160.0, 48.0);
const CARD_HEIGHT: f32 = 220.0;
const NAV_LINK_SIZE: Vec2 = Vec2::new(96.0, 32.0);

/// A labelled element with its bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Placed {
    pub label: String,
    pub bounds: Rect,
    pub element: Element,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionLayout {
    pub id: String,
    pub title: String,
    /// Document coordinates, like every rect in here.
    pub bounds: Rect,
    pub heading: Rect,
    /// Line holding the typewriter text, in the hero section only.
    pub typewriter: Option<Rect>,
    pub actions: Vec<Placed>,
    pub cards: Vec<Placed>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    viewport: Viewport,
    navbar: Rect,
    nav_links: Vec<Placed>,
    sections: Vec<SectionLayout>,
    scroll_height: f32,
}

impl PageLayout {
    pub fn new(config: &PageConfig, viewport: Viewport) -> Self {
        let width = viewport.width;
        let content_w = (width - 2.0 * SIDE_PADDING).min(CONTENT_WIDTH).max(1.0);
        let content_x = ((width - content_w) * 0.5).max(0.0);

        let navbar = Rect::new(0.0, 0.0, width, NAVBAR_HEIGHT);
        let link_y = (NAVBAR_HEIGHT - NAV_LINK_SIZE.y) * 0.5;
        let links_w = config.nav.len() as f32 * (NAV_LINK_SIZE.x + 8.0);
        let mut link_x = (width - SIDE_PADDING - links_w).max(0.0);
        let nav_links = config
            .nav
            .iter()
            .map(|link| {
                let bounds = Rect::new(link_x, link_y, NAV_LINK_SIZE.x, NAV_LINK_SIZE.y);
                link_x += NAV_LINK_SIZE.x + 8.0;
                Placed {
                    label: link.label.clone(),
                    bounds,
                    element: Element::clickable(ElementTag::Anchor),
                }
            })
            .collect();

        let mut top = 0.0;
        let mut sections = Vec::with_capacity(config.sections.len());
        for section in &config.sections {
            let heading = Rect::new(content_x, top + SECTION_PADDING, content_w, LINE_HEIGHT);
            let mut cursor = heading.max().y + GAP;

            let typewriter = section.hero.then(|| {
                let line = Rect::new(content_x, cursor, content_w, LINE_HEIGHT);
                cursor = line.max().y + GAP;
                line
            });

            let actions: Vec<Placed> = section
                .actions
                .iter()
                .enumerate()
                .map(|(i, action)| {
                    let x = content_x + i as f32 * (ACTION_SIZE.x + 16.0);
                    let tag = match action.kind {
                        ActionKind::Link => ElementTag::Anchor,
                        ActionKind::Button => ElementTag::Button,
                    };
                    Placed {
                        label: action.label.clone(),
                        bounds: Rect::new(x, cursor, ACTION_SIZE.x, ACTION_SIZE.y),
                        element: Element::clickable(tag),
                    }
                })
                .collect();
            if !actions.is_empty() {
                cursor += ACTION_SIZE.y + GAP;
            }

            let col_w = ((content_w - GAP) * 0.5).max(1.0);
            let cards: Vec<Placed> = section
                .cards
                .iter()
                .enumerate()
                .map(|(i, card)| {
                    let (col, row) = ((i % 2) as f32, (i / 2) as f32);
                    let bounds = Rect::new(
                        content_x + col * (col_w + GAP),
                        cursor + row * (CARD_HEIGHT + GAP),
                        col_w,
                        CARD_HEIGHT,
                    );
                    let element = if card.clickable {
                        Element::clickable(ElementTag::Card)
                    } else {
                        Element::new(ElementTag::Card)
                    };
                    Placed {
                        label: card.title.clone(),
                        bounds,
                        element,
                    }
                })
                .collect();
            if let Some(last) = cards.last() {
                cursor = last.bounds.max().y;
            }

            let height = section.height.max(cursor + SECTION_PADDING - top);
            sections.push(SectionLayout {
                id: section.id.clone(),
                title: section.title.clone(),
                bounds: Rect::new(0.0, top, width, height),
                heading,
                typewriter,
                actions,
                cards,
            });
            top += height;
        }

        Self {
            viewport,
            navbar,
            nav_links,
            sections,
            scroll_height: top,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Fixed to the top of the viewport; viewport coordinates.
    pub fn navbar(&self) -> Rect {
        self.navbar
    }

    pub fn nav_links(&self) -> &[Placed] {
        &self.nav_links
    }

    pub fn sections(&self) -> &[SectionLayout] {
        &self.sections
    }

    pub fn section(&self, id: &str) -> Option<&SectionLayout> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Total document height.
    pub fn scroll_height(&self) -> f32 {
        self.scroll_height
    }

    /// Largest valid scroll offset.
    pub fn max_scroll(&self) -> f32 {
        (self.scroll_height - self.viewport.height).max(0.0)
    }

    /// The typewriter line, if any section is a hero.
    pub fn typewriter(&self) -> Option<Rect> {
        self.sections.iter().find_map(|s| s.typewriter)
    }

    /// Element path under a viewport point, target first, page root last.
    pub fn hit_test(&self, point: Vec2, scroll_offset: f32) -> HitPath {
        let root = Element::new(ElementTag::Container);
        if self.navbar.contains(point) {
            let nav = Element::new(ElementTag::Navbar);
            return match self.nav_links.iter().find(|l| l.bounds.contains(point)) {
                Some(link) => HitPath::new(vec![link.element, nav, root]),
                None => HitPath::new(vec![nav, root]),
            };
        }

        let doc = point + Vec2::new(0.0, scroll_offset);
        let Some(section) = self.sections.iter().find(|s| s.bounds.contains(doc)) else {
            return HitPath::new(vec![root]);
        };
        let section_el = Element::new(ElementTag::Section);
        let target = section
            .actions
            .iter()
            .chain(&section.cards)
            .find(|p| p.bounds.contains(doc))
            .map(|p| p.element)
            .or_else(|| {
                let on_text = section.heading.contains(doc)
                    || section.typewriter.is_some_and(|t| t.contains(doc));
                on_text.then(|| Element::new(ElementTag::Text))
            });
        match target {
            Some(el) => HitPath::new(vec![el, section_el, root]),
            None => HitPath::new(vec![section_el, root]),
        }
    }
}
