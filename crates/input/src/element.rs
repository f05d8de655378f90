/// Kind of element a pointer event can land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementTag {
    /// In-page navigation link.
    Anchor,
    Button,
    Section,
    Card,
    Text,
    /// Fixed chrome drawn above the scrolling page.
    Navbar,
    /// Generic wrapper, including the page root.
    Container,
}

/// One element on the path from an event target to the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Element {
    pub tag: ElementTag,
    /// Explicitly flagged as clickable regardless of its tag.
    pub clickable: bool,
}

impl Element {
    pub fn new(tag: ElementTag) -> Self {
        Self {
            tag,
            clickable: false,
        }
    }

    pub fn clickable(tag: ElementTag) -> Self {
        Self {
            tag,
            clickable: true,
        }
    }

    /// Links, buttons and anything flagged clickable.
    pub fn is_interactive(&self) -> bool {
        self.clickable || matches!(self.tag, ElementTag::Anchor | ElementTag::Button)
    }
}

/// Elements from the event target (first) up to the root (last).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HitPath(Vec<Element>);

impl HitPath {
    /// Path from a target-first list of elements.
    pub fn new(elements: Vec<Element>) -> Self {
        Self(elements)
    }

    /// Empty path: the pointer is over nothing the page knows about.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn target(&self) -> Option<&Element> {
        self.0.first()
    }

    pub fn elements(&self) -> &[Element] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if the target or any of its ancestors is interactive.
    pub fn is_interactive(&self) -> bool {
        self.0.iter().any(Element::is_interactive)
    }

    pub fn contains(&self, tag: ElementTag) -> bool {
        self.0.iter().any(|e| e.tag == tag)
    }

    /// True if the pointer is on fixed chrome, which covers everything that
    /// scrolls beneath it.
    pub fn is_on_navbar(&self) -> bool {
        self.contains(ElementTag::Navbar)
    }
}
