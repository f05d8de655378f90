use std::fmt;

use folio_page::PageFrame;
use folio_widgets::WidgetFrame;

use crate::renderer::{RenderView, Renderer};

/// One CSS rule: a selector and its declarations, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct CssRule {
    pub selector: String,
    pub declarations: Vec<(&'static str, String)>,
}

impl CssRule {
    fn new(selector: String) -> Self {
        Self {
            selector,
            declarations: Vec::new(),
        }
    }

    fn decl(mut self, property: &'static str, value: String) -> Self {
        self.declarations.push((property, value));
        self
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for CssRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.selector)?;
        for (property, value) in &self.declarations {
            write!(f, " {property}: {value};")?;
        }
        write!(f, " }}")
    }
}

/// Emits the inline styles a browser host would apply to each widget element.
#[derive(Debug, Default)]
pub struct CssRenderer;

impl CssRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for CssRenderer {
    type Output = Vec<CssRule>;

    fn render(&self, frame: &PageFrame, view: &RenderView) -> Vec<CssRule> {
        let mut rules = Vec::new();
        for w in &frame.widgets {
            let sel = format!("#{}-{}", w.name, w.id.short());
            match &w.frame {
                WidgetFrame::Hidden => {
                    if view.show_hidden {
                        rules.push(CssRule::new(sel).decl("display", "none".into()));
                    }
                }
                WidgetFrame::Cursor(c) => {
                    for (part, layer) in [("dot", c.dot), ("ring", c.ring)] {
                        rules.push(CssRule::new(format!("{sel} .{part}")).decl(
                            "transform",
                            format!(
                                "translate({:.2}px, {:.2}px) scale({:.3})",
                                layer.offset.x, layer.offset.y, layer.scale
                            ),
                        ));
                    }
                }
                WidgetFrame::Progress(p) => {
                    rules.push(
                        CssRule::new(sel)
                            .decl("transform", format!("scaleX({:.4})", p.smoothed))
                            .decl("transform-origin", "0%".into()),
                    );
                }
                WidgetFrame::Tilt(t) => {
                    rules.push(
                        CssRule::new(sel.clone())
                            .decl(
                                "transform",
                                format!(
                                    "perspective({:.0}px) rotateX({:.3}deg) rotateY({:.3}deg)",
                                    view.perspective, t.rotation.x, t.rotation.y
                                ),
                            )
                            .decl("transform-style", "preserve-3d".into()),
                    );
                    rules.push(
                        CssRule::new(format!("{sel} > .content"))
                            .decl("transform", format!("translateZ({:.0}px)", t.content_depth)),
                    );
                }
                WidgetFrame::Text(t) => {
                    let content = format!("{:?}", t.text);
                    rules.push(CssRule::new(format!("{sel}::before")).decl("content", content));
                }
                WidgetFrame::Reveal(r) => {
                    rules.push(
                        CssRule::new(sel)
                            .decl("opacity", format!("{:.3}", r.opacity))
                            .decl("transform", format!("translateY({:.2}px)", r.offset_y)),
                    );
                }
            }
        }
        tracing::trace!(rules = rules.len(), "css frame");
        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_page::{PageConfig, PageShell};
    use glam::Vec2;
    use std::time::Duration;

    fn rules_for(shell: &PageShell, name: &str) -> Vec<CssRule> {
        CssRenderer::new()
            .render(&shell.frame(), &RenderView::default())
            .into_iter()
            .filter(|r| r.selector.starts_with(&format!("#{name}-")))
            .collect()
    }

    #[test]
    fn rule_display() {
        let rule = CssRule::new("#bar".into())
            .decl("transform", "scaleX(0.5)".into())
            .decl("opacity", "1".into());
        assert_eq!(rule.to_string(), "#bar { transform: scaleX(0.5); opacity: 1; }");
        assert_eq!(rule.get("opacity"), Some("1"));
        assert_eq!(rule.get("color"), None);
    }

    #[test]
    fn tilt_rules_carry_perspective_and_depth() {
        let mut shell = PageShell::new(PageConfig::default()).unwrap();
        shell.mount();
        let rules = rules_for(&shell, "tilt-surface");
        assert!(!rules.is_empty());
        assert_eq!(
            rules[0].get("transform"),
            Some("perspective(1000px) rotateX(0.000deg) rotateY(0.000deg)")
        );
        assert_eq!(rules[1].get("transform"), Some("translateZ(20px)"));
    }

    #[test]
    fn cursor_and_progress_rules() {
        let mut shell = PageShell::new(PageConfig::default()).unwrap();
        shell.mount();
        assert!(rules_for(&shell, "pointer-tracker").is_empty());

        shell.pointer_moved(Vec2::new(108.0, 208.0));
        shell.advance(Duration::from_millis(16));
        let cursor = rules_for(&shell, "pointer-tracker");
        assert_eq!(cursor.len(), 2);
        assert_eq!(
            cursor[0].get("transform"),
            Some("translate(100.00px, 200.00px) scale(1.000)")
        );

        let bar = rules_for(&shell, "scroll-progress");
        assert_eq!(bar[0].get("transform"), Some("scaleX(0.0000)"));
        assert_eq!(bar[0].get("transform-origin"), Some("0%"));
    }

    #[test]
    fn text_rule_quotes_content() {
        let mut shell = PageShell::new(PageConfig::default()).unwrap();
        shell.mount();
        shell.advance(Duration::from_millis(300));
        let text = rules_for(&shell, "text-cycler");
        assert_eq!(text[0].get("content"), Some("\"We\""));
    }
}
