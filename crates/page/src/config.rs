//! Page configuration, loadable from YAML or JSON.

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use folio_common::{Capabilities, Viewport};
use folio_motion::{Easing, MotionError, SpringConfig};
use folio_widgets::{PointerTrackerConfig, RevealConfig, TiltConfig, TypewriterTiming};
use serde::{Deserialize, Serialize};

/// Longest allowed gap between staggered reveals.
pub const MAX_STAGGER_MS: u64 = 10_000;

/// Errors from loading or validating a page configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported config format {0:?} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),
    #[error("typewriter needs at least one word")]
    EmptyWords,
    #[error("typewriter {0} delay must be non-zero")]
    ZeroDelay(&'static str),
    #[error("viewport {width}x{height} must be positive")]
    InvalidViewport { width: f32, height: f32 },
    #[error("section {id:?} has non-positive height {height}")]
    InvalidHeight { id: String, height: f32 },
    #[error("duplicate section id {0:?}")]
    DuplicateSection(String),
    #[error("nav link {label:?} points at unknown section {target:?}")]
    UnknownLinkTarget { label: String, target: String },
    #[error("reveal stagger {0}ms exceeds {MAX_STAGGER_MS}ms")]
    InvalidStagger(u64),
    #[error("cursor {layer} hover scale must be finite and positive, got {scale}")]
    InvalidHoverScale { layer: &'static str, scale: f32 },
    #[error("tilt range must be positive, got offset {max_offset} and angle {max_angle}")]
    InvalidTilt { max_offset: f32, max_angle: f32 },
    #[error("{preset} spring: {source}")]
    Spring {
        preset: &'static str,
        #[source]
        source: MotionError,
    },
}

/// Spring parameters for every smoothed value on the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringPresets {
    pub cursor_dot: SpringConfig,
    pub cursor_ring: SpringConfig,
    pub scroll_bar: SpringConfig,
    pub tilt: SpringConfig,
}

impl Default for SpringPresets {
    fn default() -> Self {
        Self {
            cursor_dot: SpringConfig::cursor_dot(),
            cursor_ring: SpringConfig::cursor_ring(),
            scroll_bar: SpringConfig::scroll_bar(),
            tilt: SpringConfig::tilt(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypewriterConfig {
    pub words: Vec<String>,
    pub typing_ms: u64,
    pub deleting_ms: u64,
    pub pause_ms: u64,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            words: ["Websites", "Applications", "Experiences", "Solutions"]
                .into_iter()
                .map(String::from)
                .collect(),
            typing_ms: 150,
            deleting_ms: 100,
            pause_ms: 1500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    pub ring_delay_ms: u64,
    pub dot_hover_scale: f32,
    pub ring_hover_scale: f32,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            ring_delay_ms: 50,
            dot_hover_scale: 2.5,
            ring_hover_scale: 1.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiltSettings {
    pub max_offset: f32,
    pub max_angle: f32,
    pub content_depth: f32,
}

impl Default for TiltSettings {
    fn default() -> Self {
        Self {
            max_offset: 300.0,
            max_angle: 10.0,
            content_depth: 20.0,
        }
    }
}

/// Entrance animations for sections, cards and the navbar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealSettings {
    pub offset_y: f32,
    pub duration_ms: u64,
    /// Extra delay per card within a grid.
    pub stagger_ms: u64,
    pub easing: Easing,
    pub navbar_offset_y: f32,
    pub navbar_duration_ms: u64,
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            offset_y: 20.0,
            duration_ms: 500,
            stagger_ms: 100,
            easing: Easing::EaseOut,
            navbar_offset_y: -80.0,
            navbar_duration_ms: 800,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    #[default]
    Link,
    Button,
}

/// A link or button inside a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionConfig {
    pub label: String,
    #[serde(default)]
    pub kind: ActionKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardConfig {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default = "default_true")]
    pub clickable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionConfig {
    pub id: String,
    pub title: String,
    /// Minimum height; grows to fit the card grid.
    pub height: f32,
    /// The hero section hosts the typewriter.
    #[serde(default)]
    pub hero: bool,
    #[serde(default)]
    pub actions: Vec<ActionConfig>,
    #[serde(default)]
    pub cards: Vec<CardConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavLink {
    pub label: String,
    /// Id of the section the link scrolls to.
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub viewport: Viewport,
    pub touch: bool,
    pub typewriter: TypewriterConfig,
    pub springs: SpringPresets,
    pub cursor: CursorConfig,
    pub tilt: TiltSettings,
    pub reveal: RevealSettings,
    pub nav: Vec<NavLink>,
    pub sections: Vec<SectionConfig>,
}

fn default_true() -> bool {
    true
}

fn card(title: &str, body: &str) -> CardConfig {
    CardConfig {
        title: title.into(),
        body: body.into(),
        clickable: true,
    }
}

fn action(label: &str, kind: ActionKind) -> ActionConfig {
    ActionConfig {
        label: label.into(),
        kind,
    }
}

fn section(id: &str, title: &str, height: f32) -> SectionConfig {
    SectionConfig {
        id: id.into(),
        title: title.into(),
        height,
        hero: false,
        actions: Vec::new(),
        cards: Vec::new(),
    }
}

impl Default for PageConfig {
    /// The stock portfolio page.
    fn default() -> Self {
        let nav = [
            ("About", "about"),
            ("Services", "services"),
            ("Projects", "projects"),
            ("Contact", "contact"),
        ]
        .into_iter()
        .map(|(label, target)| NavLink {
            label: label.into(),
            target: target.into(),
        })
        .collect();

        let sections = vec![
            SectionConfig {
                hero: true,
                actions: vec![
                    action("View Services", ActionKind::Link),
                    action("See Projects", ActionKind::Link),
                ],
                ..section("hero", "I build digital", 900.0)
            },
            section("why", "Why Work With Me?", 600.0),
            section("about", "About Me", 700.0),
            section("education", "Education", 500.0),
            SectionConfig {
                cards: vec![
                    card("Portfolio Websites", "Personal branding sites for creatives."),
                    card("Business Websites", "Professional corporate websites."),
                    card("E-Commerce Stores", "Custom online stores with cart."),
                    card("Web Applications", "Interactive dashboards & tools."),
                    card("College Projects", "Helping students build academic projects."),
                ],
                ..section("services", "What I Can Build", 900.0)
            },
            SectionConfig {
                cards: vec![
                    card("Pathfinding Visualizer", "Graph search, step by step."),
                    card("ResuScan AI", "Resume screening assistant."),
                    card("Premium Portfolio V2", "This very site."),
                ],
                ..section("projects", "Featured Projects", 900.0)
            },
            section("skills", "Technical Arsenal", 600.0),
            section("journey", "Development Journey", 700.0),
            SectionConfig {
                actions: vec![
                    action("Email Me", ActionKind::Link),
                    action("Copy Email", ActionKind::Button),
                ],
                ..section("contact", "Ready to start a project?", 600.0)
            },
        ];

        Self {
            viewport: Viewport::default(),
            touch: false,
            typewriter: TypewriterConfig::default(),
            springs: SpringPresets::default(),
            cursor: CursorConfig::default(),
            tilt: TiltSettings::default(),
            reveal: RevealSettings::default(),
            nav,
            sections,
        }
    }
}

enum Format {
    Yaml,
    Json,
}

fn format_of(path: &Path) -> Result<Format, ConfigError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        "yaml" | "yml" => Ok(Format::Yaml),
        "json" => Ok(Format::Json),
        _ => Err(ConfigError::UnsupportedFormat(ext)),
    }
}

impl PageConfig {
    /// Load and validate a config; the format follows the file extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)?;
        let config: Self = match format {
            Format::Yaml => serde_yaml::from_str(&content)?,
            Format::Json => serde_json::from_str(&content)?,
        };
        config.validate()?;
        tracing::debug!(path = %path.display(), sections = config.sections.len(), "config loaded");
        Ok(config)
    }

    /// Write the config; the format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = match format_of(path)? {
            Format::Yaml => serde_yaml::to_string(self)?,
            Format::Json => serde_json::to_string_pretty(self)?,
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Viewport { width, height } = self.viewport;
        if !(width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidViewport { width, height });
        }
        if self.typewriter.words.is_empty() {
            return Err(ConfigError::EmptyWords);
        }
        for (name, ms) in [
            ("typing", self.typewriter.typing_ms),
            ("deleting", self.typewriter.deleting_ms),
            ("pause", self.typewriter.pause_ms),
        ] {
            if ms == 0 {
                return Err(ConfigError::ZeroDelay(name));
            }
        }
        for (preset, spring) in [
            ("cursor_dot", self.springs.cursor_dot),
            ("cursor_ring", self.springs.cursor_ring),
            ("scroll_bar", self.springs.scroll_bar),
            ("tilt", self.springs.tilt),
        ] {
            spring
                .validate()
                .map_err(|source| ConfigError::Spring { preset, source })?;
        }
        let TiltSettings {
            max_offset,
            max_angle,
            ..
        } = self.tilt;
        if !(max_offset > 0.0 && max_angle > 0.0) {
            return Err(ConfigError::InvalidTilt {
                max_offset,
                max_angle,
            });
        }

        for (layer, scale) in [
            ("dot", self.cursor.dot_hover_scale),
            ("ring", self.cursor.ring_hover_scale),
        ] {
            if !(scale.is_finite() && scale > 0.0) {
                return Err(ConfigError::InvalidHoverScale { layer, scale });
            }
        }
        if self.reveal.stagger_ms > MAX_STAGGER_MS {
            return Err(ConfigError::InvalidStagger(self.reveal.stagger_ms));
        }

        let mut ids = BTreeSet::new();
        for section in &self.sections {
            if !(section.height > 0.0) {
                return Err(ConfigError::InvalidHeight {
                    id: section.id.clone(),
                    height: section.height,
                });
            }
            if !ids.insert(section.id.as_str()) {
                return Err(ConfigError::DuplicateSection(section.id.clone()));
            }
        }
        for link in &self.nav {
            if !ids.contains(link.target.as_str()) {
                return Err(ConfigError::UnknownLinkTarget {
                    label: link.label.clone(),
                    target: link.target.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities { touch: self.touch }
    }

    pub fn typewriter_timing(&self) -> TypewriterTiming {
        TypewriterTiming {
            typing: Duration::from_millis(self.typewriter.typing_ms),
            deleting: Duration::from_millis(self.typewriter.deleting_ms),
            pause: Duration::from_millis(self.typewriter.pause_ms),
        }
    }

    pub fn pointer_config(&self) -> PointerTrackerConfig {
        PointerTrackerConfig {
            dot: self.springs.cursor_dot,
            ring: self.springs.cursor_ring,
            ring_delay: Duration::from_millis(self.cursor.ring_delay_ms),
            dot_hover_scale: self.cursor.dot_hover_scale,
            ring_hover_scale: self.cursor.ring_hover_scale,
        }
    }

    pub fn tilt_config(&self) -> TiltConfig {
        TiltConfig {
            spring: self.springs.tilt,
            max_offset: self.tilt.max_offset,
            max_angle: self.tilt.max_angle,
            content_depth: self.tilt.content_depth,
        }
    }

    /// Reveal for the `index`-th element of a staggered group.
    pub fn reveal_config(&self, index: usize) -> RevealConfig {
        RevealConfig {
            from_offset_y: self.reveal.offset_y,
            duration: Duration::from_millis(self.reveal.duration_ms),
            delay: Duration::from_millis(self.reveal.stagger_ms.saturating_mul(index as u64)),
            easing: self.reveal.easing,
        }
    }

    pub fn navbar_reveal_config(&self) -> RevealConfig {
        RevealConfig {
            from_offset_y: self.reveal.navbar_offset_y,
            duration: Duration::from_millis(self.reveal.navbar_duration_ms),
            delay: Duration::ZERO,
            easing: self.reveal.easing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PageConfig::default();
        config.validate().unwrap();
        assert_eq!(config.typewriter.words[0], "Websites");
        assert_eq!(config.sections.iter().filter(|s| s.hero).count(), 1);
        assert_eq!(config.typewriter_timing(), TypewriterTiming::default());
        assert_eq!(config.pointer_config(), PointerTrackerConfig::default());
        assert_eq!(config.tilt_config(), TiltConfig::default());
    }

    #[test]
    fn staggered_reveal_delay() {
        let config = PageConfig::default();
        assert_eq!(config.reveal_config(0).delay, Duration::ZERO);
        assert_eq!(config.reveal_config(3).delay, Duration::from_millis(300));
    }

    #[test]
    fn rejects_empty_words() {
        let mut config = PageConfig::default();
        config.typewriter.words.clear();
        assert!(matches!(config.validate(), Err(ConfigError::EmptyWords)));
    }

    #[test]
    fn rejects_duplicate_sections() {
        let mut config = PageConfig::default();
        let dup = config.sections[1].clone();
        config.sections.push(dup);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateSection(id)) if id == "why"
        ));
    }

    #[test]
    fn rejects_non_positive_height() {
        let mut config = PageConfig::default();
        config.sections[2].height = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidHeight { .. })
        ));
    }

    #[test]
    fn rejects_dangling_nav_link() {
        let mut config = PageConfig::default();
        config.sections.retain(|s| s.id != "contact");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownLinkTarget { target, .. }) if target == "contact"
        ));
    }

    #[test]
    fn rejects_bad_spring() {
        let mut config = PageConfig::default();
        config.springs.tilt.stiffness = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Spring { preset: "tilt", .. })
        ));
    }

    #[test]
    fn yaml_with_partial_fields_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.yaml");
        std::fs::write(
            &path,
            "touch: true\n\
             typewriter:\n  words: [Rust, Wgpu]\n\
             nav: []\n\
             sections:\n  - id: hero\n    title: Hello\n    height: 800\n    hero: true\n",
        )
        .unwrap();

        let config = PageConfig::load(&path).unwrap();
        assert!(config.touch);
        assert_eq!(config.typewriter.words, vec!["Rust", "Wgpu"]);
        assert_eq!(config.typewriter.typing_ms, 150);
        assert_eq!(config.sections.len(), 1);
        assert!(config.sections[0].cards.is_empty());
        assert!(config.nav.is_empty());
        assert_eq!(config.springs, SpringPresets::default());
    }

    #[test]
    fn load_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.json");
        std::fs::write(&path, r#"{ "typewriter": { "words": [] } }"#).unwrap();
        assert!(matches!(PageConfig::load(&path), Err(ConfigError::EmptyWords)));
    }

    #[test]
    fn json_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.json");
        let config = PageConfig::default();
        config.save(&path).unwrap();
        assert_eq!(PageConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.toml");
        std::fs::write(&path, "touch = true").unwrap();
        assert!(matches!(
            PageConfig::load(&path),
            Err(ConfigError::UnsupportedFormat(ext)) if ext == "toml"
        ));
    }

    #[test]
    fn oversized_stagger_is_rejected() {
        let mut config = PageConfig::default();
        config.reveal.stagger_ms = u64::MAX / 2 + 1;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidStagger(_))));
        // Even unvalidated, the delay saturates instead of overflowing.
        assert_eq!(config.reveal_config(2).delay, Duration::from_millis(u64::MAX));

        config.reveal.stagger_ms = MAX_STAGGER_MS;
        config.validate().unwrap();
        assert_eq!(
            config.reveal_config(3).delay,
            Duration::from_millis(3 * MAX_STAGGER_MS)
        );
    }

    #[test]
    fn hover_scales_must_be_finite_and_positive() {
        for (dot, ring, layer) in [
            (f32::NAN, 1.5, "dot"),
            (2.5, 0.0, "ring"),
            (2.5, f32::INFINITY, "ring"),
            (-1.0, 1.5, "dot"),
        ] {
            let mut config = PageConfig::default();
            config.cursor.dot_hover_scale = dot;
            config.cursor.ring_hover_scale = ring;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidHoverScale { layer: l, .. }) if l == layer
            ));
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            PageConfig::load(dir.path().join("absent.yml")),
            Err(ConfigError::Io(_))
        ));
    }
}
