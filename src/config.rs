//! Configuration surface supplied by the embedding application.
//!
//! The original widget shipped as two near-identical branded builds; here
//! the brand is a single configuration value that derives every namespaced
//! key and the DOM marker attribute.

use crate::domain::Annotation;
use std::fmt;

/// Brand/namespace slug. Derives the storage keys and the marker attribute
/// that tags the widget's own DOM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brand(String);

impl Brand {
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Storage key for the annotation collection.
    pub fn annotations_key(&self) -> String {
        format!("{}-annotations", self.0)
    }

    /// Storage key for the persisted GitHub connection.
    pub fn github_config_key(&self) -> String {
        format!("{}-github-config", self.0)
    }

    /// Storage key for a named session.
    pub fn session_key(&self, session_id: &str) -> String {
        format!("{}-session-{}", self.0, session_id)
    }

    /// Attribute that marks the widget's own DOM so the tool never
    /// annotates itself.
    pub fn marker_attribute(&self) -> String {
        format!("data-{}", self.0)
    }
}

impl Default for Brand {
    fn default() -> Self {
        Self("qaflow".to_string())
    }
}

/// A keyboard event as reported by the host.
#[derive(Debug, Clone, Default)]
pub struct KeyEvent {
    /// Physical key code (e.g. `KeyQ`)
    pub code: String,
    /// Logical key value (e.g. `Escape`)
    pub key: String,
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub meta: bool,
}

/// Modifier + key combination that toggles the widget on and off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotkey {
    pub code: String,
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Hotkey {
    /// True when the event carries the configured code and every
    /// configured modifier. Extra modifiers are ignored.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        event.code == self.code
            && (!self.alt || event.alt)
            && (!self.ctrl || event.ctrl)
            && (!self.shift || event.shift)
            && (!self.meta || event.meta)
    }
}

impl Default for Hotkey {
    fn default() -> Self {
        Self {
            code: "KeyQ".to_string(),
            alt: true,
            ctrl: false,
            shift: false,
            meta: false,
        }
    }
}

/// Which side of the viewport the host should dock the panel on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelPosition {
    Left,
    #[default]
    Right,
}

/// Color scheme hint for the host's presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Auto,
}

/// Callback fired with a single annotation (creation, update).
pub type AnnotationCallback = Box<dyn Fn(&Annotation) + Send>;
/// Callback fired with the full collection on export.
pub type ExportCallback = Box<dyn Fn(&[Annotation]) + Send>;

/// Everything the embedding application can configure.
pub struct WidgetConfig {
    pub brand: Brand,
    /// Overrides the brand-derived annotation storage key.
    pub storage_key: Option<String>,
    pub hotkey: Hotkey,
    pub position: PanelPosition,
    pub theme: Theme,
    /// Target repository (`owner/repo`) for the tokenless web-form export.
    pub github_repo: Option<String>,
    pub on_annotation_create: Option<AnnotationCallback>,
    pub on_annotation_update: Option<AnnotationCallback>,
    pub on_export: Option<ExportCallback>,
}

impl WidgetConfig {
    /// Effective storage key for the annotation collection.
    pub fn annotations_key(&self) -> String {
        self.storage_key
            .clone()
            .unwrap_or_else(|| self.brand.annotations_key())
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            brand: Brand::default(),
            storage_key: None,
            hotkey: Hotkey::default(),
            position: PanelPosition::default(),
            theme: Theme::default(),
            github_repo: None,
            on_annotation_create: None,
            on_annotation_update: None,
            on_export: None,
        }
    }
}

impl fmt::Debug for WidgetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetConfig")
            .field("brand", &self.brand)
            .field("storage_key", &self.storage_key)
            .field("hotkey", &self.hotkey)
            .field("position", &self.position)
            .field("theme", &self.theme)
            .field("github_repo", &self.github_repo)
            .field("on_annotation_create", &self.on_annotation_create.is_some())
            .field("on_annotation_update", &self.on_annotation_update.is_some())
            .field("on_export", &self.on_export.is_some())
            .finish()
    }
}
