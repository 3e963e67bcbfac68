use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BoundingRect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

/// Best-effort component information recovered from the host's rendering
/// framework. Both fields may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComponentMetadata {
    /// Human-readable component name (e.g. `CheckoutButton`)
    pub component_name: Option<String>,
    /// Source location, optionally suffixed with `:line`
    pub file_path: Option<String>,
}

/// Immutable snapshot of a targeted element, captured once at selection
/// time and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ElementContext {
    /// Synthesized CSS selector addressing the element
    pub selector: String,
    /// Lowercase tag name
    pub tag_name: String,
    /// Space-separated class list; may be empty
    pub class_name: String,
    /// Element id; may be empty
    pub id: String,
    /// Text content, truncated to 200 characters and trimmed
    pub text_content: String,
    /// Inner markup, truncated to 500 characters
    #[serde(rename = "innerHTML")]
    pub inner_html: String,
    /// Geometry at capture time, absent when the host has no layout
    pub bounding_rect: Option<BoundingRect>,
    /// Framework component name, when introspection succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    /// Framework source location, when introspection succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}
