//! Element-tree abstraction.
//!
//! The engine never touches a live browser DOM; the host exposes its
//! element tree through [`DomNode`] and the selector synthesizer, context
//! capture, and grab-mode targeting run against that surface. A
//! `roxmltree`-backed reference implementation lives in [`markup`].

pub mod markup;
pub mod selector;

pub use markup::{MarkupDocument, MarkupNode};
pub use selector::{capture_context, compute_selector};

use crate::domain::{BoundingRect, ComponentMetadata};

/// Read-only view of one element in the host's tree.
///
/// `PartialEq` must be identity (same node in the same tree), not
/// structural equality; sibling positions are computed with it.
pub trait DomNode: Clone + PartialEq {
    /// Lowercase tag name.
    fn tag_name(&self) -> String;
    /// Element id; `None` when missing or empty.
    fn id(&self) -> Option<String>;
    /// Space-separated class list; empty string when absent.
    fn class_name(&self) -> String;
    /// Concatenated text of the element and its descendants.
    fn text_content(&self) -> String;
    /// Serialized markup of the element's children.
    fn inner_html(&self) -> String;
    /// Geometry, when the host has layout information.
    fn bounding_rect(&self) -> Option<BoundingRect>;
    /// Arbitrary attribute lookup.
    fn attribute(&self, name: &str) -> Option<String>;
    /// Parent element; `None` at the top of the tree.
    fn parent(&self) -> Option<Self>;
    /// True for the document body.
    fn is_body(&self) -> bool;
    /// Child elements in document order.
    fn child_elements(&self) -> Vec<Self>;
}

/// True iff the element or an ancestor carries the widget's marker
/// attribute; used to keep the widget from annotating its own DOM.
pub fn is_widget_element<N: DomNode>(node: &N, marker: &str) -> bool {
    let mut current = Some(node.clone());
    while let Some(n) = current {
        if n.attribute(marker).is_some() {
            return true;
        }
        current = n.parent();
    }
    false
}

/// Optional framework-introspection capability. Implementations must be
/// best-effort: no panics, no errors, just absent metadata on failure.
pub trait ComponentMetadataProvider<N: DomNode> {
    fn component_metadata(&self, node: &N) -> ComponentMetadata;
}

/// The no-op provider: never yields metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetadata;

impl<N: DomNode> ComponentMetadataProvider<N> for NoMetadata {
    fn component_metadata(&self, _node: &N) -> ComponentMetadata {
        ComponentMetadata::default()
    }
}

/// Reads the debug attributes instrumented renderers stamp onto their
/// output. The component name is searched up the ancestor chain, the way
/// framework-internal instance walks recover the nearest named component.
#[derive(Debug, Clone)]
pub struct AttributeMetadata {
    pub component_attr: String,
    pub source_attr: String,
}

impl Default for AttributeMetadata {
    fn default() -> Self {
        Self {
            component_attr: "data-component".to_string(),
            source_attr: "data-source-file".to_string(),
        }
    }
}

impl<N: DomNode> ComponentMetadataProvider<N> for AttributeMetadata {
    fn component_metadata(&self, node: &N) -> ComponentMetadata {
        let file_path = node.attribute(&self.source_attr);

        let mut component_name = None;
        let mut current = Some(node.clone());
        while let Some(n) = current {
            if let Some(name) = n.attribute(&self.component_attr) {
                if !name.is_empty() && !name.starts_with('_') {
                    component_name = Some(name);
                    break;
                }
            }
            current = n.parent();
        }

        ComponentMetadata {
            component_name,
            file_path,
        }
    }
}
