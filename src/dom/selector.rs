//! Selector synthesis and element-context capture.

use super::{ComponentMetadataProvider, DomNode};
use crate::domain::ElementContext;
use crate::utils::text::truncate_chars;

/// Derive a stable, human-readable CSS selector for an element.
///
/// Ids short-circuit: an element with an id is addressed as `#id` alone,
/// and an id found on an ancestor anchors the path, discarding everything
/// collected above it. Elsewhere a segment is the tag name, up to two
/// class tokens, and an `:nth-of-type(k)` disambiguator when same-tag
/// siblings exist.
pub fn compute_selector<N: DomNode>(element: &N) -> String {
    if let Some(id) = element.id() {
        return format!("#{id}");
    }

    let mut path: Vec<String> = Vec::new();
    let mut current = Some(element.clone());

    while let Some(node) = current {
        if node.is_body() {
            break;
        }

        if let Some(id) = node.id() {
            path.insert(0, format!("#{id}"));
            break;
        }

        let mut segment = node.tag_name();

        let classes: Vec<String> = node
            .class_name()
            .split_whitespace()
            .take(2)
            .map(str::to_string)
            .collect();
        if !classes.is_empty() {
            segment.push('.');
            segment.push_str(&classes.join("."));
        }

        if let Some(parent) = node.parent() {
            let same_tag: Vec<N> = parent
                .child_elements()
                .into_iter()
                .filter(|child| child.tag_name() == node.tag_name())
                .collect();
            if same_tag.len() > 1 {
                if let Some(index) = same_tag.iter().position(|child| *child == node) {
                    segment.push_str(&format!(":nth-of-type({})", index + 1));
                }
            }
        }

        path.insert(0, segment);
        current = node.parent();
    }

    path.join(" > ")
}

/// Capture the immutable [`ElementContext`] snapshot for an element.
///
/// Metadata introspection is optional enrichment: providers are
/// best-effort and an absent name or path is not an error.
pub fn capture_context<N: DomNode>(
    element: &N,
    metadata: &dyn ComponentMetadataProvider<N>,
) -> ElementContext {
    let info = metadata.component_metadata(element);

    ElementContext {
        selector: compute_selector(element),
        tag_name: element.tag_name(),
        class_name: element.class_name(),
        id: element.id().unwrap_or_default(),
        text_content: truncate_chars(&element.text_content(), 200).trim().to_string(),
        inner_html: truncate_chars(&element.inner_html(), 500).to_string(),
        bounding_rect: element.bounding_rect(),
        component_name: info.component_name,
        file_path: info.file_path,
    }
}
