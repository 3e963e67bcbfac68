//! `roxmltree`-backed reference implementation of [`DomNode`].
//!
//! Parses a well-formed markup snapshot (XHTML-ish) and exposes it to the
//! selector synthesizer and the tests. There is no layout engine here, so
//! geometry comes from an optional `data-bounds="top,left,width,height"`
//! attribute and is otherwise absent.

use super::DomNode;
use crate::domain::BoundingRect;
use anyhow::{Context, Result};

/// A parsed markup snapshot.
pub struct MarkupDocument<'input> {
    doc: roxmltree::Document<'input>,
}

impl<'input> MarkupDocument<'input> {
    pub fn parse(text: &'input str) -> Result<Self> {
        let doc = roxmltree::Document::parse(text).context("parse markup snapshot")?;
        Ok(Self { doc })
    }

    /// First element with the given id.
    pub fn find_by_id(&self, id: &str) -> Option<MarkupNode<'_, 'input>> {
        self.doc
            .descendants()
            .find(|n| n.is_element() && n.attribute("id") == Some(id))
            .map(|node| MarkupNode { node })
    }

    /// First element with the given tag name, in document order.
    pub fn find_first(&self, tag: &str) -> Option<MarkupNode<'_, 'input>> {
        self.doc
            .descendants()
            .find(|n| n.is_element() && n.tag_name().name().eq_ignore_ascii_case(tag))
            .map(|node| MarkupNode { node })
    }
}

/// One element inside a [`MarkupDocument`]. Cheap to copy; equality is
/// node identity within the owning document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkupNode<'a, 'input> {
    node: roxmltree::Node<'a, 'input>,
}

impl DomNode for MarkupNode<'_, '_> {
    fn tag_name(&self) -> String {
        self.node.tag_name().name().to_ascii_lowercase()
    }

    fn id(&self) -> Option<String> {
        self.node
            .attribute("id")
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    }

    fn class_name(&self) -> String {
        self.node.attribute("class").unwrap_or_default().to_string()
    }

    fn text_content(&self) -> String {
        let mut out = String::new();
        for descendant in self.node.descendants() {
            if descendant.is_text() {
                out.push_str(descendant.text().unwrap_or_default());
            }
        }
        out
    }

    fn inner_html(&self) -> String {
        let mut out = String::new();
        serialize_children(self.node, &mut out);
        out
    }

    fn bounding_rect(&self) -> Option<BoundingRect> {
        let raw = self.node.attribute("data-bounds")?;
        let parts: Vec<f64> = raw
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .ok()?;
        if parts.len() != 4 {
            return None;
        }
        Some(BoundingRect {
            top: parts[0],
            left: parts[1],
            width: parts[2],
            height: parts[3],
        })
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.node.attribute(name).map(str::to_string)
    }

    fn parent(&self) -> Option<Self> {
        self.node
            .parent()
            .filter(roxmltree::Node::is_element)
            .map(|node| MarkupNode { node })
    }

    fn is_body(&self) -> bool {
        self.node.tag_name().name().eq_ignore_ascii_case("body")
    }

    fn child_elements(&self) -> Vec<Self> {
        self.node
            .children()
            .filter(roxmltree::Node::is_element)
            .map(|node| MarkupNode { node })
            .collect()
    }
}

fn serialize_children(node: roxmltree::Node<'_, '_>, out: &mut String) {
    for child in node.children() {
        if child.is_element() {
            out.push('<');
            out.push_str(child.tag_name().name());
            for attr in child.attributes() {
                out.push(' ');
                out.push_str(attr.name());
                out.push_str("=\"");
                out.push_str(&attr.value().replace('"', "&quot;"));
                out.push('"');
            }
            out.push('>');
            serialize_children(child, out);
            out.push_str("</");
            out.push_str(child.tag_name().name());
            out.push('>');
        } else if child.is_text() {
            out.push_str(child.text().unwrap_or_default());
        }
    }
}
