//! Mutable SVG markup tree.
//!
//! This module provides a small document model for icon markup: elements with
//! ordered attributes and child nodes. It is parsed from and written back to
//! text with `quick-xml`, and mutated in place by the recoloring walk.

mod parse;
mod write;

use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while reading or writing SVG markup.
#[derive(Debug, Error)]
pub enum SvgError {
    /// The underlying XML reader rejected the input.
    #[error("malformed XML at byte {position}: {message}")]
    Xml { position: u64, message: String },

    /// The input contained no root element.
    #[error("document has no root element")]
    MissingRoot,

    /// A closing tag did not match the open element.
    #[error("unexpected closing tag </{found}>, expected </{expected}>")]
    MismatchedTag { expected: String, found: String },

    /// The input ended while elements were still open.
    #[error("unclosed element <{0}>")]
    Unclosed(String),

    /// An element appeared after the root element was closed.
    #[error("unexpected element <{0}> after the root element")]
    TrailingContent(String),

    /// Serializing the tree failed.
    #[error("failed to write SVG: {0}")]
    Write(String),
}

pub type SvgResult<T> = Result<T, SvgError>;

// ============================================================================
// Tree
// ============================================================================

/// A node in the markup tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// Unescaped character data.
    Text(String),
    CData(String),
    Comment(String),
}

impl Node {
    /// Returns the element if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Returns the element mutably if this node is one.
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }
}

/// An element with ordered attributes.
///
/// Names are stored exactly as written, including any namespace prefix
/// (`xlink:href`), so documents round-trip without namespace resolution.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Creates an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Adds an attribute, builder style.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Appends a child node, builder style.
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Returns the tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns `true` if the attribute is present.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Sets an attribute, replacing the value in place or appending it.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Removes an attribute, returning its value.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let index = self.attributes.iter().position(|(key, _)| key == name)?;
        Some(self.attributes.remove(index).1)
    }

    /// Returns the attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Returns the child nodes.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Returns the child nodes mutably.
    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    /// Iterates over child elements, skipping text and comments.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Returns the concatenated text and CDATA content of direct children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                Node::Text(text) | Node::CData(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replaces all children with a single text node.
    ///
    /// If the element held its text in a CDATA section, the new text is
    /// written as CDATA too.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        let was_cdata = self
            .children
            .iter()
            .any(|child| matches!(child, Node::CData(_)));
        self.children.clear();
        if text.is_empty() {
            return;
        }
        self.children.push(if was_cdata {
            Node::CData(text)
        } else {
            Node::Text(text)
        });
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

// ============================================================================
// SvgDocument
// ============================================================================

/// A parsed SVG document.
///
/// Only the root element is kept: XML declarations, doctypes and processing
/// instructions outside of it are dropped on parse.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    pub root: Element,
}

impl SvgDocument {
    /// Wraps an existing root element.
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// Parses SVG markup.
    pub fn parse(markup: &str) -> SvgResult<Self> {
        parse::parse_document(markup)
    }

    /// Serializes the document back to markup.
    pub fn to_svg_string(&self) -> SvgResult<String> {
        write::write_document(self)
    }
}

impl std::str::FromStr for SvgDocument {
    type Err = SvgError;

    fn from_str(markup: &str) -> Result<Self, Self::Err> {
        Self::parse(markup)
    }
}

// ============================================================================
// Tests
// ============================================================================
