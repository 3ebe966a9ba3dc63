//! Markup Document Types
//!
//! The element tree produced by the markup reader.

use indexmap::IndexMap;
use thiserror::Error;

/// Markup syntax error with a 1-based source position.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}, column {column}: {message}")]
pub struct MarkupError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl MarkupError {
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self { message: message.into(), line, column }
    }
}

/// One piece of element content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Element(Element),
    Text(String),
}

/// A markup element with attributes in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Content>,
    /// Line of the opening `<`.
    pub line: usize,
}

impl Element {
    pub fn new(tag: impl Into<String>, line: usize) -> Self {
        Self {
            tag: tag.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
            line,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Child elements in document order, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            Content::Element(e) => Some(e),
            Content::Text(_) => None,
        })
    }

    /// Concatenation of the direct text children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|c| match c {
                Content::Text(t) => Some(t.as_str()),
                Content::Element(_) => None,
            })
            .collect()
    }

    /// Append text, merging with a preceding text run.
    pub(crate) fn push_text(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        if let Some(Content::Text(last)) = self.children.last_mut() {
            last.push_str(&text);
        } else {
            self.children.push(Content::Text(text));
        }
    }
}
