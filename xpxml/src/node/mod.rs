//! Node structures for XML tree representation.
//!
//! A [`Node`] is an element with a name, ordered attributes, content and an
//! ordered list of children. Each node owns its children exclusively, so a
//! node graph is always a strict tree: attaching a node moves it into its
//! new parent.

mod builders;
mod content;
mod qname;

pub use content::{CData, Content, PCData};
pub use qname::QName;

use std::fmt;

use indexmap::IndexMap;
use md5::{Digest, Md5};

use crate::error::{Error, Result};

/// Ordered attribute map. Re-setting a key keeps its original position.
pub type Attributes = IndexMap<String, String>;

/// An element in an XML tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    name: String,
    attributes: Attributes,
    content: Content,
    children: Vec<Node>,
}

impl Node {
    /// Creates a node without content, attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Node {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Creates a node with the given content.
    ///
    /// Fails if text content contains illegal control characters.
    pub fn with_content(name: impl Into<String>, content: impl Into<Content>) -> Result<Self> {
        let mut node = Self::new(name);
        node.set_content(content)?;
        Ok(node)
    }

    /// Creates a node from all of its parts.
    pub fn from_parts(
        name: impl Into<String>,
        content: impl Into<Content>,
        attributes: Attributes,
    ) -> Result<Self> {
        let mut node = Self::with_content(name, content)?;
        node.attributes = attributes;
        Ok(node)
    }

    /// Returns the node name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the node name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Returns the content.
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Sets the content.
    ///
    /// Plain text is checked for control characters other than tab, CR and
    /// LF; the first one found is reported with its byte offset and ordinal.
    /// Numbers must be finite. [`CData`] and [`PCData`] are stored without
    /// validation.
    pub fn set_content(&mut self, content: impl Into<Content>) -> Result<()> {
        let content = content.into();
        content.validate()?;
        self.content = content;
        Ok(())
    }

    /// Sets an attribute, overwriting any previous value in place.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl ToString) {
        self.attributes.insert(name.into(), value.to_string());
    }

    /// Sets an attribute and returns this node.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Replaces all attributes.
    pub fn set_attributes(&mut self, attributes: Attributes) {
        self.attributes = attributes;
    }

    /// Returns an attribute's value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Returns an attribute's value, or `default` if it is not set.
    pub fn attribute_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.attribute(name).unwrap_or(default)
    }

    /// Checks whether an attribute is set.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Returns all attributes in insertion order.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Appends a child and returns a reference to it.
    pub fn add_child(&mut self, child: Node) -> &mut Node {
        let index = self.children.len();
        self.children.push(child);
        &mut self.children[index]
    }

    /// Appends a child and returns this node.
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Replaces all children.
    pub fn set_children(&mut self, children: Vec<Node>) {
        self.children = children;
    }

    /// Removes all children.
    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    /// Returns the children in document order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Returns the children for in-place modification.
    pub fn children_mut(&mut self) -> &mut [Node] {
        &mut self.children
    }

    /// Returns the number of children.
    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    /// Returns true if this node has children.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns the child at `pos`.
    pub fn node_at(&self, pos: usize) -> Result<&Node> {
        self.children
            .get(pos)
            .ok_or_else(|| Error::ElementNotFound(format!("Cannot access node at position {}", pos)))
    }

    /// Returns the child at `pos` for modification.
    pub fn node_at_mut(&mut self, pos: usize) -> Result<&mut Node> {
        self.children
            .get_mut(pos)
            .ok_or_else(|| Error::ElementNotFound(format!("Cannot access node at position {}", pos)))
    }

    /// Returns the first child with the given name.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Returns all children with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Returns a hex MD5 digest over name, content, attributes and children.
    pub fn hash_code(&self) -> String {
        let mut hasher = Md5::new();
        self.update_hash(&mut hasher);
        format!("{:x}", hasher.finalize())
    }

    fn update_hash(&self, hasher: &mut Md5) {
        hasher.update(self.name.as_bytes());
        hasher.update(self.content.to_string().as_bytes());
        for (key, value) in &self.attributes {
            hasher.update(key.as_bytes());
            hasher.update([b'=']);
            hasher.update(value.as_bytes());
        }
        for child in &self.children {
            hasher.update(child.hash_code().as_bytes());
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({}", self.name)?;
        for (key, value) in &self.attributes {
            write!(f, " @{}= \"{}\"", key, value)?;
        }
        write!(f, ") {{")?;
        if self.children.is_empty() {
            if self.content.is_absent() {
                write!(f, " ")?;
            } else {
                write!(f, " {} ", self.content)?;
            }
        } else {
            if self.content.is_absent() {
                writeln!(f)?;
            } else {
                write!(f, "\n  {}\n", self.content)?;
            }
            for child in &self.children {
                writeln!(f, "  {}", child.to_string().replace('\n', "\n  "))?;
            }
        }
        write!(f, "}}")
    }
}
