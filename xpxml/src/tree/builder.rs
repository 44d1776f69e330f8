//! Stack-based construction of node trees from parse events.

use crate::error::{Error, Result};
use crate::node::{Attributes, Node};

/// Transient state of one parse: the open elements and the character data
/// collected since the last opening tag.
///
/// Nodes are attached to their parent when they close, so a parse that
/// fails part way never produces a partial tree.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    stack: Vec<Node>,
    cdata: String,
}

impl TreeBuilder {
    /// Creates a builder with no open elements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards all open elements and buffered character data.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.cdata.clear();
    }

    /// Number of currently open elements.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Opens an element and clears the character data buffer.
    pub fn start_element(&mut self, name: &str, attributes: Attributes) {
        let mut node = Node::new(name);
        node.set_attributes(attributes);
        self.stack.push(node);
        self.cdata.clear();
    }

    /// Appends to the character data buffer.
    pub fn character_data(&mut self, text: &str) {
        self.cdata.push_str(text);
    }

    /// Closes the innermost element, assigning the buffered character data
    /// as its content. Returns the element if it was the outermost one.
    ///
    /// An element with children receives only the text that follows its
    /// last child.
    pub fn end_element(&mut self) -> Result<Option<Node>> {
        let mut node = self
            .stack
            .pop()
            .ok_or_else(|| Error::IllegalArgument("End of element without start".to_string()))?;
        node.set_content(std::mem::take(&mut self.cdata))?;

        match self.stack.last_mut() {
            Some(parent) => {
                parent.add_child(node);
                Ok(None)
            }
            None => Ok(Some(node)),
        }
    }
}
