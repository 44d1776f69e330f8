//! xp-xml - XML document toolkit
//!
//! This library models XML documents as owned node trees, builds them from
//! a streaming parser and serializes them back in an exactly specified
//! layout.
//!
//! # Overview
//!
//! - [`Node`] is an element with a name, ordered attributes, content and
//!   children. Content is plain text, literal markup ([`PCData`]), a CDATA
//!   section ([`CData`]) or a number.
//! - [`Node::get_source`] serializes in one of three [`Indent`] modes with
//!   two-space indentation, self-closing empty elements and one attribute
//!   per line from three attributes on.
//! - [`XmlParser`] reports parse events to a [`ParserCallback`]. [`Tree`] is
//!   the callback that assembles nodes; parse errors carry the expat error
//!   code and a line and column.
//! - [`Marshaller`] and [`Unmarshaller`] convert typed values through the
//!   [`ToNode`] and [`FromNode`] traits.
//!
//! # Example
//!
//! ```
//! use xp_xml::{Indent, Tree};
//!
//! let tree = Tree::from_string("<list><item id=\"1\">One</item></list>").unwrap();
//! assert_eq!(tree.root().node_at(0).unwrap().attribute("id"), Some("1"));
//! assert_eq!(
//!     tree.get_source(Indent::Default),
//!     "<list>\n  <item id=\"1\">One</item>\n</list>\n"
//! );
//! ```

pub mod constants;
pub mod error;
pub mod meta;
pub mod node;
pub mod tree;
pub mod xml;

// Re-export commonly used types
pub use constants::*;
pub use error::{Error, FormatError, Result};
pub use meta::{FromNode, Marshaller, ToNode, Unmarshaller};
pub use node::{Attributes, CData, Content, Node, PCData, QName};
pub use tree::{Tree, TreeBuilder};
pub use xml::{
    FileInputSource, Indent, InputSource, ParserCallback, StreamInputSource, StringInputSource,
    TreeInputSource, XmlParser, XmlPrinter, XmlPrinterOptions,
};
