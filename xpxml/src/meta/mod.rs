//! Conversion between typed values and node trees.
//!
//! Types opt in by implementing [`ToNode`] and [`FromNode`]; the
//! [`Marshaller`] and [`Unmarshaller`] wrap those conversions with the
//! element naming and parsing around them.

use tracing::debug;

use crate::error::{Error, Result};
use crate::node::Node;
use crate::tree::Tree;
use crate::xml::{Indent, InputSource, StringInputSource};

/// A value that can write itself into a node.
pub trait ToNode {
    /// Element name used when marshalling into an unnamed node.
    ///
    /// Defaults to the lower-cased type name without its module path.
    fn element_name(&self) -> String {
        let full = std::any::type_name::<Self>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base).to_lowercase()
    }

    /// Namespace as `(prefix, uri)`. When set, the element name gets the
    /// prefix and the node an `xmlns:prefix` attribute.
    fn namespace(&self) -> Option<(&str, &str)> {
        None
    }

    /// Writes attributes, content and children into `node`.
    fn marshal_into(&self, node: &mut Node) -> Result<()>;
}

/// A value that can be read back from a node.
pub trait FromNode: Sized {
    /// Reads a value from `node`, failing when required parts are missing
    /// or malformed.
    fn from_node(node: &Node) -> Result<Self>;
}

/// Converts values into nodes and XML text.
///
/// ```
/// use xp_xml::{Marshaller, Node, Result, ToNode};
///
/// struct Button {
///     id: String,
///     caption: String,
/// }
///
/// impl ToNode for Button {
///     fn marshal_into(&self, node: &mut Node) -> Result<()> {
///         node.set_attribute("id", &self.id);
///         node.set_content(self.caption.as_str())
///     }
/// }
///
/// let button = Button { id: "ok".into(), caption: "Ok".into() };
/// let xml = Marshaller::new().marshal(&button).unwrap();
/// assert_eq!(xml, "<button id=\"ok\">Ok</button>\n");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Marshaller;

impl Marshaller {
    /// Creates a marshaller.
    pub fn new() -> Self {
        Marshaller
    }

    /// Marshals `instance` into `target`, or into a fresh node when `None`.
    ///
    /// A target without a name receives [`ToNode::element_name`].
    pub fn marshal_to<T: ToNode + ?Sized>(&self, target: Option<Node>, instance: &T) -> Result<Node> {
        let mut node = target.unwrap_or_default();
        if node.name().is_empty() {
            node.set_name(instance.element_name());
        }
        if let Some((prefix, uri)) = instance.namespace() {
            node.set_name(format!("{}:{}", prefix, node.name()));
            node.set_attribute(format!("xmlns:{}", prefix), uri);
        }
        debug!(element = node.name(), "marshalling");
        instance.marshal_into(&mut node)?;
        Ok(node)
    }

    /// Marshals `instance` and serializes it with [`Indent::Default`].
    pub fn marshal<T: ToNode + ?Sized>(&self, instance: &T) -> Result<String> {
        Ok(self.marshal_to(None, instance)?.get_source(Indent::Default))
    }
}

/// Parses XML and converts the root element into a value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unmarshaller;

impl Unmarshaller {
    /// Creates an unmarshaller.
    pub fn new() -> Self {
        Unmarshaller
    }

    /// Parses `source` and converts its root element.
    pub fn unmarshal_from<T: FromNode, S: InputSource>(&self, source: S) -> Result<T> {
        let tree = Tree::from_source(source)?;
        debug!(element = tree.root().name(), "unmarshalling");
        T::from_node(tree.root())
    }

    /// Parses a string and converts its root element.
    pub fn unmarshal_str<T: FromNode>(&self, xml: &str) -> Result<T> {
        self.unmarshal_from(StringInputSource::new(xml))
    }
}

/// Returns a required attribute.
pub fn required_attribute<'a>(node: &'a Node, name: &str) -> Result<&'a str> {
    node.attribute(name).ok_or_else(|| {
        Error::ElementNotFound(format!("Attribute \"{}\" missing on <{}>", name, node.name()))
    })
}

/// Returns a required child element.
pub fn required_child<'a>(node: &'a Node, name: &str) -> Result<&'a Node> {
    node.child(name).ok_or_else(|| {
        Error::ElementNotFound(format!("Element <{}> missing in <{}>", name, node.name()))
    })
}

/// Returns a node's text content, or an empty string.
pub fn text_of(node: &Node) -> &str {
    node.content().as_str().unwrap_or_default()
}

/// Reads a child element's text content and parses it.
pub fn parse_child<T>(node: &Node, name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let child = required_child(node, name)?;
    text_of(child).trim().parse().map_err(|e| {
        Error::IllegalArgument(format!("Cannot convert <{}> of <{}>: {}", name, node.name(), e))
    })
}
