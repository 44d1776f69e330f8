//! XML documents.
//!
//! A [`Tree`] owns a root [`Node`] plus the document's version and
//! encoding. It is also the [`ParserCallback`] that turns parse events into
//! nodes, so parsing a document is a matter of handing a tree to a parser.

mod builder;

pub use builder::TreeBuilder;

use std::fmt;
use std::io::Write;
use std::path::Path;

use md5::{Digest, Md5};
use tracing::debug;

use crate::constants::{DEFAULT_ENCODING, DEFAULT_ROOT_NAME, DEFAULT_VERSION};
use crate::error::{Error, Result};
use crate::node::{Attributes, Node};
use crate::xml::{
    declaration, transcode, FileInputSource, Indent, InputSource, ParserCallback, XmlParser,
    XmlPrinter, XmlPrinterOptions,
};

/// An XML document.
///
/// ```
/// use xp_xml::{Indent, Node, Tree};
///
/// let mut tree = Tree::with_root_name("rss");
/// tree.add_child(Node::with_content("title", "News").unwrap());
/// assert_eq!(
///     tree.get_source(Indent::Default),
///     "<rss>\n  <title>News</title>\n</rss>\n"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Tree {
    root: Node,
    version: String,
    encoding: String,
    builder: Option<TreeBuilder>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::with_root_name(DEFAULT_ROOT_NAME)
    }
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version && self.encoding == other.encoding && self.root == other.root
    }
}

impl Tree {
    /// Creates a tree with an empty `document` root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tree with an empty root of the given name.
    pub fn with_root_name(name: impl Into<String>) -> Self {
        Self::with_root(Node::new(name))
    }

    /// Creates a tree around an existing root.
    pub fn with_root(root: Node) -> Self {
        Tree {
            root,
            version: DEFAULT_VERSION.to_string(),
            encoding: DEFAULT_ENCODING.to_string(),
            builder: None,
        }
    }

    /// Returns the root element.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Returns the root element for modification.
    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// Replaces the root, returning the previous one.
    pub fn set_root(&mut self, root: Node) -> Node {
        std::mem::replace(&mut self.root, root)
    }

    /// Appends a child to the root and returns a reference to it.
    pub fn add_child(&mut self, child: Node) -> &mut Node {
        self.root.add_child(child)
    }

    /// Returns the XML version written in the declaration.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the lower-cased document encoding.
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// Sets the document encoding. Names are stored lower-cased.
    pub fn set_encoding(&mut self, encoding: &str) {
        self.encoding = encoding.to_lowercase();
    }

    /// Sets the document encoding and returns this tree.
    pub fn with_encoding(mut self, encoding: &str) -> Self {
        self.set_encoding(encoding);
        self
    }

    /// Returns the XML declaration, e.g. `<?xml version="1.0" encoding="UTF-8"?>`.
    pub fn declaration(&self) -> String {
        declaration(&self.version, &self.encoding)
    }

    /// Serializes the root element.
    pub fn get_source(&self, indent: Indent) -> String {
        self.root.get_source(indent)
    }

    /// Serializes the root element in the document encoding.
    pub fn to_bytes(&self, indent: Indent) -> Result<Vec<u8>> {
        transcode(&self.get_source(indent), &self.encoding)
    }

    /// Writes the document in its encoding, optionally preceded by the
    /// declaration line.
    pub fn write_to<W: Write>(&self, writer: W, indent: Indent, with_declaration: bool) -> Result<()> {
        let options = XmlPrinterOptions {
            indent,
            encoding: self.encoding.clone(),
            declaration: with_declaration,
        };
        XmlPrinter::with_options(writer, options).print(&self.root)
    }

    /// Parses a document from a string.
    pub fn from_string(xml: &str) -> Result<Tree> {
        debug!(len = xml.len(), "building tree from string");
        let mut tree = Tree::new();
        XmlParser::new().parse_str(&mut tree, xml, None)?;
        Ok(tree)
    }

    /// Parses a document from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Tree> {
        let path = path.as_ref();
        debug!(path = %path.display(), "building tree from file");
        Self::from_source(FileInputSource::new(path))
    }

    /// Parses a document from any input source.
    pub fn from_source<S: InputSource>(source: S) -> Result<Tree> {
        let mut tree = Tree::new();
        XmlParser::new().parse(&mut tree, source)?;
        Ok(tree)
    }

    /// Returns a hex MD5 digest over version, encoding and the root's hash.
    pub fn hash_code(&self) -> String {
        let mut hasher = Md5::new();
        hasher.update(self.version.as_bytes());
        hasher.update(self.encoding.as_bytes());
        hasher.update(self.root.hash_code().as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn builder(&mut self) -> &mut TreeBuilder {
        self.builder.get_or_insert_with(TreeBuilder::new)
    }
}

impl ParserCallback for Tree {
    fn on_begin(&mut self, parser: &XmlParser) {
        self.set_encoding(parser.encoding());
        self.builder().reset();
    }

    fn on_start_element(&mut self, _parser: &XmlParser, name: &str, attributes: Attributes) -> Result<()> {
        self.builder().start_element(name, attributes);
        Ok(())
    }

    fn on_end_element(&mut self, _parser: &XmlParser, _name: &str) -> Result<()> {
        if let Some(root) = self.builder().end_element()? {
            self.root = root;
        }
        Ok(())
    }

    fn on_cdata(&mut self, _parser: &XmlParser, cdata: &str) -> Result<()> {
        self.builder().character_data(cdata);
        Ok(())
    }

    fn on_error(&mut self, _parser: &XmlParser, _error: &Error) {
        self.builder = None;
    }

    fn on_finish(&mut self, _parser: &XmlParser) {
        self.builder = None;
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tree(version={} encoding={})@{{\n  {}\n}}",
            self.version,
            self.encoding,
            self.root.to_string().replace('\n', "\n  ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;
    use crate::xml::{StreamInputSource, TreeInputSource};
    use std::io::Write as _;

    #[test]
    fn test_default_root() {
        let tree = Tree::new();
        assert_eq!(tree.root().name(), "document");
        assert_eq!(tree.version(), "1.0");
        assert_eq!(tree.encoding(), "utf-8");
    }

    #[test]
    fn test_declaration() {
        assert_eq!(
            Tree::new().declaration(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>"
        );
        assert_eq!(
            Tree::new().with_encoding("ISO-8859-1").declaration(),
            "<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>"
        );
    }

    #[test]
    fn test_encoding_is_lower_cased() {
        let mut tree = Tree::new();
        tree.set_encoding("ISO-8859-1");
        assert_eq!(tree.encoding(), "iso-8859-1");
    }

    #[test]
    fn test_add_child_to_root() {
        let mut tree = Tree::new();
        tree.add_child(Node::new("a")).set_attribute("id", 1);
        assert_eq!(tree.root().node_at(0).unwrap().attribute("id"), Some("1"));
    }

    #[test]
    fn test_from_string() {
        let tree = Tree::from_string(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<book id=\"1\">\n  <title>Intro</title>\n  <author>Timm</author>\n</book>",
        )
        .unwrap();
        let root = tree.root();
        assert_eq!(root.name(), "book");
        assert_eq!(root.attribute("id"), Some("1"));
        assert_eq!(root.num_children(), 2);
        assert_eq!(root.node_at(0).unwrap().content().as_str(), Some("Intro"));
        assert_eq!(root.node_at(1).unwrap().content().as_str(), Some("Timm"));
        assert_eq!(root.content().as_str(), Some("\n"));
    }

    #[test]
    fn test_from_string_resolves_references() {
        let tree = Tree::from_string("<n>&lt;&#65;&gt; &amp; <![CDATA[<raw>]]></n>").unwrap();
        assert_eq!(tree.root().content().as_str(), Some("<A> & <raw>"));
    }

    #[test]
    fn test_from_string_ignores_comments() {
        let tree = Tree::from_string("<n>a<!-- gone -->b<?pi x?>c</n>").unwrap();
        assert_eq!(tree.root().content().as_str(), Some("abc"));
    }

    #[test]
    fn test_malformed_string() {
        let err = Tree::from_string("<a><b></a>").unwrap_err();
        let format = err.as_format().unwrap();
        assert_eq!(format.code(), 7);
        assert_eq!(format.origin(), Some("(string)"));
    }

    #[test]
    fn test_control_character_is_a_located_parse_error() {
        let err = Tree::from_string("<a>\n\n x\u{1}</a>").unwrap_err();
        let format = err.as_format().unwrap();
        assert_eq!(format.code(), 4);
        assert_eq!(format.origin(), Some("(string)"));
        assert_eq!((format.line(), format.column()), (1, 4));
    }

    #[test]
    fn test_line_ends_are_normalized() {
        let tree = Tree::from_string("<a t=\"1\r\n2\">x\r\ny</a>").unwrap();
        assert_eq!(tree.root().content().as_str(), Some("x\ny"));
        assert_eq!(tree.root().attribute("t"), Some("1 2"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"<config><item key=\"a\">1</item></config>").unwrap();
        let tree = Tree::from_file(file.path()).unwrap();
        assert_eq!(tree.root().name(), "config");
        assert_eq!(tree.root().child("item").and_then(|n| n.attribute("key")), Some("a"));
    }

    #[test]
    fn test_from_file_error_carries_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"<config>\n<item>\n</config>").unwrap();
        let err = Tree::from_file(file.path()).unwrap_err();
        let format: &FormatError = err.as_format().unwrap();
        assert_eq!(format.origin(), Some(file.path().display().to_string().as_str()));
        assert_eq!(format.line(), 3);
    }

    #[test]
    fn test_from_stream() {
        let tree = Tree::from_source(StreamInputSource::new(&b"<doc><a/></doc>"[..])).unwrap();
        assert_eq!(tree.root().node_at(0).unwrap().name(), "a");
    }

    #[test]
    fn test_tree_source_round_trip() {
        let original = Tree::with_root(
            Node::new("doc")
                .with_attribute("lang", "en")
                .with_child(Node::with_content("title", "A & B").unwrap()),
        );
        let parsed = Tree::from_source(TreeInputSource::new(&original)).unwrap();
        assert_eq!(parsed.root().attribute("lang"), Some("en"));
        assert_eq!(
            parsed.root().node_at(0).unwrap().content().as_str(),
            Some("A & B")
        );
    }

    #[test]
    fn test_reused_tree_replaces_root() {
        let parser = XmlParser::new();
        let mut tree = Tree::new();
        parser.parse_str(&mut tree, "<a><b/></a>", None).unwrap();
        parser.parse_str(&mut tree, "<x/>", None).unwrap();
        assert_eq!(tree.root(), &Node::with_content("x", "").unwrap());
    }

    #[test]
    fn test_error_keeps_previous_root() {
        let parser = XmlParser::new();
        let mut tree = Tree::new();
        parser.parse_str(&mut tree, "<a><b>text</b></a>", None).unwrap();
        let before = tree.root().clone();

        assert!(parser.parse_str(&mut tree, "<c><d></c>", None).is_err());
        assert_eq!(tree.root(), &before);

        parser.parse_str(&mut tree, "<x/>", None).unwrap();
        assert_eq!(tree.root().name(), "x");
        assert!(!tree.root().has_children());
    }

    #[test]
    fn test_parser_encoding_is_adopted() {
        let mut tree = Tree::new();
        XmlParser::new()
            .with_encoding("ISO-8859-1")
            .parse_str(&mut tree, "<a/>", None)
            .unwrap();
        assert_eq!(tree.encoding(), "iso-8859-1");
    }

    #[test]
    fn test_to_bytes_uses_tree_encoding() {
        let tree = Tree::with_root(Node::with_content("u", "ü").unwrap()).with_encoding("iso-8859-1");
        assert_eq!(tree.to_bytes(Indent::None).unwrap(), b"<u>\xfc</u>");
    }

    #[test]
    fn test_write_to_with_declaration() {
        let tree = Tree::with_root_name("doc");
        let mut out = Vec::new();
        tree.write_to(&mut out, Indent::Default, true).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<doc/>\n"
        );
    }

    #[test]
    fn test_display() {
        let tree = Tree::with_root(Node::new("doc").with_child(Node::new("a")));
        assert_eq!(
            tree.to_string(),
            "Tree(version=1.0 encoding=utf-8)@{\n  Node(doc) {\n    Node(a) { }\n  }\n}"
        );
        assert_eq!(
            Tree::new().to_string(),
            "Tree(version=1.0 encoding=utf-8)@{\n  Node(document) { }\n}"
        );
    }

    #[test]
    fn test_hash_code() {
        let a = Tree::with_root_name("a");
        assert_eq!(a.hash_code(), Tree::with_root_name("a").hash_code());
        assert_ne!(a.hash_code(), Tree::with_root_name("a").with_encoding("iso-8859-1").hash_code());
    }
}
