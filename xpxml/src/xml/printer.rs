//! XML serialization of node trees.
//!
//! Output is reproducible byte for byte: indentation is two spaces per
//! level, up to two attributes stay on the opening tag while three or more
//! go one per line, and childless nodes without content self-close in the
//! indented modes.

use std::borrow::Cow;
use std::io::Write;
use std::str::FromStr;

use encoding_rs::{Encoding, UTF_8};

use crate::constants::{ATTRIBUTE_WRAP_THRESHOLD, INDENT_UNIT};
use crate::error::{Error, Result};
use crate::node::{Content, Node};

/// Serialization layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Indent {
    /// Indented; leaf content stays on the tag line, trimmed.
    Default = 0,
    /// Indented; leaf content goes on its own line.
    #[default]
    Wrapped = 1,
    /// Single line, no whitespace added.
    None = 2,
}

impl TryFrom<u8> for Indent {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Indent::Default),
            1 => Ok(Indent::Wrapped),
            2 => Ok(Indent::None),
            other => Err(Error::IllegalArgument(format!("Unknown indent mode {}", other))),
        }
    }
}

impl FromStr for Indent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "default" | "0" => Ok(Indent::Default),
            "wrapped" | "1" => Ok(Indent::Wrapped),
            "none" | "2" => Ok(Indent::None),
            _ => Err(Error::IllegalArgument(format!("Unknown indent mode \"{}\"", s))),
        }
    }
}

impl Node {
    /// Returns the XML representation of this node and its descendants.
    ///
    /// With [`Indent::Default`]:
    ///
    /// ```text
    /// <item>
    ///   <title>Website created</title>
    ///   <link/>
    /// </item>
    /// ```
    ///
    /// With [`Indent::Wrapped`]:
    ///
    /// ```text
    /// <item>
    ///   <title>
    ///     Website created
    ///   </title>
    ///   <link/>
    /// </item>
    /// ```
    ///
    /// With [`Indent::None`] everything is on one line and every element has
    /// an explicit close tag: `<item><title>Website created</title><link></link></item>`.
    pub fn get_source(&self, indent: Indent) -> String {
        self.get_source_with_inset(indent, "")
    }

    /// Like [`Node::get_source`], prefixing this node's lines with `inset`.
    pub fn get_source_with_inset(&self, indent: Indent, inset: &str) -> String {
        let mut out = String::new();
        write_node(self, &mut out, indent, inset);
        out
    }

    /// Returns the XML representation transcoded to `encoding`.
    pub fn get_source_in(&self, indent: Indent, encoding: &str) -> Result<Vec<u8>> {
        transcode(&self.get_source(indent), encoding)
    }
}

fn write_node(node: &Node, out: &mut String, indent: Indent, inset: &str) {
    out.push_str(inset);
    out.push('<');
    out.push_str(node.name());

    let content = render_content(node.content());

    if indent == Indent::None {
        for (key, value) in node.attributes() {
            push_attribute(out, "", key, value);
        }
        out.push('>');
        out.push_str(&content);
        for child in node.children() {
            write_node(child, out, indent, inset);
        }
        push_close_tag(out, node.name());
        return;
    }

    let wrapped = indent == Indent::Wrapped;

    if !node.attributes().is_empty() {
        let sep = if node.attributes().len() < ATTRIBUTE_WRAP_THRESHOLD {
            String::new()
        } else {
            format!("\n{}", inset)
        };
        for (key, value) in node.attributes() {
            push_attribute(out, &sep, key, value);
        }
        out.push_str(&sep);
    }

    if content.is_empty() {
        if !node.has_children() {
            out.push_str("/>\n");
            return;
        }
        out.push('>');
    } else {
        out.push('>');
        if wrapped {
            out.push('\n');
            out.push_str(INDENT_UNIT);
            out.push_str(inset);
            out.push_str(&content);
        } else {
            out.push_str(trim_content(&content));
        }
    }

    if node.has_children() {
        if !wrapped {
            out.push_str(inset);
        }
        out.push('\n');
        let child_inset = format!("{}{}", inset, INDENT_UNIT);
        for child in node.children() {
            write_node(child, out, indent, &child_inset);
        }
        if wrapped {
            out.pop();
        }
        out.push_str(inset);
    }

    if wrapped {
        out.push('\n');
        out.push_str(inset);
    }
    push_close_tag(out, node.name());
    out.push('\n');
}

fn push_attribute(out: &mut String, sep: &str, key: &str, value: &str) {
    out.push_str(sep);
    out.push(' ');
    out.push_str(key);
    out.push_str("=\"");
    out.push_str(&escape(value));
    out.push('"');
}

fn push_close_tag(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

/// Renders content the way it appears between the tags.
fn render_content(content: &Content) -> Cow<'_, str> {
    match content {
        Content::Absent => Cow::Borrowed(""),
        Content::Text(text) => escape(text),
        Content::Literal(markup) => Cow::Borrowed(markup),
        Content::CData(cdata) => Cow::Owned(format!(
            "<![CDATA[{}]]>",
            cdata.replace("]]>", "]]]]><![CDATA[>")
        )),
        Content::Number(n) => Cow::Owned(format_number(*n)),
    }
}

/// Integral values print without a fraction or grouping separators.
///
/// Node content never holds NaN or infinities; [`Node::set_content`]
/// rejects them.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        "0".to_string()
    } else if n.is_finite() && n.fract() == 0.0 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

/// Escapes `&`, `<`, `>` and `"`. Apostrophes are left alone.
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(s);
    }
    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Strips the whitespace set `" \t\n\r\0\x0B"` from both ends.
fn trim_content(s: &str) -> &str {
    s.trim_matches([' ', '\t', '\n', '\r', '\0', '\u{0b}'])
}

/// Looks up an output encoding by label, case-insensitively.
///
/// Only encodings that can be written are accepted; UTF-16 labels are
/// rejected because the encoder would silently produce UTF-8.
pub fn output_encoding(label: &str) -> Result<&'static Encoding> {
    let encoding = Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| Error::IllegalArgument(format!("Unsupported encoding \"{}\"", label)))?;
    if encoding.output_encoding() != encoding {
        return Err(Error::IllegalArgument(format!(
            "Cannot write encoding \"{}\"",
            label
        )));
    }
    Ok(encoding)
}

/// Converts UTF-8 text into `encoding`.
///
/// Characters the target cannot represent are written as numeric
/// character references (`&#9731;`).
pub fn transcode(text: &str, encoding: &str) -> Result<Vec<u8>> {
    let encoding = output_encoding(encoding)?;
    if encoding == UTF_8 {
        return Ok(text.as_bytes().to_vec());
    }
    let (bytes, _, _) = encoding.encode(text);
    Ok(bytes.into_owned())
}

/// Options for XML printing.
#[derive(Debug, Clone)]
pub struct XmlPrinterOptions {
    /// Serialization layout.
    pub indent: Indent,
    /// Output encoding.
    pub encoding: String,
    /// Whether to write the XML declaration first.
    pub declaration: bool,
}

impl Default for XmlPrinterOptions {
    fn default() -> Self {
        XmlPrinterOptions {
            indent: Indent::default(),
            encoding: crate::constants::DEFAULT_ENCODING.to_string(),
            declaration: false,
        }
    }
}

/// Writes node trees to a byte sink in a given layout and encoding.
pub struct XmlPrinter<W: Write> {
    writer: W,
    options: XmlPrinterOptions,
}

impl<W: Write> XmlPrinter<W> {
    /// Creates a printer with default options.
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, XmlPrinterOptions::default())
    }

    /// Creates a printer with the given options.
    pub fn with_options(writer: W, options: XmlPrinterOptions) -> Self {
        XmlPrinter { writer, options }
    }

    /// Prints a node and its descendants.
    pub fn print(&mut self, node: &Node) -> Result<()> {
        let mut source = String::new();
        if self.options.declaration {
            source.push_str(&declaration(
                crate::constants::DEFAULT_VERSION,
                &self.options.encoding,
            ));
            source.push('\n');
        }
        write_node(node, &mut source, self.options.indent, "");
        let bytes = transcode(&source, &self.options.encoding)?;
        self.writer.write_all(&bytes)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Consumes the printer, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Builds an XML declaration; the encoding name is upper-cased.
pub fn declaration(version: &str, encoding: &str) -> String {
    format!(
        "<?xml version=\"{}\" encoding=\"{}\"?>",
        version,
        encoding.to_uppercase()
    )
}

/// Prints a node to a string.
pub fn print_to_string(node: &Node, indent: Indent) -> String {
    node.get_source(indent)
}
