//! Streaming XML parser driving a [`ParserCallback`].
//!
//! The parser uses quick-xml's streaming API and adds the document-level
//! checks quick-xml leaves to its users: a single root element, no text
//! outside of it, no `<` in attribute values and no unclosed elements at
//! the end of input. Errors are reported with expat's numbering.

use std::collections::VecDeque;
use std::io::{self, BufRead, Read};

use quick_xml::errors::{IllFormedError, SyntaxError};
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, trace, warn};

use super::callback::ParserCallback;
use super::entities::{is_xml_char, resolve_char_ref, EntityTable, ReferenceError};
use super::input::{InputSource, StringInputSource};
use crate::constants::{DEFAULT_ENCODING, STRING_ORIGIN};
use crate::error::{Error, FormatError, Result};
use crate::node::Attributes;

const SYNTAX_ERROR: (u32, &str) = (2, "syntax error");
const NO_ELEMENTS: (u32, &str) = (3, "no element found");
const INVALID_TOKEN: (u32, &str) = (4, "not well-formed (invalid token)");
const UNCLOSED_TOKEN: (u32, &str) = (5, "unclosed token");
const TAG_MISMATCH: (u32, &str) = (7, "mismatched tag");
const DUPLICATE_ATTRIBUTE: (u32, &str) = (8, "duplicate attribute");
const JUNK_AFTER_DOC_ELEMENT: (u32, &str) = (9, "junk after document element");
const UNDEFINED_ENTITY: (u32, &str) = (11, "undefined entity");
const RECURSIVE_ENTITY_REF: (u32, &str) = (12, "recursive entity reference");
const BAD_CHAR_REF: (u32, &str) = (14, "reference to invalid character number");
const EXTERNAL_ENTITY_IN_ATTRIBUTE: (u32, &str) = (16, "reference to external entity in attribute");

/// XML parser reporting events to a callback.
///
/// A parser holds configuration only and can be used for any number of
/// parses, sequentially or with different callbacks.
///
/// ```
/// use xp_xml::{Tree, XmlParser};
///
/// let mut tree = Tree::new();
/// XmlParser::new().parse_str(&mut tree, "<book><title>XML</title></book>", None).unwrap();
/// assert_eq!(tree.root().name(), "book");
/// ```
#[derive(Debug, Clone)]
pub struct XmlParser {
    encoding: String,
}

impl Default for XmlParser {
    fn default() -> Self {
        XmlParser {
            encoding: DEFAULT_ENCODING.to_string(),
        }
    }
}

impl XmlParser {
    /// Creates a parser reporting the default encoding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the encoding reported to callbacks and returns this parser.
    ///
    /// Events always carry Unicode strings; the input's own encoding is
    /// taken from its byte order mark or XML declaration.
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Sets the encoding reported to callbacks.
    pub fn set_encoding(&mut self, encoding: impl Into<String>) {
        self.encoding = encoding.into();
    }

    /// Returns the encoding reported to callbacks.
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// Parses a complete document held in a string.
    ///
    /// `origin` names the document in errors and defaults to `(string)`.
    pub fn parse_str<C>(&self, callback: &mut C, data: &str, origin: Option<&str>) -> Result<()>
    where
        C: ParserCallback + ?Sized,
    {
        let source = StringInputSource::with_origin(data, origin.unwrap_or(STRING_ORIGIN));
        self.parse(callback, source)
    }

    /// Parses a document from an input source, reading it incrementally.
    pub fn parse<C, S>(&self, callback: &mut C, source: S) -> Result<()>
    where
        C: ParserCallback + ?Sized,
        S: InputSource,
    {
        let origin = source.origin().to_string();
        debug!(origin = %origin, encoding = %self.encoding, "parse started");
        callback.on_begin(self);

        let result = source
            .open()
            .and_then(|input| Session::new(self, input, &origin).run(callback));

        match result {
            Ok(()) => {
                callback.on_finish(self);
                debug!(origin = %origin, "parse finished");
                Ok(())
            }
            Err(e) => {
                if let Some(format) = e.as_format() {
                    warn!(
                        origin = %origin,
                        code = format.code(),
                        line = format.line(),
                        column = format.column(),
                        "{}",
                        format.message()
                    );
                } else {
                    warn!(origin = %origin, "parse failed: {}", e);
                }
                callback.on_error(self, &e);
                Err(e)
            }
        }
    }
}

/// State of a single parse.
struct Session<'p, R: BufRead> {
    parser: &'p XmlParser,
    reader: Reader<LineTracker<R>>,
    origin: String,
    entities: EntityTable,
    depth: usize,
    root_seen: bool,
    /// Offset where the current event starts.
    event_start: u64,
}

impl<'p, R: BufRead> Session<'p, R> {
    fn new(parser: &'p XmlParser, input: R, origin: &str) -> Self {
        let mut reader = Reader::from_reader(LineTracker::new(input));
        let config = reader.config_mut();
        config.trim_text_start = false;
        config.trim_text_end = false;
        config.check_comments = true;
        config.check_end_names = true;
        Session {
            parser,
            reader,
            origin: origin.to_string(),
            entities: EntityTable::default(),
            depth: 0,
            root_seen: false,
            event_start: 0,
        }
    }

    fn run<C: ParserCallback + ?Sized>(mut self, callback: &mut C) -> Result<()> {
        let parser = self.parser;
        let mut buf = Vec::new();

        loop {
            self.event_start = self.reader.buffer_position() as u64;
            self.reader.get_mut().forget_before(self.event_start);
            let event = match self.reader.read_event_into(&mut buf) {
                Ok(event) => event,
                Err(e) => return Err(self.tokenizer_error(e)),
            };

            match event {
                Event::Start(ref e) => {
                    let (name, attributes) = self.start_tag(e)?;
                    self.depth += 1;
                    trace!(name = %name, depth = self.depth, "start element");
                    callback.on_start_element(parser, &name, attributes)?;
                }
                Event::Empty(ref e) => {
                    let (name, attributes) = self.start_tag(e)?;
                    trace!(name = %name, depth = self.depth + 1, "empty element");
                    callback.on_start_element(parser, &name, attributes)?;
                    callback.on_end_element(parser, &name)?;
                }
                Event::End(ref e) => {
                    let name = self.decode(e.name().as_ref())?;
                    trace!(name = %name, depth = self.depth, "end element");
                    self.depth = self.depth.saturating_sub(1);
                    callback.on_end_element(parser, &name)?;
                }
                Event::Text(ref e) => {
                    let text = self.character_data(e)?;
                    if self.depth == 0 {
                        if !text.trim().is_empty() {
                            return Err(self.outside_root_error());
                        }
                        callback.on_default(parser, &text)?;
                    } else {
                        if text.contains("]]>") {
                            return Err(self.error(INVALID_TOKEN));
                        }
                        callback.on_cdata(parser, &text)?;
                    }
                }
                Event::CData(ref e) => {
                    if self.depth == 0 {
                        return Err(self.outside_root_error());
                    }
                    let text = self.character_data(e)?;
                    callback.on_cdata(parser, &text)?;
                }
                Event::GeneralRef(ref e) => {
                    if self.depth == 0 {
                        return Err(self.outside_root_error());
                    }
                    let name = self.decode(e)?;
                    self.reference(callback, &name)?;
                }
                Event::Comment(ref e) => {
                    let text = self.character_data(e)?;
                    callback.on_default(parser, &format!("<!--{}-->", text))?;
                }
                Event::PI(ref e) => {
                    let text = self.character_data(e)?;
                    callback.on_default(parser, &format!("<?{}?>", text))?;
                }
                Event::Decl(ref e) => {
                    let text = self.decode(e)?;
                    callback.on_default(parser, &format!("<?{}?>", text))?;
                }
                Event::DocType(ref e) => {
                    if self.root_seen {
                        return Err(self.error(SYNTAX_ERROR));
                    }
                    let text = self.decode(e)?;
                    self.entities = EntityTable::parse(&text);
                    callback.on_default(parser, &format!("<!DOCTYPE {}>", text.trim_start()))?;
                }
                Event::Eof => {
                    if !self.root_seen || self.depth > 0 {
                        return Err(self.error(NO_ELEMENTS));
                    }
                    return Ok(());
                }
            }
            buf.clear();
        }
    }

    /// Decodes an opening tag, enforcing the single-root rule.
    fn start_tag(&mut self, e: &BytesStart) -> Result<(String, Attributes)> {
        if self.depth == 0 {
            if self.root_seen {
                return Err(self.error(JUNK_AFTER_DOC_ELEMENT));
            }
            self.root_seen = true;
        }

        let name = self.decode(e.name().as_ref())?;
        let mut attributes = Attributes::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|e| match e {
                AttrError::Duplicated(_, _) => self.error(DUPLICATE_ATTRIBUTE),
                _ => self.error(INVALID_TOKEN),
            })?;
            let key = self.decode(attr.key.as_ref())?;
            let raw = self.character_data(&attr.value)?;
            if raw.contains('<') {
                return Err(self.error(INVALID_TOKEN));
            }
            let value = self.attribute_value(&raw)?;
            attributes.insert(key, value);
        }
        Ok((name, attributes))
    }

    /// Expands references and normalizes literal whitespace to spaces.
    fn attribute_value(&self, raw: &str) -> Result<String> {
        let normalized = raw.replace(['\t', '\n'], " ");
        self.entities.expand(&normalized).map_err(|e| {
            let (code, message) = match e {
                ReferenceError::Undefined(_) => UNDEFINED_ENTITY,
                ReferenceError::External(_) => EXTERNAL_ENTITY_IN_ATTRIBUTE,
                ReferenceError::Recursive(_) => RECURSIVE_ENTITY_REF,
                ReferenceError::InvalidCharacter(_) => BAD_CHAR_REF,
                ReferenceError::Unterminated => INVALID_TOKEN,
            };
            self.error((code, message))
        })
    }

    /// Handles `&name;` in character data.
    ///
    /// Character references and predefined entities arrive as character
    /// data, internal entities are passed to the default handler unexpanded
    /// and external entities are skipped.
    fn reference<C: ParserCallback + ?Sized>(&self, callback: &mut C, name: &str) -> Result<()> {
        let parser = self.parser;
        if name.starts_with('#') {
            let c = resolve_char_ref(name).ok_or_else(|| self.error(BAD_CHAR_REF))?;
            let mut tmp = [0u8; 4];
            callback.on_cdata(parser, c.encode_utf8(&mut tmp))
        } else if let Some(value) = resolve_predefined_entity(name) {
            callback.on_cdata(parser, value)
        } else if self.entities.is_internal(name) {
            callback.on_default(parser, &format!("&{};", name))
        } else if self.entities.is_external(name) {
            trace!(name, "skipping external entity");
            Ok(())
        } else {
            Err(self.error(UNDEFINED_ENTITY))
        }
    }

    /// Decodes text, rejecting characters XML does not allow and turning
    /// `\r\n` and lone `\r` into `\n`.
    fn character_data(&self, bytes: &[u8]) -> Result<String> {
        let text = self.decode(bytes)?;
        if text.chars().any(|c| !is_xml_char(c)) {
            return Err(self.error(INVALID_TOKEN));
        }
        Ok(normalize_line_ends(text))
    }

    fn decode(&self, bytes: &[u8]) -> Result<String> {
        self.reader
            .decoder()
            .decode(bytes)
            .map(|s| s.into_owned())
            .map_err(|_| self.error(INVALID_TOKEN))
    }

    fn outside_root_error(&self) -> Error {
        if self.root_seen {
            self.error(JUNK_AFTER_DOC_ELEMENT)
        } else {
            self.error(SYNTAX_ERROR)
        }
    }

    fn error(&self, (code, message): (u32, &str)) -> Error {
        self.error_at(code, message, self.event_start)
    }

    fn error_at(&self, code: u32, message: &str, offset: u64) -> Error {
        let (line, column) = self.reader.get_ref().locate(offset);
        Error::Format(FormatError::new(
            message,
            code,
            Some(self.origin.clone()),
            line,
            column,
        ))
    }

    fn tokenizer_error(&self, e: quick_xml::Error) -> Error {
        let (code, message) = match &e {
            quick_xml::Error::Io(io) => return Error::Io(io::Error::new(io.kind(), io.to_string())),
            quick_xml::Error::IllFormed(IllFormedError::MismatchedEndTag { .. })
            | quick_xml::Error::IllFormed(IllFormedError::UnmatchedEndTag(_)) => TAG_MISMATCH,
            quick_xml::Error::IllFormed(IllFormedError::MissingEndTag(_)) => NO_ELEMENTS,
            quick_xml::Error::Syntax(SyntaxError::InvalidBangMarkup) => INVALID_TOKEN,
            quick_xml::Error::Syntax(_) => UNCLOSED_TOKEN,
            _ => INVALID_TOKEN,
        };
        trace!(error = %e, "tokenizer error");
        self.error_at(code, message, self.reader.error_position() as u64)
    }
}

fn normalize_line_ends(text: String) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text
    }
}

/// Records newline offsets of everything the tokenizer consumes so byte
/// offsets can be reported as line and column.
///
/// Only newlines from the current event on are kept; earlier ones are
/// counted in `forgotten`.
struct LineTracker<R> {
    inner: R,
    offset: u64,
    newlines: VecDeque<u64>,
    forgotten: u64,
}

impl<R: BufRead> LineTracker<R> {
    fn new(inner: R) -> Self {
        LineTracker {
            inner,
            offset: 0,
            newlines: VecDeque::new(),
            forgotten: 0,
        }
    }

    fn record(&mut self, bytes: &[u8]) {
        for (i, b) in bytes.iter().enumerate() {
            if *b == b'\n' {
                self.newlines.push_back(self.offset + i as u64);
            }
        }
        self.offset += bytes.len() as u64;
    }

    /// Drops newlines no longer needed to locate `offset` or anything after
    /// it. The last newline before `offset` is kept as its line start.
    fn forget_before(&mut self, offset: u64) {
        while self.newlines.len() > 1 && self.newlines[1] < offset {
            self.newlines.pop_front();
            self.forgotten += 1;
        }
    }

    /// Returns the 1-based line and column of a byte offset.
    fn locate(&self, offset: u64) -> (u64, u64) {
        let preceding = self.newlines.partition_point(|&n| n < offset);
        let line_start = preceding
            .checked_sub(1)
            .map_or(0, |i| self.newlines[i] + 1);
        (
            self.forgotten + preceding as u64 + 1,
            offset.saturating_sub(line_start) + 1,
        )
    }
}

impl<R: BufRead> Read for LineTracker<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.record(&buf[..n]);
        Ok(n)
    }
}

impl<R: BufRead> BufRead for LineTracker<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        if let Ok(available) = self.inner.fill_buf() {
            let consumed = &available[..amt.min(available.len())];
            for (i, b) in consumed.iter().enumerate() {
                if *b == b'\n' {
                    self.newlines.push_back(self.offset + i as u64);
                }
            }
        }
        self.offset += amt as u64;
        self.inner.consume(amt);
    }
}
