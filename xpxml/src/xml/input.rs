//! Input sources for the parser.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

use crate::constants::{STREAM_ORIGIN, STRING_ORIGIN};
use crate::error::Result;
use crate::tree::Tree;
use crate::xml::Indent;

/// A named, readable XML document.
pub trait InputSource {
    /// Buffered reader over the document bytes.
    type Reader: BufRead;

    /// Returns the identifier used in error messages.
    fn origin(&self) -> &str;

    /// Opens the document for reading.
    fn open(self) -> Result<Self::Reader>;
}

/// A document held in memory.
#[derive(Debug, Clone)]
pub struct StringInputSource {
    data: String,
    origin: String,
}

impl StringInputSource {
    pub fn new(data: impl Into<String>) -> Self {
        Self::with_origin(data, STRING_ORIGIN)
    }

    pub fn with_origin(data: impl Into<String>, origin: impl Into<String>) -> Self {
        StringInputSource {
            data: data.into(),
            origin: origin.into(),
        }
    }
}

impl InputSource for StringInputSource {
    type Reader = Cursor<String>;

    fn origin(&self) -> &str {
        &self.origin
    }

    fn open(self) -> Result<Self::Reader> {
        Ok(Cursor::new(self.data))
    }
}

/// A document read incrementally from any byte stream.
#[derive(Debug)]
pub struct StreamInputSource<R> {
    stream: R,
    origin: String,
}

impl<R: Read> StreamInputSource<R> {
    pub fn new(stream: R) -> Self {
        Self::with_origin(stream, STREAM_ORIGIN)
    }

    pub fn with_origin(stream: R, origin: impl Into<String>) -> Self {
        StreamInputSource {
            stream,
            origin: origin.into(),
        }
    }
}

impl<R: Read> InputSource for StreamInputSource<R> {
    type Reader = BufReader<R>;

    fn origin(&self) -> &str {
        &self.origin
    }

    fn open(self) -> Result<Self::Reader> {
        Ok(BufReader::new(self.stream))
    }
}

/// A document stored in a file. The origin is the file path.
#[derive(Debug, Clone)]
pub struct FileInputSource {
    path: PathBuf,
    origin: String,
}

impl FileInputSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let origin = path.display().to_string();
        FileInputSource { path, origin }
    }
}

impl InputSource for FileInputSource {
    type Reader = BufReader<File>;

    fn origin(&self) -> &str {
        &self.origin
    }

    fn open(self) -> Result<Self::Reader> {
        Ok(BufReader::new(File::open(&self.path)?))
    }
}

/// An in-memory tree, serialized with [`Indent::Default`] for re-parsing.
#[derive(Debug, Clone)]
pub struct TreeInputSource {
    source: String,
    origin: String,
}

impl TreeInputSource {
    pub fn new(tree: &Tree) -> Self {
        Self::with_origin(tree, STRING_ORIGIN)
    }

    pub fn with_origin(tree: &Tree, origin: impl Into<String>) -> Self {
        TreeInputSource {
            source: tree.get_source(Indent::Default),
            origin: origin.into(),
        }
    }
}

impl InputSource for TreeInputSource {
    type Reader = Cursor<String>;

    fn origin(&self) -> &str {
        &self.origin
    }

    fn open(self) -> Result<Self::Reader> {
        Ok(Cursor::new(self.source))
    }
}
