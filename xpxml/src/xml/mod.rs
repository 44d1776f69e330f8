//! XML parsing and output.
//!
//! [`XmlParser`] streams a document through a [`ParserCallback`];
//! [`Tree`](crate::Tree) is the callback that builds nodes. The printer
//! turns nodes back into text in one of three [`Indent`] layouts.

mod callback;
mod entities;
mod input;
mod parser;
mod printer;

pub use callback::ParserCallback;
pub use input::{FileInputSource, InputSource, StreamInputSource, StringInputSource, TreeInputSource};
pub use parser::XmlParser;
pub use printer::{
    declaration, escape, format_number, output_encoding, print_to_string, transcode, Indent,
    XmlPrinter, XmlPrinterOptions,
};
