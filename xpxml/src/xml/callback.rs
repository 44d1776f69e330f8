//! Parser event contract.

use super::parser::XmlParser;
use crate::error::{Error, Result};
use crate::node::Attributes;

/// Receives events from an [`XmlParser`] in document order.
///
/// `on_begin` is called once before any other event. A successful parse
/// ends with `on_finish`; a failed one with `on_error`, after which the
/// error is also returned from the parse call. Returning an error from an
/// element or character data handler aborts the parse the same way.
pub trait ParserCallback {
    /// Called once before the first event.
    fn on_begin(&mut self, parser: &XmlParser);

    /// Called for each opening tag, including self-closing ones.
    fn on_start_element(&mut self, parser: &XmlParser, name: &str, attributes: Attributes) -> Result<()>;

    /// Called for each closing tag, including self-closing ones.
    fn on_end_element(&mut self, parser: &XmlParser, name: &str) -> Result<()>;

    /// Called for character data. One text run may arrive in several calls.
    fn on_cdata(&mut self, parser: &XmlParser, cdata: &str) -> Result<()>;

    /// Called with the raw text of comments, processing instructions, the
    /// XML declaration, the doctype, whitespace outside the root element and
    /// references to internal entities.
    fn on_default(&mut self, _parser: &XmlParser, _data: &str) -> Result<()> {
        Ok(())
    }

    /// Called once when parsing fails.
    fn on_error(&mut self, parser: &XmlParser, error: &Error);

    /// Called once after the last event of a successful parse.
    fn on_finish(&mut self, parser: &XmlParser);
}
