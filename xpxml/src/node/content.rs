//! Content types for tree nodes.
//!
//! A node's content is one of: nothing, plain text (escaped on output),
//! literal markup inserted verbatim, a CDATA section, or a floating point
//! number. The `CData` and `PCData` wrappers select the latter two when
//! assigning content.

use std::fmt;

use crate::constants::XML_ILLEGAL_CHARS;
use crate::error::FormatError;

/// The content of a node.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Content {
    /// No content.
    #[default]
    Absent,
    /// Text, entity-escaped when serialized.
    Text(String),
    /// Literal markup, emitted verbatim.
    Literal(String),
    /// CDATA section payload.
    CData(String),
    /// Numeric value, rendered without a fraction when integral.
    Number(f64),
}

impl Content {
    /// Returns true if there is no content at all.
    pub fn is_absent(&self) -> bool {
        matches!(self, Content::Absent)
    }

    /// Returns the string payload for the text-like variants.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Content::Text(s) | Content::Literal(s) | Content::CData(s) => Some(s),
            Content::Absent | Content::Number(_) => None,
        }
    }

    /// Returns the number, if this is numeric content.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Content::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Checks text content for illegal control characters and numbers for
    /// NaN and infinities, which have no XML text form.
    ///
    /// Literal and CDATA content is stored as-is and never checked.
    pub fn validate(&self) -> Result<(), FormatError> {
        match self {
            Content::Text(text) => {
                if let Some((position, c)) = text
                    .char_indices()
                    .find(|(_, c)| XML_ILLEGAL_CHARS.contains(c))
                {
                    return Err(FormatError::illegal_content(position, u32::from(c)));
                }
            }
            Content::Number(n) if !n.is_finite() => {
                return Err(FormatError::non_finite_content(*n));
            }
            _ => {}
        }
        Ok(())
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Content::Absent => write!(f, "null"),
            Content::Text(s) => write!(f, "\"{}\"", s),
            Content::Literal(s) => write!(f, "{}", PCData::new(s.as_str())),
            Content::CData(s) => write!(f, "{}", CData::new(s.as_str())),
            Content::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Content wrapped into a CDATA section on output.
///
/// ```
/// use xp_xml::{CData, Indent, Node};
///
/// let node = Node::with_content("data", CData::new("<Hello World>")).unwrap();
/// assert_eq!(
///     node.get_source(Indent::None),
///     "<data><![CDATA[<Hello World>]]></data>"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CData {
    cdata: String,
}

impl CData {
    /// Creates a new CDATA wrapper.
    pub fn new(cdata: impl Into<String>) -> Self {
        CData {
            cdata: cdata.into(),
        }
    }

    /// Returns the wrapped payload.
    pub fn cdata(&self) -> &str {
        &self.cdata
    }
}

impl fmt::Display for CData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CData({})", self.cdata)
    }
}

/// Literal markup inserted into a node's content without escaping.
///
/// The markup is not validated; passing malformed XML yields a malformed
/// document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PCData {
    pcdata: String,
}

impl PCData {
    /// Creates a new literal markup wrapper.
    pub fn new(pcdata: impl Into<String>) -> Self {
        PCData {
            pcdata: pcdata.into(),
        }
    }

    /// Returns the wrapped markup.
    pub fn pcdata(&self) -> &str {
        &self.pcdata
    }
}

impl fmt::Display for PCData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PCData({})", self.pcdata)
    }
}

impl From<CData> for Content {
    fn from(value: CData) -> Self {
        Content::CData(value.cdata)
    }
}

impl From<PCData> for Content {
    fn from(value: PCData) -> Self {
        Content::Literal(value.pcdata)
    }
}

impl From<&str> for Content {
    fn from(value: &str) -> Self {
        Content::Text(value.to_string())
    }
}

impl From<String> for Content {
    fn from(value: String) -> Self {
        Content::Text(value)
    }
}

impl From<&String> for Content {
    fn from(value: &String) -> Self {
        Content::Text(value.clone())
    }
}

impl From<f64> for Content {
    fn from(value: f64) -> Self {
        Content::Number(value)
    }
}

impl From<f32> for Content {
    fn from(value: f32) -> Self {
        Content::Number(f64::from(value))
    }
}

impl From<bool> for Content {
    fn from(value: bool) -> Self {
        Content::Text(if value { "1" } else { "" }.to_string())
    }
}

macro_rules! integer_content {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Content {
                fn from(value: $t) -> Self {
                    Content::Text(value.to_string())
                }
            }
        )*
    };
}

integer_content!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl<T: Into<Content>> From<Option<T>> for Content {
    fn from(value: Option<T>) -> Self {
        value.map_or(Content::Absent, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(Content::from("a"), Content::Text("a".into()));
        assert_eq!(Content::from(42), Content::Text("42".into()));
        assert_eq!(Content::from(1.5), Content::Number(1.5));
        assert_eq!(Content::from(true), Content::Text("1".into()));
        assert_eq!(Content::from(false), Content::Text(String::new()));
        assert_eq!(Content::from(None::<&str>), Content::Absent);
        assert_eq!(Content::from(CData::new("x")), Content::CData("x".into()));
        assert_eq!(
            Content::from(PCData::new("<br/>")),
            Content::Literal("<br/>".into())
        );
    }

    #[test]
    fn test_validate_rejects_control_characters() {
        let err = Content::from("\u{0}").validate().unwrap_err();
        assert!(err.message().contains("position 0 / chr(0)"));

        let err = Content::from("a\u{0}b").validate().unwrap_err();
        assert!(err.message().contains("position 1 / chr(0)"));

        let err = Content::from("ab\u{1f}").validate().unwrap_err();
        assert!(err.message().contains("position 2 / chr(31)"));
    }

    #[test]
    fn test_validate_allows_whitespace_controls() {
        assert!(Content::from("a\tb\r\nc").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_finite_numbers() {
        let err = Content::from(f64::NAN).validate().unwrap_err();
        assert_eq!(err.message(), "Content is not a finite number: NaN");
        assert_eq!(err.code(), 0);
        assert!(Content::from(f64::INFINITY).validate().is_err());
        assert!(Content::from(f32::NEG_INFINITY).validate().is_err());
        assert!(Content::from(-0.5).validate().is_ok());
    }

    #[test]
    fn test_wrappers_are_not_validated() {
        assert!(Content::from(CData::new("\u{1}")).validate().is_ok());
        assert!(Content::from(PCData::new("\u{1}")).validate().is_ok());
    }

    #[test]
    fn test_byte_position_after_multibyte_text() {
        // 'Ü' occupies two bytes
        let err = Content::from("Ü\u{2}").validate().unwrap_err();
        assert!(err.message().contains("position 2 / chr(2)"));
    }
}
