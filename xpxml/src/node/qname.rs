//! Qualified names.

use std::fmt;

/// A namespace-qualified name.
///
/// ```
/// use xp_xml::QName;
///
/// let name = QName::new("http://schemas.xmlsoap.org/ws/2003/03/addressing", "To", Some("wsa"));
/// assert_eq!(name.qualified(), "wsa:To");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    namespace: String,
    localpart: String,
    prefix: Option<String>,
}

impl QName {
    /// Creates a new qualified name.
    pub fn new(namespace: impl Into<String>, localpart: impl Into<String>, prefix: Option<&str>) -> Self {
        QName {
            namespace: namespace.into(),
            localpart: localpart.into(),
            prefix: prefix.map(str::to_string),
        }
    }

    /// Returns the namespace URI.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the local part.
    pub fn localpart(&self) -> &str {
        &self.localpart
    }

    /// Returns the prefix, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Returns the element name as written in a document (`prefix:localpart`).
    pub fn qualified(&self) -> String {
        match &self.prefix {
            Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, self.localpart),
            _ => self.localpart.clone(),
        }
    }

    /// Returns the `xmlns` attribute binding the prefix, if any.
    pub fn xmlns_attribute(&self) -> (String, String) {
        let key = match &self.prefix {
            Some(prefix) if !prefix.is_empty() => format!("xmlns:{}", prefix),
            _ => "xmlns".to_string(),
        };
        (key, self.namespace.clone())
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = format!("{}/{}", self.namespace, self.localpart);
        write!(f, "{}", joined.trim_start_matches('/'))
    }
}
