//! Constants used throughout the toolkit.

/// Working encoding of all in-memory strings, and the default output encoding.
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Version written into the XML declaration.
pub const DEFAULT_VERSION: &str = "1.0";

/// Root element name of a freshly constructed tree.
pub const DEFAULT_ROOT_NAME: &str = "document";

/// Indentation added per nesting level.
pub const INDENT_UNIT: &str = "  ";

/// Attribute count at which attributes go one per line.
pub const ATTRIBUTE_WRAP_THRESHOLD: usize = 3;

/// Control characters rejected in text content (tab, LF and CR are allowed).
pub const XML_ILLEGAL_CHARS: [char; 29] = [
    '\u{00}', '\u{01}', '\u{02}', '\u{03}', '\u{04}', '\u{05}', '\u{06}', '\u{07}', '\u{08}',
    '\u{0b}', '\u{0c}', '\u{0e}', '\u{0f}', '\u{10}', '\u{11}', '\u{12}', '\u{13}', '\u{14}',
    '\u{15}', '\u{16}', '\u{17}', '\u{18}', '\u{19}', '\u{1a}', '\u{1b}', '\u{1c}', '\u{1d}',
    '\u{1e}', '\u{1f}',
];

/// Source identifier for documents parsed from strings.
pub const STRING_ORIGIN: &str = "(string)";

/// Source identifier for documents parsed from streams.
pub const STREAM_ORIGIN: &str = "(stream)";
