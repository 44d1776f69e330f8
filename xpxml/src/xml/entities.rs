//! General entities declared in a document's internal DTD subset.

use std::collections::HashMap;

use quick_xml::escape::resolve_predefined_entity;

/// Nesting limit for entity values referring to other entities.
const MAX_EXPANSION_DEPTH: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entity {
    Internal(String),
    External,
}

/// Why a reference could not be expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ReferenceError {
    Undefined(String),
    External(String),
    Recursive(String),
    InvalidCharacter(String),
    Unterminated,
}

/// Entity declarations collected from `<!DOCTYPE ... [ ... ]>`.
#[derive(Debug, Clone, Default)]
pub(crate) struct EntityTable {
    entities: HashMap<String, Entity>,
}

impl EntityTable {
    /// Collects `<!ENTITY name "value">` and `<!ENTITY name SYSTEM|PUBLIC ...>`
    /// declarations from doctype content. Parameter entities are ignored and
    /// the first declaration of a name wins.
    pub(crate) fn parse(doctype: &str) -> Self {
        let mut entities = HashMap::new();
        let mut rest = doctype;

        while let Some(start) = rest.find("<!ENTITY") {
            rest = rest[start + "<!ENTITY".len()..].trim_start();
            if let Some(after) = rest.strip_prefix('%') {
                rest = after;
                continue;
            }

            let name_end = rest
                .find(|c: char| c.is_whitespace() || c == '>')
                .unwrap_or(rest.len());
            let name = &rest[..name_end];
            rest = rest[name_end..].trim_start();

            let entity = match rest.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let body = &rest[1..];
                    let Some(close) = body.find(quote) else {
                        break;
                    };
                    rest = &body[close + 1..];
                    Entity::Internal(body[..close].to_string())
                }
                _ => Entity::External,
            };

            if !name.is_empty() {
                entities.entry(name.to_string()).or_insert(entity);
            }
            match rest.find('>') {
                Some(end) => rest = &rest[end + 1..],
                None => break,
            }
        }

        EntityTable { entities }
    }

    /// Returns true if `name` is a declared internal entity.
    pub(crate) fn is_internal(&self, name: &str) -> bool {
        matches!(self.entities.get(name), Some(Entity::Internal(_)))
    }

    /// Returns true if `name` is a declared external entity.
    pub(crate) fn is_external(&self, name: &str) -> bool {
        matches!(self.entities.get(name), Some(Entity::External))
    }

    /// Replaces all references in `text`: predefined entities, character
    /// references and internal entities, the latter recursively.
    pub(crate) fn expand(&self, text: &str) -> Result<String, ReferenceError> {
        let mut out = String::with_capacity(text.len());
        self.expand_into(text, &mut out, 0)?;
        Ok(out)
    }

    fn expand_into(&self, text: &str, out: &mut String, depth: usize) -> Result<(), ReferenceError> {
        let mut rest = text;
        while let Some(amp) = rest.find('&') {
            out.push_str(&rest[..amp]);
            let after = &rest[amp + 1..];
            let end = after.find(';').ok_or(ReferenceError::Unterminated)?;
            let name = &after[..end];
            rest = &after[end + 1..];

            if name.starts_with('#') {
                let c = resolve_char_ref(name)
                    .ok_or_else(|| ReferenceError::InvalidCharacter(name.to_string()))?;
                out.push(c);
            } else if let Some(value) = resolve_predefined_entity(name) {
                out.push_str(value);
            } else {
                match self.entities.get(name) {
                    Some(Entity::Internal(value)) => {
                        if depth >= MAX_EXPANSION_DEPTH {
                            return Err(ReferenceError::Recursive(name.to_string()));
                        }
                        self.expand_into(value, out, depth + 1)?;
                    }
                    Some(Entity::External) => return Err(ReferenceError::External(name.to_string())),
                    None => return Err(ReferenceError::Undefined(name.to_string())),
                }
            }
        }
        out.push_str(rest);
        Ok(())
    }
}

/// Resolves `#123` or `#x7B` to a character allowed in XML documents.
pub(crate) fn resolve_char_ref(reference: &str) -> Option<char> {
    let digits = reference.strip_prefix('#')?;
    let code = match digits.strip_prefix('x') {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<u32>().ok()?,
    };
    char::from_u32(code).filter(|&c| is_xml_char(c))
}

/// Whether `c` matches the XML `Char` production.
pub(crate) fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= '\u{20}' && c != '\u{fffe}' && c != '\u{ffff}')
}
