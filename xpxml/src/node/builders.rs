//! Structural builders converting plain data into node trees.

use serde::Serialize;
use serde_json::Value;

use super::{Content, Node};
use crate::error::{Error, Result};

impl Node {
    /// Builds a node named `name` with one child per entry of `value`.
    ///
    /// Map entries are named by their key. Sequence items, and map entries
    /// whose key is numeric or empty, are named after the container with
    /// trailing `s` characters stripped (`items` → `item`). Nested maps and
    /// sequences recurse; scalars become content. A scalar `value` becomes
    /// the content of the returned node itself.
    ///
    /// ```
    /// use serde_json::json;
    /// use xp_xml::{Indent, Node};
    ///
    /// let node = Node::from_array(&json!([1, 2]), "items").unwrap();
    /// assert_eq!(
    ///     node.get_source(Indent::None),
    ///     "<items><item>1</item><item>2</item></items>"
    /// );
    /// ```
    pub fn from_array(value: &Value, name: &str) -> Result<Node> {
        let mut node = Node::new(name);
        let singular = name.trim_end_matches('s');
        match value {
            Value::Object(map) => {
                for (key, entry) in map {
                    let child_name = if key.is_empty() || is_numeric(key) {
                        singular
                    } else {
                        key.as_str()
                    };
                    node.add_child(entry_node(entry, child_name)?);
                }
            }
            Value::Array(items) => {
                for entry in items {
                    node.add_child(entry_node(entry, singular)?);
                }
            }
            scalar => node.set_content(scalar_content(scalar))?,
        }
        Ok(node)
    }

    /// Builds a node from the serializable state of `object`.
    ///
    /// Fields become children in declaration order. When `name` is omitted
    /// the short type name is used (module path and generic arguments
    /// stripped). Types that serialize to a string (for example through a
    /// `Display`-based `Serialize` impl) become text content.
    pub fn from_object<T: Serialize + ?Sized>(object: &T, name: Option<&str>) -> Result<Node> {
        let value = serde_json::to_value(object)
            .map_err(|e| Error::IllegalArgument(format!("Cannot convert object: {}", e)))?;
        match name {
            Some(name) => Node::from_array(&value, name),
            None => Node::from_array(&value, short_type_name::<T>()),
        }
    }
}

fn entry_node(value: &Value, name: &str) -> Result<Node> {
    match value {
        Value::Object(_) | Value::Array(_) => Node::from_array(value, name),
        scalar => Node::with_content(name, scalar_content(scalar)),
    }
}

fn scalar_content(value: &Value) -> Content {
    match value {
        Value::Null => Content::Absent,
        Value::Bool(b) => Content::from(*b),
        Value::Number(n) if n.is_i64() || n.is_u64() => Content::Text(n.to_string()),
        Value::Number(n) => n.as_f64().map_or(Content::Absent, Content::Number),
        Value::String(s) => Content::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => Content::Absent,
    }
}

/// Numeric keys (`"0"`, `"12"`, `"1.5"`, `"-3"`) name items by container.
fn is_numeric(key: &str) -> bool {
    let digits = key.strip_prefix(['-', '+']).unwrap_or(key);
    !digits.is_empty()
        && digits.chars().any(|c| c.is_ascii_digit())
        && digits
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '-' | '+'))
        && key.parse::<f64>().is_ok()
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
