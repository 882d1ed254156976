//! Types threaded through decode and encode.

use std::collections::HashMap;
use std::fmt;

use super::object::{XmlEnum, XmlObject, XmlType};
use crate::config::{default_name_spaces, NameSpaces, Verbosity, KMLNS};
use crate::xml::qualified_name;

/// What lenient decode does with text that is not a member of an enumeration.
///
/// Strict decode always raises. Lenient decode raises too unless the policy
/// is [`UnknownEnumPolicy::Omit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownEnumPolicy {
    /// Raise `UnknownEnumerationValue` in both modes.
    #[default]
    Raise,
    /// Omit the attribute in lenient mode, like other malformed primitives.
    Omit,
}

/// Context passed through decode operations.
#[derive(Debug, Clone)]
pub struct DecodeContext {
    /// Namespace prefix string (Clark form) joined with node names.
    pub ns: String,

    /// Prefix to URI mapping handed to constructed objects.
    pub name_spaces: NameSpaces,

    /// Raise on malformed values instead of omitting them.
    pub strict: bool,

    /// Lenient handling of unknown enumeration values.
    pub unknown_enum: UnknownEnumPolicy,
}

impl DecodeContext {
    /// Create a new decode context with the default namespace map.
    #[must_use]
    pub fn new(ns: impl Into<String>, strict: bool) -> Self {
        Self {
            ns: ns.into(),
            name_spaces: default_name_spaces(),
            strict,
            unknown_enum: UnknownEnumPolicy::default(),
        }
    }

    /// Set the lenient unknown-enumeration policy.
    #[must_use]
    pub fn with_unknown_enum(mut self, policy: UnknownEnumPolicy) -> Self {
        self.unknown_enum = policy;
        self
    }

    /// Qualified name of a node in this context's namespace.
    #[must_use]
    pub fn qualified(&self, name: &str) -> String {
        qualified_name(&self.ns, name)
    }
}

impl Default for DecodeContext {
    fn default() -> Self {
        Self::new(KMLNS, true)
    }
}

/// Formatting hints passed through encode operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeOptions {
    /// Number of decimals for coordinate-like values, if the type cares.
    pub precision: Option<usize>,
    /// Amount of optional content to emit.
    pub verbosity: Verbosity,
}

impl EncodeOptions {
    /// Create encode options.
    #[must_use]
    pub fn new(precision: Option<usize>, verbosity: Verbosity) -> Self {
        Self {
            precision,
            verbosity,
        }
    }
}

/// Borrowed view of an attribute held by an object, read by encoders.
pub enum AttrValue<'a> {
    Text(&'a str),
    Bool(bool),
    Int(i64),
    Float(f64),
    Enum(&'static str),
    Object(&'a dyn XmlObject),
    Objects(Vec<&'a dyn XmlObject>),
}

impl<'a> AttrValue<'a> {
    /// View a slice of participating objects as an object list.
    #[must_use]
    pub fn objects<T: XmlObject>(items: &'a [T]) -> Self {
        Self::Objects(items.iter().map(|item| item as &dyn XmlObject).collect())
    }

    /// Text form written into the tree, or `None` when nothing is emitted.
    ///
    /// Booleans are written as `1`/`0`. Empty text emits nothing. Composite
    /// values have no text form.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Text(text) => (!text.is_empty()).then(|| (*text).to_string()),
            Self::Enum(value) => (!value.is_empty()).then(|| (*value).to_string()),
            Self::Bool(value) => Some(if *value { "1" } else { "0" }.to_string()),
            Self::Int(value) => Some(value.to_string()),
            Self::Float(value) => Some(value.to_string()),
            Self::Object(_) | Self::Objects(_) => None,
        }
    }
}

impl fmt::Debug for AttrValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            Self::Int(value) => f.debug_tuple("Int").field(value).finish(),
            Self::Float(value) => f.debug_tuple("Float").field(value).finish(),
            Self::Enum(value) => f.debug_tuple("Enum").field(value).finish(),
            Self::Object(object) => f.debug_tuple("Object").field(object).finish(),
            Self::Objects(objects) => f.debug_tuple("Objects").field(objects).finish(),
        }
    }
}

/// A decoded value, owned by the constructor-argument mapping.
#[derive(Debug)]
pub enum Value {
    Text(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Enum(&'static str),
    Object(Box<dyn XmlObject>),
    Objects(Vec<Box<dyn XmlObject>>),
}

/// Constructor arguments produced by decode, keyed by attribute name.
#[derive(Debug, Default)]
pub struct Kwargs {
    values: HashMap<&'static str, Value>,
}

impl Kwargs {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the one it replaced.
    pub fn insert(&mut self, name: &'static str, value: Value) -> Option<Value> {
        self.values.insert(name, value)
    }

    /// Get a value without taking it.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Check whether an attribute was decoded.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of decoded attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether nothing was decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Take a text value.
    pub fn take_text(&mut self, name: &str) -> Option<String> {
        match self.values.remove(name)? {
            Value::Text(text) => Some(text),
            other => mismatched(name, "text", &other),
        }
    }

    /// Take a boolean value.
    pub fn take_bool(&mut self, name: &str) -> Option<bool> {
        match self.values.remove(name)? {
            Value::Bool(value) => Some(value),
            other => mismatched(name, "bool", &other),
        }
    }

    /// Take an integer value.
    pub fn take_int(&mut self, name: &str) -> Option<i64> {
        match self.values.remove(name)? {
            Value::Int(value) => Some(value),
            other => mismatched(name, "int", &other),
        }
    }

    /// Take a float value.
    pub fn take_float(&mut self, name: &str) -> Option<f64> {
        match self.values.remove(name)? {
            Value::Float(value) => Some(value),
            other => mismatched(name, "float", &other),
        }
    }

    /// Take an enumerated value.
    pub fn take_enum<E: XmlEnum>(&mut self, name: &str) -> Option<E> {
        match self.values.remove(name)? {
            Value::Enum(value) => E::from_xml(value),
            other => mismatched(name, E::NAME, &other),
        }
    }

    /// Take a nested object of a known type.
    pub fn take_object<T: XmlType>(&mut self, name: &str) -> Option<T> {
        match self.values.remove(name)? {
            Value::Object(object) => object.into_any().downcast::<T>().ok().map(|boxed| *boxed),
            other => mismatched(name, T::xml_class().name, &other),
        }
    }

    /// Take a nested object list whose members all have the same type.
    ///
    /// Members of other types are dropped.
    pub fn take_objects<T: XmlType>(&mut self, name: &str) -> Vec<T> {
        self.take_any_objects(name)
            .into_iter()
            .filter_map(|object| object.into_any().downcast::<T>().ok().map(|boxed| *boxed))
            .collect()
    }

    /// Take a nested object list with members of mixed types.
    pub fn take_any_objects(&mut self, name: &str) -> Vec<Box<dyn XmlObject>> {
        match self.values.remove(name) {
            Some(Value::Objects(objects)) => objects,
            Some(other) => mismatched(name, "object list", &other).unwrap_or_default(),
            None => Vec::new(),
        }
    }
}

fn mismatched<T>(name: &str, expected: &str, found: &Value) -> Option<T> {
    tracing::warn!(attribute = name, expected, found = ?found, "Decoded value has unexpected kind, ignoring");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_context_new() {
        let ctx = DecodeContext::new(KMLNS, false);
        assert_eq!(ctx.ns, KMLNS);
        assert!(!ctx.strict);
        assert_eq!(ctx.unknown_enum, UnknownEnumPolicy::Raise);
        assert!(ctx.name_spaces.contains_key("kml"));
    }

    #[test]
    fn test_decode_context_qualified() {
        let ctx = DecodeContext::new("{urn:x}", true);
        assert_eq!(ctx.qualified("name"), "{urn:x}name");
    }

    #[test]
    fn test_attr_value_to_text() {
        assert_eq!(AttrValue::Text("a").to_text(), Some("a".to_string()));
        assert_eq!(AttrValue::Text("").to_text(), None);
        assert_eq!(AttrValue::Bool(true).to_text(), Some("1".to_string()));
        assert_eq!(AttrValue::Bool(false).to_text(), Some("0".to_string()));
        assert_eq!(AttrValue::Int(-3).to_text(), Some("-3".to_string()));
        assert_eq!(AttrValue::Float(0.5).to_text(), Some("0.5".to_string()));
        assert_eq!(AttrValue::Enum("onChange").to_text(), Some("onChange".to_string()));
        assert_eq!(AttrValue::Objects(Vec::new()).to_text(), None);
    }

    #[test]
    fn test_kwargs_take() {
        let mut kwargs = Kwargs::new();
        kwargs.insert("name", Value::Text("x".to_string()));
        kwargs.insert("count", Value::Int(3));
        assert_eq!(kwargs.len(), 2);

        assert_eq!(kwargs.take_text("name"), Some("x".to_string()));
        assert!(!kwargs.contains("name"));
        assert_eq!(kwargs.take_int("count"), Some(3));
        assert!(kwargs.is_empty());
    }

    #[test]
    fn test_kwargs_take_wrong_kind() {
        let mut kwargs = Kwargs::new();
        kwargs.insert("count", Value::Int(3));
        assert_eq!(kwargs.take_text("count"), None);
        assert!(kwargs.take_any_objects("missing").is_empty());
    }

    #[test]
    fn test_kwargs_insert_overwrites() {
        let mut kwargs = Kwargs::new();
        assert!(kwargs.insert("a", Value::Int(1)).is_none());
        assert!(matches!(kwargs.insert("a", Value::Int(2)), Some(Value::Int(1))));
        assert!(matches!(kwargs.get("a"), Some(Value::Int(2))));
    }
}
