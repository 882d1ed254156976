//! Registry descriptors.

use std::fmt;

use super::codec::{self, Codec};
use super::object::{EnumSpec, XmlClass, XmlEnum};

/// Kind of value a descriptor may hold.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    Text,
    Bool,
    Int,
    Float,
    /// A member of one enumeration.
    Enum(EnumSpec),
    /// One nested object of a specific class.
    Object(&'static XmlClass),
    /// A list of nested objects of any of the listed classes.
    Objects(Vec<&'static XmlClass>),
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Bool => f.write_str("bool"),
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::Enum(spec) => write!(f, "enum {}", spec.name),
            Self::Object(class) => write!(f, "object {}", class.name),
            Self::Objects(classes) => {
                let names: Vec<_> = classes.iter().map(|class| class.name).collect();
                write!(f, "objects {}", names.join("|"))
            }
        }
    }
}

/// Binds one attribute to one node name, its value kind and its codec.
///
/// Equality is structural, so tests can assert that a class is wired to a
/// specific descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryItem {
    /// Key of the decoded value in the constructor-argument mapping.
    pub attr_name: &'static str,
    /// Child node or XML attribute name; `None` when the value is the node.
    pub node_name: Option<&'static str>,
    /// Accepted value kind.
    pub kind: ValueKind,
    /// Decode/encode pair.
    pub codec: Codec,
}

impl RegistryItem {
    /// Create a descriptor from its parts.
    #[must_use]
    pub fn new(
        attr_name: &'static str,
        node_name: Option<&'static str>,
        kind: ValueKind,
        codec: Codec,
    ) -> Self {
        Self {
            attr_name,
            node_name,
            kind,
            codec,
        }
    }

    /// Text held in a child node.
    #[must_use]
    pub fn text(attr_name: &'static str, node_name: &'static str) -> Self {
        Self::new(attr_name, Some(node_name), ValueKind::Text, codec::TEXT_SUBELEMENT)
    }

    /// Boolean held in a child node.
    #[must_use]
    pub fn boolean(attr_name: &'static str, node_name: &'static str) -> Self {
        Self::new(attr_name, Some(node_name), ValueKind::Bool, codec::BOOL_SUBELEMENT)
    }

    /// Integer held in a child node.
    #[must_use]
    pub fn integer(attr_name: &'static str, node_name: &'static str) -> Self {
        Self::new(attr_name, Some(node_name), ValueKind::Int, codec::INT_SUBELEMENT)
    }

    /// Float held in a child node.
    #[must_use]
    pub fn float(attr_name: &'static str, node_name: &'static str) -> Self {
        Self::new(attr_name, Some(node_name), ValueKind::Float, codec::FLOAT_SUBELEMENT)
    }

    /// Enumeration member held in a child node.
    #[must_use]
    pub fn enumeration<E: XmlEnum>(attr_name: &'static str, node_name: &'static str) -> Self {
        Self::new(
            attr_name,
            Some(node_name),
            ValueKind::Enum(EnumSpec::of::<E>()),
            codec::ENUM_SUBELEMENT,
        )
    }

    /// Text held in an XML attribute of the node itself.
    #[must_use]
    pub fn text_attribute(attr_name: &'static str, node_name: &'static str) -> Self {
        Self::new(attr_name, Some(node_name), ValueKind::Text, codec::TEXT_ATTRIBUTE)
    }

    /// Boolean held in an XML attribute of the node itself.
    #[must_use]
    pub fn bool_attribute(attr_name: &'static str, node_name: &'static str) -> Self {
        Self::new(attr_name, Some(node_name), ValueKind::Bool, codec::BOOL_ATTRIBUTE)
    }

    /// Integer held in an XML attribute of the node itself.
    #[must_use]
    pub fn int_attribute(attr_name: &'static str, node_name: &'static str) -> Self {
        Self::new(attr_name, Some(node_name), ValueKind::Int, codec::INT_ATTRIBUTE)
    }

    /// Float held in an XML attribute of the node itself.
    #[must_use]
    pub fn float_attribute(attr_name: &'static str, node_name: &'static str) -> Self {
        Self::new(attr_name, Some(node_name), ValueKind::Float, codec::FLOAT_ATTRIBUTE)
    }

    /// Enumeration member held in an XML attribute of the node itself.
    #[must_use]
    pub fn enum_attribute<E: XmlEnum>(attr_name: &'static str, node_name: &'static str) -> Self {
        Self::new(
            attr_name,
            Some(node_name),
            ValueKind::Enum(EnumSpec::of::<E>()),
            codec::ENUM_ATTRIBUTE,
        )
    }

    /// Text content of the node itself.
    #[must_use]
    pub fn node_text(attr_name: &'static str) -> Self {
        Self::new(attr_name, None, ValueKind::Text, codec::NODE_TEXT)
    }

    /// One nested object, located by the class's own tag name.
    #[must_use]
    pub fn object(attr_name: &'static str, class: &'static XmlClass) -> Self {
        Self::new(attr_name, None, ValueKind::Object(class), codec::OBJECT)
    }

    /// A list of nested objects of any of the given classes.
    ///
    /// Decoded members are grouped by class, in the order given here.
    #[must_use]
    pub fn objects(
        attr_name: &'static str,
        classes: impl IntoIterator<Item = &'static XmlClass>,
    ) -> Self {
        Self::new(
            attr_name,
            None,
            ValueKind::Objects(classes.into_iter().collect()),
            codec::OBJECT_LIST,
        )
    }
}
