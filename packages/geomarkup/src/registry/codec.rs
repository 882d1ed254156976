//! Codec library: one decode/encode pair per value kind and location.
//!
//! Decoders return `Ok(None)` when the attribute has no value in the node.
//! A missing child, a missing XML attribute, or whitespace-only text all mean
//! "no value", never an error. Malformed primitives raise in strict mode and
//! are omitted in lenient mode.
//!
//! Encoders append nothing when the object's attribute is absent.

use std::fmt;

use super::core::Registry;
use super::item::{RegistryItem, ValueKind};
use super::object::XmlObject;
use super::types::{AttrValue, DecodeContext, EncodeOptions, UnknownEnumPolicy, Value};
use crate::error::{GeomarkupError, Result};
use crate::xml::{qualified_name, Element};

/// Pull zero or one value for a descriptor out of a node.
pub type DecodeFn =
    fn(&Registry, &Element, &DecodeContext, &RegistryItem) -> Result<Option<Value>>;

/// Write a descriptor's value from an object into a node.
pub type EncodeFn = fn(&Registry, &dyn XmlObject, &mut Element, &EncodeOptions, &RegistryItem);

/// A named decode/encode pair.
#[derive(Clone, Copy)]
pub struct Codec {
    pub name: &'static str,
    pub decode: DecodeFn,
    pub encode: EncodeFn,
}

impl PartialEq for Codec {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Codec").field(&self.name).finish()
    }
}

pub const TEXT_SUBELEMENT: Codec = Codec {
    name: "text_subelement",
    decode: subelement_text_kwarg,
    encode: text_subelement,
};

pub const BOOL_SUBELEMENT: Codec = Codec {
    name: "bool_subelement",
    decode: subelement_bool_kwarg,
    encode: text_subelement,
};

pub const INT_SUBELEMENT: Codec = Codec {
    name: "int_subelement",
    decode: subelement_int_kwarg,
    encode: text_subelement,
};

pub const FLOAT_SUBELEMENT: Codec = Codec {
    name: "float_subelement",
    decode: subelement_float_kwarg,
    encode: text_subelement,
};

pub const ENUM_SUBELEMENT: Codec = Codec {
    name: "enum_subelement",
    decode: subelement_enum_kwarg,
    encode: text_subelement,
};

pub const TEXT_ATTRIBUTE: Codec = Codec {
    name: "text_attribute",
    decode: attribute_text_kwarg,
    encode: text_attribute,
};

pub const BOOL_ATTRIBUTE: Codec = Codec {
    name: "bool_attribute",
    decode: attribute_bool_kwarg,
    encode: text_attribute,
};

pub const INT_ATTRIBUTE: Codec = Codec {
    name: "int_attribute",
    decode: attribute_int_kwarg,
    encode: text_attribute,
};

pub const FLOAT_ATTRIBUTE: Codec = Codec {
    name: "float_attribute",
    decode: attribute_float_kwarg,
    encode: text_attribute,
};

pub const ENUM_ATTRIBUTE: Codec = Codec {
    name: "enum_attribute",
    decode: attribute_enum_kwarg,
    encode: text_attribute,
};

pub const NODE_TEXT: Codec = Codec {
    name: "node_text",
    decode: node_text_kwarg,
    encode: node_text,
};

pub const OBJECT: Codec = Codec {
    name: "xml_subelement",
    decode: xml_subelement_kwarg,
    encode: xml_subelement,
};

pub const OBJECT_LIST: Codec = Codec {
    name: "xml_subelement_list",
    decode: xml_subelement_list_kwarg,
    encode: xml_subelement_list,
};

/// Where a primitive value's text lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Place {
    /// Text of the first child named `node_name`.
    Subelement,
    /// XML attribute `node_name` on the node.
    Attribute,
    /// Text of the node itself.
    Node,
}

fn read_text<'e>(
    place: Place,
    element: &'e Element,
    ctx: &DecodeContext,
    item: &RegistryItem,
) -> Option<&'e str> {
    match place {
        Place::Subelement => element.find(&ctx.qualified(item.node_name?))?.trimmed_text(),
        Place::Attribute => element
            .attribute(item.node_name?)
            .map(str::trim)
            .filter(|text| !text.is_empty()),
        Place::Node => element.trimmed_text(),
    }
}

/// Name of the offending node for error messages.
fn node_label(place: Place, element: &Element, ctx: &DecodeContext, item: &RegistryItem) -> String {
    let node_name = item.node_name.unwrap_or_default();
    match place {
        Place::Subelement => ctx.qualified(node_name),
        Place::Attribute => format!("{}@{node_name}", element.tag()),
        Place::Node => element.tag().to_string(),
    }
}

/// Raise in strict mode, omit the value otherwise.
fn reject(
    place: Place,
    element: &Element,
    ctx: &DecodeContext,
    item: &RegistryItem,
    kind: &'static str,
    text: &str,
) -> Result<Option<Value>> {
    let node = node_label(place, element, ctx, item);
    if ctx.strict {
        return Err(GeomarkupError::MalformedValue {
            node,
            kind,
            text: text.to_string(),
        });
    }
    tracing::warn!(
        node = %node,
        attribute = item.attr_name,
        kind,
        text,
        "Malformed value in lenient mode, omitting"
    );
    Ok(None)
}

fn decode_text(
    place: Place,
    element: &Element,
    ctx: &DecodeContext,
    item: &RegistryItem,
) -> Result<Option<Value>> {
    Ok(read_text(place, element, ctx, item).map(|text| Value::Text(text.to_string())))
}

/// Strict booleans are integers; zero is false, anything else true.
fn parse_bool_strict(text: &str) -> Option<bool> {
    text.parse::<i64>().ok().map(|value| value != 0)
}

/// Lenient booleans accept `true`/`false`/`1`/`0` in any case, then fall
/// back to a float truncated to an integer.
fn parse_bool_lenient(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => text
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(|value| value.trunc() != 0.0),
    }
}

fn decode_bool(
    place: Place,
    element: &Element,
    ctx: &DecodeContext,
    item: &RegistryItem,
) -> Result<Option<Value>> {
    let Some(text) = read_text(place, element, ctx, item) else {
        return Ok(None);
    };
    let parsed = if ctx.strict {
        parse_bool_strict(text)
    } else {
        parse_bool_lenient(text)
    };
    match parsed {
        Some(value) => Ok(Some(Value::Bool(value))),
        None => reject(place, element, ctx, item, "bool", text),
    }
}

fn decode_int(
    place: Place,
    element: &Element,
    ctx: &DecodeContext,
    item: &RegistryItem,
) -> Result<Option<Value>> {
    let Some(text) = read_text(place, element, ctx, item) else {
        return Ok(None);
    };
    match text.parse::<i64>() {
        Ok(value) => Ok(Some(Value::Int(value))),
        Err(_) => reject(place, element, ctx, item, "int", text),
    }
}

fn decode_float(
    place: Place,
    element: &Element,
    ctx: &DecodeContext,
    item: &RegistryItem,
) -> Result<Option<Value>> {
    let Some(text) = read_text(place, element, ctx, item) else {
        return Ok(None);
    };
    match text.parse::<f64>() {
        Ok(value) => Ok(Some(Value::Float(value))),
        Err(_) => reject(place, element, ctx, item, "float", text),
    }
}

fn decode_enum(
    place: Place,
    element: &Element,
    ctx: &DecodeContext,
    item: &RegistryItem,
    codec: &'static str,
) -> Result<Option<Value>> {
    let ValueKind::Enum(spec) = &item.kind else {
        return Err(GeomarkupError::KindMismatch {
            attribute: item.attr_name,
            codec,
        });
    };
    let Some(text) = read_text(place, element, ctx, item) else {
        return Ok(None);
    };
    if let Some(member) = spec.lookup(text) {
        return Ok(Some(Value::Enum(member)));
    }

    let node = node_label(place, element, ctx, item);
    if ctx.strict || ctx.unknown_enum == UnknownEnumPolicy::Raise {
        return Err(GeomarkupError::UnknownEnumerationValue {
            node,
            enumeration: spec.name,
            value: text.to_string(),
        });
    }
    tracing::warn!(
        node = %node,
        attribute = item.attr_name,
        enumeration = spec.name,
        value = text,
        "Unknown enumeration value in lenient mode, omitting"
    );
    Ok(None)
}

fn subelement_text_kwarg(
    _registry: &Registry,
    element: &Element,
    ctx: &DecodeContext,
    item: &RegistryItem,
) -> Result<Option<Value>> {
    decode_text(Place::Subelement, element, ctx, item)
}

fn subelement_bool_kwarg(
    _registry: &Registry,
    element: &Element,
    ctx: &DecodeContext,
    item: &RegistryItem,
) -> Result<Option<Value>> {
    decode_bool(Place::Subelement, element, ctx, item)
}

fn subelement_int_kwarg(
    _registry: &Registry,
    element: &Element,
    ctx: &DecodeContext,
    item: &RegistryItem,
) -> Result<Option<Value>> {
    decode_int(Place::Subelement, element, ctx, item)
}

fn subelement_float_kwarg(
    _registry: &Registry,
    element: &Element,
    ctx: &DecodeContext,
    item: &RegistryItem,
) -> Result<Option<Value>> {
    decode_float(Place::Subelement, element, ctx, item)
}

fn subelement_enum_kwarg(
    _registry: &Registry,
    element: &Element,
    ctx: &DecodeContext,
    item: &RegistryItem,
) -> Result<Option<Value>> {
    decode_enum(Place::Subelement, element, ctx, item, ENUM_SUBELEMENT.name)
}

fn attribute_text_kwarg(
    _registry: &Registry,
    element: &Element,
    ctx: &DecodeContext,
    item: &RegistryItem,
) -> Result<Option<Value>> {
    decode_text(Place::Attribute, element, ctx, item)
}

fn attribute_bool_kwarg(
    _registry: &Registry,
    element: &Element,
    ctx: &DecodeContext,
    item: &RegistryItem,
) -> Result<Option<Value>> {
    decode_bool(Place::Attribute, element, ctx, item)
}

fn attribute_int_kwarg(
    _registry: &Registry,
    element: &Element,
    ctx: &DecodeContext,
    item: &RegistryItem,
) -> Result<Option<Value>> {
    decode_int(Place::Attribute, element, ctx, item)
}

fn attribute_float_kwarg(
    _registry: &Registry,
    element: &Element,
    ctx: &DecodeContext,
    item: &RegistryItem,
) -> Result<Option<Value>> {
    decode_float(Place::Attribute, element, ctx, item)
}

fn attribute_enum_kwarg(
    _registry: &Registry,
    element: &Element,
    ctx: &DecodeContext,
    item: &RegistryItem,
) -> Result<Option<Value>> {
    decode_enum(Place::Attribute, element, ctx, item, ENUM_ATTRIBUTE.name)
}

fn node_text_kwarg(
    _registry: &Registry,
    element: &Element,
    ctx: &DecodeContext,
    item: &RegistryItem,
) -> Result<Option<Value>> {
    decode_text(Place::Node, element, ctx, item)
}

fn xml_subelement_kwarg(
    registry: &Registry,
    element: &Element,
    ctx: &DecodeContext,
    item: &RegistryItem,
) -> Result<Option<Value>> {
    let ValueKind::Object(class) = &item.kind else {
        return Err(GeomarkupError::KindMismatch {
            attribute: item.attr_name,
            codec: OBJECT.name,
        });
    };
    let Some(child) = element.find(&ctx.qualified(class.tag)) else {
        return Ok(None);
    };
    Ok(Some(Value::Object(class.build(registry, child, ctx)?)))
}

fn xml_subelement_list_kwarg(
    registry: &Registry,
    element: &Element,
    ctx: &DecodeContext,
    item: &RegistryItem,
) -> Result<Option<Value>> {
    let ValueKind::Objects(classes) = &item.kind else {
        return Err(GeomarkupError::KindMismatch {
            attribute: item.attr_name,
            codec: OBJECT_LIST.name,
        });
    };

    // Grouped by candidate class, document order within each group.
    let mut objects = Vec::new();
    for class in classes {
        let name = ctx.qualified(class.tag);
        for child in element.find_all(&name) {
            objects.push(class.build(registry, child, ctx)?);
        }
    }

    Ok((!objects.is_empty()).then_some(Value::Objects(objects)))
}

fn text_subelement(
    _registry: &Registry,
    obj: &dyn XmlObject,
    element: &mut Element,
    _options: &EncodeOptions,
    item: &RegistryItem,
) {
    let Some(node_name) = item.node_name else {
        return;
    };
    if let Some(text) = obj.attr(item.attr_name).and_then(|value| value.to_text()) {
        element
            .sub_element(qualified_name(obj.ns(), node_name))
            .set_text(text);
    }
}

fn text_attribute(
    _registry: &Registry,
    obj: &dyn XmlObject,
    element: &mut Element,
    _options: &EncodeOptions,
    item: &RegistryItem,
) {
    let Some(node_name) = item.node_name else {
        return;
    };
    if let Some(text) = obj.attr(item.attr_name).and_then(|value| value.to_text()) {
        element.set_attribute(node_name, text);
    }
}

fn node_text(
    _registry: &Registry,
    obj: &dyn XmlObject,
    element: &mut Element,
    _options: &EncodeOptions,
    item: &RegistryItem,
) {
    if let Some(text) = obj.attr(item.attr_name).and_then(|value| value.to_text()) {
        element.set_text(text);
    }
}

fn xml_subelement(
    registry: &Registry,
    obj: &dyn XmlObject,
    element: &mut Element,
    options: &EncodeOptions,
    item: &RegistryItem,
) {
    if let Some(AttrValue::Object(child)) = obj.attr(item.attr_name) {
        if !child.is_empty() {
            element.append(child.etree_element(registry, options));
        }
    }
}

fn xml_subelement_list(
    registry: &Registry,
    obj: &dyn XmlObject,
    element: &mut Element,
    options: &EncodeOptions,
    item: &RegistryItem,
) {
    if let Some(AttrValue::Objects(children)) = obj.attr(item.attr_name) {
        for child in children {
            element.append(child.etree_element(registry, options));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_strict() {
        assert_eq!(parse_bool_strict("1"), Some(true));
        assert_eq!(parse_bool_strict("0"), Some(false));
        assert_eq!(parse_bool_strict("-4"), Some(true));
        assert_eq!(parse_bool_strict("true"), None);
        assert_eq!(parse_bool_strict("1.0"), None);
    }

    #[test]
    fn test_parse_bool_lenient() {
        assert_eq!(parse_bool_lenient("TRUE"), Some(true));
        assert_eq!(parse_bool_lenient("False"), Some(false));
        assert_eq!(parse_bool_lenient("0"), Some(false));
        assert_eq!(parse_bool_lenient("2.0"), Some(true));
        assert_eq!(parse_bool_lenient("0.4"), Some(false));
        assert_eq!(parse_bool_lenient("maybe"), None);
        assert_eq!(parse_bool_lenient("inf"), None);
        assert_eq!(parse_bool_lenient("NaN"), None);
    }

    #[test]
    fn test_codec_debug_and_eq() {
        assert_eq!(format!("{TEXT_SUBELEMENT:?}"), "Codec(\"text_subelement\")");
        assert_eq!(OBJECT, OBJECT);
        assert_ne!(OBJECT, OBJECT_LIST);
    }
}
