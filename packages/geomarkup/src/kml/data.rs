//! Custom data attached to features.
//!
//! Untyped name/value pairs (`Data`) and typed data described by a `Schema`
//! (`SchemaData` holding `SimpleData`), wrapped in `ExtendedData`.

use super::base::{BaseObject, BASE_OBJECT};
use crate::config::NameSpaces;
use crate::error::Result;
use crate::registry::{
    build_boxed, AttrValue, DecodeContext, Kwargs, Registry, RegistryItem, XmlClass, XmlEnum,
    XmlObject, XmlType,
};

pub static SIMPLE_FIELD: XmlClass = XmlClass {
    name: "SimpleField",
    tag: "SimpleField",
    parent: Some(&BASE_OBJECT),
    factory: Some(build_boxed::<SimpleField>),
};

pub static SCHEMA: XmlClass = XmlClass {
    name: "Schema",
    tag: "Schema",
    parent: Some(&BASE_OBJECT),
    factory: Some(build_boxed::<Schema>),
};

pub static DATA: XmlClass = XmlClass {
    name: "Data",
    tag: "Data",
    parent: Some(&BASE_OBJECT),
    factory: Some(build_boxed::<Data>),
};

pub static SIMPLE_DATA: XmlClass = XmlClass {
    name: "SimpleData",
    tag: "SimpleData",
    parent: Some(&BASE_OBJECT),
    factory: Some(build_boxed::<SimpleData>),
};

pub static SCHEMA_DATA: XmlClass = XmlClass {
    name: "SchemaData",
    tag: "SchemaData",
    parent: Some(&BASE_OBJECT),
    factory: Some(build_boxed::<SchemaData>),
};

pub static EXTENDED_DATA: XmlClass = XmlClass {
    name: "ExtendedData",
    tag: "ExtendedData",
    parent: Some(&BASE_OBJECT),
    factory: Some(build_boxed::<ExtendedData>),
};

/// Type of a custom schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    String,
    Int,
    UInt,
    Short,
    UShort,
    Float,
    Double,
    Bool,
}

impl XmlEnum for DataType {
    const NAME: &'static str = "DataType";
    const ALL: &'static [Self] = &[
        Self::String,
        Self::Int,
        Self::UInt,
        Self::Short,
        Self::UShort,
        Self::Float,
        Self::Double,
        Self::Bool,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Short => "short",
            Self::UShort => "ushort",
            Self::Float => "float",
            Self::Double => "double",
            Self::Bool => "bool",
        }
    }
}

/// Declaration of one custom field. Ignored unless both name and type are set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimpleField {
    pub base: BaseObject,
    pub name: Option<String>,
    pub field_type: Option<DataType>,
    pub display_name: Option<String>,
}

impl XmlObject for SimpleField {
    fn class(&self) -> &'static XmlClass {
        &SIMPLE_FIELD
    }

    fn ns(&self) -> &str {
        &self.base.ns
    }

    fn name_spaces(&self) -> &NameSpaces {
        &self.base.name_spaces
    }

    fn attr(&self, name: &str) -> Option<AttrValue<'_>> {
        match name {
            "name" => self.name.as_deref().map(AttrValue::Text),
            "type" => self.field_type.map(|field_type| AttrValue::Enum(field_type.as_str())),
            "display_name" => self.display_name.as_deref().map(AttrValue::Text),
            _ => self.base.attr(name),
        }
    }

    fn is_empty(&self) -> bool {
        self.name.is_none() || self.field_type.is_none()
    }
}

impl XmlType for SimpleField {
    fn xml_class() -> &'static XmlClass {
        &SIMPLE_FIELD
    }

    fn from_kwargs(ctx: &DecodeContext, mut kwargs: Kwargs) -> Result<Self> {
        Ok(Self {
            base: BaseObject::from_kwargs(ctx, &mut kwargs),
            name: kwargs.take_text("name"),
            field_type: kwargs.take_enum("type"),
            display_name: kwargs.take_text("display_name"),
        })
    }
}

/// A custom schema: a named set of typed fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    pub base: BaseObject,
    pub name: Option<String>,
    pub fields: Vec<SimpleField>,
}

impl XmlObject for Schema {
    fn class(&self) -> &'static XmlClass {
        &SCHEMA
    }

    fn ns(&self) -> &str {
        &self.base.ns
    }

    fn name_spaces(&self) -> &NameSpaces {
        &self.base.name_spaces
    }

    fn attr(&self, name: &str) -> Option<AttrValue<'_>> {
        match name {
            "name" => self.name.as_deref().map(AttrValue::Text),
            "fields" => Some(AttrValue::objects(&self.fields)),
            _ => self.base.attr(name),
        }
    }
}

impl XmlType for Schema {
    fn xml_class() -> &'static XmlClass {
        &SCHEMA
    }

    fn from_kwargs(ctx: &DecodeContext, mut kwargs: Kwargs) -> Result<Self> {
        Ok(Self {
            base: BaseObject::from_kwargs(ctx, &mut kwargs),
            name: kwargs.take_text("name"),
            fields: kwargs.take_objects("fields"),
        })
    }
}

/// Untyped name/value pair.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Data {
    pub base: BaseObject,
    pub name: Option<String>,
    pub value: Option<String>,
    pub display_name: Option<String>,
}

impl Data {
    /// Create a name/value pair.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value.into()),
            ..Self::default()
        }
    }
}

impl XmlObject for Data {
    fn class(&self) -> &'static XmlClass {
        &DATA
    }

    fn ns(&self) -> &str {
        &self.base.ns
    }

    fn name_spaces(&self) -> &NameSpaces {
        &self.base.name_spaces
    }

    fn attr(&self, name: &str) -> Option<AttrValue<'_>> {
        match name {
            "name" => self.name.as_deref().map(AttrValue::Text),
            "value" => self.value.as_deref().map(AttrValue::Text),
            "display_name" => self.display_name.as_deref().map(AttrValue::Text),
            _ => self.base.attr(name),
        }
    }

    fn is_empty(&self) -> bool {
        self.name.is_none() || self.value.is_none()
    }
}

impl XmlType for Data {
    fn xml_class() -> &'static XmlClass {
        &DATA
    }

    fn from_kwargs(ctx: &DecodeContext, mut kwargs: Kwargs) -> Result<Self> {
        Ok(Self {
            base: BaseObject::from_kwargs(ctx, &mut kwargs),
            name: kwargs.take_text("name"),
            value: kwargs.take_text("value"),
            display_name: kwargs.take_text("display_name"),
        })
    }
}

/// Value of one schema field; the value is the node's own text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimpleData {
    pub base: BaseObject,
    pub name: Option<String>,
    pub value: Option<String>,
}

impl SimpleData {
    /// Create a field value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value.into()),
            ..Self::default()
        }
    }
}

impl XmlObject for SimpleData {
    fn class(&self) -> &'static XmlClass {
        &SIMPLE_DATA
    }

    fn ns(&self) -> &str {
        &self.base.ns
    }

    fn name_spaces(&self) -> &NameSpaces {
        &self.base.name_spaces
    }

    fn attr(&self, name: &str) -> Option<AttrValue<'_>> {
        match name {
            "name" => self.name.as_deref().map(AttrValue::Text),
            "value" => self.value.as_deref().map(AttrValue::Text),
            _ => self.base.attr(name),
        }
    }

    fn is_empty(&self) -> bool {
        self.name.is_none() || self.value.is_none()
    }
}

impl XmlType for SimpleData {
    fn xml_class() -> &'static XmlClass {
        &SIMPLE_DATA
    }

    fn from_kwargs(ctx: &DecodeContext, mut kwargs: Kwargs) -> Result<Self> {
        Ok(Self {
            base: BaseObject::from_kwargs(ctx, &mut kwargs),
            name: kwargs.take_text("name"),
            value: kwargs.take_text("value"),
        })
    }
}

/// Typed custom data for the schema referenced by `schema_url`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaData {
    pub base: BaseObject,
    pub schema_url: Option<String>,
    pub data: Vec<SimpleData>,
}

impl XmlObject for SchemaData {
    fn class(&self) -> &'static XmlClass {
        &SCHEMA_DATA
    }

    fn ns(&self) -> &str {
        &self.base.ns
    }

    fn name_spaces(&self) -> &NameSpaces {
        &self.base.name_spaces
    }

    fn attr(&self, name: &str) -> Option<AttrValue<'_>> {
        match name {
            "schema_url" => self.schema_url.as_deref().map(AttrValue::Text),
            "data" => Some(AttrValue::objects(&self.data)),
            _ => self.base.attr(name),
        }
    }

    fn is_empty(&self) -> bool {
        self.data.is_empty() || self.schema_url.is_none()
    }
}

impl XmlType for SchemaData {
    fn xml_class() -> &'static XmlClass {
        &SCHEMA_DATA
    }

    fn from_kwargs(ctx: &DecodeContext, mut kwargs: Kwargs) -> Result<Self> {
        Ok(Self {
            base: BaseObject::from_kwargs(ctx, &mut kwargs),
            schema_url: kwargs.take_text("schema_url"),
            data: kwargs.take_objects("data"),
        })
    }
}

/// A member of `ExtendedData`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtendedDataElement {
    Data(Data),
    SchemaData(SchemaData),
}

impl ExtendedDataElement {
    /// Recover the concrete member from a decoded object.
    #[must_use]
    pub fn from_object(object: Box<dyn XmlObject>) -> Option<Self> {
        let any = object.into_any();
        match any.downcast::<Data>() {
            Ok(data) => Some(Self::Data(*data)),
            Err(any) => any
                .downcast::<SchemaData>()
                .ok()
                .map(|schema_data| Self::SchemaData(*schema_data)),
        }
    }

    fn as_object(&self) -> &dyn XmlObject {
        match self {
            Self::Data(data) => data,
            Self::SchemaData(schema_data) => schema_data,
        }
    }
}

/// Container for custom data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtendedData {
    pub base: BaseObject,
    pub elements: Vec<ExtendedDataElement>,
}

impl XmlObject for ExtendedData {
    fn class(&self) -> &'static XmlClass {
        &EXTENDED_DATA
    }

    fn ns(&self) -> &str {
        &self.base.ns
    }

    fn name_spaces(&self) -> &NameSpaces {
        &self.base.name_spaces
    }

    fn attr(&self, name: &str) -> Option<AttrValue<'_>> {
        match name {
            "elements" => Some(AttrValue::Objects(
                self.elements.iter().map(ExtendedDataElement::as_object).collect(),
            )),
            _ => self.base.attr(name),
        }
    }

    fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl XmlType for ExtendedData {
    fn xml_class() -> &'static XmlClass {
        &EXTENDED_DATA
    }

    fn from_kwargs(ctx: &DecodeContext, mut kwargs: Kwargs) -> Result<Self> {
        Ok(Self {
            base: BaseObject::from_kwargs(ctx, &mut kwargs),
            elements: kwargs
                .take_any_objects("elements")
                .into_iter()
                .filter_map(ExtendedDataElement::from_object)
                .collect(),
        })
    }
}

pub(super) fn register(registry: &mut Registry) {
    registry.register(&SIMPLE_FIELD, RegistryItem::text_attribute("name", "name"));
    registry.register(&SIMPLE_FIELD, RegistryItem::enum_attribute::<DataType>("type", "type"));
    registry.register(&SIMPLE_FIELD, RegistryItem::text("display_name", "displayName"));

    registry.register(&SCHEMA, RegistryItem::text_attribute("name", "name"));
    registry.register(&SCHEMA, RegistryItem::objects("fields", [&SIMPLE_FIELD]));

    registry.register(&DATA, RegistryItem::text_attribute("name", "name"));
    registry.register(&DATA, RegistryItem::text("value", "value"));
    registry.register(&DATA, RegistryItem::text("display_name", "displayName"));

    registry.register(&SIMPLE_DATA, RegistryItem::node_text("value"));
    registry.register(&SIMPLE_DATA, RegistryItem::text_attribute("name", "name"));

    registry.register(&SCHEMA_DATA, RegistryItem::text_attribute("schema_url", "schemaUrl"));
    registry.register(&SCHEMA_DATA, RegistryItem::objects("data", [&SIMPLE_DATA]));

    registry.register(
        &EXTENDED_DATA,
        RegistryItem::objects("elements", [&DATA, &SCHEMA_DATA]),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KMLNS;
    use crate::kml::create_kml_registry;
    use crate::registry::EncodeOptions;
    use crate::xml::parse;
    use pretty_assertions::assert_eq;

    fn kml(body: &str) -> String {
        format!(r#"<kml xmlns="http://www.opengis.net/kml/2.2">{body}</kml>"#)
    }

    #[test]
    fn test_data_from_element() {
        let registry = create_kml_registry();
        let root = parse(&kml(
            r#"<Data name="holeNumber" id="d1"><displayName>Hole</displayName><value>1</value></Data>"#,
        ))
        .unwrap();
        let element = root.find(&format!("{KMLNS}Data")).unwrap();

        let data = Data::class_from_element(&registry, element, &DecodeContext::default()).unwrap();
        assert_eq!(data.name.as_deref(), Some("holeNumber"));
        assert_eq!(data.value.as_deref(), Some("1"));
        assert_eq!(data.display_name.as_deref(), Some("Hole"));
        assert_eq!(data.base.id.as_deref(), Some("d1"));
    }

    #[test]
    fn test_data_encode_order() {
        let registry = create_kml_registry();
        let mut data = Data::new("holeNumber", "1");
        data.display_name = Some("Hole".to_string());
        data.base.id = Some("d1".to_string());

        let element = data.etree_element(&registry, &EncodeOptions::default());
        assert_eq!(element.attribute("id"), Some("d1"));
        assert_eq!(element.attribute("name"), Some("holeNumber"));
        let tags: Vec<_> = element.children().iter().map(|child| child.local_name()).collect();
        assert_eq!(tags, vec!["value", "displayName"]);
    }

    #[test]
    fn test_simple_data_node_text() {
        let registry = create_kml_registry();
        let root = parse(&kml(r#"<SimpleData name="TrailHeadName">Pi in the sky</SimpleData>"#))
            .unwrap();
        let element = root.find(&format!("{KMLNS}SimpleData")).unwrap();

        let simple_data =
            SimpleData::class_from_element(&registry, element, &DecodeContext::default()).unwrap();
        assert_eq!(simple_data, SimpleData::new("TrailHeadName", "Pi in the sky"));

        let encoded = simple_data.etree_element(&registry, &EncodeOptions::default());
        assert_eq!(encoded.text(), Some("Pi in the sky"));
        assert!(encoded.children().is_empty());
    }

    #[test]
    fn test_simple_field_type_enum() {
        let registry = create_kml_registry();
        let root = parse(&kml(
            r#"<SimpleField type="double" name="TrailLength"><displayName>Length</displayName></SimpleField>"#,
        ))
        .unwrap();
        let element = root.find(&format!("{KMLNS}SimpleField")).unwrap();

        let field =
            SimpleField::class_from_element(&registry, element, &DecodeContext::default()).unwrap();
        assert_eq!(field.field_type, Some(DataType::Double));
        assert!(!field.is_empty());
    }

    #[test]
    fn test_extended_data_mixed_members() {
        let registry = create_kml_registry();
        let xml = kml(
            r##"<ExtendedData>
                <Data name="a"><value>1</value></Data>
                <SchemaData schemaUrl="#TrailHeadTypeId">
                    <SimpleData name="TrailHeadName">Pi in the sky</SimpleData>
                    <SimpleData name="TrailLength">3.14159</SimpleData>
                </SchemaData>
                <Data name="b"><value>2</value></Data>
            </ExtendedData>"##,
        );
        let root = parse(&xml).unwrap();
        let element = root.find(&format!("{KMLNS}ExtendedData")).unwrap();

        let extended =
            ExtendedData::class_from_element(&registry, element, &DecodeContext::default())
                .unwrap();
        assert_eq!(extended.elements.len(), 3);
        assert_eq!(extended.elements[0], ExtendedDataElement::Data(Data::new("a", "1")));
        assert_eq!(extended.elements[1], ExtendedDataElement::Data(Data::new("b", "2")));
        let ExtendedDataElement::SchemaData(schema_data) = &extended.elements[2] else {
            panic!("expected SchemaData");
        };
        assert_eq!(schema_data.schema_url.as_deref(), Some("#TrailHeadTypeId"));
        assert_eq!(schema_data.data.len(), 2);
    }

    #[test]
    fn test_schema_round_trip() {
        let registry = create_kml_registry();
        let schema = Schema {
            base: BaseObject::default().with_id("TrailHeadTypeId"),
            name: Some("TrailHeadType".to_string()),
            fields: vec![SimpleField {
                name: Some("TrailLength".to_string()),
                field_type: Some(DataType::Double),
                display_name: Some("<b>Length</b>".to_string()),
                ..SimpleField::default()
            }],
        };

        let element = schema.etree_element(&registry, &EncodeOptions::default());
        let decoded =
            Schema::class_from_element(&registry, &element, &DecodeContext::default()).unwrap();
        assert_eq!(decoded, schema);
    }

    #[test]
    fn test_whitespace_controls_round_trip() {
        let registry = create_kml_registry();
        let data = Data {
            base: BaseObject::default().with_id("x\ny"),
            ..Data::new("a\tb", "v")
        };
        let simple_data = SimpleData::new("TrailHeadName", "line1\rline2");

        let xml = data.to_xml_string(&registry, &EncodeOptions::default(), false);
        let decoded = Data::class_from_string(&registry, &xml, &DecodeContext::default()).unwrap();
        assert_eq!(decoded, data);

        let xml = simple_data.to_xml_string(&registry, &EncodeOptions::default(), false);
        let decoded =
            SimpleData::class_from_string(&registry, &xml, &DecodeContext::default()).unwrap();
        assert_eq!(decoded, simple_data);
    }
}
