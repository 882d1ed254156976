//! Features: named, displayable objects such as placemarks, network links
//! and the folder and document containers.

use super::base::{BaseObject, BASE_OBJECT};
use super::data::{ExtendedData, Schema, EXTENDED_DATA, SCHEMA};
use super::links::{Link, LINK};
use crate::config::{default_name_spaces, NameSpaces, KMLNS};
use crate::error::Result;
use crate::registry::{
    build_boxed, AttrValue, DecodeContext, Kwargs, Registry, RegistryItem, XmlClass, XmlObject,
    XmlType,
};

pub static SNIPPET: XmlClass = XmlClass {
    name: "Snippet",
    tag: "Snippet",
    parent: None,
    factory: Some(build_boxed::<Snippet>),
};

/// Abstract class of every feature.
pub static FEATURE: XmlClass = XmlClass {
    name: "_Feature",
    tag: "_Feature",
    parent: Some(&BASE_OBJECT),
    factory: None,
};

pub static PLACEMARK: XmlClass = XmlClass {
    name: "Placemark",
    tag: "Placemark",
    parent: Some(&FEATURE),
    factory: Some(build_boxed::<Placemark>),
};

pub static NETWORK_LINK: XmlClass = XmlClass {
    name: "NetworkLink",
    tag: "NetworkLink",
    parent: Some(&FEATURE),
    factory: Some(build_boxed::<NetworkLink>),
};

/// Abstract class of features that hold other features.
pub static CONTAINER: XmlClass = XmlClass {
    name: "_Container",
    tag: "_Container",
    parent: Some(&FEATURE),
    factory: None,
};

pub static FOLDER: XmlClass = XmlClass {
    name: "Folder",
    tag: "Folder",
    parent: Some(&CONTAINER),
    factory: Some(build_boxed::<Folder>),
};

pub static DOCUMENT: XmlClass = XmlClass {
    name: "Document",
    tag: "Document",
    parent: Some(&CONTAINER),
    factory: Some(build_boxed::<Document>),
};

/// Concrete features a container or the document root may hold, in the
/// order their groups are decoded.
pub static FEATURE_CLASSES: [&XmlClass; 4] = [&PLACEMARK, &FOLDER, &DOCUMENT, &NETWORK_LINK];

/// Short description shown in list views instead of the full description.
#[derive(Debug, Clone, PartialEq)]
pub struct Snippet {
    pub ns: String,
    pub name_spaces: NameSpaces,
    pub text: Option<String>,
    pub max_lines: Option<i64>,
}

impl Snippet {
    #[must_use]
    pub fn new(text: impl Into<String>, max_lines: Option<i64>) -> Self {
        Self {
            text: Some(text.into()),
            max_lines,
            ..Self::default()
        }
    }
}

impl Default for Snippet {
    fn default() -> Self {
        Self {
            ns: KMLNS.to_string(),
            name_spaces: default_name_spaces(),
            text: None,
            max_lines: None,
        }
    }
}

impl XmlObject for Snippet {
    fn class(&self) -> &'static XmlClass {
        &SNIPPET
    }

    fn ns(&self) -> &str {
        &self.ns
    }

    fn name_spaces(&self) -> &NameSpaces {
        &self.name_spaces
    }

    fn attr(&self, name: &str) -> Option<AttrValue<'_>> {
        match name {
            "text" => self.text.as_deref().map(AttrValue::Text),
            "max_lines" => self.max_lines.map(AttrValue::Int),
            _ => None,
        }
    }

    fn is_empty(&self) -> bool {
        self.text.as_deref().map_or(true, str::is_empty)
    }
}

impl XmlType for Snippet {
    fn xml_class() -> &'static XmlClass {
        &SNIPPET
    }

    fn from_kwargs(ctx: &DecodeContext, mut kwargs: Kwargs) -> Result<Self> {
        Ok(Self {
            ns: ctx.ns.clone(),
            name_spaces: ctx.name_spaces.clone(),
            text: kwargs.take_text("text"),
            max_lines: kwargs.take_int("max_lines"),
        })
    }
}

/// Fields shared by every feature.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureFields {
    pub base: BaseObject,
    pub name: Option<String>,
    pub visibility: Option<bool>,
    pub is_open: Option<bool>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub snippet: Option<Snippet>,
    pub description: Option<String>,
    pub style_url: Option<String>,
    pub extended_data: Option<ExtendedData>,
}

impl FeatureFields {
    /// Take the feature fields out of decoded arguments.
    pub fn from_kwargs(ctx: &DecodeContext, kwargs: &mut Kwargs) -> Self {
        Self {
            base: BaseObject::from_kwargs(ctx, kwargs),
            name: kwargs.take_text("name"),
            visibility: kwargs.take_bool("visibility"),
            is_open: kwargs.take_bool("is_open"),
            address: kwargs.take_text("address"),
            phone_number: kwargs.take_text("phone_number"),
            snippet: kwargs.take_object("snippet"),
            description: kwargs.take_text("description"),
            style_url: kwargs.take_text("style_url"),
            extended_data: kwargs.take_object("extended_data"),
        }
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<AttrValue<'_>> {
        match name {
            "name" => self.name.as_deref().map(AttrValue::Text),
            "visibility" => self.visibility.map(AttrValue::Bool),
            "is_open" => self.is_open.map(AttrValue::Bool),
            "address" => self.address.as_deref().map(AttrValue::Text),
            "phone_number" => self.phone_number.as_deref().map(AttrValue::Text),
            "snippet" => self
                .snippet
                .as_ref()
                .map(|snippet| AttrValue::Object(snippet)),
            "description" => self.description.as_deref().map(AttrValue::Text),
            "style_url" => self.style_url.as_deref().map(AttrValue::Text),
            "extended_data" => self
                .extended_data
                .as_ref()
                .map(|data| AttrValue::Object(data)),
            _ => self.base.attr(name),
        }
    }
}

/// A feature with an optional geometry. Geometry is not modelled here.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Placemark {
    pub feature: FeatureFields,
}

impl Placemark {
    /// Create a named placemark.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            feature: FeatureFields {
                name: Some(name.into()),
                ..FeatureFields::default()
            },
        }
    }
}

impl XmlObject for Placemark {
    fn class(&self) -> &'static XmlClass {
        &PLACEMARK
    }

    fn ns(&self) -> &str {
        &self.feature.base.ns
    }

    fn name_spaces(&self) -> &NameSpaces {
        &self.feature.base.name_spaces
    }

    fn attr(&self, name: &str) -> Option<AttrValue<'_>> {
        self.feature.attr(name)
    }
}

impl XmlType for Placemark {
    fn xml_class() -> &'static XmlClass {
        &PLACEMARK
    }

    fn from_kwargs(ctx: &DecodeContext, mut kwargs: Kwargs) -> Result<Self> {
        Ok(Self {
            feature: FeatureFields::from_kwargs(ctx, &mut kwargs),
        })
    }
}

/// A feature that loads more KML from a remote location.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NetworkLink {
    pub feature: FeatureFields,
    pub refresh_visibility: Option<bool>,
    pub fly_to_view: Option<bool>,
    pub link: Option<Link>,
}

impl NetworkLink {
    /// Create a named network link to `href`.
    #[must_use]
    pub fn new(name: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            feature: FeatureFields {
                name: Some(name.into()),
                ..FeatureFields::default()
            },
            link: Some(Link::new(href)),
            ..Self::default()
        }
    }
}

impl XmlObject for NetworkLink {
    fn class(&self) -> &'static XmlClass {
        &NETWORK_LINK
    }

    fn ns(&self) -> &str {
        &self.feature.base.ns
    }

    fn name_spaces(&self) -> &NameSpaces {
        &self.feature.base.name_spaces
    }

    fn attr(&self, name: &str) -> Option<AttrValue<'_>> {
        match name {
            "refresh_visibility" => self.refresh_visibility.map(AttrValue::Bool),
            "fly_to_view" => self.fly_to_view.map(AttrValue::Bool),
            "link" => self.link.as_ref().map(|link| AttrValue::Object(link)),
            _ => self.feature.attr(name),
        }
    }
}

impl XmlType for NetworkLink {
    fn xml_class() -> &'static XmlClass {
        &NETWORK_LINK
    }

    fn from_kwargs(ctx: &DecodeContext, mut kwargs: Kwargs) -> Result<Self> {
        Ok(Self {
            refresh_visibility: kwargs.take_bool("refresh_visibility"),
            fly_to_view: kwargs.take_bool("fly_to_view"),
            link: kwargs.take_object("link"),
            feature: FeatureFields::from_kwargs(ctx, &mut kwargs),
        })
    }
}

/// A container of features, possibly nested.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Folder {
    pub feature: FeatureFields,
    pub features: Vec<KmlFeature>,
}

impl XmlObject for Folder {
    fn class(&self) -> &'static XmlClass {
        &FOLDER
    }

    fn ns(&self) -> &str {
        &self.feature.base.ns
    }

    fn name_spaces(&self) -> &NameSpaces {
        &self.feature.base.name_spaces
    }

    fn attr(&self, name: &str) -> Option<AttrValue<'_>> {
        match name {
            "features" => Some(KmlFeature::as_objects(&self.features)),
            _ => self.feature.attr(name),
        }
    }
}

impl XmlType for Folder {
    fn xml_class() -> &'static XmlClass {
        &FOLDER
    }

    fn from_kwargs(ctx: &DecodeContext, mut kwargs: Kwargs) -> Result<Self> {
        let features = KmlFeature::from_objects(kwargs.take_any_objects("features"));
        Ok(Self {
            feature: FeatureFields::from_kwargs(ctx, &mut kwargs),
            features,
        })
    }
}

/// A container of features that also carries the schemata for typed
/// extended data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub feature: FeatureFields,
    pub features: Vec<KmlFeature>,
    pub schemata: Vec<Schema>,
}

impl Document {
    /// Look up a schema by its id, with or without a leading `#`.
    #[must_use]
    pub fn schema(&self, url: &str) -> Option<&Schema> {
        let id = url.strip_prefix('#').unwrap_or(url);
        self.schemata
            .iter()
            .find(|schema| schema.base.id.as_deref() == Some(id))
    }
}

impl XmlObject for Document {
    fn class(&self) -> &'static XmlClass {
        &DOCUMENT
    }

    fn ns(&self) -> &str {
        &self.feature.base.ns
    }

    fn name_spaces(&self) -> &NameSpaces {
        &self.feature.base.name_spaces
    }

    fn attr(&self, name: &str) -> Option<AttrValue<'_>> {
        match name {
            "features" => Some(KmlFeature::as_objects(&self.features)),
            "schemata" => Some(AttrValue::objects(&self.schemata)),
            _ => self.feature.attr(name),
        }
    }
}

impl XmlType for Document {
    fn xml_class() -> &'static XmlClass {
        &DOCUMENT
    }

    fn from_kwargs(ctx: &DecodeContext, mut kwargs: Kwargs) -> Result<Self> {
        let features = KmlFeature::from_objects(kwargs.take_any_objects("features"));
        Ok(Self {
            schemata: kwargs.take_objects("schemata"),
            feature: FeatureFields::from_kwargs(ctx, &mut kwargs),
            features,
        })
    }
}

/// A concrete feature held by a container.
#[derive(Debug, Clone, PartialEq)]
pub enum KmlFeature {
    Placemark(Placemark),
    Folder(Folder),
    Document(Document),
    NetworkLink(NetworkLink),
}

impl KmlFeature {
    /// Recover concrete features from decoded objects, dropping anything else.
    pub(crate) fn from_objects(objects: Vec<Box<dyn XmlObject>>) -> Vec<Self> {
        objects.into_iter().filter_map(Self::from_object).collect()
    }

    fn from_object(object: Box<dyn XmlObject>) -> Option<Self> {
        let any = object.into_any();
        let any = match any.downcast::<Placemark>() {
            Ok(placemark) => return Some(Self::Placemark(*placemark)),
            Err(any) => any,
        };
        let any = match any.downcast::<Folder>() {
            Ok(folder) => return Some(Self::Folder(*folder)),
            Err(any) => any,
        };
        let any = match any.downcast::<Document>() {
            Ok(document) => return Some(Self::Document(*document)),
            Err(any) => any,
        };
        any.downcast::<NetworkLink>()
            .ok()
            .map(|network_link| Self::NetworkLink(*network_link))
    }

    pub(crate) fn as_objects(features: &[Self]) -> AttrValue<'_> {
        AttrValue::Objects(features.iter().map(Self::as_object).collect())
    }

    fn as_object(&self) -> &dyn XmlObject {
        match self {
            Self::Placemark(placemark) => placemark,
            Self::Folder(folder) => folder,
            Self::Document(document) => document,
            Self::NetworkLink(network_link) => network_link,
        }
    }

    /// Fields shared by every feature.
    #[must_use]
    pub fn fields(&self) -> &FeatureFields {
        match self {
            Self::Placemark(placemark) => &placemark.feature,
            Self::Folder(folder) => &folder.feature,
            Self::Document(document) => &document.feature,
            Self::NetworkLink(network_link) => &network_link.feature,
        }
    }

    /// Name of the wrapped feature.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.fields().name.as_deref()
    }

    /// Features held by a container; empty for anything else.
    #[must_use]
    pub fn children(&self) -> &[KmlFeature] {
        match self {
            Self::Folder(folder) => &folder.features,
            Self::Document(document) => &document.features,
            Self::Placemark(_) | Self::NetworkLink(_) => &[],
        }
    }
}

pub(super) fn register(registry: &mut Registry) {
    registry.register(&SNIPPET, RegistryItem::node_text("text"));
    registry.register(&SNIPPET, RegistryItem::int_attribute("max_lines", "maxLines"));

    registry.register(&FEATURE, RegistryItem::text("name", "name"));
    registry.register(&FEATURE, RegistryItem::boolean("visibility", "visibility"));
    registry.register(&FEATURE, RegistryItem::boolean("is_open", "open"));
    registry.register(&FEATURE, RegistryItem::text("address", "address"));
    registry.register(&FEATURE, RegistryItem::text("phone_number", "phoneNumber"));
    registry.register(&FEATURE, RegistryItem::object("snippet", &SNIPPET));
    registry.register(&FEATURE, RegistryItem::text("description", "description"));
    registry.register(&FEATURE, RegistryItem::text("style_url", "styleUrl"));
    registry.register(&FEATURE, RegistryItem::object("extended_data", &EXTENDED_DATA));

    registry.register(
        &NETWORK_LINK,
        RegistryItem::boolean("refresh_visibility", "refreshVisibility"),
    );
    registry.register(&NETWORK_LINK, RegistryItem::boolean("fly_to_view", "flyToView"));
    registry.register(&NETWORK_LINK, RegistryItem::object("link", &LINK));

    registry.register(&CONTAINER, RegistryItem::objects("features", FEATURE_CLASSES));

    registry.register(&DOCUMENT, RegistryItem::objects("schemata", [&SCHEMA]));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeomarkupError;
    use crate::kml::create_kml_registry;
    use crate::kml::data::{Data, ExtendedDataElement};
    use crate::registry::EncodeOptions;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_placemark_from_string() {
        let registry = create_kml_registry();
        let xml = r#"<Placemark xmlns="http://www.opengis.net/kml/2.2" id="pm-1">
            <name>Town hall</name>
            <visibility>1</visibility>
            <open>0</open>
            <Snippet maxLines="2">Open on weekdays</Snippet>
            <description>Main entrance</description>
            <styleUrl>#blue</styleUrl>
            <ExtendedData><Data name="floors"><value>4</value></Data></ExtendedData>
        </Placemark>"#;

        let placemark =
            Placemark::class_from_string(&registry, xml, &DecodeContext::default()).unwrap();
        let feature = &placemark.feature;
        assert_eq!(feature.base.id.as_deref(), Some("pm-1"));
        assert_eq!(feature.name.as_deref(), Some("Town hall"));
        assert_eq!(feature.visibility, Some(true));
        assert_eq!(feature.is_open, Some(false));
        assert_eq!(feature.snippet, Some(Snippet::new("Open on weekdays", Some(2))));
        assert_eq!(feature.description.as_deref(), Some("Main entrance"));
        assert_eq!(feature.style_url.as_deref(), Some("#blue"));
        let extended = feature.extended_data.as_ref().unwrap();
        assert_eq!(extended.elements.len(), 1);
    }

    #[test]
    fn test_placemark_encode_order() {
        let registry = create_kml_registry();
        let mut placemark = Placemark::new("p");
        placemark.feature.base = placemark.feature.base.clone().with_id("x");
        placemark.feature.visibility = Some(false);
        placemark.feature.style_url = Some("#s".to_string());
        placemark.feature.snippet = Some(Snippet::new("short", None));

        let element = placemark.etree_element(&registry, &EncodeOptions::default());
        let children: Vec<_> = element.children().iter().map(|child| child.local_name()).collect();
        assert_eq!(children, vec!["name", "visibility", "Snippet", "styleUrl"]);
        assert_eq!(element.attribute("id"), Some("x"));
        assert_eq!(element.children()[1].text(), Some("0"));
    }

    #[test]
    fn test_empty_snippet_is_not_emitted() {
        let registry = create_kml_registry();
        let mut placemark = Placemark::new("p");
        placemark.feature.snippet = Some(Snippet::default());

        let element = placemark.etree_element(&registry, &EncodeOptions::default());
        assert_eq!(element.children().len(), 1);
    }

    #[test]
    fn test_folder_nesting_and_grouping() {
        let registry = create_kml_registry();
        let xml = r#"<Folder xmlns="http://www.opengis.net/kml/2.2">
            <name>outer</name>
            <Folder><name>inner</name><Placemark><name>deep</name></Placemark></Folder>
            <Placemark><name>first</name></Placemark>
            <Placemark><name>second</name></Placemark>
        </Folder>"#;

        let folder = Folder::class_from_string(&registry, xml, &DecodeContext::default()).unwrap();
        let names: Vec<_> = folder.features.iter().map(KmlFeature::name).collect();
        assert_eq!(names, vec![Some("first"), Some("second"), Some("inner")]);

        let KmlFeature::Folder(inner) = &folder.features[2] else {
            panic!("expected a folder");
        };
        assert_eq!(inner.features.len(), 1);
    }

    #[test]
    fn test_feature_is_abstract() {
        let registry = create_kml_registry();
        let element = crate::xml::parse(r#"<Placemark xmlns="http://www.opengis.net/kml/2.2"/>"#)
            .unwrap();
        let result = FEATURE.build(&registry, &element, &DecodeContext::default());
        assert!(matches!(result, Err(GeomarkupError::AbstractClass("_Feature"))));
    }

    #[test]
    fn test_lenient_visibility() {
        let registry = create_kml_registry();
        let xml = r#"<Placemark xmlns="http://www.opengis.net/kml/2.2"><visibility>maybe</visibility><open>TRUE</open></Placemark>"#;

        let strict = Placemark::class_from_string(&registry, xml, &DecodeContext::default());
        assert!(matches!(strict, Err(GeomarkupError::MalformedValue { kind: "bool", .. })));

        let lenient = DecodeContext::new(KMLNS, false);
        let placemark = Placemark::class_from_string(&registry, xml, &lenient).unwrap();
        assert_eq!(placemark.feature.visibility, None);
        assert_eq!(placemark.feature.is_open, Some(true));
    }

    #[test]
    fn test_placemark_round_trip_with_extended_data() {
        let registry = create_kml_registry();
        let mut placemark = Placemark::new("with data");
        placemark.feature.extended_data = Some(ExtendedData {
            elements: vec![ExtendedDataElement::Data(Data::new("k", "v"))],
            ..ExtendedData::default()
        });

        let xml = placemark.to_xml_string(&registry, &EncodeOptions::default(), true);
        let decoded =
            Placemark::class_from_string(&registry, &xml, &DecodeContext::default()).unwrap();
        assert_eq!(decoded, placemark);
    }

    #[test]
    fn test_network_link_from_string() {
        let registry = create_kml_registry();
        let xml = r#"<NetworkLink xmlns="http://www.opengis.net/kml/2.2">
            <name>Live feed</name>
            <refreshVisibility>0</refreshVisibility>
            <flyToView>1</flyToView>
            <Link><href>http://example.com/feed.kml</href><refreshMode>onInterval</refreshMode></Link>
        </NetworkLink>"#;

        let network_link =
            NetworkLink::class_from_string(&registry, xml, &DecodeContext::default()).unwrap();
        assert_eq!(network_link.feature.name.as_deref(), Some("Live feed"));
        assert_eq!(network_link.refresh_visibility, Some(false));
        assert_eq!(network_link.fly_to_view, Some(true));
        let link = network_link.link.as_ref().unwrap();
        assert_eq!(link.href.as_deref(), Some("http://example.com/feed.kml"));
        assert_eq!(link.refresh_mode, Some(crate::kml::RefreshMode::OnInterval));
    }

    #[test]
    fn test_network_link_encode_order() {
        let registry = create_kml_registry();
        let mut network_link = NetworkLink::new("feed", "feed.kml");
        network_link.fly_to_view = Some(true);

        let element = network_link.etree_element(&registry, &EncodeOptions::default());
        let children: Vec<_> = element.children().iter().map(|child| child.local_name()).collect();
        assert_eq!(children, vec!["name", "flyToView", "Link"]);
    }

    #[test]
    fn test_folder_holds_documents_and_network_links() {
        let registry = create_kml_registry();
        let xml = r#"<Folder xmlns="http://www.opengis.net/kml/2.2">
            <NetworkLink><name>net</name></NetworkLink>
            <Document><name>doc</name><Placemark><name>inner</name></Placemark></Document>
            <Placemark><name>pm</name></Placemark>
        </Folder>"#;

        let folder = Folder::class_from_string(&registry, xml, &DecodeContext::default()).unwrap();
        let names: Vec<_> = folder.features.iter().map(KmlFeature::name).collect();
        assert_eq!(names, vec![Some("pm"), Some("doc"), Some("net")]);
        assert_eq!(folder.features[1].children().len(), 1);
        assert!(folder.features[0].children().is_empty());
    }

    #[test]
    fn test_document_schemata_follow_features() {
        let registry = create_kml_registry();
        let document = Document {
            feature: FeatureFields {
                name: Some("trails".to_string()),
                ..FeatureFields::default()
            },
            features: vec![KmlFeature::Placemark(Placemark::new("p"))],
            schemata: vec![Schema {
                base: BaseObject::default().with_id("TrailHeadTypeId"),
                name: Some("TrailHeadType".to_string()),
                ..Schema::default()
            }],
        };

        let element = document.etree_element(&registry, &EncodeOptions::default());
        let children: Vec<_> = element.children().iter().map(|child| child.local_name()).collect();
        assert_eq!(children, vec!["name", "Placemark", "Schema"]);

        let decoded =
            Document::class_from_element(&registry, &element, &DecodeContext::default()).unwrap();
        assert_eq!(decoded, document);
        assert_eq!(decoded.schema("TrailHeadTypeId"), decoded.schemata.first());
        assert!(decoded.schema("#missing").is_none());
    }

    #[test]
    fn test_container_is_abstract() {
        let registry = create_kml_registry();
        let element = crate::xml::parse(r#"<Folder xmlns="http://www.opengis.net/kml/2.2"/>"#)
            .unwrap();
        let result = CONTAINER.build(&registry, &element, &DecodeContext::default());
        assert!(matches!(result, Err(GeomarkupError::AbstractClass("_Container"))));
    }
}
