//! The `<kml>` document root.

use super::features::{KmlFeature, Placemark, FEATURE_CLASSES};
use crate::config::{clark, default_name_spaces, NameSpaces, KMLNS};
use crate::error::{GeomarkupError, Result};
use crate::registry::{
    build_boxed, AttrValue, DecodeContext, EncodeOptions, Kwargs, Registry, RegistryItem,
    XmlClass, XmlObject, XmlType,
};
use crate::xml::{parse, split_qualified};

pub static KML: XmlClass = XmlClass {
    name: "kml",
    tag: "kml",
    parent: None,
    factory: Some(build_boxed::<Kml>),
};

/// A KML document.
#[derive(Debug, Clone, PartialEq)]
pub struct Kml {
    pub ns: String,
    pub name_spaces: NameSpaces,
    pub features: Vec<KmlFeature>,
}

impl Default for Kml {
    fn default() -> Self {
        Self {
            ns: KMLNS.to_string(),
            name_spaces: default_name_spaces(),
            features: Vec::new(),
        }
    }
}

impl Kml {
    /// Parse a KML document with default namespace prefixes.
    ///
    /// # Arguments
    /// * `registry` - Registry built by [`create_kml_registry`](super::create_kml_registry)
    /// * `xml` - Document text
    /// * `strict` - Raise on malformed values instead of omitting them
    ///
    /// # Errors
    /// Returns `XmlParse` for malformed XML, `UnexpectedElement` when the root
    /// is not `<kml>`, and strict-mode decode failures.
    pub fn parse(registry: &Registry, xml: &str, strict: bool) -> Result<Self> {
        Self::parse_with(registry, xml, DecodeContext::new(KMLNS, strict))
    }

    /// Parse a KML document with a caller-supplied context.
    ///
    /// The namespace of the context is replaced by the namespace of the
    /// document's root node, so documents without a namespace decode too.
    ///
    /// # Errors
    /// See [`Kml::parse`].
    pub fn parse_with(registry: &Registry, xml: &str, ctx: DecodeContext) -> Result<Self> {
        let element = parse(xml)?;
        let (uri, local) = split_qualified(element.tag());
        if local != KML.tag {
            return Err(GeomarkupError::UnexpectedElement {
                expected: KML.tag.to_string(),
                found: element.tag().to_string(),
            });
        }

        let ctx = DecodeContext {
            ns: uri.map(clark).unwrap_or_default(),
            ..ctx
        };
        tracing::debug!(ns = %ctx.ns, strict = ctx.strict, "Parsing KML document");
        Self::class_from_element(registry, &element, &ctx)
    }

    /// Placemarks directly under the root.
    pub fn placemarks(&self) -> impl Iterator<Item = &Placemark> {
        self.features.iter().filter_map(|feature| match feature {
            KmlFeature::Placemark(placemark) => Some(placemark),
            _ => None,
        })
    }

    /// Serialize with default encode options.
    #[must_use]
    pub fn to_kml_string(&self, registry: &Registry, pretty: bool) -> String {
        self.to_xml_string(registry, &EncodeOptions::default(), pretty)
    }
}

impl XmlObject for Kml {
    fn class(&self) -> &'static XmlClass {
        &KML
    }

    fn ns(&self) -> &str {
        &self.ns
    }

    fn name_spaces(&self) -> &NameSpaces {
        &self.name_spaces
    }

    fn attr(&self, name: &str) -> Option<AttrValue<'_>> {
        match name {
            "features" => Some(KmlFeature::as_objects(&self.features)),
            _ => None,
        }
    }
}

impl XmlType for Kml {
    fn xml_class() -> &'static XmlClass {
        &KML
    }

    fn from_kwargs(ctx: &DecodeContext, mut kwargs: Kwargs) -> Result<Self> {
        Ok(Self {
            ns: ctx.ns.clone(),
            name_spaces: ctx.name_spaces.clone(),
            features: KmlFeature::from_objects(kwargs.take_any_objects("features")),
        })
    }
}

pub(super) fn register(registry: &mut Registry) {
    registry.register(&KML, RegistryItem::objects("features", FEATURE_CLASSES));
}
