//! Reference KML types built on the registry.
//!
//! [`create_kml_registry`] registers the descriptors of every type in this
//! module. Build it once at startup and share it.

mod base;
mod data;
mod document;
mod features;
mod links;

use crate::registry::{Registry, XmlClass};

pub use base::{BaseObject, BASE_OBJECT};
pub use data::{
    Data, DataType, ExtendedData, ExtendedDataElement, Schema, SchemaData, SimpleData,
    SimpleField, DATA, EXTENDED_DATA, SCHEMA, SCHEMA_DATA, SIMPLE_DATA, SIMPLE_FIELD,
};
pub use document::{Kml, KML};
pub use features::{
    Document, FeatureFields, Folder, KmlFeature, NetworkLink, Placemark, Snippet, CONTAINER,
    DOCUMENT, FEATURE, FEATURE_CLASSES, FOLDER, NETWORK_LINK, PLACEMARK, SNIPPET,
};
pub use links::{Icon, Link, RefreshMode, ViewRefreshMode, ICON, LINK};

/// Every class defined here, base classes first.
pub static CLASSES: [&XmlClass; 17] = [
    &BASE_OBJECT,
    &SIMPLE_FIELD,
    &SCHEMA,
    &DATA,
    &SIMPLE_DATA,
    &SCHEMA_DATA,
    &EXTENDED_DATA,
    &LINK,
    &ICON,
    &SNIPPET,
    &FEATURE,
    &PLACEMARK,
    &NETWORK_LINK,
    &CONTAINER,
    &FOLDER,
    &DOCUMENT,
    &KML,
];

/// Build a registry holding the descriptors of every KML type.
///
/// # Examples
/// ```
/// use geomarkup::kml::{create_kml_registry, PLACEMARK};
///
/// let registry = create_kml_registry();
/// let names: Vec<_> = registry
///     .resolve(&PLACEMARK)
///     .iter()
///     .map(|item| item.attr_name)
///     .collect();
/// assert_eq!(&names[..3], &["id", "target_id", "name"]);
/// ```
#[must_use]
pub fn create_kml_registry() -> Registry {
    let mut registry = Registry::new();
    base::register(&mut registry);
    data::register(&mut registry);
    links::register(&mut registry);
    features::register(&mut registry);
    document::register(&mut registry);

    tracing::debug!(
        classes = registry.registered_classes().len(),
        "Created KML registry"
    );
    registry
}

/// Look up a class by name, ignoring ASCII case.
#[must_use]
pub fn find_class(name: &str) -> Option<&'static XmlClass> {
    CLASSES
        .iter()
        .copied()
        .find(|class| class.name.eq_ignore_ascii_case(name))
}
