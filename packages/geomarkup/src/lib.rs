//! Geomarkup - Registry-driven XML decode and encode for KML-style markup.
//!
//! Participating types describe each of their attributes once, as an ordered
//! list of descriptors in a [`registry::Registry`]. The same descriptors drive
//! both directions: decode turns an element into constructor arguments and
//! encode writes an object's attributes back into an element.
//!
//! # Example
//!
//! ```
//! use geomarkup::kml::{create_kml_registry, Kml};
//!
//! let registry = create_kml_registry();
//! let xml = r#"<kml xmlns="http://www.opengis.net/kml/2.2">
//!     <Placemark><name>Town hall</name><visibility>1</visibility></Placemark>
//! </kml>"#;
//!
//! let kml = Kml::parse(&registry, xml, true).unwrap();
//! let placemark = kml.placemarks().next().unwrap();
//! assert_eq!(placemark.feature.name.as_deref(), Some("Town hall"));
//! assert_eq!(placemark.feature.visibility, Some(true));
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Namespace constants and encode verbosity
//! - [`error`]: Error types and Result alias
//! - [`xml`]: Element tree, parser and writer
//! - [`registry`]: Descriptors, codecs and the participating-type contract
//! - [`kml`]: Reference KML types and their registry
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod kml;
pub mod registry;
pub mod xml;

// Re-export commonly used items
pub use error::{GeomarkupError, Result};
pub use kml::{create_kml_registry, Kml};
pub use registry::{
    DecodeContext, EncodeOptions, Registry, RegistryItem, XmlClass, XmlObject, XmlType,
};
