//! Element tree used by the codecs.
//!
//! The registry only needs a narrow set of tree operations: find the first
//! child by qualified name, find all children by qualified name, read and
//! write text, create a child under a parent, and append a built child.
//! [`Element`] provides exactly those, [`parse`] fills a tree from XML text
//! and [`to_xml_string`] writes one back out.

mod element;
mod parse;
mod write;

pub use element::Element;
pub use parse::{from_node, parse};
pub use write::to_xml_string;

/// Join a namespace prefix string and a bare tag name.
///
/// # Examples
/// ```
/// use geomarkup::xml::qualified_name;
///
/// assert_eq!(
///     qualified_name("{http://www.opengis.net/kml/2.2}", "Placemark"),
///     "{http://www.opengis.net/kml/2.2}Placemark"
/// );
/// assert_eq!(qualified_name("", "name"), "name");
/// ```
#[must_use]
pub fn qualified_name(ns: &str, name: &str) -> String {
    format!("{ns}{name}")
}

/// Split a Clark-notation name into namespace URI and local name.
///
/// # Examples
/// ```
/// use geomarkup::xml::split_qualified;
///
/// assert_eq!(split_qualified("{urn:x}a"), (Some("urn:x"), "a"));
/// assert_eq!(split_qualified("a"), (None, "a"));
/// ```
#[must_use]
pub fn split_qualified(name: &str) -> (Option<&str>, &str) {
    name.strip_prefix('{')
        .and_then(|rest| rest.split_once('}'))
        .map_or((None, name), |(uri, local)| (Some(uri), local))
}

/// Name without its namespace part.
#[must_use]
pub fn local_name(name: &str) -> &str {
    split_qualified(name).1
}
