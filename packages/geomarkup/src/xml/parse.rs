//! Build an [`Element`] tree from XML text.

use roxmltree::{Document, Node};

use super::element::Element;
use super::qualified_name;
use crate::config::clark;
use crate::error::Result;

/// Parse XML text and return its root element.
///
/// # Errors
/// Returns `XmlParse` if the text is not well-formed XML.
///
/// # Examples
/// ```
/// use geomarkup::xml::parse;
///
/// let root = parse(r#"<kml xmlns="http://www.opengis.net/kml/2.2"><name>x</name></kml>"#).unwrap();
/// assert_eq!(root.tag(), "{http://www.opengis.net/kml/2.2}kml");
/// assert!(root.find("{http://www.opengis.net/kml/2.2}name").is_some());
/// ```
pub fn parse(xml: &str) -> Result<Element> {
    let doc = Document::parse(xml)?;
    Ok(from_node(doc.root_element()))
}

/// Convert a roxmltree element and its element descendants.
///
/// Only the leading text of each element is kept; text that follows a child
/// element is dropped.
pub fn from_node(node: Node<'_, '_>) -> Element {
    let tag = node.tag_name();
    let mut element = Element::new(qualified_name(
        &clark(tag.namespace().unwrap_or_default()),
        tag.name(),
    ));

    for attribute in node.attributes() {
        element.set_attribute(
            qualified_name(
                &clark(attribute.namespace().unwrap_or_default()),
                attribute.name(),
            ),
            attribute.value(),
        );
    }

    if let Some(text) = node.text() {
        element.set_text(text);
    }

    for child in node.children().filter(Node::is_element) {
        element.append(from_node(child));
    }

    element
}
