//! Owned, ordered element tree used on both sides of the registry.

use super::local_name;

/// A single element node.
///
/// Tags and attribute names are qualified names: a namespace prefix string
/// (Clark form, `{uri}`) joined with the bare name, or just the bare name
/// when the node has no namespace. Attributes and children keep document
/// order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    /// Create an empty element with the given qualified tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Qualified tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Tag name without the namespace prefix.
    ///
    /// # Examples
    /// ```
    /// use geomarkup::xml::Element;
    ///
    /// let element = Element::new("{http://www.opengis.net/kml/2.2}Placemark");
    /// assert_eq!(element.local_name(), "Placemark");
    /// ```
    #[must_use]
    pub fn local_name(&self) -> &str {
        local_name(&self.tag)
    }

    /// Raw text content, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Text content with surrounding whitespace removed.
    ///
    /// Returns `None` when there is no text or it is whitespace only.
    #[must_use]
    pub fn trimmed_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// Replace the text content.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Get an attribute value by qualified name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Iterate over attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Child elements in document order.
    #[must_use]
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Find the first child with the given qualified name.
    ///
    /// # Examples
    /// ```
    /// use geomarkup::xml::Element;
    ///
    /// let mut root = Element::new("root");
    /// root.sub_element("child1");
    /// root.sub_element("child2");
    ///
    /// assert!(root.find("child1").is_some());
    /// assert!(root.find("missing").is_none());
    /// ```
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.tag == name)
    }

    /// Find all children with the given qualified name, in document order.
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |child| child.tag == name)
    }

    /// Create a new child under this element and return it for filling in.
    pub fn sub_element(&mut self, name: impl Into<String>) -> &mut Element {
        let index = self.children.len();
        self.children.push(Element::new(name));
        &mut self.children[index]
    }

    /// Append an already built child.
    pub fn append(&mut self, child: Element) {
        self.children.push(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_first_match() {
        let mut root = Element::new("root");
        root.sub_element("item").set_text("1");
        root.sub_element("item").set_text("2");

        assert_eq!(root.find("item").and_then(Element::text), Some("1"));
    }

    #[test]
    fn test_find_all_document_order() {
        let mut root = Element::new("root");
        root.sub_element("item").set_text("1");
        root.sub_element("other");
        root.sub_element("item").set_text("2");

        let texts: Vec<_> = root.find_all("item").filter_map(Element::text).collect();
        assert_eq!(texts, vec!["1", "2"]);
    }

    #[test]
    fn test_find_is_namespace_sensitive() {
        let mut root = Element::new("root");
        root.sub_element("{urn:a}name");

        assert!(root.find("{urn:a}name").is_some());
        assert!(root.find("{urn:b}name").is_none());
        assert!(root.find("name").is_none());
    }

    #[test]
    fn test_trimmed_text() {
        let mut element = Element::new("a");
        assert_eq!(element.trimmed_text(), None);

        element.set_text("   \n ");
        assert_eq!(element.trimmed_text(), None);

        element.set_text("  value ");
        assert_eq!(element.trimmed_text(), Some("value"));
        assert_eq!(element.text(), Some("  value "));
    }

    #[test]
    fn test_set_attribute_replaces() {
        let mut element = Element::new("a");
        element.set_attribute("id", "1");
        element.set_attribute("name", "x");
        element.set_attribute("id", "2");

        let attributes: Vec<_> = element.attributes().collect();
        assert_eq!(attributes, vec![("id", "2"), ("name", "x")]);
        assert_eq!(element.attribute("missing"), None);
    }

    #[test]
    fn test_append_keeps_order() {
        let mut root = Element::new("root");
        root.append(Element::new("a"));
        root.sub_element("b");
        root.append(Element::new("c"));

        let tags: Vec<_> = root.children().iter().map(Element::tag).collect();
        assert_eq!(tags, vec!["a", "b", "c"]);
    }
}
