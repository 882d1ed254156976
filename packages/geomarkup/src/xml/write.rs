//! Serialize an [`Element`] tree to XML text.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use super::element::Element;
use super::split_qualified;
use crate::config::NameSpaces;

/// Serialize an element tree.
///
/// Namespaced names are written with the prefix that `name_spaces` maps to
/// their URI. URIs missing from the map get generated `ns0`, `ns1`, ...
/// prefixes. All declarations are placed on the root element.
///
/// # Examples
/// ```
/// use geomarkup::config::default_name_spaces;
/// use geomarkup::xml::{to_xml_string, Element};
///
/// let mut root = Element::new("{http://www.opengis.net/kml/2.2}kml");
/// root.sub_element("{http://www.opengis.net/kml/2.2}name").set_text("a & b");
///
/// assert_eq!(
///     to_xml_string(&root, &default_name_spaces(), false),
///     r#"<kml:kml xmlns:kml="http://www.opengis.net/kml/2.2"><kml:name>a &amp; b</kml:name></kml:kml>"#
/// );
/// ```
#[must_use]
pub fn to_xml_string(element: &Element, name_spaces: &NameSpaces, pretty: bool) -> String {
    let prefixes = assign_prefixes(element, name_spaces);
    let mut out = String::new();
    write_element(&mut out, element, &prefixes, true, 0, pretty);
    out
}

/// Map every namespace URI used in the tree to a prefix.
fn assign_prefixes(element: &Element, name_spaces: &NameSpaces) -> BTreeMap<String, String> {
    // Several prefixes may map to one URI; pick the smallest for stable output.
    // The empty (default) prefix cannot qualify attributes, so it is skipped.
    let mut known: BTreeMap<&str, &str> = BTreeMap::new();
    for (prefix, uri) in name_spaces.iter().filter(|(prefix, _)| !prefix.is_empty()) {
        known
            .entry(uri.as_str())
            .and_modify(|current| {
                if prefix.as_str() < *current {
                    *current = prefix.as_str();
                }
            })
            .or_insert(prefix.as_str());
    }

    let mut used = Vec::new();
    collect_uris(element, &mut used);

    let mut prefixes = BTreeMap::new();
    let mut generated = 0usize;
    for uri in used {
        if prefixes.contains_key(&uri) {
            continue;
        }
        let prefix = match known.get(uri.as_str()) {
            Some(prefix) => (*prefix).to_string(),
            None => loop {
                let candidate = format!("ns{generated}");
                generated += 1;
                if !name_spaces.contains_key(&candidate) {
                    break candidate;
                }
            },
        };
        prefixes.insert(uri, prefix);
    }
    prefixes
}

fn collect_uris(element: &Element, used: &mut Vec<String>) {
    if let (Some(uri), _) = split_qualified(element.tag()) {
        used.push(uri.to_string());
    }
    for (name, _) in element.attributes() {
        if let (Some(uri), _) = split_qualified(name) {
            used.push(uri.to_string());
        }
    }
    for child in element.children() {
        collect_uris(child, used);
    }
}

fn prefixed(name: &str, prefixes: &BTreeMap<String, String>) -> String {
    match split_qualified(name) {
        (Some(uri), local) => match prefixes.get(uri) {
            Some(prefix) => format!("{prefix}:{local}"),
            None => local.to_string(),
        },
        (None, local) => local.to_string(),
    }
}

fn write_element(
    out: &mut String,
    element: &Element,
    prefixes: &BTreeMap<String, String>,
    is_root: bool,
    depth: usize,
    pretty: bool,
) {
    let name = prefixed(element.tag(), prefixes);
    let _ = write!(out, "<{name}");

    if is_root {
        let mut declarations: Vec<_> = prefixes.iter().collect();
        declarations.sort_by(|a, b| a.1.cmp(b.1));
        for (uri, prefix) in declarations {
            let _ = write!(out, " xmlns:{prefix}=\"{}\"", escape_attribute(uri));
        }
    }

    for (key, value) in element.attributes() {
        let _ = write!(
            out,
            " {}=\"{}\"",
            prefixed(key, prefixes),
            escape_attribute(value)
        );
    }

    let text = element.text().filter(|text| !text.is_empty());
    if text.is_none() && element.children().is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    if let Some(text) = text {
        out.push_str(&escape_text(text));
    }

    if !element.children().is_empty() {
        for child in element.children() {
            if pretty {
                out.push('\n');
                out.push_str(&"  ".repeat(depth + 1));
            }
            write_element(out, child, prefixes, false, depth + 1, pretty);
        }
        if pretty {
            out.push('\n');
            out.push_str(&"  ".repeat(depth));
        }
    }

    let _ = write!(out, "</{name}>");
}

/// Escape character data. A raw `\r` would be normalized to `\n` on parse.
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\r' => escaped.push_str("&#13;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape an attribute value. Parsers replace raw whitespace characters in
/// attributes with spaces, so they are written as character references.
fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\t' => escaped.push_str("&#9;"),
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
