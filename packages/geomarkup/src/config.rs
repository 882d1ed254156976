//! Namespace constants and encode-time settings.

use std::collections::HashMap;
use std::fmt;

use clap::ValueEnum;

/// KML 2.2 namespace URI.
pub const KML_URI: &str = "http://www.opengis.net/kml/2.2";

/// Atom namespace URI (author and link metadata).
pub const ATOM_URI: &str = "http://www.w3.org/2005/Atom";

/// Google extension namespace URI.
pub const GX_URI: &str = "http://www.google.com/kml/ext/2.2";

/// KML namespace in Clark prefix form, ready to be joined with a tag name.
pub const KMLNS: &str = "{http://www.opengis.net/kml/2.2}";

/// Prefix to URI mapping.
pub type NameSpaces = HashMap<String, String>;

/// Default prefix mapping used when the caller supplies none.
///
/// # Examples
/// ```
/// use geomarkup::config::{default_name_spaces, KML_URI};
///
/// let name_spaces = default_name_spaces();
/// assert_eq!(name_spaces.get("kml").map(String::as_str), Some(KML_URI));
/// ```
#[must_use]
pub fn default_name_spaces() -> NameSpaces {
    [("kml", KML_URI), ("atom", ATOM_URI), ("gx", GX_URI)]
        .into_iter()
        .map(|(prefix, uri)| (prefix.to_string(), uri.to_string()))
        .collect()
}

/// Wrap a namespace URI in Clark prefix form (`{uri}`).
///
/// An empty URI yields an empty prefix, meaning "no namespace".
///
/// # Examples
/// ```
/// use geomarkup::config::{clark, KMLNS, KML_URI};
///
/// assert_eq!(clark(KML_URI), KMLNS);
/// assert_eq!(clark(""), "");
/// ```
#[must_use]
pub fn clark(uri: &str) -> String {
    if uri.is_empty() {
        String::new()
    } else {
        format!("{{{uri}}}")
    }
}

/// How much optional content an encoder should emit.
///
/// The registry itself only passes this through; concrete types decide what
/// it means for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Verbosity {
    /// Leave out everything that is not required.
    Terse,
    /// Emit what the object holds.
    #[default]
    Normal,
    /// Emit defaults explicitly as well.
    Verbose,
}

impl Verbosity {
    /// Get the string value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Terse => "terse",
            Self::Normal => "normal",
            Self::Verbose => "verbose",
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_name_spaces() {
        let name_spaces = default_name_spaces();
        assert_eq!(name_spaces.len(), 3);
        assert_eq!(name_spaces["atom"], ATOM_URI);
        assert_eq!(name_spaces["gx"], GX_URI);
    }

    #[test]
    fn test_clark_matches_constants() {
        assert_eq!(clark(KML_URI), KMLNS);
        assert_eq!(clark(GX_URI), "{http://www.google.com/kml/ext/2.2}");
    }

    #[test]
    fn test_verbosity_default() {
        assert_eq!(Verbosity::default(), Verbosity::Normal);
        assert_eq!(Verbosity::Verbose.to_string(), "verbose");
    }
}
