//! Error types for decoding and encoding.
//!
//! Decode is the only fallible direction: encode degrades by omission and
//! never returns an error. Missing nodes are a normal "no value" outcome and
//! never surface here.

use thiserror::Error;

/// Main error type for the geomarkup library.
#[derive(Debug, Error)]
pub enum GeomarkupError {
    /// Text was present but could not be parsed as the target primitive kind.
    #[error("Malformed {kind} value '{text}' in <{node}>")]
    MalformedValue {
        node: String,
        kind: &'static str,
        text: String,
    },

    /// Text was present but is not a member of the target enumeration.
    #[error("Unknown {enumeration} value '{value}' in <{node}>")]
    UnknownEnumerationValue {
        node: String,
        enumeration: &'static str,
        value: String,
    },

    /// A descriptor pairs a codec with a value kind it cannot serve.
    #[error("Codec '{codec}' cannot decode attribute '{attribute}' with its registered kind")]
    KindMismatch {
        attribute: &'static str,
        codec: &'static str,
    },

    /// A nested value names a class that has no factory.
    #[error("Class '{0}' is abstract and cannot be built from an element")]
    AbstractClass(&'static str),

    /// The document root is not the element the caller asked for.
    #[error("Expected root element <{expected}>, found <{found}>")]
    UnexpectedElement { expected: String, found: String },

    /// No participating class has the requested name.
    #[error("Unknown class '{0}'")]
    UnknownClass(String),

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for geomarkup operations.
pub type Result<T> = std::result::Result<T, GeomarkupError>;
