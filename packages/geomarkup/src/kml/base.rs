//! Abstract root of the KML object hierarchy.

use crate::config::{default_name_spaces, NameSpaces, KMLNS};
use crate::registry::{AttrValue, DecodeContext, Kwargs, Registry, RegistryItem, XmlClass};

/// Class of every object that may carry `id` and `targetId`.
pub static BASE_OBJECT: XmlClass = XmlClass {
    name: "_BaseObject",
    tag: "_BaseObject",
    parent: None,
    factory: None,
};

/// Fields shared by every KML object.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseObject {
    pub ns: String,
    pub name_spaces: NameSpaces,
    pub id: Option<String>,
    pub target_id: Option<String>,
}

impl BaseObject {
    /// Create an object in the given namespace with default prefixes.
    #[must_use]
    pub fn new(ns: impl Into<String>) -> Self {
        Self {
            ns: ns.into(),
            name_spaces: default_name_spaces(),
            id: None,
            target_id: None,
        }
    }

    /// Set the id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Take the shared fields out of decoded arguments.
    pub fn from_kwargs(ctx: &DecodeContext, kwargs: &mut Kwargs) -> Self {
        Self {
            ns: ctx.ns.clone(),
            name_spaces: ctx.name_spaces.clone(),
            id: kwargs.take_text("id"),
            target_id: kwargs.take_text("target_id"),
        }
    }

    /// Shared attribute lookup, delegated to by every subclass.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<AttrValue<'_>> {
        match name {
            "id" => self.id.as_deref().map(AttrValue::Text),
            "target_id" => self.target_id.as_deref().map(AttrValue::Text),
            _ => None,
        }
    }
}

impl Default for BaseObject {
    fn default() -> Self {
        Self::new(KMLNS)
    }
}

pub(super) fn register(registry: &mut Registry) {
    registry.register(&BASE_OBJECT, RegistryItem::text_attribute("id", "id"));
    registry.register(&BASE_OBJECT, RegistryItem::text_attribute("target_id", "targetId"));
}
