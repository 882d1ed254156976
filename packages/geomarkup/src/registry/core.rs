//! Registry mapping participating classes to their descriptors.

use std::collections::HashMap;

use super::item::RegistryItem;
use super::object::{XmlClass, XmlObject};
use super::types::{DecodeContext, EncodeOptions, Kwargs};
use crate::error::Result;
use crate::xml::Element;

/// Catalog of descriptors per class.
///
/// Each class keeps the descriptors registered directly on it, in
/// registration order. Inherited descriptors are resolved through the class's
/// ancestor chain on every access; nothing is cached.
///
/// The registry is filled once during startup and then shared read-only.
/// `decode` and `encode` take `&self`, so concurrent use after the build
/// phase needs no locking.
#[derive(Debug, Default)]
pub struct Registry {
    items: HashMap<&'static str, (&'static XmlClass, Vec<RegistryItem>)>,
}

impl Registry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a descriptor to a class's own list.
    ///
    /// Re-registering an attribute name is allowed; see [`Registry::decode`]
    /// and [`Registry::encode`] for how duplicates behave.
    ///
    /// Class names must be unique. A second static with an already
    /// registered name trips a debug assertion.
    pub fn register(&mut self, class: &'static XmlClass, item: RegistryItem) {
        let (owner, items) = self.items.entry(class.name).or_insert_with(|| (class, Vec::new()));
        debug_assert!(
            std::ptr::eq(*owner, class),
            "class name '{}' is used by two distinct classes",
            class.name
        );
        items.push(item);
    }

    /// Descriptors registered directly on a class.
    #[must_use]
    pub fn own_items(&self, class: &XmlClass) -> &[RegistryItem] {
        self.items
            .get(class.name)
            .filter(|(owner, _)| std::ptr::eq(*owner, class))
            .map(|(_, items)| items.as_slice())
            .unwrap_or_default()
    }

    /// Names of all classes with at least one descriptor.
    #[must_use]
    pub fn registered_classes(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.items.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Resolved descriptor sequence of a class.
    ///
    /// Concatenates the own descriptors of every ancestor, most general
    /// first, ending with the class itself.
    #[must_use]
    pub fn resolve(&self, class: &'static XmlClass) -> Vec<&RegistryItem> {
        class
            .ancestry()
            .into_iter()
            .flat_map(|ancestor| self.own_items(ancestor))
            .collect()
    }

    /// Decode a node into constructor arguments for `class`.
    ///
    /// Every resolved descriptor is asked for a value. When two descriptors
    /// share an attribute name, the later one (closer to `class`) wins if it
    /// produced a value.
    ///
    /// # Errors
    /// Returns the first strict-mode failure raised by a codec.
    pub fn decode(
        &self,
        class: &'static XmlClass,
        element: &Element,
        ctx: &DecodeContext,
    ) -> Result<Kwargs> {
        let items = self.resolve(class);
        tracing::trace!(class = class.name, descriptors = items.len(), "Decoding element");

        let mut kwargs = Kwargs::new();
        for item in items {
            if let Some(value) = (item.codec.decode)(self, element, ctx, item)? {
                kwargs.insert(item.attr_name, value);
            }
        }
        Ok(kwargs)
    }

    /// Encode an object's registered attributes into `element`.
    ///
    /// Descriptors fire in resolution order, so ancestor fields come before
    /// subclass fields. Every descriptor fires independently: an attribute
    /// re-registered by a subclass is emitted once per registration.
    pub fn encode(&self, obj: &dyn XmlObject, element: &mut Element, options: &EncodeOptions) {
        let class = obj.class();
        let items = self.resolve(class);
        tracing::trace!(class = class.name, descriptors = items.len(), "Encoding object");

        for item in items {
            (item.codec.encode)(self, obj, element, options, item);
        }
    }
}
