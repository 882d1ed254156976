//! Participating-type contract.
//!
//! A type takes part in registry decode/encode by describing itself with a
//! static [`XmlClass`], implementing [`XmlObject`] for instance-level access
//! and [`XmlType`] for type-level construction.

use std::any::Any;
use std::fmt;
use std::sync::LazyLock;

use super::core::Registry;
use super::types::{AttrValue, DecodeContext, EncodeOptions, Kwargs};
use crate::config::{default_name_spaces, NameSpaces};
use crate::error::{GeomarkupError, Result};
use crate::xml::{parse, qualified_name, to_xml_string, Element};

static DEFAULT_NAME_SPACES: LazyLock<NameSpaces> = LazyLock::new(default_name_spaces);

/// Type-level factory: build an instance from a tree node.
pub type BuildFn = fn(&Registry, &Element, &DecodeContext) -> Result<Box<dyn XmlObject>>;

/// Static description of a participating type.
///
/// `parent` spells out the ancestor chain explicitly; descriptors registered
/// on every ancestor apply to this class as well.
pub struct XmlClass {
    /// Unique class name, used as the registry key.
    pub name: &'static str,
    /// Bare tag name of this type's own node.
    pub tag: &'static str,
    /// Direct ancestor, if any.
    pub parent: Option<&'static XmlClass>,
    /// Factory for concrete classes; `None` for abstract ones.
    pub factory: Option<BuildFn>,
}

impl XmlClass {
    /// Ancestor chain from the most general class down to this one.
    #[must_use]
    pub fn ancestry(&'static self) -> Vec<&'static XmlClass> {
        let mut chain = Vec::new();
        let mut current = Some(self);
        while let Some(class) = current {
            chain.push(class);
            current = class.parent;
        }
        chain.reverse();
        chain
    }

    /// Build an instance of this class from a node.
    ///
    /// # Errors
    /// Returns `AbstractClass` if the class has no factory, or whatever the
    /// factory returns.
    pub fn build(
        &self,
        registry: &Registry,
        element: &Element,
        ctx: &DecodeContext,
    ) -> Result<Box<dyn XmlObject>> {
        match self.factory {
            Some(factory) => factory(registry, element, ctx),
            None => Err(GeomarkupError::AbstractClass(self.name)),
        }
    }
}

/// Classes are compared by identity: each static is its own class.
impl PartialEq for XmlClass {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for XmlClass {}

impl fmt::Debug for XmlClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmlClass")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("parent", &self.parent.map(|parent| parent.name))
            .field("abstract", &self.factory.is_none())
            .finish()
    }
}

/// Upcasts available on every participating object, including trait objects.
pub trait AsXmlObject {
    fn as_xml_object(&self) -> &dyn XmlObject;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: XmlObject> AsXmlObject for T {
    fn as_xml_object(&self) -> &dyn XmlObject {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Instance side of the participating-type contract.
pub trait XmlObject: AsXmlObject + fmt::Debug + Send + Sync + 'static {
    /// The class this object is an instance of.
    fn class(&self) -> &'static XmlClass;

    /// Namespace prefix string used for this object's nodes.
    fn ns(&self) -> &str;

    /// Prefix mapping the object was decoded with.
    fn name_spaces(&self) -> &NameSpaces {
        &DEFAULT_NAME_SPACES
    }

    /// Current value of a registered attribute, `None` when absent.
    fn attr(&self, name: &str) -> Option<AttrValue<'_>>;

    /// Whether the object holds nothing worth emitting as a nested value.
    fn is_empty(&self) -> bool {
        false
    }

    /// Produce this object's own node with all registered attributes encoded.
    fn etree_element(&self, registry: &Registry, options: &EncodeOptions) -> Element {
        let mut element = Element::new(qualified_name(self.ns(), self.class().tag));
        registry.encode(self.as_xml_object(), &mut element, options);
        element
    }

    /// Serialize this object as an XML document.
    fn to_xml_string(&self, registry: &Registry, options: &EncodeOptions, pretty: bool) -> String {
        to_xml_string(
            &self.etree_element(registry, options),
            self.name_spaces(),
            pretty,
        )
    }
}

/// Type side of the participating-type contract.
pub trait XmlType: XmlObject + Sized {
    /// Static class descriptor.
    fn xml_class() -> &'static XmlClass;

    /// Bare tag name used to locate this type's nodes.
    fn get_tag_name() -> &'static str {
        Self::xml_class().tag
    }

    /// Construct an instance from decoded constructor arguments.
    ///
    /// # Errors
    /// Implementations may reject argument combinations they cannot hold.
    fn from_kwargs(ctx: &DecodeContext, kwargs: Kwargs) -> Result<Self>;

    /// Decode a node into an instance.
    ///
    /// # Errors
    /// Propagates strict-mode decode failures.
    fn class_from_element(registry: &Registry, element: &Element, ctx: &DecodeContext) -> Result<Self> {
        let kwargs = registry.decode(Self::xml_class(), element, ctx)?;
        Self::from_kwargs(ctx, kwargs)
    }

    /// Parse XML text whose root is this type's node.
    ///
    /// # Errors
    /// Returns `XmlParse` for malformed XML, `UnexpectedElement` when the root
    /// is not this type's node, and any decode failure.
    fn class_from_string(registry: &Registry, xml: &str, ctx: &DecodeContext) -> Result<Self> {
        let element = parse(xml)?;
        let expected = ctx.qualified(Self::get_tag_name());
        if element.tag() != expected {
            return Err(GeomarkupError::UnexpectedElement {
                expected,
                found: element.tag().to_string(),
            });
        }
        Self::class_from_element(registry, &element, ctx)
    }
}

/// Factory for concrete classes, stored in [`XmlClass::factory`].
///
/// # Errors
/// Propagates the type's decode failures.
pub fn build_boxed<T: XmlType>(
    registry: &Registry,
    element: &Element,
    ctx: &DecodeContext,
) -> Result<Box<dyn XmlObject>> {
    Ok(Box::new(T::class_from_element(registry, element, ctx)?))
}

/// An enumerated value kind with a fixed set of XML spellings.
pub trait XmlEnum: Copy + fmt::Debug + Send + Sync + 'static {
    /// Enumeration name used in error messages.
    const NAME: &'static str;

    /// Every member.
    const ALL: &'static [Self];

    /// XML spelling of this member.
    fn as_str(&self) -> &'static str;

    /// Look up a member by its exact XML spelling.
    fn from_xml(text: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|member| member.as_str() == text)
    }
}

/// Type-erased handle on an [`XmlEnum`], carried by enumerated value kinds.
#[derive(Clone, Copy)]
pub struct EnumSpec {
    /// Enumeration name.
    pub name: &'static str,
    lookup: fn(&str) -> Option<&'static str>,
}

impl EnumSpec {
    /// Capture the lookup of an enumeration type.
    #[must_use]
    pub fn of<E: XmlEnum>() -> Self {
        Self {
            name: E::NAME,
            lookup: lookup_member::<E>,
        }
    }

    /// Canonical spelling of `text`, or `None` if it is not a member.
    #[must_use]
    pub fn lookup(&self, text: &str) -> Option<&'static str> {
        (self.lookup)(text)
    }
}

fn lookup_member<E: XmlEnum>(text: &str) -> Option<&'static str> {
    E::from_xml(text).map(|member| member.as_str())
}

impl PartialEq for EnumSpec {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for EnumSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EnumSpec").field(&self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static ROOT: XmlClass = XmlClass {
        name: "Root",
        tag: "Root",
        parent: None,
        factory: None,
    };
    static MIDDLE: XmlClass = XmlClass {
        name: "Middle",
        tag: "Middle",
        parent: Some(&ROOT),
        factory: None,
    };
    static LEAF: XmlClass = XmlClass {
        name: "Leaf",
        tag: "Leaf",
        parent: Some(&MIDDLE),
        factory: None,
    };

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Shade {
        Light,
        Dark,
    }

    impl XmlEnum for Shade {
        const NAME: &'static str = "Shade";
        const ALL: &'static [Self] = &[Self::Light, Self::Dark];

        fn as_str(&self) -> &'static str {
            match self {
                Self::Light => "light",
                Self::Dark => "dark",
            }
        }
    }

    #[test]
    fn test_ancestry_most_general_first() {
        let names: Vec<_> = LEAF.ancestry().iter().map(|class| class.name).collect();
        assert_eq!(names, vec!["Root", "Middle", "Leaf"]);
        assert_eq!(ROOT.ancestry().len(), 1);
    }

    #[test]
    fn test_classes_compare_by_identity() {
        assert_eq!(LEAF.parent.and_then(|middle| middle.parent), Some(&ROOT));
        assert_ne!(LEAF, ROOT);
    }

    #[test]
    fn test_build_abstract_class() {
        let registry = Registry::new();
        let result = ROOT.build(&registry, &Element::new("Root"), &DecodeContext::default());
        assert!(matches!(result, Err(GeomarkupError::AbstractClass("Root"))));
    }

    #[test]
    fn test_enum_from_xml_is_exact() {
        assert_eq!(Shade::from_xml("dark"), Some(Shade::Dark));
        assert_eq!(Shade::from_xml("Dark"), None);
    }

    #[test]
    fn test_enum_spec_lookup() {
        let spec = EnumSpec::of::<Shade>();
        assert_eq!(spec.name, "Shade");
        assert_eq!(spec.lookup("light"), Some("light"));
        assert_eq!(spec.lookup("grey"), None);
        assert_eq!(spec, EnumSpec::of::<Shade>());
    }
}
