//! Attribute registry and codec dispatch.
//!
//! Each participating class registers an ordered list of descriptors, each
//! binding one attribute to one node name, a value kind, and a codec. Decode
//! walks a class's resolved descriptors to turn a node into constructor
//! arguments; encode walks the same descriptors to write an object's
//! attributes back into a node.

pub mod codec;
mod core;
mod item;
mod object;
mod types;

pub use codec::{Codec, DecodeFn, EncodeFn};
pub use self::core::Registry;
pub use item::{RegistryItem, ValueKind};
pub use object::{build_boxed, AsXmlObject, BuildFn, EnumSpec, XmlClass, XmlEnum, XmlObject, XmlType};
pub use types::{AttrValue, DecodeContext, EncodeOptions, Kwargs, UnknownEnumPolicy, Value};
