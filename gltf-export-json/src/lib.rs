//! Serializable data structures for composing glTF 2.0 documents.
//!
//! This crate is the document model used by `gltf-export`: a closed set of
//! records mirroring the glTF 2.0 schema, each serializing with the schema's
//! camelCase member names and eliding members that hold their default value.
//! Cross-references between the top-level arrays are expressed as
//! [`Index<T>`](Index), a typed offset that cannot be confused with an index
//! into a different array.
//!
//! The model is write-oriented. Documents are built programmatically with
//! [`Root::push`] and friends, then serialized with [`Root::to_vec`] or
//! [`Root::to_string_pretty`]; there is no deserialization support.

/// Contains `Accessor` and other related data structures.
pub mod accessor;

/// Contains `Animation` and other related data structures.
pub mod animation;

/// Contains `Asset` metadata.
pub mod asset;

/// Contains `Buffer`, `View`, and other related data structures.
pub mod buffer;

/// Contains `Camera` and other related data structures.
pub mod camera;

/// Contains extension specific data structures and the names of the
/// extensions emitted by the built-in plug-ins.
pub mod extensions;

/// Contains `Extras`.
pub mod extras;

/// Contains `Image` and other related data structures.
pub mod image;

/// Contains `Material` and other related data structures.
pub mod material;

/// Contains `Mesh` and other related data structures.
pub mod mesh;

/// Contains `Root` and `Index`.
pub mod root;

/// Contains `Scene`, `Node`, and other related data structures.
pub mod scene;

/// Contains `Skin`.
pub mod skin;

/// Contains `Texture`, `Sampler`, and other related data structures.
pub mod texture;

pub use accessor::Accessor;
pub use animation::Animation;
pub use asset::Asset;
pub use buffer::Buffer;
pub use camera::Camera;
pub use image::Image;
pub use material::Material;
pub use mesh::Mesh;
pub use scene::{Node, Scene};
pub use skin::Skin;
pub use texture::Texture;

pub use self::extras::Extras;
pub use self::root::{Index, Root};
pub use serde_json::{Map, Value};
pub use serde_json::Error;
