use serde::ser;
use serde_derive::Serialize;
use std::{fmt, marker};

use crate::{
    buffer, extensions, texture, Accessor, Animation, Asset, Buffer, Camera, Error, Extras, Image,
    Material, Mesh, Node, Scene, Skin, Texture, Value,
};

/// Represents an offset into an array of type `T` owned by the root glTF
/// object.
pub struct Index<T>(u32, marker::PhantomData<T>);

/// The root object of a glTF 2.0 asset.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Root {
    /// An array of accessors.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub accessors: Vec<Accessor>,

    /// An array of keyframe animations.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub animations: Vec<Animation>,

    /// Metadata about the glTF asset.
    pub asset: Asset,

    /// An array of buffers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub buffers: Vec<Buffer>,

    /// An array of buffer views.
    #[serde(rename = "bufferViews", skip_serializing_if = "Vec::is_empty")]
    pub buffer_views: Vec<buffer::View>,

    /// An array of cameras.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cameras: Vec<Camera>,

    /// Extension specific data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<extensions::root::Root>,

    /// Names of glTF extensions used somewhere in this asset.
    #[serde(rename = "extensionsUsed", skip_serializing_if = "Vec::is_empty")]
    pub extensions_used: Vec<String>,

    /// Names of glTF extensions required to properly load this asset.
    #[serde(rename = "extensionsRequired", skip_serializing_if = "Vec::is_empty")]
    pub extensions_required: Vec<String>,

    /// Optional application specific data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extras: Extras,

    /// An array of images.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Image>,

    /// An array of materials.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<Material>,

    /// An array of meshes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub meshes: Vec<Mesh>,

    /// An array of nodes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<Node>,

    /// An array of samplers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub samplers: Vec<texture::Sampler>,

    /// The default scene.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene: Option<Index<Scene>>,

    /// An array of scenes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scenes: Vec<Scene>,

    /// An array of skins.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skins: Vec<Skin>,

    /// An array of textures.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub textures: Vec<Texture>,
}

impl Root {
    /// Appends `value` to its array and returns its index.
    pub fn push<T>(&mut self, value: T) -> Index<T>
    where
        Self: AsMut<Vec<T>>,
    {
        let array = self.as_mut();
        let index = Index::new(array.len() as u32);
        array.push(value);
        index
    }

    /// Serialize as a `String` of JSON.
    pub fn to_string(&self) -> Result<String, Error> {
        serde_json::to_string(self)
    }

    /// Serialize as a pretty-printed `String` of JSON.
    pub fn to_string_pretty(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serialize as a generic JSON value.
    pub fn to_value(&self) -> Result<Value, Error> {
        serde_json::to_value(self)
    }

    /// Serialize as a JSON byte vector.
    pub fn to_vec(&self) -> Result<Vec<u8>, Error> {
        serde_json::to_vec(self)
    }

    /// Returns the extension root, creating it on first use.
    pub fn extensions_mut(&mut self) -> &mut extensions::root::Root {
        self.extensions.get_or_insert_with(Default::default)
    }
}

impl<T> Index<T> {
    /// Creates a new `Index` representing an offset into an array containing
    /// `T`.
    pub fn new(value: u32) -> Self {
        Index(value, marker::PhantomData)
    }

    /// Returns the internal offset value.
    pub fn value(&self) -> usize {
        self.0 as usize
    }
}

impl<T> Clone for Index<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Index<T> {}

impl<T> PartialEq for Index<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for Index<T> {}

impl<T> std::hash::Hash for Index<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl<T> ser::Serialize for Index<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_u64(u64::from(self.0))
    }
}

impl<T> fmt::Debug for Index<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T> fmt::Display for Index<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! impl_as_vec {
    ($ty:ty, $field:ident) => {
        impl AsRef<Vec<$ty>> for Root {
            fn as_ref(&self) -> &Vec<$ty> {
                &self.$field
            }
        }

        impl AsMut<Vec<$ty>> for Root {
            fn as_mut(&mut self) -> &mut Vec<$ty> {
                &mut self.$field
            }
        }
    };
}

impl_as_vec!(Accessor, accessors);
impl_as_vec!(Animation, animations);
impl_as_vec!(Buffer, buffers);
impl_as_vec!(buffer::View, buffer_views);
impl_as_vec!(Camera, cameras);
impl_as_vec!(Image, images);
impl_as_vec!(Material, materials);
impl_as_vec!(Mesh, meshes);
impl_as_vec!(Node, nodes);
impl_as_vec!(texture::Sampler, samplers);
impl_as_vec!(Scene, scenes);
impl_as_vec!(Skin, skins);
impl_as_vec!(Texture, textures);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_allocates_dense_indices() {
        let mut root = Root::default();
        let a = root.push(Scene::default());
        let b = root.push(Scene::default());
        assert_eq!(0, a.value());
        assert_eq!(1, b.value());
        assert_eq!(2, root.scenes.len());
    }

    #[test]
    fn empty_root_serializes_asset_only() {
        let root = Root::default();
        let json = root.to_string().unwrap();
        assert_eq!(r#"{"asset":{"version":"2.0"}}"#, &json);
    }
}
