use serde_derive::Serialize;

use crate::{camera, extensions, mesh, skin, Extras, Index};

/// A node in the node hierarchy.
///
/// A node can have either a `matrix` or any combination of
/// `translation`/`rotation`/`scale` (TRS) properties; TRS properties are
/// converted to matrices and postmultiplied in the `T * R * S` order. When a
/// node is targeted for animation, only TRS properties may be present.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Node {
    /// The index of the camera referenced by this node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<Index<camera::Camera>>,

    /// The indices of this node's children.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Index<Node>>>,

    /// Extension specific data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<extensions::scene::Node>,

    /// Optional application specific data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extras: Extras,

    /// 4x4 column-major transformation matrix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix: Option<[f32; 16]>,

    /// The index of the mesh in this node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesh: Option<Index<mesh::Mesh>>,

    /// Optional user-defined name for this object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The node's unit quaternion rotation in the order `(x, y, z, w)`,
    /// where `w` is the scalar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f32; 4]>,

    /// The node's non-uniform scale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<[f32; 3]>,

    /// The node's translation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<[f32; 3]>,

    /// The index of the skin referenced by this node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skin: Option<Index<skin::Skin>>,
}

impl Node {
    /// Returns the extension record, creating it on first use.
    pub fn extensions_mut(&mut self) -> &mut extensions::scene::Node {
        self.extensions.get_or_insert_with(Default::default)
    }
}

/// The root nodes of a scene.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Scene {
    /// Extension specific data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<extensions::scene::Scene>,

    /// Optional application specific data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extras: Extras,

    /// Optional user-defined name for this object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The indices of each root node.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<Index<Node>>,
}
