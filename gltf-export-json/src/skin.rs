use serde_derive::Serialize;

use crate::{accessor, scene, Extras, Index};

/// Joints and matrices defining a skin.
#[derive(Clone, Debug, Serialize)]
pub struct Skin {
    /// The index of the accessor containing the 4x4 inverse-bind matrices.
    ///
    /// When `None`, each matrix is assumed to be the 4x4 identity matrix
    /// which implies that the inverse-bind matrices were pre-applied.
    #[serde(
        rename = "inverseBindMatrices",
        skip_serializing_if = "Option::is_none"
    )]
    pub inverse_bind_matrices: Option<Index<accessor::Accessor>>,

    /// Indices of skeleton nodes used as joints in this skin.
    pub joints: Vec<Index<scene::Node>>,

    /// Optional user-defined name for this object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The index of the node used as a skeleton root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skeleton: Option<Index<scene::Node>>,

    /// Optional application specific data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extras: Extras,
}
