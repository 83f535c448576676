use serde_derive::Serialize;
use serde_json::{Map, Value};

/// Extension payloads attached to a `Texture`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Texture {
    /// Custom extensions keyed by name.
    #[serde(flatten)]
    pub others: Map<String, Value>,
}

/// Extension payloads attached to a texture reference.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Info {
    /// `KHR_texture_transform` payload.
    #[serde(
        rename = "KHR_texture_transform",
        skip_serializing_if = "Option::is_none"
    )]
    pub texture_transform: Option<TextureTransform>,

    /// Custom extensions keyed by name.
    #[serde(flatten)]
    pub others: Map<String, Value>,
}

/// An affine transform applied to the UV coordinates of a texture
/// reference.
#[derive(Clone, Debug, Default, Serialize)]
pub struct TextureTransform {
    /// The offset of the UV coordinate origin as a factor of the texture
    /// dimensions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<[f32; 2]>,

    /// Rotation of the UVs around the origin, in radians
    /// counter-clockwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,

    /// The scale factor applied to the components of the UV coordinates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<[f32; 2]>,
}
