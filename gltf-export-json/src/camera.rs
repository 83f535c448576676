use serde::ser;
use serde_derive::Serialize;

use crate::Extras;

/// Specifies the camera type.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Type {
    /// A perspective projection.
    Perspective = 1,

    /// An orthographic projection.
    Orthographic,
}

impl ser::Serialize for Type {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        match *self {
            Type::Perspective => serializer.serialize_str("perspective"),
            Type::Orthographic => serializer.serialize_str("orthographic"),
        }
    }
}

/// A camera's projection.
///
/// A node can reference a camera to apply a transform to place the camera in
/// the scene.
#[derive(Clone, Debug, Serialize)]
pub struct Camera {
    /// Optional user-defined name for this object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// An orthographic camera containing properties to create an
    /// orthographic projection matrix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orthographic: Option<Orthographic>,

    /// A perspective camera containing properties to create a perspective
    /// projection matrix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perspective: Option<Perspective>,

    /// Specifies if the camera uses a perspective or orthographic
    /// projection.
    #[serde(rename = "type")]
    pub type_: Type,

    /// Optional application specific data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extras: Extras,
}

/// Values for an orthographic camera.
#[derive(Clone, Debug, Serialize)]
pub struct Orthographic {
    /// The horizontal magnification of the view.
    pub xmag: f32,

    /// The vertical magnification of the view.
    pub ymag: f32,

    /// The distance to the far clipping plane.
    pub zfar: f32,

    /// The distance to the near clipping plane.
    pub znear: f32,
}

/// Values for a perspective camera.
#[derive(Clone, Debug, Serialize)]
pub struct Perspective {
    /// Aspect ratio of the field of view.
    #[serde(rename = "aspectRatio", skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f32>,

    /// The vertical field of view in radians.
    pub yfov: f32,

    /// The distance to the far clipping plane.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zfar: Option<f32>,

    /// The distance to the near clipping plane.
    pub znear: f32,
}
