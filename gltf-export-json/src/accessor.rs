use serde::ser;
use serde_derive::Serialize;
use serde_json::Value;

use crate::{buffer, Extras, Index};

/// Corresponds to `GL_BYTE`.
pub const BYTE: u32 = 5120;

/// Corresponds to `GL_UNSIGNED_BYTE`.
pub const UNSIGNED_BYTE: u32 = 5121;

/// Corresponds to `GL_SHORT`.
pub const SHORT: u32 = 5122;

/// Corresponds to `GL_UNSIGNED_SHORT`.
pub const UNSIGNED_SHORT: u32 = 5123;

/// Corresponds to `GL_UNSIGNED_INT`.
pub const UNSIGNED_INT: u32 = 5125;

/// Corresponds to `GL_FLOAT`.
pub const FLOAT: u32 = 5126;

/// The component data type.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ComponentType {
    /// Corresponds to `GL_BYTE`.
    I8 = 1,
    /// Corresponds to `GL_UNSIGNED_BYTE`.
    U8,
    /// Corresponds to `GL_SHORT`.
    I16,
    /// Corresponds to `GL_UNSIGNED_SHORT`.
    U16,
    /// Corresponds to `GL_UNSIGNED_INT`.
    U32,
    /// Corresponds to `GL_FLOAT`.
    F32,
}

/// Specifies whether an attribute is a scalar, vector, or matrix.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Type {
    /// Scalar quantity.
    Scalar = 1,
    /// 2D vector.
    Vec2,
    /// 3D vector.
    Vec3,
    /// 4D vector.
    Vec4,
    /// 3x3 matrix.
    Mat3,
    /// 4x4 matrix.
    Mat4,
}

/// A typed view into a buffer view.
#[derive(Clone, Debug, Serialize)]
pub struct Accessor {
    /// The parent buffer view this accessor reads from.
    #[serde(rename = "bufferView", skip_serializing_if = "Option::is_none")]
    pub buffer_view: Option<Index<buffer::View>>,

    /// The offset relative to the start of the parent `BufferView` in bytes.
    #[serde(rename = "byteOffset", skip_serializing_if = "Option::is_none")]
    pub byte_offset: Option<usize>,

    /// The data type of components in the attribute.
    #[serde(rename = "componentType")]
    pub component_type: ComponentType,

    /// The number of elements within the buffer view - not to be confused
    /// with the number of bytes in the buffer view.
    pub count: usize,

    /// Optional application specific data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extras: Extras,

    /// Maximum value of each component in this attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Value>,

    /// Minimum value of each component in this attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Value>,

    /// Optional user-defined name for this object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Specifies whether integer data values should be normalized.
    #[serde(skip_serializing_if = "is_normalized_default")]
    pub normalized: bool,

    /// Specifies if the attribute is a scalar, vector, or matrix.
    #[serde(rename = "type")]
    pub type_: Type,
}

// Help serde avoid serializing this glTF 2.0 default value.
fn is_normalized_default(b: &bool) -> bool {
    !*b
}

impl ComponentType {
    /// Returns the number of bytes this value represents.
    pub fn size(self) -> usize {
        match self {
            ComponentType::I8 | ComponentType::U8 => 1,
            ComponentType::I16 | ComponentType::U16 => 2,
            ComponentType::U32 | ComponentType::F32 => 4,
        }
    }

    /// Returns the corresponding `GLenum`.
    pub fn as_gl_enum(self) -> u32 {
        match self {
            ComponentType::I8 => BYTE,
            ComponentType::U8 => UNSIGNED_BYTE,
            ComponentType::I16 => SHORT,
            ComponentType::U16 => UNSIGNED_SHORT,
            ComponentType::U32 => UNSIGNED_INT,
            ComponentType::F32 => FLOAT,
        }
    }
}

impl ser::Serialize for ComponentType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_u32(self.as_gl_enum())
    }
}

impl Type {
    /// Returns the equivalent number of scalar quantities this type
    /// represents.
    pub fn multiplicity(self) -> usize {
        match self {
            Type::Scalar => 1,
            Type::Vec2 => 2,
            Type::Vec3 => 3,
            Type::Vec4 => 4,
            Type::Mat3 => 9,
            Type::Mat4 => 16,
        }
    }

    /// Returns the accessor type for an element of `item_size` scalar
    /// components, or `None` when no accessor type matches.
    pub fn from_multiplicity(item_size: usize) -> Option<Self> {
        Some(match item_size {
            1 => Type::Scalar,
            2 => Type::Vec2,
            3 => Type::Vec3,
            4 => Type::Vec4,
            9 => Type::Mat3,
            16 => Type::Mat4,
            _ => return None,
        })
    }
}

impl ser::Serialize for Type {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_str(match *self {
            Type::Scalar => "SCALAR",
            Type::Vec2 => "VEC2",
            Type::Vec3 => "VEC3",
            Type::Vec4 => "VEC4",
            Type::Mat3 => "MAT3",
            Type::Mat4 => "MAT4",
        })
    }
}
