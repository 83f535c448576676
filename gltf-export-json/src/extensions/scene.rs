use serde_derive::Serialize;
use serde_json::{Map, Value};

use crate::{accessor, Index};
use std::collections::BTreeMap;

/// Extension payloads attached to a `Node`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Node {
    /// `KHR_lights_punctual` payload: the light instantiated at this node.
    #[serde(
        rename = "KHR_lights_punctual",
        skip_serializing_if = "Option::is_none"
    )]
    pub khr_lights_punctual: Option<khr_lights_punctual::LightRef>,

    /// `EXT_mesh_gpu_instancing` payload.
    #[serde(
        rename = "EXT_mesh_gpu_instancing",
        skip_serializing_if = "Option::is_none"
    )]
    pub ext_mesh_gpu_instancing: Option<MeshGpuInstancing>,

    /// Custom extensions keyed by name.
    #[serde(flatten)]
    pub others: Map<String, Value>,
}

/// Extension payloads attached to a `Scene`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Scene {
    /// Custom extensions keyed by name.
    #[serde(flatten)]
    pub others: Map<String, Value>,
}

/// Per-instance attribute tables for GPU instancing.
#[derive(Clone, Debug, Default, Serialize)]
pub struct MeshGpuInstancing {
    /// Accessors holding one element per instance, keyed by attribute
    /// semantic (`TRANSLATION`, `ROTATION`, `SCALE`, `_COLOR_0`, ...).
    pub attributes: BTreeMap<String, Index<accessor::Accessor>>,
}

/// Data structures for the `KHR_lights_punctual` extension.
pub mod khr_lights_punctual {
    use serde::ser;
    use serde_derive::Serialize;

    use crate::Index;

    /// Specifies the light subcategory.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum Type {
        /// The light is at an infinite distance and emits along -z.
        Directional = 1,

        /// The light emits in all directions from its position.
        Point,

        /// The light emits in a cone along -z from its position.
        Spot,
    }

    impl ser::Serialize for Type {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: ser::Serializer,
        {
            serializer.serialize_str(match *self {
                Type::Directional => "directional",
                Type::Point => "point",
                Type::Spot => "spot",
            })
        }
    }

    /// A punctual light source in the scene.
    #[derive(Clone, Debug, Serialize)]
    pub struct Light {
        /// RGB color in linear space.
        pub color: [f32; 3],

        /// Brightness; point and spot lights use luminous intensity in
        /// candela, directional lights use illuminance in lux.
        pub intensity: f32,

        /// Optional user-defined name for this object.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,

        /// Distance cutoff at which the light's intensity may be considered
        /// to have reached zero.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub range: Option<f32>,

        /// Spot cone parameters; present only when `type` is `spot`.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub spot: Option<Spot>,

        /// Specifies the light subcategory.
        #[serde(rename = "type")]
        pub type_: Type,
    }

    /// The two cone angles of a spot light.
    #[derive(Clone, Debug, Serialize)]
    pub struct Spot {
        /// Angle in radians from the center of the spotlight where falloff
        /// begins.
        #[serde(rename = "innerConeAngle")]
        pub inner_cone_angle: f32,

        /// Angle in radians from the center of the spotlight where falloff
        /// ends.
        #[serde(rename = "outerConeAngle")]
        pub outer_cone_angle: f32,
    }

    /// Node-scoped reference into the document light array.
    #[derive(Clone, Debug, Serialize)]
    pub struct LightRef {
        /// The index of the light in the document-scoped light array.
        pub light: Index<Light>,
    }
}
