use serde_derive::Serialize;
use serde_json::{Map, Value};

use super::scene::khr_lights_punctual::Light;

/// Extension payloads attached to the document root.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Root {
    /// `KHR_lights_punctual` payload: all punctual lights in the asset.
    #[serde(
        rename = "KHR_lights_punctual",
        skip_serializing_if = "Option::is_none"
    )]
    pub khr_lights_punctual: Option<KhrLightsPunctual>,

    /// Custom extensions keyed by name.
    #[serde(flatten)]
    pub others: Map<String, Value>,
}

/// The document-scoped light array.
#[derive(Clone, Debug, Default, Serialize)]
pub struct KhrLightsPunctual {
    /// Lights that nodes may instantiate.
    pub lights: Vec<Light>,
}
