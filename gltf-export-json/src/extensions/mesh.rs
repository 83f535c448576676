use serde_derive::Serialize;
use serde_json::{Map, Value};

/// Extension payloads attached to a `Mesh`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Mesh {
    /// Custom extensions keyed by name.
    #[serde(flatten)]
    pub others: Map<String, Value>,
}
