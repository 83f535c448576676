use serde_derive::Serialize;

/// Metadata about the glTF asset.
#[derive(Clone, Debug, Serialize)]
pub struct Asset {
    /// A copyright message suitable for display to credit the content
    /// creator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,

    /// Tool that generated this glTF model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,

    /// The glTF version of this asset.
    pub version: String,
}

impl Default for Asset {
    fn default() -> Self {
        Self {
            copyright: None,
            generator: None,
            version: "2.0".to_string(),
        }
    }
}
