use serde_json::Value;

/// Application specific data attached to a glTF object.
///
/// `None` elides the `extras` member entirely.
pub type Extras = Option<Value>;
