use serde_derive::Serialize;

use crate::{buffer, Extras, Index};

/// Image data used to create a texture.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Image {
    /// The index of the buffer view that contains the image, used instead of
    /// the image's uri property.
    #[serde(rename = "bufferView", skip_serializing_if = "Option::is_none")]
    pub buffer_view: Option<Index<buffer::View>>,

    /// The image's MIME type.
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<MimeType>,

    /// Optional user-defined name for this object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The uri of the image. Instead of referencing an external file, the
    /// uri can also be a data-uri. The image format must be jpg or png.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    /// Optional application specific data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extras: Extras,
}

/// An image MIME type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MimeType(pub String);
