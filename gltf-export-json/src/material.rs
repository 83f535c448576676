use serde::ser;
use serde_derive::Serialize;

use crate::{extensions, texture, Extras, Index};

/// The alpha rendering mode of a material.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AlphaMode {
    /// The alpha value is ignored and the rendered output is fully opaque.
    Opaque = 1,

    /// The rendered output is either fully opaque or fully transparent
    /// depending on the alpha value and the specified alpha cutoff value.
    Mask,

    /// The alpha value is used to determine the transparency of the rendered
    /// output. The alpha cutoff value is ignored.
    Blend,
}

impl ser::Serialize for AlphaMode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        match *self {
            AlphaMode::Opaque => serializer.serialize_str("OPAQUE"),
            AlphaMode::Mask => serializer.serialize_str("MASK"),
            AlphaMode::Blend => serializer.serialize_str("BLEND"),
        }
    }
}

/// The material appearance of a primitive.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Material {
    /// The alpha cutoff value of the material.
    #[serde(rename = "alphaCutoff", skip_serializing_if = "Option::is_none")]
    pub alpha_cutoff: Option<f32>,

    /// The alpha rendering mode of the material.
    ///
    /// Absent in `Opaque` mode, the glTF default.
    #[serde(rename = "alphaMode", skip_serializing_if = "Option::is_none")]
    pub alpha_mode: Option<AlphaMode>,

    /// Specifies whether the material is double-sided.
    #[serde(rename = "doubleSided", skip_serializing_if = "is_false")]
    pub double_sided: bool,

    /// The emissive color of the material.
    #[serde(rename = "emissiveFactor", skip_serializing_if = "Option::is_none")]
    pub emissive_factor: Option<[f32; 3]>,

    /// The emissive map texture.
    #[serde(rename = "emissiveTexture", skip_serializing_if = "Option::is_none")]
    pub emissive_texture: Option<texture::Info>,

    /// Extension specific data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<extensions::material::Material>,

    /// Optional application specific data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extras: Extras,

    /// Optional user-defined name for this object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// A tangent space normal map.
    #[serde(rename = "normalTexture", skip_serializing_if = "Option::is_none")]
    pub normal_texture: Option<NormalTexture>,

    /// The occlusion map texture. The occlusion values are sampled from the
    /// R channel.
    #[serde(rename = "occlusionTexture", skip_serializing_if = "Option::is_none")]
    pub occlusion_texture: Option<OcclusionTexture>,

    /// A set of parameter values that are used to define the
    /// metallic-roughness material model from Physically-Based Rendering
    /// (PBR) methodology.
    #[serde(rename = "pbrMetallicRoughness")]
    pub pbr_metallic_roughness: PbrMetallicRoughness,
}

impl Material {
    /// Returns the extension record, creating it on first use.
    pub fn extensions_mut(&mut self) -> &mut extensions::material::Material {
        self.extensions.get_or_insert_with(Default::default)
    }
}

/// A set of parameter values that are used to define the metallic-roughness
/// material model.
#[derive(Clone, Debug, Serialize)]
pub struct PbrMetallicRoughness {
    /// The material's base color factor.
    ///
    /// Absent at the schema default of opaque white.
    #[serde(rename = "baseColorFactor", skip_serializing_if = "Option::is_none")]
    pub base_color_factor: Option<[f32; 4]>,

    /// The base color texture.
    #[serde(rename = "baseColorTexture", skip_serializing_if = "Option::is_none")]
    pub base_color_texture: Option<texture::Info>,

    /// The metalness of the material.
    #[serde(rename = "metallicFactor")]
    pub metallic_factor: f32,

    /// The metallic-roughness texture.
    ///
    /// The metalness values are sampled from the B channel; the roughness
    /// values are sampled from the G channel.
    #[serde(
        rename = "metallicRoughnessTexture",
        skip_serializing_if = "Option::is_none"
    )]
    pub metallic_roughness_texture: Option<texture::Info>,

    /// The roughness of the material.
    ///
    /// A value of 1.0 means the material is completely rough; 0.0 completely
    /// smooth.
    #[serde(rename = "roughnessFactor")]
    pub roughness_factor: f32,
}

impl Default for PbrMetallicRoughness {
    fn default() -> Self {
        Self {
            base_color_factor: None,
            base_color_texture: None,
            metallic_factor: 1.0,
            metallic_roughness_texture: None,
            roughness_factor: 1.0,
        }
    }
}

/// Defines the normal texture of a material.
#[derive(Clone, Debug, Serialize)]
pub struct NormalTexture {
    /// The index of the texture.
    pub index: Index<texture::Texture>,

    /// The scalar multiplier applied to each normal vector of the texture.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,

    /// The set index of the texture's `TEXCOORD` attribute.
    #[serde(rename = "texCoord", skip_serializing_if = "is_zero")]
    pub tex_coord: u32,

    /// Extension specific data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<extensions::texture::Info>,
}

/// Defines the occlusion texture of a material.
#[derive(Clone, Debug, Serialize)]
pub struct OcclusionTexture {
    /// The index of the texture.
    pub index: Index<texture::Texture>,

    /// The scalar multiplier controlling the amount of occlusion applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<f32>,

    /// The set index of the texture's `TEXCOORD` attribute.
    #[serde(rename = "texCoord", skip_serializing_if = "is_zero")]
    pub tex_coord: u32,

    /// Extension specific data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<extensions::texture::Info>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

fn is_zero(set: &u32) -> bool {
    *set == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_material_elides_everything_but_pbr() {
        let material = Material::default();
        let json = serde_json::to_string(&material).unwrap();
        assert_eq!(
            r#"{"pbrMetallicRoughness":{"metallicFactor":1.0,"roughnessFactor":1.0}}"#,
            &json
        );
    }
}
