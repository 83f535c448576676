use serde_derive::Serialize;
use serde_json::{Map, Value};

use crate::{material, texture};

/// Extension payloads attached to a `Material`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Material {
    /// `KHR_materials_anisotropy` payload.
    #[serde(
        rename = "KHR_materials_anisotropy",
        skip_serializing_if = "Option::is_none"
    )]
    pub anisotropy: Option<Anisotropy>,

    /// `EXT_materials_bump` payload.
    #[serde(
        rename = "EXT_materials_bump",
        skip_serializing_if = "Option::is_none"
    )]
    pub bump: Option<Bump>,

    /// `KHR_materials_clearcoat` payload.
    #[serde(
        rename = "KHR_materials_clearcoat",
        skip_serializing_if = "Option::is_none"
    )]
    pub clearcoat: Option<Clearcoat>,

    /// `KHR_materials_dispersion` payload.
    #[serde(
        rename = "KHR_materials_dispersion",
        skip_serializing_if = "Option::is_none"
    )]
    pub dispersion: Option<Dispersion>,

    /// `KHR_materials_emissive_strength` payload.
    #[serde(
        rename = "KHR_materials_emissive_strength",
        skip_serializing_if = "Option::is_none"
    )]
    pub emissive_strength: Option<EmissiveStrength>,

    /// `KHR_materials_ior` payload.
    #[serde(rename = "KHR_materials_ior", skip_serializing_if = "Option::is_none")]
    pub ior: Option<Ior>,

    /// `KHR_materials_iridescence` payload.
    #[serde(
        rename = "KHR_materials_iridescence",
        skip_serializing_if = "Option::is_none"
    )]
    pub iridescence: Option<Iridescence>,

    /// `KHR_materials_sheen` payload.
    #[serde(rename = "KHR_materials_sheen", skip_serializing_if = "Option::is_none")]
    pub sheen: Option<Sheen>,

    /// `KHR_materials_specular` payload.
    #[serde(
        rename = "KHR_materials_specular",
        skip_serializing_if = "Option::is_none"
    )]
    pub specular: Option<Specular>,

    /// `KHR_materials_transmission` payload.
    #[serde(
        rename = "KHR_materials_transmission",
        skip_serializing_if = "Option::is_none"
    )]
    pub transmission: Option<Transmission>,

    /// `KHR_materials_unlit` payload.
    #[serde(rename = "KHR_materials_unlit", skip_serializing_if = "Option::is_none")]
    pub unlit: Option<Unlit>,

    /// `KHR_materials_volume` payload.
    #[serde(
        rename = "KHR_materials_volume",
        skip_serializing_if = "Option::is_none"
    )]
    pub volume: Option<Volume>,

    /// Custom extensions keyed by name.
    #[serde(flatten)]
    pub others: Map<String, Value>,
}

/// Declares the material anisotropic.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Anisotropy {
    /// The anisotropy strength.
    #[serde(
        rename = "anisotropyStrength",
        skip_serializing_if = "Option::is_none"
    )]
    pub anisotropy_strength: Option<f32>,

    /// The rotation of the anisotropy in tangent space, in radians.
    #[serde(
        rename = "anisotropyRotation",
        skip_serializing_if = "Option::is_none"
    )]
    pub anisotropy_rotation: Option<f32>,

    /// The anisotropy texture; direction in RG, strength in B.
    #[serde(rename = "anisotropyTexture", skip_serializing_if = "Option::is_none")]
    pub anisotropy_texture: Option<texture::Info>,
}

/// Adjusts the apparent bumpiness of the surface.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Bump {
    /// The strength of the bump map effect.
    #[serde(rename = "bumpFactor", skip_serializing_if = "Option::is_none")]
    pub bump_factor: Option<f32>,

    /// The height map texture.
    #[serde(rename = "bumpTexture", skip_serializing_if = "Option::is_none")]
    pub bump_texture: Option<texture::Info>,
}

/// Declares a clear coating on the material surface.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Clearcoat {
    /// The clearcoat layer intensity.
    #[serde(rename = "clearcoatFactor", skip_serializing_if = "Option::is_none")]
    pub clearcoat_factor: Option<f32>,

    /// The clearcoat layer intensity texture.
    #[serde(rename = "clearcoatTexture", skip_serializing_if = "Option::is_none")]
    pub clearcoat_texture: Option<texture::Info>,

    /// The clearcoat layer roughness.
    #[serde(
        rename = "clearcoatRoughnessFactor",
        skip_serializing_if = "Option::is_none"
    )]
    pub clearcoat_roughness_factor: Option<f32>,

    /// The clearcoat layer roughness texture.
    #[serde(
        rename = "clearcoatRoughnessTexture",
        skip_serializing_if = "Option::is_none"
    )]
    pub clearcoat_roughness_texture: Option<texture::Info>,

    /// The clearcoat normal map texture.
    #[serde(
        rename = "clearcoatNormalTexture",
        skip_serializing_if = "Option::is_none"
    )]
    pub clearcoat_normal_texture: Option<material::NormalTexture>,
}

/// Defines the strength and spectral distribution of light dispersion.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Dispersion {
    /// The strength of the dispersion effect, specified as 20/Abbe number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispersion: Option<f32>,
}

/// Scales the emissive factor beyond the [0, 1] range.
#[derive(Clone, Debug, Default, Serialize)]
pub struct EmissiveStrength {
    /// The strength adjustment to be multiplied with the material's emissive
    /// value.
    #[serde(rename = "emissiveStrength", skip_serializing_if = "Option::is_none")]
    pub emissive_strength: Option<f32>,
}

/// Sets the index of refraction of the material.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Ior {
    /// The index of refraction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ior: Option<f32>,
}

/// Declares a thin-film iridescence layer.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Iridescence {
    /// The iridescence intensity factor.
    #[serde(rename = "iridescenceFactor", skip_serializing_if = "Option::is_none")]
    pub iridescence_factor: Option<f32>,

    /// The iridescence intensity texture.
    #[serde(
        rename = "iridescenceTexture",
        skip_serializing_if = "Option::is_none"
    )]
    pub iridescence_texture: Option<texture::Info>,

    /// The index of refraction of the dielectric thin-film layer.
    #[serde(rename = "iridescenceIor", skip_serializing_if = "Option::is_none")]
    pub iridescence_ior: Option<f32>,

    /// The minimum thickness of the thin-film layer, in nanometers.
    #[serde(
        rename = "iridescenceThicknessMinimum",
        skip_serializing_if = "Option::is_none"
    )]
    pub iridescence_thickness_minimum: Option<f32>,

    /// The maximum thickness of the thin-film layer, in nanometers.
    #[serde(
        rename = "iridescenceThicknessMaximum",
        skip_serializing_if = "Option::is_none"
    )]
    pub iridescence_thickness_maximum: Option<f32>,

    /// The thickness texture of the thin-film layer, sampled from G.
    #[serde(
        rename = "iridescenceThicknessTexture",
        skip_serializing_if = "Option::is_none"
    )]
    pub iridescence_thickness_texture: Option<texture::Info>,
}

/// Declares a sheen layer for cloth-like materials.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Sheen {
    /// The sheen color.
    #[serde(rename = "sheenColorFactor", skip_serializing_if = "Option::is_none")]
    pub sheen_color_factor: Option<[f32; 3]>,

    /// The sheen color texture.
    #[serde(rename = "sheenColorTexture", skip_serializing_if = "Option::is_none")]
    pub sheen_color_texture: Option<texture::Info>,

    /// The sheen roughness.
    #[serde(
        rename = "sheenRoughnessFactor",
        skip_serializing_if = "Option::is_none"
    )]
    pub sheen_roughness_factor: Option<f32>,

    /// The sheen roughness texture, sampled from A.
    #[serde(
        rename = "sheenRoughnessTexture",
        skip_serializing_if = "Option::is_none"
    )]
    pub sheen_roughness_texture: Option<texture::Info>,
}

/// Adjusts the specular reflection at normal incidence.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Specular {
    /// The strength of the specular reflection.
    #[serde(rename = "specularFactor", skip_serializing_if = "Option::is_none")]
    pub specular_factor: Option<f32>,

    /// The specular strength texture, sampled from A.
    #[serde(rename = "specularTexture", skip_serializing_if = "Option::is_none")]
    pub specular_texture: Option<texture::Info>,

    /// The F0 color of the specular reflection.
    #[serde(
        rename = "specularColorFactor",
        skip_serializing_if = "Option::is_none"
    )]
    pub specular_color_factor: Option<[f32; 3]>,

    /// The F0 color texture.
    #[serde(
        rename = "specularColorTexture",
        skip_serializing_if = "Option::is_none"
    )]
    pub specular_color_texture: Option<texture::Info>,
}

/// Declares an optically transmissive material.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Transmission {
    /// The base fraction of light transmitted through the surface.
    #[serde(
        rename = "transmissionFactor",
        skip_serializing_if = "Option::is_none"
    )]
    pub transmission_factor: Option<f32>,

    /// The transmission texture, sampled from R.
    #[serde(
        rename = "transmissionTexture",
        skip_serializing_if = "Option::is_none"
    )]
    pub transmission_texture: Option<texture::Info>,
}

/// Declares an unlit material.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Unlit {}

/// Declares the material a homogeneous volume.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Volume {
    /// The thickness of the volume beneath the surface.
    #[serde(rename = "thicknessFactor", skip_serializing_if = "Option::is_none")]
    pub thickness_factor: Option<f32>,

    /// The thickness texture, sampled from G.
    #[serde(rename = "thicknessTexture", skip_serializing_if = "Option::is_none")]
    pub thickness_texture: Option<texture::Info>,

    /// The distance at which light reaches the average attenuation color.
    #[serde(
        rename = "attenuationDistance",
        skip_serializing_if = "Option::is_none"
    )]
    pub attenuation_distance: Option<f32>,

    /// The color that white light turns into due to absorption.
    #[serde(rename = "attenuationColor", skip_serializing_if = "Option::is_none")]
    pub attenuation_color: Option<[f32; 3]>,
}
