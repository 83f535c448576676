use serde_json::{Map, Value};

use super::TextureId;

/// Which material model the parameters describe.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MaterialKind {
    /// Metallic-roughness PBR.
    #[default]
    Standard,

    /// Metallic-roughness PBR with the extended physical parameter set
    /// (transmission, clearcoat, iridescence, ...).
    Physical,

    /// A shading-free material, exported as `KHR_materials_unlit`.
    Basic,

    /// A custom-shader material; cannot be exported and is skipped with a
    /// warning.
    Shader,
}

/// Which face side is rendered.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Side {
    /// Front faces only.
    #[default]
    Front,

    /// Back faces only.
    Back,

    /// Both sides; exported as `doubleSided`.
    Double,
}

/// Surface appearance of a mesh.
#[derive(Clone, Debug)]
pub struct Material {
    /// Material name; empty names are omitted from the output.
    pub name: String,

    /// The material model.
    pub kind: MaterialKind,

    /// RGBA base color; alpha is the material opacity.
    pub base_color: [f32; 4],

    /// Base color texture.
    pub base_color_map: Option<TextureId>,

    /// Metalness factor.
    pub metalness: f32,

    /// Roughness factor.
    pub roughness: f32,

    /// Metalness texture, sampled from B.
    pub metalness_map: Option<TextureId>,

    /// Roughness texture, sampled from G.
    pub roughness_map: Option<TextureId>,

    /// Emissive color.
    pub emissive: [f32; 3],

    /// Emissive intensity multiplier; values other than 1.0 emit
    /// `KHR_materials_emissive_strength`.
    pub emissive_intensity: f32,

    /// Emissive texture.
    pub emissive_map: Option<TextureId>,

    /// Tangent-space normal map.
    pub normal_map: Option<TextureId>,

    /// Normal map scale; only the X component is exported.
    pub normal_scale: [f32; 2],

    /// Ambient occlusion texture, sampled from R.
    pub occlusion_map: Option<TextureId>,

    /// Ambient occlusion intensity.
    pub occlusion_intensity: f32,

    /// Height map; emits `EXT_materials_bump`.
    pub bump_map: Option<TextureId>,

    /// Height map scale.
    pub bump_scale: f32,

    /// Whether the material blends with the background.
    pub transparent: bool,

    /// Alpha cutoff; positive values select `MASK` alpha mode.
    pub alpha_test: f32,

    /// Which face side is rendered.
    pub side: Side,

    /// Whether the mesh renders as a wireframe; forces `LINES` topology.
    pub wireframe: bool,

    /// Extended physical parameters; consulted only for
    /// [`MaterialKind::Physical`].
    pub physical: PhysicalProperties,

    /// Custom glTF extensions to copy onto the emitted material when
    /// `include_custom_extensions` is set.
    pub extensions: Map<String, Value>,
}

impl Default for Material {
    fn default() -> Self {
        Material {
            name: String::new(),
            kind: MaterialKind::Standard,
            base_color: [1.0, 1.0, 1.0, 1.0],
            base_color_map: None,
            metalness: 0.0,
            roughness: 1.0,
            metalness_map: None,
            roughness_map: None,
            emissive: [0.0; 3],
            emissive_intensity: 1.0,
            emissive_map: None,
            normal_map: None,
            normal_scale: [1.0, 1.0],
            occlusion_map: None,
            occlusion_intensity: 1.0,
            bump_map: None,
            bump_scale: 1.0,
            transparent: false,
            alpha_test: 0.0,
            side: Side::Front,
            wireframe: false,
            physical: PhysicalProperties::default(),
            extensions: Map::new(),
        }
    }
}

impl Material {
    /// Returns the extended physical parameters when the material uses the
    /// physical model.
    pub fn physical(&self) -> Option<&PhysicalProperties> {
        match self.kind {
            MaterialKind::Physical => Some(&self.physical),
            _ => None,
        }
    }

    /// Whether the material carries authored metallic-roughness values.
    pub fn is_pbr(&self) -> bool {
        matches!(self.kind, MaterialKind::Standard | MaterialKind::Physical)
    }
}

/// Parameters of the extended physical material model.
///
/// Every field defaults to the value at which the corresponding extension is
/// elided.
#[derive(Clone, Debug)]
pub struct PhysicalProperties {
    /// Fraction of light transmitted through the surface.
    pub transmission: f32,

    /// Transmission texture, sampled from R.
    pub transmission_map: Option<TextureId>,

    /// Volume thickness beneath the surface.
    pub thickness: f32,

    /// Thickness texture, sampled from G.
    pub thickness_map: Option<TextureId>,

    /// Distance at which light reaches the attenuation color.
    pub attenuation_distance: f32,

    /// Attenuation color.
    pub attenuation_color: [f32; 3],

    /// Index of refraction.
    pub ior: f32,

    /// Specular reflection strength.
    pub specular_intensity: f32,

    /// Specular strength texture, sampled from A.
    pub specular_intensity_map: Option<TextureId>,

    /// Specular F0 color.
    pub specular_color: [f32; 3],

    /// Specular F0 color texture.
    pub specular_color_map: Option<TextureId>,

    /// Clearcoat layer intensity.
    pub clearcoat: f32,

    /// Clearcoat intensity texture.
    pub clearcoat_map: Option<TextureId>,

    /// Clearcoat layer roughness.
    pub clearcoat_roughness: f32,

    /// Clearcoat roughness texture.
    pub clearcoat_roughness_map: Option<TextureId>,

    /// Clearcoat normal map.
    pub clearcoat_normal_map: Option<TextureId>,

    /// Clearcoat normal map scale.
    pub clearcoat_normal_scale: f32,

    /// Dispersion strength.
    pub dispersion: f32,

    /// Iridescence intensity.
    pub iridescence: f32,

    /// Iridescence intensity texture.
    pub iridescence_map: Option<TextureId>,

    /// Index of refraction of the iridescent thin film.
    pub iridescence_ior: f32,

    /// Thin-film thickness range `[minimum, maximum]` in nanometers.
    pub iridescence_thickness_range: [f32; 2],

    /// Thin-film thickness texture, sampled from G.
    pub iridescence_thickness_map: Option<TextureId>,

    /// Sheen intensity.
    pub sheen: f32,

    /// Sheen color.
    pub sheen_color: [f32; 3],

    /// Sheen color texture.
    pub sheen_color_map: Option<TextureId>,

    /// Sheen roughness.
    pub sheen_roughness: f32,

    /// Sheen roughness texture, sampled from A.
    pub sheen_roughness_map: Option<TextureId>,

    /// Anisotropy strength.
    pub anisotropy: f32,

    /// Anisotropy direction, in radians from the tangent.
    pub anisotropy_rotation: f32,

    /// Anisotropy texture.
    pub anisotropy_map: Option<TextureId>,
}

impl Default for PhysicalProperties {
    fn default() -> Self {
        PhysicalProperties {
            transmission: 0.0,
            transmission_map: None,
            thickness: 0.0,
            thickness_map: None,
            attenuation_distance: f32::INFINITY,
            attenuation_color: [1.0; 3],
            ior: 1.5,
            specular_intensity: 1.0,
            specular_intensity_map: None,
            specular_color: [1.0; 3],
            specular_color_map: None,
            clearcoat: 0.0,
            clearcoat_map: None,
            clearcoat_roughness: 0.0,
            clearcoat_roughness_map: None,
            clearcoat_normal_map: None,
            clearcoat_normal_scale: 1.0,
            dispersion: 0.0,
            iridescence: 0.0,
            iridescence_map: None,
            iridescence_ior: 1.3,
            iridescence_thickness_range: [100.0, 400.0],
            iridescence_thickness_map: None,
            sheen: 0.0,
            sheen_color: [0.0; 3],
            sheen_color_map: None,
            sheen_roughness: 1.0,
            sheen_roughness_map: None,
            anisotropy: 0.0,
            anisotropy_rotation: 0.0,
            anisotropy_map: None,
        }
    }
}
