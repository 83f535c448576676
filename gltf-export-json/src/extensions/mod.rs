/// Contains extension payloads attached to `Material`.
pub mod material;

/// Contains extension payloads attached to `Mesh`.
pub mod mesh;

/// Contains extension payloads attached to `Root`.
pub mod root;

/// Contains extension payloads attached to `Scene` and `Node`.
pub mod scene;

/// Contains extension payloads attached to texture references.
pub mod texture;

/// Names of all extensions emitted by the built-in plug-ins.
pub const EMITTED_EXTENSIONS: &[&str] = &[
    "KHR_lights_punctual",
    "KHR_materials_anisotropy",
    "KHR_materials_clearcoat",
    "KHR_materials_dispersion",
    "KHR_materials_emissive_strength",
    "KHR_materials_ior",
    "KHR_materials_iridescence",
    "KHR_materials_sheen",
    "KHR_materials_specular",
    "KHR_materials_transmission",
    "KHR_materials_unlit",
    "KHR_materials_volume",
    "KHR_texture_transform",
    "EXT_materials_bump",
    "EXT_mesh_gpu_instancing",
];
