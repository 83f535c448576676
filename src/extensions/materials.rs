//! The physical-material plug-in family.
//!
//! Each plug-in inspects the material's parameters and emits its extension
//! payload only when at least one parameter deviates from the extension's
//! schema default, so untouched materials stay extension-free.

use gltf_export_json as json;
use json::extensions::material as ext;

use super::Plugin;
use crate::scene::{Material, MaterialKind};
use crate::writer::Writer;
use crate::Error;

/// Emits `KHR_materials_unlit` for basic (shading-free) materials and
/// resets the metallic-roughness factors to the unlit convention.
#[derive(Default)]
pub struct KhrMaterialsUnlit;

impl KhrMaterialsUnlit {
    /// The registry factory for this plug-in.
    pub fn factory() -> Box<dyn Plugin> {
        Box::new(KhrMaterialsUnlit)
    }
}

impl Plugin for KhrMaterialsUnlit {
    fn write_material(
        &mut self,
        writer: &mut Writer<'_>,
        material: &Material,
        def: &mut json::Material,
    ) -> Result<(), Error> {
        if material.kind != MaterialKind::Basic {
            return Ok(());
        }
        def.extensions_mut().unlit = Some(ext::Unlit {});
        def.pbr_metallic_roughness.metallic_factor = 0.0;
        def.pbr_metallic_roughness.roughness_factor = 0.9;
        writer.extension_used("KHR_materials_unlit");
        Ok(())
    }
}

/// Emits `KHR_materials_transmission`.
#[derive(Default)]
pub struct KhrMaterialsTransmission;

impl KhrMaterialsTransmission {
    /// The registry factory for this plug-in.
    pub fn factory() -> Box<dyn Plugin> {
        Box::new(KhrMaterialsTransmission)
    }
}

impl Plugin for KhrMaterialsTransmission {
    fn write_material(
        &mut self,
        writer: &mut Writer<'_>,
        material: &Material,
        def: &mut json::Material,
    ) -> Result<(), Error> {
        let physical = match material.physical() {
            Some(physical) if physical.transmission != 0.0 => physical,
            _ => return Ok(()),
        };

        let mut payload = ext::Transmission {
            transmission_factor: Some(physical.transmission),
            ..Default::default()
        };
        if let Some(map) = physical.transmission_map {
            payload.transmission_texture = Some(writer.texture_info(map)?);
        }

        def.extensions_mut().transmission = Some(payload);
        writer.extension_used("KHR_materials_transmission");
        Ok(())
    }
}

/// Emits `KHR_materials_volume`.
///
/// Kept for output compatibility: the gate is `transmission == 0`, not
/// thickness, so a purely volumetric material without transmission emits no
/// volume data.
#[derive(Default)]
pub struct KhrMaterialsVolume;

impl KhrMaterialsVolume {
    /// The registry factory for this plug-in.
    pub fn factory() -> Box<dyn Plugin> {
        Box::new(KhrMaterialsVolume)
    }
}

impl Plugin for KhrMaterialsVolume {
    fn write_material(
        &mut self,
        writer: &mut Writer<'_>,
        material: &Material,
        def: &mut json::Material,
    ) -> Result<(), Error> {
        let physical = match material.physical() {
            Some(physical) if physical.transmission != 0.0 => physical,
            _ => return Ok(()),
        };

        let mut payload = ext::Volume {
            thickness_factor: Some(physical.thickness),
            attenuation_color: Some(physical.attenuation_color),
            ..Default::default()
        };
        if physical.attenuation_distance.is_finite() {
            payload.attenuation_distance = Some(physical.attenuation_distance);
        }
        if let Some(map) = physical.thickness_map {
            payload.thickness_texture = Some(writer.texture_info(map)?);
        }

        def.extensions_mut().volume = Some(payload);
        writer.extension_used("KHR_materials_volume");
        Ok(())
    }
}

/// Emits `KHR_materials_ior`.
#[derive(Default)]
pub struct KhrMaterialsIor;

impl KhrMaterialsIor {
    /// The registry factory for this plug-in.
    pub fn factory() -> Box<dyn Plugin> {
        Box::new(KhrMaterialsIor)
    }
}

impl Plugin for KhrMaterialsIor {
    fn write_material(
        &mut self,
        writer: &mut Writer<'_>,
        material: &Material,
        def: &mut json::Material,
    ) -> Result<(), Error> {
        let physical = match material.physical() {
            Some(physical) if physical.ior != 1.5 => physical,
            _ => return Ok(()),
        };

        def.extensions_mut().ior = Some(ext::Ior {
            ior: Some(physical.ior),
        });
        writer.extension_used("KHR_materials_ior");
        Ok(())
    }
}

/// Emits `KHR_materials_specular`.
#[derive(Default)]
pub struct KhrMaterialsSpecular;

impl KhrMaterialsSpecular {
    /// The registry factory for this plug-in.
    pub fn factory() -> Box<dyn Plugin> {
        Box::new(KhrMaterialsSpecular)
    }
}

impl Plugin for KhrMaterialsSpecular {
    fn write_material(
        &mut self,
        writer: &mut Writer<'_>,
        material: &Material,
        def: &mut json::Material,
    ) -> Result<(), Error> {
        let physical = match material.physical() {
            Some(physical) => physical,
            None => return Ok(()),
        };
        let default = physical.specular_intensity == 1.0
            && physical.specular_color == [1.0, 1.0, 1.0]
            && physical.specular_intensity_map.is_none()
            && physical.specular_color_map.is_none();
        if default {
            return Ok(());
        }

        let mut payload = ext::Specular {
            specular_factor: Some(physical.specular_intensity),
            specular_color_factor: Some(physical.specular_color),
            ..Default::default()
        };
        if let Some(map) = physical.specular_intensity_map {
            payload.specular_texture = Some(writer.texture_info(map)?);
        }
        if let Some(map) = physical.specular_color_map {
            payload.specular_color_texture = Some(writer.texture_info(map)?);
        }

        def.extensions_mut().specular = Some(payload);
        writer.extension_used("KHR_materials_specular");
        Ok(())
    }
}

/// Emits `KHR_materials_clearcoat`.
#[derive(Default)]
pub struct KhrMaterialsClearcoat;

impl KhrMaterialsClearcoat {
    /// The registry factory for this plug-in.
    pub fn factory() -> Box<dyn Plugin> {
        Box::new(KhrMaterialsClearcoat)
    }
}

impl Plugin for KhrMaterialsClearcoat {
    fn write_material(
        &mut self,
        writer: &mut Writer<'_>,
        material: &Material,
        def: &mut json::Material,
    ) -> Result<(), Error> {
        let physical = match material.physical() {
            Some(physical) if physical.clearcoat != 0.0 => physical,
            _ => return Ok(()),
        };

        let mut payload = ext::Clearcoat {
            clearcoat_factor: Some(physical.clearcoat),
            clearcoat_roughness_factor: Some(physical.clearcoat_roughness),
            ..Default::default()
        };
        if let Some(map) = physical.clearcoat_map {
            payload.clearcoat_texture = Some(writer.texture_info(map)?);
        }
        if let Some(map) = physical.clearcoat_roughness_map {
            payload.clearcoat_roughness_texture = Some(writer.texture_info(map)?);
        }
        if let Some(map) = physical.clearcoat_normal_map {
            payload.clearcoat_normal_texture =
                Some(writer.normal_texture(map, physical.clearcoat_normal_scale)?);
        }

        def.extensions_mut().clearcoat = Some(payload);
        writer.extension_used("KHR_materials_clearcoat");
        Ok(())
    }
}

/// Emits `KHR_materials_dispersion`.
#[derive(Default)]
pub struct KhrMaterialsDispersion;

impl KhrMaterialsDispersion {
    /// The registry factory for this plug-in.
    pub fn factory() -> Box<dyn Plugin> {
        Box::new(KhrMaterialsDispersion)
    }
}

impl Plugin for KhrMaterialsDispersion {
    fn write_material(
        &mut self,
        writer: &mut Writer<'_>,
        material: &Material,
        def: &mut json::Material,
    ) -> Result<(), Error> {
        let physical = match material.physical() {
            Some(physical) if physical.dispersion != 0.0 => physical,
            _ => return Ok(()),
        };

        def.extensions_mut().dispersion = Some(ext::Dispersion {
            dispersion: Some(physical.dispersion),
        });
        writer.extension_used("KHR_materials_dispersion");
        Ok(())
    }
}

/// Emits `KHR_materials_iridescence`.
#[derive(Default)]
pub struct KhrMaterialsIridescence;

impl KhrMaterialsIridescence {
    /// The registry factory for this plug-in.
    pub fn factory() -> Box<dyn Plugin> {
        Box::new(KhrMaterialsIridescence)
    }
}

impl Plugin for KhrMaterialsIridescence {
    fn write_material(
        &mut self,
        writer: &mut Writer<'_>,
        material: &Material,
        def: &mut json::Material,
    ) -> Result<(), Error> {
        let physical = match material.physical() {
            Some(physical) if physical.iridescence != 0.0 => physical,
            _ => return Ok(()),
        };

        let mut payload = ext::Iridescence {
            iridescence_factor: Some(physical.iridescence),
            iridescence_ior: Some(physical.iridescence_ior),
            iridescence_thickness_minimum: Some(physical.iridescence_thickness_range[0]),
            iridescence_thickness_maximum: Some(physical.iridescence_thickness_range[1]),
            ..Default::default()
        };
        if let Some(map) = physical.iridescence_map {
            payload.iridescence_texture = Some(writer.texture_info(map)?);
        }
        if let Some(map) = physical.iridescence_thickness_map {
            payload.iridescence_thickness_texture = Some(writer.texture_info(map)?);
        }

        def.extensions_mut().iridescence = Some(payload);
        writer.extension_used("KHR_materials_iridescence");
        Ok(())
    }
}

/// Emits `KHR_materials_sheen`.
#[derive(Default)]
pub struct KhrMaterialsSheen;

impl KhrMaterialsSheen {
    /// The registry factory for this plug-in.
    pub fn factory() -> Box<dyn Plugin> {
        Box::new(KhrMaterialsSheen)
    }
}

impl Plugin for KhrMaterialsSheen {
    fn write_material(
        &mut self,
        writer: &mut Writer<'_>,
        material: &Material,
        def: &mut json::Material,
    ) -> Result<(), Error> {
        let physical = match material.physical() {
            Some(physical) if physical.sheen != 0.0 => physical,
            _ => return Ok(()),
        };

        let mut payload = ext::Sheen {
            sheen_color_factor: Some(physical.sheen_color),
            sheen_roughness_factor: Some(physical.sheen_roughness),
            ..Default::default()
        };
        if let Some(map) = physical.sheen_color_map {
            payload.sheen_color_texture = Some(writer.texture_info(map)?);
        }
        if let Some(map) = physical.sheen_roughness_map {
            payload.sheen_roughness_texture = Some(writer.texture_info(map)?);
        }

        def.extensions_mut().sheen = Some(payload);
        writer.extension_used("KHR_materials_sheen");
        Ok(())
    }
}

/// Emits `KHR_materials_anisotropy`.
#[derive(Default)]
pub struct KhrMaterialsAnisotropy;

impl KhrMaterialsAnisotropy {
    /// The registry factory for this plug-in.
    pub fn factory() -> Box<dyn Plugin> {
        Box::new(KhrMaterialsAnisotropy)
    }
}

impl Plugin for KhrMaterialsAnisotropy {
    fn write_material(
        &mut self,
        writer: &mut Writer<'_>,
        material: &Material,
        def: &mut json::Material,
    ) -> Result<(), Error> {
        let physical = match material.physical() {
            Some(physical) if physical.anisotropy != 0.0 => physical,
            _ => return Ok(()),
        };

        let mut payload = ext::Anisotropy {
            anisotropy_strength: Some(physical.anisotropy),
            anisotropy_rotation: Some(physical.anisotropy_rotation),
            ..Default::default()
        };
        if let Some(map) = physical.anisotropy_map {
            payload.anisotropy_texture = Some(writer.texture_info(map)?);
        }

        def.extensions_mut().anisotropy = Some(payload);
        writer.extension_used("KHR_materials_anisotropy");
        Ok(())
    }
}

/// Emits `KHR_materials_emissive_strength` for emissive intensities other
/// than 1.0.
#[derive(Default)]
pub struct KhrMaterialsEmissiveStrength;

impl KhrMaterialsEmissiveStrength {
    /// The registry factory for this plug-in.
    pub fn factory() -> Box<dyn Plugin> {
        Box::new(KhrMaterialsEmissiveStrength)
    }
}

impl Plugin for KhrMaterialsEmissiveStrength {
    fn write_material(
        &mut self,
        writer: &mut Writer<'_>,
        material: &Material,
        def: &mut json::Material,
    ) -> Result<(), Error> {
        if !material.is_pbr() || material.emissive_intensity == 1.0 {
            return Ok(());
        }

        def.extensions_mut().emissive_strength = Some(ext::EmissiveStrength {
            emissive_strength: Some(material.emissive_intensity),
        });
        writer.extension_used("KHR_materials_emissive_strength");
        Ok(())
    }
}

/// Emits `EXT_materials_bump` for materials with a height map or a
/// non-default bump scale.
#[derive(Default)]
pub struct ExtMaterialsBump;

impl ExtMaterialsBump {
    /// The registry factory for this plug-in.
    pub fn factory() -> Box<dyn Plugin> {
        Box::new(ExtMaterialsBump)
    }
}

impl Plugin for ExtMaterialsBump {
    fn write_material(
        &mut self,
        writer: &mut Writer<'_>,
        material: &Material,
        def: &mut json::Material,
    ) -> Result<(), Error> {
        if !material.is_pbr() || (material.bump_scale == 1.0 && material.bump_map.is_none()) {
            return Ok(());
        }

        let mut payload = ext::Bump {
            bump_factor: Some(material.bump_scale),
            ..Default::default()
        };
        if let Some(map) = material.bump_map {
            payload.bump_texture = Some(writer.texture_info(map)?);
        }

        def.extensions_mut().bump = Some(payload);
        writer.extension_used("EXT_materials_bump");
        Ok(())
    }
}
