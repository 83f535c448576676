//! Extension plug-ins.
//!
//! A plug-in cooperatively annotates the definitions the writer emits:
//! after each node, material, mesh or texture is assembled (but before it is
//! pushed into the document), every registered plug-in's matching hook runs
//! in registration order and may mutate the definition, emit additional
//! accessors or document-scoped payloads through the [`Writer`], and declare
//! the extension in `extensionsUsed` / `extensionsRequired`.

mod instancing;
mod lights;
mod materials;

pub use instancing::ExtMeshGpuInstancing;
pub use lights::KhrLightsPunctual;
pub use materials::{
    ExtMaterialsBump, KhrMaterialsAnisotropy, KhrMaterialsClearcoat, KhrMaterialsDispersion,
    KhrMaterialsEmissiveStrength, KhrMaterialsIor, KhrMaterialsIridescence, KhrMaterialsSheen,
    KhrMaterialsSpecular, KhrMaterialsTransmission, KhrMaterialsUnlit, KhrMaterialsVolume,
};

use gltf_export_json as json;

use crate::scene::{Material, MeshInstance, Node, Texture};
use crate::writer::Writer;
use crate::Error;

/// A writer plug-in.
///
/// Every hook has a no-op default body; implement only the capabilities the
/// extension needs.
pub trait Plugin {
    /// Runs before traversal begins.
    fn before_parse(&mut self, _writer: &mut Writer<'_>) -> Result<(), Error> {
        Ok(())
    }

    /// Annotates a node definition.
    fn write_node(
        &mut self,
        _writer: &mut Writer<'_>,
        _node: &Node,
        _def: &mut json::Node,
    ) -> Result<(), Error> {
        Ok(())
    }

    /// Annotates a material definition.
    fn write_material(
        &mut self,
        _writer: &mut Writer<'_>,
        _material: &Material,
        _def: &mut json::Material,
    ) -> Result<(), Error> {
        Ok(())
    }

    /// Annotates a mesh definition.
    fn write_mesh(
        &mut self,
        _writer: &mut Writer<'_>,
        _mesh: &MeshInstance,
        _def: &mut json::Mesh,
    ) -> Result<(), Error> {
        Ok(())
    }

    /// Annotates a texture definition.
    fn write_texture(
        &mut self,
        _writer: &mut Writer<'_>,
        _texture: &Texture,
        _def: &mut json::Texture,
    ) -> Result<(), Error> {
        Ok(())
    }

    /// Runs after traversal completes.
    fn after_parse(&mut self, _writer: &mut Writer<'_>) -> Result<(), Error> {
        Ok(())
    }
}

/// Creates one plug-in instance per write.
///
/// Factories are compared by function identity, which makes double
/// registration a no-op.
pub type PluginFactory = fn() -> Box<dyn Plugin>;

/// The built-in plug-in set, in invocation order.
pub(crate) fn builtin_plugins() -> Vec<PluginFactory> {
    vec![
        KhrLightsPunctual::factory,
        KhrMaterialsUnlit::factory,
        KhrMaterialsTransmission::factory,
        KhrMaterialsVolume::factory,
        KhrMaterialsIor::factory,
        KhrMaterialsSpecular::factory,
        KhrMaterialsClearcoat::factory,
        KhrMaterialsDispersion::factory,
        KhrMaterialsIridescence::factory,
        KhrMaterialsSheen::factory,
        KhrMaterialsAnisotropy::factory,
        KhrMaterialsEmissiveStrength::factory,
        ExtMaterialsBump::factory,
        ExtMeshGpuInstancing::factory,
    ]
}
