use gltf_export_json as json;
use std::collections::BTreeMap;

use super::Plugin;
use crate::scene::{Attribute, Node, NodeBody};
use crate::util;
use crate::writer::Writer;
use crate::Error;

const NAME: &str = "EXT_mesh_gpu_instancing";

/// Emits `EXT_mesh_gpu_instancing` for instanced meshes: per-instance
/// translation/rotation/scale tables decomposed from the instance matrices,
/// plus an optional `_COLOR_0` table.
///
/// Consumers cannot meaningfully render the asset without the instance
/// tables, so the extension is declared required.
#[derive(Default)]
pub struct ExtMeshGpuInstancing;

impl ExtMeshGpuInstancing {
    /// The registry factory for this plug-in.
    pub fn factory() -> Box<dyn Plugin> {
        Box::new(ExtMeshGpuInstancing)
    }
}

impl Plugin for ExtMeshGpuInstancing {
    fn write_node(
        &mut self,
        writer: &mut Writer<'_>,
        node: &Node,
        def: &mut json::Node,
    ) -> Result<(), Error> {
        let instancing = match &node.body {
            NodeBody::Mesh(mesh) => match &mesh.instancing {
                Some(instancing) => instancing,
                None => return Ok(()),
            },
            _ => return Ok(()),
        };

        let count = instancing.matrices.len();
        let mut translations = Vec::with_capacity(count * 3);
        let mut rotations = Vec::with_capacity(count * 4);
        let mut scales = Vec::with_capacity(count * 3);
        for matrix in &instancing.matrices {
            let (translation, rotation, scale) = util::decompose(matrix);
            translations.extend_from_slice(&translation);
            rotations.extend_from_slice(&rotation);
            scales.extend_from_slice(&scale);
        }

        let mut attributes = BTreeMap::new();
        if let Some(accessor) =
            writer.process_data_accessor(&Attribute::f32(translations, 3))?
        {
            attributes.insert("TRANSLATION".to_string(), accessor);
        }
        if let Some(accessor) = writer.process_data_accessor(&Attribute::f32(rotations, 4))? {
            attributes.insert("ROTATION".to_string(), accessor);
        }
        if let Some(accessor) = writer.process_data_accessor(&Attribute::f32(scales, 3))? {
            attributes.insert("SCALE".to_string(), accessor);
        }
        if let Some(colors) = instancing.colors {
            let attribute = writer.graph().attribute(colors);
            if let Some(accessor) = writer.process_data_accessor(attribute)? {
                attributes.insert("_COLOR_0".to_string(), accessor);
            }
        }

        if attributes.is_empty() {
            return Ok(());
        }

        def.extensions_mut().ext_mesh_gpu_instancing =
            Some(json::extensions::scene::MeshGpuInstancing { attributes });
        writer.extension_required(NAME);
        Ok(())
    }
}
