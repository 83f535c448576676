use gltf_export_json as json;
use json::extensions::scene::khr_lights_punctual as lights;
use log::warn;

use super::Plugin;
use crate::scene::{LightKind, Node, NodeBody};
use crate::writer::Writer;
use crate::Error;

const NAME: &str = "KHR_lights_punctual";

/// Emits `KHR_lights_punctual` for directional, point and spot light
/// nodes: a node-scoped light reference plus the document-scoped light
/// array.
#[derive(Default)]
pub struct KhrLightsPunctual;

impl KhrLightsPunctual {
    /// The registry factory for this plug-in.
    pub fn factory() -> Box<dyn Plugin> {
        Box::new(KhrLightsPunctual)
    }
}

impl Plugin for KhrLightsPunctual {
    fn write_node(
        &mut self,
        writer: &mut Writer<'_>,
        node: &Node,
        def: &mut json::Node,
    ) -> Result<(), Error> {
        let light = match &node.body {
            NodeBody::Light(light) => light,
            _ => return Ok(()),
        };

        let mut light_def = lights::Light {
            color: light.color,
            intensity: light.intensity,
            name: if node.name.is_empty() {
                None
            } else {
                Some(node.name.clone())
            },
            range: None,
            spot: None,
            type_: lights::Type::Directional,
        };

        let decay = match &light.kind {
            LightKind::Directional => None,
            LightKind::Point { distance, decay } => {
                light_def.type_ = lights::Type::Point;
                if *distance > 0.0 {
                    light_def.range = Some(*distance);
                }
                Some(*decay)
            }
            LightKind::Spot {
                distance,
                decay,
                angle,
                penumbra,
                target_position,
            } => {
                light_def.type_ = lights::Type::Spot;
                if *distance > 0.0 {
                    light_def.range = Some(*distance);
                }
                light_def.spot = Some(lights::Spot {
                    inner_cone_angle: (1.0 - penumbra) * angle,
                    outer_cone_angle: *angle,
                });
                if *target_position != [0.0, 0.0, -1.0] {
                    warn!(
                        "spot light targets are not exported; the cone follows the \
                         node orientation, expected a target at (0, 0, -1)"
                    );
                }
                Some(*decay)
            }
        };

        if let Some(decay) = decay {
            if decay != 2.0 {
                warn!(
                    "light decay of {} is not physically correct, glTF assumes \
                     inverse-square falloff",
                    decay
                );
            }
        }

        let root = writer.root_mut();
        let document_lights = &mut root
            .extensions_mut()
            .khr_lights_punctual
            .get_or_insert_with(Default::default)
            .lights;
        let index = json::Index::new(document_lights.len() as u32);
        document_lights.push(light_def);

        def.extensions_mut().khr_lights_punctual = Some(lights::LightRef { light: index });
        writer.extension_used(NAME);
        Ok(())
    }
}
