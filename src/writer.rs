//! The writer: a strictly ordered traversal of the scene graph that
//! assembles the glTF JSON document and its binary payload.
//!
//! Nodes are visited depth-first in child-list order, assigning node indices
//! as they complete. Skins and animations dereference those indices, so
//! both are queued and emitted only after the node tree is fully indexed.
//! Image encodes are deferred into a pending list and drained before
//! finalization; image indices are assigned at discovery time, so encode
//! order never affects the document.

use byteorder::{LittleEndian, WriteBytesExt};
use gltf_export_json as json;
use image::RgbaImage;
use log::{debug, warn};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::mem;

use crate::animation::merge_morph_target_tracks;
use crate::binary::Glb;
use crate::extensions::Plugin;
use crate::raster;
use crate::scene::{
    Attribute, AttributeData, AttributeId, Geometry, GeometryGroup, GeometryId, MagFilter,
    Material, MaterialId, MaterialKind, MeshInstance, MinFilter, Node, NodeBody, NodeId,
    PrimitiveMode, Projection, SceneGraph, Side, Texture, TextureId, Transform, WrappingMode,
};
use crate::util;
use crate::{Error, ExportOptions, Output};

/// Identifies the `asset.generator` of emitted documents.
const GENERATOR: &str = concat!("gltf-export ", env!("CARGO_PKG_VERSION"));

/// Maximum deviation from unit length before a normal attribute is
/// renormalized.
const UNIT_NORMAL_TOLERANCE: f64 = 5.0e-4;

/// Cache key for emitted accessors, by attribute identity and derivation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
enum AccessorKey {
    /// The attribute as authored.
    Source(AttributeId),

    /// The attribute rewritten as deltas against its base attribute.
    MorphRelative(AttributeId),

    /// The attribute with every element renormalized to unit length.
    RenormalizedNormal(AttributeId),

    /// The attribute widened to 16-bit unsigned storage.
    WidenedJoints(AttributeId),
}

/// Cache key for emitted meshes: the geometry and its bound materials.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
struct MeshKey {
    geometry: GeometryId,
    materials: Vec<MaterialId>,
}

/// Cache key for emitted images.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
struct ImageKey {
    image: crate::scene::ImageId,
    mime_type: String,
    flip_y: bool,
}

/// How an accessor's buffer view will be used.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AccessorUsage {
    /// A vertex attribute stream (`ARRAY_BUFFER`).
    VertexAttribute,

    /// An index stream (`ELEMENT_ARRAY_BUFFER`).
    Index,

    /// Animation or skinning data; no GPU target.
    Data,
}

impl AccessorUsage {
    fn target(self) -> Option<json::buffer::Target> {
        match self {
            AccessorUsage::VertexAttribute => Some(json::buffer::Target::ArrayBuffer),
            AccessorUsage::Index => Some(json::buffer::Target::ElementArrayBuffer),
            AccessorUsage::Data => None,
        }
    }
}

/// A deferred image encode, closing over the pre-reserved image index it
/// must populate.
struct PendingImage {
    image: json::Index<json::Image>,
    surface: RgbaImage,
    mime_type: String,
}

/// Per-write state: the document under construction plus every cache and
/// queue. Created by [`Exporter::write`](crate::Exporter::write) and
/// discarded at completion.
pub struct Writer<'a> {
    graph: &'a SceneGraph,
    options: &'a ExportOptions,

    /// Whether nodes emit decomposed TRS instead of a matrix; forced on
    /// when animations are baked.
    trs: bool,

    root: json::Root,
    bin: Vec<u8>,

    node_map: HashMap<NodeId, json::Index<json::Node>>,
    accessor_cache: HashMap<AccessorKey, json::Index<json::Accessor>>,
    mesh_cache: HashMap<MeshKey, json::Index<json::Mesh>>,
    material_cache: HashMap<MaterialId, Option<json::Index<json::Material>>>,
    texture_cache: HashMap<TextureId, json::Index<json::Texture>>,
    image_cache: HashMap<ImageKey, json::Index<json::Image>>,

    pending_images: Vec<PendingImage>,
    skin_queue: Vec<NodeId>,

    extensions_used: Vec<String>,
    extensions_required: Vec<String>,

    plugins: Vec<Box<dyn Plugin>>,
}

impl<'a> Writer<'a> {
    pub(crate) fn new(
        graph: &'a SceneGraph,
        options: &'a ExportOptions,
        plugins: Vec<Box<dyn Plugin>>,
    ) -> Self {
        Writer {
            graph,
            options,
            trs: options.trs || !options.animations.is_empty(),
            root: json::Root {
                asset: json::Asset {
                    generator: Some(GENERATOR.to_string()),
                    ..Default::default()
                },
                ..Default::default()
            },
            bin: Vec::new(),
            node_map: HashMap::new(),
            accessor_cache: HashMap::new(),
            mesh_cache: HashMap::new(),
            material_cache: HashMap::new(),
            texture_cache: HashMap::new(),
            image_cache: HashMap::new(),
            pending_images: Vec::new(),
            skin_queue: Vec::new(),
            extensions_used: Vec::new(),
            extensions_required: Vec::new(),
            plugins,
        }
    }

    /// Runs the ordered traversal: scenes and nodes first, then the
    /// deferred skins and animations that need the completed node map.
    pub(crate) fn run(&mut self) -> Result<(), Error> {
        self.invoke_plugins(|plugin, writer| plugin.before_parse(writer))?;

        let graph = self.graph;
        for scene in 0..graph.scenes.len() {
            self.process_scene(scene)?;
        }

        let queue = mem::take(&mut self.skin_queue);
        for node in queue {
            self.process_skin(node)?;
        }

        let options = self.options;
        for clip in &options.animations {
            self.process_animation(clip)?;
        }

        self.invoke_plugins(|plugin, writer| plugin.after_parse(writer))
    }

    /// Finalizes the document: drains pending image encodes, closes the
    /// binary buffer, writes the extension registries and emits either a
    /// GLB container or the JSON tree.
    pub(crate) fn finish(mut self) -> Result<Output, Error> {
        let pending = mem::take(&mut self.pending_images);
        debug!("encoding {} deferred image(s)", pending.len());
        for job in pending {
            let bytes = raster::encode(&job.surface, &job.mime_type)?;
            if self.options.binary {
                let view = self.push_raw_buffer_view(&bytes);
                self.root.images[job.image.value()].buffer_view = Some(view);
            } else {
                self.root.images[job.image.value()].uri =
                    Some(raster::to_data_uri(&bytes, &job.mime_type));
            }
        }

        if !self.root.buffers.is_empty() {
            self.root.buffers[0].byte_length = self.bin.len();
            if !self.options.binary {
                self.root.buffers[0].uri = Some(format!(
                    "data:application/octet-stream;base64,{}",
                    base64::encode(&self.bin)
                ));
            }
        }

        self.root.extensions_used = mem::take(&mut self.extensions_used);
        self.root.extensions_required = mem::take(&mut self.extensions_required);

        if self.options.binary {
            let json = self.root.to_vec()?;
            let glb = Glb {
                json: json.into(),
                bin: Some(mem::take(&mut self.bin).into()),
            };
            Ok(Output::Binary(glb.to_vec()?))
        } else {
            Ok(Output::Json(self.root))
        }
    }

    /// The scene graph being exported.
    pub fn graph(&self) -> &'a SceneGraph {
        self.graph
    }

    /// The options of the current write.
    pub fn options(&self) -> &'a ExportOptions {
        self.options
    }

    /// The document under construction.
    pub fn root_mut(&mut self) -> &mut json::Root {
        &mut self.root
    }

    /// Records `name` in `extensionsUsed`, preserving insertion order.
    pub fn extension_used(&mut self, name: &str) {
        if !self.extensions_used.iter().any(|used| used == name) {
            self.extensions_used.push(name.to_string());
        }
    }

    /// Records `name` in both `extensionsUsed` and `extensionsRequired`.
    pub fn extension_required(&mut self, name: &str) {
        self.extension_used(name);
        if !self.extensions_required.iter().any(|required| required == name) {
            self.extensions_required.push(name.to_string());
        }
    }

    fn invoke_plugins<F>(&mut self, mut hook: F) -> Result<(), Error>
    where
        F: FnMut(&mut dyn Plugin, &mut Self) -> Result<(), Error>,
    {
        let mut plugins = mem::take(&mut self.plugins);
        let mut result = Ok(());
        for plugin in &mut plugins {
            result = hook(plugin.as_mut(), self);
            if result.is_err() {
                break;
            }
        }
        self.plugins = plugins;
        result
    }

    fn process_scene(&mut self, scene: usize) -> Result<(), Error> {
        let graph = self.graph;
        let scene = &graph.scenes[scene];

        let mut nodes = Vec::with_capacity(scene.nodes.len());
        for &root in &scene.nodes {
            if !graph.node(root).visible && self.options.only_visible {
                continue;
            }
            nodes.push(self.process_node(root)?);
        }

        let def = json::Scene {
            name: non_empty(&scene.name),
            nodes,
            extensions: None,
            extras: None,
        };
        let index = self.root.push(def);
        if self.root.scene.is_none() {
            self.root.scene = Some(index);
        }
        Ok(())
    }

    fn process_node(&mut self, id: NodeId) -> Result<json::Index<json::Node>, Error> {
        let graph = self.graph;
        let node = graph.node(id);
        let mut def = json::Node::default();

        def.name = non_empty(&node.name);

        if self.trs {
            let (translation, rotation, scale) = match node.transform {
                Transform::Decomposed {
                    translation,
                    rotation,
                    scale,
                } => (translation, rotation, scale),
                Transform::Matrix(ref matrix) => util::decompose(matrix),
            };
            if rotation != [0.0, 0.0, 0.0, 1.0] {
                def.rotation = Some(rotation);
            }
            if translation != [0.0; 3] {
                def.translation = Some(translation);
            }
            if scale != [1.0; 3] {
                def.scale = Some(scale);
            }
        } else {
            let matrix = match node.transform {
                Transform::Matrix(matrix) => matrix,
                Transform::Decomposed {
                    ref translation,
                    ref rotation,
                    ref scale,
                } => util::compose(translation, rotation, scale),
            };
            if !util::is_identity(&matrix) {
                def.matrix = Some(matrix);
            }
        }

        match &node.body {
            NodeBody::Mesh(mesh) => {
                if let Some(index) = self.process_mesh(mesh)? {
                    def.mesh = Some(index);
                    if mesh.skin.is_some() {
                        self.skin_queue.push(id);
                    }
                }
            }
            NodeBody::Camera(projection) => {
                def.camera = Some(self.process_camera(node, *projection));
            }
            // Lights are annotated by the punctual-light plug-in.
            NodeBody::Light(_) | NodeBody::Empty => {}
        }

        if self.options.include_custom_extensions && !node.extensions.is_empty() {
            for (name, value) in &node.extensions {
                self.extension_used(name);
                def.extensions_mut().others.insert(name.clone(), value.clone());
            }
        }

        let mut children = Vec::new();
        for &child in &node.children {
            if !graph.node(child).visible && self.options.only_visible {
                continue;
            }
            children.push(self.process_node(child)?);
        }
        if !children.is_empty() {
            def.children = Some(children);
        }

        self.invoke_plugins(|plugin, writer| plugin.write_node(writer, node, &mut def))?;

        let index = self.root.push(def);
        self.node_map.insert(id, index);
        Ok(index)
    }

    fn process_camera(
        &mut self,
        node: &Node,
        projection: Projection,
    ) -> json::Index<json::Camera> {
        let mut def = match projection {
            Projection::Perspective {
                fov,
                aspect,
                near,
                far,
            } => json::Camera {
                name: None,
                orthographic: None,
                perspective: Some(json::camera::Perspective {
                    aspect_ratio: aspect,
                    yfov: fov.to_radians(),
                    zfar: Some(far),
                    znear: near,
                }),
                type_: json::camera::Type::Perspective,
                extras: None,
            },
            Projection::Orthographic {
                xmag,
                ymag,
                near,
                far,
            } => json::Camera {
                name: None,
                orthographic: Some(json::camera::Orthographic {
                    xmag,
                    ymag,
                    zfar: far,
                    znear: near,
                }),
                perspective: None,
                type_: json::camera::Type::Orthographic,
                extras: None,
            },
        };

        // Legacy quirk kept for output compatibility: a named camera node
        // stores the projection kind, not the authored name.
        if !node.name.is_empty() {
            def.name = Some(
                match projection {
                    Projection::Perspective { .. } => "PerspectiveCamera",
                    Projection::Orthographic { .. } => "OrthographicCamera",
                }
                .to_string(),
            );
        }

        self.root.push(def)
    }

    fn process_mesh(
        &mut self,
        mesh: &MeshInstance,
    ) -> Result<Option<json::Index<json::Mesh>>, Error> {
        let graph = self.graph;
        let geometry = graph.geometry(mesh.geometry);

        let key = MeshKey {
            geometry: mesh.geometry,
            materials: mesh.materials.clone(),
        };
        if let Some(&cached) = self.mesh_cache.get(&key) {
            return Ok(Some(cached));
        }

        let base_mode = match mesh.mode {
            PrimitiveMode::Points => json::mesh::Mode::Points,
            PrimitiveMode::Lines => json::mesh::Mode::Lines,
            PrimitiveMode::LineLoop => json::mesh::Mode::LineLoop,
            PrimitiveMode::LineStrip => json::mesh::Mode::LineStrip,
            PrimitiveMode::Triangles => json::mesh::Mode::Triangles,
        };

        let attributes = self.process_vertex_attributes(geometry)?;
        if attributes.is_empty() {
            return Ok(None);
        }

        let (targets, weights, target_names) = self.process_morph_targets(mesh, geometry)?;

        let multi_material = mesh.materials.len() > 1;
        if multi_material && geometry.groups.is_empty() {
            warn!("multi-material mesh has no geometry groups, skipping");
            return Ok(None);
        }

        let vertex_count = geometry
            .attributes
            .values()
            .next()
            .map(|&id| graph.attribute(id).count())
            .unwrap_or(0);

        // Unindexed multi-material geometry gets a trivial index so that
        // group ranges can slice it.
        let synthesized;
        let index_attribute: Option<&Attribute> = match geometry.index {
            Some(id) => Some(graph.attribute(id)),
            None if multi_material => {
                synthesized = Attribute::u32((0..vertex_count as u32).collect(), 1);
                Some(&synthesized)
            }
            None => None,
        };

        let groups: Vec<GeometryGroup> = if multi_material {
            geometry.groups.clone()
        } else {
            let count = index_attribute
                .map(|attribute| attribute.count())
                .unwrap_or(vertex_count);
            vec![GeometryGroup {
                start: 0,
                count,
                material_slot: 0,
            }]
        };

        let mut primitives = Vec::with_capacity(groups.len());
        for group in &groups {
            let indices = match index_attribute {
                Some(attribute) => {
                    let start = group.start.min(attribute.count());
                    let count = group.count.min(attribute.count() - start);
                    self.process_accessor(attribute, AccessorUsage::Index, start, count)?
                }
                None => None,
            };
            let material_id = mesh.materials.get(group.material_slot).copied();

            // A wireframe material turns its primitive into line topology.
            let mut mode = base_mode;
            if mesh.mode == PrimitiveMode::Triangles {
                if let Some(id) = material_id {
                    if graph.material(id).wireframe {
                        mode = json::mesh::Mode::Lines;
                    }
                }
            }

            let material = match material_id {
                Some(material) => self.process_material(material)?,
                None => None,
            };
            primitives.push(json::mesh::Primitive {
                attributes: attributes.clone(),
                indices,
                material,
                mode,
                targets: targets.clone(),
            });
        }

        let mut def = json::Mesh {
            extensions: None,
            extras: target_names,
            name: None,
            primitives,
            weights,
        };

        self.invoke_plugins(|plugin, writer| plugin.write_mesh(writer, mesh, &mut def))?;

        let index = self.root.push(def);
        self.mesh_cache.insert(key, index);
        Ok(Some(index))
    }

    /// Emits accessors for every vertex stream, renaming to glTF semantics
    /// and substituting derived attributes where required.
    fn process_vertex_attributes(
        &mut self,
        geometry: &Geometry,
    ) -> Result<BTreeMap<json::mesh::Semantic, json::Index<json::Accessor>>, Error> {
        let graph = self.graph;
        let mut attributes = BTreeMap::new();

        for (name, &attribute_id) in &geometry.attributes {
            // Morph streams are exported with the targets, not here.
            if name.starts_with("morph") {
                continue;
            }
            let semantic = semantic(name);

            let source = graph.attribute(attribute_id);
            let derived;
            let (key, attribute): (AccessorKey, &Attribute) =
                if semantic == json::mesh::Semantic::Normals && !is_unit_normal(source) {
                    derived = renormalize(source);
                    (AccessorKey::RenormalizedNormal(attribute_id), &derived)
                } else if semantic == json::mesh::Semantic::Joints(0)
                    && !matches!(source.data, AttributeData::U8(_) | AttributeData::U16(_))
                {
                    derived = widen_to_u16(source);
                    (AccessorKey::WidenedJoints(attribute_id), &derived)
                } else {
                    (AccessorKey::Source(attribute_id), source)
                };

            if let Some(&cached) = self.accessor_cache.get(&key) {
                attributes.insert(semantic, cached);
                continue;
            }

            let count = attribute.count();
            if let Some(accessor) =
                self.process_accessor(attribute, AccessorUsage::VertexAttribute, 0, count)?
            {
                self.accessor_cache.insert(key, accessor);
                attributes.insert(semantic, accessor);
            }
        }

        Ok(attributes)
    }

    /// Emits morph target accessors, relativizing absolute streams.
    ///
    /// Returns the per-primitive targets, the mesh weights, and the
    /// `targetNames` extras payload.
    #[allow(clippy::type_complexity)]
    fn process_morph_targets(
        &mut self,
        mesh: &MeshInstance,
        geometry: &Geometry,
    ) -> Result<
        (
            Option<Vec<json::mesh::MorphTarget>>,
            Option<Vec<f32>>,
            Option<Value>,
        ),
        Error,
    > {
        let graph = self.graph;
        let target_count = geometry.morph_target_count();
        if target_count == 0 {
            return Ok((None, None, None));
        }

        let mut targets = vec![json::mesh::MorphTarget::default(); target_count];
        let mut warned: HashSet<&str> = HashSet::new();

        for (name, streams) in &geometry.morph_targets {
            let is_position = name == "position";
            let is_normal = name == "normal";
            if !is_position && !is_normal {
                if warned.insert(name.as_str()) {
                    warn!("only POSITION and NORMAL morph targets are supported, skipping '{}'", name);
                }
                continue;
            }

            for (target, &morph_id) in streams.iter().enumerate() {
                let key = if geometry.morph_relative {
                    AccessorKey::Source(morph_id)
                } else {
                    AccessorKey::MorphRelative(morph_id)
                };

                let accessor = match self.accessor_cache.get(&key) {
                    Some(&cached) => Some(cached),
                    None => {
                        let morph = graph.attribute(morph_id);
                        let derived;
                        let attribute = if geometry.morph_relative {
                            morph
                        } else {
                            let base = geometry
                                .attributes
                                .get(name)
                                .map(|&base| graph.attribute(base))
                                .ok_or_else(|| {
                                    Error::UnsupportedInput(format!(
                                        "morph stream '{}' has no base attribute",
                                        name
                                    ))
                                })?;
                            derived = relativize(morph, base);
                            &derived
                        };
                        let count = attribute.count();
                        let accessor = self.process_accessor(
                            attribute,
                            AccessorUsage::VertexAttribute,
                            0,
                            count,
                        )?;
                        if let Some(accessor) = accessor {
                            self.accessor_cache.insert(key, accessor);
                        }
                        accessor
                    }
                };

                if let Some(accessor) = accessor {
                    if is_position {
                        targets[target].positions = Some(accessor);
                    } else {
                        targets[target].normals = Some(accessor);
                    }
                }
            }
        }

        let weights = if mesh.morph_weights.is_empty() {
            None
        } else {
            Some(mesh.morph_weights.clone())
        };
        let target_names = if mesh.morph_target_names.is_empty() {
            None
        } else {
            Some(serde_json::json!({ "targetNames": mesh.morph_target_names }))
        };

        Ok((Some(targets), weights, target_names))
    }

    fn process_material(
        &mut self,
        id: MaterialId,
    ) -> Result<Option<json::Index<json::Material>>, Error> {
        if let Some(&cached) = self.material_cache.get(&id) {
            return Ok(cached);
        }

        let graph = self.graph;
        let material = graph.material(id);

        if material.kind == MaterialKind::Shader {
            warn!("shader materials are not supported, skipping");
            self.material_cache.insert(id, None);
            return Ok(None);
        }

        let mut def = json::Material::default();

        if material.is_pbr() {
            def.pbr_metallic_roughness.metallic_factor = material.metalness;
            def.pbr_metallic_roughness.roughness_factor = material.roughness;
        } else {
            def.pbr_metallic_roughness.metallic_factor = 0.5;
            def.pbr_metallic_roughness.roughness_factor = 0.5;
        }

        if material.base_color != [1.0, 1.0, 1.0, 1.0] {
            def.pbr_metallic_roughness.base_color_factor = Some(material.base_color);
        }
        if let Some(map) = material.base_color_map {
            def.pbr_metallic_roughness.base_color_texture = Some(self.texture_info(map)?);
        }

        if material.is_pbr()
            && (material.metalness_map.is_some() || material.roughness_map.is_some())
        {
            def.pbr_metallic_roughness.metallic_roughness_texture =
                Some(self.build_metal_rough_texture(material)?);
        }

        if let Some(map) = material.normal_map {
            def.normal_texture = Some(self.normal_texture(map, material.normal_scale[0])?);
        }

        if let Some(map) = material.occlusion_map {
            let (index, tex_coord, extensions) = self.texture_ref_parts(map)?;
            def.occlusion_texture = Some(json::material::OcclusionTexture {
                index,
                strength: if material.occlusion_intensity != 1.0 {
                    Some(material.occlusion_intensity)
                } else {
                    None
                },
                tex_coord,
                extensions,
            });
        }

        let emissive = [
            material.emissive[0].clamp(0.0, 1.0),
            material.emissive[1].clamp(0.0, 1.0),
            material.emissive[2].clamp(0.0, 1.0),
        ];
        if emissive.iter().any(|&component| component > 0.0) {
            def.emissive_factor = Some(emissive);
        }
        if let Some(map) = material.emissive_map {
            def.emissive_texture = Some(self.texture_info(map)?);
        }

        if material.transparent {
            def.alpha_mode = Some(json::material::AlphaMode::Blend);
        } else if material.alpha_test > 0.0 {
            def.alpha_mode = Some(json::material::AlphaMode::Mask);
            def.alpha_cutoff = Some(material.alpha_test);
        }

        if material.side == Side::Double {
            def.double_sided = true;
        }

        def.name = non_empty(&material.name);

        if self.options.include_custom_extensions && !material.extensions.is_empty() {
            for (name, value) in &material.extensions {
                self.extension_used(name);
                def.extensions_mut().others.insert(name.clone(), value.clone());
            }
        }

        self.invoke_plugins(|plugin, writer| plugin.write_material(writer, material, &mut def))?;

        let index = self.root.push(def);
        self.material_cache.insert(id, Some(index));
        Ok(Some(index))
    }

    /// Builds the combined metallic-roughness texture reference,
    /// compositing when the two maps differ.
    fn build_metal_rough_texture(
        &mut self,
        material: &Material,
    ) -> Result<json::texture::Info, Error> {
        let graph = self.graph;
        let metalness = material.metalness_map;
        let roughness = material.roughness_map;

        if let (Some(metal), Some(rough)) = (metalness, roughness) {
            if metal == rough {
                return self.texture_info(metal);
            }
            let a = graph.texture(metal);
            let b = graph.texture(rough);
            if a.uv_channel != b.uv_channel
                || a.offset != b.offset
                || a.repeat != b.repeat
                || a.rotation != b.rotation
            {
                warn!(
                    "metalness and roughness maps use different UV transforms, \
                     using the metalness map's"
                );
            }
        }

        // Either map works as the reference for sampler, flip and UV state.
        let reference = match metalness.or(roughness) {
            Some(reference) => reference,
            None => {
                return Err(Error::UnsupportedInput(
                    "metallic-roughness composite requested without source maps".into(),
                ))
            }
        };

        let metal_surface = match metalness {
            Some(id) => {
                let texture = graph.texture(id);
                Some((
                    raster::rasterize(graph.image(texture.image), u32::MAX, false)?,
                    texture.color_space,
                ))
            }
            None => None,
        };
        let rough_surface = match roughness {
            Some(id) => {
                let texture = graph.texture(id);
                Some((
                    raster::rasterize(graph.image(texture.image), u32::MAX, false)?,
                    texture.color_space,
                ))
            }
            None => None,
        };

        let composite = raster::composite_metal_rough(
            metal_surface
                .as_ref()
                .map(|(surface, space)| (surface, *space)),
            rough_surface
                .as_ref()
                .map(|(surface, space)| (surface, *space)),
        );

        let index = self.process_composite_texture(reference, composite)?;
        let texture = graph.texture(reference);
        let extensions = self.texture_transform(texture);
        Ok(json::texture::Info {
            index,
            tex_coord: texture.uv_channel,
            extensions,
        })
    }

    /// Emits a texture over a derived surface, borrowing sampler, flip and
    /// MIME state from `reference`. Composites are never deduplicated.
    fn process_composite_texture(
        &mut self,
        reference: TextureId,
        surface: RgbaImage,
    ) -> Result<json::Index<json::Texture>, Error> {
        let graph = self.graph;
        let texture = graph.texture(reference);

        let mut surface = surface;
        let max = self.options.max_texture_size;
        let (width, height) = surface.dimensions();
        let clamped = (width.min(max).max(1), height.min(max).max(1));
        if clamped != (width, height) {
            surface = image::imageops::resize(
                &surface,
                clamped.0,
                clamped.1,
                image::imageops::FilterType::Triangle,
            );
        }
        if texture.flip_y {
            surface = image::imageops::flip_vertical(&surface);
        }

        let mime_type = self.requested_mime(texture);
        let source = self.push_pending_image(surface, mime_type);
        let sampler = self.process_sampler(texture);
        let mut def = json::Texture {
            name: None,
            sampler: Some(sampler),
            source,
            extensions: None,
        };
        self.invoke_plugins(|plugin, writer| plugin.write_texture(writer, texture, &mut def))?;
        Ok(self.root.push(def))
    }

    /// Emits (or reuses) the texture for `id` and returns its index.
    pub fn process_texture(
        &mut self,
        id: TextureId,
    ) -> Result<json::Index<json::Texture>, Error> {
        if let Some(&cached) = self.texture_cache.get(&id) {
            return Ok(cached);
        }

        let graph = self.graph;
        let texture = graph.texture(id);
        let mime_type = self.requested_mime(texture);
        let sampler = self.process_sampler(texture);
        let source = self.process_image(texture.image, mime_type, texture.flip_y)?;

        let mut def = json::Texture {
            name: non_empty(&texture.name),
            sampler: Some(sampler),
            source,
            extensions: None,
        };
        self.invoke_plugins(|plugin, writer| plugin.write_texture(writer, texture, &mut def))?;

        let index = self.root.push(def);
        self.texture_cache.insert(id, index);
        Ok(index)
    }

    /// Builds a texture reference with UV set and transform annotations.
    pub fn texture_info(&mut self, id: TextureId) -> Result<json::texture::Info, Error> {
        let (index, tex_coord, extensions) = self.texture_ref_parts(id)?;
        Ok(json::texture::Info {
            index,
            tex_coord,
            extensions,
        })
    }

    /// Builds a normal-texture reference; `scale` of 1.0 is elided.
    pub fn normal_texture(
        &mut self,
        id: TextureId,
        scale: f32,
    ) -> Result<json::material::NormalTexture, Error> {
        let (index, tex_coord, extensions) = self.texture_ref_parts(id)?;
        Ok(json::material::NormalTexture {
            index,
            scale: if scale != 1.0 { Some(scale) } else { None },
            tex_coord,
            extensions,
        })
    }

    fn texture_ref_parts(
        &mut self,
        id: TextureId,
    ) -> Result<
        (
            json::Index<json::Texture>,
            u32,
            Option<json::extensions::texture::Info>,
        ),
        Error,
    > {
        let index = self.process_texture(id)?;
        let texture = self.graph.texture(id);
        let extensions = self.texture_transform(texture);
        Ok((index, texture.uv_channel, extensions))
    }

    /// Builds the `KHR_texture_transform` annotation for a non-default UV
    /// transform. Offsets are written as authored; no V flip is applied.
    fn texture_transform(
        &mut self,
        texture: &Texture,
    ) -> Option<json::extensions::texture::Info> {
        let mut transform = json::extensions::texture::TextureTransform::default();
        let mut transformed = false;

        if texture.offset != [0.0, 0.0] {
            transform.offset = Some(texture.offset);
            transformed = true;
        }
        if texture.rotation != 0.0 {
            transform.rotation = Some(texture.rotation);
            transformed = true;
        }
        if texture.repeat != [1.0, 1.0] {
            transform.scale = Some(texture.repeat);
            transformed = true;
        }

        if transformed {
            self.extension_used("KHR_texture_transform");
            Some(json::extensions::texture::Info {
                texture_transform: Some(transform),
                others: json::Map::new(),
            })
        } else {
            None
        }
    }

    fn requested_mime(&mut self, texture: &Texture) -> String {
        let mime_type = texture
            .mime_type
            .clone()
            .unwrap_or_else(|| "image/png".to_string());
        if mime_type == "image/webp" {
            warn!("WebP output is not supported, falling back to PNG");
            return "image/png".to_string();
        }
        mime_type
    }

    /// Samplers are intentionally not deduplicated; every texture emission
    /// pushes a fresh entry.
    fn process_sampler(&mut self, texture: &Texture) -> json::Index<json::texture::Sampler> {
        let def = json::texture::Sampler {
            mag_filter: match texture.mag_filter {
                MagFilter::Nearest => json::texture::MagFilter::Nearest,
                MagFilter::Linear => json::texture::MagFilter::Linear,
            },
            min_filter: match texture.min_filter {
                MinFilter::Nearest => json::texture::MinFilter::Nearest,
                MinFilter::Linear => json::texture::MinFilter::Linear,
                MinFilter::NearestMipmapNearest => {
                    json::texture::MinFilter::NearestMipmapNearest
                }
                MinFilter::LinearMipmapNearest => json::texture::MinFilter::LinearMipmapNearest,
                MinFilter::NearestMipmapLinear => json::texture::MinFilter::NearestMipmapLinear,
                MinFilter::LinearMipmapLinear => json::texture::MinFilter::LinearMipmapLinear,
            },
            name: None,
            wrap_s: wrap(texture.wrap_s),
            wrap_t: wrap(texture.wrap_t),
        };
        self.root.push(def)
    }

    /// Rasterizes an image source and reserves its image slot; the encode
    /// itself is deferred until finalization.
    fn process_image(
        &mut self,
        image: crate::scene::ImageId,
        mime_type: String,
        flip_y: bool,
    ) -> Result<json::Index<json::Image>, Error> {
        let key = ImageKey {
            image,
            mime_type: mime_type.clone(),
            flip_y,
        };
        if let Some(&cached) = self.image_cache.get(&key) {
            return Ok(cached);
        }

        let surface = raster::rasterize(
            self.graph.image(image),
            self.options.max_texture_size,
            flip_y,
        )?;
        let index = self.push_pending_image(surface, mime_type);
        self.image_cache.insert(key, index);
        Ok(index)
    }

    fn push_pending_image(
        &mut self,
        surface: RgbaImage,
        mime_type: String,
    ) -> json::Index<json::Image> {
        let def = json::Image {
            buffer_view: None,
            mime_type: Some(json::image::MimeType(mime_type.clone())),
            name: None,
            uri: None,
            extras: None,
        };
        let index = self.root.push(def);
        self.pending_images.push(PendingImage {
            image: index,
            surface,
            mime_type,
        });
        index
    }

    /// Emits an accessor without a GPU target, for animation samplers,
    /// inverse bind matrices and instancing tables.
    pub fn process_data_accessor(
        &mut self,
        attribute: &Attribute,
    ) -> Result<Option<json::Index<json::Accessor>>, Error> {
        let count = attribute.count();
        self.process_accessor(attribute, AccessorUsage::Data, 0, count)
    }

    /// Emits an accessor over `[start, start + count)` of `attribute`,
    /// packing a fresh buffer view. Returns `None` for empty ranges.
    fn process_accessor(
        &mut self,
        attribute: &Attribute,
        usage: AccessorUsage,
        start: usize,
        count: usize,
    ) -> Result<Option<json::Index<json::Accessor>>, Error> {
        if count == 0 {
            return Ok(None);
        }

        let component_type = component_type(attribute);
        let type_ = json::accessor::Type::from_multiplicity(attribute.item_size).ok_or_else(
            || {
                Error::UnsupportedInput(format!(
                    "unsupported accessor item size {}",
                    attribute.item_size
                ))
            },
        )?;

        let item_size = attribute.item_size;
        let mut min = vec![f64::INFINITY; item_size];
        let mut max = vec![f64::NEG_INFINITY; item_size];
        for element in start..start + count {
            for component in 0..item_size {
                let value = attribute.get(element, component);
                min[component] = min[component].min(value);
                max[component] = max[component].max(value);
            }
        }

        let integral = component_type != json::accessor::ComponentType::F32;
        let bound = |values: Vec<f64>| -> Value {
            Value::Array(
                values
                    .into_iter()
                    .map(|value| {
                        if integral {
                            Value::from(value as i64)
                        } else {
                            Value::from(value as f32)
                        }
                    })
                    .collect(),
            )
        };

        let buffer_view =
            self.process_buffer_view(attribute, component_type, start, count, usage)?;

        let def = json::Accessor {
            buffer_view: Some(buffer_view),
            byte_offset: None,
            component_type,
            count,
            extras: None,
            max: Some(bound(max)),
            min: Some(bound(min)),
            name: None,
            normalized: attribute.normalized,
            type_,
        };
        Ok(Some(self.root.push(def)))
    }

    /// Packs `[start, start + count)` of `attribute` little-endian into the
    /// binary buffer and emits the buffer view.
    ///
    /// Vertex-attribute views carry a four-byte-aligned `byteStride`; every
    /// view's payload is padded to a multiple of four before appending.
    fn process_buffer_view(
        &mut self,
        attribute: &Attribute,
        component_type: json::accessor::ComponentType,
        start: usize,
        count: usize,
        usage: AccessorUsage,
    ) -> Result<json::Index<json::buffer::View>, Error> {
        self.ensure_buffer();

        let element_size = attribute.item_size * component_type.size();
        let stride = if usage == AccessorUsage::VertexAttribute {
            util::align_to_multiple_of_four(element_size)
        } else {
            element_size
        };

        let mut bytes: Vec<u8> = Vec::with_capacity(count * stride);
        for element in start..start + count {
            let element_offset = bytes.len();
            for component in 0..attribute.item_size {
                let i = element * attribute.item_size + component;
                match &attribute.data {
                    AttributeData::I8(v) => bytes.write_i8(v[i])?,
                    AttributeData::U8(v) => bytes.write_u8(v[i])?,
                    AttributeData::I16(v) => bytes.write_i16::<LittleEndian>(v[i])?,
                    AttributeData::U16(v) => bytes.write_u16::<LittleEndian>(v[i])?,
                    AttributeData::U32(v) => bytes.write_u32::<LittleEndian>(v[i])?,
                    AttributeData::F32(v) => bytes.write_f32::<LittleEndian>(v[i])?,
                }
            }
            bytes.resize(element_offset + stride, 0);
        }
        util::pad_to_multiple_of_four(&mut bytes, 0);

        let byte_offset = self.bin.len();
        self.bin.extend_from_slice(&bytes);

        let def = json::buffer::View {
            buffer: json::Index::new(0),
            byte_length: bytes.len(),
            byte_offset: Some(byte_offset),
            byte_stride: if usage == AccessorUsage::VertexAttribute {
                Some(stride)
            } else {
                None
            },
            name: None,
            target: usage.target(),
            extras: None,
        };
        Ok(self.root.push(def))
    }

    /// Appends raw bytes (an encoded image) as an untargeted buffer view.
    fn push_raw_buffer_view(&mut self, bytes: &[u8]) -> json::Index<json::buffer::View> {
        self.ensure_buffer();
        let byte_offset = self.bin.len();
        self.bin.extend_from_slice(bytes);
        util::pad_to_multiple_of_four(&mut self.bin, 0);
        self.root.push(json::buffer::View {
            buffer: json::Index::new(0),
            byte_length: bytes.len(),
            byte_offset: Some(byte_offset),
            byte_stride: None,
            name: None,
            target: None,
            extras: None,
        })
    }

    fn ensure_buffer(&mut self) {
        if self.root.buffers.is_empty() {
            self.root.push(json::Buffer::default());
        }
    }

    /// Compiles the skin of a recorded skinned node. Runs strictly after
    /// node traversal, when the node map is complete.
    fn process_skin(
        &mut self,
        id: NodeId,
    ) -> Result<Option<json::Index<json::Skin>>, Error> {
        let graph = self.graph;
        let node = graph.node(id);
        let skin = match &node.body {
            NodeBody::Mesh(mesh) => match &mesh.skin {
                Some(skin) => skin,
                None => return Ok(None),
            },
            _ => return Ok(None),
        };

        if skin.bone_inverses.len() != skin.bones.len() {
            return Err(Error::UnsupportedInput(format!(
                "skin has {} bones but {} inverse bind matrices",
                skin.bones.len(),
                skin.bone_inverses.len()
            )));
        }

        let bind_matrix = util::mat4(&skin.bind_matrix);
        let mut data = Vec::with_capacity(skin.bones.len() * 16);
        for inverse in &skin.bone_inverses {
            let matrix = util::mat4(inverse) * bind_matrix;
            data.extend_from_slice(&util::mat4_to_array(&matrix));
        }
        let inverse_bind_matrices = self.process_data_accessor(&Attribute::f32(data, 16))?;

        let mut joints = Vec::with_capacity(skin.bones.len());
        for bone in &skin.bones {
            match self.node_map.get(bone) {
                Some(&index) => joints.push(index),
                None => {
                    warn!("skin joint was not exported, skipping skin");
                    return Ok(None);
                }
            }
        }
        let skeleton = joints.first().copied();

        let index = self.root.push(json::Skin {
            inverse_bind_matrices,
            joints,
            name: None,
            skeleton,
            extras: None,
        });

        let node_index = self.node_map[&id];
        self.root.nodes[node_index.value()].skin = Some(index);
        Ok(Some(index))
    }

    /// Compiles one clip into a glTF animation. Runs strictly after node
    /// traversal.
    fn process_animation(
        &mut self,
        clip: &crate::scene::AnimationClip,
    ) -> Result<Option<json::Index<json::Animation>>, Error> {
        if clip.tracks.is_empty() {
            warn!("animation '{}' has no tracks, skipping", clip.name);
            return Ok(None);
        }

        let clip = merge_morph_target_tracks(clip, self.graph)?;
        let mut channels = Vec::with_capacity(clip.tracks.len());
        let mut samplers = Vec::with_capacity(clip.tracks.len());

        for track in &clip.tracks {
            let node = match self.resolve_track_target(track) {
                Some(node) => node,
                None => {
                    warn!("could not export animation track of clip '{}'", clip.name);
                    return Ok(None);
                }
            };

            let path = match &track.path {
                crate::scene::TrackPath::Translation => json::animation::Property::Translation,
                crate::scene::TrackPath::Rotation => json::animation::Property::Rotation,
                crate::scene::TrackPath::Scale => json::animation::Property::Scale,
                crate::scene::TrackPath::MorphWeights { .. } => {
                    json::animation::Property::MorphTargetWeights
                }
            };

            let times = Attribute::f32(track.times.clone(), 1);
            let input = match self.process_data_accessor(&times)? {
                Some(input) => input,
                None => {
                    warn!("animation track of clip '{}' has no keyframes", clip.name);
                    return Ok(None);
                }
            };

            let item_size = match (&track.path, track.interpolation) {
                (crate::scene::TrackPath::MorphWeights { .. }, _) => 1,
                (_, crate::scene::Interpolation::CubicSpline) => track.value_size() / 3,
                _ => track.value_size(),
            };
            let values = Attribute::f32(track.values.clone(), item_size);
            let output = match self.process_data_accessor(&values)? {
                Some(output) => output,
                None => {
                    warn!("animation track of clip '{}' has no values", clip.name);
                    return Ok(None);
                }
            };

            let interpolation = match track.interpolation {
                crate::scene::Interpolation::Step => json::animation::Interpolation::Step,
                crate::scene::Interpolation::Linear => json::animation::Interpolation::Linear,
                crate::scene::Interpolation::Smooth
                | crate::scene::Interpolation::CubicSpline => {
                    json::animation::Interpolation::CubicSpline
                }
            };

            samplers.push(json::animation::Sampler {
                input,
                interpolation,
                output,
            });
            channels.push(json::animation::Channel {
                sampler: json::Index::new(samplers.len() as u32 - 1),
                target: json::animation::Target { node, path },
            });
        }

        let def = json::Animation {
            channels,
            name: non_empty(&clip.name),
            samplers,
            extras: None,
        };
        Ok(Some(self.root.push(def)))
    }

    /// Resolves a track's emitted node index, redirecting bone tracks of
    /// skinned meshes to the named bone.
    fn resolve_track_target(
        &self,
        track: &crate::scene::KeyframeTrack,
    ) -> Option<json::Index<json::Node>> {
        match &track.bone {
            Some(bone_name) => {
                let node = self.graph.node(track.node);
                if let NodeBody::Mesh(mesh) = &node.body {
                    if let Some(skin) = &mesh.skin {
                        for &bone in &skin.bones {
                            if self.graph.node(bone).name == *bone_name {
                                return self.node_map.get(&bone).copied();
                            }
                        }
                    }
                }
                None
            }
            None => self.node_map.get(&track.node).copied(),
        }
    }
}

fn wrap(mode: WrappingMode) -> json::texture::WrappingMode {
    match mode {
        WrappingMode::ClampToEdge => json::texture::WrappingMode::ClampToEdge,
        WrappingMode::MirroredRepeat => json::texture::WrappingMode::MirroredRepeat,
        WrappingMode::Repeat => json::texture::WrappingMode::Repeat,
    }
}

fn component_type(attribute: &Attribute) -> json::accessor::ComponentType {
    match attribute.data {
        AttributeData::I8(_) => json::accessor::ComponentType::I8,
        AttributeData::U8(_) => json::accessor::ComponentType::U8,
        AttributeData::I16(_) => json::accessor::ComponentType::I16,
        AttributeData::U16(_) => json::accessor::ComponentType::U16,
        AttributeData::U32(_) => json::accessor::ComponentType::U32,
        AttributeData::F32(_) => json::accessor::ComponentType::F32,
    }
}

fn non_empty(name: &str) -> Option<String> {
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Maps a source attribute name to its glTF semantic.
///
/// Anything that is not a spec-defined semantic after uppercasing is
/// prefixed with an underscore.
fn semantic(name: &str) -> json::mesh::Semantic {
    use json::mesh::Semantic;
    match name {
        "uv" => Semantic::TexCoords(0),
        "uv1" => Semantic::TexCoords(1),
        "uv2" => Semantic::TexCoords(2),
        "uv3" => Semantic::TexCoords(3),
        "color" => Semantic::Colors(0),
        "skinWeight" => Semantic::Weights(0),
        "skinIndex" => Semantic::Joints(0),
        other => {
            let upper = other.to_uppercase();
            spec_semantic(&upper).unwrap_or(Semantic::Custom(upper))
        }
    }
}

fn spec_semantic(upper: &str) -> Option<json::mesh::Semantic> {
    use json::mesh::Semantic;
    match upper {
        "POSITION" => return Some(Semantic::Positions),
        "NORMAL" => return Some(Semantic::Normals),
        "TANGENT" => return Some(Semantic::Tangents),
        _ => {}
    }
    let sets = [
        ("TEXCOORD_", Semantic::TexCoords as fn(u32) -> Semantic),
        ("COLOR_", Semantic::Colors),
        ("JOINTS_", Semantic::Joints),
        ("WEIGHTS_", Semantic::Weights),
    ];
    for (prefix, constructor) in sets {
        if let Some(rest) = upper.strip_prefix(prefix) {
            if !rest.is_empty() && rest.bytes().all(|byte| byte.is_ascii_digit()) {
                if let Ok(set) = rest.parse() {
                    return Some(constructor(set));
                }
            }
        }
    }
    None
}

/// Whether every element of a normal attribute is within tolerance of unit
/// length.
fn is_unit_normal(attribute: &Attribute) -> bool {
    if attribute.item_size != 3 {
        return true;
    }
    for element in 0..attribute.count() {
        let x = attribute.get(element, 0);
        let y = attribute.get(element, 1);
        let z = attribute.get(element, 2);
        let length = (x * x + y * y + z * z).sqrt();
        if (length - 1.0).abs() > UNIT_NORMAL_TOLERANCE {
            return false;
        }
    }
    true
}

/// Returns a unit-length clone of a normal attribute; zero-length normals
/// become `(1, 0, 0)`.
fn renormalize(attribute: &Attribute) -> Attribute {
    let count = attribute.count();
    let mut data = Vec::with_capacity(count * 3);
    for element in 0..count {
        let x = attribute.get(element, 0);
        let y = attribute.get(element, 1);
        let z = attribute.get(element, 2);
        let length = (x * x + y * y + z * z).sqrt();
        if length == 0.0 {
            data.extend_from_slice(&[1.0, 0.0, 0.0]);
        } else {
            data.push((x / length) as f32);
            data.push((y / length) as f32);
            data.push((z / length) as f32);
        }
    }
    Attribute::f32(data, 3)
}

/// Widens a joint-index attribute to 16-bit unsigned storage.
fn widen_to_u16(attribute: &Attribute) -> Attribute {
    let mut data = Vec::with_capacity(attribute.data.len());
    for element in 0..attribute.count() {
        for component in 0..attribute.item_size {
            data.push(attribute.get(element, component) as u16);
        }
    }
    Attribute::u16(data, attribute.item_size)
}

/// Rewrites an absolute morph stream as deltas against its base attribute.
fn relativize(morph: &Attribute, base: &Attribute) -> Attribute {
    let count = morph.count().min(base.count());
    let item_size = morph.item_size;
    let mut data = Vec::with_capacity(count * item_size);
    for element in 0..count {
        for component in 0..item_size {
            data.push((morph.get(element, component) - base.get(element, component)) as f32);
        }
    }
    Attribute {
        data: AttributeData::F32(data),
        item_size,
        normalized: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantics_follow_the_renaming_table() {
        use json::mesh::Semantic;
        assert_eq!(Semantic::Positions, semantic("position"));
        assert_eq!(Semantic::TexCoords(0), semantic("uv"));
        assert_eq!(Semantic::TexCoords(2), semantic("uv2"));
        assert_eq!(Semantic::Colors(0), semantic("color"));
        assert_eq!(Semantic::Weights(0), semantic("skinWeight"));
        assert_eq!(Semantic::Joints(0), semantic("skinIndex"));
        assert_eq!(Semantic::Tangents, semantic("tangent"));
        assert_eq!(Semantic::Colors(1), semantic("color_1"));
        assert_eq!(
            Semantic::Custom("TEMPERATURE".into()),
            semantic("temperature")
        );
        // A malformed set suffix is not a spec semantic.
        assert_eq!(
            Semantic::Custom("TEXCOORD_A".into()),
            semantic("texcoord_a")
        );
    }

    #[test]
    fn renormalize_fixes_degenerate_normals() {
        let attribute = Attribute::f32(vec![0.0, 0.0, 0.0, 0.0, 3.0, 0.0], 3);
        assert!(!is_unit_normal(&attribute));
        let unit = renormalize(&attribute);
        assert!(is_unit_normal(&unit));
        assert_eq!(1.0, unit.get(0, 0) as f32);
        assert_eq!(1.0, unit.get(1, 1) as f32);
    }

    #[test]
    fn widen_joints_preserves_values() {
        let attribute = Attribute::f32(vec![0.0, 1.0, 2.0, 3.0], 4);
        let widened = widen_to_u16(&attribute);
        assert!(matches!(widened.data, AttributeData::U16(_)));
        assert_eq!(3.0, widened.get(0, 3));
    }

    #[test]
    fn relativize_subtracts_the_base() {
        let base = Attribute::f32(vec![1.0, 1.0, 1.0], 3);
        let morph = Attribute::f32(vec![2.0, 0.5, 1.0], 3);
        let relative = relativize(&morph, &base);
        assert_eq!(1.0, relative.get(0, 0));
        assert_eq!(-0.5, relative.get(0, 1));
        assert_eq!(0.0, relative.get(0, 2));
    }
}
