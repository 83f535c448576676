//! The scene-graph input model.
//!
//! A [`SceneGraph`] owns every resource the writer can reference: nodes,
//! vertex attributes, geometries, materials, textures and image sources.
//! Cross-references are typed indices into the graph's arenas, so shared
//! resources (an attribute reused by two geometries, a texture bound by two
//! materials) have a single identity that the writer's deduplication caches
//! key off. Back-references from skins and animations to nodes resolve
//! through the same indices, keeping the graph free of ownership cycles.

mod animation;
mod camera;
mod geometry;
mod light;
mod material;
mod texture;

pub use animation::{AnimationClip, Interpolation, KeyframeTrack, TrackPath};
pub use camera::Projection;
pub use geometry::{Attribute, AttributeData, Geometry, GeometryGroup};
pub use light::{Light, LightKind};
pub use material::{Material, MaterialKind, PhysicalProperties, Side};
pub use texture::{
    ColorSpace, ImageSource, MagFilter, MinFilter, PixelData, Texture, WrappingMode,
};

use serde_json::{Map, Value};

macro_rules! arena_id {
    ($(#[$doc:meta])* $id:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        pub struct $id(usize);
    };
}

arena_id!(
    /// Identifies a [`Node`] within a [`SceneGraph`].
    NodeId
);
arena_id!(
    /// Identifies an [`Attribute`] within a [`SceneGraph`].
    AttributeId
);
arena_id!(
    /// Identifies a [`Geometry`] within a [`SceneGraph`].
    GeometryId
);
arena_id!(
    /// Identifies a [`Material`] within a [`SceneGraph`].
    MaterialId
);
arena_id!(
    /// Identifies a [`Texture`] within a [`SceneGraph`].
    TextureId
);
arena_id!(
    /// Identifies an [`ImageSource`] within a [`SceneGraph`].
    ImageId
);

/// An in-memory scene graph: the input to the exporter.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    attributes: Vec<Attribute>,
    geometries: Vec<Geometry>,
    materials: Vec<Material>,
    textures: Vec<Texture>,
    images: Vec<ImageSource>,

    /// The scenes to emit; each is a named list of root nodes.
    pub scenes: Vec<Scene>,
}

/// A named list of root nodes, emitted as one glTF scene.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    /// Optional scene name; empty names are omitted from the output.
    pub name: String,

    /// The root nodes of this scene.
    pub nodes: Vec<NodeId>,
}

impl SceneGraph {
    /// Creates an empty graph holding a single unnamed scene.
    pub fn new() -> Self {
        SceneGraph {
            scenes: vec![Scene::default()],
            ..Default::default()
        }
    }

    /// Adds `node` to the graph and returns its identity.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Adds `node` to the graph and makes it a root of the first scene.
    pub fn add_root_node(&mut self, node: Node) -> NodeId {
        let id = self.add_node(node);
        if self.scenes.is_empty() {
            self.scenes.push(Scene::default());
        }
        self.scenes[0].nodes.push(id);
        id
    }

    /// Adds `attribute` to the graph and returns its identity.
    pub fn add_attribute(&mut self, attribute: Attribute) -> AttributeId {
        self.attributes.push(attribute);
        AttributeId(self.attributes.len() - 1)
    }

    /// Adds `geometry` to the graph and returns its identity.
    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        self.geometries.push(geometry);
        GeometryId(self.geometries.len() - 1)
    }

    /// Adds `material` to the graph and returns its identity.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    /// Adds `texture` to the graph and returns its identity.
    pub fn add_texture(&mut self, texture: Texture) -> TextureId {
        self.textures.push(texture);
        TextureId(self.textures.len() - 1)
    }

    /// Adds `image` to the graph and returns its identity.
    pub fn add_image(&mut self, image: ImageSource) -> ImageId {
        self.images.push(image);
        ImageId(self.images.len() - 1)
    }

    /// Returns the node identified by `id`.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Returns a mutable reference to the node identified by `id`.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Returns the attribute identified by `id`.
    pub fn attribute(&self, id: AttributeId) -> &Attribute {
        &self.attributes[id.0]
    }

    /// Returns the geometry identified by `id`.
    pub fn geometry(&self, id: GeometryId) -> &Geometry {
        &self.geometries[id.0]
    }

    /// Returns the material identified by `id`.
    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.0]
    }

    /// Returns the texture identified by `id`.
    pub fn texture(&self, id: TextureId) -> &Texture {
        &self.textures[id.0]
    }

    /// Returns the image source identified by `id`.
    pub fn image(&self, id: ImageId) -> &ImageSource {
        &self.images[id.0]
    }
}

/// A node in the scene hierarchy.
#[derive(Debug)]
pub struct Node {
    /// Node name; empty names are omitted from the output.
    pub name: String,

    /// The node's local transform.
    pub transform: Transform,

    /// Invisible nodes and their subtrees are skipped when the
    /// `only_visible` option is set.
    pub visible: bool,

    /// Children in traversal order.
    pub children: Vec<NodeId>,

    /// What the node carries.
    pub body: NodeBody,

    /// Custom glTF extensions to copy onto the emitted node when
    /// `include_custom_extensions` is set.
    pub extensions: Map<String, Value>,
}

impl Default for Node {
    fn default() -> Self {
        Node {
            name: String::new(),
            transform: Transform::default(),
            visible: true,
            children: Vec::new(),
            body: NodeBody::Empty,
            extensions: Map::new(),
        }
    }
}

/// A node's local transform.
#[derive(Clone, Copy, Debug)]
pub enum Transform {
    /// A 4x4 column-major matrix.
    Matrix([f32; 16]),

    /// Decomposed translation / rotation / scale.
    Decomposed {
        /// Translation along each axis.
        translation: [f32; 3],
        /// Unit quaternion in `(x, y, z, w)` order.
        rotation: [f32; 4],
        /// Scale along each axis.
        scale: [f32; 3],
    },
}

impl Default for Transform {
    fn default() -> Self {
        Transform::Decomposed {
            translation: [0.0; 3],
            rotation: [0.0, 0.0, 0.0, 1.0],
            scale: [1.0; 3],
        }
    }
}

/// The payload a node carries.
#[derive(Debug, Default)]
pub enum NodeBody {
    /// A grouping node with no payload.
    #[default]
    Empty,

    /// A renderable mesh.
    Mesh(MeshInstance),

    /// A camera projection.
    Camera(Projection),

    /// A punctual light source.
    Light(Light),
}

/// A geometry bound to one or more materials at a node.
#[derive(Debug)]
pub struct MeshInstance {
    /// The geometry to render.
    pub geometry: GeometryId,

    /// Bound materials; more than one requires geometry groups.
    pub materials: Vec<MaterialId>,

    /// The primitive topology.
    pub mode: PrimitiveMode,

    /// Current morph target influences, one per target.
    pub morph_weights: Vec<f32>,

    /// Morph target names in target order.
    pub morph_target_names: Vec<String>,

    /// Skin binding for skinned meshes.
    pub skin: Option<Skin>,

    /// Per-instance transforms for GPU-instanced meshes.
    pub instancing: Option<Instancing>,
}

impl MeshInstance {
    /// A triangle mesh rendering `geometry` with `material`.
    pub fn new(geometry: GeometryId, material: MaterialId) -> Self {
        MeshInstance {
            geometry,
            materials: vec![material],
            mode: PrimitiveMode::Triangles,
            morph_weights: Vec::new(),
            morph_target_names: Vec::new(),
            skin: None,
            instancing: None,
        }
    }
}

/// Primitive topology of a mesh.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PrimitiveMode {
    /// Point cloud.
    Points,
    /// Disjoint line segments.
    Lines,
    /// A closed polyline.
    LineLoop,
    /// A connected polyline.
    LineStrip,
    /// Triangle list.
    #[default]
    Triangles,
}

/// Binds a mesh to a skeleton.
#[derive(Debug)]
pub struct Skin {
    /// Skeleton joints, each an exported node.
    pub bones: Vec<NodeId>,

    /// One inverse bind matrix per bone, column-major.
    pub bone_inverses: Vec<[f32; 16]>,

    /// The mesh's bind matrix, column-major.
    pub bind_matrix: [f32; 16],
}

/// Per-instance transform tables for a GPU-instanced mesh.
#[derive(Debug)]
pub struct Instancing {
    /// One column-major transform per instance.
    pub matrices: Vec<[f32; 16]>,

    /// Optional per-instance color attribute with 3 or 4 components.
    pub colors: Option<AttributeId>,
}
