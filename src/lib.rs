#![allow(unknown_lints)]
#![warn(missing_docs)]

//! glTF 2.0 scene serializer.
//!
//! This crate turns an in-memory scene graph — nodes, meshes, materials,
//! textures, lights, skins, animations, cameras — into a glTF 2.0 asset:
//! either a JSON document whose binary payload is embedded as a `data:` URI,
//! or a self-contained binary GLB container.
//!
//! ## Example
//!
//! ```
//! use gltf_export::scene::{
//!     Attribute, Geometry, Material, MeshInstance, Node, NodeBody, SceneGraph,
//! };
//! use gltf_export::{Exporter, ExportOptions};
//!
//! # fn run() -> Result<(), gltf_export::Error> {
//! let mut graph = SceneGraph::new();
//! let position = graph.add_attribute(Attribute::f32(
//!     vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
//!     3,
//! ));
//! let mut geometry = Geometry::default();
//! geometry.attributes.insert("position".to_string(), position);
//! let geometry = graph.add_geometry(geometry);
//! let material = graph.add_material(Material::default());
//! graph.add_root_node(Node {
//!     name: "triangle".to_string(),
//!     body: NodeBody::Mesh(MeshInstance::new(geometry, material)),
//!     ..Default::default()
//! });
//!
//! let glb = Exporter::new().write_glb(&graph, &ExportOptions::default())?;
//! assert_eq!(b"glTF", &glb[0..4]);
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```
//!
//! ## Extensions
//!
//! Emission of `KHR_*`/`EXT_*` extension data is handled by plug-ins
//! implementing [`extensions::Plugin`]. The built-in set (punctual lights,
//! the physical material family, GPU instancing) is registered by
//! [`Exporter::new`]; custom plug-ins go through [`Exporter::register`].

/// Contains the GLB container codec.
pub mod binary;

/// Contains the extension plug-in trait, registry and built-ins.
pub mod extensions;

/// Contains the scene-graph input model.
pub mod scene;

/// Contains the writer.
pub mod writer;

mod animation;
mod config;
mod raster;
mod util;

pub use config::ExportOptions;
pub use scene::SceneGraph;
pub use writer::Writer;

/// Re-export of the document model crate.
pub use gltf_export_json as json;

use extensions::PluginFactory;

/// Represents a runtime error.
#[derive(Debug)]
pub enum Error {
    /// The input cannot be expressed as glTF.
    UnsupportedInput(String),

    /// An image encode was requested for a MIME type other than PNG or
    /// JPEG.
    UnsupportedMime(String),

    /// An image source could not be rasterized.
    InvalidImage(String),

    /// Image codec error.
    Image(image::ImageError),

    /// JSON serialization error.
    Json(json::Error),

    /// Standard I/O error.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnsupportedInput(reason) => write!(f, "unsupported input: {}", reason),
            Error::UnsupportedMime(mime_type) => {
                write!(f, "unsupported image MIME type: {}", mime_type)
            }
            Error::InvalidImage(reason) => write!(f, "invalid image source: {}", reason),
            Error::Image(source) => source.fmt(f),
            Error::Json(source) => source.fmt(f),
            Error::Io(source) => source.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Image(source) => Some(source),
            Error::Json(source) => Some(source),
            Error::Io(source) => Some(source),
            _ => None,
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(source: image::ImageError) -> Self {
        Error::Image(source)
    }
}

impl From<json::Error> for Error {
    fn from(source: json::Error) -> Self {
        Error::Json(source)
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io(source)
    }
}

/// The product of a write: a complete document or nothing.
#[derive(Debug)]
pub enum Output {
    /// A framed GLB container.
    Binary(Vec<u8>),

    /// The glTF JSON document.
    Json(json::Root),
}

impl Output {
    /// The GLB bytes, when written in binary mode.
    pub fn into_binary(self) -> Option<Vec<u8>> {
        match self {
            Output::Binary(bytes) => Some(bytes),
            Output::Json(_) => None,
        }
    }

    /// The JSON document, when written in JSON mode.
    pub fn into_json(self) -> Option<json::Root> {
        match self {
            Output::Json(root) => Some(root),
            Output::Binary(_) => None,
        }
    }
}

/// The exporter: a plug-in registry plus the `write` entry point.
///
/// All mutable serialization state lives in a per-write [`Writer`];
/// the exporter itself only holds the registered plug-in factories and may
/// be reused across writes.
pub struct Exporter {
    plugins: Vec<PluginFactory>,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter {
    /// An exporter with the built-in extension plug-ins registered.
    pub fn new() -> Self {
        Exporter {
            plugins: extensions::builtin_plugins(),
        }
    }

    /// Registers a plug-in factory; registering the same factory twice is a
    /// no-op.
    pub fn register(&mut self, factory: PluginFactory) {
        if !self.plugins.contains(&factory) {
            self.plugins.push(factory);
        }
    }

    /// Removes a previously registered plug-in factory.
    pub fn unregister(&mut self, factory: PluginFactory) {
        self.plugins.retain(|registered| *registered != factory);
    }

    /// Serializes `graph` per `options`.
    ///
    /// Either a complete document is returned or an error; partial output
    /// is never produced.
    pub fn write(&self, graph: &SceneGraph, options: &ExportOptions) -> Result<Output, Error> {
        let plugins = self.plugins.iter().map(|factory| factory()).collect();
        let mut writer = Writer::new(graph, options, plugins);
        writer.run()?;
        writer.finish()
    }

    /// Serializes `graph` into a binary GLB container, overriding
    /// `options.binary`.
    pub fn write_glb(
        &self,
        graph: &SceneGraph,
        options: &ExportOptions,
    ) -> Result<Vec<u8>, Error> {
        let options = ExportOptions {
            binary: true,
            ..options.clone()
        };
        match self.write(graph, &options)? {
            Output::Binary(bytes) => Ok(bytes),
            Output::Json(_) => unreachable!("binary mode produced a JSON document"),
        }
    }

    /// Serializes `graph` into a JSON document, overriding
    /// `options.binary`.
    pub fn write_document(
        &self,
        graph: &SceneGraph,
        options: &ExportOptions,
    ) -> Result<json::Root, Error> {
        let options = ExportOptions {
            binary: false,
            ..options.clone()
        };
        match self.write(graph, &options)? {
            Output::Json(root) => Ok(root),
            Output::Binary(_) => unreachable!("JSON mode produced a binary container"),
        }
    }
}
