//! End-to-end export scenarios over small hand-built scene graphs.

use gltf_export::scene::{
    AnimationClip, Attribute, Geometry, GeometryGroup, GeometryId, ImageSource, Instancing,
    Interpolation, KeyframeTrack, Light, LightKind, Material, MaterialId, MaterialKind,
    MeshInstance, Node, NodeBody, PixelData, Projection, SceneGraph, Skin, Texture, TrackPath,
};
use gltf_export::{ExportOptions, Exporter};
use serde_json::Value;

fn export_document(graph: &SceneGraph, options: &ExportOptions) -> Value {
    let root = Exporter::new().write_document(graph, options).unwrap();
    root.to_value().unwrap()
}

fn export_glb(graph: &SceneGraph, options: &ExportOptions) -> (Value, Vec<u8>) {
    let bytes = Exporter::new().write_glb(graph, options).unwrap();
    split_glb(&bytes)
}

/// Splits a GLB container into its JSON document and BIN payload.
fn split_glb(bytes: &[u8]) -> (Value, Vec<u8>) {
    assert_eq!(b"glTF", &bytes[0..4]);
    let json_length = u32::from_le_bytes(bytes[12..16].try_into().unwrap()) as usize;
    assert_eq!(b"JSON", &bytes[16..20]);
    let document = serde_json::from_slice(&bytes[20..20 + json_length]).unwrap();

    let bin_offset = 20 + json_length;
    let bin = if bytes.len() > bin_offset {
        let bin_length =
            u32::from_le_bytes(bytes[bin_offset..bin_offset + 4].try_into().unwrap()) as usize;
        assert_eq!(b"BIN\0", &bytes[bin_offset + 4..bin_offset + 8]);
        bytes[bin_offset + 8..bin_offset + 8 + bin_length].to_vec()
    } else {
        Vec::new()
    };
    (document, bin)
}

/// Reads an accessor's float components out of the BIN payload.
fn accessor_f32(document: &Value, bin: &[u8], accessor: usize) -> Vec<f32> {
    let accessor = &document["accessors"][accessor];
    assert_eq!(5126, accessor["componentType"].as_u64().unwrap());
    let count = accessor["count"].as_u64().unwrap() as usize;
    let item_size = match accessor["type"].as_str().unwrap() {
        "SCALAR" => 1,
        "VEC2" => 2,
        "VEC3" => 3,
        "VEC4" => 4,
        "MAT4" => 16,
        other => panic!("unexpected accessor type {}", other),
    };

    let view = &document["bufferViews"][accessor["bufferView"].as_u64().unwrap() as usize];
    let offset = view["byteOffset"].as_u64().unwrap_or(0) as usize;
    let stride = view["byteStride"]
        .as_u64()
        .map(|stride| stride as usize)
        .unwrap_or(item_size * 4);

    let mut values = Vec::with_capacity(count * item_size);
    for element in 0..count {
        let base = offset + element * stride;
        for component in 0..item_size {
            let at = base + component * 4;
            values.push(f32::from_le_bytes(bin[at..at + 4].try_into().unwrap()));
        }
    }
    values
}

fn white_pixel_image(graph: &mut SceneGraph) -> Texture {
    let image = graph.add_image(ImageSource::Pixels {
        width: 1,
        height: 1,
        pixels: PixelData::Rgba8(vec![255, 255, 255, 255]),
    });
    Texture::new(image)
}

/// A unit quad: four vertices with positions, normals, UVs and six indices.
fn quad_geometry(graph: &mut SceneGraph) -> GeometryId {
    let position = graph.add_attribute(Attribute::f32(
        vec![
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            1.0, 1.0, 0.0, //
            0.0, 1.0, 0.0,
        ],
        3,
    ));
    let normal = graph.add_attribute(Attribute::f32(
        vec![
            0.0, 0.0, 1.0, //
            0.0, 0.0, 1.0, //
            0.0, 0.0, 1.0, //
            0.0, 0.0, 1.0,
        ],
        3,
    ));
    let uv = graph.add_attribute(Attribute::f32(
        vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0],
        2,
    ));
    let index = graph.add_attribute(Attribute::u16(vec![0, 1, 2, 0, 2, 3], 1));

    let mut geometry = Geometry::default();
    geometry.attributes.insert("position".to_string(), position);
    geometry.attributes.insert("normal".to_string(), normal);
    geometry.attributes.insert("uv".to_string(), uv);
    geometry.index = Some(index);
    graph.add_geometry(geometry)
}

fn quad_mesh_node(graph: &mut SceneGraph, material: MaterialId) -> Node {
    let geometry = quad_geometry(graph);
    Node {
        name: "quad".to_string(),
        body: NodeBody::Mesh(MeshInstance::new(geometry, material)),
        ..Default::default()
    }
}

#[test]
fn empty_scene_emits_asset_scene_and_no_buffer() {
    let graph = SceneGraph::new();
    let document = export_document(&graph, &ExportOptions::default());

    assert_eq!("2.0", document["asset"]["version"]);
    assert_eq!(serde_json::json!([{}]), document["scenes"]);
    assert_eq!(0, document["scene"]);
    assert!(document.get("buffers").is_none());
    assert!(document.get("nodes").is_none());
}

#[test]
fn empty_scene_glb_has_empty_bin_chunk() {
    let graph = SceneGraph::new();
    let bytes = Exporter::new()
        .write_glb(&graph, &ExportOptions::default())
        .unwrap();

    assert_eq!(b"glTF", &bytes[0..4]);
    assert_eq!(2, u32::from_le_bytes(bytes[4..8].try_into().unwrap()));
    let total = u32::from_le_bytes(bytes[8..12].try_into().unwrap());
    assert_eq!(bytes.len(), total as usize);

    let (_, bin) = split_glb(&bytes);
    assert!(bin.is_empty());
}

#[test]
fn textured_quad_with_basic_material() {
    let mut graph = SceneGraph::new();
    let texture = white_pixel_image(&mut graph);
    let texture = graph.add_texture(texture);
    let material = graph.add_material(Material {
        kind: MaterialKind::Basic,
        base_color_map: Some(texture),
        ..Default::default()
    });
    let node = quad_mesh_node(&mut graph, material);
    graph.add_root_node(node);

    let document = export_document(&graph, &ExportOptions::default());

    assert_eq!(1, document["nodes"].as_array().unwrap().len());
    assert_eq!(1, document["meshes"].as_array().unwrap().len());
    assert_eq!(4, document["accessors"].as_array().unwrap().len());
    assert_eq!(4, document["bufferViews"].as_array().unwrap().len());
    assert_eq!(1, document["buffers"].as_array().unwrap().len());
    assert_eq!(1, document["materials"].as_array().unwrap().len());
    assert_eq!(1, document["textures"].as_array().unwrap().len());
    assert_eq!(1, document["samplers"].as_array().unwrap().len());
    assert_eq!(1, document["images"].as_array().unwrap().len());

    let primitive = &document["meshes"][0]["primitives"][0];
    assert!(primitive["attributes"]["POSITION"].is_u64());
    assert!(primitive["attributes"]["NORMAL"].is_u64());
    assert!(primitive["attributes"]["TEXCOORD_0"].is_u64());
    assert!(primitive["indices"].is_u64());
    assert_eq!(0, primitive["material"]);

    let material = &document["materials"][0];
    assert!(material["pbrMetallicRoughness"]["baseColorTexture"]["index"].is_u64());
    // The unlit plug-in fired and reset the factors.
    assert_eq!(
        0.0,
        material["pbrMetallicRoughness"]["metallicFactor"]
            .as_f64()
            .unwrap()
    );
    assert!(material["extensions"]["KHR_materials_unlit"].is_object());
    let used = document["extensionsUsed"].as_array().unwrap();
    assert!(used.contains(&Value::from("KHR_materials_unlit")));

    // JSON mode embeds payloads as data URIs.
    let buffer_uri = document["buffers"][0]["uri"].as_str().unwrap();
    assert!(buffer_uri.starts_with("data:application/octet-stream;base64,"));
    let image_uri = document["images"][0]["uri"].as_str().unwrap();
    assert!(image_uri.starts_with("data:image/png;base64,"));
}

#[test]
fn textured_quad_glb_stores_image_in_buffer_view() {
    let mut graph = SceneGraph::new();
    let texture = white_pixel_image(&mut graph);
    let texture = graph.add_texture(texture);
    let material = graph.add_material(Material {
        base_color_map: Some(texture),
        ..Default::default()
    });
    let node = quad_mesh_node(&mut graph, material);
    graph.add_root_node(node);

    let (document, bin) = export_glb(&graph, &ExportOptions::default());

    let image = &document["images"][0];
    assert!(image.get("uri").is_none());
    assert_eq!("image/png", image["mimeType"]);
    let view = image["bufferView"].as_u64().unwrap() as usize;
    let offset = document["bufferViews"][view]["byteOffset"].as_u64().unwrap() as usize;
    let length = document["bufferViews"][view]["byteLength"].as_u64().unwrap() as usize;
    // The view holds a PNG stream.
    assert_eq!(
        &[0x89, b'P', b'N', b'G'],
        &bin[offset..offset + 4.min(length)]
    );
    assert_eq!(bin.len() as u64, document["buffers"][0]["byteLength"].as_u64().unwrap());
}

#[test]
fn instanced_mesh_emits_gpu_instancing_tables() {
    let mut graph = SceneGraph::new();
    let material = graph.add_material(Material::default());
    let geometry = quad_geometry(&mut graph);

    let translate = |x: f32| {
        [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            x, 0.0, 0.0, 1.0,
        ]
    };
    let mut mesh = MeshInstance::new(geometry, material);
    mesh.instancing = Some(Instancing {
        matrices: vec![translate(0.0), translate(1.0), translate(2.0)],
        colors: None,
    });
    graph.add_root_node(Node {
        body: NodeBody::Mesh(mesh),
        ..Default::default()
    });

    let (document, bin) = export_glb(&graph, &ExportOptions::default());

    let attributes = &document["nodes"][0]["extensions"]["EXT_mesh_gpu_instancing"]["attributes"];
    for semantic in ["TRANSLATION", "ROTATION", "SCALE"] {
        let accessor = attributes[semantic].as_u64().unwrap() as usize;
        assert_eq!(3, document["accessors"][accessor]["count"].as_u64().unwrap());
    }

    let translations = accessor_f32(
        &document,
        &bin,
        attributes["TRANSLATION"].as_u64().unwrap() as usize,
    );
    assert_eq!(
        vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.0, 0.0],
        translations
    );

    let required = document["extensionsRequired"].as_array().unwrap();
    assert!(required.contains(&Value::from("EXT_mesh_gpu_instancing")));
    let used = document["extensionsUsed"].as_array().unwrap();
    assert!(used.contains(&Value::from("EXT_mesh_gpu_instancing")));
}

#[test]
fn morph_animation_merges_tracks_and_relativizes_targets() {
    let mut graph = SceneGraph::new();

    let base = vec![
        0.0, 0.0, 0.0, //
        1.0, 0.0, 0.0, //
        0.0, 1.0, 0.0,
    ];
    let position = graph.add_attribute(Attribute::f32(base.clone(), 3));
    // Absolute morph targets: base displaced along +z and +x.
    let lifted: Vec<f32> = base
        .chunks(3)
        .flat_map(|v| [v[0], v[1], v[2] + 1.0])
        .collect();
    let shifted: Vec<f32> = base
        .chunks(3)
        .flat_map(|v| [v[0] + 0.5, v[1], v[2]])
        .collect();
    let open = graph.add_attribute(Attribute::f32(lifted, 3));
    let close = graph.add_attribute(Attribute::f32(shifted, 3));

    let mut geometry = Geometry::default();
    geometry.attributes.insert("position".to_string(), position);
    geometry
        .morph_targets
        .insert("position".to_string(), vec![open, close]);
    let geometry = graph.add_geometry(geometry);

    let material = graph.add_material(Material::default());
    let mut mesh = MeshInstance::new(geometry, material);
    mesh.morph_weights = vec![0.0, 0.0];
    mesh.morph_target_names = vec!["open".to_string(), "close".to_string()];
    let node = graph.add_root_node(Node {
        body: NodeBody::Mesh(mesh),
        ..Default::default()
    });

    let track = |target: &str, values: Vec<f32>| KeyframeTrack {
        node,
        bone: None,
        path: TrackPath::MorphWeights {
            target: Some(target.to_string()),
        },
        times: vec![0.0, 1.0, 2.0],
        values,
        interpolation: Interpolation::Linear,
    };
    let options = ExportOptions {
        animations: vec![AnimationClip {
            name: "blend".to_string(),
            tracks: vec![
                track("open", vec![0.0, 0.5, 1.0]),
                track("close", vec![1.0, 0.5, 0.0]),
            ],
        }],
        ..Default::default()
    };

    let (document, bin) = export_glb(&graph, &options);

    // One merged channel targeting weights.
    let animation = &document["animations"][0];
    assert_eq!(1, animation["channels"].as_array().unwrap().len());
    assert_eq!("weights", animation["channels"][0]["target"]["path"]);
    let sampler = &animation["samplers"][0];
    assert_eq!("LINEAR", sampler["interpolation"]);

    let input = sampler["input"].as_u64().unwrap() as usize;
    assert_eq!(3, document["accessors"][input]["count"].as_u64().unwrap());
    let output = sampler["output"].as_u64().unwrap() as usize;
    // Three keyframes at stride two.
    assert_eq!(6, document["accessors"][output]["count"].as_u64().unwrap());
    assert_eq!(
        vec![0.0, 1.0, 0.5, 0.5, 1.0, 0.0],
        accessor_f32(&document, &bin, output)
    );

    // Morph targets were made relative to the base attribute.
    let target = &document["meshes"][0]["primitives"][0]["targets"][0];
    let deltas = accessor_f32(&document, &bin, target["POSITION"].as_u64().unwrap() as usize);
    assert_eq!(vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0], deltas);

    assert_eq!(
        serde_json::json!([0.0, 0.0]),
        document["meshes"][0]["weights"]
    );
    assert_eq!(
        serde_json::json!({ "targetNames": ["open", "close"] }),
        document["meshes"][0]["extras"]
    );

    // Animations force TRS output; no matrix on any node.
    for node in document["nodes"].as_array().unwrap() {
        assert!(node.get("matrix").is_none());
    }
}

#[test]
fn iridescent_material_emits_scalar_payload() {
    let mut graph = SceneGraph::new();
    let mut material = Material {
        kind: MaterialKind::Physical,
        ..Default::default()
    };
    material.physical.iridescence = 0.3;
    material.physical.iridescence_ior = 1.8;
    material.physical.iridescence_thickness_range = [100.0, 400.0];
    let material = graph.add_material(material);
    let node = quad_mesh_node(&mut graph, material);
    graph.add_root_node(node);

    let document = export_document(&graph, &ExportOptions::default());

    let payload = &document["materials"][0]["extensions"]["KHR_materials_iridescence"];
    assert_eq!(0.3, payload["iridescenceFactor"].as_f64().unwrap() as f32);
    assert_eq!(1.8, payload["iridescenceIor"].as_f64().unwrap() as f32);
    assert_eq!(100.0, payload["iridescenceThicknessMinimum"].as_f64().unwrap() as f32);
    assert_eq!(400.0, payload["iridescenceThicknessMaximum"].as_f64().unwrap() as f32);
    assert!(payload.get("iridescenceTexture").is_none());
    assert!(payload.get("iridescenceThicknessTexture").is_none());

    let used = document["extensionsUsed"].as_array().unwrap();
    assert!(used.contains(&Value::from("KHR_materials_iridescence")));
    assert!(document.get("extensionsRequired").is_none());
}

#[test]
fn skinned_mesh_emits_skin_after_traversal() {
    let mut graph = SceneGraph::new();

    let shoulder = graph.add_node(Node {
        name: "shoulder".to_string(),
        ..Default::default()
    });
    let elbow = graph.add_node(Node {
        name: "elbow".to_string(),
        ..Default::default()
    });
    graph.node_mut(shoulder).children.push(elbow);

    let identity = [
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ];

    let position = graph.add_attribute(Attribute::f32(vec![0.0; 9], 3));
    let joints = graph.add_attribute(Attribute::u16(vec![0, 1, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0], 4));
    let weights = graph.add_attribute(Attribute::f32(
        vec![0.5, 0.5, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        4,
    ));
    let mut geometry = Geometry::default();
    geometry.attributes.insert("position".to_string(), position);
    geometry.attributes.insert("skinIndex".to_string(), joints);
    geometry.attributes.insert("skinWeight".to_string(), weights);
    let geometry = graph.add_geometry(geometry);

    let material = graph.add_material(Material::default());
    let mut mesh = MeshInstance::new(geometry, material);
    mesh.skin = Some(Skin {
        bones: vec![shoulder, elbow],
        bone_inverses: vec![identity, identity],
        bind_matrix: identity,
    });
    let mesh_node = graph.add_node(Node {
        name: "arm".to_string(),
        body: NodeBody::Mesh(mesh),
        ..Default::default()
    });

    graph.scenes[0].nodes = vec![shoulder, mesh_node];

    let document = export_document(&graph, &ExportOptions::default());

    let skins = document["skins"].as_array().unwrap();
    assert_eq!(1, skins.len());
    let skin = &skins[0];
    assert_eq!(2, skin["joints"].as_array().unwrap().len());

    let ibm = skin["inverseBindMatrices"].as_u64().unwrap() as usize;
    assert_eq!(2, document["accessors"][ibm]["count"].as_u64().unwrap());
    assert_eq!("MAT4", document["accessors"][ibm]["type"]);

    // The skin index is back-written onto the mesh node.
    let nodes = document["nodes"].as_array().unwrap();
    let arm = nodes
        .iter()
        .find(|node| node["name"] == "arm")
        .unwrap();
    assert_eq!(0, arm["skin"]);

    // `skeleton` is the first joint.
    assert_eq!(skin["joints"][0], skin["skeleton"]);

    // Joints resolve to the bone nodes by name.
    let first_joint = skin["joints"][0].as_u64().unwrap() as usize;
    assert_eq!("shoulder", nodes[first_joint]["name"]);
}

#[test]
fn named_camera_node_stores_the_projection_kind() {
    let mut graph = SceneGraph::new();
    graph.add_root_node(Node {
        name: "hero-cam".to_string(),
        body: NodeBody::Camera(Projection::Perspective {
            fov: 50.0,
            aspect: Some(1.5),
            near: 0.1,
            far: 100.0,
        }),
        ..Default::default()
    });

    let document = export_document(&graph, &ExportOptions::default());

    let camera = &document["cameras"][0];
    assert_eq!("perspective", camera["type"]);
    // Quirk kept from the original writer: the projection kind, not the
    // authored name.
    assert_eq!("PerspectiveCamera", camera["name"]);
    let yfov = camera["perspective"]["yfov"].as_f64().unwrap();
    assert!((yfov - 50.0f64.to_radians()).abs() < 1e-6);
    assert_eq!(0, document["nodes"][0]["camera"]);
}

#[test]
fn point_light_node_emits_punctual_lights() {
    let mut graph = SceneGraph::new();
    graph.add_root_node(Node {
        name: "lamp".to_string(),
        body: NodeBody::Light(Light {
            color: [1.0, 0.5, 0.25],
            intensity: 2.0,
            kind: LightKind::Point {
                distance: 10.0,
                decay: 2.0,
            },
        }),
        ..Default::default()
    });

    let document = export_document(&graph, &ExportOptions::default());

    let lights = &document["extensions"]["KHR_lights_punctual"]["lights"];
    assert_eq!("point", lights[0]["type"]);
    assert_eq!("lamp", lights[0]["name"]);
    assert_eq!(10.0, lights[0]["range"].as_f64().unwrap() as f32);
    assert_eq!(0, document["nodes"][0]["extensions"]["KHR_lights_punctual"]["light"]);

    let used = document["extensionsUsed"].as_array().unwrap();
    assert!(used.contains(&Value::from("KHR_lights_punctual")));
}

#[test]
fn spot_light_cone_angles_follow_penumbra() {
    let mut graph = SceneGraph::new();
    graph.add_root_node(Node {
        body: NodeBody::Light(Light {
            color: [1.0; 3],
            intensity: 1.0,
            kind: LightKind::Spot {
                distance: 0.0,
                decay: 2.0,
                angle: 0.8,
                penumbra: 0.25,
                target_position: [0.0, 0.0, -1.0],
            },
        }),
        ..Default::default()
    });

    let document = export_document(&graph, &ExportOptions::default());
    let spot = &document["extensions"]["KHR_lights_punctual"]["lights"][0]["spot"];
    let inner = spot["innerConeAngle"].as_f64().unwrap() as f32;
    let outer = spot["outerConeAngle"].as_f64().unwrap() as f32;
    assert!((inner - 0.6).abs() < 1e-6);
    assert!((outer - 0.8).abs() < 1e-6);
}

#[test]
fn texture_transform_is_annotated_on_the_reference() {
    let mut graph = SceneGraph::new();
    let mut texture = white_pixel_image(&mut graph);
    texture.offset = [0.25, 0.5];
    texture.repeat = [2.0, 2.0];
    let texture = graph.add_texture(texture);
    let material = graph.add_material(Material {
        base_color_map: Some(texture),
        ..Default::default()
    });
    let node = quad_mesh_node(&mut graph, material);
    graph.add_root_node(node);

    let document = export_document(&graph, &ExportOptions::default());

    let reference = &document["materials"][0]["pbrMetallicRoughness"]["baseColorTexture"];
    let transform = &reference["extensions"]["KHR_texture_transform"];
    assert_eq!(serde_json::json!([0.25, 0.5]), transform["offset"]);
    assert_eq!(serde_json::json!([2.0, 2.0]), transform["scale"]);
    assert!(transform.get("rotation").is_none());

    let used = document["extensionsUsed"].as_array().unwrap();
    assert!(used.contains(&Value::from("KHR_texture_transform")));
}

#[test]
fn invisible_subtrees_are_pruned_unless_disabled() {
    let mut graph = SceneGraph::new();
    let hidden_child = graph.add_node(Node {
        name: "hidden-child".to_string(),
        ..Default::default()
    });
    let hidden = graph.add_node(Node {
        name: "hidden".to_string(),
        visible: false,
        children: vec![hidden_child],
        ..Default::default()
    });
    let shown = graph.add_node(Node {
        name: "shown".to_string(),
        ..Default::default()
    });
    graph.scenes[0].nodes = vec![hidden, shown];

    let document = export_document(&graph, &ExportOptions::default());
    let nodes = document["nodes"].as_array().unwrap();
    assert_eq!(1, nodes.len());
    assert_eq!("shown", nodes[0]["name"]);

    let everything = export_document(
        &graph,
        &ExportOptions {
            only_visible: false,
            ..Default::default()
        },
    );
    assert_eq!(3, everything["nodes"].as_array().unwrap().len());
}

#[test]
fn custom_extensions_are_copied_when_enabled() {
    let mut graph = SceneGraph::new();
    let mut node = Node::default();
    node.extensions.insert(
        "EXT_custom_tag".to_string(),
        serde_json::json!({ "tag": 7 }),
    );
    graph.add_root_node(node);

    let silent = export_document(&graph, &ExportOptions::default());
    assert!(silent["nodes"][0].get("extensions").is_none());

    let document = export_document(
        &graph,
        &ExportOptions {
            include_custom_extensions: true,
            ..Default::default()
        },
    );
    assert_eq!(
        7,
        document["nodes"][0]["extensions"]["EXT_custom_tag"]["tag"]
    );
    let used = document["extensionsUsed"].as_array().unwrap();
    assert!(used.contains(&Value::from("EXT_custom_tag")));
}

#[test]
fn multi_material_geometry_slices_groups_into_primitives() {
    let mut graph = SceneGraph::new();
    let geometry_id = quad_geometry(&mut graph);
    {
        let first = graph.add_material(Material {
            name: "first".to_string(),
            ..Default::default()
        });
        let second = graph.add_material(Material {
            name: "second".to_string(),
            ..Default::default()
        });

        // Rebuild the quad with two groups over its six indices.
        let mut geometry = graph.geometry(geometry_id).clone();
        geometry.groups = vec![
            GeometryGroup {
                start: 0,
                count: 3,
                material_slot: 0,
            },
            GeometryGroup {
                start: 3,
                count: 3,
                material_slot: 1,
            },
        ];
        let grouped = graph.add_geometry(geometry);

        let mut mesh = MeshInstance::new(grouped, first);
        mesh.materials = vec![first, second];
        graph.add_root_node(Node {
            body: NodeBody::Mesh(mesh),
            ..Default::default()
        });
    }

    let document = export_document(&graph, &ExportOptions::default());

    let primitives = document["meshes"][0]["primitives"].as_array().unwrap();
    assert_eq!(2, primitives.len());
    assert_eq!(0, primitives[0]["material"]);
    assert_eq!(1, primitives[1]["material"]);
    assert_eq!(primitives[0]["attributes"], primitives[1]["attributes"]);

    for primitive in primitives {
        let indices = primitive["indices"].as_u64().unwrap() as usize;
        assert_eq!(3, document["accessors"][indices]["count"].as_u64().unwrap());
    }
}

#[test]
fn multi_material_geometry_without_groups_is_skipped() {
    let mut graph = SceneGraph::new();
    let geometry = quad_geometry(&mut graph);
    let first = graph.add_material(Material::default());
    let second = graph.add_material(Material::default());
    let mut mesh = MeshInstance::new(geometry, first);
    mesh.materials = vec![first, second];
    graph.add_root_node(Node {
        body: NodeBody::Mesh(mesh),
        ..Default::default()
    });

    let document = export_document(&graph, &ExportOptions::default());
    assert!(document.get("meshes").is_none());
    assert!(document["nodes"][0].get("mesh").is_none());
}

#[test]
fn translation_track_animates_the_node() {
    let mut graph = SceneGraph::new();
    let node = graph.add_root_node(Node {
        name: "mover".to_string(),
        ..Default::default()
    });

    let options = ExportOptions {
        animations: vec![AnimationClip {
            name: "slide".to_string(),
            tracks: vec![KeyframeTrack {
                node,
                bone: None,
                path: TrackPath::Translation,
                times: vec![0.0, 1.0],
                values: vec![0.0, 0.0, 0.0, 2.0, 0.0, 0.0],
                interpolation: Interpolation::Step,
            }],
        }],
        ..Default::default()
    };
    let (document, bin) = export_glb(&graph, &options);

    let animation = &document["animations"][0];
    assert_eq!("slide", animation["name"]);
    let channel = &animation["channels"][0];
    assert_eq!("translation", channel["target"]["path"]);
    assert_eq!(0, channel["target"]["node"]);

    let sampler = &animation["samplers"][0];
    assert_eq!("STEP", sampler["interpolation"]);
    let output = sampler["output"].as_u64().unwrap() as usize;
    assert_eq!("VEC3", document["accessors"][output]["type"]);
    assert_eq!(
        vec![0.0, 0.0, 0.0, 2.0, 0.0, 0.0],
        accessor_f32(&document, &bin, output)
    );
}

#[test]
fn shader_materials_are_skipped_softly() {
    let mut graph = SceneGraph::new();
    let material = graph.add_material(Material {
        kind: MaterialKind::Shader,
        ..Default::default()
    });
    let node = quad_mesh_node(&mut graph, material);
    graph.add_root_node(node);

    let document = export_document(&graph, &ExportOptions::default());

    // The mesh survives without a material binding.
    assert!(document.get("materials").is_none());
    let primitive = &document["meshes"][0]["primitives"][0];
    assert!(primitive.get("material").is_none());
}

#[test]
fn wireframe_material_forces_line_topology() {
    let mut graph = SceneGraph::new();
    let material = graph.add_material(Material {
        wireframe: true,
        ..Default::default()
    });
    let node = quad_mesh_node(&mut graph, material);
    graph.add_root_node(node);

    let document = export_document(&graph, &ExportOptions::default());
    assert_eq!(1, document["meshes"][0]["primitives"][0]["mode"]);
}

#[test]
fn wireframe_applies_per_group_on_multi_material_meshes() {
    let mut graph = SceneGraph::new();
    let geometry_id = quad_geometry(&mut graph);
    let wire = graph.add_material(Material {
        wireframe: true,
        ..Default::default()
    });
    let solid = graph.add_material(Material::default());

    let mut geometry = graph.geometry(geometry_id).clone();
    geometry.groups = vec![
        GeometryGroup {
            start: 0,
            count: 3,
            material_slot: 0,
        },
        GeometryGroup {
            start: 3,
            count: 3,
            material_slot: 1,
        },
    ];
    let grouped = graph.add_geometry(geometry);

    let mut mesh = MeshInstance::new(grouped, wire);
    mesh.materials = vec![wire, solid];
    graph.add_root_node(Node {
        body: NodeBody::Mesh(mesh),
        ..Default::default()
    });

    let document = export_document(&graph, &ExportOptions::default());

    let primitives = document["meshes"][0]["primitives"].as_array().unwrap();
    assert_eq!(2, primitives.len());
    // The wireframe group renders as lines, the solid one keeps the
    // (elided) triangle default.
    assert_eq!(1, primitives[0]["mode"]);
    assert!(primitives[1].get("mode").is_none());
}
