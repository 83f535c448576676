//! Morph-target track merging.
//!
//! glTF animates morph influences with a single vector-valued `weights`
//! track per node, whereas authored clips commonly carry one scalar track
//! per morph target. [`merge_morph_target_tracks`] coalesces those scalar
//! tracks into one track of stride `N` per target node, resampling each
//! source curve at the union of keyframe times.

use log::warn;
use std::collections::HashMap;

use crate::scene::{
    AnimationClip, Interpolation, KeyframeTrack, NodeBody, NodeId, SceneGraph, TrackPath,
};
use crate::Error;

/// Keyframes closer together than this many seconds collapse into one.
const KEYFRAME_TOLERANCE: f32 = 0.001;

/// Returns a copy of `clip` in which per-target morph tracks are merged
/// into whole-vector `weights` tracks, one per target node.
pub(crate) fn merge_morph_target_tracks(
    clip: &AnimationClip,
    graph: &SceneGraph,
) -> Result<AnimationClip, Error> {
    let mut tracks: Vec<KeyframeTrack> = Vec::with_capacity(clip.tracks.len());
    let mut merged_by_node: HashMap<NodeId, usize> = HashMap::new();

    for track in &clip.tracks {
        let target = match &track.path {
            TrackPath::MorphWeights {
                target: Some(name),
            } => name,
            _ => {
                // Non-morph and whole-vector morph tracks pass through.
                tracks.push(track.clone());
                continue;
            }
        };

        let mesh = match &graph.node(track.node).body {
            NodeBody::Mesh(mesh) => mesh,
            _ => {
                return Err(Error::UnsupportedInput(format!(
                    "morph track '{}' targets a node without a mesh",
                    target
                )))
            }
        };
        let target_count = if mesh.morph_weights.is_empty() {
            graph.geometry(mesh.geometry).morph_target_count()
        } else {
            mesh.morph_weights.len()
        };
        if target_count == 0 {
            return Err(Error::UnsupportedInput(format!(
                "morph track '{}' targets a mesh without morph targets",
                target
            )));
        }
        let target_index = mesh
            .morph_target_names
            .iter()
            .position(|name| name == target)
            .ok_or_else(|| {
                Error::UnsupportedInput(format!("morph target '{}' not found", target))
            })?;

        let interpolation = match track.interpolation {
            Interpolation::CubicSpline => {
                return Err(Error::UnsupportedInput(
                    "cannot merge morph target tracks with cubic spline interpolation"
                        .into(),
                ))
            }
            Interpolation::Smooth => {
                warn!(
                    "morph track '{}' uses smooth interpolation, falling back to linear",
                    target
                );
                Interpolation::Linear
            }
            other => other,
        };

        match merged_by_node.get(&track.node) {
            None => {
                // First per-target track for this node seeds the merged
                // track at stride `target_count`.
                let mut values = vec![0.0; track.times.len() * target_count];
                for (key, value) in track.values.iter().enumerate() {
                    values[key * target_count + target_index] = *value;
                }
                merged_by_node.insert(track.node, tracks.len());
                tracks.push(KeyframeTrack {
                    node: track.node,
                    bone: track.bone.clone(),
                    path: TrackPath::MorphWeights { target: None },
                    times: track.times.clone(),
                    values,
                    interpolation,
                });
            }
            Some(&merged_index) => {
                let merged = &mut tracks[merged_index];

                // Write the source's value at every existing keyframe of
                // the merged track, then introduce the source's own
                // keyframe times with exact values.
                for key in 0..merged.times.len() {
                    let mut value = [0.0f32];
                    sample(
                        &track.times,
                        &track.values,
                        1,
                        interpolation,
                        merged.times[key],
                        &mut value,
                    );
                    merged.values[key * target_count + target_index] = value[0];
                }

                for (key, &time) in track.times.iter().enumerate() {
                    let index = insert_keyframe(merged, time);
                    merged.values[index * target_count + target_index] = track.values[key];
                }
            }
        }
    }

    Ok(AnimationClip {
        name: clip.name.clone(),
        tracks,
    })
}

/// Returns the index of the keyframe at `time`, inserting one if no
/// existing keyframe lies within [`KEYFRAME_TOLERANCE`].
///
/// Inserted keyframes receive values interpolated from the track itself.
pub(crate) fn insert_keyframe(track: &mut KeyframeTrack, time: f32) -> usize {
    let stride = track.value_size();
    let count = track.times.len();

    let insert_at = if time < track.times[0] {
        if (track.times[0] - time).abs() < KEYFRAME_TOLERANCE {
            return 0;
        }
        0
    } else if time > track.times[count - 1] {
        if (time - track.times[count - 1]).abs() < KEYFRAME_TOLERANCE {
            return count - 1;
        }
        count
    } else {
        let mut position = count;
        for i in 0..count - 1 {
            if (time - track.times[i]).abs() < KEYFRAME_TOLERANCE {
                return i;
            }
            if track.times[i] < time && time < track.times[i + 1] {
                if (track.times[i + 1] - time).abs() < KEYFRAME_TOLERANCE {
                    return i + 1;
                }
                position = i + 1;
                break;
            }
        }
        if (time - track.times[count - 1]).abs() < KEYFRAME_TOLERANCE {
            return count - 1;
        }
        position
    };

    let mut values = vec![0.0; stride];
    sample(
        &track.times,
        &track.values,
        stride,
        track.interpolation,
        time,
        &mut values,
    );

    track.times.insert(insert_at, time);
    for (component, value) in values.into_iter().enumerate() {
        track.values.insert(insert_at * stride + component, value);
    }

    insert_at
}

/// Evaluates a track at `time`, writing `stride` components into `out`.
///
/// Times outside the keyframe range clamp to the edge values.
pub(crate) fn sample(
    times: &[f32],
    values: &[f32],
    stride: usize,
    interpolation: Interpolation,
    time: f32,
    out: &mut [f32],
) {
    let count = times.len();
    if count == 0 {
        out.fill(0.0);
        return;
    }
    if time <= times[0] {
        out.copy_from_slice(&values[0..stride]);
        return;
    }
    if time >= times[count - 1] {
        out.copy_from_slice(&values[(count - 1) * stride..count * stride]);
        return;
    }

    let mut upper = 1;
    while times[upper] < time {
        upper += 1;
    }
    let lower = upper - 1;

    match interpolation {
        Interpolation::Step => {
            out.copy_from_slice(&values[lower * stride..(lower + 1) * stride]);
        }
        _ => {
            let span = times[upper] - times[lower];
            let alpha = if span > 0.0 {
                (time - times[lower]) / span
            } else {
                0.0
            };
            for component in 0..stride {
                let a = values[lower * stride + component];
                let b = values[upper * stride + component];
                out[component] = a + (b - a) * alpha;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{
        Attribute, Geometry, Material, MeshInstance, Node, NodeBody, SceneGraph,
    };
    use approx::assert_relative_eq;

    fn morph_graph(target_names: &[&str]) -> (SceneGraph, NodeId) {
        let mut graph = SceneGraph::new();
        let base = graph.add_attribute(Attribute::f32(vec![0.0; 9], 3));
        let target = graph.add_attribute(Attribute::f32(vec![1.0; 9], 3));
        let mut geometry = Geometry::default();
        geometry.attributes.insert("position".into(), base);
        geometry.morph_targets.insert(
            "position".into(),
            target_names.iter().map(|_| target).collect(),
        );
        let geometry = graph.add_geometry(geometry);
        let material = graph.add_material(Material::default());
        let mut mesh = MeshInstance::new(geometry, material);
        mesh.morph_weights = vec![0.0; target_names.len()];
        mesh.morph_target_names = target_names.iter().map(|s| s.to_string()).collect();
        let node = graph.add_root_node(Node {
            body: NodeBody::Mesh(mesh),
            ..Default::default()
        });
        (graph, node)
    }

    fn morph_track(
        node: NodeId,
        target: &str,
        times: Vec<f32>,
        values: Vec<f32>,
    ) -> KeyframeTrack {
        KeyframeTrack {
            node,
            bone: None,
            path: TrackPath::MorphWeights {
                target: Some(target.to_string()),
            },
            times,
            values,
            interpolation: Interpolation::Linear,
        }
    }

    #[test]
    fn merges_two_targets_into_one_strided_track() {
        let (graph, node) = morph_graph(&["smile", "frown"]);
        let clip = AnimationClip {
            name: "expressions".into(),
            tracks: vec![
                morph_track(node, "smile", vec![0.0, 1.0, 2.0], vec![0.0, 0.5, 1.0]),
                morph_track(node, "frown", vec![0.0, 1.0, 2.0], vec![1.0, 0.5, 0.0]),
            ],
        };

        let merged = merge_morph_target_tracks(&clip, &graph).unwrap();
        assert_eq!(1, merged.tracks.len());
        let track = &merged.tracks[0];
        assert_eq!(3, track.times.len());
        assert_eq!(2, track.value_size());
        assert_eq!(
            &[0.0, 1.0, 0.5, 0.5, 1.0, 0.0],
            track.values.as_slice()
        );
    }

    #[test]
    fn merged_keyframes_stay_farther_apart_than_the_tolerance() {
        let (graph, node) = morph_graph(&["a", "b"]);
        let clip = AnimationClip {
            name: String::new(),
            tracks: vec![
                morph_track(node, "a", vec![0.0, 1.0], vec![0.0, 1.0]),
                // 1.0004 lies within tolerance of 1.0; 0.5 does not.
                morph_track(node, "b", vec![0.5, 1.0004], vec![0.2, 0.8]),
            ],
        };

        let merged = merge_morph_target_tracks(&clip, &graph).unwrap();
        let track = &merged.tracks[0];
        assert_eq!(3, track.times.len());
        for pair in track.times.windows(2) {
            assert!(pair[1] - pair[0] > KEYFRAME_TOLERANCE);
        }
        // The exact source value wins at the collapsed keyframe.
        assert_relative_eq!(0.8, track.values[2 * 2 + 1]);
    }

    #[test]
    fn unknown_morph_target_name_is_an_error() {
        let (graph, node) = morph_graph(&["a"]);
        let clip = AnimationClip {
            name: String::new(),
            tracks: vec![morph_track(node, "missing", vec![0.0], vec![1.0])],
        };
        assert!(matches!(
            merge_morph_target_tracks(&clip, &graph),
            Err(Error::UnsupportedInput(_))
        ));
    }

    #[test]
    fn cubic_spline_morph_sources_are_rejected() {
        let (graph, node) = morph_graph(&["a"]);
        let mut track = morph_track(node, "a", vec![0.0], vec![1.0]);
        track.interpolation = Interpolation::CubicSpline;
        let clip = AnimationClip {
            name: String::new(),
            tracks: vec![track],
        };
        assert!(merge_morph_target_tracks(&clip, &graph).is_err());
    }

    #[test]
    fn insert_keyframe_interpolates_missing_components() {
        let mut track = KeyframeTrack {
            node: morph_graph(&["a"]).1,
            bone: None,
            path: TrackPath::MorphWeights { target: None },
            times: vec![0.0, 2.0],
            values: vec![0.0, 1.0, 2.0, 3.0],
            interpolation: Interpolation::Linear,
        };
        let index = insert_keyframe(&mut track, 1.0);
        assert_eq!(1, index);
        assert_eq!(vec![0.0, 1.0, 2.0], track.times);
        assert_relative_eq!(1.0, track.values[2]);
        assert_relative_eq!(2.0, track.values[3]);
    }

    #[test]
    fn sample_clamps_and_steps() {
        let times = [0.0, 1.0];
        let values = [0.0, 10.0];
        let mut out = [0.0f32];

        sample(&times, &values, 1, Interpolation::Linear, -1.0, &mut out);
        assert_relative_eq!(0.0, out[0]);
        sample(&times, &values, 1, Interpolation::Linear, 0.5, &mut out);
        assert_relative_eq!(5.0, out[0]);
        sample(&times, &values, 1, Interpolation::Step, 0.5, &mut out);
        assert_relative_eq!(0.0, out[0]);
        sample(&times, &values, 1, Interpolation::Linear, 9.0, &mut out);
        assert_relative_eq!(10.0, out[0]);
    }
}
