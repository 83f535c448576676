use super::NodeId;

/// How keyframe values are interpolated between samples.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Interpolation {
    /// Hold the previous keyframe value.
    Step,

    /// Linear interpolation.
    #[default]
    Linear,

    /// Smooth (Catmull-Rom style) interpolation; labelled `CUBICSPLINE` on
    /// export and downgraded to linear when merged into morph tracks.
    Smooth,

    /// glTF cubic spline data with in/out tangents interleaved into the
    /// values; cannot be merged into morph tracks.
    CubicSpline,
}

/// Which node property a track animates.
#[derive(Clone, Debug, PartialEq)]
pub enum TrackPath {
    /// The node's translation.
    Translation,

    /// The node's rotation quaternion.
    Rotation,

    /// The node's scale.
    Scale,

    /// The node's morph target influences.
    MorphWeights {
        /// A single target by name, or `None` for whole-vector tracks.
        target: Option<String>,
    },
}

/// A sampled curve bound to one property of one node.
#[derive(Clone, Debug)]
pub struct KeyframeTrack {
    /// The node whose property is animated.
    pub node: NodeId,

    /// Redirects the track to the named bone of the node's skeleton, for
    /// clips authored against a skinned mesh.
    pub bone: Option<String>,

    /// The animated property.
    pub path: TrackPath,

    /// Keyframe times in seconds, ascending.
    pub times: Vec<f32>,

    /// Flattened keyframe values, `value_size` components per time.
    pub values: Vec<f32>,

    /// The interpolation mode.
    pub interpolation: Interpolation,
}

impl KeyframeTrack {
    /// Components per keyframe.
    pub fn value_size(&self) -> usize {
        if self.times.is_empty() {
            0
        } else {
            self.values.len() / self.times.len()
        }
    }
}

/// A named set of keyframe tracks baked into one glTF animation.
#[derive(Clone, Debug, Default)]
pub struct AnimationClip {
    /// Clip name; empty names are omitted from the output.
    pub name: String,

    /// The tracks of this clip.
    pub tracks: Vec<KeyframeTrack>,
}
