use serde::ser;
use serde_derive::Serialize;

use crate::{accessor, scene, Extras, Index};

/// Specifies an interpolation algorithm.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Interpolation {
    /// Linear interpolation.
    ///
    /// When targeting a rotation, spherical linear interpolation (slerp)
    /// should be used to interpolate quaternions.
    Linear = 1,

    /// Step interpolation.
    ///
    /// The animated values remain constant to the output of the first
    /// keyframe, until the next keyframe.
    Step,

    /// Cubic spline interpolation.
    ///
    /// For each input element, the output stores three elements: an
    /// in-tangent, a spline vertex, and an out-tangent.
    CubicSpline,
}

impl Default for Interpolation {
    fn default() -> Self {
        Interpolation::Linear
    }
}

impl ser::Serialize for Interpolation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_str(match *self {
            Interpolation::Linear => "LINEAR",
            Interpolation::Step => "STEP",
            Interpolation::CubicSpline => "CUBICSPLINE",
        })
    }
}

/// Specifies a property to animate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Property {
    /// XYZ translation vector.
    Translation = 1,
    /// XYZW rotation quaternion.
    Rotation,
    /// XYZ scale vector.
    Scale,
    /// Weights of morph targets.
    MorphTargetWeights,
}

impl ser::Serialize for Property {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_str(match *self {
            Property::Translation => "translation",
            Property::Rotation => "rotation",
            Property::Scale => "scale",
            Property::MorphTargetWeights => "weights",
        })
    }
}

/// A keyframe animation.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Animation {
    /// An array of channels, each of which targets an animation's sampler at
    /// a node's property.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub channels: Vec<Channel>,

    /// Optional user-defined name for this object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// An array of samplers that combine input and output accessors with an
    /// interpolation algorithm to define a keyframe graph (but not its
    /// target).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub samplers: Vec<Sampler>,

    /// Optional application specific data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extras: Extras,
}

/// Targets an animation's sampler at a node's property.
#[derive(Clone, Debug, Serialize)]
pub struct Channel {
    /// The index of a sampler in this animation used to compute the value
    /// for the target.
    pub sampler: Index<Sampler>,

    /// The index of the node and TRS property to target.
    pub target: Target,
}

/// The index of the node and TRS property that an animation channel targets.
#[derive(Clone, Debug, Serialize)]
pub struct Target {
    /// The index of the node to target.
    pub node: Index<scene::Node>,

    /// The name of the node's property to modify or the `weights` of the
    /// morph targets it instantiates.
    pub path: Property,
}

/// Defines a keyframe graph but not its target.
#[derive(Clone, Debug, Serialize)]
pub struct Sampler {
    /// The index of an accessor containing keyframe input values, e.g.,
    /// time.
    pub input: Index<accessor::Accessor>,

    /// The interpolation algorithm.
    pub interpolation: Interpolation,

    /// The index of an accessor containing keyframe output values.
    pub output: Index<accessor::Accessor>,
}
