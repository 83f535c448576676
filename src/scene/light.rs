/// A punctual light source carried by a node.
#[derive(Clone, Debug)]
pub struct Light {
    /// RGB color in linear space.
    pub color: [f32; 3],

    /// Light brightness.
    pub intensity: f32,

    /// The light subcategory and its parameters.
    pub kind: LightKind,
}

/// Punctual light subcategories.
#[derive(Clone, Debug)]
pub enum LightKind {
    /// Emits along the node's -z axis from infinitely far away.
    Directional,

    /// Emits in all directions from the node's position.
    Point {
        /// Cutoff distance; zero means unbounded.
        distance: f32,

        /// Attenuation exponent; values other than 2 are not physically
        /// correct and warn on export.
        decay: f32,
    },

    /// Emits in a cone along the node's -z axis.
    Spot {
        /// Cutoff distance; zero means unbounded.
        distance: f32,

        /// Attenuation exponent; values other than 2 warn on export.
        decay: f32,

        /// Outer cone half-angle in radians.
        angle: f32,

        /// Fraction of the cone over which intensity falls off.
        penumbra: f32,

        /// Position the cone points at, relative to the light. Anything but
        /// the canonical `(0, 0, -1)` warns on export, since only the node
        /// orientation is serialized.
        target_position: [f32; 3],
    },
}
