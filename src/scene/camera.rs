/// A camera projection carried by a node.
#[derive(Clone, Copy, Debug)]
pub enum Projection {
    /// A perspective projection.
    Perspective {
        /// Vertical field of view in degrees.
        fov: f32,

        /// Aspect ratio of the field of view.
        aspect: Option<f32>,

        /// Distance to the near clipping plane.
        near: f32,

        /// Distance to the far clipping plane.
        far: f32,
    },

    /// An orthographic projection.
    Orthographic {
        /// Half the horizontal view extent.
        xmag: f32,

        /// Half the vertical view extent.
        ymag: f32,

        /// Distance to the near clipping plane.
        near: f32,

        /// Distance to the far clipping plane.
        far: f32,
    },
}
