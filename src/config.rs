use crate::scene::AnimationClip;

/// Options controlling one write.
#[derive(Clone, Debug)]
pub struct ExportOptions {
    /// Emit a GLB container instead of a JSON document with an embedded
    /// `data:` URI buffer.
    pub binary: bool,

    /// Emit decomposed translation/rotation/scale instead of a single
    /// matrix on nodes. Forced on whenever `animations` is non-empty,
    /// because animation channels target TRS properties.
    pub trs: bool,

    /// Skip nodes whose visibility flag is off, together with their
    /// subtrees.
    pub only_visible: bool,

    /// Clamp image dimensions on both axes.
    pub max_texture_size: u32,

    /// Animation clips to bake, in order.
    pub animations: Vec<AnimationClip>,

    /// Copy user-supplied custom extensions into the emitted JSON.
    pub include_custom_extensions: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            binary: false,
            trs: false,
            only_visible: true,
            max_texture_size: u32::MAX,
            animations: Vec::new(),
            include_custom_extensions: false,
        }
    }
}
