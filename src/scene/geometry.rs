use std::collections::BTreeMap;

use super::AttributeId;

/// A typed stream of vertex data.
///
/// `data` holds `count * item_size` scalar components in element order;
/// interleaving is not supported.
#[derive(Clone, Debug)]
pub struct Attribute {
    /// The component storage.
    pub data: AttributeData,

    /// Components per element (1 for scalars, 3 for positions, 16 for
    /// matrices, ...).
    pub item_size: usize,

    /// Whether integer components encode normalized real values.
    pub normalized: bool,
}

/// Component storage of an [`Attribute`].
#[derive(Clone, Debug)]
pub enum AttributeData {
    /// 8-bit signed integers.
    I8(Vec<i8>),
    /// 8-bit unsigned integers.
    U8(Vec<u8>),
    /// 16-bit signed integers.
    I16(Vec<i16>),
    /// 16-bit unsigned integers.
    U16(Vec<u16>),
    /// 32-bit unsigned integers.
    U32(Vec<u32>),
    /// 32-bit floats.
    F32(Vec<f32>),
}

impl AttributeData {
    /// The number of scalar components stored.
    pub fn len(&self) -> usize {
        match self {
            AttributeData::I8(v) => v.len(),
            AttributeData::U8(v) => v.len(),
            AttributeData::I16(v) => v.len(),
            AttributeData::U16(v) => v.len(),
            AttributeData::U32(v) => v.len(),
            AttributeData::F32(v) => v.len(),
        }
    }

    /// Whether no components are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Attribute {
    /// A float attribute over `data` with `item_size` components per
    /// element.
    pub fn f32(data: Vec<f32>, item_size: usize) -> Self {
        Attribute {
            data: AttributeData::F32(data),
            item_size,
            normalized: false,
        }
    }

    /// An unsigned 8-bit attribute.
    pub fn u8(data: Vec<u8>, item_size: usize) -> Self {
        Attribute {
            data: AttributeData::U8(data),
            item_size,
            normalized: false,
        }
    }

    /// An unsigned 16-bit attribute.
    pub fn u16(data: Vec<u16>, item_size: usize) -> Self {
        Attribute {
            data: AttributeData::U16(data),
            item_size,
            normalized: false,
        }
    }

    /// An unsigned 32-bit attribute.
    pub fn u32(data: Vec<u32>, item_size: usize) -> Self {
        Attribute {
            data: AttributeData::U32(data),
            item_size,
            normalized: false,
        }
    }

    /// The number of elements.
    pub fn count(&self) -> usize {
        if self.item_size == 0 {
            0
        } else {
            self.data.len() / self.item_size
        }
    }

    /// Reads component `component` of element `element` as a double.
    pub fn get(&self, element: usize, component: usize) -> f64 {
        let i = element * self.item_size + component;
        match &self.data {
            AttributeData::I8(v) => f64::from(v[i]),
            AttributeData::U8(v) => f64::from(v[i]),
            AttributeData::I16(v) => f64::from(v[i]),
            AttributeData::U16(v) => f64::from(v[i]),
            AttributeData::U32(v) => f64::from(v[i]),
            AttributeData::F32(v) => f64::from(v[i]),
        }
    }
}

/// A sub-range of a geometry's elements bound to one material slot.
#[derive(Clone, Copy, Debug)]
pub struct GeometryGroup {
    /// First element (index element when indexed, vertex otherwise).
    pub start: usize,

    /// Number of elements in the group.
    pub count: usize,

    /// Position into the mesh's material list.
    pub material_slot: usize,
}

/// Vertex streams, an optional index stream, material groups, and morph
/// targets.
///
/// Attribute streams are keyed by their source names: `position`, `normal`,
/// `tangent`, `uv` through `uv3`, `color`, `skinIndex`, `skinWeight`, or any
/// custom name. The writer renames them to glTF semantics on emission.
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    /// Geometry name; currently informational only.
    pub name: String,

    /// Named vertex streams.
    pub attributes: BTreeMap<String, AttributeId>,

    /// Optional scalar index stream.
    pub index: Option<AttributeId>,

    /// Material groups; required when a mesh binds more than one material.
    pub groups: Vec<GeometryGroup>,

    /// Morph target streams keyed by attribute name; each entry holds one
    /// attribute per target.
    pub morph_targets: BTreeMap<String, Vec<AttributeId>>,

    /// Whether morph attributes already store deltas relative to the base
    /// attribute.
    pub morph_relative: bool,
}

impl Geometry {
    /// The number of morph targets.
    pub fn morph_target_count(&self) -> usize {
        self.morph_targets
            .values()
            .map(|targets| targets.len())
            .max()
            .unwrap_or(0)
    }
}
