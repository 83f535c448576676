use cgmath::{InnerSpace, Matrix3, Matrix4, Quaternion, SquareMatrix, Vector3};

/// Returns `n` rounded up to the next multiple of four.
pub(crate) fn align_to_multiple_of_four(n: usize) -> usize {
    (n + 3) & !3
}

/// Right-pads `bytes` with `pad` until its length is a multiple of four.
pub(crate) fn pad_to_multiple_of_four(bytes: &mut Vec<u8>, pad: u8) {
    let len = align_to_multiple_of_four(bytes.len());
    bytes.resize(len, pad);
}

/// Element-wise equality for float slices.
pub(crate) fn equal_array(a: &[f32], b: &[f32]) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
}

/// Whether `elements` is the column-major 4x4 identity.
pub(crate) fn is_identity(elements: &[f32; 16]) -> bool {
    const IDENTITY: [f32; 16] = [
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ];
    equal_array(elements, &IDENTITY)
}

pub(crate) fn mat4(e: &[f32; 16]) -> Matrix4<f32> {
    Matrix4::new(
        e[0], e[1], e[2], e[3], //
        e[4], e[5], e[6], e[7], //
        e[8], e[9], e[10], e[11], //
        e[12], e[13], e[14], e[15],
    )
}

pub(crate) fn mat4_to_array(m: &Matrix4<f32>) -> [f32; 16] {
    [
        m.x.x, m.x.y, m.x.z, m.x.w, //
        m.y.x, m.y.y, m.y.z, m.y.w, //
        m.z.x, m.z.y, m.z.z, m.z.w, //
        m.w.x, m.w.y, m.w.z, m.w.w,
    ]
}

/// Composes a column-major matrix from decomposed TRS.
pub(crate) fn compose(
    translation: &[f32; 3],
    rotation: &[f32; 4],
    scale: &[f32; 3],
) -> [f32; 16] {
    let t = Matrix4::from_translation(Vector3::new(
        translation[0],
        translation[1],
        translation[2],
    ));
    let r = Matrix4::from(Quaternion::new(
        rotation[3],
        rotation[0],
        rotation[1],
        rotation[2],
    ));
    let s = Matrix4::from_nonuniform_scale(scale[0], scale[1], scale[2]);
    mat4_to_array(&(t * r * s))
}

/// Decomposes a column-major matrix into translation, rotation quaternion
/// `(x, y, z, w)` and scale.
pub(crate) fn decompose(elements: &[f32; 16]) -> ([f32; 3], [f32; 4], [f32; 3]) {
    let m = mat4(elements);

    let mut sx = m.x.truncate().magnitude();
    let sy = m.y.truncate().magnitude();
    let sz = m.z.truncate().magnitude();

    // A negative determinant means one axis is mirrored.
    if m.determinant() < 0.0 {
        sx = -sx;
    }

    let translation = [m.w.x, m.w.y, m.w.z];

    let rotation = Matrix3::from_cols(
        m.x.truncate() / sx,
        m.y.truncate() / sy,
        m.z.truncate() / sz,
    );
    let q = Quaternion::from(rotation);

    (translation, [q.v.x, q.v.y, q.v.z, q.s], [sx, sy, sz])
}

/// Converts one sRGB-encoded channel byte to its linear equivalent.
pub(crate) fn srgb_to_linear(channel: u8) -> u8 {
    let c = f32::from(channel) / 255.0;
    let linear = if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    };
    (linear * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn alignment_rounds_up() {
        assert_eq!(0, align_to_multiple_of_four(0));
        assert_eq!(4, align_to_multiple_of_four(1));
        assert_eq!(4, align_to_multiple_of_four(4));
        assert_eq!(8, align_to_multiple_of_four(5));
    }

    #[test]
    fn padding_preserves_content() {
        let mut bytes = vec![1u8, 2, 3];
        pad_to_multiple_of_four(&mut bytes, 0x20);
        assert_eq!(vec![1, 2, 3, 0x20], bytes);
    }

    #[test]
    fn compose_then_decompose_round_trips() {
        let translation = [1.0, -2.0, 3.0];
        let rotation = [0.0, 0.7071068, 0.0, 0.7071068];
        let scale = [2.0, 2.0, 0.5];
        let m = compose(&translation, &rotation, &scale);
        let (t, r, s) = decompose(&m);
        for i in 0..3 {
            assert_relative_eq!(translation[i], t[i], epsilon = 1e-5);
            assert_relative_eq!(scale[i], s[i], epsilon = 1e-5);
        }
        for i in 0..4 {
            assert_relative_eq!(rotation[i], r[i], epsilon = 1e-5);
        }
    }

    #[test]
    fn identity_matrix_detected() {
        let (_, r, _) = decompose(&compose(&[0.0; 3], &[0.0, 0.0, 0.0, 1.0], &[1.0; 3]));
        assert_relative_eq!(1.0, r[3], epsilon = 1e-6);
        assert!(is_identity(&compose(
            &[0.0; 3],
            &[0.0, 0.0, 0.0, 1.0],
            &[1.0; 3]
        )));
    }
}
