use super::ImageId;

/// Magnification filter.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MagFilter {
    /// Nearest-texel sampling.
    Nearest,
    /// Bilinear sampling.
    #[default]
    Linear,
}

/// Minification filter.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MinFilter {
    /// Nearest-texel sampling.
    Nearest,
    /// Bilinear sampling.
    Linear,
    /// Nearest texel in the nearest mipmap.
    NearestMipmapNearest,
    /// Bilinear in the nearest mipmap.
    LinearMipmapNearest,
    /// Nearest texel blended across mipmaps.
    NearestMipmapLinear,
    /// Trilinear sampling.
    #[default]
    LinearMipmapLinear,
}

/// Texture coordinate wrapping mode.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum WrappingMode {
    /// Clamp coordinates to the edge texel.
    #[default]
    ClampToEdge,
    /// Mirror the texture at every integer boundary.
    MirroredRepeat,
    /// Tile the texture.
    Repeat,
}

/// The color space image data is stored in.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ColorSpace {
    /// Linear values; no conversion applied when compositing.
    #[default]
    Linear,
    /// sRGB-encoded values; linearized when compositing channels.
    Srgb,
}

/// A sampled image with filtering, wrapping and UV-transform state.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Texture name; empty names are omitted from the output.
    pub name: String,

    /// The image this texture samples.
    pub image: ImageId,

    /// Magnification filter.
    pub mag_filter: MagFilter,

    /// Minification filter.
    pub min_filter: MinFilter,

    /// Wrapping along U.
    pub wrap_s: WrappingMode,

    /// Wrapping along V.
    pub wrap_t: WrappingMode,

    /// Whether the image is flipped vertically before encoding.
    pub flip_y: bool,

    /// UV offset; non-default values emit `KHR_texture_transform`.
    pub offset: [f32; 2],

    /// UV repeat; non-default values emit `KHR_texture_transform`.
    pub repeat: [f32; 2],

    /// UV rotation in radians; non-default values emit
    /// `KHR_texture_transform`.
    pub rotation: f32,

    /// Which `TEXCOORD` set this texture samples.
    pub uv_channel: u32,

    /// Requested output MIME type; `image/png` when absent. WebP requests
    /// degrade to PNG.
    pub mime_type: Option<String>,

    /// The color space of the image data.
    pub color_space: ColorSpace,
}

impl Texture {
    /// A texture sampling `image` with default state.
    pub fn new(image: ImageId) -> Self {
        Texture {
            name: String::new(),
            image,
            mag_filter: MagFilter::default(),
            min_filter: MinFilter::default(),
            wrap_s: WrappingMode::default(),
            wrap_t: WrappingMode::default(),
            flip_y: true,
            offset: [0.0, 0.0],
            repeat: [1.0, 1.0],
            rotation: 0.0,
            uv_channel: 0,
            mime_type: None,
            color_space: ColorSpace::default(),
        }
    }
}

/// Pixel data backing an image.
#[derive(Clone, Debug)]
pub enum ImageSource {
    /// Raw pixels, tightly packed in row-major order.
    Pixels {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
        /// The pixel components.
        pixels: PixelData,
    },

    /// An already-encoded image decodable by the raster pipeline (PNG or
    /// JPEG).
    Encoded {
        /// The encoded bytes.
        data: Vec<u8>,
        /// The MIME type of `data`.
        mime_type: String,
    },
}

/// Component layout of raw pixel data.
#[derive(Clone, Debug)]
pub enum PixelData {
    /// Four components per pixel.
    Rgba8(Vec<u8>),
    /// Three components per pixel; expanded to RGBA with a warning.
    Rgb8(Vec<u8>),
}
