//! The raster pipeline: decoding, clamping, flipping and re-encoding image
//! sources, plus the metalness/roughness channel composite.

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, RgbaImage};
use log::warn;
use std::io::Cursor;

use crate::scene::{ColorSpace, ImageSource, PixelData};
use crate::util::srgb_to_linear;
use crate::Error;

/// Decodes `source` into an RGBA surface, clamping each axis to `max_size`
/// and optionally flipping vertically.
pub(crate) fn rasterize(
    source: &ImageSource,
    max_size: u32,
    flip_y: bool,
) -> Result<RgbaImage, Error> {
    let mut rgba = match source {
        ImageSource::Pixels {
            width,
            height,
            pixels,
        } => raw_to_rgba(*width, *height, pixels)?,
        ImageSource::Encoded { data, .. } => {
            image::load_from_memory(data)?.to_rgba8()
        }
    };

    let (width, height) = rgba.dimensions();
    let clamped = (width.min(max_size).max(1), height.min(max_size).max(1));
    if clamped != (width, height) {
        rgba = imageops::resize(&rgba, clamped.0, clamped.1, FilterType::Triangle);
    }

    if flip_y {
        rgba = imageops::flip_vertical(&rgba);
    }

    Ok(rgba)
}

fn raw_to_rgba(width: u32, height: u32, pixels: &PixelData) -> Result<RgbaImage, Error> {
    let pixel_count = width as usize * height as usize;
    match pixels {
        PixelData::Rgba8(data) => {
            if data.len() != pixel_count * 4 {
                return Err(Error::InvalidImage(format!(
                    "expected {} RGBA bytes, got {}",
                    pixel_count * 4,
                    data.len()
                )));
            }
            RgbaImage::from_raw(width, height, data.clone())
                .ok_or_else(|| Error::InvalidImage("pixel buffer overflow".into()))
        }
        PixelData::Rgb8(data) => {
            warn!("image format is not RGBA, expanding to RGBA");
            if data.len() != pixel_count * 3 {
                return Err(Error::InvalidImage(format!(
                    "expected {} RGB bytes, got {}",
                    pixel_count * 3,
                    data.len()
                )));
            }
            let mut rgba = Vec::with_capacity(pixel_count * 4);
            for rgb in data.chunks_exact(3) {
                rgba.extend_from_slice(rgb);
                rgba.push(0xFF);
            }
            RgbaImage::from_raw(width, height, rgba)
                .ok_or_else(|| Error::InvalidImage("pixel buffer overflow".into()))
        }
    }
}

/// Encodes an RGBA surface as `mime_type`, one of `image/png` or
/// `image/jpeg`.
pub(crate) fn encode(rgba: &RgbaImage, mime_type: &str) -> Result<Vec<u8>, Error> {
    let mut cursor = Cursor::new(Vec::new());
    match mime_type {
        "image/png" => {
            DynamicImage::ImageRgba8(rgba.clone()).write_to(&mut cursor, ImageFormat::Png)?;
        }
        "image/jpeg" => {
            // JPEG carries no alpha.
            let rgb = DynamicImage::ImageRgba8(rgba.clone()).to_rgb8();
            DynamicImage::ImageRgb8(rgb).write_to(&mut cursor, ImageFormat::Jpeg)?;
        }
        other => return Err(Error::UnsupportedMime(other.to_string())),
    }
    Ok(cursor.into_inner())
}

/// Formats encoded image bytes as a `data:` URI.
pub(crate) fn to_data_uri(bytes: &[u8], mime_type: &str) -> String {
    format!("data:{};base64,{}", mime_type, base64::encode(bytes))
}

/// Composites separate metalness and roughness surfaces into the combined
/// glTF layout: roughness in G, metalness in B.
///
/// The composite is prefilled with opaque cyan, so an absent map leaves its
/// channel saturated. sRGB-tagged sources are linearized channel-wise.
pub(crate) fn composite_metal_rough(
    metalness: Option<(&RgbaImage, ColorSpace)>,
    roughness: Option<(&RgbaImage, ColorSpace)>,
) -> RgbaImage {
    let mut width = 1;
    let mut height = 1;
    for (surface, _) in metalness.iter().chain(roughness.iter()) {
        width = width.max(surface.width());
        height = height.max(surface.height());
    }

    let mut composite = RgbaImage::from_pixel(width, height, image::Rgba([0, 255, 255, 255]));

    if let Some((surface, color_space)) = metalness {
        copy_channel(&mut composite, surface, color_space, 2);
    }
    if let Some((surface, color_space)) = roughness {
        copy_channel(&mut composite, surface, color_space, 1);
    }

    composite
}

fn copy_channel(
    composite: &mut RgbaImage,
    source: &RgbaImage,
    color_space: ColorSpace,
    channel: usize,
) {
    let resized;
    let source = if source.dimensions() == composite.dimensions() {
        source
    } else {
        resized = imageops::resize(
            source,
            composite.width(),
            composite.height(),
            FilterType::Triangle,
        );
        &resized
    };

    for (target, texel) in composite.pixels_mut().zip(source.pixels()) {
        let mut value = texel.0[channel];
        if color_space == ColorSpace::Srgb {
            value = srgb_to_linear(value);
        }
        target.0[channel] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, image::Rgba(rgba))
    }

    #[test]
    fn composite_prefills_cyan() {
        let composite = composite_metal_rough(None, None);
        assert_eq!([0, 255, 255, 255], composite.get_pixel(0, 0).0);
    }

    #[test]
    fn composite_copies_roughness_into_green_and_metalness_into_blue() {
        let metal = solid(2, 2, [10, 20, 30, 255]);
        let rough = solid(2, 2, [40, 50, 60, 255]);
        let composite = composite_metal_rough(
            Some((&metal, ColorSpace::Linear)),
            Some((&rough, ColorSpace::Linear)),
        );
        let texel = composite.get_pixel(1, 1).0;
        assert_eq!(50, texel[1]);
        assert_eq!(30, texel[2]);
        assert_eq!(0, texel[0]);
    }

    #[test]
    fn composite_linearizes_srgb_sources() {
        let metal = solid(1, 1, [0, 0, 128, 255]);
        let composite = composite_metal_rough(Some((&metal, ColorSpace::Srgb)), None);
        let texel = composite.get_pixel(0, 0).0;
        assert_eq!(srgb_to_linear(128), texel[2]);
        // Roughness channel keeps the cyan prefill.
        assert_eq!(255, texel[1]);
    }

    #[test]
    fn rasterize_clamps_dimensions() {
        let source = ImageSource::Pixels {
            width: 4,
            height: 2,
            pixels: PixelData::Rgba8(vec![255; 4 * 2 * 4]),
        };
        let rgba = rasterize(&source, 2, false).unwrap();
        assert_eq!((2, 2), rgba.dimensions());
    }

    #[test]
    fn rasterize_flips_vertically() {
        let mut data = vec![0u8; 1 * 2 * 4];
        data[4] = 255; // bottom row red
        let source = ImageSource::Pixels {
            width: 1,
            height: 2,
            pixels: PixelData::Rgba8(data),
        };
        let rgba = rasterize(&source, u32::MAX, true).unwrap();
        assert_eq!(255, rgba.get_pixel(0, 0).0[0]);
    }

    #[test]
    fn encode_rejects_unknown_mime_types() {
        let rgba = solid(1, 1, [0, 0, 0, 255]);
        assert!(matches!(
            encode(&rgba, "image/gif"),
            Err(Error::UnsupportedMime(_))
        ));
    }

    #[test]
    fn data_uri_has_mime_prefix() {
        let uri = to_data_uri(&[0, 1, 2], "image/png");
        assert!(uri.starts_with("data:image/png;base64,"));
    }
}
