// Container boundary: file or byte buffer in, flat interleaved pixels out,
// and back again in the same container format.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("could not determine the image container format")]
    UnknownFormat,

    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),

    #[error("failed to encode image: {0}")]
    Encode(image::ImageError),

    #[error("pixel buffer does not match the recorded dimensions")]
    BufferShape,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Channel layout of the flat pixel buffer.
///
/// RGBA everywhere except JPEG, whose encoder rejects an alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    Rgb,
    Rgba,
}

impl ChannelLayout {
    fn for_format(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Jpeg => ChannelLayout::Rgb,
            _ => ChannelLayout::Rgba,
        }
    }
}

/// A decoded image: flat channel-interleaved bytes plus everything needed
/// to re-encode them into the container they came from.
#[derive(Debug)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    pub layout: ChannelLayout,
    pub pixels: Vec<u8>,
}

impl Raster {
    /// Preferred file extension of the container format.
    pub fn extension(&self) -> &'static str {
        self.format.extensions_str().first().copied().unwrap_or("img")
    }
}

pub fn decode(bytes: &[u8]) -> Result<Raster, CodecError> {
    let format = image::guess_format(bytes).map_err(|_| CodecError::UnknownFormat)?;
    let decoded =
        image::load_from_memory_with_format(bytes, format).map_err(CodecError::Decode)?;

    let (width, height) = (decoded.width(), decoded.height());
    let layout = ChannelLayout::for_format(format);
    let pixels = match layout {
        ChannelLayout::Rgb => decoded.into_rgb8().into_raw(),
        ChannelLayout::Rgba => decoded.into_rgba8().into_raw(),
    };

    Ok(Raster {
        width,
        height,
        format,
        layout,
        pixels,
    })
}

pub fn encode(raster: &Raster) -> Result<Vec<u8>, CodecError> {
    let image = rebuild(raster)?;
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, raster.format)
        .map_err(CodecError::Encode)?;
    Ok(out.into_inner())
}

pub fn load(path: &Path) -> Result<Raster, CodecError> {
    let bytes = fs::read(path)?;
    decode(&bytes)
}

pub fn save(raster: &Raster, path: &Path) -> Result<(), CodecError> {
    let bytes = encode(raster)?;
    fs::write(path, bytes)?;
    Ok(())
}

fn rebuild(raster: &Raster) -> Result<DynamicImage, CodecError> {
    let pixels = raster.pixels.clone();
    let image = match raster.layout {
        ChannelLayout::Rgb => {
            RgbImage::from_raw(raster.width, raster.height, pixels).map(DynamicImage::ImageRgb8)
        }
        ChannelLayout::Rgba => {
            RgbaImage::from_raw(raster.width, raster.height, pixels).map(DynamicImage::ImageRgba8)
        }
    };
    image.ok_or(CodecError::BufferShape)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rgba() -> Raster {
        Raster {
            width: 2,
            height: 2,
            format: ImageFormat::Png,
            layout: ChannelLayout::Rgba,
            pixels: (0u8..16).collect(),
        }
    }

    #[test]
    fn png_round_trip_is_byte_exact() {
        let raster = sample_rgba();
        let bytes = encode(&raster).unwrap();
        let back = decode(&bytes).unwrap();

        assert_eq!(back.format, ImageFormat::Png);
        assert_eq!(back.layout, ChannelLayout::Rgba);
        assert_eq!((back.width, back.height), (2, 2));
        assert_eq!(back.pixels, raster.pixels);
    }

    #[test]
    fn jpeg_decodes_to_rgb() {
        let rgb = RgbImage::from_fn(4, 4, |x, y| image::Rgb([x as u8 * 10, y as u8 * 10, 128]));
        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(rgb)
            .write_to(&mut bytes, ImageFormat::Jpeg)
            .unwrap();

        let raster = decode(&bytes.into_inner()).unwrap();
        assert_eq!(raster.format, ImageFormat::Jpeg);
        assert_eq!(raster.layout, ChannelLayout::Rgb);
        assert_eq!(raster.pixels.len(), 4 * 4 * 3);
    }

    #[test]
    fn garbage_bytes_are_an_unknown_format() {
        let err = decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, CodecError::UnknownFormat));
    }

    #[test]
    fn wrong_pixel_count_fails_to_encode() {
        let mut raster = sample_rgba();
        raster.pixels.pop();
        let err = encode(&raster).unwrap_err();
        assert!(matches!(err, CodecError::BufferShape));
    }
}
