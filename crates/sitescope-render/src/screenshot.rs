//! Encoding of captured frames.

use image::{ImageBuffer, Rgba};

use crate::error::{CaptureError, CaptureResult};

/// Channel order of raw pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelFormat {
    #[default]
    Rgba8,
    /// As read back from a `Bgra8UnormSrgb` surface.
    Bgra8,
}

/// Encodes raw 8-bit pixel data as PNG in memory.
///
/// Rows are expected top to bottom.
pub fn encode_png(
    data: &[u8],
    width: u32,
    height: u32,
    format: PixelFormat,
) -> CaptureResult<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(CaptureError::EmptySize { width, height });
    }
    let expected = width as usize * height as usize * 4;
    if data.len() != expected {
        return Err(CaptureError::SizeMismatch {
            expected,
            actual: data.len(),
        });
    }

    let mut rgba_data = data.to_vec();
    if format == PixelFormat::Bgra8 {
        for chunk in rgba_data.chunks_exact_mut(4) {
            chunk.swap(0, 2); // Swap B and R
        }
    }

    let img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_raw(width, height, rgba_data)
        .ok_or(CaptureError::SizeMismatch {
            expected,
            actual: data.len(),
        })?;

    let mut buffer = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png)?;

    Ok(buffer.into_inner())
}
