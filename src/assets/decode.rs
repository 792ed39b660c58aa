use std::{io::Cursor, path::Path};

use anyhow::Context;
use image::RgbaImage;

use crate::foundation::error::{CropError, CropResult};

/// Decode an encoded raster (PNG, JPEG, ...) into straight-alpha RGBA8.
pub fn decode_image(bytes: &[u8]) -> CropResult<RgbaImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(CropError::image("decoded image has zero size"));
    }
    Ok(rgba)
}

/// Read and decode an image file.
pub fn open_image(path: &Path) -> CropResult<RgbaImage> {
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes)
}

/// Encode `img` as PNG bytes.
pub fn encode_png(img: &RgbaImage) -> CropResult<Vec<u8>> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img.clone())
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| CropError::image(format!("encode png: {e}")))?;
    Ok(buf)
}

/// Encode `img` as PNG and write it to `path`.
pub fn save_png(img: &RgbaImage, path: &Path) -> CropResult<()> {
    let bytes = encode_png(img)?;
    std::fs::write(path, bytes).with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
