//! PNG export of rendered framebuffers.
//!
//! Framebuffers store linear RGBA; the sRGB transfer function is applied
//! here, at the output boundary.

use crate::core::Framebuffer;
use crate::math::linear_to_srgb;
use image::codecs::png::PngEncoder;
use image::ImageEncoder;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use thiserror::Error;

/// Errors from writing an image file.
#[derive(Error, Debug)]
pub enum SaveError {
    /// Creating or writing the file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// PNG encoding failed.
    #[error("png encode error: {0}")]
    Encode(#[from] image::ImageError),
}

/// Convert a framebuffer's linear color plane to sRGB bytes (alpha stays
/// linear).
pub fn srgb_bytes(fb: &Framebuffer) -> Vec<u8> {
    let mut data = Vec::with_capacity(fb.color_plane().len());
    for texel in fb.color_plane().chunks_exact(4) {
        for &channel in &texel[..3] {
            let srgb = linear_to_srgb(channel as f64 / 255.0);
            data.push((srgb * 255.0).round() as u8);
        }
        data.push(texel[3]);
    }
    data
}

/// Encode a framebuffer to a PNG file, converting to sRGB.
pub fn save_png(path: impl AsRef<Path>, fb: &Framebuffer) -> Result<(), SaveError> {
    let file = File::create(path.as_ref())?;
    let encoder = PngEncoder::new(BufWriter::new(file));
    encoder.write_image(
        &srgb_bytes(fb),
        fb.width() as u32,
        fb.height() as u32,
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Color;

    #[test]
    fn test_srgb_conversion_brightens_midtones() {
        let mut fb = Framebuffer::new(1, 1).unwrap();
        fb.set_pixel(0, 0, Color::gray(0.5));
        let bytes = srgb_bytes(&fb);
        // Linear 0.5 encodes to roughly 188 in sRGB.
        assert!(bytes[0] > 180 && bytes[0] < 195, "got {}", bytes[0]);
        assert_eq!(bytes[3], 255);
    }

    #[test]
    fn test_save_png_writes_file() {
        let mut fb = Framebuffer::new(4, 4).unwrap();
        fb.clear_color(Color::RED);
        let path = std::env::temp_dir().join("softren_test_output.png");
        save_png(&path, &fb).unwrap();
        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
        std::fs::remove_file(&path).ok();
    }
}
