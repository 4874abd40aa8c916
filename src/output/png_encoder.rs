//! PNG output encoder.
//!
//! Pure Rust PNG encoding using the `png` crate. Scenes rasterize through
//! [`crate::render::rasterize`] and land here.

use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::render::rasterize;
use crate::scene::Scene;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// PNG encoder for framebuffer and scene output.
pub struct PngEncoder;

impl PngEncoder {
    /// Write a framebuffer to a PNG file.
    ///
    /// # Errors
    ///
    /// Returns an error if file creation or PNG encoding fails.
    pub fn write_to_file<P: AsRef<Path>>(fb: &Framebuffer, path: P) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);

        let mut encoder = png::Encoder::new(writer, fb.width(), fb.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        // Compact pixels drop the stride padding
        writer.write_image_data(&fb.to_compact_pixels())?;

        Ok(())
    }

    /// Encode a framebuffer to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn to_bytes(fb: &Framebuffer) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();

        {
            let mut encoder = png::Encoder::new(&mut buffer, fb.width(), fb.height());
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);

            let mut writer = encoder.write_header()?;
            writer.write_image_data(&fb.to_compact_pixels())?;
        }

        Ok(buffer)
    }

    /// Rasterize a scene and encode it to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if rasterization or encoding fails.
    pub fn scene_to_bytes(scene: &Scene) -> Result<Vec<u8>> {
        Self::to_bytes(&rasterize(scene)?)
    }

    /// Rasterize a scene and write it to a PNG file.
    ///
    /// # Errors
    ///
    /// Returns an error if rasterization, file creation, or encoding fails.
    pub fn scene_to_file<P: AsRef<Path>>(scene: &Scene, path: P) -> Result<()> {
        Self::write_to_file(&rasterize(scene)?, path)
    }
}
