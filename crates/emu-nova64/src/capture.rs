//! Headless capture: PNG screenshots of the framebuffer.

use std::error::Error;
use std::fs;
use std::io::BufWriter;
use std::path::Path;

use crate::blitter::Blitter;
use crate::color::to_rgba8;

/// Save the blitter's framebuffer as a PNG file.
///
/// The framebuffer is ARGB4444; each nibble is expanded to 8 bits for the
/// encoder. Call after the operation queue has drained, or the image shows
/// a partially rendered frame.
pub fn save_screenshot(blitter: &Blitter, path: &Path) -> Result<(), Box<dyn Error>> {
    let width = blitter.framebuffer_width() as u32;
    let height = blitter.framebuffer_height() as u32;

    let file = fs::File::create(path)?;
    let writer = BufWriter::new(file);
    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;

    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for &pixel in blitter.framebuffer() {
        rgba.extend_from_slice(&to_rgba8(pixel));
    }

    writer.write_image_data(&rgba)?;
    Ok(())
}
