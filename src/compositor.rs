use crate::backend::TextPainter;
use crate::colour::{self, Colour};
use crate::config::{Background, RenderConfig};
use crate::layout::LayoutResult;
use crate::TextImageError;
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use std::path::Path;

/// Read a background image from disk. Only PNG, JPEG and GIF files are accepted.
pub fn load_background<P: AsRef<Path>>(path: P) -> Result<RgbaImage, TextImageError> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;

    let format = image::guess_format(&data)?;
    match format {
        ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Gif => {}
        other => {
            return Err(TextImageError::UnsupportedFormat(format!(
                "{} ({other:?})",
                path.display()
            )))
        }
    }

    Ok(image::load_from_memory_with_format(&data, format)?.into_rgba8())
}

/// Fill the whole canvas with the configured background. Images are stretched to
/// exactly cover the canvas; aspect ratio is not preserved. Without a usable image
/// the canvas is filled with the background colour.
pub fn paint_background(canvas: &mut RgbaImage, background: &Background) {
    if let Some(path) = &background.image {
        match load_background(path) {
            Ok(image) => {
                let scaled =
                    imageops::resize(&image, canvas.width(), canvas.height(), FilterType::Triangle);
                imageops::replace(canvas, &scaled, 0, 0);
                return;
            }
            Err(e) => log::warn!(
                "can't use background image {}: {e}; filling with the background colour",
                path.display()
            ),
        }
    }

    fill(canvas, colour::normalize(&background.colour));
}

fn fill(canvas: &mut RgbaImage, colour: Colour) {
    let rgba: Rgba<u8> = colour.to_rgba();
    for pixel in canvas.pixels_mut() {
        *pixel = rgba;
    }
}

/// Build the canvas for a layout: background first, then every line in reading order
pub fn composite<P: TextPainter + ?Sized>(
    config: &RenderConfig,
    layout: &LayoutResult,
    painter: &P,
) -> RgbaImage {
    let mut canvas = RgbaImage::new(config.width(), layout.height);
    paint_background(&mut canvas, config.background());

    let text_colour = colour::normalize(config.text_colour()).to_rgba();
    for line in layout.lines.iter() {
        painter.draw_text(&mut canvas, line.x, line.y, text_colour, &line.text);
    }

    canvas
}
