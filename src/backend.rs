//! The glyph capabilities the layout engine and compositor are written against.
//!
//! Layout only ever needs to know how wide a line is and how tall a line naturally
//! is ([TextMeasurer]); compositing only needs to put a line of text on a canvas
//! ([TextPainter]). The concrete implementations live in [crate::bitmap] (simple
//! mode) and [crate::font] (smart mode); tests substitute their own.

use crate::bitmap::BuiltinFont;
use crate::config::RenderMode;
use crate::font::{Font, OutlineFont};
use image::{Pixel, Rgba, RgbaImage};

/// Reports text metrics for the active rendering mode
pub trait TextMeasurer {
    /// The pixel width of a candidate line
    fn measure_width(&self, text: &str) -> u32;

    /// The natural height of a line, before any line spacing is applied
    fn line_metric(&self) -> u32;
}

/// Draws a single line of text onto a canvas
pub trait TextPainter {
    /// Draw `text` anchored at `(x, y)`. What the anchor means (top-left corner or
    /// baseline origin) is up to the implementation; the layout engine accounts for it
    /// through [RenderMode::baseline_offset].
    fn draw_text(&self, canvas: &mut RgbaImage, x: i32, y: i32, colour: Rgba<u8>, text: &str);
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure_width(&self, text: &str) -> u32 {
        (**self).measure_width(text)
    }

    fn line_metric(&self) -> u32 {
        (**self).line_metric()
    }
}

impl<T: TextPainter + ?Sized> TextPainter for &T {
    fn draw_text(&self, canvas: &mut RgbaImage, x: i32, y: i32, colour: Rgba<u8>, text: &str) {
        (**self).draw_text(canvas, x, y, colour, text)
    }
}

/// The backend a [RenderMode] resolves to for the duration of a single render
pub enum TextBackend {
    Bitmap(BuiltinFont),
    Outline(OutlineFont),
    /// Smart mode whose font file could not be loaded: every line measures zero
    /// pixels wide and nothing is drawn
    MissingFont { size: u32 },
}

impl TextBackend {
    /// Resolve the rendering mode, loading the font file in smart mode. The font is
    /// owned by the returned backend and released with it.
    pub fn resolve(mode: &RenderMode) -> TextBackend {
        match mode {
            RenderMode::Simple(font) => TextBackend::Bitmap(*font),
            RenderMode::Smart(smart) => match Font::from_path(&smart.path) {
                Ok(font) => TextBackend::Outline(OutlineFont::new(font, smart.size, smart.angle)),
                Err(e) => {
                    log::warn!(
                        "can't load font {}: {e}; text will not be drawn",
                        smart.path.display()
                    );
                    TextBackend::MissingFont { size: smart.size }
                }
            },
        }
    }
}

impl TextMeasurer for TextBackend {
    fn measure_width(&self, text: &str) -> u32 {
        match self {
            TextBackend::Bitmap(font) => font.measure_width(text),
            TextBackend::Outline(font) => font.measure_width(text),
            TextBackend::MissingFont { .. } => 0,
        }
    }

    fn line_metric(&self) -> u32 {
        match self {
            TextBackend::Bitmap(font) => font.line_metric(),
            TextBackend::Outline(font) => font.line_metric(),
            TextBackend::MissingFont { size } => *size,
        }
    }
}

impl TextPainter for TextBackend {
    fn draw_text(&self, canvas: &mut RgbaImage, x: i32, y: i32, colour: Rgba<u8>, text: &str) {
        match self {
            TextBackend::Bitmap(font) => font.draw_text(canvas, x, y, colour, text),
            TextBackend::Outline(font) => font.draw_text(canvas, x, y, colour, text),
            TextBackend::MissingFont { .. } => {}
        }
    }
}

/// Alpha-blend `colour` onto the canvas at `(x, y)`, scaling its alpha by `coverage`
/// (0.0 to 1.0). Pixels outside of the canvas are ignored.
pub(crate) fn blend_pixel(canvas: &mut RgbaImage, x: i32, y: i32, colour: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= canvas.width() || y as u32 >= canvas.height() {
        return;
    }

    let coverage = coverage.clamp(0.0, 1.0);
    if coverage <= 0.0 {
        return;
    }

    let mut src = colour;
    src.0[3] = (colour.0[3] as f32 * coverage).round() as u8;
    canvas.get_pixel_mut(x as u32, y as u32).blend(&src);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SmartFont;

    #[test_log::test]
    fn missing_font_measures_zero_and_draws_nothing() {
        let mode = RenderMode::Smart(SmartFont {
            path: "/definitely/not/a/font.ttf".into(),
            size: 17,
            angle: 0.0,
        });
        let backend = TextBackend::resolve(&mode);
        assert!(matches!(backend, TextBackend::MissingFont { size: 17 }));
        assert_eq!(backend.measure_width("some long line of text"), 0);
        assert_eq!(backend.line_metric(), 17);

        let mut canvas = RgbaImage::new(8, 8);
        backend.draw_text(&mut canvas, 0, 4, Rgba([255, 255, 255, 255]), "x");
        assert!(canvas.pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test_log::test]
    fn simple_mode_resolves_to_the_bitmap_font() {
        let backend = TextBackend::resolve(&RenderMode::Simple(BuiltinFont::Small));
        assert_eq!(backend.measure_width("abc"), 18);
        assert_eq!(backend.line_metric(), 13);
    }

    #[test_log::test]
    fn blending_scales_alpha_by_coverage() {
        let mut canvas = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 255]));
        blend_pixel(&mut canvas, 0, 0, Rgba([255, 255, 255, 255]), 1.0);
        blend_pixel(&mut canvas, 1, 0, Rgba([255, 255, 255, 255]), 0.0);
        blend_pixel(&mut canvas, 5, 5, Rgba([255, 255, 255, 255]), 1.0);
        assert_eq!(canvas.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(canvas.get_pixel(1, 0).0, [0, 0, 0, 255]);
    }
}
