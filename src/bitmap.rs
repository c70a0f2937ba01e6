use crate::backend::{blend_pixel, TextMeasurer, TextPainter};
use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{Rgba, RgbaImage};

/// The built-in fixed-width bitmap fonts used in simple mode. Each font has a fixed
/// glyph cell; glyphs are drawn from an 8x8 bitmap set scaled into that cell.
///
/// Fonts are numbered 1 through 5 from smallest to largest, see [BuiltinFont::from_index].
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum BuiltinFont {
    /// 5x8 pixel cells
    Tiny,
    /// 6x13 pixel cells
    Small,
    /// 7x13 pixel cells
    MediumBold,
    /// 8x16 pixel cells
    Large,
    /// 9x15 pixel cells
    #[default]
    Giant,
}

impl BuiltinFont {
    /// Look a font up by its 1-based index. Out of range indices are clamped.
    pub fn from_index(index: i32) -> BuiltinFont {
        match index {
            i32::MIN..=1 => BuiltinFont::Tiny,
            2 => BuiltinFont::Small,
            3 => BuiltinFont::MediumBold,
            4 => BuiltinFont::Large,
            _ => BuiltinFont::Giant,
        }
    }

    /// Width of every glyph cell, in pixels
    pub fn glyph_width(&self) -> u32 {
        match self {
            BuiltinFont::Tiny => 5,
            BuiltinFont::Small => 6,
            BuiltinFont::MediumBold => 7,
            BuiltinFont::Large => 8,
            BuiltinFont::Giant => 9,
        }
    }

    /// Height of every glyph cell, in pixels
    pub fn glyph_height(&self) -> u32 {
        match self {
            BuiltinFont::Tiny => 8,
            BuiltinFont::Small | BuiltinFont::MediumBold => 13,
            BuiltinFont::Large => 16,
            BuiltinFont::Giant => 15,
        }
    }

    fn glyph(ch: char) -> [u8; 8] {
        BASIC_FONTS
            .get(ch)
            .or_else(|| LATIN_FONTS.get(ch))
            .or_else(|| BASIC_FONTS.get('?'))
            .unwrap_or_default()
    }
}

impl TextMeasurer for BuiltinFont {
    fn measure_width(&self, text: &str) -> u32 {
        text.chars().count() as u32 * self.glyph_width()
    }

    fn line_metric(&self) -> u32 {
        self.glyph_height()
    }
}

impl TextPainter for BuiltinFont {
    /// Draws with `(x, y)` as the top-left corner of the first glyph cell
    fn draw_text(&self, canvas: &mut RgbaImage, x: i32, y: i32, colour: Rgba<u8>, text: &str) {
        let (w, h) = (self.glyph_width(), self.glyph_height());

        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }

            let rows = BuiltinFont::glyph(ch);
            let cell_x = x + (i as u32 * w) as i32;

            // nearest-neighbour scale the 8x8 glyph into the cell
            for cy in 0..h {
                let row = rows[(cy * 8 / h) as usize];
                for cx in 0..w {
                    let bit = cx * 8 / w;
                    if row & (1 << bit) != 0 {
                        blend_pixel(canvas, cell_x + cx as i32, y + cy as i32, colour, 1.0);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn indices_clamp_to_known_fonts() {
        assert_eq!(BuiltinFont::from_index(-3), BuiltinFont::Tiny);
        assert_eq!(BuiltinFont::from_index(1), BuiltinFont::Tiny);
        assert_eq!(BuiltinFont::from_index(3), BuiltinFont::MediumBold);
        assert_eq!(BuiltinFont::from_index(5), BuiltinFont::Giant);
        assert_eq!(BuiltinFont::from_index(42), BuiltinFont::Giant);
    }

    #[test_log::test]
    fn width_is_character_count_times_cell_width() {
        let font = BuiltinFont::Large;
        assert_eq!(font.measure_width(""), 0);
        assert_eq!(font.measure_width("hello"), 40);
        // characters, not bytes
        assert_eq!(font.measure_width("héllo"), 40);
        assert_eq!(font.line_metric(), 16);
    }

    #[test_log::test]
    fn draws_inside_the_glyph_cells() {
        let font = BuiltinFont::Large;
        let mut canvas = RgbaImage::new(40, 20);
        font.draw_text(&mut canvas, 8, 2, Rgba([255, 0, 0, 255]), "H");

        let inked: Vec<(u32, u32)> = canvas
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[3] > 0)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!inked.is_empty());
        assert!(inked
            .iter()
            .all(|&(x, y)| (8..16).contains(&x) && (2..18).contains(&y)));
    }

    #[test_log::test]
    fn clips_at_the_canvas_edge() {
        let mut canvas = RgbaImage::new(4, 4);
        BuiltinFont::Giant.draw_text(&mut canvas, -3, -3, Rgba([0, 0, 0, 255]), "WW");
    }
}
