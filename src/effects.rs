use image::{imageops, DynamicImage, RgbaImage};

/// A filter run over the finished canvas, after the text has been drawn
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Effect {
    /// Convert to shades of grey, keeping transparency
    Grayscale,
    /// Add a value from -255 (black) to 255 (white) to every colour channel
    Brightness(i32),
}

impl Effect {
    pub fn apply(&self, canvas: RgbaImage) -> RgbaImage {
        match *self {
            Effect::Grayscale => DynamicImage::ImageRgba8(canvas).grayscale().into_rgba8(),
            Effect::Brightness(level) => imageops::brighten(&canvas, level.clamp(-255, 255)),
        }
    }
}

/// Run every effect over the canvas in order
pub fn apply_all(canvas: RgbaImage, effects: &[Effect]) -> RgbaImage {
    effects
        .iter()
        .fold(canvas, |canvas, effect| effect.apply(canvas))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test_log::test]
    fn grayscale_equalizes_channels() {
        let canvas = RgbaImage::from_pixel(2, 2, Rgba([200, 40, 90, 255]));
        let canvas = Effect::Grayscale.apply(canvas);
        for p in canvas.pixels() {
            let [r, g, b, a] = p.0;
            assert_eq!(r, g);
            assert_eq!(g, b);
            assert_eq!(a, 255);
        }
    }

    #[test_log::test]
    fn brightness_saturates() {
        let canvas = RgbaImage::from_pixel(1, 1, Rgba([100, 200, 250, 255]));
        let canvas = Effect::Brightness(100).apply(canvas);
        assert_eq!(canvas.get_pixel(0, 0).0, [200, 255, 255, 255]);

        let canvas = Effect::Brightness(-1000).apply(canvas);
        assert_eq!(canvas.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test_log::test]
    fn effects_run_in_order() {
        let canvas = RgbaImage::from_pixel(1, 1, Rgba([10, 10, 10, 255]));
        let canvas = apply_all(canvas, &[Effect::Brightness(50), Effect::Brightness(-20)]);
        assert_eq!(canvas.get_pixel(0, 0).0, [40, 40, 40, 255]);
        assert_eq!(apply_all(canvas.clone(), &[]), canvas);
    }
}
