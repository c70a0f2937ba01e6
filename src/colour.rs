use crate::TextImageError;
use image::Rgba;

/// The most transparent value of the backend alpha scale
pub const ALPHA_TRANSPARENT: u8 = 127;

/// The backend alpha value of a fully opaque colour
pub const ALPHA_OPAQUE: u8 = 0;

/// A colour as handed to the renderer, before normalization
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ColourSpec {
    /// Red, green, blue and backend alpha channels, used as-is
    Channels { r: u8, g: u8, b: u8, alpha: u8 },
    /// A `#rgb`, `#rrggbb` or `#rrggbbaa` hex string. The leading `#` is optional
    Hex(String),
}

/// A normalized colour. Red, green and blue range from 0 to 255; `alpha` uses the
/// rasterization backend's scale where 0 is fully opaque and [ALPHA_TRANSPARENT]
/// is fully transparent.
///
/// Use [Colour::to_rgba] to obtain ordinary 8-bit RGBA where 255 is opaque.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: u8,
}

impl Colour {
    /// Create a new, fully opaque colour
    pub fn new_rgb(r: u8, g: u8, b: u8) -> Colour {
        Colour {
            r,
            g,
            b,
            alpha: ALPHA_OPAQUE,
        }
    }

    /// Create a new colour with a backend alpha value, which is clamped to [ALPHA_TRANSPARENT]
    pub fn new_rgba(r: u8, g: u8, b: u8, alpha: u8) -> Colour {
        Colour {
            r,
            g,
            b,
            alpha: alpha.min(ALPHA_TRANSPARENT),
        }
    }

    /// Convert an ordinary 8-bit alpha (0 transparent, 255 opaque) into the backend
    /// scale (0 opaque, 127 transparent): `127 - (a / 255) * 127`, truncated
    pub fn alpha_from_rgba8(a: u8) -> u8 {
        let scale = ALPHA_TRANSPARENT as f32;
        (scale - (a as f32 / 255.0) * scale) as u8
    }

    /// The inverse of [Colour::alpha_from_rgba8]
    pub fn alpha_to_rgba8(alpha: u8) -> u8 {
        let alpha = alpha.min(ALPHA_TRANSPARENT) as f32;
        let scale = ALPHA_TRANSPARENT as f32;
        (255.0 - (alpha / scale) * 255.0).round() as u8
    }

    /// Whether the colour is completely opaque
    pub fn is_opaque(&self) -> bool {
        self.alpha == ALPHA_OPAQUE
    }

    /// Convert to 8-bit RGBA for drawing, where an alpha of 255 is opaque
    pub fn to_rgba(&self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, Colour::alpha_to_rgba8(self.alpha)])
    }
}

/// Parse a hex colour of 3, 6 or 8 digits. Every `#` in the string is ignored, so
/// `#fff`, `fff` and `##f#ff` are all white.
///
/// The 8-digit form carries a trailing alpha pair where `00` is transparent and
/// `ff` is opaque; it is inverted into the backend scale.
pub fn parse_hex(hex: &str) -> Result<Colour, TextImageError> {
    let digits: String = hex.chars().filter(|&c| c != '#').collect();
    let invalid = || TextImageError::InvalidColour(hex.to_string());

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    // every digit is ascii past this point, so byte slicing is safe
    let pair = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
    let doubled = |i: usize| {
        let digit = &digits[i..i + 1];
        u8::from_str_radix(&format!("{digit}{digit}"), 16).map_err(|_| invalid())
    };

    match digits.len() {
        3 => Ok(Colour::new_rgb(doubled(0)?, doubled(1)?, doubled(2)?)),
        6 => Ok(Colour::new_rgb(pair(0)?, pair(2)?, pair(4)?)),
        8 => Ok(Colour {
            r: pair(0)?,
            g: pair(2)?,
            b: pair(4)?,
            alpha: Colour::alpha_from_rgba8(pair(6)?),
        }),
        _ => Err(invalid()),
    }
}

/// Normalize a colour specification. Structured channels pass through untouched;
/// malformed hex strings fall back to opaque black.
pub fn normalize(spec: &ColourSpec) -> Colour {
    match spec {
        ColourSpec::Channels { r, g, b, alpha } => Colour::new_rgba(*r, *g, *b, *alpha),
        ColourSpec::Hex(hex) => parse_hex(hex).unwrap_or_else(|e| {
            log::warn!("{e}, falling back to black");
            Colour::default()
        }),
    }
}

impl From<Colour> for ColourSpec {
    fn from(c: Colour) -> Self {
        ColourSpec::Channels {
            r: c.r,
            g: c.g,
            b: c.b,
            alpha: c.alpha,
        }
    }
}

impl From<&str> for ColourSpec {
    fn from(hex: &str) -> Self {
        ColourSpec::Hex(hex.to_string())
    }
}

impl From<String> for ColourSpec {
    fn from(hex: String) -> Self {
        ColourSpec::Hex(hex)
    }
}

impl From<(u8, u8, u8)> for ColourSpec {
    fn from(c: (u8, u8, u8)) -> Self {
        Colour::new_rgb(c.0, c.1, c.2).into()
    }
}

impl From<[u8; 3]> for ColourSpec {
    fn from(c: [u8; 3]) -> Self {
        let [r, g, b] = c;
        Colour::new_rgb(r, g, b).into()
    }
}

impl From<(u8, u8, u8, u8)> for ColourSpec {
    fn from(c: (u8, u8, u8, u8)) -> Self {
        Colour::new_rgba(c.0, c.1, c.2, c.3).into()
    }
}

impl From<[u8; 4]> for ColourSpec {
    fn from(c: [u8; 4]) -> Self {
        let [r, g, b, alpha] = c;
        Colour::new_rgba(r, g, b, alpha).into()
    }
}

/// A list of pre-defined colour constants
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour {
        r: 0,
        g: 0,
        b: 0,
        alpha: ALPHA_OPAQUE,
    };
    pub const WHITE: Colour = Colour {
        r: 255,
        g: 255,
        b: 255,
        alpha: ALPHA_OPAQUE,
    };
    pub const CHARCOAL: Colour = Colour {
        r: 20,
        g: 20,
        b: 20,
        alpha: ALPHA_OPAQUE,
    };
    pub const TRANSPARENT: Colour = Colour {
        r: 0,
        g: 0,
        b: 0,
        alpha: ALPHA_TRANSPARENT,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn six_digit_hex_is_opaque() {
        let c = normalize(&"#1a2B3c".into());
        assert_eq!(c, Colour::new_rgb(0x1a, 0x2b, 0x3c));
        assert!(c.is_opaque());
    }

    #[test_log::test]
    fn three_digit_hex_doubles_each_digit() {
        assert_eq!(normalize(&"#f80".into()), Colour::new_rgb(0xff, 0x88, 0x00));
        assert_eq!(normalize(&"abc".into()), Colour::new_rgb(0xaa, 0xbb, 0xcc));
    }

    #[test_log::test]
    fn every_hash_is_ignored() {
        assert_eq!(parse_hex("##f#ff").ok(), Some(colours::WHITE));
        assert_eq!(parse_hex("ffffff#").ok(), Some(colours::WHITE));
    }

    #[test_log::test]
    fn eight_digit_alpha_is_inverted() {
        assert_eq!(normalize(&"#ffffffff".into()).alpha, ALPHA_OPAQUE);
        assert_eq!(normalize(&"#ffffff00".into()).alpha, ALPHA_TRANSPARENT);

        let half = normalize(&"#00000080".into());
        assert_eq!((half.r, half.g, half.b), (0, 0, 0));
        assert_eq!(half.alpha, 63);
    }

    #[test_log::test]
    fn malformed_hex_falls_back_to_opaque_black() {
        for bad in ["", "#", "#12345", "#1234567", "#ggg", "#123456789"] {
            assert!(parse_hex(bad).is_err(), "{bad} should not parse");
            assert_eq!(normalize(&bad.into()), Colour::default());
        }
        assert_eq!(Colour::default(), colours::BLACK);
    }

    #[test_log::test]
    fn channels_pass_through() {
        let spec: ColourSpec = [20, 20, 20, 0].into();
        assert_eq!(normalize(&spec), colours::CHARCOAL);

        let spec: ColourSpec = (1, 2, 3).into();
        assert_eq!(normalize(&spec), Colour::new_rgb(1, 2, 3));
    }

    #[test_log::test]
    fn backend_alpha_maps_onto_rgba8() {
        assert_eq!(colours::WHITE.to_rgba(), Rgba([255, 255, 255, 255]));
        assert_eq!(colours::TRANSPARENT.to_rgba().0[3], 0);
        assert_eq!(Colour::alpha_to_rgba8(200), 0);
    }
}
