use crate::TextImageError;
use derive_more::{Display, From, Into};
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{self, PngEncoder};
use image::{ColorType, DynamicImage, Frame, ImageEncoder, RgbaImage};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

/// The image formats a canvas can be encoded to
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Display)]
pub enum OutputFormat {
    #[default]
    #[display("png")]
    Png,
    #[display("jpg")]
    Jpeg,
    #[display("gif")]
    Gif,
    #[display("wbmp")]
    Wbmp,
}

impl FromStr for OutputFormat {
    type Err = TextImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "gif" => Ok(OutputFormat::Gif),
            "wbmp" => Ok(OutputFormat::Wbmp),
            _ => Err(TextImageError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl OutputFormat {
    /// Parse a format name, falling back to PNG for anything unrecognized
    pub fn from_name_or_default(name: &str) -> OutputFormat {
        name.parse().unwrap_or_else(|e| {
            log::warn!("{e}, writing png instead");
            OutputFormat::Png
        })
    }

    /// Pick a format from a file's extension, falling back to PNG
    pub fn from_path<P: AsRef<Path>>(path: P) -> OutputFormat {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(OutputFormat::from_name_or_default)
            .unwrap_or_default()
    }

    /// The MIME type of the encoded output
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Gif => "image/gif",
            OutputFormat::Wbmp => "image/vnd.wap.wbmp",
        }
    }
}

/// Output quality from 0 to 100; larger values are clamped to 100. JPEG uses it as its
/// compression quality, PNG converts it into a compression level (see
/// [Quality::png_compression_level]) and GIF and WBMP ignore it.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Display, From, Into)]
pub struct Quality(pub u8);

impl Default for Quality {
    fn default() -> Self {
        Quality(90)
    }
}

impl Quality {
    pub fn value(&self) -> u8 {
        self.0.min(100)
    }

    /// Map quality onto a 0 (none) to 9 (maximum) zlib-style compression level:
    /// `9 - round(quality / 100 * 9)`
    pub fn png_compression_level(&self) -> u8 {
        9 - ((self.value() as f32 / 100.0) * 9.0).round() as u8
    }

    fn png_compression(&self) -> png::CompressionType {
        match self.png_compression_level() {
            0..=2 => png::CompressionType::Fast,
            3..=6 => png::CompressionType::Default,
            _ => png::CompressionType::Best,
        }
    }
}

/// Encode a canvas in the given format, writing it to `w`
pub fn encode<W: Write>(
    canvas: &RgbaImage,
    format: OutputFormat,
    quality: Quality,
    mut w: W,
) -> Result<(), TextImageError> {
    log::debug!(
        "encoding {}x{} canvas as {format} (quality {quality})",
        canvas.width(),
        canvas.height()
    );

    match format {
        OutputFormat::Png => {
            let encoder = PngEncoder::new_with_quality(
                &mut w,
                quality.png_compression(),
                png::FilterType::Adaptive,
            );
            encoder.write_image(
                canvas.as_raw(),
                canvas.width(),
                canvas.height(),
                ColorType::Rgba8,
            )?;
        }
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgba8(canvas.clone()).into_rgb8();
            let mut encoder = JpegEncoder::new_with_quality(&mut w, quality.value().max(1));
            encoder.encode_image(&rgb)?;
        }
        OutputFormat::Gif => {
            let mut encoder = GifEncoder::new(&mut w);
            encoder.encode_frame(Frame::new(canvas.clone()))?;
        }
        OutputFormat::Wbmp => write_wbmp(canvas, &mut w)?,
    }

    w.flush()?;
    Ok(())
}

/// Encode a canvas into an in-memory buffer
pub fn encode_to_vec(
    canvas: &RgbaImage,
    format: OutputFormat,
    quality: Quality,
) -> Result<Vec<u8>, TextImageError> {
    let mut bytes = Vec::new();
    encode(canvas, format, quality, &mut bytes)?;
    Ok(bytes)
}

/// Write a WBMP multi-byte integer: 7 bits per byte, most significant group first,
/// with the high bit set on every byte but the last
fn write_multibyte<W: Write>(w: &mut W, mut value: u32) -> std::io::Result<()> {
    let mut groups = vec![(value & 0x7f) as u8];
    value >>= 7;
    while value > 0 {
        groups.push((value & 0x7f) as u8 | 0x80);
        value >>= 7;
    }
    groups.reverse();
    w.write_all(&groups)
}

/// Write a level 0 (uncompressed, monochrome) WBMP image. Pixels whose luminance,
/// after compositing over white, falls below half are black; all others are white.
pub fn write_wbmp<W: Write>(canvas: &RgbaImage, w: &mut W) -> std::io::Result<()> {
    // type 0, no extension headers
    w.write_all(&[0, 0])?;
    write_multibyte(w, canvas.width())?;
    write_multibyte(w, canvas.height())?;

    let row_bytes = (canvas.width() as usize).div_ceil(8);
    let mut row = vec![0u8; row_bytes];
    for y in 0..canvas.height() {
        row.iter_mut().for_each(|b| *b = 0);
        for x in 0..canvas.width() {
            let [r, g, b, a] = canvas.get_pixel(x, y).0;
            let alpha = a as f32 / 255.0;
            let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
            let luma = luma * alpha + 255.0 * (1.0 - alpha);
            if luma >= 128.0 {
                // white bits are set
                row[x as usize / 8] |= 0x80 >> (x % 8);
            }
        }
        w.write_all(&row)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test_log::test]
    fn png_compression_level_inverts_quality() {
        assert_eq!(Quality(95).png_compression_level(), 0);
        assert_eq!(Quality(100).png_compression_level(), 0);
        assert_eq!(Quality(90).png_compression_level(), 1);
        assert_eq!(Quality(50).png_compression_level(), 4);
        assert_eq!(Quality(0).png_compression_level(), 9);
        assert_eq!(Quality(250).png_compression_level(), 0);
        assert_eq!(Quality(0).png_compression(), png::CompressionType::Best);
    }

    #[test_log::test]
    fn quality_is_clamped() {
        assert_eq!(Quality(150).value(), 100);
        assert_eq!(Quality::default().value(), 90);
        assert_eq!(u8::from(Quality(42)), 42);
    }

    #[test_log::test]
    fn format_names() {
        assert_eq!("PNG".parse::<OutputFormat>().ok(), Some(OutputFormat::Png));
        assert_eq!("jpeg".parse::<OutputFormat>().ok(), Some(OutputFormat::Jpeg));
        assert_eq!("jpg".parse::<OutputFormat>().ok(), Some(OutputFormat::Jpeg));
        assert!(matches!(
            "tiff".parse::<OutputFormat>(),
            Err(TextImageError::UnsupportedFormat(_))
        ));
        assert_eq!(OutputFormat::from_name_or_default("tiff"), OutputFormat::Png);
        assert_eq!(OutputFormat::from_path("out/banner.GIF"), OutputFormat::Gif);
        assert_eq!(OutputFormat::from_path("banner"), OutputFormat::Png);
        assert_eq!(OutputFormat::Jpeg.to_string(), "jpg");
    }

    #[test_log::test]
    fn multibyte_integers() {
        let mut bytes = Vec::new();
        write_multibyte(&mut bytes, 0).expect("in memory");
        write_multibyte(&mut bytes, 127).expect("in memory");
        write_multibyte(&mut bytes, 128).expect("in memory");
        write_multibyte(&mut bytes, 720).expect("in memory");
        assert_eq!(bytes, vec![0x00, 0x7f, 0x81, 0x00, 0x85, 0x50]);
    }

    #[test_log::test]
    fn wbmp_packs_rows_msb_first() {
        let mut canvas = RgbaImage::from_pixel(10, 2, Rgba([0, 0, 0, 255]));
        canvas.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
        canvas.put_pixel(9, 1, Rgba([255, 255, 255, 255]));
        // fully transparent reads as white
        canvas.put_pixel(1, 0, Rgba([0, 0, 0, 0]));

        let bytes = encode_to_vec(&canvas, OutputFormat::Wbmp, Quality::default())
            .expect("in memory");
        assert_eq!(bytes, vec![0, 0, 10, 2, 0b1100_0000, 0, 0, 0b0100_0000]);
    }

    #[test_log::test]
    fn raster_formats_decode_again() {
        let canvas = RgbaImage::from_pixel(16, 9, Rgba([200, 10, 10, 255]));
        for (format, expected) in [
            (OutputFormat::Png, image::ImageFormat::Png),
            (OutputFormat::Jpeg, image::ImageFormat::Jpeg),
            (OutputFormat::Gif, image::ImageFormat::Gif),
        ] {
            let bytes = encode_to_vec(&canvas, format, Quality(80)).expect("encodes");
            assert_eq!(image::guess_format(&bytes).expect("known format"), expected);
            let decoded = image::load_from_memory(&bytes).expect("decodes");
            assert_eq!((decoded.width(), decoded.height()), (16, 9));
        }
    }
}
