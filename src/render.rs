use crate::backend::{TextBackend, TextMeasurer, TextPainter};
use crate::compositor::composite;
use crate::config::RenderConfig;
use crate::effects;
use crate::encode::{encode, OutputFormat, Quality};
use crate::layout::{layout, wrap};
use crate::TextImageError;
use image::RgbaImage;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Renders text onto images according to a [RenderConfig].
///
/// Every render starts from scratch: text is wrapped, laid out and composited anew,
/// and any font or background image is loaded for that render alone. A `TextImage`
/// holds no state besides its configuration, so one can be shared freely.
#[derive(Clone, Debug, Default)]
pub struct TextImage {
    config: RenderConfig,
}

impl TextImage {
    pub fn new(config: RenderConfig) -> TextImage {
        TextImage { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render text with the backend selected by the configured [crate::RenderMode]
    pub fn render(&self, text: &str) -> Result<RgbaImage, TextImageError> {
        let backend = TextBackend::resolve(self.config.mode());
        self.render_with(text, &backend)
    }

    /// Render text, measuring and drawing it with the given backend
    pub fn render_with<B>(&self, text: &str, backend: &B) -> Result<RgbaImage, TextImageError>
    where
        B: TextMeasurer + TextPainter + ?Sized,
    {
        let lines = wrap(text, backend, self.config.pseudo_width());
        let layout = layout(&lines, backend, &self.config);
        if layout.height == 0 {
            return Err(TextImageError::EmptyCanvas);
        }

        let canvas = composite(&self.config, &layout, backend);
        Ok(effects::apply_all(canvas, self.config.effects()))
    }

    /// Render text and encode it to `w`. Nothing is written if rendering fails.
    pub fn write<W: Write>(
        &self,
        text: &str,
        w: W,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<(), TextImageError> {
        let canvas = self.render(text)?;
        encode(&canvas, format, quality, w)
    }

    /// Render text and encode it into an in-memory buffer
    pub fn to_bytes(
        &self,
        text: &str,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, TextImageError> {
        let mut bytes = Vec::new();
        self.write(text, &mut bytes, format, quality)?;
        Ok(bytes)
    }

    /// Render text and save it to a file. The format is picked from the file
    /// extension when `format` is [None], defaulting to PNG.
    pub fn save<P: AsRef<Path>>(
        &self,
        text: &str,
        path: P,
        format: Option<OutputFormat>,
        quality: Quality,
    ) -> Result<(), TextImageError> {
        let path = path.as_ref();
        let format = format.unwrap_or_else(|| OutputFormat::from_path(path));

        // render before touching the file so a failed render leaves nothing behind
        let canvas = self.render(text)?;
        let out = BufWriter::new(File::create(path)?);
        encode(&canvas, format, quality, out)?;

        log::info!("saved {} as {format}", path.display());
        Ok(())
    }
}
