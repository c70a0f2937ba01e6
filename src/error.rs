use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum TextImageError {
    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FontParsing(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// [image] failed to decode or encode an image
    Image(#[from] image::ImageError),

    #[error("padding of {padding}px leaves no room for text on a {width}px wide canvas")]
    /// The canvas is too narrow for its padding, `width - 2 * padding` must be positive
    InvalidGeometry { width: u32, padding: u32 },

    #[error("`{0}` is not a #rgb, #rrggbb or #rrggbbaa colour")]
    /// A hex colour could not be parsed
    InvalidColour(String),

    #[error("`{0}` is not a supported output format")]
    /// The requested output format is not one of png, jpg, gif or wbmp
    UnsupportedFormat(String),

    #[error("`{0}` is not a known alignment")]
    /// A horizontal or vertical alignment name could not be parsed
    InvalidAlignment(String),

    #[error("nothing to render: the canvas would be 0 pixels tall")]
    /// No text and no padding, so there is no canvas to encode
    EmptyCanvas,
}
