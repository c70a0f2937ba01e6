//! Word-wrap text onto a fixed-width canvas over a solid colour or a background image,
//! then encode the result as PNG, JPEG, GIF or WBMP.
//!
//! ```no_run
//! use text_image::{Align, Quality, RenderConfig, TextImage, VAlign};
//!
//! let config = RenderConfig::builder()
//!     .width(800)
//!     .padding(50)
//!     .background_colour("#1e1e2e")
//!     .text_colour("#cdd6f4")
//!     .font_path("assets/Vetrino.ttf")
//!     .font_size(24)
//!     .alignment(Align::Center, VAlign::Middle)
//!     .build()?;
//!
//! TextImage::new(config).save("Hello there", "quote.png", None, Quality::default())?;
//! # Ok::<(), text_image::TextImageError>(())
//! ```

mod backend;
pub use backend::*;

mod bitmap;
pub use bitmap::*;

mod colour;
pub use colour::*;

pub mod compositor;

mod config;
pub use config::*;

mod effects;
pub use effects::*;

mod encode;
pub use encode::*;

mod font;
pub use font::*;

/// Line breaking and placement of text on the canvas
pub mod layout;

mod render;
pub use render::*;

mod error;
pub use error::*;

/// Re-export the image crate, mostly for working with rendered [image::RgbaImage]s
pub use image;
