//! Text layout for a fixed-width canvas.
//!
//! Layout happens in two passes, each re-derived on every render:
//!
//! - [`wrap`](crate::layout::wrap) breaks the source text into lines that fit the
//!   text column, breaking at whitespace and never inside a word
//! - [`layout`](crate::layout::layout) resolves the line height and canvas height,
//!   then places every line according to the configured alignment
//!
//! Both passes measure text through a [`TextMeasurer`](crate::TextMeasurer), so they
//! work the same with bitmap fonts, outline fonts, or a fake measurer in tests.
//!
//! # Example
//!
//! ```
//! use text_image::{BuiltinFont, RenderConfig};
//! use text_image::layout::{layout, wrap};
//!
//! let config = RenderConfig::builder()
//!     .width(240)
//!     .padding(20)
//!     .builtin_font(BuiltinFont::Large)
//!     .build()
//!     .expect("valid config");
//! let font = BuiltinFont::Large;
//!
//! let lines = wrap("the quick brown fox jumps over the lazy dog", &font, config.pseudo_width());
//! assert_eq!(lines, vec!["the quick brown fox jumps", "over the lazy dog"]);
//!
//! let placed = layout(&lines, &font, &config);
//! assert_eq!(placed.height, 2 * 24 + 2 * 20);
//! ```

mod place;
mod wrap;

pub use place::*;
pub use wrap::*;
