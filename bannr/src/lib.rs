//! A crate for parsing FIGlet-style `.flf` fonts and rendering text as block-letter banners.
//!
//! # Features
//!
//! - Parsing of `.flf` documents for the 95 printable ASCII characters
//!   ([`parse_font`](crate::parse_font))
//! - Horizontal kerning and rule-based smushing ([`SmushRule`](crate::render::SmushRule))
//! - A built-in font, parsed once on first use ([`Font::standard`](crate::font::Font::standard))
//!
//! # Example
//!
//! ```
//! let rendered = bannr::render_default("Hi!").unwrap();
//! let expected = concat!(
//! r"#   # # # ", "\n",
//! r"#   #   # ", "\n",
//! r"##### # # ", "\n",
//! r"#   # #   ", "\n",
//! r"#   # # # ", "\n",
//! r"          "
//! );
//! assert_eq!(rendered, expected);
//! ```
//!
//! Fonts can also be loaded from any `.flf` document:
//!
//! ```
//! let mut document = String::from("flf2a$ 1 1 2 33 0\n");
//! for c in ' '..='~' {
//!     document.push(c);
//!     document.push_str("@\n");
//! }
//! let font = bannr::parse_font(document).unwrap();
//! assert_eq!(font.render("abba").unwrap(), "aba");
//! ```

pub mod font;
pub mod render;

use crate::font::{Font, FormatError};
use crate::render::RenderError;

/// Decodes a font from the contents of an `.flf` document; see [`Font::from_bytes`].
///
/// # Errors
/// Returns `Err` if the document is empty or its header is invalid; see [`FormatError`].
pub fn parse_font(bytes: impl AsRef<[u8]>) -> Result<Font, FormatError> {
    Font::from_bytes(bytes)
}

/// Renders a string with the built-in font ([`Font::standard`]).
///
/// # Errors
/// Never fails in practice, since the built-in font has a non-zero height; the signature matches
/// [`Font::render`].
pub fn render_default(text: &str) -> Result<String, RenderError> {
    Font::standard().render(text)
}
