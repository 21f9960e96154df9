//! Renderer and rendering settings
mod layout;

use thiserror::Error;

use crate::font::{Font, Glyph};

pub use layout::{SmushMode, SmushRule, precedence};

/// The main type for rendering
///
/// [`Font::render`] covers the common case; a `Renderer` additionally lets the smush mode be
/// overridden without touching the font:
/// ```
/// # use bannr::font::Font;
/// # use bannr::render::{Renderer, SmushMode};
/// let font = Font::standard();
/// let rendered = Renderer::new(font)
///     .smush_mode(SmushMode::PLAIN)
///     .render("-=")
///     .unwrap();
/// let expected = concat!(
/// r"          ", "\n",
/// r"     #### ", "\n",
/// r"####      ", "\n",
/// r"     #### ", "\n",
/// r"          ", "\n",
/// r"          "
/// );
/// assert_eq!(rendered, expected);
/// ```
#[must_use]
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'font> {
    font: &'font Font,
    mode: SmushMode,
}

impl<'font> Renderer<'font> {
    /// Creates a new renderer using the smush mode of the font.
    pub fn new(font: &'font Font) -> Self {
        Self {
            font,
            mode: font.layout(),
        }
    }

    /// Sets the smush mode.
    pub const fn smush_mode(mut self, mode: SmushMode) -> Self {
        self.mode = mode;
        self
    }

    /// Renders the given string.
    ///
    /// Each `char` is drawn with its glyph, or with the glyph for `' '` if the font has none for
    /// it. Glyphs are merged onto the output one at a time, row by row, with
    /// [`SmushMode::merge`]. The result has exactly `height` rows separated by `'\n'`, without a
    /// trailing newline; rendering an empty string gives `height` empty rows.
    ///
    /// # Errors
    /// [`RenderError::Uninitialized`] if the font has a height of 0.
    pub fn render(&self, text: &str) -> Result<String, RenderError> {
        let height = self.font.height();
        if height == 0 {
            return Err(RenderError::Uninitialized);
        }
        let rows = text
            .chars()
            .map(|c| self.glyph_rows(c))
            .fold(None, |output: Option<Vec<String>>, glyph| {
                Some(match output {
                    None => glyph,
                    Some(output) => self.append(&output, &glyph),
                })
            })
            .unwrap_or_else(|| vec![String::new(); height]);
        Ok(rows.join("\n"))
    }

    fn append(&self, output: &[String], glyph: &[String]) -> Vec<String> {
        output
            .iter()
            .zip(glyph)
            .map(|(left, right)| self.mode.merge(left, right, self.font.hardblank()))
            .collect()
    }

    /// The rows of the glyph for `c`, with hardblanks already turned into blanks.
    fn glyph_rows(&self, c: char) -> Vec<String> {
        let hardblank = char::from(self.font.hardblank());
        let blank;
        let glyph = match self.font.glyph(c).or_else(|| self.font.glyph(' ')) {
            Some(glyph) => glyph,
            None => {
                blank = Glyph::blank(self.font.height(), self.font.max_width());
                &blank
            }
        };
        glyph
            .rows()
            .iter()
            .map(|row| row.replace(hardblank, " "))
            .collect()
    }
}

/// An error while rendering
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// The font has a height of 0, so nothing can be drawn with it.
    #[error("uninitialized font: height is 0")]
    Uninitialized,
}
