//! Fonts
//!
//! The font model and the logic for parsing `.flf` documents.

mod header;

use std::collections::HashMap;
use std::iter;
use std::ops::RangeInclusive;
use std::sync::LazyLock;

use bstr::{BString, ByteSlice as _};
use itertools::Itertools as _;
use thiserror::Error;

pub use header::Header;

use crate::render::{RenderError, Renderer, SmushMode};

/// The characters every font provides, in the order their glyphs appear in a document: the 95
/// printable ASCII characters.
pub const CHARACTERS: RangeInclusive<char> = ' '..='~';

static STANDARD: LazyLock<Font> = LazyLock::new(|| {
    let font = Font::from_bytes(Font::STANDARD_BYTES).expect("embedded font should be tested");
    log::debug!(
        "parsed embedded font: height {}, smush mode {}",
        font.height(),
        font.smush_mode()
    );
    font
});

/// A parsed font
///
/// A font is immutable once parsed and can be shared freely between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    header: Header,
    comments: String,
    glyphs: HashMap<char, Glyph>,
}

impl Font {
    pub(crate) const STANDARD_BYTES: &'static [u8] = include_bytes!("../fonts/block.flf");

    /// Decodes the contents of an `.flf` document.
    ///
    /// After the header and the comment lines, the document is read as consecutive blocks of
    /// `height` rows, one block per character of [`CHARACTERS`]. A document that ends early is
    /// padded with empty rows, and anything after the last block (such as code-tagged glyphs) is
    /// ignored. The run of `@` endmarks at the end of each row is removed.
    ///
    /// # Errors
    /// Returns `Err` if the document is empty or its header is invalid; see [`FormatError`].
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Result<Self, FormatError> {
        let mut lines = bytes.as_ref().lines();
        let Some(header_line) = lines.next() else {
            return Err(FormatError::Empty);
        };
        let header = Header::decode(header_line)?;
        let comment_lines = usize::try_from(header.comment_lines).unwrap_or(0);
        let comments =
            String::from_utf8_lossy(&bstr::join("\n", lines.by_ref().take(comment_lines)))
                .into_owned();
        let glyphs = Self::decode_glyphs(lines, header.height, header.hardblank);
        Ok(Self {
            header,
            comments,
            glyphs,
        })
    }

    fn decode_glyphs<'a>(
        lines: impl Iterator<Item = &'a [u8]>,
        height: usize,
        hardblank: u8,
    ) -> HashMap<char, Glyph> {
        let mut rows = lines
            .map(|line| Glyph::decode_row(line, hardblank))
            .chain(iter::repeat_with(String::new));
        CHARACTERS
            .map(|c| {
                let glyph = Glyph {
                    rows: rows.by_ref().take(height).collect(),
                };
                (c, glyph)
            })
            .collect()
    }

    /// The built-in font, a 6-row block letter font.
    ///
    /// It is parsed on first use and shared for the rest of the process; concurrent first callers
    /// wait for the single parse to finish.
    ///
    /// # Panics
    /// If the embedded font does not parse, which would mean the build is broken.
    #[must_use]
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    /// Renders a string with the layout given by the font.
    ///
    /// # Errors
    /// [`RenderError::Uninitialized`] if the font has a height of 0.
    pub fn render(&self, text: &str) -> Result<String, RenderError> {
        Renderer::new(self).render(text)
    }

    /// The decoded header.
    #[must_use]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// The comment lines between the header and the glyphs, joined with newlines. Usually contains
    /// information about the font author.
    #[must_use]
    pub fn comments(&self) -> &str {
        &self.comments
    }

    /// Number of rows in every glyph.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.header.height
    }

    /// Informational baseline from the header.
    #[must_use]
    pub const fn baseline(&self) -> i64 {
        self.header.baseline
    }

    /// Width of the blank glyph used when a glyph is missing entirely.
    #[must_use]
    pub const fn max_width(&self) -> usize {
        self.header.max_width
    }

    /// The hardblank byte.
    #[must_use]
    pub const fn hardblank(&self) -> u8 {
        self.header.hardblank
    }

    /// The raw smush mode bitmask, see [`Header::smush_mode`].
    #[must_use]
    pub fn smush_mode(&self) -> i64 {
        self.header.smush_mode()
    }

    /// The smush mode as a set of rules.
    #[must_use]
    pub fn layout(&self) -> SmushMode {
        SmushMode::from_raw(self.smush_mode())
    }

    /// The glyph for a character, if the font provides one. Every font provides a glyph for each
    /// of [`CHARACTERS`].
    #[must_use]
    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(&c)
    }
}

/// The rows of sub-characters drawing one character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    rows: Vec<String>,
}

impl Glyph {
    pub(crate) fn blank(height: usize, width: usize) -> Self {
        Self {
            rows: vec![" ".repeat(width); height],
        }
    }

    /// A non-ASCII hardblank byte is kept as the `char` of the same value, so it survives the
    /// lossy UTF-8 decoding of the rest of the row.
    fn decode_row(line: &[u8], hardblank: u8) -> String {
        let row = line.trim_end_with(|c| c == '@');
        if hardblank.is_ascii() {
            return String::from_utf8_lossy(row).into_owned();
        }
        row.split(|&b| b == hardblank)
            .map(String::from_utf8_lossy)
            .join(char::from(hardblank).encode_utf8(&mut [0; 4]))
    }

    /// The rows, top to bottom, with endmarks removed. Hardblanks are still present.
    #[must_use]
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// The length of the longest row, in `char`s.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.chars().count())
            .max()
            .unwrap_or(0)
    }
}

/// A structural problem in a font document
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// The document has no header line.
    #[error("empty document")]
    Empty,
    /// The header has fewer than six fields.
    #[error(r#"malformed header: "{0}""#)]
    MalformedHeader(BString),
    /// The signature does not start with `flf2a`, or has no hardblank after it.
    #[error(r#"invalid signature: "{0}""#)]
    InvalidSignature(BString),
    /// One of the mandatory numeric header fields cannot be parsed.
    #[error(r#"invalid {field}: "{value}""#)]
    Field {
        /// The name of the header field
        field: &'static str,
        /// The text found in its place
        value: BString,
    },
}

#[cfg(test)]
mod tests {
    use std::{ptr, thread};

    use super::{CHARACTERS, Font, FormatError};

    fn document(header: &str, rows: &[&str]) -> String {
        let mut document = format!("{header}\n");
        for row in rows {
            document.push_str(row);
            document.push('\n');
        }
        document
    }

    #[test]
    fn parse_standard() {
        let font = Font::from_bytes(Font::STANDARD_BYTES).unwrap();
        assert_eq!(font.hardblank(), b'$');
        assert_eq!(font.height(), 6);
        assert_eq!(font.baseline(), 5);
        assert_eq!(font.max_width(), 8);
        assert_eq!(font.smush_mode(), 64);
        assert_eq!(font.header().old_layout, 0);
        assert!(font.comments().starts_with("block.flf"));
        assert_eq!(font.comments().lines().count(), 3);
        assert_eq!(font.glyphs.len(), 95);
        for c in CHARACTERS {
            let glyph = font.glyph(c).unwrap();
            assert_eq!(glyph.rows().len(), 6, "{c:?}");
            assert!(glyph.width() <= font.max_width(), "{c:?}");
        }
        assert_eq!(font.glyph('!').unwrap().rows()[0], "# ");
        assert_eq!(font.glyph(' ').unwrap().rows()[0], "$$$");
        assert_eq!(font.glyph('@').unwrap().rows()[1], "# ### ");
    }

    #[test]
    fn standard_is_shared() {
        let fonts: Vec<&Font> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8).map(|_| scope.spawn(Font::standard)).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(fonts.iter().all(|&font| ptr::eq(font, fonts[0])));
        assert_eq!(*Font::standard(), Font::from_bytes(Font::STANDARD_BYTES).unwrap());
    }

    #[test]
    fn font_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Font>();
    }

    #[test]
    fn deterministic() {
        let first = Font::from_bytes(Font::STANDARD_BYTES).unwrap();
        let second = Font::from_bytes(Font::STANDARD_BYTES.to_vec()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn short_document_is_padded() {
        let font = Font::from_bytes(document("flf2a$ 2 2 3 0 0", &["a@", "b@@", "c@"])).unwrap();
        assert_eq!(font.glyph(' ').unwrap().rows(), ["a", "b"]);
        assert_eq!(font.glyph('!').unwrap().rows(), ["c", ""]);
        for c in '"'..='~' {
            assert_eq!(font.glyph(c).unwrap().rows(), ["", ""], "{c:?}");
        }
    }

    #[test]
    fn endmarks_are_stripped_from_the_right_only() {
        let font = Font::from_bytes(document(
            "flf2a$ 1 1 5 0 0",
            &["@a@b@@@", "@@", "  ", "x@ "],
        ))
        .unwrap();
        assert_eq!(font.glyph(' ').unwrap().rows(), ["@a@b"]);
        assert_eq!(font.glyph('!').unwrap().rows(), [""]);
        assert_eq!(font.glyph('"').unwrap().rows(), ["  "]);
        assert_eq!(font.glyph('#').unwrap().rows(), ["x@ "]);
    }

    #[test]
    fn comments_are_skipped() {
        let font = Font::from_bytes(document(
            "flf2a$ 1 1 5 0 2",
            &["made by", "someone", "space@", "bang@"],
        ))
        .unwrap();
        assert_eq!(font.comments(), "made by\nsomeone");
        assert_eq!(font.glyph(' ').unwrap().rows(), ["space"]);
        assert_eq!(font.glyph('!').unwrap().rows(), ["bang"]);
    }

    #[test]
    fn missing_comment_lines_are_tolerated() {
        let font = Font::from_bytes(document("flf2a$ 1 1 5 0 10", &["only one"])).unwrap();
        assert_eq!(font.comments(), "only one");
        assert!(CHARACTERS.clone().all(|c| font.glyph(c).unwrap().rows() == [""]));
    }

    #[test]
    fn negative_comment_lines_skip_nothing() {
        let font = Font::from_bytes(document("flf2a$ 1 1 5 0 -3", &["space@"])).unwrap();
        assert_eq!(font.comments(), "");
        assert_eq!(font.glyph(' ').unwrap().rows(), ["space"]);
    }

    #[test]
    fn content_after_the_range_is_ignored() {
        let mut rows = vec!["g@"; 95];
        rows.extend(["196", "extra@"]);
        let font = Font::from_bytes(document("flf2a$ 1 1 5 0 0 0 0 1", &rows)).unwrap();
        assert_eq!(font.glyph('~').unwrap().rows(), ["g"]);
        assert_eq!(font.glyph('Ä'), None);
        assert_eq!(font.glyph('\u{7f}'), None);
    }

    #[test]
    fn crlf_line_endings() {
        let font = Font::from_bytes("flf2a$ 1 1 5 0 1\r\ncomment\r\nspace@\r\nbang@\r\n").unwrap();
        assert_eq!(font.comments(), "comment");
        assert_eq!(font.glyph(' ').unwrap().rows(), ["space"]);
        assert_eq!(font.glyph('!').unwrap().rows(), ["bang"]);
    }

    #[test]
    fn multibyte_rows() {
        let font = Font::from_bytes(document("flf2a$ 1 1 4 0 0", &["██╗@"])).unwrap();
        let glyph = font.glyph(' ').unwrap();
        assert_eq!(glyph.rows(), ["██╗"]);
        assert_eq!(glyph.width(), 3);
    }

    #[test]
    fn non_ascii_hardblank() {
        let document = b"flf2a\xa0 1 1 4 0 0\nx\xa0@\n\xe2\x96\x88\xa0\xff@\n";
        let font = Font::from_bytes(document).unwrap();
        assert_eq!(font.hardblank(), 0xa0);
        assert_eq!(font.glyph(' ').unwrap().rows(), ["x\u{a0}"]);
        assert_eq!(font.glyph('!').unwrap().rows(), ["█\u{a0}\u{fffd}"]);
    }

    #[test]
    fn zero_height_parses() {
        let font = Font::from_bytes("flf2a$ 0 0 0 0 0\n").unwrap();
        assert_eq!(font.height(), 0);
        assert!(font.glyph('A').unwrap().rows().is_empty());
    }

    #[test]
    fn empty_document() {
        assert_eq!(Font::from_bytes(""), Err(FormatError::Empty));
        assert_eq!(Font::from_bytes(b"").unwrap_err().to_string(), "empty document");
    }

    #[test]
    fn header_errors_propagate() {
        assert!(matches!(
            Font::from_bytes("\nflf2a$ 1 1 1 0 0\n"),
            Err(FormatError::MalformedHeader(_))
        ));
        assert!(matches!(
            Font::from_bytes("flf2a$ 6 5 16\n"),
            Err(FormatError::MalformedHeader(_))
        ));
        assert!(matches!(
            Font::from_bytes("flf2b$ 6 5 16 15 0\n"),
            Err(FormatError::InvalidSignature(_))
        ));
        assert!(matches!(
            Font::from_bytes("flf2a$ 6 5 16 15 many\n"),
            Err(FormatError::Field {
                field: "comment_lines",
                ..
            })
        ));
    }
}
