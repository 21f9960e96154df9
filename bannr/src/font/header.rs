use std::str::{self, FromStr};

use bstr::ByteSlice as _;
use itertools::Itertools as _;

use crate::font::FormatError;

const SIGNATURE: &[u8] = b"flf2a";

/// A decoded font header.
///
/// The header is the first line of a font document:
///
/// ```text
/// flf2a$ 6 5 8 0 3 0 64 0
/// ```
///
/// The six leading fields are mandatory; the trailing three are optional.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    /// The *hardblank* byte, the one immediately following `flf2a` in the signature.
    ///
    /// A hardblank is drawn as a blank (`' '`) in the output but marks a column that the font
    /// author meant to keep; see [`SmushRule::Hardblank`](crate::render::SmushRule::Hardblank).
    pub hardblank: u8,
    /// Number of rows in every glyph, including any empty space above or below the letter shape.
    pub height: usize,
    /// Rows from the top of a glyph down to the baseline. Informational only; it does not affect
    /// the rendered output.
    pub baseline: i64,
    /// Nominal glyph width. Only used to size the blank glyph synthesized for a character that
    /// the font does not provide at all.
    pub max_width: usize,
    /// The legacy layout field. This is the smush mode unless [`full_layout`](Header::full_layout)
    /// is present.
    pub old_layout: i64,
    /// Number of comment lines between the header and the glyphs. A negative count skips nothing.
    pub comment_lines: i64,
    /// The optional print direction field. Informational only.
    pub print_direction: Option<i64>,
    /// The optional extended layout field. Overrides [`old_layout`](Header::old_layout).
    pub full_layout: Option<i64>,
    /// The optional count of code-tagged glyphs. Informational only; code-tagged glyphs are not
    /// decoded.
    pub code_tag_count: Option<i64>,
}

impl Header {
    /// Decode a header from its line in a font document.
    ///
    /// Fields are separated by any run of whitespace. Malformed optional fields are ignored.
    ///
    /// # Errors
    /// * [`FormatError::MalformedHeader`] if there are fewer than six fields;
    /// * [`FormatError::InvalidSignature`] if the first field does not start with `flf2a`
    ///   followed by a hardblank;
    /// * [`FormatError::Field`] if one of the five mandatory numeric fields cannot be parsed.
    pub fn decode(header_line: impl AsRef<[u8]>) -> Result<Self, FormatError> {
        let header_line = header_line.as_ref();
        let mut fields = header_line.fields();
        let Some([signature, height, baseline, max_width, old_layout, comment_lines]) =
            fields.next_array()
        else {
            return Err(FormatError::MalformedHeader(header_line.into()));
        };
        let hardblank = match signature.strip_prefix(SIGNATURE) {
            Some(&[hardblank, ..]) => hardblank,
            _ => return Err(FormatError::InvalidSignature(signature.into())),
        };
        let height = Field::Height.parse(height)?;
        let baseline = Field::Baseline.parse(baseline)?;
        let max_width = Field::MaxWidth.parse(max_width)?;
        let old_layout = Field::OldLayout.parse(old_layout)?;
        let comment_lines = Field::CommentLines.parse(comment_lines)?;
        let [print_direction, full_layout, code_tag_count] =
            [fields.next(), fields.next(), fields.next()].map(parse_optional);
        Ok(Self {
            hardblank,
            height,
            baseline,
            max_width,
            old_layout,
            comment_lines,
            print_direction,
            full_layout,
            code_tag_count,
        })
    }

    /// The raw smush mode: [`full_layout`](Header::full_layout) when present, otherwise
    /// [`old_layout`](Header::old_layout).
    #[must_use]
    pub fn smush_mode(&self) -> i64 {
        self.full_layout.unwrap_or(self.old_layout)
    }
}

fn parse_optional(field: Option<&[u8]>) -> Option<i64> {
    field
        .and_then(|bytes| str::from_utf8(bytes).ok())
        .and_then(|s| s.parse().ok())
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Height,
    Baseline,
    MaxWidth,
    OldLayout,
    CommentLines,
}

impl Field {
    fn parse<T: FromStr>(self, bytes: &[u8]) -> Result<T, FormatError> {
        str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| FormatError::Field {
                field: self.name(),
                value: bytes.into(),
            })
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Height => "height",
            Self::Baseline => "baseline",
            Self::MaxWidth => "max_width",
            Self::OldLayout => "old_layout",
            Self::CommentLines => "comment_lines",
        }
    }
}
