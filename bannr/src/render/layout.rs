use std::cmp::Ordering;

use enumset::{EnumSet, EnumSetType};

/// One bit of a smush mode
///
/// The discriminants are bit positions in the header's layout field, so `Smush` is the value `1`,
/// `Kern` is `2`, `Hardblank` is `16`, and so on. Bits outside these six have no meaning and are
/// dropped when decoding.
///
/// `Smush` and `Kern` switch merging on; `Hardblank` decides how hardblanks take part; the
/// remaining three are the merge rules, tried in the order `Equal`, `Lowline`, `Hierarchy`.
#[derive(EnumSetType, Debug)]
#[enumset(repr = "u8")]
pub enum SmushRule {
    /// Enables rule-based merging of the two boundary characters.
    Smush = 0,
    /// Enables a one-column overlap when both boundary characters are blank.
    Kern = 1,
    /// Lets a hardblank at the boundary take part in merging as a blank. Without it, a hardblank
    /// at either boundary prevents any overlap.
    Hardblank = 4,
    /// Merges two identical non-blank characters into one.
    Equal = 5,
    /// Merges an underscore with an adjacent blank into an underscore.
    Lowline = 6,
    /// Merges by precedence class, see [`precedence`].
    Hierarchy = 7,
}

impl SmushRule {
    fn smush(self, end: char, start: char) -> Option<char> {
        match self {
            Self::Smush | Self::Kern | Self::Hardblank => None,
            Self::Equal => (end == start && end != ' ').then_some(end),
            Self::Lowline => matches!((end, start), ('_', ' ') | (' ', '_')).then_some('_'),
            Self::Hierarchy => hierarchy(end, start),
        }
    }
}

/// The precedence class used by [`SmushRule::Hierarchy`]. Higher classes win; 0 means the
/// character never wins.
///
/// ```
/// # use bannr::render::precedence;
/// assert_eq!(precedence('_'), 1);
/// assert_eq!(precedence('/'), precedence('|'));
/// assert!(precedence(';') > precedence('&'));
/// assert_eq!(precedence('A'), 0);
/// ```
#[must_use]
pub const fn precedence(c: char) -> u8 {
    match c {
        '_' => 1,
        '|' | '/' | '\\' => 2,
        '[' | ']' | '{' | '}' | '(' | ')' | '<' | '>' => 3,
        '+' | '-' => 4,
        '*' => 5,
        '.' => 6,
        '=' => 7,
        '^' => 8,
        '"' | '\'' => 9,
        '~' => 10,
        '!' | '?' => 11,
        '@' => 12,
        '#' => 13,
        '%' => 14,
        '$' => 15,
        '&' => 16,
        ':' | ';' => 17,
        _ => 0,
    }
}

fn hierarchy(end: char, start: char) -> Option<char> {
    let (end_class, start_class) = (precedence(end), precedence(start));
    match end_class.cmp(&start_class) {
        Ordering::Greater => Some(end),
        Ordering::Less => Some(start),
        Ordering::Equal => (start_class > 0).then_some(start),
    }
}

/// A smush mode: the raw layout value from a font header together with the rules it enables
///
/// A raw value of `0` always means plain concatenation.
///
/// ```
/// # use bannr::render::{SmushMode, SmushRule};
/// let mode = SmushMode::from_raw(1 | 32);
/// assert_eq!(mode, SmushMode::from(SmushRule::Smush | SmushRule::Equal));
/// assert_eq!(mode.merge("|X", "X|", b'$'), "|X|");
/// assert_eq!(mode.merge("|A", "B|", b'$'), "|AB|");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SmushMode {
    raw: i64,
    rules: EnumSet<SmushRule>,
}

impl SmushMode {
    /// Plain concatenation.
    pub const PLAIN: Self = Self {
        raw: 0,
        rules: EnumSet::empty(),
    };

    /// Decode a raw layout value. Only the low byte carries rules, so `-1` enables all of them.
    #[must_use]
    pub fn from_raw(raw: i64) -> Self {
        let [.., low] = raw.to_be_bytes();
        Self {
            raw,
            rules: EnumSet::from_repr_truncated(low),
        }
    }

    /// The raw layout value this mode was built from.
    #[must_use]
    pub const fn raw(self) -> i64 {
        self.raw
    }

    /// The enabled rules.
    #[must_use]
    pub const fn rules(self) -> EnumSet<SmushRule> {
        self.rules
    }

    /// Returns true if the given rule is enabled.
    #[must_use]
    pub fn contains(self, rule: SmushRule) -> bool {
        self.rules.contains(rule)
    }

    /// Merge one row of the accumulated output with the matching row of the next glyph.
    ///
    /// At most one column is consumed: either a pair of blanks overlaps ([`SmushRule::Kern`]), or
    /// the last character of `left` and the first of `right` are replaced by a single merged
    /// character. Otherwise the rows are concatenated.
    ///
    /// `hardblank` only matters if the rows still contain it; the renderer replaces hardblanks
    /// with blanks before merging.
    #[must_use]
    pub fn merge(self, left: &str, right: &str, hardblank: u8) -> String {
        let (Some(end), Some(start)) = (left.chars().next_back(), right.chars().next()) else {
            return concat(left, right);
        };
        match self.join(end, start, char::from(hardblank)) {
            Join::Concat => concat(left, right),
            Join::Overlap => concat(&left[..left.len() - end.len_utf8()], right),
            Join::Smush(merged) => {
                let mut row = String::with_capacity(left.len() + right.len());
                row.push_str(&left[..left.len() - end.len_utf8()]);
                row.push(merged);
                row.push_str(&right[start.len_utf8()..]);
                row
            }
        }
    }

    fn join(self, end: char, start: char, hardblank: char) -> Join {
        if self.raw == 0 || (self.rules & (SmushRule::Smush | SmushRule::Kern)).is_empty() {
            return Join::Concat;
        }
        if (end == hardblank || start == hardblank) && !self.contains(SmushRule::Hardblank) {
            return Join::Concat;
        }
        let blank_out = |c| if c == hardblank { ' ' } else { c };
        let (end, start) = (blank_out(end), blank_out(start));
        if end == ' ' && start == ' ' {
            return if self.contains(SmushRule::Kern) {
                Join::Overlap
            } else {
                Join::Concat
            };
        }
        if !self.contains(SmushRule::Smush) {
            return Join::Concat;
        }
        self.rules
            .iter()
            .find_map(|rule| rule.smush(end, start))
            .map_or(Join::Concat, Join::Smush)
    }
}

impl From<EnumSet<SmushRule>> for SmushMode {
    fn from(rules: EnumSet<SmushRule>) -> Self {
        Self {
            raw: i64::from(rules.as_repr()),
            rules,
        }
    }
}

impl From<SmushRule> for SmushMode {
    fn from(rule: SmushRule) -> Self {
        EnumSet::only(rule).into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Join {
    Concat,
    Overlap,
    Smush(char),
}

fn concat(left: &str, right: &str) -> String {
    let mut row = String::with_capacity(left.len() + right.len());
    row.push_str(left);
    row.push_str(right);
    row
}
