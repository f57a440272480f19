//! Punctuation removal char filter.

use super::CharFilter;

/// The 32 ASCII punctuation characters removed by [`PunctuationCharFilter`].
pub const ASCII_PUNCTUATION: &str = r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##;

/// A char filter that deletes every ASCII punctuation character.
///
/// Characters are removed, not replaced, so `"call-now"` becomes `"callnow"`.
/// Non-ASCII symbols are left untouched.
#[derive(Clone, Debug, Default)]
pub struct PunctuationCharFilter;

impl PunctuationCharFilter {
    /// Create a new punctuation char filter.
    pub fn new() -> Self {
        PunctuationCharFilter
    }

    /// Check whether a character belongs to the removed set.
    pub fn is_punctuation(c: char) -> bool {
        c.is_ascii_punctuation()
    }
}

impl CharFilter for PunctuationCharFilter {
    fn filter(&self, input: &str) -> String {
        input.chars().filter(|&c| !Self::is_punctuation(c)).collect()
    }

    fn name(&self) -> &'static str {
        "punctuation"
    }
}
