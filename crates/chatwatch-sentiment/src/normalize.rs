//! Message text normalization applied before sentiment scoring.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Normalizes chat text for the scoring API.
///
/// Three passes, in order:
/// 1. strip `:stamp:` tokens (custom emotes written as colon-delimited
///    names),
/// 2. NFKC compatibility normalization (full-width forms, ligatures),
/// 3. strip pictographic symbols — emoji carry no signal for the scorer
///    and can make scoring calls fail outright.
pub struct Normalizer {
    stamp: Regex,
    pictographs: Regex,
}

impl Normalizer {
    /// # Panics
    ///
    /// Panics if the built-in patterns fail to compile, which would be a
    /// programming error caught by the unit tests.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stamp: Regex::new(r":[^:\s]+:").expect("valid stamp regex"),
            // Extended_Pictographic covers emoji proper; FE0F/200D are the
            // variation selector and joiner left behind by ZWJ sequences.
            pictographs: Regex::new(r"[\p{Extended_Pictographic}\u{FE0F}\u{200D}]")
                .expect("valid pictograph regex"),
        }
    }

    /// Returns the cleaned text, trimmed. May be empty — callers must not
    /// send empty text to the scorer.
    #[must_use]
    pub fn normalize(&self, text: &str) -> String {
        let without_stamps = self.stamp.replace_all(text, "");
        let folded: String = without_stamps.nfkc().collect();
        let without_pictographs = self.pictographs.replace_all(&folded, "");
        without_pictographs.trim().to_string()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}
