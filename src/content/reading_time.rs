//! Reading time estimation

use serde::Serialize;

/// Suffix of the generic reading-time label
const GENERIC_UNIT: &str = "min read";

/// Estimated reading duration of a body of text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadingTime {
    /// Whitespace-separated word count
    pub words: usize,
    /// Whole minutes, rounded up, never below one
    pub minutes: usize,
    /// Generic label, e.g. "3 min read"
    pub text: String,
}

impl ReadingTime {
    /// Estimate reading time at `words_per_minute`.
    ///
    /// Empty or whitespace-only text still reports one minute.
    pub fn estimate(text: &str, words_per_minute: usize) -> Self {
        let words = text.split_whitespace().count();
        let minutes = words.div_ceil(words_per_minute.max(1)).max(1);

        Self {
            words,
            minutes,
            text: format!("{} {}", minutes, GENERIC_UNIT),
        }
    }

    /// The label with the generic unit replaced by `unit`
    pub fn localized(&self, unit: &str) -> String {
        self.text.replace(GENERIC_UNIT, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["từ"; n].join(" ")
    }

    #[test]
    fn test_estimate_rounds_up() {
        let rt = ReadingTime::estimate(&words(500), 200);
        assert_eq!(rt.words, 500);
        assert_eq!(rt.minutes, 3);
        assert_eq!(rt.text, "3 min read");

        assert_eq!(ReadingTime::estimate(&words(400), 200).minutes, 2);
        assert_eq!(ReadingTime::estimate(&words(401), 200).minutes, 3);
    }

    #[test]
    fn test_empty_text_is_one_minute() {
        assert_eq!(ReadingTime::estimate("", 200).minutes, 1);
        assert_eq!(ReadingTime::estimate(" \n\t ", 200).minutes, 1);
        assert_eq!(ReadingTime::estimate("one", 200).minutes, 1);
    }

    #[test]
    fn test_monotonic_in_word_count() {
        let mut previous = 0;
        for n in (0..2000).step_by(37) {
            let minutes = ReadingTime::estimate(&words(n), 180).minutes;
            assert!(minutes >= previous);
            assert!(minutes >= 1);
            previous = minutes;
        }
    }

    #[test]
    fn test_markup_and_newlines_split_words() {
        let rt = ReadingTime::estimate("# Title\n\n**bold** text\n> quote", 200);
        assert_eq!(rt.words, 6);
    }

    #[test]
    fn test_localized_label() {
        let rt = ReadingTime::estimate(&words(1000), 200);
        assert_eq!(rt.localized("phút đọc"), "5 phút đọc");
    }
}
