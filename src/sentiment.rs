//! Lexicon-based sentiment scoring
//!
//! Each whitespace-separated token is matched case-insensitively against two
//! fixed word lists. Every occurrence counts, so "good good" scores 2.

const POSITIVE_WORDS: [&str; 5] = ["great", "good", "love", "amazing", "excellent"];
const NEGATIVE_WORDS: [&str; 5] = ["bad", "sad", "angry", "hate", "terrible"];

/// Score `text`: +1 per positive token, -1 per negative token.
///
/// Tokens are not stripped of punctuation, so `"good!"` matches nothing.
pub fn score(text: &str) -> i64 {
    text.split_whitespace()
        .map(|token| {
            let token = token.to_lowercase();
            if POSITIVE_WORDS.contains(&token.as_str()) {
                1
            } else if NEGATIVE_WORDS.contains(&token.as_str()) {
                -1
            } else {
                0
            }
        })
        .sum()
}
