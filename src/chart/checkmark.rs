//! Affirmative-mark classification.
//!
//! Decides whether a recognized token is a checkmark on the paper chart.
//! OCR renders handwritten marks inconsistently (✓, v, x, +, sometimes
//! with trailing punctuation), so short tokens get a substring fallback.

/// Glyphs and tokens accepted as an affirmative mark. Letters are
/// compared case-insensitively.
const MARK_TOKENS: [&str; 9] = ["✓", "✔", "√", "v", "x", "+", "•", "/", "ok"];

/// Longest trimmed text that may still be a noisy mark ("✓.", "x)").
const MAX_NOISY_MARK_CHARS: usize = 2;

/// Returns true if the token reads as an affirmative mark.
///
/// The trimmed, lowercased text must equal one of the mark tokens, or,
/// for texts of at most two characters, contain one as a substring.
/// Longer strings are never checkmarks even if a mark character appears
/// inside them, so prose like "taken today" can't false-positive.
pub fn is_checkmark(text: &str) -> bool {
    let trimmed = text.trim().to_lowercase();
    if trimmed.is_empty() {
        return false;
    }
    if MARK_TOKENS.contains(&trimmed.as_str()) {
        return true;
    }
    if trimmed.chars().count() <= MAX_NOISY_MARK_CHARS {
        return MARK_TOKENS.iter().any(|token| trimmed.contains(token));
    }
    false
}
