//! String utility functions shared by the detection stages.
//!
//! Normalization here is the folding applied before phrase matching:
//! lowercase, accent stripping, sentence punctuation to spaces and
//! whitespace collapsing.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static SENTENCE_PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.,;:!?¿¡]").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalize text for phrase matching.
///
/// Lowercases, decomposes to NFD and drops combining marks (so "í" matches
/// "i"), replaces `. , ; : ! ? ¿ ¡` with a space, collapses whitespace runs
/// and trims. Total over any input; the empty string maps to itself.
pub fn normalize_text(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    let spaced = SENTENCE_PUNCTUATION.replace_all(&folded, " ");
    WHITESPACE_RUN.replace_all(&spaced, " ").trim().to_string()
}

/// Number of space-separated tokens in an already-normalized string.
///
/// An empty string still counts as one token, which keeps ratios against
/// it finite.
pub fn normalized_word_count(normalized: &str) -> usize {
    normalized.split(' ').count()
}

/// Number of whitespace-separated words in raw text.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Count occurrences of a single character.
pub fn count_char(text: &str, needle: char) -> usize {
    text.chars().filter(|c| *c == needle).count()
}

/// Truncate to at most `max_chars` characters, respecting char boundaries.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_accents_and_case() {
        assert_eq!(normalize_text("Árbol CAFÉ Niño"), "arbol cafe nino");
    }

    #[test]
    fn test_normalize_replaces_punctuation() {
        assert_eq!(normalize_text("¡QUIERO MORIR!"), "quiero morir");
        assert_eq!(normalize_text("¿Qué?  ya;no:sé."), "que ya no se");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize_text("  hola \n\t  mundo  "), "hola mundo");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("   ¿¡!?  "), "");
    }

    #[test]
    fn test_word_counts() {
        assert_eq!(normalized_word_count("quiero morir"), 2);
        assert_eq!(normalized_word_count(""), 1);
        assert_eq!(word_count("  uno dos\ttres \n"), 3);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn test_count_char_and_truncate() {
        assert_eq!(count_char("¿Sí? ¿No?", '?'), 2);
        assert_eq!(truncate_chars("canción", 6), "canció");
    }
}
