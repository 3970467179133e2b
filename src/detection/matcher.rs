//! Phrase tables and the matching capability shared by the detectors.
//!
//! Each detector owns its tables and chooses how text is folded before
//! matching. The crisis table uses full normalization while the emotional
//! classifier's coarse crisis list only lowercases, and the two stay
//! independently tunable.

use crate::utilities::string_utils::normalize_text;

/// How text (and phrases) are folded before substring matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// Lowercase, strip accents and punctuation, collapse whitespace.
    Full,
    /// Lowercase only.
    Lowercase,
}

impl Normalization {
    /// Fold `text` according to this strategy.
    pub fn apply(self, text: &str) -> String {
        match self {
            Normalization::Full => normalize_text(text),
            Normalization::Lowercase => text.to_lowercase(),
        }
    }
}

/// A phrase that matched, with both its table form and its folded form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhraseMatch<'a> {
    pub phrase: &'static str,
    pub folded: &'a str,
}

/// Capability to test text against a table of phrases.
pub trait PatternMatcher: Send + Sync {
    /// First phrase (in table order) contained in `text`.
    fn first_match(&self, text: &str) -> Option<PhraseMatch<'_>>;

    /// Number of distinct table phrases contained in `text`.
    fn count_matches(&self, text: &str) -> usize;

    fn matches(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }
}

/// Ordered phrase table with a fixed folding strategy.
///
/// Phrases are folded once at construction; text is folded per call.
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    normalization: Normalization,
    phrases: Vec<(&'static str, String)>,
}

impl PhraseMatcher {
    pub fn new(phrases: &[&'static str], normalization: Normalization) -> Self {
        let phrases = phrases
            .iter()
            .map(|p| (*p, normalization.apply(p)))
            .filter(|(_, folded)| !folded.is_empty())
            .collect();
        Self {
            normalization,
            phrases,
        }
    }

    pub fn normalization(&self) -> Normalization {
        self.normalization
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Like [`PatternMatcher::first_match`] but over text already folded
    /// with this matcher's normalization.
    pub fn first_match_folded(&self, folded_text: &str) -> Option<PhraseMatch<'_>> {
        self.phrases
            .iter()
            .find(|(_, folded)| folded_text.contains(folded.as_str()))
            .map(|(phrase, folded)| PhraseMatch {
                phrase: *phrase,
                folded: folded.as_str(),
            })
    }

    /// Like [`PatternMatcher::count_matches`] over pre-folded text.
    pub fn count_folded(&self, folded_text: &str) -> usize {
        self.phrases
            .iter()
            .filter(|(_, folded)| folded_text.contains(folded.as_str()))
            .count()
    }
}

impl PatternMatcher for PhraseMatcher {
    fn first_match(&self, text: &str) -> Option<PhraseMatch<'_>> {
        let folded = self.normalization.apply(text);
        self.first_match_folded(&folded)
    }

    fn count_matches(&self, text: &str) -> usize {
        let folded = self.normalization.apply(text);
        self.count_folded(&folded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_normalization_matches_across_accents() {
        let matcher = PhraseMatcher::new(&["ya no sé", "da igual"], Normalization::Full);
        let found = matcher.first_match("YA NO SE, la verdad").unwrap();
        assert_eq!(found.phrase, "ya no sé");
        assert_eq!(found.folded, "ya no se");
    }

    #[test]
    fn test_lowercase_keeps_accents_significant() {
        let matcher = PhraseMatcher::new(&["no puedo más"], Normalization::Lowercase);
        assert!(matcher.matches("No puedo MÁS"));
        assert!(!matcher.matches("no puedo mas"));
    }

    #[test]
    fn test_first_match_respects_table_order() {
        let matcher = PhraseMatcher::new(&["morir", "quiero morir"], Normalization::Full);
        assert_eq!(matcher.first_match("quiero morir").unwrap().phrase, "morir");
    }

    #[test]
    fn test_count_matches() {
        let matcher = PhraseMatcher::new(&["triste", "solo", "mal"], Normalization::Lowercase);
        assert_eq!(matcher.count_matches("Estoy triste y solo"), 2);
        assert_eq!(matcher.count_matches("todo bien"), 0);
    }

    #[test]
    fn test_empty_phrases_are_dropped() {
        let matcher = PhraseMatcher::new(&["", "¿?"], Normalization::Full);
        assert!(matcher.is_empty());
        assert!(!matcher.matches("cualquier cosa"));
    }
}
