//! Emotional state classification.
//!
//! Keyword-frequency analysis plus an exclamation-count intensity
//! heuristic. The result drives mode routing and memory gating.

use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::matcher::{Normalization, PatternMatcher, PhraseMatcher};
use crate::utilities::string_utils::count_char;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionalState {
    Neutral,
    Happy,
    Sad,
    Anxious,
    Frustrated,
    Crisis,
    Hopeful,
    Tired,
}

impl EmotionalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionalState::Neutral => "neutral",
            EmotionalState::Happy => "happy",
            EmotionalState::Sad => "sad",
            EmotionalState::Anxious => "anxious",
            EmotionalState::Frustrated => "frustrated",
            EmotionalState::Crisis => "crisis",
            EmotionalState::Hopeful => "hopeful",
            EmotionalState::Tired => "tired",
        }
    }

    /// Signed affect used by the analytics log.
    pub fn valence(&self) -> f64 {
        match self {
            EmotionalState::Happy | EmotionalState::Hopeful => 0.7,
            EmotionalState::Sad | EmotionalState::Anxious | EmotionalState::Frustrated => -0.7,
            EmotionalState::Crisis => -1.0,
            EmotionalState::Neutral | EmotionalState::Tired => 0.0,
        }
    }
}

impl fmt::Display for EmotionalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Medium,
    High,
    Critical,
}

impl Intensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Low => "low",
            Intensity::Medium => "medium",
            Intensity::High => "high",
            Intensity::Critical => "critical",
        }
    }

    /// Weight used by the relevance formula.
    pub fn impact(&self) -> f64 {
        match self {
            Intensity::Low => 0.25,
            Intensity::Medium => 0.5,
            Intensity::High => 0.75,
            Intensity::Critical => 1.0,
        }
    }

    /// Numeric level stored in the analytics log.
    pub fn level(&self) -> f64 {
        match self {
            Intensity::Low => 0.3,
            Intensity::Medium => 0.5,
            Intensity::High => 0.8,
            Intensity::Critical => 1.0,
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestedTone {
    Brief,
    Normal,
    Detailed,
}

/// Structured emotional profile of one message.
///
/// `state == Crisis` implies `intensity == Critical` and no memory recall.
/// `is_exhausted` implies containment and no memory recall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionalAnalysis {
    pub state: EmotionalState,
    pub intensity: Intensity,
    pub needs_containment: bool,
    pub needs_validation: bool,
    pub allow_memory_recall: bool,
    pub is_exhausted: bool,
    pub suggested_tone: SuggestedTone,
}

impl EmotionalAnalysis {
    /// Fixed profile returned when a crisis keyword is present.
    pub fn crisis() -> Self {
        Self {
            state: EmotionalState::Crisis,
            intensity: Intensity::Critical,
            needs_containment: true,
            needs_validation: true,
            allow_memory_recall: false,
            is_exhausted: false,
            suggested_tone: SuggestedTone::Brief,
        }
    }

    /// Derive the flags from a state, intensity and exhaustion signal.
    pub fn derive(state: EmotionalState, intensity: Intensity, is_exhausted: bool) -> Self {
        let needs_containment = (matches!(state, EmotionalState::Sad | EmotionalState::Anxious)
            && intensity != Intensity::Low)
            || is_exhausted;
        let needs_validation =
            !matches!(state, EmotionalState::Neutral | EmotionalState::Happy) || is_exhausted;
        let allow_memory_recall =
            (!needs_containment || intensity == Intensity::Low) && !is_exhausted;
        let suggested_tone = if needs_containment {
            SuggestedTone::Brief
        } else {
            SuggestedTone::Normal
        };

        Self {
            state,
            intensity,
            needs_containment,
            needs_validation,
            allow_memory_recall,
            is_exhausted,
            suggested_tone,
        }
    }
}

// ---------------------------------------------------------------------------
// Keyword tables
// ---------------------------------------------------------------------------

pub const EXHAUSTION_INDICATORS: &[&str] = &[
    "ya he hecho de todo",
    "qué más se puede hacer",
    "ya no sé",
    "me cansé",
    "pero bueno",
    "da igual",
    "ya intenté todo",
    "nada funciona",
    "no sirve de nada",
    "para qué",
    "me rindo",
];

pub const CRISIS_KEYWORDS: &[&str] = &[
    "no puedo más",
    "me quiero morir",
    "no tiene sentido",
    "estoy desesperado",
    "no aguanto",
    "me siento una carga",
    "quiero desaparecer",
];

/// Category tables in tie-break order: on equal counts the earlier wins.
pub const CATEGORY_KEYWORDS: &[(EmotionalState, &[&str])] = &[
    (
        EmotionalState::Sad,
        &["triste", "deprimido", "solo", "vacío", "llorar", "mal", "cansado", "agotado"],
    ),
    (
        EmotionalState::Anxious,
        &["ansiedad", "nervioso", "preocupado", "miedo", "pánico", "angustia", "inquieto"],
    ),
    (
        EmotionalState::Frustrated,
        &["frustrado", "enojado", "molesto", "harto", "cansado de", "no funciona", "otra vez"],
    ),
    (
        EmotionalState::Happy,
        &["feliz", "contento", "alegre", "bien", "mejor", "logré", "conseguí"],
    ),
    (
        EmotionalState::Hopeful,
        &["espero", "quiero", "voy a", "intentaré", "meta", "objetivo"],
    ),
    (
        EmotionalState::Tired,
        &["cansado", "agotado", "sin energía", "exhausto", "rendido"],
    ),
];

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Emotional classifier over swappable keyword tables.
pub struct EmotionalClassifier {
    exhaustion: PhraseMatcher,
    crisis: PhraseMatcher,
    categories: Vec<(EmotionalState, PhraseMatcher)>,
}

impl EmotionalClassifier {
    pub fn new(
        exhaustion: &[&'static str],
        crisis: &[&'static str],
        categories: &[(EmotionalState, &[&'static str])],
    ) -> Self {
        Self {
            exhaustion: PhraseMatcher::new(exhaustion, Normalization::Lowercase),
            crisis: PhraseMatcher::new(crisis, Normalization::Lowercase),
            categories: categories
                .iter()
                .map(|(state, words)| (*state, PhraseMatcher::new(words, Normalization::Lowercase)))
                .collect(),
        }
    }

    pub fn is_exhausted(&self, message: &str) -> bool {
        self.exhaustion.matches(message)
    }

    pub fn detect(&self, message: &str) -> EmotionalAnalysis {
        let is_exhausted = self.is_exhausted(message);

        let lower = message.to_lowercase();
        if self.crisis.first_match_folded(&lower).is_some() {
            return EmotionalAnalysis::crisis();
        }

        let mut state = EmotionalState::Neutral;
        let mut max_matches = 0;
        for (candidate, matcher) in &self.categories {
            let matches = matcher.count_folded(&lower);
            if matches > max_matches {
                max_matches = matches;
                state = *candidate;
            }
        }

        let exclamations = count_char(message, '!');
        let intensity = if max_matches >= 3 || exclamations >= 2 {
            Intensity::High
        } else if max_matches >= 2 || exclamations >= 1 {
            Intensity::Medium
        } else {
            Intensity::Low
        };

        EmotionalAnalysis::derive(state, intensity, is_exhausted)
    }
}

impl Default for EmotionalClassifier {
    fn default() -> Self {
        Self::new(EXHAUSTION_INDICATORS, CRISIS_KEYWORDS, CATEGORY_KEYWORDS)
    }
}

static DEFAULT_CLASSIFIER: Lazy<EmotionalClassifier> = Lazy::new(EmotionalClassifier::default);

/// Classify a message with the built-in tables.
pub fn detect_emotional_state(message: &str) -> EmotionalAnalysis {
    DEFAULT_CLASSIFIER.detect(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crisis_short_circuits() {
        let analysis = detect_emotional_state("No puedo más con esto");
        assert_eq!(analysis, EmotionalAnalysis::crisis());
        assert_eq!(analysis.intensity, Intensity::Critical);
        assert!(!analysis.allow_memory_recall);
    }

    #[test]
    fn test_crisis_beats_exhaustion() {
        let analysis = detect_emotional_state("Me cansé, no aguanto");
        assert_eq!(analysis.state, EmotionalState::Crisis);
        assert!(!analysis.is_exhausted);
    }

    #[test]
    fn test_crisis_keywords_are_accent_sensitive() {
        // Lowercase-only folding: the unaccented form is not a crisis keyword.
        let analysis = detect_emotional_state("no puedo mas");
        assert_ne!(analysis.state, EmotionalState::Crisis);
    }

    #[test]
    fn test_exhaustion_forces_containment() {
        let analysis = detect_emotional_state("Sí, he hecho de todo. ¿Qué más se puede hacer?");
        assert!(analysis.is_exhausted);
        assert!(analysis.needs_containment);
        assert!(analysis.needs_validation);
        assert!(!analysis.allow_memory_recall);
        assert_eq!(analysis.suggested_tone, SuggestedTone::Brief);
    }

    #[test]
    fn test_exhaustion_phrases_keep_their_accents() {
        // "para que" and "ya no se puede" are ordinary Spanish, not "para qué" / "ya no sé".
        for message in [
            "Estoy ahorrando para que mis hijos puedan estudiar",
            "Ya no se puede entrar por la puerta de atrás",
        ] {
            let analysis = detect_emotional_state(message);
            assert!(!analysis.is_exhausted, "{message}");
            assert_ne!(
                crate::router::select_conversational_mode(&analysis),
                crate::router::ConversationalMode::Contencion,
                "{message}"
            );
        }

        assert!(detect_emotional_state("¿Y para qué? Ya no sé").is_exhausted);
        assert!(detect_emotional_state("YA NO SÉ qué hacer").is_exhausted);
    }

    #[test]
    fn test_neutral_message() {
        let analysis = detect_emotional_state("Hoy fui al mercado");
        assert_eq!(analysis.state, EmotionalState::Neutral);
        assert_eq!(analysis.intensity, Intensity::Low);
        assert!(!analysis.needs_validation);
        assert!(analysis.allow_memory_recall);
    }

    #[test]
    fn test_sad_with_high_intensity() {
        let analysis = detect_emotional_state("Estoy triste, deprimido y me siento vacío");
        assert_eq!(analysis.state, EmotionalState::Sad);
        assert_eq!(analysis.intensity, Intensity::High);
        assert!(analysis.needs_containment);
        assert!(!analysis.allow_memory_recall);
    }

    #[test]
    fn test_exclamations_raise_intensity() {
        let analysis = detect_emotional_state("¡Estoy feliz!");
        assert_eq!(analysis.state, EmotionalState::Happy);
        assert_eq!(analysis.intensity, Intensity::Medium);

        let analysis = detect_emotional_state("¡Estoy feliz!!");
        assert_eq!(analysis.intensity, Intensity::High);
        assert!(!analysis.needs_validation);
    }

    #[test]
    fn test_tie_keeps_first_category() {
        // "cansado" scores once for sad and once for tired; sad comes first.
        let analysis = detect_emotional_state("Estoy cansado");
        assert_eq!(analysis.state, EmotionalState::Sad);
    }

    #[test]
    fn test_low_intensity_sadness_allows_recall() {
        let analysis = detect_emotional_state("Estoy triste");
        assert_eq!(analysis.intensity, Intensity::Low);
        assert!(!analysis.needs_containment);
        assert!(analysis.needs_validation);
        assert!(analysis.allow_memory_recall);
    }

    #[test]
    fn test_valence_and_levels() {
        assert_eq!(EmotionalState::Hopeful.valence(), 0.7);
        assert_eq!(EmotionalState::Frustrated.valence(), -0.7);
        assert_eq!(EmotionalState::Crisis.valence(), -1.0);
        assert_eq!(EmotionalState::Tired.valence(), 0.0);
        assert_eq!(Intensity::High.level(), 0.8);
        assert_eq!(Intensity::Low.impact(), 0.25);
    }
}
