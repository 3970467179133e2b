//! Crisis detection over a severity-ordered phrase table.
//!
//! Detection is pure. Logging a positive result to the analytics sink is the
//! caller's job.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::matcher::{Normalization, PhraseMatcher};
use crate::utilities::string_utils::{normalize_text, normalized_word_count};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrisisCategory {
    Suicide,
    SelfHarm,
    Violence,
    SevereDistress,
}

impl CrisisCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrisisCategory::Suicide => "suicide",
            CrisisCategory::SelfHarm => "self_harm",
            CrisisCategory::Violence => "violence",
            CrisisCategory::SevereDistress => "severe_distress",
        }
    }
}

impl fmt::Display for CrisisCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CrisisCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "suicide" => Ok(CrisisCategory::Suicide),
            "self_harm" => Ok(CrisisCategory::SelfHarm),
            "violence" => Ok(CrisisCategory::Violence),
            "severe_distress" => Ok(CrisisCategory::SevereDistress),
            other => Err(format!("unknown crisis category: {other}")),
        }
    }
}

/// Severity of a crisis pattern. Declaration order is scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static pattern record.
#[derive(Debug, Clone, Copy)]
pub struct CrisisPattern {
    pub id: &'static str,
    pub category: CrisisCategory,
    pub severity: Severity,
    pub patterns: &'static [&'static str],
    pub description: &'static str,
}

/// Outcome of scanning one message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrisisDetectionResult {
    pub detected: bool,
    pub severity: Option<Severity>,
    pub category: Option<CrisisCategory>,
    pub matched_pattern: Option<&'static str>,
    pub matched_text: Option<&'static str>,
    pub confidence: f64,
}

impl CrisisDetectionResult {
    pub fn none() -> Self {
        Self {
            detected: false,
            severity: None,
            category: None,
            matched_pattern: None,
            matched_text: None,
            confidence: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Pattern table
// ---------------------------------------------------------------------------

pub const CRISIS_PATTERNS: [CrisisPattern; 5] = [
    CrisisPattern {
        id: "suicide_explicit",
        category: CrisisCategory::Suicide,
        severity: Severity::Critical,
        patterns: &[
            "quiero morir",
            "quiero suicidarme",
            "voy a suicidarme",
            "me voy a matar",
            "quiero matarme",
            "no quiero vivir",
            "prefiero estar muerto",
            "mejor muerto",
            "terminar con mi vida",
            "acabar con todo",
            "ya no aguanto más",
            "no tiene sentido seguir",
        ],
        description: "Explicit suicidal ideation",
    },
    CrisisPattern {
        id: "suicide_planning",
        category: CrisisCategory::Suicide,
        severity: Severity::Critical,
        patterns: &[
            "cómo suicidarme",
            "formas de suicidio",
            "métodos de suicidio",
            "pastillas para morir",
            "dónde comprar",
            "carta de despedida",
            "nota de suicidio",
        ],
        description: "Suicidal planning or method seeking",
    },
    CrisisPattern {
        id: "self_harm_explicit",
        category: CrisisCategory::SelfHarm,
        severity: Severity::High,
        patterns: &[
            "quiero cortarme",
            "me corté",
            "me lastimé",
            "me hice daño",
            "autolesión",
            "me quemé",
            "golpearme",
        ],
        description: "Explicit self-harm ideation or action",
    },
    CrisisPattern {
        id: "violence_explicit",
        category: CrisisCategory::Violence,
        severity: Severity::High,
        patterns: &[
            "quiero matar",
            "voy a matar",
            "quiero hacer daño",
            "voy a lastimar",
            "venganza violenta",
        ],
        description: "Explicit violent ideation",
    },
    CrisisPattern {
        id: "severe_distress",
        category: CrisisCategory::SevereDistress,
        severity: Severity::Medium,
        patterns: &[
            "no puedo más",
            "estoy desesperado",
            "me siento perdido",
            "no veo salida",
            "todo está mal",
            "nada tiene sentido",
        ],
        description: "Severe emotional distress",
    },
];

// ---------------------------------------------------------------------------
// Detector
// ---------------------------------------------------------------------------

/// Crisis detector over a pattern table, scanned critical → high → medium.
pub struct CrisisDetector {
    entries: Vec<(CrisisPattern, PhraseMatcher)>,
}

impl CrisisDetector {
    /// Build from any table. The sort is stable, so list order breaks ties
    /// within a severity.
    pub fn new(patterns: &[CrisisPattern]) -> Self {
        let mut entries: Vec<(CrisisPattern, PhraseMatcher)> = patterns
            .iter()
            .map(|p| (*p, PhraseMatcher::new(p.patterns, Normalization::Full)))
            .collect();
        entries.sort_by_key(|(p, _)| p.severity);
        Self { entries }
    }

    pub fn detect(&self, message: &str) -> CrisisDetectionResult {
        let normalized = normalize_text(message);
        if normalized.is_empty() {
            return CrisisDetectionResult::none();
        }
        let message_words = normalized_word_count(&normalized) as f64;

        for (pattern, matcher) in &self.entries {
            if let Some(found) = matcher.first_match_folded(&normalized) {
                let phrase_words = normalized_word_count(found.folded) as f64;
                let confidence = (0.5 + (phrase_words / message_words) * 0.5).min(0.9);

                return CrisisDetectionResult {
                    detected: true,
                    severity: Some(pattern.severity),
                    category: Some(pattern.category),
                    matched_pattern: Some(pattern.id),
                    matched_text: Some(found.phrase),
                    confidence,
                };
            }
        }

        CrisisDetectionResult::none()
    }
}

impl Default for CrisisDetector {
    fn default() -> Self {
        Self::new(&CRISIS_PATTERNS)
    }
}

static DEFAULT_DETECTOR: Lazy<CrisisDetector> = Lazy::new(CrisisDetector::default);

/// Scan a message against the built-in crisis table.
pub fn detect_crisis(message: &str) -> CrisisDetectionResult {
    DEFAULT_DETECTOR.detect(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_suicidal_ideation() {
        let result = detect_crisis("Quiero morir, no aguanto más");
        assert!(result.detected);
        assert_eq!(result.severity, Some(Severity::Critical));
        assert_eq!(result.category, Some(CrisisCategory::Suicide));
        assert_eq!(result.matched_pattern, Some("suicide_explicit"));
        assert!(result.matched_text.is_some());
        assert!(result.confidence > 0.5);
    }

    #[test]
    fn test_suicidal_planning() {
        let result = detect_crisis("Estoy buscando formas de suicidio");
        assert_eq!(result.severity, Some(Severity::Critical));
        assert_eq!(result.matched_pattern, Some("suicide_planning"));
    }

    #[test]
    fn test_self_harm_and_violence() {
        let result = detect_crisis("Me corté de nuevo, no puedo parar");
        assert_eq!(result.severity, Some(Severity::High));
        assert_eq!(result.category, Some(CrisisCategory::SelfHarm));

        let result = detect_crisis("Quiero matar a alguien");
        assert_eq!(result.severity, Some(Severity::High));
        assert_eq!(result.category, Some(CrisisCategory::Violence));
    }

    #[test]
    fn test_severe_distress() {
        let result = detect_crisis("No puedo más, estoy desesperado");
        assert_eq!(result.severity, Some(Severity::Medium));
        assert_eq!(result.category, Some(CrisisCategory::SevereDistress));
    }

    #[test]
    fn test_critical_takes_precedence_over_medium() {
        let result = detect_crisis("No puedo más, quiero morir");
        assert_eq!(result.severity, Some(Severity::Critical));
        assert_eq!(result.category, Some(CrisisCategory::Suicide));
    }

    #[test]
    fn test_precedence_independent_of_table_order() {
        let mut reversed = CRISIS_PATTERNS;
        reversed.reverse();
        let detector = CrisisDetector::new(&reversed);
        let result = detector.detect("No puedo más, quiero morir");
        assert_eq!(result.severity, Some(Severity::Critical));
    }

    #[test]
    fn test_confidence_grows_as_phrase_dominates() {
        let terse = detect_crisis("quiero morir");
        let diluted = detect_crisis("Hola, estoy bien, solo quiero morir un poco");
        assert!(terse.confidence > diluted.confidence);
        assert!((terse.confidence - 0.9).abs() < 1e-9);
        assert!(diluted.confidence > 0.5);
    }

    #[test]
    fn test_accent_and_case_invariance() {
        let shouted = detect_crisis("¡QUIERO MORIR!");
        let plain = detect_crisis("quiero morir");
        assert_eq!(shouted.detected, plain.detected);
        assert_eq!(shouted.severity, plain.severity);
        assert_eq!(shouted.category, plain.category);

        assert!(detect_crisis("¡Quiero morir! ¿Por qué sigo aquí?").detected);
    }

    #[test]
    fn test_no_false_positives() {
        let result = detect_crisis("Estoy triste hoy, me duelen las rodillas");
        assert!(!result.detected);
        assert_eq!(result.severity, None);
        assert_eq!(result.category, None);
        assert_eq!(result.confidence, 0.0);

        assert!(!detect_crisis("Hola! Hoy me siento mucho mejor").detected);
    }

    #[test]
    fn test_empty_input() {
        assert!(!detect_crisis("").detected);
        assert!(!detect_crisis("   \n ").detected);
        assert!(!detect_crisis("¿¡!?").detected);
    }

    #[test]
    fn test_category_round_trip_names() {
        assert_eq!("self_harm".parse::<CrisisCategory>(), Ok(CrisisCategory::SelfHarm));
        assert!("other".parse::<CrisisCategory>().is_err());
        assert_eq!(
            serde_json::to_value(CrisisCategory::SevereDistress).unwrap(),
            "severe_distress"
        );
    }
}
