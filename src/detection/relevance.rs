//! Emotional relevance scoring and memory-type classification.
//!
//! `relevance = importance × repetition × impact`, where importance grows
//! with message length (saturating at 50 words), repetition saturates at 5
//! and impact comes from the analysis intensity. The persistence threshold
//! is applied by the caller.
//!
//! Repetition is measured with [`topic_repetition_count`]: how many of the
//! user's messages touch the topic of the current one.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::emotional::{EmotionalAnalysis, EmotionalState};
use crate::utilities::string_utils::{normalize_text, word_count};

/// Kind of long-term memory a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryType {
    Identitaria,
    Proceso,
    Contextual,
    Vinculo,
}

impl MemoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryType::Identitaria => "identitaria",
            MemoryType::Proceso => "proceso",
            MemoryType::Contextual => "contextual",
            MemoryType::Vinculo => "vinculo",
        }
    }
}

impl fmt::Display for MemoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const IDENTITY_KEYWORDS: &[&str] = &[
    "proyecto",
    "trabajo",
    "enfermedad",
    "diagnóstico",
    "siempre",
    "desde hace",
    "toda mi vida",
];

const PROCESS_KEYWORDS: &[&str] = &[
    "proceso",
    "cambio",
    "meta",
    "objetivo",
    "mejorar",
    "dejar de",
    "empezar a",
];

const BOND_KEYWORDS: &[&str] = &["gracias", "me ayudas", "contigo", "aquí", "siempre"];

/// Shorter normalized words are not treated as topic words.
const MIN_TOPIC_WORD_CHARS: usize = 5;

/// Frequent words long enough to pass the length filter but carrying no topic.
const TOPIC_STOPWORDS: &[&str] = &[
    "estoy", "estaba", "porque", "quiero", "tengo", "tenia", "siento", "cuando", "donde",
    "desde", "hasta", "sobre", "entre", "tambien", "entonces", "ahora", "mucho", "mucha",
    "muchas", "muchos", "todos", "todas", "siempre", "nunca", "hacer", "puedo", "puede",
    "tiene", "pienso", "despues", "antes",
];

/// Normalized topic words of a message.
fn topic_words(message: &str) -> HashSet<String> {
    normalize_text(message)
        .split(' ')
        .filter(|w| w.chars().count() >= MIN_TOPIC_WORD_CHARS && !TOPIC_STOPWORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Number of user messages on the current message's topic, the current one
/// included. An earlier message counts when it shares a topic word with the
/// current one. The result is at least 1.
pub fn topic_repetition_count(message: &str, earlier_user_messages: &[&str]) -> u32 {
    let topic = topic_words(message);
    if topic.is_empty() {
        return 1;
    }

    let repeats = earlier_user_messages
        .iter()
        .filter(|earlier| topic_words(earlier).iter().any(|w| topic.contains(w)))
        .count();
    1 + repeats as u32
}

/// Score in `[0, 1]`. An empty message scores 0.
pub fn calculate_emotional_relevance(
    message: &str,
    analysis: &EmotionalAnalysis,
    repetition_count: u32,
) -> f64 {
    let importance = (word_count(message) as f64 / 50.0).min(1.0);
    let repetition = (repetition_count as f64 / 5.0).min(1.0);
    let impact = analysis.intensity.impact();

    (importance * repetition * impact).clamp(0.0, 1.0)
}

/// Ordered lookup: identity, then process, then bond (happy state only).
pub fn determine_memory_type(message: &str, analysis: &EmotionalAnalysis) -> MemoryType {
    let lower = message.to_lowercase();

    if contains_any(&lower, IDENTITY_KEYWORDS) {
        MemoryType::Identitaria
    } else if contains_any(&lower, PROCESS_KEYWORDS) {
        MemoryType::Proceso
    } else if analysis.state == EmotionalState::Happy && contains_any(&lower, BOND_KEYWORDS) {
        MemoryType::Vinculo
    } else {
        MemoryType::Contextual
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}
