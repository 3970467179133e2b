//! Perceived-presence quality score for a final reply.
//!
//! Diagnostic only: the score is logged and never changes the reply.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

const LACK_OF_EMPATHY: &[&str] = &[
    "simplemente",
    "solo tienes que",
    "es fácil",
    "no es tan difícil",
    "exageras",
    "no es para tanto",
];

const JUDGMENT: &[&str] = &[
    "deberías",
    "tienes que",
    "está mal",
    "eso es malo",
    "fallaste",
    "no hiciste bien",
    "te equivocaste",
];

const LACK_OF_PRESENCE: &[&str] = &["como te dije", "ya te lo expliqué", "repito", "otra vez", "te lo dije"];

const AI_PHRASES: &[&str] = &[
    "como modelo de lenguaje",
    "no puedo sentir",
    "soy una ia",
    "no tengo emociones",
    "mi programación",
    "mis algoritmos",
    "recuerdo que el día",
    "en tu mensaje del",
];

const PRESENCE_ANCHORS: &[&str] = &["aquí estoy", "te entiendo", "seguimos juntos", "no estás solo", "te escucho"];

const MEMORY_REFERENCES: &[&str] = &["recuerdo", "me contaste", "mencionaste", "has pasado por"];

const PASS_SCORE: u32 = 70;

static EXPLICIT_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{1,2}\s+de\s+\w+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    pub empathy: u32,
    pub no_judgment: u32,
    pub presence: u32,
    pub naturalness: u32,
    pub memory_usage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualityReport {
    pub score: u32,
    pub passed: bool,
    pub metrics: QualityMetrics,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Score a reply 0-100 from five weighted metrics.
///
/// Weights: empathy 25%, no judgment 25%, presence 20%, naturalness 20%,
/// memory usage 10%. Passes at 70.
pub fn evaluate_emotional_quality(response: &str, has_memory: bool) -> QualityReport {
    let lower = response.to_lowercase();
    let chars = response.chars().count();
    let mut warnings = Vec::new();
    let mut suggestions = Vec::new();

    let mut empathy: i32 = 100;
    for indicator in LACK_OF_EMPATHY.iter().filter(|i| lower.contains(*i)) {
        empathy -= 20;
        warnings.push(format!("Falta de empatía detectada: \"{indicator}\""));
        suggestions.push("Evita minimizar las emociones del usuario".to_string());
    }

    let mut no_judgment: i32 = 100;
    for indicator in JUDGMENT.iter().filter(|i| lower.contains(*i)) {
        no_judgment -= 25;
        warnings.push(format!("Juicio detectado: \"{indicator}\""));
        suggestions.push("Usa sugerencias en lugar de órdenes".to_string());
    }

    let mut presence: i32 = 50;
    presence += 10 * PRESENCE_ANCHORS.iter().filter(|a| lower.contains(*a)).count() as i32;
    for indicator in LACK_OF_PRESENCE.iter().filter(|i| lower.contains(*i)) {
        presence -= 15;
        warnings.push(format!("Falta de presencia detectada: \"{indicator}\""));
    }

    let mut naturalness: i32 = 100;
    for indicator in AI_PHRASES.iter().filter(|i| lower.contains(*i)) {
        naturalness -= 30;
        warnings.push(format!("Lenguaje de IA detectado: \"{indicator}\""));
        suggestions.push("Habla como humano, no como máquina".to_string());
    }
    if chars > 500 {
        naturalness -= 10;
        suggestions.push("Respuesta muy larga. Mantén respuestas concisas (1-3 oraciones)".to_string());
    }
    if chars < 20 {
        naturalness -= 15;
        warnings.push("Respuesta muy corta".to_string());
        suggestions.push("Respuesta demasiado breve. Agrega validación emocional".to_string());
    }

    let memory_usage: i32 = if !has_memory {
        100
    } else if MEMORY_REFERENCES.iter().any(|r| lower.contains(r)) {
        if EXPLICIT_DATE.is_match(&lower) {
            warnings.push("Mención explícita de fecha detectada".to_string());
            suggestions.push(
                "Usa memoria de forma implícita, no menciones fechas específicas".to_string(),
            );
            30
        } else {
            100
        }
    } else {
        70
    };

    let metrics = QualityMetrics {
        empathy: clamp_score(empathy),
        no_judgment: clamp_score(no_judgment),
        presence: clamp_score(presence),
        naturalness: clamp_score(naturalness),
        memory_usage: clamp_score(memory_usage),
    };

    let weighted = f64::from(metrics.empathy) * 0.25
        + f64::from(metrics.no_judgment) * 0.25
        + f64::from(metrics.presence) * 0.20
        + f64::from(metrics.naturalness) * 0.20
        + f64::from(metrics.memory_usage) * 0.10;
    let score = weighted.round() as u32;

    QualityReport {
        score,
        passed: score >= PASS_SCORE,
        metrics,
        warnings,
        suggestions,
    }
}

fn clamp_score(value: i32) -> u32 {
    value.clamp(0, 100) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_reply_passes() {
        let report = evaluate_emotional_quality(
            "Te escucho. Tiene sentido sentirse así. Aquí estoy contigo.",
            false,
        );
        assert_eq!(report.metrics.presence, 70);
        assert_eq!(report.metrics.empathy, 100);
        // 25 + 25 + 14 + 20 + 10
        assert_eq!(report.score, 94);
        assert!(report.passed);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_judgmental_reply_fails() {
        let report = evaluate_emotional_quality(
            "Simplemente deberías dejarlo. Tienes que entender que no es para tanto, como te dije.",
            false,
        );
        assert_eq!(report.metrics.empathy, 60);
        assert_eq!(report.metrics.no_judgment, 50);
        assert_eq!(report.metrics.presence, 35);
        assert!(!report.passed);
        assert!(report.warnings.iter().any(|w| w.contains("Juicio detectado")));
    }

    #[test]
    fn test_ai_language_and_length_penalties() {
        let report = evaluate_emotional_quality("Soy una IA.", false);
        assert_eq!(report.metrics.naturalness, 55);
        assert!(report.warnings.contains(&"Respuesta muy corta".to_string()));
    }

    #[test]
    fn test_memory_usage() {
        let dated = evaluate_emotional_quality("Recuerdo que el 9 de enero estabas mal.", true);
        assert_eq!(dated.metrics.memory_usage, 30);

        let implicit = evaluate_emotional_quality("Me contaste que esto te pesa hace rato.", true);
        assert_eq!(implicit.metrics.memory_usage, 100);

        let unused = evaluate_emotional_quality("Aquí estoy contigo, sin prisa.", true);
        assert_eq!(unused.metrics.memory_usage, 70);
    }
}
