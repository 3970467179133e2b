//! Rule checks over a generated response.

use serde::Serialize;

use crate::router::{ConversationalMode, ModeRules};
use crate::utilities::string_utils::count_char;

/// Phrases that break containment, matched as lowercase substrings.
pub const CONTENCION_FORBIDDEN_PHRASES: &[&str] = &[
    "encontrar una solución",
    "encontrar soluciones",
    "ver si podemos ayudar",
    "hablar de hábitos",
    "hablar de tus hábitos",
    "qué ha pasado recientemente",
    "hay algo en particular",
    "entiendo, es difícil",
];

pub const MEDICAL_REFERRAL_TERMS: &[&str] = &["médico", "doctor", "profesional"];

/// Outcome of a rule check. Every violation is reported; checks never short-circuit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<String>,
}

impl ValidationResult {
    fn from_violations(violations: Vec<String>) -> Self {
        Self {
            valid: violations.is_empty(),
            violations,
        }
    }
}

/// Check `response` against the question cap and, in `CONTENCION`, the
/// forbidden phrase and medical referral tables.
pub fn validate_response(response: &str, rules: &ModeRules) -> ValidationResult {
    let mut violations = Vec::new();

    let questions = count_char(response, '?');
    if questions > rules.max_questions {
        violations.push(format!(
            "Excede máximo de preguntas: {} > {}",
            questions, rules.max_questions
        ));
    }

    if rules.mode == ConversationalMode::Contencion {
        let lower = response.to_lowercase();

        for phrase in CONTENCION_FORBIDDEN_PHRASES {
            if lower.contains(phrase) {
                violations.push(format!("Frase prohibida en CONTENCIÓN: \"{phrase}\""));
            }
        }

        if MEDICAL_REFERRAL_TERMS.iter().any(|term| lower.contains(term)) {
            violations.push("Derivación médica prohibida en CONTENCIÓN".to_string());
        }
    }

    ValidationResult::from_violations(violations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::get_mode_rules;

    #[test]
    fn test_question_cap() {
        let rules = get_mode_rules(ConversationalMode::Acompanamiento);
        let result = validate_response("¿Cómo estás? ¿Dormiste? ¿Comiste?", &rules);
        assert!(!result.valid);
        assert_eq!(result.violations, vec!["Excede máximo de preguntas: 3 > 2"]);

        let result = validate_response("¿Cómo estás? ¿Dormiste?", &rules);
        assert!(result.valid);
    }

    #[test]
    fn test_contencion_collects_every_violation() {
        let rules = get_mode_rules(ConversationalMode::Contencion);
        let result = validate_response(
            "Entiendo, es difícil. Podemos encontrar una solución. ¿Fuiste al médico?",
            &rules,
        );
        assert!(!result.valid);
        assert_eq!(result.violations.len(), 4);
        assert!(result.violations[0].starts_with("Excede máximo de preguntas: 1 > 0"));
        assert!(result
            .violations
            .contains(&"Frase prohibida en CONTENCIÓN: \"encontrar una solución\"".to_string()));
        assert!(result
            .violations
            .contains(&"Derivación médica prohibida en CONTENCIÓN".to_string()));
    }

    #[test]
    fn test_phrases_only_checked_in_contencion() {
        let rules = get_mode_rules(ConversationalMode::Orientacion);
        let result = validate_response("Podemos encontrar una solución con un médico.", &rules);
        assert!(result.valid);
        assert!(result.violations.is_empty());
    }
}
