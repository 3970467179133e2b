//! Post-generation guardrails.
//!
//! A raw reply is validated against the active mode's rules. Only a reply
//! with violations is post-processed, and processed text that fails the
//! coherence check is discarded in favour of the raw reply.

pub mod post_processor;
pub mod quality;
pub mod validator;

use crate::router::ModeRules;

pub use post_processor::{
    post_process_response, validate_processed_response, CoherenceReport, Modification,
    PostProcessResult,
};
pub use quality::{evaluate_emotional_quality, QualityMetrics, QualityReport};
pub use validator::{validate_response, ValidationResult};

/// Final reply plus the audit trail of how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnforcedResponse {
    pub text: String,
    pub violations: Vec<String>,
    pub modifications: Vec<Modification>,
    /// Post-processing ran but its output failed the coherence check.
    pub fell_back: bool,
}

/// Validate, repair if needed, and fall back to the raw reply when the
/// repair is incoherent.
pub fn enforce_mode_rules(raw: &str, rules: &ModeRules) -> EnforcedResponse {
    let validation = validate_response(raw, rules);
    if validation.valid {
        return EnforcedResponse {
            text: raw.to_string(),
            violations: Vec::new(),
            modifications: Vec::new(),
            fell_back: false,
        };
    }

    log::debug!("Rule violations in {} mode: {:?}", rules.mode, validation.violations);
    let processed = post_process_response(raw, rules);
    let coherence = validate_processed_response(&processed.processed_response);

    if coherence.valid {
        EnforcedResponse {
            text: processed.processed_response,
            violations: validation.violations,
            modifications: processed.modifications_applied,
            fell_back: false,
        }
    } else {
        log::warn!(
            "Post-processed reply failed coherence check ({:?}); using raw reply",
            coherence.issues
        );
        EnforcedResponse {
            text: raw.to_string(),
            violations: validation.violations,
            modifications: Vec::new(),
            fell_back: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::{get_mode_rules, ConversationalMode};

    #[test]
    fn test_compliant_reply_passes_through() {
        let rules = get_mode_rules(ConversationalMode::Contencion);
        let reply = "Te escucho. Sentirse así es válido. Aquí estoy contigo.";
        let enforced = enforce_mode_rules(reply, &rules);
        assert_eq!(enforced.text, reply);
        assert!(enforced.violations.is_empty());
        assert!(!enforced.fell_back);
    }

    #[test]
    fn test_violating_reply_is_repaired() {
        let rules = get_mode_rules(ConversationalMode::Contencion);
        let reply = "Eso suena a cansancio profundo. Aquí estoy contigo. ¿Quieres contarme más?";
        let enforced = enforce_mode_rules(reply, &rules);
        assert_eq!(enforced.text, "Eso suena a cansancio profundo. Aquí estoy contigo.");
        assert_eq!(enforced.violations.len(), 1);
        assert_eq!(enforced.modifications.len(), 1);
        assert!(!enforced.fell_back);
    }

    #[test]
    fn test_incoherent_repair_falls_back_to_raw() {
        let rules = get_mode_rules(ConversationalMode::Contencion);
        // The repaired "¿Cómo estás." is too short to keep.
        let reply = "¿Cómo estás?";
        let enforced = enforce_mode_rules(reply, &rules);
        assert_eq!(enforced.text, reply);
        assert!(enforced.fell_back);
        assert!(enforced.modifications.is_empty());
    }
}
