//! System prompt assembly.
//!
//! `CONTENCION` turns get the dedicated containment prompt. Every other
//! mode gets its blocking-rule block followed by the integrated identity
//! prompt.

pub mod contencion;
pub mod integrated;
pub mod master;
pub mod profile;

use once_cell::sync::Lazy;

use crate::detection::emotional::EmotionalAnalysis;
use crate::detection::matcher::{Normalization, PatternMatcher, PhraseMatcher};
use crate::router::{mode_instructions, ConversationalMode, ModeRules};

pub use contencion::generate_contencion_prompt;
pub use integrated::{
    autonomy_instructions, generate_integrated_prompt, relapse_handling_instructions,
};
pub use master::MASTER_PROMPT;
pub use profile::{extract_user_profile, UserProfile};

static RELAPSE_MARKERS: Lazy<PhraseMatcher> =
    Lazy::new(|| PhraseMatcher::new(&["recaí", "volví a"], Normalization::Lowercase));

static DEPENDENCY_MARKERS: Lazy<PhraseMatcher> = Lazy::new(|| {
    PhraseMatcher::new(&["solo tú me entiendes", "solo contigo"], Normalization::Lowercase)
});

/// Everything the assembler needs about the current turn.
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub urban_level: u8,
    pub profile: Option<&'a UserProfile>,
    pub memory_context: &'a str,
    pub analysis: &'a EmotionalAnalysis,
    pub message: &'a str,
}

/// Build the system prompt for a turn under the given mode rules.
///
/// Memory is only rendered when the analysis allows recall.
pub fn assemble_system_prompt(rules: &ModeRules, ctx: &PromptContext<'_>) -> String {
    if rules.mode == ConversationalMode::Contencion {
        return generate_contencion_prompt(ctx.urban_level);
    }

    let memory_context = if ctx.analysis.allow_memory_recall {
        ctx.memory_context
    } else {
        ""
    };
    let base = generate_integrated_prompt(
        ctx.urban_level,
        ctx.profile,
        memory_context,
        Some(ctx.analysis),
    );

    let mut prompt = format!(
        "{}\n\n=== CONTEXTO E IDENTIDAD ===\n{}",
        mode_instructions(rules),
        base
    );
    if RELAPSE_MARKERS.matches(ctx.message) {
        prompt.push_str(relapse_handling_instructions());
    }
    if DEPENDENCY_MARKERS.matches(ctx.message) {
        prompt.push_str(autonomy_instructions());
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::emotional::detect_emotional_state;
    use crate::router::get_mode_rules;

    fn context<'a>(analysis: &'a EmotionalAnalysis, message: &'a str) -> PromptContext<'a> {
        PromptContext {
            urban_level: 50,
            profile: None,
            memory_context: "- Está escribiendo un libro",
            analysis,
            message,
        }
    }

    #[test]
    fn test_contencion_uses_exclusive_prompt() {
        let analysis = EmotionalAnalysis::crisis();
        let rules = get_mode_rules(ConversationalMode::Contencion);
        let prompt = assemble_system_prompt(&rules, &context(&analysis, "no puedo más"));
        assert_eq!(prompt, generate_contencion_prompt(50));
        assert!(!prompt.contains("=== CONTEXTO E IDENTIDAD ==="));
    }

    #[test]
    fn test_mode_block_precedes_identity() {
        let analysis = detect_emotional_state("Hola");
        let rules = get_mode_rules(ConversationalMode::Informativo);
        let prompt = assemble_system_prompt(&rules, &context(&analysis, "Hola"));
        let mode = prompt.find("🎯 MODO ACTIVO: INFORMATIVO").unwrap();
        let header = prompt.find("=== CONTEXTO E IDENTIDAD ===").unwrap();
        assert!(mode < header);
        assert!(prompt.contains("Está escribiendo un libro"));
    }

    #[test]
    fn test_memory_withheld_when_recall_disallowed() {
        let analysis = detect_emotional_state("Estoy triste, deprimido y me siento vacío");
        assert!(!analysis.allow_memory_recall);
        let rules = get_mode_rules(ConversationalMode::Acompanamiento);
        let prompt = assemble_system_prompt(&rules, &context(&analysis, "triste"));
        assert!(!prompt.contains("Está escribiendo un libro"));
        assert!(prompt.contains("NO TRAER MEMORIA"));
    }

    #[test]
    fn test_relapse_and_autonomy_blocks() {
        let analysis = detect_emotional_state("Hola");
        let rules = get_mode_rules(ConversationalMode::Orientacion);

        let prompt = assemble_system_prompt(&rules, &context(&analysis, "Recaí otra vez"));
        assert!(prompt.contains("# MANEJO DE RECAÍDAS"));
        assert!(!prompt.contains("# PROMOVER AUTONOMÍA"));

        let prompt = assemble_system_prompt(&rules, &context(&analysis, "Solo tú me entiendes"));
        assert!(prompt.contains("# PROMOVER AUTONOMÍA"));
    }
}
