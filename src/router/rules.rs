//! Per-mode blocking rules and the prompt text that states them.

use std::fmt::Write as _;

use serde::Serialize;

use super::ConversationalMode;

/// Fixed rule set of one conversational mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeRules {
    pub mode: ConversationalMode,
    pub max_questions: usize,
    pub allow_advice: bool,
    pub allow_medical_referral: bool,
    pub allow_topic_change: bool,
    pub required_structure: &'static [&'static str],
    pub objective: &'static str,
}

const CONTENCION_RULES: ModeRules = ModeRules {
    mode: ConversationalMode::Contencion,
    max_questions: 0,
    allow_advice: false,
    allow_medical_referral: false,
    allow_topic_change: false,
    required_structure: &[
        "Reflejo emocional específico",
        "Normalización humana",
        "Presencia sin prisa (SIN preguntas)",
    ],
    objective: "Sostener el momento sin moverlo. El usuario NO está pidiendo ideas nuevas, está pidiendo descansar de luchar un rato.",
};

const ACOMPANAMIENTO_RULES: ModeRules = ModeRules {
    mode: ConversationalMode::Acompanamiento,
    max_questions: 2,
    allow_advice: true,
    allow_medical_referral: false,
    allow_topic_change: false,
    required_structure: &[
        "Validación emocional",
        "Normalización",
        "Orientación suave (opcional)",
        "Presencia",
    ],
    objective: "Validar y acompañar con orientación suave si el usuario lo pide.",
};

const ORIENTACION_RULES: ModeRules = ModeRules {
    mode: ConversationalMode::Orientacion,
    max_questions: 3,
    allow_advice: true,
    allow_medical_referral: true,
    allow_topic_change: true,
    required_structure: &[
        "Reconocimiento",
        "Orientación clara",
        "Opciones concretas",
        "Cierre acompañante",
    ],
    objective: "Orientar con claridad manteniendo esperanza realista.",
};

const INFORMATIVO_RULES: ModeRules = ModeRules {
    mode: ConversationalMode::Informativo,
    max_questions: 2,
    allow_advice: true,
    allow_medical_referral: true,
    allow_topic_change: true,
    required_structure: &["Respuesta directa", "Contexto relevante", "Cierre"],
    objective: "Informar de forma clara y útil.",
};

/// Rule table lookup.
pub fn get_mode_rules(mode: ConversationalMode) -> ModeRules {
    match mode {
        ConversationalMode::Contencion => CONTENCION_RULES,
        ConversationalMode::Acompanamiento => ACOMPANAMIENTO_RULES,
        ConversationalMode::Orientacion => ORIENTACION_RULES,
        ConversationalMode::Informativo => INFORMATIVO_RULES,
    }
}

const CONTENCION_BLOCK: &str = r#"
⚠️ MODO CONTENCIÓN ACTIVADO

El usuario está en dolor o agotamiento. Tu rol NO es avanzar la conversación ni resolver.
Tu rol es SOSTENER EL MOMENTO sin moverlo.

🚫 PROHIBIDO ABSOLUTO:
- CERO PREGUNTAS. Cada pregunta rompe la contención.
- Frases como "encontrar una solución", "ver si podemos ayudar", "hablar de hábitos"
- Consejos médicos
- Cambiar a hobbies o distracciones
- Validaciones genéricas como "Entiendo, es difícil"

OBLIGATORIO:
- Reflejar la emoción CONCRETA del usuario (no plantillas)
- Nombrar el agotamiento explícitamente
- Presencia constante sin prisa
- Lenguaje humano, no clínico

EJEMPLOS CORRECTOS (SIN PREGUNTAS):

Usuario: "Me siento mal"
✅ "Parce, te escucho. Sentirse mal es heavy."

Usuario: "Me duele el cuerpo, estoy cansado"
✅ "Uy parce, el cuerpo te está cobrando factura. Cansancio y dolor... eso pesa."

EJEMPLO PROHIBIDO:

Usuario: "Me siento mal"
❌ "Entiendo, es difícil cuando no te sientes bien. ¿Quieres hablar un poco sobre lo que te está pasando? ¿Hay algo en particular que te está molestando?"
"#;

const ACOMPANAMIENTO_BLOCK: &str = r#"
MODO ACOMPAÑAMIENTO

El usuario necesita validación pero no está en crisis aguda.
Puedes ofrecer orientación suave SI el usuario la pide.

PRIORIDAD:
1. Validar emoción
2. Normalizar experiencia
3. Orientación solo si es relevante
4. Reforzar presencia

Mantén el equilibrio entre escuchar y orientar.
"#;

fn permitted(allowed: bool, yes: &'static str, no: &'static str) -> &'static str {
    if allowed {
        yes
    } else {
        no
    }
}

/// Prompt block stating the active mode, its objective, structure and rules.
pub fn mode_instructions(rules: &ModeRules) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n🎯 MODO ACTIVO: {}\n", rules.mode);
    let _ = writeln!(out, "OBJETIVO: {}\n", rules.objective);
    out.push_str("ESTRUCTURA OBLIGATORIA:\n");
    for (i, step) in rules.required_structure.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, step);
    }
    out.push_str("\nREGLAS BLOQUEANTES (NO SUGERIDAS):\n");
    let _ = writeln!(
        out,
        "- Máximo {} pregunta(s) en toda la respuesta",
        rules.max_questions
    );
    let _ = writeln!(
        out,
        "- Consejos: {}",
        permitted(rules.allow_advice, "PERMITIDOS", "🚫 PROHIBIDOS")
    );
    let _ = writeln!(
        out,
        "- Derivación médica: {}",
        permitted(rules.allow_medical_referral, "PERMITIDA", "🚫 PROHIBIDA")
    );
    let _ = writeln!(
        out,
        "- Cambio de tema: {}",
        permitted(rules.allow_topic_change, "PERMITIDO", "🚫 PROHIBIDO")
    );

    match rules.mode {
        ConversationalMode::Contencion => out.push_str(CONTENCION_BLOCK),
        ConversationalMode::Acompanamiento => out.push_str(ACOMPANAMIENTO_BLOCK),
        ConversationalMode::Orientacion | ConversationalMode::Informativo => {}
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_table() {
        let rules = get_mode_rules(ConversationalMode::Contencion);
        assert_eq!(rules.max_questions, 0);
        assert!(!rules.allow_advice && !rules.allow_medical_referral && !rules.allow_topic_change);
        assert_eq!(rules.required_structure.len(), 3);

        let rules = get_mode_rules(ConversationalMode::Acompanamiento);
        assert_eq!(rules.max_questions, 2);
        assert!(rules.allow_advice);
        assert!(!rules.allow_medical_referral);
        assert!(!rules.allow_topic_change);

        let rules = get_mode_rules(ConversationalMode::Orientacion);
        assert_eq!(rules.max_questions, 3);
        assert!(rules.allow_advice && rules.allow_medical_referral && rules.allow_topic_change);

        let rules = get_mode_rules(ConversationalMode::Informativo);
        assert_eq!(rules.max_questions, 2);
        assert!(rules.allow_medical_referral);
    }

    #[test]
    fn test_instructions_for_contencion() {
        let text = mode_instructions(&get_mode_rules(ConversationalMode::Contencion));
        assert!(text.contains("🎯 MODO ACTIVO: CONTENCION"));
        assert!(text.contains("1. Reflejo emocional específico"));
        assert!(text.contains("- Máximo 0 pregunta(s) en toda la respuesta"));
        assert!(text.contains("- Consejos: 🚫 PROHIBIDOS"));
        assert!(text.contains("CERO PREGUNTAS"));
    }

    #[test]
    fn test_instructions_for_orientacion() {
        let text = mode_instructions(&get_mode_rules(ConversationalMode::Orientacion));
        assert!(text.contains("- Consejos: PERMITIDOS"));
        assert!(text.contains("- Cambio de tema: PERMITIDO"));
        assert!(text.contains("4. Cierre acompañante"));
        assert!(!text.contains("MODO CONTENCIÓN ACTIVADO"));
        assert!(!text.contains("MODO ACOMPAÑAMIENTO"));
    }
}
