//! Response post-processing: question capping and phrase surgery.
//!
//! Applying the processor to its own output is a no-op.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::router::{ConversationalMode, ModeRules};
use crate::utilities::string_utils::{count_char, truncate_chars};

/// Containment phrase → replacement, applied in table order.
pub const PHRASE_REPLACEMENTS: &[(&str, &str)] = &[
    ("encontrar una solución", "estar aquí contigo"),
    ("encontrar soluciones", "acompañarte"),
    ("ver si podemos ayudar", "escucharte"),
    ("hablar de hábitos", "quedarnos aquí un momento"),
    ("hablar de tus hábitos", "quedarnos aquí un momento"),
    ("Entiendo, es difícil", "Te escucho"),
    ("buscar formas de aliviar", "estar contigo"),
    ("identificar juntos posibles causas", "escucharte"),
];

/// Medical referral pattern → softer alternative.
pub const MEDICAL_REFERRAL_PATTERNS: &[(&str, &str)] = &[
    (r"consulta(r)? (con )?un médico", "toma tu tiempo"),
    (r"habla(r)? (con )?un doctor", "descansa"),
    (r"busca(r)? ayuda profesional", "cuídate"),
    (r"ve(r)? (a )?un especialista", "toma tu tiempo"),
];

const MIN_COHERENT_CHARS: usize = 20;

static PHRASE_REGEXES: Lazy<Vec<(Regex, &'static str, &'static str)>> = Lazy::new(|| {
    PHRASE_REPLACEMENTS
        .iter()
        .map(|(phrase, replacement)| {
            let re = Regex::new(&format!("(?i){}", regex::escape(phrase))).unwrap();
            (re, *phrase, *replacement)
        })
        .collect()
});

static MEDICAL_REGEXES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    MEDICAL_REFERRAL_PATTERNS
        .iter()
        .map(|(pattern, replacement)| {
            (Regex::new(&format!("(?i){pattern}")).unwrap(), *replacement)
        })
        .collect()
});

// ============================================================================
// Results
// ============================================================================

/// One change made to a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modification {
    /// A question clause beyond the cap (trimmed, with its `?`).
    QuestionRemoved(String),
    PhraseReplaced {
        phrase: &'static str,
        replacement: &'static str,
    },
    MedicalReferralRemoved,
}

impl fmt::Display for Modification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modification::QuestionRemoved(question) => {
                let preview = truncate_chars(question, 50);
                let ellipsis = if question.chars().count() > 50 { "..." } else { "" };
                write!(f, "Eliminada pregunta extra: \"{preview}{ellipsis}\"")
            }
            Modification::PhraseReplaced {
                phrase,
                replacement,
            } => write!(f, "Reemplazada frase prohibida: \"{phrase}\" → \"{replacement}\""),
            Modification::MedicalReferralRemoved => f.write_str("Eliminada derivación médica"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostProcessResult {
    pub processed_response: String,
    pub modifications_applied: Vec<Modification>,
}

/// Coherence flags raised on post-processed text. Never auto-fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoherenceReport {
    pub valid: bool,
    pub issues: Vec<String>,
}

// ============================================================================
// Processing
// ============================================================================

/// Cap questions at `rules.max_questions`, then in `CONTENCION` replace
/// forbidden phrases and strip medical referrals.
pub fn post_process_response(response: &str, rules: &ModeRules) -> PostProcessResult {
    let mut modifications = Vec::new();
    let mut processed = response.to_string();

    let question_count = count_char(response, '?');
    log::debug!(
        "Post-processing: {} question(s), {} allowed",
        question_count,
        rules.max_questions
    );

    if question_count > rules.max_questions {
        let (text, removed) = remove_extra_questions(response, rules.max_questions);
        log::debug!("Removed {} question(s)", removed.len());
        processed = text;
        modifications.extend(removed.into_iter().map(Modification::QuestionRemoved));
    }

    if rules.mode == ConversationalMode::Contencion {
        processed = replace_forbidden_phrases(&processed, &mut modifications);
    }

    PostProcessResult {
        processed_response: processed,
        modifications_applied: modifications,
    }
}

/// Keep the first `max_questions` question-marked segments and cut the
/// question clause out of every later one.
///
/// A cut segment keeps its text up to the last `.`, `!` or newline. With no
/// such boundary its trimmed text is kept as a statement ending in `.`.
fn remove_extra_questions(text: &str, max_questions: usize) -> (String, Vec<String>) {
    let parts: Vec<&str> = text.split('?').collect();
    let last = parts.len() - 1;
    let mut out = String::with_capacity(text.len());
    let mut removed = Vec::new();
    let mut kept = 0;

    for (i, part) in parts.iter().enumerate() {
        if i == last {
            append(&mut out, part);
            continue;
        }

        if kept < max_questions {
            append(&mut out, part);
            out.push('?');
            kept += 1;
            continue;
        }

        match part.rfind(['.', '!', '\n']) {
            Some(boundary) => {
                removed.push(format!("{}?", part[boundary + 1..].trim()));
                append(&mut out, &part[..=boundary]);
                out.push(' ');
            }
            None => {
                let clause = part.trim();
                removed.push(format!("{clause}?"));
                if !clause.is_empty() {
                    if !out.is_empty() && !out.ends_with(char::is_whitespace) {
                        out.push(' ');
                    }
                    out.push_str(clause);
                    out.push_str(". ");
                }
            }
        }
    }

    (out.trim().to_string(), removed)
}

/// Append a segment without doubling whitespace at the seam.
fn append(out: &mut String, piece: &str) {
    if out.is_empty() || out.ends_with(char::is_whitespace) {
        out.push_str(piece.trim_start());
    } else {
        out.push_str(piece);
    }
}

fn replace_forbidden_phrases(text: &str, modifications: &mut Vec<Modification>) -> String {
    let mut result = text.to_string();

    for (re, phrase, replacement) in PHRASE_REGEXES.iter() {
        if re.is_match(&result) {
            result = re.replace_all(&result, *replacement).into_owned();
            log::debug!("Reemplazada frase prohibida: \"{phrase}\" → \"{replacement}\"");
            modifications.push(Modification::PhraseReplaced {
                phrase: *phrase,
                replacement: *replacement,
            });
        }
    }

    for (re, replacement) in MEDICAL_REGEXES.iter() {
        if re.is_match(&result) {
            result = re.replace_all(&result, *replacement).into_owned();
            log::debug!("Eliminada derivación médica");
            modifications.push(Modification::MedicalReferralRemoved);
        }
    }

    result
}

/// Flag empty, unterminated or too-short processed text.
pub fn validate_processed_response(response: &str) -> CoherenceReport {
    let trimmed = response.trim();
    let mut issues = Vec::new();

    if trimmed.is_empty() {
        issues.push("Respuesta vacía después del post-procesamiento".to_string());
    }
    if !trimmed.ends_with(['.', '!', '?']) {
        issues.push("Respuesta no termina con puntuación adecuada".to_string());
    }
    if trimmed.chars().count() < MIN_COHERENT_CHARS {
        issues.push("Respuesta demasiado corta después del post-procesamiento".to_string());
    }

    CoherenceReport {
        valid: issues.is_empty(),
        issues,
    }
}
