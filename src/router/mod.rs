//! Conversational mode routing.
//!
//! The mode is chosen afresh on every turn from the current message's
//! analysis alone. No previous mode is carried between turns.

pub mod rules;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::detection::emotional::{EmotionalAnalysis, EmotionalState, Intensity};

pub use rules::{get_mode_rules, mode_instructions, ModeRules};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConversationalMode {
    /// Hold the moment: no questions, advice, referrals or topic changes.
    Contencion,
    /// Validate, with gentle guidance only if asked.
    Acompanamiento,
    /// Advice and options allowed.
    Orientacion,
    /// Direct answers.
    Informativo,
}

impl ConversationalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationalMode::Contencion => "CONTENCION",
            ConversationalMode::Acompanamiento => "ACOMPANAMIENTO",
            ConversationalMode::Orientacion => "ORIENTACION",
            ConversationalMode::Informativo => "INFORMATIVO",
        }
    }

    pub fn rules(&self) -> ModeRules {
        get_mode_rules(*self)
    }
}

impl fmt::Display for ConversationalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First matching rule wins:
///
/// 1. crisis, exhaustion, or containment at high intensity → `Contencion`
/// 2. validation needed above low intensity → `Acompanamiento`
/// 3. happy, hopeful, or low intensity → `Orientacion`
/// 4. otherwise → `Informativo`
pub fn select_conversational_mode(analysis: &EmotionalAnalysis) -> ConversationalMode {
    if analysis.state == EmotionalState::Crisis
        || analysis.is_exhausted
        || (analysis.needs_containment && analysis.intensity == Intensity::High)
    {
        ConversationalMode::Contencion
    } else if analysis.needs_validation && analysis.intensity != Intensity::Low {
        ConversationalMode::Acompanamiento
    } else if matches!(analysis.state, EmotionalState::Happy | EmotionalState::Hopeful)
        || analysis.intensity == Intensity::Low
    {
        ConversationalMode::Orientacion
    } else {
        ConversationalMode::Informativo
    }
}
