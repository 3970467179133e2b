//! Voice emotion label and synthesis profile.
//!
//! The label is a coarser, speech-oriented reading of the user's text:
//! keyword scores nudged by punctuation and shouting. An external
//! synthesizer consumes the matching [`VoiceProfile`].

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utilities::string_utils::count_char;

static SHOUTED_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]{2,}").unwrap());

/// How many trailing user messages feed the conversation-level label.
pub const CONVERSATION_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceEmotion {
    Happy,
    Sad,
    Anxious,
    Calm,
    Angry,
    Excited,
    Neutral,
}

impl VoiceEmotion {
    /// Score order; on equal scores the earlier label wins.
    pub const ALL: [VoiceEmotion; 7] = [
        VoiceEmotion::Happy,
        VoiceEmotion::Sad,
        VoiceEmotion::Anxious,
        VoiceEmotion::Calm,
        VoiceEmotion::Angry,
        VoiceEmotion::Excited,
        VoiceEmotion::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceEmotion::Happy => "happy",
            VoiceEmotion::Sad => "sad",
            VoiceEmotion::Anxious => "anxious",
            VoiceEmotion::Calm => "calm",
            VoiceEmotion::Angry => "angry",
            VoiceEmotion::Excited => "excited",
            VoiceEmotion::Neutral => "neutral",
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            VoiceEmotion::Happy => &[
                "feliz", "alegre", "contento", "bien", "excelente", "maravilloso", "genial",
                "me encanta", "perfecto", "chévere", "qué bueno", "súper", "bacano", "qué chimba",
                "qué nota", "happy", "good", "great", "awesome", "amazing",
            ],
            VoiceEmotion::Sad => &[
                "triste", "deprimido", "infeliz", "mal", "terrible", "horrible", "llorar",
                "lágrimas", "dolor", "sufrir", "desesperado", "bajón", "está duro", "me siento mal",
                "qué pena", "qué maluco", "qué tristeza", "sad", "depressed", "down",
            ],
            VoiceEmotion::Anxious => &[
                "ansioso", "nervioso", "preocupado", "asustado", "miedo", "pánico", "estrés",
                "tenso", "inquieto", "estresado", "me estresa", "me da miedo", "qué nervios",
                "qué ansiedad", "qué angustia", "no puedo más", "anxious", "worried", "scared",
            ],
            VoiceEmotion::Calm => &[
                "tranquilo", "sereno", "relajado", "cómodo", "estable", "equilibrado",
                "todo bien", "todo tranqui", "estoy en paz", "sin estrés", "todo suave", "calm",
                "relaxed", "chill", "at peace",
            ],
            VoiceEmotion::Angry => &[
                "enojado", "furioso", "irritado", "molesto", "rabia", "ira", "frustrado",
                "indignado", "me saca de quicio", "qué rabia", "me tiene harto", "estoy que exploto",
                "angry", "furious", "annoyed", "pissed",
            ],
            VoiceEmotion::Excited => &[
                "emocionado", "entusiasmado", "eufórico", "increíble", "fascinante", "qué emoción",
                "qué locura", "no lo puedo creer", "estoy súper emocionado", "qué berraquera",
                "excited", "thrilled", "pumped", "stoked",
            ],
            VoiceEmotion::Neutral => &[],
        }
    }

    pub fn profile(&self) -> VoiceProfile {
        let (rate, pitch, volume, description) = match self {
            VoiceEmotion::Happy => (1.15, 1.25, 0.95, "Voz alegre, animada y optimista con energía positiva"),
            VoiceEmotion::Sad => (0.75, 0.85, 0.75, "Voz tranquila, empática y comprensiva con calidez"),
            VoiceEmotion::Anxious => (0.95, 1.0, 0.8, "Voz calmante, tranquilizadora y estable"),
            VoiceEmotion::Calm => (0.9, 0.95, 0.85, "Voz serena, equilibrada y relajante"),
            VoiceEmotion::Angry => (0.9, 1.0, 0.8, "Voz comprensiva, calmante y empática"),
            VoiceEmotion::Excited => (1.25, 1.35, 1.0, "Voz entusiasta, energética y contagiosa"),
            VoiceEmotion::Neutral => (1.0, 1.0, 0.9, "Voz natural, equilibrada y conversacional"),
        };
        VoiceProfile {
            emotion: *self,
            rate,
            pitch,
            volume,
            description,
        }
    }

    fn index(&self) -> usize {
        match self {
            VoiceEmotion::Happy => 0,
            VoiceEmotion::Sad => 1,
            VoiceEmotion::Anxious => 2,
            VoiceEmotion::Calm => 3,
            VoiceEmotion::Angry => 4,
            VoiceEmotion::Excited => 5,
            VoiceEmotion::Neutral => 6,
        }
    }
}

impl fmt::Display for VoiceEmotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Speech parameters for one label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceProfile {
    pub emotion: VoiceEmotion,
    /// Speaking rate, 0.5..=2.0.
    pub rate: f64,
    /// Pitch multiplier, 0.5..=2.0.
    pub pitch: f64,
    /// Volume, 0.0..=1.0.
    pub volume: f64,
    pub description: &'static str,
}

/// Label a single text.
pub fn detect_voice_emotion(text: &str) -> VoiceEmotion {
    let lower = text.to_lowercase();
    let mut scores = [0.0_f64; 7];

    for emotion in VoiceEmotion::ALL {
        scores[emotion.index()] = emotion
            .keywords()
            .iter()
            .filter(|k| lower.contains(*k))
            .count() as f64;
    }

    let exclamations = count_char(text, '!') as f64;
    let questions = count_char(text, '?') as f64;
    let shouted = SHOUTED_RUN.find_iter(text).count() as f64;

    if exclamations > 0.0 {
        scores[VoiceEmotion::Excited.index()] += exclamations * 0.5;
        scores[VoiceEmotion::Happy.index()] += exclamations * 0.3;
    }
    if questions > 1.0 {
        scores[VoiceEmotion::Anxious.index()] += questions * 0.3;
    }
    if shouted > 0.0 {
        scores[VoiceEmotion::Excited.index()] += shouted * 0.4;
        scores[VoiceEmotion::Angry.index()] += shouted * 0.3;
    }

    let mut detected = VoiceEmotion::Neutral;
    let mut max_score = 0.0;
    for emotion in VoiceEmotion::ALL {
        let score = scores[emotion.index()];
        if score > max_score {
            max_score = score;
            detected = emotion;
        }
    }
    detected
}

/// Label plus its synthesis profile.
pub fn voice_profile(text: &str) -> VoiceProfile {
    detect_voice_emotion(text).profile()
}

/// Conversation-level label from the user's own messages, oldest first.
///
/// Only the last five count; the i-th of them (1-based) is repeated i times
/// so the most recent message weighs most.
pub fn analyze_conversation_emotion(user_messages: &[&str]) -> VoiceEmotion {
    if user_messages.is_empty() {
        return VoiceEmotion::Neutral;
    }

    let start = user_messages.len().saturating_sub(CONVERSATION_WINDOW);
    let weighted: Vec<&str> = user_messages[start..]
        .iter()
        .enumerate()
        .flat_map(|(i, text)| std::iter::repeat(*text).take(i + 1))
        .collect();

    detect_voice_emotion(&weighted.join(" "))
}
