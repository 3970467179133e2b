//! Wire types for the chat and analysis endpoints (camelCase JSON).

use serde::{Deserialize, Serialize};

use crate::detection::crisis::{CrisisCategory, CrisisDetectionResult, Severity};
use crate::detection::emotional::EmotionalAnalysis;
use crate::detection::relevance::MemoryType;
use crate::detection::resources::EmergencyResources;
use crate::detection::voice::{VoiceEmotion, VoiceProfile};
use crate::router::{ConversationalMode, ModeRules};

// ============================================================================
// Requests
// ============================================================================

/// Who wrote a history message. `leo` is accepted for the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    #[serde(alias = "leo")]
    Assistant,
}

/// One earlier message of the conversation, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryMessage {
    pub sender: Sender,
    pub text: String,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl HistoryMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            timestamp: None,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            text: text.into(),
            timestamp: None,
        }
    }
}

/// Incoming chat turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_history: Vec<HistoryMessage>,
    #[serde(default)]
    pub user_id: Option<String>,
    /// 0..=100; wider integers are accepted so range errors reach validation.
    #[serde(default)]
    pub urban_level: Option<i64>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Non-blank user id, if any.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }

    /// Texts of the user's own history messages, oldest first.
    pub fn user_history(&self) -> Vec<&str> {
        user_texts(&self.conversation_history)
    }
}

/// Message to analyze, with optional history for topic repetition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_history: Vec<HistoryMessage>,
}

impl AnalyzeRequest {
    pub fn user_history(&self) -> Vec<&str> {
        user_texts(&self.conversation_history)
    }
}

fn user_texts(history: &[HistoryMessage]) -> Vec<&str> {
    history
        .iter()
        .filter(|m| m.sender == Sender::User)
        .map(|m| m.text.as_str())
        .collect()
}

// ============================================================================
// Responses
// ============================================================================

/// Crisis details attached to a reply when a crisis was detected.
#[derive(Debug, Clone, Serialize)]
pub struct CrisisInfo {
    pub severity: Severity,
    pub category: CrisisCategory,
    pub resources: EmergencyResources,
}

/// Reply to a chat turn.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub text: String,
    /// Conversation-level emotion label for speech synthesis.
    pub emotion: VoiceEmotion,
    pub voice_profile: VoiceProfile,
    pub mode: ConversationalMode,
    pub crisis_detected: bool,
    pub crisis_info: Option<CrisisInfo>,
}

/// Result of the analysis-only endpoint. No generation involved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub crisis: CrisisDetectionResult,
    pub emotional: EmotionalAnalysis,
    pub mode: ConversationalMode,
    pub rules: ModeRules,
    pub relevance: f64,
    pub memory_type: MemoryType,
}
