//! Analytics records and the sink that receives them.
//!
//! Records are emitted fire-and-forget from the chat pipeline; a sink
//! failure is logged and never reaches the user.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::detection::crisis::{CrisisCategory, CrisisDetectionResult, Severity};
use crate::detection::emotional::EmotionalAnalysis;
use crate::router::ConversationalMode;
use crate::utilities::errors::StoreError;
use crate::utilities::string_utils::truncate_chars;

const MESSAGE_PREVIEW_CHARS: usize = 100;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A positive crisis detection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrisisActivation {
    pub user_id: Option<String>,
    pub trigger_phrase: String,
    pub category: CrisisCategory,
    pub severity: Severity,
    /// Detection confidence as a 0-100 percentage.
    pub confidence_pct: u8,
    pub user_message: String,
    /// Whether resources were shown in the reply.
    pub responded: bool,
    pub detected_at: DateTime<Utc>,
}

impl CrisisActivation {
    /// `None` unless the detection is positive.
    pub fn from_detection(
        user_id: Option<&str>,
        message: &str,
        detection: &CrisisDetectionResult,
    ) -> Option<Self> {
        if !detection.detected {
            return None;
        }
        Some(Self {
            user_id: user_id.map(str::to_string),
            trigger_phrase: detection.matched_text.unwrap_or_default().to_string(),
            category: detection.category?,
            severity: detection.severity?,
            confidence_pct: (detection.confidence * 100.0).round().clamp(0.0, 100.0) as u8,
            user_message: message.to_string(),
            responded: true,
            detected_at: Utc::now(),
        })
    }
}

/// Per-turn emotional snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionalStateLog {
    pub user_id: String,
    pub message_preview: String,
    pub primary_emotion: String,
    pub needs_containment: bool,
    pub needs_validation: bool,
    pub is_exhausted: bool,
    pub intensity: f64,
    pub valence: f64,
    pub mode: ConversationalMode,
    pub crisis_detected: bool,
    pub crisis_category: Option<CrisisCategory>,
    pub recorded_at: DateTime<Utc>,
}

impl EmotionalStateLog {
    pub fn new(
        user_id: &str,
        message: &str,
        analysis: &EmotionalAnalysis,
        mode: ConversationalMode,
        crisis: &CrisisDetectionResult,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            message_preview: truncate_chars(message, MESSAGE_PREVIEW_CHARS),
            primary_emotion: analysis.state.to_string(),
            needs_containment: analysis.needs_containment,
            needs_validation: analysis.needs_validation,
            is_exhausted: analysis.is_exhausted,
            intensity: analysis.intensity.level(),
            valence: analysis.state.valence(),
            mode,
            crisis_detected: crisis.detected,
            crisis_category: crisis.category,
            recorded_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

/// Destination for analytics records.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn record_crisis(&self, activation: CrisisActivation) -> Result<(), StoreError>;

    async fn record_emotional_state(&self, entry: EmotionalStateLog) -> Result<(), StoreError>;
}

/// Sink that writes records to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

#[async_trait]
impl EventSink for TracingSink {
    async fn record_crisis(&self, activation: CrisisActivation) -> Result<(), StoreError> {
        tracing::warn!(
            user_id = activation.user_id.as_deref().unwrap_or("anonymous"),
            category = %activation.category,
            severity = %activation.severity,
            confidence = activation.confidence_pct,
            trigger = %activation.trigger_phrase,
            "crisis activation"
        );
        Ok(())
    }

    async fn record_emotional_state(&self, entry: EmotionalStateLog) -> Result<(), StoreError> {
        tracing::info!(
            user_id = %entry.user_id,
            emotion = %entry.primary_emotion,
            intensity = entry.intensity,
            valence = entry.valence,
            mode = %entry.mode,
            exhausted = entry.is_exhausted,
            crisis = entry.crisis_detected,
            "emotional state"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::crisis::detect_crisis;
    use crate::detection::emotional::detect_emotional_state;

    #[test]
    fn test_crisis_activation_only_for_positive_detection() {
        let benign = detect_crisis("Hoy fue un buen día");
        assert!(CrisisActivation::from_detection(Some("u1"), "Hoy fue un buen día", &benign).is_none());

        let detection = detect_crisis("quiero morir");
        let activation =
            CrisisActivation::from_detection(Some("u1"), "quiero morir", &detection).unwrap();
        assert_eq!(activation.category, CrisisCategory::Suicide);
        assert_eq!(activation.severity, Severity::Critical);
        assert_eq!(activation.confidence_pct, 90);
        assert_eq!(activation.trigger_phrase, "quiero morir");
        assert!(activation.responded);
    }

    #[test]
    fn test_emotional_state_log_fields() {
        let message = "a".repeat(150);
        let analysis = EmotionalAnalysis::crisis();
        let log = EmotionalStateLog::new(
            "u1",
            &message,
            &analysis,
            ConversationalMode::Contencion,
            &detect_crisis(&message),
        );
        assert_eq!(log.message_preview.chars().count(), 100);
        assert_eq!(log.primary_emotion, "crisis");
        assert_eq!(log.intensity, 1.0);
        assert_eq!(log.valence, -1.0);
        assert!(!log.crisis_detected);

        let happy = detect_emotional_state("Estoy feliz");
        let log = EmotionalStateLog::new(
            "u1",
            "Estoy feliz",
            &happy,
            ConversationalMode::Orientacion,
            &detect_crisis("Estoy feliz"),
        );
        assert_eq!(log.intensity, 0.3);
        assert_eq!(log.valence, 0.7);
    }

    #[tokio::test]
    async fn test_tracing_sink_accepts_records() {
        let sink = TracingSink;
        let detection = detect_crisis("me quiero matar");
        let activation = CrisisActivation::from_detection(None, "me quiero matar", &detection).unwrap();
        assert!(sink.record_crisis(activation).await.is_ok());
    }
}
