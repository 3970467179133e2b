//! The per-turn response governance pipeline.

use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use super::types::{AnalyzeResponse, ChatRequest, ChatResponse, CrisisInfo, Sender};
use crate::detection::crisis::{detect_crisis, CrisisDetectionResult};
use crate::detection::emotional::{detect_emotional_state, EmotionalAnalysis};
use crate::detection::relevance::{
    calculate_emotional_relevance, determine_memory_type, topic_repetition_count,
};
use crate::detection::resources::get_emergency_resources;
use crate::detection::voice::{analyze_conversation_emotion, voice_profile};
use crate::guardrails::{enforce_mode_rules, evaluate_emotional_quality};
use crate::llms::base_llm::{LLMMessage, TextGenerator};
use crate::memory::{InfoCategory, MemoryStore, PersonalInfo};
use crate::prompts::{assemble_system_prompt, extract_user_profile, PromptContext};
use crate::router::{get_mode_rules, select_conversational_mode, ConversationalMode};
use crate::telemetry::{CrisisActivation, EmotionalStateLog, EventSink};
use crate::utilities::config::DialogosConfig;
use crate::utilities::errors::ChatError;

/// Tunables of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineSettings {
    /// Urban level used when the request omits it.
    pub default_urban_level: u8,
    /// Minimum relevance for a message to be stored as memory.
    pub memory_relevance_threshold: f64,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            default_urban_level: 50,
            memory_relevance_threshold: 0.3,
        }
    }
}

impl PipelineSettings {
    pub fn from_config(config: &DialogosConfig) -> Self {
        Self {
            default_urban_level: config.default_urban_level,
            memory_relevance_threshold: config.memory_relevance_threshold,
        }
    }
}

/// Pure analysis of one message, shared by chat turns and `/analyze`.
#[derive(Debug, Clone)]
struct TurnAnalysis {
    crisis: CrisisDetectionResult,
    emotional: EmotionalAnalysis,
    mode: ConversationalMode,
}

impl TurnAnalysis {
    fn of(message: &str) -> Self {
        let crisis = detect_crisis(message);
        let emotional = detect_emotional_state(message);
        let mode = select_conversational_mode(&emotional);
        Self {
            crisis,
            emotional,
            mode,
        }
    }
}

/// Orchestrates analysis, prompt assembly, generation and enforcement.
///
/// Collaborator failures (memory, analytics) are logged and the turn
/// continues. Only a generation failure aborts a turn.
pub struct ChatPipeline {
    generator: Arc<dyn TextGenerator>,
    memory: Arc<dyn MemoryStore>,
    sink: Arc<dyn EventSink>,
    settings: PipelineSettings,
}

impl ChatPipeline {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        memory: Arc<dyn MemoryStore>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            generator,
            memory,
            sink,
            settings: PipelineSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> PipelineSettings {
        self.settings
    }

    /// Run one chat turn.
    pub async fn process(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        let span = tracing::info_span!(
            "turn",
            turn_id = %Uuid::new_v4(),
            mode = tracing::field::Empty
        );
        self.run_turn(request).instrument(span).await
    }

    /// Analysis only: crisis, emotional state, mode and memory scoring.
    ///
    /// `user_history` holds the user's earlier messages. Relevance is scored
    /// exactly as a chat turn would score it.
    pub fn analyze(&self, message: &str, user_history: &[&str]) -> Result<AnalyzeResponse, ChatError> {
        validate_message(message)?;
        let turn = TurnAnalysis::of(message);
        Ok(AnalyzeResponse {
            relevance: memory_relevance(message, user_history, &turn.emotional),
            memory_type: determine_memory_type(message, &turn.emotional),
            rules: get_mode_rules(turn.mode),
            crisis: turn.crisis,
            emotional: turn.emotional,
            mode: turn.mode,
        })
    }

    async fn run_turn(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        validate_message(&request.message)?;
        let urban_level = self.resolve_urban_level(request.urban_level)?;
        let user_id = request.user_id();
        let message = request.message.as_str();

        // ── Step 1: Memory context ──────────────────────────────────────
        let memory_context = match user_id {
            Some(id) => match self.memory.build_user_context(id).await {
                Ok(context) => context,
                Err(e) => {
                    tracing::warn!(error = %e, "memory unavailable, continuing without context");
                    String::new()
                }
            },
            None => String::new(),
        };

        // ── Step 2: Profile from history ────────────────────────────────
        let profile =
            extract_user_profile(request.conversation_history.iter().map(|m| m.text.as_str()));

        // ── Step 3: Crisis + emotional analysis + routing ───────────────
        let turn = TurnAnalysis::of(message);
        tracing::Span::current().record("mode", turn.mode.as_str());

        if let Some(activation) = CrisisActivation::from_detection(user_id, message, &turn.crisis) {
            tracing::warn!(
                category = %activation.category,
                severity = %activation.severity,
                confidence = turn.crisis.confidence,
                "crisis detected"
            );
            let sink = Arc::clone(&self.sink);
            tokio::spawn(async move {
                if let Err(e) = sink.record_crisis(activation).await {
                    tracing::warn!(error = %e, "failed to record crisis activation");
                }
            });
        }

        tracing::debug!(
            state = %turn.emotional.state,
            intensity = %turn.emotional.intensity,
            needs_containment = turn.emotional.needs_containment,
            is_exhausted = turn.emotional.is_exhausted,
            allow_memory_recall = turn.emotional.allow_memory_recall,
            mode = %turn.mode,
            "emotional analysis"
        );

        // ── Step 4: System prompt ───────────────────────────────────────
        let rules = get_mode_rules(turn.mode);
        let system_prompt = assemble_system_prompt(
            &rules,
            &PromptContext {
                urban_level,
                profile: Some(&profile),
                memory_context: &memory_context,
                analysis: &turn.emotional,
                message,
            },
        );
        tracing::trace!(prompt = %system_prompt, "system prompt");

        // ── Step 5: Generate ────────────────────────────────────────────
        let messages = build_messages(system_prompt, request);
        tracing::debug!(
            model = self.generator.model(),
            history = request.conversation_history.len(),
            "requesting completion"
        );
        let raw = self.generator.generate(&messages).await?;

        // ── Step 6: Enforce mode rules ──────────────────────────────────
        let enforced = enforce_mode_rules(&raw, &rules);
        if !enforced.violations.is_empty() {
            tracing::warn!(violations = ?enforced.violations, "reply violated mode rules");
        }
        for modification in &enforced.modifications {
            tracing::debug!(%modification, "post-processing");
        }
        if enforced.fell_back {
            tracing::warn!("post-processed reply discarded, using raw reply");
        }

        let quality = evaluate_emotional_quality(&enforced.text, !memory_context.is_empty());
        tracing::debug!(
            score = quality.score,
            passed = quality.passed,
            warnings = ?quality.warnings,
            "reply quality"
        );

        // ── Step 7: Voice emotion ───────────────────────────────────────
        let emotion = analyze_conversation_emotion(&request.user_history());
        let voice = voice_profile(message);

        // ── Step 8: Memory + analytics (best effort) ────────────────────
        if let Some(id) = user_id {
            self.remember(id, request, &turn.emotional).await;

            let entry = EmotionalStateLog::new(id, message, &turn.emotional, turn.mode, &turn.crisis);
            let sink = Arc::clone(&self.sink);
            tokio::spawn(async move {
                if let Err(e) = sink.record_emotional_state(entry).await {
                    tracing::warn!(error = %e, "failed to record emotional state");
                }
            });
        }

        // ── Step 9: Response ────────────────────────────────────────────
        let crisis_info = match (turn.crisis.severity, turn.crisis.category) {
            (Some(severity), Some(category)) if turn.crisis.detected => Some(CrisisInfo {
                severity,
                category,
                resources: get_emergency_resources(Some(category)),
            }),
            _ => None,
        };

        Ok(ChatResponse {
            text: enforced.text,
            emotion,
            voice_profile: voice,
            mode: turn.mode,
            crisis_detected: turn.crisis.detected,
            crisis_info,
        })
    }

    /// Persist the message as memory when it is relevant enough.
    async fn remember(&self, user_id: &str, request: &ChatRequest, analysis: &EmotionalAnalysis) {
        let relevance = memory_relevance(&request.message, &request.user_history(), analysis);
        if relevance < self.settings.memory_relevance_threshold {
            tracing::debug!(relevance, "memory not saved (below threshold)");
            return;
        }

        let memory_type = determine_memory_type(&request.message, analysis);
        let info = PersonalInfo::new(
            user_id,
            InfoCategory::Other,
            format!("msg_{}", chrono::Utc::now().timestamp_millis()),
            request.message.clone(),
            relevance,
        )
        .with_memory_type(memory_type);

        match self.memory.save_personal_info(info).await {
            Ok(()) => tracing::debug!(relevance, %memory_type, "memory saved"),
            Err(e) => tracing::warn!(error = %e, "failed to save memory, continuing"),
        }
    }

    fn resolve_urban_level(&self, requested: Option<i64>) -> Result<u8, ChatError> {
        match requested {
            None => Ok(self.settings.default_urban_level),
            Some(level) => u8::try_from(level)
                .ok()
                .filter(|l| *l <= 100)
                .ok_or_else(|| {
                    ChatError::InvalidRequest(format!("urbanLevel must be within 0..=100, got {level}"))
                }),
        }
    }
}

/// Relevance of a message, with repetition measured over the user's history.
fn memory_relevance(message: &str, user_history: &[&str], analysis: &EmotionalAnalysis) -> f64 {
    let repetition = topic_repetition_count(message, user_history);
    calculate_emotional_relevance(message, analysis, repetition)
}

fn validate_message(message: &str) -> Result<(), ChatError> {
    if message.trim().is_empty() {
        return Err(ChatError::InvalidRequest("message must not be empty".into()));
    }
    Ok(())
}

/// System prompt, then history in order, then the current message.
fn build_messages(system_prompt: String, request: &ChatRequest) -> Vec<LLMMessage> {
    let mut messages = Vec::with_capacity(request.conversation_history.len() + 2);
    messages.push(LLMMessage::system(system_prompt));
    messages.extend(request.conversation_history.iter().map(|m| match m.sender {
        Sender::User => LLMMessage::user(m.text.clone()),
        Sender::Assistant => LLMMessage::assistant(m.text.clone()),
    }));
    messages.push(LLMMessage::user(request.message.clone()));
    messages
}
