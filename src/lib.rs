//! # Dialogos
//!
//! Backend for an emotionally-aware Spanish-language companion ("Leo").
//!
//! Each chat turn runs a governance pipeline around a language model:
//! deterministic crisis detection and emotional classification select a
//! conversational mode, the mode shapes the system prompt, and the model's
//! reply is validated and repaired against the mode's rules before it is
//! returned.

pub mod chat;
pub mod detection;
pub mod guardrails;
pub mod llms;
pub mod memory;
pub mod prompts;
pub mod router;
pub mod server;
pub mod telemetry;
pub mod utilities;

pub use chat::{ChatPipeline, ChatRequest, ChatResponse, PipelineSettings};
pub use detection::crisis::{detect_crisis, CrisisDetectionResult};
pub use detection::emotional::{detect_emotional_state, EmotionalAnalysis};
pub use guardrails::{enforce_mode_rules, post_process_response, validate_response};
pub use llms::{GroqCompletion, TextGenerator};
pub use memory::{InMemoryStore, MemoryStore};
pub use router::{get_mode_rules, select_conversational_mode, ConversationalMode, ModeRules};
pub use utilities::config::DialogosConfig;

/// Crate version reported by `/health`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
