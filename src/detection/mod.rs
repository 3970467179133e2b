//! Deterministic text analysis run before generation.
//!
//! - [`crisis`]: severity-ordered risk phrases and emergency resources.
//! - [`emotional`]: emotional state, intensity and the derived needs.
//! - [`relevance`]: memory persistence scoring and memory type.
//! - [`voice`]: speech emotion label for the synthesizer.
//!
//! Every stage here is a pure function over its input and the static
//! tables, safe to call concurrently.

pub mod crisis;
pub mod emotional;
pub mod matcher;
pub mod relevance;
pub mod resources;
pub mod voice;

pub use crisis::{detect_crisis, CrisisCategory, CrisisDetectionResult, CrisisDetector, Severity};
pub use emotional::{
    detect_emotional_state, EmotionalAnalysis, EmotionalClassifier, EmotionalState, Intensity,
    SuggestedTone,
};
pub use matcher::{Normalization, PatternMatcher, PhraseMatcher};
pub use relevance::{
    calculate_emotional_relevance, determine_memory_type, topic_repetition_count, MemoryType,
};
pub use resources::{get_emergency_resources, EmergencyContact, EmergencyResources};
pub use voice::{analyze_conversation_emotion, detect_voice_emotion, voice_profile, VoiceEmotion, VoiceProfile};
