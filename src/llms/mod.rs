//! Language model integration.
//!
//! - [`base_llm`]: the [`TextGenerator`] trait and message types
//! - [`providers`]: concrete generators (Groq)

pub mod base_llm;
pub mod providers;

pub use base_llm::{LLMMessage, Role, TextGenerator};
pub use providers::groq::GroqCompletion;
