//! Generation providers.
//!
//! | Provider | Module |
//! |----------|--------|
//! | Groq (OpenAI-compatible chat completions) | [`groq`] |

pub mod groq;
