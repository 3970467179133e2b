//! Chat module: the per-turn pipeline and its HTTP handlers.
//!
//! ```text
//! User message
//!   → Memory context (if userId)
//!   → Crisis detection + emotional analysis
//!   → Mode selection → mode rules
//!   → System prompt (CONTENCIÓN prompt or mode block + integrated prompt)
//!   → Generate (system, history, message)
//!   → Validate → post-process → coherence fallback
//!   → Memory write-back + analytics (best effort)
//!   → Return text + voice emotion + mode + crisis info
//! ```

pub mod handler;
pub mod pipeline;
pub mod types;

pub use pipeline::{ChatPipeline, PipelineSettings};
pub use types::{AnalyzeRequest, AnalyzeResponse, ChatRequest, ChatResponse, CrisisInfo, HistoryMessage, Sender};
