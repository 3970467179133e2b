//! User memory: stored personal facts and the context built from them.
//!
//! The chat pipeline only talks to the [`MemoryStore`] trait and treats
//! every failure as non-fatal.

pub mod in_memory;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::detection::relevance::MemoryType;
use crate::utilities::errors::StoreError;

pub use in_memory::InMemoryStore;

/// Coarse category of a stored fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InfoCategory {
    Name,
    Interest,
    Preference,
    Goal,
    Emotion,
    Other,
}

impl fmt::Display for InfoCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InfoCategory::Name => "name",
            InfoCategory::Interest => "interest",
            InfoCategory::Preference => "preference",
            InfoCategory::Goal => "goal",
            InfoCategory::Emotion => "emotion",
            InfoCategory::Other => "other",
        })
    }
}

/// One fact about a user, unique per `(user_id, key)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub user_id: String,
    pub category: InfoCategory,
    pub key: String,
    pub value: String,
    /// 0..=1.
    pub confidence: f64,
    /// `None` renders under "other".
    pub memory_type: Option<MemoryType>,
    pub updated_at: DateTime<Utc>,
}

impl PersonalInfo {
    pub fn new(
        user_id: impl Into<String>,
        category: InfoCategory,
        key: impl Into<String>,
        value: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            category,
            key: key.into(),
            value: value.into(),
            confidence: confidence.clamp(0.0, 1.0),
            memory_type: None,
            updated_at: Utc::now(),
        }
    }

    pub fn with_memory_type(mut self, memory_type: MemoryType) -> Self {
        self.memory_type = Some(memory_type);
        self
    }
}

/// Memory/profile store consumed by the chat pipeline.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Render the user's stored facts as prompt context. Empty when nothing
    /// renderable is stored.
    async fn build_user_context(&self, user_id: &str) -> Result<String, StoreError>;

    /// Insert a fact, replacing any earlier fact with the same key.
    async fn save_personal_info(&self, info: PersonalInfo) -> Result<(), StoreError>;

    /// All facts for a user, highest confidence first.
    async fn get_personal_info(&self, user_id: &str) -> Result<Vec<PersonalInfo>, StoreError>;
}
