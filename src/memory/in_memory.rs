//! Process-local [`MemoryStore`] backed by a concurrent map.

use async_trait::async_trait;
use dashmap::DashMap;

use super::{MemoryStore, PersonalInfo};
use crate::detection::relevance::MemoryType;
use crate::utilities::errors::StoreError;

/// Only the most recently stored facts are rendered into context.
pub const CONTEXT_FACT_LIMIT: usize = 20;

/// Context sections from most to least stable. `vinculo` is never rendered.
const SECTIONS: &[(Option<MemoryType>, &str)] = &[
    (Some(MemoryType::Identitaria), "**Identidad y proyectos importantes:**"),
    (Some(MemoryType::Proceso), "**Procesos y metas en curso:**"),
    (Some(MemoryType::Contextual), "**Contexto reciente:**"),
    (None, "**Otra información:**"),
];

/// In-memory store keyed by user id. Facts keep insertion order; an upsert
/// keeps the original position.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    facts: DashMap<String, Vec<PersonalInfo>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of facts stored for a user.
    pub fn len_for(&self, user_id: &str) -> usize {
        self.facts.get(user_id).map(|f| f.len()).unwrap_or(0)
    }
}

/// Render facts grouped by memory type.
pub fn render_user_context(facts: &[PersonalInfo]) -> String {
    let mut context = String::new();

    for (memory_type, heading) in SECTIONS {
        let values: Vec<&str> = facts
            .iter()
            .filter(|f| f.memory_type == *memory_type)
            .map(|f| f.value.as_str())
            .collect();
        if values.is_empty() {
            continue;
        }

        if !context.is_empty() {
            context.push('\n');
        }
        context.push_str(heading);
        context.push('\n');
        for value in values {
            context.push_str("- ");
            context.push_str(value);
            context.push('\n');
        }
    }

    context.trim_end().to_string()
}

#[async_trait]
impl MemoryStore for InMemoryStore {
    async fn build_user_context(&self, user_id: &str) -> Result<String, StoreError> {
        let Some(facts) = self.facts.get(user_id) else {
            return Ok(String::new());
        };
        let skip = facts.len().saturating_sub(CONTEXT_FACT_LIMIT);
        let context = render_user_context(&facts[skip..]);
        log::debug!(
            "Built user context for {}: {} fact(s), {} chars",
            user_id,
            facts.len() - skip,
            context.len()
        );
        Ok(context)
    }

    async fn save_personal_info(&self, info: PersonalInfo) -> Result<(), StoreError> {
        let mut facts = self.facts.entry(info.user_id.clone()).or_default();
        match facts.iter_mut().find(|f| f.key == info.key) {
            Some(existing) => *existing = info,
            None => facts.push(info),
        }
        Ok(())
    }

    async fn get_personal_info(&self, user_id: &str) -> Result<Vec<PersonalInfo>, StoreError> {
        let mut facts = self
            .facts
            .get(user_id)
            .map(|f| f.value().clone())
            .unwrap_or_default();
        facts.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        Ok(facts)
    }
}
