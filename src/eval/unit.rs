use core::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::error::{EvalError, EvalResult};
use crate::engine::CompiledContent;
use crate::provider::Provider;

/// Result of compiling one script: the engine's compiled content, the
/// provider that feeds it and the identity stamped on every response.
///
/// Immutable once built; share it behind an `Arc` and evaluate it from as
/// many threads as needed.
pub struct CompiledUnit<C> {
    id: String,
    language: String,
    content: C,
    provider: Arc<dyn Provider>,
    created_at: DateTime<Utc>,
}

impl<C: CompiledContent> CompiledUnit<C> {
    pub fn new(
        id: impl Into<String>,
        language: impl Into<String>,
        content: C,
        provider: Arc<dyn Provider>,
    ) -> Self {
        Self {
            id: id.into(),
            language: language.into(),
            content,
            provider,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Checked before every evaluation.
    pub fn validate(&self) -> EvalResult<()> {
        if self.id.trim().is_empty() {
            return Err(EvalError::InvalidUnit(
                "compiled unit has an empty identity".to_string(),
            ));
        }
        if self.content.is_empty() {
            return Err(EvalError::EmptyContent {
                script_id: self.id.clone(),
            });
        }
        Ok(())
    }
}

impl<C> fmt::Debug for CompiledUnit<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledUnit")
            .field("id", &self.id)
            .field("language", &self.language)
            .field("provider", &self.provider)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}
