use std::sync::Arc;

use tracing::debug;

use super::provider::{Getter, Provider, ProviderKind, Setter};
use super::types::{ContextUpdate, ProviderError, ProviderResult};
use crate::data::DataMap;
use crate::eval::context::ExecutionContext;

/// Serves one mapping fixed at construction time.
///
/// Runtime updates are always refused with
/// [`ProviderError::StaticProviderRejected`] and leave the context untouched.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    data: Arc<DataMap>,
}

impl StaticProvider {
    pub fn new(data: DataMap) -> Self {
        Self {
            data: Arc::new(data),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl Getter for StaticProvider {
    fn get_data(&self, _context: &ExecutionContext) -> ProviderResult<DataMap> {
        Ok(self.data.as_ref().clone())
    }
}

impl Setter for StaticProvider {
    fn add_data_to_context(&self, context: &ExecutionContext, data: &[DataMap]) -> ContextUpdate {
        debug!(maps = data.len(), "static provider refused runtime data");
        ContextUpdate::failed(context.clone(), ProviderError::StaticProviderRejected)
    }
}

impl Provider for StaticProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Static
    }
}
