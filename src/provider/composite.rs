//! Layered composition of providers.
//!
//! A [`CompositeProvider`] reads every member in order and deep-merges the
//! results, so a later member overrides an earlier one key by key. Writes are
//! offered to every member; static members are expected to refuse them.

use std::sync::Arc;

use tracing::{debug, warn};

use super::provider::{Getter, Provider, ProviderKind, Setter};
use super::types::{ContextUpdate, ProviderError, ProviderResult};
use crate::data::{DataMap, merge_into};
use crate::eval::context::ExecutionContext;

#[derive(Debug, Clone, Default)]
pub struct CompositeProvider {
    providers: Vec<Option<Arc<dyn Provider>>>,
}

impl CompositeProvider {
    /// `None` entries are kept in place (so member indices in errors match the
    /// caller's list) and skipped by every operation.
    pub fn new(providers: Vec<Option<Arc<dyn Provider>>>) -> Self {
        Self { providers }
    }

    pub fn from_providers<I>(providers: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Provider>>,
    {
        Self::new(providers.into_iter().map(Some).collect())
    }

    pub fn push(&mut self, provider: Arc<dyn Provider>) {
        self.providers.push(Some(provider));
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    fn present(&self) -> impl Iterator<Item = (usize, &Arc<dyn Provider>)> + '_ {
        self.providers
            .iter()
            .enumerate()
            .filter_map(|(index, provider)| provider.as_ref().map(|p| (index, p)))
    }
}

impl Getter for CompositeProvider {
    fn get_data(&self, context: &ExecutionContext) -> ProviderResult<DataMap> {
        let mut merged = DataMap::new();
        for (index, provider) in self.present() {
            let data = provider
                .get_data(context)
                .map_err(|e| ProviderError::at_index(index, e))?;
            merge_into(&mut merged, data);
        }
        Ok(merged)
    }
}

impl Setter for CompositeProvider {
    #[tracing::instrument(skip_all, fields(members = self.providers.len()), level = "debug")]
    fn add_data_to_context(&self, context: &ExecutionContext, data: &[DataMap]) -> ContextUpdate {
        let mut current = context.clone();
        let mut writable = 0usize;
        let mut succeeded = 0usize;
        let mut writable_errors = Vec::new();
        let mut static_errors = Vec::new();

        for (index, provider) in self.present() {
            let accepts = provider.accepts_runtime_data();
            let (updated, error) = provider.add_data_to_context(&current, data).into_parts();
            // later members see earlier writes, partial updates included
            current = updated;

            match (accepts, error) {
                (true, None) => {
                    writable += 1;
                    succeeded += 1;
                }
                (true, Some(e)) => {
                    writable += 1;
                    writable_errors.push(ProviderError::at_index(index, e));
                }
                (false, Some(e)) => static_errors.push(ProviderError::at_index(index, e)),
                (false, None) => {
                    debug!(index, "read-only member accepted runtime data");
                    succeeded += 1;
                }
            }
        }

        if succeeded > 0 {
            for error in writable_errors.iter().chain(static_errors.iter()) {
                if !error.is_static_rejection() {
                    warn!(error = %error, "ignoring member failure, another member accepted the data");
                }
            }
            return ContextUpdate::ok(current);
        }

        let errors = if writable > 0 {
            writable_errors
        } else {
            static_errors
        };
        let error = ProviderError::join(errors).unwrap_or(ProviderError::NoProviders);
        ContextUpdate::failed(context.clone(), error)
    }
}

impl Provider for CompositeProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Composite
    }

    fn accepts_runtime_data(&self) -> bool {
        self.present()
            .any(|(_, provider)| provider.accepts_runtime_data())
    }
}
