use core::fmt;

use super::types::{ContextUpdate, ProviderResult};
use crate::data::DataMap;
use crate::eval::context::ExecutionContext;

/// Read side of a provider.
pub trait Getter: Send + Sync {
    /// Returns the data visible to a script evaluated with `context`.
    ///
    /// Must be callable repeatedly and concurrently, and must never modify the
    /// context.
    fn get_data(&self, context: &ExecutionContext) -> ProviderResult<DataMap>;
}

/// Write side of a provider.
pub trait Setter: Send + Sync {
    /// Attaches `data` to a context derived from `context`.
    ///
    /// The returned [`ContextUpdate`] holds either a fully updated new context
    /// or `context` itself; a context is never partially updated.
    fn add_data_to_context(&self, context: &ExecutionContext, data: &[DataMap]) -> ContextUpdate;
}

/// A data source for scripts: the pair of [`Getter`] and [`Setter`] plus the
/// capability query composites use to decide how to treat member failures.
pub trait Provider: Getter + Setter + fmt::Debug {
    fn kind(&self) -> ProviderKind;

    /// Whether [`Setter::add_data_to_context`] can ever succeed.
    fn accepts_runtime_data(&self) -> bool {
        self.kind() != ProviderKind::Static
    }
}

#[derive(Debug, Clone, Copy, strum::Display, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Static,
    Context,
    Composite,
}
