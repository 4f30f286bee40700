//! Data providers.
//!
//! A provider decides what data a script sees during one evaluation and how
//! runtime data gets attached to an [`ExecutionContext`](crate::eval::context::ExecutionContext).
//!
//! - [`StaticProvider`]: fixed data, refuses runtime updates
//! - [`ContextProvider`]: request-scoped data stored inside the context
//! - [`CompositeProvider`]: ordered layering of other providers

pub mod composite;
pub mod context_provider;
#[allow(clippy::module_inception)]
pub mod provider;
pub mod static_provider;
pub mod types;

pub use composite::CompositeProvider;
pub use context_provider::{ContextProvider, Nesting};
pub use provider::{Getter, Provider, ProviderKind, Setter};
pub use static_provider::StaticProvider;
pub use types::{ContextUpdate, JoinedError, ProviderError, ProviderResult};
