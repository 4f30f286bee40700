//! Guest engine adapters.
//!
//! An adapter owns everything language specific: compiling source into its
//! native form, injecting the provider's [`DataMap`] into the guest and turning
//! the guest's result back into a [`Value`]. Evaluators only ever talk to the
//! [`GuestEngine`] trait.

pub mod rhai_engine;

use thiserror::Error;

use crate::data::{DataMap, Value};
use crate::eval::context::{ContextError, ExecutionContext};
use crate::source::ScriptSource;

pub use rhai_engine::{CompiledRhai, RhaiEngine};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("script source is empty")]
    EmptySource,
    #[error("Compile error: {0}")]
    Compile(String),
    #[error("Runtime error: {0}")]
    Runtime(String),
    #[error("Execution interrupted: {0}")]
    Interrupted(#[from] ContextError),
    #[error("Data conversion failed: {0}")]
    Conversion(String),
    #[error("Unsupported result type: {0}")]
    UnsupportedResult(String),
}

/// Native compiled form of a script.
pub trait CompiledContent: Send + Sync {
    /// True when there is nothing to execute.
    fn is_empty(&self) -> bool;
}

/// What a guest produced, before the evaluator decides whether it counts as
/// a result.
#[derive(Debug, Clone, PartialEq)]
pub enum GuestValue {
    Data(Value),
    /// The guest returned a value representing an error.
    Error(String),
    /// The guest returned something callable instead of calling it.
    Callable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GuestOutput {
    pub value: GuestValue,
    /// Name of the guest's native type, for diagnostics.
    pub type_name: String,
}

pub trait GuestEngine: Send + Sync {
    type Compiled: CompiledContent;

    /// Short language name, e.g. `"rhai"`.
    fn language(&self) -> &str;

    fn compile(&self, source: &ScriptSource) -> Result<Self::Compiled, EngineError>;

    /// Runs `compiled` with `data` visible to the guest.
    ///
    /// Implementations must stop promptly once `context` is done.
    fn execute(
        &self,
        context: &ExecutionContext,
        compiled: &Self::Compiled,
        data: &DataMap,
    ) -> Result<GuestOutput, EngineError>;
}
