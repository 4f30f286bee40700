use thiserror::Error;

use crate::engine::EngineError;
use crate::provider::ProviderError;

pub type EvalResult<T> = Result<T, EvalError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("Invalid compiled unit: {0}")]
    InvalidUnit(String),

    #[error("Compiled content of {script_id} is empty")]
    EmptyContent { script_id: String },

    #[error("Failed to compile {script_id}: {source}")]
    Compile {
        script_id: String,
        source: EngineError,
    },

    #[error("Failed to load data for {script_id}: {source}")]
    Provider {
        script_id: String,
        source: ProviderError,
    },

    #[error("Failed to execute {script_id}: {source}")]
    Engine {
        script_id: String,
        source: EngineError,
    },

    #[error("{script_id} returned an error value: {message}")]
    GuestError { script_id: String, message: String },

    #[error("{script_id} returned function '{name}' instead of calling it")]
    UnevaluatedCallable { script_id: String, name: String },
}

impl EvalError {
    pub fn script_id(&self) -> Option<&str> {
        match self {
            EvalError::InvalidUnit(_) => None,
            EvalError::EmptyContent { script_id }
            | EvalError::Compile { script_id, .. }
            | EvalError::Provider { script_id, .. }
            | EvalError::Engine { script_id, .. }
            | EvalError::GuestError { script_id, .. }
            | EvalError::UnevaluatedCallable { script_id, .. } => Some(script_id),
        }
    }
}
