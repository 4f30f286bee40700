use thiserror::Error;

use crate::config::ConfigError;
use crate::engine::EngineError;
use crate::eval::{ContextError, EvalError};
use crate::provider::ProviderError;
use crate::source::SourceError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
    #[error("Eval error: {0}")]
    Eval(#[from] EvalError),
    #[error("Context error: {0}")]
    Context(#[from] ContextError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type InternalResult<T> = Result<T, Error>;

impl Error {
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Error::Internal(message.into())
    }
}
