use core::fmt;

use thiserror::Error;

use crate::data::ValueKind;
use crate::eval::context::ExecutionContext;

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors raised while reading or attaching provider data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// The provider only serves data fixed at construction time.
    #[error("static provider does not accept runtime data updates")]
    StaticProviderRejected,

    #[error("context provider key must not be empty")]
    EmptyContextKey,

    #[error("data key must not be empty (at '{path}')")]
    EmptyDataKey { path: String },

    #[error("context value under '{key}' is a {found}, expected a map")]
    TypeMismatch { key: String, found: ValueKind },

    #[error("composite provider has no providers")]
    NoProviders,

    #[error("provider #{index}: {source}")]
    AtIndex {
        index: usize,
        #[source]
        source: Box<ProviderError>,
    },

    #[error(transparent)]
    Joined(JoinedError),
}

impl ProviderError {
    pub fn at_index(index: usize, source: ProviderError) -> Self {
        ProviderError::AtIndex {
            index,
            source: Box::new(source),
        }
    }

    /// Joins several errors. A single error is returned as-is; `None` when
    /// there is nothing to join.
    pub fn join(mut errors: Vec<ProviderError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(ProviderError::Joined(JoinedError { errors })),
        }
    }

    /// True for the static rejection itself and for wrappers whose every
    /// cause is a static rejection.
    pub fn is_static_rejection(&self) -> bool {
        match self {
            ProviderError::StaticProviderRejected => true,
            ProviderError::AtIndex { source, .. } => source.is_static_rejection(),
            ProviderError::Joined(joined) => joined
                .errors()
                .iter()
                .all(ProviderError::is_static_rejection),
            _ => false,
        }
    }

    /// Flattens joined and indexed wrappers into their leaf causes.
    pub fn causes(&self) -> Vec<&ProviderError> {
        match self {
            ProviderError::Joined(joined) => {
                joined.errors().iter().flat_map(|e| e.causes()).collect()
            }
            ProviderError::AtIndex { source, .. } => source.causes(),
            other => vec![other],
        }
    }
}

/// Several independent failures reported together.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedError {
    errors: Vec<ProviderError>,
}

impl JoinedError {
    pub fn errors(&self) -> &[ProviderError] {
        &self.errors
    }

}

impl fmt::Display for JoinedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for JoinedError {}

/// Outcome of attaching data to a context.
///
/// The context is always usable: it is either a fully updated derivation or
/// the caller's original context. `error` may be set together with an updated
/// context when a merge completed only partially.
#[derive(Debug, Clone)]
#[must_use]
pub struct ContextUpdate {
    pub context: ExecutionContext,
    pub error: Option<ProviderError>,
}

impl ContextUpdate {
    pub fn ok(context: ExecutionContext) -> Self {
        Self {
            context,
            error: None,
        }
    }

    pub fn failed(context: ExecutionContext, error: ProviderError) -> Self {
        Self {
            context,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_parts(self) -> (ExecutionContext, Option<ProviderError>) {
        (self.context, self.error)
    }

    /// Drops the context when any error was reported.
    pub fn into_result(self) -> ProviderResult<ExecutionContext> {
        match self.error {
            None => Ok(self.context),
            Some(error) => Err(error),
        }
    }
}
