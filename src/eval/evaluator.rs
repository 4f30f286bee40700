use core::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use super::context::ExecutionContext;
use super::error::{EvalError, EvalResult};
use super::response::EvaluatorResponse;
use super::unit::CompiledUnit;
use crate::data::DataMap;
use crate::engine::{GuestEngine, GuestValue};
use crate::provider::{ContextUpdate, Provider};
use crate::source::ScriptSource;

/// Evaluates a compiled script against a context.
pub trait Evaluator: Send + Sync {
    fn eval(&self, context: &ExecutionContext) -> EvalResult<EvaluatorResponse>;
}

/// Evaluator that can also stage runtime data for a later [`Evaluator::eval`].
pub trait EvaluatorWithPrepare: Evaluator {
    /// Hands `data` to the unit's provider and returns the derived context.
    ///
    /// Only the returned context (and contexts derived from it) sees the
    /// data. The caller's context is never changed.
    fn prepare_context(&self, context: &ExecutionContext, data: &[DataMap]) -> ContextUpdate;
}

/// Generic evaluator over any [`GuestEngine`].
pub struct ScriptEvaluator<E: GuestEngine> {
    engine: Arc<E>,
    unit: Arc<CompiledUnit<E::Compiled>>,
}

impl<E: GuestEngine> ScriptEvaluator<E> {
    /// Compiles `source` with `engine` and binds the result to `provider`.
    pub fn compile(
        engine: Arc<E>,
        source: &ScriptSource,
        provider: Arc<dyn Provider>,
    ) -> EvalResult<Self> {
        let script_id = source.id();
        let content = engine
            .compile(source)
            .map_err(|source| EvalError::Compile {
                script_id: script_id.clone(),
                source,
            })?;
        debug!(%script_id, language = engine.language(), "compiled script");
        let unit = CompiledUnit::new(script_id, engine.language(), content, provider);
        Ok(Self::from_unit(engine, Arc::new(unit)))
    }

    pub fn from_unit(engine: Arc<E>, unit: Arc<CompiledUnit<E::Compiled>>) -> Self {
        Self { engine, unit }
    }

    pub fn unit(&self) -> &Arc<CompiledUnit<E::Compiled>> {
        &self.unit
    }

    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    pub fn script_id(&self) -> &str {
        self.unit.id()
    }
}

impl<E: GuestEngine> Clone for ScriptEvaluator<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            unit: Arc::clone(&self.unit),
        }
    }
}

impl<E: GuestEngine> fmt::Debug for ScriptEvaluator<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptEvaluator")
            .field("unit", &self.unit)
            .finish_non_exhaustive()
    }
}

impl<E: GuestEngine> Evaluator for ScriptEvaluator<E> {
    #[tracing::instrument(skip_all, fields(script_id = %self.unit.id()), level = "debug")]
    fn eval(&self, context: &ExecutionContext) -> EvalResult<EvaluatorResponse> {
        self.unit.validate()?;
        let script_id = self.unit.id();

        let data = self
            .unit
            .provider()
            .get_data(context)
            .map_err(|source| EvalError::Provider {
                script_id: script_id.to_string(),
                source,
            })?;

        let started = Instant::now();
        let output = self
            .engine
            .execute(context, self.unit.content(), &data)
            .map_err(|source| EvalError::Engine {
                script_id: script_id.to_string(),
                source,
            })?;
        let duration = started.elapsed();

        let value = match output.value {
            GuestValue::Data(value) => value,
            GuestValue::Error(message) => {
                return Err(EvalError::GuestError {
                    script_id: script_id.to_string(),
                    message,
                })
            }
            GuestValue::Callable(name) => {
                return Err(EvalError::UnevaluatedCallable {
                    script_id: script_id.to_string(),
                    name,
                })
            }
        };
        debug!(kind = %value.kind(), ?duration, "evaluated");
        Ok(EvaluatorResponse::new(
            value,
            output.type_name,
            duration,
            script_id,
        ))
    }
}

impl<E: GuestEngine> EvaluatorWithPrepare for ScriptEvaluator<E> {
    #[tracing::instrument(skip_all, fields(script_id = %self.unit.id(), maps = data.len()), level = "debug")]
    fn prepare_context(&self, context: &ExecutionContext, data: &[DataMap]) -> ContextUpdate {
        let update = self.unit.provider().add_data_to_context(context, data);
        if let Some(err) = &update.error {
            warn!("prepare_context: {}", err);
        }
        update
    }
}
