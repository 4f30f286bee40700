//! Evaluation layer.
//!
//! A [`ScriptEvaluator`] pairs a guest engine with a [`CompiledUnit`]. Each
//! call to [`Evaluator::eval`] asks the unit's provider for data visible in
//! the given [`ExecutionContext`], runs the compiled script and normalizes the
//! guest's result into an [`EvaluatorResponse`].

pub mod context;
pub mod error;
pub mod evaluator;
pub mod response;
pub mod unit;

pub use context::{CancelHandle, ContextError, ExecutionContext};
pub use error::{EvalError, EvalResult};
pub use evaluator::{Evaluator, EvaluatorWithPrepare, ScriptEvaluator};
pub use response::EvaluatorResponse;
pub use unit::CompiledUnit;

use crate::engine::RhaiEngine;

/// Evaluator backed by the bundled Rhai engine.
pub type RhaiEvaluator = ScriptEvaluator<RhaiEngine>;
