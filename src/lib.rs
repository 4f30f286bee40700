//! # polyscript: data providers for embedded script evaluators
//!
//! polyscript evaluates compiled scripts against data assembled from
//! pluggable providers, and keeps per-request data isolated in immutable
//! execution contexts so one compiled script can serve many concurrent
//! callers.
//!
//! ## Building blocks
//!
//! - Data model ([`data`]): the tagged [`Value`] tree, deep merge and HTTP
//!   request conversion.
//! - Providers ([`provider`]): [`StaticProvider`] for compile-time data,
//!   [`ContextProvider`] for request-scoped data and [`CompositeProvider`]
//!   to chain them.
//! - Execution contexts ([`eval::context`]): copy-on-write key/value storage
//!   with cancellation and deadlines.
//! - Engines ([`engine`]): the [`GuestEngine`] contract and the bundled Rhai
//!   adapter.
//! - Evaluators ([`eval`]): [`ScriptEvaluator`] ties a compiled unit to its
//!   provider and normalizes results into an [`EvaluatorResponse`].
//!
//! ## Flow
//!
//! ```text
//! ScriptSource → GuestEngine::compile → CompiledUnit
//!     prepare_context(ctx, data) → ctx'       (provider stores data)
//!     eval(ctx') → get_data → execute → EvaluatorResponse
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use polyscript::{
//!     ContextProvider, EvaluatorWithPrepare, Evaluator, ExecutionContext, RhaiEngine,
//!     ScriptEvaluator, ScriptSource, Value,
//! };
//!
//! let evaluator = ScriptEvaluator::compile(
//!     Arc::new(RhaiEngine::new()),
//!     &ScriptSource::from_string("ctx.name"),
//!     Arc::new(ContextProvider::new("script_data")),
//! )?;
//!
//! let mut data = polyscript::DataMap::new();
//! data.insert("name".to_string(), Value::from("world"));
//! let ctx = evaluator
//!     .prepare_context(&ExecutionContext::background(), &[data])
//!     .into_result()?;
//! let response = evaluator.eval(&ctx)?;
//! assert_eq!(response.inspect(), "world");
//! # Ok::<(), polyscript::Error>(())
//! ```

pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod eval;
pub mod provider;
pub mod source;

// Re-exports
pub use config::PolyscriptConfig;
pub use data::{DataMap, Value, ValueKind};
pub use engine::{GuestEngine, RhaiEngine};
pub use error::*;
pub use eval::{
    CompiledUnit, EvalError, Evaluator, EvaluatorResponse, EvaluatorWithPrepare,
    ExecutionContext, RhaiEvaluator, ScriptEvaluator,
};
pub use provider::{
    CompositeProvider, ContextProvider, ContextUpdate, Nesting, Provider, ProviderError,
    StaticProvider,
};
pub use source::ScriptSource;
