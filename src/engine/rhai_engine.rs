//! [Rhai](https://rhai.rs) adapter.
//!
//! The provider's data is pushed into the script scope as one constant map
//! (named `ctx` by default), so scripts read `ctx.name` or `ctx["name"]`.
//! The value of the last statement becomes the evaluation result.

use core::fmt;

use rhai::{AST, Array, Dynamic, Engine, EvalAltResult, FLOAT, FnPtr, INT, ImmutableString, Map, Scope};
use tracing::{debug, info};

use super::{CompiledContent, EngineError, GuestEngine, GuestOutput, GuestValue};
use crate::config::RhaiConfig;
use crate::data::{DataMap, Value};
use crate::eval::context::ExecutionContext;
use crate::source::ScriptSource;

pub const LANGUAGE: &str = "rhai";

#[derive(Debug, Clone)]
pub struct CompiledRhai {
    ast: AST,
    source_len: usize,
}

impl CompiledRhai {
    pub fn ast(&self) -> &AST {
        &self.ast
    }
}

impl CompiledContent for CompiledRhai {
    fn is_empty(&self) -> bool {
        self.source_len == 0
    }
}

pub struct RhaiEngine {
    engine: Engine,
    config: RhaiConfig,
}

impl fmt::Debug for RhaiEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RhaiEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for RhaiEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RhaiEngine {
    pub fn new() -> Self {
        Self::with_config(RhaiConfig::default())
    }

    pub fn with_config(config: RhaiConfig) -> Self {
        Self {
            engine: build_engine(&config),
            config,
        }
    }

    pub fn config(&self) -> &RhaiConfig {
        &self.config
    }
}

fn build_engine(config: &RhaiConfig) -> Engine {
    let mut engine = Engine::new();
    // zero keeps rhai's "unlimited" meaning for every limit below
    engine.set_max_operations(config.max_operations);
    engine.set_max_call_levels(config.max_call_levels);
    engine.set_max_string_size(config.max_string_size);
    engine.set_max_array_size(config.max_array_size);
    engine.set_max_map_size(config.max_map_size);
    engine.on_print(|text| info!(target: "polyscript::rhai", "{}", text));
    engine.on_debug(|text, source, pos| {
        debug!(target: "polyscript::rhai", source = source.unwrap_or(""), %pos, "{}", text)
    });
    engine
}

impl GuestEngine for RhaiEngine {
    type Compiled = CompiledRhai;

    fn language(&self) -> &str {
        LANGUAGE
    }

    fn compile(&self, source: &ScriptSource) -> Result<CompiledRhai, EngineError> {
        if source.is_empty() {
            return Err(EngineError::EmptySource);
        }
        let mut ast = self
            .engine
            .compile(source.content())
            .map_err(|e| EngineError::Compile(e.to_string()))?;
        ast.set_source(source.id());
        Ok(CompiledRhai {
            ast,
            source_len: source.content().len(),
        })
    }

    fn execute(
        &self,
        context: &ExecutionContext,
        compiled: &CompiledRhai,
        data: &DataMap,
    ) -> Result<GuestOutput, EngineError> {
        if let Some(reason) = context.err() {
            return Err(EngineError::Interrupted(reason));
        }

        let mut scope = Scope::new();
        scope.push_constant(self.config.global_name.as_str(), map_to_dynamic(data));

        let result = if context.is_cancellable() {
            // the shared engine has no hook; this one polls the context
            let mut engine = build_engine(&self.config);
            let watched = context.clone();
            engine.on_progress(move |_| watched.err().map(|e| Dynamic::from(e.to_string())));
            engine.eval_ast_with_scope::<Dynamic>(&mut scope, &compiled.ast)
        } else {
            self.engine
                .eval_ast_with_scope::<Dynamic>(&mut scope, &compiled.ast)
        };

        match result {
            Ok(value) => to_output(value),
            Err(err) => Err(eval_error(*err, context)),
        }
    }
}

fn eval_error(err: EvalAltResult, context: &ExecutionContext) -> EngineError {
    match err {
        EvalAltResult::ErrorTerminated(..) => match context.err() {
            Some(reason) => EngineError::Interrupted(reason),
            None => EngineError::Runtime(err.to_string()),
        },
        other => EngineError::Runtime(other.to_string()),
    }
}

fn to_output(value: Dynamic) -> Result<GuestOutput, EngineError> {
    let value = value.flatten();
    let type_name = value.type_name().to_string();
    if value.is::<FnPtr>() {
        let name = value
            .try_cast::<FnPtr>()
            .map(|f| f.fn_name().to_string())
            .unwrap_or_default();
        return Ok(GuestOutput {
            value: GuestValue::Callable(name),
            type_name,
        });
    }
    Ok(GuestOutput {
        value: GuestValue::Data(dynamic_to_value(value)?),
        type_name,
    })
}

fn conversion(message: &str) -> EngineError {
    EngineError::Conversion(message.to_string())
}

pub fn dynamic_to_value(value: Dynamic) -> Result<Value, EngineError> {
    let value = value.flatten();
    if value.is_unit() {
        return Ok(Value::Null);
    }
    if value.is::<bool>() {
        return value.as_bool().map(Value::Boolean).map_err(conversion);
    }
    if value.is::<INT>() {
        return value.as_int().map(Value::Integer).map_err(conversion);
    }
    if value.is::<FLOAT>() {
        return value.as_float().map(Value::Float).map_err(conversion);
    }
    if value.is::<char>() {
        return value
            .as_char()
            .map(|c| Value::String(c.to_string()))
            .map_err(conversion);
    }
    if value.is::<ImmutableString>() {
        return value
            .into_immutable_string()
            .map(|s| Value::String(s.to_string()))
            .map_err(conversion);
    }
    if value.is::<Array>() {
        let items = value
            .try_cast::<Array>()
            .ok_or_else(|| conversion("array"))?;
        return items
            .into_iter()
            .map(dynamic_to_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List);
    }
    if value.is::<Map>() {
        let map = value.try_cast::<Map>().ok_or_else(|| conversion("map"))?;
        return map
            .into_iter()
            .map(|(k, v)| dynamic_to_value(v).map(|v| (k.to_string(), v)))
            .collect::<Result<DataMap, _>>()
            .map(Value::Map);
    }
    Err(EngineError::UnsupportedResult(value.type_name().to_string()))
}

pub fn value_to_dynamic(value: &Value) -> Dynamic {
    match value {
        Value::Null => Dynamic::UNIT,
        Value::Boolean(b) => Dynamic::from(*b),
        Value::Integer(i) => Dynamic::from(*i as INT),
        Value::Float(f) => Dynamic::from(*f as FLOAT),
        Value::String(s) => Dynamic::from(s.clone()),
        Value::List(items) => Dynamic::from(items.iter().map(value_to_dynamic).collect::<Array>()),
        Value::Map(map) => map_to_dynamic(map),
    }
}

fn map_to_dynamic(map: &DataMap) -> Dynamic {
    let converted: Map = map
        .iter()
        .map(|(k, v)| (k.as_str().into(), value_to_dynamic(v)))
        .collect();
    Dynamic::from(converted)
}
