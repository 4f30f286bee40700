use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use polyscript::{
    config::RhaiConfig, data::request_to_value, engine::EngineError, CompositeProvider,
    ContextProvider, DataMap, EvalError, Evaluator, EvaluatorWithPrepare, ExecutionContext,
    Nesting, Provider, RhaiEngine, RhaiEvaluator, ScriptSource, StaticProvider, Value, ValueKind,
};
use pretty_assertions::assert_eq;

use crate::data;

fn compile(script: &str, provider: Arc<dyn Provider>) -> RhaiEvaluator {
    RhaiEvaluator::compile(
        Arc::new(RhaiEngine::new()),
        &ScriptSource::from_string(script),
        provider,
    )
    .unwrap()
}

fn static_and_context() -> Arc<dyn Provider> {
    Arc::new(CompositeProvider::from_providers([
        Arc::new(StaticProvider::new(data(
            serde_json::json!({"greeting": "hello", "limits": {"max": 10, "min": 0}}),
        ))) as Arc<dyn Provider>,
        Arc::new(ContextProvider::new("script_data")),
    ]))
}

#[test]
fn test_static_data_without_prepare() {
    let evaluator = compile(r#"ctx.greeting + " " + ctx.limits.max"#, static_and_context());
    let response = evaluator.eval(&ExecutionContext::background()).unwrap();
    assert_eq!(response.value(), &Value::from("hello 10"));
    assert_eq!(response.kind(), ValueKind::String);
    assert_eq!(response.inspect(), "hello 10");
}

#[test]
fn test_runtime_data_overrides_nested_static_fields() {
    let evaluator = compile("ctx.limits", static_and_context());
    let ctx = evaluator
        .prepare_context(
            &ExecutionContext::background(),
            &[data(serde_json::json!({"limits": {"max": 99}}))],
        )
        .into_result()
        .unwrap();

    let response = evaluator.eval(&ctx).unwrap();
    assert_eq!(
        response.value(),
        &Value::from(serde_json::json!({"max": 99, "min": 0}))
    );
}

#[test]
fn test_prepared_data_only_visible_through_returned_context() {
    let evaluator = compile("ctx.user ?? \"anonymous\"", static_and_context());
    let root = ExecutionContext::background();
    let prepared = evaluator
        .prepare_context(&root, &[data(serde_json::json!({"user": "ada"}))])
        .into_result()
        .unwrap();

    assert_eq!(evaluator.eval(&prepared).unwrap().inspect(), "ada");
    assert_eq!(evaluator.eval(&root).unwrap().inspect(), "anonymous");

    // contexts derived from the prepared one keep seeing the data
    let child = prepared.with_timeout(Duration::from_secs(5));
    assert_eq!(evaluator.eval(&child).unwrap().inspect(), "ada");
}

#[test]
fn test_sibling_of_prepared_context_does_not_see_data() {
    let evaluator = compile("ctx.user ?? \"anonymous\"", static_and_context());
    let root = ExecutionContext::background();
    let prepared = evaluator
        .prepare_context(&root, &[data(serde_json::json!({"user": "ada"}))])
        .into_result()
        .unwrap();

    let sibling = root.with_value("other", Value::from("x"));
    let deadline_sibling = root.with_timeout(Duration::from_secs(5));

    assert_eq!(evaluator.eval(&prepared).unwrap().inspect(), "ada");
    assert_eq!(evaluator.eval(&sibling).unwrap().inspect(), "anonymous");
    assert_eq!(evaluator.eval(&deadline_sibling).unwrap().inspect(), "anonymous");
}

#[test]
fn test_multiple_maps_are_merged_in_order() {
    let evaluator = compile("ctx", Arc::new(ContextProvider::new("script_data")));
    let ctx = evaluator
        .prepare_context(
            &ExecutionContext::background(),
            &[
                data(serde_json::json!({"a": 1, "tags": [1, 2]})),
                data(serde_json::json!({"b": 2, "tags": [3]})),
            ],
        )
        .into_result()
        .unwrap();
    assert_eq!(
        evaluator.eval(&ctx).unwrap().into_value(),
        Value::from(serde_json::json!({"a": 1, "b": 2, "tags": [3]}))
    );
}

#[test]
fn test_http_request_under_nested_key() {
    let provider = ContextProvider::new("script_data").with_nesting(Nesting::Under("request".into()));
    let evaluator = compile(
        r#"`${ctx.request.method} ${ctx.request.path} id=${ctx.request.query.id[0]}`"#,
        Arc::new(provider),
    );

    let request = http::Request::builder()
        .method("GET")
        .uri("http://example.com/items?id=42")
        .body(Vec::<u8>::new())
        .unwrap();
    let Value::Map(request_map) = request_to_value(&request) else {
        panic!("request must convert to a map");
    };

    let ctx = evaluator
        .prepare_context(&ExecutionContext::background(), &[request_map])
        .into_result()
        .unwrap();
    assert_eq!(evaluator.eval(&ctx).unwrap().inspect(), "GET /items id=42");
}

#[test]
fn test_static_only_evaluator_rejects_prepare() {
    let evaluator = compile("1", Arc::new(StaticProvider::empty()));
    let root = ExecutionContext::background();
    let update = evaluator.prepare_context(&root, &[DataMap::new()]);
    assert!(update.context.ptr_eq(&root));
    assert!(update.error.unwrap().is_static_rejection());
}

#[test]
fn test_script_from_file_carries_path_identity() {
    let mut file = tempfile::Builder::new().suffix(".rhai").tempfile().unwrap();
    writeln!(file, "let x = ctx.n; x * x").unwrap();

    let source = ScriptSource::from_file(file.path()).unwrap();
    let evaluator = RhaiEvaluator::compile(
        Arc::new(RhaiEngine::new()),
        &source,
        Arc::new(StaticProvider::new(data(serde_json::json!({"n": 12})))),
    )
    .unwrap();

    let response = evaluator.eval(&ExecutionContext::background()).unwrap();
    assert_eq!(response.value(), &Value::Integer(144));
    assert!(response.script_id().starts_with("file://"));
    assert!(response.script_id().ends_with(".rhai"));
}

#[test]
fn test_runtime_failures_are_reported_with_script_id() {
    let evaluator = compile(r#"throw "bad input""#, static_and_context());
    let err = evaluator.eval(&ExecutionContext::background()).unwrap_err();
    assert!(matches!(
        err,
        EvalError::Engine {
            source: EngineError::Runtime(_),
            ..
        }
    ));
    assert_eq!(err.script_id(), Some(evaluator.script_id()));

    let evaluator = compile(r#"fn f() { 1 } Fn("f")"#, static_and_context());
    assert!(matches!(
        evaluator.eval(&ExecutionContext::background()),
        Err(EvalError::UnevaluatedCallable { .. })
    ));
}

#[test]
fn test_timeout_stops_runaway_script() {
    let evaluator = compile("loop { }", static_and_context());
    let ctx = ExecutionContext::background().with_timeout(Duration::from_millis(50));
    let err = evaluator.eval(&ctx).unwrap_err();
    assert!(matches!(
        err,
        EvalError::Engine {
            source: EngineError::Interrupted(_),
            ..
        }
    ));
}

#[test]
fn test_engine_limits_from_config() {
    let engine = RhaiEngine::with_config(RhaiConfig {
        max_string_size: 8,
        ..RhaiConfig::default()
    });
    let evaluator = RhaiEvaluator::compile(
        Arc::new(engine),
        &ScriptSource::from_string(r#"ctx.s + ctx.s"#),
        Arc::new(StaticProvider::new(data(serde_json::json!({"s": "abcdef"})))),
    )
    .unwrap();
    assert!(evaluator.eval(&ExecutionContext::background()).is_err());
}
