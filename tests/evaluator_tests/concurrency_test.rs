use std::sync::Arc;

use polyscript::{
    CompositeProvider, ContextProvider, Evaluator, EvaluatorWithPrepare, ExecutionContext,
    Provider, RhaiEngine, RhaiEvaluator, ScriptSource, StaticProvider, Value,
};

use crate::data;

const CALLERS: i64 = 100;

fn shared_evaluator() -> Arc<RhaiEvaluator> {
    let provider = CompositeProvider::from_providers([
        Arc::new(StaticProvider::new(data(serde_json::json!({"offset": 1000})))) as Arc<dyn Provider>,
        Arc::new(ContextProvider::new("script_data")),
    ]);
    let evaluator = RhaiEvaluator::compile(
        Arc::new(RhaiEngine::new()),
        &ScriptSource::from_string("#{ caller: ctx.caller, total: ctx.caller + ctx.offset }"),
        Arc::new(provider),
    )
    .unwrap();
    Arc::new(evaluator)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_one_compiled_script_serves_many_callers() {
    let evaluator = shared_evaluator();
    let root = ExecutionContext::background();

    let mut handles = Vec::new();
    for caller in 0..CALLERS {
        let evaluator = Arc::clone(&evaluator);
        let root = root.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let ctx = evaluator
                .prepare_context(&root, &[data(serde_json::json!({"caller": caller}))])
                .into_result()
                .unwrap();
            (caller, evaluator.eval(&ctx).unwrap())
        }));
    }

    let mut eval_ids = std::collections::HashSet::new();
    for handle in handles {
        let (caller, response) = handle.await.unwrap();
        assert_eq!(response.value().get("caller"), Some(&Value::Integer(caller)));
        assert_eq!(
            response.value().get("total"),
            Some(&Value::Integer(caller + 1000))
        );
        assert!(eval_ids.insert(response.eval_id()));
    }
    assert_eq!(eval_ids.len(), CALLERS as usize);
}

#[tokio::test]
async fn test_cancel_from_another_task() {
    let evaluator = RhaiEvaluator::compile(
        Arc::new(RhaiEngine::new()),
        &ScriptSource::from_string("let n = 0; loop { n += 1; }"),
        Arc::new(StaticProvider::empty()),
    )
    .unwrap();
    let (ctx, handle) = ExecutionContext::background().with_cancel();

    let running = tokio::task::spawn_blocking(move || evaluator.eval(&ctx));
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    handle.cancel();

    let result = running.await.unwrap();
    assert!(result.is_err());
}
