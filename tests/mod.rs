mod data_tests;
mod evaluator_tests;

use std::collections::HashMap;

use polyscript::{data::data_map_from_json, DataMap};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[ctor::ctor]
fn init_tests() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Builds a [`DataMap`] from a JSON object literal.
pub fn data(json: serde_json::Value) -> DataMap {
    data_map_from_json(json).unwrap_or_else(HashMap::new)
}
