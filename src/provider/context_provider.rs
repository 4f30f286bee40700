use serde::{Deserialize, Serialize};
use tracing::debug;

use super::provider::{Getter, Provider, ProviderKind, Setter};
use super::types::{ContextUpdate, ProviderError, ProviderResult};
use crate::data::{DataMap, Value, merge_value};
use crate::eval::context::ExecutionContext;

const ROOT_PATH: &str = "$";

/// Where runtime data lands inside the stored map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "key")]
pub enum Nesting {
    /// Caller keys are merged at the top level.
    #[default]
    TopLevel,
    /// Every supplied map is merged under this one sub-key.
    Under(String),
}

/// Keeps request-scoped data inside the [`ExecutionContext`], under `key`.
///
/// The provider itself is stateless and can be shared freely; all of its data
/// lives in contexts. Writes copy the map stored in the input context, merge
/// into the copy and attach it to a derived context, so the input context and
/// its map are never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextProvider {
    key: String,
    nesting: Nesting,
}

impl ContextProvider {
    /// An empty key is accepted here and reported by every later call.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            nesting: Nesting::TopLevel,
        }
    }

    pub fn with_nesting(mut self, nesting: Nesting) -> Self {
        self.nesting = nesting;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn nesting(&self) -> &Nesting {
        &self.nesting
    }

    fn stored_map(&self, context: &ExecutionContext) -> ProviderResult<Option<DataMap>> {
        match context.value(&self.key) {
            None => Ok(None),
            Some(Value::Map(map)) => Ok(Some(map.clone())),
            Some(other) => Err(ProviderError::TypeMismatch {
                key: self.key.clone(),
                found: other.kind(),
            }),
        }
    }

    fn merge_entry(&self, target: &mut DataMap, key: String, value: Value) -> ProviderResult<()> {
        match &self.nesting {
            Nesting::TopLevel => merge_value(target, key, value),
            Nesting::Under(sub_key) if sub_key.is_empty() => {
                return Err(ProviderError::EmptyDataKey {
                    path: ROOT_PATH.to_string(),
                });
            }
            Nesting::Under(sub_key) => {
                let slot = target
                    .entry(sub_key.clone())
                    .or_insert_with(|| Value::Map(DataMap::new()));
                if !matches!(slot, Value::Map(_)) {
                    *slot = Value::Map(DataMap::new());
                }
                if let Value::Map(nested) = slot {
                    merge_value(nested, key, value);
                }
            }
        }
        Ok(())
    }
}

/// Drops empty keys from nested maps (lists included), recording each one.
fn normalize(value: Value, path: &str, errors: &mut Vec<ProviderError>) -> Value {
    match value {
        Value::Map(map) => Value::Map(normalize_map(map, path, errors)),
        Value::List(items) => Value::List(
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| normalize(item, &format!("{}[{}]", path, i), errors))
                .collect(),
        ),
        other => other,
    }
}

fn normalize_map(map: DataMap, path: &str, errors: &mut Vec<ProviderError>) -> DataMap {
    let mut normalized = DataMap::with_capacity(map.len());
    for (key, value) in map {
        if key.is_empty() {
            errors.push(ProviderError::EmptyDataKey {
                path: path.to_string(),
            });
            continue;
        }
        let child_path = format!("{}.{}", path, key);
        normalized.insert(key, normalize(value, &child_path, errors));
    }
    normalized
}

impl Getter for ContextProvider {
    fn get_data(&self, context: &ExecutionContext) -> ProviderResult<DataMap> {
        if self.key.is_empty() {
            return Err(ProviderError::EmptyContextKey);
        }
        Ok(self.stored_map(context)?.unwrap_or_default())
    }
}

impl Setter for ContextProvider {
    #[tracing::instrument(skip(self, context, data), fields(key = %self.key), level = "debug")]
    fn add_data_to_context(&self, context: &ExecutionContext, data: &[DataMap]) -> ContextUpdate {
        if self.key.is_empty() {
            return ContextUpdate::failed(context.clone(), ProviderError::EmptyContextKey);
        }
        let mut accumulated = match self.stored_map(context) {
            Ok(existing) => existing.unwrap_or_default(),
            Err(e) => return ContextUpdate::failed(context.clone(), e),
        };

        let mut errors = Vec::new();
        for map in data {
            let normalized = normalize_map(map.clone(), ROOT_PATH, &mut errors);
            for (key, value) in normalized {
                if let Err(e) = self.merge_entry(&mut accumulated, key, value) {
                    errors.push(e);
                }
            }
        }

        debug!(
            keys = accumulated.len(),
            rejected = errors.len(),
            "attached runtime data"
        );
        let derived = context.with_value(self.key.clone(), Value::Map(accumulated));
        ContextUpdate {
            context: derived,
            error: ProviderError::join(errors),
        }
    }
}

impl Provider for ContextProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Context
    }
}
