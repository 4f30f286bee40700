use core::fmt;
use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

use crate::config::duration_ms;
use crate::data::{Value, ValueKind};

/// Normalized result of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluatorResponse {
    value: Value,
    kind: ValueKind,
    type_name: String,
    #[serde(rename = "exec_time_ms", with = "duration_ms")]
    duration: Duration,
    script_id: String,
    eval_id: Uuid,
}

impl EvaluatorResponse {
    pub fn new(
        value: Value,
        type_name: impl Into<String>,
        duration: Duration,
        script_id: impl Into<String>,
    ) -> Self {
        Self {
            kind: value.kind(),
            value,
            type_name: type_name.into(),
            duration,
            script_id: script_id.into(),
            eval_id: Uuid::new_v4(),
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Native type name reported by the guest engine.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Wall-clock time spent inside the guest engine.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn script_id(&self) -> &str {
        &self.script_id
    }

    pub fn eval_id(&self) -> Uuid {
        self.eval_id
    }

    pub fn inspect(&self) -> String {
        self.value.inspect()
    }
}

impl fmt::Display for EvaluatorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {:?}) from {}",
            self.inspect(),
            self.kind,
            self.duration,
            self.script_id
        )
    }
}
