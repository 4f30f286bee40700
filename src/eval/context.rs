use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::data::Value;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("Context cancelled")]
    Cancelled,
    #[error("Context deadline exceeded")]
    DeadlineExceeded,
}

#[derive(Debug)]
struct ValueNode {
    key: String,
    value: Value,
    parent: Option<Arc<ValueNode>>,
}

#[derive(Debug)]
struct CancelState {
    cancelled: AtomicBool,
    parent: Option<Arc<CancelState>>,
}

impl CancelState {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
            || self
                .parent
                .as_ref()
                .is_some_and(|parent| parent.is_cancelled())
    }
}

/// 実行コンテキスト
///
/// An immutable, cheaply clonable handle threaded through every provider and
/// evaluator call. It carries keyed attributes plus an optional cancellation
/// signal and deadline.
///
/// Every `with_*` method derives a new context and leaves `self` untouched, so
/// two threads deriving from the same parent never observe each other's
/// attributes. Attribute lookups walk the derivation chain from the newest
/// node to the oldest.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    values: Option<Arc<ValueNode>>,
    cancel: Option<Arc<CancelState>>,
    deadline: Option<Instant>,
}

/// Cancels the context returned alongside it by [`ExecutionContext::with_cancel`],
/// together with every context derived from that one.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    state: Arc<CancelState>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::SeqCst);
    }
}

impl ExecutionContext {
    /// Root context: no attributes, never cancelled, no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Derives a context where `key` resolves to `value`, shadowing any value
    /// stored under the same key by an ancestor.
    pub fn with_value(&self, key: impl Into<String>, value: Value) -> Self {
        Self {
            values: Some(Arc::new(ValueNode {
                key: key.into(),
                value,
                parent: self.values.clone(),
            })),
            cancel: self.cancel.clone(),
            deadline: self.deadline,
        }
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        let mut node = self.values.as_deref();
        while let Some(current) = node {
            if current.key == key {
                return Some(&current.value);
            }
            node = current.parent.as_deref();
        }
        None
    }

    pub fn with_cancel(&self) -> (Self, CancelHandle) {
        let state = Arc::new(CancelState {
            cancelled: AtomicBool::new(false),
            parent: self.cancel.clone(),
        });
        let context = Self {
            values: self.values.clone(),
            cancel: Some(state.clone()),
            deadline: self.deadline,
        };
        (context, CancelHandle { state })
    }

    /// Derives a context expiring at `deadline`. An earlier deadline inherited
    /// from the parent is kept.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) if current <= deadline => current,
            _ => deadline,
        };
        Self {
            values: self.values.clone(),
            cancel: self.cancel.clone(),
            deadline: Some(deadline),
        }
    }

    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Why the context is done, if it is.
    pub fn err(&self) -> Option<ContextError> {
        if self.cancel.as_ref().is_some_and(|state| state.is_cancelled()) {
            return Some(ContextError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(ContextError::DeadlineExceeded),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Whether the context can ever become done. Engines use this to skip
    /// installing interruption hooks for plain contexts.
    pub fn is_cancellable(&self) -> bool {
        self.cancel.is_some() || self.deadline.is_some()
    }

    /// True when both handles share the same attribute chain, cancellation
    /// state and deadline, i.e. one is an unmodified clone of the other.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        let values = match (&self.values, &other.values) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        let cancel = match (&self.cancel, &other.cancel) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        values && cancel && self.deadline == other.deadline
    }
}
