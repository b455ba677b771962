use std::sync::Arc;

use crate::model::set::ModelSet;
use crate::model::model_type::ModelType;
use crate::model::value::{Record, Value};
use crate::types::{TrackingError, TrackingKey};

/// Signature shared by every installed method, instance- or type-level.
pub type MethodBody = dyn Fn(&CallContext<'_>, &[Value]) -> Result<Value, CallError> + Send + Sync;

/// A callable installed on a model type.
///
/// Methods are cheap to clone; the body is shared. A method produced by the
/// tracking layer remembers the key it counts under.
#[derive(Clone)]
pub struct Method {
    body: Arc<MethodBody>,
    tracking: Option<TrackingKey>,
}

impl Method {
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&CallContext<'_>, &[Value]) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        Self {
            body: Arc::new(body),
            tracking: None,
        }
    }

    /// A method that counts under `key`.
    pub fn tracked<F>(key: TrackingKey, body: F) -> Self
    where
        F: Fn(&CallContext<'_>, &[Value]) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        Self {
            body: Arc::new(body),
            tracking: Some(key),
        }
    }

    pub fn call(&self, cx: &CallContext<'_>, args: &[Value]) -> Result<Value, CallError> {
        (self.body)(cx, args)
    }

    /// The shared body, for wrappers that forward to it.
    pub fn body(&self) -> Arc<MethodBody> {
        Arc::clone(&self.body)
    }

    pub fn tracking(&self) -> Option<&TrackingKey> {
        self.tracking.as_ref()
    }
}

impl std::fmt::Debug for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Method")
            .field("tracking", &self.tracking)
            .finish_non_exhaustive()
    }
}

/// Receiver of a method call.
///
/// `record` is set for instance-level calls and empty for type-level calls.
#[derive(Clone, Copy)]
pub struct CallContext<'a> {
    pub models: &'a ModelSet,
    pub model: &'a ModelType,
    pub record: Option<&'a Record>,
}

impl<'a> CallContext<'a> {
    /// The receiving record, or an error for type-level calls.
    pub fn record(&self, method: &str) -> Result<&'a Record, CallError> {
        self.record.ok_or_else(|| CallError::NotAnInstance {
            model: self.model.name().to_string(),
            method: method.to_string(),
        })
    }

    /// Call another instance method (or attribute reader) on the same record.
    pub fn send(&self, method: &str, args: &[Value]) -> Result<Value, CallError> {
        let record = self.record(method)?;
        self.models.call_instance(record, method, args)
    }

    /// Call a type-level method on any model type.
    pub fn send_type(&self, model: &str, method: &str, args: &[Value]) -> Result<Value, CallError> {
        self.models.call_type(model, method, args)
    }

    /// Forward `method` to whatever object `target` holds.
    pub fn dispatch(
        &self,
        target: &Value,
        method: &str,
        args: &[Value],
    ) -> Result<Value, CallError> {
        match target {
            Value::Record(record) => self.models.call_instance(record, method, args),
            Value::Relation(relation) => self.models.call_type(&relation.model, method, args),
            other => Err(CallError::NotAnObject {
                method: method.to_string(),
                kind: other.kind().to_string(),
            }),
        }
    }
}

/// Failures raised while invoking model methods.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallError {
    #[error("undefined method `{method}` for {model}")]
    UnknownMethod { model: String, method: String },

    #[error("uninitialized model type {0}")]
    UnknownModel(String),

    #[error("association `{name}` not found on {model}")]
    UnknownAssociation { model: String, name: String },

    #[error("{model}#{method} delegated to {to}, but {to} is nil")]
    NilDelegation {
        model: String,
        method: String,
        to: String,
    },

    #[error("{model}.{method} needs an instance receiver")]
    NotAnInstance { model: String, method: String },

    #[error("cannot call `{method}` on a {kind} value")]
    NotAnObject { method: String, kind: String },

    #[error("wrong arguments: {0}")]
    Argument(String),

    #[error(transparent)]
    Tracking(#[from] TrackingError),

    /// Raised by a method body itself.
    #[error("{0}")]
    Failed(String),
}
