//! Error types for scenario/actor collaborators.

use thiserror::Error;

/// Errors an [`Actor`](crate::Actor) can report for a single step.
#[derive(Debug, Error)]
pub enum ActorError {
    /// The step's `Line` lacks a field the actor needs
    #[error("line has no field `{0}`")]
    MissingField(String),

    /// A field exists but holds a value of the wrong kind
    #[error("field `{key}` is not a {expected}")]
    FieldType {
        key: String,
        expected: &'static str,
    },

    /// Actor-specific failure
    #[error("actor failed: {0}")]
    Failed(String),
}

impl ActorError {
    /// Creates a generic actor failure.
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }

    /// Creates a wrong-type error for `key`.
    pub fn field_type(key: impl Into<String>, expected: &'static str) -> Self {
        Self::FieldType {
            key: key.into(),
            expected,
        }
    }
}
