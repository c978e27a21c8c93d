//! Error types produced during query execution.

use derive_more::{Display, Error, From};
use serde::Serialize;

use crate::path::PathSegment;

/// An error surfaced by a user resolver method.
///
/// Mirrors `juniper::FieldError`: a message plus optional structured
/// `extensions`, constructible from anything [`Display`](std::fmt::Display).
#[derive(Clone, Debug, PartialEq)]
pub struct FieldError {
    message: String,
    extensions: Option<serde_json::Value>,
}

impl FieldError {
    /// Builds a new error with no extensions.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            extensions: None,
        }
    }

    /// Builds a new error carrying an extensions map.
    pub fn with_extensions(message: impl Into<String>, extensions: serde_json::Value) -> Self {
        Self {
            message: message.into(),
            extensions: Some(extensions),
        }
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The `extensions` payload, if any.
    pub fn extensions(&self) -> Option<&serde_json::Value> {
        self.extensions.as_ref()
    }
}

impl<T: std::fmt::Display> From<T> for FieldError {
    fn from(e: T) -> Self {
        FieldError::new(e.to_string())
    }
}

/// One entry in a request's accumulated error list.
///
/// Every execution error is paired with the path of the field that failed,
/// regardless of which of the four kinds in the design document produced it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExecutionError {
    message: String,
    path: Vec<PathSegment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extensions: Option<serde_json::Value>,
}

impl ExecutionError {
    /// Builds an execution error from a resolved path and a resolver error.
    pub fn from_field_error(path: Vec<PathSegment>, error: FieldError) -> Self {
        Self {
            message: error.message,
            path,
            extensions: error.extensions,
        }
    }

    /// Builds a "got null for non-null field" error at the given path.
    pub fn null_for_non_null(path: Vec<PathSegment>, type_name: &str) -> Self {
        Self {
            message: format!(
                "Cannot return null for non-nullable field of type \"{type_name}\""
            ),
            path,
            extensions: None,
        }
    }

    /// Builds a panic-recovery error at the given path.
    pub fn panic_occurred(path: Vec<PathSegment>) -> Self {
        Self {
            message: "an internal error occurred while resolving this field".to_owned(),
            path,
            extensions: None,
        }
    }

    /// Builds a cancellation error at the given path (empty for the root).
    pub fn cancelled(path: Vec<PathSegment>) -> Self {
        Self {
            message: "query execution was cancelled".to_owned(),
            path,
            extensions: None,
        }
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The path of the field that produced this error.
    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }
}

/// An error that prevents query execution from starting or completing at all.
///
/// Distinct from [`ExecutionError`], which is field-scoped and collected
/// alongside a partial `data` payload; a `GraphQLError` means there is no
/// `data` payload to return at all.
#[derive(Clone, Debug, Display, Eq, From, PartialEq, Error)]
pub enum GraphQLError {
    /// The operation is a subscription, which this core does not execute.
    #[display("operation is a subscription")]
    IsSubscription,
    /// The request's cancellation token had already tripped before any work started.
    #[display("query execution was cancelled before it began")]
    CancelledBeforeStart,
}
