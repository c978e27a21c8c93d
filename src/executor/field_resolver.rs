//! Resolves exactly one field: admission control, tracing, method
//! invocation (or the `__typename` fast path), and error wrapping.

use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::Instrument as _;

use crate::error::{ExecutionError, FieldError};
use crate::schema::ResolvedValue;
use crate::value::Value;

use super::walker::{FieldKind, FieldToExec};
use super::{serializer, Request};

enum Outcome {
    Resolved(ResolvedValue),
    Failed(FieldError),
    Cancelled,
}

/// Resolves one field to completion, including recursing into its nested
/// selections through [`serializer::serialize_value`].
///
/// Returns `None` when this field's own failure must propagate past a
/// non-null ancestor rather than being nulled out in place, the same
/// sentinel the walker uses for its own descendants.
pub(super) fn resolve_field<Ctx>(
    request: Arc<Request<Ctx>>,
    field: FieldToExec<Ctx>,
) -> BoxFuture<'static, Option<Value>>
where
    Ctx: Send + Sync + 'static,
{
    Box::pin(async move {
        let FieldToExec {
            alias,
            kind,
            packed_args,
            selections,
            resolver_value,
            path,
        } = field;

        let permit = request.limiter.acquire().await;

        let (label, parent_type, field_name, trivial) = match &kind {
            FieldKind::Bound(bound) => (
                bound.trace_label.to_string(),
                bound.parent_type_name.to_string(),
                bound.name.to_string(),
                !bound.is_async,
            ),
            FieldKind::Fixed(_) => (alias.to_string(), String::new(), "__typename".to_owned(), true),
        };
        let span =
            request
                .tracer
                .field_span(&label, &parent_type, &field_name, trivial, packed_args.as_ref());

        let outcome = match &kind {
            FieldKind::Fixed(value) => Outcome::Resolved(value.clone()),
            FieldKind::Bound(bound) => {
                if request.cancellation.is_cancelled() {
                    Outcome::Cancelled
                } else {
                    let method = bound
                        .method
                        .as_ref()
                        .expect("fixed_result is None, so a method must be bound");
                    let context = if bound.has_context {
                        Some(Arc::clone(&request.context))
                    } else {
                        None
                    };
                    match method(Arc::clone(&resolver_value), context, packed_args)
                        .instrument(span.clone())
                        .await
                    {
                        Ok(value) => Outcome::Resolved(value),
                        Err(err) => Outcome::Failed(err),
                    }
                }
            }
        };

        drop(permit);

        let trace_error = match &outcome {
            Outcome::Failed(err) => Some(err.clone()),
            Outcome::Cancelled => Some(FieldError::new("query execution was cancelled")),
            Outcome::Resolved(_) => None,
        };
        crate::tracer::finish_field_span(&span, trace_error.as_ref());

        let is_non_null = match &kind {
            FieldKind::Bound(bound) => bound.declared_type.unwrap_non_null().0,
            FieldKind::Fixed(_) => false,
        };

        match outcome {
            Outcome::Resolved(resolved) => match kind {
                FieldKind::Bound(bound) => {
                    serializer::serialize_value(
                        request,
                        resolved,
                        bound.declared_type.clone(),
                        selections,
                        path,
                    )
                    .await
                }
                FieldKind::Fixed(_) => Some(fixed_to_value(resolved)),
            },
            Outcome::Failed(err) => {
                request.push_error(ExecutionError::from_field_error(path.to_vec(), err));
                null_or_propagate(is_non_null)
            }
            Outcome::Cancelled => {
                request.push_error(ExecutionError::cancelled(path.to_vec()));
                null_or_propagate(is_non_null)
            }
        }
    })
}

fn null_or_propagate(is_non_null: bool) -> Option<Value> {
    if is_non_null {
        None
    } else {
        Some(Value::Null)
    }
}

fn fixed_to_value(resolved: ResolvedValue) -> Value {
    match resolved {
        ResolvedValue::Null => Value::Null,
        ResolvedValue::Scalar(v) => Value::Scalar(v),
        ResolvedValue::Enum(e) => Value::enum_value(e.to_string()),
        ResolvedValue::List(_) | ResolvedValue::Object(_) => {
            unreachable!("__typename never resolves to a list or object")
        }
    }
}
