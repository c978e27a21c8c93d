//! Turns one resolved value into response JSON, applying non-null
//! propagation and recursing into the selection walker for composite types.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::{join_all, BoxFuture};
use futures::FutureExt as _;

use crate::error::ExecutionError;
use crate::path::Path;
use crate::schema::{ResolvedValue, TypeRef};
use crate::selection::{self, Selection};
use crate::value::Value;

use super::{walker, Request};

/// Serializes `resolved` according to `declared_type`, recursing into
/// `selections` when the value is a composite (object/interface/union).
///
/// Returns `None` when this value's absence must propagate past a non-null
/// ancestor, the same sentinel used throughout the walker and field
/// resolver.
pub(super) fn serialize_value<Ctx>(
    request: Arc<Request<Ctx>>,
    resolved: ResolvedValue,
    declared_type: TypeRef,
    selections: Vec<Selection<Ctx>>,
    path: Path,
) -> BoxFuture<'static, Option<Value>>
where
    Ctx: Send + Sync + 'static,
{
    Box::pin(async move {
        let (is_non_null, inner_type) = declared_type.unwrap_non_null();

        match resolved {
            ResolvedValue::Null => {
                if is_non_null {
                    request.push_error(ExecutionError::null_for_non_null(
                        path.to_vec(),
                        inner_type.display_name(),
                    ));
                    None
                } else {
                    Some(Value::Null)
                }
            }
            ResolvedValue::Scalar(v) => Some(Value::Scalar(v)),
            ResolvedValue::Enum(e) => Some(Value::enum_value(e.to_string())),
            ResolvedValue::Object(object_value) => {
                walker::resolve_selection_set(request, object_value, path, selections, false, is_non_null)
                    .await
            }
            ResolvedValue::List(items) => {
                resolve_list(request, items, inner_type.clone(), selections, path, is_non_null).await
            }
        }
    })
}

async fn resolve_list<Ctx>(
    request: Arc<Request<Ctx>>,
    items: Vec<ResolvedValue>,
    list_type: TypeRef,
    selections: Vec<Selection<Ctx>>,
    path: Path,
    is_non_null: bool,
) -> Option<Value>
where
    Ctx: Send + Sync + 'static,
{
    let elem_type = match list_type {
        TypeRef::List(elem) => *elem,
        other => unreachable!(
            "declared type for a resolved list must itself be a list type, got {other:?}"
        ),
    };

    let run_async = selection::any_async(&selections);
    let len = items.len();

    let resolved: Vec<Option<Value>> = if run_async {
        let handles = items.into_iter().enumerate().map(|(index, item)| {
            let request = Arc::clone(&request);
            let elem_type = elem_type.clone();
            let selections = selections.clone();
            let child_path = path.child_index(index);
            tokio::spawn(serialize_value(request, item, elem_type, selections, child_path))
        });

        let joined = join_all(handles).await;
        let mut out = Vec::with_capacity(len);
        for outcome in joined {
            match outcome {
                Ok(value) => out.push(value),
                Err(join_err) => {
                    tracing::error!(%join_err, "panic occurred while resolving a list element");
                    request.push_error(ExecutionError::panic_occurred(path.to_vec()));
                    out.push(None);
                }
            }
        }
        out
    } else {
        let mut out = Vec::with_capacity(len);
        for (index, item) in items.into_iter().enumerate() {
            let request = Arc::clone(&request);
            let child_path = path.child_index(index);
            let outcome = AssertUnwindSafe(serialize_value(
                request,
                item,
                elem_type.clone(),
                selections.clone(),
                child_path,
            ))
            .catch_unwind()
            .await;
            match outcome {
                Ok(value) => out.push(value),
                Err(_panic) => {
                    tracing::error!("panic occurred while resolving a list element");
                    request.push_error(ExecutionError::panic_occurred(path.to_vec()));
                    out.push(None);
                }
            }
        }
        out
    };

    if resolved.iter().any(Option::is_none) {
        return if is_non_null { None } else { Some(Value::Null) };
    }

    let values = resolved.into_iter().map(|v| v.expect("checked above")).collect();
    Some(Value::List(values))
}
