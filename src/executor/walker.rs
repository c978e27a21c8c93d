//! The selection walker: resolves one selection list against one resolver
//! value into a response object.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use compact_str::CompactString;
use fnv::FnvHashMap;
use futures::future::{join_all, BoxFuture};
use futures::FutureExt as _;

use crate::error::ExecutionError;
use crate::path::Path;
use crate::schema::{ResolvableField, ResolvedValue, ResolverObject};
use crate::selection::{Selection, TypeAssertionCase};
use crate::value::{Object, Value};

use super::{field_resolver, Request};

/// What a collected field will do when resolved: either invoke a bound
/// method, or produce an already-known fixed value (`__typename`).
pub(super) enum FieldKind<Ctx> {
    Bound(Arc<ResolvableField<Ctx>>),
    Fixed(ResolvedValue),
}

impl<Ctx> FieldKind<Ctx> {
    fn is_async(&self) -> bool {
        matches!(self, FieldKind::Bound(field) if field.is_async)
    }
}

/// One entry of the field-to-execute list built up by [`collect_fields`].
pub(super) struct FieldToExec<Ctx> {
    pub(super) alias: CompactString,
    pub(super) kind: FieldKind<Ctx>,
    pub(super) packed_args: Option<serde_json::Value>,
    pub(super) selections: Vec<Selection<Ctx>>,
    pub(super) resolver_value: Arc<dyn ResolverObject>,
    pub(super) path: Path,
}

/// Resolves `selections` against `resolver_value`, producing the response
/// object for this selection set (or `None` if a non-null descendant failed
/// and this whole selection set must be nulled out in turn).
///
/// Boxed because async fns cannot be directly recursive: the walker calls
/// into the field resolver, which calls into the value serializer, which
/// calls back into the walker for nested object selections.
pub(super) fn resolve_selection_set<Ctx>(
    request: Arc<Request<Ctx>>,
    resolver_value: Arc<dyn ResolverObject>,
    path: Path,
    selections: Vec<Selection<Ctx>>,
    serially: bool,
    is_non_null: bool,
) -> BoxFuture<'static, Option<Value>>
where
    Ctx: Send + Sync + 'static,
{
    Box::pin(async move {
        let mut order = Vec::new();
        let mut index_by_alias = FnvHashMap::default();
        collect_fields(
            selections,
            &resolver_value,
            &path,
            &mut order,
            &mut index_by_alias,
        );

        if order.is_empty() {
            return Some(Value::Object(Object::with_capacity(0)));
        }

        let run_async = !serially && order.iter().any(|f| f.kind.is_async());
        let aliases: Vec<CompactString> = order.iter().map(|f| f.alias.clone()).collect();

        let results: Vec<Option<Value>> = if run_async {
            let handles = order.into_iter().map(|field| {
                let request = Arc::clone(&request);
                tokio::spawn(field_resolver::resolve_field(request, field))
            });

            let joined = join_all(handles).await;
            let mut resolved = Vec::with_capacity(joined.len());
            for outcome in joined {
                match outcome {
                    Ok(value) => resolved.push(value),
                    Err(join_err) => {
                        tracing::error!(%join_err, "panic occurred while resolving a field");
                        request.push_error(ExecutionError::panic_occurred(path.to_vec()));
                        resolved.push(None);
                    }
                }
            }
            resolved
        } else {
            let mut resolved = Vec::with_capacity(order.len());
            for field in order {
                let request = Arc::clone(&request);
                let outcome = AssertUnwindSafe(field_resolver::resolve_field(request, field))
                    .catch_unwind()
                    .await;
                match outcome {
                    Ok(value) => resolved.push(value),
                    Err(_panic) => {
                        tracing::error!("panic occurred while resolving a field");
                        request.push_error(ExecutionError::panic_occurred(path.to_vec()));
                        resolved.push(None);
                    }
                }
            }
            resolved
        };

        stitch(aliases, results, is_non_null)
    })
}

fn stitch(aliases: Vec<CompactString>, results: Vec<Option<Value>>, is_non_null: bool) -> Option<Value> {
    if results.iter().any(Option::is_none) {
        return if is_non_null { None } else { Some(Value::Null) };
    }

    let mut object = Object::with_capacity(results.len());
    for (alias, value) in aliases.into_iter().zip(results) {
        object.add_field(alias.to_string(), value.expect("checked above"));
    }
    Some(Value::Object(object))
}

fn collect_fields<Ctx>(
    selections: Vec<Selection<Ctx>>,
    resolver_value: &Arc<dyn ResolverObject>,
    parent_path: &Path,
    order: &mut Vec<FieldToExec<Ctx>>,
    index_by_alias: &mut FnvHashMap<CompactString, usize>,
) {
    for selection in selections {
        match selection {
            Selection::SchemaField(field_selection) => {
                if let Some(&idx) = index_by_alias.get(&field_selection.alias) {
                    order[idx].selections.extend(field_selection.selections);
                    continue;
                }
                let alias = field_selection.alias;
                let path = parent_path.child_field(alias.clone());
                index_by_alias.insert(alias.clone(), order.len());
                order.push(FieldToExec {
                    alias,
                    kind: FieldKind::Bound(field_selection.field),
                    packed_args: field_selection.packed_args,
                    selections: field_selection.selections,
                    resolver_value: Arc::clone(resolver_value),
                    path,
                });
            }
            Selection::TypenameField(typename) => {
                if index_by_alias.contains_key(&typename.alias) {
                    continue;
                }
                let type_name = type_of(&typename.assertions, resolver_value);
                let alias = typename.alias;
                let path = parent_path.child_field(alias.clone());
                index_by_alias.insert(alias.clone(), order.len());
                order.push(FieldToExec {
                    alias,
                    kind: FieldKind::Fixed(ResolvedValue::scalar(type_name)),
                    packed_args: None,
                    selections: Vec::new(),
                    resolver_value: Arc::clone(resolver_value),
                    path,
                });
            }
            Selection::TypeAssertion(assertion) => {
                if let Some(narrowed) = (assertion.discriminator)(resolver_value) {
                    collect_fields(
                        assertion.selections,
                        &narrowed,
                        parent_path,
                        order,
                        index_by_alias,
                    );
                }
            }
        }
    }
}

/// Computes `__typename` for an interface/union field by trying each
/// declared assertion's discriminator in turn; the empty string if none
/// match, matching the design document's `type_of`.
fn type_of(
    assertions: &[TypeAssertionCase],
    resolver_value: &Arc<dyn ResolverObject>,
) -> String {
    for case in assertions {
        if (case.discriminator)(resolver_value).is_some() {
            return case.type_name.to_string();
        }
    }
    String::new()
}
