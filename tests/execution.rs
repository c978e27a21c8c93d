//! End-to-end scenarios exercising the executor against hand-built
//! resolvable schemas, mirroring the scenario table the design document
//! calls out.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;
use pretty_assertions::assert_eq;

use graphql_exec_core::{
    CancellationToken, Config, Discriminator, ExecutionError, Executor, FieldError, FieldMethod,
    NamedTypeKind, Operation, OperationKind, PathSegment, ResolvableField, ResolvableSchema,
    ResolvedValue, ResolverObject, SchemaFieldSelection, Selection, TypeAssertionCase,
    TypeRef, TypenameFieldSelection, Value,
};

type Ctx = ();

fn schema() -> ResolvableSchema {
    ResolvableSchema {
        query_type_name: "Query".into(),
        mutation_type_name: Some("Mutation".into()),
    }
}

fn method<F>(f: F) -> FieldMethod<Ctx>
where
    F: Fn(Arc<dyn ResolverObject>) -> BoxFuture<'static, Result<ResolvedValue, FieldError>>
        + Send
        + Sync
        + 'static,
{
    Arc::new(move |receiver, _ctx, _args| f(receiver))
}

fn bound_field(
    name: &str,
    parent_type: &str,
    declared_type: TypeRef,
    is_async: bool,
    method_fn: FieldMethod<Ctx>,
) -> Arc<ResolvableField<Ctx>> {
    Arc::new(ResolvableField {
        name: name.into(),
        parent_type_name: parent_type.into(),
        trace_label: format!("{parent_type}.{name}").into(),
        declared_type,
        has_context: false,
        has_error: true,
        is_async,
        fixed_result: None,
        method: Some(method_fn),
    })
}

fn schema_field(
    alias: &str,
    field: Arc<ResolvableField<Ctx>>,
    selections: Vec<Selection<Ctx>>,
) -> Selection<Ctx> {
    Selection::SchemaField(SchemaFieldSelection {
        alias: alias.into(),
        field,
        packed_args: None,
        selections,
    })
}

fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

async fn run(operation: Operation<Ctx>, root: Arc<dyn ResolverObject>) -> (Value, Vec<ExecutionError>) {
    Executor::default()
        .execute(&schema(), operation, root, Arc::new(()), CancellationToken::new())
        .await
        .expect("execution should not be rejected outright")
}

#[tokio::test]
async fn scalar_root_returns_plain_value() {
    init_tracing();

    let hello = bound_field(
        "hello",
        "Query",
        TypeRef::non_null(TypeRef::named(NamedTypeKind::Scalar, "String")),
        false,
        method(|_| Box::pin(async { Ok(ResolvedValue::scalar("world")) })),
    );
    let operation = Operation {
        kind: OperationKind::Query,
        selection_set: vec![schema_field("hello", hello, vec![])],
    };

    let (value, errors) = run(operation, Arc::new(())).await;

    assert!(errors.is_empty());
    assert_eq!(
        serde_json::to_value(value).unwrap(),
        serde_json::json!({"hello": "world"})
    );
}

#[tokio::test]
async fn alias_merge_invokes_field_once() {
    struct UserResolver;

    let call_count = Arc::new(AtomicUsize::new(0));
    let user_field = {
        let call_count = Arc::clone(&call_count);
        bound_field(
            "user",
            "Query",
            TypeRef::non_null(TypeRef::named(NamedTypeKind::Object, "User")),
            false,
            method(move |_| {
                call_count.fetch_add(1, Ordering::SeqCst);
                Box::pin(async { Ok(ResolvedValue::object(UserResolver)) })
            }),
        )
    };
    let name_field = bound_field(
        "name",
        "User",
        TypeRef::non_null(TypeRef::named(NamedTypeKind::Scalar, "String")),
        false,
        method(|_| Box::pin(async { Ok(ResolvedValue::scalar("Ada")) })),
    );
    let id_field = bound_field(
        "id",
        "User",
        TypeRef::non_null(TypeRef::named(NamedTypeKind::Scalar, "Int")),
        false,
        method(|_| Box::pin(async { Ok(ResolvedValue::scalar(7)) })),
    );

    let operation = Operation {
        kind: OperationKind::Query,
        selection_set: vec![
            schema_field("a", Arc::clone(&user_field), vec![schema_field("name", name_field, vec![])]),
            schema_field("a", user_field, vec![schema_field("id", id_field, vec![])]),
        ],
    };

    let (value, errors) = run(operation, Arc::new(())).await;

    assert!(errors.is_empty());
    assert_eq!(call_count.load(Ordering::SeqCst), 1);
    assert_eq!(
        serde_json::to_value(value).unwrap(),
        serde_json::json!({"a": {"name": "Ada", "id": 7}})
    );
}

#[tokio::test]
async fn non_null_failure_propagates_to_nearest_nullable_ancestor() {
    struct AResolver;
    struct BResolver;

    let c_field = bound_field(
        "c",
        "B",
        TypeRef::non_null(TypeRef::named(NamedTypeKind::Scalar, "Int")),
        false,
        method(|_| Box::pin(async { Err(FieldError::new("boom")) })),
    );
    let b_field = bound_field(
        "b",
        "A",
        TypeRef::non_null(TypeRef::named(NamedTypeKind::Object, "B")),
        false,
        method(|_| Box::pin(async { Ok(ResolvedValue::object(BResolver)) })),
    );
    let a_field = bound_field(
        "a",
        "Query",
        TypeRef::named(NamedTypeKind::Object, "A"),
        false,
        method(|_| Box::pin(async { Ok(ResolvedValue::object(AResolver)) })),
    );

    let operation = Operation {
        kind: OperationKind::Query,
        selection_set: vec![schema_field(
            "a",
            a_field,
            vec![schema_field("b", b_field, vec![schema_field("c", c_field, vec![])])],
        )],
    };

    let (value, errors) = run(operation, Arc::new(())).await;

    assert_eq!(serde_json::to_value(value).unwrap(), serde_json::json!({"a": null}));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message(), "boom");
    assert_eq!(
        errors[0].path(),
        &[
            PathSegment::Field("a".into()),
            PathSegment::Field("b".into()),
            PathSegment::Field("c".into()),
        ]
    );
}

#[tokio::test]
async fn list_element_error_nulls_whole_list() {
    struct Item(i64);

    let id_field = bound_field(
        "id",
        "Item",
        TypeRef::non_null(TypeRef::named(NamedTypeKind::Scalar, "Int")),
        false,
        method(|receiver| {
            let index = receiver
                .as_any()
                .downcast_ref::<Item>()
                .expect("receiver is an Item")
                .0;
            Box::pin(async move {
                if index == 1 {
                    Err(FieldError::new("boom"))
                } else {
                    Ok(ResolvedValue::scalar(index))
                }
            })
        }),
    );
    let items_field = bound_field(
        "items",
        "Query",
        TypeRef::non_null(TypeRef::list(TypeRef::non_null(TypeRef::named(
            NamedTypeKind::Object,
            "Item",
        )))),
        false,
        method(|_| {
            Box::pin(async {
                Ok(ResolvedValue::List(vec![
                    ResolvedValue::object(Item(0)),
                    ResolvedValue::object(Item(1)),
                    ResolvedValue::object(Item(2)),
                ]))
            })
        }),
    );

    let operation = Operation {
        kind: OperationKind::Query,
        selection_set: vec![schema_field(
            "items",
            items_field,
            vec![schema_field("id", id_field, vec![])],
        )],
    };

    let (value, errors) = run(operation, Arc::new(())).await;

    assert_eq!(serde_json::to_value(value).unwrap(), serde_json::json!({"items": null}));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message(), "boom");
    assert_eq!(
        errors[0].path(),
        &[
            PathSegment::Field("items".into()),
            PathSegment::Index(1),
            PathSegment::Field("id".into()),
        ]
    );
}

#[tokio::test]
async fn typename_resolves_via_discriminator() {
    struct Dog;
    struct Cat;

    fn discriminator_for_cat() -> Discriminator {
        Arc::new(|v: &Arc<dyn ResolverObject>| v.as_any().downcast_ref::<Cat>().map(|_| Arc::clone(v)))
    }
    fn discriminator_for_dog() -> Discriminator {
        Arc::new(|v: &Arc<dyn ResolverObject>| v.as_any().downcast_ref::<Dog>().map(|_| Arc::clone(v)))
    }

    let assertions = vec![
        TypeAssertionCase {
            type_name: "Dog".into(),
            discriminator: discriminator_for_dog(),
        },
        TypeAssertionCase {
            type_name: "Cat".into(),
            discriminator: discriminator_for_cat(),
        },
    ];

    let r_field = bound_field(
        "r",
        "Query",
        TypeRef::non_null(TypeRef::named(NamedTypeKind::Union, "Result")),
        false,
        method(|_| Box::pin(async { Ok(ResolvedValue::object(Cat)) })),
    );

    let operation = Operation {
        kind: OperationKind::Query,
        selection_set: vec![schema_field(
            "r",
            r_field,
            vec![Selection::TypenameField(TypenameFieldSelection {
                alias: "__typename".into(),
                assertions,
            })],
        )],
    };

    let (value, errors) = run(operation, Arc::new(())).await;

    assert!(errors.is_empty());
    assert_eq!(
        serde_json::to_value(value).unwrap(),
        serde_json::json!({"r": {"__typename": "Cat"}})
    );
}

#[tokio::test]
#[serial_test::serial]
async fn mutation_siblings_run_serially_in_query_order() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let first = {
        let log = Arc::clone(&log);
        bound_field(
            "first",
            "Mutation",
            TypeRef::non_null(TypeRef::named(NamedTypeKind::Scalar, "Boolean")),
            true,
            method(move |_| {
                let log = Arc::clone(&log);
                Box::pin(async move {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    log.lock().expect("log mutex poisoned").push("first");
                    Ok(ResolvedValue::scalar(true))
                })
            }),
        )
    };
    let second = {
        let log = Arc::clone(&log);
        bound_field(
            "second",
            "Mutation",
            TypeRef::non_null(TypeRef::named(NamedTypeKind::Scalar, "Boolean")),
            true,
            method(move |_| {
                let log = Arc::clone(&log);
                Box::pin(async move {
                    log.lock().expect("log mutex poisoned").push("second");
                    Ok(ResolvedValue::scalar(true))
                })
            }),
        )
    };

    let operation = Operation {
        kind: OperationKind::Mutation,
        selection_set: vec![schema_field("first", first, vec![]), schema_field("second", second, vec![])],
    };

    let (_value, errors) = run(operation, Arc::new(())).await;

    assert!(errors.is_empty());
    assert_eq!(*log.lock().expect("log mutex poisoned"), vec!["first", "second"]);
}

#[tokio::test]
async fn limiter_caps_concurrent_resolver_calls() {
    let in_flight = Arc::new(AtomicUsize::new(0));
    let max_observed = Arc::new(AtomicUsize::new(0));

    let make_field = |name: &'static str| {
        let in_flight = Arc::clone(&in_flight);
        let max_observed = Arc::clone(&max_observed);
        bound_field(
            name,
            "Query",
            TypeRef::non_null(TypeRef::named(NamedTypeKind::Scalar, "Boolean")),
            true,
            method(move |_| {
                let in_flight = Arc::clone(&in_flight);
                let max_observed = Arc::clone(&max_observed);
                Box::pin(async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    max_observed.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Ok(ResolvedValue::scalar(true))
                })
            }),
        )
    };

    let operation = Operation {
        kind: OperationKind::Query,
        selection_set: vec![
            schema_field("a", make_field("a"), vec![]),
            schema_field("b", make_field("b"), vec![]),
            schema_field("c", make_field("c"), vec![]),
        ],
    };

    let executor = Executor::new(Config::default().with_max_concurrent_fields(1));
    let (_value, errors) = executor
        .execute(&schema(), operation, Arc::new(()), Arc::new(()), CancellationToken::new())
        .await
        .expect("execution should not be rejected outright");

    assert!(errors.is_empty());
    assert_eq!(max_observed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn subscriptions_are_rejected_outright() {
    let operation: Operation<Ctx> = Operation {
        kind: OperationKind::Subscription,
        selection_set: vec![],
    };

    let result = Executor::default()
        .execute(&schema(), operation, Arc::new(()), Arc::new(()), CancellationToken::new())
        .await;

    assert!(matches!(result, Err(graphql_exec_core::GraphQLError::IsSubscription)));
}

#[tokio::test]
async fn pre_tripped_cancellation_is_rejected_before_any_work() {
    let operation: Operation<Ctx> = Operation {
        kind: OperationKind::Query,
        selection_set: vec![],
    };
    let cancellation = CancellationToken::new();
    cancellation.cancel();

    let result = Executor::default()
        .execute(&schema(), operation, Arc::new(()), Arc::new(()), cancellation)
        .await;

    assert!(matches!(
        result,
        Err(graphql_exec_core::GraphQLError::CancelledBeforeStart)
    ));
}
