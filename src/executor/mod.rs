//! Query execution engine.
//!
//! The executor drives one query execution end to end: it opens the request
//! state (limiter, tracer, error list), walks the operation's selection set
//! against the root resolver value, and returns the assembled [`Value`]
//! alongside the accumulated [`ExecutionError`]s.

mod field_resolver;
mod serializer;
mod walker;

use std::sync::{Arc, Mutex};

use crate::cancellation::CancellationToken;
use crate::config::Config;
use crate::error::{ExecutionError, GraphQLError};
use crate::limiter::Limiter;
use crate::path::Path;
use crate::schema::{ResolvableSchema, ResolverObject};
use crate::selection::{Operation, OperationKind};
use crate::tracer::Tracer;
use crate::value::Value;

/// Request-scoped state shared by every worker resolving a field of this
/// execution.
///
/// `errors` is the only structure mutated by more than one worker, and the
/// mutex guarding it is never held across an `.await` point.
pub(crate) struct Request<Ctx> {
    pub(crate) context: Arc<Ctx>,
    pub(crate) limiter: Limiter,
    pub(crate) tracer: Arc<dyn Tracer>,
    pub(crate) cancellation: CancellationToken,
    errors: Mutex<Vec<ExecutionError>>,
}

impl<Ctx> Request<Ctx> {
    fn push_error(&self, error: ExecutionError) {
        self.errors
            .lock()
            .expect("execution error list mutex poisoned")
            .push(error);
    }
}

/// Drives a single query or mutation to completion.
///
/// Holds no per-request state itself (that lives in [`Request`]); a single
/// `Executor` is built once per process and reused across requests.
pub struct Executor {
    config: Config,
}

impl Default for Executor {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Executor {
    /// Builds an executor with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes `operation` against `root_value`, returning the assembled
    /// response value and the full list of field-level errors.
    ///
    /// Subscriptions are rejected outright, matching the design document's
    /// "subscriptions are not handled here". A cancellation token that has
    /// already tripped before any work starts is also rejected up front.
    pub async fn execute<Ctx>(
        &self,
        _schema: &ResolvableSchema,
        operation: Operation<Ctx>,
        root_value: Arc<dyn ResolverObject>,
        context: Arc<Ctx>,
        cancellation: CancellationToken,
    ) -> Result<(Value, Vec<ExecutionError>), GraphQLError>
    where
        Ctx: Send + Sync + 'static,
    {
        if operation.kind == OperationKind::Subscription {
            return Err(GraphQLError::IsSubscription);
        }
        if cancellation.is_cancelled() {
            return Err(GraphQLError::CancelledBeforeStart);
        }

        let request = Arc::new(Request {
            context,
            limiter: Limiter::new(self.config.max_concurrent_fields),
            tracer: Arc::clone(&self.config.tracer),
            cancellation: cancellation.clone(),
            errors: Mutex::new(Vec::new()),
        });

        let serially = operation.kind == OperationKind::Mutation;

        // The root walk always runs on its own task, so a panic anywhere
        // underneath it is caught by JoinHandle panic propagation, the same
        // boundary every per-field and per-element worker relies on.
        let handle = tokio::spawn(walker::resolve_selection_set(
            Arc::clone(&request),
            root_value,
            Path::Root,
            operation.selection_set,
            serially,
            true,
        ));

        let value = match handle.await {
            Ok(value) => value.unwrap_or(Value::Null),
            Err(join_err) => {
                tracing::error!(%join_err, "panic occurred while executing the root selection set");
                request.push_error(ExecutionError::panic_occurred(Vec::new()));
                Value::Null
            }
        };

        if cancellation.is_cancelled() {
            return Err(GraphQLError::CancelledBeforeStart);
        }

        let request = Arc::try_unwrap(request).unwrap_or_else(|_| {
            unreachable!("every spawned field worker is joined before the root walk returns")
        });

        Ok((value, request.errors.into_inner().expect("mutex poisoned")))
    }
}
