//! Executor configuration.

use std::sync::Arc;

use crate::tracer::{Tracer, TracingTracer};

/// Tunables for one [`crate::executor::Executor`].
///
/// Construction-time configuration, not a hot-reloadable object: a `Config`
/// is consumed once when building an [`crate::executor::Executor`] and held
/// for the lifetime of the server process that owns it.
#[derive(Clone)]
pub struct Config {
    /// Maximum number of concurrently in-flight resolver method calls, across
    /// the whole request (the `Limiter` capacity in the design document).
    pub max_concurrent_fields: usize,
    /// The tracer used to open per-field spans.
    pub tracer: Arc<dyn Tracer>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("max_concurrent_fields", &self.max_concurrent_fields)
            .finish_non_exhaustive()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_fields: 100,
            tracer: Arc::new(TracingTracer),
        }
    }
}

impl Config {
    /// Starts from the defaults and overrides the concurrency budget.
    pub fn with_max_concurrent_fields(mut self, max: usize) -> Self {
        self.max_concurrent_fields = max;
        self
    }

    /// Starts from the defaults and overrides the tracer.
    pub fn with_tracer(mut self, tracer: Arc<dyn Tracer>) -> Self {
        self.tracer = tracer;
        self
    }
}
