//! Field-level tracing hooks.
//!
//! The executor never talks to a concrete tracing backend directly; it opens
//! a [`tracing::Span`] per field through the [`Tracer`] trait and records the
//! outcome on it once the field resolves. The default [`TracingTracer`]
//! plugs straight into whatever `tracing::Subscriber` the embedding
//! application has installed, the same boundary `juniper`'s
//! `tracing`-feature macros describe.

use crate::error::FieldError;

/// Opens field-level trace spans.
pub trait Tracer: Send + Sync {
    /// Opens a span for one field resolution.
    ///
    /// `trivial` is true iff the field is not marked async; `args` is the
    /// field's packed arguments, recorded for diagnostics.
    fn field_span(
        &self,
        label: &str,
        parent_type: &str,
        field_name: &str,
        trivial: bool,
        args: Option<&serde_json::Value>,
    ) -> tracing::Span;
}

/// Finishes a field span, recording the resolution's error (if any).
///
/// Called exactly once per field, after the bound method and any nested
/// resolution have completed.
pub fn finish_field_span(span: &tracing::Span, error: Option<&FieldError>) {
    match error {
        Some(err) => span.record("error", tracing::field::display(err.message())),
        None => span.record("error", tracing::field::Empty),
    };
}

/// The default [`Tracer`], backed by the `tracing` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingTracer;

impl Tracer for TracingTracer {
    fn field_span(
        &self,
        label: &str,
        parent_type: &str,
        field_name: &str,
        trivial: bool,
        args: Option<&serde_json::Value>,
    ) -> tracing::Span {
        tracing::info_span!(
            "graphql_field",
            label = %label,
            parent_type = %parent_type,
            field_name = %field_name,
            trivial,
            args = ?args,
            error = tracing::field::Empty,
        )
    }
}
