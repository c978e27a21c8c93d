//! Query execution core for a GraphQL server.
//!
//! Given a compiled, resolver-bound schema, a validated operation (already
//! flattened and fragment-resolved upstream), and a root resolver value,
//! [`executor::Executor`] drives resolver invocation, concurrency, path
//! tracking, non-null propagation, and JSON value assembly, and reports the
//! errors produced along the way.
//!
//! Parsing, validation, schema construction, binding schema fields to Rust
//! methods, and subscription delivery are all out of scope: this crate picks
//! up after those steps have already produced a [`selection::Selection`]
//! list and hands back a [`value::Value`] tree plus an
//! [`error::ExecutionError`] list.

pub mod cancellation;
pub mod config;
pub mod error;
pub mod executor;
pub mod limiter;
pub mod path;
pub mod schema;
pub mod selection;
pub mod tracer;
pub mod value;

pub use cancellation::CancellationToken;
pub use config::Config;
pub use error::{ExecutionError, FieldError, GraphQLError};
pub use executor::Executor;
pub use path::{Path, PathSegment};
pub use schema::{
    Discriminator, FieldMethod, NamedTypeKind, ResolvableField, ResolvableSchema, ResolvedValue,
    ResolverObject, TypeRef,
};
pub use selection::{
    Operation, OperationKind, Selection, SchemaFieldSelection, TypeAssertionCase,
    TypeAssertionSelection, TypenameFieldSelection,
};
pub use tracer::{Tracer, TracingTracer};
pub use value::{Object, Value};
