//! The resolvable schema: fields pre-bound to methods on user resolver types.
//!
//! Binding a schema field to a Rust method is itself out of scope for this
//! crate (it is the job of an upstream schema-compilation step, typically a
//! derive macro). What lands here is the already-bound
//! [`ResolvableField`]: an opaque, type-erased callable closed over the
//! concrete resolver type, in the spirit of `juniper`'s `GraphQLValueAsync`
//! dispatch but without requiring the caller to implement a trait per type.

use std::any::Any;
use std::sync::Arc;

use arcstr::ArcStr;
use futures::future::BoxFuture;

use crate::error::FieldError;

/// An opaque handle to a user resolver object.
///
/// Bound field methods downcast this via [`ResolverObject::as_any`] to
/// recover their concrete receiver type; the executor itself never inspects
/// the contents.
pub trait ResolverObject: Send + Sync {
    /// Exposes the concrete resolver type for downcasting by bound methods.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + Send + Sync> ResolverObject for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// The tagged result of invoking a resolver method.
///
/// This is the "capability interface" result value described in the design
/// document: a fixed, finite set of shapes the serializer can switch on
/// without ever reflecting over the original Rust type.
#[derive(Clone)]
pub enum ResolvedValue {
    /// A GraphQL null (absent object, list, or scalar).
    Null,
    /// A scalar value, already in JSON form.
    Scalar(serde_json::Value),
    /// An enum's underlying textual representation.
    Enum(compact_str::CompactString),
    /// A list of resolved values.
    List(Vec<ResolvedValue>),
    /// A handle to an object/interface/union runtime value.
    Object(Arc<dyn ResolverObject>),
}

impl ResolvedValue {
    /// Convenience constructor for a non-null scalar.
    pub fn scalar(v: impl Into<serde_json::Value>) -> Self {
        ResolvedValue::Scalar(v.into())
    }

    /// Convenience constructor for an object handle.
    pub fn object(value: impl ResolverObject + 'static) -> Self {
        ResolvedValue::Object(Arc::new(value))
    }

    /// Whether this value represents GraphQL null.
    pub fn is_null(&self) -> bool {
        matches!(self, ResolvedValue::Null)
    }
}

/// A declared GraphQL type, as needed to drive serialization.
///
/// Kept intentionally small: this crate does not need a full type-system
/// model (that lives in the out-of-scope schema/validation layer), only
/// enough structure to unwrap non-null/list wrappers and dispatch on the
/// named type's kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeRef {
    /// `T!`
    NonNull(Box<TypeRef>),
    /// `[T]`
    List(Box<TypeRef>),
    /// A named leaf type.
    Named(NamedTypeKind, ArcStr),
}

impl TypeRef {
    /// Non-null wrapper constructor.
    pub fn non_null(inner: TypeRef) -> Self {
        TypeRef::NonNull(Box::new(inner))
    }

    /// List wrapper constructor.
    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    /// Named-type constructor.
    pub fn named(kind: NamedTypeKind, name: impl Into<ArcStr>) -> Self {
        TypeRef::Named(kind, name.into())
    }

    /// Strips exactly one outer non-null wrapper, reporting whether one was
    /// present.
    pub fn unwrap_non_null(&self) -> (bool, &TypeRef) {
        match self {
            TypeRef::NonNull(inner) => (true, inner),
            other => (false, other),
        }
    }

    /// The name of this type for diagnostics, unwrapping modifiers.
    pub fn display_name(&self) -> &str {
        match self {
            TypeRef::NonNull(inner) | TypeRef::List(inner) => inner.display_name(),
            TypeRef::Named(_, name) => name.as_str(),
        }
    }
}

/// The kind of a named (leaf) GraphQL type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamedTypeKind {
    /// A leaf scalar (`Int`, `String`, a custom scalar, ...).
    Scalar,
    /// An enum.
    Enum,
    /// A concrete object type.
    Object,
    /// An interface type.
    Interface,
    /// A union type.
    Union,
}

impl NamedTypeKind {
    /// Whether this kind requires delegating to the selection walker.
    pub fn is_composite(self) -> bool {
        matches!(
            self,
            NamedTypeKind::Object | NamedTypeKind::Interface | NamedTypeKind::Union
        )
    }
}

/// A bound field method: `(receiver, context, packed args) -> resolved value`.
///
/// `Ctx` is the single request-scoped context type threaded through a whole
/// execution, mirroring `juniper::Executor<'a, CtxT>`.
pub type FieldMethod<Ctx> = Arc<
    dyn Fn(
            Arc<dyn ResolverObject>,
            Option<Arc<Ctx>>,
            Option<serde_json::Value>,
        ) -> BoxFuture<'static, Result<ResolvedValue, FieldError>>
        + Send
        + Sync,
>;

/// Metadata and binding for one schema field.
pub struct ResolvableField<Ctx> {
    /// The field's name, as declared in the schema (not the query alias).
    pub name: ArcStr,
    /// The name of the type this field is declared on.
    pub parent_type_name: ArcStr,
    /// The label attached to this field's trace span.
    pub trace_label: ArcStr,
    /// The field's declared GraphQL type.
    pub declared_type: TypeRef,
    /// Whether the bound method accepts the request context.
    pub has_context: bool,
    /// Whether the bound method can fail.
    pub has_error: bool,
    /// Whether this field is safe to resolve concurrently with its siblings.
    pub is_async: bool,
    /// A fixed result bypassing method invocation (used for `__typename`).
    pub fixed_result: Option<ResolvedValue>,
    /// The bound method, `None` only when `fixed_result` is set.
    pub method: Option<FieldMethod<Ctx>>,
}

/// A narrowing discriminator for an interface/union type assertion.
///
/// Returns the narrowed object handle when the runtime value matches the
/// asserted type, `None` otherwise.
pub type Discriminator =
    Arc<dyn Fn(&Arc<dyn ResolverObject>) -> Option<Arc<dyn ResolverObject>> + Send + Sync>;

/// The minimal schema-level data the executor still needs at the root.
///
/// Per-field binding already lives on each [`crate::selection::Selection`];
/// this struct only carries the root type names used for the top-level trace
/// span, since everything below the root is reached through selections that
/// are already bound.
#[derive(Clone, Debug)]
pub struct ResolvableSchema {
    /// Name of the root query type.
    pub query_type_name: ArcStr,
    /// Name of the root mutation type, if the schema defines one.
    pub mutation_type_name: Option<ArcStr>,
}
