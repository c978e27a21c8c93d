//! The flat, fragment-resolved selection list consumed by the executor.
//!
//! Producing this list from a query document's selection set (resolving
//! fragments, evaluating `@skip`/`@include`, binding fields to schema
//! methods) is the job of the out-of-scope selection-application
//! collaborator. The executor only ever walks [`Selection`]s.

use std::sync::Arc;

use compact_str::CompactString;

use crate::schema::{Discriminator, ResolvableField};

/// One entry of a flattened selection list.
#[derive(Clone)]
pub enum Selection<Ctx> {
    /// A field bound to a resolvable schema field.
    SchemaField(SchemaFieldSelection<Ctx>),
    /// The `__typename` meta-field on an interface or union.
    TypenameField(TypenameFieldSelection),
    /// An inline fragment or fragment spread against an interface/union.
    TypeAssertion(TypeAssertionSelection<Ctx>),
}

impl<Ctx> Selection<Ctx> {
    /// Whether this selection (recursively, for type assertions) requires
    /// concurrent evaluation of its siblings.
    pub fn is_async(&self) -> bool {
        match self {
            Selection::SchemaField(s) => s.field.is_async,
            Selection::TypenameField(_) => false,
            Selection::TypeAssertion(s) => s.selections.iter().any(Selection::is_async),
        }
    }
}

/// A field selection bound to a resolvable field.
#[derive(Clone)]
pub struct SchemaFieldSelection<Ctx> {
    /// The alias (or field name, if unaliased) under which the result is
    /// stitched into the parent object.
    pub alias: CompactString,
    /// The bound schema field.
    pub field: Arc<ResolvableField<Ctx>>,
    /// Already-packed arguments for the bound method, if it has any.
    pub packed_args: Option<serde_json::Value>,
    /// Nested selections, to be merged with same-alias siblings.
    pub selections: Vec<Selection<Ctx>>,
}

/// The `__typename` meta-field on an interface or union.
#[derive(Clone)]
pub struct TypenameFieldSelection {
    /// The alias under which the runtime type name is stitched.
    pub alias: CompactString,
    /// The assertions used to discriminate the runtime type.
    pub assertions: Vec<TypeAssertionCase>,
}

/// One candidate runtime type for a `__typename` dispatch.
#[derive(Clone)]
pub struct TypeAssertionCase {
    /// The candidate type's name.
    pub type_name: arcstr::ArcStr,
    /// The discriminator deciding whether the runtime value is this type.
    pub discriminator: Discriminator,
}

/// An inline fragment or fragment spread against an interface/union.
#[derive(Clone)]
pub struct TypeAssertionSelection<Ctx> {
    /// The discriminator narrowing the resolver value when it matches.
    pub discriminator: Discriminator,
    /// The selections to apply when the discriminator matches.
    pub selections: Vec<Selection<Ctx>>,
}

/// The kind of a validated operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationKind {
    /// A query: siblings may run concurrently.
    Query,
    /// A mutation: top-level siblings always run serially.
    Mutation,
    /// A subscription: rejected by this executor at the entry point.
    Subscription,
}

/// A validated operation ready for execution.
pub struct Operation<Ctx> {
    /// The operation's kind.
    pub kind: OperationKind,
    /// The flattened top-level selection set.
    pub selection_set: Vec<Selection<Ctx>>,
}

/// Whether any selection in `selections` requires concurrent evaluation.
pub fn any_async<Ctx>(selections: &[Selection<Ctx>]) -> bool {
    selections.iter().any(Selection::is_async)
}
