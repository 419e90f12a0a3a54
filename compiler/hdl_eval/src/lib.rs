//! HDL constant evaluator.
//!
//! Computes the values of top-level constants and the concrete shapes of
//! type annotations at compile time.
//!
//! # Architecture
//!
//! - [`Bindings`]: arena of lexical scopes, addressed by [`ScopeId`]
//! - [`make_top_level_bindings`]: root scope of a module, with constants
//!   memoized through the host's [`WipTable`]
//! - [`concretize_type_annotation`]: annotation to [`ConcreteType`](hdl_value::ConcreteType)
//! - [`evaluate_to_struct_or_enum_or_annotation`]: alias and import chains
//! - [`bindings_with_struct_parametrics`]: parametric struct instantiation
//! - [`resolve_dim`]: array sizes and widths
//!
//! General expression evaluation, type checking, and import loading are
//! supplied by the caller through [`ConstEvalHost`].

mod concretize;
mod config;
mod deref;
mod dims;
mod environment;
mod host;
mod imports;
mod logging;
mod parametric;
mod refs;
mod top_level;
mod wip;

pub use concretize::{
    concretize_enum, concretize_type, concretize_type_annotation, ConcretizeTarget,
};
pub use config::{module_marker_name, EvalConfig};
pub use deref::{
    evaluate_to_enum, evaluate_to_struct_or_enum_or_annotation, Deref, DerefTarget,
};
pub use dims::{resolve_dim, Dim};
pub use environment::{
    Bindings, Entity, ParametricContext, ScopeId, ScopedBindings, TypeDefBinding,
};
pub use host::{ConstEvalHost, StartWidth};
pub use imports::{ImportCache, ModuleInfo};
pub use logging::init_tracing;
pub use parametric::bindings_with_struct_parametrics;
pub use refs::{evaluate_const_ref, evaluate_enum_ref, evaluate_index_bitslice, evaluate_name_ref};
pub use top_level::{bind_top_level_into, make_top_level_bindings, ModuleBindings};
pub use wip::{WipState, WipTable};

#[cfg(test)]
mod test_support;
