//! HDL IR - syntax tree types consumed by the constant evaluator.
//!
//! This crate contains:
//! - Spans for source locations
//! - Names for interned identifiers
//! - Modules, top-level items, and type annotations
//! - A flat expression arena (`ExprId` indices, no `Box<Expr>`)
//! - `ModuleBuilder` for constructing modules without a parser
//!
//! The tree is read-only once a module is finished; evaluation never
//! mutates it.

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod builder;
mod builtins;
mod display;
mod expr;
mod interner;
mod module;
mod name;
mod span;
mod types;

pub use builder::ModuleBuilder;
pub use builtins::Builtin;
pub use expr::{BinaryOp, Expr, ExprArena, ExprId, ExprKind};
pub use interner::{InternError, SharedInterner, StringInterner};
pub use module::{
    ConstantDef, EnumDef, EnumMember, Function, Import, ImportPath, Item, ItemId, Module, Param,
    ParametricBinding, SharedModule, StructDef, StructMember, TypeAlias,
};
pub use name::Name;
pub use span::Span;
pub use types::{
    BuiltinType, ChannelDirection, ModRef, TypeAnnotation, TypeDefKind, TypeDefinition, TypeRef,
};
