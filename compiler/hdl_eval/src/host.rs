//! Capabilities the evaluator needs from the rest of the front end.
//!
//! The constant evaluator never interprets general expressions, runs the
//! type checker, or locates imported files itself. A host implementing
//! [`ConstEvalHost`] supplies those, and the evaluator calls back into it.
//! Calls are re-entrant: `eval` may call `make_top_level_bindings` or the
//! concretizer again for other modules or types.

use hdl_ir::{ExprId, ImportPath, ItemId, SharedModule};
use hdl_value::{EvalResult, Value};

use crate::{Bindings, EvalConfig, ParametricContext, ScopeId};

/// Start bit and width of a bit-slice, as recorded by the type checker.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct StartWidth {
    pub start: usize,
    pub width: usize,
}

/// Evaluator capability interface.
pub trait ConstEvalHost {
    /// Opaque result of type checking a module.
    type TypeInfo;

    /// Evaluate `expr` (owned by `module`) in `scope`.
    fn eval(
        &mut self,
        module: &SharedModule,
        expr: ExprId,
        bindings: &mut Bindings,
        scope: ScopeId,
    ) -> EvalResult<Value>;

    /// Whether `constant` is currently being evaluated.
    fn is_wip(&self, module: &SharedModule, constant: ItemId) -> bool;

    /// With `None`: return the memoized value if there is one, otherwise
    /// mark the constant in progress and return `None`. With `Some`: record
    /// the finished value.
    fn note_wip(
        &mut self,
        module: &SharedModule,
        constant: ItemId,
        value: Option<Value>,
    ) -> Option<Value>;

    /// Type check a newly loaded dependency.
    fn typecheck(&mut self, module: &SharedModule) -> EvalResult<Self::TypeInfo>;

    /// Resolve (and compile, if needed) the module at `path`.
    ///
    /// A module loaded for the first time must be passed to
    /// [`typecheck`](Self::typecheck) before it is returned; later imports of
    /// the same path reuse the result. [`ImportCache`](crate::ImportCache)
    /// holds both.
    fn import(&mut self, path: &ImportPath) -> EvalResult<SharedModule>;

    /// Slice metadata for `slice` under the given parametric context.
    fn slice_start_width(
        &self,
        _module: &SharedModule,
        _slice: ExprId,
        _context: Option<&ParametricContext>,
    ) -> Option<StartWidth> {
        None
    }

    fn config(&self) -> EvalConfig {
        EvalConfig::default()
    }
}
