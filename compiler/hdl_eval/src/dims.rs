//! Dimension resolution.
//!
//! Array sizes and bit widths are written either as integer literals or as
//! a single bound name (usually a parametric). Anything richer is rejected;
//! compile-time arithmetic belongs to the general evaluator.

use hdl_ir::{ExprId, ExprKind};
use hdl_value::errors::{dangling_reference, unsupported_dim_expr};
use hdl_value::{EvalResult, TypeDim};

use crate::{Bindings, ScopeId};

/// A dimension in one of the forms callers hold.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Dim {
    Int(i64),
    /// Expression owned by the module of the resolving scope.
    Expr(ExprId),
    Type(TypeDim),
}

/// Resolve `dim` to an integer using `scope`.
pub fn resolve_dim(dim: Dim, bindings: &Bindings, scope: ScopeId) -> EvalResult<i64> {
    match dim {
        Dim::Int(value) | Dim::Type(TypeDim::Known(value)) => Ok(value),
        Dim::Type(TypeDim::Parametric(name)) => {
            bindings.resolve_value(scope, name)?.get_bit_value_int64()
        }
        Dim::Expr(id) => {
            let module = bindings.module(scope);
            let expr = module
                .expr(id)
                .ok_or_else(|| dangling_reference("expression"))?;
            match &expr.kind {
                ExprKind::Number { value, .. } => Ok(*value),
                ExprKind::NameRef(name) => bindings
                    .resolve_value(scope, *name)
                    .and_then(|value| value.get_bit_value_int64())
                    .map_err(|e| e.with_span(expr.span)),
                _ => Err(unsupported_dim_expr(&module.expr_text(id)).with_span(expr.span)),
            }
        }
    }
}
