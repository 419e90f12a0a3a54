//! Reference evaluation.
//!
//! The small set of expression forms the constant evaluator resolves on its
//! own rather than delegating to the host: names, constant references, enum
//! members, and bit-slices whose bounds the type checker already computed.

use hdl_ir::{Expr, ExprId, ExprKind, SharedModule};
use hdl_value::errors::{
    dangling_reference, missing_slice_metadata, slice_out_of_range, undefined_member,
    unexpected_expr,
};
use hdl_value::{Bits, EnumDefRef, EvalResult, Value};

use crate::concretize::{sized_member, underlying_bits};
use crate::deref::evaluate_to_enum;
use crate::{Bindings, ConstEvalHost, ScopeId, StartWidth};

fn expr_node(module: &SharedModule, expr: ExprId) -> EvalResult<&Expr> {
    module
        .expr(expr)
        .ok_or_else(|| dangling_reference("expression"))
}

/// Value of a `NameRef` expression.
pub fn evaluate_name_ref(expr: ExprId, bindings: &Bindings, scope: ScopeId) -> EvalResult<Value> {
    let module = bindings.module(scope);
    let node = expr_node(module, expr)?;
    match &node.kind {
        ExprKind::NameRef(name) => bindings
            .resolve_value(scope, *name)
            .map_err(|e| e.with_span(node.span)),
        _ => Err(unexpected_expr("a name reference", &module.expr_text(expr))),
    }
}

/// Value of a `ConstRef` expression.
pub fn evaluate_const_ref(expr: ExprId, bindings: &Bindings, scope: ScopeId) -> EvalResult<Value> {
    let module = bindings.module(scope);
    let node = expr_node(module, expr)?;
    match &node.kind {
        ExprKind::ConstRef(name) => bindings
            .resolve_value(scope, *name)
            .map_err(|e| e.with_span(node.span)),
        _ => Err(unexpected_expr("a constant reference", &module.expr_text(expr))),
    }
}

/// Value of an `Enum::Member` expression.
///
/// The enum is found through aliases and imports; the member's value is
/// evaluated at the top level of the enum's module and sized to its
/// underlying type.
#[tracing::instrument(level = "trace", skip_all)]
pub fn evaluate_enum_ref<H: ConstEvalHost>(
    expr: ExprId,
    bindings: &mut Bindings,
    scope: ScopeId,
    host: &mut H,
) -> EvalResult<Value> {
    let module = bindings.module(scope).clone();
    let node = expr_node(&module, expr)?;
    let ExprKind::EnumRef { enum_def, attr } = &node.kind else {
        return Err(unexpected_expr("an enum reference", &module.expr_text(expr)));
    };

    bindings
        .scoped(|scratch| -> EvalResult<Value> {
            let (item, home) = evaluate_to_enum(enum_def, scratch, scope, host)?;
            let home_module = scratch.module(home).clone();
            let def = home_module
                .enum_def(item)
                .ok_or_else(|| dangling_reference("enum"))?;
            let member = def.member(*attr).ok_or_else(|| {
                undefined_member(home_module.text(def.name), module.text(*attr))
            })?;

            let (_, width) = underlying_bits(def, scratch, home, host)?;
            let root = scratch.root_of(home);
            let value = host.eval(&home_module, member.value, scratch, root)?;
            let enum_name = home_module.text(def.name);
            let bits = sized_member(&value, width, enum_name, home_module.text(member.name))?;
            Ok(Value::make_enum(bits, EnumDefRef::new(home_module.clone(), item)))
        })
        .map_err(|e| e.with_span(node.span))
}

/// Slice `bits` per the bit-slice expression `expr` (`x[a:b]`).
///
/// Start and width come from the host's type information for the slice
/// node under the scope's parametric context, not from evaluating the
/// bounds.
pub fn evaluate_index_bitslice<H: ConstEvalHost>(
    expr: ExprId,
    bindings: &Bindings,
    scope: ScopeId,
    bits: &Bits,
    host: &H,
) -> EvalResult<Value> {
    let module = bindings.module(scope);
    let text = || module.expr_text(expr);
    let node = expr_node(module, expr)?;
    let span = node.span;
    let ExprKind::Index { rhs, .. } = &node.kind else {
        return Err(unexpected_expr("a bit slice", &text()));
    };
    if !matches!(module.expr(*rhs).map(|e| &e.kind), Some(ExprKind::Slice { .. })) {
        return Err(unexpected_expr("a bit slice", &text()));
    }

    let StartWidth { start, width } = host
        .slice_start_width(module, *rhs, bindings.parametric_context(scope))
        .ok_or_else(|| missing_slice_metadata(&text()).with_span(span))?;
    bits.slice(start, width)
        .map(Value::UBits)
        .ok_or_else(|| slice_out_of_range(start, width, bits.width()).with_span(span))
}
