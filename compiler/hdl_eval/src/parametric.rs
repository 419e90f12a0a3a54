//! Parametric struct binding.
//!
//! `Foo[8, M]` instantiates `struct Foo<N: u32, P: u16>` by binding `N` and
//! `P` in a fresh scope nested in the struct's home scope. Member
//! annotations are then concretized in that scope, so `uN[N]` sees the
//! argument rather than any outer `N`.

use hdl_ir::{ExprId, ExprKind, StructDef, TypeAnnotation};
use hdl_value::errors::{
    dangling_reference, invalid_parametric_argument, parametric_arity_mismatch,
    parametric_literal_overflow,
};
use hdl_value::{Bits, EvalResult, Value};

use crate::{Bindings, Entity, ParametricContext, ScopeId};

/// Bind `struct_def`'s parametrics to `args` and return the new scope.
///
/// `args` belong to the module of `enclosing`, the scope the annotation was
/// written in. `home` is the scope of the module declaring the struct (the
/// same as `enclosing` for local structs). Each argument is either a literal,
/// typed by its own annotation or else by the parametric's declared type, or
/// a name, looked up first among the parametrics already bound and then in
/// `enclosing`. A literal that does not fit its type is an internal
/// consistency fault.
pub fn bindings_with_struct_parametrics(
    struct_def: &StructDef,
    args: &[ExprId],
    bindings: &mut Bindings,
    enclosing: ScopeId,
    home: ScopeId,
) -> EvalResult<ScopeId> {
    if struct_def.parametrics.len() != args.len() {
        let name = bindings.module(home).text(struct_def.name);
        return Err(parametric_arity_mismatch(
            name,
            struct_def.parametrics.len(),
            args.len(),
        ));
    }

    let scope = bindings.child(home);
    let mut context = ParametricContext::new();
    for (binding, &arg) in struct_def.parametrics.iter().zip(args) {
        let value = parametric_argument(&binding.ty, arg, bindings, enclosing, scope)?;
        let concrete = value
            .get_bit_value_int64()
            .map_err(|e| e.with_span(binding.span))?;
        tracing::trace!(
            parametric = bindings.module(home).text(binding.name),
            value = concrete,
            "bound parametric"
        );
        bindings.add_value(scope, binding.name, value);
        context.push(binding.name, concrete);
    }
    bindings.set_parametric_context(scope, context);
    Ok(scope)
}

fn parametric_argument(
    declared: &TypeAnnotation,
    arg: ExprId,
    bindings: &Bindings,
    enclosing: ScopeId,
    scope: ScopeId,
) -> EvalResult<Value> {
    let module = bindings.module(enclosing);
    let expr = module
        .expr(arg)
        .ok_or_else(|| dangling_reference("parametric argument"))?;

    match &expr.kind {
        ExprKind::Number { value, ty } => {
            let ty = ty.as_ref().unwrap_or(declared);
            match ty {
                TypeAnnotation::Builtin(builtin) if !builtin.is_width_marker() => {
                    let width = builtin.width as usize;
                    if !Bits::from_i64(64, *value).fits_in(width, builtin.signed) {
                        let text = module.expr_text(arg);
                        let err = parametric_literal_overflow(&text, &builtin.keyword());
                        return Err(err.with_span(expr.span));
                    }
                    Ok(if builtin.signed {
                        Value::make_sbits(width, *value)
                    } else {
                        Value::make_ubits(width, value.cast_unsigned())
                    })
                }
                _ => Err(invalid_parametric_argument(&module.expr_text(arg)).with_span(expr.span)),
            }
        }
        ExprKind::NameRef(name) => match bindings.resolve_local(scope, *name) {
            Some(Entity::Value(value)) => Ok(value.clone()),
            _ => bindings
                .resolve_value(enclosing, *name)
                .map_err(|e| e.with_span(expr.span)),
        },
        _ => Err(invalid_parametric_argument(&module.expr_text(arg)).with_span(expr.span)),
    }
}
