//! Type concretization.
//!
//! Turns a type annotation, written in the module of some scope, into a
//! [`ConcreteType`]: dimensions become numbers, aliases are followed, enums
//! get their member patterns, and parametric structs are instantiated.
//! Scopes created along the way (imported modules, parametric bindings) are
//! discarded once the type is built.

use hdl_ir::{EnumDef, ItemId, TypeAnnotation};
use hdl_value::errors::{
    bits_too_wide, cannot_concretize, dangling_reference, enum_member_overflow,
    negative_dimension, not_bits, unexpected_parametrics, zero_width_type,
};
use hdl_value::{
    ensure_sufficient_stack, Bits, ConcreteType, EnumDefRef, EnumType, EvalResult, Value,
};

use crate::deref::{evaluate_to_struct_or_enum_or_annotation, DerefTarget};
use crate::dims::{resolve_dim, Dim};
use crate::parametric::bindings_with_struct_parametrics;
use crate::{Bindings, ConstEvalHost, ScopeId};

/// Something that can be concretized: a definition found by deref, or an
/// annotation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConcretizeTarget<'a> {
    Enum(ItemId),
    Struct(ItemId),
    Annotation(&'a TypeAnnotation),
}

/// Concretize `target`; item ids and annotations belong to the module of
/// `scope`.
pub fn concretize_type<H: ConstEvalHost>(
    target: ConcretizeTarget<'_>,
    bindings: &mut Bindings,
    scope: ScopeId,
    host: &mut H,
) -> EvalResult<ConcreteType> {
    match target {
        ConcretizeTarget::Enum(item) => {
            concretize_enum(item, bindings, scope, host).map(ConcreteType::Enum)
        }
        ConcretizeTarget::Struct(item) => concretize_struct(item, bindings, scope, host),
        ConcretizeTarget::Annotation(ty) => concretize_type_annotation(ty, bindings, scope, host),
    }
}

/// Concretize an annotation written in the module of `scope`.
///
/// # Errors
///
/// - `InvalidArgument` for a width-less `uN`/`sN` outside an array, or a
///   negative array dimension.
/// - `Unimplemented` for channel types and dimensions that are neither
///   literals nor names.
/// - `NotFound` for unbound dimension names.
#[tracing::instrument(level = "trace", skip_all)]
pub fn concretize_type_annotation<H: ConstEvalHost>(
    ty: &TypeAnnotation,
    bindings: &mut Bindings,
    scope: ScopeId,
    host: &mut H,
) -> EvalResult<ConcreteType> {
    ensure_sufficient_stack(|| match ty {
        TypeAnnotation::Builtin(builtin) => {
            if builtin.is_width_marker() {
                return Err(zero_width_type(&builtin.keyword()).with_span(builtin.span));
            }
            Ok(ConcreteType::Bits {
                signed: builtin.signed,
                width: u64::from(builtin.width),
            })
        }
        TypeAnnotation::Tuple { members, .. } => members
            .iter()
            .map(|member| concretize_type_annotation(member, bindings, scope, host))
            .collect::<EvalResult<Vec<_>>>()
            .map(ConcreteType::Tuple),
        TypeAnnotation::Array { element, dim, span } => {
            let size = resolve_dim(Dim::Expr(*dim), bindings, scope)?;
            let size = u64::try_from(size).map_err(|_| {
                negative_dimension(&bindings.module(scope).expr_text(*dim), size).with_span(*span)
            })?;
            match element.as_ref() {
                // `uN[16]` is sixteen bits, not sixteen zero-width elements.
                TypeAnnotation::Builtin(builtin) if builtin.is_width_marker() => {
                    Ok(ConcreteType::Bits {
                        signed: builtin.signed,
                        width: size,
                    })
                }
                element => {
                    let element = concretize_type_annotation(element, bindings, scope, host)?;
                    Ok(ConcreteType::array(element, size))
                }
            }
        }
        TypeAnnotation::TypeRef {
            type_ref,
            parametrics,
            span,
        } => bindings
            .scoped(|scratch| {
                let deref = evaluate_to_struct_or_enum_or_annotation(
                    &type_ref.definition,
                    scratch,
                    scope,
                    host,
                )?;
                if parametrics.is_empty() {
                    return match deref.target {
                        DerefTarget::Enum(item) => {
                            concretize_enum(item, scratch, deref.scope, host)
                                .map(ConcreteType::Enum)
                        }
                        DerefTarget::Struct(item) => {
                            concretize_struct(item, scratch, deref.scope, host)
                        }
                        DerefTarget::Annotation(ty) => {
                            concretize_type_annotation(&ty, scratch, deref.scope, host)
                        }
                    };
                }

                let DerefTarget::Struct(item) = deref.target else {
                    let text = scratch.module(scope).annotation_text(ty);
                    return Err(unexpected_parametrics(&text));
                };
                let module = deref.module(scratch).clone();
                let def = module
                    .struct_def(item)
                    .ok_or_else(|| dangling_reference("struct"))?;
                let instance = bindings_with_struct_parametrics(
                    def,
                    parametrics,
                    scratch,
                    scope,
                    deref.scope,
                )?;
                concretize_struct(item, scratch, instance, host)
            })
            .map_err(|e| e.with_span(*span)),
        TypeAnnotation::Channel { span, .. } => {
            Err(cannot_concretize(&bindings.module(scope).annotation_text(ty)).with_span(*span))
        }
    })
}

/// Concretize a struct as the tuple of its member types, in declaration
/// order. `scope` is the struct's home scope or a parametric scope nested
/// in it.
fn concretize_struct<H: ConstEvalHost>(
    item: ItemId,
    bindings: &mut Bindings,
    scope: ScopeId,
    host: &mut H,
) -> EvalResult<ConcreteType> {
    let module = bindings.module(scope).clone();
    let def = module
        .struct_def(item)
        .ok_or_else(|| dangling_reference("struct"))?;
    def.members
        .iter()
        .map(|member| {
            concretize_type_annotation(&member.ty, bindings, scope, host)
                .map_err(|e| e.with_span(member.span))
        })
        .collect::<EvalResult<Vec<_>>>()
        .map(ConcreteType::Tuple)
}

/// Concretize the enum `item` declared in the module of `home`.
///
/// Member values are evaluated at the top level of that module and sized to
/// the underlying type.
pub fn concretize_enum<H: ConstEvalHost>(
    item: ItemId,
    bindings: &mut Bindings,
    home: ScopeId,
    host: &mut H,
) -> EvalResult<EnumType> {
    let module = bindings.module(home).clone();
    let def = module
        .enum_def(item)
        .ok_or_else(|| dangling_reference("enum"))?;

    let (signed, bit_width) = underlying_bits(def, bindings, home, host)?;

    let root = bindings.root_of(home);
    let members = def
        .members
        .iter()
        .map(|member| {
            let value = host
                .eval(&module, member.value, bindings, root)
                .map_err(|e| e.with_span(member.span))?;
            let enum_name = module.text(def.name);
            sized_member(&value, bit_width, enum_name, module.text(member.name))
                .map_err(|e| e.with_span(member.span))
        })
        .collect::<EvalResult<Vec<_>>>()?;

    tracing::debug!(
        enum_name = module.text(def.name),
        width = bit_width,
        members = members.len(),
        "concretized enum"
    );
    Ok(EnumType {
        def: EnumDefRef::new(module.clone(), item),
        signed,
        width: bit_width as u64,
        members,
    })
}

/// Member value resized to the enum's width. Narrowing may only drop
/// redundant sign or zero bits.
pub(crate) fn sized_member(
    value: &Value,
    width: usize,
    enum_name: &str,
    member: &str,
) -> EvalResult<Bits> {
    let bits = value.get_bits()?;
    if !bits.fits_in(width, value.is_signed()) {
        return Err(enum_member_overflow(enum_name, member, width));
    }
    Ok(bits.resize(width, value.is_signed()))
}

/// Signedness and width of an enum's underlying type.
pub(crate) fn underlying_bits<H: ConstEvalHost>(
    def: &EnumDef,
    bindings: &mut Bindings,
    home: ScopeId,
    host: &mut H,
) -> EvalResult<(bool, usize)> {
    let underlying = concretize_type_annotation(&def.underlying, bindings, home, host)?;
    let ConcreteType::Bits { signed, width } = underlying else {
        return Err(not_bits(&underlying.to_string()).with_span(def.underlying.span()));
    };
    let width = usize::try_from(width).map_err(|_| bits_too_wide(usize::MAX))?;
    Ok((signed, width))
}
