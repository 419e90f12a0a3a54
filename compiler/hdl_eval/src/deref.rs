//! Alias/deref resolution.
//!
//! Follows `type X = Y` chains to the struct, enum, or non-alias annotation
//! at the end. A step into another module binds that module's top level
//! afresh and continues inside it, so the result carries the scope in
//! which its item ids and expressions are meaningful.

use hdl_ir::{ItemId, SharedModule, TypeAnnotation, TypeDefinition};
use hdl_value::errors::{alias_chain_too_deep, dangling_reference, not_an_enum, undefined_type};
use hdl_value::EvalResult;

use crate::top_level::bind_top_level_into;
use crate::{Bindings, ConstEvalHost, ScopeId};

/// Terminal of a deref chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DerefTarget {
    Struct(ItemId),
    Enum(ItemId),
    /// Annotation an alias names, when it is not a plain reference to
    /// another definition.
    Annotation(TypeAnnotation),
}

impl DerefTarget {
    pub const fn kind_name(&self) -> &'static str {
        match self {
            DerefTarget::Struct(_) => "struct",
            DerefTarget::Enum(_) => "enum",
            DerefTarget::Annotation(_) => "type annotation",
        }
    }
}

/// A deref result and the scope of the module that owns it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deref {
    pub target: DerefTarget,
    pub scope: ScopeId,
}

impl Deref {
    pub fn module<'b>(&self, bindings: &'b Bindings) -> &'b SharedModule {
        bindings.module(self.scope)
    }
}

/// Dereference `type_def`, as written in the module of `scope`.
///
/// An alias whose annotation is a type reference with parametric arguments
/// stops the chain; the caller concretizes that annotation so the arguments
/// are honoured.
///
/// Imported modules are bound as new roots in `bindings`; callers that do
/// not need them afterwards wrap the call in [`Bindings::scoped`].
#[tracing::instrument(level = "trace", skip_all)]
pub fn evaluate_to_struct_or_enum_or_annotation<H: ConstEvalHost>(
    type_def: &TypeDefinition,
    bindings: &mut Bindings,
    scope: ScopeId,
    host: &mut H,
) -> EvalResult<Deref> {
    let limit = host.config().max_alias_depth;
    let start_text = bindings.module(scope).type_definition_text(type_def);
    let mut current = type_def.clone();
    let mut scope = scope;

    for _ in 0..=limit {
        match current {
            TypeDefinition::Struct(item) => {
                return Ok(Deref {
                    target: DerefTarget::Struct(item),
                    scope,
                });
            }
            TypeDefinition::Enum(item) => {
                return Ok(Deref {
                    target: DerefTarget::Enum(item),
                    scope,
                });
            }
            TypeDefinition::Alias(item) => {
                let module = bindings.module(scope);
                let alias = module
                    .alias(item)
                    .ok_or_else(|| dangling_reference("type alias"))?;
                tracing::trace!(alias = module.text(alias.name), "following alias");
                match &alias.ty {
                    TypeAnnotation::TypeRef {
                        type_ref,
                        parametrics,
                        ..
                    } if parametrics.is_empty() => current = type_ref.definition.clone(),
                    other => {
                        return Ok(Deref {
                            target: DerefTarget::Annotation(other.clone()),
                            scope,
                        });
                    }
                }
            }
            TypeDefinition::Imported(mod_ref) => {
                let imported = bindings
                    .resolve_module(scope, mod_ref.import)
                    .map_err(|e| e.with_span(mod_ref.span))?;
                let Some((item, kind)) = imported.type_definition(mod_ref.attr) else {
                    let module = bindings.module(scope);
                    let text = format!(
                        "{}::{}",
                        module.text(mod_ref.import),
                        module.text(mod_ref.attr)
                    );
                    return Err(undefined_type(&text).with_span(mod_ref.span));
                };
                tracing::trace!(module = imported.name_str(), "entering imported module");
                scope = bind_top_level_into(bindings, &imported, host)?;
                current = TypeDefinition::local(kind, item);
            }
        }
    }

    Err(alias_chain_too_deep(&start_text, limit))
}

/// Dereference `type_def` and require an enum; returns the enum and the
/// scope of its module.
pub fn evaluate_to_enum<H: ConstEvalHost>(
    type_def: &TypeDefinition,
    bindings: &mut Bindings,
    scope: ScopeId,
    host: &mut H,
) -> EvalResult<(ItemId, ScopeId)> {
    let deref = evaluate_to_struct_or_enum_or_annotation(type_def, bindings, scope, host)?;
    match deref.target {
        DerefTarget::Enum(item) => Ok((item, deref.scope)),
        other => {
            let text = bindings.module(scope).type_definition_text(type_def);
            Err(not_an_enum(&text, other.kind_name()))
        }
    }
}
