//! Top-level binding.
//!
//! Builds the root scope of a module: builtins, functions, and type
//! definitions first (none of them need evaluation), then constants and
//! imports in declaration order.
//!
//! Constants are evaluated through the host, which may re-enter this binder
//! for the same module when a constant's expression calls a function that
//! reads other constants. The memo table makes that re-entry cheap and safe:
//! a constant already in progress ends the inner pass early, so the inner
//! pass only sees what was declared before it.

use hdl_ir::{Builtin, Item, SharedModule};
use hdl_value::{ensure_sufficient_stack, EvalResult, FunctionRef, Value};

use crate::config::module_marker_name;
use crate::{Bindings, ConstEvalHost, ScopeId, TypeDefBinding};

/// Root bindings of one module.
#[derive(Clone, Debug)]
pub struct ModuleBindings {
    pub bindings: Bindings,
    pub scope: ScopeId,
}

impl ModuleBindings {
    pub fn module(&self) -> &SharedModule {
        self.bindings.module(self.scope)
    }

    pub fn resolve_value(&self, name: &str) -> EvalResult<Value> {
        let name = self.module().interner().intern(name);
        self.bindings.resolve_value(self.scope, name)
    }
}

/// Build the top-level bindings of `module` in a fresh arena.
///
/// Deterministic for a fixed module and fixed host state. Any evaluation or
/// import failure aborts the pass.
#[tracing::instrument(level = "debug", skip_all, fields(module = module.name_str()))]
pub fn make_top_level_bindings<H: ConstEvalHost>(
    module: &SharedModule,
    host: &mut H,
) -> EvalResult<ModuleBindings> {
    let mut bindings = Bindings::new();
    let scope = bind_top_level_into(&mut bindings, module, host)?;
    Ok(ModuleBindings { bindings, scope })
}

/// Build the top-level bindings of `module` as a new root in `bindings`.
pub fn bind_top_level_into<H: ConstEvalHost>(
    bindings: &mut Bindings,
    module: &SharedModule,
    host: &mut H,
) -> EvalResult<ScopeId> {
    ensure_sufficient_stack(|| {
        let scope = bindings.root(module.clone());
        let interner = module.interner();

        for builtin in Builtin::ALL {
            bindings.add_fn(scope, interner.intern(builtin.name()), FunctionRef::Builtin(builtin));
        }
        for (item, function) in module.functions() {
            bindings.add_fn(
                scope,
                function.name,
                FunctionRef::User {
                    module: module.clone(),
                    function: item,
                },
            );
        }
        for (item, kind, name) in module.type_definitions() {
            bindings.add_type_def(
                scope,
                name,
                TypeDefBinding {
                    module: module.clone(),
                    item,
                    kind,
                },
            );
        }

        bind_members(bindings, scope, module, host)?;

        if host.config().bind_module_marker {
            let marker = interner.intern(&module_marker_name(module.name_str()));
            bindings.add_value(scope, marker, Value::Nil);
        }
        Ok(scope)
    })
}

fn bind_members<H: ConstEvalHost>(
    bindings: &mut Bindings,
    scope: ScopeId,
    module: &SharedModule,
    host: &mut H,
) -> EvalResult<()> {
    for (item, member) in module.members() {
        match member {
            Item::Constant(constant) => {
                let name = module.text(constant.name);
                if host.is_wip(module, item) {
                    tracing::trace!(constant = name, "constant in progress, stopping early");
                    break;
                }
                let value = match host.note_wip(module, item, None) {
                    Some(memo) => memo,
                    None => {
                        let value = host
                            .eval(module, constant.value, bindings, scope)
                            .map_err(|e| {
                                e.with_span(constant.span)
                                    .with_note(format!("while evaluating constant `{name}`"))
                            })?;
                        tracing::trace!(constant = name, %value, "evaluated constant");
                        host.note_wip(module, item, Some(value.clone()));
                        value
                    }
                };
                bindings.add_value(scope, constant.name, value);
            }
            Item::Import(import) => {
                let imported = host
                    .import(&import.subject)
                    .map_err(|e| e.with_span(import.span))?;
                tracing::trace!(
                    import = module.import_path_text(&import.subject),
                    "bound import"
                );
                bindings.add_module(scope, import.alias, imported);
            }
            Item::Function(_) | Item::TypeAlias(_) | Item::Struct(_) | Item::Enum(_) => {}
        }
    }
    Ok(())
}
