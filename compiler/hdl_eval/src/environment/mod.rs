//! Binding environment for constant evaluation.
//!
//! Every scope lives in one arena, [`Bindings`], and is addressed by a
//! [`ScopeId`]. A scope's parent always has a strictly lower index, so parent
//! chains are acyclic by construction and no reference counting is needed.
//!
//! Lookup walks from a scope outward through its parents; the first match
//! wins. Bindings are never removed, only overwritten within one scope
//! (which is how a constant's final value replaces nothing but itself).

mod scope_guard;

use std::fmt;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use hdl_ir::{ItemId, Name, SharedModule, TypeDefKind, TypeDefinition};
use hdl_value::errors::{
    not_a_module, not_a_type, not_a_value, undefined_module, undefined_type, undefined_value,
};
use hdl_value::{EvalResult, FunctionRef, Value};

pub use scope_guard::ScopedBindings;

/// Index of a scope in a [`Bindings`] arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ScopeId(u32);

impl ScopeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId({})", self.0)
    }
}

/// A type definition bound in a scope: where it is declared and what kind
/// of definition it is.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeDefBinding {
    pub module: SharedModule,
    pub item: ItemId,
    pub kind: TypeDefKind,
}

impl TypeDefBinding {
    /// The binding as a definition local to its own module.
    pub fn definition(&self) -> TypeDefinition {
        TypeDefinition::local(self.kind, self.item)
    }
}

/// Anything a name can be bound to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entity {
    Value(Value),
    Function(FunctionRef),
    TypeDef(TypeDefBinding),
    Module(SharedModule),
}

impl Entity {
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Entity::Value(_) => "value",
            Entity::Function(_) => "function",
            Entity::TypeDef(binding) => binding.kind.as_str(),
            Entity::Module(_) => "module",
        }
    }
}

/// Symbolic-to-concrete parametric bindings live in a scope, in
/// declaration order.
///
/// Out-of-band metadata such as bit-slice start/width is keyed by this
/// context, since the same slice node can resolve differently per
/// instantiation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ParametricContext {
    symbolic: SmallVec<[(Name, i64); 4]>,
}

impl ParametricContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: Name, value: i64) {
        self.symbolic.push((name, value));
    }

    pub fn get(&self, name: Name) -> Option<i64> {
        self.symbolic
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Name, i64)> + '_ {
        self.symbolic.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.symbolic.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbolic.is_empty()
    }
}

#[derive(Clone, Debug)]
struct ScopeRecord {
    parent: Option<ScopeId>,
    module: SharedModule,
    entries: FxHashMap<Name, Entity>,
    parametric: Option<ParametricContext>,
}

/// Arena of scopes.
#[derive(Clone, Debug, Default)]
pub struct Bindings {
    scopes: Vec<ScopeRecord>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, parent: Option<ScopeId>, module: SharedModule) -> ScopeId {
        let id = ScopeId(u32::try_from(self.scopes.len()).unwrap_or_else(|_| {
            panic!("scope arena exceeded {} scopes", u32::MAX)
        }));
        self.scopes.push(ScopeRecord {
            parent,
            module,
            entries: FxHashMap::default(),
            parametric: None,
        });
        id
    }

    /// New root scope (no parent) for `module`.
    pub fn root(&mut self, module: SharedModule) -> ScopeId {
        self.push(None, module)
    }

    /// New scope nested in `parent`, belonging to the same module.
    pub fn child(&mut self, parent: ScopeId) -> ScopeId {
        let module = self.record(parent).module.clone();
        self.push(Some(parent), module)
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    #[inline]
    fn record(&self, scope: ScopeId) -> &ScopeRecord {
        &self.scopes[scope.index()]
    }

    #[inline]
    fn record_mut(&mut self, scope: ScopeId) -> &mut ScopeRecord {
        &mut self.scopes[scope.index()]
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.record(scope).parent
    }

    /// Module whose names `scope` resolves.
    pub fn module(&self, scope: ScopeId) -> &SharedModule {
        &self.record(scope).module
    }

    /// Outermost ancestor of `scope`.
    pub fn root_of(&self, mut scope: ScopeId) -> ScopeId {
        while let Some(parent) = self.parent(scope) {
            scope = parent;
        }
        scope
    }

    /// `scope` followed by each of its ancestors.
    pub fn ancestry(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope), |s| self.parent(*s))
    }

    // Insertion

    /// Bind `name` in `scope`, replacing any binding of `name` in that same
    /// scope. Parents are never touched.
    pub fn add(&mut self, scope: ScopeId, name: Name, entity: Entity) {
        self.record_mut(scope).entries.insert(name, entity);
    }

    pub fn add_value(&mut self, scope: ScopeId, name: Name, value: Value) {
        self.add(scope, name, Entity::Value(value));
    }

    pub fn add_fn(&mut self, scope: ScopeId, name: Name, function: FunctionRef) {
        self.add(scope, name, Entity::Function(function));
    }

    pub fn add_type_def(&mut self, scope: ScopeId, name: Name, binding: TypeDefBinding) {
        self.add(scope, name, Entity::TypeDef(binding));
    }

    pub fn add_struct_def(
        &mut self,
        scope: ScopeId,
        name: Name,
        module: SharedModule,
        item: ItemId,
    ) {
        self.add_type_def(
            scope,
            name,
            TypeDefBinding {
                module,
                item,
                kind: TypeDefKind::Struct,
            },
        );
    }

    pub fn add_enum_def(&mut self, scope: ScopeId, name: Name, module: SharedModule, item: ItemId) {
        self.add_type_def(
            scope,
            name,
            TypeDefBinding {
                module,
                item,
                kind: TypeDefKind::Enum,
            },
        );
    }

    pub fn add_module(&mut self, scope: ScopeId, name: Name, module: SharedModule) {
        self.add(scope, name, Entity::Module(module));
    }

    // Lookup

    /// Binding of `name` in `scope` itself, ignoring parents.
    pub fn resolve_local(&self, scope: ScopeId, name: Name) -> Option<&Entity> {
        self.record(scope).entries.get(&name)
    }

    /// Innermost binding of `name` visible from `scope`.
    pub fn resolve_entity(&self, scope: ScopeId, name: Name) -> Option<&Entity> {
        self.ancestry(scope)
            .find_map(|s| self.resolve_local(s, name))
    }

    /// Value bound to `name`; functions and modules resolve to their value
    /// forms.
    pub fn resolve_value(&self, scope: ScopeId, name: Name) -> EvalResult<Value> {
        match self.resolve_entity(scope, name) {
            Some(Entity::Value(value)) => Ok(value.clone()),
            Some(Entity::Function(function)) => Ok(Value::Function(function.clone())),
            Some(Entity::Module(module)) => Ok(Value::Module(module.clone())),
            Some(other) => Err(not_a_value(self.text(scope, name), other.kind_name())),
            None => Err(undefined_value(self.text(scope, name))),
        }
    }

    pub fn resolve_type_definition(
        &self,
        scope: ScopeId,
        name: Name,
    ) -> EvalResult<TypeDefBinding> {
        match self.resolve_entity(scope, name) {
            Some(Entity::TypeDef(binding)) => Ok(binding.clone()),
            Some(other) => Err(not_a_type(self.text(scope, name), other.kind_name())),
            None => Err(undefined_type(self.text(scope, name))),
        }
    }

    pub fn resolve_module(&self, scope: ScopeId, name: Name) -> EvalResult<SharedModule> {
        match self.resolve_entity(scope, name) {
            Some(Entity::Module(module)) => Ok(module.clone()),
            Some(other) => Err(not_a_module(self.text(scope, name), other.kind_name())),
            None => Err(undefined_module(self.text(scope, name))),
        }
    }

    /// Names bound directly in `scope`, sorted by text.
    pub fn local_names(&self, scope: ScopeId) -> Vec<&'static str> {
        let module = self.module(scope);
        let mut names: Vec<_> = self
            .record(scope)
            .entries
            .keys()
            .map(|name| module.text(*name))
            .collect();
        names.sort_unstable();
        names
    }

    fn text(&self, scope: ScopeId, name: Name) -> &'static str {
        self.module(scope).text(name)
    }

    // Parametric context

    pub fn set_parametric_context(&mut self, scope: ScopeId, context: ParametricContext) {
        self.record_mut(scope).parametric = Some(context);
    }

    /// Innermost parametric context visible from `scope`.
    pub fn parametric_context(&self, scope: ScopeId) -> Option<&ParametricContext> {
        self.ancestry(scope)
            .find_map(|s| self.record(s).parametric.as_ref())
    }
}
