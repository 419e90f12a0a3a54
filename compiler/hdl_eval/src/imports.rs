//! Import cache.
//!
//! Maps an import path to the compiled module and its type information so
//! each dependency is loaded and type checked once per cache. Hosts own the
//! cache and consult it from [`ConstEvalHost::import`](crate::ConstEvalHost::import).

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;

use hdl_ir::{ImportPath, SharedModule};
use hdl_value::EvalResult;

/// A compiled dependency.
#[derive(Clone, Debug)]
pub struct ModuleInfo<T> {
    pub module: SharedModule,
    pub type_info: T,
}

#[derive(Clone, Debug)]
pub struct ImportCache<T> {
    modules: FxHashMap<ImportPath, ModuleInfo<T>>,
}

impl<T> Default for ImportCache<T> {
    fn default() -> Self {
        ImportCache {
            modules: FxHashMap::default(),
        }
    }
}

impl<T> ImportCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &ImportPath) -> Option<&ModuleInfo<T>> {
        self.modules.get(path)
    }

    pub fn contains(&self, path: &ImportPath) -> bool {
        self.modules.contains_key(path)
    }

    /// Record a compiled module, replacing any previous entry for `path`.
    pub fn insert(&mut self, path: ImportPath, info: ModuleInfo<T>) {
        self.modules.insert(path, info);
    }

    /// Cached entry for `path`, or load and type check it first.
    ///
    /// `load` and `typecheck` run only on a miss. They cannot reach this
    /// cache; hosts whose loading recurses into further imports should use
    /// [`get`](Self::get) and [`insert`](Self::insert) instead.
    pub fn import(
        &mut self,
        path: &ImportPath,
        load: impl FnOnce(&ImportPath) -> EvalResult<SharedModule>,
        typecheck: impl FnOnce(&SharedModule) -> EvalResult<T>,
    ) -> EvalResult<&ModuleInfo<T>> {
        match self.modules.entry(path.clone()) {
            Entry::Occupied(entry) => Ok(&*entry.into_mut()),
            Entry::Vacant(entry) => {
                let module = load(path)?;
                tracing::debug!(module = module.name_str(), "loaded import");
                let type_info = typecheck(&module)?;
                Ok(&*entry.insert(ModuleInfo { module, type_info }))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
