//! Memo table for top-level constants.
//!
//! One table belongs to one evaluation context and is passed by reference
//! to whatever implements [`ConstEvalHost`](crate::ConstEvalHost). Keys are
//! `(module, item)` pairs, so constants of different modules never collide.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;

use hdl_ir::{ItemId, SharedModule};
use hdl_value::Value;

/// State of one constant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WipState {
    InProgress,
    Done(Value),
}

#[derive(Clone, Debug, Default)]
pub struct WipTable {
    entries: FxHashMap<(SharedModule, ItemId), WipState>,
}

impl WipTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_wip(&self, module: &SharedModule, constant: ItemId) -> bool {
        matches!(self.get(module, constant), Some(WipState::InProgress))
    }

    /// Memoized value, or mark in progress (see
    /// [`ConstEvalHost::note_wip`](crate::ConstEvalHost::note_wip)).
    pub fn note_wip(
        &mut self,
        module: &SharedModule,
        constant: ItemId,
        value: Option<Value>,
    ) -> Option<Value> {
        let key = (module.clone(), constant);
        match value {
            Some(value) => {
                self.entries.insert(key, WipState::Done(value.clone()));
                Some(value)
            }
            None => match self.entries.entry(key) {
                Entry::Occupied(entry) => match entry.get() {
                    WipState::Done(value) => Some(value.clone()),
                    WipState::InProgress => None,
                },
                Entry::Vacant(entry) => {
                    entry.insert(WipState::InProgress);
                    None
                }
            },
        }
    }

    pub fn get(&self, module: &SharedModule, constant: ItemId) -> Option<&WipState> {
        self.entries.get(&(module.clone(), constant))
    }

    /// Number of constants seen, finished or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
