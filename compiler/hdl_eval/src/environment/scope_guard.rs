//! RAII guard for scratch scopes.
//!
//! Parametric instantiation and imported-module bindings create scopes that
//! are only needed while one type or reference is being resolved. The
//! [`ScopedBindings`] guard records the arena length on entry and truncates
//! back to it when dropped, even during unwinding.
//!
//! ```text
//! let ty = bindings.scoped(|scratch| {
//!     let child = scratch.child(scope);
//!     concretize_type_annotation(annotation, scratch, child, host)
//! });
//! // `child` no longer exists here
//! ```
//!
//! Scope ids created inside the guard must not escape it.

use std::ops::{Deref, DerefMut};

use super::Bindings;

pub struct ScopedBindings<'a> {
    bindings: &'a mut Bindings,
    mark: usize,
}

impl Drop for ScopedBindings<'_> {
    fn drop(&mut self) {
        self.bindings.scopes.truncate(self.mark);
    }
}

impl Deref for ScopedBindings<'_> {
    type Target = Bindings;

    fn deref(&self) -> &Self::Target {
        self.bindings
    }
}

impl DerefMut for ScopedBindings<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.bindings
    }
}

impl Bindings {
    /// Guard that discards every scope created through it on drop.
    pub fn scratch(&mut self) -> ScopedBindings<'_> {
        let mark = self.scopes.len();
        ScopedBindings {
            bindings: self,
            mark,
        }
    }

    /// Run `f` with scratch scopes that are discarded when it returns.
    pub fn scoped<T>(&mut self, f: impl FnOnce(&mut Bindings) -> T) -> T {
        let mut scratch = self.scratch();
        f(&mut scratch)
    }
}
