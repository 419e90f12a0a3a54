//! Evaluator configuration.

/// Policy knobs for constant and type evaluation.
///
/// Hosts return this from [`ConstEvalHost::config`](crate::ConstEvalHost::config);
/// the defaults suit normal compilation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EvalConfig {
    /// Longest alias/deref chain followed before giving up. Exceeding it is
    /// reported as a probable alias cycle.
    pub max_alias_depth: usize,
    /// Bind `__top_level_bindings_<module>` to nil at the end of every
    /// top-level binding pass, marking which module a scope belongs to.
    pub bind_module_marker: bool,
}

impl EvalConfig {
    pub const DEFAULT_MAX_ALIAS_DEPTH: usize = 256;

    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_alias_depth(mut self, depth: usize) -> Self {
        self.max_alias_depth = depth;
        self
    }

    #[must_use]
    pub fn with_module_marker(mut self, enabled: bool) -> Self {
        self.bind_module_marker = enabled;
        self
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            max_alias_depth: Self::DEFAULT_MAX_ALIAS_DEPTH,
            bind_module_marker: true,
        }
    }
}

/// Name of the marker binding for a module named `module_name`.
pub fn module_marker_name(module_name: &str) -> String {
    format!("__top_level_bindings_{module_name}")
}
