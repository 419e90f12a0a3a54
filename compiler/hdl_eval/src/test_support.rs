//! Minimal evaluator host for unit tests.
//!
//! Evaluates literals and the reference forms in [`crate::refs`]; anything
//! else is rejected. The integration tests carry a fuller host.

use rustc_hash::FxHashMap;

use hdl_ir::{ExprId, ExprKind, ImportPath, ItemId, SharedInterner, SharedModule, TypeAnnotation};
use hdl_value::errors::{dangling_reference, undefined_module, unexpected_expr};
use hdl_value::{EvalResult, Value};

use crate::{
    evaluate_const_ref, evaluate_enum_ref, evaluate_name_ref, Bindings, ConstEvalHost, EvalConfig,
    ImportCache, ModuleInfo, ParametricContext, ScopeId, StartWidth, WipTable,
};

pub(crate) struct LiteralHost {
    interner: SharedInterner,
    pub wip: WipTable,
    pub modules: FxHashMap<ImportPath, SharedModule>,
    pub imports: ImportCache<()>,
    pub slices: FxHashMap<ExprId, StartWidth>,
    pub config: EvalConfig,
    pub evals: usize,
}

impl LiteralHost {
    pub fn new(interner: &SharedInterner) -> Self {
        LiteralHost {
            interner: interner.clone(),
            wip: WipTable::new(),
            modules: FxHashMap::default(),
            imports: ImportCache::new(),
            slices: FxHashMap::default(),
            config: EvalConfig::default(),
            evals: 0,
        }
    }

    /// Make `module` importable under its own name.
    pub fn provide(&mut self, module: &SharedModule) {
        self.modules
            .insert(ImportPath(vec![module.name]), module.clone());
    }
}

impl ConstEvalHost for LiteralHost {
    type TypeInfo = ();

    fn eval(
        &mut self,
        module: &SharedModule,
        expr: ExprId,
        bindings: &mut Bindings,
        scope: ScopeId,
    ) -> EvalResult<Value> {
        self.evals += 1;
        let node = module
            .expr(expr)
            .ok_or_else(|| dangling_reference("expression"))?;
        match &node.kind {
            ExprKind::Number { value, ty: None } => {
                Ok(Value::make_ubits(32, value.cast_unsigned()))
            }
            ExprKind::Number {
                value,
                ty: Some(TypeAnnotation::Builtin(builtin)),
            } => Ok(if builtin.signed {
                Value::make_sbits(builtin.width as usize, *value)
            } else {
                Value::make_ubits(builtin.width as usize, value.cast_unsigned())
            }),
            ExprKind::NameRef(_) => evaluate_name_ref(expr, bindings, scope),
            ExprKind::ConstRef(_) => evaluate_const_ref(expr, bindings, scope),
            ExprKind::EnumRef { .. } => evaluate_enum_ref(expr, bindings, scope, self),
            _ => Err(unexpected_expr("a literal or reference", &module.expr_text(expr))),
        }
    }

    fn is_wip(&self, module: &SharedModule, constant: ItemId) -> bool {
        self.wip.is_wip(module, constant)
    }

    fn note_wip(
        &mut self,
        module: &SharedModule,
        constant: ItemId,
        value: Option<Value>,
    ) -> Option<Value> {
        self.wip.note_wip(module, constant, value)
    }

    fn typecheck(&mut self, _module: &SharedModule) -> EvalResult<()> {
        Ok(())
    }

    fn import(&mut self, path: &ImportPath) -> EvalResult<SharedModule> {
        if let Some(info) = self.imports.get(path) {
            return Ok(info.module.clone());
        }
        let module = self.modules.get(path).cloned().ok_or_else(|| {
            let text: Vec<_> = path.segments().iter().map(|s| self.interner.lookup(*s)).collect();
            undefined_module(&text.join("::"))
        })?;
        let type_info = self.typecheck(&module)?;
        self.imports.insert(
            path.clone(),
            ModuleInfo {
                module: module.clone(),
                type_info,
            },
        );
        Ok(module)
    }

    fn slice_start_width(
        &self,
        _module: &SharedModule,
        slice: ExprId,
        _context: Option<&ParametricContext>,
    ) -> Option<StartWidth> {
        self.slices.get(&slice).copied()
    }

    fn config(&self) -> EvalConfig {
        self.config.clone()
    }
}
