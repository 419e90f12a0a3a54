//! Shared test utilities.
//!
//! `TestHost` evaluates literals, references, `+`/`-`/`++`, tuples, casts,
//! bit-slices, and calls. A call re-enters `make_top_level_bindings` for the
//! callee's module and records which of that module's constants were
//! visible, so tests can observe early stopping.

use rustc_hash::FxHashMap;

use hdl_eval::{
    concretize_type_annotation, evaluate_const_ref, evaluate_enum_ref, evaluate_index_bitslice,
    evaluate_name_ref, make_top_level_bindings, Bindings, ConstEvalHost, EvalConfig, ImportCache,
    ModuleInfo, ParametricContext, ScopeId, StartWidth, WipTable,
};
use hdl_ir::{
    BinaryOp, Builtin, ExprId, ExprKind, ImportPath, Item, ItemId, SharedInterner, SharedModule,
    TypeAnnotation,
};
use hdl_value::errors::{dangling_reference, length_mismatch, undefined_module, unexpected_expr};
use hdl_value::{
    cast_bits_to_array, cast_bits_to_enum, ConcreteType, EvalResult, FunctionRef, Value,
};

/// One function call made during evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Call {
    pub function: &'static str,
    /// Constants of the callee's module bound when its body ran.
    pub visible: Vec<&'static str>,
}

pub struct TestHost {
    interner: SharedInterner,
    library: FxHashMap<ImportPath, SharedModule>,
    pub imports: ImportCache<()>,
    pub wip: WipTable,
    pub slices: FxHashMap<ExprId, StartWidth>,
    pub config: EvalConfig,
    pub calls: Vec<Call>,
    pub evals: usize,
    pub typechecks: usize,
}

impl TestHost {
    pub fn new(interner: &SharedInterner) -> Self {
        TestHost {
            interner: interner.clone(),
            library: FxHashMap::default(),
            imports: ImportCache::new(),
            wip: WipTable::new(),
            slices: FxHashMap::default(),
            config: EvalConfig::default(),
            calls: Vec::new(),
            evals: 0,
            typechecks: 0,
        }
    }

    /// Make `module` importable as `import <name>`.
    pub fn provide(&mut self, module: &SharedModule) {
        self.library
            .insert(ImportPath(vec![module.name]), module.clone());
    }

    fn call(
        &mut self,
        home: &SharedModule,
        function: ItemId,
        args: Vec<Value>,
    ) -> EvalResult<Value> {
        let def = home
            .function(function)
            .ok_or_else(|| dangling_reference("function"))?;
        if def.params.len() != args.len() {
            return Err(length_mismatch(def.params.len(), args.len()));
        }

        let mut top = make_top_level_bindings(home, self)?;
        let visible = home
            .members()
            .filter_map(|(_, item)| match item {
                Item::Constant(constant) => Some(constant.name),
                _ => None,
            })
            .filter(|name| top.bindings.resolve_local(top.scope, *name).is_some())
            .map(|name| home.text(name))
            .collect();
        self.calls.push(Call {
            function: home.text(def.name),
            visible,
        });

        let frame = top.bindings.child(top.scope);
        for (param, arg) in def.params.iter().zip(args) {
            top.bindings.add_value(frame, param.name, arg);
        }
        self.eval(home, def.body, &mut top.bindings, frame)
    }

    fn cast(
        &mut self,
        module: &SharedModule,
        value: &Value,
        ty: &TypeAnnotation,
        bindings: &mut Bindings,
        scope: ScopeId,
    ) -> EvalResult<Value> {
        let bits = value.get_bits()?;
        match concretize_type_annotation(ty, bindings, scope, self)? {
            ConcreteType::Bits { signed, width } => {
                let bits = bits.resize(usize::try_from(width).unwrap(), value.is_signed());
                Ok(if signed {
                    Value::SBits(bits)
                } else {
                    Value::UBits(bits)
                })
            }
            ConcreteType::Array { element, size } => cast_bits_to_array(
                bits,
                usize::try_from(element.total_bit_count()).unwrap(),
                usize::try_from(size).unwrap(),
            ),
            ConcreteType::Enum(enum_type) => cast_bits_to_enum(bits, &enum_type),
            ConcreteType::Tuple(_) => {
                Err(unexpected_expr("a bits type", &module.annotation_text(ty)))
            }
        }
    }
}

fn arithmetic(op: BinaryOp, lhs: &Value, rhs: &Value) -> EvalResult<Value> {
    let (a, b) = (lhs.get_bits()?, rhs.get_bits()?);
    if op == BinaryOp::Concat {
        return Ok(Value::UBits(a.concat(b)));
    }
    if a.width() != b.width() {
        return Err(length_mismatch(a.width(), b.width()));
    }
    let width = a.width();
    if lhs.is_signed() {
        let (x, y) = (lhs.get_bit_value_int64()?, rhs.get_bit_value_int64()?);
        let result = if op == BinaryOp::Add {
            x.wrapping_add(y)
        } else {
            x.wrapping_sub(y)
        };
        Ok(Value::make_sbits(width, result))
    } else {
        let (x, y) = (a.to_u64().unwrap_or(0), b.to_u64().unwrap_or(0));
        let result = if op == BinaryOp::Add {
            x.wrapping_add(y)
        } else {
            x.wrapping_sub(y)
        };
        Ok(Value::make_ubits(width, result))
    }
}

impl ConstEvalHost for TestHost {
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
            } => {
                let width = usize::try_from(builtin.width).unwrap();
                Ok(if builtin.signed {
                    Value::make_sbits(width, *value)
                } else {
                    Value::make_ubits(width, value.cast_unsigned())
                })
            }
            ExprKind::Number { ty: Some(ty), .. } => Err(unexpected_expr(
                "a builtin-typed literal",
                &module.annotation_text(ty),
            )),
            ExprKind::NameRef(_) => evaluate_name_ref(expr, bindings, scope),
            ExprKind::ConstRef(_) => evaluate_const_ref(expr, bindings, scope),
            ExprKind::EnumRef { .. } => evaluate_enum_ref(expr, bindings, scope, self),
            ExprKind::Binary { op, lhs, rhs } => {
                let lhs = self.eval(module, *lhs, bindings, scope)?;
                let rhs = self.eval(module, *rhs, bindings, scope)?;
                arithmetic(*op, &lhs, &rhs)
            }
            ExprKind::Tuple(members) => members
                .iter()
                .map(|member| self.eval(module, *member, bindings, scope))
                .collect::<EvalResult<Vec<_>>>()
                .map(Value::tuple),
            ExprKind::Index { lhs, .. } => {
                let lhs = self.eval(module, *lhs, bindings, scope)?;
                evaluate_index_bitslice(expr, bindings, scope, lhs.get_bits()?, self)
            }
            ExprKind::Cast { expr: inner, ty } => {
                let value = self.eval(module, *inner, bindings, scope)?;
                self.cast(module, &value, ty, bindings, scope)
            }
            ExprKind::Invocation { callee, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.eval(module, *arg, bindings, scope))
                    .collect::<EvalResult<Vec<_>>>()?;
                match self.eval(module, *callee, bindings, scope)? {
                    Value::Function(FunctionRef::User {
                        module: home,
                        function,
                    }) => self.call(&home, function, args),
                    Value::Function(FunctionRef::Builtin(Builtin::Rev)) => match args.as_slice() {
                        [arg] => Ok(Value::UBits(arg.get_bits()?.reverse())),
                        _ => Err(length_mismatch(1, args.len())),
                    },
                    other => Err(unexpected_expr("a callable function", &other.to_string())),
                }
            }
            ExprKind::Slice { .. } => {
                Err(unexpected_expr("an expression", &module.expr_text(expr)))
            }
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
        self.typechecks += 1;
        Ok(())
    }

    fn import(&mut self, path: &ImportPath) -> EvalResult<SharedModule> {
        if let Some(info) = self.imports.get(path) {
            return Ok(info.module.clone());
        }
        let module = self.library.get(path).cloned().ok_or_else(|| {
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

pub fn ubits(width: usize, value: u64) -> Value {
    Value::make_ubits(width, value)
}
