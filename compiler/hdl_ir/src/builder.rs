//! Programmatic module construction.
//!
//! The evaluator never parses source itself. Front ends, tests, and
//! embedders build modules through `ModuleBuilder`, which interns names and
//! hands out synthetic, strictly increasing spans so diagnostics stay
//! distinguishable.

use crate::{
    BinaryOp, BuiltinType, ConstantDef, EnumDef, EnumMember, ExprId, ExprKind, Function, Import,
    ImportPath, Item, ItemId, ModRef, Module, Name, Param, ParametricBinding, SharedInterner,
    SharedModule, Span, StructDef, StructMember, TypeAlias, TypeAnnotation, TypeDefinition,
    TypeRef,
};

/// Incremental builder for a [`Module`].
pub struct ModuleBuilder {
    module: Module,
    cursor: u32,
}

impl ModuleBuilder {
    pub fn new(name: &str, interner: &SharedInterner) -> Self {
        let name = interner.intern(name);
        ModuleBuilder {
            module: Module::new(name, interner.clone()),
            cursor: 0,
        }
    }

    /// Intern `text` in the module's interner.
    pub fn name(&self, text: &str) -> Name {
        self.module.interner().intern(text)
    }

    fn next_span(&mut self) -> Span {
        let start = self.cursor;
        self.cursor = self.cursor.saturating_add(1);
        Span::new(start, self.cursor)
    }

    /// Id the item declared `ahead` declarations from now will receive.
    ///
    /// `upcoming_item(0)` is the id of the very next item; this is how
    /// forward references between type definitions are expressed.
    pub fn upcoming_item(&self, ahead: usize) -> ItemId {
        let index = self.module.items.len().saturating_add(ahead);
        ItemId::new(u32::try_from(index).unwrap_or(u32::MAX))
    }

    fn push_item(&mut self, item: Item) -> ItemId {
        let id = self.upcoming_item(0);
        self.module.items.push(item);
        id
    }

    // Expressions

    pub fn expr(&mut self, kind: ExprKind) -> ExprId {
        let span = self.next_span();
        self.module.exprs.alloc(kind, span)
    }

    pub fn number(&mut self, value: i64) -> ExprId {
        self.expr(ExprKind::Number { value, ty: None })
    }

    /// Literal with an explicit type (`u8:5`).
    pub fn typed_number(&mut self, value: i64, ty: TypeAnnotation) -> ExprId {
        self.expr(ExprKind::Number {
            value,
            ty: Some(ty),
        })
    }

    pub fn name_ref(&mut self, name: &str) -> ExprId {
        let name = self.name(name);
        self.expr(ExprKind::NameRef(name))
    }

    pub fn const_ref(&mut self, name: &str) -> ExprId {
        let name = self.name(name);
        self.expr(ExprKind::ConstRef(name))
    }

    pub fn enum_ref(&mut self, enum_def: TypeDefinition, attr: &str) -> ExprId {
        let attr = self.name(attr);
        self.expr(ExprKind::EnumRef { enum_def, attr })
    }

    /// `callee(args...)` where `callee` is a plain name.
    pub fn invoke(&mut self, callee: &str, args: Vec<ExprId>) -> ExprId {
        let callee = self.name_ref(callee);
        self.expr(ExprKind::Invocation { callee, args })
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.expr(ExprKind::Binary { op, lhs, rhs })
    }

    pub fn tuple(&mut self, members: Vec<ExprId>) -> ExprId {
        self.expr(ExprKind::Tuple(members))
    }

    /// `lhs[start:limit]`; returns `(index_expr, slice_expr)`.
    pub fn bit_slice(
        &mut self,
        lhs: ExprId,
        start: Option<i64>,
        limit: Option<i64>,
    ) -> (ExprId, ExprId) {
        let start = start.map(|v| self.number(v));
        let limit = limit.map(|v| self.number(v));
        let slice = self.expr(ExprKind::Slice { start, limit });
        let index = self.expr(ExprKind::Index { lhs, rhs: slice });
        (index, slice)
    }

    pub fn cast(&mut self, expr: ExprId, ty: TypeAnnotation) -> ExprId {
        self.expr(ExprKind::Cast { expr, ty })
    }

    // Annotations

    pub fn ubits(&mut self, width: u32) -> TypeAnnotation {
        self.builtin(false, width)
    }

    pub fn sbits(&mut self, width: u32) -> TypeAnnotation {
        self.builtin(true, width)
    }

    fn builtin(&mut self, signed: bool, width: u32) -> TypeAnnotation {
        let span = self.next_span();
        TypeAnnotation::Builtin(BuiltinType {
            signed,
            width,
            span,
        })
    }

    pub fn tuple_type(&mut self, members: Vec<TypeAnnotation>) -> TypeAnnotation {
        let span = self.next_span();
        TypeAnnotation::Tuple { members, span }
    }

    pub fn array_type(&mut self, element: TypeAnnotation, dim: ExprId) -> TypeAnnotation {
        let span = self.next_span();
        TypeAnnotation::Array {
            element: Box::new(element),
            dim,
            span,
        }
    }

    /// Reference to a type definition, without parametric arguments.
    pub fn type_ref(&mut self, text: &str, definition: TypeDefinition) -> TypeAnnotation {
        self.parametric_type_ref(text, definition, Vec::new())
    }

    pub fn parametric_type_ref(
        &mut self,
        text: &str,
        definition: TypeDefinition,
        parametrics: Vec<ExprId>,
    ) -> TypeAnnotation {
        let span = self.next_span();
        TypeAnnotation::TypeRef {
            type_ref: TypeRef {
                text: self.name(text),
                definition,
                span,
            },
            parametrics,
            span,
        }
    }

    /// `import_alias::attr`, for use as a `TypeDefinition`.
    pub fn mod_ref(&mut self, import: &str, attr: &str) -> TypeDefinition {
        let span = self.next_span();
        TypeDefinition::Imported(ModRef {
            import: self.name(import),
            attr: self.name(attr),
            span,
        })
    }

    // Items

    pub fn function(
        &mut self,
        name: &str,
        params: Vec<(&str, TypeAnnotation)>,
        body: ExprId,
    ) -> ItemId {
        let params = params
            .into_iter()
            .map(|(name, ty)| {
                let span = self.next_span();
                Param {
                    name: self.name(name),
                    ty,
                    span,
                }
            })
            .collect();
        let span = self.next_span();
        let name = self.name(name);
        self.push_item(Item::Function(Function {
            name,
            params,
            body,
            span,
        }))
    }

    pub fn constant(&mut self, name: &str, value: ExprId) -> ItemId {
        let span = self.next_span();
        let name = self.name(name);
        self.push_item(Item::Constant(ConstantDef { name, value, span }))
    }

    pub fn type_alias(&mut self, name: &str, ty: TypeAnnotation) -> ItemId {
        let span = self.next_span();
        let name = self.name(name);
        self.push_item(Item::TypeAlias(TypeAlias { name, ty, span }))
    }

    pub fn struct_def(
        &mut self,
        name: &str,
        parametrics: Vec<(&str, TypeAnnotation)>,
        members: Vec<(&str, TypeAnnotation)>,
    ) -> ItemId {
        let parametrics = parametrics
            .into_iter()
            .map(|(name, ty)| {
                let span = self.next_span();
                ParametricBinding {
                    name: self.name(name),
                    ty,
                    span,
                }
            })
            .collect();
        let members = members
            .into_iter()
            .map(|(name, ty)| {
                let span = self.next_span();
                StructMember {
                    name: self.name(name),
                    ty,
                    span,
                }
            })
            .collect();
        let span = self.next_span();
        let name = self.name(name);
        self.push_item(Item::Struct(StructDef {
            name,
            parametrics,
            members,
            span,
        }))
    }

    pub fn enum_def(
        &mut self,
        name: &str,
        underlying: TypeAnnotation,
        members: Vec<(&str, ExprId)>,
    ) -> ItemId {
        let members = members
            .into_iter()
            .map(|(name, value)| {
                let span = self.next_span();
                EnumMember {
                    name: self.name(name),
                    value,
                    span,
                }
            })
            .collect();
        let span = self.next_span();
        let name = self.name(name);
        self.push_item(Item::Enum(EnumDef {
            name,
            underlying,
            members,
            span,
        }))
    }

    /// `import a::b [as alias]`; without an alias the last segment is used.
    pub fn import(&mut self, path: &[&str], alias: Option<&str>) -> ItemId {
        let subject = ImportPath(path.iter().map(|segment| self.name(segment)).collect());
        let alias = match alias.or_else(|| path.last().copied()) {
            Some(alias) => self.name(alias),
            None => Name::EMPTY,
        };
        let span = self.next_span();
        self.push_item(Item::Import(Import {
            subject,
            alias,
            span,
        }))
    }

    /// Finish building and wrap the module in a shared handle.
    pub fn finish(self) -> SharedModule {
        SharedModule::new(self.module)
    }
}
