//! Modules and their top-level items.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::{
    ExprArena, ExprId, Expr, Name, SharedInterner, Span, StringInterner, TypeAnnotation,
    TypeDefKind,
};

/// Index of a top-level item within its module, in declaration order.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct ItemId(u32);

impl ItemId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        ItemId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", self.0)
    }
}

/// Function parameter.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Param {
    pub name: Name,
    pub ty: TypeAnnotation,
    pub span: Span,
}

/// Module-level function. Only its identity matters to constant evaluation;
/// the body is handed to the general evaluator on invocation.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Function {
    pub name: Name,
    pub params: Vec<Param>,
    pub body: ExprId,
    pub span: Span,
}

/// `type Name = annotation;`
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TypeAlias {
    pub name: Name,
    pub ty: TypeAnnotation,
    pub span: Span,
}

/// Compile-time parameter of a struct (`N: u32`).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ParametricBinding {
    pub name: Name,
    pub ty: TypeAnnotation,
    pub span: Span,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct StructMember {
    pub name: Name,
    pub ty: TypeAnnotation,
    pub span: Span,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct StructDef {
    pub name: Name,
    pub parametrics: Vec<ParametricBinding>,
    pub members: Vec<StructMember>,
    pub span: Span,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct EnumMember {
    pub name: Name,
    pub value: ExprId,
    pub span: Span,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct EnumDef {
    pub name: Name,
    /// Underlying integer type (`enum E : u3 { ... }`).
    pub underlying: TypeAnnotation,
    pub members: Vec<EnumMember>,
    pub span: Span,
}

impl EnumDef {
    pub fn member(&self, name: Name) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// `const NAME = expr;`
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ConstantDef {
    pub name: Name,
    pub value: ExprId,
    pub span: Span,
}

/// Dotted import path (`std::float32` is `["std", "float32"]`).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ImportPath(pub Vec<Name>);

impl ImportPath {
    pub fn segments(&self) -> &[Name] {
        &self.0
    }
}

/// `import a.b.c [as alias];`
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Import {
    pub subject: ImportPath,
    /// Local name the imported module is bound to.
    pub alias: Name,
    pub span: Span,
}

/// Top-level module member.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Item {
    Function(Function),
    TypeAlias(TypeAlias),
    Struct(StructDef),
    Enum(EnumDef),
    Constant(ConstantDef),
    Import(Import),
}

impl Item {
    pub fn name(&self) -> Name {
        match self {
            Item::Function(f) => f.name,
            Item::TypeAlias(t) => t.name,
            Item::Struct(s) => s.name,
            Item::Enum(e) => e.name,
            Item::Constant(c) => c.name,
            Item::Import(i) => i.alias,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Item::Function(f) => f.span,
            Item::TypeAlias(t) => t.span,
            Item::Struct(s) => s.span,
            Item::Enum(e) => e.span,
            Item::Constant(c) => c.span,
            Item::Import(i) => i.span,
        }
    }

    /// Type-definition kind, if this item defines a type.
    pub fn type_def_kind(&self) -> Option<TypeDefKind> {
        match self {
            Item::TypeAlias(_) => Some(TypeDefKind::Alias),
            Item::Struct(_) => Some(TypeDefKind::Struct),
            Item::Enum(_) => Some(TypeDefKind::Enum),
            Item::Function(_) | Item::Constant(_) | Item::Import(_) => None,
        }
    }
}

/// A parsed module: top-level items in declaration order plus the
/// expression arena they reference.
#[derive(Clone, Debug)]
pub struct Module {
    pub name: Name,
    pub items: Vec<Item>,
    pub exprs: ExprArena,
    interner: SharedInterner,
}

impl Module {
    pub fn new(name: Name, interner: SharedInterner) -> Self {
        Module {
            name,
            items: Vec::new(),
            exprs: ExprArena::new(),
            interner,
        }
    }

    /// Interner shared by this module's names.
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// Text of an interned name.
    pub fn text(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    pub fn name_str(&self) -> &'static str {
        self.text(self.name)
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id.index())
    }

    pub fn expr(&self, id: ExprId) -> Option<&Expr> {
        self.exprs.get(id)
    }

    /// Members in declaration order.
    pub fn members(&self) -> impl Iterator<Item = (ItemId, &Item)> {
        self.items.iter().enumerate().map(|(i, item)| (item_id(i), item))
    }

    pub fn functions(&self) -> impl Iterator<Item = (ItemId, &Function)> {
        self.members().filter_map(|(id, item)| match item {
            Item::Function(f) => Some((id, f)),
            _ => None,
        })
    }

    /// Every alias, struct, and enum definition with its kind.
    pub fn type_definitions(&self) -> impl Iterator<Item = (ItemId, TypeDefKind, Name)> + '_ {
        self.members()
            .filter_map(|(id, item)| item.type_def_kind().map(|kind| (id, kind, item.name())))
    }

    /// Find a type definition exported under `name`.
    pub fn type_definition(&self, name: Name) -> Option<(ItemId, TypeDefKind)> {
        self.type_definitions()
            .find(|(_, _, n)| *n == name)
            .map(|(id, kind, _)| (id, kind))
    }

    pub fn function(&self, id: ItemId) -> Option<&Function> {
        match self.item(id)? {
            Item::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn alias(&self, id: ItemId) -> Option<&TypeAlias> {
        match self.item(id)? {
            Item::TypeAlias(t) => Some(t),
            _ => None,
        }
    }

    pub fn struct_def(&self, id: ItemId) -> Option<&StructDef> {
        match self.item(id)? {
            Item::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn enum_def(&self, id: ItemId) -> Option<&EnumDef> {
        match self.item(id)? {
            Item::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn constant(&self, id: ItemId) -> Option<&ConstantDef> {
        match self.item(id)? {
            Item::Constant(c) => Some(c),
            _ => None,
        }
    }
}

fn item_id(index: usize) -> ItemId {
    ItemId::new(u32::try_from(index).unwrap_or(u32::MAX))
}

/// Reference-counted module handle.
///
/// Equality and hashing are by identity: two handles are equal iff they
/// point at the same parsed module, which is what memo tables and
/// function/enum values need.
#[derive(Clone)]
pub struct SharedModule(Arc<Module>);

impl SharedModule {
    pub fn new(module: Module) -> Self {
        SharedModule(Arc::new(module))
    }

    #[inline]
    pub fn ptr_eq(&self, other: &SharedModule) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl std::ops::Deref for SharedModule {
    type Target = Module;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq for SharedModule {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for SharedModule {}

impl Hash for SharedModule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

impl fmt::Debug for SharedModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedModule({})", self.name_str())
    }
}
