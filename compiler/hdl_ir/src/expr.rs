//! Flat expression arena.
//!
//! Expressions are stored in a per-module `ExprArena` and referenced by
//! `ExprId`; there is no `Box<Expr>` in the tree. An `ExprId` is only
//! meaningful together with the module whose arena allocated it.

use std::fmt;

use crate::{Name, Span, TypeAnnotation, TypeDefinition};

/// Index into a module's expression arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    /// Create a new `ExprId`.
    #[inline]
    pub const fn new(index: u32) -> Self {
        ExprId(index)
    }

    /// Get the index into the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

/// Binary operators the constant folder understands.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Concat,
}

impl BinaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Concat => "++",
        }
    }
}

/// Expression node.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

/// Expression variants.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum ExprKind {
    /// Integer literal, optionally annotated (`u8:5`).
    Number {
        value: i64,
        ty: Option<TypeAnnotation>,
    },
    /// Reference to a local or top-level name.
    NameRef(Name),
    /// Reference to a top-level constant.
    ConstRef(Name),
    /// Enum member reference (`Color::Red`, `pkg::Color::Red`).
    EnumRef {
        enum_def: TypeDefinition,
        attr: Name,
    },
    /// Function invocation.
    Invocation { callee: ExprId, args: Vec<ExprId> },
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    Tuple(Vec<ExprId>),
    /// Indexing; `rhs` is either a plain index expression or a `Slice`.
    Index { lhs: ExprId, rhs: ExprId },
    /// Bit-slice bounds (`x[start:limit]`). Start/width are computed by the
    /// type checker, not by evaluating the bounds here.
    Slice {
        start: Option<ExprId>,
        limit: Option<ExprId>,
    },
    /// `expr as T`.
    Cast { expr: ExprId, ty: TypeAnnotation },
}

/// Arena owning every expression of one module.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExprArena {
    exprs: Vec<Expr>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an expression, returning its id.
    ///
    /// # Panics
    /// Panics if the arena exceeds `u32::MAX` expressions.
    pub fn alloc(&mut self, kind: ExprKind, span: Span) -> ExprId {
        let index = u32::try_from(self.exprs.len())
            .unwrap_or_else(|_| panic!("expression arena exceeded u32::MAX entries"));
        self.exprs.push(Expr { kind, span });
        ExprId::new(index)
    }

    /// Get an expression by id.
    pub fn get(&self, id: ExprId) -> Option<&Expr> {
        self.exprs.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }
}
