//! Type annotations as written in source.
//!
//! Annotations may mention parametric symbols and array dimensions that only
//! become concrete once the evaluator binds them; see `hdl_eval::concretize`.

use crate::{ExprId, ItemId, Name, Span};

/// Builtin bits type such as `u8`, `s32`, or the width-less `uN`/`sN`.
///
/// A width of zero marks the width-less form: `uN[16]` is an array
/// annotation whose element is `uN`, meaning "16 bits", not "16 elements of
/// zero bits".
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct BuiltinType {
    pub signed: bool,
    pub width: u32,
    pub span: Span,
}

impl BuiltinType {
    /// Whether this is the width-less `uN`/`sN` marker.
    #[inline]
    pub const fn is_width_marker(&self) -> bool {
        self.width == 0
    }

    /// Source keyword (`u8`, `s4`, `uN`).
    pub fn keyword(&self) -> String {
        let prefix = if self.signed { 's' } else { 'u' };
        if self.is_width_marker() {
            format!("{prefix}N")
        } else {
            format!("{prefix}{}", self.width)
        }
    }
}

/// Direction of a channel endpoint.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ChannelDirection {
    In,
    Out,
}

/// Type annotation AST node.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum TypeAnnotation {
    Builtin(BuiltinType),
    Tuple {
        members: Vec<TypeAnnotation>,
        span: Span,
    },
    /// `element[dim]`.
    Array {
        element: Box<TypeAnnotation>,
        dim: ExprId,
        span: Span,
    },
    /// Reference to a named type, with optional parametric arguments
    /// (`Foo[8, N]`).
    TypeRef {
        type_ref: TypeRef,
        parametrics: Vec<ExprId>,
        span: Span,
    },
    /// Channel endpoint; never a constant's type.
    Channel {
        payload: Box<TypeAnnotation>,
        direction: ChannelDirection,
        span: Span,
    },
}

impl TypeAnnotation {
    pub fn ubits(width: u32) -> Self {
        TypeAnnotation::Builtin(BuiltinType {
            signed: false,
            width,
            span: Span::DUMMY,
        })
    }

    pub fn sbits(width: u32) -> Self {
        TypeAnnotation::Builtin(BuiltinType {
            signed: true,
            width,
            span: Span::DUMMY,
        })
    }

    pub fn span(&self) -> Span {
        match self {
            TypeAnnotation::Builtin(b) => b.span,
            TypeAnnotation::Tuple { span, .. }
            | TypeAnnotation::Array { span, .. }
            | TypeAnnotation::TypeRef { span, .. }
            | TypeAnnotation::Channel { span, .. } => *span,
        }
    }

    /// Short node-kind name used in diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            TypeAnnotation::Builtin(_) => "builtin type",
            TypeAnnotation::Tuple { .. } => "tuple type",
            TypeAnnotation::Array { .. } => "array type",
            TypeAnnotation::TypeRef { .. } => "type reference",
            TypeAnnotation::Channel { .. } => "channel type",
        }
    }
}

/// Named type reference as it appears in an annotation.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TypeRef {
    /// Text of the reference (`Foo`, `pkg::Foo`).
    pub text: Name,
    /// Definition the parser bound the reference to.
    pub definition: TypeDefinition,
    pub span: Span,
}

/// Kind of a module-local type definition.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TypeDefKind {
    Alias,
    Struct,
    Enum,
}

impl TypeDefKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            TypeDefKind::Alias => "type alias",
            TypeDefKind::Struct => "struct",
            TypeDefKind::Enum => "enum",
        }
    }
}

/// Target of a type reference.
///
/// Local variants index the items of the module that contains the
/// referencing node.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum TypeDefinition {
    Alias(ItemId),
    Struct(ItemId),
    Enum(ItemId),
    /// Definition exported by an imported module (`pkg::Foo`).
    Imported(ModRef),
}

impl TypeDefinition {
    /// Build a local definition reference of the given kind.
    pub const fn local(kind: TypeDefKind, item: ItemId) -> Self {
        match kind {
            TypeDefKind::Alias => TypeDefinition::Alias(item),
            TypeDefKind::Struct => TypeDefinition::Struct(item),
            TypeDefKind::Enum => TypeDefinition::Enum(item),
        }
    }

    pub const fn kind_name(&self) -> &'static str {
        match self {
            TypeDefinition::Alias(_) => TypeDefKind::Alias.as_str(),
            TypeDefinition::Struct(_) => TypeDefKind::Struct.as_str(),
            TypeDefinition::Enum(_) => TypeDefKind::Enum.as_str(),
            TypeDefinition::Imported(_) => "imported type",
        }
    }
}

/// `import_alias::attr` reference into another module.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ModRef {
    /// Local name the import was bound to.
    pub import: Name,
    /// Name of the definition inside the imported module.
    pub attr: Name,
    pub span: Span,
}
