//! Error types for constant and type evaluation.
//!
//! # Structured Error Categories
//!
//! `EvalErrorKind` is the four-way taxonomy callers match on. The factory
//! functions below are the public way to build errors; they pick the kind
//! and phrase the message so call sites never format diagnostics by hand.

use hdl_ir::Span;

use crate::Value;

/// Result of evaluation.
pub type EvalResult<T = Value> = Result<T, EvalError>;

/// Typed error category.
///
/// `InternalConsistencyFault` marks a defect in an earlier compiler phase
/// (input the checker should have rejected), not a user error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("unimplemented: {0}")]
    Unimplemented(String),
    #[error("internal consistency fault: {0}")]
    InternalConsistencyFault(String),
}

impl EvalErrorKind {
    /// Message without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            EvalErrorKind::NotFound(m)
            | EvalErrorKind::InvalidArgument(m)
            | EvalErrorKind::Unimplemented(m)
            | EvalErrorKind::InternalConsistencyFault(m) => m,
        }
    }
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Source location of the offending construct, when known.
    pub span: Option<Span>,
    /// Secondary context, innermost first.
    pub notes: Vec<String>,
}

impl EvalError {
    fn from_kind(kind: EvalErrorKind) -> Self {
        EvalError {
            kind,
            span: None,
            notes: Vec::new(),
        }
    }

    /// Attach a span, keeping an existing one.
    ///
    /// Errors bubble outward through nested constructs; the innermost span
    /// is the most precise.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn message(&self) -> &str {
        self.kind.message()
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, EvalErrorKind::NotFound(_))
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.kind, EvalErrorKind::InvalidArgument(_))
    }

    pub fn is_unimplemented(&self) -> bool {
        matches!(self.kind, EvalErrorKind::Unimplemented(_))
    }

    pub fn is_internal(&self) -> bool {
        matches!(self.kind, EvalErrorKind::InternalConsistencyFault(_))
    }
}

// Lookup errors

#[cold]
pub fn undefined_value(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotFound(format!(
        "no value named `{name}` in scope"
    )))
}

#[cold]
pub fn undefined_type(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotFound(format!(
        "no type definition named `{name}` in scope"
    )))
}

#[cold]
pub fn undefined_module(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotFound(format!(
        "no module named `{name}` in scope"
    )))
}

#[cold]
pub fn undefined_member(enum_name: &str, member: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotFound(format!(
        "enum `{enum_name}` has no member `{member}`"
    )))
}

/// `name` is bound, but to a `found` rather than the requested entity.
#[cold]
pub fn not_a_value(name: &str, found: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidArgument(format!(
        "`{name}` is not a value (found {found})"
    )))
}

#[cold]
pub fn not_a_type(name: &str, found: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidArgument(format!(
        "`{name}` is not a type definition (found {found})"
    )))
}

#[cold]
pub fn not_a_module(name: &str, found: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidArgument(format!(
        "`{name}` is not a module (found {found})"
    )))
}

// Shape errors

#[cold]
pub fn invalid_enum_pattern(enum_name: &str, pattern: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidArgument(format!(
        "value is not valid for enum {enum_name}: {pattern}"
    )))
}

#[cold]
pub fn length_mismatch(lhs: usize, rhs: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidArgument(format!(
        "sequences have different lengths: {lhs} vs {rhs}"
    )))
}

#[cold]
pub fn array_cast_mismatch(bit_count: usize, element_width: usize, count: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidArgument(format!(
        "cannot split {bit_count} bits into {count} elements of {element_width} bits"
    )))
}

#[cold]
pub fn not_an_enum(text: &str, found: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidArgument(format!(
        "`{text}` does not refer to an enum (found {found})"
    )))
}

#[cold]
pub fn bits_too_wide(width: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidArgument(format!(
        "bits value of width {width} does not fit in 64 bits"
    )))
}

#[cold]
pub fn not_bits(found: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidArgument(format!(
        "expected a bits value, got {found}"
    )))
}

#[cold]
pub fn no_zero_value(found: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidArgument(format!(
        "cannot create a zero value of {found}"
    )))
}

#[cold]
pub fn non_uniform_array(index: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidArgument(format!(
        "array element {index} differs in shape from element 0"
    )))
}

#[cold]
pub fn negative_dimension(text: &str, value: i64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidArgument(format!(
        "dimension `{text}` evaluated to negative value {value}"
    )))
}

#[cold]
pub fn zero_width_type(text: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidArgument(format!(
        "`{text}` has no width outside an array dimension"
    )))
}

#[cold]
pub fn enum_member_overflow(enum_name: &str, member: &str, width: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidArgument(format!(
        "value of `{enum_name}::{member}` does not fit in {width} bits"
    )))
}

#[cold]
pub fn slice_out_of_range(start: usize, width: usize, bit_count: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidArgument(format!(
        "slice of {width} bits at {start} exceeds {bit_count}-bit value"
    )))
}

#[cold]
pub fn alias_chain_too_deep(text: &str, limit: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidArgument(format!(
        "alias chain from `{text}` exceeds {limit} steps; possible cycle"
    )))
}

// Unsupported constructs

#[cold]
pub fn unsupported_dim_expr(text: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Unimplemented(format!(
        "cannot resolve dimension `{text}`: only literals and names are supported"
    )))
}

#[cold]
pub fn cannot_concretize(text: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Unimplemented(format!(
        "cannot concretize type annotation `{text}`"
    )))
}

// Upstream defects

#[cold]
pub fn parametric_arity_mismatch(struct_name: &str, expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InternalConsistencyFault(format!(
        "struct `{struct_name}` takes {expected} parametrics, {got} supplied"
    )))
}

#[cold]
pub fn invalid_parametric_argument(text: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InternalConsistencyFault(format!(
        "parametric argument `{text}` is neither a sized literal nor a name"
    )))
}

#[cold]
pub fn parametric_literal_overflow(text: &str, ty: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InternalConsistencyFault(format!(
        "parametric argument `{text}` does not fit in `{ty}`"
    )))
}

/// Parametric arguments applied to something other than a struct.
#[cold]
pub fn unexpected_parametrics(text: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InternalConsistencyFault(format!(
        "`{text}` supplies parametrics but does not name a struct"
    )))
}

#[cold]
pub fn unexpected_expr(expected: &str, text: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InternalConsistencyFault(format!(
        "expected {expected}, found `{text}`"
    )))
}

#[cold]
pub fn missing_slice_metadata(text: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InternalConsistencyFault(format!(
        "no start/width recorded for slice `{text}`"
    )))
}

/// An id that does not index anything in its module.
#[cold]
pub fn dangling_reference(what: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InternalConsistencyFault(format!(
        "dangling {what} reference"
    )))
}
