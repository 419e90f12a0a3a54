//! Runtime values of the constant evaluator.
//!
//! Values are immutable once built; evaluation produces new values rather
//! than updating existing ones.

use std::fmt;

use hdl_ir::{Builtin, EnumDef, ItemId, SharedModule};

use crate::errors::{bits_too_wide, not_bits, EvalResult};
use crate::Bits;

/// Identity of an enum definition: the module that declares it and the
/// item index inside that module.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumDefRef {
    pub module: SharedModule,
    pub item: ItemId,
}

impl EnumDefRef {
    pub fn new(module: SharedModule, item: ItemId) -> Self {
        EnumDefRef { module, item }
    }

    pub fn def(&self) -> Option<&EnumDef> {
        self.module.enum_def(self.item)
    }

    pub fn name(&self) -> &'static str {
        self.def().map_or("<enum>", |def| self.module.text(def.name))
    }
}

/// Callable entity: a builtin, or a user function identified by module and
/// item.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FunctionRef {
    Builtin(Builtin),
    User { module: SharedModule, function: ItemId },
}

impl FunctionRef {
    pub fn name(&self) -> &'static str {
        match self {
            FunctionRef::Builtin(builtin) => builtin.name(),
            FunctionRef::User { module, function } => module
                .function(*function)
                .map_or("<function>", |f| module.text(f.name)),
        }
    }
}

/// Evaluated value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    UBits(Bits),
    /// Two's-complement signed bits.
    SBits(Bits),
    Tuple(Vec<Value>),
    /// Elements share one shape.
    Array(Vec<Value>),
    Enum { bits: Bits, def: EnumDefRef },
    Function(FunctionRef),
    Module(SharedModule),
    Nil,
}

impl Value {
    // Factory methods

    pub fn make_ubits(width: usize, value: u64) -> Value {
        Value::UBits(Bits::from_u64(width, value))
    }

    pub fn make_sbits(width: usize, value: i64) -> Value {
        Value::SBits(Bits::from_i64(width, value))
    }

    pub fn make_bool(value: bool) -> Value {
        Value::make_ubits(1, u64::from(value))
    }

    pub fn make_enum(bits: Bits, def: EnumDefRef) -> Value {
        Value::Enum { bits, def }
    }

    pub fn tuple(members: Vec<Value>) -> Value {
        Value::Tuple(members)
    }

    pub fn array(elements: Vec<Value>) -> Value {
        Value::Array(elements)
    }

    // Accessors

    /// Short tag name used in diagnostics.
    pub const fn tag_name(&self) -> &'static str {
        match self {
            Value::UBits(_) => "ubits",
            Value::SBits(_) => "sbits",
            Value::Tuple(_) => "tuple",
            Value::Array(_) => "array",
            Value::Enum { .. } => "enum",
            Value::Function(_) => "function",
            Value::Module(_) => "module",
            Value::Nil => "nil",
        }
    }

    /// Bit pattern of a bits or enum value.
    pub fn get_bits(&self) -> EvalResult<&Bits> {
        match self {
            Value::UBits(bits) | Value::SBits(bits) | Value::Enum { bits, .. } => Ok(bits),
            other => Err(not_bits(other.tag_name())),
        }
    }

    pub fn bit_count(&self) -> EvalResult<usize> {
        self.get_bits().map(Bits::width)
    }

    pub const fn is_bits(&self) -> bool {
        matches!(self, Value::UBits(_) | Value::SBits(_))
    }

    pub const fn is_signed(&self) -> bool {
        matches!(self, Value::SBits(_))
    }

    /// Members of a tuple or elements of an array.
    pub fn elements(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(values) | Value::Array(values) => Some(values),
            _ => None,
        }
    }

    /// Integer value of a bits value, interpreted per its signedness.
    ///
    /// Fails when the value has significant bits beyond 64 (or beyond 63 for
    /// unsigned values that would not fit in an `i64`).
    pub fn get_bit_value_int64(&self) -> EvalResult<i64> {
        match self {
            Value::SBits(bits) => bits.to_i64().ok_or_else(|| bits_too_wide(bits.width())),
            Value::UBits(bits) | Value::Enum { bits, .. } => bits
                .to_u64()
                .and_then(|v| i64::try_from(v).ok())
                .ok_or_else(|| bits_too_wide(bits.width())),
            other => Err(not_bits(other.tag_name())),
        }
    }

    /// Whether `self` and `other` have the same shape: same tag, same bit
    /// widths, and recursively the same member shapes.
    pub fn same_shape(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::UBits(a), Value::UBits(b)) | (Value::SBits(a), Value::SBits(b)) => {
                a.width() == b.width()
            }
            (Value::Tuple(a), Value::Tuple(b)) | (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_shape(y))
            }
            (Value::Enum { bits: a, def: da }, Value::Enum { bits: b, def: db }) => {
                da == db && a.width() == b.width()
            }
            (Value::Function(_), Value::Function(_))
            | (Value::Module(_), Value::Module(_))
            | (Value::Nil, Value::Nil) => true,
            _ => false,
        }
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, values: &[Value]) -> fmt::Result {
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{v}")?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::UBits(bits) => match bits.to_u64() {
                Some(v) => write!(f, "u{}:{v}", bits.width()),
                None => write!(f, "u{}:{bits}", bits.width()),
            },
            Value::SBits(bits) => match bits.to_i64() {
                Some(v) => write!(f, "s{}:{v}", bits.width()),
                None => write!(f, "s{}:{bits}", bits.width()),
            },
            Value::Tuple(members) => {
                write!(f, "(")?;
                write_seq(f, members)?;
                if members.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Value::Array(elements) => {
                write!(f, "[")?;
                write_seq(f, elements)?;
                write!(f, "]")
            }
            Value::Enum { bits, def } => match bits.to_u64() {
                Some(v) => write!(f, "{}::{v}", def.name()),
                None => write!(f, "{}::{bits}", def.name()),
            },
            Value::Function(func) => write!(f, "{}", func.name()),
            Value::Module(module) => write!(f, "module {}", module.name_str()),
            Value::Nil => write!(f, "nil"),
        }
    }
}
