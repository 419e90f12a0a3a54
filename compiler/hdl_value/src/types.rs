//! Concrete types: fully resolved, with every dimension a number.

use std::fmt;

use hdl_ir::Name;

use crate::{Bits, EnumDefRef};

/// Fully resolved type. No symbolic dimension survives concretization.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConcreteType {
    Bits { signed: bool, width: u64 },
    /// Positional members; struct field names are not retained.
    Tuple(Vec<ConcreteType>),
    Array { element: Box<ConcreteType>, size: u64 },
    Enum(EnumType),
}

/// Concrete enum: its definition, underlying width, and the evaluated bit
/// pattern of every member in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumType {
    pub def: EnumDefRef,
    pub signed: bool,
    pub width: u64,
    pub members: Vec<Bits>,
}

impl EnumType {
    /// Name of the first member whose pattern equals `bits`.
    pub fn member_named(&self, bits: &Bits) -> Option<Name> {
        let def = self.def.def()?;
        self.members
            .iter()
            .position(|m| m == bits)
            .and_then(|i| def.members.get(i))
            .map(|m| m.name)
    }
}

impl ConcreteType {
    pub const fn ubits(width: u64) -> Self {
        ConcreteType::Bits {
            signed: false,
            width,
        }
    }

    pub const fn sbits(width: u64) -> Self {
        ConcreteType::Bits {
            signed: true,
            width,
        }
    }

    pub fn array(element: ConcreteType, size: u64) -> Self {
        ConcreteType::Array {
            element: Box::new(element),
            size,
        }
    }

    /// Number of bits a value of this type occupies when flattened.
    pub fn total_bit_count(&self) -> u64 {
        match self {
            ConcreteType::Bits { width, .. } => *width,
            ConcreteType::Tuple(members) => members.iter().map(ConcreteType::total_bit_count).sum(),
            ConcreteType::Array { element, size } => {
                element.total_bit_count().saturating_mul(*size)
            }
            ConcreteType::Enum(e) => e.width,
        }
    }

    pub const fn is_signed(&self) -> bool {
        match self {
            ConcreteType::Bits { signed, .. } => *signed,
            ConcreteType::Enum(e) => e.signed,
            ConcreteType::Tuple(_) | ConcreteType::Array { .. } => false,
        }
    }
}

impl fmt::Display for ConcreteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConcreteType::Bits { signed, width } => {
                let prefix = if *signed { 's' } else { 'u' };
                write!(f, "{prefix}N[{width}]")
            }
            ConcreteType::Tuple(members) => {
                write!(f, "(")?;
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{m}")?;
                }
                write!(f, ")")
            }
            ConcreteType::Array { element, size } => write!(f, "{element}[{size}]"),
            ConcreteType::Enum(e) => write!(f, "{}", e.def.name()),
        }
    }
}

/// A dimension recorded by an earlier phase: either already a number, or a
/// parametric symbol still to be looked up.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeDim {
    Known(i64),
    Parametric(Name),
}
