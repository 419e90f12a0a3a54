//! HDL values - bit-exact runtime values and concrete types.
//!
//! This crate contains:
//! - `Bits`, an arbitrary-width two's-complement bit vector
//! - `Value`, the tagged value produced by constant evaluation
//! - `ConcreteType`, the result of concretizing a type annotation
//! - `EvalError`, the structured error shared by the evaluator
//! - Value conversion utilities (casts, zero values, flattening)

mod bits;
pub mod conversion;
pub mod errors;
mod stack;
mod types;
mod value;

pub use bits::Bits;
pub use conversion::{
    cast_bits_to_array, cast_bits_to_enum, create_zero_value, create_zero_value_checked,
    find_first_differing_index, flatten_tuple, flatten_tuple_into,
};
pub use errors::{EvalError, EvalErrorKind, EvalResult};
pub use stack::ensure_sufficient_stack;
pub use types::{ConcreteType, EnumType, TypeDim};
pub use value::{EnumDefRef, FunctionRef, Value};
