//! Value conversion utilities.
//!
//! Pure functions over immutable values: bit-slicing casts, structural zero
//! construction, tuple flattening, and element-wise comparison.

use crate::errors::{
    array_cast_mismatch, invalid_enum_pattern, length_mismatch, no_zero_value, non_uniform_array,
    EvalResult,
};
use crate::stack::ensure_sufficient_stack;
use crate::{Bits, EnumType, Value};

/// Split `bits` into `count` elements of `element_width` bits each.
///
/// Element 0 takes the most significant `element_width` bits, so reading the
/// vector MSB-first visits the elements in order. Every element is `UBits`.
pub fn cast_bits_to_array(bits: &Bits, element_width: usize, count: usize) -> EvalResult<Value> {
    let mismatch = || array_cast_mismatch(bits.width(), element_width, count);
    if element_width.checked_mul(count) != Some(bits.width()) {
        return Err(mismatch());
    }

    // Windows of the reversed vector, each reversed back, walk the input
    // from the high end down.
    let reversed = bits.reverse();
    let elements = (0..count)
        .map(|i| {
            reversed
                .slice(i * element_width, element_width)
                .map(|slice| Value::UBits(slice.reverse()))
                .ok_or_else(mismatch)
        })
        .collect::<EvalResult<Vec<_>>>()?;
    Ok(Value::Array(elements))
}

/// Reinterpret `bits` as a member of `enum_type`.
///
/// Succeeds only when the pattern equals one of the declared members.
pub fn cast_bits_to_enum(bits: &Bits, enum_type: &EnumType) -> EvalResult<Value> {
    if enum_type.members.iter().any(|member| member == bits) {
        return Ok(Value::make_enum(bits.clone(), enum_type.def.clone()));
    }
    tracing::trace!(enum_name = enum_type.def.name(), %bits, "enum cast rejected");
    Err(invalid_enum_pattern(enum_type.def.name(), &bits.to_string()))
}

/// All-zero value with the same shape as `value`.
///
/// Arrays take the shape of their first element for every position; mixed
/// arrays are not detected here (see [`create_zero_value_checked`]).
pub fn create_zero_value(value: &Value) -> EvalResult<Value> {
    ensure_sufficient_stack(|| match value {
        Value::UBits(bits) => Ok(Value::UBits(Bits::zero(bits.width()))),
        Value::SBits(bits) => Ok(Value::SBits(Bits::zero(bits.width()))),
        Value::Tuple(members) => members
            .iter()
            .map(create_zero_value)
            .collect::<EvalResult<Vec<_>>>()
            .map(Value::Tuple),
        Value::Array(elements) => match elements.first() {
            None => Ok(Value::Array(Vec::new())),
            Some(first) => {
                let zero = create_zero_value(first)?;
                Ok(Value::Array(vec![zero; elements.len()]))
            }
        },
        Value::Enum { .. } | Value::Function(_) | Value::Module(_) | Value::Nil => {
            Err(no_zero_value(value.tag_name()))
        }
    })
}

/// [`create_zero_value`] that first rejects arrays, at any depth, whose
/// elements differ in shape.
pub fn create_zero_value_checked(value: &Value) -> EvalResult<Value> {
    check_uniform(value)?;
    create_zero_value(value)
}

fn check_uniform(value: &Value) -> EvalResult<()> {
    ensure_sufficient_stack(|| match value {
        Value::Array(elements) => {
            if let Some((first, rest)) = elements.split_first() {
                if let Some(pos) = rest.iter().position(|e| !e.same_shape(first)) {
                    return Err(non_uniform_array(pos + 1));
                }
            }
            elements.iter().try_for_each(check_uniform)
        }
        Value::Tuple(members) => members.iter().try_for_each(check_uniform),
        _ => Ok(()),
    })
}

/// Flatten nested tuples into their leaves, left to right.
///
/// A non-tuple value flattens to itself.
pub fn flatten_tuple(value: &Value) -> Vec<Value> {
    let mut out = Vec::new();
    flatten_tuple_into(value, &mut out);
    out
}

/// Append the leaves of `value` to `out`.
pub fn flatten_tuple_into(value: &Value, out: &mut Vec<Value>) {
    ensure_sufficient_stack(|| match value {
        Value::Tuple(members) => {
            for member in members {
                flatten_tuple_into(member, out);
            }
        }
        other => out.push(other.clone()),
    });
}

/// Index of the first position where `lhs` and `rhs` differ, or `None`
/// when they are equal.
pub fn find_first_differing_index(lhs: &[Value], rhs: &[Value]) -> EvalResult<Option<usize>> {
    if lhs.len() != rhs.len() {
        return Err(length_mismatch(lhs.len(), rhs.len()));
    }
    Ok(lhs.iter().zip(rhs).position(|(a, b)| a != b))
}
