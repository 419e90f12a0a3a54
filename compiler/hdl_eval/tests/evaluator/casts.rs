use hdl_eval::{make_top_level_bindings, ModuleBindings};
use hdl_ir::{ModuleBuilder, SharedInterner, TypeDefinition};
use hdl_value::{
    create_zero_value, find_first_differing_index, flatten_tuple, Bits, EvalResult, Value,
};
use pretty_assertions::assert_eq;

use super::common::{ubits, TestHost};

/// Bind a module holding `enum Color : u3 { Red = 1, Green = 2, Blue = 5 }`
/// followed by whatever `build` adds.
fn cast_constant(
    interner: &SharedInterner,
    build: impl FnOnce(&mut ModuleBuilder, TypeDefinition),
) -> EvalResult<ModuleBindings> {
    let mut b = ModuleBuilder::new("casts", interner);
    let u3 = b.ubits(3);
    let red = b.typed_number(1, u3.clone());
    let green = b.typed_number(2, u3.clone());
    let blue = b.typed_number(5, u3.clone());
    let color = b.enum_def("Color", u3, vec![("Red", red), ("Green", green), ("Blue", blue)]);
    build(&mut b, TypeDefinition::Enum(color));
    let module = b.finish();
    make_top_level_bindings(&module, &mut TestHost::new(interner))
}

#[test]
fn test_bits_to_array() {
    let interner = SharedInterner::default();
    let top = cast_constant(&interner, |b, _| {
        let u8_ty = b.ubits(8);
        let byte = b.typed_number(0xA5, u8_ty);
        let u4_ty = b.ubits(4);
        let two = b.number(2);
        let nibbles = b.array_type(u4_ty, two);
        let cast = b.cast(byte, nibbles);
        b.constant("C", cast);
    })
    .unwrap();
    assert_eq!(
        top.resolve_value("C"),
        Ok(Value::array(vec![ubits(4, 0xA), ubits(4, 0x5)]))
    );
}

#[test]
fn test_bits_to_array_width_mismatch() {
    let interner = SharedInterner::default();
    let err = cast_constant(&interner, |b, _| {
        let u8_ty = b.ubits(8);
        let byte = b.typed_number(0xA5, u8_ty);
        let u3_ty = b.ubits(3);
        let three = b.number(3);
        let triples = b.array_type(u3_ty, three);
        let cast = b.cast(byte, triples);
        b.constant("C", cast);
    })
    .unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(err.notes, vec!["while evaluating constant `C`".to_string()]);
}

#[test]
fn test_bits_to_enum() {
    let interner = SharedInterner::default();
    let top = cast_constant(&interner, |b, color| {
        let u3_ty = b.ubits(3);
        let five = b.typed_number(5, u3_ty);
        let color_ty = b.type_ref("Color", color);
        let cast = b.cast(five, color_ty);
        b.constant("C", cast);
    })
    .unwrap();
    let value = top.resolve_value("C").unwrap();
    let Value::Enum { bits, def } = &value else {
        panic!("expected an enum, got {value:?}");
    };
    assert_eq!(bits, &Bits::from_u64(3, 5));
    assert_eq!(&def.module, top.module());
    assert_eq!(def.name(), "Color");
    assert_eq!(value.to_string(), "Color::5");
}

#[test]
fn test_bits_to_enum_rejects_undeclared_pattern() {
    let interner = SharedInterner::default();
    let err = cast_constant(&interner, |b, color| {
        let u3_ty = b.ubits(3);
        let four = b.typed_number(4, u3_ty);
        let color_ty = b.type_ref("Color", color);
        let cast = b.cast(four, color_ty);
        b.constant("C", cast);
    })
    .unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(err.message().contains("Color"), "{}", err.message());
}

#[test]
fn test_signed_widening_sign_extends() {
    let interner = SharedInterner::default();
    let top = cast_constant(&interner, |b, _| {
        let s4_ty = b.sbits(4);
        let minus_one = b.typed_number(-1, s4_ty);
        let u8_ty = b.ubits(8);
        let cast = b.cast(minus_one, u8_ty);
        b.constant("C", cast);
    })
    .unwrap();
    assert_eq!(top.resolve_value("C"), Ok(ubits(8, 0xFF)));
}

#[test]
fn test_conversions_over_evaluated_tuples() {
    // const A = (u8:1, (u4:2, u4:3));  const B = (u8:1, (u4:2, u4:7));
    let interner = SharedInterner::default();
    let top = cast_constant(&interner, |b, _| {
        for (name, last) in [("A", 3), ("B", 7)] {
            let u8_ty = b.ubits(8);
            let u4_ty = b.ubits(4);
            let first = b.typed_number(1, u8_ty);
            let second = b.typed_number(2, u4_ty.clone());
            let third = b.typed_number(last, u4_ty);
            let inner = b.tuple(vec![second, third]);
            let outer = b.tuple(vec![first, inner]);
            b.constant(name, outer);
        }
    })
    .unwrap();
    let a = top.resolve_value("A").unwrap();
    let b = top.resolve_value("B").unwrap();

    let (flat_a, flat_b) = (flatten_tuple(&a), flatten_tuple(&b));
    assert_eq!(flat_a, vec![ubits(8, 1), ubits(4, 2), ubits(4, 3)]);
    assert_eq!(find_first_differing_index(&flat_a, &flat_b), Ok(Some(2)));
    assert_eq!(find_first_differing_index(&flat_a, &flat_a), Ok(None));

    assert_eq!(
        create_zero_value(&a),
        Ok(Value::tuple(vec![
            ubits(8, 0),
            Value::tuple(vec![ubits(4, 0), ubits(4, 0)])
        ]))
    );
}
