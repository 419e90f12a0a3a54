use hdl_eval::{concretize_type_annotation, make_top_level_bindings};
use hdl_ir::{BinaryOp, ModuleBuilder, SharedInterner, SharedModule, TypeAnnotation, TypeDefinition};
use hdl_value::{ConcreteType, EvalResult};
use pretty_assertions::assert_eq;

use super::common::TestHost;

fn concretize(
    module: &SharedModule,
    ty: &TypeAnnotation,
    host: &mut TestHost,
) -> EvalResult<ConcreteType> {
    let mut top = make_top_level_bindings(module, host)?;
    concretize_type_annotation(ty, &mut top.bindings, top.scope, host)
}

#[test]
fn test_alias_chain() {
    // type A = B;  type B = C;  type C = u17;
    let interner = SharedInterner::default();
    let mut b = ModuleBuilder::new("m", &interner);
    let b_item = b.upcoming_item(1);
    let to_b = b.type_ref("B", TypeDefinition::Alias(b_item));
    let a = b.type_alias("A", to_b);
    let c_item = b.upcoming_item(1);
    let to_c = b.type_ref("C", TypeDefinition::Alias(c_item));
    b.type_alias("B", to_c);
    let u17 = b.ubits(17);
    b.type_alias("C", u17);
    let a_ty = b.type_ref("A", TypeDefinition::Alias(a));
    let module = b.finish();

    let mut host = TestHost::new(&interner);
    assert_eq!(concretize(&module, &a_ty, &mut host), Ok(ConcreteType::ubits(17)));
}

#[test]
fn test_alias_cycle_is_reported() {
    // type A = B;  type B = A;
    let interner = SharedInterner::default();
    let mut b = ModuleBuilder::new("m", &interner);
    let b_item = b.upcoming_item(1);
    let to_b = b.type_ref("B", TypeDefinition::Alias(b_item));
    let a = b.type_alias("A", to_b);
    let to_a = b.type_ref("A", TypeDefinition::Alias(a));
    b.type_alias("B", to_a);
    let a_ty = b.type_ref("A", TypeDefinition::Alias(a));
    let module = b.finish();

    let mut host = TestHost::new(&interner);
    let err = concretize(&module, &a_ty, &mut host).unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(
        err.message(),
        "alias chain from `A` exceeds 256 steps; possible cycle"
    );
}

/// ```text
/// struct Foo<N: u32, M: u32> { lo: uN[N], hi: uN[M] }
/// const M = u32:8 + u32:8;
/// type Foo8 = Foo[8, M];
/// struct Point { x: u8, y: s8 }
/// ```
fn shapes(interner: &SharedInterner) -> (ModuleBuilder, TypeAnnotation, TypeAnnotation) {
    let mut b = ModuleBuilder::new("shapes", interner);
    let u32_n = b.ubits(32);
    let u32_m = b.ubits(32);
    let n = b.name_ref("N");
    let un = b.ubits(0);
    let lo = b.array_type(un, n);
    let m = b.name_ref("M");
    let un = b.ubits(0);
    let hi = b.array_type(un, m);
    let foo = b.struct_def("Foo", vec![("N", u32_n), ("M", u32_m)], vec![("lo", lo), ("hi", hi)]);

    let u32_ty = b.ubits(32);
    let eight = b.typed_number(8, u32_ty.clone());
    let also_eight = b.typed_number(8, u32_ty);
    let sixteen = b.binary(BinaryOp::Add, eight, also_eight);
    b.constant("M", sixteen);

    let arg = b.number(8);
    let outer_m = b.name_ref("M");
    let instance = b.parametric_type_ref("Foo", TypeDefinition::Struct(foo), vec![arg, outer_m]);
    let foo8 = b.type_alias("Foo8", instance);
    let foo8_ty = b.type_ref("Foo8", TypeDefinition::Alias(foo8));

    let u8_ty = b.ubits(8);
    let s8_ty = b.sbits(8);
    let point = b.struct_def("Point", vec![], vec![("x", u8_ty), ("y", s8_ty)]);
    let point_ty = b.type_ref("Point", TypeDefinition::Struct(point));
    (b, foo8_ty, point_ty)
}

#[test]
fn test_parametric_struct_through_alias() {
    let interner = SharedInterner::default();
    let (b, foo8, _) = shapes(&interner);
    let module = b.finish();

    let mut host = TestHost::new(&interner);
    assert_eq!(
        concretize(&module, &foo8, &mut host),
        Ok(ConcreteType::Tuple(vec![
            ConcreteType::ubits(8),
            ConcreteType::ubits(16)
        ]))
    );
}

#[test]
fn test_array_of_structs() {
    let interner = SharedInterner::default();
    let (mut b, _, point) = shapes(&interner);
    let three = b.number(3);
    let points = b.array_type(point, three);
    let module = b.finish();

    let mut host = TestHost::new(&interner);
    let ty = concretize(&module, &points, &mut host).unwrap();
    assert_eq!(
        ty,
        ConcreteType::array(
            ConcreteType::Tuple(vec![ConcreteType::ubits(8), ConcreteType::sbits(8)]),
            3
        )
    );
    assert_eq!(ty.total_bit_count(), 48);
    assert_eq!(ty.to_string(), "(uN[8], sN[8])[3]");
}

#[test]
fn test_dimension_must_be_literal_or_name() {
    let interner = SharedInterner::default();
    let mut b = ModuleBuilder::new("m", &interner);
    let two = b.number(2);
    let n = b.name_ref("N");
    let sum = b.binary(BinaryOp::Add, two, n);
    let u8_ty = b.ubits(8);
    let arr = b.array_type(u8_ty, sum);
    let module = b.finish();

    let mut host = TestHost::new(&interner);
    let err = concretize(&module, &arr, &mut host).unwrap_err();
    assert!(err.is_unimplemented());
    assert_eq!(
        err.message(),
        "cannot resolve dimension `2 + N`: only literals and names are supported"
    );
}
