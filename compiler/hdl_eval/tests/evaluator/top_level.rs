use hdl_eval::{make_top_level_bindings, ModuleBindings, StartWidth};
use hdl_ir::{BinaryOp, ModuleBuilder, SharedInterner, SharedModule};
use hdl_value::Value;
use pretty_assertions::assert_eq;

use super::common::{ubits, Call, TestHost};

/// Every name bound at the top level with its value, sorted by name.
fn snapshot(top: &ModuleBindings) -> Vec<(&'static str, Value)> {
    top.bindings
        .local_names(top.scope)
        .into_iter()
        .filter_map(|name| top.resolve_value(name).ok().map(|value| (name, value)))
        .collect()
}

/// ```text
/// fn add_x(a: u8) -> u8 { a + X }
/// const X = u8:1;
/// const Y = X + u8:2;
/// const Z = (X, Y);
/// const W = add_x(u8:4);
/// ```
fn arithmetic_module(interner: &SharedInterner) -> SharedModule {
    let mut b = ModuleBuilder::new("arith", interner);
    let a = b.name_ref("a");
    let x = b.name_ref("X");
    let body = b.binary(BinaryOp::Add, a, x);
    let u8_param = b.ubits(8);
    b.function("add_x", vec![("a", u8_param)], body);

    let u8_ty = b.ubits(8);
    let one = b.typed_number(1, u8_ty.clone());
    b.constant("X", one);
    let x = b.const_ref("X");
    let two = b.typed_number(2, u8_ty.clone());
    let sum = b.binary(BinaryOp::Add, x, two);
    b.constant("Y", sum);
    let x = b.const_ref("X");
    let y = b.const_ref("Y");
    let pair = b.tuple(vec![x, y]);
    b.constant("Z", pair);
    let four = b.typed_number(4, u8_ty);
    let call = b.invoke("add_x", vec![four]);
    b.constant("W", call);
    b.finish()
}

#[test]
fn test_bindings_are_deterministic() {
    let interner = SharedInterner::default();
    let module = arithmetic_module(&interner);

    let runs: Vec<_> = (0..3)
        .map(|_| {
            let mut host = TestHost::new(&interner);
            snapshot(&make_top_level_bindings(&module, &mut host).unwrap())
        })
        .collect();
    assert_eq!(runs[0], runs[1]);
    assert_eq!(runs[1], runs[2]);

    let top = make_top_level_bindings(&module, &mut TestHost::new(&interner)).unwrap();
    assert_eq!(top.resolve_value("Y"), Ok(ubits(8, 3)));
    assert_eq!(
        top.resolve_value("Z"),
        Ok(Value::tuple(vec![ubits(8, 1), ubits(8, 3)]))
    );
    assert_eq!(top.resolve_value("W"), Ok(ubits(8, 5)));
}

#[test]
fn test_reentrant_pass_stops_at_caller() {
    // const X = u8:1; const Y = f(); const Z = u8:3; fn f() { X }
    let interner = SharedInterner::default();
    let mut b = ModuleBuilder::new("m", &interner);
    let u8_ty = b.ubits(8);
    let one = b.typed_number(1, u8_ty.clone());
    b.constant("X", one);
    let call = b.invoke("f", vec![]);
    b.constant("Y", call);
    let three = b.typed_number(3, u8_ty);
    b.constant("Z", three);
    let body = b.name_ref("X");
    b.function("f", vec![], body);
    let module = b.finish();

    let mut host = TestHost::new(&interner);
    let top = make_top_level_bindings(&module, &mut host).unwrap();

    assert_eq!(top.resolve_value("Y"), Ok(ubits(8, 1)));
    assert_eq!(top.resolve_value("Z"), Ok(ubits(8, 3)));
    assert_eq!(
        host.calls,
        vec![Call {
            function: "f",
            visible: vec!["X"],
        }]
    );
}

#[test]
fn test_constant_declared_after_caller_is_not_visible() {
    // fn g() { Z }  const Y = g();  const Z = u8:3;
    let interner = SharedInterner::default();
    let mut b = ModuleBuilder::new("m", &interner);
    let body = b.name_ref("Z");
    b.function("g", vec![], body);
    let call = b.invoke("g", vec![]);
    b.constant("Y", call);
    let u8_ty = b.ubits(8);
    let three = b.typed_number(3, u8_ty);
    b.constant("Z", three);
    let module = b.finish();

    let mut host = TestHost::new(&interner);
    let err = make_top_level_bindings(&module, &mut host).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.message(), "no value named `Z` in scope");
    assert_eq!(err.notes, vec!["while evaluating constant `Y`".to_string()]);
}

#[test]
fn test_later_calls_see_earlier_results() {
    // fn f() { X }  const X = u8:7;  const A = f();  const B = f();
    let interner = SharedInterner::default();
    let mut b = ModuleBuilder::new("m", &interner);
    let body = b.name_ref("X");
    b.function("f", vec![], body);
    let u8_ty = b.ubits(8);
    let seven = b.typed_number(7, u8_ty);
    b.constant("X", seven);
    let first = b.invoke("f", vec![]);
    b.constant("A", first);
    let second = b.invoke("f", vec![]);
    b.constant("B", second);
    let module = b.finish();

    let mut host = TestHost::new(&interner);
    let top = make_top_level_bindings(&module, &mut host).unwrap();
    assert_eq!(top.resolve_value("B"), Ok(ubits(8, 7)));
    let visible: Vec<_> = host.calls.iter().map(|call| call.visible.clone()).collect();
    assert_eq!(visible, vec![vec!["X"], vec!["X", "A"]]);

    // A second pass is served entirely from the memo table.
    let evals = host.evals;
    let again = make_top_level_bindings(&module, &mut host).unwrap();
    assert_eq!(host.evals, evals);
    assert_eq!(snapshot(&again), snapshot(&top));
}

#[test]
fn test_bitslice_constant() {
    // const X = u8:0xA5;  const HI = X[4:8];
    let interner = SharedInterner::default();
    let mut b = ModuleBuilder::new("m", &interner);
    let u8_ty = b.ubits(8);
    let byte = b.typed_number(0xA5, u8_ty);
    b.constant("X", byte);
    let x = b.const_ref("X");
    let (high, slice) = b.bit_slice(x, Some(4), Some(8));
    b.constant("HI", high);
    let module = b.finish();

    let mut host = TestHost::new(&interner);
    host.slices.insert(slice, StartWidth { start: 4, width: 4 });
    let top = make_top_level_bindings(&module, &mut host).unwrap();
    assert_eq!(top.resolve_value("HI"), Ok(ubits(4, 0xA)));
}
