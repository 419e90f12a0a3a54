//! Builtin functions visible at the top level of every module.

use std::fmt;

/// A builtin function of the hardware description language.
///
/// Builtins are bound by name in every module's top-level scope before any
/// user definition, so a module-level function of the same name shadows them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Builtin {
    AddWithCarry,
    AndReduce,
    ArraySize,
    AssertEq,
    AssertLt,
    BitSlice,
    BitSliceUpdate,
    Clz,
    Cover,
    Ctz,
    Enumerate,
    Fail,
    Gate,
    Map,
    OneHot,
    OneHotSel,
    OrReduce,
    PrioritySel,
    Range,
    Rev,
    Signex,
    Slice,
    Trace,
    Update,
    XorReduce,
}

impl Builtin {
    /// Every builtin, in registration order.
    pub const ALL: [Builtin; 25] = [
        Builtin::AddWithCarry,
        Builtin::AndReduce,
        Builtin::ArraySize,
        Builtin::AssertEq,
        Builtin::AssertLt,
        Builtin::BitSlice,
        Builtin::BitSliceUpdate,
        Builtin::Clz,
        Builtin::Cover,
        Builtin::Ctz,
        Builtin::Enumerate,
        Builtin::Fail,
        Builtin::Gate,
        Builtin::Map,
        Builtin::OneHot,
        Builtin::OneHotSel,
        Builtin::OrReduce,
        Builtin::PrioritySel,
        Builtin::Range,
        Builtin::Rev,
        Builtin::Signex,
        Builtin::Slice,
        Builtin::Trace,
        Builtin::Update,
        Builtin::XorReduce,
    ];

    /// Source-level identifier of the builtin.
    pub const fn name(self) -> &'static str {
        match self {
            Builtin::AddWithCarry => "add_with_carry",
            Builtin::AndReduce => "and_reduce",
            Builtin::ArraySize => "array_size",
            Builtin::AssertEq => "assert_eq",
            Builtin::AssertLt => "assert_lt",
            Builtin::BitSlice => "bit_slice",
            Builtin::BitSliceUpdate => "bit_slice_update",
            Builtin::Clz => "clz",
            Builtin::Cover => "cover!",
            Builtin::Ctz => "ctz",
            Builtin::Enumerate => "enumerate",
            Builtin::Fail => "fail!",
            Builtin::Gate => "gate!",
            Builtin::Map => "map",
            Builtin::OneHot => "one_hot",
            Builtin::OneHotSel => "one_hot_sel",
            Builtin::OrReduce => "or_reduce",
            Builtin::PrioritySel => "priority_sel",
            Builtin::Range => "range",
            Builtin::Rev => "rev",
            Builtin::Signex => "signex",
            Builtin::Slice => "slice",
            Builtin::Trace => "trace!",
            Builtin::Update => "update",
            Builtin::XorReduce => "xor_reduce",
        }
    }

    /// Look up a builtin by its source identifier.
    pub fn from_name(name: &str) -> Option<Builtin> {
        Builtin::ALL.into_iter().find(|b| b.name() == name)
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
