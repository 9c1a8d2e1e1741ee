//! Value model shared by run analysis and both emitters.
//!
//! Signed and unsigned constants share one logical integer type, [`Value`],
//! wide enough to hold every `i64` and every `u64`. Signedness travels next
//! to it as a flag, so the run and strategy logic is written once.

use crate::errors::{GenerateError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric value of a declared constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Value(i128);

impl Value {
    pub const ZERO: Value = Value(0);

    pub const fn new(raw: i128) -> Self {
        Value(raw)
    }

    pub const fn get(self) -> i128 {
        self.0
    }

    /// True when `self` is exactly one more than `prev`.
    pub fn follows(self, prev: Value) -> bool {
        self.0 == prev.0 + 1
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value(v as i128)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value(v as i128)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Primitive integer a generated type wraps.
///
/// `isize` and `usize` are treated as 64 bits wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Repr {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
}

impl Repr {
    pub fn is_signed(self) -> bool {
        matches!(
            self,
            Repr::I8 | Repr::I16 | Repr::I32 | Repr::I64 | Repr::Isize
        )
    }

    pub fn bits(self) -> u32 {
        match self {
            Repr::I8 | Repr::U8 => 8,
            Repr::I16 | Repr::U16 => 16,
            Repr::I32 | Repr::U32 => 32,
            Repr::I64 | Repr::U64 | Repr::Isize | Repr::Usize => 64,
        }
    }

    pub fn min_value(self) -> Value {
        if self.is_signed() {
            Value(-(1i128 << (self.bits() - 1)))
        } else {
            Value::ZERO
        }
    }

    pub fn max_value(self) -> Value {
        if self.is_signed() {
            Value((1i128 << (self.bits() - 1)) - 1)
        } else {
            Value((1i128 << self.bits()) - 1)
        }
    }

    /// Whether `value` is representable in this type.
    pub fn contains(self, value: Value) -> bool {
        self.min_value() <= value && value <= self.max_value()
    }

    /// Reduces `raw` modulo 2^bits into this type's range, the way
    /// `wrapping_*` arithmetic on the primitive does.
    pub fn wrap(self, raw: i128) -> Value {
        let modulus = 1i128 << self.bits();
        let min = self.min_value().get();
        Value((raw - min).rem_euclid(modulus) + min)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Repr::I8 => "i8",
            Repr::I16 => "i16",
            Repr::I32 => "i32",
            Repr::I64 => "i64",
            Repr::Isize => "isize",
            Repr::U8 => "u8",
            Repr::U16 => "u16",
            Repr::U32 => "u32",
            Repr::U64 => "u64",
            Repr::Usize => "usize",
        }
    }
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared constant of an enumerated type.
///
/// `label` is the text the constant stringifies to. It is supplied by the
/// extractor; nothing in the generator derives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumerant {
    original_name: String,
    value: Value,
    signed: bool,
    label: String,
}

impl Enumerant {
    pub fn new(
        original_name: impl Into<String>,
        value: Value,
        signed: bool,
        label: impl Into<String>,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            value,
            signed,
            label: label.into(),
        }
    }

    /// Identifier as declared, used verbatim in generated code.
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn value(&self) -> Value {
        self.value
    }

    pub fn is_signed(&self) -> bool {
        self.signed
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Every extracted constant of one named type.
///
/// Construction checks that all members agree with the representation's
/// signedness and fit inside it. An empty set is allowed here; generation
/// rejects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerantSet {
    type_name: String,
    repr: Repr,
    enumerants: Vec<Enumerant>,
}

impl EnumerantSet {
    pub fn new(
        type_name: impl Into<String>,
        repr: Repr,
        enumerants: Vec<Enumerant>,
    ) -> Result<Self> {
        let type_name = type_name.into();
        for enumerant in &enumerants {
            if enumerant.is_signed() != repr.is_signed() {
                return Err(GenerateError::MixedSignedness { type_name });
            }
            if !repr.contains(enumerant.value()) {
                return Err(GenerateError::ValueOutOfRange {
                    type_name,
                    name: enumerant.original_name().to_string(),
                    value: enumerant.value(),
                    repr,
                });
            }
        }
        Ok(Self {
            type_name,
            repr,
            enumerants,
        })
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn repr(&self) -> Repr {
        self.repr
    }

    pub fn is_signed(&self) -> bool {
        self.repr.is_signed()
    }

    pub fn enumerants(&self) -> &[Enumerant] {
        &self.enumerants
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Enumerant> {
        self.enumerants.iter()
    }

    pub fn len(&self) -> usize {
        self.enumerants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enumerants.is_empty()
    }

    /// Membership test against the declared values, the reference every
    /// generated validity check must agree with.
    pub fn declares(&self, value: Value) -> bool {
        self.enumerants.iter().any(|e| e.value() == value)
    }
}
