//! Field identity and typed integer values.
//!
//! This module provides:
//! - [`FieldIdentity`]: name + namespace key identifying a field within a schema
//! - [`IntKind`]: the four wire integer kinds
//! - [`FieldValue`]: an immutable, cheaply-copyable field value with an
//!   explicit null state
//! - [`FastInt`]: the numeric trait the operator engine is generic over

use crate::error::CoreError;
use num_traits::PrimInt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four integer kinds of the FAST wire format.
///
/// Signed and unsigned variants never compare equal across kinds; a cached
/// value whose kind differs from the field's declared kind is a template
/// authoring defect, not a data error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntKind {
    /// 32-bit signed integer.
    Int32,
    /// 32-bit unsigned integer.
    UInt32,
    /// 64-bit signed integer.
    Int64,
    /// 64-bit unsigned integer.
    UInt64,
}

impl IntKind {
    /// Returns true for the signed kinds.
    #[must_use]
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::Int32 | Self::Int64)
    }

    /// Returns the width in bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::Int32 | Self::UInt32 => 32,
            Self::Int64 | Self::UInt64 => 64,
        }
    }

    /// Returns the FAST template type name.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Int32 => "int32",
            Self::UInt32 => "uInt32",
            Self::Int64 => "int64",
            Self::UInt64 => "uInt64",
        }
    }
}

impl fmt::Display for IntKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Identity of a field within a schema.
///
/// A field is addressed by its local name qualified by an optional namespace;
/// an auxiliary numeric id (the FIX tag, where one exists) may be attached
/// for application use. The dictionary key is precomputed at construction so
/// per-field lookups on the hot path do not allocate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldIdentity {
    name: String,
    namespace: String,
    id: Option<u32>,
    key: String,
}

impl FieldIdentity {
    /// Creates an identity with an empty namespace.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let key = name.clone();
        Self {
            name,
            namespace: String::new(),
            id: None,
            key,
        }
    }

    /// Creates an identity qualified by a namespace.
    #[must_use]
    pub fn with_namespace(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        let name = name.into();
        let namespace = namespace.into();
        let key = if namespace.is_empty() {
            name.clone()
        } else {
            format!("{namespace}::{name}")
        };
        Self {
            name,
            namespace,
            id: None,
            key,
        }
    }

    /// Attaches an auxiliary numeric id.
    #[must_use]
    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    /// Returns the local name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the namespace (may be empty).
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the auxiliary id, if one was assigned.
    #[must_use]
    pub const fn id(&self) -> Option<u32> {
        self.id
    }

    /// Returns the dictionary key for this identity.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for FieldIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.namespace == other.namespace
    }
}

impl Eq for FieldIdentity {}

impl std::hash::Hash for FieldIdentity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.namespace.hash(state);
    }
}

impl fmt::Display for FieldIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// An immutable integer field value.
///
/// Values are plain `Copy` data; the dictionary and the field set each hold
/// their own copy of the same logical value, never a mutable alias. The
/// `Null` variant carries its kind so a cached null still type-checks
/// against the field that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldValue {
    /// Defined 32-bit signed value.
    Int32(i32),
    /// Defined 32-bit unsigned value.
    UInt32(u32),
    /// Defined 64-bit signed value.
    Int64(i64),
    /// Defined 64-bit unsigned value.
    UInt64(u64),
    /// Explicitly null value of the given kind.
    Null(IntKind),
}

impl FieldValue {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(self) -> IntKind {
        match self {
            Self::Int32(_) => IntKind::Int32,
            Self::UInt32(_) => IntKind::UInt32,
            Self::Int64(_) => IntKind::Int64,
            Self::UInt64(_) => IntKind::UInt64,
            Self::Null(kind) => kind,
        }
    }

    /// Returns true unless this is the null state.
    #[must_use]
    pub const fn is_defined(self) -> bool {
        !matches!(self, Self::Null(_))
    }

    /// Returns the value as i32, if it is a defined `Int32`.
    #[must_use]
    pub const fn as_i32(self) -> Option<i32> {
        match self {
            Self::Int32(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the value as u32, if it is a defined `UInt32`.
    #[must_use]
    pub const fn as_u32(self) -> Option<u32> {
        match self {
            Self::UInt32(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the value as i64, if it is a defined `Int64`.
    #[must_use]
    pub const fn as_i64(self) -> Option<i64> {
        match self {
            Self::Int64(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the value as u64, if it is a defined `UInt64`.
    #[must_use]
    pub const fn as_u64(self) -> Option<u64> {
        match self {
            Self::UInt64(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int32(v) => write!(f, "{v}"),
            Self::UInt32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::UInt64(v) => write!(f, "{v}"),
            Self::Null(kind) => write!(f, "null({kind})"),
        }
    }
}

/// Numeric parameter of the integer operator engine.
///
/// One implementation exists per (width, signedness) pair; the operator
/// algorithms are written once against this trait and monomorphized per
/// concrete type. Wire conversions truncate to the field's width, matching
/// the accumulate-into-the-typed-value behavior of the wire format.
pub trait FastInt:
    PrimInt + FromStr + fmt::Display + fmt::Debug + Send + Sync + 'static
{
    /// True for i32/i64; selects the signed stop-bit primitive.
    const SIGNED: bool;
    /// The kind tag for values of this type.
    const KIND: IntKind;

    /// Wraps this value in a [`FieldValue`].
    fn into_value(self) -> FieldValue;

    /// Extracts a value of this type, or `None` if the kind differs or the
    /// value is null.
    fn from_value(value: FieldValue) -> Option<Self>;

    /// Truncates a raw unsigned wire read to this width.
    fn from_wire_u64(raw: u64) -> Self;

    /// Truncates a raw signed wire read to this width.
    fn from_wire_i64(raw: i64) -> Self;

    /// Widens to u64 for the unsigned primitive (sign-extending for signed
    /// types so two's-complement arithmetic is preserved).
    fn to_wire_u64(self) -> u64;

    /// Widens to i64 for the signed primitive.
    fn to_wire_i64(self) -> i64;

    /// Adds a signed delta, wrapping at this type's width.
    fn add_delta(self, delta: i64) -> Self;

    /// Computes the signed delta `self - previous` in 64-bit two's-complement
    /// arithmetic.
    fn delta_from(self, previous: Self) -> i64 {
        self.to_wire_u64().wrapping_sub(previous.to_wire_u64()) as i64
    }

    /// Parses a schema initial-value literal; an empty literal means zero.
    fn parse_literal(literal: &str) -> Result<Self, CoreError> {
        if literal.is_empty() {
            return Ok(Self::zero());
        }
        literal.parse().map_err(|_| CoreError::InvalidLiteral {
            value: literal.to_string(),
            kind: Self::KIND,
        })
    }
}

impl FastInt for i32 {
    const SIGNED: bool = true;
    const KIND: IntKind = IntKind::Int32;

    fn into_value(self) -> FieldValue {
        FieldValue::Int32(self)
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        value.as_i32()
    }

    fn from_wire_u64(raw: u64) -> Self {
        raw as i32
    }

    fn from_wire_i64(raw: i64) -> Self {
        raw as i32
    }

    fn to_wire_u64(self) -> u64 {
        self as i64 as u64
    }

    fn to_wire_i64(self) -> i64 {
        i64::from(self)
    }

    fn add_delta(self, delta: i64) -> Self {
        i64::from(self).wrapping_add(delta) as i32
    }
}

impl FastInt for u32 {
    const SIGNED: bool = false;
    const KIND: IntKind = IntKind::UInt32;

    fn into_value(self) -> FieldValue {
        FieldValue::UInt32(self)
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        value.as_u32()
    }

    fn from_wire_u64(raw: u64) -> Self {
        raw as u32
    }

    fn from_wire_i64(raw: i64) -> Self {
        raw as u32
    }

    fn to_wire_u64(self) -> u64 {
        u64::from(self)
    }

    fn to_wire_i64(self) -> i64 {
        i64::from(self)
    }

    fn add_delta(self, delta: i64) -> Self {
        u64::from(self).wrapping_add(delta as u64) as u32
    }
}

impl FastInt for i64 {
    const SIGNED: bool = true;
    const KIND: IntKind = IntKind::Int64;

    fn into_value(self) -> FieldValue {
        FieldValue::Int64(self)
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        value.as_i64()
    }

    fn from_wire_u64(raw: u64) -> Self {
        raw as i64
    }

    fn from_wire_i64(raw: i64) -> Self {
        raw
    }

    fn to_wire_u64(self) -> u64 {
        self as u64
    }

    fn to_wire_i64(self) -> i64 {
        self
    }

    fn add_delta(self, delta: i64) -> Self {
        self.wrapping_add(delta)
    }
}

impl FastInt for u64 {
    const SIGNED: bool = false;
    const KIND: IntKind = IntKind::UInt64;

    fn into_value(self) -> FieldValue {
        FieldValue::UInt64(self)
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        value.as_u64()
    }

    fn from_wire_u64(raw: u64) -> Self {
        raw
    }

    fn from_wire_i64(raw: i64) -> Self {
        raw as u64
    }

    fn to_wire_u64(self) -> u64 {
        self
    }

    fn to_wire_i64(self) -> i64 {
        self as i64
    }

    fn add_delta(self, delta: i64) -> Self {
        self.wrapping_add(delta as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_key() {
        let plain = FieldIdentity::new("Price");
        assert_eq!(plain.key(), "Price");

        let qualified = FieldIdentity::with_namespace("Price", "md");
        assert_eq!(qualified.key(), "md::Price");
        assert_eq!(qualified.name(), "Price");
        assert_eq!(qualified.namespace(), "md");
    }

    #[test]
    fn test_identity_equality_ignores_id() {
        let a = FieldIdentity::new("Qty").with_id(38);
        let b = FieldIdentity::new("Qty");
        assert_eq!(a, b);
    }

    #[test]
    fn test_value_kind_and_definedness() {
        assert_eq!(FieldValue::Int32(-1).kind(), IntKind::Int32);
        assert!(FieldValue::UInt64(0).is_defined());

        let null = FieldValue::Null(IntKind::UInt32);
        assert!(!null.is_defined());
        assert_eq!(null.kind(), IntKind::UInt32);
    }

    #[test]
    fn test_from_value_rejects_cross_kind() {
        let v = FieldValue::Int32(7);
        assert_eq!(i32::from_value(v), Some(7));
        assert_eq!(u32::from_value(v), None);
        assert_eq!(i64::from_value(v), None);
        assert_eq!(i32::from_value(FieldValue::Null(IntKind::Int32)), None);
    }

    #[test]
    fn test_add_delta_wraps_at_width() {
        assert_eq!(u32::MAX.add_delta(1), 0);
        assert_eq!(0u32.add_delta(-1), u32::MAX);
        assert_eq!(i32::MAX.add_delta(1), i32::MIN);
        assert_eq!(5u64.add_delta(-3), 2);
        assert_eq!((-5i64).add_delta(3), -2);
    }

    #[test]
    fn test_delta_from() {
        assert_eq!(250u32.delta_from(100), 150);
        assert_eq!(100u32.delta_from(250), -150);
        assert_eq!((-2i64).delta_from(-5), 3);
        assert_eq!(0u64.delta_from(u64::MAX), 1);
    }

    #[test]
    fn test_parse_literal() {
        assert_eq!(u32::parse_literal(""), Ok(0));
        assert_eq!(i32::parse_literal("-42"), Ok(-42));
        assert_eq!(u64::parse_literal("18446744073709551615"), Ok(u64::MAX));
        assert!(u32::parse_literal("-1").is_err());
        assert!(i64::parse_literal("ten").is_err());
    }
}
