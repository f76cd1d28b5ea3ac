//! Fixed-width fundamental types and enum underlying types.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;

use crate::TypeHash;

/// A built-in value type.
///
/// Discriminants are the metadata element-type codes, so an imported
/// signature byte converts with `FundamentalType::try_from(code)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum FundamentalType {
    Boolean = 0x02,
    Char16 = 0x03,
    Int8 = 0x04,
    UInt8 = 0x05,
    Int16 = 0x06,
    UInt16 = 0x07,
    Int32 = 0x08,
    UInt32 = 0x09,
    Int64 = 0x0a,
    UInt64 = 0x0b,
    Single = 0x0c,
    Double = 0x0d,
    String = 0x0e,
}

impl FundamentalType {
    /// All fundamental types in element-code order.
    pub const ALL: [FundamentalType; 13] = [
        Self::Boolean,
        Self::Char16,
        Self::Int8,
        Self::UInt8,
        Self::Int16,
        Self::UInt16,
        Self::Int32,
        Self::UInt32,
        Self::Int64,
        Self::UInt64,
        Self::Single,
        Self::Double,
        Self::String,
    ];

    /// The source keyword for this type.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::Char16 => "Char16",
            Self::Int8 => "Int8",
            Self::UInt8 => "UInt8",
            Self::Int16 => "Int16",
            Self::UInt16 => "UInt16",
            Self::Int32 => "Int32",
            Self::UInt32 => "UInt32",
            Self::Int64 => "Int64",
            Self::UInt64 => "UInt64",
            Self::Single => "Single",
            Self::Double => "Double",
            Self::String => "String",
        }
    }

    /// Look up a fundamental type by its keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.keyword() == keyword)
    }

    /// Identity hash, shared by every reference to this type.
    pub fn type_hash(self) -> TypeHash {
        TypeHash::from_name(self.keyword())
    }
}

impl fmt::Display for FundamentalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Keyword for the opaque object type.
pub const OBJECT_KEYWORD: &str = "Object";

/// Underlying integer type of an enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnumBase {
    Int8,
    UInt8,
    Int16,
    UInt16,
    #[default]
    Int32,
    UInt32,
    Int64,
    UInt64,
}

/// A resolved enum member value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumValue {
    Signed(i64),
    Unsigned(u64),
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumValue::Signed(v) => write!(f, "{v}"),
            EnumValue::Unsigned(v) => write!(f, "{v}"),
        }
    }
}

impl EnumBase {
    /// Whether values of this base are signed.
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64)
    }

    /// Inclusive signed range, for signed bases.
    const fn signed_range(self) -> (i64, i64) {
        match self {
            Self::Int8 => (i8::MIN as i64, i8::MAX as i64),
            Self::Int16 => (i16::MIN as i64, i16::MAX as i64),
            Self::Int32 => (i32::MIN as i64, i32::MAX as i64),
            _ => (i64::MIN, i64::MAX),
        }
    }

    /// Inclusive upper bound, for unsigned bases.
    const fn unsigned_max(self) -> u64 {
        match self {
            Self::UInt8 => u8::MAX as u64,
            Self::UInt16 => u16::MAX as u64,
            Self::UInt32 => u32::MAX as u64,
            _ => u64::MAX,
        }
    }

    /// The zero value in this base.
    pub const fn zero(self) -> EnumValue {
        if self.is_signed() {
            EnumValue::Signed(0)
        } else {
            EnumValue::Unsigned(0)
        }
    }

    /// Parse a decimal or `0x`-prefixed hexadecimal literal into this base.
    ///
    /// Returns `None` when the text is not a literal or the value does not fit.
    pub fn parse_literal(self, text: &str) -> Option<EnumValue> {
        let text = text.trim();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (radix, digits) = match digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
        {
            Some(hex) => (16, hex),
            None => (10, digits),
        };
        if digits.is_empty() || digits.starts_with(['+', '-']) {
            return None;
        }
        let magnitude = u64::from_str_radix(digits, radix).ok()?;

        if self.is_signed() {
            let (min, max) = self.signed_range();
            let value = if negative {
                0i128 - i128::from(magnitude)
            } else {
                i128::from(magnitude)
            };
            if value < i128::from(min) || value > i128::from(max) {
                return None;
            }
            Some(EnumValue::Signed(value as i64))
        } else {
            if negative && magnitude != 0 {
                return None;
            }
            (magnitude <= self.unsigned_max()).then_some(EnumValue::Unsigned(magnitude))
        }
    }

    /// The value following `value` in this base, or `None` on overflow.
    pub fn increment(self, value: EnumValue) -> Option<EnumValue> {
        match value {
            EnumValue::Signed(v) => {
                let next = v.checked_add(1)?;
                (next <= self.signed_range().1).then_some(EnumValue::Signed(next))
            }
            EnumValue::Unsigned(v) => {
                let next = v.checked_add(1)?;
                (next <= self.unsigned_max()).then_some(EnumValue::Unsigned(next))
            }
        }
    }
}

impl TryFrom<FundamentalType> for EnumBase {
    type Error = FundamentalType;

    fn try_from(value: FundamentalType) -> Result<Self, Self::Error> {
        match value {
            FundamentalType::Int8 => Ok(Self::Int8),
            FundamentalType::UInt8 => Ok(Self::UInt8),
            FundamentalType::Int16 => Ok(Self::Int16),
            FundamentalType::UInt16 => Ok(Self::UInt16),
            FundamentalType::Int32 => Ok(Self::Int32),
            FundamentalType::UInt32 => Ok(Self::UInt32),
            FundamentalType::Int64 => Ok(Self::Int64),
            FundamentalType::UInt64 => Ok(Self::UInt64),
            other => Err(other),
        }
    }
}
