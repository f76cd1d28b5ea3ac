//! Deterministic hash-based identity for types and method signatures.
//!
//! [`TypeHash`] is a 64-bit XXHash64 value. Type references hash to the same
//! value whenever they denote the same declaration, and method signatures hash
//! from their name plus the ordered identities of their parameter types, so
//! overload comparisons reduce to integer equality.
//!
//! # Examples
//!
//! ```
//! use xidl_core::TypeHash;
//!
//! let int32 = TypeHash::from_name("Int32");
//! assert_eq!(int32, TypeHash::from_name("Int32"));
//!
//! let a = TypeHash::from_signature("Paint", &[int32]);
//! let b = TypeHash::from_signature("Paint", &[]);
//! assert_ne!(a, b);
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
pub mod hash_constants {
    /// Separator constant for sequence components
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for named type hashes
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for method signature hashes
    pub const SIGNATURE: u64 = 0x7d3c8b4a92e15f6d;

    /// Domain marker for declarations identified by arena slot
    pub const ENTITY: u64 = 0x9a7f3d5e2b8c4601;

    /// Parameter position mixing constants.
    /// Each position gets a unique constant so parameter order matters.
    pub const PARAM_MARKERS: [u64; 16] = [
        0x9e3779b97f4a7c15,
        0xbf58476d1ce4e5b9,
        0x94d049bb133111eb,
        0xd6e8feb86659fd93,
        0xe7037ed1a0b428db,
        0xc6a4a7935bd1e995,
        0x8648dbbc94d49b8d,
        0xa2b48b2c69e0d657,
        0x7c3e9f2a5b8d1403,
        0x5d8c7b4a3e9f2106,
        0x3f1e9d8c7b5a4203,
        0x1a2b3c4d5e6f7089,
        0x9f8e7d6c5b4a3210,
        0x2468ace013579bdf,
        0xfdb97531eca86420,
        0x123456789abcdef0,
    ];
}

/// A deterministic 64-bit identity for a type or method signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a type name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Create a hash for a declaration identified by its kind tag and arena slot.
    ///
    /// Two resolved references to the same declaration produce the same hash
    /// regardless of how the reference was spelled.
    #[inline]
    pub fn from_entity(kind: u8, index: u32) -> Self {
        let mut bytes = [0u8; 5];
        bytes[0] = kind;
        bytes[1..].copy_from_slice(&index.to_le_bytes());
        TypeHash(hash_constants::ENTITY ^ xxh64(&bytes, 0))
    }

    /// Create a method signature hash from name and parameter type hashes.
    ///
    /// Return types do not participate: two methods sharing a name and
    /// parameter list have the same signature.
    #[inline]
    pub fn from_signature(name: &str, param_hashes: &[TypeHash]) -> Self {
        let mut hash = hash_constants::SIGNATURE ^ xxh64(name.as_bytes(), 0);
        for (i, param) in param_hashes.iter().enumerate() {
            let marker = hash_constants::PARAM_MARKERS
                .get(i)
                .copied()
                .unwrap_or_else(|| hash_constants::PARAM_MARKERS[0].wrapping_add(i as u64));
            hash = hash
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(marker ^ param.0);
        }
        TypeHash(hash)
    }

    /// Check if this is an empty/invalid hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_hash_determinism() {
        assert_eq!(TypeHash::from_name("Int32"), TypeHash::from_name("Int32"));
        assert_ne!(TypeHash::from_name("Int32"), TypeHash::from_name("Int64"));
    }

    #[test]
    fn entity_hash_distinguishes_kind_and_slot() {
        assert_eq!(TypeHash::from_entity(1, 7), TypeHash::from_entity(1, 7));
        assert_ne!(TypeHash::from_entity(1, 7), TypeHash::from_entity(2, 7));
        assert_ne!(TypeHash::from_entity(1, 7), TypeHash::from_entity(1, 8));
    }

    #[test]
    fn signature_overload_distinction() {
        let int32 = TypeHash::from_name("Int32");
        let int64 = TypeHash::from_name("Int64");
        assert_ne!(
            TypeHash::from_signature("Paint", &[int32]),
            TypeHash::from_signature("Paint", &[int64])
        );
        assert_ne!(
            TypeHash::from_signature("Paint", &[]),
            TypeHash::from_signature("Paint", &[int32])
        );
    }

    #[test]
    fn signature_parameter_order_matters() {
        let a = TypeHash::from_name("Int32");
        let b = TypeHash::from_name("String");
        assert_ne!(
            TypeHash::from_signature("Draw", &[a, b]),
            TypeHash::from_signature("Draw", &[b, a])
        );
    }

    #[test]
    fn many_parameters_supported() {
        let params: Vec<_> = (0..20).map(|i| TypeHash::from_name(&format!("T{i}"))).collect();
        let h = TypeHash::from_signature("Wide", &params);
        assert_eq!(h, TypeHash::from_signature("Wide", &params));
    }

    #[test]
    fn hash_debug_format() {
        assert_eq!(format!("{:?}", TypeHash(0x2a)), "TypeHash(0x000000000000002a)");
        assert!(TypeHash::EMPTY.is_empty());
    }
}
