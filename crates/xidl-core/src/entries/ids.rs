//! Typed handles into the type model arenas.
//!
//! Every cross-declaration edge (type references, overridden members,
//! synthesized interfaces) is one of these handles rather than an owning
//! pointer, so cycles in the declared graph never become ownership cycles.

use std::fmt;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl $name {
            /// Slot index in the owning arena.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            /// Handle for the given arena slot.
            #[inline]
            pub fn from_index(index: usize) -> Self {
                Self(index as u32)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

arena_id!(
    /// Handle to a class or interface.
    ObjectId,
    "object"
);
arena_id!(
    /// Handle to a struct.
    StructId,
    "struct"
);
arena_id!(
    /// Handle to an enum.
    EnumId,
    "enum"
);
arena_id!(
    /// Handle to a delegate.
    DelegateId,
    "delegate"
);
arena_id!(
    /// Handle to a type materialized from imported metadata.
    ImportedTypeId,
    "imported"
);

/// Non-owning link to a member of a class or interface.
///
/// `index` addresses the owner's method, property or event list depending on
/// where the link is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemberRef {
    pub owner: ObjectId,
    pub index: usize,
}

impl MemberRef {
    pub fn new(owner: ObjectId, index: usize) -> Self {
        Self { owner, index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_index() {
        let id = StructId::from_index(12);
        assert_eq!(id.index(), 12);
        assert_eq!(format!("{id:?}"), "struct#12");
    }
}
