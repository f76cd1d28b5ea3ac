//! Core types for the IDL compiler.
//!
//! This crate holds what every other crate shares: qualified names, identity
//! hashing, fundamental types, the error taxonomy with its diagnostics sink,
//! and the type model entities.

mod diagnostics;
pub mod entries;
mod error;
mod primitives;
mod qualified_name;
mod type_hash;

pub use diagnostics::Diagnostics;
pub use entries::*;
pub use error::{Diagnostic, ErrorKind, MetadataError};
pub use primitives::{EnumBase, EnumValue, FundamentalType, OBJECT_KEYWORD};
pub use qualified_name::{QualifiedName, SEPARATOR};
pub use type_hash::{TypeHash, hash_constants};
