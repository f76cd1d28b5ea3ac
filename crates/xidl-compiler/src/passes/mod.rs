//! Compiler passes.
//!
//! - [`build`]: Pass 0 - build the type model from the declaration tree
//! - [`resolution`]: Pass 1 - resolve type references against the symbol table
//! - [`enum_values`]: Pass 1 - compute enum member values
//! - [`cycles`]: Pass 2 - detect struct and interface cycles
//! - [`members`]: Pass 2 - validate member lists
//! - [`synthesis`]: Pass 2 - synthesize runtime class interfaces

pub mod build;
pub mod cycles;
pub mod enum_values;
pub mod members;
pub mod resolution;
pub mod synthesis;

pub use build::{BuildOutput, BuildPass};
pub use cycles::{CycleDetectionPass, CycleOutput};
pub use enum_values::{EnumValueOutput, EnumValuePass};
pub use members::{MemberValidationOutput, MemberValidationPass, inherited_interfaces};
pub use resolution::{ResolutionOutput, ResolutionPass, lookup_key};
pub use synthesis::{SynthesisOutput, SynthesisPass, factory_method_name};
