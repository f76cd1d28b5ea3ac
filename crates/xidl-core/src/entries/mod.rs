//! Type model entities.
//!
//! Declarations own their members; every link between declarations is a
//! typed handle from [`ids`].

mod enumeration;
mod ids;
mod imported;
mod members;
mod object;
mod structure;
mod type_ref;

pub use enumeration::{EnumMember, EnumMemberValue, EnumModel};
pub use ids::{DelegateId, EnumId, ImportedTypeId, MemberRef, ObjectId, StructId};
pub use imported::{ImportedCategory, ImportedType};
pub use members::{
    EVENT_REGISTRATION_TOKEN, EventModel, FormalParameterModel, MethodAssociation, MethodModel,
    ParameterSemantics, PropertyModel, adder_name, getter_name, remover_name, setter_name,
};
pub use object::{
    ClassData, ClassModifiers, ClassOrInterfaceModel, ConstructorModel, CycleState, ObjectKind,
    SynthesizedInterfaces,
};
pub use structure::{DelegateModel, FieldModel, StructModel};
pub use type_ref::{TypeCategory, TypeRef, TypeTarget};
