//! Members of classes and interfaces: methods, properties, events and their
//! formal parameters.

use crate::TypeHash;

use super::{MemberRef, TypeRef};

/// Qualified name of the token type returned by event adders.
pub const EVENT_REGISTRATION_TOKEN: &str = "Foundation.EventRegistrationToken";

/// Name of the synthesized property getter.
pub fn getter_name(property: &str) -> String {
    format!("get_{property}")
}

/// Name of the synthesized property setter.
pub fn setter_name(property: &str) -> String {
    format!("put_{property}")
}

/// Name of the synthesized event adder.
pub fn adder_name(event: &str) -> String {
    format!("add_{event}")
}

/// Name of the synthesized event remover.
pub fn remover_name(event: &str) -> String {
    format!("remove_{event}")
}

/// How an argument is passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParameterSemantics {
    #[default]
    In,
    Out,
    Ref,
    ConstRef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormalParameterModel {
    pub name: String,
    pub line: u32,
    pub semantics: ParameterSemantics,
    pub type_ref: TypeRef,
}

impl FormalParameterModel {
    pub fn new(name: impl Into<String>, line: u32, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            line,
            semantics: ParameterSemantics::In,
            type_ref,
        }
    }

    pub fn with_semantics(mut self, semantics: ParameterSemantics) -> Self {
        self.semantics = semantics;
        self
    }
}

/// Whether a method was written by the user or synthesized for a property or event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MethodAssociation {
    #[default]
    None,
    Property,
    Event,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodModel {
    pub name: String,
    pub line: u32,
    pub is_static: bool,
    pub association: MethodAssociation,
    pub return_type: Option<TypeRef>,
    pub parameters: Vec<FormalParameterModel>,
    /// Base method this one redeclares, set by member validation.
    pub overridden: Option<MemberRef>,
}

impl MethodModel {
    pub fn new(name: impl Into<String>, line: u32) -> Self {
        Self {
            name: name.into(),
            line,
            is_static: false,
            association: MethodAssociation::None,
            return_type: None,
            parameters: Vec::new(),
            overridden: None,
        }
    }

    pub fn with_return(mut self, return_type: TypeRef) -> Self {
        self.return_type = Some(return_type);
        self
    }

    pub fn with_parameter(mut self, parameter: FormalParameterModel) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_association(mut self, association: MethodAssociation) -> Self {
        self.association = association;
        self
    }

    /// True for methods the user wrote.
    pub fn is_explicit(&self) -> bool {
        self.association == MethodAssociation::None
    }

    /// Name plus ordered parameter type identities.
    pub fn signature(&self) -> TypeHash {
        let params: Vec<TypeHash> = self.parameters.iter().map(|p| p.type_ref.identity()).collect();
        TypeHash::from_signature(&self.name, &params)
    }

    /// Iterate every type reference the method holds.
    pub fn type_refs_mut(&mut self) -> impl Iterator<Item = &mut TypeRef> {
        self.return_type
            .iter_mut()
            .chain(self.parameters.iter_mut().map(|p| &mut p.type_ref))
    }
}

/// A property. Accessors live in the owner's method list; the property
/// holds their indices.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyModel {
    pub name: String,
    pub line: u32,
    pub is_static: bool,
    pub type_ref: TypeRef,
    pub get_method: Option<usize>,
    pub set_method: Option<usize>,
    pub overridden: Option<MemberRef>,
}

impl PropertyModel {
    pub fn new(name: impl Into<String>, line: u32, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            line,
            is_static: false,
            type_ref,
            get_method: None,
            set_method: None,
            overridden: None,
        }
    }

    /// Build the getter for this property.
    pub fn make_getter(&self, line: u32) -> MethodModel {
        MethodModel::new(getter_name(&self.name), line)
            .with_return(self.type_ref.clone())
            .with_static(self.is_static)
            .with_association(MethodAssociation::Property)
    }

    /// Build the setter for this property.
    pub fn make_setter(&self, line: u32) -> MethodModel {
        MethodModel::new(setter_name(&self.name), line)
            .with_parameter(FormalParameterModel::new("value", line, self.type_ref.clone()))
            .with_static(self.is_static)
            .with_association(MethodAssociation::Property)
    }
}

/// An event. Both accessors are always present in the owner's method list.
#[derive(Debug, Clone, PartialEq)]
pub struct EventModel {
    pub name: String,
    pub line: u32,
    pub is_static: bool,
    pub type_ref: TypeRef,
    pub add_method: usize,
    pub remove_method: usize,
    pub overridden: Option<MemberRef>,
}

impl EventModel {
    /// Build the adder and remover for an event named `name` of delegate type `type_ref`.
    pub fn make_accessors(
        name: &str,
        line: u32,
        is_static: bool,
        type_ref: &TypeRef,
    ) -> (MethodModel, MethodModel) {
        let adder = MethodModel::new(adder_name(name), line)
            .with_return(TypeRef::named(EVENT_REGISTRATION_TOKEN))
            .with_parameter(FormalParameterModel::new("handler", line, type_ref.clone()))
            .with_static(is_static)
            .with_association(MethodAssociation::Event);
        let remover = MethodModel::new(remover_name(name), line)
            .with_parameter(FormalParameterModel::new(
                "token",
                line,
                TypeRef::named(EVENT_REGISTRATION_TOKEN),
            ))
            .with_static(is_static)
            .with_association(MethodAssociation::Event);
        (adder, remover)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FundamentalType;

    #[test]
    fn accessor_names() {
        assert_eq!(getter_name("Width"), "get_Width");
        assert_eq!(setter_name("Width"), "put_Width");
        assert_eq!(adder_name("Changed"), "add_Changed");
        assert_eq!(remover_name("Changed"), "remove_Changed");
    }

    #[test]
    fn signature_ignores_return_type() {
        let a = MethodModel::new("Paint", 1).with_return(TypeRef::fundamental(FundamentalType::Int32));
        let b = MethodModel::new("Paint", 2).with_return(TypeRef::fundamental(FundamentalType::Int64));
        assert_eq!(a.signature(), b.signature());
    }

    #[test]
    fn signature_includes_parameter_types() {
        let a = MethodModel::new("Paint", 1);
        let b = MethodModel::new("Paint", 2).with_parameter(FormalParameterModel::new(
            "x",
            2,
            TypeRef::fundamental(FundamentalType::Int32),
        ));
        assert_ne!(a.signature(), b.signature());
    }

    #[test]
    fn property_accessors_carry_type() {
        let p = PropertyModel::new("Width", 4, TypeRef::fundamental(FundamentalType::Double));
        let get = p.make_getter(4);
        let set = p.make_setter(4);
        assert_eq!(get.return_type, Some(p.type_ref.clone()));
        assert!(set.return_type.is_none());
        assert_eq!(set.parameters[0].type_ref, p.type_ref);
        assert_eq!(get.association, MethodAssociation::Property);
    }

    #[test]
    fn event_accessors_use_registration_token() {
        let (add, remove) = EventModel::make_accessors("Changed", 7, false, &TypeRef::named("Handler"));
        assert_eq!(add.return_type.as_ref().map(TypeRef::name), Some(EVENT_REGISTRATION_TOKEN));
        assert_eq!(remove.parameters[0].type_ref.name(), EVENT_REGISTRATION_TOKEN);
        assert_eq!(add.parameters[0].type_ref.name(), "Handler");
        assert_eq!(remove.association, MethodAssociation::Event);
    }
}
