//! Attribute traits
//!
//! `Attribute` is the one required trait: a name and a constructor from
//! declared arguments. Everything else an attribute can do during analysis is
//! a capability trait, and each capability only takes effect once the
//! matching `TypeBuilder` method wires it into the registry entry.

use crate::subattr::SubAttributes;
use sigil_model::{ArgError, Args, ClassInfo, Members, MethodInfo, ParameterInfo, PropertyInfo};

/// A metadata type that can be built from a declared attribute.
pub trait Attribute: Sized + 'static {
    /// Name the type is declared under in class models.
    const NAME: &'static str;

    /// Build an instance from the declared arguments.
    ///
    /// Called with empty arguments when a member descriptor is synthesized
    /// for an unannotated member, so defaults belong here.
    fn from_args(args: &Args) -> Result<Self, ArgError>;
}

/// Receives facts about the class the attribute sits on.
pub trait FromClassInfo: Attribute {
    /// Absorb the class facts.
    fn from_class(&mut self, class: &ClassInfo<'_>);
}

/// Receives facts about the property the attribute sits on.
pub trait FromPropertyInfo: Attribute {
    /// Absorb the property facts.
    fn from_property(&mut self, property: &PropertyInfo<'_>);
}

/// Receives facts about the method the attribute sits on.
pub trait FromMethodInfo: Attribute {
    /// Absorb the method facts.
    fn from_method(&mut self, method: &MethodInfo<'_>);
}

/// Receives facts about the parameter the attribute sits on.
pub trait FromParameterInfo: Attribute {
    /// Absorb the parameter facts.
    fn from_parameter(&mut self, parameter: &ParameterInfo<'_>);
}

/// Absorbs other attributes declared on the same target.
pub trait HasSubAttributes: Attribute {
    /// The child bindings, applied in declaration order.
    fn sub_attributes() -> SubAttributes<Self>;
}

/// A class attribute that collects one descriptor per property.
pub trait ParseProperties: Attribute {
    /// Descriptor type resolved for each property.
    type PropertyAttribute: Attribute;

    /// Whether unannotated properties get a default-built descriptor.
    fn include_by_default(&self) -> bool {
        true
    }

    /// Receive the assembled property map.
    fn set_properties(&mut self, properties: Members<Self::PropertyAttribute>);
}

/// A class attribute that collects one descriptor per method.
pub trait ParseMethods: Attribute {
    /// Descriptor type resolved for each method.
    type MethodAttribute: Attribute;

    /// Whether unannotated methods get a default-built descriptor.
    fn include_by_default(&self) -> bool {
        true
    }

    /// Receive the assembled method map.
    fn set_methods(&mut self, methods: Members<Self::MethodAttribute>);
}

/// A method attribute that collects one descriptor per parameter.
pub trait ParseParameters: Attribute {
    /// Descriptor type resolved for each parameter.
    type ParameterAttribute: Attribute;

    /// Whether unannotated parameters get a default-built descriptor.
    fn include_by_default(&self) -> bool {
        true
    }

    /// Receive the assembled parameter map, in positional order.
    fn set_parameters(&mut self, parameters: Members<Self::ParameterAttribute>);
}

/// A member descriptor that can drop itself from the assembled map.
pub trait Excludable: Attribute {
    /// Whether this instance should be omitted.
    fn exclude(&self) -> bool;
}

/// A member descriptor that can override its key in the assembled map.
pub trait CustomName: Attribute {
    /// Replacement key, or `None` to keep the declared member name.
    fn custom_name(&self) -> Option<&str>;
}

/// A class attribute that folds in the same attribute from the parent class.
pub trait Inherit: Attribute {
    /// Merge the fully resolved ancestor descriptor into `self`.
    fn inherit_from(&mut self, ancestor: Self);
}
