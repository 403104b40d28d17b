//! Sigil attribute engine
//!
//! Turns the attribute declarations in a [`sigil_model::Model`] into typed
//! descriptor structs. Attribute types implement [`Attribute`] plus whatever
//! capability traits they need, get registered in a [`Registry`], and an
//! [`Analyzer`] resolves them class by class: constructor arguments first,
//! then reflection facts, sub-attributes, and member descriptor maps.

#![warn(missing_docs)]

pub mod analyzer;
pub mod attribute;
pub mod error;
pub mod registry;
mod resolver;
pub mod subattr;

pub use analyzer::{Analyzer, Subject};
pub use attribute::{
    Attribute, CustomName, Excludable, FromClassInfo, FromMethodInfo, FromParameterInfo,
    FromPropertyInfo, HasSubAttributes, Inherit, ParseMethods, ParseParameters, ParseProperties,
};
pub use error::Error;
pub use registry::{Registry, TypeBuilder};
pub use subattr::{AttrBox, SubAttributes};
