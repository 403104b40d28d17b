//! Sigil Class Model
//!
//! Declarations, argument values, and reflection facts consumed by the
//! Sigil analysis engine.

#![warn(missing_docs)]

pub mod args;
pub mod decl;
pub mod error;
pub mod info;
pub mod members;
pub mod model;
pub mod value;

pub use args::Args;
pub use decl::{AttrDecl, ClassDecl, MethodDecl, ParamDecl, PropertyDecl};
pub use error::ArgError;
pub use info::{ClassInfo, MethodInfo, ParameterInfo, PropertyInfo};
pub use members::Members;
pub use model::{Ancestry, Model, ModelBuilder};
pub use value::Value;
