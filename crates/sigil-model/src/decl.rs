//! Class declarations
//!
//! Declarations record what a compiler front end knows about a class at
//! declaration time: attached attribute entries plus properties, methods,
//! and parameters. Every list preserves source order, and the analysis
//! engine enumerates them in that order.

use crate::args::Args;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// One attribute entry attached to a declaration target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttrDecl {
    /// Declared metadata type name
    pub ty: String,
    /// Captured constructor arguments
    #[serde(default, skip_serializing_if = "Args::is_empty")]
    pub args: Args,
}

impl AttrDecl {
    /// Entry with no arguments
    pub fn new(ty: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            args: Args::new(),
        }
    }

    /// Entry with the given arguments
    pub fn with_args(ty: impl Into<String>, args: Args) -> Self {
        Self { ty: ty.into(), args }
    }
}

/// A declared method parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDecl {
    /// Parameter name
    pub name: String,
    /// Declared type name, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
    /// Declared default value, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Attached attribute entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attrs: Vec<AttrDecl>,
}

impl ParamDecl {
    /// Parameter with no type, default, or attributes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            default: None,
            attrs: Vec::new(),
        }
    }

    /// Set the declared type name
    pub fn typed(mut self, ty: impl Into<String>) -> Self {
        self.ty = Some(ty.into());
        self
    }

    /// Set the declared default value
    pub fn defaulted(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Attach an attribute entry
    pub fn attr(mut self, attr: AttrDecl) -> Self {
        self.attrs.push(attr);
        self
    }
}

/// A declared method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    /// Method name
    pub name: String,
    /// Parameters in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamDecl>,
    /// Attached attribute entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attrs: Vec<AttrDecl>,
}

impl MethodDecl {
    /// Method with no parameters or attributes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            attrs: Vec::new(),
        }
    }

    /// Append a parameter
    pub fn param(mut self, param: ParamDecl) -> Self {
        self.params.push(param);
        self
    }

    /// Attach an attribute entry
    pub fn attr(mut self, attr: AttrDecl) -> Self {
        self.attrs.push(attr);
        self
    }
}

/// A declared property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDecl {
    /// Property name
    pub name: String,
    /// Declared type name, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
    /// Declared default value, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Attached attribute entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attrs: Vec<AttrDecl>,
}

impl PropertyDecl {
    /// Property with no type, default, or attributes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            default: None,
            attrs: Vec::new(),
        }
    }

    /// Set the declared type name
    pub fn typed(mut self, ty: impl Into<String>) -> Self {
        self.ty = Some(ty.into());
        self
    }

    /// Set the declared default value
    pub fn defaulted(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Attach an attribute entry
    pub fn attr(mut self, attr: AttrDecl) -> Self {
        self.attrs.push(attr);
        self
    }
}

/// A declared class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    /// Class name
    pub name: String,
    /// Parent class name, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Attached attribute entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attrs: Vec<AttrDecl>,
    /// Properties in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyDecl>,
    /// Methods in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodDecl>,
}

impl ClassDecl {
    /// Class with no parent, attributes, or members
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            attrs: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Set the parent class name
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Attach an attribute entry
    pub fn attr(mut self, attr: AttrDecl) -> Self {
        self.attrs.push(attr);
        self
    }

    /// Append a property
    pub fn property(mut self, property: PropertyDecl) -> Self {
        self.properties.push(property);
        self
    }

    /// Append a method
    pub fn method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }
}
