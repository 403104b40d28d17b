//! Reflection facts handed to injection hooks
//!
//! Views borrow from the model for the duration of one hook call. An
//! attribute that wants a fact copies it out as plain data; nothing lets it
//! hold the view itself past the call.

use crate::decl::{ClassDecl, MethodDecl, ParamDecl, PropertyDecl};
use crate::value::Value;

/// Facts about the class under analysis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassInfo<'a> {
    /// Class name
    pub name: &'a str,
    /// Parent class name, if any
    pub parent: Option<&'a str>,
}

impl<'a> ClassInfo<'a> {
    /// View of a class declaration
    pub fn of(class: &'a ClassDecl) -> Self {
        Self {
            name: &class.name,
            parent: class.parent.as_deref(),
        }
    }
}

/// Facts about a declared property
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyInfo<'a> {
    /// Owning class name
    pub class: &'a str,
    /// Declared property name
    pub name: &'a str,
    /// Declared type name, if any
    pub type_name: Option<&'a str>,
    /// Declared default value, if any
    pub default: Option<&'a Value>,
}

impl<'a> PropertyInfo<'a> {
    /// View of a property declaration
    pub fn of(class: &'a ClassDecl, property: &'a PropertyDecl) -> Self {
        Self {
            class: &class.name,
            name: &property.name,
            type_name: property.ty.as_deref(),
            default: property.default.as_ref(),
        }
    }

    /// True when the property declares a default value
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// Facts about a declared method
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodInfo<'a> {
    /// Owning class name
    pub class: &'a str,
    /// Declared method name
    pub name: &'a str,
    /// Number of declared parameters
    pub param_count: usize,
}

impl<'a> MethodInfo<'a> {
    /// View of a method declaration
    pub fn of(class: &'a ClassDecl, method: &'a MethodDecl) -> Self {
        Self {
            class: &class.name,
            name: &method.name,
            param_count: method.params.len(),
        }
    }
}

/// Facts about a declared parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterInfo<'a> {
    /// Owning class name
    pub class: &'a str,
    /// Owning method name
    pub method: &'a str,
    /// Declared parameter name
    pub name: &'a str,
    /// Zero-based position in the parameter list
    pub position: usize,
    /// Declared type name, if any
    pub type_name: Option<&'a str>,
    /// Declared default value, if any
    pub default: Option<&'a Value>,
}

impl<'a> ParameterInfo<'a> {
    /// View of a parameter declaration
    pub fn of(
        class: &'a ClassDecl,
        method: &'a MethodDecl,
        position: usize,
        param: &'a ParamDecl,
    ) -> Self {
        Self {
            class: &class.name,
            method: &method.name,
            name: &param.name,
            position,
            type_name: param.ty.as_deref(),
            default: param.default.as_ref(),
        }
    }

    /// True when the parameter declares a default value
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}
