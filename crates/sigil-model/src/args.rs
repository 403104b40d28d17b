//! Stored constructor arguments for attribute declarations

use crate::error::ArgError;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The argument list captured by one attribute declaration
///
/// Lookup follows keyword-argument rules: a named argument shadows the
/// positional slot bound to the same parameter name. Typed getters treat
/// `null` as absent and reject other kind mismatches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Args {
    /// Positional arguments in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub positional: Vec<Value>,
    /// Named arguments
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub named: BTreeMap<String, Value>,
}

impl Args {
    /// Empty argument list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument
    pub fn with(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Set a named argument
    pub fn with_named(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.insert(name.into(), value.into());
        self
    }

    /// True when no arguments were supplied
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    /// Raw argument for parameter `name` bound to positional slot `position`
    pub fn get(&self, name: &str, position: usize) -> Option<&Value> {
        self.named
            .get(name)
            .or_else(|| self.positional.get(position))
    }

    /// Reject named arguments outside the `known` parameter list
    pub fn expect_known(&self, known: &[&str]) -> Result<(), ArgError> {
        for name in self.named.keys() {
            if !known.contains(&name.as_str()) {
                return Err(ArgError::Unknown { name: name.clone() });
            }
        }
        Ok(())
    }

    /// String argument, if present
    pub fn str_of(&self, name: &str, position: usize) -> Result<Option<&str>, ArgError> {
        match self.lookup(name, position) {
            None => Ok(None),
            Some(value) => value.as_str().map(Some).ok_or_else(|| ArgError::Invalid {
                name: name.to_string(),
                expected: "string",
                actual: value.kind(),
            }),
        }
    }

    /// Integer argument, if present
    pub fn int_of(&self, name: &str, position: usize) -> Result<Option<i64>, ArgError> {
        match self.lookup(name, position) {
            None => Ok(None),
            Some(value) => value.as_int().map(Some).ok_or_else(|| ArgError::Invalid {
                name: name.to_string(),
                expected: "int",
                actual: value.kind(),
            }),
        }
    }

    /// Boolean argument, if present
    pub fn bool_of(&self, name: &str, position: usize) -> Result<Option<bool>, ArgError> {
        match self.lookup(name, position) {
            None => Ok(None),
            Some(value) => value.as_bool().map(Some).ok_or_else(|| ArgError::Invalid {
                name: name.to_string(),
                expected: "bool",
                actual: value.kind(),
            }),
        }
    }

    /// Float argument, if present
    pub fn float_of(&self, name: &str, position: usize) -> Result<Option<f64>, ArgError> {
        match self.lookup(name, position) {
            None => Ok(None),
            Some(value) => value.as_float().map(Some).ok_or_else(|| ArgError::Invalid {
                name: name.to_string(),
                expected: "float",
                actual: value.kind(),
            }),
        }
    }

    /// List argument, if present
    pub fn list_of(&self, name: &str, position: usize) -> Result<Option<&[Value]>, ArgError> {
        match self.lookup(name, position) {
            None => Ok(None),
            Some(value) => value.as_list().map(Some).ok_or_else(|| ArgError::Invalid {
                name: name.to_string(),
                expected: "list",
                actual: value.kind(),
            }),
        }
    }

    /// Required string argument
    pub fn require_str(&self, name: &str, position: usize) -> Result<&str, ArgError> {
        self.str_of(name, position)?.ok_or_else(|| ArgError::Missing {
            name: name.to_string(),
        })
    }

    /// Required integer argument
    pub fn require_int(&self, name: &str, position: usize) -> Result<i64, ArgError> {
        self.int_of(name, position)?.ok_or_else(|| ArgError::Missing {
            name: name.to_string(),
        })
    }

    // Null counts as absent for typed getters.
    fn lookup(&self, name: &str, position: usize) -> Option<&Value> {
        match self.get(name, position) {
            Some(Value::Null) | None => None,
            Some(value) => Some(value),
        }
    }
}
