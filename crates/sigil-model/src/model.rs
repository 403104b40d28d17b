//! The class model queried during analysis
//!
//! `Model` is the engine's only source of declarations. It is built once
//! through [`ModelBuilder`] and then read, so a model can be shared freely
//! between analyzers and threads.

use crate::decl::ClassDecl;
use rustc_hash::FxHashMap;

/// Immutable collection of class declarations keyed by class name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    classes: FxHashMap<String, ClassDecl>,
}

impl Model {
    /// Empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a model builder
    pub fn builder() -> ModelBuilder {
        ModelBuilder {
            classes: FxHashMap::default(),
        }
    }

    /// Load declarations from a JSON array of classes
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let classes: Vec<ClassDecl> = serde_json::from_str(json)?;
        Ok(Model::builder().classes(classes).build())
    }

    /// Declaration for `name`, if present
    pub fn get(&self, name: &str) -> Option<&ClassDecl> {
        self.classes.get(name)
    }

    /// Check if a class is declared
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Declaration of the parent of `name`, if both are present
    pub fn parent_of(&self, name: &str) -> Option<&ClassDecl> {
        self.get(name)
            .and_then(|class| class.parent.as_deref())
            .and_then(|parent| self.get(parent))
    }

    /// Iterate a class and its ancestors, subject first
    ///
    /// Iteration stops at the first name that is not declared in the model.
    /// Callers walking hierarchies that may be cyclic track visited names
    /// themselves.
    pub fn ancestry<'a>(&'a self, name: &'a str) -> Ancestry<'a> {
        Ancestry {
            model: self,
            next: Some(name),
        }
    }

    /// Number of declared classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if the model is empty
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Iterator over a class and its ancestors
pub struct Ancestry<'a> {
    model: &'a Model,
    next: Option<&'a str>,
}

impl<'a> Iterator for Ancestry<'a> {
    type Item = &'a ClassDecl;

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.next.take()?;
        let class = self.model.get(name)?;
        self.next = class.parent.as_deref();
        Some(class)
    }
}

/// Builder for `Model`
pub struct ModelBuilder {
    classes: FxHashMap<String, ClassDecl>,
}

impl ModelBuilder {
    /// Add a class declaration, replacing any previous one with the same name
    pub fn class(mut self, class: ClassDecl) -> Self {
        self.classes.insert(class.name.clone(), class);
        self
    }

    /// Add several class declarations
    pub fn classes(mut self, classes: impl IntoIterator<Item = ClassDecl>) -> Self {
        for class in classes {
            self = self.class(class);
        }
        self
    }

    /// Build the model
    pub fn build(self) -> Model {
        Model {
            classes: self.classes,
        }
    }
}
