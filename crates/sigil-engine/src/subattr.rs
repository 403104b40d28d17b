//! Sub-attribute bindings
//!
//! A parent attribute declares which child attribute types it absorbs and how
//! each group folds in. The binding shape fixes multiplicity: `one` accepts
//! zero or one matching declaration and treats more as ambiguous, `many`
//! accepts the whole group in declaration order. The `_dyn` variants keep
//! instances boxed for groups whose members are registered subtypes with
//! distinct Rust types.

use crate::attribute::Attribute;
use crate::error::Error;
use crate::resolver::SubResolver;
use std::any::Any;

/// A built attribute instance in transit between resolution stages.
pub type AttrBox = Box<dyn Any>;

/// Multiplicity of one binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Arity {
    One,
    Many,
}

struct Binding<T> {
    name: &'static str,
    arity: Arity,
    apply: Box<dyn Fn(&mut T, Vec<AttrBox>) -> Result<(), Error>>,
}

/// Declared child bindings for an attribute type.
pub struct SubAttributes<T> {
    bindings: Vec<Binding<T>>,
}

impl<T: 'static> SubAttributes<T> {
    /// No bindings.
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Number of declared bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check whether no bindings are declared.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bind at most one `C`, folded with `combine`.
    pub fn one<C: Attribute>(mut self, combine: impl Fn(&mut T, Option<C>) + 'static) -> Self {
        self.bindings.push(Binding {
            name: C::NAME,
            arity: Arity::One,
            apply: Box::new(move |parent, mut built| {
                let child = match built.pop() {
                    Some(instance) => Some(downcast_owned::<C>(instance)?),
                    None => None,
                };
                combine(parent, child);
                Ok(())
            }),
        });
        self
    }

    /// Bind the ordered group of `C`, folded with `combine`.
    pub fn many<C: Attribute>(mut self, combine: impl Fn(&mut T, Vec<C>) + 'static) -> Self {
        self.bindings.push(Binding {
            name: C::NAME,
            arity: Arity::Many,
            apply: Box::new(move |parent, built| {
                let mut children = Vec::with_capacity(built.len());
                for instance in built {
                    children.push(downcast_owned::<C>(instance)?);
                }
                combine(parent, children);
                Ok(())
            }),
        });
        self
    }

    /// Bind at most one instance assignable to `name`, left boxed.
    pub fn one_dyn(
        mut self,
        name: &'static str,
        combine: impl Fn(&mut T, Option<AttrBox>) + 'static,
    ) -> Self {
        self.bindings.push(Binding {
            name,
            arity: Arity::One,
            apply: Box::new(move |parent, mut built| {
                combine(parent, built.pop());
                Ok(())
            }),
        });
        self
    }

    /// Bind every instance assignable to `name`, left boxed.
    pub fn many_dyn(
        mut self,
        name: &'static str,
        combine: impl Fn(&mut T, Vec<AttrBox>) + 'static,
    ) -> Self {
        self.bindings.push(Binding {
            name,
            arity: Arity::Many,
            apply: Box::new(move |parent, built| {
                combine(parent, built);
                Ok(())
            }),
        });
        self
    }

    pub(crate) fn apply_all(
        self,
        parent: &mut T,
        resolver: &mut dyn SubResolver,
    ) -> Result<(), Error> {
        for binding in self.bindings {
            let built = resolver.resolve(binding.name, binding.arity)?;
            (binding.apply)(parent, built)?;
        }
        Ok(())
    }
}

impl<T: 'static> Default for SubAttributes<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn downcast_owned<T: Attribute>(instance: AttrBox) -> Result<T, Error> {
    instance
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| Error::Downcast {
            attribute: T::NAME.to_string(),
        })
}

pub(crate) fn downcast_mut<T: Attribute>(instance: &mut dyn Any) -> Result<&mut T, Error> {
    instance.downcast_mut::<T>().ok_or_else(|| Error::Downcast {
        attribute: T::NAME.to_string(),
    })
}

pub(crate) fn downcast_ref<T: Attribute>(instance: &dyn Any) -> Result<&T, Error> {
    instance.downcast_ref::<T>().ok_or_else(|| Error::Downcast {
        attribute: T::NAME.to_string(),
    })
}
