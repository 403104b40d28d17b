//! Class analysis entry points

use crate::attribute::Attribute;
use crate::error::Error;
use crate::registry::Registry;
use crate::resolver::{Facts, MatchMode, Owner, Resolver};
use crate::subattr::AttrBox;
use sigil_model::Model;
use tracing::debug;

/// A value that knows which declared class describes it.
pub trait Subject {
    /// Name of the class declaration to analyze.
    fn class_name(&self) -> &str;
}

/// Resolves attribute descriptors for classes in a model.
///
/// Borrows the registry and model it was built over; analyses are read-only
/// and independent, so one analyzer can serve many calls.
pub struct Analyzer<'a> {
    registry: &'a Registry,
    model: &'a Model,
}

impl<'a> Analyzer<'a> {
    /// Analyzer over `registry` and `model`.
    pub fn new(registry: &'a Registry, model: &'a Model) -> Self {
        Self { registry, model }
    }

    /// Resolve the `T` descriptor declared on `class_name`.
    pub fn analyze<T: Attribute>(&self, class_name: &str) -> Result<T, Error> {
        let instance = self.analyze_boxed(T::NAME, class_name, &mut Vec::new())?;
        instance
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| Error::Downcast {
                attribute: T::NAME.to_string(),
            })
    }

    /// Resolve the `T` descriptor for a subject's declared class.
    pub fn analyze_subject<T: Attribute>(&self, subject: &dyn Subject) -> Result<T, Error> {
        self.analyze::<T>(subject.class_name())
    }

    fn analyze_boxed(
        &self,
        attr: &str,
        class_name: &str,
        visiting: &mut Vec<String>,
    ) -> Result<AttrBox, Error> {
        if visiting.iter().any(|seen| seen == class_name) {
            return Err(Error::cycle(visiting, class_name));
        }
        debug!(class = class_name, attribute = attr, "analyzing class");

        let class = self
            .model
            .get(class_name)
            .ok_or_else(|| Error::ClassNotFound {
                class: class_name.to_string(),
            })?;
        let resolver = Resolver {
            registry: self.registry,
            model: self.model,
        };
        let entry = resolver.entry_for(attr)?;
        let matched = resolver.find_unique(
            &class.attrs,
            attr,
            MatchMode::Exact,
            entry.repeatable,
            class_name,
        )?;

        let Some(decl) = matched else {
            // the nearest ancestor's descriptor stands in whole when the
            // subject has none and inheritance is wired
            if entry.inherit.is_some() {
                if let Some(parent) = class.parent.as_deref() {
                    visiting.push(class_name.to_string());
                    let inherited = self.analyze_boxed(attr, parent, visiting);
                    visiting.pop();
                    return match inherited {
                        Err(Error::NotFound { .. }) => Err(Error::NotFound {
                            class: class_name.to_string(),
                            attribute: attr.to_string(),
                        }),
                        other => other,
                    };
                }
            }
            return Err(Error::NotFound {
                class: class_name.to_string(),
                attribute: attr.to_string(),
            });
        };

        let facts = Facts::class(class);
        let mut instance = resolver.build(
            entry,
            &decl.args,
            &class.attrs,
            facts,
            Owner::Class(class),
            &[],
        )?;

        if let Some(fold) = &entry.inherit {
            if let Some(parent) = class.parent.as_deref() {
                visiting.push(class_name.to_string());
                let ancestor = self.analyze_boxed(attr, parent, visiting);
                visiting.pop();
                match ancestor {
                    Ok(ancestor) => fold(&mut *instance, ancestor)?,
                    Err(Error::NotFound { .. }) => {}
                    Err(other) => return Err(other),
                }
            }
        }

        Ok(instance)
    }
}
