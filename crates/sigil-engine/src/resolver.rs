//! Resolution pipeline
//!
//! One `Resolver` drives a single analysis: it matches declared attributes
//! against registry entries, runs factories, injects reflection facts, folds
//! sub-attributes, and assembles member descriptor maps. Instances stay boxed
//! until the analyzer hands the root descriptor back to the caller.

use crate::error::Error;
use crate::registry::{Entry, Registry};
use crate::subattr::{Arity, AttrBox};
use sigil_model::{
    Args, AttrDecl, ClassDecl, ClassInfo, MethodDecl, MethodInfo, Model, ParamDecl, ParameterInfo,
    PropertyDecl, PropertyInfo,
};
use tracing::trace;

/// How declared type names are matched against a requested type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MatchMode {
    /// Name equality only.
    Exact,
    /// Equal, or reaches the requested name along registered `extends` edges.
    Assignable,
}

/// Which member list a descriptor map is assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MemberKind {
    Property,
    Method,
    Parameter,
}

/// Reflection facts available to one build.
///
/// Exactly the facts for the declaration site are set; the transitive
/// property fallback is the one case that sets two.
#[derive(Clone, Copy, Default)]
pub(crate) struct Facts<'m> {
    pub(crate) class: Option<ClassInfo<'m>>,
    pub(crate) property: Option<PropertyInfo<'m>>,
    pub(crate) method: Option<MethodInfo<'m>>,
    pub(crate) parameter: Option<ParameterInfo<'m>>,
}

impl<'m> Facts<'m> {
    pub(crate) fn class(class: &'m ClassDecl) -> Self {
        Facts {
            class: Some(ClassInfo::of(class)),
            ..Facts::default()
        }
    }

    pub(crate) fn property(class: &'m ClassDecl, property: &'m PropertyDecl) -> Self {
        Facts {
            property: Some(PropertyInfo::of(class, property)),
            ..Facts::default()
        }
    }

    pub(crate) fn method(class: &'m ClassDecl, method: &'m MethodDecl) -> Self {
        Facts {
            method: Some(MethodInfo::of(class, method)),
            ..Facts::default()
        }
    }

    pub(crate) fn parameter(
        class: &'m ClassDecl,
        method: &'m MethodDecl,
        position: usize,
        param: &'m ParamDecl,
    ) -> Self {
        Facts {
            parameter: Some(ParameterInfo::of(class, method, position, param)),
            ..Facts::default()
        }
    }

    /// Human-readable name of the declaration site, for error messages.
    fn label(&self) -> String {
        if let Some(parameter) = &self.parameter {
            return format!(
                "{}::{}::{}",
                parameter.class, parameter.method, parameter.name
            );
        }
        if let Some(property) = &self.property {
            return format!("{}::{}", property.class, property.name);
        }
        if let Some(method) = &self.method {
            return format!("{}::{}", method.class, method.name);
        }
        match &self.class {
            Some(class) => class.name.to_string(),
            None => String::from("<unknown>"),
        }
    }
}

/// Declaration context a build runs in; gates the member-parsing hooks.
#[derive(Clone, Copy)]
pub(crate) enum Owner<'m> {
    /// Class-level attribute; may parse properties and methods.
    Class(&'m ClassDecl),
    /// Method-level attribute; may parse parameters.
    Method(&'m ClassDecl, &'m MethodDecl),
    /// Property, parameter, or sub-attribute; parses no members.
    Other,
}

/// Callback surface the sub-attribute hook pulls child groups through.
pub(crate) trait SubResolver {
    /// Build the declared instances assignable to `name` on the current target.
    fn resolve(&mut self, name: &'static str, arity: Arity) -> Result<Vec<AttrBox>, Error>;
}

/// Callback surface the member-parsing hooks pull descriptor maps through.
pub(crate) trait MemberSource {
    /// Resolve the `kind` member list into (effective name, instance) pairs.
    fn resolve_members(
        &mut self,
        kind: MemberKind,
        attr: &'static str,
        include_by_default: bool,
    ) -> Result<Vec<(String, AttrBox)>, Error>;
}

pub(crate) struct Resolver<'r> {
    pub(crate) registry: &'r Registry,
    pub(crate) model: &'r Model,
}

impl<'r> Resolver<'r> {
    pub(crate) fn entry_for(&self, name: &str) -> Result<&'r Entry, Error> {
        self.registry
            .get(name)
            .ok_or_else(|| Error::UnknownAttribute {
                attribute: name.to_string(),
            })
    }

    fn matches(&self, declared: &str, attr: &str, mode: MatchMode) -> bool {
        match mode {
            MatchMode::Exact => declared == attr,
            MatchMode::Assignable => self.registry.assignable(declared, attr),
        }
    }

    /// The single declaration of `attr` in `entries`, if any.
    ///
    /// More than one match is ambiguous unless the type is repeatable, in
    /// which case the first declaration stands for the group.
    pub(crate) fn find_unique<'d>(
        &self,
        entries: &'d [AttrDecl],
        attr: &str,
        mode: MatchMode,
        repeatable: bool,
        target: &str,
    ) -> Result<Option<&'d AttrDecl>, Error> {
        let found: Vec<&AttrDecl> = entries
            .iter()
            .filter(|decl| self.matches(&decl.ty, attr, mode))
            .collect();
        if found.len() > 1 && !repeatable {
            return Err(Error::Ambiguous {
                target: target.to_string(),
                attribute: attr.to_string(),
                count: found.len(),
            });
        }
        Ok(found.first().copied())
    }

    /// Run the full build pipeline for one declaration.
    pub(crate) fn build(
        &self,
        entry: &Entry,
        args: &Args,
        target_entries: &[AttrDecl],
        facts: Facts<'_>,
        owner: Owner<'_>,
        chain: &[String],
    ) -> Result<AttrBox, Error> {
        let mut instance = (entry.factory)(args).map_err(|source| Error::Construction {
            attribute: entry.name.to_string(),
            source,
        })?;

        // facts land before sub-attributes so combiners can read them
        if let (Some(hook), Some(class)) = (&entry.on_class, facts.class) {
            hook(&mut *instance, &class)?;
        }
        if let (Some(hook), Some(property)) = (&entry.on_property, facts.property) {
            hook(&mut *instance, &property)?;
        }
        if let (Some(hook), Some(method)) = (&entry.on_method, facts.method) {
            hook(&mut *instance, &method)?;
        }
        if let (Some(hook), Some(parameter)) = (&entry.on_parameter, facts.parameter) {
            hook(&mut *instance, &parameter)?;
        }

        if let Some(hook) = &entry.subs {
            let mut sub_chain = chain.to_vec();
            sub_chain.push(entry.name.to_string());
            let mut scope = SubScope {
                resolver: self,
                target_entries,
                facts,
                chain: sub_chain,
            };
            hook(&mut *instance, &mut scope)?;
        }

        if let Some(hook) = &entry.properties {
            if let Owner::Class(class) = owner {
                let mut source = MemberScope {
                    resolver: self,
                    class,
                    method: None,
                };
                hook(&mut *instance, &mut source)?;
            }
        }
        if let Some(hook) = &entry.methods {
            if let Owner::Class(class) = owner {
                let mut source = MemberScope {
                    resolver: self,
                    class,
                    method: None,
                };
                hook(&mut *instance, &mut source)?;
            }
        }
        if let Some(hook) = &entry.parameters {
            if let Owner::Method(class, method) = owner {
                let mut source = MemberScope {
                    resolver: self,
                    class,
                    method: Some(method),
                };
                hook(&mut *instance, &mut source)?;
            }
        }

        Ok(instance)
    }

    /// One descriptor per property of `class`, keyed by effective name.
    pub(crate) fn resolve_properties(
        &self,
        class: &ClassDecl,
        attr: &str,
        include_by_default: bool,
    ) -> Result<Vec<(String, AttrBox)>, Error> {
        let base = self.entry_for(attr)?;
        let empty = Args::new();
        let mut out = Vec::new();
        for property in &class.properties {
            let target = format!("{}::{}", class.name, property.name);
            let matched = self.find_unique(
                &property.attrs,
                attr,
                MatchMode::Assignable,
                base.repeatable,
                &target,
            )?;
            let built = match matched {
                Some(decl) => {
                    let entry = self.entry_for(&decl.ty)?;
                    let facts = Facts::property(class, property);
                    let instance =
                        self.build(entry, &decl.args, &property.attrs, facts, Owner::Other, &[])?;
                    Some((entry, instance))
                }
                None => match self.transitive_property(class, property, attr, base)? {
                    Some(pair) => Some(pair),
                    None if include_by_default => {
                        let facts = Facts::property(class, property);
                        let instance =
                            self.build(base, &empty, &property.attrs, facts, Owner::Other, &[])?;
                        Some((base, instance))
                    }
                    None => None,
                },
            };
            let Some((entry, instance)) = built else {
                continue;
            };
            if self.is_excluded(entry, &instance)? {
                continue;
            }
            let key = self.effective_name(entry, &instance, &property.name)?;
            out.push((key, instance));
        }
        trace!(
            class = %class.name,
            attribute = attr,
            count = out.len(),
            "resolved property descriptors"
        );
        Ok(out)
    }

    /// The attribute declared on the property's type or its nearest ancestor.
    ///
    /// Only consulted for transitive entries. Facts carry the class the
    /// attribute was found on plus the property it now describes; sub-attributes
    /// resolve from the type class's own entries even when the attribute itself
    /// comes from an ancestor.
    fn transitive_property(
        &self,
        class: &ClassDecl,
        property: &PropertyDecl,
        attr: &str,
        base: &Entry,
    ) -> Result<Option<(&'r Entry, AttrBox)>, Error> {
        if !base.transitive {
            return Ok(None);
        }
        let Some(type_name) = property.ty.as_deref() else {
            return Ok(None);
        };
        let Some(origin) = self.model.get(type_name) else {
            return Ok(None);
        };
        let mut seen: Vec<&str> = Vec::new();
        for source in self.model.ancestry(type_name) {
            if seen.contains(&source.name.as_str()) {
                return Err(Error::cycle(&seen, &source.name));
            }
            seen.push(&source.name);
            let target = format!("{}::{}", class.name, property.name);
            let Some(decl) = self.find_unique(
                &source.attrs,
                attr,
                MatchMode::Assignable,
                base.repeatable,
                &target,
            )?
            else {
                continue;
            };
            let entry = self.entry_for(&decl.ty)?;
            let facts = Facts {
                class: Some(ClassInfo::of(source)),
                property: Some(PropertyInfo::of(class, property)),
                ..Facts::default()
            };
            let instance = self.build(entry, &decl.args, &origin.attrs, facts, Owner::Other, &[])?;
            return Ok(Some((entry, instance)));
        }
        Ok(None)
    }

    /// One descriptor per method of `class`, keyed by effective name.
    pub(crate) fn resolve_methods(
        &self,
        class: &ClassDecl,
        attr: &str,
        include_by_default: bool,
    ) -> Result<Vec<(String, AttrBox)>, Error> {
        let base = self.entry_for(attr)?;
        let empty = Args::new();
        let mut out = Vec::new();
        for method in &class.methods {
            let target = format!("{}::{}", class.name, method.name);
            let matched = self.find_unique(
                &method.attrs,
                attr,
                MatchMode::Assignable,
                base.repeatable,
                &target,
            )?;
            let picked = match matched {
                Some(decl) => Some((self.entry_for(&decl.ty)?, &decl.args)),
                None if include_by_default => Some((base, &empty)),
                None => None,
            };
            let Some((entry, args)) = picked else {
                continue;
            };
            let facts = Facts::method(class, method);
            let instance = self.build(
                entry,
                args,
                &method.attrs,
                facts,
                Owner::Method(class, method),
                &[],
            )?;
            if self.is_excluded(entry, &instance)? {
                continue;
            }
            let key = self.effective_name(entry, &instance, &method.name)?;
            out.push((key, instance));
        }
        trace!(
            class = %class.name,
            attribute = attr,
            count = out.len(),
            "resolved method descriptors"
        );
        Ok(out)
    }

    /// One descriptor per parameter of `method`, in positional order.
    pub(crate) fn resolve_parameters(
        &self,
        class: &ClassDecl,
        method: &MethodDecl,
        attr: &str,
        include_by_default: bool,
    ) -> Result<Vec<(String, AttrBox)>, Error> {
        let base = self.entry_for(attr)?;
        let empty = Args::new();
        let mut out = Vec::new();
        for (position, param) in method.params.iter().enumerate() {
            let target = format!("{}::{}::{}", class.name, method.name, param.name);
            let matched = self.find_unique(
                &param.attrs,
                attr,
                MatchMode::Assignable,
                base.repeatable,
                &target,
            )?;
            let picked = match matched {
                Some(decl) => Some((self.entry_for(&decl.ty)?, &decl.args)),
                None if include_by_default => Some((base, &empty)),
                None => None,
            };
            let Some((entry, args)) = picked else {
                continue;
            };
            let facts = Facts::parameter(class, method, position, param);
            let instance = self.build(entry, args, &param.attrs, facts, Owner::Other, &[])?;
            if self.is_excluded(entry, &instance)? {
                continue;
            }
            let key = self.effective_name(entry, &instance, &param.name)?;
            out.push((key, instance));
        }
        Ok(out)
    }

    fn is_excluded(&self, entry: &Entry, instance: &AttrBox) -> Result<bool, Error> {
        match &entry.excluded {
            Some(hook) => hook(&**instance),
            None => Ok(false),
        }
    }

    fn effective_name(
        &self,
        entry: &Entry,
        instance: &AttrBox,
        declared: &str,
    ) -> Result<String, Error> {
        if let Some(hook) = &entry.rename {
            if let Some(renamed) = hook(&**instance)? {
                return Ok(renamed);
            }
        }
        Ok(declared.to_string())
    }
}

/// Sub-attribute resolution for one parent build.
struct SubScope<'a> {
    resolver: &'a Resolver<'a>,
    target_entries: &'a [AttrDecl],
    facts: Facts<'a>,
    chain: Vec<String>,
}

impl SubResolver for SubScope<'_> {
    fn resolve(&mut self, name: &'static str, arity: Arity) -> Result<Vec<AttrBox>, Error> {
        if self.chain.iter().any(|link| link == name) {
            return Err(Error::cycle(&self.chain, name));
        }
        if !self.resolver.registry.contains(name) {
            return Err(Error::UnknownAttribute {
                attribute: name.to_string(),
            });
        }
        let found: Vec<&AttrDecl> = self
            .target_entries
            .iter()
            .filter(|decl| self.resolver.registry.assignable(&decl.ty, name))
            .collect();
        if arity == Arity::One && found.len() > 1 {
            return Err(Error::Ambiguous {
                target: self.facts.label(),
                attribute: name.to_string(),
                count: found.len(),
            });
        }
        let mut built = Vec::with_capacity(found.len());
        for decl in found {
            let entry = self.resolver.entry_for(&decl.ty)?;
            built.push(self.resolver.build(
                entry,
                &decl.args,
                self.target_entries,
                self.facts,
                Owner::Other,
                &self.chain,
            )?);
        }
        trace!(
            attribute = name,
            count = built.len(),
            "resolved sub-attribute group"
        );
        Ok(built)
    }
}

/// Member resolution for one parent build.
struct MemberScope<'a> {
    resolver: &'a Resolver<'a>,
    class: &'a ClassDecl,
    method: Option<&'a MethodDecl>,
}

impl MemberSource for MemberScope<'_> {
    fn resolve_members(
        &mut self,
        kind: MemberKind,
        attr: &'static str,
        include_by_default: bool,
    ) -> Result<Vec<(String, AttrBox)>, Error> {
        match kind {
            MemberKind::Property => {
                self.resolver
                    .resolve_properties(self.class, attr, include_by_default)
            }
            MemberKind::Method => {
                self.resolver
                    .resolve_methods(self.class, attr, include_by_default)
            }
            MemberKind::Parameter => match self.method {
                Some(method) => {
                    self.resolver
                        .resolve_parameters(self.class, method, attr, include_by_default)
                }
                None => Ok(Vec::new()),
            },
        }
    }
}
