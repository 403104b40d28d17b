//! Attribute type registry
//!
//! Every attribute type an analysis may encounter is registered up front.
//! Registration monomorphizes the type's constructor and its opted-in
//! capabilities into boxed hooks, so the resolution pipeline works purely on
//! type-erased entries and never needs the concrete type again.

use crate::attribute::{
    Attribute, CustomName, Excludable, FromClassInfo, FromMethodInfo, FromParameterInfo,
    FromPropertyInfo, HasSubAttributes, Inherit, ParseMethods, ParseParameters, ParseProperties,
};
use crate::error::Error;
use crate::resolver::{MemberKind, MemberSource, SubResolver};
use crate::subattr::{downcast_mut, downcast_owned, downcast_ref, AttrBox};
use rustc_hash::FxHashMap;
use sigil_model::{ArgError, Args, ClassInfo, Members, MethodInfo, ParameterInfo, PropertyInfo};
use std::any::Any;
use std::collections::hash_map::Entry as Slot;
use std::marker::PhantomData;

pub(crate) type FactoryFn = Box<dyn Fn(&Args) -> Result<AttrBox, ArgError> + Send + Sync>;
pub(crate) type ClassHookFn =
    Box<dyn Fn(&mut dyn Any, &ClassInfo<'_>) -> Result<(), Error> + Send + Sync>;
pub(crate) type PropertyHookFn =
    Box<dyn Fn(&mut dyn Any, &PropertyInfo<'_>) -> Result<(), Error> + Send + Sync>;
pub(crate) type MethodHookFn =
    Box<dyn Fn(&mut dyn Any, &MethodInfo<'_>) -> Result<(), Error> + Send + Sync>;
pub(crate) type ParameterHookFn =
    Box<dyn Fn(&mut dyn Any, &ParameterInfo<'_>) -> Result<(), Error> + Send + Sync>;
pub(crate) type SubHookFn =
    Box<dyn Fn(&mut dyn Any, &mut dyn SubResolver) -> Result<(), Error> + Send + Sync>;
pub(crate) type MembersHookFn =
    Box<dyn Fn(&mut dyn Any, &mut dyn MemberSource) -> Result<(), Error> + Send + Sync>;
pub(crate) type ExcludeFn = Box<dyn Fn(&dyn Any) -> Result<bool, Error> + Send + Sync>;
pub(crate) type RenameFn = Box<dyn Fn(&dyn Any) -> Result<Option<String>, Error> + Send + Sync>;
pub(crate) type InheritFn = Box<dyn Fn(&mut dyn Any, AttrBox) -> Result<(), Error> + Send + Sync>;

/// One registered attribute type, capabilities erased into hooks.
pub(crate) struct Entry {
    pub(crate) name: &'static str,
    pub(crate) extends: Option<&'static str>,
    pub(crate) repeatable: bool,
    pub(crate) transitive: bool,
    pub(crate) factory: FactoryFn,
    pub(crate) on_class: Option<ClassHookFn>,
    pub(crate) on_property: Option<PropertyHookFn>,
    pub(crate) on_method: Option<MethodHookFn>,
    pub(crate) on_parameter: Option<ParameterHookFn>,
    pub(crate) subs: Option<SubHookFn>,
    pub(crate) properties: Option<MembersHookFn>,
    pub(crate) methods: Option<MembersHookFn>,
    pub(crate) parameters: Option<MembersHookFn>,
    pub(crate) excluded: Option<ExcludeFn>,
    pub(crate) rename: Option<RenameFn>,
    pub(crate) inherit: Option<InheritFn>,
}

impl Entry {
    fn new<T: Attribute>() -> Self {
        Entry {
            name: T::NAME,
            extends: None,
            repeatable: false,
            transitive: false,
            factory: Box::new(|args| {
                T::from_args(args).map(|attribute| Box::new(attribute) as AttrBox)
            }),
            on_class: None,
            on_property: None,
            on_method: None,
            on_parameter: None,
            subs: None,
            properties: None,
            methods: None,
            parameters: None,
            excluded: None,
            rename: None,
            inherit: None,
        }
    }
}

/// Holds the attribute types an [`Analyzer`](crate::Analyzer) can resolve.
#[derive(Default)]
pub struct Registry {
    entries: FxHashMap<&'static str, Entry>,
}

impl Registry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under [`Attribute::NAME`], replacing any earlier entry.
    ///
    /// The returned builder wires optional capabilities onto the entry.
    pub fn register<T: Attribute>(&mut self) -> TypeBuilder<'_, T> {
        let entry = match self.entries.entry(T::NAME) {
            Slot::Occupied(mut slot) => {
                slot.insert(Entry::new::<T>());
                slot.into_mut()
            }
            Slot::Vacant(slot) => slot.insert(Entry::new::<T>()),
        };
        TypeBuilder {
            entry,
            _marker: PhantomData,
        }
    }

    /// Check whether a type is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check that every `extends` edge names a registered type and that no
    /// chain loops back on itself.
    pub fn validate(&self) -> Result<(), Error> {
        for entry in self.entries.values() {
            let mut seen: Vec<&str> = vec![entry.name];
            let mut current = entry.extends;
            while let Some(base) = current {
                if seen.contains(&base) {
                    return Err(Error::cycle(&seen, base));
                }
                seen.push(base);
                let Some(next) = self.entries.get(base) else {
                    return Err(Error::UnknownAttribute {
                        attribute: base.to_string(),
                    });
                };
                current = next.extends;
            }
        }
        Ok(())
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    /// `name` is `target` or reaches it along `extends` edges.
    pub(crate) fn assignable(&self, name: &str, target: &str) -> bool {
        if name == target {
            return self.entries.contains_key(name);
        }
        // hop bound keeps unvalidated cyclic chains from spinning
        let mut hops = 0;
        let mut current = self.entries.get(name).and_then(|entry| entry.extends);
        while let Some(base) = current {
            if base == target {
                return true;
            }
            hops += 1;
            if hops > self.entries.len() {
                return false;
            }
            current = self.entries.get(base).and_then(|entry| entry.extends);
        }
        false
    }
}

/// Wires capabilities onto a freshly registered entry.
///
/// Each method takes the builder by value, so registration reads as one
/// chain. Capabilities not wired here stay inert even if `T` implements the
/// matching trait.
pub struct TypeBuilder<'a, T> {
    entry: &'a mut Entry,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T: Attribute> TypeBuilder<'a, T> {
    /// Allow repeated declarations of `T` on one target; the first wins.
    pub fn repeatable(self) -> Self {
        self.entry.repeatable = true;
        self
    }

    /// Let property resolution fall back to the attribute declared on the
    /// property's type, or the nearest ancestor of that type that has one.
    pub fn transitive(self) -> Self {
        self.entry.transitive = true;
        self
    }

    /// Declare `base` as a supertype of `T` for assignability checks.
    pub fn extends(self, base: &'static str) -> Self {
        self.entry.extends = Some(base);
        self
    }

    /// Inject class facts through [`FromClassInfo`].
    pub fn with_class_info(self) -> Self
    where
        T: FromClassInfo,
    {
        self.entry.on_class = Some(Box::new(|target, class| {
            downcast_mut::<T>(target)?.from_class(class);
            Ok(())
        }));
        self
    }

    /// Inject property facts through [`FromPropertyInfo`].
    pub fn with_property_info(self) -> Self
    where
        T: FromPropertyInfo,
    {
        self.entry.on_property = Some(Box::new(|target, property| {
            downcast_mut::<T>(target)?.from_property(property);
            Ok(())
        }));
        self
    }

    /// Inject method facts through [`FromMethodInfo`].
    pub fn with_method_info(self) -> Self
    where
        T: FromMethodInfo,
    {
        self.entry.on_method = Some(Box::new(|target, method| {
            downcast_mut::<T>(target)?.from_method(method);
            Ok(())
        }));
        self
    }

    /// Inject parameter facts through [`FromParameterInfo`].
    pub fn with_parameter_info(self) -> Self
    where
        T: FromParameterInfo,
    {
        self.entry.on_parameter = Some(Box::new(|target, parameter| {
            downcast_mut::<T>(target)?.from_parameter(parameter);
            Ok(())
        }));
        self
    }

    /// Resolve and fold child attributes through [`HasSubAttributes`].
    pub fn with_sub_attributes(self) -> Self
    where
        T: HasSubAttributes,
    {
        self.entry.subs = Some(Box::new(|target, resolver| {
            let parent = downcast_mut::<T>(target)?;
            T::sub_attributes().apply_all(parent, resolver)
        }));
        self
    }

    /// Collect one descriptor per property through [`ParseProperties`].
    pub fn with_properties(self) -> Self
    where
        T: ParseProperties,
    {
        self.entry.properties = Some(Box::new(|target, source| {
            let parent = downcast_mut::<T>(target)?;
            let include = <T as ParseProperties>::include_by_default(parent);
            let raw = source.resolve_members(
                MemberKind::Property,
                <<T as ParseProperties>::PropertyAttribute as Attribute>::NAME,
                include,
            )?;
            let mut members = Members::new();
            for (name, instance) in raw {
                members.insert(
                    name,
                    downcast_owned::<<T as ParseProperties>::PropertyAttribute>(instance)?,
                );
            }
            parent.set_properties(members);
            Ok(())
        }));
        self
    }

    /// Collect one descriptor per method through [`ParseMethods`].
    pub fn with_methods(self) -> Self
    where
        T: ParseMethods,
    {
        self.entry.methods = Some(Box::new(|target, source| {
            let parent = downcast_mut::<T>(target)?;
            let include = <T as ParseMethods>::include_by_default(parent);
            let raw = source.resolve_members(
                MemberKind::Method,
                <<T as ParseMethods>::MethodAttribute as Attribute>::NAME,
                include,
            )?;
            let mut members = Members::new();
            for (name, instance) in raw {
                members.insert(
                    name,
                    downcast_owned::<<T as ParseMethods>::MethodAttribute>(instance)?,
                );
            }
            parent.set_methods(members);
            Ok(())
        }));
        self
    }

    /// Collect one descriptor per parameter through [`ParseParameters`].
    pub fn with_parameters(self) -> Self
    where
        T: ParseParameters,
    {
        self.entry.parameters = Some(Box::new(|target, source| {
            let parent = downcast_mut::<T>(target)?;
            let include = <T as ParseParameters>::include_by_default(parent);
            let raw = source.resolve_members(
                MemberKind::Parameter,
                <<T as ParseParameters>::ParameterAttribute as Attribute>::NAME,
                include,
            )?;
            let mut members = Members::new();
            for (name, instance) in raw {
                members.insert(
                    name,
                    downcast_owned::<<T as ParseParameters>::ParameterAttribute>(instance)?,
                );
            }
            parent.set_parameters(members);
            Ok(())
        }));
        self
    }

    /// Let instances drop themselves from member maps through [`Excludable`].
    pub fn excludable(self) -> Self
    where
        T: Excludable,
    {
        self.entry.excluded = Some(Box::new(|instance| {
            Ok(downcast_ref::<T>(instance)?.exclude())
        }));
        self
    }

    /// Let instances override their member-map key through [`CustomName`].
    pub fn with_custom_name(self) -> Self
    where
        T: CustomName,
    {
        self.entry.rename = Some(Box::new(|instance| {
            Ok(downcast_ref::<T>(instance)?
                .custom_name()
                .map(str::to_string))
        }));
        self
    }

    /// Fold ancestor descriptors into subclass ones through [`Inherit`].
    pub fn inheritable(self) -> Self
    where
        T: Inherit,
    {
        self.entry.inherit = Some(Box::new(|target, ancestor| {
            let child = downcast_mut::<T>(target)?;
            child.inherit_from(downcast_owned::<T>(ancestor)?);
            Ok(())
        }));
        self
    }
}
