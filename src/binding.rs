use core::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use crate::{
    any::{TypeInfo, Value},
    class::{Class, ClassRef, Injectable},
    errors::ResolveErrorKind,
    injector::{Injector, Resolver},
    key::BindingKey,
    service::{service_fn, Service as _, SharedService},
    stack::ResolutionStack,
};

/// Lifetime of a provided value
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Scope {
    /// Provided once per key per injector, then cached
    #[default]
    Singleton,
    /// Provided anew on every resolution
    Prototype,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingSource {
    ImplicitClass,
    ExplicitInstance,
    ExplicitClass,
    ExplicitProviderFn,
}

pub(crate) type BoxedProvider = SharedService<Resolver, Value, ResolveErrorKind>;

/// Function producing a value, able to resolve its own dependencies through [`Resolver`]
#[derive(Clone)]
pub struct ProviderFn(pub(crate) BoxedProvider);

impl Debug for ProviderFn {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("ProviderFn")
    }
}

/// What an explicit binding is bound to
#[derive(Clone)]
pub enum Provision {
    Instance(Value),
    Class(ClassRef),
    Provider(ProviderFn),
}

impl Provision {
    #[inline]
    #[must_use]
    pub fn instance<T: Send + Sync + 'static>(value: T) -> Self {
        Self::Instance(Arc::new(value))
    }

    #[inline]
    #[must_use]
    pub fn instance_arc<T: Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self::Instance(value)
    }

    #[inline]
    #[must_use]
    pub fn class(class: Class) -> Self {
        Self::Class(ClassRef::ready(class))
    }

    /// Class of `T`, built from its [`Injectable`] impl when first resolved
    #[inline]
    #[must_use]
    pub fn class_of<T: Injectable>() -> Self {
        Self::Class(ClassRef::deferred::<T>())
    }

    #[must_use]
    pub fn provider<F, T>(provider: F) -> Self
    where
        F: Fn(&Resolver) -> Result<T, ResolveErrorKind> + Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        Self::Provider(ProviderFn(SharedService::new(service_fn(move |resolver: Resolver| {
            provider(&resolver).map(|value| Arc::new(value) as Value)
        }))))
    }

    #[inline]
    #[must_use]
    pub const fn source(&self) -> BindingSource {
        match self {
            Provision::Instance(_) => BindingSource::ExplicitInstance,
            Provision::Class(_) => BindingSource::ExplicitClass,
            Provision::Provider(_) => BindingSource::ExplicitProviderFn,
        }
    }
}

impl Debug for Provision {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Provision::Instance(_) => f.write_str("Instance"),
            Provision::Class(class) => f.debug_tuple("Class").field(class).finish(),
            Provision::Provider(provider) => provider.fmt(f),
        }
    }
}

/// Associates a [`BindingKey`] with the way to produce its value
#[derive(Clone)]
pub struct Binding {
    key: BindingKey,
    provision: Provision,
    scope: Scope,
    source: BindingSource,
}

impl Binding {
    #[inline]
    #[must_use]
    pub(crate) fn implicit(key: BindingKey, class: Class, scope: Scope) -> Self {
        Self {
            key,
            provision: Provision::class(class),
            scope,
            source: BindingSource::ImplicitClass,
        }
    }

    #[inline]
    #[must_use]
    pub(crate) fn explicit(key: BindingKey, provision: Provision, scope: Scope) -> Self {
        Self {
            source: provision.source(),
            key,
            provision,
            scope,
        }
    }

    #[inline]
    #[must_use]
    pub const fn key(&self) -> &BindingKey {
        &self.key
    }

    #[inline]
    #[must_use]
    pub const fn scope(&self) -> Scope {
        self.scope
    }

    #[inline]
    #[must_use]
    pub const fn source(&self) -> BindingSource {
        self.source
    }

    #[inline]
    #[must_use]
    pub const fn provision(&self) -> &Provision {
        &self.provision
    }

    #[inline]
    #[must_use]
    pub fn class_type(&self) -> Option<TypeInfo> {
        match &self.provision {
            Provision::Class(class) => Some(class.type_info()),
            _ => None,
        }
    }

    /// Class of an implicit binding, always built up front
    pub(crate) fn implicit_class(&self) -> Option<&Class> {
        match &self.provision {
            Provision::Class(class) if self.source == BindingSource::ImplicitClass => class.get().ok(),
            _ => None,
        }
    }

    /// Produces the bound value.
    ///
    /// Instances are returned as is, classes are constructed through `injector`,
    /// provider functions get a [`Resolver`] continuing `stack`.
    ///
    /// # Errors
    /// Returns the error of building the class, of its construction or of the provider function
    pub fn provide(&self, injector: &Injector, stack: &ResolutionStack) -> Result<Value, ResolveErrorKind> {
        match &self.provision {
            Provision::Instance(value) => Ok(value.clone()),
            Provision::Class(class) => injector.construct(class.get()?, stack),
            Provision::Provider(ProviderFn(provider)) => provider.call(Resolver::new(injector.clone(), stack.clone())),
        }
    }
}

impl Debug for Binding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("key", &self.key)
            .field("provision", &self.provision)
            .field("scope", &self.scope)
            .field("source", &self.source)
            .finish()
    }
}
