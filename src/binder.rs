use std::{borrow::Cow, sync::Arc};
use tracing::debug;

use crate::{
    binding::{Binding, Provision, Scope},
    class::Class,
    errors::{InjectErrorKind, ResolveErrorKind},
    injector::Resolver,
    key::{Annotation, BindingKey},
};

/// Function adding explicit bindings to an injector being built
pub type BindingFn = Box<dyn FnOnce(&mut Binder) -> Result<(), InjectErrorKind>>;

/// Collects explicit bindings. A later binding for the same key replaces an earlier one.
#[derive(Debug, Default)]
pub struct Binder {
    bindings: Vec<Binding>,
}

impl Binder {
    #[inline]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Starts a binding for arg `name`
    #[inline]
    pub fn bind(&mut self, name: impl Into<Cow<'static, str>>) -> BindingBuilder<'_> {
        BindingBuilder {
            binder: self,
            name: name.into(),
            annotation: None,
            scope: Scope::default(),
        }
    }

    #[inline]
    #[must_use]
    pub(crate) fn into_bindings(self) -> Vec<Binding> {
        self.bindings
    }
}

#[must_use = "nothing is bound until one of the `to_*` methods is called"]
pub struct BindingBuilder<'a> {
    binder: &'a mut Binder,
    name: Cow<'static, str>,
    annotation: Option<Annotation>,
    scope: Scope,
}

impl BindingBuilder<'_> {
    #[inline]
    pub fn annotated_with(mut self, annotation: impl Into<Annotation>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    #[inline]
    pub fn in_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    #[inline]
    pub fn to_instance<T: Send + Sync + 'static>(self, value: T) {
        self.to(Provision::instance(value));
    }

    #[inline]
    pub fn to_instance_arc<T: Send + Sync + 'static>(self, value: Arc<T>) {
        self.to(Provision::instance_arc(value));
    }

    #[inline]
    pub fn to_class(self, class: Class) {
        self.to(Provision::class(class));
    }

    #[inline]
    pub fn to_provider<F, T>(self, provider: F)
    where
        F: Fn(&Resolver) -> Result<T, ResolveErrorKind> + Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        self.to(Provision::provider(provider));
    }

    pub fn to(self, provision: Provision) {
        let key = match self.annotation {
            Some(annotation) => BindingKey::annotated(self.name, annotation),
            None => BindingKey::new(self.name),
        };
        debug!(key = %key, scope = ?self.scope, "Binding added");
        self.binder.bindings.push(Binding::explicit(key, provision, self.scope));
    }
}

#[cfg(test)]
mod tests {
    use super::Binder;
    use crate::{
        binding::{BindingSource, Scope},
        class::Class,
        key::BindingKey,
    };

    #[derive(Default)]
    struct ClassOne;

    #[test]
    fn test_bind() {
        let mut binder = Binder::new();
        binder.bind("foo").to_instance(1u8);
        binder.bind("foo").annotated_with("annot").in_scope(Scope::Prototype).to_provider(|_| Ok(2u8));
        binder.bind("bar").to_class(Class::with_default::<ClassOne>());

        let bindings = binder.into_bindings();

        assert_eq!(bindings.len(), 3);
        assert_eq!(bindings[0].key(), &BindingKey::new("foo"));
        assert_eq!(bindings[0].source(), BindingSource::ExplicitInstance);
        assert_eq!(bindings[1].key(), &BindingKey::annotated("foo", "annot"));
        assert_eq!(bindings[1].scope(), Scope::Prototype);
        assert_eq!(bindings[1].source(), BindingSource::ExplicitProviderFn);
        assert_eq!(bindings[2].source(), BindingSource::ExplicitClass);
        assert_eq!(bindings[2].scope(), Scope::Singleton);
    }
}
