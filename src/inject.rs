use std::borrow::Cow;
use tracing::{debug, error};

use crate::{
    binding::{Binding, Provision, Scope},
    errors::InjectErrorKind,
    function::Function,
    key::{Annotation, BindingKey},
};

/// Bindings local to one decorated function, sorted by key
#[derive(Clone, Debug, Default)]
pub(crate) struct Decoration {
    bindings: Vec<Binding>,
}

impl Decoration {
    fn binding(&self, name: &str) -> Option<&Binding> {
        self.bindings.iter().find(|binding| binding.key().name() == name)
    }
}

impl Function {
    /// Binds arg `name` of this function to `provision`.
    ///
    /// The binding only applies when this function is the one being injected into
    /// and takes precedence over bindings known to the injector.
    /// Calling the function directly is unaffected.
    ///
    /// # Errors
    /// - Returns [`InjectErrorKind::NoSuchArg`] if the function has no such named arg
    /// - Returns [`InjectErrorKind::DuplicateArg`] if the arg is already injected
    pub fn inject(mut self, name: impl Into<Cow<'static, str>>, provision: Provision) -> Result<Self, InjectErrorKind> {
        let name = name.into();
        if !self.signature.contains(&name) {
            let err = InjectErrorKind::NoSuchArg {
                name,
                function: self.name.clone(),
            };
            error!("{}", err);
            return Err(err);
        }

        let decoration = self.decoration.get_or_insert_with(Decoration::default);
        if decoration.binding(&name).is_some() {
            let err = InjectErrorKind::DuplicateArg {
                name,
                function: self.name.clone(),
            };
            error!("{}", err);
            return Err(err);
        }

        debug!(function = %self.name, arg = %name, "Arg injected");
        decoration
            .bindings
            .push(Binding::explicit(BindingKey::new(name), provision, Scope::default()));
        decoration.bindings.sort_by(|left, right| left.key().cmp(right.key()));

        Ok(self)
    }

    /// Marks arg `name` as resolved through the key annotated with `annotation`
    ///
    /// # Errors
    /// - Returns [`InjectErrorKind::NoSuchArgToAnnotate`] if the function has no such named arg
    /// - Returns [`InjectErrorKind::DuplicateAnnotation`] if the arg is already annotated
    pub fn annotate_arg(
        mut self,
        name: impl Into<Cow<'static, str>>,
        annotation: impl Into<Annotation>,
    ) -> Result<Self, InjectErrorKind> {
        let name = name.into();
        let Some(param) = self.signature.param_by_name_mut(&name) else {
            let err = InjectErrorKind::NoSuchArgToAnnotate {
                name,
                function: self.name.clone(),
            };
            error!("{}", err);
            return Err(err);
        };
        if param.annotation().is_some() {
            let err = InjectErrorKind::DuplicateAnnotation {
                name,
                function: self.name.clone(),
            };
            error!("{}", err);
            return Err(err);
        }

        param.set_annotation(annotation.into());
        // Marks the function decorated even without explicit bindings
        self.decoration.get_or_insert_with(Decoration::default);

        Ok(self)
    }

    #[inline]
    #[must_use]
    pub const fn is_decorated(&self) -> bool {
        self.decoration.is_some()
    }

    /// Explicit bindings attached by [`Function::inject`], sorted by key
    #[must_use]
    pub fn explicit_bindings(&self) -> &[Binding] {
        self.decoration
            .as_ref()
            .map_or(&[], |decoration| decoration.bindings.as_slice())
    }

    pub(crate) fn explicit_binding(&self, name: &str) -> Option<&Binding> {
        self.decoration.as_ref()?.binding(name)
    }
}
