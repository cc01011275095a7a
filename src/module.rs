use std::borrow::Cow;

use crate::{
    class::{Class, ClassGetter, Injectable},
    errors::InjectErrorKind,
};

/// Named group of classes handed to an injector at once.
///
/// A class listed in several modules, or several times, is bound once.
/// Usually built with [`module!`](crate::module).
#[derive(Debug, Clone)]
pub struct Module {
    name: Cow<'static, str>,
    getters: Vec<ClassGetter>,
}

impl Module {
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            getters: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn class<T: Injectable>(mut self) -> Self {
        self.getters.push(Class::of::<T>);
        self
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.getters.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.getters.is_empty()
    }

    /// # Errors
    /// Returns [`InjectErrorKind`] if decorating the constructor of any class fails
    pub(crate) fn scan(&self) -> Result<Vec<Class>, InjectErrorKind> {
        self.getters.iter().map(|getter| getter()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Module;
    use crate::{
        any::TypeInfo,
        class::Injectable,
        errors::InjectErrorKind,
        function::{Function, Signature},
    };

    struct ClassOne;

    impl Injectable for ClassOne {
        fn constructor() -> Result<Function, InjectErrorKind> {
            Ok(Function::new("ClassOne::new", Signature::new(), |_| Ok(ClassOne)))
        }
    }

    struct Broken;

    impl Injectable for Broken {
        fn constructor() -> Result<Function, InjectErrorKind> {
            Function::new("Broken::new", Signature::new(), |_| Ok(Broken)).annotate_arg("missing", "annot")
        }
    }

    #[test]
    fn test_scan() {
        let module = Module::new("app").class::<ClassOne>();

        let classes = module.scan().unwrap();

        assert_eq!(module.name(), "app");
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].type_info(), TypeInfo::of::<ClassOne>());
    }

    #[test]
    fn test_scan_error() {
        let module = Module::new("app").class::<ClassOne>().class::<Broken>();

        assert!(matches!(module.scan(), Err(InjectErrorKind::NoSuchArgToAnnotate { .. })));
    }
}
