use core::fmt::{self, Display, Formatter};
use std::borrow::Cow;

/// Opaque token that tells apart several bindings for the same arg name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Annotation(Cow<'static, str>);

impl Annotation {
    #[inline]
    #[must_use]
    pub fn new(value: impl Into<Cow<'static, str>>) -> Self {
        Self(value.into())
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Annotation {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Annotation {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Identifies what can satisfy a parameter: its name plus an optional annotation.
///
/// Keys are ordered by name, then by annotation, with the bare key first.
/// A bare key is never equal to an annotated key with the same name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingKey {
    name: Cow<'static, str>,
    annotation: Option<Annotation>,
}

impl BindingKey {
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            annotation: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn annotated(name: impl Into<Cow<'static, str>>, annotation: impl Into<Annotation>) -> Self {
        Self {
            name: name.into(),
            annotation: Some(annotation.into()),
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub const fn annotation(&self) -> Option<&Annotation> {
        self.annotation.as_ref()
    }
}

impl From<&'static str> for BindingKey {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl From<String> for BindingKey {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<&BindingKey> for BindingKey {
    fn from(key: &BindingKey) -> Self {
        key.clone()
    }
}

impl Display for BindingKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.annotation {
            Some(annotation) => write!(f, "the binding name \"{}\" (annotated with \"{}\")", self.name, annotation.as_str()),
            None => write!(f, "the binding name \"{}\" (unannotated)", self.name),
        }
    }
}
