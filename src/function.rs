use core::fmt::{self, Debug, Formatter};
use std::{borrow::Cow, collections::BTreeMap, sync::Arc};
use tracing::error;

use crate::{
    any::{value_type_id, Value},
    errors::CallErrorKind,
    inject::Decoration,
    key::{Annotation, BindingKey},
    service::{service_fn, Service as _, SharedService},
};

#[derive(Clone)]
pub struct Param {
    name: Cow<'static, str>,
    default: Option<Value>,
    annotation: Option<Annotation>,
}

impl Param {
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub const fn has_default(&self) -> bool {
        self.default.is_some()
    }

    #[inline]
    #[must_use]
    pub const fn annotation(&self) -> Option<&Annotation> {
        self.annotation.as_ref()
    }

    pub(crate) fn set_annotation(&mut self, annotation: Annotation) {
        self.annotation = Some(annotation);
    }

    /// Key the injector requests for this param
    #[must_use]
    pub fn binding_key(&self) -> BindingKey {
        match &self.annotation {
            Some(annotation) => BindingKey::annotated(self.name.clone(), annotation.clone()),
            None => BindingKey::new(self.name.clone()),
        }
    }
}

impl Debug for Param {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Param")
            .field("name", &self.name)
            .field("has_default", &self.has_default())
            .field("annotation", &self.annotation)
            .finish()
    }
}

/// Declared parameters of a callable.
///
/// Params are matched left to right by positional args, then by name.
/// `var_positional` captures surplus positional args and `var_keyword`
/// captures keyword args that match no param.
#[derive(Clone, Debug, Default)]
pub struct Signature {
    params: Vec<Param>,
    var_positional: bool,
    var_keyword: bool,
}

impl Signature {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            params: Vec::new(),
            var_positional: false,
            var_keyword: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn param(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.params.push(Param {
            name: name.into(),
            default: None,
            annotation: None,
        });
        self
    }

    #[inline]
    #[must_use]
    pub fn param_with_default<T: Send + Sync + 'static>(mut self, name: impl Into<Cow<'static, str>>, default: T) -> Self {
        self.params.push(Param {
            name: name.into(),
            default: Some(Arc::new(default) as Value),
            annotation: None,
        });
        self
    }

    #[inline]
    #[must_use]
    pub const fn var_positional(mut self) -> Self {
        self.var_positional = true;
        self
    }

    #[inline]
    #[must_use]
    pub const fn var_keyword(mut self) -> Self {
        self.var_keyword = true;
        self
    }

    #[inline]
    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    #[inline]
    #[must_use]
    pub fn param_by_name(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|param| param.name() == name)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.param_by_name(name).is_some()
    }

    pub(crate) fn param_by_name_mut(&mut self, name: &str) -> Option<&mut Param> {
        self.params.iter_mut().find(|param| param.name() == name)
    }

    fn bind(&self, function: &Cow<'static, str>, args: CallArgs) -> Result<Arguments, CallErrorKind> {
        let CallArgs { positional, mut keyword } = args;

        let given = positional.len();
        let mut positional = positional.into_iter();
        let mut named = BTreeMap::new();
        for param in &self.params {
            let Some(value) = positional.next() else {
                break;
            };
            named.insert(param.name.clone(), value);
        }

        let rest = positional.collect::<Vec<_>>();
        if !rest.is_empty() && !self.var_positional {
            return Err(CallErrorKind::TooManyPositional {
                function: function.clone(),
                expected: self.params.len(),
                given,
            });
        }

        for param in &self.params {
            let Some(value) = keyword.remove(param.name()) else {
                continue;
            };
            if named.contains_key(param.name()) {
                return Err(CallErrorKind::DuplicateArg {
                    name: param.name.clone(),
                    function: function.clone(),
                });
            }
            named.insert(param.name.clone(), value);
        }

        if !self.var_keyword {
            if let Some(name) = keyword.into_keys().next() {
                return Err(CallErrorKind::UnexpectedKeyword {
                    name,
                    function: function.clone(),
                });
            }
            keyword = BTreeMap::new();
        }

        for param in &self.params {
            if named.contains_key(param.name()) {
                continue;
            }
            match &param.default {
                Some(default) => {
                    named.insert(param.name.clone(), default.clone());
                }
                None => {
                    return Err(CallErrorKind::MissingArg {
                        name: param.name.clone(),
                        function: function.clone(),
                    })
                }
            }
        }

        Ok(Arguments {
            function: function.clone(),
            named,
            rest,
            keywords: keyword,
        })
    }
}

/// Args supplied by the caller of a function
#[derive(Clone, Default)]
pub struct CallArgs {
    positional: Vec<Value>,
    keyword: BTreeMap<String, Value>,
}

impl CallArgs {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            positional: Vec::new(),
            keyword: BTreeMap::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn arg<T: Send + Sync + 'static>(self, value: T) -> Self {
        self.arg_value(Arc::new(value))
    }

    #[inline]
    #[must_use]
    pub fn arg_value(mut self, value: Value) -> Self {
        self.positional.push(value);
        self
    }

    #[inline]
    #[must_use]
    pub fn kwarg<T: Send + Sync + 'static>(self, name: impl Into<String>, value: T) -> Self {
        self.kwarg_value(name, Arc::new(value))
    }

    #[inline]
    #[must_use]
    pub fn kwarg_value(mut self, name: impl Into<String>, value: Value) -> Self {
        self.keyword.insert(name.into(), value);
        self
    }

    #[inline]
    #[must_use]
    pub fn positional_len(&self) -> usize {
        self.positional.len()
    }

    #[inline]
    #[must_use]
    pub fn has_kwarg(&self, name: &str) -> bool {
        self.keyword.contains_key(name)
    }

    pub(crate) fn insert_kwarg(&mut self, name: &str, value: Value) {
        self.keyword.insert(name.to_owned(), value);
    }
}

impl Debug for CallArgs {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallArgs")
            .field("positional", &self.positional.len())
            .field("keyword", &self.keyword.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Args bound to a function's signature, as its body sees them
pub struct Arguments {
    function: Cow<'static, str>,
    named: BTreeMap<Cow<'static, str>, Value>,
    rest: Vec<Value>,
    keywords: BTreeMap<String, Value>,
}

impl Arguments {
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.named.get(name)
    }

    /// Gets a declared arg as a shared value
    ///
    /// # Errors
    /// - Returns [`CallErrorKind::MissingArg`] if the signature doesn't declare `name`
    /// - Returns [`CallErrorKind::IncorrectType`] if the arg isn't a `T`
    pub fn get<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>, CallErrorKind> {
        let Some(value) = self.named.get(name) else {
            return Err(CallErrorKind::MissingArg {
                name: Cow::Owned(name.to_owned()),
                function: self.function.clone(),
            });
        };
        self.downcast(name, value.clone())
    }

    /// Gets a declared arg by cloning it out of the shared value
    ///
    /// # Errors
    /// Same as [`Self::get`]
    pub fn cloned<T: Clone + Send + Sync + 'static>(&self, name: &str) -> Result<T, CallErrorKind> {
        self.get::<T>(name).map(|value| (*value).clone())
    }

    /// Surplus positional args, captured when the signature has `var_positional`
    #[inline]
    #[must_use]
    pub fn rest(&self) -> &[Value] {
        &self.rest
    }

    /// Gets a surplus positional arg by index
    ///
    /// # Errors
    /// Same as [`Self::get`], with the index as the arg name
    pub fn rest_get<T: Send + Sync + 'static>(&self, index: usize) -> Result<Arc<T>, CallErrorKind> {
        let name = format!("*{index}");
        match self.rest.get(index) {
            Some(value) => self.downcast(&name, value.clone()),
            None => Err(CallErrorKind::MissingArg {
                name: Cow::Owned(name),
                function: self.function.clone(),
            }),
        }
    }

    /// Keyword args matching no param, captured when the signature has `var_keyword`
    #[inline]
    #[must_use]
    pub fn keywords(&self) -> &BTreeMap<String, Value> {
        &self.keywords
    }

    /// Gets a captured keyword arg
    ///
    /// # Errors
    /// Same as [`Self::get`]
    pub fn keyword<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>, CallErrorKind> {
        match self.keywords.get(name) {
            Some(value) => self.downcast(name, value.clone()),
            None => Err(CallErrorKind::MissingArg {
                name: Cow::Owned(name.to_owned()),
                function: self.function.clone(),
            }),
        }
    }

    fn downcast<T: Send + Sync + 'static>(&self, name: &str, value: Value) -> Result<Arc<T>, CallErrorKind> {
        value.downcast::<T>().map_err(|_| CallErrorKind::IncorrectType {
            name: Cow::Owned(name.to_owned()),
            function: self.function.clone(),
            expected: core::any::type_name::<T>(),
        })
    }
}

pub(crate) type BoxedBody = SharedService<Arguments, Value, CallErrorKind>;

/// A callable with a declared signature.
///
/// Explicit bindings attached with [`Function::inject`] are only consulted by an injector;
/// [`Function::call`] always uses the args it is given.
#[derive(Clone)]
pub struct Function {
    pub(crate) name: Cow<'static, str>,
    pub(crate) signature: Signature,
    pub(crate) decoration: Option<Decoration>,
    body: BoxedBody,
}

impl Function {
    #[must_use]
    pub fn new<F, R>(name: impl Into<Cow<'static, str>>, signature: Signature, body: F) -> Self
    where
        F: Fn(Arguments) -> Result<R, CallErrorKind> + Send + Sync + 'static,
        R: Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            signature,
            decoration: None,
            body: SharedService::new(service_fn(move |args| body(args).map(|response| Arc::new(response) as Value))),
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Calls the function with exactly the given args
    ///
    /// # Errors
    /// - Returns [`CallErrorKind`] if the args don't fit the signature
    /// - Returns the body's error, if any
    pub fn call(&self, args: CallArgs) -> Result<Value, CallErrorKind> {
        let arguments = self.signature.bind(&self.name, args)?;
        self.body.call(arguments)
    }

    /// Same as [`Self::call`], downcasting the result
    ///
    /// # Errors
    /// Same as [`Self::call`], plus [`CallErrorKind::IncorrectType`] if the result isn't a `T`
    pub fn call_as<T: Send + Sync + 'static>(&self, args: CallArgs) -> Result<Arc<T>, CallErrorKind> {
        let value = self.call(args)?;
        let actual = value_type_id(&value);
        value.downcast::<T>().map_err(|_| {
            error!(?actual, "Incorrect return type");
            CallErrorKind::IncorrectType {
                name: Cow::Borrowed("return"),
                function: self.name.clone(),
                expected: core::any::type_name::<T>(),
            }
        })
    }
}

impl Debug for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .field("decoration", &self.decoration)
            .finish_non_exhaustive()
    }
}
