use core::{
    any::type_name,
    fmt::{self, Debug, Formatter},
};
use std::sync::Arc;
use tracing::{debug, debug_span, error, info, info_span, warn};

use crate::{
    any::{value_type_id, TypeInfo, Value},
    binder::{Binder, BindingFn},
    binding::{Binding, Provision, Scope},
    cache::{Cache, CacheKey},
    class::{Class, Injectable},
    config::Config,
    errors::{InjectErrorKind, ResolveErrorKind},
    function::{CallArgs, Function},
    key::{Annotation, BindingKey},
    module::Module,
    registry::{BindingIndex, Entry},
    stack::{Frame, ResolutionStack},
    wrap::Wrapped,
};

#[must_use]
pub struct InjectorBuilder {
    classes: Vec<Result<Class, InjectErrorKind>>,
    modules: Vec<Module>,
    binding_fns: Vec<BindingFn>,
    config: Config,
}

impl InjectorBuilder {
    #[inline]
    pub fn new() -> Self {
        Self {
            classes: Vec::new(),
            modules: Vec::new(),
            binding_fns: Vec::new(),
            config: Config::default(),
        }
    }

    #[inline]
    pub fn class<T: Injectable>(mut self) -> Self {
        self.classes.push(Class::of::<T>());
        self
    }

    #[inline]
    pub fn class_value(mut self, class: Class) -> Self {
        self.classes.push(Ok(class));
        self
    }

    #[inline]
    pub fn classes(mut self, classes: impl IntoIterator<Item = Class>) -> Self {
        self.classes.extend(classes.into_iter().map(Ok));
        self
    }

    #[inline]
    pub fn module(mut self, module: Module) -> Self {
        self.modules.push(module);
        self
    }

    /// Adds a function binding args explicitly.
    /// Binding functions run in the order they are added, and a later binding for the same key wins.
    #[inline]
    pub fn binding_fn<F>(mut self, binding_fn: F) -> Self
    where
        F: FnOnce(&mut Binder) -> Result<(), InjectErrorKind> + 'static,
    {
        self.binding_fns.push(Box::new(binding_fn));
        self
    }

    #[inline]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// # Errors
    /// Returns [`InjectErrorKind`] if decorating a class constructor or a binding function fails
    pub fn build(self) -> Result<Injector, InjectErrorKind> {
        let span = info_span!("build");
        let _guard = span.enter();

        let mut classes = self.classes.into_iter().collect::<Result<Vec<_>, _>>()?;
        for module in &self.modules {
            let module_classes = module.scan()?;
            debug!(module = module.name(), classes = module_classes.len(), "Module scanned");
            classes.extend(module_classes);
        }

        let mut binder = Binder::new();
        for binding_fn in self.binding_fns {
            binding_fn(&mut binder).map_err(|err| {
                error!("{}", err);
                err
            })?;
        }

        let index = BindingIndex::build(classes, binder.into_bindings(), &self.config);
        info!(bindings = index.len(), "Injector built");

        Ok(Injector {
            inner: Arc::new(InjectorInner {
                index,
                cache: Cache::default(),
                config: self.config,
            }),
        })
    }
}

impl Default for InjectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

struct InjectorInner {
    index: BindingIndex,
    cache: Cache,
    config: Config,
}

/// Provides classes and args, and wraps functions to have their args injected.
///
/// Cloning is cheap and clones share bindings and singletons.
#[derive(Clone)]
pub struct Injector {
    inner: Arc<InjectorInner>,
}

impl Injector {
    #[inline]
    pub fn builder() -> InjectorBuilder {
        InjectorBuilder::new()
    }

    /// Provides an instance of `T`, injecting all args of its constructor
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::NothingInjectable`] if an arg has no binding
    /// - Returns [`ResolveErrorKind::Ambiguous`] if an arg name is claimed by several classes
    /// - Returns [`ResolveErrorKind::Cyclic`] if construction depends on itself
    /// - Returns [`ResolveErrorKind::Call`] if a constructor fails
    pub fn provide<T: Injectable>(&self) -> Result<Arc<T>, ResolveErrorKind> {
        let span = info_span!("provide", class = TypeInfo::of::<T>().short_name());
        let _guard = span.enter();

        self.provide_in::<T>(&ResolutionStack::new())
    }

    /// Same as [`Self::provide`] for a class known at runtime
    ///
    /// # Errors
    /// Same as [`Self::provide`]
    pub fn provide_class(&self, class: &Class) -> Result<Value, ResolveErrorKind> {
        let span = info_span!("provide", class = class.type_info().short_name());
        let _guard = span.enter();

        self.resolve_class(class, &ResolutionStack::new())
    }

    /// Provides the value bound to `key`, as if it were an arg being injected
    ///
    /// # Errors
    /// Same as [`Self::provide`]
    pub fn provide_arg(&self, key: impl Into<BindingKey>) -> Result<Value, ResolveErrorKind> {
        let key = key.into();
        let span = info_span!("provide_arg", key = key.name());
        let _guard = span.enter();

        self.resolve_key(&key, &ResolutionStack::new())
    }

    /// Same as [`Self::provide_arg`], downcasting the value
    ///
    /// # Errors
    /// Same as [`Self::provide_arg`], plus [`ResolveErrorKind::IncorrectType`] if the value isn't a `T`
    pub fn get<T: Send + Sync + 'static>(&self, key: impl Into<BindingKey>) -> Result<Arc<T>, ResolveErrorKind> {
        let key = key.into();
        let span = info_span!("provide_arg", key = key.name());
        let _guard = span.enter();

        self.get_in(&key, &ResolutionStack::new())
    }

    /// Wraps `function` so that args missing on call are injected
    #[inline]
    #[must_use]
    pub fn wrap(&self, function: Function) -> Wrapped {
        Wrapped::new(self.clone(), function)
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}

impl Injector {
    fn provide_in<T: Injectable>(&self, stack: &ResolutionStack) -> Result<Arc<T>, ResolveErrorKind> {
        let class = Class::of::<T>().map_err(|err| {
            error!("{}", err);
            err
        })?;
        let value = self.resolve_class(&class, stack)?;
        downcast(value, || class.to_string())
    }

    fn get_in<T: Send + Sync + 'static>(&self, key: &BindingKey, stack: &ResolutionStack) -> Result<Arc<T>, ResolveErrorKind> {
        let value = self.resolve_key(key, stack)?;
        downcast(value, || key.to_string())
    }

    pub(crate) fn resolve_key(&self, key: &BindingKey, stack: &ResolutionStack) -> Result<Value, ResolveErrorKind> {
        let span = debug_span!(
            "resolve",
            key = key.name(),
            annotation = key.annotation().map(Annotation::as_str)
        );
        let _guard = span.enter();

        let frame = Frame::Key(key.clone());
        if stack.contains(&frame) {
            return Err(cyclic(stack, frame));
        }

        let cache_key = CacheKey::Binding(key.clone());
        if let Some(value) = self.inner.cache.get(&cache_key) {
            debug!("Found in cache");
            return Ok(value);
        }
        debug!("Not found in cache");

        let binding = match self.inner.index.get(key) {
            Some(Entry::Bound(binding)) => binding,
            Some(Entry::Ambiguous(candidates)) => {
                let err = ResolveErrorKind::Ambiguous {
                    key: key.clone(),
                    candidates: candidates.clone(),
                };
                error!("{}", err);
                return Err(err);
            }
            None => {
                let err = ResolveErrorKind::NothingInjectable { key: key.clone() };
                warn!("{}", err);
                return Err(err);
            }
        };

        let pushed = stack.pushed(frame.clone());
        match binding.scope() {
            Scope::Singleton => self.inner.cache.get_or_try_init(
                cache_key,
                || {
                    let value = binding.provide(self, &pushed)?;
                    debug!("Cached");
                    Ok(value)
                },
                || reentered(stack, frame),
            ),
            Scope::Prototype => binding.provide(self, &pushed),
        }
    }

    /// Provides a class by type.
    /// A class that is its own implicit binding shares the value cached under that binding,
    /// any other class is cached under its type and constructor.
    pub(crate) fn resolve_class(&self, class: &Class, stack: &ResolutionStack) -> Result<Value, ResolveErrorKind> {
        if let Some(key) = self.implicit_key(class) {
            return self.resolve_key(&key, stack);
        }

        let frame = Frame::Class(class.type_info());
        if stack.contains(&frame) {
            return Err(cyclic(stack, frame));
        }

        match self.inner.config.default_scope {
            Scope::Singleton => self.inner.cache.get_or_try_init(
                CacheKey::Class(class.id()),
                || self.construct(class, stack),
                || reentered(stack, frame),
            ),
            Scope::Prototype => self.construct(class, stack),
        }
    }

    fn implicit_key(&self, class: &Class) -> Option<BindingKey> {
        let key = class.arg_key(self.inner.config.arg_naming)?;
        match self.inner.index.get(&key) {
            Some(Entry::Bound(binding)) if binding.implicit_class().is_some_and(|bound| bound.id() == class.id()) => {
                Some(key)
            }
            _ => None,
        }
    }

    /// Calls the constructor of `class` with all its args injected
    pub(crate) fn construct(&self, class: &Class, stack: &ResolutionStack) -> Result<Value, ResolveErrorKind> {
        let span = debug_span!("construct", class = class.type_info().short_name());
        let _guard = span.enter();

        let frame = Frame::Class(class.type_info());
        if stack.contains(&frame) {
            return Err(cyclic(stack, frame));
        }
        let stack = stack.pushed(frame);

        let constructor = class.constructor();
        let args = self.inject_args(constructor, CallArgs::new(), &stack)?;
        let value = constructor.call(args).map_err(|err| {
            error!("{}", err);
            err
        })?;

        if value_type_id(&value) != class.type_info().id {
            let err = ResolveErrorKind::IncorrectType {
                target: format!("the class `{class}`"),
                expected: class.type_info().name,
            };
            error!("{}", err);
            return Err(err);
        }

        debug!("Constructed");
        Ok(value)
    }

    /// Adds a keyword arg for every param of `function` that `args` leaves unfilled and has no default
    pub(crate) fn inject_args(
        &self,
        function: &Function,
        mut args: CallArgs,
        stack: &ResolutionStack,
    ) -> Result<CallArgs, ResolveErrorKind> {
        let positional = args.positional_len();
        for (index, param) in function.signature().params().iter().enumerate() {
            if index < positional || param.has_default() || args.has_kwarg(param.name()) {
                continue;
            }

            let value = match function.explicit_binding(param.name()) {
                Some(binding) => {
                    debug!(arg = param.name(), "Using explicit binding");
                    self.resolve_explicit(binding, stack)?
                }
                None => self.resolve_key(&param.binding_key(), stack)?,
            };
            args.insert_kwarg(param.name(), value);
        }
        Ok(args)
    }

    /// Function-local bindings aren't cached by key, classes are still shared per class
    fn resolve_explicit(&self, binding: &Binding, stack: &ResolutionStack) -> Result<Value, ResolveErrorKind> {
        match binding.provision() {
            Provision::Class(class) => {
                let frame = Frame::Class(class.type_info());
                if stack.contains(&frame) {
                    return Err(cyclic(stack, frame));
                }
                let class = class.get().map_err(|err| {
                    error!("{}", err);
                    err
                })?;
                self.resolve_class(class, stack)
            }
            Provision::Instance(_) | Provision::Provider(_) => binding.provide(self, stack),
        }
    }
}

impl Debug for Injector {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injector")
            .field("bindings", &self.inner.index.len())
            .field("cached", &self.inner.cache.len())
            .field("config", &self.inner.config)
            .finish()
    }
}

/// Handle given to provider functions to resolve their own dependencies.
///
/// Resolutions continue the path of the resolution that called the provider,
/// so cycles through provider functions are detected too.
#[derive(Clone)]
pub struct Resolver {
    injector: Injector,
    stack: ResolutionStack,
}

impl Resolver {
    #[inline]
    #[must_use]
    pub(crate) const fn new(injector: Injector, stack: ResolutionStack) -> Self {
        Self { injector, stack }
    }

    /// # Errors
    /// Same as [`Injector::provide`]
    pub fn provide<T: Injectable>(&self) -> Result<Arc<T>, ResolveErrorKind> {
        self.injector.provide_in::<T>(&self.stack)
    }

    /// # Errors
    /// Same as [`Injector::provide_arg`]
    pub fn provide_arg(&self, key: impl Into<BindingKey>) -> Result<Value, ResolveErrorKind> {
        self.injector.resolve_key(&key.into(), &self.stack)
    }

    /// # Errors
    /// Same as [`Injector::get`]
    pub fn get<T: Send + Sync + 'static>(&self, key: impl Into<BindingKey>) -> Result<Arc<T>, ResolveErrorKind> {
        self.injector.get_in(&key.into(), &self.stack)
    }

    #[inline]
    #[must_use]
    pub const fn stack(&self) -> &ResolutionStack {
        &self.stack
    }
}

impl Debug for Resolver {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver").field("stack", &self.stack).finish_non_exhaustive()
    }
}

fn cyclic(stack: &ResolutionStack, frame: Frame) -> ResolveErrorKind {
    let err = ResolveErrorKind::Cyclic {
        cycle: stack.path_to(frame),
    };
    error!("{}", err);
    err
}

/// `frame` is being resolved on this thread already, through a stack that doesn't record it
fn reentered(stack: &ResolutionStack, frame: Frame) -> ResolveErrorKind {
    let mut cycle = vec![frame.clone()];
    cycle.extend(stack.path_to(frame));
    let err = ResolveErrorKind::Cyclic { cycle };
    error!("{}", err);
    err
}

pub(crate) fn downcast<T: Send + Sync + 'static>(
    value: Value,
    target: impl FnOnce() -> String,
) -> Result<Arc<T>, ResolveErrorKind> {
    value.downcast::<T>().map_err(|_| {
        let err = ResolveErrorKind::IncorrectType {
            target: target(),
            expected: type_name::<T>(),
        };
        error!("{}", err);
        err
    })
}
