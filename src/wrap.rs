use core::any::type_name;
use std::sync::Arc;
use tracing::{error, info_span};

use crate::{
    any::Value,
    errors::{CallErrorKind, ResolveErrorKind},
    function::{CallArgs, Function},
    injector::{downcast, Injector},
    stack::ResolutionStack,
};

/// Function bound to an injector.
///
/// On call, every param left unfilled by the given args and without a default is injected.
/// Given args always win over injected ones.
#[derive(Clone, Debug)]
pub struct Wrapped {
    injector: Injector,
    function: Function,
}

impl Wrapped {
    #[inline]
    #[must_use]
    pub(crate) const fn new(injector: Injector, function: Function) -> Self {
        Self { injector, function }
    }

    /// # Errors
    /// - Returns [`ResolveErrorKind`] if an arg can't be injected
    /// - Returns [`ResolveErrorKind::Call`] if the args don't fit the signature or the function fails
    pub fn call(&self, args: CallArgs) -> Result<Value, ResolveErrorKind> {
        let span = info_span!("call", function = self.function.name());
        let _guard = span.enter();

        let args = self.injector.inject_args(&self.function, args, &ResolutionStack::new())?;
        self.function.call(args).map_err(|err: CallErrorKind| {
            error!("{}", err);
            err.into()
        })
    }

    /// Same as [`Self::call`], downcasting the result
    ///
    /// # Errors
    /// Same as [`Self::call`], plus [`ResolveErrorKind::IncorrectType`] if the result isn't a `T`
    pub fn call_as<T: Send + Sync + 'static>(&self, args: CallArgs) -> Result<Arc<T>, ResolveErrorKind> {
        let value = self.call(args)?;
        downcast(value, || format!("the return of `{}`, `{}`", self.function.name(), type_name::<T>()))
    }

    #[inline]
    #[must_use]
    pub const fn function(&self) -> &Function {
        &self.function
    }

    #[inline]
    #[must_use]
    pub const fn injector(&self) -> &Injector {
        &self.injector
    }
}
