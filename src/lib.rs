#[macro_use]
pub(crate) mod macros;

pub(crate) mod any;
pub(crate) mod binder;
pub(crate) mod binding;
pub(crate) mod cache;
pub(crate) mod class;
pub(crate) mod config;
pub(crate) mod errors;
pub(crate) mod function;
pub(crate) mod inject;
pub(crate) mod injector;
pub(crate) mod key;
pub(crate) mod module;
pub(crate) mod naming;
pub(crate) mod registry;
pub(crate) mod service;
pub(crate) mod stack;
pub(crate) mod wrap;

pub use any::{TypeInfo, Value};
pub use binder::{Binder, BindingBuilder, BindingFn};
pub use binding::{Binding, BindingSource, ProviderFn, Provision, Scope};
pub use class::{Class, ClassRef, Injectable};
pub use config::Config;
pub use errors::{CallErrorKind, InjectErrorKind, ResolveErrorKind};
pub use function::{Arguments, CallArgs, Function, Param, Signature};
pub use injector::{Injector, InjectorBuilder, Resolver};
pub use key::{Annotation, BindingKey};
pub use module::Module;
pub use naming::{default_arg_name, ArgNaming};
pub use stack::{Frame, ResolutionStack};
pub use wrap::Wrapped;

#[cfg(feature = "macros")]
pub use wireup_macros::injectable;
