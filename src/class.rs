use core::{
    fmt::{self, Debug, Display, Formatter},
    sync::atomic::{AtomicU64, Ordering},
};
use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::{
    any::TypeInfo,
    errors::InjectErrorKind,
    function::{Function, Signature},
    key::BindingKey,
    naming::ArgNaming,
};

/// Type an injector is able to construct.
///
/// Usually implemented with `#[injectable]`, which turns the constructor's params into
/// the args of the returned [`Function`]. The function has to return `Self`.
pub trait Injectable: Send + Sync + Sized + 'static {
    /// # Errors
    /// Returns [`InjectErrorKind`] if decorating the constructor fails
    fn constructor() -> Result<Function, InjectErrorKind>;
}

pub(crate) type ClassGetter = fn() -> Result<Class, InjectErrorKind>;

static NEXT_CUSTOM: AtomicU64 = AtomicU64::new(0);

/// Where the constructor of a class comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Origin {
    /// The type's own `Injectable` or `Default` impl
    Type,
    /// A constructor given to [`Class::new`], numbered per call
    Custom(u64),
}

/// Identity of a class: its type and the constructor building it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct ClassId {
    type_info: TypeInfo,
    origin: Origin,
}

/// A constructible type together with its constructor
#[derive(Clone)]
pub struct Class {
    type_info: TypeInfo,
    constructor: Function,
    origin: Origin,
}

impl Class {
    /// # Errors
    /// Returns [`InjectErrorKind`] if decorating the constructor of `T` fails
    #[inline]
    pub fn of<T: Injectable>() -> Result<Self, InjectErrorKind> {
        Ok(Self {
            type_info: TypeInfo::of::<T>(),
            constructor: T::constructor()?,
            origin: Origin::Type,
        })
    }

    /// Class of `T` with a custom constructor, which has to return `T`.
    ///
    /// Clones of the returned class share one identity, distinct from the class of `T`
    /// built with [`Self::of`] and from any other custom class.
    #[inline]
    #[must_use]
    pub fn new<T: Send + Sync + 'static>(constructor: Function) -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            constructor,
            origin: Origin::Custom(NEXT_CUSTOM.fetch_add(1, Ordering::Relaxed)),
        }
    }

    /// Class of `T` constructed with [`Default`]
    #[must_use]
    pub fn with_default<T: Default + Send + Sync + 'static>() -> Self {
        let type_info = TypeInfo::of::<T>();
        Self {
            type_info,
            constructor: Function::new(format!("{}::default", type_info.short_name()), Signature::new(), |_| {
                Ok(T::default())
            }),
            origin: Origin::Type,
        }
    }

    #[inline]
    #[must_use]
    pub const fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    #[inline]
    #[must_use]
    pub const fn constructor(&self) -> &Function {
        &self.constructor
    }

    #[inline]
    pub(crate) const fn id(&self) -> ClassId {
        ClassId {
            type_info: self.type_info,
            origin: self.origin,
        }
    }

    /// Key the class is implicitly bound to, if any
    pub(crate) fn arg_key(&self, naming: ArgNaming) -> Option<BindingKey> {
        naming(self.type_info.short_name()).map(BindingKey::new)
    }
}

/// Class a binding constructs.
///
/// Built from a [`Class`] up front, or from an [`Injectable`] impl on first resolution,
/// so constructors may bind each other's classes.
#[derive(Clone)]
pub struct ClassRef {
    type_info: TypeInfo,
    source: ClassSource,
}

#[derive(Clone)]
enum ClassSource {
    Ready(Class),
    Deferred(ClassGetter, Arc<OnceCell<Class>>),
}

impl ClassRef {
    #[inline]
    #[must_use]
    pub fn ready(class: Class) -> Self {
        Self {
            type_info: class.type_info(),
            source: ClassSource::Ready(class),
        }
    }

    #[inline]
    #[must_use]
    pub fn deferred<T: Injectable>() -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            source: ClassSource::Deferred(Class::of::<T>, Arc::default()),
        }
    }

    #[inline]
    #[must_use]
    pub const fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    /// # Errors
    /// Returns [`InjectErrorKind`] if decorating the constructor fails
    pub fn get(&self) -> Result<&Class, InjectErrorKind> {
        match &self.source {
            ClassSource::Ready(class) => Ok(class),
            ClassSource::Deferred(getter, class) => class.get_or_try_init(*getter),
        }
    }
}

impl Debug for ClassRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let state = match &self.source {
            ClassSource::Ready(_) => "ready",
            ClassSource::Deferred(_, class) if class.get().is_some() => "ready",
            ClassSource::Deferred(..) => "deferred",
        };
        f.debug_tuple("ClassRef").field(&self.type_info.name).field(&state).finish()
    }
}

impl Display for Class {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.type_info, f)
    }
}

impl Debug for Class {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("type_info", &self.type_info)
            .field("constructor", &self.constructor)
            .field("origin", &self.origin)
            .finish()
    }
}
