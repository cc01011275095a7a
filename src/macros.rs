/// Builds [`CallArgs`](crate::CallArgs): positional args, then keyword args after `;`.
///
/// ```
/// use wireup::call_args;
///
/// let positional = call_args!(1u8, 2u8);
/// let keyword = call_args!(foo = 1u8, bar = 2u8);
/// let mixed = call_args!(1u8; bar = 2u8);
///
/// assert_eq!(positional.positional_len(), 2);
/// assert!(keyword.has_kwarg("foo"));
/// assert!(mixed.has_kwarg("bar"));
/// ```
#[macro_export]
macro_rules! call_args {
    () => {
        $crate::CallArgs::new()
    };

    // Example: call_args!(foo = 1, bar = 2)
    ($($name:ident = $kwarg:expr),+ $(,)?) => {
        $crate::CallArgs::new()$(.kwarg(stringify!($name), $kwarg))+
    };

    // Example: call_args!(1, 2; bar = 3)
    ($($arg:expr),* ; $($name:ident = $kwarg:expr),* $(,)?) => {
        $crate::CallArgs::new()$(.arg($arg))*$(.kwarg(stringify!($name), $kwarg))*
    };

    // Example: call_args!(1, 2)
    ($($arg:expr),+ $(,)?) => {
        $crate::CallArgs::new()$(.arg($arg))+
    };
}

/// Builds a [`Module`](crate::Module) from a name and a list of injectable classes
///
/// ```ignore
/// let module = wireup::module!("app" => [ClassOne, ClassTwo]);
/// ```
#[macro_export]
macro_rules! module {
    ($name:expr => [$($class:ty),* $(,)?]) => {
        $crate::Module::new($name)$(.class::<$class>())*
    };
}
