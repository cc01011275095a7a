use crate::{
    binding::Scope,
    naming::{default_arg_name, ArgNaming},
};

/// Config for an injector
///
/// ## Fields
/// - `default_scope`: scope of implicit class bindings and of classes provided by type.
///   Explicit bindings carry their own scope.
/// - `implicit_bindings`: whether classes are bound to the arg name derived from their type name.
///   With implicit bindings disabled, only explicit bindings satisfy args.
/// - `arg_naming`: maps a class name to its implicit arg name.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub default_scope: Scope,
    pub implicit_bindings: bool,
    pub arg_naming: ArgNaming,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_scope: Scope::Singleton,
            implicit_bindings: true,
            arg_naming: default_arg_name,
        }
    }
}
