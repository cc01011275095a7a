use std::sync::Arc;

use tracing_test::traced_test;
use wireup::{
    call_args, injectable, module, BindingKey, Class, Function, InjectErrorKind, Injector, Provision, ResolutionStack,
    ResolveErrorKind, Signature,
};

mod inject {
    use super::*;

    fn some_function() -> Function {
        Function::new("some_function", Signature::new().param("foo"), |args| args.cloned::<String>("foo"))
    }

    #[test]
    #[traced_test]
    fn test_adds_decoration_with_bindings() {
        let function = some_function().inject("foo", Provision::instance(3u8)).unwrap();
        let injector = Injector::builder().build().unwrap();

        assert!(function.is_decorated());
        assert_eq!(
            function
                .explicit_bindings()
                .iter()
                .map(|binding| binding.key().clone())
                .collect::<Vec<_>>(),
            [BindingKey::new("foo")]
        );
        let provided = function.explicit_bindings()[0]
            .provide(&injector, &ResolutionStack::new())
            .unwrap();
        assert_eq!(*provided.downcast::<u8>().unwrap(), 3);
    }

    #[test]
    #[traced_test]
    fn test_raises_error_if_injecting_nonexistent_arg() {
        let function = Function::new("some_function", Signature::new().param("bar"), |args| args.cloned::<u8>("bar"));

        assert!(matches!(
            function.inject("foo", Provision::instance(3u8)),
            Err(InjectErrorKind::NoSuchArg { .. })
        ));
    }

    #[test]
    #[traced_test]
    fn test_reuses_decoration_when_multiple_injections() {
        let function = Function::new("some_function", Signature::new().param("foo").param("bar"), |args| {
            Ok(*args.get::<u8>("foo")? + *args.get::<u8>("bar")?)
        })
        .inject("foo", Provision::instance(3u8))
        .unwrap()
        .inject("bar", Provision::instance(4u8))
        .unwrap();

        assert_eq!(
            function
                .explicit_bindings()
                .iter()
                .map(|binding| binding.key().clone())
                .collect::<Vec<_>>(),
            [BindingKey::new("bar"), BindingKey::new("foo")]
        );
    }

    #[test]
    #[traced_test]
    fn test_can_call_decorated_fn_normally() {
        let function = some_function().inject("foo", Provision::instance(3u8)).unwrap();

        assert_eq!(
            *function.call_as::<String>(call_args!(String::from("an-arg"))).unwrap(),
            "an-arg"
        );
        assert_eq!(
            *function.call_as::<String>(call_args!(foo = String::from("other"))).unwrap(),
            "other"
        );
    }
}

mod new_injector {
    use super::*;

    #[injectable]
    #[derive(Default)]
    struct SomeError;

    #[injectable]
    #[derive(Default)]
    struct SomeClass;

    struct ClassWithFooInjected {
        foo: Arc<SomeClass>,
    }

    #[injectable]
    impl ClassWithFooInjected {
        fn new(foo: Arc<SomeClass>) -> Self {
            Self { foo }
        }
    }

    #[test]
    #[traced_test]
    fn test_creates_injector_using_given_modules() {
        let injector = Injector::builder()
            .module(module!("errors" => [SomeError]))
            .build()
            .unwrap();

        assert!(injector.provide::<SomeError>().is_ok());
    }

    #[test]
    #[traced_test]
    fn test_creates_injector_using_given_classes() {
        let injector = Injector::builder().class::<SomeClass>().build().unwrap();

        assert!(injector.provide::<SomeClass>().is_ok());
    }

    #[test]
    #[traced_test]
    fn test_creates_injector_using_given_binding_fns() {
        let injector = Injector::builder()
            .class::<ClassWithFooInjected>()
            .binding_fn(|binder| {
                binder.bind("foo").to_class(Class::of::<SomeClass>()?);
                Ok(())
            })
            .build()
            .unwrap();

        let provided = injector.provide::<ClassWithFooInjected>().unwrap();

        assert!(Arc::ptr_eq(&provided.foo, &injector.get::<SomeClass>("foo").unwrap()));
    }

    #[test]
    #[traced_test]
    fn test_class_in_module_and_classes_is_not_ambiguous() {
        let injector = Injector::builder()
            .class::<SomeClass>()
            .module(module!("app" => [SomeClass, SomeClass]))
            .build()
            .unwrap();

        assert!(injector.provide_arg("some_class").is_ok());
    }
}

mod provide {
    use super::*;

    mod trivial {
        use super::*;

        pub struct ExampleClassWithInit;

        #[injectable]
        impl ExampleClassWithInit {
            pub fn new() -> Self {
                Self
            }
        }

        #[injectable]
        #[derive(Default)]
        pub struct ExampleClassWithoutInit;
    }

    mod colliding {
        use super::*;

        #[injectable]
        #[derive(Default)]
        #[allow(non_camel_case_types)]
        pub struct _CollidingExampleClass;

        #[injectable]
        #[derive(Default)]
        pub struct CollidingExampleClass;

        pub struct AmbiguousParamClass {
            _colliding: Arc<CollidingExampleClass>,
        }

        #[injectable]
        impl AmbiguousParamClass {
            pub fn new(colliding_example_class: Arc<CollidingExampleClass>) -> Self {
                Self {
                    _colliding: colliding_example_class,
                }
            }
        }
    }

    mod requires_injection {
        use super::*;

        pub struct ClassOne {
            pub class_two: Arc<ClassTwo>,
        }

        #[injectable]
        impl ClassOne {
            pub fn new(class_two: Arc<ClassTwo>) -> Self {
                Self { class_two }
            }
        }

        #[injectable]
        #[derive(Default)]
        pub struct ClassTwo;
    }

    mod cycle {
        use super::*;

        pub struct ClassOne {
            _class_two: Arc<ClassTwo>,
        }

        #[injectable]
        impl ClassOne {
            pub fn new(class_two: Arc<ClassTwo>) -> Self {
                Self { _class_two: class_two }
            }
        }

        pub struct ClassTwo {
            _class_one: Arc<ClassOne>,
        }

        #[injectable]
        impl ClassTwo {
            pub fn new(class_one: Arc<ClassOne>) -> Self {
                Self { _class_one: class_one }
            }
        }
    }

    mod explicit {
        use super::*;

        pub struct SomeClass {
            pub foo: u8,
        }

        #[injectable]
        impl SomeClass {
            #[inject(foo, with_instance = 3)]
            pub fn new(foo: u8) -> Self {
                Self { foo }
            }
        }

        pub struct ClassOne {
            pub foo: u8,
        }

        #[injectable]
        impl ClassOne {
            pub fn new() -> Self {
                Self { foo: 1 }
            }
        }

        pub struct ClassTwo {
            pub foo: u8,
            pub class_one: Arc<ClassOne>,
        }

        #[injectable]
        impl ClassTwo {
            #[inject(foo, with_instance = 2)]
            pub fn new(foo: u8, class_one: Arc<ClassOne>) -> Self {
                Self { foo, class_one }
            }
        }
    }

    pub struct UnknownParamClass {
        _unknown: Arc<u8>,
    }

    #[injectable]
    impl UnknownParamClass {
        fn new(unknown_class: Arc<u8>) -> Self {
            Self { _unknown: unknown_class }
        }
    }

    #[test]
    #[traced_test]
    fn test_can_provide_trivial_class() {
        let injector = Injector::builder().class::<trivial::ExampleClassWithInit>().build().unwrap();

        assert!(injector.provide::<trivial::ExampleClassWithInit>().is_ok());
    }

    #[test]
    #[traced_test]
    fn test_can_provide_class_without_own_init() {
        let injector = Injector::builder()
            .class::<trivial::ExampleClassWithoutInit>()
            .build()
            .unwrap();

        assert!(injector.provide::<trivial::ExampleClassWithoutInit>().is_ok());
    }

    #[test]
    #[traced_test]
    fn test_can_directly_provide_class_with_colliding_arg_name() {
        let injector = Injector::builder()
            .class::<colliding::_CollidingExampleClass>()
            .class::<colliding::CollidingExampleClass>()
            .build()
            .unwrap();

        assert!(injector.provide::<colliding::CollidingExampleClass>().is_ok());
        assert!(injector.provide::<colliding::_CollidingExampleClass>().is_ok());
    }

    #[test]
    #[traced_test]
    fn test_can_provide_class_that_itself_requires_injection() {
        let injector = Injector::builder()
            .class::<requires_injection::ClassOne>()
            .class::<requires_injection::ClassTwo>()
            .build()
            .unwrap();

        let class_one = injector.provide::<requires_injection::ClassOne>().unwrap();

        assert!(Arc::ptr_eq(
            &class_one.class_two,
            &injector.provide::<requires_injection::ClassTwo>().unwrap()
        ));
    }

    #[test]
    #[traced_test]
    fn test_raises_error_if_arg_is_ambiguously_injectable() {
        let injector = Injector::builder()
            .class::<colliding::_CollidingExampleClass>()
            .class::<colliding::CollidingExampleClass>()
            .class::<colliding::AmbiguousParamClass>()
            .build()
            .unwrap();

        assert!(matches!(
            injector.provide::<colliding::AmbiguousParamClass>(),
            Err(ResolveErrorKind::Ambiguous { candidates, .. }) if candidates.len() == 2
        ));
    }

    #[test]
    #[traced_test]
    fn test_raises_error_if_arg_refers_to_no_known_class() {
        let injector = Injector::builder().class::<UnknownParamClass>().build().unwrap();

        assert!(matches!(
            injector.provide::<UnknownParamClass>(),
            Err(ResolveErrorKind::NothingInjectable { key }) if key == BindingKey::new("unknown_class")
        ));
    }

    #[test]
    #[traced_test]
    fn test_raises_error_if_injection_cycle() {
        let injector = Injector::builder()
            .class::<cycle::ClassOne>()
            .class::<cycle::ClassTwo>()
            .build()
            .unwrap();

        assert!(matches!(
            injector.provide::<cycle::ClassOne>(),
            Err(ResolveErrorKind::Cyclic { .. })
        ));
    }

    #[test]
    #[traced_test]
    fn test_can_provide_class_with_explicitly_injected_arg() {
        let injector = Injector::builder().class::<explicit::SomeClass>().build().unwrap();

        assert_eq!(injector.provide::<explicit::SomeClass>().unwrap().foo, 3);
    }

    #[test]
    #[traced_test]
    fn test_can_provide_class_with_explicitly_and_implicitly_injected_args() {
        let injector = Injector::builder()
            .class::<explicit::ClassOne>()
            .class::<explicit::ClassTwo>()
            .build()
            .unwrap();

        let class_two = injector.provide::<explicit::ClassTwo>().unwrap();

        assert_eq!(class_two.foo, 2);
        assert_eq!(class_two.class_one.foo, 1);
    }
}

mod wrap {
    use super::*;

    fn add(signature: Signature) -> Function {
        Function::new("add", signature, |args| Ok(*args.get::<i32>("a")? + *args.get::<i32>("b")?))
    }

    fn empty_injector() -> Injector {
        Injector::builder().build().unwrap()
    }

    pub struct Foo {
        a: i32,
        b: i32,
    }

    #[injectable]
    impl Foo {
        fn new() -> Self {
            Self { a: 2, b: 3 }
        }
    }

    #[test]
    #[traced_test]
    fn test_can_inject_nothing_into_fn_with_zero_params() {
        let function = Function::new("return_something", Signature::new(), |_| Ok(String::from("something")));
        let wrapped = empty_injector().wrap(function);

        assert_eq!(*wrapped.call_as::<String>(call_args!()).unwrap(), "something");
    }

    #[test]
    #[traced_test]
    fn test_can_inject_nothing_into_fn_with_positional_passed_params() {
        let wrapped = empty_injector().wrap(add(Signature::new().param("a").param("b")));

        assert_eq!(*wrapped.call_as::<i32>(call_args!(2, 3)).unwrap(), 5);
    }

    #[test]
    #[traced_test]
    fn test_can_inject_nothing_into_fn_with_keyword_passed_params() {
        let wrapped = empty_injector().wrap(add(Signature::new().param("a").param("b")));

        assert_eq!(*wrapped.call_as::<i32>(call_args!(a = 2, b = 3)).unwrap(), 5);
    }

    #[test]
    #[traced_test]
    fn test_can_inject_nothing_into_fn_with_defaults() {
        let wrapped = empty_injector().wrap(add(Signature::new().param_with_default("a", 2).param_with_default("b", 3)));

        assert_eq!(*wrapped.call_as::<i32>(call_args!()).unwrap(), 5);
    }

    #[test]
    #[traced_test]
    fn test_can_inject_nothing_into_fn_with_pargs_and_kwargs() {
        let function = Function::new("add", Signature::new().var_positional().var_keyword(), |args| {
            Ok(*args.rest_get::<i32>(0)? + *args.keyword::<i32>("b")?)
        });
        let wrapped = empty_injector().wrap(function);

        assert_eq!(*wrapped.call_as::<i32>(call_args!(2; b = 3)).unwrap(), 5);
    }

    #[test]
    #[traced_test]
    fn test_can_inject_something_into_first_positional_param() {
        let function = Function::new("add", Signature::new().param("foo").param("b"), |args| {
            Ok(args.get::<Foo>("foo")?.a + *args.get::<i32>("b")?)
        });
        let wrapped = Injector::builder().class::<Foo>().build().unwrap().wrap(function);

        assert_eq!(*wrapped.call_as::<i32>(call_args!(b = 3)).unwrap(), 5);
    }

    #[test]
    #[traced_test]
    fn test_can_inject_something_into_non_first_positional_param() {
        let function = Function::new("add", Signature::new().param("a").param("foo"), |args| {
            Ok(*args.get::<i32>("a")? + args.get::<Foo>("foo")?.b)
        });
        let wrapped = Injector::builder().class::<Foo>().build().unwrap().wrap(function);

        assert_eq!(*wrapped.call_as::<i32>(call_args!(2)).unwrap(), 5);
    }

    #[test]
    #[traced_test]
    fn test_surplus_positional_args_pass_through_to_rest() {
        let function = Function::new("sum", Signature::new().param("a").var_positional(), |args| {
            let mut sum = *args.get::<i32>("a")?;
            for index in 0..args.rest().len() {
                sum += *args.rest_get::<i32>(index)?;
            }
            Ok(sum)
        });
        let wrapped = empty_injector().wrap(function);

        assert_eq!(*wrapped.call_as::<i32>(call_args!(1, 2, 3)).unwrap(), 6);
    }

    #[test]
    #[traced_test]
    fn test_nothing_injectable_for_missing_arg() {
        let wrapped = empty_injector().wrap(add(Signature::new().param("a").param("b")));

        assert!(matches!(
            wrapped.call(call_args!(2)),
            Err(ResolveErrorKind::NothingInjectable { key }) if key == BindingKey::new("b")
        ));
    }
}
