use std::borrow::Cow;

#[derive(thiserror::Error, Debug)]
pub enum InjectErrorKind {
    #[error("Can't inject arg \"{name}\" into `{function}`: no such arg")]
    NoSuchArg {
        name: Cow<'static, str>,
        function: Cow<'static, str>,
    },
    #[error("Arg \"{name}\" of `{function}` is explicitly injected more than once")]
    DuplicateArg {
        name: Cow<'static, str>,
        function: Cow<'static, str>,
    },
    #[error("Can't annotate arg \"{name}\" of `{function}`: no such arg")]
    NoSuchArgToAnnotate {
        name: Cow<'static, str>,
        function: Cow<'static, str>,
    },
    #[error("Arg \"{name}\" of `{function}` is annotated more than once")]
    DuplicateAnnotation {
        name: Cow<'static, str>,
        function: Cow<'static, str>,
    },
}
