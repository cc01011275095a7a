use std::borrow::Cow;

#[derive(thiserror::Error, Debug)]
pub enum CallErrorKind {
    #[error("`{function}` is missing required arg \"{name}\"")]
    MissingArg {
        name: Cow<'static, str>,
        function: Cow<'static, str>,
    },
    #[error("`{function}` got multiple values for arg \"{name}\"")]
    DuplicateArg {
        name: Cow<'static, str>,
        function: Cow<'static, str>,
    },
    #[error("`{function}` takes {expected} positional args but {given} were given")]
    TooManyPositional {
        function: Cow<'static, str>,
        expected: usize,
        given: usize,
    },
    #[error("`{function}` got an unexpected keyword arg \"{name}\"")]
    UnexpectedKeyword { name: String, function: Cow<'static, str> },
    #[error("Arg \"{name}\" of `{function}` isn't of type `{expected}`")]
    IncorrectType {
        name: Cow<'static, str>,
        function: Cow<'static, str>,
        expected: &'static str,
    },
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}

impl CallErrorKind {
    /// Wraps an error raised by a constructor or function body
    #[inline]
    #[must_use]
    pub fn custom(err: impl Into<anyhow::Error>) -> Self {
        Self::Custom(err.into())
    }
}
