use super::{CallErrorKind, InjectErrorKind, Joined};
use crate::{any::TypeInfo, key::BindingKey, stack::Frame};

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("Nothing injectable for {key}")]
    NothingInjectable { key: BindingKey },
    #[error("Ambiguous arg name: {key} is provided by each of {}", Joined(candidates, ", "))]
    Ambiguous { key: BindingKey, candidates: Vec<TypeInfo> },
    #[error("Cyclic injection: {}", Joined(cycle, " -> "))]
    Cyclic { cycle: Vec<Frame> },
    #[error("Incorrect type provided for {target}. Expected: `{expected}`")]
    IncorrectType { target: String, expected: &'static str },
    #[error(transparent)]
    Inject(#[from] InjectErrorKind),
    #[error(transparent)]
    Call(#[from] CallErrorKind),
}
