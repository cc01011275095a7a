use core::{
    fmt::{self, Debug, Display, Formatter},
    iter::successors,
};
use std::sync::Arc;

use crate::{any::TypeInfo, key::BindingKey};

/// One step of the resolution path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// An arg being resolved by key
    Key(BindingKey),
    /// A class being constructed
    Class(TypeInfo),
}

impl Display for Frame {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Frame::Key(key) => match key.annotation() {
                Some(annotation) => write!(f, "\"{}\" @ \"{}\"", key.name(), annotation.as_str()),
                None => write!(f, "\"{}\"", key.name()),
            },
            Frame::Class(type_info) => write!(f, "{type_info}"),
        }
    }
}

/// Keys and classes being resolved on the active call path.
///
/// Every top-level `provide`/`wrap` call starts with an empty stack, and nested
/// resolutions get their own extended stack, so no state outlives a call.
/// Extended stacks share the frames below them.
#[derive(Clone, Default)]
pub struct ResolutionStack {
    top: Option<Arc<Node>>,
    len: usize,
}

struct Node {
    frame: Frame,
    parent: Option<Arc<Node>>,
}

impl ResolutionStack {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { top: None, len: 0 }
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, frame: &Frame) -> bool {
        self.iter_from_top().any(|active| active == frame)
    }

    #[must_use]
    pub(crate) fn pushed(&self, frame: Frame) -> Self {
        Self {
            top: Some(Arc::new(Node {
                frame,
                parent: self.top.clone(),
            })),
            len: self.len + 1,
        }
    }

    /// Whole path followed by `frame`
    #[must_use]
    pub(crate) fn path_to(&self, frame: Frame) -> Vec<Frame> {
        let mut path = self.frames();
        path.push(frame);
        path
    }

    fn iter_from_top(&self) -> impl Iterator<Item = &Frame> {
        successors(self.top.as_deref(), |node| node.parent.as_deref()).map(|node| &node.frame)
    }

    /// Frames from the outermost resolution to the innermost one
    #[must_use]
    pub fn frames(&self) -> Vec<Frame> {
        let mut frames = self.iter_from_top().cloned().collect::<Vec<_>>();
        frames.reverse();
        frames
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Debug for ResolutionStack {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.frames()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Frame, ResolutionStack};
    use crate::{any::TypeInfo, key::BindingKey};

    struct ClassOne;

    #[test]
    fn test_pushed_leaves_original() {
        let stack = ResolutionStack::new();
        let child = stack.pushed(Frame::Key(BindingKey::new("foo")));

        assert!(stack.is_empty());
        assert_eq!(child.len(), 1);
        assert!(child.contains(&Frame::Key(BindingKey::new("foo"))));
        assert!(!child.contains(&Frame::Key(BindingKey::annotated("foo", "bar"))));
    }

    #[test]
    fn test_path_to() {
        let stack = ResolutionStack::new()
            .pushed(Frame::Key(BindingKey::new("root")))
            .pushed(Frame::Class(TypeInfo::of::<ClassOne>()))
            .pushed(Frame::Key(BindingKey::new("class_two")));

        let path = stack.path_to(Frame::Class(TypeInfo::of::<ClassOne>()));

        assert_eq!(
            path,
            [
                Frame::Key(BindingKey::new("root")),
                Frame::Class(TypeInfo::of::<ClassOne>()),
                Frame::Key(BindingKey::new("class_two")),
                Frame::Class(TypeInfo::of::<ClassOne>()),
            ]
        );
    }

    #[test]
    fn test_siblings_share_parent() {
        let parent = ResolutionStack::new().pushed(Frame::Key(BindingKey::new("root")));
        let first = parent.pushed(Frame::Key(BindingKey::new("foo")));
        let second = parent.pushed(Frame::Key(BindingKey::new("bar")));

        assert_eq!(
            first.frames(),
            [Frame::Key(BindingKey::new("root")), Frame::Key(BindingKey::new("foo"))]
        );
        assert!(!second.contains(&Frame::Key(BindingKey::new("foo"))));
        assert_eq!(parent.len(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(Frame::Key(BindingKey::new("foo")).to_string(), "\"foo\"");
        assert_eq!(Frame::Key(BindingKey::annotated("foo", "bar")).to_string(), "\"foo\" @ \"bar\"");
        assert_eq!(Frame::Class(TypeInfo::of::<ClassOne>()).to_string(), "ClassOne");
    }
}
