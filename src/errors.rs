mod call;
mod inject;
mod resolve;

pub use call::CallErrorKind;
pub use inject::InjectErrorKind;
pub use resolve::ResolveErrorKind;

use core::fmt::{self, Display, Formatter};

/// Displays items separated by `sep`
pub(crate) struct Joined<'a, T>(pub(crate) &'a [T], pub(crate) &'static str);

impl<T: Display> Display for Joined<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut iter = self.0.iter();
        if let Some(first) = iter.next() {
            write!(f, "{first}")?;
        }
        for item in iter {
            write!(f, "{}{item}", self.1)?;
        }
        Ok(())
    }
}
