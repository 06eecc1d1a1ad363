//! Construction options.

use core::fmt;

use crate::{
    Config, Priority,
    formatter::{Formatter, FormatterRef},
};

/// A single override applied to a [`Config`] while constructing an error.
///
/// ```
/// use aerrors::{ErrOption, Error, Priority};
///
/// let err = Error::new_with(
///     "quota exceeded",
///     [ErrOption::from(Priority::WARNING), ErrOption::depth(0)],
/// );
/// assert_eq!(err.priority(), Priority::WARNING);
/// assert!(err.callers().is_empty());
/// ```
#[derive(Clone)]
pub enum ErrOption {
    /// Sets [`Config::priority`].
    Priority(Priority),
    /// Sets [`Config::caller_depth`].
    CallerDepth(usize),
    /// Sets [`Config::caller_skip`].
    CallerSkip(usize),
    /// Sets [`Config::formatter`].
    Formatter(FormatterRef),
}

impl ErrOption {
    /// Captures up to `depth` caller frames.
    pub const fn depth(depth: usize) -> Self {
        Self::CallerDepth(depth)
    }

    /// Skips `skip` frames above the caller when capturing.
    pub const fn skip(skip: usize) -> Self {
        Self::CallerSkip(skip)
    }

    /// Formats the error with `formatter`.
    pub fn formatter(formatter: impl Formatter) -> Self {
        Self::Formatter(FormatterRef::new(formatter))
    }

    /// Writes this option into `config`.
    pub fn apply(self, config: &mut Config) {
        match self {
            Self::Priority(priority) => config.priority = priority,
            Self::CallerDepth(depth) => config.caller_depth = depth,
            Self::CallerSkip(skip) => config.caller_skip = skip,
            Self::Formatter(formatter) => config.formatter = formatter,
        }
    }
}

impl From<Priority> for ErrOption {
    fn from(priority: Priority) -> Self {
        Self::Priority(priority)
    }
}

impl From<FormatterRef> for ErrOption {
    fn from(formatter: FormatterRef) -> Self {
        Self::Formatter(formatter)
    }
}

impl fmt::Debug for ErrOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Priority(priority) => f.debug_tuple("Priority").field(priority).finish(),
            Self::CallerDepth(depth) => f.debug_tuple("CallerDepth").field(depth).finish(),
            Self::CallerSkip(skip) => f.debug_tuple("CallerSkip").field(skip).finish(),
            Self::Formatter(formatter) => f.debug_tuple("Formatter").field(formatter).finish(),
        }
    }
}
