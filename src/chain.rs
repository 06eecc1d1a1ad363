//! Walking [`source`](StdError::source) chains.
//!
//! These helpers work on any error, so they can look through foreign
//! wrappers to find an [`Error`] and through an [`Error`]'s cause to find a
//! foreign error.
//!
//! ```
//! use aerrors::{Error, chain};
//!
//! #[derive(Debug)]
//! struct Timeout;
//!
//! impl std::fmt::Display for Timeout {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         f.write_str("timed out")
//!     }
//! }
//!
//! impl std::error::Error for Timeout {}
//!
//! let err = Error::new("poll").wrap(Timeout);
//! assert!(chain::find::<Timeout>(&err).is_some());
//! assert_eq!(chain::Chain::new(&err).count(), 2);
//! ```

use core::error::Error as StdError;

use crate::Error;

/// Iterator over an error and its transitive sources.
#[derive(Clone)]
pub struct Chain<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
}

impl<'a> Chain<'a> {
    /// Starts at `head`.
    pub fn new(head: &'a (dyn StdError + 'static)) -> Self {
        Self { next: Some(head) }
    }
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

impl core::iter::FusedIterator for Chain<'_> {}

/// The first error of type `T` in the chain of `error`.
pub fn find<'a, T: StdError + 'static>(error: &'a (dyn StdError + 'static)) -> Option<&'a T> {
    Chain::new(error).find_map(|link| link.downcast_ref::<T>())
}

/// The first [`Error`] in the chain of `error`.
pub fn as_error<'a>(error: &'a (dyn StdError + 'static)) -> Option<&'a Error> {
    find::<Error>(error)
}

/// Whether `target` is in the chain of `error`.
///
/// A link matches when it is the very same object as `target`, or when it is
/// an [`Error`] for which [`Error::is`] holds, which makes parents match too.
pub fn is(error: &(dyn StdError + 'static), target: &(dyn StdError + 'static)) -> bool {
    Chain::new(error).any(|link| {
        core::ptr::addr_eq(link, target)
            || link.downcast_ref::<Error>().is_some_and(|node| node.is(target))
    })
}
