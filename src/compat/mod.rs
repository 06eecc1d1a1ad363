//! Interoperability with other error handling libraries.
//!
//! - [`anyhow1`]: the `anyhow` 1.x library (feature `compat-anyhow1`)
//! - [`eyre06`]: the `eyre` 0.6.x library (feature `compat-eyre06`)
//!
//! Boxed error trait objects convert through [`IntoAerror`] without any
//! feature. Every integration converts in both directions. An [`Error`]
//! converted to a foreign error and back is the same error again; any other
//! foreign error becomes the cause of a new root [`Error`] carrying its
//! message.

use core::{error::Error as StdError, fmt};

use crate::Error;

/// Converts foreign errors into [`Error`]s.
///
/// Implemented for foreign error types, and for `Result`s holding them.
pub trait IntoAerror {
    /// [`Error`] for error types, `Result<T, Error>` for results.
    type Output;

    /// Converts this value.
    fn into_aerror(self) -> Self::Output;
}

/// A type-erased foreign error kept as the cause of an [`Error`].
///
/// Displays and chains exactly like the error it holds.
pub struct ForeignError(Box<dyn StdError + Send + Sync + 'static>);

impl ForeignError {
    /// Wraps a boxed error.
    pub fn new(error: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        Self(error)
    }

    /// The held error.
    pub fn get_ref(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.0
    }
}

impl fmt::Debug for ForeignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ForeignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for ForeignError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

/// A boxed [`Error`] is unboxed; any other boxed error becomes the cause of a
/// new root [`Error`] with the same message.
impl IntoAerror for Box<dyn StdError + Send + Sync + 'static> {
    type Output = Error;

    fn into_aerror(self) -> Error {
        match self.downcast::<Error>() {
            Ok(err) => *err,
            Err(other) => {
                let message = other.to_string();
                Error::caused_by(message, ForeignError::new(other))
            }
        }
    }
}

impl<T> IntoAerror for Result<T, Box<dyn StdError + Send + Sync + 'static>> {
    type Output = Result<T, Error>;

    fn into_aerror(self) -> Self::Output {
        self.map_err(IntoAerror::into_aerror)
    }
}

#[cfg(feature = "compat-anyhow1")]
#[cfg_attr(docsrs, doc(cfg(feature = "compat-anyhow1")))]
pub mod anyhow1;

#[cfg(feature = "compat-eyre06")]
#[cfg_attr(docsrs, doc(cfg(feature = "compat-eyre06")))]
pub mod eyre06;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxed_error_is_unboxed() {
        let original = Error::new("structured");
        let boxed: Box<dyn StdError + Send + Sync> = Box::new(original.clone());
        assert!(boxed.into_aerror().ptr_eq(&original));
    }

    #[test]
    fn test_foreign_error_delegates() {
        let io: Box<dyn StdError + Send + Sync> = Box::new(std::io::Error::other("broken pipe"));
        let err = io.into_aerror();
        assert_eq!(err.message(), "broken pipe");
        assert_eq!(crate::printer::compact(&err).to_string(), "broken pipe");

        let cause = err.cause().and_then(|cause| cause.downcast_ref::<ForeignError>());
        assert!(cause.is_some_and(|cause| cause.get_ref().is::<std::io::Error>()));
    }
}
