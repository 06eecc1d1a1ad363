//! Integration with [`anyhow`] 1.x.
//!
//! ```
//! use aerrors::{
//!     Error,
//!     compat::{
//!         IntoAerror,
//!         anyhow1::{AnyhowExt, IntoAnyhow},
//!     },
//! };
//!
//! fn legacy() -> anyhow::Result<()> {
//!     anyhow::bail!("legacy failure")
//! }
//!
//! let err: Error = legacy().into_aerror().unwrap_err();
//! assert_eq!(err.message(), "legacy failure");
//!
//! let original = Error::new("structured");
//! let converted: anyhow::Error = original.clone().into_anyhow();
//! assert!(converted.as_aerror().is_some_and(|err| err.ptr_eq(&original)));
//! ```

use crate::{Error, compat::IntoAerror};

/// Finds [`Error`]s inside [`anyhow::Error`]s.
pub trait AnyhowExt {
    /// The first [`Error`] in the chain, if any.
    fn as_aerror(&self) -> Option<&Error>;
}

impl AnyhowExt for anyhow::Error {
    fn as_aerror(&self) -> Option<&Error> {
        self.chain().find_map(|link| link.downcast_ref::<Error>())
    }
}

impl IntoAerror for anyhow::Error {
    type Output = Error;

    fn into_aerror(self) -> Error {
        match self.downcast::<Error>() {
            Ok(err) => err,
            Err(other) => {
                let boxed: Box<dyn core::error::Error + Send + Sync + 'static> = other.into();
                boxed.into_aerror()
            }
        }
    }
}

impl<T> IntoAerror for Result<T, anyhow::Error> {
    type Output = Result<T, Error>;

    fn into_aerror(self) -> Self::Output {
        self.map_err(IntoAerror::into_aerror)
    }
}

/// Converts [`Error`]s into [`anyhow::Error`]s.
pub trait IntoAnyhow {
    /// [`anyhow::Error`] for errors, [`anyhow::Result<T>`] for results.
    type Output;

    /// Converts this value.
    fn into_anyhow(self) -> Self::Output;
}

impl IntoAnyhow for Error {
    type Output = anyhow::Error;

    fn into_anyhow(self) -> anyhow::Error {
        anyhow::Error::new(self)
    }
}

impl<T> IntoAnyhow for Result<T, Error> {
    type Output = anyhow::Result<T>;

    fn into_anyhow(self) -> Self::Output {
        self.map_err(IntoAnyhow::into_anyhow)
    }
}
