//! Integration with [`eyre`] 0.6.x.
//!
//! Works like [`anyhow1`](super::anyhow1). Creating an [`eyre::Report`]
//! needs an eyre handler, which is installed automatically when eyre's
//! `auto-install` feature is on.

use crate::{Error, compat::IntoAerror};

/// Finds [`Error`]s inside [`eyre::Report`]s.
pub trait EyreExt {
    /// The first [`Error`] in the chain, if any.
    fn as_aerror(&self) -> Option<&Error>;
}

impl EyreExt for eyre::Report {
    fn as_aerror(&self) -> Option<&Error> {
        self.chain().find_map(|link| link.downcast_ref::<Error>())
    }
}

impl IntoAerror for eyre::Report {
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

impl<T> IntoAerror for Result<T, eyre::Report> {
    type Output = Result<T, Error>;

    fn into_aerror(self) -> Self::Output {
        self.map_err(IntoAerror::into_aerror)
    }
}

/// Converts [`Error`]s into [`eyre::Report`]s.
pub trait IntoEyre {
    /// [`eyre::Report`] for errors, [`eyre::Result<T>`] for results.
    type Output;

    /// Converts this value.
    fn into_eyre(self) -> Self::Output;
}

impl IntoEyre for Error {
    type Output = eyre::Report;

    fn into_eyre(self) -> eyre::Report {
        eyre::Report::new(self)
    }
}

impl<T> IntoEyre for Result<T, Error> {
    type Output = eyre::Result<T>;

    fn into_eyre(self) -> Self::Output {
        self.map_err(IntoEyre::into_eyre)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_keeps_identity() {
        let err = Error::new("structured");
        let back = err.clone().into_eyre().into_aerror();
        assert!(back.ptr_eq(&err));
    }

    #[test]
    fn test_foreign_becomes_cause() {
        let err: Result<(), _> = Err(eyre::eyre!("eyre failure"));
        let err = err.into_aerror().unwrap_err();
        assert_eq!(err.message(), "eyre failure");
        assert!(err.cause().is_some());
    }

    #[test]
    fn test_as_aerror() {
        let err = Error::new("inner");
        let report = err.clone().into_eyre().wrap_err("outer");
        assert!(report.as_aerror().is_some_and(|found| found.ptr_eq(&err)));
    }
}
