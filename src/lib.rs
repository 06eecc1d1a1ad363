#![deny(
    missing_docs,
    unsafe_code,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    unused_doc_comments
)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Structured errors with priorities, call-stack snapshots, parent chains and
//! labeled annotations.
//!
//! ## Overview
//!
//! An [`Error`] carries:
//! - a human-readable **message**,
//! - a **[`Priority`]** ranking its severity,
//! - a **stack snapshot** of its callers, captured when it was created,
//! - an optional **parent**, the error it was derived from,
//! - an optional **cause**, any error it wraps,
//! - an ordered list of labeled **[`Value`]s**.
//!
//! ## Quick Example
//!
//! ```
//! use aerrors::{Error, Priority, errorf};
//!
//! fn load(path: &str) -> Result<String, Error> {
//!     std::fs::read_to_string(path).map_err(|io| {
//!         errorf!("read {path}: {}"; io)
//!             .with_priority(Priority::CRITICAL)
//!             .with_string("path", path)
//!     })
//! }
//!
//! let err = load("/definitely/not/here").unwrap_err();
//! assert!(err.message().starts_with("read /definitely/not/here: "));
//! assert_eq!(err.priority(), Priority::CRITICAL);
//! ```
//!
//! ## Parents and children
//!
//! A **child** is created from an existing error with [`Error::child`] or
//! [`errorf!`]`(parent => ...)`. It links back to its parent, starts from a
//! copy of the parent's values, and is configured by the parent's
//! [`child_config`](Error::child_config). Identity probing with
//! [`Error::is`] follows parent links, so a package can export one root
//! error and match every error derived from it:
//!
//! ```
//! use std::sync::LazyLock;
//!
//! use aerrors::{Error, errorf};
//!
//! static NOT_FOUND: LazyLock<Error> = LazyLock::new(|| Error::new("not found"));
//!
//! fn lookup(key: &str) -> Result<u32, Error> {
//!     Err(errorf!(*NOT_FOUND => "no entry for {key:?}"))
//! }
//!
//! let err = lookup("answer").unwrap_err();
//! assert!(err.is(&*NOT_FOUND));
//! assert_eq!(err.message(), r#"no entry for "answer""#);
//! ```
//!
//! [`Error::wrap`] creates a child that keeps the parent's message and wraps
//! a foreign error as its cause. The cause is what
//! [`source`](core::error::Error::source) returns, so the [`chain`] helpers
//! and other error libraries can look through it.
//!
//! ## Configuration
//!
//! Every error is built from a [`Config`]: root errors from
//! [`Config::global`], children from their parent's child config. Per-call
//! [`ErrOption`]s override single settings:
//!
//! ```
//! use aerrors::{ErrOption, Error, Priority};
//!
//! let err = Error::new_with("cache miss", [Priority::DEBUG.into(), ErrOption::depth(4)]);
//! assert_eq!(err.priority(), Priority::DEBUG);
//! assert!(err.callers().len() <= 4);
//! ```
//!
//! ## Formatting
//!
//! [`Display`](core::fmt::Display) prints the message alone.
//! [`Debug`](core::fmt::Debug) prints every error in the chain in detail,
//! using each error's [`Formatter`](formatter::Formatter). See [`printer`]
//! for the layout and [`formatter`] for writing your own.
//!
//! ## Logging
//!
//! The library emits [`tracing`] events: `debug` when process-wide settings
//! change and `trace` for every created error and stack capture.

mod config;
mod error;
#[macro_use]
mod macros;
mod option;
mod value;

pub mod chain;
pub mod compat;
pub mod formatter;
pub mod prelude;
pub mod printer;
pub mod priority;
pub mod stack;

pub use self::{
    chain::as_error,
    config::Config,
    error::{Ancestors, Error},
    option::ErrOption,
    priority::Priority,
    value::{STACK_LABEL, Value},
};

/// A [`Result`](core::result::Result) type alias where the error defaults to
/// [`Error`].
///
/// ```
/// use aerrors::{Result, bail};
///
/// fn parse_flag(flag: &str) -> Result<bool> {
///     match flag {
///         "on" => Ok(true),
///         "off" => Ok(false),
///         _ => bail!("unknown flag {flag:?}"),
///     }
/// }
///
/// assert!(parse_flag("on").unwrap());
/// assert!(parse_flag("maybe").is_err());
/// ```
pub type Result<T, E = Error> = core::result::Result<T, E>;

#[doc(hidden)]
pub mod __private {
    use core::fmt;
    use std::borrow::Cow;

    #[doc(hidden)]
    pub use core::{format_args, result::Result::Err};

    #[doc(hidden)]
    #[inline]
    #[must_use]
    pub fn message(args: fmt::Arguments<'_>) -> Cow<'static, str> {
        crate::error::message_from_args(args)
    }
}
