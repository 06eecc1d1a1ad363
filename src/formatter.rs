//! Per-error formatters.
//!
//! Every [`Error`] carries a [`FormatterRef`] that decides how that single
//! error is written. The formatter prints the error through a [`Printer`],
//! asks the printer whether detailed output is wanted, and returns the next
//! error of the chain (usually the wrapped cause). The surrounding chain walk
//! lives in [`printer`](crate::printer).
//!
//! # Custom formatters
//!
//! ```
//! use aerrors::{
//!     Error,
//!     formatter::{Formatter, FormatterRef},
//!     printer::Printer,
//! };
//!
//! struct Shouting;
//!
//! impl Formatter for Shouting {
//!     fn format_error<'e>(
//!         &self,
//!         printer: &mut dyn Printer,
//!         error: &'e Error,
//!     ) -> Option<&'e (dyn core::error::Error + 'static)> {
//!         printer.print(format_args!("{}!", error.message().to_uppercase()));
//!         error.cause()
//!     }
//! }
//!
//! let err = Error::new("disk full").with_formatter(FormatterRef::new(Shouting));
//! assert_eq!(err.to_string(), "DISK FULL!");
//! ```

use core::{error::Error as StdError, fmt, ops::Deref};
use std::borrow::Cow;

use triomphe::Arc;
use unsize::CoerceUnsize;

use crate::{Error, printer::Printer};

/// Writes a single [`Error`] and selects the next link of its chain.
pub trait Formatter: 'static + Send + Sync {
    /// Prints `error` to `printer` and returns the next error to print, if
    /// any.
    ///
    /// Implementations should call [`Printer::detail`] before writing
    /// anything beyond the message.
    fn format_error<'e>(
        &self,
        printer: &mut dyn Printer,
        error: &'e Error,
    ) -> Option<&'e (dyn StdError + 'static)>;
}

/// The built-in formatter.
///
/// Compact output is the message alone, and the chain stops there. Detailed
/// output is the message followed by the priority, one `parent` line per
/// ancestor (nearest first), the callers and the values, each on its own
/// line, and the chain continues with the cause.
///
/// ```text
/// read config:
///     priority: Error
///     parent: load settings
///     callers: read_config:src/config.rs:12
///     path: /etc/app.toml
/// ```
#[derive(Clone, Debug)]
pub struct DefaultFormatter {
    separator: Cow<'static, str>,
    label_separator: Cow<'static, str>,
}

impl DefaultFormatter {
    /// One item per line, `label: value`.
    pub const DEFAULT: Self = Self {
        separator: Cow::Borrowed("\n"),
        label_separator: Cow::Borrowed(": "),
    };

    /// Creates a formatter that writes `separator` before every detail item
    /// and `label_separator` between a label and its value.
    pub fn new(
        separator: impl Into<Cow<'static, str>>,
        label_separator: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            separator: separator.into(),
            label_separator: label_separator.into(),
        }
    }
}

impl Default for DefaultFormatter {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Formatter for DefaultFormatter {
    fn format_error<'e>(
        &self,
        printer: &mut dyn Printer,
        error: &'e Error,
    ) -> Option<&'e (dyn StdError + 'static)> {
        printer.print(format_args!("{}", error.message()));
        if !printer.detail() {
            return None;
        }

        let sep = &*self.separator;
        let label_sep = &*self.label_separator;
        printer.print(format_args!("{sep}priority{label_sep}{}", error.priority()));
        for ancestor in error.ancestors() {
            printer.print(format_args!("{sep}parent{label_sep}{}", ancestor.message()));
        }
        printer.print(format_args!("{sep}callers{label_sep}{}", error.callers()));
        for value in error.values() {
            printer.print(format_args!(
                "{sep}{}{label_sep}{}",
                value.label(),
                value.value()
            ));
        }
        error.cause()
    }
}

static DEFAULT_FORMATTER: DefaultFormatter = DefaultFormatter::DEFAULT;

/// A shared handle to a [`Formatter`].
///
/// The default handle points at a static [`DefaultFormatter::DEFAULT`];
/// [`FormatterRef::new`] shares any other formatter.
#[derive(Clone)]
pub struct FormatterRef(Repr);

#[derive(Clone)]
enum Repr {
    Static(&'static dyn Formatter),
    Shared(Arc<dyn Formatter>),
}

impl FormatterRef {
    /// Shares `formatter`.
    pub fn new(formatter: impl Formatter) -> Self {
        let formatter = Arc::new(formatter).unsize(unsize::Coercion!(to dyn Formatter));
        Self(Repr::Shared(formatter))
    }

    /// Refers to a formatter with static storage.
    pub const fn from_static(formatter: &'static dyn Formatter) -> Self {
        Self(Repr::Static(formatter))
    }

    /// Whether both handles refer to the same formatter instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        core::ptr::addr_eq(&**self as *const dyn Formatter, &**other as *const dyn Formatter)
    }
}

impl Default for FormatterRef {
    fn default() -> Self {
        Self::from_static(&DEFAULT_FORMATTER)
    }
}

impl Deref for FormatterRef {
    type Target = dyn Formatter;

    fn deref(&self) -> &Self::Target {
        match &self.0 {
            Repr::Static(formatter) => *formatter,
            Repr::Shared(formatter) => &**formatter,
        }
    }
}

impl fmt::Debug for FormatterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.0 {
            Repr::Static(_) => "static",
            Repr::Shared(_) => "shared",
        };
        f.debug_tuple("FormatterRef").field(&kind).finish()
    }
}
