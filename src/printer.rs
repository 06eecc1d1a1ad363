//! Printing errors and their chains.
//!
//! [`render`] walks a chain of errors. For every [`Error`] in the chain it
//! lets that error's [`Formatter`](crate::formatter::Formatter) print it and
//! pick the next link; any other error is printed with its
//! [`Display`](fmt::Display) implementation and, in detailed mode, followed
//! through [`source`](StdError::source).
//!
//! Links are separated by `": "` in compact mode and by a new line starting
//! with `"  - "` in detailed mode. In detailed mode, the first call to
//! [`Printer::detail`] writes a `:` after the message, and everything printed
//! after it is indented by four spaces on every new line.

use core::{
    error::Error as StdError,
    fmt::{self, Write as _},
};

use crate::Error;

/// The sink a [`Formatter`](crate::formatter::Formatter) writes to.
pub trait Printer {
    /// Writes formatted text.
    fn print(&mut self, args: fmt::Arguments<'_>);

    /// Reports whether detailed output is wanted.
    ///
    /// Formatters call this once they have printed the short form of an
    /// error. Printers may emit a transition marker on the first call.
    fn detail(&mut self) -> bool;
}

const COMPACT_LINK: &str = ": ";
const DETAILED_LINK: &str = "\n  - ";
const DETAIL_INDENT: &str = "\n    ";

/// A [`Printer`] over a [`fmt::Formatter`].
struct FmtPrinter<'a, 'b> {
    out: &'a mut fmt::Formatter<'b>,
    detailed: bool,
    in_detail: bool,
    result: fmt::Result,
}

impl<'a, 'b> FmtPrinter<'a, 'b> {
    fn new(out: &'a mut fmt::Formatter<'b>, detailed: bool) -> Self {
        Self {
            out,
            detailed,
            in_detail: false,
            result: Ok(()),
        }
    }

    fn finish(self) -> fmt::Result {
        self.result
    }
}

impl Printer for FmtPrinter<'_, '_> {
    fn print(&mut self, args: fmt::Arguments<'_>) {
        if self.result.is_err() {
            return;
        }
        self.result = if self.in_detail {
            Indented { out: &mut *self.out }.write_fmt(args)
        } else {
            self.out.write_fmt(args)
        };
    }

    fn detail(&mut self) -> bool {
        if self.detailed && !self.in_detail {
            self.in_detail = true;
            if self.result.is_ok() {
                self.result = self.out.write_str(":");
            }
        }
        self.detailed
    }
}

struct Indented<'a, 'b> {
    out: &'a mut fmt::Formatter<'b>,
}

impl fmt::Write for Indented<'_, '_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut lines = s.split('\n');
        if let Some(first) = lines.next() {
            self.out.write_str(first)?;
        }
        for line in lines {
            self.out.write_str(DETAIL_INDENT)?;
            self.out.write_str(line)?;
        }
        Ok(())
    }
}

/// Writes `error` and the errors it leads to.
pub fn render(
    error: &(dyn StdError + 'static),
    f: &mut fmt::Formatter<'_>,
    detailed: bool,
) -> fmt::Result {
    let mut next = Some(error);
    let mut first = true;
    while let Some(link) = next {
        if !first {
            f.write_str(if detailed { DETAILED_LINK } else { COMPACT_LINK })?;
        }
        first = false;

        next = match link.downcast_ref::<Error>() {
            Some(node) => {
                let formatter = node.formatter();
                let mut printer = FmtPrinter::new(f, detailed);
                let next = formatter.format_error(&mut printer, node);
                printer.finish()?;
                next
            }
            None => {
                write!(f, "{link}")?;
                if detailed { link.source() } else { None }
            }
        };
    }
    Ok(())
}

/// A [`Display`](fmt::Display) adapter produced by [`compact`] and
/// [`detailed`].
#[derive(Copy, Clone)]
pub struct Render<'a> {
    error: &'a (dyn StdError + 'static),
    detailed: bool,
}

/// Displays `error` in compact mode.
pub fn compact<'a>(error: &'a (dyn StdError + 'static)) -> Render<'a> {
    Render {
        error,
        detailed: false,
    }
}

/// Displays `error` in detailed mode.
///
/// ```
/// use aerrors::{Error, printer};
///
/// let io = std::io::Error::other("connection reset");
/// let err = Error::new_with("fetch", [aerrors::ErrOption::depth(0)]).wrap(io);
/// let text = printer::detailed(&err).to_string();
/// assert!(text.starts_with("fetch:\n    priority: Error\n    parent: fetch\n"));
/// assert!(text.ends_with("\n  - connection reset"));
/// ```
pub fn detailed<'a>(error: &'a (dyn StdError + 'static)) -> Render<'a> {
    Render {
        error,
        detailed: true,
    }
}

impl fmt::Display for Render<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(self.error, f, self.detailed)
    }
}

impl fmt::Debug for Render<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(self.error, f, self.detailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted<F>(F);

    impl<F: Fn(&mut dyn Printer)> fmt::Display for Scripted<F> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let detailed = f.alternate();
            let mut printer = FmtPrinter::new(f, detailed);
            (self.0)(&mut printer);
            printer.finish()
        }
    }

    #[test]
    fn test_compact_printer_ignores_detail() {
        let scripted = Scripted(|p: &mut dyn Printer| {
            p.print(format_args!("head"));
            assert!(!p.detail());
            p.print(format_args!("\ntail"));
        });
        assert_eq!(scripted.to_string(), "head\ntail");
    }

    #[test]
    fn test_detailed_printer_marks_and_indents() {
        let scripted = Scripted(|p: &mut dyn Printer| {
            p.print(format_args!("head\nstill head"));
            assert!(p.detail());
            assert!(p.detail());
            p.print(format_args!("\na\nb"));
        });
        assert_eq!(format!("{scripted:#}"), "head\nstill head:\n    a\n    b");
    }

    #[derive(Debug)]
    struct Leaf;

    impl fmt::Display for Leaf {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("leaf")
        }
    }

    impl StdError for Leaf {}

    #[derive(Debug)]
    struct Outer(Leaf);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("outer")
        }
    }

    impl StdError for Outer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_foreign_chain() {
        let err = Outer(Leaf);
        assert_eq!(compact(&err).to_string(), "outer");
        assert_eq!(detailed(&err).to_string(), "outer\n  - leaf");
    }
}
