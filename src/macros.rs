/// Creates an [`Error`](crate::Error) from a format string.
///
/// The macro has four forms:
///
/// - `errorf!("fmt", args...)` creates a root error.
/// - `errorf!("fmt", args... ; cause)` creates a root error wrapping `cause`.
///   The cause is also passed as the last format argument, so the format
///   string usually ends with `{}`.
/// - `errorf!(parent => "fmt", args...)` creates a child of `parent`.
/// - `errorf!(parent => "fmt", args... ; cause)` creates a child of `parent`
///   wrapping `cause`.
///
/// When the format string has no arguments, the message is not allocated.
///
/// # Examples
///
/// ```
/// use aerrors::{Error, errorf};
///
/// let port = 8080;
/// let err = errorf!("bind port {port}");
/// assert_eq!(err.message(), "bind port 8080");
///
/// let io = std::io::Error::other("address in use");
/// let wrapped = errorf!("bind port {}: {}", port; io);
/// assert_eq!(wrapped.message(), "bind port 8080: address in use");
/// assert!(wrapped.cause().is_some());
///
/// let child = errorf!(err => "retry {}", 2);
/// assert!(child.is(&err));
/// ```
#[macro_export]
macro_rules! errorf {
    ($fmt:literal $(, $arg:expr)* ; $cause:expr $(,)?) => {{
        let cause = $cause;
        let message = $crate::__private::message($crate::__private::format_args!(
            $fmt $(, $arg)*, cause
        ));
        $crate::Error::caused_by(message, cause)
    }};
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::Error::from_fmt($crate::__private::format_args!($fmt $(, $arg)*))
    };
    ($parent:expr => $fmt:literal $(, $arg:expr)* ; $cause:expr $(,)?) => {{
        let cause = $cause;
        let message = $crate::__private::message($crate::__private::format_args!(
            $fmt $(, $arg)*, cause
        ));
        $crate::Error::child_caused_by(&$parent, message, cause)
    }};
    ($parent:expr => $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::Error::child_fmt(&$parent, $crate::__private::format_args!($fmt $(, $arg)*))
    };
}

/// Returns early with an error.
///
/// Takes the same arguments as [`errorf!`] and is equivalent to writing
/// `return Err(errorf!(...).into());`.
///
/// ```
/// use aerrors::{Result, bail};
///
/// fn check_port(port: u32) -> Result<u16> {
///     if port > u32::from(u16::MAX) {
///         bail!("port {port} out of range");
///     }
///     Ok(port as u16)
/// }
///
/// assert_eq!(check_port(70000).unwrap_err().message(), "port 70000 out of range");
/// ```
#[macro_export]
macro_rules! bail {
    ($($args:tt)*) => {
        return $crate::__private::Err($crate::errorf!($($args)*).into())
    };
}
