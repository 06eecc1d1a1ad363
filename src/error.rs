//! The error node.
//!
//! An [`Error`] is a shared handle to an immutable-identity node. Cloning the
//! handle never creates a new error: the clone and the original are the same
//! error for [`Error::is`], and annotations added through one handle are seen
//! through the other. [`Error::duplicate`] is the way to get a distinct error
//! with the same contents.
//!
//! # Parents and causes
//!
//! A node has two kinds of links:
//!
//! - the **parent**, set when a node is created with [`Error::child`] (or
//!   any other child constructor). Parents are the library's own notion of
//!   "this error happened while doing that". They are matched by
//!   [`Error::is`] and listed in detailed output, but they are not part of
//!   the [`source`](StdError::source) chain.
//! - the **cause**, set when a node wraps another error with
//!   [`Error::wrap`] or one of the `caused_by` constructors. The cause may be
//!   any error type and is returned by [`source`](StdError::source).
//!
//! ```
//! use aerrors::Error;
//!
//! let request = Error::new("handle request");
//! let io = std::io::Error::other("connection reset");
//! let err = request.child("read body").wrap(io);
//!
//! assert!(err.is(&request));
//! assert_eq!(err.message(), "read body");
//! assert_eq!(err.source().unwrap().to_string(), "connection reset");
//! # use core::error::Error as _;
//! ```

use core::{error::Error as StdError, fmt};
use std::borrow::Cow;

use chrono::{DateTime, TimeZone};
use spin::RwLock;
use triomphe::Arc;
use unsize::CoerceUnsize;

use crate::{
    Config, ErrOption, Priority, Value,
    formatter::FormatterRef,
    printer,
    stack::Stack,
};

/// A foreign error shared by every handle of the node wrapping it.
trait SharedCause: StdError + Send + Sync + 'static {}

impl<E: StdError + Send + Sync + 'static> SharedCause for E {}

type Cause = Arc<dyn SharedCause>;

fn share<E: StdError + Send + Sync + 'static>(cause: E) -> Cause {
    Arc::new(cause).unsize(unsize::Coercion!(to dyn SharedCause))
}

/// A structured error.
///
/// See the [module documentation](self) for the data model.
#[derive(Clone)]
pub struct Error {
    node: Arc<Node>,
}

struct Node {
    message: Cow<'static, str>,
    parent: Option<Error>,
    cause: Option<Cause>,
    stack: Stack,
    state: RwLock<State>,
}

/// The part of a node that can change after construction.
#[derive(Clone)]
struct State {
    priority: Priority,
    formatter: FormatterRef,
    values: Vec<Value>,
    child_config: Config,
}

pub(crate) fn message_from_args(args: fmt::Arguments<'_>) -> Cow<'static, str> {
    match args.as_str() {
        Some(message) => Cow::Borrowed(message),
        None => Cow::Owned(std::fmt::format(args)),
    }
}

impl Error {
    fn from_config(
        message: Cow<'static, str>,
        parent: Option<Self>,
        cause: Option<Cause>,
        values: Vec<Value>,
        config: Config,
    ) -> Self {
        let stack = Stack::capture(config.caller_depth, config.caller_skip);
        tracing::trace!(
            message = &*message,
            priority = config.priority.rank(),
            has_parent = parent.is_some(),
            has_cause = cause.is_some(),
            "created error"
        );
        let state = State {
            priority: config.priority,
            formatter: config.formatter.clone(),
            values,
            child_config: config.with_caller_skip(0),
        };
        Self {
            node: Arc::new(Node {
                message,
                parent,
                cause,
                stack,
                state: RwLock::new(state),
            }),
        }
    }

    fn spawn(
        &self,
        message: Cow<'static, str>,
        cause: Option<Cause>,
        options: impl IntoIterator<Item = ErrOption>,
    ) -> Self {
        let (values, config) = {
            let state = self.node.state.read();
            (state.values.clone(), state.child_config.clone())
        };
        let config = config.with_caller_skip(0).apply(options);
        Self::from_config(message, Some(self.clone()), cause, values, config)
    }

    /// Creates a root error from the global template.
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new_with(message, [])
    }

    /// Creates a root error from the global template with `options` applied.
    pub fn new_with(
        message: impl Into<Cow<'static, str>>,
        options: impl IntoIterator<Item = ErrOption>,
    ) -> Self {
        let config = Config::global().apply(options);
        Self::from_config(message.into(), None, None, Vec::new(), config)
    }

    /// Creates a root error from formatting arguments.
    ///
    /// This is what [`errorf!`](crate::errorf) expands to.
    pub fn from_fmt(args: fmt::Arguments<'_>) -> Self {
        Self::from_config(
            message_from_args(args),
            None,
            None,
            Vec::new(),
            Config::global(),
        )
    }

    /// Creates a root error wrapping `cause`.
    pub fn caused_by<E>(message: impl Into<Cow<'static, str>>, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::from_config(
            message.into(),
            None,
            Some(share(cause)),
            Vec::new(),
            Config::global(),
        )
    }

    /// Creates a child of this error.
    ///
    /// The child starts from this error's [`child_config`](Self::child_config)
    /// and a copy of its values.
    pub fn child(&self, message: impl Into<Cow<'static, str>>) -> Self {
        self.spawn(message.into(), None, [])
    }

    /// Creates a child of this error with `options` applied.
    pub fn child_with(
        &self,
        message: impl Into<Cow<'static, str>>,
        options: impl IntoIterator<Item = ErrOption>,
    ) -> Self {
        self.spawn(message.into(), None, options)
    }

    /// Creates a child of this error from formatting arguments.
    pub fn child_fmt(&self, args: fmt::Arguments<'_>) -> Self {
        self.spawn(message_from_args(args), None, [])
    }

    /// Creates a child of this error wrapping `cause`.
    pub fn child_caused_by<E>(&self, message: impl Into<Cow<'static, str>>, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.spawn(message.into(), Some(share(cause)), [])
    }

    /// Creates a child of this error that keeps this error's message and
    /// wraps `cause`.
    pub fn wrap<E>(&self, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.wrap_with(cause, [])
    }

    /// Like [`wrap`](Self::wrap), with `options` applied.
    pub fn wrap_with<E>(&self, cause: E, options: impl IntoIterator<Item = ErrOption>) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.spawn(self.node.message.clone(), Some(share(cause)), options)
    }

    /// Creates a distinct error with the same contents.
    ///
    /// The copy shares this error's parent and cause, and has its own values.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        let state = self.node.state.read().clone();
        Self {
            node: Arc::new(Node {
                message: self.node.message.clone(),
                parent: self.node.parent.clone(),
                cause: self.node.cause.clone(),
                stack: self.node.stack.clone(),
                state: RwLock::new(state),
            }),
        }
    }

    /// The message.
    pub fn message(&self) -> &str {
        &self.node.message
    }

    /// The error this one was created from with a child constructor.
    pub fn parent(&self) -> Option<&Self> {
        self.node.parent.as_ref()
    }

    /// The parents of this error, nearest first.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors {
            next: self.parent(),
        }
    }

    /// The wrapped error.
    pub fn cause(&self) -> Option<&(dyn StdError + 'static)> {
        let cause: &(dyn StdError + 'static) = self.node.cause.as_deref()?;
        Some(cause)
    }

    /// The call stack captured at construction.
    pub fn callers(&self) -> &Stack {
        &self.node.stack
    }

    /// Whether `candidate` is this error or one of its parents.
    ///
    /// Only identity counts: two errors built from the same message are
    /// different errors. Causes are not searched; use
    /// [`chain::is`](crate::chain::is) for that.
    pub fn is(&self, candidate: &(dyn StdError + 'static)) -> bool {
        let Some(candidate) = candidate.downcast_ref::<Self>() else {
            return false;
        };
        self.ptr_eq(candidate) || self.ancestors().any(|ancestor| ancestor.ptr_eq(candidate))
    }

    /// Whether both handles refer to the same error.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// The priority.
    pub fn priority(&self) -> Priority {
        self.node.state.read().priority
    }

    /// Sets the priority.
    #[must_use = "the error is returned for chaining; the change is made in place"]
    pub fn with_priority(self, priority: Priority) -> Self {
        self.node.state.write().priority = priority;
        self
    }

    /// The formatter.
    pub fn formatter(&self) -> FormatterRef {
        self.node.state.read().formatter.clone()
    }

    /// Sets the formatter.
    #[must_use = "the error is returned for chaining; the change is made in place"]
    pub fn with_formatter(self, formatter: FormatterRef) -> Self {
        self.node.state.write().formatter = formatter;
        self
    }

    /// The template for children of this error.
    pub fn child_config(&self) -> Config {
        self.node.state.read().child_config.clone()
    }

    /// Sets the template for children created after this call.
    #[must_use = "the error is returned for chaining; the change is made in place"]
    pub fn with_child_config(self, config: Config) -> Self {
        self.node.state.write().child_config = config;
        self
    }

    /// A snapshot of the values, in the order they were added.
    pub fn values(&self) -> Vec<Value> {
        self.node.state.read().values.clone()
    }

    /// Appends a value.
    #[must_use = "the error is returned for chaining; the change is made in place"]
    pub fn with_value(self, value: Value) -> Self {
        self.node.state.write().values.push(value);
        self
    }

    /// Appends values in order.
    #[must_use = "the error is returned for chaining; the change is made in place"]
    pub fn with_values(self, values: impl IntoIterator<Item = Value>) -> Self {
        self.node.state.write().values.extend(values);
        self
    }

    /// Appends a [`Value::string`].
    #[must_use = "the error is returned for chaining; the change is made in place"]
    pub fn with_string(
        self,
        label: impl Into<Cow<'static, str>>,
        value: impl Into<String>,
    ) -> Self {
        self.with_value(Value::string(label, value))
    }

    /// Appends a [`Value::display`].
    #[must_use = "the error is returned for chaining; the change is made in place"]
    pub fn with_display(self, label: impl Into<Cow<'static, str>>, value: &dyn fmt::Display) -> Self {
        self.with_value(Value::display(label, value))
    }

    /// Appends a [`Value::fmt`].
    #[must_use = "the error is returned for chaining; the change is made in place"]
    pub fn with_fmt(self, label: impl Into<Cow<'static, str>>, args: fmt::Arguments<'_>) -> Self {
        self.with_value(Value::fmt(label, args))
    }

    /// Appends a [`Value::bool`].
    #[must_use = "the error is returned for chaining; the change is made in place"]
    pub fn with_bool(self, label: impl Into<Cow<'static, str>>, value: bool) -> Self {
        self.with_value(Value::bool(label, value))
    }

    /// Appends a [`Value::bytes`].
    #[must_use = "the error is returned for chaining; the change is made in place"]
    pub fn with_bytes(self, label: impl Into<Cow<'static, str>>, value: &[u8]) -> Self {
        self.with_value(Value::bytes(label, value))
    }

    /// Appends a [`Value::byte`].
    #[must_use = "the error is returned for chaining; the change is made in place"]
    pub fn with_byte(self, label: impl Into<Cow<'static, str>>, value: u8) -> Self {
        self.with_value(Value::byte(label, value))
    }

    /// Appends a [`Value::char`].
    #[must_use = "the error is returned for chaining; the change is made in place"]
    pub fn with_char(self, label: impl Into<Cow<'static, str>>, value: char) -> Self {
        self.with_value(Value::char(label, value))
    }

    /// Appends a [`Value::f32`].
    #[must_use = "the error is returned for chaining; the change is made in place"]
    pub fn with_f32(self, label: impl Into<Cow<'static, str>>, value: f32) -> Self {
        self.with_value(Value::f32(label, value))
    }

    /// Appends a [`Value::f64`].
    #[must_use = "the error is returned for chaining; the change is made in place"]
    pub fn with_f64(self, label: impl Into<Cow<'static, str>>, value: f64) -> Self {
        self.with_value(Value::f64(label, value))
    }

    /// Appends a [`Value::time`].
    #[must_use = "the error is returned for chaining; the change is made in place"]
    pub fn with_time<Tz>(self, label: impl Into<Cow<'static, str>>, value: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        self.with_value(Value::time(label, value))
    }

    /// Appends a [`Value::utc_time`].
    #[must_use = "the error is returned for chaining; the change is made in place"]
    pub fn with_utc_time<Tz: TimeZone>(
        self,
        label: impl Into<Cow<'static, str>>,
        value: &DateTime<Tz>,
    ) -> Self {
        self.with_value(Value::utc_time(label, value))
    }

    /// Appends a [`Value::stack`] captured at the caller, skipping `skip`
    /// frames above it.
    #[must_use = "the error is returned for chaining; the change is made in place"]
    pub fn with_stack(self, skip: usize) -> Self {
        self.with_value(Value::stack(skip))
    }

    /// Appends a [`Value::stack_n`] captured at the caller.
    #[must_use = "the error is returned for chaining; the change is made in place"]
    pub fn with_stack_n(self, depth: usize, skip: usize) -> Self {
        self.with_value(Value::stack_n(depth, skip))
    }
}

macro_rules! integer_builders {
    ($($name:ident => $ctor:ident: $ty:ty),* $(,)?) => {
        impl Error {
            $(
                #[doc = concat!("Appends a [`Value::", stringify!($ctor), "`].")]
                #[must_use = "the error is returned for chaining; the change is made in place"]
                pub fn $name(self, label: impl Into<Cow<'static, str>>, value: $ty) -> Self {
                    self.with_value(Value::$ctor(label, value))
                }
            )*
        }
    };
}

integer_builders! {
    with_int => int: isize,
    with_i8 => i8: i8,
    with_i16 => i16: i16,
    with_i32 => i32: i32,
    with_i64 => i64: i64,
    with_uint => uint: usize,
    with_u8 => u8: u8,
    with_u16 => u16: u16,
    with_u32 => u32: u32,
    with_u64 => u64: u64,
}

/// The message followed by the rest of the chain, compactly.
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        printer::render(self, f, false)
    }
}

/// The detailed rendering of the error and its causes.
impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        printer::render(self, f, true)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause()
    }
}

/// Iterator over the parents of an [`Error`], created by
/// [`Error::ancestors`].
#[derive(Clone)]
pub struct Ancestors<'a> {
    next: Option<&'a Error>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Error;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}

impl core::iter::FusedIterator for Ancestors<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(Error: Send, Sync, Clone, StdError);
    static_assertions::assert_impl_all!(Ancestors<'static>: Send, Sync, Clone);

    fn quiet(message: &'static str) -> Error {
        Error::new_with(message, [ErrOption::depth(0)])
    }

    #[test]
    fn test_message_from_args() {
        assert!(matches!(
            message_from_args(format_args!("static")),
            Cow::Borrowed("static")
        ));
        let n = 3;
        assert_eq!(message_from_args(format_args!("n={n}")), "n=3");
    }

    #[test]
    fn test_clone_is_same_error() {
        let err = quiet("a");
        let handle = err.clone();
        assert!(err.ptr_eq(&handle));
        assert!(err.is(&handle));

        let handle = handle.with_int("k", 1);
        assert_eq!(err.values(), handle.values());
    }

    #[test]
    fn test_duplicate_is_new_error() {
        let parent = quiet("parent");
        let err = parent.child("a").with_bool("flag", true);
        let copy = err.duplicate();

        assert!(!copy.ptr_eq(&err));
        assert!(!copy.is(&err));
        assert!(copy.is(&parent));
        assert_eq!(copy.message(), "a");
        assert_eq!(copy.values(), err.values());

        let copy = copy.with_int("extra", 1);
        assert_eq!(err.values().len(), 1);
        assert_eq!(copy.values().len(), 2);
    }

    #[test]
    fn test_child_inherits() {
        let parent = quiet("parent")
            .with_priority(Priority::CRITICAL)
            .with_string("request", "42");
        let child = parent.child("child");

        assert!(child.parent().is_some_and(|p| p.ptr_eq(&parent)));
        assert_eq!(child.values(), parent.values());
        // Priority comes from the child config, not from the parent itself.
        assert_eq!(child.priority(), Priority::ERROR);
        assert!(child.callers().is_empty());
    }

    #[test]
    fn test_child_values_are_independent() {
        let parent = quiet("parent").with_int("a", 1);
        let child = parent.child("child").with_int("b", 2);
        let parent = parent.with_int("c", 3);

        let labels = |err: &Error| {
            err.values()
                .iter()
                .map(|value| value.label().to_owned())
                .collect::<Vec<_>>()
        };
        assert_eq!(labels(&parent), ["a", "c"]);
        assert_eq!(labels(&child), ["a", "b"]);
    }

    #[test]
    fn test_child_config() {
        let parent = quiet("parent")
            .with_child_config(Config::new().with_priority(Priority::INFO).with_caller_depth(0));
        let child = parent.child("child");
        assert_eq!(child.priority(), Priority::INFO);
        assert_eq!(child.child_config().priority, Priority::INFO);

        let loud = parent.child_with("loud", [ErrOption::from(Priority::ALERT)]);
        assert_eq!(loud.priority(), Priority::ALERT);
        assert_eq!(loud.child_config().priority, Priority::ALERT);
    }

    #[test]
    fn test_child_options_leave_parent_untouched() {
        let parent = quiet("parent");
        let child = parent.child_with("child", [Priority::INFO.into(), ErrOption::depth(0)]);

        assert_eq!(child.priority(), Priority::INFO);
        assert_eq!(child.parent().map(Error::priority), Some(Priority::ERROR));
        assert_eq!(parent.priority(), Priority::ERROR);
        assert_eq!(parent.child_config().priority, Priority::ERROR);
        assert_eq!(parent.child_config().caller_depth, 0);
    }

    #[test]
    fn test_child_config_clears_skip() {
        let err = Error::new_with("skipping", [ErrOption::depth(0), ErrOption::skip(4)]);
        assert_eq!(err.child_config().caller_skip, 0);

        let child = err.child_with("child", [ErrOption::skip(2)]);
        assert_eq!(child.child_config().caller_skip, 0);
    }

    #[test]
    fn test_wrap_keeps_message() {
        let err = quiet("open config");
        let wrapped = err.wrap(std::io::Error::other("no such file"));

        assert_eq!(wrapped.message(), "open config");
        assert!(wrapped.is(&err));
        assert!(err.cause().is_none());
        assert_eq!(
            wrapped.source().map(ToString::to_string).as_deref(),
            Some("no such file")
        );
    }

    #[test]
    fn test_is_follows_parents_only() {
        let root = quiet("root");
        let child = root.child("child");
        let grandchild = child.child("grandchild");
        let unrelated = quiet("root");

        assert!(grandchild.is(&grandchild));
        assert!(grandchild.is(&child));
        assert!(grandchild.is(&root));
        assert!(!root.is(&child));
        assert!(!grandchild.is(&unrelated));

        let wrapper = unrelated.wrap(root.clone());
        assert!(!wrapper.is(&root));
        assert!(!grandchild.is(&std::io::Error::other("root")));
    }

    #[test]
    fn test_ancestors() {
        let root = quiet("root");
        let err = root.child("a").child("b").child("c");
        let messages: Vec<&str> = err.ancestors().map(Error::message).collect();
        assert_eq!(messages, ["b", "a", "root"]);
        assert_eq!(root.ancestors().count(), 0);
    }

    #[test]
    fn test_typed_builders_append_in_order() {
        let err = quiet("typed")
            .with_string("s", "x")
            .with_bool("b", false)
            .with_bytes("bs", &[0xde, 0xad])
            .with_byte("c", b'z')
            .with_char("ch", 'q')
            .with_int("i", -1)
            .with_i8("i8", 8)
            .with_i16("i16", 16)
            .with_i32("i32", 32)
            .with_i64("i64", 64)
            .with_uint("u", 1)
            .with_u8("u8", 8)
            .with_u16("u16", 16)
            .with_u32("u32", 32)
            .with_u64("u64", 64)
            .with_f32("f32", 0.5)
            .with_f64("f64", 2.25)
            .with_display("d", &7)
            .with_fmt("f", format_args!("{}-{}", 1, 2));

        let rendered: Vec<String> = err.values().iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            [
                "s: x", "b: false", "bs: 0xdead", "c: 0x7a", "ch: q", "i: -1", "i8: 8", "i16: 16",
                "i32: 32", "i64: 64", "u: 1", "u8: 8", "u16: 16", "u32: 32", "u64: 64",
                "f32: 0.5", "f64: 2.25", "d: 7", "f: 1-2",
            ]
        );
    }

    #[test]
    fn test_with_values() {
        let err = quiet("bulk").with_values([Value::int("a", 1), Value::int("b", 2)]);
        assert_eq!(err.values().len(), 2);
        assert_eq!(err.values()[1].label(), "b");
    }

    #[test]
    fn test_concurrent_reads() {
        let err = quiet("shared").child("child").with_int("n", 1);
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    assert_eq!(err.message(), "child");
                    assert_eq!(err.to_string(), "child");
                    assert_eq!(err.ancestors().count(), 1);
                });
            }
        });
    }
}
