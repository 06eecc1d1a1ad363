//! Error priorities.
//!
//! A [`Priority`] is an integer rank where a smaller rank is more severe.
//! Eight levels are built in, from [`Priority::EMERGENCY`] (rank 0) to
//! [`Priority::DEBUG`] (rank 7), but any rank is a valid priority.
//!
//! Display names come from a process-wide registry. Unregistered ranks are
//! displayed as `ErrorPriority(<rank>)`:
//!
//! ```
//! use aerrors::priority::{Priority, register_priority_name};
//!
//! const AUDIT: Priority = Priority::new(10);
//!
//! assert_eq!(AUDIT.to_string(), "ErrorPriority(10)");
//! register_priority_name(AUDIT, "Audit");
//! assert_eq!(AUDIT.to_string(), "Audit");
//! ```

use core::fmt;
use std::borrow::Cow;

use hashbrown::HashMap;
use rustc_hash::FxBuildHasher;
use spin::RwLock;

type NameRegistry = HashMap<Priority, Cow<'static, str>, FxBuildHasher>;

/// Empty until the first name is registered.
static NAMES: RwLock<Option<NameRegistry>> = RwLock::new(None);

/// The severity of an error. Smaller ranks are more severe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(i32);

impl Priority {
    /// The system is unusable.
    pub const EMERGENCY: Self = Self(0);
    /// Action must be taken immediately.
    pub const ALERT: Self = Self(1);
    /// Critical conditions.
    pub const CRITICAL: Self = Self(2);
    /// Error conditions. This is the priority of errors created with the
    /// built-in configuration.
    pub const ERROR: Self = Self(3);
    /// Warning conditions.
    pub const WARNING: Self = Self(4);
    /// Normal but significant conditions.
    pub const NOTICE: Self = Self(5);
    /// Informational messages.
    pub const INFO: Self = Self(6);
    /// Debug-level messages.
    pub const DEBUG: Self = Self(7);

    /// The built-in priorities, most severe first.
    pub const BUILTIN: [Self; 8] = [
        Self::EMERGENCY,
        Self::ALERT,
        Self::CRITICAL,
        Self::ERROR,
        Self::WARNING,
        Self::NOTICE,
        Self::INFO,
        Self::DEBUG,
    ];

    /// Creates a priority with the given rank.
    #[must_use]
    pub const fn new(rank: i32) -> Self {
        Self(rank)
    }

    /// The rank of this priority.
    #[must_use]
    pub const fn rank(self) -> i32 {
        self.0
    }

    /// Reports whether `self` is strictly more severe than `other`.
    ///
    /// ```
    /// use aerrors::Priority;
    ///
    /// assert!(Priority::EMERGENCY.higher_than(Priority::DEBUG));
    /// assert!(!Priority::DEBUG.higher_than(Priority::EMERGENCY));
    /// assert!(!Priority::ERROR.higher_than(Priority::ERROR));
    /// ```
    #[must_use]
    pub const fn higher_than(self, other: Self) -> bool {
        self.0 < other.0
    }

    /// The display name of this priority.
    ///
    /// Registered names take precedence over the built-in ones.
    pub fn display_name(self) -> Cow<'static, str> {
        if let Some(name) = NAMES.read().as_ref().and_then(|names| names.get(&self)) {
            return name.clone();
        }
        match self.builtin_name() {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(format!("ErrorPriority({})", self.0)),
        }
    }

    const fn builtin_name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("Emergency"),
            1 => Some("Alert"),
            2 => Some("Critical"),
            3 => Some("Error"),
            4 => Some("Warning"),
            5 => Some("Notice"),
            6 => Some("Info"),
            7 => Some("Debug"),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// Registers the display name of a priority for the whole process.
///
/// Registering a name for a rank that already has one replaces it. Names
/// cannot be removed.
pub fn register_priority_name(priority: Priority, name: impl Into<Cow<'static, str>>) {
    let name = name.into();
    tracing::debug!(rank = priority.rank(), name = %name, "registered priority name");
    NAMES
        .write()
        .get_or_insert_with(|| HashMap::with_hasher(FxBuildHasher))
        .insert(priority, name);
}
