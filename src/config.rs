//! Construction templates.
//!
//! A [`Config`] decides the priority, formatter and stack capture of a newly
//! created [`Error`](crate::Error). Root errors start from
//! [`Config::global`]; children start from their parent's
//! [`child_config`](crate::Error::child_config). In both cases the
//! construction [`ErrOption`]s are applied on top of a copy, so the template
//! itself never changes.

use spin::RwLock;

use crate::{ErrOption, Priority, formatter::FormatterRef};

/// `None` stands for [`Config::new`].
static GLOBAL: RwLock<Option<Config>> = RwLock::new(None);

/// Settings used to construct an error.
#[derive(Clone, Debug)]
pub struct Config {
    /// The priority of the error.
    pub priority: Priority,
    /// The formatter of the error.
    pub formatter: FormatterRef,
    /// The maximum number of caller frames to capture.
    pub caller_depth: usize,
    /// The number of frames to skip above the caller when capturing.
    pub caller_skip: usize,
}

impl Config {
    /// The caller depth of the built-in configuration.
    pub const DEFAULT_CALLER_DEPTH: usize = 1;

    /// The built-in configuration: [`Priority::ERROR`], the default
    /// formatter, one caller frame and no skipping.
    pub fn new() -> Self {
        Self {
            priority: Priority::ERROR,
            formatter: FormatterRef::default(),
            caller_depth: Self::DEFAULT_CALLER_DEPTH,
            caller_skip: 0,
        }
    }

    /// A copy of the process-wide template for root errors.
    pub fn global() -> Self {
        GLOBAL.read().as_ref().cloned().unwrap_or_default()
    }

    /// Replaces the process-wide template for root errors.
    ///
    /// Errors that already exist are not affected.
    pub fn set_global(config: Self) {
        tracing::debug!(
            priority = %config.priority,
            caller_depth = config.caller_depth,
            caller_skip = config.caller_skip,
            "replaced global error config"
        );
        *GLOBAL.write() = Some(config);
    }

    /// Restores the built-in template for root errors.
    pub fn reset_global() {
        tracing::debug!("reset global error config");
        *GLOBAL.write() = None;
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the formatter.
    #[must_use]
    pub fn with_formatter(mut self, formatter: FormatterRef) -> Self {
        self.formatter = formatter;
        self
    }

    /// Sets the maximum number of captured caller frames.
    #[must_use]
    pub fn with_caller_depth(mut self, depth: usize) -> Self {
        self.caller_depth = depth;
        self
    }

    /// Sets the number of frames skipped above the caller.
    #[must_use]
    pub fn with_caller_skip(mut self, skip: usize) -> Self {
        self.caller_skip = skip;
        self
    }

    /// Applies `options` in order. Later options win.
    #[must_use]
    pub fn apply(mut self, options: impl IntoIterator<Item = ErrOption>) -> Self {
        for option in options {
            option.apply(&mut self);
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(Config: Send, Sync, Clone);

    #[test]
    fn test_builtin() {
        let config = Config::new();
        assert_eq!(config.priority, Priority::ERROR);
        assert_eq!(config.caller_depth, 1);
        assert_eq!(config.caller_skip, 0);
        assert!(config.formatter.ptr_eq(&FormatterRef::default()));
    }

    #[test]
    fn test_apply_in_order() {
        let config = Config::new().apply([
            ErrOption::Priority(Priority::INFO),
            ErrOption::depth(5),
            ErrOption::skip(2),
            ErrOption::Priority(Priority::ALERT),
        ]);
        assert_eq!(config.priority, Priority::ALERT);
        assert_eq!(config.caller_depth, 5);
        assert_eq!(config.caller_skip, 2);
    }

    #[test]
    fn test_apply_leaves_template_alone() {
        let template = Config::new().with_priority(Priority::NOTICE);
        let derived = template.clone().apply([ErrOption::from(Priority::DEBUG)]);
        assert_eq!(template.priority, Priority::NOTICE);
        assert_eq!(derived.priority, Priority::DEBUG);
    }
}
