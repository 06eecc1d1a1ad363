//! Process-wide settings. Kept in one test so nothing else observes them
//! mid-change.

use aerrors::{
    Config, Error, Priority,
    stack::{DEFAULT_STACK_DEPTH, default_stack_depth, set_default_stack_depth},
};

#[test]
fn global_settings_apply_to_new_errors_only() {
    let before = Error::new("before");

    Config::set_global(Config::new().with_priority(Priority::NOTICE).with_caller_depth(0));
    let during = Error::new("during");
    assert_eq!(during.priority(), Priority::NOTICE);
    assert!(during.callers().is_empty());
    assert_eq!(before.priority(), Priority::ERROR);
    assert_eq!(before.callers().len(), 1);

    // Children follow their parent, not the global template.
    assert_eq!(before.child("child").priority(), Priority::ERROR);

    Config::reset_global();
    assert_eq!(Error::new("after").priority(), Priority::ERROR);

    assert_eq!(default_stack_depth(), DEFAULT_STACK_DEPTH);
    set_default_stack_depth(1);
    let value = aerrors::Value::stack(0);
    assert!(!value.value().contains(", "));
    set_default_stack_depth(DEFAULT_STACK_DEPTH);
}
