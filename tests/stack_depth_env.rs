//! The default stack depth read from the environment.

use aerrors::stack::{default_stack_depth, set_default_stack_depth};

#[test]
fn environment_sets_the_initial_depth() {
    // SAFETY: this binary has a single test, so no other thread reads the
    // environment concurrently.
    unsafe { std::env::set_var("AERRORS_STACK_DEPTH", "3") };
    assert_eq!(default_stack_depth(), 3);

    set_default_stack_depth(5);
    assert_eq!(default_stack_depth(), 5);
}
