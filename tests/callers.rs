//! Call-site capture as seen from outside the library.

use aerrors::{ErrOption, Error, Value, errorf, stack::Stack};

#[inline(never)]
fn make_error() -> (Error, u32) {
    (Error::new("made here"), line!())
}

#[inline(never)]
fn make_error_skipping_one() -> Error {
    Error::new_with("skipped", [ErrOption::skip(1)])
}

#[inline(never)]
fn calls_skipping_helper() -> Error {
    make_error_skipping_one()
}

#[inline(never)]
fn make_child(parent: &Error) -> Error {
    parent.child("child")
}

#[inline(never)]
fn capture_stack_value() -> Value {
    Value::stack(0)
}

trait Describe {
    fn fail(&self) -> Error;
}

impl Describe for String {
    #[inline(never)]
    fn fail(&self) -> Error {
        Error::new(self.clone())
    }
}

struct Missing;

impl From<Missing> for Error {
    #[inline(never)]
    fn from(_: Missing) -> Self {
        Error::new("missing")
    }
}

#[test]
fn callers_start_at_the_constructing_function() {
    let (err, line) = make_error();
    let frames = err.callers().frames();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].function, "callers::make_error");
    assert!(frames[0].file.ends_with("callers.rs"), "{}", frames[0].file);
    assert_eq!(frames[0].line, line);
}

#[test]
fn caller_skip_moves_the_snapshot_up() {
    let err = calls_skipping_helper();
    assert_eq!(
        err.callers().frames()[0].function,
        "callers::calls_skipping_helper"
    );
}

#[test]
fn children_do_not_inherit_the_skip() {
    let parent = Error::new_with("parent", [ErrOption::skip(3)]);
    let child = make_child(&parent);
    assert_eq!(child.callers().frames()[0].function, "callers::make_child");
}

#[test]
fn caller_depth_bounds_the_snapshot() {
    let err = Error::new_with("deep", [ErrOption::depth(3)]);
    assert!((1..=3).contains(&err.callers().len()));
    assert_eq!(
        err.callers().frames()[0].function,
        "callers::caller_depth_bounds_the_snapshot"
    );

    let none = Error::new_with("shallow", [ErrOption::depth(0)]);
    assert!(none.callers().is_empty());
}

#[test]
fn macros_capture_the_invoking_function() {
    let err = errorf!("from a macro {}", 1);
    assert_eq!(
        err.callers().frames()[0].function,
        "callers::macros_capture_the_invoking_function"
    );
}

#[test]
fn stack_values_start_at_the_caller() {
    let value = capture_stack_value();
    assert_eq!(value.label(), "stack");
    assert!(
        value.value().starts_with("callers::capture_stack_value:"),
        "{}",
        value.value()
    );

    let err = Error::new("annotated").with_stack_n(2, 0);
    let values = err.values();
    assert!(
        values[0]
            .value()
            .starts_with("callers::stack_values_start_at_the_caller:")
    );
}

#[test]
fn stack_capture_from_user_code() {
    let stack = Stack::capture(1, 0);
    assert_eq!(stack.len(), 1);
    assert_eq!(stack.frames()[0].function, "callers::stack_capture_from_user_code");
    assert!(stack.to_string().starts_with("callers::stack_capture_from_user_code:"));
}

#[test]
fn trait_impls_on_foreign_types_are_reported() {
    let err = String::from("described").fail();
    assert_eq!(err.callers().frames()[0].function, "String::fail");

    let err = Error::from(Missing);
    assert_eq!(err.callers().frames()[0].function, "Error::from");
    assert!(err.callers().frames()[0].file.ends_with("callers.rs"));
}
