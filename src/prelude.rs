//! Commonly used items for convenient importing.
//!
//! ```rust
//! use aerrors::prelude::*;
//!
//! fn divide(a: i32, b: i32) -> Result<i32, Error> {
//!     if b == 0 {
//!         bail!("cannot divide {a} by zero");
//!     }
//!     Ok(a / b)
//! }
//!
//! assert_eq!(divide(10, 2).unwrap(), 5);
//! assert_eq!(divide(1, 0).unwrap_err().priority(), Priority::ERROR);
//! ```

pub use crate::{Config, ErrOption, Error, Priority, Value, as_error, bail, errorf};
