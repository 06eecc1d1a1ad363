//! Reading the owning crate out of a source path.
//!
//! Two layouts are recognized:
//!
//! - the standard library sources shipped with the toolchain, e.g.
//!   `/rustc/<hash>/library/std/src/panicking.rs` or
//!   `~/.rustup/toolchains/<name>/lib/rustlib/src/rust/library/core/src/ops/function.rs`,
//! - crates unpacked from a registry, e.g.
//!   `~/.cargo/registry/src/index.crates.io-<hash>/backtrace-0.3.76/src/lib.rs`.
//!
//! Every other path, including the workspace of the program being built, has
//! no known owner.

use std::sync::OnceLock;

use regex::Regex;

/// `/rustc/<hash>/library/<crate>/src/...` or
/// `.../lib/rustlib/src/rust/library/<crate>/src/...`.
const TOOLCHAIN_PATTERN: &str =
    r"(?:/lib/rustlib/src/rust|^/rustc/[0-9a-f]{40})/library/([a-z_]+)/src/";

/// `.../registry/src/<index>-<hash>/<crate>-<version>/src/...`.
const REGISTRY_PATTERN: &str = r"/registry/src/[^/]+-[0-9a-f]{16}/([^./]+)-[0-9]+\.[^/]*/src/";

fn compiled(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

/// Returns the crate a source file belongs to, if the path follows one of
/// the known layouts.
///
/// Registry package names are returned as written in the path, so they may
/// contain `-` where symbols use `_`. Compare them with [`same_crate`].
///
/// ```
/// use aerrors_internals::path::owning_crate;
///
/// assert_eq!(
///     owning_crate("/rustc/0123456789abcdef0123456789abcdef01234567/library/std/src/rt.rs"),
///     Some("std"),
/// );
/// assert_eq!(
///     owning_crate("/home/me/.cargo/registry/src/index.crates.io-1949cf8c6b5b557f/unicode-ident-1.0.22/src/lib.rs"),
///     Some("unicode-ident"),
/// );
/// assert_eq!(owning_crate("/home/me/app/src/main.rs"), None);
/// ```
pub fn owning_crate(path: &str) -> Option<&str> {
    static TOOLCHAIN: OnceLock<Option<Regex>> = OnceLock::new();
    static REGISTRY: OnceLock<Option<Regex>> = OnceLock::new();

    [
        compiled(&TOOLCHAIN, TOOLCHAIN_PATTERN),
        compiled(&REGISTRY, REGISTRY_PATTERN),
    ]
    .into_iter()
    .flatten()
    .find_map(|regex| regex.captures(path)?.get(1))
    .map(|name| name.as_str())
}

/// Whether two crate names are equal once `-` and `_` are treated alike.
pub fn same_crate(a: &str, b: &str) -> bool {
    let normalize = |byte: u8| if byte == b'-' { b'_' } else { byte };
    a.len() == b.len()
        && a
            .bytes()
            .zip(b.bytes())
            .all(|(x, y)| normalize(x) == normalize(y))
}
