//! Helpers for reading demangled Rust symbols.
//!
//! Symbols are expected in the alternate demangled form (no trailing hash),
//! e.g. `aerrors::error::Error::new`,
//! `<alloc::boxed::Box<F,A> as core::ops::function::FnOnce<Args>>::call_once`
//! or `my_app::run::{{closure}}`.

/// Returns the name of the crate a demangled symbol belongs to.
///
/// For qualified paths this is the crate of the self type, which is where the
/// code was written for all but blanket trait impls.
///
/// ```
/// use aerrors_internals::symbol::owning_crate;
///
/// assert_eq!(owning_crate("aerrors::error::Error::new"), Some("aerrors"));
/// assert_eq!(
///     owning_crate("<alloc::boxed::Box<F> as core::ops::function::FnOnce<A>>::call_once"),
///     Some("alloc"),
/// );
/// assert_eq!(owning_crate("<&str as core::fmt::Display>::fmt"), Some("str"));
/// ```
pub fn owning_crate(symbol: &str) -> Option<&str> {
    let (start, _) = symbol
        .char_indices()
        .find(|&(_, c)| c == '_' || unicode_ident::is_xid_start(c))?;
    let rest = &symbol[start..];
    let end = rest
        .char_indices()
        .find(|&(_, c)| !unicode_ident::is_xid_continue(c))
        .map_or(rest.len(), |(i, _)| i);
    Some(&rest[..end])
}

/// Shortens a demangled symbol into a display name.
///
/// Generic arguments are removed, `<T as Trait>::f` is rendered as `T::f`, and
/// only the last two named path segments are kept. Closure segments such as
/// `{{closure}}` on top of them are preserved.
///
/// ```
/// use aerrors_internals::symbol::simplify_function;
///
/// assert_eq!(simplify_function("aerrors::error::Error::new"), "Error::new");
/// assert_eq!(simplify_function("my_app::main"), "my_app::main");
/// assert_eq!(
///     simplify_function("<my_app::db::Pool<T> as core::fmt::Debug>::fmt"),
///     "Pool::fmt",
/// );
/// assert_eq!(
///     simplify_function("my_app::db::connect::{{closure}}"),
///     "db::connect::{{closure}}",
/// );
/// ```
pub fn simplify_function(symbol: &str) -> String {
    let path = strip_generics(&unqualify(symbol));
    let segments: Vec<&str> = path.split("::").filter(|s| !s.is_empty()).collect();

    let mut start = segments.len();
    let mut named = 0;
    while start > 0 && named < 2 {
        start -= 1;
        if !segments[start].starts_with('{') {
            named += 1;
        }
    }
    segments[start..].join("::")
}

/// Rewrites `<T as Trait>::rest` (and `<T>::rest`) into `T::rest`.
fn unqualify(symbol: &str) -> String {
    let Some(inner) = symbol.strip_prefix('<') else {
        return symbol.to_string();
    };
    let Some(close) = matching_close(inner) else {
        return symbol.to_string();
    };
    let self_ty = top_level_self_type(&inner[..close])
        .trim_start_matches('&')
        .trim_start_matches("mut ");
    let rewritten = format!("{self_ty}{}", &inner[close + 1..]);
    if rewritten.starts_with('<') {
        unqualify(&rewritten)
    } else {
        rewritten
    }
}

/// Finds the `>` closing an already opened `<`, ignoring `->` arrows.
fn matching_close(s: &str) -> Option<usize> {
    let mut depth = 1usize;
    let mut prev = '\0';
    for (i, c) in s.char_indices() {
        match c {
            '<' => depth += 1,
            '>' if prev != '-' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        prev = c;
    }
    None
}

fn top_level_self_type(qualified: &str) -> &str {
    let mut depth = 0usize;
    let mut prev = '\0';
    for (i, c) in qualified.char_indices() {
        match c {
            '<' => depth += 1,
            '>' if prev != '-' => depth = depth.saturating_sub(1),
            ' ' if depth == 0 && qualified[i..].starts_with(" as ") => return &qualified[..i],
            _ => {}
        }
        prev = c;
    }
    qualified
}

pub(crate) fn strip_generics(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut depth = 0usize;
    let mut prev = '\0';
    for c in path.chars() {
        match c {
            '<' => depth += 1,
            '>' if prev != '-' && depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
        prev = c;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owning_crate() {
        assert_eq!(owning_crate("std::rt::lang_start"), Some("std"));
        assert_eq!(
            owning_crate("backtrace::backtrace::libunwind::trace"),
            Some("backtrace")
        );
        assert_eq!(
            owning_crate("<aerrors::Error as core::fmt::Debug>::fmt"),
            Some("aerrors")
        );
        assert_eq!(owning_crate("__libc_start_main"), Some("__libc_start_main"));
        assert_eq!(owning_crate("<>"), None);
    }

    #[test]
    fn test_simplify_plain_paths() {
        assert_eq!(simplify_function("main"), "main");
        assert_eq!(simplify_function("app::main"), "app::main");
        assert_eq!(simplify_function("app::a::b::c::run"), "c::run");
    }

    #[test]
    fn test_simplify_generics() {
        assert_eq!(
            simplify_function("app::store::Store<K,V>::get"),
            "Store::get"
        );
        assert_eq!(
            simplify_function("app::apply<fn(u8) -> u8>"),
            "app::apply"
        );
    }

    #[test]
    fn test_simplify_qualified_paths() {
        assert_eq!(
            simplify_function(
                "<alloc::boxed::Box<F,A> as core::ops::function::FnOnce<Args>>::call_once"
            ),
            "Box::call_once"
        );
        assert_eq!(
            simplify_function("<&app::Thing as core::fmt::Display>::fmt"),
            "Thing::fmt"
        );
        assert_eq!(simplify_function("<app::Thing>::new"), "Thing::new");
        assert_eq!(
            simplify_function("<<app::A as app::B>::Out as core::fmt::Debug>::fmt"),
            "Out::fmt"
        );
    }

    #[test]
    fn test_simplify_closures() {
        assert_eq!(
            simplify_function("app::run::{{closure}}::{{closure}}"),
            "app::run::{{closure}}::{{closure}}"
        );
        assert_eq!(
            simplify_function("app::a::run::{closure#0}"),
            "a::run::{closure#0}"
        );
    }
}
