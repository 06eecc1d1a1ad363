//! Walking the active call stack.
//!
//! [`callers`] is the only entry point. It walks the stack of the calling
//! thread with [`backtrace::trace`], resolves every frame (inlined frames are
//! reported individually), and applies a [`FrameFilter`]:
//!
//! 1. Leading frames owned by one of
//!    [`skipped_initial_crates`](FrameFilter::skipped_initial_crates) are
//!    dropped. This removes the unwinder, this crate and the library that
//!    requested the capture, no matter how many frames they contribute.
//!    The owner of a frame is read from its source path: the directories in
//!    [`crate_dirs`](FrameFilter::crate_dirs) first, then the layouts known
//!    to [`path::owning_crate`]. Only frames without a source path fall back
//!    to the symbol, since a trait impl written in one crate is often named
//!    after a type of another.
//! 2. The requested number of frames is skipped.
//! 3. Up to the requested number of frames is recorded, stopping early at
//!    the process entry point (`__rust_begin_short_backtrace` or
//!    `std::rt::lang_start`). When the entry point is reached, trailing
//!    runtime frames are trimmed as well.

use std::path::Path;

use backtrace::BytesOrWideString;

use crate::{path, symbol};

/// A resolved call frame, in demangled form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawFrame {
    /// The demangled symbol name, without the trailing hash.
    pub symbol: String,
    /// The source file of the frame, if debug information was available.
    pub file: Option<String>,
    /// The source line of the frame, if debug information was available.
    pub line: Option<u32>,
}

impl RawFrame {
    /// The crate owning this frame, as classified by `filter`.
    pub fn owning_crate<'a>(&'a self, filter: &FrameFilter) -> Option<&'a str> {
        filter.owning_crate(self.file.as_deref(), &self.symbol)
    }
}

/// Configuration for which frames [`callers`] hides.
#[derive(Copy, Clone, Debug)]
pub struct FrameFilter {
    /// Crate names whose frames are hidden while they appear at the top of
    /// the stack. Names use the underscore form found in symbols.
    pub skipped_initial_crates: &'static [&'static str],
    /// Crate names whose frames are hidden while they appear at the bottom of
    /// the stack, below the last frame of interest.
    pub skipped_final_crates: &'static [&'static str],
    /// `(crate name, source directory)` pairs for crates whose paths do not
    /// follow a known layout, such as workspace members.
    pub crate_dirs: &'static [(&'static str, &'static str)],
}

impl FrameFilter {
    /// Hides the unwinder, this crate and the standard library at the top,
    /// and the standard library at the bottom.
    pub const DEFAULT: Self = Self {
        skipped_initial_crates: &["backtrace", crate::CRATE_NAME, "core", "std", "alloc"],
        skipped_final_crates: &["std", "core", "alloc"],
        crate_dirs: &[(crate::CRATE_NAME, crate::SOURCE_DIR)],
    };

    fn owning_crate<'a>(&self, file: Option<&'a str>, sym: &'a str) -> Option<&'a str> {
        let Some(file) = file else {
            return symbol::owning_crate(sym);
        };
        self.crate_dirs
            .iter()
            .find(|&&(_, dir)| Path::new(file).starts_with(dir))
            .map(|&(name, _)| name)
            .or_else(|| path::owning_crate(file))
    }

    fn is_skipped(names: &[&str], crate_name: Option<&str>) -> bool {
        crate_name.is_some_and(|crate_name| {
            names
                .iter()
                .any(|&name| path::same_crate(name, crate_name))
        })
    }
}

impl Default for FrameFilter {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// C runtime symbols found below `main` or a thread start routine.
const RUNTIME_START_SYMBOLS: &[&str] = &[
    "main",
    "_start",
    "__libc_start_main",
    "__libc_start_call_main",
    "__libc_start_main_impl",
    "start_thread",
    "__clone3",
    "__GI___clone3",
];

/// Generic arguments are ignored, so
/// `test::__rust_begin_short_backtrace::<fn(), ()>` is an entry frame too.
fn is_entry_frame(sym: &str) -> bool {
    let path = symbol::strip_generics(sym);
    path.starts_with("std::rt::lang_start")
        || path
            .split("::")
            .any(|segment| segment == "__rust_begin_short_backtrace")
}

/// Returns up to `max_frames` caller frames, most recent first, after hiding
/// the frames described by `filter` and `skip_frames` more.
///
/// The entry frame is never part of the result. Frames without a symbol name
/// are ignored and not counted.
pub fn callers(filter: &FrameFilter, max_frames: usize, skip_frames: usize) -> Vec<RawFrame> {
    let mut frames: Vec<RawFrame> = Vec::new();
    if max_frames == 0 {
        return frames;
    }

    let mut initial_filtering = !filter.skipped_initial_crates.is_empty();
    let mut remaining_skip = skip_frames;
    let mut reached_entry = false;
    let mut truncated = false;

    macro_rules! is_done {
        () => {
            reached_entry || truncated
        };
    }

    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |resolved| {
            if is_done!() {
                return;
            }
            let Some(name) = resolved.name() else {
                return;
            };
            let sym = format!("{name:#}");

            if is_entry_frame(&sym) {
                reached_entry = true;
                return;
            }

            let file = resolved
                .filename_raw()
                .map(|path: BytesOrWideString<'_>| path.to_str_lossy().into_owned());

            if initial_filtering {
                let owner = filter.owning_crate(file.as_deref(), &sym);
                if FrameFilter::is_skipped(filter.skipped_initial_crates, owner) {
                    return;
                }
                initial_filtering = false;
            }

            if remaining_skip > 0 {
                remaining_skip -= 1;
                return;
            }

            frames.push(RawFrame {
                symbol: sym,
                file,
                line: resolved.lineno(),
            });
            truncated = frames.len() >= max_frames;
        });

        !is_done!()
    });

    if !truncated {
        while let Some(last) = frames.last() {
            let is_runtime = RUNTIME_START_SYMBOLS.contains(&last.symbol.as_str())
                || FrameFilter::is_skipped(
                    filter.skipped_final_crates,
                    last.owning_crate(filter),
                );
            if !is_runtime {
                break;
            }
            frames.pop();
        }
    }

    tracing::trace!(
        max_frames,
        skip_frames,
        captured = frames.len(),
        reached_entry,
        "captured caller frames"
    );

    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_frames_requested() {
        assert!(callers(&FrameFilter::DEFAULT, 0, 0).is_empty());
    }

    #[test]
    fn test_never_exceeds_max_frames() {
        for max in 1..5 {
            assert!(callers(&FrameFilter::DEFAULT, max, 0).len() <= max);
        }
    }

    #[test]
    fn test_entry_frame_excluded() {
        let frames = callers(&FrameFilter::DEFAULT, usize::MAX, 0);
        assert!(frames.iter().all(|frame| !is_entry_frame(&frame.symbol)));
        assert!(
            frames
                .last()
                .is_none_or(|frame| !RUNTIME_START_SYMBOLS.contains(&frame.symbol.as_str()))
        );
    }

    #[test]
    fn test_entry_detection() {
        assert!(is_entry_frame("std::sys::backtrace::__rust_begin_short_backtrace"));
        assert!(is_entry_frame("test::__rust_begin_short_backtrace"));
        assert!(is_entry_frame("std::rt::lang_start_internal"));
        assert!(is_entry_frame("std::rt::lang_start::<()>::{{closure}}"));
        assert!(is_entry_frame(
            "test::__rust_begin_short_backtrace::<core::result::Result<(), alloc::string::String>, fn() -> core::result::Result<(), alloc::string::String>>"
        ));
        assert!(is_entry_frame(
            "std::sys::backtrace::__rust_begin_short_backtrace::<my_app::main, ()>"
        ));
        assert!(!is_entry_frame("my_app::main"));
        assert!(!is_entry_frame("my_app::run::<my_app::__rust_begin_short_backtrace_like>"));
    }

    #[test]
    fn test_owner_from_path_before_symbol() {
        let filter = FrameFilter {
            crate_dirs: &[("lib_crate", "/work/lib_crate/src")],
            ..FrameFilter::DEFAULT
        };
        let sym = "<alloc::string::String as app::Describe>::fail";
        assert_eq!(filter.owning_crate(Some("/work/app/src/main.rs"), sym), None);
        assert_eq!(filter.owning_crate(None, sym), Some("alloc"));
        assert_eq!(
            filter.owning_crate(
                Some("/work/lib_crate/src/error.rs"),
                "<app::Thing as lib_crate::Trait>::f"
            ),
            Some("lib_crate")
        );
        assert_eq!(
            filter.owning_crate(
                Some("/rustc/0123456789abcdef0123456789abcdef01234567/library/std/src/panicking.rs"),
                "app::main"
            ),
            Some("std")
        );
    }

    #[test]
    fn test_skipped_names_ignore_dashes() {
        assert!(FrameFilter::is_skipped(&["aerrors_internals"], Some("aerrors-internals")));
        assert!(!FrameFilter::is_skipped(&["std"], Some("app")));
        assert!(!FrameFilter::is_skipped(&["std"], None));
    }
}
