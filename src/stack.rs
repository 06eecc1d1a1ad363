//! Call-stack snapshots.
//!
//! A [`Stack`] is an ordered list of [`Frame`]s, most recent first. Frames of
//! this library, of the unwinder and of the standard library at the top of
//! the stack are never part of a snapshot, so the first frame of a capture
//! is the code that created the error or value.
//!
//! The number of frames captured by [`Value::stack`](crate::Value::stack)
//! defaults to [`default_stack_depth`], which can be changed with
//! [`set_default_stack_depth`] or the `AERRORS_STACK_DEPTH` environment
//! variable.

use core::fmt;
use std::sync::{
    OnceLock,
    atomic::{AtomicUsize, Ordering},
};

use aerrors_internals::{
    frames::{self, FrameFilter, RawFrame},
    symbol::simplify_function,
};

/// Placeholder for frames whose source file could not be resolved.
pub const UNKNOWN_FILE: &str = "<unknown>";

/// The fallback of [`default_stack_depth`].
pub const DEFAULT_STACK_DEPTH: usize = 16;

const STACK_DEPTH_VAR: &str = "AERRORS_STACK_DEPTH";
const UNSET: usize = usize::MAX;

static STACK_DEPTH: AtomicUsize = AtomicUsize::new(UNSET);

const FRAME_FILTER: FrameFilter = FrameFilter {
    skipped_initial_crates: &[
        "backtrace",
        aerrors_internals::CRATE_NAME,
        env!("CARGO_CRATE_NAME"),
        "core",
        "std",
        "alloc",
    ],
    skipped_final_crates: FrameFilter::DEFAULT.skipped_final_crates,
    crate_dirs: &[
        (aerrors_internals::CRATE_NAME, aerrors_internals::SOURCE_DIR),
        (
            env!("CARGO_CRATE_NAME"),
            concat!(env!("CARGO_MANIFEST_DIR"), "/src"),
        ),
    ],
};

/// One captured call frame.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Frame {
    /// Short function name, e.g. `Server::accept` or `main`.
    pub function: String,
    /// Source file, or [`UNKNOWN_FILE`].
    pub file: String,
    /// Source line, or 0 when unknown.
    pub line: u32,
}

impl Frame {
    /// Creates a frame.
    pub fn new(function: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            function: function.into(),
            file: file.into(),
            line,
        }
    }
}

impl From<RawFrame> for Frame {
    fn from(frame: RawFrame) -> Self {
        Self {
            function: simplify_function(&frame.symbol),
            file: frame.file.unwrap_or_else(|| UNKNOWN_FILE.to_owned()),
            line: frame.line.unwrap_or(0),
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.function, self.file, self.line)
    }
}

/// An ordered call-stack snapshot, most recent frame first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Stack {
    frames: Vec<Frame>,
}

impl Stack {
    /// Captures up to `max_frames` frames of the current call stack after
    /// skipping `skip_frames` frames above the caller.
    ///
    /// With `skip_frames == 0` the first frame is the function calling into
    /// this library.
    pub fn capture(max_frames: usize, skip_frames: usize) -> Self {
        if max_frames == 0 {
            return Self::default();
        }
        let frames = frames::callers(&FRAME_FILTER, max_frames, skip_frames)
            .into_iter()
            .map(Frame::from)
            .collect();
        Self { frames }
    }

    /// Creates a snapshot from explicit frames.
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    /// The frames, most recent first.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// The number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the snapshot has no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Renders every frame as `function{func_sep}file{line_sep}line`, joined
    /// with `sep`.
    ///
    /// ```
    /// use aerrors::stack::{Frame, Stack};
    ///
    /// let stack = Stack::from_frames(vec![
    ///     Frame::new("load", "src/config.rs", 12),
    ///     Frame::new("main", "src/main.rs", 3),
    /// ]);
    /// assert_eq!(
    ///     stack.format(" <- ", " @ ", "#"),
    ///     "load @ src/config.rs#12 <- main @ src/main.rs#3"
    /// );
    /// ```
    pub fn format(&self, sep: &str, func_sep: &str, line_sep: &str) -> String {
        let mut out = String::new();
        for (i, frame) in self.frames.iter().enumerate() {
            if i > 0 {
                out.push_str(sep);
            }
            out.push_str(&frame.function);
            out.push_str(func_sep);
            out.push_str(&frame.file);
            out.push_str(line_sep);
            out.push_str(&frame.line.to_string());
        }
        out
    }
}

/// Renders frames as `function:file:line` joined with `", "`.
impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, frame) in self.frames.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            fmt::Display::fmt(frame, f)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Stack {
    type Item = &'a Frame;
    type IntoIter = core::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

/// The number of frames captured by [`Value::stack`](crate::Value::stack).
///
/// This is the value last passed to [`set_default_stack_depth`], or else the
/// `AERRORS_STACK_DEPTH` environment variable read on first use, or else
/// [`DEFAULT_STACK_DEPTH`].
pub fn default_stack_depth() -> usize {
    match STACK_DEPTH.load(Ordering::Relaxed) {
        UNSET => env_stack_depth(),
        depth => depth,
    }
}

/// Sets the number of frames captured by
/// [`Value::stack`](crate::Value::stack) for the whole process.
pub fn set_default_stack_depth(depth: usize) {
    let depth = depth.min(UNSET - 1);
    tracing::debug!(depth, "set default stack depth");
    STACK_DEPTH.store(depth, Ordering::Relaxed);
}

fn env_stack_depth() -> usize {
    static FROM_ENV: OnceLock<usize> = OnceLock::new();
    *FROM_ENV.get_or_init(|| match std::env::var(STACK_DEPTH_VAR) {
        Ok(value) => parse_stack_depth(&value).unwrap_or_else(|| {
            tracing::warn!(value = %value, "ignoring invalid {STACK_DEPTH_VAR}");
            DEFAULT_STACK_DEPTH
        }),
        Err(_) => DEFAULT_STACK_DEPTH,
    })
}

fn parse_stack_depth(value: &str) -> Option<usize> {
    value.trim().parse().ok()
}
