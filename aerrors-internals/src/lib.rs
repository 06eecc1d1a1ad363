#![forbid(
    missing_docs,
    unsafe_code,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    unused_doc_comments
)]
//! Internal implementation crate for [`aerrors`].
//!
//! # Overview
//!
//! This crate contains the low-level call-stack walking that backs the stack
//! snapshots of the [`aerrors`] library. It turns the raw frames reported by
//! the [`backtrace`] crate into demangled, filtered [`RawFrame`]s, and knows
//! how to read the owning crate and a short display name out of a demangled
//! symbol.
//!
//! **This crate is an implementation detail.** No semantic versioning
//! guarantees are provided. Users should depend on the [`aerrors`] crate, not
//! this one.
//!
//! # Architecture
//!
//! - **[`frames`]**: the stack walk itself. Given a [`FrameFilter`], a
//!   maximum frame count and a skip count, [`frames::callers`] returns up to
//!   that many caller frames, most recent first. Frames belonging to the
//!   library (and to the unwinder) at the top of the stack are never
//!   reported, and the walk stops at the process entry point.
//! - **[`path`]**: reading the owning crate out of a source path.
//! - **[`symbol`]**: string-level helpers over demangled symbols.
//!
//! [`aerrors`]: https://docs.rs/aerrors/latest/aerrors/
//! [`RawFrame`]: frames::RawFrame
//! [`FrameFilter`]: frames::FrameFilter

pub mod frames;
pub mod path;
pub mod symbol;

/// The crate name this crate's own frames are reported under.
pub const CRATE_NAME: &str = env!("CARGO_CRATE_NAME");

/// The directory holding this crate's sources.
pub const SOURCE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/src");
