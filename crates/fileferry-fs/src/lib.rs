//! Filesystem transfer primitive for fileferry
//!
//! This crate implements the copy-or-move primitive consumed by the
//! orchestration engine. Collision handling is controlled entirely by the
//! caller's `overwrite` flag; an existing destination with overwriting
//! disabled is a failure, never a rename.

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod transfer;

pub use transfer::LocalFileTransfer;
