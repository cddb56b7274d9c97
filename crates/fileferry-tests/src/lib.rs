//! fileferry integration testing suite
//!
//! This crate provides the cross-crate integration tests for fileferry along
//! with shared helpers for building task fixtures and capturing notification
//! traffic.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Unified test utilities
///
/// Common helpers used across the integration tests: task fixtures on
/// temporary folders and capturing doubles for the notification transport.
pub mod test_utils;
