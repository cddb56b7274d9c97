//! Core type system and error handling for fileferry
//!
//! This crate provides the foundational types, error handling, and shared data
//! structures used throughout the fileferry workspace. It includes:
//!
//! - **Error handling**: A structured error type with kind classification
//! - **Record types**: Action outcomes, system errors, and operational events
//! - **Run report**: The aggregated, order-preserving report of a whole run
//! - **Retry policy**: Validated retry bounds for the file action wrapper
//! - **Traits**: The collaborator seams consumed by the orchestration core
//!
//! # Examples
//!
//! ```rust
//! use fileferry_types::{ActionOutcome, RunReport, TransferAction};
//! use chrono::Local;
//!
//! let mut report = RunReport::new(Local::now());
//! report.outcomes.push(ActionOutcome::succeeded(
//!     TransferAction::Copy,
//!     "in/a.txt".into(),
//!     "out/a.txt".into(),
//!     false,
//! ));
//! assert_eq!(report.summary().total_actions, 1);
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{RetryAttempts, RetryDelay, RetryPolicy};
pub use error::{Error, ErrorKind};
pub use result::Result;
pub use traits::*;
pub use types::*;
