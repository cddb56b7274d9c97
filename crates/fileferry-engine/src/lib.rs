//! Task orchestration engine for fileferry
//!
//! This crate is the orchestration core of fileferry: it turns a validated
//! configuration into a finished run report.
//!
//! # Features
//!
//! - **Selection**: Deterministic candidate enumeration with pattern and age
//!   filtering
//! - **Retry**: Bounded, fixed-delay retry around every file action
//! - **Task isolation**: One bad file never aborts a task; one bad task never
//!   affects its siblings
//! - **Bounded concurrency**: Sequential or pooled task execution with a
//!   deterministic, configuration-ordered report merge
//! - **Policy decisions**: Log artifact selection, log retention, and
//!   notification dispatch evaluated from declarative configuration
//!
//! # Examples
//!
//! ```rust
//! use fileferry_config::Config;
//! use fileferry_engine::Pipeline;
//!
//! # async fn example() {
//! let pipeline = Pipeline::builder(Config::default()).build();
//! let report = pipeline.run().await;
//! assert!(!report.is_failure());
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod notify;
pub mod orchestrator;
pub mod pipeline;
pub mod report;
pub mod retry;
pub mod runner;
pub mod selector;

pub use notify::{build_envelope, should_notify};
pub use orchestrator::Orchestrator;
pub use pipeline::{Pipeline, PipelineBuilder};
pub use report::{decide_artifacts, select_expired_logs, summarize};
pub use retry::Retrier;
pub use runner::TaskRunner;
pub use selector::FileSelector;
