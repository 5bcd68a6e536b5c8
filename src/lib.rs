//! deptest — a dependency-driven test harness.
//!
//! Test entries declare which other entries must run first (optionally
//! forwarding their return values), and the dispatcher works out the order,
//! propagating failures to dependents as `UNMET`.

pub mod asserts;
pub mod cli;
pub mod emit;
pub mod graph;
pub mod runner;
pub mod suite;

pub use runner::capture::{CaptureConfig, EntryContext};
pub use runner::dispatch::{EntryRecord, RunConfig, RunError, RunResult, RunSummary, SuiteRunner};
pub use runner::state::{EntryState, Status};
pub use suite::builder::{Suite, SuiteBuilder};
pub use suite::entry::{DeclarationError, Dependency, Entry, EntryError, EntryErrorKind};

pub use serde_json::Value;
