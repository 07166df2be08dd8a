//! Structural difference engine.
//!
//! Walks two [`Value`]s side by side and reports every point where they
//! disagree as one human-readable line, prefixed with the path that leads to
//! it (`servers[2].ports["http"]: 80 != 8080`). Values may be nested
//! arbitrarily and may contain cycles through [`Ptr`] cells.
//!
//! This is a full structural walk for debug and test output, not a minimal
//! edit script.
//!
//! # Key Types
//!
//! - [`diff`] / [`write_diff`] / [`log_diff`] / [`print_diff`] -- Entry points, one per sink
//! - [`Printer`] / [`Logf`] -- Output sinks
//! - [`PathLabel`] -- Path from the root to a sub-value
//! - [`CycleGuard`] -- Per-call visited maps that break comparison cycles
//! - [`KeyMatch`] -- Pairing of two maps' keys
//!
//! [`Value`]: vdiff_types::Value
//! [`Ptr`]: vdiff_types::Ptr

pub mod differ;
pub mod error;
pub mod guard;
pub mod keys;
pub mod label;
pub mod printer;

pub use differ::{diff, diff_serialize, log_diff, print_diff, write_diff};
pub use error::{DiffError, DiffResult};
pub use guard::{CycleGuard, Identity, Visit};
pub use keys::{key_equal, match_keys, KeyMatch};
pub use label::PathLabel;
pub use printer::{LogPrinter, Logf, Printer, TracingLogf, WritePrinter};
