//! Tree diagnostics: invariant checking and audit logging
//!
//! This module provides:
//! - `check_invariants` - pure well-formedness report over a `TreeSnapshot`
//! - `TreeDiagnostics` - append-only NDJSON audit log per workspace
//!
//! Diagnostics observe, they never enforce: violations become data in the
//! audit log and are never raised to the caller.

pub mod audit;
pub mod invariants;

pub use audit::{event, TreeDiagnostics};
pub use invariants::check_invariants;
