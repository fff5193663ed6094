//! Claim registry for parent/child attribution
//!
//! This module provides the temporal claim machinery:
//! - `ClaimRegistry` - pending-claim store with TTL, FIFO matching, and a
//!   cooperative sweep task
//! - `DetectedName` - a child name as reported (or not) by the host
//! - `Clock` / `SystemClock` / `ManualClock` - injectable time source
//!
//! A parent about to spawn a child registers a claim; when any new agent
//! stream begins, the bookkeeping layer asks the registry whether some
//! parent announced it.

pub mod claim;
pub mod clock;
pub mod registry;

pub use claim::{ClaimMatch, DetectedName};
pub use clock::{Clock, ManualClock, SystemClock};
pub use registry::{
    ClaimRegistry, ClaimRegistryConfig, DEFAULT_CLAIM_TTL, DEFAULT_SWEEP_INTERVAL,
};
