//! agent-lineage: parent/child attribution for stateless agent sessions
//!
//! The host starts agent streams independently and hands out no token
//! linking a child to the parent that requested it. This crate correlates
//! them anyway:
//! - `identity` hashes agent type and conversation content into short
//!   deterministic digests,
//! - `claims` lets a parent pre-announce an expected child and lets the
//!   child's arrival consume that claim (FIFO, TTL-bounded, with fallback
//!   match strategies),
//! - `diagnostics` checks that the resulting tree is well-formed and keeps
//!   an append-only audit log.
//!
//! The bookkeeping layer that owns agent records and talks to the host
//! lives outside this crate; it drives these components on lifecycle
//! events.

pub mod claims;
pub mod core;
pub mod diagnostics;
pub mod identity;
pub mod logging;
