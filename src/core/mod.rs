//! Core types for agent lineage tracking
//!
//! This module provides the fundamental types used throughout the crate:
//! - `AgentRecord` / `AgentStatus` - one tracked agent and its lifecycle
//! - `TreeSnapshot` / `ClaimView` - point-in-time view of the agent tree
//! - `AgentTypeHash` / `ConversationHash` - content-addressed identities
//! - `LineageError` - error types

pub mod error;
pub mod hash;
pub mod record;
pub mod snapshot;

pub use error::{LineageError, LineageResult};
pub use hash::{AgentTypeHash, ConversationHash};
pub use record::{AgentRecord, AgentStatus, AgentUsage};
pub use snapshot::{ClaimView, InvariantReport, TreeSnapshot};
