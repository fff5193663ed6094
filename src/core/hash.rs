//! Identity hash newtypes
//!
//! Hashes are 16-hex-char (64-bit) truncated SHA-256 digests. They are
//! correlation hints for attributing independently-started sessions, not
//! security identifiers; collisions are tolerable, forgery is irrelevant.

use serde::{Deserialize, Serialize};

/// Identifies "this kind of agent" independent of conversation content.
///
/// Derived from the agent's system prompt hash and tool set hash, so two
/// invocations of the same agent definition share a type hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentTypeHash(String);

impl AgentTypeHash {
    /// Wrap a precomputed digest
    pub fn new(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    /// The hex digest as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AgentTypeHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies a specific ongoing conversation.
///
/// Derived from the agent type hash plus the first exchanged messages, so a
/// later turn of the same conversation reproduces the same hash and can be
/// recognized as a resumption rather than a new agent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHash(String);

impl ConversationHash {
    /// Wrap a precomputed digest
    pub fn new(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    /// The hex digest as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConversationHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
