//! Agent record types
//!
//! An `AgentRecord` is the bookkeeping layer's view of one tracked agent.
//! This crate reads records inside a `TreeSnapshot` but never owns or
//! mutates them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::hash::{AgentTypeHash, ConversationHash};

/// Lifecycle status of a tracked agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AgentStatus {
    /// Agent stream is open or expected to resume
    Running,

    /// Agent finished its turn(s) normally
    Completed,

    /// Agent stream ended with an error
    Errored {
        /// Error message
        message: String,
    },
}

impl AgentStatus {
    /// Check if the agent is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentStatus::Completed | AgentStatus::Errored { .. })
    }

    /// Create an errored status
    pub fn errored(msg: impl Into<String>) -> Self {
        AgentStatus::Errored {
            message: msg.into(),
        }
    }
}

impl Default for AgentStatus {
    fn default() -> Self {
        AgentStatus::Running
    }
}

/// Token and turn counters for one agent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentUsage {
    /// Total input tokens consumed
    pub input_tokens: u64,

    /// Total output tokens produced
    pub output_tokens: u64,

    /// Number of completed turns
    pub turns: u32,
}

/// One tracked agent as known to the bookkeeping layer
///
/// Lineage fields are option types: `parent_conversation_hash = None` means
/// "this is not a child", never "parent not yet resolved" — an unresolved
/// parent reference is a dangling hash and the invariant checker flags it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRecord {
    /// Unique id assigned by the bookkeeping layer
    pub id: String,

    /// Declared agent name (e.g. "recon", "main")
    pub name: String,

    /// Whether this record is the top-level session driving the conversation
    pub is_main: bool,

    /// Content-addressed conversation identity, once the first exchange
    /// is observed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_hash: Option<ConversationHash>,

    /// Content-addressed agent type identity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_type_hash: Option<AgentTypeHash>,

    /// Conversation hash of the parent that claimed this agent (children only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_conversation_hash: Option<ConversationHash>,

    /// Lifecycle status
    pub status: AgentStatus,

    /// Token and turn counters
    #[serde(default)]
    pub usage: AgentUsage,
}

impl AgentRecord {
    /// Create a record for the main agent
    pub fn main(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            is_main: true,
            conversation_hash: None,
            agent_type_hash: None,
            parent_conversation_hash: None,
            status: AgentStatus::Running,
            usage: AgentUsage::default(),
        }
    }

    /// Create a record for a child attributed to a parent conversation
    pub fn child(name: impl Into<String>, parent: ConversationHash) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            is_main: false,
            conversation_hash: None,
            agent_type_hash: None,
            parent_conversation_hash: Some(parent),
            status: AgentStatus::Running,
            usage: AgentUsage::default(),
        }
    }

    /// Create a record for an agent with no known lineage
    pub fn detached(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            is_main: false,
            conversation_hash: None,
            agent_type_hash: None,
            parent_conversation_hash: None,
            status: AgentStatus::Running,
            usage: AgentUsage::default(),
        }
    }

    /// Set the conversation hash
    pub fn with_conversation_hash(mut self, hash: ConversationHash) -> Self {
        self.conversation_hash = Some(hash);
        self
    }

    /// Set the agent type hash
    pub fn with_agent_type_hash(mut self, hash: AgentTypeHash) -> Self {
        self.agent_type_hash = Some(hash);
        self
    }

    /// Set an explicit id instead of the generated one
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Check if this record is a child of some parent conversation
    pub fn is_child(&self) -> bool {
        !self.is_main && self.parent_conversation_hash.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_record() {
        let record = AgentRecord::main("main");
        assert!(record.is_main);
        assert!(!record.is_child());
        assert!(record.parent_conversation_hash.is_none());
    }

    #[test]
    fn test_child_record() {
        let parent = ConversationHash::new("p1");
        let record = AgentRecord::child("recon", parent.clone());
        assert!(!record.is_main);
        assert!(record.is_child());
        assert_eq!(record.parent_conversation_hash, Some(parent));
    }

    #[test]
    fn test_status_checks() {
        assert!(!AgentStatus::Running.is_terminal());
        assert!(AgentStatus::Completed.is_terminal());
        assert!(AgentStatus::errored("stream dropped").is_terminal());
    }

    #[test]
    fn test_optional_fields_skipped_when_none() {
        let record = AgentRecord::detached("scratch");
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("conversation_hash"));
        assert!(!json.contains("parent_conversation_hash"));
    }
}
