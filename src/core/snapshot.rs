//! Point-in-time snapshots of the agent tree
//!
//! The bookkeeping layer rebuilds a `TreeSnapshot` from its own state on
//! every diagnostics check. The snapshot is immutable once built; the
//! invariant checker only reads it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::hash::{AgentTypeHash, ConversationHash};
use super::record::AgentRecord;

/// Read-only projection of one pending claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimView {
    /// Conversation hash of the parent that registered the claim
    pub parent_conversation_hash: ConversationHash,

    /// Agent type hash of the parent
    pub parent_agent_type_hash: AgentTypeHash,

    /// Declared name of the expected child
    pub expected_child_name: String,

    /// Declared type hash of the expected child, if the parent knew it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_child_type_hash: Option<AgentTypeHash>,

    /// When the claim was registered
    pub created_at: DateTime<Utc>,

    /// When the claim stops being eligible for matching
    pub expires_at: DateTime<Utc>,
}

/// Immutable point-in-time view of all known agents and pending claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSnapshot {
    /// All agents known to the bookkeeping layer
    pub agents: Vec<AgentRecord>,

    /// All claims still pending in the registry
    pub claims: Vec<ClaimView>,

    /// Id of the main agent record, if one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_agent_id: Option<String>,

    /// Id of the agent currently streaming, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_agent_id: Option<String>,

    /// Observation instant; claim expiry is evaluated against this
    pub captured_at: DateTime<Utc>,
}

impl TreeSnapshot {
    /// Create an empty snapshot captured now
    pub fn empty() -> Self {
        Self {
            agents: Vec::new(),
            claims: Vec::new(),
            main_agent_id: None,
            active_agent_id: None,
            captured_at: Utc::now(),
        }
    }

    /// Create a snapshot from agents and claims, captured now
    pub fn new(agents: Vec<AgentRecord>, claims: Vec<ClaimView>) -> Self {
        let main_agent_id = agents
            .iter()
            .find(|a| a.is_main)
            .map(|a| a.id.clone());
        Self {
            agents,
            claims,
            main_agent_id,
            active_agent_id: None,
            captured_at: Utc::now(),
        }
    }

    /// Set the active agent id
    pub fn with_active_agent(mut self, id: impl Into<String>) -> Self {
        self.active_agent_id = Some(id.into());
        self
    }

    /// Set the observation instant (tests use this to pin the clock)
    pub fn with_captured_at(mut self, at: DateTime<Utc>) -> Self {
        self.captured_at = at;
        self
    }

    /// Records whose parent hash equals the given conversation hash
    pub fn children_of<'a>(
        &'a self,
        parent: &'a ConversationHash,
    ) -> impl Iterator<Item = &'a AgentRecord> {
        self.agents
            .iter()
            .filter(move |a| a.parent_conversation_hash.as_ref() == Some(parent))
    }
}

/// Named well-formedness checks over one `TreeSnapshot`
///
/// Violations are reported, never enforced: a `false` flag is data for the
/// audit log, not a reason to reject the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvariantReport {
    /// At most one agent has `is_main = true`
    pub single_main_agent: bool,

    /// The tree is empty, or exactly one main agent exists
    pub main_agent_exists: bool,

    /// Every child's parent hash resolves to some other agent
    pub all_children_have_parent: bool,

    /// Complement view of the same resolution check
    pub no_orphan_children: bool,

    /// Every claim's parent pair matches some agent's identity pair
    pub claims_have_valid_parent: bool,

    /// All agent ids are pairwise distinct
    pub no_duplicate_ids: bool,

    /// Every pending claim still has positive time-to-live
    pub no_expired_claims: bool,
}

impl InvariantReport {
    /// True when every invariant holds
    pub fn all_hold(&self) -> bool {
        self.single_main_agent
            && self.main_agent_exists
            && self.all_children_have_parent
            && self.no_orphan_children
            && self.claims_have_valid_parent
            && self.no_duplicate_ids
            && self.no_expired_claims
    }
}
