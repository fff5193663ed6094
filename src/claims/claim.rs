//! Claim types
//!
//! A claim is a short-lived assertion by a parent agent: "expect a child
//! (named/typed thus) shortly, attribute it to me." Claims live exclusively
//! inside the `ClaimRegistry`; external code only sees `ClaimView`
//! projections and `ClaimMatch` results.

use chrono::{DateTime, Utc};

use crate::core::{AgentTypeHash, ClaimView, ConversationHash};

/// A child name as reported by the host when a new agent stream begins
///
/// The host sometimes starts a child stream before the child's declared name
/// is determinable. That case is an explicit variant rather than a magic
/// string, so an agent legitimately named anything at all can never be
/// mistaken for "name unknown".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectedName {
    /// The host supplied the child's declared name
    Named(String),

    /// The name was not determinable when the stream began
    Unknown,
}

impl DetectedName {
    /// Create a named variant
    pub fn named(name: impl Into<String>) -> Self {
        DetectedName::Named(name.into())
    }
}

/// A pending expectation of a child agent, owned by the registry
#[derive(Debug, Clone)]
pub(crate) struct PendingClaim {
    /// Conversation hash of the parent registering the expectation
    pub parent_conversation_hash: ConversationHash,

    /// Agent type hash of the parent
    pub parent_agent_type_hash: AgentTypeHash,

    /// Declared name of the expected child
    pub expected_child_name: String,

    /// Declared type hash of the expected child, when the parent knows it
    pub expected_child_type_hash: Option<AgentTypeHash>,

    /// When the claim was registered
    pub created_at: DateTime<Utc>,

    /// Past this instant the claim can no longer match
    pub expires_at: DateTime<Utc>,
}

impl PendingClaim {
    /// Whether the claim is still eligible for matching at `now`
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    /// Read-only projection handed out to callers
    pub fn view(&self) -> ClaimView {
        ClaimView {
            parent_conversation_hash: self.parent_conversation_hash.clone(),
            parent_agent_type_hash: self.parent_agent_type_hash.clone(),
            expected_child_name: self.expected_child_name.clone(),
            expected_child_type_hash: self.expected_child_type_hash.clone(),
            created_at: self.created_at,
            expires_at: self.expires_at,
        }
    }
}

/// Successful result of matching a new agent against a pending claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimMatch {
    /// The parent conversation the new agent should be attributed to
    pub parent_conversation_hash: ConversationHash,

    /// The child name the parent declared when it registered the claim
    pub expected_child_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_claim(now: DateTime<Utc>) -> PendingClaim {
        PendingClaim {
            parent_conversation_hash: ConversationHash::new("p1"),
            parent_agent_type_hash: AgentTypeHash::new("t1"),
            expected_child_name: "recon".to_string(),
            expected_child_type_hash: None,
            created_at: now,
            expires_at: now + Duration::seconds(30),
        }
    }

    #[test]
    fn test_liveness_boundary() {
        let now = Utc::now();
        let claim = sample_claim(now);

        assert!(claim.is_live(now));
        assert!(claim.is_live(now + Duration::seconds(29)));
        // Exactly at expiry the claim is dead
        assert!(!claim.is_live(now + Duration::seconds(30)));
    }

    #[test]
    fn test_view_projection() {
        let now = Utc::now();
        let claim = sample_claim(now);
        let view = claim.view();

        assert_eq!(view.parent_conversation_hash.as_str(), "p1");
        assert_eq!(view.expected_child_name, "recon");
        assert_eq!(view.expires_at, claim.expires_at);
    }
}
