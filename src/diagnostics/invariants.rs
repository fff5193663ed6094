//! Tree invariant checking
//!
//! `check_invariants` is a pure function over a `TreeSnapshot`. It reports,
//! it never enforces: a violated invariant becomes a `false` flag in the
//! report and ultimately a line in the audit log, nothing more.

use std::collections::HashSet;

use crate::core::{InvariantReport, TreeSnapshot};

/// Evaluate all named invariants against a snapshot
pub fn check_invariants(snapshot: &TreeSnapshot) -> InvariantReport {
    let agents = &snapshot.agents;
    let main_count = agents.iter().filter(|a| a.is_main).count();

    let single_main_agent = main_count <= 1;
    // Vacuously true on an empty tree
    let main_agent_exists = agents.is_empty() || main_count == 1;

    // Every child's parent hash must resolve to some *other* agent's
    // conversation hash. One unresolved reference fails both views.
    let children_resolved = agents.iter().all(|agent| {
        if agent.is_main {
            return true;
        }
        match &agent.parent_conversation_hash {
            None => true,
            Some(parent) => agents
                .iter()
                .any(|other| other.id != agent.id && other.conversation_hash.as_ref() == Some(parent)),
        }
    });

    let claims_have_valid_parent = snapshot.claims.iter().all(|claim| {
        agents.iter().any(|agent| {
            agent.conversation_hash.as_ref() == Some(&claim.parent_conversation_hash)
                && agent.agent_type_hash.as_ref() == Some(&claim.parent_agent_type_hash)
        })
    });

    let mut seen_ids = HashSet::new();
    let no_duplicate_ids = agents.iter().all(|a| seen_ids.insert(a.id.as_str()));

    let no_expired_claims = snapshot
        .claims
        .iter()
        .all(|c| c.expires_at > snapshot.captured_at);

    InvariantReport {
        single_main_agent,
        main_agent_exists,
        all_children_have_parent: children_resolved,
        no_orphan_children: children_resolved,
        claims_have_valid_parent,
        no_duplicate_ids,
        no_expired_claims,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AgentRecord, AgentTypeHash, ClaimView, ConversationHash};
    use chrono::{Duration, Utc};

    fn claim_view(parent: &str, parent_type: &str, ttl_secs: i64) -> ClaimView {
        let now = Utc::now();
        ClaimView {
            parent_conversation_hash: ConversationHash::new(parent),
            parent_agent_type_hash: AgentTypeHash::new(parent_type),
            expected_child_name: "recon".to_string(),
            expected_child_type_hash: None,
            created_at: now,
            expires_at: now + Duration::seconds(ttl_secs),
        }
    }

    #[test]
    fn test_empty_snapshot_all_hold() {
        let report = check_invariants(&TreeSnapshot::empty());
        assert!(report.all_hold());
    }

    #[test]
    fn test_two_main_agents() {
        let snapshot = TreeSnapshot::new(
            vec![AgentRecord::main("main"), AgentRecord::main("impostor")],
            Vec::new(),
        );
        let report = check_invariants(&snapshot);

        assert!(!report.single_main_agent);
        assert!(!report.main_agent_exists);
        assert!(report.no_duplicate_ids);
    }

    #[test]
    fn test_no_main_agent_among_others() {
        let snapshot = TreeSnapshot::new(vec![AgentRecord::detached("stray")], Vec::new());
        let report = check_invariants(&snapshot);

        assert!(report.single_main_agent);
        assert!(!report.main_agent_exists);
    }

    #[test]
    fn test_orphan_child() {
        let main = AgentRecord::main("main")
            .with_conversation_hash(ConversationHash::new("main-conv"));
        let orphan = AgentRecord::child("recon", ConversationHash::new("missing"));

        let snapshot = TreeSnapshot::new(vec![main, orphan], Vec::new());
        let report = check_invariants(&snapshot);

        assert!(!report.all_children_have_parent);
        assert!(!report.no_orphan_children);
        assert!(report.single_main_agent);
    }

    #[test]
    fn test_resolved_child() {
        let parent_hash = ConversationHash::new("main-conv");
        let main = AgentRecord::main("main").with_conversation_hash(parent_hash.clone());
        let child = AgentRecord::child("recon", parent_hash);

        let snapshot = TreeSnapshot::new(vec![main, child], Vec::new());
        let report = check_invariants(&snapshot);

        assert!(report.all_children_have_parent);
        assert!(report.no_orphan_children);
    }

    #[test]
    fn test_self_parent_does_not_resolve() {
        // A child may not satisfy its own parent reference
        let hash = ConversationHash::new("loop");
        let mut child = AgentRecord::child("recon", hash.clone());
        child.conversation_hash = Some(hash);

        let snapshot = TreeSnapshot::new(vec![child], Vec::new());
        let report = check_invariants(&snapshot);

        assert!(!report.no_orphan_children);
    }

    #[test]
    fn test_claim_with_valid_parent() {
        let main = AgentRecord::main("main")
            .with_conversation_hash(ConversationHash::new("main-conv"))
            .with_agent_type_hash(AgentTypeHash::new("main-type"));

        let snapshot =
            TreeSnapshot::new(vec![main], vec![claim_view("main-conv", "main-type", 30)]);
        let report = check_invariants(&snapshot);

        assert!(report.claims_have_valid_parent);
    }

    #[test]
    fn test_claim_with_unknown_parent() {
        let main = AgentRecord::main("main")
            .with_conversation_hash(ConversationHash::new("main-conv"))
            .with_agent_type_hash(AgentTypeHash::new("main-type"));

        let snapshot =
            TreeSnapshot::new(vec![main], vec![claim_view("other-conv", "main-type", 30)]);
        let report = check_invariants(&snapshot);

        assert!(!report.claims_have_valid_parent);
    }

    #[test]
    fn test_claim_parent_must_match_both_hashes() {
        let main = AgentRecord::main("main")
            .with_conversation_hash(ConversationHash::new("main-conv"))
            .with_agent_type_hash(AgentTypeHash::new("main-type"));

        let snapshot =
            TreeSnapshot::new(vec![main], vec![claim_view("main-conv", "wrong-type", 30)]);
        let report = check_invariants(&snapshot);

        assert!(!report.claims_have_valid_parent);
    }

    #[test]
    fn test_duplicate_ids() {
        let a = AgentRecord::main("main").with_id("same");
        let b = AgentRecord::detached("other").with_id("same");

        let snapshot = TreeSnapshot::new(vec![a, b], Vec::new());
        let report = check_invariants(&snapshot);

        assert!(!report.no_duplicate_ids);
    }

    #[test]
    fn test_expiry_evaluated_against_captured_at() {
        // A live claim becomes expired when observed from a later instant
        let snapshot = TreeSnapshot::new(Vec::new(), vec![claim_view("p", "t", 30)])
            .with_captured_at(Utc::now() + Duration::seconds(60));
        let report = check_invariants(&snapshot);

        assert!(!report.no_expired_claims);
    }

    #[test]
    fn test_expired_claim() {
        let main = AgentRecord::main("main")
            .with_conversation_hash(ConversationHash::new("main-conv"))
            .with_agent_type_hash(AgentTypeHash::new("main-type"));

        let snapshot =
            TreeSnapshot::new(vec![main], vec![claim_view("main-conv", "main-type", -5)]);
        let report = check_invariants(&snapshot);

        assert!(!report.no_expired_claims);
        assert!(report.claims_have_valid_parent);
    }
}
