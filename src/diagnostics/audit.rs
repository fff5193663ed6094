//! Append-only audit log for tree diagnostics
//!
//! Every logged lifecycle event appends one JSON record, with the invariant
//! report evaluated against the snapshot at that moment. The file is a
//! durability/debugging aid only; nothing reads it back at runtime.
//!
//! All I/O here is best-effort. A diagnostics failure must never destabilize
//! the session-tracking feature, so errors are logged at `warn` and
//! swallowed at this boundary.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::core::{InvariantReport, LineageResult, TreeSnapshot};

use super::invariants::check_invariants;

/// Directory under the workspace root holding diagnostics artifacts
const AUDIT_DIR: &str = ".lineage";

/// Audit log file name (newline-delimited JSON, one record per line)
const AUDIT_FILE: &str = "agent-tree-audit.jsonl";

/// An existing log larger than this is rotated aside on `initialize`
const MAX_AUDIT_BYTES: u64 = 5 * 1024 * 1024;

/// Well-known audit event types emitted by the bookkeeping layer.
///
/// Plain strings on the wire; `log` accepts any event type.
pub mod event {
    /// A new agent stream was classified and recorded
    pub const AGENT_STARTED: &str = "agent_started";
    /// An agent finished its turn(s) normally
    pub const AGENT_COMPLETED: &str = "agent_completed";
    /// An agent stream ended with an error
    pub const AGENT_ERRORED: &str = "agent_errored";
    /// A parent registered an expected-child claim
    pub const CLAIM_CREATED: &str = "claim_created";
    /// A new agent consumed a pending claim
    pub const CLAIM_MATCHED: &str = "claim_matched";
    /// A claim was purged unconsumed
    pub const CLAIM_EXPIRED: &str = "claim_expired";
    /// Scheduled check with no triggering event
    pub const PERIODIC_CHECK: &str = "periodic_check";
}

/// One line of the audit log
#[derive(Debug, Serialize)]
struct AuditRecord<'a> {
    timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    event_type: &'a str,
    /// Omitted entirely when not supplied, preserving the older record shape
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<Value>,
    invariants: InvariantReport,
}

/// Writes invariant reports to a per-workspace append-only audit log
#[derive(Debug, Clone)]
pub struct TreeDiagnostics {
    audit_path: PathBuf,
}

impl TreeDiagnostics {
    /// Create diagnostics rooted at a workspace directory
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        let root = workspace_root.into();
        Self {
            audit_path: root.join(AUDIT_DIR).join(AUDIT_FILE),
        }
    }

    /// Prepare the audit-log location: create directories and rotate an
    /// oversized existing file aside
    ///
    /// Idempotent and best-effort; failures are logged and discarded.
    pub fn initialize(&self) {
        if let Err(err) = self.try_initialize() {
            tracing::warn!("[TreeDiagnostics] Initialize failed: {}", err);
        }
    }

    /// Append one audit record for a lifecycle event
    ///
    /// Invariants are evaluated against the snapshot and recorded whether or
    /// not they hold. Write failures are logged and discarded.
    pub fn log(&self, event_type: &str, context: Option<Value>, snapshot: &TreeSnapshot) {
        let record = AuditRecord {
            timestamp: Utc::now(),
            event_type,
            context,
            invariants: check_invariants(snapshot),
        };

        if let Err(err) = self.try_append(&record) {
            tracing::warn!("[TreeDiagnostics] Audit write failed: {}", err);
        }
    }

    /// Path of the audit log file
    pub fn log_path(&self) -> &Path {
        &self.audit_path
    }

    fn try_initialize(&self) -> LineageResult<()> {
        if let Some(dir) = self.audit_path.parent() {
            fs::create_dir_all(dir)?;
        }

        let oversized = fs::metadata(&self.audit_path)
            .map(|m| m.len() > MAX_AUDIT_BYTES)
            .unwrap_or(false);
        if oversized {
            let rotated = self.audit_path.with_extension("jsonl.old");
            fs::rename(&self.audit_path, &rotated)?;
            tracing::debug!(
                "[TreeDiagnostics] Rotated oversized audit log to {}",
                rotated.display()
            );
        }

        Ok(())
    }

    fn try_append(&self, record: &AuditRecord<'_>) -> LineageResult<()> {
        if let Some(dir) = self.audit_path.parent() {
            fs::create_dir_all(dir)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.audit_path)?;

        let json = serde_json::to_string(record)?;
        writeln!(file, "{}", json)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AgentRecord;
    use std::io::BufRead;
    use tempfile::TempDir;

    fn read_lines(path: &Path) -> Vec<Value> {
        let file = fs::File::open(path).unwrap();
        std::io::BufReader::new(file)
            .lines()
            .map(|line| serde_json::from_str(&line.unwrap()).unwrap())
            .collect()
    }

    #[test]
    fn test_log_appends_one_record_per_call() {
        let temp = TempDir::new().unwrap();
        let diagnostics = TreeDiagnostics::new(temp.path());
        diagnostics.initialize();

        let snapshot = TreeSnapshot::new(vec![AgentRecord::main("main")], Vec::new());
        diagnostics.log(event::AGENT_STARTED, None, &snapshot);
        diagnostics.log(event::AGENT_COMPLETED, None, &snapshot);

        let records = read_lines(diagnostics.log_path());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["type"], "agent_started");
        assert_eq!(records[1]["type"], "agent_completed");
        assert_eq!(records[0]["invariants"]["single_main_agent"], true);
    }

    #[test]
    fn test_context_omitted_when_none() {
        let temp = TempDir::new().unwrap();
        let diagnostics = TreeDiagnostics::new(temp.path());
        diagnostics.initialize();

        let snapshot = TreeSnapshot::empty();
        diagnostics.log(event::PERIODIC_CHECK, None, &snapshot);
        diagnostics.log(
            event::CLAIM_CREATED,
            Some(serde_json::json!({"child": "recon"})),
            &snapshot,
        );

        let records = read_lines(diagnostics.log_path());
        assert!(records[0].get("context").is_none());
        assert_eq!(records[1]["context"]["child"], "recon");
    }

    #[test]
    fn test_violations_are_recorded_not_raised() {
        let temp = TempDir::new().unwrap();
        let diagnostics = TreeDiagnostics::new(temp.path());
        diagnostics.initialize();

        let snapshot = TreeSnapshot::new(
            vec![AgentRecord::main("a"), AgentRecord::main("b")],
            Vec::new(),
        );
        diagnostics.log(event::AGENT_STARTED, None, &snapshot);

        let records = read_lines(diagnostics.log_path());
        assert_eq!(records[0]["invariants"]["single_main_agent"], false);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let diagnostics = TreeDiagnostics::new(temp.path());

        diagnostics.initialize();
        diagnostics.initialize();
        assert!(diagnostics.log_path().parent().unwrap().exists());
    }

    #[test]
    fn test_initialize_rotates_oversized_log() {
        let temp = TempDir::new().unwrap();
        let diagnostics = TreeDiagnostics::new(temp.path());
        diagnostics.initialize();

        // Grow the log past the rotation threshold
        let big = "x".repeat(1024 * 1024);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(diagnostics.log_path())
            .unwrap();
        for _ in 0..6 {
            writeln!(file, "{}", big).unwrap();
        }
        drop(file);

        diagnostics.initialize();

        let rotated = diagnostics.log_path().with_extension("jsonl.old");
        assert!(rotated.exists());
        assert!(!diagnostics.log_path().exists());

        // Logging starts a fresh file
        diagnostics.log(event::PERIODIC_CHECK, None, &TreeSnapshot::empty());
        assert_eq!(read_lines(diagnostics.log_path()).len(), 1);
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        // Workspace root that cannot be created (parent is a file)
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("not-a-dir");
        fs::write(&blocker, b"file").unwrap();

        let diagnostics = TreeDiagnostics::new(&blocker);
        diagnostics.initialize();
        // Must not panic or propagate
        diagnostics.log(event::AGENT_STARTED, None, &TreeSnapshot::empty());
    }
}
