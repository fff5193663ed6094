//! ClaimRegistry - Matches expected children against arriving agent streams
//!
//! The registry holds pending claims with a TTL and answers one question:
//! when a new agent stream begins, which parent (if any) pre-announced it?
//!
//! Matching is FIFO with three strategies, tried in order:
//! 1. exact match on the declared child name (most reliable);
//! 2. match on the expected child type hash, for generically-named children;
//! 3. if the host could not determine the child's name, the single earliest
//!    live claim (assumes spawn order roughly predicts arrival order).
//!
//! A sweep task periodically purges expired claims. The sweep is advisory:
//! `match_claim` re-checks expiry live, so an expired-but-unswept claim can
//! never match.

use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use tokio::task::JoinHandle;

use crate::core::{AgentTypeHash, ClaimView, ConversationHash};

use super::claim::{ClaimMatch, DetectedName, PendingClaim};
use super::clock::{Clock, SystemClock};

/// Default time a claim stays eligible for matching.
///
/// Hosts with slow child startup should raise this via `with_claim_ttl`;
/// the TTL is deliberately configuration, not a built-in constant.
pub const DEFAULT_CLAIM_TTL: StdDuration = StdDuration::from_secs(30);

/// Default interval between sweep passes (must stay below the TTL)
pub const DEFAULT_SWEEP_INTERVAL: StdDuration = StdDuration::from_secs(10);

/// Configuration for a `ClaimRegistry`
#[derive(Debug, Clone)]
pub struct ClaimRegistryConfig {
    /// How long a claim stays eligible for matching
    pub claim_ttl: StdDuration,

    /// How often the sweep task purges expired claims
    pub sweep_interval: StdDuration,
}

impl ClaimRegistryConfig {
    /// Set the claim TTL
    pub fn with_claim_ttl(mut self, ttl: StdDuration) -> Self {
        self.claim_ttl = ttl;
        self
    }

    /// Set the sweep interval
    pub fn with_sweep_interval(mut self, interval: StdDuration) -> Self {
        self.sweep_interval = interval;
        self
    }
}

impl Default for ClaimRegistryConfig {
    fn default() -> Self {
        Self {
            claim_ttl: DEFAULT_CLAIM_TTL,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

/// In-memory store of pending "expect child X from parent Y" assertions
///
/// An explicitly owned resource: construct it with an injected clock, call
/// `dispose` when the tracking feature shuts down. Every operation locks the
/// claim collection for its full duration, so calls are atomic relative to
/// each other and to the sweep task.
pub struct ClaimRegistry {
    /// Pending claims in creation order
    claims: Arc<Mutex<Vec<PendingClaim>>>,

    /// Injected time source
    clock: Arc<dyn Clock>,

    /// Claim TTL, pre-converted for timestamp arithmetic
    ttl: Duration,

    /// Sweep task handle; `None` once disposed (or when no runtime exists)
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl ClaimRegistry {
    /// Create a registry with the given configuration and clock
    ///
    /// Spawns the cooperative sweep task on the current tokio runtime. When
    /// called outside a runtime the sweep is skipped; expiry still holds
    /// because `match_claim` checks it live.
    pub fn new(config: ClaimRegistryConfig, clock: Arc<dyn Clock>) -> Self {
        let claims: Arc<Mutex<Vec<PendingClaim>>> = Arc::new(Mutex::new(Vec::new()));

        let sweeper = match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let claims = Arc::clone(&claims);
                let clock = Arc::clone(&clock);
                let interval = config.sweep_interval;
                Some(handle.spawn(async move {
                    let mut ticker = tokio::time::interval(interval);
                    loop {
                        ticker.tick().await;
                        let now = clock.now();
                        let mut pending = claims.lock().unwrap();
                        let before = pending.len();
                        pending.retain(|c| c.is_live(now));
                        let removed = before - pending.len();
                        if removed > 0 {
                            tracing::debug!(
                                "[ClaimRegistry] Sweep removed {} expired claim(s)",
                                removed
                            );
                        }
                    }
                }))
            }
            Err(_) => {
                tracing::debug!(
                    "[ClaimRegistry] No tokio runtime, skipping sweep task"
                );
                None
            }
        };

        Self {
            claims,
            clock,
            ttl: Duration::from_std(config.claim_ttl).unwrap_or(Duration::MAX),
            sweeper: Mutex::new(sweeper),
        }
    }

    /// Create a registry with default configuration and the system clock
    pub fn with_defaults() -> Self {
        Self::new(ClaimRegistryConfig::default(), Arc::new(SystemClock))
    }

    /// Register a claim: "expect a child named `expected_child_name` shortly,
    /// attribute it to this parent"
    ///
    /// No uniqueness constraint: a parent spawning two same-named subagents
    /// sequentially legitimately registers two identical claims.
    pub fn create_claim(
        &self,
        parent_conversation_hash: ConversationHash,
        parent_agent_type_hash: AgentTypeHash,
        expected_child_name: impl Into<String>,
        expected_child_type_hash: Option<AgentTypeHash>,
    ) -> ClaimView {
        let now = self.clock.now();
        // Saturate instead of overflowing for absurdly large TTLs
        let expires_at = now
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let claim = PendingClaim {
            parent_conversation_hash,
            parent_agent_type_hash,
            expected_child_name: expected_child_name.into(),
            expected_child_type_hash,
            created_at: now,
            expires_at,
        };
        let view = claim.view();

        tracing::debug!(
            "[ClaimRegistry] Claim created: parent={} child={}",
            view.parent_conversation_hash,
            view.expected_child_name
        );

        self.claims.lock().unwrap().push(claim);
        view
    }

    /// Try to attribute a newly observed agent to a pending claim
    ///
    /// Only claims that are still live participate, in creation order. On
    /// success the matched claim is consumed. `None` is the expected outcome
    /// when no parent announced this agent; the caller falls back to its own
    /// classification.
    pub fn match_claim(
        &self,
        detected_name: &DetectedName,
        agent_type_hash: &AgentTypeHash,
    ) -> Option<ClaimMatch> {
        let now = self.clock.now();
        let mut claims = self.claims.lock().unwrap();

        // FIFO order over live claims
        let mut live: Vec<usize> = claims
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_live(now))
            .map(|(i, _)| i)
            .collect();
        live.sort_by_key(|&i| claims[i].created_at);

        let by_name = match detected_name {
            DetectedName::Named(name) => live
                .iter()
                .copied()
                .find(|&i| claims[i].expected_child_name == *name),
            DetectedName::Unknown => None,
        };

        let by_type = || {
            live.iter()
                .copied()
                .find(|&i| claims[i].expected_child_type_hash.as_ref() == Some(agent_type_hash))
        };

        // FIFO fallback only applies when the host could not name the child
        let by_order = || match detected_name {
            DetectedName::Unknown => live.first().copied(),
            DetectedName::Named(_) => None,
        };

        let index = by_name.or_else(by_type).or_else(by_order)?;
        let claim = claims.remove(index);

        tracing::debug!(
            "[ClaimRegistry] Claim matched: parent={} child={}",
            claim.parent_conversation_hash,
            claim.expected_child_name
        );

        Some(ClaimMatch {
            parent_conversation_hash: claim.parent_conversation_hash,
            expected_child_name: claim.expected_child_name,
        })
    }

    /// Purge expired claims, returning how many were removed
    ///
    /// Advisory housekeeping: an expired claim already fails `match_claim`
    /// whether or not it has been swept.
    pub fn cleanup_expired(&self) -> usize {
        let now = self.clock.now();
        let mut claims = self.claims.lock().unwrap();
        let before = claims.len();
        claims.retain(|c| c.is_live(now));
        before - claims.len()
    }

    /// Drop all pending claims; the sweep task keeps running
    pub fn clear_all(&self) {
        self.claims.lock().unwrap().clear();
    }

    /// Number of pending claims (expired-but-unswept claims included)
    pub fn pending_claim_count(&self) -> usize {
        self.claims.lock().unwrap().len()
    }

    /// Defensive copy of all pending claims
    pub fn claims(&self) -> Vec<ClaimView> {
        self.claims.lock().unwrap().iter().map(|c| c.view()).collect()
    }

    /// Stop the sweep task and drop all claims
    ///
    /// Idempotent: the second and later calls are no-ops. The handle is
    /// taken before aborting, so a tick scheduled just before disposal
    /// either completes or is fully cancelled, never left half-applied.
    pub fn dispose(&self) {
        let handle = self.sweeper.lock().unwrap().take();
        match handle {
            Some(handle) => {
                handle.abort();
                self.claims.lock().unwrap().clear();
                tracing::debug!("[ClaimRegistry] Disposed");
            }
            None => {
                // Already disposed, or never had a sweeper; still make sure
                // no claims linger.
                self.claims.lock().unwrap().clear();
            }
        }
    }
}

impl Drop for ClaimRegistry {
    fn drop(&mut self) {
        if let Some(handle) = self.sweeper.lock().unwrap().take() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for ClaimRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimRegistry")
            .field("pending_claims", &self.pending_claim_count())
            .field("ttl", &self.ttl)
            .finish()
    }
}
