//! Configuration types shared by the coordinator and its builder.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tie-break applied when two fetch windows return a candle for the same period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DedupPolicy {
    /// The candle from the window with the later start wins.
    ///
    /// Venues tend to repeat the boundary candle at the head of the next
    /// window, and that later copy is usually the settled one.
    #[default]
    LatestWindowWins,
    /// The candle from the window with the earlier start wins.
    EarliestWindowWins,
}

/// Global configuration for the `SyncCoordinator`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncConfig {
    /// Timeout applied to every individual adapter call.
    pub provider_timeout: Duration,
    /// Optional deadline for a whole candle backfill. Windows still in flight
    /// when it elapses are reported as cancelled gaps.
    pub request_timeout: Option<Duration>,
    /// Upper bound on concurrently outstanding window fetches. `1` fetches sequentially.
    pub max_concurrent_fetches: usize,
    /// Duplicate-candle tie-break used by the merger.
    pub dedup_policy: DedupPolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_secs(5),
            request_timeout: None,
            max_concurrent_fetches: 4,
            dedup_policy: DedupPolicy::default(),
        }
    }
}
