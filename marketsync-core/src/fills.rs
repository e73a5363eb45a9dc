//! Forwarding of private trade executions to a consumer channel.

use tokio::sync::mpsc;

use crate::SyncError;
use crate::market::trading::Fill;

/// Forwards batches of [`Fill`] to a bounded channel when enabled.
///
/// A disabled feed accepts and drops every batch.
#[derive(Debug, Clone)]
pub struct FillFeed {
    venue: &'static str,
    tx: Option<mpsc::Sender<Vec<Fill>>>,
}

impl FillFeed {
    /// Create a feed for `venue`. When `enabled` is false the sender is dropped immediately.
    #[must_use]
    pub fn new(venue: &'static str, enabled: bool, tx: mpsc::Sender<Vec<Fill>>) -> Self {
        Self {
            venue,
            tx: enabled.then_some(tx),
        }
    }

    /// A feed that drops everything.
    #[must_use]
    pub const fn disabled(venue: &'static str) -> Self {
        Self { venue, tx: None }
    }

    /// Whether batches are forwarded.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    /// Venue this feed belongs to.
    #[must_use]
    pub const fn venue(&self) -> &'static str {
        self.venue
    }

    /// Forward a batch. Empty batches are ignored.
    ///
    /// Waits for channel capacity.
    ///
    /// # Errors
    /// Returns `Other` if the feed is enabled and the receiver was dropped.
    pub async fn update(&self, fills: Vec<Fill>) -> Result<(), SyncError> {
        let Some(tx) = &self.tx else {
            return Ok(());
        };
        if fills.is_empty() {
            return Ok(());
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(venue = self.venue, count = fills.len(), "forwarding fills");
        tx.send(fills)
            .await
            .map_err(|_| SyncError::Other(format!("{}: fill receiver closed", self.venue)))
    }
}
