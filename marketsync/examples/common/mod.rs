use std::sync::Arc;

use marketsync::VenueAdapter;
use tracing_subscriber::EnvFilter;

/// Adapter used by every example. Deterministic, no network.
#[must_use]
pub fn get_adapter() -> Arc<dyn VenueAdapter> {
    Arc::new(marketsync_mock::MockVenue::new())
}

/// Log to stderr; `RUST_LOG=marketsync=debug` shows window-level detail.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("marketsync=info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
