use std::collections::HashMap;
use std::time::Duration;

use marketsync_core::{FetchWindow, WindowOutcome};

/// Sleep for `deadline`, or never complete when there is none.
pub async fn deadline_or_pending(deadline: Option<Duration>) {
    match deadline {
        Some(d) => tokio::time::sleep(d).await,
        None => std::future::pending::<()>().await,
    }
}

/// Pair every planned window with its outcome; windows without one were
/// abandoned and become [`WindowOutcome::Cancelled`].
pub fn settle_windows(
    planned: &[FetchWindow],
    done: Vec<(FetchWindow, WindowOutcome)>,
) -> Vec<(FetchWindow, WindowOutcome)> {
    let mut by_window: HashMap<FetchWindow, WindowOutcome> = done.into_iter().collect();
    planned
        .iter()
        .map(|w| {
            let outcome = by_window.remove(w).unwrap_or(WindowOutcome::Cancelled);
            (*w, outcome)
        })
        .collect()
}
