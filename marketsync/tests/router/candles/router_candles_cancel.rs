use std::time::Duration;

use marketsync::{FetchWindow, GapReason, SyncCoordinator};
use marketsync_mock::{DynamicMockAdapter, MockBehavior};

use crate::helpers::{coordinator, key, minute, raw_candle, ts};

fn m(i: i64) -> chrono::DateTime<chrono::Utc> {
    ts(i * 60)
}

#[tokio::test(start_paused = true)]
async fn request_deadline_cancels_in_flight_windows() {
    let (mock, ctrl) = DynamicMockAdapter::new_with_controller("ddsx");
    ctrl.serve_candle_history((0..10).map(|i| raw_candle(i, 1.0)).collect(), false)
        .await;
    ctrl.set_candle_behavior(m(4), MockBehavior::Hang).await;
    let c = SyncCoordinator::builder()
        .with_adapter(mock)
        .provider_timeout(Duration::from_secs(30))
        .request_timeout(Duration::from_secs(1))
        .build()
        .unwrap();

    let report = c
        .historical_candles(&key("BTC"), m(0), m(10), minute(), 4)
        .await
        .unwrap();
    assert_eq!(report.series.len(), 6, "completed windows are kept");
    assert_eq!(report.coverage.windows, 3);
    assert_eq!(report.coverage.gaps.len(), 1);
    assert_eq!(report.coverage.gaps[0].reason, GapReason::Cancelled);
    assert_eq!(report.coverage.gaps[0].window, FetchWindow::new(m(4), m(8)));
}

#[tokio::test(start_paused = true)]
async fn caller_cancellation_keeps_completed_windows() {
    let (mock, ctrl) = DynamicMockAdapter::new_with_controller("ddsx");
    ctrl.serve_candle_history((0..12).map(|i| raw_candle(i, 1.0)).collect(), false)
        .await;
    ctrl.set_candle_behavior(
        m(8),
        MockBehavior::Delayed(
            Duration::from_secs(10),
            (8..12).map(|i| raw_candle(i, 1.0)).collect(),
        ),
    )
    .await;
    let c = coordinator(mock);

    let cancel = tokio::time::sleep(Duration::from_secs(1));
    let report = c
        .historical_candles_with_cancel(&key("BTC"), m(0), m(12), minute(), 4, cancel)
        .await
        .unwrap();

    assert_eq!(report.series.len(), 8);
    let cancelled: Vec<_> = report.coverage.gaps_with(GapReason::Cancelled).collect();
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].window, FetchWindow::new(m(8), m(12)));
    assert_eq!(report.coverage.covered(), 2);
}

#[tokio::test]
async fn cancellation_before_start_reports_every_window() {
    let (mock, ctrl) = DynamicMockAdapter::new_with_controller("ddsx");
    ctrl.serve_candle_history((0..10).map(|i| raw_candle(i, 1.0)).collect(), false)
        .await;
    let c = coordinator(mock);

    let report = c
        .historical_candles_with_cancel(
            &key("BTC"),
            m(0),
            m(10),
            minute(),
            4,
            std::future::ready(()),
        )
        .await
        .unwrap();
    assert!(report.series.is_empty());
    assert_eq!(report.coverage.gaps.len(), 3);
    assert!(
        report
            .coverage
            .gaps
            .iter()
            .all(|g| g.reason == GapReason::Cancelled && g.error.is_none())
    );
}

#[tokio::test]
async fn cancel_that_never_fires_changes_nothing() {
    let (mock, ctrl) = DynamicMockAdapter::new_with_controller("ddsx");
    ctrl.serve_candle_history((0..10).map(|i| raw_candle(i, 1.0)).collect(), false)
        .await;
    let c = coordinator(mock);
    let (_tx, rx) = tokio::sync::oneshot::channel::<()>();

    let report = c
        .historical_candles_with_cancel(&key("BTC"), m(0), m(10), minute(), 4, async {
            let _ = rx.await;
            std::future::pending::<()>().await;
        })
        .await
        .unwrap();
    assert_eq!(report.series.len(), 10);
    assert!(report.coverage.is_complete());
}
