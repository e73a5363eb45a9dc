use std::time::Duration;

use marketsync::{FetchWindow, GapReason, SyncCoordinator, SyncError};
use marketsync_mock::{DynamicMockAdapter, MockBehavior};

use crate::helpers::{coordinator, key, minute, raw_candle, ts};

fn m(i: i64) -> chrono::DateTime<chrono::Utc> {
    ts(i * 60)
}

#[tokio::test]
async fn one_failed_window_leaves_one_gap() {
    let (mock, ctrl) = DynamicMockAdapter::new_with_controller("ddsx");
    ctrl.serve_candle_history((0..10).map(|i| raw_candle(i, 1.0)).collect(), false)
        .await;
    ctrl.set_candle_behavior(m(4), MockBehavior::Fail(SyncError::Other("429".into())))
        .await;
    let c = coordinator(mock);

    let report = c
        .historical_candles(&key("BTC"), m(0), m(10), minute(), 4)
        .await
        .unwrap();

    let starts: Vec<_> = report.series.iter().map(|c| c.period_start).collect();
    assert_eq!(starts, vec![m(0), m(1), m(2), m(3), m(8), m(9)]);
    assert_eq!(report.coverage.gaps.len(), 1);
    let gap = &report.coverage.gaps[0];
    assert_eq!(gap.window, FetchWindow::new(m(4), m(8)));
    assert_eq!(gap.reason, GapReason::TransportError);
    match gap.error.as_ref() {
        Some(SyncError::Transport { venue, target, msg }) => {
            assert_eq!(venue, "ddsx");
            assert_eq!(target, &gap.window.to_string());
            assert!(msg.contains("429"));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn all_windows_failing_still_returns_a_report() {
    let (mock, ctrl) = DynamicMockAdapter::new_with_controller("ddsx");
    ctrl.set_default_candle_behavior(MockBehavior::Fail(SyncError::transport(
        "ddsx", "candles", "down",
    )))
    .await;
    let c = coordinator(mock);

    let report = c
        .historical_candles(&key("BTC"), m(0), m(10), minute(), 4)
        .await
        .expect("window failures are not request errors");
    assert!(report.series.is_empty());
    assert_eq!(report.coverage.windows, 3);
    assert_eq!(report.coverage.gaps.len(), 3);
    assert!(
        report
            .coverage
            .gaps
            .iter()
            .all(|g| g.reason == GapReason::TransportError)
    );
    assert_eq!(report.coverage.covered(), 0);
}

#[tokio::test]
async fn empty_window_is_an_empty_result_gap() {
    let (mock, ctrl) = DynamicMockAdapter::new_with_controller("ddsx");
    // nothing between minutes 4 and 8
    let history = [0, 1, 2, 3, 8, 9].into_iter().map(|i| raw_candle(i, 1.0)).collect();
    ctrl.serve_candle_history(history, false).await;
    let c = coordinator(mock);

    let report = c
        .historical_candles(&key("BTC"), m(0), m(10), minute(), 4)
        .await
        .unwrap();
    assert_eq!(report.series.len(), 6);
    let gaps: Vec<_> = report.coverage.gaps_with(GapReason::EmptyResult).collect();
    assert_eq!(gaps.len(), 1);
    assert_eq!(gaps[0].window, FetchWindow::new(m(4), m(8)));
    assert!(gaps[0].error.is_none());
}

#[tokio::test(start_paused = true)]
async fn slow_window_times_out_as_transport_gap() {
    let (mock, ctrl) = DynamicMockAdapter::new_with_controller("ddsx");
    ctrl.serve_candle_history((0..10).map(|i| raw_candle(i, 1.0)).collect(), false)
        .await;
    ctrl.set_candle_behavior(m(8), MockBehavior::Hang).await;
    let c = SyncCoordinator::builder()
        .with_adapter(mock)
        .provider_timeout(Duration::from_secs(2))
        .build()
        .unwrap();

    let report = c
        .historical_candles(&key("BTC"), m(0), m(10), minute(), 4)
        .await
        .unwrap();
    assert_eq!(report.series.len(), 8);
    assert_eq!(report.coverage.gaps.len(), 1);
    let gap = &report.coverage.gaps[0];
    assert_eq!(gap.reason, GapReason::TransportError);
    assert_eq!(
        gap.error,
        Some(SyncError::provider_timeout("ddsx", "candles"))
    );
}
