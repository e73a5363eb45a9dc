use marketsync::{Capability, DedupPolicy, FetchWindow, SyncCoordinator};
use marketsync_mock::{DynamicMockAdapter, MockBehavior};
use rust_decimal::Decimal;

use crate::helpers::{coordinator, key, minute, raw_candle, ts};

fn m(i: i64) -> chrono::DateTime<chrono::Utc> {
    ts(i * 60)
}

#[tokio::test]
async fn ten_periods_limit_four_fetches_three_windows() {
    let (mock, ctrl) = DynamicMockAdapter::new_with_controller("ddsx");
    ctrl.serve_candle_history((0..10).map(|i| raw_candle(i, 1.0)).collect(), true)
        .await;
    let c = coordinator(mock);

    let report = c
        .historical_candles(&key("BTC"), m(0), m(10), minute(), 4)
        .await
        .unwrap();

    let mut windows = ctrl.candle_windows().await;
    windows.sort();
    assert_eq!(
        windows,
        vec![
            FetchWindow::new(m(0), m(4)),
            FetchWindow::new(m(4), m(8)),
            FetchWindow::new(m(8), m(10)),
        ]
    );
    let starts: Vec<_> = report.series.iter().map(|c| c.period_start).collect();
    assert_eq!(starts, (0..10).map(m).collect::<Vec<_>>());
    assert_eq!(report.coverage.windows, 3);
    assert!(report.coverage.is_complete());
    assert_eq!(report.period, minute());
    assert_eq!(report.key, key("BTC"));
}

#[tokio::test]
async fn boundary_candle_from_later_window_wins_by_default() {
    let (mock, ctrl) = DynamicMockAdapter::new_with_controller("ddsx");
    // the first window also returns the candle at minute 4 (boundary repeat)
    ctrl.serve_candle_history((0..8).map(|i| raw_candle(i, 1.0)).collect(), true)
        .await;
    ctrl.set_candle_behavior(
        m(4),
        MockBehavior::Return((4..8).map(|i| raw_candle(i, 2.0)).collect()),
    )
    .await;
    let c = coordinator(mock);

    let report = c
        .historical_candles(&key("BTC"), m(0), m(8), minute(), 4)
        .await
        .unwrap();
    assert_eq!(report.series.len(), 8);
    let at_4 = report.series.iter().find(|c| c.period_start == m(4)).unwrap();
    assert_eq!(at_4.close, Decimal::from(2));
}

#[tokio::test]
async fn earliest_window_policy_keeps_the_first_copy() {
    let (mock, ctrl) = DynamicMockAdapter::new_with_controller("ddsx");
    ctrl.serve_candle_history((0..8).map(|i| raw_candle(i, 1.0)).collect(), true)
        .await;
    ctrl.set_candle_behavior(
        m(4),
        MockBehavior::Return((4..8).map(|i| raw_candle(i, 2.0)).collect()),
    )
    .await;
    let c = SyncCoordinator::builder()
        .with_adapter(mock)
        .dedup_policy(DedupPolicy::EarliestWindowWins)
        .build()
        .unwrap();

    let report = c
        .historical_candles(&key("BTC"), m(0), m(8), minute(), 4)
        .await
        .unwrap();
    let at_4 = report.series.iter().find(|c| c.period_start == m(4)).unwrap();
    assert_eq!(at_4.close, Decimal::from(1));
    let at_5 = report.series.iter().find(|c| c.period_start == m(5)).unwrap();
    assert_eq!(at_5.close, Decimal::from(2));
}

#[tokio::test]
async fn out_of_range_candles_are_clipped() {
    let (mock, ctrl) = DynamicMockAdapter::new_with_controller("ddsx");
    let noisy: Vec<_> = [-3, -1, 0, 1, 2, 5, 6, 9]
        .into_iter()
        .map(|i| raw_candle(i, 1.0))
        .collect();
    ctrl.set_default_candle_behavior(MockBehavior::Return(noisy))
        .await;
    let c = coordinator(mock);

    let report = c
        .historical_candles(&key("BTC"), m(0), m(6), minute(), 3)
        .await
        .unwrap();
    let starts: Vec<_> = report.series.iter().map(|c| c.period_start).collect();
    assert_eq!(starts, vec![m(0), m(1), m(2), m(5)]);
    assert!(starts.iter().all(|t| *t >= m(0) && *t < m(6)));
}

#[tokio::test]
async fn extended_uses_the_adapter_limit() {
    let (mock, ctrl) = DynamicMockAdapter::builder("ddsx")
        .max_candles_per_request(3)
        .build();
    ctrl.serve_candle_history((0..9).map(|i| raw_candle(i, 1.0)).collect(), false)
        .await;
    let c = coordinator(mock);

    let report = c
        .historical_candles_extended(&key("BTC"), m(0), m(9), minute())
        .await
        .unwrap();
    assert_eq!(report.coverage.windows, 3);
    assert_eq!(report.series.len(), 9);
    assert_eq!(ctrl.calls(Capability::Candles).await, 3);
}

#[tokio::test]
async fn sequential_fetching_gives_the_same_result() {
    let (mock, ctrl) = DynamicMockAdapter::new_with_controller("ddsx");
    ctrl.serve_candle_history((0..20).map(|i| raw_candle(i, 1.0)).collect(), true)
        .await;
    let sequential = SyncCoordinator::builder()
        .with_adapter(mock.clone())
        .max_concurrent_fetches(1)
        .build()
        .unwrap();
    let concurrent = coordinator(mock);

    let a = sequential
        .historical_candles(&key("BTC"), m(0), m(20), minute(), 3)
        .await
        .unwrap();
    let b = concurrent
        .historical_candles(&key("BTC"), m(0), m(20), minute(), 3)
        .await
        .unwrap();
    assert_eq!(a, b);
}
