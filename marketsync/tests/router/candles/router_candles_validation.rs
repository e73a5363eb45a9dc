use chrono::TimeDelta;
use marketsync::{Capability, SyncError};
use marketsync_mock::DynamicMockAdapter;

use crate::helpers::{coordinator, key, minute, ts};

#[tokio::test]
async fn inverted_range_is_rejected_before_any_fetch() {
    let (mock, ctrl) = DynamicMockAdapter::new_with_controller("ddsx");
    let c = coordinator(mock);
    let err = c
        .historical_candles(&key("BTC"), ts(600), ts(0), minute(), 4)
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::InvalidRange { .. }));
    assert_eq!(ctrl.calls(Capability::Candles).await, 0);
}

#[tokio::test]
async fn empty_range_needs_no_fetch() {
    let (mock, ctrl) = DynamicMockAdapter::new_with_controller("ddsx");
    let c = coordinator(mock);
    let report = c
        .historical_candles(&key("BTC"), ts(600), ts(600), minute(), 4)
        .await
        .unwrap();
    assert!(report.series.is_empty());
    assert_eq!(report.coverage.windows, 0);
    assert!(report.coverage.is_complete());
    assert_eq!(ctrl.calls(Capability::Candles).await, 0);
}

#[tokio::test]
async fn bad_interval_arguments_are_rejected() {
    let (mock, ctrl) = DynamicMockAdapter::new_with_controller("ddsx");
    let c = coordinator(mock);
    let k = key("BTC");

    for (period, limit) in [
        (TimeDelta::zero(), 4),
        (TimeDelta::seconds(-60), 4),
        (minute(), 0),
        // two-minute candles are not served by the venue
        (TimeDelta::minutes(2), 4),
    ] {
        let err = c
            .historical_candles(&k, ts(0), ts(6_000), period, limit)
            .await
            .unwrap_err();
        assert!(
            matches!(err, SyncError::InvalidInterval(_)),
            "period {period}, limit {limit}: {err:?}"
        );
    }
    assert_eq!(ctrl.calls(Capability::Candles).await, 0);
}

#[tokio::test]
async fn adapter_without_candles_is_unsupported() {
    let (mock, _ctrl) = DynamicMockAdapter::builder("ddsx")
        .capabilities(&[Capability::Ticker])
        .build();
    let c = coordinator(mock);
    let err = c
        .historical_candles_extended(&key("BTC"), ts(0), ts(600), minute())
        .await
        .unwrap_err();
    assert_eq!(err, SyncError::unsupported("candles"));
}
