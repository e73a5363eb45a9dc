use std::time::Duration;

use marketsync::{Capability, SyncCoordinator, SyncError};
use marketsync_core::RawTicker;
use marketsync_mock::{DynamicMockAdapter, MockBehavior};

use crate::helpers::{coordinator, key, raw_ticker};

#[tokio::test]
async fn adapter_failure_is_tagged_and_nothing_is_cached() {
    let (mock, ctrl) = DynamicMockAdapter::new_with_controller("ddsx");
    let k = key("BTC");
    ctrl.set_ticker_behavior(
        k.clone(),
        MockBehavior::Fail(SyncError::Other("502 bad gateway".into())),
    )
    .await;
    let c = coordinator(mock);

    match c.ticker(&k).await.unwrap_err() {
        SyncError::Transport { venue, target, msg } => {
            assert_eq!(venue, "ddsx");
            assert!(target.contains("BTC/USDT"), "target names the instrument: {target}");
            assert!(msg.contains("502"));
        }
        other => panic!("unexpected: {other:?}"),
    }
    assert!(c.cache().ticker(&k).await.is_none());
}

#[tokio::test]
async fn non_finite_ticker_is_malformed() {
    let (mock, ctrl) = DynamicMockAdapter::new_with_controller("ddsx");
    let k = key("BTC");
    let bad = RawTicker {
        bid: f64::NAN,
        ..raw_ticker(10.0)
    };
    ctrl.set_ticker_behavior(k.clone(), MockBehavior::Return(bad))
        .await;
    let c = coordinator(mock);

    assert!(matches!(
        c.ticker(&k).await,
        Err(SyncError::MalformedTicker(_))
    ));
    assert!(c.cache().ticker(&k).await.is_none());
}

#[tokio::test]
async fn failed_refresh_keeps_previous_entry() {
    let (mock, ctrl) = DynamicMockAdapter::new_with_controller("ddsx");
    let k = key("BTC");
    ctrl.set_ticker_behavior(k.clone(), MockBehavior::Return(raw_ticker(10.0)))
        .await;
    let c = coordinator(mock);
    let before = c.ticker(&k).await.unwrap();

    ctrl.set_ticker_behavior(k.clone(), MockBehavior::Fail(SyncError::Other("down".into())))
        .await;
    assert!(c.refresh_ticker(&k).await.is_err());
    assert_eq!(c.ticker(&k).await.unwrap(), before);
}

#[tokio::test]
async fn hanging_venue_hits_provider_timeout() {
    let (mock, ctrl) = DynamicMockAdapter::new_with_controller("ddsx");
    let k = key("BTC");
    ctrl.set_ticker_behavior(k.clone(), MockBehavior::Hang).await;
    let c = SyncCoordinator::builder()
        .with_adapter(mock)
        .provider_timeout(Duration::from_millis(30))
        .build()
        .unwrap();

    let err = c.ticker(&k).await.unwrap_err();
    assert_eq!(err, SyncError::provider_timeout("ddsx", "ticker"));
    assert!(err.is_transport());
}

#[tokio::test]
async fn missing_capability_is_unsupported() {
    let (mock, ctrl) = DynamicMockAdapter::builder("ddsx")
        .capabilities(&[Capability::Candles])
        .build();
    let c = coordinator(mock);
    let err = c.ticker(&key("BTC")).await.unwrap_err();
    assert_eq!(err, SyncError::unsupported("ticker"));
    assert_eq!(ctrl.calls(Capability::Ticker).await, 0);
}
