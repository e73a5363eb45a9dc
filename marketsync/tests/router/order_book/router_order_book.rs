use marketsync::{Capability, SyncError};
use marketsync_mock::{DynamicMockAdapter, MockBehavior};
use rust_decimal::Decimal;

use crate::helpers::{coordinator, key, raw_book};

#[tokio::test]
async fn miss_normalizes_and_caches() {
    let (mock, ctrl) = DynamicMockAdapter::new_with_controller("ddsx");
    let k = key("BTC");
    ctrl.set_order_book_behavior(
        k.clone(),
        MockBehavior::Return(raw_book(
            &[(101.0, 1.0), (100.0, 0.0), (99.0, 2.0)],
            &[(102.0, 1.0), (103.0, f64::NAN)],
            5,
        )),
    )
    .await;
    let c = coordinator(mock);

    let book = c.order_book(&k).await.unwrap();
    assert_eq!(book.bids.len(), 2, "zero-quantity level dropped");
    assert_eq!(book.asks.len(), 1, "NaN level dropped");
    assert_eq!(book.best_bid().map(|l| l.price), Some(Decimal::from(101)));
    assert_eq!(book.sequence, 5);

    c.order_book(&k).await.unwrap();
    assert_eq!(ctrl.calls(Capability::OrderBook).await, 1);
}

#[tokio::test]
async fn duplicate_bid_price_is_rejected_with_empty_cache() {
    let (mock, ctrl) = DynamicMockAdapter::new_with_controller("ddsx");
    let k = key("BTC");
    ctrl.set_order_book_behavior(
        k.clone(),
        MockBehavior::Return(raw_book(&[(100.0, 1.0), (100.0, 2.0)], &[(101.0, 1.0)], 1)),
    )
    .await;
    let c = coordinator(mock);

    assert!(matches!(
        c.order_book(&k).await,
        Err(SyncError::MalformedOrderBook(_))
    ));
    assert!(c.cache().order_book(&k).await.is_none());
    assert_eq!(ctrl.calls(Capability::OrderBook).await, 1);
}

#[tokio::test]
async fn malformed_refresh_retains_previous_snapshot() {
    let (mock, ctrl) = DynamicMockAdapter::new_with_controller("ddsx");
    let k = key("BTC");
    ctrl.set_order_book_behavior(
        k.clone(),
        MockBehavior::Return(raw_book(&[(100.0, 1.0)], &[(101.0, 1.0)], 1)),
    )
    .await;
    let c = coordinator(mock);
    let good = c.order_book(&k).await.unwrap();

    ctrl.set_order_book_behavior(
        k.clone(),
        MockBehavior::Return(raw_book(&[(99.0, 1.0)], &[(103.0, 1.0), (102.0, 1.0)], 2)),
    )
    .await;
    assert!(matches!(
        c.refresh_order_book(&k).await,
        Err(SyncError::MalformedOrderBook(_))
    ));
    assert_eq!(c.order_book(&k).await.unwrap(), good);
}

#[tokio::test]
async fn older_sequence_on_refresh_is_stale() {
    let (mock, ctrl) = DynamicMockAdapter::new_with_controller("ddsx");
    let k = key("BTC");
    ctrl.set_order_book_behavior(
        k.clone(),
        MockBehavior::Return(raw_book(&[(100.0, 1.0)], &[(101.0, 1.0)], 10)),
    )
    .await;
    let c = coordinator(mock);
    c.order_book(&k).await.unwrap();

    ctrl.set_order_book_behavior(
        k.clone(),
        MockBehavior::Return(raw_book(&[(100.5, 1.0)], &[(101.0, 1.0)], 7)),
    )
    .await;
    assert_eq!(
        c.refresh_order_book(&k).await.unwrap_err(),
        SyncError::StaleOrderBook {
            cached: 10,
            incoming: 7
        }
    );

    ctrl.set_order_book_behavior(
        k.clone(),
        MockBehavior::Return(raw_book(&[(100.5, 1.0)], &[(101.0, 1.0)], 11)),
    )
    .await;
    let fresh = c.refresh_order_book(&k).await.unwrap();
    assert_eq!(fresh.sequence, 11);
}

#[tokio::test]
async fn transport_failure_propagates_without_fallback() {
    let (mock, ctrl) = DynamicMockAdapter::new_with_controller("ddsx");
    let k = key("BTC");
    ctrl.set_order_book_behavior(
        k.clone(),
        MockBehavior::Fail(SyncError::transport("ddsx", "order-book", "reset")),
    )
    .await;
    let c = coordinator(mock);
    let err = c.order_book(&k).await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err, SyncError::transport("ddsx", "order-book", "reset"));
}
