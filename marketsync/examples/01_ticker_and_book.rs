mod common;

use marketsync::{InstrumentKey, SyncCoordinator};
use marketsync_mock::MockVenue;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_tracing();

    // 1. Build the coordinator around a single venue adapter.
    let coordinator = SyncCoordinator::builder()
        .with_adapter(common::get_adapter())
        .build()?;

    let btc = InstrumentKey::spot(MockVenue::NAME, "BTC", "USDT")?;

    // 2. First call misses the cache and hits the venue; the second is served locally.
    let ticker = coordinator.ticker(&btc).await?;
    let again = coordinator.ticker(&btc).await?;
    println!("ticker for {btc}: {ticker:#?}");
    println!("cached copy identical: {}", *ticker == *again);

    // 3. Order books carry a sequence; each refresh must not go backwards.
    let book = coordinator.order_book(&btc).await?;
    println!(
        "book seq {}: best bid {:?}, best ask {:?}",
        book.sequence,
        book.best_bid().map(|l| l.price),
        book.best_ask().map(|l| l.price),
    );
    let newer = coordinator.refresh_order_book(&btc).await?;
    println!("refreshed book seq {}", newer.sequence);

    // 4. A failing venue call surfaces as a transport error and leaves the cache untouched.
    let broken = InstrumentKey::spot(MockVenue::NAME, "FAIL", "USDT")?;
    match coordinator.ticker(&broken).await {
        Ok(t) => println!("unexpected ticker: {t:?}"),
        Err(e) => println!("{broken}: {e}"),
    }
    let (tickers, books) = coordinator.cache().len().await;
    println!("cache holds {tickers} ticker(s), {books} book(s)");

    Ok(())
}
