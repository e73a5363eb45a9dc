mod common;

use std::time::Duration;

use chrono::{TimeDelta, Utc};
use marketsync::{DedupPolicy, GapReason, InstrumentKey, SyncCoordinator};
use marketsync_mock::MockVenue;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_tracing();

    let coordinator = SyncCoordinator::builder()
        .with_adapter(common::get_adapter())
        .max_concurrent_fetches(4)
        .provider_timeout(Duration::from_secs(2))
        .dedup_policy(DedupPolicy::LatestWindowWins)
        .build()?;

    let eth = InstrumentKey::spot(MockVenue::NAME, "ETH", "USDT")?;
    let end = Utc::now();
    let start = end - TimeDelta::days(3);

    // Three days of 5-minute candles at 200 per request is split into several windows.
    let report = coordinator
        .historical_candles(&eth, start, end, TimeDelta::minutes(5), 200)
        .await?;
    println!(
        "{} candles from {} windows ({} covered)",
        report.series.len(),
        report.coverage.windows,
        report.coverage.covered()
    );
    if let (Some(first), Some(last)) = (report.series.first(), report.series.last()) {
        println!("first {} close {}", first.period_start, first.close);
        println!("last  {} close {}", last.period_start, last.close);
    }

    // The adapter's own limit is used when none is given.
    let hourly = coordinator
        .historical_candles_extended(&eth, start, end, TimeDelta::hours(1))
        .await?;
    println!("{} hourly candles", hourly.series.len());

    // Failed windows never abort the request; they are reported as gaps.
    let broken = InstrumentKey::spot(MockVenue::NAME, "FAIL", "USDT")?;
    let failed = coordinator
        .historical_candles(&broken, start, end, TimeDelta::hours(1), 24)
        .await?;
    for gap in failed.coverage.gaps_with(GapReason::TransportError) {
        println!("gap {}: {:?}", gap.window, gap.error);
    }

    Ok(())
}
