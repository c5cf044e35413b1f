//! Daily collection driver.
//!
//! Runs a quota-sampled collection pass for each band named on the
//! command line (sweeping the Apex band), defaulting to the standard
//! daily rotation when no bands are given.

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use match_collector::MatchCollector;
use match_structs::TierGroup;
use riot_client::RiotClient;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{EnvFilter, fmt};

/// Matches collected per band per day.
const MATCH_PER_DAY: usize = 30;

/// Players sampled per band pool.
const USER_COUNT: usize = 3200;

/// Bands collected when none are named on the command line.
const DAILY_ROTATION: &[TierGroup] = &[
    TierGroup::BronzeHigh,
    TierGroup::BronzeLow,
    TierGroup::SilverHigh,
    TierGroup::SilverLow,
    TierGroup::GoldHigh,
    TierGroup::GoldLow,
    TierGroup::PlatinumHigh,
    TierGroup::PlatinumLow,
    TierGroup::DiamondHigh,
    TierGroup::DiamondLow,
    TierGroup::Master,
    TierGroup::Apex,
];

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stdout);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();

    info!("Ranked-match collector starting");

    let bands: Vec<TierGroup> = {
        let named: Vec<String> = std::env::args().skip(1).collect();
        if named.is_empty() {
            DAILY_ROTATION.to_vec()
        } else {
            named
                .iter()
                .map(|name| {
                    TierGroup::from_str(name)
                        .map_err(|_| anyhow::anyhow!("Unknown tier group '{name}'"))
                })
                .collect::<Result<_>>()?
        }
    };

    let api = Arc::new(RiotClient::new()?);

    for band in bands {
        let collector =
            MatchCollector::new(band).with_context(|| format!("Cannot collect for {band}"))?;
        info!("Collecting {band} on patch {}", collector.version());

        if band == TierGroup::Apex {
            collector.collect_all_match(&api, true, false, None, None).await?;
        } else {
            collector
                .collect_tier_match(&api, MATCH_PER_DAY, USER_COUNT, true, false, None, None)
                .await?;
        }
        info!("{band}: complete");
    }

    Ok(())
}
