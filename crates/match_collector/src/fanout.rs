//! Bounded concurrent fan-out for per-player API calls.
//!
//! Results are consumed unordered; a failed or panicked worker is logged
//! and dropped, so one bad player never aborts a pass. Only the
//! coordinating task touches shared state with what comes back.

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use match_structs::SummonerInfo;
use riot_client::{LeagueEntry, RiotApi};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::warn;

/// Worker-pool size: bounded by cores, capped at 8.
pub(crate) fn worker_limit() -> usize {
    std::thread::available_parallelism().map_or(8, |cores| cores.get().min(8))
}

/// Resolves ladder entries to full player records via the id-lookup call.
pub(crate) async fn resolve_entries<A: RiotApi>(
    api: &Arc<A>,
    entries: Vec<LeagueEntry>,
) -> Result<Vec<SummonerInfo>> {
    let semaphore = Arc::new(Semaphore::new(worker_limit()));
    let mut join_set = JoinSet::new();

    for entry in entries {
        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        let api = Arc::clone(api);
        join_set.spawn(async move {
            let _permit = permit;
            let puuid = api.resolve_puuid(&entry.summoner_id).await?;
            anyhow::Ok(SummonerInfo {
                puuid,
                summoner_id: entry.summoner_id,
                name: entry.summoner_name,
                tier: entry.tier.unwrap_or_default(),
                division: entry.rank,
                league_points: entry.league_points,
                wins: entry.wins,
                losses: entry.losses,
                updated_at: Utc::now().timestamp(),
            })
        });
    }

    Ok(drain_unordered(join_set).await)
}

/// Fetches current records for a set of players discovered mid-run.
pub(crate) async fn fetch_records<A: RiotApi>(
    api: &Arc<A>,
    puuids: Vec<String>,
) -> Result<Vec<SummonerInfo>> {
    let semaphore = Arc::new(Semaphore::new(worker_limit()));
    let mut join_set = JoinSet::new();

    for puuid in puuids {
        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        let api = Arc::clone(api);
        join_set.spawn(async move {
            let _permit = permit;
            api.player_record(&puuid).await
        });
    }

    Ok(drain_unordered(join_set).await)
}

async fn drain_unordered(mut join_set: JoinSet<Result<SummonerInfo>>) -> Vec<SummonerInfo> {
    let mut records = Vec::new();
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok(Ok(record)) => records.push(record),
            Ok(Err(error)) => warn!("Dropping player resolution: {error:#}"),
            Err(error) => warn!("Player resolution task failed: {error}"),
        }
    }
    records
}
