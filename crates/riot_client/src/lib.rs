//! Rate-limited client for the Riot games-statistics API.
//!
//! The [`RiotApi`] trait is the boundary the collection engine is written
//! against; [`RiotClient`] is the production implementation.

use std::future::Future;

use anyhow::Result;
use match_structs::{MatchInfo, SummonerInfo, Tier};

mod client;
mod models;

pub use client::RiotClient;
pub use models::LeagueEntry;

/// Upstream API surface consumed by the collection engine.
///
/// Implementations must be cheap to share behind an `Arc`; the engine
/// fans per-player calls out across a bounded worker pool.
pub trait RiotApi: Send + Sync + 'static {
    /// One page of the league-entry listing for a tier/division.
    fn league_entries(
        &self,
        tier: Tier,
        division: match_structs::Division,
        page: u32,
    ) -> impl Future<Output = Result<Vec<LeagueEntry>>> + Send;

    /// The single unpaginated listing of an apex tier, with the tier
    /// patched into each entry.
    fn apex_league(&self, tier: Tier) -> impl Future<Output = Result<Vec<LeagueEntry>>> + Send;

    /// Resolves a platform-scoped summoner id to the stable player id.
    fn resolve_puuid(&self, summoner_id: &str) -> impl Future<Output = Result<String>> + Send;

    /// The player's current ranked record (blank tier when unranked).
    fn player_record(&self, puuid: &str) -> impl Future<Output = Result<SummonerInfo>> + Send;

    /// Recent solo-queue match ids, newest first, within an optional
    /// timestamp window (seconds).
    fn recent_match_ids(
        &self,
        puuid: &str,
        skip: u32,
        count: u32,
        start_ts: Option<i64>,
        end_ts: Option<i64>,
    ) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Full match detail. Fails on unknown match ids.
    fn match_detail(&self, match_id: &str) -> impl Future<Output = Result<MatchInfo>> + Send;
}
