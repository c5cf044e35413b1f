//! Player records as persisted in the candidate pool.

use serde::{Deserialize, Serialize};

use crate::{TierGroup, rank_number_str};

/// A player's current ladder standing.
///
/// Fetched whole from the upstream API and replaced whole on refresh,
/// never partially updated. Blank tier/division means unranked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummonerInfo {
    /// Stable player id used across all match endpoints
    pub puuid: String,

    /// Platform-scoped summoner id from the ladder listing
    pub summoner_id: String,

    /// Display name
    pub name: String,

    /// Solo-queue tier (e.g. "GOLD"), blank when unranked
    #[serde(default)]
    pub tier: String,

    /// Solo-queue division (e.g. "II"), blank when unranked
    #[serde(default)]
    pub division: String,

    /// League points within the division
    #[serde(default)]
    pub league_points: i32,

    /// Ranked wins this season
    #[serde(default)]
    pub wins: i32,

    /// Ranked losses this season
    #[serde(default)]
    pub losses: i32,

    /// Unix timestamp (seconds) of the last record refresh
    #[serde(default)]
    pub updated_at: i64,
}

impl SummonerInfo {
    /// The record's position in the total rank order.
    ///
    /// Display-purpose classification: anything unclassifiable (blank or
    /// unexpected strings) counts as unranked rather than erroring, so a
    /// stale or unranked record simply never qualifies for a sample.
    #[must_use]
    pub fn rank_number(&self) -> u8 {
        rank_number_str(&self.tier, &self.division).unwrap_or(0)
    }

    /// The sampling bucket this record currently belongs to.
    #[must_use]
    pub fn tier_group(&self) -> TierGroup {
        TierGroup::from_rank_number(self.rank_number())
    }
}
