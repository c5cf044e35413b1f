//! API response types for the Riot endpoints the engine consumes.

use serde::Deserialize;

/// One row of a league listing (paginated entries or apex league).
///
/// Apex league responses omit the tier; [`crate::RiotClient`] patches it
/// in before handing entries to callers.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEntry {
    /// Platform-scoped summoner id
    pub summoner_id: String,

    /// Display name
    #[serde(default)]
    pub summoner_name: String,

    /// Tier string (e.g. "GOLD"); absent in apex league entries
    #[serde(default)]
    pub tier: Option<String>,

    /// Division string (e.g. "II"); apex entries report "I"
    #[serde(default)]
    pub rank: String,

    /// League points within the division
    #[serde(default)]
    pub league_points: i32,

    /// Ranked wins this season
    #[serde(default)]
    pub wins: i32,

    /// Ranked losses this season
    #[serde(default)]
    pub losses: i32,

    /// Queue discriminator on per-summoner entries (e.g. "RANKED_SOLO_5x5")
    #[serde(default)]
    pub queue_type: Option<String>,
}

/// Response from the apex league endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct LeagueListResponse {
    /// Entries of the league, tier omitted
    pub entries: Vec<LeagueEntry>,
}

/// Response from the summoner endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct SummonerResponse {
    /// Platform-scoped summoner id
    pub id: String,

    /// Stable player id
    pub puuid: String,

    /// Display name
    #[serde(default)]
    pub name: String,
}

/// Response from the match detail endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchDetailResponse {
    /// Match payload; the metadata envelope is not consumed
    pub info: match_structs::MatchInfo,
}
