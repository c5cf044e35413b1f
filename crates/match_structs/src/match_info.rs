//! Match records as returned by the match detail endpoint.

use serde::{Deserialize, Serialize};

/// A finished match. Immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    /// Numeric game id
    #[serde(default, rename = "gameId")]
    pub game_id: i64,

    /// Full game version string (e.g. "14.3.558.8123")
    #[serde(default, rename = "gameVersion")]
    pub version: String,

    /// Game creation timestamp in milliseconds
    #[serde(default, rename = "gameCreation")]
    pub creation: i64,

    /// Game duration in seconds
    #[serde(default, rename = "gameDuration")]
    pub duration: i64,

    /// Game end timestamp in milliseconds
    #[serde(default, rename = "gameEndTimestamp")]
    pub end_time: i64,

    /// Per-player stat blocks, ten entries for a clean match
    #[serde(default)]
    pub participants: Vec<ParticipantInfo>,
}

impl MatchInfo {
    /// Stable player ids of every participant, in roster order.
    #[must_use]
    pub fn participant_puuids(&self) -> Vec<&str> {
        self.participants.iter().map(|p| p.puuid.as_str()).collect()
    }
}

/// One player's stat block within a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantInfo {
    /// Stable player id; bots carry a placeholder value
    #[serde(default)]
    pub puuid: String,

    /// Champion played
    #[serde(default)]
    pub champion_name: String,

    /// Assigned role (TOP, JUNGLE, MIDDLE, BOTTOM, UTILITY)
    #[serde(default)]
    pub team_position: String,

    /// First summoner spell id
    #[serde(default)]
    pub summoner1_id: i32,

    /// Second summoner spell id
    #[serde(default)]
    pub summoner2_id: i32,

    /// Total gold spent over the match
    #[serde(default)]
    pub gold_spent: i64,

    /// Lane minion kills
    #[serde(default)]
    pub total_minions_killed: i64,

    /// Jungle monster kills
    #[serde(default)]
    pub neutral_minions_killed: i64,

    /// Kill count
    #[serde(default)]
    pub kills: i32,

    /// Death count
    #[serde(default)]
    pub deaths: i32,

    /// Whether the participant's team won
    #[serde(default)]
    pub win: bool,
}
