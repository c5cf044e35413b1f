//! Rate-limited HTTP client for the Riot API.

use core::num::NonZeroU32;
use core::time::Duration;

use anyhow::{Context, Result};
use backon::{ExponentialBuilder, Retryable};
use config::CONFIG;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use match_structs::{Division, MatchInfo, SummonerInfo, Tier};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::RiotApi;
use crate::models::{LeagueEntry, LeagueListResponse, MatchDetailResponse, SummonerResponse};

/// Rate limit: 20 requests per second
const RATE_LIMIT_PER_SECOND: u32 = 20;

/// Rate limit: 50 requests per minute (half the 100-per-two-minutes cap)
const RATE_LIMIT_PER_MINUTE: u32 = 50;

/// Solo-queue id used for match-history filtering
const SOLO_QUEUE_ID: u32 = 420;

type RateLimiterType = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Maps a platform routing value to its regional routing value.
fn region_for(platform: &str) -> Result<&'static str> {
    let region = match platform {
        "NA1" | "BR1" | "LA1" | "LA2" => "AMERICAS",
        "KR" | "JP1" => "ASIA",
        "EUW1" | "EUN1" | "TR1" | "RU" => "EUROPE",
        "OC1" => "SEA",
        other => anyhow::bail!("Invalid platform: {other}"),
    };
    Ok(region)
}

/// Rate-limited client for the Riot API.
pub struct RiotClient {
    client: Client,
    platform: String,
    platform_base: String,
    region_base: String,
    per_second_limiter: RateLimiterType,
    per_minute_limiter: RateLimiterType,
}

impl RiotClient {
    /// Creates a new client for the configured platform.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform is unknown or the HTTP client
    /// cannot be created.
    pub fn new() -> Result<Self> {
        Self::for_platform(&CONFIG.platform)
    }

    /// Creates a new client for an explicit platform routing value.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform is unknown or the HTTP client
    /// cannot be created.
    pub fn for_platform(platform: &str) -> Result<Self> {
        let platform = platform.to_uppercase();
        let region = region_for(&platform)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let per_second_quota = Quota::per_second(
            NonZeroU32::new(RATE_LIMIT_PER_SECOND).expect("rate limit should be non-zero"),
        );
        let per_second_limiter = RateLimiter::direct(per_second_quota);

        let per_minute_quota = Quota::per_minute(
            NonZeroU32::new(RATE_LIMIT_PER_MINUTE).expect("rate limit should be non-zero"),
        );
        let per_minute_limiter = RateLimiter::direct(per_minute_quota);

        Ok(Self {
            client,
            platform_base: format!("https://{}.api.riotgames.com", platform.to_lowercase()),
            region_base: format!("https://{}.api.riotgames.com", region.to_lowercase()),
            platform,
            per_second_limiter,
            per_minute_limiter,
        })
    }

    /// Waits for rate limiters before making a request.
    async fn wait_for_rate_limit(&self) {
        self.per_second_limiter.until_ready().await;
        self.per_minute_limiter.until_ready().await;
    }

    /// Sends one authenticated GET and decodes the JSON body.
    ///
    /// 429 responses are surfaced as errors so callers can retry; other
    /// failure statuses carry the body for context.
    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        self.wait_for_rate_limit().await;

        debug!("GET {url}");

        let response = self
            .client
            .get(url)
            .query(query)
            .header("X-Riot-Token", &CONFIG.riot_api_key)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {url}"))?;

        let status = response.status();
        if status == 429 {
            let body = response.text().await.unwrap_or_default();
            warn!("Rate limited (429) on {url}");
            anyhow::bail!("Rate limited (429): {body}");
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Request to {url} failed with status {status}: {body}");
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {url}"))
    }

    /// Normalizes a match id to API form and checks the platform prefix.
    fn validate_match_id(&self, match_id: &str) -> Result<String> {
        let normalized = match_id.to_uppercase().replace('-', "_");
        if !normalized.starts_with(&self.platform) {
            anyhow::bail!("match id {match_id} belongs to a different platform");
        }
        Ok(normalized)
    }
}

impl RiotApi for RiotClient {
    async fn league_entries(
        &self,
        tier: Tier,
        division: Division,
        page: u32,
    ) -> Result<Vec<LeagueEntry>> {
        let url = format!(
            "{}/lol/league/v4/entries/RANKED_SOLO_5x5/{tier}/{division}",
            self.platform_base
        );
        self.get_json(&url, &[("page", page.to_string())]).await
    }

    async fn apex_league(&self, tier: Tier) -> Result<Vec<LeagueEntry>> {
        let league = match tier {
            Tier::Master => "masterleagues",
            Tier::Grandmaster => "grandmasterleagues",
            Tier::Challenger => "challengerleagues",
            other => anyhow::bail!("{other} is not an apex tier"),
        };
        let url = format!(
            "{}/lol/league/v4/{league}/by-queue/RANKED_SOLO_5x5",
            self.platform_base
        );
        let response: LeagueListResponse = self.get_json(&url, &[]).await?;

        info!("Fetched {} {tier} league entries", response.entries.len());

        // Apex entries omit the tier; patch it in so every entry is
        // self-describing downstream.
        let mut entries = response.entries;
        for entry in &mut entries {
            entry.tier = Some(tier.to_string());
        }
        Ok(entries)
    }

    async fn resolve_puuid(&self, summoner_id: &str) -> Result<String> {
        let url = format!("{}/lol/summoner/v4/summoners/{summoner_id}", self.platform_base);
        let summoner: SummonerResponse = self.get_json(&url, &[]).await?;
        Ok(summoner.puuid)
    }

    async fn player_record(&self, puuid: &str) -> Result<SummonerInfo> {
        let url = format!("{}/lol/summoner/v4/summoners/by-puuid/{puuid}", self.platform_base);
        let summoner: SummonerResponse = self.get_json(&url, &[]).await?;

        let url = format!(
            "{}/lol/league/v4/entries/by-summoner/{}",
            self.platform_base, summoner.id
        );
        let entries: Vec<LeagueEntry> = self.get_json(&url, &[]).await?;
        let solo = entries
            .into_iter()
            .find(|e| e.queue_type.as_deref() == Some("RANKED_SOLO_5x5"));

        let mut record = SummonerInfo {
            puuid: summoner.puuid,
            summoner_id: summoner.id,
            name: summoner.name,
            tier: String::new(),
            division: String::new(),
            league_points: 0,
            wins: 0,
            losses: 0,
            updated_at: chrono::Utc::now().timestamp(),
        };
        if let Some(entry) = solo {
            record.tier = entry.tier.unwrap_or_default();
            record.division = entry.rank;
            record.league_points = entry.league_points;
            record.wins = entry.wins;
            record.losses = entry.losses;
        }
        Ok(record)
    }

    async fn recent_match_ids(
        &self,
        puuid: &str,
        skip: u32,
        count: u32,
        start_ts: Option<i64>,
        end_ts: Option<i64>,
    ) -> Result<Vec<String>> {
        let url = format!("{}/lol/match/v5/matches/by-puuid/{puuid}/ids", self.region_base);

        let mut query = vec![
            ("queue", SOLO_QUEUE_ID.to_string()),
            ("start", skip.to_string()),
            ("count", count.to_string()),
        ];
        if let Some(start_ts) = start_ts {
            query.push(("startTime", start_ts.to_string()));
        }
        if let Some(end_ts) = end_ts {
            query.push(("endTime", end_ts.to_string()));
        }

        self.get_json(&url, &query).await
    }

    async fn match_detail(&self, match_id: &str) -> Result<MatchInfo> {
        let match_id = self.validate_match_id(match_id)?;
        let url = format!("{}/lol/match/v5/matches/{match_id}", self.region_base);

        // Only rate-limit pressure (429) is worth retrying; a 404 stays an
        // error so the engine can skip the match.
        let response: MatchDetailResponse = (|| self.get_json(&url, &[]))
            .retry(
                &ExponentialBuilder::default()
                    .with_max_times(3)
                    .with_min_delay(Duration::from_secs(1))
                    .with_max_delay(Duration::from_secs(8)),
            )
            .when(|error| format!("{error:#}").contains("429"))
            .await?;

        Ok(response.info)
    }
}
